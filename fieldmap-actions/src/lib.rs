//! Fieldmap Field Actions
//!
//! Standard named transformations and [`FieldActionService`], the default
//! [`ActionBridge`] used when an expression name has no function factory.
//!
//! Actions are dispatched on `(NAME, ValueCategory)`. An action declares the
//! categories it accepts; a category-specific registration always claims its
//! slot, while an `Accepts::Any` registration only fills slots nobody else
//! claimed, whatever the registration order.

mod helpers;
pub mod arithmetic;
pub mod collection;
pub mod string;

use fieldmap_core::{MapError, Value, ValueCategory};
use fieldmap_plugin::{ActionBridge, ActionProcessor, FieldAction};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<FieldActionService>> = OnceLock::new();

/// Field-action catalog with an explicit category dispatch table
#[derive(Default)]
pub struct FieldActionService {
    dispatch: HashMap<(String, ValueCategory), Arc<dyn FieldAction>>,
    /// First action registered under each name; serves `Null` samples
    primary: HashMap<String, Arc<dyn FieldAction>>,
    order: Vec<Arc<dyn FieldAction>>,
}

impl FieldActionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service preloaded with the standard actions
    pub fn standard() -> Self {
        load_standard_actions(Self::new())
    }

    /// Process-wide service with the standard actions, built once
    pub fn global() -> Arc<FieldActionService> {
        GLOBAL
            .get_or_init(|| {
                let service = Self::standard();
                tracing::debug!(count = service.len(), "loaded standard field actions");
                Arc::new(service)
            })
            .clone()
    }

    pub fn with_action<A: FieldAction + 'static>(mut self, action: A) -> Self {
        self.register(Arc::new(action));
        self
    }

    fn register(&mut self, action: Arc<dyn FieldAction>) {
        let meta = action.meta();
        let key = meta.name.to_uppercase();
        for category in meta.accepts.categories() {
            let slot = (key.clone(), category);
            if meta.accepts.is_any() {
                self.dispatch.entry(slot).or_insert_with(|| action.clone());
            } else {
                self.dispatch.insert(slot, action.clone());
            }
        }
        self.primary.entry(key).or_insert_with(|| action.clone());
        self.order.push(action);
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Categories `name` can be dispatched on, in `ValueCategory::ALL` order
    pub fn supported_categories(&self, name: &str) -> Vec<ValueCategory> {
        let key = name.to_uppercase();
        ValueCategory::ALL.iter()
            .copied()
            .filter(|c| self.dispatch.contains_key(&(key.clone(), *c)))
            .collect()
    }

    pub fn list_actions(&self) -> Value {
        let actions: Vec<Value> = self.order.iter()
            .map(|action| {
                let meta = action.meta();
                let categories = self.supported_categories(meta.name)
                    .into_iter()
                    .map(|c| Value::Text(c.name().to_string()))
                    .collect();
                let properties = meta.properties.iter()
                    .map(|p| Value::Text(p.name.to_string()))
                    .collect();
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("description".to_string(), Value::Text(meta.description.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                obj.insert("accepts".to_string(), Value::List(categories));
                obj.insert("properties".to_string(), Value::List(properties));
                Value::Object(obj)
            })
            .collect();
        Value::List(actions)
    }
}

impl ActionBridge for FieldActionService {
    fn find_action_processor(&self, name: &str, sample: &Value) -> Option<ActionProcessor> {
        let key = name.to_uppercase();
        let category = sample.category();
        let found = self.dispatch.get(&(key.clone(), category))
            .or_else(|| match category {
                ValueCategory::Null => self.primary.get(&key),
                _ => None,
            })
            .map(|action| ActionProcessor::new(action.clone(), category));
        tracing::trace!(action = %key, %category, found = found.is_some(), "field action lookup");
        found
    }

    fn process_action(
        &self,
        processor: &ActionProcessor,
        properties: &HashMap<String, Value>,
        value: Value,
    ) -> Result<Value, MapError> {
        let meta = processor.meta();
        for prop in meta.properties.iter().filter(|p| !p.optional) {
            if properties.get(prop.name).map_or(true, Value::is_null) {
                return Err(MapError::missing_property(meta.name, prop.name));
            }
        }
        processor.action().process(properties, value)
    }

    fn action_names(&self) -> Vec<String> {
        self.order.iter().map(|a| a.meta().name.to_string()).collect()
    }
}

/// Load the standard actions into a service
pub fn load_standard_actions(service: FieldActionService) -> FieldActionService {
    service
        // Text
        .with_action(string::Uppercase)
        .with_action(string::Lowercase)
        .with_action(string::Capitalize)
        .with_action(string::Trim)
        .with_action(string::TrimLeft)
        .with_action(string::TrimRight)
        .with_action(string::Append)
        .with_action(string::Prepend)
        .with_action(string::PadStringLeft)
        .with_action(string::PadStringRight)
        .with_action(string::SubString)
        .with_action(string::ReplaceAll)
        .with_action(string::ReplaceFirst)
        .with_action(string::Split)

        // Collection
        .with_action(collection::Concatenate)
        .with_action(collection::Count)
        .with_action(collection::ItemAt)
        .with_action(collection::Length)
        .with_action(collection::IsNull)

        // Arithmetic
        .with_action(arithmetic::Add)
        .with_action(arithmetic::Subtract)
        .with_action(arithmetic::Multiply)
        .with_action(arithmetic::Divide)
        .with_action(arithmetic::Maximum)
        .with_action(arithmetic::Minimum)
        .with_action(arithmetic::Average)
        .with_action(arithmetic::AbsoluteValue)
        .with_action(arithmetic::Ceiling)
        .with_action(arithmetic::Floor)
        .with_action(arithmetic::Round)
}
