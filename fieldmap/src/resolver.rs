//! Function Resolver
//!
//! Turns a function name, its argument expressions and its named properties
//! into one evaluable node. Names with a registered function factory are
//! built by that factory. Every other name becomes a [`DynamicCall`] that
//! dispatches to a field action at evaluation time, based on the shape of
//! the evaluated arguments.

use crate::config::ResolverConfig;
use fieldmap_actions::FieldActionService;
use fieldmap_core::{MapError, Value};
use fieldmap_plugin::{similar_names, ActionBridge, EvalContext, Expression, FunctionRegistry};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Result<DefaultFunctionResolver, MapError>> = OnceLock::new();

/// Named property expressions of a call
pub type Properties = HashMap<String, Box<dyn Expression>>;

pub trait FunctionResolver: Send + Sync {
    fn resolve(
        &self,
        name: &str,
        args: Vec<Box<dyn Expression>>,
        properties: Properties,
    ) -> Result<Box<dyn Expression>, MapError>;
}

/// Registry first, field actions second
pub struct DefaultFunctionResolver {
    registry: &'static FunctionRegistry,
    bridge: Arc<dyn ActionBridge>,
    config: ResolverConfig,
}

impl DefaultFunctionResolver {
    pub fn new(registry: &'static FunctionRegistry, bridge: Arc<dyn ActionBridge>) -> Self {
        Self {
            registry,
            bridge,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolver over the process-wide registry and field-action service.
    /// The registry is built once; if it already exists with another
    /// duplicate policy, that policy is kept and reported by [`Self::config`].
    pub fn from_config(mut config: ResolverConfig) -> Result<Self, MapError> {
        let registry = FunctionRegistry::global_with(config.duplicate_policy)?;
        if registry.policy() != config.duplicate_policy {
            tracing::warn!(
                requested = ?config.duplicate_policy,
                effective = ?registry.policy(),
                "function registry already built with a different duplicate policy"
            );
            config.duplicate_policy = registry.policy();
        }
        let bridge: Arc<dyn ActionBridge> = FieldActionService::global();
        Ok(Self::new(registry, bridge).with_config(config))
    }

    /// Process-wide resolver configured from the environment, built once.
    /// A construction failure is cached like the registry's.
    pub fn global() -> Result<&'static DefaultFunctionResolver, MapError> {
        GLOBAL
            .get_or_init(|| Self::from_config(ResolverConfig::from_env()))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn registry(&self) -> &'static FunctionRegistry {
        self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

impl FunctionResolver for DefaultFunctionResolver {
    fn resolve(
        &self,
        name: &str,
        args: Vec<Box<dyn Expression>>,
        properties: Properties,
    ) -> Result<Box<dyn Expression>, MapError> {
        if let Some(factory) = self.registry.lookup(name) {
            tracing::trace!(function = name, args = args.len(), "resolved to function factory");
            return factory.create(args);
        }

        tracing::trace!(function = name, args = args.len(), "deferring to field actions");
        let mut call = DynamicCall::new(name, args, properties, self.bridge.clone());
        if self.config.suggest_similar {
            call = call.with_suggestions_from(self.registry);
        }
        Ok(Box::new(call))
    }
}

/// Call dispatched to a field action when evaluated
pub struct DynamicCall {
    name: String,
    args: Vec<Box<dyn Expression>>,
    properties: Properties,
    bridge: Arc<dyn ActionBridge>,
    suggest_from: Option<&'static FunctionRegistry>,
}

impl DynamicCall {
    pub fn new(
        name: impl Into<String>,
        args: Vec<Box<dyn Expression>>,
        properties: Properties,
        bridge: Arc<dyn ActionBridge>,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            properties,
            bridge,
            suggest_from: None,
        }
    }

    /// Offer similar function and action names when nothing matches
    pub fn with_suggestions_from(mut self, registry: &'static FunctionRegistry) -> Self {
        self.suggest_from = Some(registry);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    fn not_found(&self) -> MapError {
        tracing::debug!(function = %self.name, "no function or field action matched");
        let mut err = MapError::function_not_found(&self.name);
        if let Some(registry) = self.suggest_from {
            let mut candidates = registry.names();
            candidates.extend(self.bridge.action_names());
            let similar = similar_names(&self.name, candidates.iter().map(String::as_str));
            if !similar.is_empty() {
                let top: Vec<&str> = similar.iter().take(5).map(String::as_str).collect();
                err = err.with_suggestion(format!("Similar: {}", top.join(", ")));
            }
        }
        err
    }
}

impl Expression for DynamicCall {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value, MapError> {
        let mut values = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            values.push(arg.evaluate(ctx)?);
        }

        let value = match values.len() {
            0 => return Ok(Value::Null),
            1 => values.swap_remove(0),
            _ => Value::List(values),
        };

        let mut properties = HashMap::with_capacity(self.properties.len());
        for (key, expr) in &self.properties {
            properties.insert(key.clone(), expr.evaluate(ctx)?);
        }

        match self.bridge.find_action_processor(&self.name, &value) {
            Some(processor) => self.bridge.process_action(&processor, &properties, value),
            None => Err(self.not_found()),
        }
    }
}

impl std::fmt::Debug for DynamicCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut props: Vec<&String> = self.properties.keys().collect();
        props.sort();
        f.debug_struct("DynamicCall")
            .field("name", &self.name)
            .field("args", &self.args.len())
            .field("properties", &props)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{FieldRef, Literal};
    use fieldmap_core::codes;
    use fieldmap_plugin::{Accepts, ActionMeta, ActionProcessor, DuplicatePolicy, FieldAction};
    use fieldmap_core::ValueCategory;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Joins its list input with the `sep` property
    struct JoinWithSep;

    impl FieldAction for JoinWithSep {
        fn meta(&self) -> ActionMeta {
            ActionMeta {
                name: "CONCAT",
                description: "test join",
                accepts: Accepts::Any,
                properties: &[],
                returns: "Text",
                examples: &[],
                category: "test",
            }
        }

        fn process(&self, props: &HashMap<String, Value>, value: Value) -> Result<Value, MapError> {
            let sep = props.get("sep").map(Value::to_string).unwrap_or_default();
            let parts: Vec<String> = match value {
                Value::List(items) => items.iter().map(Value::to_string).collect(),
                other => vec![other.to_string()],
            };
            Ok(Value::Text(parts.join(&sep)))
        }
    }

    /// Answers for `CONCAT` only and records every call it receives
    #[derive(Default)]
    struct RecordingBridge {
        lookups: Mutex<Vec<(String, ValueCategory)>>,
        processed: Mutex<Vec<(Value, HashMap<String, Value>)>>,
    }

    impl RecordingBridge {
        fn lookups(&self) -> Vec<(String, ValueCategory)> {
            self.lookups.lock().unwrap().clone()
        }

        fn processed(&self) -> Vec<(Value, HashMap<String, Value>)> {
            self.processed.lock().unwrap().clone()
        }
    }

    impl ActionBridge for RecordingBridge {
        fn find_action_processor(&self, name: &str, sample: &Value) -> Option<ActionProcessor> {
            self.lookups.lock().unwrap().push((name.to_string(), sample.category()));
            name.eq_ignore_ascii_case("CONCAT")
                .then(|| ActionProcessor::new(Arc::new(JoinWithSep), sample.category()))
        }

        fn process_action(
            &self,
            processor: &ActionProcessor,
            properties: &HashMap<String, Value>,
            value: Value,
        ) -> Result<Value, MapError> {
            self.processed.lock().unwrap().push((value.clone(), properties.clone()));
            processor.action().process(properties, value)
        }

        fn action_names(&self) -> Vec<String> {
            vec!["CONCAT".to_string()]
        }
    }

    fn registry() -> &'static FunctionRegistry {
        FunctionRegistry::global().unwrap()
    }

    fn recording() -> (Arc<RecordingBridge>, DefaultFunctionResolver) {
        let bridge = Arc::new(RecordingBridge::default());
        let resolver = DefaultFunctionResolver::new(registry(), bridge.clone());
        (bridge, resolver)
    }

    fn lit(value: impl Into<Value>) -> Box<dyn Expression> {
        Literal::boxed(value)
    }

    /// Records `tag` in `log` and then yields `result`
    fn traced(log: &Log, tag: &str, result: Result<Value, MapError>) -> Box<dyn Expression> {
        let log = log.clone();
        let tag = tag.to_string();
        Box::new(move |_: &EvalContext| {
            log.lock().unwrap().push(tag.clone());
            result.clone()
        })
    }

    fn failing() -> Box<dyn Expression> {
        Box::new(|_: &EvalContext| Err::<Value, _>(MapError::domain_error("boom")))
    }

    fn props(pairs: Vec<(&str, Box<dyn Expression>)>) -> Properties {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn eval(node: &dyn Expression) -> Result<Value, MapError> {
        node.evaluate(&EvalContext::new())
    }

    #[test]
    fn test_factory_path_ignores_properties() {
        let (bridge, resolver) = recording();
        let node = resolver
            .resolve("toUpper", vec![lit("ab")], props(vec![("p", failing())]))
            .unwrap();
        assert_eq!(eval(node.as_ref()).unwrap(), Value::from("AB"));
        assert!(bridge.lookups().is_empty());
    }

    #[test]
    fn test_factory_argument_errors_surface_at_resolve() {
        let (_, resolver) = recording();
        let err = resolver.resolve("IF", vec![lit(true)], Properties::new()).err().unwrap();
        assert!(err.is(codes::ARG_COUNT));
    }

    #[test]
    fn test_zero_args_is_null_without_dispatch() {
        let (bridge, resolver) = recording();
        let node = resolver
            .resolve("UPPERCASE", vec![], props(vec![("p", failing())]))
            .unwrap();
        assert!(eval(node.as_ref()).unwrap().is_null());
        assert!(bridge.lookups().is_empty());
        assert!(bridge.processed().is_empty());
    }

    #[test]
    fn test_single_argument_is_not_wrapped() {
        let (bridge, resolver) = recording();
        let node = resolver.resolve("CONCAT", vec![lit("a")], Properties::new()).unwrap();
        assert_eq!(eval(node.as_ref()).unwrap(), Value::from("a"));
        assert_eq!(bridge.lookups(), vec![("CONCAT".to_string(), ValueCategory::Text)]);
        assert_eq!(bridge.processed()[0].0, Value::from("a"));
    }

    #[test]
    fn test_multiple_arguments_keep_order() {
        let (bridge, resolver) = recording();
        let node = resolver
            .resolve("CONCAT", vec![lit("a"), lit("b")], props(vec![("sep", lit("-"))]))
            .unwrap();
        assert_eq!(eval(node.as_ref()).unwrap(), Value::from("a-b"));

        let (value, received) = bridge.processed().remove(0);
        assert_eq!(value, Value::List(vec![Value::from("a"), Value::from("b")]));
        assert_eq!(received.get("sep"), Some(&Value::from("-")));
        assert_eq!(received.len(), 1);
    }

    #[test]
    fn test_arguments_evaluate_left_to_right() {
        let (bridge, resolver) = recording();
        let log: Log = Arc::default();
        let args = vec![
            traced(&log, "first", Ok(Value::from("x"))),
            traced(&log, "second", Err(MapError::new(codes::DOMAIN_ERROR, "second failed"))),
            traced(&log, "third", Ok(Value::from("z"))),
        ];
        let node = resolver.resolve("CONCAT", args, Properties::new()).unwrap();

        let err = eval(node.as_ref()).unwrap_err();
        assert!(err.is(codes::DOMAIN_ERROR));
        assert_eq!(err.message, "second failed");
        assert_eq!(*log.lock().unwrap(), vec!["first".to_string(), "second".to_string()]);
        assert!(bridge.lookups().is_empty());
    }

    #[test]
    fn test_property_errors_propagate() {
        let (bridge, resolver) = recording();
        let node = resolver
            .resolve("CONCAT", vec![lit("a")], props(vec![("sep", failing())]))
            .unwrap();
        assert!(eval(node.as_ref()).unwrap_err().is(codes::DOMAIN_ERROR));
        assert!(bridge.lookups().is_empty());
    }

    #[test]
    fn test_unknown_name_not_found() {
        let (_, resolver) = recording();
        let node = resolver.resolve("Frobnicate", vec![lit(1i64)], Properties::new()).unwrap();
        let err = eval(node.as_ref()).unwrap_err();
        assert!(err.is(codes::FUNCTION_NOT_FOUND));
        assert_eq!(err.message, "The expression function or transformation 'Frobnicate' was not found");
        assert_eq!(err.subject.as_deref(), Some("Frobnicate"));
    }

    #[test]
    fn test_argument_errors_win_over_not_found() {
        let (_, resolver) = recording();
        let node = resolver
            .resolve("Frobnicate", vec![FieldRef::boxed("missing")], Properties::new())
            .unwrap();
        assert!(eval(node.as_ref()).unwrap_err().is(codes::UNDEFINED_FIELD));
    }

    #[test]
    fn test_resolve_and_evaluate_are_repeatable() {
        let (bridge, resolver) = recording();
        let ctx = EvalContext::new().with_var("first", "a").with_var("last", "b");
        let build = || {
            resolver.resolve(
                "CONCAT",
                vec![FieldRef::boxed("first"), FieldRef::boxed("last")],
                props(vec![("sep", lit(" "))]),
            ).unwrap()
        };

        let node = build();
        assert_eq!(node.evaluate(&ctx).unwrap(), Value::from("a b"));
        assert_eq!(node.evaluate(&ctx).unwrap(), Value::from("a b"));
        assert_eq!(build().evaluate(&ctx).unwrap(), Value::from("a b"));
        assert_eq!(bridge.processed().len(), 3);
    }

    #[test]
    fn test_not_found_suggestions() {
        let resolver = DefaultFunctionResolver::new(registry(), Arc::new(FieldActionService::standard()));
        let node = resolver.resolve("Uppercas", vec![lit("a")], Properties::new()).unwrap();
        let suggestion = eval(node.as_ref()).unwrap_err().suggestion.unwrap();
        assert!(suggestion.contains("Uppercase"), "{}", suggestion);

        let quiet = DefaultFunctionResolver::new(registry(), Arc::new(FieldActionService::standard()))
            .with_config(ResolverConfig::new().with_suggestions(false));
        let node = quiet.resolve("Uppercas", vec![lit("a")], Properties::new()).unwrap();
        assert!(eval(node.as_ref()).unwrap_err().suggestion.is_none());
    }

    #[test]
    fn test_standard_actions_end_to_end() {
        let resolver = DefaultFunctionResolver::new(registry(), Arc::new(FieldActionService::standard()));
        let ctx = EvalContext::new()
            .with_var("name", "ada")
            .with_var("qty", 3i64)
            .with_var("price", "2.5");

        let upper = resolver.resolve("uppercase", vec![FieldRef::boxed("name")], Properties::new()).unwrap();
        assert_eq!(upper.evaluate(&ctx).unwrap(), Value::from("ADA"));

        let total = resolver
            .resolve("Multiply", vec![FieldRef::boxed("qty"), FieldRef::boxed("price")], Properties::new())
            .unwrap();
        assert_eq!(total.evaluate(&ctx).unwrap().to_string(), "7.5");

        let joined = resolver
            .resolve("Concatenate", vec![lit("a"), lit("b")], props(vec![("delimiter", lit("-"))]))
            .unwrap();
        let shout = resolver.resolve("TOUPPER", vec![joined], Properties::new()).unwrap();
        assert_eq!(shout.evaluate(&ctx).unwrap(), Value::from("A-B"));
    }

    #[test]
    fn test_uppercase_without_arguments_is_null() {
        let resolver = DefaultFunctionResolver::new(registry(), Arc::new(FieldActionService::standard()));
        let node = resolver.resolve("UPPERCASE", vec![], Properties::new()).unwrap();
        assert!(eval(node.as_ref()).unwrap().is_null());
    }

    #[test]
    fn test_config_reports_effective_policy() {
        let effective = registry().policy();
        let requested = match effective {
            DuplicatePolicy::LastWins => DuplicatePolicy::Reject,
            DuplicatePolicy::Reject => DuplicatePolicy::LastWins,
        };
        let resolver = DefaultFunctionResolver::from_config(
            ResolverConfig::new().with_duplicate_policy(requested),
        ).unwrap();
        assert_eq!(resolver.config().duplicate_policy, effective);
        assert_eq!(resolver.registry().policy(), effective);
    }

    #[test]
    fn test_global_resolver() {
        let resolver = DefaultFunctionResolver::global().unwrap();
        assert!(std::ptr::eq(resolver, DefaultFunctionResolver::global().unwrap()));
        assert!(resolver.registry().contains("TOLOWER"));
    }
}
