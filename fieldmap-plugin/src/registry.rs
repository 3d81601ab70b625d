//! Function Factory Registry
//!
//! Factories register themselves at link time into [`FUNCTION_FACTORIES`]:
//!
//! ```ignore
//! use fieldmap_plugin::{FunctionFactory, FUNCTION_FACTORIES};
//! use linkme::distributed_slice;
//!
//! #[distributed_slice(FUNCTION_FACTORIES)]
//! static IF_FACTORY: &'static dyn FunctionFactory = &IfFactory;
//! ```
//!
//! The process-wide registry is built from that slice exactly once, keyed by
//! upper-cased name, and is read-only afterwards.

use crate::FunctionFactory;
use fieldmap_core::{MapError, Value};
use linkme::distributed_slice;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use thiserror::Error;

/// Every function factory linked into the binary
#[distributed_slice]
pub static FUNCTION_FACTORIES: [&'static dyn FunctionFactory];

/// What to do when two factories share a name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later registrations replace earlier ones
    #[default]
    LastWins,
    /// Duplicate names fail registry construction
    Reject,
}

#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("invalid function name '{0}'")]
    InvalidName(String),

    #[error("function '{0}' is registered more than once")]
    Duplicate(String),
}

impl From<RegistryError> for MapError {
    fn from(err: RegistryError) -> Self {
        let subject = match &err {
            RegistryError::InvalidName(n) | RegistryError::Duplicate(n) => n.clone(),
        };
        MapError::registry(err.to_string()).with_subject(subject)
    }
}

static GLOBAL: OnceLock<Result<FunctionRegistry, MapError>> = OnceLock::new();

/// Upper-cased name to factory table
#[derive(Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, &'static dyn FunctionFactory>,
    policy: DuplicatePolicy,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit factory collection
    pub fn from_factories<I>(factories: I, policy: DuplicatePolicy) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'static dyn FunctionFactory>,
    {
        let mut functions = HashMap::new();
        for factory in factories {
            let name = factory.meta().name;
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidName(name.to_string()));
            }
            let key = name.to_uppercase();
            if functions.insert(key.clone(), factory).is_some() {
                match policy {
                    DuplicatePolicy::LastWins => {
                        tracing::warn!(function = %key, "duplicate function factory, keeping the last one");
                    }
                    DuplicatePolicy::Reject => return Err(RegistryError::Duplicate(key)),
                }
            }
        }
        Ok(Self { functions, policy })
    }

    /// Build from every factory in [`FUNCTION_FACTORIES`]
    pub fn discover(policy: DuplicatePolicy) -> Result<Self, RegistryError> {
        let registry = Self::from_factories(FUNCTION_FACTORIES.iter().copied(), policy)?;
        tracing::debug!(count = registry.len(), "discovered function factories");
        Ok(registry)
    }

    /// Process-wide registry with the default duplicate policy
    pub fn global() -> Result<&'static FunctionRegistry, MapError> {
        Self::global_with(DuplicatePolicy::default())
    }

    /// Process-wide registry; `policy` only applies to the call that builds it.
    /// A construction failure is cached and returned to every later caller.
    pub fn global_with(policy: DuplicatePolicy) -> Result<&'static FunctionRegistry, MapError> {
        GLOBAL
            .get_or_init(|| Self::discover(policy).map_err(MapError::from))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Duplicate policy the registry was built with
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn with_factory(mut self, factory: &'static dyn FunctionFactory) -> Self {
        self.functions.insert(factory.meta().name.to_uppercase(), factory);
        self
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<&'static dyn FunctionFactory> {
        self.functions.get(&name.to_uppercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered names similar to `name`, best first
    pub fn find_similar(&self, name: &str) -> Vec<String> {
        similar_names(name, self.functions.keys().map(String::as_str))
    }

    pub fn list_functions(&self) -> Value {
        let funcs: Vec<Value> = self.names().iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| {
                let meta = f.meta();
                let mut obj = HashMap::new();
                obj.insert("name".to_string(), Value::Text(meta.name.to_string()));
                obj.insert("description".to_string(), Value::Text(meta.description.to_string()));
                obj.insert("usage".to_string(), Value::Text(meta.usage.to_string()));
                obj.insert("category".to_string(), Value::Text(meta.category.to_string()));
                Value::Object(obj)
            })
            .collect();
        Value::List(funcs)
    }
}

/// Rank `candidates` by similarity to `query`, best first
pub fn similar_names<'a, I>(query: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let query_upper = query.to_uppercase();
    let mut matches: Vec<(String, usize)> = candidates.into_iter()
        .filter_map(|candidate| {
            let score = similarity_score(&query_upper, &candidate.to_uppercase());
            (score > 0).then(|| (candidate.to_string(), score))
        })
        .collect();

    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    matches.dedup_by(|a, b| a.0.eq_ignore_ascii_case(&b.0));
    matches.into_iter().map(|(name, _)| name).collect()
}

fn similarity_score(query: &str, candidate: &str) -> usize {
    if query.is_empty() || query == candidate {
        return 0;
    }

    let mut score = 0;
    if candidate.starts_with(query) || query.starts_with(candidate) {
        score += 100;
    } else if candidate.contains(query) {
        score += 50;
    } else if query.contains(candidate) {
        score += 30;
    }

    // Shared characters only count once something structural matched or
    // most of the query overlaps
    let query_chars: HashSet<char> = query.chars().collect();
    let candidate_chars: HashSet<char> = candidate.chars().collect();
    let common = query_chars.intersection(&candidate_chars).count();
    if score == 0 && common * 4 < query_chars.len() * 3 {
        return 0;
    }
    score += common * 2;

    let len_diff = query.len().abs_diff(candidate.len());
    if len_diff < 5 {
        score += 5 - len_diff;
    }

    score
}
