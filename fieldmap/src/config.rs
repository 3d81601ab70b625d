//! Resolver configuration

use fieldmap_plugin::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::env;

/// Enables [`DuplicatePolicy::Reject`] when set to `1` or `true`
pub const STRICT_FUNCTIONS_VAR: &str = "FIELDMAP_STRICT_FUNCTIONS";
/// Disables similar-name suggestions when set to `0` or `false`
pub const SUGGESTIONS_VAR: &str = "FIELDMAP_SUGGESTIONS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Policy used when the process-wide registry is first built. A registry
    /// that already exists keeps its own policy.
    pub duplicate_policy: DuplicatePolicy,
    /// Attach similar function and action names to not-found errors
    pub suggest_similar: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::LastWins,
            suggest_similar: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `FIELDMAP_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(strict) = lookup(STRICT_FUNCTIONS_VAR).and_then(|v| parse_flag(&v)) {
            config.duplicate_policy = if strict { DuplicatePolicy::Reject } else { DuplicatePolicy::LastWins };
        }
        if let Some(suggest) = lookup(SUGGESTIONS_VAR).and_then(|v| parse_flag(&v)) {
            config.suggest_similar = suggest;
        }
        config
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggest_similar = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            tracing::warn!(value = other, "ignoring unrecognized boolean setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWins);
        assert!(config.suggest_similar);
        assert_eq!(ResolverConfig::from_lookup(lookup(&[])), config);
    }

    #[test]
    fn test_env_overrides() {
        let config = ResolverConfig::from_lookup(lookup(&[
            (STRICT_FUNCTIONS_VAR, "true"),
            (SUGGESTIONS_VAR, "0"),
        ]));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert!(!config.suggest_similar);
    }

    #[test]
    fn test_unrecognized_values_keep_defaults() {
        let config = ResolverConfig::from_lookup(lookup(&[(STRICT_FUNCTIONS_VAR, "maybe")]));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWins);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = ResolverConfig::new()
            .with_duplicate_policy(DuplicatePolicy::Reject)
            .with_suggestions(false);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"duplicate_policy":"reject","suggest_similar":false}"#);
        let back: ResolverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: ResolverConfig = serde_json::from_str(r#"{"suggest_similar":false}"#).unwrap();
        assert_eq!(partial.duplicate_policy, DuplicatePolicy::LastWins);
    }
}
