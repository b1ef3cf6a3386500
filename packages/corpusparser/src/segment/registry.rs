//! Registry of named sentence break policies.

use std::collections::HashMap;

use super::strategy::BreakPolicy;
use crate::error::{CorpusError, Result};

/// Registry mapping tokenisation model names to break policies.
pub struct PolicyRegistry {
    policies: HashMap<String, Box<dyn BreakPolicy>>,
}

impl PolicyRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// Register a policy under its own name.
    pub fn register(&mut self, policy: impl BreakPolicy + 'static) {
        self.policies
            .insert(policy.name().to_string(), Box::new(policy));
    }

    /// Get the policy for a model name.
    ///
    /// # Errors
    /// Returns `UnknownTokenisationModel` listing the registered names.
    pub fn get(&self, name: &str) -> Result<&dyn BreakPolicy> {
        self.policies
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                CorpusError::UnknownTokenisationModel(name.to_string(), self.names().join(", "))
            })
    }

    /// Check if a model name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Registered model names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::PeriodPolicy;

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = PolicyRegistry::new();
        registry.register(PeriodPolicy);

        assert!(registry.contains("period"));
        assert_eq!(registry.get("period").unwrap().name(), "period");
    }

    #[test]
    fn test_registry_unknown_model() {
        let mut registry = PolicyRegistry::new();
        registry.register(PeriodPolicy);

        let err = registry.get("comma").err().unwrap();
        assert!(matches!(
            err,
            CorpusError::UnknownTokenisationModel(ref name, ref known)
                if name == "comma" && known == "period"
        ));
    }
}
