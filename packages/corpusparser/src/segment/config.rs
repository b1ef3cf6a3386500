//! Built-in tokenisation models.

use super::registry::PolicyRegistry;
use super::strategy::{PeriodAndCapitalPolicy, PeriodPolicy};

/// Create the registry of built-in tokenisation models.
///
/// - `period`: a sentence ends at a stand-alone "." token
/// - `period_and_capital`: a sentence ends at a word ending in "." that is
///   followed by a capitalised word
#[must_use]
pub fn create_default_policies() -> PolicyRegistry {
    let mut registry = PolicyRegistry::new();
    registry.register(PeriodPolicy);
    registry.register(PeriodAndCapitalPolicy);
    registry
}
