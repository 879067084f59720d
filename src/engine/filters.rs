//! Eligibility filters: tag configuration and skip conditions.

use std::collections::BTreeSet;

use retrial_core::TagRuleId;

use crate::config::TagConfig;
use crate::errors::{EngineError, EngineResult};
use crate::suite::{ClassMeta, DecoratedFunction, Skip};

/// Decide whether a test with `test_tags` may run under `tag_config`.
///
/// - No configuration: always runnable.
/// - A configuration but no tags on the test: never runnable.
/// - Otherwise the configured rule decides.
pub fn runnable(test_tags: &BTreeSet<String>, tag_config: Option<&TagConfig>) -> bool {
    let Some(config) = tag_config else {
        return true;
    };
    if test_tags.is_empty() {
        return false;
    }

    let listed = config.tags();
    match config.rule() {
        TagRuleId::SkipOnMatchAll => !listed.is_subset(test_tags),
        TagRuleId::SkipOnMatchAny => listed.is_disjoint(test_tags),
        TagRuleId::RunOnMatchAll => listed.is_subset(test_tags),
        TagRuleId::RunOnMatchAny => !listed.is_disjoint(test_tags),
    }
}

/// Resolve the skip condition of a test case against the class metadata.
///
/// A predicate that errors is reported as [`EngineError::SkipCondition`]; the orchestrator confines it to the
/// affected pair.
pub fn should_skip(function: &DecoratedFunction, meta: &ClassMeta) -> EngineResult<bool> {
    match &function.options().skip {
        Skip::Literal(skip) => Ok(*skip),
        Skip::Predicate(predicate) => predicate(meta).map_err(|source| EngineError::SkipCondition {
            class: meta.name.clone(),
            function: function.name().to_string(),
            source,
        }),
    }
}
