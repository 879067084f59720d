//! Outcome-category vocabulary registry.
//!
//! Every execution of a (test, parameter) pair lands in exactly one category.

use std::fmt;

use crate::vocab::registry::{self, VocabInfo};

/// Stable identifier for an outcome category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeCategory {
    Success,
    Fail,
    Error,
    Ignore,
    Skip,
}

/// Categories that make a (test, parameter) pair eligible for suite-level retry.
pub const UNSUCCESSFUL: &[OutcomeCategory] = &[
    OutcomeCategory::Fail,
    OutcomeCategory::Error,
    OutcomeCategory::Ignore,
    OutcomeCategory::Skip,
];

impl OutcomeCategory {
    pub const ALL: [OutcomeCategory; 5] = [
        OutcomeCategory::Success,
        OutcomeCategory::Fail,
        OutcomeCategory::Error,
        OutcomeCategory::Ignore,
        OutcomeCategory::Skip,
    ];

    pub fn is_unsuccessful(self) -> bool {
        UNSUCCESSFUL.contains(&self)
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Metadata entry for an outcome category.
pub type OutcomeInfo = VocabInfo<OutcomeCategory>;

/// Registry of outcome categories.
pub const OUTCOMES: &[OutcomeInfo] = &[
    OutcomeInfo {
        id: OutcomeCategory::Success,
        canonical: "success",
        aliases: &["passed", "pass"],
        description: "The test body returned normally.",
    },
    OutcomeInfo {
        id: OutcomeCategory::Fail,
        canonical: "fail",
        aliases: &["failed", "failure"],
        description: "The test body raised an assertion-style failure.",
    },
    OutcomeInfo {
        id: OutcomeCategory::Error,
        canonical: "error",
        aliases: &["errored"],
        description: "The test body (or one of its per-test hooks) raised any other error.",
    },
    OutcomeInfo {
        id: OutcomeCategory::Ignore,
        canonical: "ignore",
        aliases: &["ignored"],
        description: "The test could not run: a before-class hook failed or its parameters were malformed.",
    },
    OutcomeInfo {
        id: OutcomeCategory::Skip,
        canonical: "skip",
        aliases: &["skipped"],
        description: "The test was excluded by its skip condition or the tag configuration.",
    },
];

/// Resolve an outcome spelling to its stable id.
pub fn from_str(name: &str) -> Option<OutcomeCategory> {
    registry::lookup(OUTCOMES, name)
}

/// Return the canonical spelling for an outcome category.
pub fn as_str(id: OutcomeCategory) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for an outcome category.
pub fn info_for(id: OutcomeCategory) -> &'static OutcomeInfo {
    registry::entry(OUTCOMES, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_the_only_successful_category() {
        for category in OutcomeCategory::ALL {
            assert_eq!(category.is_unsuccessful(), category != OutcomeCategory::Success);
        }
    }
}
