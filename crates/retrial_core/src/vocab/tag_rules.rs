//! Tag-rule vocabulary registry.
//!
//! A tag configuration names exactly one rule. When several are present the one that comes first in
//! [`PRECEDENCE`] wins.

use crate::vocab::registry::{self, VocabInfo};

/// Stable identifier for a tag-configuration rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagRuleId {
    SkipOnMatchAll,
    SkipOnMatchAny,
    RunOnMatchAll,
    RunOnMatchAny,
}

/// Rule evaluation order.
pub const PRECEDENCE: [TagRuleId; 4] = [
    TagRuleId::SkipOnMatchAll,
    TagRuleId::SkipOnMatchAny,
    TagRuleId::RunOnMatchAll,
    TagRuleId::RunOnMatchAny,
];

/// Metadata entry for a tag rule.
pub type TagRuleInfo = VocabInfo<TagRuleId>;

/// Registry of tag rules.
pub const TAG_RULES: &[TagRuleInfo] = &[
    TagRuleInfo {
        id: TagRuleId::SkipOnMatchAll,
        canonical: "skip_on_match_all",
        aliases: &["skip_all"],
        description: "Skip a test only when it carries every listed tag.",
    },
    TagRuleInfo {
        id: TagRuleId::SkipOnMatchAny,
        canonical: "skip_on_match_any",
        aliases: &["skip_any"],
        description: "Skip a test when it carries any listed tag.",
    },
    TagRuleInfo {
        id: TagRuleId::RunOnMatchAll,
        canonical: "run_on_match_all",
        aliases: &["run_all"],
        description: "Run a test only when it carries every listed tag.",
    },
    TagRuleInfo {
        id: TagRuleId::RunOnMatchAny,
        canonical: "run_on_match_any",
        aliases: &["run_any"],
        description: "Run a test only when it carries at least one listed tag.",
    },
];

/// Resolve a tag-rule key to its stable id.
pub fn from_str(name: &str) -> Option<TagRuleId> {
    registry::lookup(TAG_RULES, name)
}

/// Return the canonical key for a tag rule.
pub fn as_str(id: TagRuleId) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a tag rule.
pub fn info_for(id: TagRuleId) -> &'static TagRuleInfo {
    registry::entry(TAG_RULES, id)
}

/// Position of a rule in [`PRECEDENCE`]; lower wins.
pub fn rank(id: TagRuleId) -> usize {
    PRECEDENCE.iter().position(|r| *r == id).unwrap_or(PRECEDENCE.len())
}
