//! Run-time configuration for the retrial engine
//!
//! A tag configuration is a JSON object naming one of four rules, e.g.
//!
//! ```json
//! { "run_on_match_any": ["smoke", "fast"] }
//! ```
//!
//! Keys resolve through [`retrial_core::vocab::tag_rules`], so the short aliases (`run_any`, ...) are accepted.
//! When several rules are present the highest-precedence one wins. A rule with an empty tag list counts as unset,
//! and an object with no recognised, non-empty rule is an error.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use retrial_core::TagRuleId;
use retrial_core::vocab::tag_rules;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{EngineError, EngineResult};

/// A tag list as written in configuration: one tag or many.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagList {
    One(String),
    Many(Vec<String>),
}

impl TagList {
    fn into_set(self) -> BTreeSet<String> {
        match self {
            TagList::One(tag) => BTreeSet::from([tag]),
            TagList::Many(tags) => tags.into_iter().collect(),
        }
    }
}

/// Resolved tag configuration: one rule and its tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    rule: TagRuleId,
    tags: BTreeSet<String>,
}

impl TagConfig {
    pub fn new<I, S>(rule: TagRuleId, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn skip_on_match_all<I: IntoIterator<Item = S>, S: Into<String>>(tags: I) -> Self {
        Self::new(TagRuleId::SkipOnMatchAll, tags)
    }

    pub fn skip_on_match_any<I: IntoIterator<Item = S>, S: Into<String>>(tags: I) -> Self {
        Self::new(TagRuleId::SkipOnMatchAny, tags)
    }

    pub fn run_on_match_all<I: IntoIterator<Item = S>, S: Into<String>>(tags: I) -> Self {
        Self::new(TagRuleId::RunOnMatchAll, tags)
    }

    pub fn run_on_match_any<I: IntoIterator<Item = S>, S: Into<String>>(tags: I) -> Self {
        Self::new(TagRuleId::RunOnMatchAny, tags)
    }

    pub fn rule(&self) -> TagRuleId {
        self.rule
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Resolve a JSON object into a tag configuration.
    pub fn from_json(value: &Value) -> EngineResult<Self> {
        let Value::Object(map) = value else {
            return Err(EngineError::TagConfig {
                reason: format!("expected a JSON object, found `{value}`"),
            });
        };

        let mut candidates: Vec<(TagRuleId, &Value)> = map
            .iter()
            .filter_map(|(key, tags)| tag_rules::from_str(key).map(|rule| (rule, tags)))
            .collect();
        candidates.sort_by_key(|(rule, _)| tag_rules::rank(*rule));

        for (rule, tags) in candidates {
            let tags = TagList::deserialize(tags)
                .map_err(|e| EngineError::TagConfig {
                    reason: format!("`{}` must be a tag or a list of tags: {e}", tag_rules::as_str(rule)),
                })?
                .into_set();
            // An empty list leaves the rule unset.
            if tags.is_empty() {
                tracing::debug!(rule = tag_rules::as_str(rule), "tag rule has no tags; ignoring it");
                continue;
            }
            return Ok(Self { rule, tags });
        }

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        Err(EngineError::TagConfig {
            reason: format!("no recognised rule with at least one tag among keys {keys:?}"),
        })
    }

    /// Read and resolve a JSON tag configuration file.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }
}

impl FromStr for TagConfig {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }
}

/// Configuration for one run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub tag_config: Option<TagConfig>,
    /// Suppress the printed summary line
    pub quiet: bool,
    /// Make the default console listener report skips too
    pub verbose: bool,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag_config(mut self, tag_config: impl Into<Option<TagConfig>>) -> Self {
        self.tag_config = tag_config.into();
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn tag_config(&self) -> Option<&TagConfig> {
        self.tag_config.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_rule() {
        let config: TagConfig = r#"{"run_on_match_any": ["smoke", "fast"]}"#.parse().unwrap();
        assert_eq!(config, TagConfig::run_on_match_any(["fast", "smoke"]));
    }

    #[test]
    fn test_single_string_is_a_one_tag_list() {
        let config = TagConfig::from_json(&json!({"skip_any": "slow"})).unwrap();
        assert_eq!(config.rule(), TagRuleId::SkipOnMatchAny);
        assert_eq!(config.tags().len(), 1);
    }

    #[test]
    fn test_precedence_picks_first_rule() {
        let config = TagConfig::from_json(&json!({
            "run_on_match_any": ["a"],
            "skip_on_match_all": ["b"]
        }))
        .unwrap();
        assert_eq!(config.rule(), TagRuleId::SkipOnMatchAll);
        assert!(config.tags().contains("b"));
    }

    #[test]
    fn test_empty_rule_falls_through_to_the_next() {
        let config = TagConfig::from_json(&json!({
            "skip_on_match_all": [],
            "run_on_match_any": ["x"]
        }))
        .unwrap();
        assert_eq!(config, TagConfig::run_on_match_any(["x"]));
    }

    #[test]
    fn test_only_empty_rules_is_an_error() {
        let err = TagConfig::from_json(&json!({"skip_any": [], "run_all": []})).unwrap_err();
        assert!(matches!(err, EngineError::TagConfig { .. }));
    }

    #[test]
    fn test_unknown_keys_only_is_an_error() {
        let err = TagConfig::from_json(&json!({"only": ["a"]})).unwrap_err();
        assert!(matches!(err, EngineError::TagConfig { .. }));
    }

    #[test]
    fn test_non_object_is_an_error() {
        let err = TagConfig::from_json(&json!(["a"])).unwrap_err();
        assert!(matches!(err, EngineError::TagConfig { .. }));
    }

    #[test]
    fn test_bad_tag_list_is_an_error() {
        let err = TagConfig::from_json(&json!({"run_all": 3})).unwrap_err();
        assert!(err.to_string().contains("run_on_match_all"));
    }

    #[test]
    fn test_verbose_defaults_off() {
        assert!(!RunConfig::new().verbose);
        assert!(RunConfig::new().with_verbose(true).verbose);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = "{not json".parse::<TagConfig>().unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = TagConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, EngineError::ConfigRead { .. }));
    }
}
