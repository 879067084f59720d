//! Retrial vocabulary registries.
//!
//! Each registry is a `const` table of [`registry::VocabInfo`] entries plus `from_str` / `as_str` / `info_for`
//! lookups. Spellings match what suite definitions, tag configuration files and summaries use.
//!
//! ## Examples
//! ```rust
//! use retrial_core::vocab::outcomes::{self, OutcomeCategory};
//!
//! assert_eq!(outcomes::from_str("fail"), Some(OutcomeCategory::Fail));
//! assert_eq!(outcomes::as_str(OutcomeCategory::Skip), "skip");
//! ```

pub mod decorators;
pub mod outcomes;
pub mod registry;
pub mod tag_rules;
