//! Provide the canonical vocabulary shared by the retrial engine and the tooling around it.
//!
//! This crate is intentionally small and dependency-free. It holds the closed sets of names the engine reasons about:
//! - lifecycle roles a registered function can play ([`vocab::decorators`]),
//! - outcome categories an execution can be classified into ([`vocab::outcomes`]),
//! - the keys a tag configuration may use ([`vocab::tag_rules`]).
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no engine types.
//! - Callers work with stable ids and look spellings up through the registries instead of comparing strings.

pub mod vocab;

pub use vocab::decorators::DecoratorType;
pub use vocab::outcomes::{OutcomeCategory, UNSUCCESSFUL};
pub use vocab::tag_rules::TagRuleId;
