#![forbid(unsafe_code)]
//! Retrial: a test-suite execution engine with per-test and per-suite retries
//!
//! Suites are registered as [`ClassObject`]s: a named class whose functions play one of five lifecycle roles
//! (before/after class, before/after test, test case). The engine runs each suite, retries failing tests in place,
//! re-runs the suite for whatever is still unsuccessful, and classifies every (class, function, parameter) into
//! exactly one [`OutcomeCategory`] in a [`Ledger`].
//!
//! ```
//! use retrial::{ClassObject, Ledger, RunConfig, Roster, Runner, SilentListener, TestError, TestOptions};
//!
//! let roster = Roster::new().with_class(
//!     ClassObject::new("Arithmetic")
//!         .with_listener(|_| SilentListener)
//!         .test_case_with_param("is_positive", TestOptions::new().with_parameters([1, 2]), |call| {
//!             match call.parameter().and_then(|p| p.as_i64()) {
//!                 Some(n) if n > 0 => Ok(()),
//!                 _ => Err(TestError::assertion("not positive")),
//!             }
//!         }),
//! );
//!
//! let mut ledger = Ledger::new();
//! let summary = Runner::new(&roster, RunConfig::new().with_quiet(true)).run_all(&mut ledger).unwrap();
//! assert_eq!(summary.line(), "2/2");
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **User code**: A panic inside a registered hook or test body is caught and recorded as an assertion failure; it
//!   never unwinds through the engine.
//!
//! - **True invariants**: If a panic represents an engine bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod listener;
pub mod runner;
pub mod suite;

pub use retrial_core::{DecoratorType, OutcomeCategory, TagRuleId};

pub use config::{RunConfig, TagConfig};
pub use engine::run_suite;
pub use errors::{EngineError, EngineResult, ListenerError, TestError};
pub use ledger::{CategoryCounts, Ledger, LedgerEntry, Stats, UnsuccessfulKey};
pub use listener::{ConsoleListener, Listener, ListenerResult, SilentListener, TestRef};
pub use runner::{RunSummary, Runner};
pub use suite::{ClassMeta, ClassObject, DecoratedFunction, Invocation, Parameter, Roster, Skip, TestOptions};
