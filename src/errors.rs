//! Error types for the retrial engine
//!
//! Three layers, from the inside out:
//! - [`TestError`]: what a hook or test body reports. It is data: the ledger stores it as the captured failure.
//! - [`ListenerError`]: what a listener hook reports. Always fatal.
//! - [`EngineError`]: framework failures that escape the engine and abort the run.

use std::any::Any;
use std::path::PathBuf;

use miette::Diagnostic;
use retrial_core::OutcomeCategory;
use thiserror::Error;

/// Failure reported by a hook or test body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TestError {
    /// Assertion-style failure. Classified as `fail`.
    #[error("assertion failed: {message}")]
    Assertion { message: String },

    /// Any other runtime failure. Classified as `error`.
    #[error("{message}")]
    Error { message: String },

    /// Framework-internal failure raised from user code. Never retried, never recorded.
    #[error("fatal: {message}")]
    Fatal { message: String },
}

impl TestError {
    pub fn assertion(message: impl Into<String>) -> Self {
        TestError::Assertion {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        TestError::Error {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        TestError::Fatal {
            message: message.into(),
        }
    }

    /// The bare message, without the variant prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            TestError::Assertion { message } | TestError::Error { message } | TestError::Fatal { message } => message,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, TestError::Assertion { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, TestError::Fatal { .. })
    }

    /// Category a non-fatal failure is recorded under: `fail` for assertions, `error` otherwise.
    pub fn category(&self) -> OutcomeCategory {
        if self.is_assertion() {
            OutcomeCategory::Fail
        } else {
            OutcomeCategory::Error
        }
    }

    /// Convert a caught panic payload. `assert!` and friends panic, so panics count as assertions.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panicked with a non-string payload".to_string()
        };
        TestError::Assertion { message }
    }
}

impl From<std::io::Error> for TestError {
    fn from(err: std::io::Error) -> Self {
        TestError::error(err.to_string())
    }
}

impl From<String> for TestError {
    fn from(message: String) -> Self {
        TestError::Error { message }
    }
}

impl From<&str> for TestError {
    fn from(message: &str) -> Self {
        TestError::error(message)
    }
}

/// Failure reported by a listener hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ListenerError {
    pub message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Framework failure. Apart from [`EngineError::SkipCondition`], these propagate out of the engine uncaught.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("listener hook `{hook}` failed while running suite `{class}`")]
    #[diagnostic(
        code(retrial::listener),
        help("listener hooks must not fail; a failing hook aborts the remaining suites")
    )]
    Listener {
        class: String,
        hook: &'static str,
        #[source]
        source: ListenerError,
    },

    #[error("invalid tag configuration: {reason}")]
    #[diagnostic(
        code(retrial::config::tags),
        help("set exactly one of `skip_on_match_all`, `skip_on_match_any`, `run_on_match_all`, `run_on_match_any`")
    )]
    TagConfig { reason: String },

    /// Reported by the skip filter. The orchestrator records the affected pair as `ignore` and moves on.
    #[error("skip condition of `{class}::{function}` could not be resolved")]
    #[diagnostic(code(retrial::skip_condition))]
    SkipCondition {
        class: String,
        function: String,
        #[source]
        source: TestError,
    },

    #[error("suite `{class}` registers more than one test case named `{function}`")]
    #[diagnostic(
        code(retrial::duplicate_test_case),
        help("outcomes are recorded per (class, test case, parameter); give each test case a unique name")
    )]
    DuplicateTestCase { class: String, function: String },

    #[error("`{class}::{function}` aborted the run")]
    #[diagnostic(code(retrial::aborted))]
    Aborted {
        class: String,
        function: String,
        #[source]
        source: TestError,
    },

    #[error("failed to read tag configuration `{}`", .path.display())]
    #[diagnostic(code(retrial::config::read))]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tag configuration is not valid JSON")]
    #[diagnostic(code(retrial::config::parse))]
    ConfigParse {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_follows_variant() {
        assert_eq!(TestError::assertion("x").category(), OutcomeCategory::Fail);
        assert_eq!(TestError::error("x").category(), OutcomeCategory::Error);
    }

    #[test]
    fn test_panic_payloads_become_assertions() {
        let err = TestError::from_panic(Box::new("left != right"));
        assert_eq!(err, TestError::assertion("left != right"));

        let err = TestError::from_panic(Box::new(String::from("owned")));
        assert_eq!(err.message(), "owned");

        let err = TestError::from_panic(Box::new(42_u8));
        assert!(err.is_assertion());
    }

    #[test]
    fn test_display_keeps_message() {
        assert_eq!(TestError::assertion("1 != 2").to_string(), "assertion failed: 1 != 2");
        assert_eq!(TestError::error("boom").to_string(), "boom");
    }
}
