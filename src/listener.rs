//! Listener interface for suite execution events.
//!
//! ## Listener Trait
//!
//! The engine separates reporting from execution: every outcome is pushed to a [`Listener`]. One listener is
//! constructed per suite run from the class metadata (see [`ListenerFactory`]). Implement the trait to customize
//! output (JSON, TAP, collecting into a buffer, etc.).
//!
//! A listener hook that returns `Err` is fatal: the engine stops and surfaces
//! [`EngineError::Listener`](crate::errors::EngineError::Listener).

use retrial_core::OutcomeCategory;

use crate::errors::{ListenerError, TestError};
use crate::suite::{ClassMeta, Parameter};

/// Result type for listener hooks.
pub type ListenerResult = Result<(), ListenerError>;

/// Builds the listener for one suite run.
pub type ListenerFactory = Box<dyn Fn(&ClassMeta) -> Box<dyn Listener>>;

/// The (class, function, parameter) a test-level event refers to.
#[derive(Debug, Clone, Copy)]
pub struct TestRef<'a> {
    pub class: &'a str,
    pub function: &'a str,
    pub parameter: &'a Parameter,
}

/// Receives execution events for one suite.
pub trait Listener {
    /// Called when a test passes
    fn on_success(&mut self, _test: &TestRef<'_>) -> ListenerResult {
        Ok(())
    }

    /// Called when a test exhausts its retries on an assertion failure
    fn on_failure(&mut self, _test: &TestRef<'_>, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    /// Called when a test exhausts its retries on any other error
    fn on_error(&mut self, _test: &TestRef<'_>, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    /// Called when a test could not run
    fn on_ignore(&mut self, _test: &TestRef<'_>, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    /// Called when a test is excluded by its skip condition or the tag configuration
    fn on_skip(&mut self, _test: &TestRef<'_>) -> ListenerResult {
        Ok(())
    }

    fn on_before_class_error(&mut self, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    fn on_before_class_failure(&mut self, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    fn on_after_class_error(&mut self, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    fn on_after_class_failure(&mut self, _error: &TestError) -> ListenerResult {
        Ok(())
    }

    /// Called instead of everything else when the whole class is skipped
    fn on_class_skip(&mut self) -> ListenerResult {
        Ok(())
    }
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentListener;

impl Listener for SilentListener {}

/// Default console listener (pytest-style)
#[derive(Debug, Clone)]
pub struct ConsoleListener {
    pub class: String,
    pub verbose: bool,
    pub color: bool,
}

impl ConsoleListener {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            verbose: false,
            color: true,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Render the status line for one test outcome.
    pub fn status_line(&self, test: &TestRef<'_>, category: OutcomeCategory, error: Option<&TestError>) -> String {
        let (label, code) = match category {
            OutcomeCategory::Success => ("PASSED", "32"),
            OutcomeCategory::Fail => ("FAILED", "31"),
            OutcomeCategory::Error => ("ERROR", "31"),
            OutcomeCategory::Ignore => ("IGNORED", "33"),
            OutcomeCategory::Skip => ("SKIPPED", "33"),
        };
        let status = if self.color {
            format!("\x1b[{code}m{label}\x1b[0m")
        } else {
            label.to_string()
        };

        let mut line = if test.parameter.is_null() {
            format!("{}::{} {}", test.class, test.function, status)
        } else {
            format!("{}::{}[{}] {}", test.class, test.function, test.parameter, status)
        };
        if let Some(error) = error {
            line.push_str(&format!("\n    {error}"));
        }
        line
    }

    /// Render a class-level event line.
    pub fn class_line(&self, event: &str, error: Option<&TestError>) -> String {
        match error {
            Some(error) => format!("{} {}: {}", self.class, event, error),
            None => format!("{} {}", self.class, event),
        }
    }

    fn print(&self, test: &TestRef<'_>, category: OutcomeCategory, error: Option<&TestError>) -> ListenerResult {
        println!("{}", self.status_line(test, category, error));
        Ok(())
    }
}

impl Listener for ConsoleListener {
    fn on_success(&mut self, test: &TestRef<'_>) -> ListenerResult {
        self.print(test, OutcomeCategory::Success, None)
    }

    fn on_failure(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.print(test, OutcomeCategory::Fail, Some(error))
    }

    fn on_error(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.print(test, OutcomeCategory::Error, Some(error))
    }

    fn on_ignore(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.print(test, OutcomeCategory::Ignore, Some(error))
    }

    fn on_skip(&mut self, test: &TestRef<'_>) -> ListenerResult {
        if self.verbose {
            self.print(test, OutcomeCategory::Skip, None)?;
        }
        Ok(())
    }

    fn on_before_class_error(&mut self, error: &TestError) -> ListenerResult {
        eprintln!("{}", self.class_line("before_class error", Some(error)));
        Ok(())
    }

    fn on_before_class_failure(&mut self, error: &TestError) -> ListenerResult {
        eprintln!("{}", self.class_line("before_class failure", Some(error)));
        Ok(())
    }

    fn on_after_class_error(&mut self, error: &TestError) -> ListenerResult {
        eprintln!("{}", self.class_line("after_class error", Some(error)));
        Ok(())
    }

    fn on_after_class_failure(&mut self, error: &TestError) -> ListenerResult {
        eprintln!("{}", self.class_line("after_class failure", Some(error)));
        Ok(())
    }

    fn on_class_skip(&mut self) -> ListenerResult {
        if self.verbose {
            println!("{}", self.class_line("SKIPPED", None));
        }
        Ok(())
    }
}
