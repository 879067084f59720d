//! Suite execution engine.
//!
//! Control flow, outermost first:
//!
//! - [`orchestrator`]: drives one class through its suite-level retry iterations
//! - [`executor`]: runs one (function, parameter) with its own retry budget
//! - [`filters`]: tag- and predicate-based eligibility
//! - [`hooks`]: before/after class and test callbacks, timed into the ledger
//!
//! Execution is single-threaded and synchronous. The only state shared across components is the
//! [`Ledger`], which flows through [`SuiteRun`].

pub mod executor;
pub mod filters;
pub mod hooks;
pub mod orchestrator;

use std::time::Instant;

use retrial_core::OutcomeCategory;

use crate::config::RunConfig;
use crate::errors::{EngineError, EngineResult, TestError};
use crate::ledger::{Attempt, Ledger};
use crate::listener::{Listener, ListenerResult};
use crate::suite::{ClassObject, DecoratedFunction, Parameter};

pub use orchestrator::run_suite;

/// State of one suite run: the class, its freshly built listener, the ledger and the run configuration.
pub struct SuiteRun<'r> {
    pub class: &'r ClassObject,
    pub config: &'r RunConfig,
    pub ledger: &'r mut Ledger,
    listener: Box<dyn Listener>,
}

impl<'r> SuiteRun<'r> {
    pub fn new(class: &'r ClassObject, ledger: &'r mut Ledger, config: &'r RunConfig) -> Self {
        Self {
            listener: class.build_listener(config),
            class,
            config,
            ledger,
        }
    }

    /// Invoke a listener hook; any failure becomes a fatal [`EngineError::Listener`].
    pub(crate) fn notify(
        &mut self,
        hook: &'static str,
        call: impl FnOnce(&mut dyn Listener) -> ListenerResult,
    ) -> EngineResult<()> {
        call(self.listener.as_mut()).map_err(|source| EngineError::Listener {
            class: self.class.name().to_string(),
            hook,
            source,
        })
    }

    /// Record one attempt of `function` into the ledger.
    pub(crate) fn record(
        &mut self,
        function: &DecoratedFunction,
        parameter: &Parameter,
        error: Option<&TestError>,
        started: Instant,
        category: OutcomeCategory,
        suite_attempt: u32,
    ) {
        self.ledger.record(Attempt {
            class: self.class.name(),
            function: function.name(),
            parameter,
            error,
            started,
            category,
            suite_attempt,
        });
    }

    pub(crate) fn aborted(&self, function: &str, source: TestError) -> EngineError {
        EngineError::Aborted {
            class: self.class.name().to_string(),
            function: function.to_string(),
            source,
        }
    }
}
