//! Test executor: one (function, parameter) with its own retry budget.
//!
//! Per pair and suite iteration:
//!
//! ```text
//! pending → (running → interim fail/error → running)* → success | fail | error | ignore
//! ```
//!
//! Interim attempts are recorded without a listener event. Only the terminal outcome is reported.

use std::time::Instant;

use retrial_core::{DecoratorType, OutcomeCategory};

use super::SuiteRun;
use super::hooks::run_hooks;
use crate::errors::{EngineResult, TestError};
use crate::listener::TestRef;
use crate::suite::{DecoratedFunction, Invocation, Parameter};

/// Execute one test case for one parameter. Returns the terminal category.
///
/// With `before_class_error` set the body never runs: the pair is recorded `ignore` with that error.
#[tracing::instrument(
    skip_all,
    fields(class = run.class.name(), function = function.name(), parameter = %parameter, suite_attempt = suite_attempt)
)]
pub fn execute(
    run: &mut SuiteRun<'_>,
    function: &DecoratedFunction,
    parameter: &Parameter,
    suite_attempt: u32,
    before_class_error: Option<&TestError>,
) -> EngineResult<OutcomeCategory> {
    let class = run.class;
    let test = TestRef {
        class: class.name(),
        function: function.name(),
        parameter,
    };

    if let Some(error) = before_class_error {
        run.record(function, parameter, Some(error), Instant::now(), OutcomeCategory::Ignore, suite_attempt);
        run.notify("on_ignore", |l| l.on_ignore(&test, error))?;
        return Ok(OutcomeCategory::Ignore);
    }

    let attempts = function.options().retry.max(1);
    let mut attempt = 1;
    loop {
        let started = Instant::now();
        match run_attempt(run, function, parameter, attempt, suite_attempt) {
            Ok(()) => {
                run.record(function, parameter, None, started, OutcomeCategory::Success, suite_attempt);
                run.notify("on_success", |l| l.on_success(&test))?;
                return Ok(OutcomeCategory::Success);
            }
            Err(error) if error.is_fatal() => {
                tracing::warn!(%error, "fatal error raised from test code");
                return Err(run.aborted(function.name(), error));
            }
            Err(error) => {
                let category = error.category();
                run.record(function, parameter, Some(&error), started, category, suite_attempt);

                if attempt < attempts {
                    tracing::debug!(attempt, attempts, %error, "attempt failed; retrying");
                    attempt += 1;
                    continue;
                }

                if error.is_assertion() {
                    run.notify("on_failure", |l| l.on_failure(&test, &error))?;
                } else {
                    run.notify("on_error", |l| l.on_error(&test, &error))?;
                }
                return Ok(category);
            }
        }
    }
}

/// One attempt: before_test hooks, the body, after_test hooks. The first error wins.
fn run_attempt(
    run: &mut SuiteRun<'_>,
    function: &DecoratedFunction,
    parameter: &Parameter,
    attempt: u32,
    suite_attempt: u32,
) -> Result<(), TestError> {
    let class = run.class;

    run_hooks(class, DecoratorType::BeforeTest, attempt, suite_attempt, run.ledger).map_err(|f| f.error)?;

    let invocation = Invocation::new(class.name(), function.name(), DecoratorType::TestCase)
        .with_attempts(attempt, suite_attempt)
        .with_parameter(function.accepts_parameter().then_some(parameter));
    function.call(&invocation)?;

    run_hooks(class, DecoratorType::AfterTest, attempt, suite_attempt, run.ledger).map_err(|f| f.error)
}
