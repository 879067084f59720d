//! Suite orchestrator: drives one class through its suite-level retry iterations.
//!
//! Iteration 1 runs every test case for every declared parameter. Each later iteration re-runs only the pairs
//! the ledger still holds in an unsuccessful category, and stops early once there are none.

use std::collections::BTreeSet;
use std::time::Instant;

use retrial_core::{DecoratorType, OutcomeCategory};

use super::hooks::run_hooks;
use super::{SuiteRun, executor, filters};
use crate::config::RunConfig;
use crate::errors::{EngineError, EngineResult, TestError};
use crate::ledger::{Ledger, UnsuccessfulKey};
use crate::listener::TestRef;
use crate::suite::{ClassObject, DecoratedFunction, Parameter};

/// Run one suite to completion, recording every outcome into `ledger`.
///
/// A suite that registers two test cases under one name is rejected before anything runs.
#[tracing::instrument(skip_all, fields(class = class.name()))]
pub fn run_suite(class: &ClassObject, ledger: &mut Ledger, config: &RunConfig) -> EngineResult<()> {
    if let Some(function) = class.suite().duplicate_test_case() {
        return Err(EngineError::DuplicateTestCase {
            class: class.name().to_string(),
            function: function.to_string(),
        });
    }

    let mut run = SuiteRun::new(class, ledger, config);

    if class.is_skipped() {
        tracing::info!("class skipped");
        return run.notify("on_class_skip", |l| l.on_class_skip());
    }

    let iterations = class.retry().max(1);
    for suite_attempt in 1..=iterations {
        let retry_set = if suite_attempt > 1 {
            let pending = run.ledger.unsuccessful(class.name());
            if pending.is_empty() {
                tracing::debug!(suite_attempt, "nothing left to retry");
                break;
            }
            tracing::info!(suite_attempt, pending = pending.len(), "retrying unsuccessful tests");
            Some(pending)
        } else {
            None
        };

        let before_class_error = class_hooks(&mut run, DecoratorType::BeforeClass, suite_attempt)?;

        for function in class.suite().test_cases() {
            run_test_case(
                &mut run,
                function,
                suite_attempt,
                retry_set.as_ref(),
                before_class_error.as_ref(),
            )?;
        }

        class_hooks(&mut run, DecoratorType::AfterClass, suite_attempt)?;
    }
    Ok(())
}

/// Run before/after class hooks and dispatch a failure to the listener.
///
/// A non-fatal failure is returned so before-class errors can fan out to the tests as `ignore`.
fn class_hooks(
    run: &mut SuiteRun<'_>,
    decorator: DecoratorType,
    suite_attempt: u32,
) -> EngineResult<Option<TestError>> {
    let class = run.class;
    let Err(failure) = run_hooks(class, decorator, 1, suite_attempt, run.ledger) else {
        return Ok(None);
    };
    if failure.error.is_fatal() {
        return Err(run.aborted(&failure.hook, failure.error));
    }

    tracing::warn!(hook = %failure.hook, %decorator, error = %failure.error, "class hook failed");
    let error = failure.error;
    match (decorator, error.is_assertion()) {
        (DecoratorType::BeforeClass, true) => {
            run.notify("on_before_class_failure", |l| l.on_before_class_failure(&error))?
        }
        (DecoratorType::BeforeClass, false) => {
            run.notify("on_before_class_error", |l| l.on_before_class_error(&error))?
        }
        (_, true) => run.notify("on_after_class_failure", |l| l.on_after_class_failure(&error))?,
        (_, false) => run.notify("on_after_class_error", |l| l.on_after_class_error(&error))?,
    }
    Ok(Some(error))
}

fn run_test_case(
    run: &mut SuiteRun<'_>,
    function: &DecoratedFunction,
    suite_attempt: u32,
    retry_set: Option<&BTreeSet<UnsuccessfulKey>>,
    before_class_error: Option<&TestError>,
) -> EngineResult<()> {
    let class = run.class;
    let selected = |parameter: &Parameter| {
        retry_set.is_none_or(|set| set.contains(&UnsuccessfulKey::new(function.name(), parameter)))
    };

    let parameters = &function.options().parameters;
    if parameters.is_empty() {
        if selected(&Parameter::Null) {
            let error = TestError::error(format!(
                "`{}` declares no parameters; expected a non-empty list",
                function.name()
            ));
            ignore_pair(run, function, &Parameter::Null, &error, suite_attempt)?;
        }
        return Ok(());
    }

    for parameter in parameters.iter().filter(|&p| selected(p)) {
        let skipped = match filters::should_skip(function, class.meta()) {
            Ok(skipped) => skipped,
            Err(EngineError::SkipCondition { source, .. }) => {
                tracing::error!(function = function.name(), %parameter, error = %source, "skip condition failed");
                let error = TestError::error(format!("skip condition could not be resolved: {}", source.message()));
                ignore_pair(run, function, parameter, &error, suite_attempt)?;
                continue;
            }
            Err(other) => return Err(other),
        };
        let skip = skipped || !filters::runnable(&function.options().tags, run.config.tag_config());
        if skip {
            run.record(function, parameter, None, Instant::now(), OutcomeCategory::Skip, suite_attempt);
            let test = TestRef {
                class: class.name(),
                function: function.name(),
                parameter,
            };
            run.notify("on_skip", |l| l.on_skip(&test))?;
            continue;
        }

        executor::execute(run, function, parameter, suite_attempt, before_class_error)?;
    }
    Ok(())
}

/// Record a pair that could not run as `ignore`, without invoking the executor.
fn ignore_pair(
    run: &mut SuiteRun<'_>,
    function: &DecoratedFunction,
    parameter: &Parameter,
    error: &TestError,
    suite_attempt: u32,
) -> EngineResult<()> {
    run.record(function, parameter, Some(error), Instant::now(), OutcomeCategory::Ignore, suite_attempt);

    let class = run.class;
    let test = TestRef {
        class: class.name(),
        function: function.name(),
        parameter,
    };
    run.notify("on_ignore", |l| l.on_ignore(&test, error))
}
