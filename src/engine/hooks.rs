//! Hook processor: runs the lifecycle callbacks registered under one decorator type.

use std::time::Instant;

use retrial_core::DecoratorType;

use crate::errors::TestError;
use crate::ledger::Ledger;
use crate::suite::{ClassObject, Invocation};

/// A hook that returned an error (or panicked).
#[derive(Debug, Clone, PartialEq)]
pub struct HookFailure {
    pub hook: String,
    pub decorator: DecoratorType,
    pub error: TestError,
}

/// Run every hook of `decorator` for `class`, in registration order.
///
/// Each call is timed and appends exactly one sample to the class's `class_performance[decorator]`, including a
/// call that fails. The first failure stops the sequence and is returned to the caller, which owns the policy.
pub fn run_hooks(
    class: &ClassObject,
    decorator: DecoratorType,
    attempt: u32,
    suite_attempt: u32,
    ledger: &mut Ledger,
) -> Result<(), HookFailure> {
    for hook in class.suite().functions(decorator) {
        let invocation = Invocation::new(class.name(), hook.name(), decorator).with_attempts(attempt, suite_attempt);

        let started = Instant::now();
        let result = hook.call(&invocation);
        ledger.record_hook_timing(class.name(), decorator, started.elapsed());

        if let Err(error) = result {
            return Err(HookFailure {
                hook: hook.name().to_string(),
                decorator,
                error,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_hooks_run_in_order_with_one_sample_each() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (calls.clone(), calls.clone());
        let class = ClassObject::new("Suite")
            .before_class("first", move |inv: &Invocation<'_>| {
                a.borrow_mut().push(inv.function.to_string());
                Ok(())
            })
            .before_class("second", move |inv: &Invocation<'_>| {
                b.borrow_mut().push(inv.function.to_string());
                Ok(())
            });
        let mut ledger = Ledger::new();

        run_hooks(&class, DecoratorType::BeforeClass, 1, 1, &mut ledger).unwrap();

        assert_eq!(*calls.borrow(), ["first", "second"]);
        assert_eq!(ledger.class_performance("Suite", DecoratorType::BeforeClass).len(), 2);
    }

    #[test]
    fn test_failure_stops_the_sequence_after_timing_it() {
        let reached = Rc::new(RefCell::new(false));
        let flag = reached.clone();
        let class = ClassObject::new("Suite")
            .after_test("broken", |_: &Invocation<'_>| Err(TestError::error("db down")))
            .after_test("never", move |_: &Invocation<'_>| {
                *flag.borrow_mut() = true;
                Ok(())
            });
        let mut ledger = Ledger::new();

        let failure = run_hooks(&class, DecoratorType::AfterTest, 2, 1, &mut ledger).unwrap_err();

        assert_eq!(failure.hook, "broken");
        assert_eq!(failure.error, TestError::error("db down"));
        assert!(!*reached.borrow());
        assert_eq!(ledger.class_performance("Suite", DecoratorType::AfterTest).len(), 1);
    }

    #[test]
    fn test_no_hooks_records_nothing() {
        let class = ClassObject::new("Suite");
        let mut ledger = Ledger::new();
        run_hooks(&class, DecoratorType::BeforeTest, 1, 1, &mut ledger).unwrap();
        assert!(ledger.is_empty());
    }
}
