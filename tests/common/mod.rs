//! Shared helpers for the engine integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use retrial::{Invocation, Listener, ListenerError, ListenerResult, TestError, TestRef};

/// One listener callback, flattened for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Success(String),
    Failure(String, String),
    Error(String, String),
    Ignore(String, String),
    Skip(String),
    BeforeClassError(String),
    BeforeClassFailure(String),
    AfterClassError(String),
    AfterClassFailure(String),
    ClassSkip,
}

pub type Events = Rc<RefCell<Vec<Event>>>;

/// Collects every event into a shared buffer. Optionally fails on one hook.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub events: Events,
    pub fail_on: Option<&'static str>,
}

impl RecordingListener {
    pub fn new(events: &Events) -> Self {
        Self {
            events: events.clone(),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, hook: &'static str) -> Self {
        self.fail_on = Some(hook);
        self
    }

    fn push(&self, hook: &str, event: Event) -> ListenerResult {
        self.events.borrow_mut().push(event);
        if self.fail_on == Some(hook) {
            return Err(ListenerError::new(format!("{hook} refused")));
        }
        Ok(())
    }
}

/// `function[parameter]`, or just `function` for the null parameter.
fn label(test: &TestRef<'_>) -> String {
    if test.parameter.is_null() {
        test.function.to_string()
    } else {
        format!("{}[{}]", test.function, test.parameter)
    }
}

impl Listener for RecordingListener {
    fn on_success(&mut self, test: &TestRef<'_>) -> ListenerResult {
        self.push("on_success", Event::Success(label(test)))
    }

    fn on_failure(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.push("on_failure", Event::Failure(label(test), error.message().to_string()))
    }

    fn on_error(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.push("on_error", Event::Error(label(test), error.message().to_string()))
    }

    fn on_ignore(&mut self, test: &TestRef<'_>, error: &TestError) -> ListenerResult {
        self.push("on_ignore", Event::Ignore(label(test), error.message().to_string()))
    }

    fn on_skip(&mut self, test: &TestRef<'_>) -> ListenerResult {
        self.push("on_skip", Event::Skip(label(test)))
    }

    fn on_before_class_error(&mut self, error: &TestError) -> ListenerResult {
        self.push("on_before_class_error", Event::BeforeClassError(error.message().to_string()))
    }

    fn on_before_class_failure(&mut self, error: &TestError) -> ListenerResult {
        self.push("on_before_class_failure", Event::BeforeClassFailure(error.message().to_string()))
    }

    fn on_after_class_error(&mut self, error: &TestError) -> ListenerResult {
        self.push("on_after_class_error", Event::AfterClassError(error.message().to_string()))
    }

    fn on_after_class_failure(&mut self, error: &TestError) -> ListenerResult {
        self.push("on_after_class_failure", Event::AfterClassFailure(error.message().to_string()))
    }

    fn on_class_skip(&mut self) -> ListenerResult {
        self.push("on_class_skip", Event::ClassSkip)
    }
}

/// Counts calls per body; cloned handles share the counter.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Rc<Cell<u32>>);

impl CallCounter {
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// A body that counts its calls and always succeeds.
    pub fn passing(&self) -> impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static {
        let counter = self.0.clone();
        move |_: &Invocation<'_>| {
            counter.set(counter.get() + 1);
            Ok(())
        }
    }

    /// A body that counts its calls and always fails with `error`.
    pub fn failing(&self, error: TestError) -> impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static {
        let counter = self.0.clone();
        move |_: &Invocation<'_>| {
            counter.set(counter.get() + 1);
            Err(error.clone())
        }
    }

    /// A body that fails until it has been called `failures` times, then succeeds.
    pub fn flaky(&self, failures: u32) -> impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static {
        let counter = self.0.clone();
        move |_: &Invocation<'_>| {
            counter.set(counter.get() + 1);
            if counter.get() <= failures {
                Err(TestError::assertion("not yet"))
            } else {
                Ok(())
            }
        }
    }
}
