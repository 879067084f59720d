//! Suite data model: classes, their decorated functions, and per-test options.
//!
//! Registration is done through the builder methods on [`ClassObject`]; once built, a class and its
//! [`SuiteDefinition`] are read-only inputs to the engine.

pub mod parameter;
pub mod roster;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use retrial_core::DecoratorType;
use serde_json::Value;

use crate::config::RunConfig;
use crate::errors::TestError;
use crate::listener::{ConsoleListener, Listener, ListenerFactory};

pub use parameter::{Parameter, ParameterKey};
pub use roster::Roster;

// ============================================================================
// Calling convention
// ============================================================================

/// The single argument every hook and test body receives: a description of the call itself.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub class: &'a str,
    pub function: &'a str,
    pub decorator: DecoratorType,
    /// Inner (per-test) attempt number, starting at 1. Always 1 for class hooks.
    pub attempt: u32,
    /// Suite-level attempt number, starting at 1.
    pub suite_attempt: u32,
    parameter: Option<&'a Parameter>,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(class: &'a str, function: &'a str, decorator: DecoratorType) -> Self {
        Self {
            class,
            function,
            decorator,
            attempt: 1,
            suite_attempt: 1,
            parameter: None,
        }
    }

    pub(crate) fn with_attempts(mut self, attempt: u32, suite_attempt: u32) -> Self {
        self.attempt = attempt;
        self.suite_attempt = suite_attempt;
        self
    }

    pub(crate) fn with_parameter(mut self, parameter: Option<&'a Parameter>) -> Self {
        self.parameter = parameter;
        self
    }

    /// The current parameter. `None` unless the function was registered as accepting one.
    pub fn parameter(&self) -> Option<&'a Parameter> {
        self.parameter
    }
}

/// Callable behind a decorated function.
pub type Body = Box<dyn Fn(&Invocation<'_>) -> Result<(), TestError>>;

// ============================================================================
// Options
// ============================================================================

/// Whether a test case is skipped.
pub enum Skip {
    Literal(bool),
    /// Evaluated once per (test, parameter) against the class metadata. An `Err` is fatal.
    Predicate(Box<dyn Fn(&ClassMeta) -> Result<bool, TestError>>),
}

impl Skip {
    pub fn when(predicate: impl Fn(&ClassMeta) -> Result<bool, TestError> + 'static) -> Self {
        Skip::Predicate(Box::new(predicate))
    }
}

impl Default for Skip {
    fn default() -> Self {
        Skip::Literal(false)
    }
}

impl From<bool> for Skip {
    fn from(skip: bool) -> Self {
        Skip::Literal(skip)
    }
}

impl fmt::Debug for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Literal(b) => f.debug_tuple("Literal").field(b).finish(),
            Skip::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Declared options of a test case.
#[derive(Debug)]
pub struct TestOptions {
    /// Inner retry budget: total attempts per suite iteration.
    pub retry: u32,
    pub tags: BTreeSet<String>,
    /// One run per element, in order. An empty list is a configuration error reported as `ignore`.
    pub parameters: Vec<Parameter>,
    pub skip: Skip,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            retry: 1,
            tags: BTreeSet::new(),
            parameters: vec![Parameter::Null],
            skip: Skip::default(),
        }
    }
}

impl TestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parameters<I, P>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Parameter>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_skip(mut self, skip: impl Into<Skip>) -> Self {
        self.skip = skip.into();
        self
    }

    pub fn skip_when(self, predicate: impl Fn(&ClassMeta) -> Result<bool, TestError> + 'static) -> Self {
        self.with_skip(Skip::when(predicate))
    }
}

// ============================================================================
// Decorated functions and suites
// ============================================================================

/// A registered callable plus its declared options.
pub struct DecoratedFunction {
    name: String,
    decorator: DecoratorType,
    accepts_parameter: bool,
    options: TestOptions,
    body: Body,
}

impl DecoratedFunction {
    pub fn new(
        name: impl Into<String>,
        decorator: DecoratorType,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            decorator,
            accepts_parameter: false,
            options: TestOptions::default(),
            body: Box::new(body),
        }
    }

    pub fn with_options(mut self, options: TestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn accepting_parameter(mut self) -> Self {
        self.accepts_parameter = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn decorator(&self) -> DecoratorType {
        self.decorator
    }

    pub fn accepts_parameter(&self) -> bool {
        self.accepts_parameter
    }

    pub fn options(&self) -> &TestOptions {
        &self.options
    }

    /// Call the body, turning a panic into [`TestError::Assertion`].
    pub(crate) fn call(&self, invocation: &Invocation<'_>) -> Result<(), TestError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.body)(invocation))) {
            Ok(result) => result,
            Err(payload) => Err(TestError::from_panic(payload)),
        }
    }
}

impl fmt::Debug for DecoratedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedFunction")
            .field("name", &self.name)
            .field("decorator", &self.decorator)
            .field("accepts_parameter", &self.accepts_parameter)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Decorated functions grouped by lifecycle role, each group in registration order.
#[derive(Debug, Default)]
pub struct SuiteDefinition {
    functions: BTreeMap<DecoratorType, Vec<DecoratedFunction>>,
}

impl SuiteDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, function: DecoratedFunction) {
        self.functions.entry(function.decorator()).or_default().push(function);
    }

    pub fn functions(&self, decorator: DecoratorType) -> &[DecoratedFunction] {
        self.functions.get(&decorator).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn test_cases(&self) -> &[DecoratedFunction] {
        self.functions(DecoratorType::TestCase)
    }

    /// First test-case name registered more than once. The ledger keys on names, so these cannot run.
    pub fn duplicate_test_case(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.test_cases()
            .iter()
            .map(DecoratedFunction::name)
            .find(|name| !seen.insert(*name))
    }

    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Classes
// ============================================================================

/// Class metadata handed to the listener constructor and to skip predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMeta {
    pub name: String,
    pub attributes: BTreeMap<String, Value>,
}

impl ClassMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// A test class: its suite definition plus class-level settings.
pub struct ClassObject {
    meta: ClassMeta,
    retry: u32,
    skip: bool,
    listener: Option<ListenerFactory>,
    suite: SuiteDefinition,
}

impl ClassObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: ClassMeta::new(name),
            retry: 1,
            skip: false,
            listener: None,
            suite: SuiteDefinition::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.attributes.insert(key.into(), value.into());
        self
    }

    /// Suite-level retry budget: maximum number of suite iterations.
    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_listener<L, F>(mut self, factory: F) -> Self
    where
        L: Listener + 'static,
        F: Fn(&ClassMeta) -> L + 'static,
    {
        self.listener = Some(Box::new(move |meta: &ClassMeta| Box::new(factory(meta)) as Box<dyn Listener>));
        self
    }

    pub fn register(mut self, function: DecoratedFunction) -> Self {
        self.suite.register(function);
        self
    }

    pub fn before_class(
        self,
        name: &str,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(DecoratedFunction::new(name, DecoratorType::BeforeClass, body))
    }

    pub fn after_class(
        self,
        name: &str,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(DecoratedFunction::new(name, DecoratorType::AfterClass, body))
    }

    pub fn before_test(
        self,
        name: &str,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(DecoratedFunction::new(name, DecoratorType::BeforeTest, body))
    }

    pub fn after_test(
        self,
        name: &str,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(DecoratedFunction::new(name, DecoratorType::AfterTest, body))
    }

    /// Register a test case whose body does not take the parameter.
    pub fn test_case(
        self,
        name: &str,
        options: TestOptions,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(DecoratedFunction::new(name, DecoratorType::TestCase, body).with_options(options))
    }

    /// Register a test case whose body receives the current parameter through [`Invocation::parameter`].
    pub fn test_case_with_param(
        self,
        name: &str,
        options: TestOptions,
        body: impl Fn(&Invocation<'_>) -> Result<(), TestError> + 'static,
    ) -> Self {
        self.register(
            DecoratedFunction::new(name, DecoratorType::TestCase, body)
                .with_options(options)
                .accepting_parameter(),
        )
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn meta(&self) -> &ClassMeta {
        &self.meta
    }

    pub fn retry(&self) -> u32 {
        self.retry
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn suite(&self) -> &SuiteDefinition {
        &self.suite
    }

    /// Construct a fresh listener for one suite run. Without a factory this is the console listener.
    pub fn build_listener(&self, config: &RunConfig) -> Box<dyn Listener> {
        match &self.listener {
            Some(factory) => factory(&self.meta),
            None => Box::new(self.console_listener(config)),
        }
    }

    pub fn console_listener(&self, config: &RunConfig) -> ConsoleListener {
        ConsoleListener::new(&self.meta.name).verbose(config.verbose)
    }
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassObject")
            .field("meta", &self.meta)
            .field("retry", &self.retry)
            .field("skip", &self.skip)
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}
