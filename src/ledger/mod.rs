//! Outcome ledger: cumulative, category-exclusive execution history.
//!
//! Layout per class:
//!
//! ```text
//! class → { category → { function → { parameter-key → LedgerEntry } },
//!           class_performance: { decorator_type → [seconds] },
//!           class_retried }
//! ```
//!
//! A (class, function, parameter) triple lives in at most one category. Every [`Ledger::record`] carries the
//! triple's history forward into the new category and removes it from all others, so the ledger always reflects
//! the latest classification while `retries`, `failures` and `performance` keep growing.
//!
//! The ledger is owned by the caller and passed to the runner by reference. Nothing clears it implicitly; repeated
//! runs against the same ledger accumulate.

pub mod stats;

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use retrial_core::{DecoratorType, OutcomeCategory};

use crate::errors::TestError;
use crate::suite::{Parameter, ParameterKey};

pub use stats::{CategoryCounts, Stats};

/// Accumulated history of one (class, function, parameter) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Number of recorded attempts.
    pub retries: u32,
    /// One element per attempt: the captured error, or `None` for attempts that did not fail.
    pub failures: Vec<Option<TestError>>,
    /// One element per attempt: elapsed seconds.
    pub performance: Vec<f64>,
    /// The original parameter value.
    pub parameter: Parameter,
}

impl LedgerEntry {
    fn new(parameter: Parameter) -> Self {
        Self {
            retries: 0,
            failures: Vec::new(),
            performance: Vec::new(),
            parameter,
        }
    }

    /// The most recent captured error, if the last attempt failed.
    pub fn last_failure(&self) -> Option<&TestError> {
        self.failures.last().and_then(Option::as_ref)
    }
}

/// Per-parameter entries of one function.
pub type ParameterEntries = BTreeMap<ParameterKey, LedgerEntry>;

/// Per-function entries of one category.
pub type FunctionEntries = BTreeMap<String, ParameterEntries>;

/// Identifies a (function, parameter) pair eligible for suite-level retry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnsuccessfulKey {
    pub function: String,
    pub parameter: ParameterKey,
}

impl UnsuccessfulKey {
    pub fn new(function: impl Into<String>, parameter: &Parameter) -> Self {
        Self {
            function: function.into(),
            parameter: parameter.key(),
        }
    }
}

/// One execution attempt to be recorded.
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    pub class: &'a str,
    pub function: &'a str,
    pub parameter: &'a Parameter,
    pub error: Option<&'a TestError>,
    pub started: Instant,
    pub category: OutcomeCategory,
    pub suite_attempt: u32,
}

/// Ledger state of a single class.
#[derive(Debug, Clone, Default)]
pub struct ClassLedger {
    categories: BTreeMap<OutcomeCategory, FunctionEntries>,
    class_performance: BTreeMap<DecoratorType, Vec<f64>>,
    class_retried: u32,
}

impl ClassLedger {
    pub fn category(&self, category: OutcomeCategory) -> Option<&FunctionEntries> {
        self.categories.get(&category)
    }

    /// Hook timings (seconds) recorded for one decorator type, in call order.
    pub fn class_performance(&self, decorator: DecoratorType) -> &[f64] {
        self.class_performance.get(&decorator).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Suite-level attempt number of the most recent record.
    pub fn class_retried(&self) -> u32 {
        self.class_retried
    }

    /// Every entry with its category, function name and key.
    pub fn entries(&self) -> impl Iterator<Item = (OutcomeCategory, &str, &ParameterKey, &LedgerEntry)> {
        self.categories.iter().flat_map(|(category, functions)| {
            functions.iter().flat_map(move |(function, params)| {
                params
                    .iter()
                    .map(move |(key, entry)| (*category, function.as_str(), key, entry))
            })
        })
    }

    fn find(&self, function: &str, key: &ParameterKey) -> Option<(OutcomeCategory, &LedgerEntry)> {
        self.categories.iter().find_map(|(category, functions)| {
            functions
                .get(function)
                .and_then(|params| params.get(key))
                .map(|entry| (*category, entry))
        })
    }

    /// Remove the pair from every category, pruning emptied function maps. Returns the removed entry.
    fn take(&mut self, function: &str, key: &ParameterKey) -> Option<(OutcomeCategory, LedgerEntry)> {
        let mut taken = None;
        for (category, functions) in self.categories.iter_mut() {
            let Some(params) = functions.get_mut(function) else {
                continue;
            };
            if let Some(entry) = params.remove(key) {
                if taken.is_none() {
                    taken = Some((*category, entry));
                }
            }
            if params.is_empty() {
                functions.remove(function);
            }
        }
        taken
    }
}

/// Process-lifetime store of execution outcomes.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    classes: BTreeMap<String, ClassLedger>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt.
    ///
    /// Appends one element to `failures` and `performance`, bumps `retries`, moves the entry into
    /// `attempt.category` and sets `class_retried`. Returns the category the pair was in before, if any.
    pub fn record(&mut self, attempt: Attempt<'_>) -> Option<OutcomeCategory> {
        let elapsed = attempt.started.elapsed().as_secs_f64();
        let key = attempt.parameter.key();
        let class = self.classes.entry(attempt.class.to_string()).or_default();

        let (previous, mut entry) = match class.take(attempt.function, &key) {
            Some((category, entry)) => (Some(category), entry),
            None => (None, LedgerEntry::new(attempt.parameter.clone())),
        };
        entry.retries += 1;
        entry.failures.push(attempt.error.cloned());
        entry.performance.push(elapsed);

        class
            .categories
            .entry(attempt.category)
            .or_default()
            .entry(attempt.function.to_string())
            .or_default()
            .insert(key, entry);
        class.class_retried = attempt.suite_attempt;

        if let Some(previous) = previous.filter(|p| *p != attempt.category) {
            tracing::debug!(
                class = attempt.class,
                function = attempt.function,
                parameter = %attempt.parameter,
                from = %previous,
                to = %attempt.category,
                "reclassified"
            );
        }
        previous
    }

    /// Append one hook timing sample for a class.
    pub fn record_hook_timing(&mut self, class: &str, decorator: DecoratorType, elapsed: Duration) {
        self.classes
            .entry(class.to_string())
            .or_default()
            .class_performance
            .entry(decorator)
            .or_default()
            .push(elapsed.as_secs_f64());
    }

    pub fn class(&self, class: &str) -> Option<&ClassLedger> {
        self.classes.get(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassLedger)> {
        self.classes.iter().map(|(name, ledger)| (name.as_str(), ledger))
    }

    pub fn entry(
        &self,
        class: &str,
        category: OutcomeCategory,
        function: &str,
        parameter: &Parameter,
    ) -> Option<&LedgerEntry> {
        self.class(class)?.category(category)?.get(function)?.get(&parameter.key())
    }

    /// Current category of a pair, if it has been recorded.
    pub fn category_of(&self, class: &str, function: &str, parameter: &Parameter) -> Option<OutcomeCategory> {
        self.class(class)?
            .find(function, &parameter.key())
            .map(|(category, _)| category)
    }

    /// Current entry of a pair, whatever its category.
    pub fn latest(&self, class: &str, function: &str, parameter: &Parameter) -> Option<&LedgerEntry> {
        self.class(class)?.find(function, &parameter.key()).map(|(_, entry)| entry)
    }

    /// Pairs of a class currently classified in an unsuccessful category.
    pub fn unsuccessful(&self, class: &str) -> BTreeSet<UnsuccessfulKey> {
        let Some(ledger) = self.class(class) else {
            return BTreeSet::new();
        };
        ledger
            .entries()
            .filter(|(category, ..)| category.is_unsuccessful())
            .map(|(_, function, key, _)| UnsuccessfulKey {
                function: function.to_string(),
                parameter: key.clone(),
            })
            .collect()
    }

    pub fn class_performance(&self, class: &str, decorator: DecoratorType) -> &[f64] {
        self.class(class)
            .map(|ledger| ledger.class_performance(decorator))
            .unwrap_or(&[])
    }

    pub fn class_retried(&self, class: &str) -> Option<u32> {
        self.class(class).map(ClassLedger::class_retried)
    }

    /// Read-only summarizer over the current state.
    pub fn stats(&self) -> Stats<'_> {
        Stats::new(self)
    }

    pub fn clear(&mut self) {
        self.classes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
