//! Read-only summarizer over a [`Ledger`].

use std::fmt;

use retrial_core::{OutcomeCategory, UNSUCCESSFUL};

use super::{ClassLedger, Ledger};

/// Number of (function, parameter) pairs per category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCounts {
    pub success: usize,
    pub fail: usize,
    pub error: usize,
    pub ignore: usize,
    pub skip: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: OutcomeCategory) -> usize {
        match category {
            OutcomeCategory::Success => self.success,
            OutcomeCategory::Fail => self.fail,
            OutcomeCategory::Error => self.error,
            OutcomeCategory::Ignore => self.ignore,
            OutcomeCategory::Skip => self.skip,
        }
    }

    fn bump(&mut self, category: OutcomeCategory) {
        let slot = match category {
            OutcomeCategory::Success => &mut self.success,
            OutcomeCategory::Fail => &mut self.fail,
            OutcomeCategory::Error => &mut self.error,
            OutcomeCategory::Ignore => &mut self.ignore,
            OutcomeCategory::Skip => &mut self.skip,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        OutcomeCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn unsuccessful(&self) -> usize {
        UNSUCCESSFUL.iter().map(|c| self.get(*c)).sum()
    }

    /// Whether anything failed outright (`fail`, `error` or `ignore`). Skips do not count.
    pub fn has_failures(&self) -> bool {
        self.fail + self.error + self.ignore > 0
    }

    fn from_class(ledger: &ClassLedger) -> Self {
        let mut counts = Self::default();
        for (category, ..) in ledger.entries() {
            counts.bump(category);
        }
        counts
    }
}

impl std::ops::AddAssign for CategoryCounts {
    fn add_assign(&mut self, other: Self) {
        self.success += other.success;
        self.fail += other.fail;
        self.error += other.error;
        self.ignore += other.ignore;
        self.skip += other.skip;
    }
}

impl fmt::Display for CategoryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = OutcomeCategory::ALL
            .iter()
            .filter(|c| self.get(**c) > 0)
            .map(|c| format!("{} {}", self.get(*c), c))
            .collect();
        if parts.is_empty() {
            f.write_str("no tests")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// Aggregate view used for the run summary.
#[derive(Debug, Clone, Copy)]
pub struct Stats<'a> {
    ledger: &'a Ledger,
}

impl<'a> Stats<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// Counts across every class.
    pub fn counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for (_, class) in self.ledger.classes() {
            counts += CategoryCounts::from_class(class);
        }
        counts
    }

    pub fn class_counts(&self, class: &str) -> CategoryCounts {
        self.ledger
            .class(class)
            .map(CategoryCounts::from_class)
            .unwrap_or_default()
    }

    pub fn total_tests(&self) -> usize {
        self.counts().total()
    }

    pub fn unsuccessful_tests(&self) -> usize {
        self.counts().unsuccessful()
    }

    pub fn successful_tests(&self) -> usize {
        self.counts().success
    }

    pub fn count(&self, category: OutcomeCategory) -> usize {
        self.counts().get(category)
    }

    /// `"{passed}/{total}"`, where passed is total minus unsuccessful.
    pub fn summary_line(&self) -> String {
        let counts = self.counts();
        format!("{}/{}", counts.total() - counts.unsuccessful(), counts.total())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::errors::TestError;
    use crate::ledger::Attempt;
    use crate::suite::Parameter;

    fn record(ledger: &mut Ledger, class: &str, function: &str, category: OutcomeCategory) {
        let err = TestError::error("x");
        ledger.record(Attempt {
            class,
            function,
            parameter: &Parameter::Null,
            error: category.is_unsuccessful().then_some(&err),
            started: Instant::now(),
            category,
            suite_attempt: 1,
        });
    }

    #[test]
    fn test_counts_span_classes() {
        let mut ledger = Ledger::new();
        record(&mut ledger, "A", "t1", OutcomeCategory::Success);
        record(&mut ledger, "A", "t2", OutcomeCategory::Fail);
        record(&mut ledger, "B", "t1", OutcomeCategory::Skip);

        let stats = ledger.stats();
        assert_eq!(stats.total_tests(), 3);
        assert_eq!(stats.unsuccessful_tests(), 2);
        assert_eq!(stats.successful_tests(), 1);
        assert_eq!(stats.class_counts("A").fail, 1);
        assert_eq!(stats.class_counts("missing"), CategoryCounts::default());
        assert_eq!(stats.summary_line(), "1/3");
    }

    #[test]
    fn test_reclassified_pair_counts_once() {
        let mut ledger = Ledger::new();
        record(&mut ledger, "A", "t", OutcomeCategory::Fail);
        record(&mut ledger, "A", "t", OutcomeCategory::Success);

        let stats = ledger.stats();
        assert_eq!(stats.total_tests(), 1);
        assert_eq!(stats.count(OutcomeCategory::Fail), 0);
        assert_eq!(stats.summary_line(), "1/1");
    }

    #[test]
    fn test_skips_are_not_failures() {
        let counts = CategoryCounts {
            skip: 2,
            ..Default::default()
        };
        assert!(!counts.has_failures());
        assert_eq!(counts.unsuccessful(), 2);
    }
}
