//! Property-based tests for the outcome ledger
//!
//! These tests use proptest to drive the ledger with random record sequences and check
//! that its accounting invariants hold regardless of order.

use std::collections::HashMap;
use std::time::Instant;

use proptest::prelude::*;
use retrial::ledger::Attempt;
use retrial::{Ledger, OutcomeCategory, Parameter, TestError};

const FUNCTIONS: [&str; 3] = ["alpha", "beta", "gamma"];

fn parameters() -> [Parameter; 4] {
    [Parameter::Null, Parameter::from(1), Parameter::from(1.0), Parameter::from("1")]
}

fn category() -> impl Strategy<Value = OutcomeCategory> {
    prop::sample::select(OutcomeCategory::ALL.to_vec())
}

/// (function index, parameter index, category, suite attempt)
fn records() -> impl Strategy<Value = Vec<(usize, usize, OutcomeCategory, u32)>> {
    prop::collection::vec((0..FUNCTIONS.len(), 0..4usize, category(), 1..4u32), 0..40)
}

fn apply(ledger: &mut Ledger, function: usize, parameter: &Parameter, category: OutcomeCategory, suite_attempt: u32) {
    let error = category.is_unsuccessful().then(|| TestError::assertion("recorded"));
    ledger.record(Attempt {
        class: "Prop",
        function: FUNCTIONS[function],
        parameter,
        error: error.as_ref(),
        started: Instant::now(),
        category,
        suite_attempt,
    });
}

proptest! {
    /// Property: every recorded pair lives in exactly one category, the last one recorded
    #[test]
    fn pair_is_in_exactly_one_category(seq in records()) {
        let params = parameters();
        let mut ledger = Ledger::new();
        let mut last = HashMap::new();

        for (function, param, category, suite_attempt) in &seq {
            apply(&mut ledger, *function, &params[*param], *category, *suite_attempt);
            last.insert((*function, *param), *category);
        }

        for ((function, param), category) in &last {
            let holders: Vec<_> = OutcomeCategory::ALL
                .iter()
                .filter(|c| ledger.entry("Prop", **c, FUNCTIONS[*function], &params[*param]).is_some())
                .collect();
            prop_assert_eq!(holders, vec![category]);
        }
        prop_assert_eq!(ledger.stats().total_tests(), last.len());
    }

    /// Property: retries count records, and both histories grow by one per record
    #[test]
    fn history_grows_one_element_per_record(seq in records()) {
        let params = parameters();
        let mut ledger = Ledger::new();
        let mut counts: HashMap<(usize, usize), u32> = HashMap::new();

        for (function, param, category, suite_attempt) in &seq {
            let before = ledger
                .latest("Prop", FUNCTIONS[*function], &params[*param])
                .map_or(0, |entry| entry.retries);
            apply(&mut ledger, *function, &params[*param], *category, *suite_attempt);

            let entry = ledger.latest("Prop", FUNCTIONS[*function], &params[*param]).unwrap();
            prop_assert_eq!(entry.retries, before + 1);
            prop_assert_eq!(entry.failures.len(), entry.retries as usize);
            prop_assert_eq!(entry.performance.len(), entry.retries as usize);
            prop_assert_eq!(ledger.class_retried("Prop"), Some(*suite_attempt));
            *counts.entry((*function, *param)).or_default() += 1;
        }

        for ((function, param), count) in counts {
            let entry = ledger.latest("Prop", FUNCTIONS[function], &params[param]).unwrap();
            prop_assert_eq!(entry.retries, count);
            prop_assert_eq!(&entry.parameter, &params[param]);
        }
    }

    /// Property: the retry set is exactly the pairs whose last category is unsuccessful
    #[test]
    fn unsuccessful_set_tracks_latest_category(seq in records()) {
        let params = parameters();
        let mut ledger = Ledger::new();
        let mut last = HashMap::new();

        for (function, param, category, suite_attempt) in &seq {
            apply(&mut ledger, *function, &params[*param], *category, *suite_attempt);
            last.insert((*function, *param), *category);
        }

        let expected = last.values().filter(|c| c.is_unsuccessful()).count();
        prop_assert_eq!(ledger.unsuccessful("Prop").len(), expected);
        prop_assert_eq!(ledger.stats().unsuccessful_tests(), expected);
    }
}
