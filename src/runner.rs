//! Runner entry: resolve requested suites, run them in order, print the summary.

use crate::config::RunConfig;
use crate::engine;
use crate::errors::EngineResult;
use crate::ledger::{CategoryCounts, Ledger};
use crate::suite::Roster;

/// Summary of a run, sourced from the ledger after the last suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub counts: CategoryCounts,
    /// Suites that were resolved and run, in order
    pub suites_run: Vec<String>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.counts.total()
    }

    pub fn unsuccessful(&self) -> usize {
        self.counts.unsuccessful()
    }

    pub fn has_failures(&self) -> bool {
        self.counts.has_failures()
    }

    /// `"{total - unsuccessful}/{total}"`
    pub fn line(&self) -> String {
        format!("{}/{}", self.total() - self.unsuccessful(), self.total())
    }
}

/// Runs suites from a roster against a caller-owned ledger.
pub struct Runner<'r> {
    roster: &'r Roster,
    config: RunConfig,
}

impl<'r> Runner<'r> {
    pub fn new(roster: &'r Roster, config: RunConfig) -> Self {
        Self { roster, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the suites named by `ids`, in the given order. Unknown ids are skipped.
    ///
    /// A framework error aborts the run and is returned; outcomes recorded so far stay in the ledger.
    #[tracing::instrument(skip_all, fields(requested = ids.len()))]
    pub fn run<S: AsRef<str>>(&self, ledger: &mut Ledger, ids: &[S]) -> EngineResult<RunSummary> {
        let mut suites_run = Vec::new();

        for id in ids {
            let id = id.as_ref();
            let Some(class) = self.roster.get(id) else {
                tracing::debug!(suite = id, "no such suite; skipping");
                continue;
            };
            tracing::info!(suite = id, "running suite");
            engine::run_suite(class, ledger, &self.config)?;
            suites_run.push(id.to_string());
        }

        let summary = RunSummary {
            counts: ledger.stats().counts(),
            suites_run,
        };
        if !self.config.quiet {
            println!("{}", summary.line());
        }
        Ok(summary)
    }

    /// Run every registered suite in registration order.
    pub fn run_all(&self, ledger: &mut Ledger) -> EngineResult<RunSummary> {
        let ids: Vec<&str> = self.roster.ids().collect();
        self.run(ledger, &ids)
    }
}
