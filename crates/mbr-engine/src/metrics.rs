//! Run statistics for the event generator.
//!
//! [`GenerationStats`] counts selected processes, completed and
//! abandoned events, and the soft failures (retries) absorbed along the
//! way. Soft failures never abandon an event; they are kept apart from
//! the hard failures so the two rates can be monitored independently.

use mbr_core::{ProcessKind, RetryTally};

/// Counters accumulated over a run.
///
/// Per-process arrays are indexed in [`ProcessKind::ALL`] order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Generation attempts, abandoned ones included.
    pub attempted: u64,
    /// Completed events per process.
    pub completed: [u64; 4],
    /// Abandoned events per process.
    pub abandoned: [u64; 4],
    /// Attempts with at least one diffractive mass retry.
    pub events_with_mass_retries: u64,
    /// Attempts with at least one multiplicity resampling.
    pub events_with_multiplicity_retries: u64,
    /// Attempts with at least one kinematics resampling.
    pub events_with_kinematics_retries: u64,
    /// Attempts with any retry.
    pub events_with_retries: u64,
    /// Total diffractive mass retries.
    pub mass_retries: u64,
    /// Total multiplicity resamplings.
    pub multiplicity_retries: u64,
    /// Total kinematics resamplings.
    pub kinematics_retries: u64,
    /// Rejection candidates whose density exceeded the envelope.
    pub envelope_violations: u64,
}

impl GenerationStats {
    /// Fold one generation attempt into the counters.
    pub fn record(&mut self, process: ProcessKind, tally: &RetryTally, completed: bool) {
        self.attempted += 1;
        if completed {
            self.completed[process.index()] += 1;
        } else {
            self.abandoned[process.index()] += 1;
        }
        self.events_with_mass_retries += u64::from(tally.mass_retries > 0);
        self.events_with_multiplicity_retries += u64::from(tally.multiplicity_retries > 0);
        self.events_with_kinematics_retries += u64::from(tally.kinematics_retries > 0);
        self.events_with_retries += u64::from(tally.any_retry());
        self.mass_retries += u64::from(tally.mass_retries);
        self.multiplicity_retries += u64::from(tally.multiplicity_retries);
        self.kinematics_retries += u64::from(tally.kinematics_retries);
        self.envelope_violations += u64::from(tally.envelope_violations);
    }

    /// Add every counter of `other` to `self`.
    pub fn merge(&mut self, other: &Self) {
        self.attempted += other.attempted;
        for (mine, theirs) in self.completed.iter_mut().zip(&other.completed) {
            *mine += theirs;
        }
        for (mine, theirs) in self.abandoned.iter_mut().zip(&other.abandoned) {
            *mine += theirs;
        }
        self.events_with_mass_retries += other.events_with_mass_retries;
        self.events_with_multiplicity_retries += other.events_with_multiplicity_retries;
        self.events_with_kinematics_retries += other.events_with_kinematics_retries;
        self.events_with_retries += other.events_with_retries;
        self.mass_retries += other.mass_retries;
        self.multiplicity_retries += other.multiplicity_retries;
        self.kinematics_retries += other.kinematics_retries;
        self.envelope_violations += other.envelope_violations;
    }

    /// Times `process` was selected.
    pub fn selected(&self, process: ProcessKind) -> u64 {
        let i = process.index();
        self.completed[i] + self.abandoned[i]
    }

    /// Completed events over all processes.
    pub fn completed_total(&self) -> u64 {
        self.completed.iter().sum()
    }

    /// Abandoned events over all processes.
    pub fn abandoned_total(&self) -> u64 {
        self.abandoned.iter().sum()
    }

    /// Fraction of attempts abandoned; zero before the first attempt.
    pub fn abandonment_rate(&self) -> f64 {
        ratio(self.abandoned_total(), self.attempted)
    }

    /// Fraction of attempts that needed at least one retry.
    pub fn soft_failure_rate(&self) -> f64 {
        ratio(self.events_with_retries, self.attempted)
    }

    /// Emit the counters as one structured `info` record.
    pub fn log_summary(&self) {
        tracing::info!(
            attempted = self.attempted,
            hard_core = self.completed[ProcessKind::HardCore.index()],
            double_diffractive = self.completed[ProcessKind::DoubleDiffractive.index()],
            single_diffractive = self.completed[ProcessKind::SingleDiffractive.index()],
            elastic = self.completed[ProcessKind::Elastic.index()],
            abandoned = self.abandoned_total(),
            abandonment_rate = self.abandonment_rate(),
            events_with_retries = self.events_with_retries,
            mass_retries = self.mass_retries,
            multiplicity_retries = self.multiplicity_retries,
            kinematics_retries = self.kinematics_retries,
            envelope_violations = self.envelope_violations,
            "Generation summary"
        );
    }
}

fn ratio(n: u64, d: u64) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}
