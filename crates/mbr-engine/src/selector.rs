//! Cross-section-weighted process choice.

use mbr_core::{ProcessKind, RandomStream};
use mbr_xsec::CrossSectionTable;

/// Picks the process of each event from the cumulative rates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessSelector {
    rate: [f64; 4],
}

impl ProcessSelector {
    /// Selector over the rates of `table`.
    pub fn new(table: &CrossSectionTable) -> Self {
        Self { rate: table.rate }
    }

    /// Cumulative rates in [`ProcessKind::ALL`] order.
    pub fn rate(&self) -> [f64; 4] {
        self.rate
    }

    /// Draw one uniform variate and select a process.
    pub fn select<R: RandomStream + ?Sized>(&self, rng: &mut R) -> ProcessKind {
        self.pick(rng.uniform())
    }

    /// The first process with `u < rate[i]`.
    ///
    /// Falls back to the last process with a non-zero probability when
    /// `u` reaches the top of the table.
    pub fn pick(&self, u: f64) -> ProcessKind {
        if let Some(i) = self.rate.iter().position(|&r| u < r) {
            return ProcessKind::ALL[i];
        }
        let mut below = 0.0;
        let mut last = ProcessKind::Elastic;
        for (kind, &r) in ProcessKind::ALL.iter().zip(&self.rate) {
            if r > below {
                last = *kind;
            }
            below = r;
        }
        last
    }
}
