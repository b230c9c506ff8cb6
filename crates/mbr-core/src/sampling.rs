//! Reusable sampling utilities.
//!
//! - [`InverseCdfTable`]: a build-once cumulative table over a fixed grid,
//!   sampled by bisection with linear interpolation inside the bin.
//! - [`accept_reject`]: a bounded acceptance-rejection loop that also
//!   counts candidates whose density overshoots the envelope.

use crate::random::RandomStream;

/// Tabulated inverse CDF of a one-dimensional density on `[lower, upper]`.
///
/// The density is evaluated once per bin at the bin midpoint; sampling
/// is `O(log bins)`.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseCdfTable {
    edges: Vec<f64>,
    cdf: Vec<f64>,
}

impl InverseCdfTable {
    /// Tabulate `density` over `bins` equal bins of `[lower, upper]`.
    ///
    /// The density must be non-negative with a positive integral over
    /// the range; a table built from an all-zero density returns the
    /// lower edge of its last bin for every draw.
    pub fn from_density(lower: f64, upper: f64, bins: usize, density: impl Fn(f64) -> f64) -> Self {
        let bins = bins.max(1);
        let width = (upper - lower) / bins as f64;
        let mut edges = Vec::with_capacity(bins + 1);
        let mut cdf = Vec::with_capacity(bins + 1);
        edges.push(lower);
        cdf.push(0.0);
        let mut running = 0.0;
        for i in 0..bins {
            let left = lower + i as f64 * width;
            running += density(left + 0.5 * width);
            edges.push(if i + 1 == bins {
                upper
            } else {
                lower + (i + 1) as f64 * width
            });
            cdf.push(running);
        }
        if running > 0.0 {
            for c in &mut cdf[1..] {
                *c /= running;
            }
            cdf[bins] = 1.0;
        }
        Self { edges, cdf }
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lower edge of the tabulated range.
    pub fn lower(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the tabulated range.
    pub fn upper(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Map a probability `u` in `[0, 1]` to a value in the range.
    pub fn quantile(&self, u: f64) -> f64 {
        let bins = self.bins();
        let i = self.cdf[1..].partition_point(|&c| c < u).min(bins - 1);
        let (c0, c1) = (self.cdf[i], self.cdf[i + 1]);
        let (x0, x1) = (self.edges[i], self.edges[i + 1]);
        if c1 > c0 {
            x0 + (u - c0) * (x1 - x0) / (c1 - c0)
        } else {
            x0
        }
    }

    /// Draw one value.
    pub fn sample<R: RandomStream + ?Sized>(&self, rng: &mut R) -> f64 {
        self.quantile(rng.uniform())
    }
}

/// One candidate offered to [`accept_reject`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal<T> {
    /// The candidate value.
    pub value: T,
    /// Target density at the candidate.
    pub density: f64,
    /// Envelope (upper bound of the density) at the candidate.
    pub envelope: f64,
}

/// A value accepted by [`accept_reject`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Accepted<T> {
    /// The accepted candidate.
    pub value: T,
    /// Candidates drawn, the accepted one included.
    pub trials: u32,
    /// Candidates whose density exceeded their envelope.
    pub envelope_violations: u32,
}

/// Acceptance-rejection sampling with a hard trial cap.
///
/// `propose` draws a candidate (consuming whatever variates it needs)
/// and reports the target density and the envelope at it; the candidate
/// is accepted when `envelope * u <= density` for a fresh uniform `u`.
/// Returns `None` when `max_trials` candidates were all rejected.
pub fn accept_reject<T, R, F>(rng: &mut R, max_trials: u32, mut propose: F) -> Option<Accepted<T>>
where
    R: RandomStream + ?Sized,
    F: FnMut(&mut R) -> Proposal<T>,
{
    let mut violations = 0;
    for trial in 1..=max_trials {
        let candidate = propose(rng);
        if candidate.density > candidate.envelope {
            violations += 1;
        }
        if candidate.envelope * rng.uniform() <= candidate.density {
            return Some(Accepted {
                value: candidate.value,
                trials: trial,
                envelope_violations: violations,
            });
        }
    }
    None
}
