//! Test fixtures and helpers for MBR development.
//!
//! Seeded streams, a scripted [`RandomStream`] for pinning individual
//! draws, reference configurations for both diffraction models, and
//! assertions on event conservation and mother/daughter links.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::VecDeque;

use mbr_core::{Event, FourMomentum, RandomStream, Status};
use mbr_xsec::{DiffractionModel, GenerationConfig, ProcessSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Relative tolerance of the fragmentation energy balance.
pub const ENERGY_TOLERANCE: f64 = 1e-3;

/// A ChaCha8 stream seeded from `seed`.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// ── Configurations ─────────────────────────────────────────────────

/// Tevatron-energy configuration with both diffraction models on the
/// legacy spectrum.
pub fn legacy_config(processes: ProcessSet) -> GenerationConfig {
    GenerationConfig {
        processes,
        sd_model: DiffractionModel::Legacy,
        dd_model: DiffractionModel::Legacy,
        ..GenerationConfig::default()
    }
}

/// Tevatron-energy configuration with both diffraction models on the
/// renormalized pomeron flux.
pub fn renormalized_config(processes: ProcessSet) -> GenerationConfig {
    GenerationConfig {
        processes,
        sd_model: DiffractionModel::Renormalized,
        dd_model: DiffractionModel::Renormalized,
        ..GenerationConfig::default()
    }
}

// ── ScriptedStream ─────────────────────────────────────────────────

/// Replays a fixed list of uniforms, then falls back to a seeded stream.
///
/// Lets a test force the first few draws of a sampler (the process
/// selection, a recoil side) while the rest stays random.
pub struct ScriptedStream {
    script: VecDeque<f64>,
    fallback: ChaCha8Rng,
    drawn: usize,
}

impl ScriptedStream {
    pub fn new(script: impl IntoIterator<Item = f64>, seed: u64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: seeded(seed),
            drawn: 0,
        }
    }

    /// Uniforms handed out so far, scripted or not.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Scripted uniforms not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomStream for ScriptedStream {
    fn uniform(&mut self) -> f64 {
        self.drawn += 1;
        match self.script.pop_front() {
            Some(u) => u,
            None => self.fallback.uniform(),
        }
    }
}

// ── Assertions ─────────────────────────────────────────────────────

/// Final-state four-momentum sums to `(0, 0, 0, sqrt_s)` within
/// [`ENERGY_TOLERANCE`] of `sqrt_s`, and the net charge is zero.
pub fn assert_conserves(event: &Event, sqrt_s: f64) {
    let total = event.final_momentum();
    let diff = total.max_abs_diff(&FourMomentum::at_rest(sqrt_s));
    assert!(
        diff <= ENERGY_TOLERANCE * sqrt_s,
        "{} event off by {diff:.6} GeV: {total:?}",
        event.process()
    );
    assert_eq!(event.final_charge(), 0, "{} event charge", event.process());
    assert!(event.multiplicity() >= 2);
}

/// Every mother and daughter range points inside the event, mothers
/// precede their daughters, and the two directions agree.
pub fn assert_links(event: &Event) {
    let particles = event.particles();
    for (i, p) in particles.iter().enumerate() {
        if let Some(m) = p.mothers {
            assert!(m.last < i, "record {i} has mother range {m:?}");
            for j in m.first..=m.last {
                let mother = &particles[j];
                assert_eq!(mother.status, Status::Intermediate);
                assert!(
                    mother.daughters.is_some_and(|d| d.contains(i)),
                    "record {i} missing from daughters of {j}"
                );
            }
        }
        if let Some(d) = p.daughters {
            assert_eq!(p.status, Status::Intermediate, "final record {i} has daughters");
            assert!(d.last < particles.len());
            for j in d.first..=d.last {
                assert!(
                    particles[j].mothers.is_some_and(|m| m.contains(i)),
                    "record {j} does not name {i} as mother"
                );
            }
        }
        if p.status == Status::Intermediate {
            assert!(p.daughters.is_some(), "intermediate record {i} never fragmented");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_values_come_first() {
        let mut s = ScriptedStream::new([0.25, 0.75], 1);
        assert_eq!(s.uniform(), 0.25);
        assert_eq!(s.uniform(), 0.75);
        assert_eq!(s.remaining(), 0);
        let u = s.uniform();
        assert!((0.0..1.0).contains(&u));
        assert_eq!(s.drawn(), 3);
    }

    #[test]
    fn configs_validate() {
        legacy_config(ProcessSet::ALL).validate().unwrap();
        renormalized_config(ProcessSet::ALL).validate().unwrap();
    }
}
