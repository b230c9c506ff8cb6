//! Double-diffractive events: proton and antiproton both dissociate
//! into fireballs recoiling against each other.

use mbr_core::constants::MAX_REJECTION_TRIALS;
use mbr_core::{
    accept_reject, FourMomentum, GenerateError, ParticleArena, ProcessKind, Proposal, RandomStream, RetryTally,
};
use mbr_fragment::FireballFragmenter;
use mbr_xsec::{CrossSectionTable, DiffractionModel, GapDensity, GenerationConfig};

use crate::diffraction::{place_fireball, transverse_momentum2, MAX_DIFFRACTIVE_ATTEMPTS};
use crate::mass_spectrum::LegacyMassSpectrum;

/// Momentum transfer of the legacy model, GeV^2.
const LEGACY_T: f64 = 1.0;

/// Rapidity-gap sampler of the renormalized-flux model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapSampler {
    density: GapDensity,
    envelope: f64,
    gap_min: f64,
    sqrt_s: f64,
}

/// Masses and momentum transfer of one double-diffractive attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GapDraw {
    /// Proton-side mass, GeV.
    pub proton_mass: f64,
    /// Antiproton-side mass, GeV.
    pub antiproton_mass: f64,
    /// Momentum transfer, GeV^2; only `|t|` enters the kinematics.
    pub t: f64,
}

impl GapSampler {
    /// Width of the sampled gap window, `[gap_min, ln(s / mass_min^4)]`.
    pub fn gap_range(&self) -> (f64, f64) {
        (self.gap_min, self.density.log_range)
    }

    /// Draw a gap, its centre, and `t`.
    ///
    /// The gap width is accepted against the flux density bounded by the
    /// tabulated maximum; candidates above that bound are counted in
    /// `tally` and logged. `None` when a rejection loop hits its cap.
    pub fn sample<R: RandomStream + ?Sized>(&self, rng: &mut R, tally: &mut RetryTally) -> Option<GapDraw> {
        let (lo, hi) = self.gap_range();
        let density = self.density;
        let envelope = self.envelope;
        let accepted = accept_reject(rng, MAX_REJECTION_TRIALS, |r| {
            let dy = lo + (hi - lo) * r.uniform();
            let value = density.eval(dy);
            if value > envelope {
                tracing::warn!("Gap density {:.6} above envelope {:.6} at dy = {:.4}", value, envelope, dy);
            }
            Proposal {
                value: dy,
                density: value,
                envelope,
            }
        })?;
        tally.envelope_violations += accepted.envelope_violations;
        let dy = accepted.value;

        let half = 0.5 * (hi - dy);
        let centre = -half + 2.0 * half * rng.uniform();
        let proton_mass = (self.sqrt_s * (-centre - 0.5 * dy).exp()).sqrt();
        let antiproton_mass = (self.sqrt_s * (centre - 0.5 * dy).exp()).sqrt();

        let slope = 2.0 * density.alpha_prime * dy;
        let cutoff = dy.exp();
        for _ in 0..MAX_REJECTION_TRIALS {
            let t = (1.0 - rng.uniform()).ln() / slope;
            if -t <= cutoff {
                return Some(GapDraw {
                    proton_mass,
                    antiproton_mass,
                    t,
                });
            }
        }
        None
    }
}

/// How the two masses and `t` are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DoubleDiffractiveKinematics {
    /// Independent masses from the legacy spectrum, fixed `t`.
    Legacy(LegacyMassSpectrum),
    /// Rapidity gap from the renormalized pomeron flux.
    Renormalized(GapSampler),
}

/// Generator of double-diffractive events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleDiffractiveGenerator {
    sqrt_s: f64,
    kinematics: DoubleDiffractiveKinematics,
}

impl DoubleDiffractiveGenerator {
    /// Generator for `config` and its initialized `table`.
    pub fn new(config: &GenerationConfig, table: &CrossSectionTable) -> Self {
        let w = &table.window;
        let kinematics = match (config.dd_model, table.flux.dd_density_max) {
            (DiffractionModel::Renormalized, Some(envelope)) => DoubleDiffractiveKinematics::Renormalized(GapSampler {
                density: GapDensity {
                    log_range: w.gap_max,
                    alpha_prime: config.regge.alpha_prime,
                    exponent: config.regge.epsilon,
                },
                envelope,
                gap_min: w.gap_min,
                sqrt_s: w.sqrt_s,
            }),
            _ => DoubleDiffractiveKinematics::Legacy(LegacyMassSpectrum::new(table, config.regge.epsilon)),
        };
        Self {
            sqrt_s: w.sqrt_s,
            kinematics,
        }
    }

    /// The sampling model in use.
    pub fn kinematics(&self) -> &DoubleDiffractiveKinematics {
        &self.kinematics
    }

    /// Append both fireballs and their fragments to `arena`.
    ///
    /// Proton side first with charge +1 and `pz > 0`, then the
    /// antiproton side with charge -1. Each attempt draws new masses and
    /// `t`; forbidden kinematics or a failed fragmentation start the next
    /// attempt from a clean arena.
    pub fn generate<R: RandomStream + ?Sized>(
        &self,
        fragmenter: &FireballFragmenter,
        arena: &mut ParticleArena,
        rng: &mut R,
        tally: &mut RetryTally,
    ) -> Result<(), GenerateError> {
        let start = arena.len();
        let mut last = None;
        for attempt in 1..=MAX_DIFFRACTIVE_ATTEMPTS {
            if attempt > 1 {
                tally.mass_retries += 1;
            }
            arena.truncate(start);
            let Some(draw) = self.draw(rng, tally) else {
                continue;
            };
            let Some([p1, p2]) = self.recoil(&draw, rng) else {
                continue;
            };
            let proton_side = place_fireball(arena, p1, draw.proton_mass, 1);
            let antiproton_side = place_fireball(arena, p2, draw.antiproton_mass, -1);
            let fragmented = fragmenter
                .fragment(arena, &proton_side, rng, tally)
                .and_then(|_| fragmenter.fragment(arena, &antiproton_side, rng, tally));
            match fragmented {
                Ok(_) => return Ok(()),
                Err(e) => last = Some(e),
            }
        }
        arena.truncate(start);
        Err(GenerateError::KinematicsExhausted {
            process: ProcessKind::DoubleDiffractive,
            attempts: MAX_DIFFRACTIVE_ATTEMPTS,
            last,
        })
    }

    fn draw<R: RandomStream + ?Sized>(&self, rng: &mut R, tally: &mut RetryTally) -> Option<GapDraw> {
        match &self.kinematics {
            DoubleDiffractiveKinematics::Legacy(spectrum) => Some(GapDraw {
                proton_mass: spectrum.sample(rng),
                antiproton_mass: spectrum.sample(rng),
                t: LEGACY_T,
            }),
            DoubleDiffractiveKinematics::Renormalized(gap) => gap.sample(rng, tally),
        }
    }

    /// Back-to-back fireball momenta, or `None` when forbidden.
    fn recoil<R: RandomStream + ?Sized>(&self, draw: &GapDraw, rng: &mut R) -> Option<[FourMomentum; 2]> {
        let sqrt_s = self.sqrt_s;
        let (m1, m2) = (draw.proton_mass, draw.antiproton_mass);
        let e1 = 0.5 * (sqrt_s + (m1 * m1 - m2 * m2) / sqrt_s);
        let p2 = e1 * e1 - m1 * m1;
        let pt2 = transverse_momentum2(m1, draw.t, sqrt_s * sqrt_s);
        if pt2 <= 0.0 || p2 <= pt2 {
            return None;
        }
        let pt = pt2.sqrt();
        let pz = (p2 - pt2).sqrt();
        let (sin_phi, cos_phi) = rng.azimuth().sin_cos();
        let (px, py) = (pt * cos_phi, pt * sin_phi);
        Some([
            FourMomentum::on_shell(px, py, pz, m1),
            FourMomentum::on_shell(-px, -py, -pz, m2),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_core::{Species, Status};
    use mbr_test_utils::{legacy_config, renormalized_config, seeded};
    use mbr_xsec::{CrossSectionModel, ProcessSet};

    fn build(cfg: &GenerationConfig) -> DoubleDiffractiveGenerator {
        let table = CrossSectionModel::initialize(cfg).unwrap();
        DoubleDiffractiveGenerator::new(cfg, &table)
    }

    fn check_event(arena: &ParticleArena, sqrt_s: f64) {
        let clusters: Vec<_> = arena.particles().iter().take(2).collect();
        assert!(clusters.iter().all(|p| p.species == Species::Cluster && p.status == Status::Intermediate));
        assert!(clusters[0].momentum.pz > 0.0);
        let sum = clusters[0].momentum + clusters[1].momentum;
        assert!(sum.max_abs_diff(&FourMomentum::at_rest(sqrt_s)) < 1e-6 * sqrt_s);

        let finals: Vec<_> = arena.particles().iter().filter(|p| p.is_final()).collect();
        assert_eq!(finals.iter().map(|p| p.charge()).sum::<i32>(), 0);
        let e: f64 = finals.iter().map(|p| p.momentum.e).sum();
        assert!((e - sqrt_s).abs() <= 1e-3 * sqrt_s, "E = {e}");
        let proton_side: i32 = arena
            .tail(2)
            .iter()
            .filter(|p| p.mothers.map(|m| m.first) == Some(0))
            .map(|p| p.charge())
            .sum();
        assert_eq!(proton_side, 1);
    }

    #[test]
    fn legacy_events_conserve() {
        let cfg = legacy_config(ProcessSet::only(ProcessKind::DoubleDiffractive));
        let generator = build(&cfg);
        assert!(matches!(generator.kinematics(), DoubleDiffractiveKinematics::Legacy(_)));
        let fragmenter = FireballFragmenter::default();
        let mut rng = seeded(11);
        for _ in 0..20 {
            let mut arena = ParticleArena::new();
            let mut tally = RetryTally::default();
            generator.generate(&fragmenter, &mut arena, &mut rng, &mut tally).unwrap();
            check_event(&arena, cfg.sqrt_s());
        }
    }

    #[test]
    fn renormalized_events_conserve() {
        let cfg = renormalized_config(ProcessSet::only(ProcessKind::DoubleDiffractive));
        let generator = build(&cfg);
        assert!(matches!(generator.kinematics(), DoubleDiffractiveKinematics::Renormalized(_)));
        let fragmenter = FireballFragmenter::default();
        let mut rng = seeded(12);
        for _ in 0..20 {
            let mut arena = ParticleArena::new();
            let mut tally = RetryTally::default();
            generator.generate(&fragmenter, &mut arena, &mut rng, &mut tally).unwrap();
            check_event(&arena, cfg.sqrt_s());
        }
    }

    #[test]
    fn gap_masses_respect_the_window() {
        let cfg = renormalized_config(ProcessSet::only(ProcessKind::DoubleDiffractive));
        let DoubleDiffractiveKinematics::Renormalized(gap) = *build(&cfg).kinematics() else {
            panic!("renormalized model expected");
        };
        let (lo, hi) = gap.gap_range();
        let mut rng = seeded(5);
        let mut tally = RetryTally::default();
        for _ in 0..2_000 {
            let draw = gap.sample(&mut rng, &mut tally).unwrap();
            assert!(draw.proton_mass >= cfg.mass_min - 1e-9);
            assert!(draw.antiproton_mass >= cfg.mass_min - 1e-9);
            // the product of the two masses fixes the gap
            let dy = 2.0 * (cfg.sqrt_s() / (draw.proton_mass * draw.antiproton_mass)).ln();
            assert!(dy >= lo - 1e-9 && dy <= hi + 1e-9, "dy {dy}");
            assert!(draw.t <= 0.0 && -draw.t <= dy.exp() * (1.0 + 1e-12));
        }
    }
}
