//! The fireball fragmentation state machine.
//!
//! ```text
//! SampleMultiplicity ──► SampleKinematics ──► BalanceMomentum ──► Success
//!        ▲                     ▲                    │
//!        │                     └── RetryKinematics ◄┤ (<= 10 per multiplicity)
//!        └────────────────────── RetryMultiplicity ◄┘ (<= 10, then Exhausted)
//! ```
//!
//! Exact two- and three-body decays never reach the balancing step; they
//! either succeed at once or fail below threshold.

use std::borrow::Cow;

use mbr_core::{
    FragmentError, Fireball, FourMomentum, Particle, ParticleArena, ParticleRange, RandomStream, RetryTally, Species,
};

use crate::balance::{balance_momentum, longitudinal_power};
use crate::decay::{three_body, two_body, PolarAngleTable};
use crate::kinematics::{daughter_momentum, PtSpectrum};
use crate::multiplicity::MultiplicityModel;
use crate::plan::{DecayMode, FragmentPlan};

/// Multiplicity draws per fireball before giving up.
pub const MAX_MULTIPLICITY_ATTEMPTS: u32 = 10;

/// Kinematics draws per multiplicity before drawing a new one.
pub const MAX_KINEMATICS_ATTEMPTS: u32 = 10;

/// Tunable inputs of the fragmentation model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmenterParams {
    /// Factor applied to the average multiplicity. Default: 1.15.
    pub multiplicity_scale: f64,
    /// Probability that the leading nucleon of a charged fireball is
    /// charged. Default: 0.5.
    pub leading_charged_fraction: f64,
}

impl Default for FragmenterParams {
    fn default() -> Self {
        Self {
            multiplicity_scale: 1.15,
            leading_charged_fraction: 0.5,
        }
    }
}

/// Turns fireballs into final-state hadrons.
///
/// Holds the tables shared by every fireball; stateless otherwise, so
/// one instance serves any number of events and threads.
#[derive(Clone, Debug)]
pub struct FireballFragmenter {
    params: FragmenterParams,
    polar: PolarAngleTable,
    low_mass_pt: PtSpectrum,
}

impl FireballFragmenter {
    /// Build a fragmenter and its tables.
    pub fn new(params: FragmenterParams) -> Self {
        Self {
            params,
            polar: PolarAngleTable::new(),
            low_mass_pt: PtSpectrum::new(0.0),
        }
    }

    /// Model parameters.
    pub fn params(&self) -> &FragmenterParams {
        &self.params
    }

    /// Fragment `fireball`, whose intermediate record already sits in
    /// `arena` at `fireball.index`.
    ///
    /// On success the daughters are appended in the event frame with
    /// their mother link set, the fireball record points at them, and
    /// their position range is returned. On failure the arena is left
    /// at its length on entry. Retries are added to `tally`.
    pub fn fragment<R: RandomStream + ?Sized>(
        &self,
        arena: &mut ParticleArena,
        fireball: &Fireball,
        rng: &mut R,
        tally: &mut RetryTally,
    ) -> Result<ParticleRange, FragmentError> {
        let mass = fireball.mass;
        let model = MultiplicityModel::new(mass, self.params.multiplicity_scale)?;
        let spectrum = if self.low_mass_pt.serves(mass) {
            Cow::Borrowed(&self.low_mass_pt)
        } else {
            Cow::Owned(PtSpectrum::new(mass))
        };
        let start = arena.len();

        let mut attempt = 0;
        loop {
            attempt += 1;
            if attempt > 1 {
                tally.multiplicity_retries += 1;
            }
            let drawn = FragmentPlan::draw(&model, fireball.charge, self.params.leading_charged_fraction, rng)?;
            tally.envelope_violations += drawn.envelope_violations;
            let plan = drawn.value;

            match plan.mode {
                DecayMode::TwoBody(species) => {
                    let momenta = two_body(mass, species, &self.polar, rng)?;
                    return Ok(self.emit(arena, fireball, species.into_iter().zip(momenta)));
                }
                DecayMode::ThreeBody(species) => {
                    let momenta = three_body(mass, species, &self.polar, rng)?;
                    return Ok(self.emit(arena, fireball, species.into_iter().zip(momenta)));
                }
                DecayMode::Independent => {}
            }

            let multiplicity = plan.len();
            let power = longitudinal_power(fireball.origin, mass, multiplicity);
            let mut kinematics = 0;
            let last = loop {
                kinematics += 1;
                if kinematics > 1 {
                    tally.kinematics_retries += 1;
                }
                arena.truncate(start);
                for species in plan.species() {
                    let momentum = daughter_momentum(species, mass, multiplicity, &spectrum, rng);
                    arena.push(Particle::final_state(species, momentum).with_mother(fireball.index));
                }
                match balance_momentum(arena.tail_mut(start), mass, power) {
                    Ok(report) => {
                        tracing::trace!(
                            "Balanced {} daughters of mass {:.3} in {} iterations",
                            multiplicity,
                            mass,
                            report.iterations
                        );
                        return Ok(self.finish(arena, fireball, start));
                    }
                    Err(e) if kinematics >= MAX_KINEMATICS_ATTEMPTS => break e,
                    Err(_) => {}
                }
            };
            arena.truncate(start);
            if attempt >= MAX_MULTIPLICITY_ATTEMPTS {
                return Err(FragmentError::Exhausted { attempts: attempt, last });
            }
        }
    }

    /// Append rest-frame daughters and finish the fireball.
    fn emit(
        &self,
        arena: &mut ParticleArena,
        fireball: &Fireball,
        daughters: impl Iterator<Item = (Species, FourMomentum)>,
    ) -> ParticleRange {
        let start = arena.len();
        for (species, momentum) in daughters {
            arena.push(Particle::final_state(species, momentum).with_mother(fireball.index));
        }
        self.finish(arena, fireball, start)
    }

    /// Boost the daughters from `start` on into the event frame and link
    /// them to their fireball.
    fn finish(&self, arena: &mut ParticleArena, fireball: &Fireball, start: usize) -> ParticleRange {
        for daughter in arena.tail_mut(start) {
            daughter.momentum = fireball.boost.apply(&daughter.momentum);
        }
        let range = ParticleRange {
            first: start,
            last: arena.len().saturating_sub(1),
        };
        arena.link_daughters(fireball.index, range);
        range
    }
}

impl Default for FireballFragmenter {
    fn default() -> Self {
        Self::new(FragmenterParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_core::{Boost, FireballOrigin};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn place(arena: &mut ParticleArena, momentum: FourMomentum, mass: f64, charge: i32, origin: FireballOrigin) -> Fireball {
        let index = arena.push(Particle::cluster(momentum, mass));
        Fireball {
            index,
            mass,
            charge,
            boost: Boost::from_rest_frame(&momentum, mass),
            origin,
        }
    }

    fn daughters_sum(arena: &ParticleArena, range: ParticleRange) -> FourMomentum {
        arena.particles()[range.as_range()].iter().map(|p| p.momentum).sum()
    }

    #[test]
    fn hard_core_fireball_conserves_energy_and_charge() {
        let fragmenter = FireballFragmenter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..20 {
            let mut arena = ParticleArena::new();
            let fb = place(&mut arena, FourMomentum::at_rest(1800.0), 1800.0, 0, FireballOrigin::HardCore);
            let mut tally = RetryTally::default();
            let range = fragmenter.fragment(&mut arena, &fb, &mut rng, &mut tally).unwrap();
            assert_eq!(range.first, 1);
            assert_eq!(range.last, arena.len() - 1);
            assert!(range.len() >= 2);
            let sum = daughters_sum(&arena, range);
            assert!(sum.px.abs() < 1e-6 && sum.py.abs() < 1e-6);
            assert!((sum.e - 1800.0).abs() <= 1.8);
            let charge: i32 = arena.particles()[range.as_range()].iter().map(|p| p.charge()).sum();
            assert_eq!(charge, 0);
            assert_eq!(arena.get(0).and_then(|p| p.daughters), Some(range));
            assert!(arena.tail(1).iter().all(|p| p.mothers == Some(ParticleRange::single(0))));
        }
    }

    #[test]
    fn moving_fireball_daughters_carry_its_momentum() {
        let fragmenter = FireballFragmenter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let mass = 20.0;
        let momentum = FourMomentum::on_shell(0.5, -0.3, 300.0, mass);
        for charge in [1, -1] {
            let mut arena = ParticleArena::new();
            let fb = place(&mut arena, momentum, mass, charge, FireballOrigin::Diffractive);
            let mut tally = RetryTally::default();
            let range = fragmenter.fragment(&mut arena, &fb, &mut rng, &mut tally).unwrap();
            let sum = daughters_sum(&arena, range);
            assert!((sum.pz - momentum.pz).abs() <= 1.5e-3 * momentum.e, "pz {}", sum.pz);
            assert!((sum.e - momentum.e).abs() <= 1.5e-3 * momentum.e, "E {}", sum.e);
            let net: i32 = arena.tail(1).iter().map(|p| p.charge()).sum();
            assert_eq!(net, charge);
        }
    }

    #[test]
    fn light_fireball_decays_exactly() {
        let fragmenter = FireballFragmenter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            let mut arena = ParticleArena::new();
            let fb = place(&mut arena, FourMomentum::at_rest(1.25), 1.25, 1, FireballOrigin::Diffractive);
            let mut tally = RetryTally::default();
            let range = fragmenter.fragment(&mut arena, &fb, &mut rng, &mut tally).unwrap();
            assert!(range.len() == 2 || range.len() == 3);
            let sum = daughters_sum(&arena, range);
            assert!((sum.e - 1.25).abs() < 1e-9);
            assert!(!tally.any_retry());
        }
    }

    #[test]
    fn below_threshold_fails_and_leaves_arena_untouched() {
        let fragmenter = FireballFragmenter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut arena = ParticleArena::new();
        let fb = place(&mut arena, FourMomentum::at_rest(1.0), 1.0, 1, FireballOrigin::Diffractive);
        let mut tally = RetryTally::default();
        let err = fragmenter.fragment(&mut arena, &fb, &mut rng, &mut tally).unwrap_err();
        assert!(matches!(err, FragmentError::BelowThreshold { .. }));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn fragmentation_is_reproducible() {
        let fragmenter = FireballFragmenter::default();
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut arena = ParticleArena::new();
            let fb = place(&mut arena, FourMomentum::at_rest(200.0), 200.0, 0, FireballOrigin::HardCore);
            let mut tally = RetryTally::default();
            fragmenter.fragment(&mut arena, &fb, &mut rng, &mut tally).unwrap();
            (arena.particles().to_vec(), tally)
        };
        assert_eq!(run(99), run(99));
    }
}
