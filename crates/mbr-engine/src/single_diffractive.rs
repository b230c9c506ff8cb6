//! Single-diffractive events: one beam particle scatters quasi-elastically
//! while the other dissociates into a fireball.

use mbr_core::constants::{MAX_REJECTION_TRIALS, PROTON_MASS};
use mbr_core::{
    accept_reject, FourMomentum, GenerateError, Particle, ParticleArena, ProcessKind, Proposal, RandomStream,
    RetryTally, Species,
};
use mbr_fragment::FireballFragmenter;
use mbr_xsec::{CrossSectionTable, DiffractionModel, GenerationConfig, ReggeParameters};

use crate::diffraction::{place_fireball, transverse_momentum2, MAX_DIFFRACTIVE_ATTEMPTS};
use crate::mass_spectrum::{single_diffractive_t, LegacyMassSpectrum};

/// Two-exponential proton form factor `(a, b)` pairs of the xi density.
const FORM_FACTOR: [(f64, f64); 2] = [(0.9, 4.6), (0.1, 0.6)];

/// Dipole scale of the `t` density, GeV^2.
const DIPOLE_T: f64 = 0.71;

/// The beam particle that survives intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recoil {
    /// The proton recoils; the antiproton dissociates.
    Proton,
    /// The antiproton recoils; the proton dissociates.
    AntiProton,
}

impl Recoil {
    /// Species of the recoil particle.
    pub fn species(self) -> Species {
        match self {
            Self::Proton => Species::Proton,
            Self::AntiProton => Species::AntiProton,
        }
    }

    /// Charge of the dissociated side.
    pub fn fireball_charge(self) -> i32 {
        -self.species().charge()
    }

    /// Sign of the recoil `pz`; the proton beam moves along `+z`.
    fn direction(self) -> f64 {
        match self {
            Self::Proton => 1.0,
            Self::AntiProton => -1.0,
        }
    }
}

/// Renormalized-flux sampler of `xi = M^2 / s` and `t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XiSampler {
    xi_min: f64,
    xi_max: f64,
    regge: ReggeParameters,
}

impl XiSampler {
    /// Density of `xi` up to normalization.
    pub fn xi_density(&self, xi: f64) -> f64 {
        let log_inv = 2.0 * self.regge.alpha_prime * (1.0 / xi).ln();
        let [(a1, b1), (a2, b2)] = FORM_FACTOR;
        xi.powf(-1.0 - self.regge.epsilon) * (a1 / (b1 + log_inv) + a2 / (b2 + log_inv))
    }

    /// Density of `t` at fixed `xi`, up to normalization.
    pub fn t_density(&self, xi: f64, t: f64) -> f64 {
        let mp2 = PROTON_MASS * PROTON_MASS;
        let form = (4.0 * mp2 - 2.8 * t) / ((4.0 * mp2 - t) * (1.0 - t / DIPOLE_T).powi(2));
        form * form * (-2.0 * self.regge.alpha_prime * xi.ln() * t).exp()
    }

    /// Draw `xi` in `[xi_min, xi_max]` against the `1/xi` envelope.
    pub fn sample_xi<R: RandomStream + ?Sized>(&self, rng: &mut R, tally: &mut RetryTally) -> Option<f64> {
        let log_span = (self.xi_max / self.xi_min).ln();
        let accepted = accept_reject(rng, MAX_REJECTION_TRIALS, |r| {
            let xi = self.xi_min * (log_span * r.uniform()).exp();
            Proposal {
                value: xi,
                density: self.xi_density(xi),
                envelope: 1.0 / xi,
            }
        })?;
        tally.envelope_violations += accepted.envelope_violations;
        Some(accepted.value)
    }

    /// Draw `t <= t_min(xi)` against the `e^t` envelope.
    pub fn sample_t<R: RandomStream + ?Sized>(&self, xi: f64, rng: &mut R, tally: &mut RetryTally) -> Option<f64> {
        let t_min = -PROTON_MASS * PROTON_MASS * xi * xi / (1.0 - xi);
        let accepted = accept_reject(rng, MAX_REJECTION_TRIALS, |r| {
            let t = t_min + (1.0 - r.uniform()).ln();
            Proposal {
                value: t,
                density: self.t_density(xi, t),
                envelope: t.exp(),
            }
        })?;
        tally.envelope_violations += accepted.envelope_violations;
        Some(accepted.value)
    }
}

/// How the diffractive mass and `t` are drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SingleDiffractiveKinematics {
    /// Legacy mass spectrum and mass-dependent `t` slope.
    Legacy {
        /// Mass sampler.
        spectrum: LegacyMassSpectrum,
        /// Base `t` slope, GeV^-2.
        slope: f64,
    },
    /// Renormalized pomeron flux in `xi`.
    Renormalized(XiSampler),
}

/// Generator of single-diffractive events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleDiffractiveGenerator {
    sqrt_s: f64,
    forced: Option<Recoil>,
    kinematics: SingleDiffractiveKinematics,
}

impl SingleDiffractiveGenerator {
    /// Generator for `config` and its initialized `table`.
    pub fn new(config: &GenerationConfig, table: &CrossSectionTable) -> Self {
        let w = &table.window;
        let forced = if config.force_proton_dissociation {
            Some(Recoil::AntiProton)
        } else if config.force_antiproton_dissociation {
            Some(Recoil::Proton)
        } else {
            None
        };
        let kinematics = match config.sd_model {
            DiffractionModel::Legacy => SingleDiffractiveKinematics::Legacy {
                spectrum: LegacyMassSpectrum::new(table, config.regge.epsilon),
                slope: w.sd_slope,
            },
            DiffractionModel::Renormalized => SingleDiffractiveKinematics::Renormalized(XiSampler {
                xi_min: w.xi_min,
                xi_max: w.xi_max,
                regge: config.regge,
            }),
        };
        Self {
            sqrt_s: w.sqrt_s,
            forced,
            kinematics,
        }
    }

    /// The side forced to recoil, if any.
    pub fn forced(&self) -> Option<Recoil> {
        self.forced
    }

    /// The sampling model in use.
    pub fn kinematics(&self) -> &SingleDiffractiveKinematics {
        &self.kinematics
    }

    /// Append the recoil, the fireball, and its fragments to `arena`.
    ///
    /// The recoil is a final-state particle recorded first; the
    /// dissociated side follows as a cluster. Each attempt picks the
    /// side again and draws a new mass and `t`.
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
            let recoil = self.choose_side(rng);
            let Some((mass, t)) = self.draw(rng, tally) else {
                continue;
            };
            let Some((recoil_momentum, fireball_momentum)) = self.recoil(recoil, mass, t, rng) else {
                continue;
            };
            arena.push(Particle::final_state(recoil.species(), recoil_momentum));
            let fireball = place_fireball(arena, fireball_momentum, mass, recoil.fireball_charge());
            match fragmenter.fragment(arena, &fireball, rng, tally) {
                Ok(_) => return Ok(()),
                Err(e) => last = Some(e),
            }
        }
        arena.truncate(start);
        Err(GenerateError::KinematicsExhausted {
            process: ProcessKind::SingleDiffractive,
            attempts: MAX_DIFFRACTIVE_ATTEMPTS,
            last,
        })
    }

    fn choose_side<R: RandomStream + ?Sized>(&self, rng: &mut R) -> Recoil {
        match self.forced {
            Some(side) => side,
            None if rng.uniform() >= 0.5 => Recoil::Proton,
            None => Recoil::AntiProton,
        }
    }

    /// Diffractive mass and `t`, or `None` when a sampler gave up.
    fn draw<R: RandomStream + ?Sized>(&self, rng: &mut R, tally: &mut RetryTally) -> Option<(f64, f64)> {
        match &self.kinematics {
            SingleDiffractiveKinematics::Legacy { spectrum, slope } => {
                let mass = spectrum.sample(rng);
                Some((mass, single_diffractive_t(mass, *slope, rng)))
            }
            SingleDiffractiveKinematics::Renormalized(sampler) => {
                let xi = sampler.sample_xi(rng, tally)?;
                let t = sampler.sample_t(xi, rng, tally)?;
                Some(((xi * self.sqrt_s * self.sqrt_s).sqrt(), t))
            }
        }
    }

    /// Recoil and fireball momenta, or `None` when forbidden.
    fn recoil<R: RandomStream + ?Sized>(
        &self,
        recoil: Recoil,
        mass: f64,
        t: f64,
        rng: &mut R,
    ) -> Option<(FourMomentum, FourMomentum)> {
        let sqrt_s = self.sqrt_s;
        let mp2 = PROTON_MASS * PROTON_MASS;
        let e_recoil = 0.5 * (sqrt_s - (mass * mass - mp2) / sqrt_s);
        let p2 = e_recoil * e_recoil - mp2;
        let pt2 = transverse_momentum2(mass, t, sqrt_s * sqrt_s);
        if pt2 <= 0.0 || p2 <= pt2 {
            return None;
        }
        let pt = pt2.sqrt();
        let pz = recoil.direction() * (p2 - pt2).sqrt();
        let (sin_phi, cos_phi) = rng.azimuth().sin_cos();
        let (px, py) = (pt * cos_phi, pt * sin_phi);
        Some((
            FourMomentum::on_shell(px, py, pz, recoil.species().mass()),
            FourMomentum::on_shell(-px, -py, -pz, mass),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_test_utils::{legacy_config, renormalized_config, seeded};
    use mbr_xsec::{CrossSectionModel, ProcessSet};

    fn build(cfg: &GenerationConfig) -> SingleDiffractiveGenerator {
        let table = CrossSectionModel::initialize(cfg).unwrap();
        SingleDiffractiveGenerator::new(cfg, &table)
    }

    fn run(generator: &SingleDiffractiveGenerator, seed: u64) -> ParticleArena {
        let fragmenter = FireballFragmenter::default();
        let mut rng = seeded(seed);
        let mut arena = ParticleArena::new();
        let mut tally = RetryTally::default();
        generator.generate(&fragmenter, &mut arena, &mut rng, &mut tally).unwrap();
        arena
    }

    #[test]
    fn forced_proton_dissociation_recoils_antiproton() {
        let mut cfg = renormalized_config(ProcessSet::only(ProcessKind::SingleDiffractive));
        cfg.force_proton_dissociation = true;
        let generator = build(&cfg);
        assert_eq!(generator.forced(), Some(Recoil::AntiProton));
        for seed in 0..10 {
            let arena = run(&generator, seed);
            let first = &arena.particles()[0];
            assert_eq!(first.species, Species::AntiProton);
            assert!(first.is_final());
            assert!(first.momentum.pz < 0.0);
            let net: i32 = arena.tail(2).iter().map(|p| p.charge()).sum();
            assert_eq!(net, 1);
        }
    }

    #[test]
    fn forced_antiproton_dissociation_recoils_proton() {
        let mut cfg = legacy_config(ProcessSet::only(ProcessKind::SingleDiffractive));
        cfg.force_antiproton_dissociation = true;
        let generator = build(&cfg);
        for seed in 0..10 {
            let arena = run(&generator, seed);
            assert_eq!(arena.particles()[0].species, Species::Proton);
            assert!(arena.particles()[0].momentum.pz > 0.0);
        }
    }

    #[test]
    fn both_sides_occur_unforced() {
        let cfg = legacy_config(ProcessSet::only(ProcessKind::SingleDiffractive));
        let generator = build(&cfg);
        let mut protons = 0;
        for seed in 0..40 {
            if run(&generator, seed).particles()[0].species == Species::Proton {
                protons += 1;
            }
        }
        assert!(protons > 5 && protons < 35, "{protons} proton recoils");
    }

    #[test]
    fn events_conserve_energy() {
        let cfg = renormalized_config(ProcessSet::only(ProcessKind::SingleDiffractive));
        let generator = build(&cfg);
        let sqrt_s = cfg.sqrt_s();
        for seed in 0..10 {
            let arena = run(&generator, seed);
            let finals: Vec<_> = arena.particles().iter().filter(|p| p.is_final()).collect();
            let e: f64 = finals.iter().map(|p| p.momentum.e).sum();
            assert!((e - sqrt_s).abs() <= 1e-3 * sqrt_s, "E = {e}");
            assert_eq!(finals.iter().map(|p| p.charge()).sum::<i32>(), 0);
        }
    }

    #[test]
    fn xi_stays_in_window() {
        let cfg = renormalized_config(ProcessSet::only(ProcessKind::SingleDiffractive));
        let SingleDiffractiveKinematics::Renormalized(sampler) = *build(&cfg).kinematics() else {
            panic!("renormalized model expected");
        };
        let mut rng = seeded(21);
        let mut tally = RetryTally::default();
        let (lo, hi) = (cfg.resolved_xi_min(), cfg.xi_max);
        for _ in 0..5_000 {
            let xi = sampler.sample_xi(&mut rng, &mut tally).unwrap();
            assert!(xi >= lo * (1.0 - 1e-12) && xi <= hi * (1.0 + 1e-12), "xi {xi}");
            let t = sampler.sample_t(xi, &mut rng, &mut tally).unwrap();
            assert!(t < 0.0);
        }
    }

    #[test]
    fn xi_envelope_holds() {
        let sampler = XiSampler {
            xi_min: 1e-7,
            xi_max: 0.15,
            regge: ReggeParameters::default(),
        };
        for k in 0..=100 {
            let xi = 1e-7 * (0.15f64 / 1e-7).powf(k as f64 / 100.0);
            assert!(sampler.xi_density(xi) <= 1.0 / xi);
        }
    }
}
