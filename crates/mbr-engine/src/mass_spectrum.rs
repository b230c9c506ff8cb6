//! Legacy diffractive-mass spectrum and single-diffractive momentum
//! transfer.
//!
//! The spectrum mixes five channels with the cumulative weights
//! `drate` of the cross-section table: a `1/M^(2+2 eps)` continuum,
//! three Gaussian N* resonance bands in `M^2`, and a flat `M^2`
//! rectangle near threshold. Every draw lands inside the configured
//! mass window.

use std::f64::consts::SQRT_2;

use mbr_core::RandomStream;
use mbr_xsec::CrossSectionTable;

/// Gaussian draws per resonance before falling back to its centre.
pub const MAX_RESONANCE_DRAWS: u32 = 20;

/// Upper `|t|` of the legacy single-diffractive law, GeV^2.
const SD_T_MAX: f64 = 1.0;

/// One resonance band, all values in GeV^2.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Resonance {
    mean: f64,
    sigma: f64,
    min: f64,
    max: f64,
}

const RESONANCES: [Resonance; 3] = [
    Resonance {
        mean: 2.2,
        sigma: 0.3,
        min: 1.5,
        max: 2.5,
    },
    Resonance {
        mean: 2.8,
        sigma: 0.3,
        min: 2.5,
        max: 4.0,
    },
    Resonance {
        mean: 4.4,
        sigma: 0.8,
        min: 3.0,
        max: f64::INFINITY,
    },
];

/// Sampler of the legacy diffractive mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegacyMassSpectrum {
    drate: [f64; 5],
    epsilon: f64,
    continuum_min: f64,
    mass_min: f64,
    mass_max: f64,
    rectangle_max2: f64,
}

impl LegacyMassSpectrum {
    /// Spectrum for the window and channel rates of `table`. `epsilon`
    /// steepens the continuum; zero gives a log-uniform mass.
    pub fn new(table: &CrossSectionTable, epsilon: f64) -> Self {
        let w = &table.window;
        Self {
            drate: table.drate,
            epsilon,
            continuum_min: w.continuum_min,
            mass_min: w.mass_min,
            mass_max: w.mass_max,
            rectangle_max2: w.rectangle_max2,
        }
    }

    /// Draw a diffractive mass in GeV.
    pub fn sample<R: RandomStream + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = rng.uniform();
        let channel = self.drate.iter().position(|&r| u < r).unwrap_or(0);
        match channel {
            1..=3 => self.resonance(&RESONANCES[channel - 1], rng),
            4 => {
                let min2 = self.mass_min * self.mass_min;
                (min2 + (self.rectangle_max2 - min2) * rng.uniform()).sqrt()
            }
            _ => self.continuum(rng.uniform()),
        }
    }

    /// Continuum quantile at `u`, kept inside the mass window.
    fn continuum(&self, u: f64) -> f64 {
        let (lo, hi) = (self.continuum_min, self.mass_max);
        let m = if self.epsilon == 0.0 {
            lo * (hi / lo).powf(u)
        } else {
            let k = 2.0 * self.epsilon;
            lo * hi / ((1.0 - u) * hi.powf(k) + u * lo.powf(k)).powf(1.0 / k)
        };
        m.clamp(self.mass_min, self.mass_max)
    }

    fn resonance<R: RandomStream + ?Sized>(&self, band: &Resonance, rng: &mut R) -> f64 {
        let min2 = band.min.max(self.mass_min * self.mass_min);
        let max2 = band.max.min(self.mass_max * self.mass_max);
        for _ in 0..MAX_RESONANCE_DRAWS {
            let m2 = rng.gaussian(band.mean, band.sigma);
            if (min2..=max2).contains(&m2) {
                return m2.sqrt();
            }
        }
        band.mean.sqrt().clamp(self.mass_min, self.mass_max)
    }
}

/// Legacy momentum transfer `t <= 0` of a single-diffractive system of
/// `mass`, with base slope `base_slope` (GeV^-2).
///
/// The slope is enhanced near `M = sqrt(2)` and `|t|` is truncated at 1.
pub fn single_diffractive_t<R: RandomStream + ?Sized>(mass: f64, base_slope: f64, rng: &mut R) -> f64 {
    let b = base_slope * (1.0 + 0.04 / ((mass - SQRT_2).powi(2) + 0.02));
    let norm = 1.0 - (-b * SD_T_MAX).exp();
    (1.0 - rng.uniform() * norm).ln() / b
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_test_utils::{legacy_config, seeded};
    use mbr_xsec::{CrossSectionModel, ProcessSet};

    fn spectrum(cfg: mbr_xsec::GenerationConfig) -> LegacyMassSpectrum {
        let table = CrossSectionModel::initialize(&cfg).unwrap();
        LegacyMassSpectrum::new(&table, cfg.regge.epsilon)
    }

    #[test]
    fn masses_stay_in_window() {
        let s = spectrum(legacy_config(ProcessSet::ALL));
        let mut rng = seeded(3);
        for _ in 0..20_000 {
            let m = s.sample(&mut rng);
            assert!(m >= s.mass_min - 1e-12 && m <= s.mass_max + 1e-12, "{m}");
        }
    }

    #[test]
    fn continuum_spans_its_range() {
        let s = spectrum(legacy_config(ProcessSet::ALL));
        assert!((s.continuum(0.0) - s.continuum_min).abs() < 1e-9);
        assert!((s.continuum(1.0 - 1e-15) - s.mass_max).abs() < 1e-6 * s.mass_max);
        let mut rng = seeded(9);
        for _ in 0..5_000 {
            let m = s.continuum(rng.uniform());
            assert!(m >= s.continuum_min - 1e-9 && m <= s.mass_max + 1e-9);
        }
    }

    #[test]
    fn log_uniform_without_epsilon() {
        let mut cfg = legacy_config(ProcessSet::ALL);
        cfg.regge.epsilon = 0.0;
        let s = spectrum(cfg);
        let mid = s.continuum(0.5);
        let geometric = (s.continuum_min * s.mass_max).sqrt();
        assert!((mid - geometric).abs() < 1e-9 * geometric);
    }

    #[test]
    fn low_masses_are_populated_by_resonances() {
        let s = spectrum(legacy_config(ProcessSet::ALL));
        let mut rng = seeded(4);
        let n = 20_000;
        let low = (0..n).filter(|_| s.sample(&mut rng) < 2.0).count();
        assert!(low > n / 20, "only {low} of {n} below 2 GeV");
    }

    #[test]
    fn narrow_window_fallback_stays_inside() {
        let mut cfg = legacy_config(ProcessSet::ALL);
        cfg.mass_min = 1.3;
        cfg.mass_max = Some(1.31);
        let s = spectrum(cfg);
        let mut rng = seeded(8);
        for _ in 0..2_000 {
            let m = s.sample(&mut rng);
            assert!((1.3..=1.31).contains(&m), "{m}");
        }
    }

    #[test]
    fn sd_t_is_bounded() {
        let mut rng = seeded(2);
        for mass in [1.3, SQRT_2, 5.0, 200.0] {
            for _ in 0..2_000 {
                let t = single_diffractive_t(mass, 11.0, &mut rng);
                assert!((-SD_T_MAX..=0.0).contains(&t), "t = {t}");
            }
        }
    }

    #[test]
    fn sd_t_steepens_near_sqrt_two() {
        let mut rng = seeded(6);
        let n = 20_000;
        let mean = |mass: f64, rng: &mut rand_chacha::ChaCha8Rng| {
            (0..n).map(|_| single_diffractive_t(mass, 11.0, rng)).sum::<f64>() / n as f64
        };
        let near = mean(SQRT_2, &mut rng);
        let far = mean(20.0, &mut rng);
        assert!(near.abs() < far.abs());
    }
}
