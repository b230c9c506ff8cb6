//! Cross-section initialization.
//!
//! [`CrossSectionModel::initialize`] turns a [`GenerationConfig`] into
//! the read-only [`CrossSectionTable`] consulted on every event: partial
//! cross sections, cumulative process probabilities, cumulative
//! diffractive-mass channel probabilities, and the resolved kinematic
//! window.

use mbr_core::constants::PROTON_MASS;
use mbr_core::ProcessKind;

use crate::config::{ConfigError, DiffractionModel, GenerationConfig};
use crate::flux::{double_diffractive_flux, single_diffractive_flux};

/// Above this `sqrt(s)` (GeV) the asymptotic total cross-section fit applies.
const ASYMPTOTIC_FIT_THRESHOLD: f64 = 275.0;

/// Hard-core cross section of the low-energy fit, mb.
const LOW_ENERGY_HARD_CORE: f64 = 26.3;

/// Ratio of double-diffractive to single-diffractive-squared over elastic.
const DD_FACTORIZATION: f64 = 1.3;

/// Low-mass N* resonance cross section (both sides), mb.
const RESONANCE_SIGMA: f64 = 0.664;

/// `m^2` below which the legacy spectrum uses the flat rectangle channel.
const RECTANGLE_MASS2: f64 = 1.8;

/// Legacy mass-spectrum channel weights: N*(1440), N*(1680), N*(2190),
/// with the `(ammin^2, ammax^2)` limits under which each is active.
const RESONANCE_CHANNELS: [(f64, f64, f64); 3] = [(0.09, 2.0, 2.5), (0.156, 2.6, 3.5), (0.086, 4.0, 5.0)];

/// Partial and total cross sections in mb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossSections {
    /// Hard-core (non-diffractive inelastic).
    pub hard_core: f64,
    /// Double diffraction.
    pub double_diffractive: f64,
    /// Single diffraction, both sides.
    pub single_diffractive: f64,
    /// Elastic.
    pub elastic: f64,
    /// Total.
    pub total: f64,
    /// Low-mass resonance production, informational.
    pub resonance: f64,
}

impl CrossSections {
    /// Cross section of `kind`.
    pub fn of(&self, kind: ProcessKind) -> f64 {
        match kind {
            ProcessKind::HardCore => self.hard_core,
            ProcessKind::DoubleDiffractive => self.double_diffractive,
            ProcessKind::SingleDiffractive => self.single_diffractive,
            ProcessKind::Elastic => self.elastic,
        }
    }
}

/// Kinematic limits resolved from the configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicWindow {
    /// Centre-of-mass energy, GeV.
    pub sqrt_s: f64,
    /// Its square.
    pub s: f64,
    /// Beam momentum, GeV.
    pub beam_momentum: f64,
    /// Elastic slope `b`, GeV^-2.
    pub elastic_slope: f64,
    /// Legacy single-diffractive base slope, `2/3 b`.
    pub sd_slope: f64,
    /// Diffractive mass window, GeV.
    pub mass_min: f64,
    /// Upper edge of the mass window, GeV.
    pub mass_max: f64,
    /// Lower edge of the legacy continuum channel, GeV.
    pub continuum_min: f64,
    /// Upper `m^2` edge of the legacy rectangle channel.
    pub rectangle_max2: f64,
    /// Xi window.
    pub xi_min: f64,
    /// Upper edge of the xi window.
    pub xi_max: f64,
    /// Rapidity-gap window of renormalized double diffraction.
    pub gap_min: f64,
    /// Upper edge of the gap window, `ln(s / mass_min^4)`.
    pub gap_max: f64,
    /// Fraction of leading nucleons that are charged.
    pub leading_charged_fraction: f64,
}

/// Flux quantities of the renormalized models, when enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FluxSummary {
    /// Double-diffractive flux normalization.
    pub dd_normalization: Option<f64>,
    /// Envelope of the gap-width sampler.
    pub dd_density_max: Option<f64>,
    /// Single-diffractive flux normalization.
    pub sd_normalization: Option<f64>,
}

/// Everything derived once from a configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSectionTable {
    /// Partial cross sections.
    pub sigma: CrossSections,
    /// Cumulative process probabilities in [`ProcessKind::ALL`] order.
    pub rate: [f64; 4],
    /// Cumulative legacy mass-channel probabilities: continuum, three
    /// resonances, low-mass rectangle.
    pub drate: [f64; 5],
    /// Resolved kinematic limits.
    pub window: KinematicWindow,
    /// Renormalized-flux quantities.
    pub flux: FluxSummary,
}

impl CrossSectionTable {
    /// Probability of selecting `kind`.
    pub fn probability(&self, kind: ProcessKind) -> f64 {
        let i = kind.index();
        let below = if i == 0 { 0.0 } else { self.rate[i - 1] };
        self.rate[i] - below
    }
}

/// Initialization entry point.
pub struct CrossSectionModel;

impl CrossSectionModel {
    /// Validate `config` and compute its cross-section table.
    pub fn initialize(config: &GenerationConfig) -> Result<CrossSectionTable, ConfigError> {
        config.validate()?;

        let window = resolve_window(config);
        let s = window.s;
        let mut sigma = fitted_cross_sections(s);
        let mut flux = FluxSummary::default();

        if config.dd_model == DiffractionModel::Renormalized {
            let dd = double_diffractive_flux(s, window.mass_min, window.gap_min, &config.regge);
            sigma.double_diffractive = dd.sigma;
            flux.dd_normalization = Some(dd.normalization);
            flux.dd_density_max = Some(dd.density_max);
        }
        if config.sd_model == DiffractionModel::Renormalized {
            let sd = single_diffractive_flux(s, window.xi_min, window.xi_max, &config.regge);
            sigma.single_diffractive = sd.sigma;
            flux.sd_normalization = Some(sd.normalization);
        }
        if config.uses_renormalized_flux() {
            let remainder = sigma.total - (sigma.single_diffractive + sigma.double_diffractive + sigma.elastic);
            if remainder < 0.0 {
                tracing::warn!(
                    "Hard-core cross section {:.3} mb negative at sqrt(s) = {:.1} GeV, clamped to 0",
                    remainder,
                    window.sqrt_s
                );
            }
            sigma.hard_core = remainder.max(0.0);
        }

        let weights = ProcessKind::ALL.map(|kind| {
            if config.processes.contains(kind) {
                sigma.of(kind)
            } else {
                0.0
            }
        });
        let rate = cumulative(weights).ok_or(ConfigError::ZeroCrossSection)?;
        let drate = cumulative(mass_channel_weights(config, &window)).unwrap_or([1.0; 5]);

        tracing::info!(
            "Cross sections at sqrt(s) = {:.1} GeV: total {:.3} mb, hard-core {:.3}, DD {:.3}, SD {:.3}, elastic {:.3}",
            window.sqrt_s,
            sigma.total,
            sigma.hard_core,
            sigma.double_diffractive,
            sigma.single_diffractive,
            sigma.elastic
        );
        tracing::debug!("Process rates {:?}, mass-channel rates {:?}", rate, drate);

        Ok(CrossSectionTable {
            sigma,
            rate,
            drate,
            window,
            flux,
        })
    }
}

fn resolve_window(config: &GenerationConfig) -> KinematicWindow {
    let sqrt_s = config.sqrt_s();
    let s = sqrt_s * sqrt_s;
    let elastic_slope = 7.9 + 0.7 * (s / (2.0 * PROTON_MASS * PROTON_MASS)).ln();
    let mass_min = config.mass_min;
    let mass_max = config.resolved_mass_max();
    let (min2, max2) = (mass_min * mass_min, mass_max * mass_max);
    let continuum_min = if mass_max - mass_min < 1e-6 {
        mass_min
    } else {
        min2.max(RECTANGLE_MASS2).sqrt()
    };
    KinematicWindow {
        sqrt_s,
        s,
        beam_momentum: config.beam_momentum,
        elastic_slope,
        sd_slope: elastic_slope * 2.0 / 3.0,
        mass_min,
        mass_max,
        continuum_min,
        rectangle_max2: max2.min(RECTANGLE_MASS2),
        xi_min: config.resolved_xi_min(),
        xi_max: config.xi_max,
        gap_min: config.gap_min,
        gap_max: config.gap_max(),
        leading_charged_fraction: config.leading_charged_fraction(),
    }
}

/// Raw fits to collider data, before any flux renormalization.
fn fitted_cross_sections(s: f64) -> CrossSections {
    let sd_one_side = 0.68 * (1.0 + 36.0 / s) * (0.6 + 0.1 * s).ln();
    let fact = (s / 2500.0).sqrt().ln().powi(2);
    let elastic_fraction = 0.175 + 0.015 * fact / (1.0 + 0.2 * fact);
    let k = DD_FACTORIZATION;

    let (total, hard_core) = if s.sqrt() <= ASYMPTOTIC_FIT_THRESHOLD {
        let sig = LOW_ENERGY_HARD_CORE + 2.0 * sd_one_side;
        let disc = sig * sig + 4.0 * k * ((1.0 - elastic_fraction) / elastic_fraction) * sd_one_side * sd_one_side;
        ((sig + disc.sqrt()) / (2.0 * (1.0 - elastic_fraction)), LOW_ENERGY_HARD_CORE)
    } else {
        let total =
            2.0 * sd_one_side * (1.0 + 1.0 / (2.0 * elastic_fraction).sqrt()) / (1.0 - 2.0 * elastic_fraction);
        (total, 0.5 * total)
    };
    let elastic = total * elastic_fraction;
    CrossSections {
        hard_core,
        double_diffractive: k * sd_one_side * sd_one_side / elastic,
        single_diffractive: 2.0 * sd_one_side,
        elastic,
        total,
        resonance: RESONANCE_SIGMA,
    }
}

/// Unnormalized weights of the legacy mass-spectrum channels.
fn mass_channel_weights(config: &GenerationConfig, window: &KinematicWindow) -> [f64; 5] {
    let mut w = [0.0; 5];
    let (min2, max2) = (window.mass_min.powi(2), window.mass_max.powi(2));
    if window.mass_max - window.mass_min < 1e-6 || !config.include_resonances {
        w[0] = 1.0;
        return w;
    }
    for (i, (weight, min_limit, max_limit)) in RESONANCE_CHANNELS.into_iter().enumerate() {
        if min2 <= min_limit && max2 <= max_limit {
            w[i + 1] = weight;
        }
    }
    if min2 < RECTANGLE_MASS2 {
        w[4] = 0.113 * (window.rectangle_max2 - min2) / 0.3;
        w[1] += 0.0565;
    }
    if max2 > RECTANGLE_MASS2 {
        w[0] = 2.0 * 0.68 * (1.0 + 36.0 / window.s) * (window.mass_max / window.continuum_min).ln();
    }
    w
}

/// Normalized running sum; every entry from the last non-zero weight on
/// is exactly 1. `None` when all weights are zero.
fn cumulative<const N: usize>(weights: [f64; N]) -> Option<[f64; N]> {
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    let last = weights.iter().rposition(|&w| w > 0.0)?;
    let mut out = [0.0; N];
    let mut running = 0.0;
    for (i, w) in weights.iter().enumerate() {
        running += w / total;
        out[i] = if i >= last { 1.0 } else { running.min(1.0) };
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProcessSet, ReggeParameters};
    use proptest::prelude::*;

    fn legacy(processes: ProcessSet) -> GenerationConfig {
        GenerationConfig {
            processes,
            sd_model: DiffractionModel::Legacy,
            dd_model: DiffractionModel::Legacy,
            ..Default::default()
        }
    }

    fn assert_monotone_to_one(r: &[f64]) {
        for w in r.windows(2) {
            assert!(w[0] <= w[1], "{r:?}");
        }
        assert!(r.iter().all(|x| (0.0..=1.0).contains(x)));
        assert!((r[r.len() - 1] - 1.0).abs() < 1e-9);
    }

    // ---- cumulative ----

    #[test]
    fn cumulative_pins_tail_to_one() {
        let c = cumulative([0.2, 0.3, 0.5, 0.0]).unwrap();
        assert_eq!(c[2], 1.0);
        assert_eq!(c[3], 1.0);
        assert!((c[0] - 0.2).abs() < 1e-15);
        assert!(cumulative([0.0; 3]).is_none());
    }

    // ---- raw fits ----

    #[test]
    fn tevatron_fit_values() {
        let s = 1800.0f64.powi(2);
        let sig = fitted_cross_sections(s);
        assert!((sig.total - 78.88).abs() < 0.05, "total {}", sig.total);
        assert!((sig.elastic - 18.06).abs() < 0.05);
        assert!((sig.single_diffractive - 17.26).abs() < 0.05);
        assert!((sig.double_diffractive - 5.36).abs() < 0.05);
        assert!((sig.hard_core - 0.5 * sig.total).abs() < 1e-12);
    }

    #[test]
    fn low_energy_fit_uses_fixed_hard_core() {
        let sig = fitted_cross_sections(100.0f64.powi(2));
        assert_eq!(sig.hard_core, LOW_ENERGY_HARD_CORE);
        assert!(sig.total > sig.hard_core + sig.elastic);
    }

    // ---- initialization ----

    #[test]
    fn hard_core_only_selects_hard_core() {
        let table = CrossSectionModel::initialize(&legacy(ProcessSet::default())).unwrap();
        assert_eq!(table.rate, [1.0; 4]);
        assert_eq!(table.probability(ProcessKind::HardCore), 1.0);
        assert_eq!(table.probability(ProcessKind::Elastic), 0.0);
    }

    #[test]
    fn elastic_only_rate() {
        let table = CrossSectionModel::initialize(&legacy(ProcessSet::only(ProcessKind::Elastic))).unwrap();
        assert_eq!(table.rate, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn all_processes_rates_match_cross_sections() {
        let table = CrossSectionModel::initialize(&legacy(ProcessSet::ALL)).unwrap();
        assert_monotone_to_one(&table.rate);
        let total: f64 = ProcessKind::ALL.iter().map(|k| table.sigma.of(*k)).sum();
        for kind in ProcessKind::ALL {
            let expected = table.sigma.of(kind) / total;
            assert!((table.probability(kind) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn renormalized_models_rederive_hard_core() {
        let cfg = GenerationConfig {
            processes: ProcessSet::ALL,
            ..Default::default()
        };
        let table = CrossSectionModel::initialize(&cfg).unwrap();
        let sig = table.sigma;
        let sum = sig.hard_core + sig.double_diffractive + sig.single_diffractive + sig.elastic;
        assert!((sum - sig.total).abs() < 1e-9);
        assert!(table.flux.dd_density_max.is_some());
        assert!(table.flux.sd_normalization.unwrap() >= 1.0);
        assert_monotone_to_one(&table.rate);
    }

    #[test]
    fn initialization_is_bit_reproducible() {
        let cfg = GenerationConfig {
            processes: ProcessSet::ALL,
            ..Default::default()
        };
        let a = CrossSectionModel::initialize(&cfg).unwrap();
        let b = CrossSectionModel::initialize(&cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rate.map(f64::to_bits), b.rate.map(f64::to_bits));
    }

    #[test]
    fn invalid_config_is_rejected_before_integration() {
        let cfg = GenerationConfig {
            beam_momentum: -5.0,
            ..Default::default()
        };
        assert!(matches!(
            CrossSectionModel::initialize(&cfg),
            Err(ConfigError::InvalidBeamMomentum { .. })
        ));
    }

    #[test]
    fn clamped_hard_core_alone_has_zero_cross_section() {
        for beam_momentum in [10.0, 50.0] {
            let cfg = GenerationConfig {
                beam_momentum,
                processes: ProcessSet::only(ProcessKind::HardCore),
                regge: ReggeParameters {
                    sigma_pomeron_proton: 40.0,
                    ..ReggeParameters::default()
                },
                ..Default::default()
            };
            assert_eq!(CrossSectionModel::initialize(&cfg), Err(ConfigError::ZeroCrossSection));
        }
    }

    // ---- mass channels ----

    #[test]
    fn default_window_uses_all_channels_but_two() {
        let table = CrossSectionModel::initialize(&legacy(ProcessSet::ALL)).unwrap();
        assert_monotone_to_one(&table.drate);
        // the N*(1680) and N*(2190) channels need a narrow upper edge
        assert_eq!(table.drate[1], table.drate[2]);
        assert_eq!(table.drate[2], table.drate[3]);
        assert!(table.drate[0] > 0.0);
        assert!(table.drate[1] > table.drate[0]);
    }

    #[test]
    fn continuum_only_without_resonances() {
        let cfg = GenerationConfig {
            include_resonances: false,
            ..legacy(ProcessSet::ALL)
        };
        let table = CrossSectionModel::initialize(&cfg).unwrap();
        assert_eq!(table.drate, [1.0; 5]);
    }

    #[test]
    fn degenerate_window_uses_continuum_at_fixed_mass() {
        let cfg = GenerationConfig {
            mass_min: 3.0,
            mass_max: Some(3.0),
            ..legacy(ProcessSet::ALL)
        };
        let table = CrossSectionModel::initialize(&cfg).unwrap();
        assert_eq!(table.drate, [1.0; 5]);
        assert_eq!(table.window.continuum_min, 3.0);
    }

    #[test]
    fn narrow_low_window_enables_resonances() {
        let cfg = GenerationConfig {
            mass_max: Some(2.2f64.sqrt()),
            ..legacy(ProcessSet::ALL)
        };
        let table = CrossSectionModel::initialize(&cfg).unwrap();
        assert_monotone_to_one(&table.drate);
        for i in 1..4 {
            assert!(table.drate[i] > table.drate[i - 1], "{:?}", table.drate);
        }
    }

    proptest! {
        #[test]
        fn rates_monotone_for_random_legacy_configs(
            beam in 5.0f64..10_000.0,
            code in 1u32..16,
            min_fraction in 0.0f64..1.0,
            resonances in any::<bool>(),
        ) {
            let processes = ProcessSet {
                hard_core: code & 1 != 0,
                double_diffractive: code & 2 != 0,
                single_diffractive: code & 4 != 0,
                elastic: code & 8 != 0,
            };
            let mut cfg = legacy(processes);
            cfg.beam_momentum = beam;
            cfg.include_resonances = resonances;
            let lo = mbr_core::constants::MIN_DIFFRACTIVE_MASS;
            cfg.mass_min = lo + (cfg.resolved_mass_max() - lo).max(0.0) * min_fraction;
            let table = CrossSectionModel::initialize(&cfg).unwrap();
            for r in [&table.rate[..], &table.drate[..]] {
                for w in r.windows(2) {
                    prop_assert!(w[0] <= w[1]);
                }
                prop_assert!((r[r.len() - 1] - 1.0).abs() < 1e-9);
                prop_assert!(r.iter().all(|x| (0.0..=1.0).contains(x)));
            }
        }
    }
}
