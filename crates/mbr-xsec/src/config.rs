//! Generation configuration, validation, and error types.
//!
//! [`GenerationConfig`] is the single input of the generator. Every
//! field has a documented default; [`validate()`](GenerationConfig::validate)
//! checks structural invariants before any cross section is computed.

use std::error::Error;
use std::fmt;

use mbr_core::constants::{MIN_DIFFRACTIVE_MASS, PROTON_MASS};
use mbr_core::{Boost, ProcessKind};

// ── ProcessSet ─────────────────────────────────────────────────────

/// Which collision processes may be generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessSet {
    /// Hard-core (non-diffractive inelastic) collisions.
    pub hard_core: bool,
    /// Double diffraction.
    pub double_diffractive: bool,
    /// Single diffraction.
    pub single_diffractive: bool,
    /// Elastic scattering.
    pub elastic: bool,
}

impl ProcessSet {
    /// No process enabled.
    pub const NONE: Self = Self {
        hard_core: false,
        double_diffractive: false,
        single_diffractive: false,
        elastic: false,
    };

    /// Every process enabled.
    pub const ALL: Self = Self {
        hard_core: true,
        double_diffractive: true,
        single_diffractive: true,
        elastic: true,
    };

    /// Only `kind` enabled.
    pub fn only(kind: ProcessKind) -> Self {
        Self::NONE.with(kind)
    }

    /// This set with `kind` added.
    pub fn with(mut self, kind: ProcessKind) -> Self {
        match kind {
            ProcessKind::HardCore => self.hard_core = true,
            ProcessKind::DoubleDiffractive => self.double_diffractive = true,
            ProcessKind::SingleDiffractive => self.single_diffractive = true,
            ProcessKind::Elastic => self.elastic = true,
        }
        self
    }

    /// Whether `kind` is enabled.
    pub fn contains(&self, kind: ProcessKind) -> bool {
        match kind {
            ProcessKind::HardCore => self.hard_core,
            ProcessKind::DoubleDiffractive => self.double_diffractive,
            ProcessKind::SingleDiffractive => self.single_diffractive,
            ProcessKind::Elastic => self.elastic,
        }
    }

    /// Whether no process is enabled.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Parse the decimal process code `HC + 10*DD + 100*SD + 1000*EL`,
    /// where every digit is 0 or 1 (e.g. `1111` enables everything).
    pub fn from_legacy_code(code: u32) -> Result<Self, ConfigError> {
        if code > 1111 {
            return Err(ConfigError::InvalidProcessCode { code });
        }
        let mut set = Self::NONE;
        let mut rest = code;
        for kind in ProcessKind::ALL {
            match rest % 10 {
                0 => {}
                1 => set = set.with(kind),
                _ => return Err(ConfigError::InvalidProcessCode { code }),
            }
            rest /= 10;
        }
        Ok(set)
    }

    /// Inverse of [`from_legacy_code`](ProcessSet::from_legacy_code).
    pub fn legacy_code(&self) -> u32 {
        ProcessKind::ALL
            .iter()
            .zip([1, 10, 100, 1000])
            .filter(|(kind, _)| self.contains(**kind))
            .map(|(_, weight)| weight)
            .sum()
    }
}

impl Default for ProcessSet {
    fn default() -> Self {
        Self::only(ProcessKind::HardCore)
    }
}

// ── DiffractionModel ───────────────────────────────────────────────

/// Mass and momentum-transfer model for a diffractive process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffractionModel {
    /// Continuum-plus-resonance mass spectrum with fixed-slope `t`.
    Legacy,
    /// Renormalized pomeron flux (rapidity-gap / xi sampling).
    #[default]
    Renormalized,
}

// ── ReggeParameters ────────────────────────────────────────────────

/// Pomeron trajectory parameters of the renormalized-flux models.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReggeParameters {
    /// Pomeron intercept minus one. Default: 0.104.
    pub epsilon: f64,
    /// Pomeron slope alpha' in GeV^-2. Default: 0.25.
    pub alpha_prime: f64,
    /// Pomeron-proton total cross section in mb. Default: 2.82.
    pub sigma_pomeron_proton: f64,
}

impl Default for ReggeParameters {
    fn default() -> Self {
        Self {
            epsilon: 0.104,
            alpha_prime: 0.25,
            sigma_pomeron_proton: 2.82,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`GenerationConfig::validate()`] and by
/// cross-section initialization.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Beam momentum is NaN, infinite, zero, or negative.
    InvalidBeamMomentum {
        /// The invalid value.
        value: f64,
    },
    /// Multiplicity scale is NaN, infinite, zero, or negative.
    InvalidMultiplicityScale {
        /// The invalid value.
        value: f64,
    },
    /// Nucleon weights are negative, non-finite, or sum to zero.
    InvalidNucleonWeights {
        /// Proton weight.
        proton: f64,
        /// Neutron weight.
        neutron: f64,
    },
    /// Both single-diffraction sides were forced at once.
    ConflictingDiffractionSides,
    /// The process set is empty.
    NoProcessesEnabled,
    /// A legacy process code has a digit other than 0 or 1.
    InvalidProcessCode {
        /// The rejected code.
        code: u32,
    },
    /// The diffractive mass window is empty or outside `[sqrt(1.5), sqrt(s)]`.
    InvalidMassWindow {
        /// Resolved lower bound.
        min: f64,
        /// Resolved upper bound.
        max: f64,
        /// Centre-of-mass energy.
        sqrt_s: f64,
    },
    /// The xi window is empty or outside `(0, 1)`.
    InvalidXiWindow {
        /// Resolved lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The rapidity-gap window is empty.
    InvalidGapWindow {
        /// Configured minimum gap.
        min: f64,
        /// Largest gap allowed by the mass window.
        max: f64,
    },
    /// A Regge parameter is unusable for the renormalized models.
    InvalidRegge {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The lab boost is not a physical boost.
    InvalidLabBoost,
    /// Event retry settings are unusable.
    InvalidRetryPolicy {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// Every enabled process has zero cross section.
    ZeroCrossSection,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBeamMomentum { value } => {
                write!(f, "beam momentum must be finite and positive, got {value}")
            }
            Self::InvalidMultiplicityScale { value } => {
                write!(f, "multiplicity scale must be finite and positive, got {value}")
            }
            Self::InvalidNucleonWeights { proton, neutron } => write!(
                f,
                "nucleon weights must be non-negative with a positive sum, got p={proton} n={neutron}"
            ),
            Self::ConflictingDiffractionSides => {
                write!(f, "cannot force both proton and antiproton dissociation")
            }
            Self::NoProcessesEnabled => write!(f, "no process enabled"),
            Self::InvalidProcessCode { code } => {
                write!(f, "process code {code} must consist of 0/1 digits HC+10DD+100SD+1000EL")
            }
            Self::InvalidMassWindow { min, max, sqrt_s } => write!(
                f,
                "diffractive mass window [{min}, {max}] must lie within [sqrt(1.5), {sqrt_s}]"
            ),
            Self::InvalidXiWindow { min, max } => {
                write!(f, "xi window [{min}, {max}] must be non-empty and inside (0, 1)")
            }
            Self::InvalidGapWindow { min, max } => {
                write!(f, "rapidity gap window [{min}, {max}] is empty")
            }
            Self::InvalidRegge { reason } => write!(f, "invalid Regge parameters: {reason}"),
            Self::InvalidLabBoost => write!(f, "lab boost must be finite with |beta| < 1"),
            Self::InvalidRetryPolicy { reason } => write!(f, "invalid retry policy: {reason}"),
            Self::ZeroCrossSection => write!(f, "enabled processes have zero total cross section"),
        }
    }
}

impl Error for ConfigError {}

// ── GenerationConfig ───────────────────────────────────────────────

/// Complete, immutable input of the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Momentum of each beam in the centre-of-mass frame, GeV. Default: 900.
    pub beam_momentum: f64,
    /// Enabled processes. Default: hard-core only.
    pub processes: ProcessSet,
    /// Factor applied to the average multiplicity. Default: 1.15.
    pub multiplicity_scale: f64,
    /// Relative weight of a charged leading nucleon. Default: 1.
    pub proton_weight: f64,
    /// Relative weight of a neutral leading nucleon plus pion. Default: 1.
    pub neutron_weight: f64,
    /// Single diffraction always dissociates the proton, leaving the
    /// antiproton as recoil. Default: false.
    pub force_proton_dissociation: bool,
    /// Single diffraction always dissociates the antiproton, leaving the
    /// proton as recoil. Default: false.
    pub force_antiproton_dissociation: bool,
    /// Single-diffraction model. Default: renormalized.
    pub sd_model: DiffractionModel,
    /// Double-diffraction model. Default: renormalized.
    pub dd_model: DiffractionModel,
    /// Include the N* resonance channels in the legacy mass spectrum.
    /// Default: true.
    pub include_resonances: bool,
    /// Lower edge of the diffractive mass window, GeV. Default: sqrt(1.5).
    pub mass_min: f64,
    /// Upper edge of the diffractive mass window, GeV. `None` = sqrt(0.15 s).
    pub mass_max: Option<f64>,
    /// Lower edge of the xi window. `None` = 1.5 / s.
    pub xi_min: Option<f64>,
    /// Upper edge of the xi window. Default: 0.15.
    pub xi_max: f64,
    /// Smallest double-diffractive rapidity gap. Default: 2.3.
    pub gap_min: f64,
    /// Pomeron trajectory parameters.
    pub regge: ReggeParameters,
    /// Final boost from the event centre-of-mass frame to the lab.
    /// Default: identity.
    pub lab_boost: Boost,
    /// Base seed for the default random stream. Default: 92253591.
    pub seed: u64,
    /// Regenerations allowed per requested event before giving up.
    /// Default: 100.
    pub max_event_attempts: u32,
    /// Abandonment rate above which a warning is logged. Default: 0.01.
    pub abandonment_warn_rate: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            beam_momentum: 900.0,
            processes: ProcessSet::default(),
            multiplicity_scale: 1.15,
            proton_weight: 1.0,
            neutron_weight: 1.0,
            force_proton_dissociation: false,
            force_antiproton_dissociation: false,
            sd_model: DiffractionModel::Renormalized,
            dd_model: DiffractionModel::Renormalized,
            include_resonances: true,
            mass_min: MIN_DIFFRACTIVE_MASS,
            mass_max: None,
            xi_min: None,
            xi_max: 0.15,
            gap_min: 2.3,
            regge: ReggeParameters::default(),
            lab_boost: Boost::IDENTITY,
            seed: 92_253_591,
            max_event_attempts: 100,
            abandonment_warn_rate: 0.01,
        }
    }
}

impl GenerationConfig {
    /// Centre-of-mass energy `sqrt(s)` in GeV.
    pub fn sqrt_s(&self) -> f64 {
        2.0 * (self.beam_momentum * self.beam_momentum + PROTON_MASS * PROTON_MASS).sqrt()
    }

    /// Upper diffractive mass edge with the default applied.
    pub fn resolved_mass_max(&self) -> f64 {
        self.mass_max.unwrap_or_else(|| 0.15f64.sqrt() * self.sqrt_s())
    }

    /// Lower xi edge with the default applied.
    pub fn resolved_xi_min(&self) -> f64 {
        let s = self.sqrt_s() * self.sqrt_s();
        self.xi_min.unwrap_or(1.5 / s)
    }

    /// Largest double-diffractive rapidity gap, `ln(s / mass_min^4)`.
    pub fn gap_max(&self) -> f64 {
        let s = self.sqrt_s() * self.sqrt_s();
        (s / self.mass_min.powi(4)).ln()
    }

    /// Whether either diffractive model is renormalized. The hard-core
    /// cross section is then derived from the remainder of the total,
    /// whichever processes are enabled.
    pub fn uses_renormalized_flux(&self) -> bool {
        self.dd_model == DiffractionModel::Renormalized || self.sd_model == DiffractionModel::Renormalized
    }

    /// Fraction of leading nucleons that are charged.
    pub fn leading_charged_fraction(&self) -> f64 {
        self.proton_weight / (self.proton_weight + self.neutron_weight)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.beam_momentum.is_finite() || self.beam_momentum <= 0.0 {
            return Err(ConfigError::InvalidBeamMomentum {
                value: self.beam_momentum,
            });
        }
        if !self.multiplicity_scale.is_finite() || self.multiplicity_scale <= 0.0 {
            return Err(ConfigError::InvalidMultiplicityScale {
                value: self.multiplicity_scale,
            });
        }
        let (p, n) = (self.proton_weight, self.neutron_weight);
        if !p.is_finite() || !n.is_finite() || p < 0.0 || n < 0.0 || p + n == 0.0 {
            return Err(ConfigError::InvalidNucleonWeights {
                proton: p,
                neutron: n,
            });
        }
        if self.force_proton_dissociation && self.force_antiproton_dissociation {
            return Err(ConfigError::ConflictingDiffractionSides);
        }
        if self.processes.is_empty() {
            return Err(ConfigError::NoProcessesEnabled);
        }
        self.validate_mass_window()?;
        self.validate_xi_window()?;
        if self.dd_model == DiffractionModel::Renormalized {
            let max = self.gap_max();
            if !self.gap_min.is_finite() || self.gap_min < 0.0 || self.gap_min >= max {
                return Err(ConfigError::InvalidGapWindow {
                    min: self.gap_min,
                    max,
                });
            }
        }
        self.validate_regge()?;
        if !self.lab_boost.is_physical() {
            return Err(ConfigError::InvalidLabBoost);
        }
        if self.max_event_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_event_attempts must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.abandonment_warn_rate) {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!(
                    "abandonment_warn_rate must be in [0, 1], got {}",
                    self.abandonment_warn_rate
                ),
            });
        }
        Ok(())
    }

    fn validate_mass_window(&self) -> Result<(), ConfigError> {
        let sqrt_s = self.sqrt_s();
        let (min, max) = (self.mass_min, self.resolved_mass_max());
        let bad = |m: f64| !m.is_finite() || m < MIN_DIFFRACTIVE_MASS - 1e-12 || m > sqrt_s;
        if bad(min) || bad(max) || min > max {
            return Err(ConfigError::InvalidMassWindow { min, max, sqrt_s });
        }
        Ok(())
    }

    fn validate_xi_window(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.resolved_xi_min(), self.xi_max);
        if !(min > 0.0 && min < max && max < 1.0) {
            return Err(ConfigError::InvalidXiWindow { min, max });
        }
        Ok(())
    }

    fn validate_regge(&self) -> Result<(), ConfigError> {
        let r = &self.regge;
        if !r.epsilon.is_finite() || !r.alpha_prime.is_finite() || !r.sigma_pomeron_proton.is_finite() {
            return Err(ConfigError::InvalidRegge {
                reason: "parameters must be finite".into(),
            });
        }
        if self.uses_renormalized_flux() {
            if r.epsilon <= 0.0 {
                return Err(ConfigError::InvalidRegge {
                    reason: format!("epsilon must be positive, got {}", r.epsilon),
                });
            }
            if r.alpha_prime <= 0.0 {
                return Err(ConfigError::InvalidRegge {
                    reason: format!("alpha' must be positive, got {}", r.alpha_prime),
                });
            }
            if r.sigma_pomeron_proton <= 0.0 {
                return Err(ConfigError::InvalidRegge {
                    reason: format!(
                        "pomeron-proton cross section must be positive, got {}",
                        r.sigma_pomeron_proton
                    ),
                });
            }
        }
        Ok(())
    }
}
