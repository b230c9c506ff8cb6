//! Physical and numerical constants shared across the generator.
//!
//! The fit constants of the phenomenological models live next to the
//! models that use them; this module only holds values referenced by
//! more than one crate.

/// Proton mass in GeV used for beam kinematics and cross-section fits.
pub const PROTON_MASS: f64 = 0.938_272_31;

/// Smallest diffractive mass accepted anywhere in the generator, `sqrt(1.5)` GeV.
pub const MIN_DIFFRACTIVE_MASS: f64 = 1.224_744_871_391_589;

/// Fireballs lighter than this (GeV) cannot be given a multiplicity.
pub const MIN_FRAGMENTING_MASS: f64 = 1.1;

/// Upper bound on the number of daughters of a single fireball.
pub const MAX_MULTIPLICITY: usize = 5000;

/// Relative tolerance on energy-momentum conservation, as a fraction of
/// the relevant invariant mass.
pub const CONSERVATION_TOLERANCE: f64 = 1e-3;

/// Cap on the number of candidates any single acceptance-rejection loop
/// may draw before giving up.
pub const MAX_REJECTION_TRIALS: u32 = 100_000;

/// Conversion factor from GeV^-2 to millibarn.
pub const GEV2_TO_MB: f64 = 0.389_38;
