//! Independent daughter kinematics: rapidity, transverse momentum and
//! azimuth are drawn without correlation and balanced afterwards.

use mbr_core::{FourMomentum, InverseCdfTable, RandomStream, Species};

/// Fraction of `[-ln M, ln M]` with a flat rapidity density.
pub const FLAT_RAPIDITY_FRACTION: f64 = 0.4;

/// Tries before a rapidity or transverse-momentum draw falls back to 0.
pub const MAX_KINEMATIC_TRIES: u32 = 500;

/// Upper edge of the tabulated transverse-momentum range, GeV.
pub const PT_MAX: f64 = 50.0;

/// Bins of the transverse-momentum table.
pub const PT_BINS: usize = 500;

/// Scale `p0` of the `x / (1 + x/p0)^n` transverse-momentum law, GeV.
pub const PT_SOFT: f64 = 1.27;

/// Masses below this (GeV) share one transverse-momentum table.
pub const PT_MASS_FLOOR: f64 = 60.0;

/// Below this mass (GeV) pT is capped at `M / n`.
pub const PT_CUT_MASS: f64 = 4.0;

/// Draw a rapidity for a daughter of a fireball of `mass`.
///
/// Flat on the central [`FLAT_RAPIDITY_FRACTION`] of `[-ln M, ln M]`,
/// falling linearly to zero at the ends. Returns 0 when
/// [`MAX_KINEMATIC_TRIES`] draws were rejected.
pub fn sample_rapidity<R: RandomStream + ?Sized>(mass: f64, rng: &mut R) -> f64 {
    let span = mass.ln();
    let flat = FLAT_RAPIDITY_FRACTION * span;
    let slope = span * (1.0 - FLAT_RAPIDITY_FRACTION);
    for _ in 0..MAX_KINEMATIC_TRIES {
        let y = span * (2.0 * rng.uniform() - 1.0);
        if y.abs() < flat {
            return y;
        }
        if rng.uniform() <= (span - y.abs()) / slope {
            return y;
        }
    }
    0.0
}

/// Tabulated transverse-momentum law for one power.
#[derive(Clone, Debug, PartialEq)]
pub struct PtSpectrum {
    power: f64,
    table: InverseCdfTable,
}

impl PtSpectrum {
    /// Power `n` of the law for a fireball of `mass`.
    pub fn power_for(mass: f64) -> f64 {
        4.0 + 35.83 / (mass.max(PT_MASS_FLOOR) / 0.3).ln()
    }

    /// Build the table used for a fireball of `mass`.
    pub fn new(mass: f64) -> Self {
        let power = Self::power_for(mass);
        let table = InverseCdfTable::from_density(0.0, PT_MAX, PT_BINS, |x| x / (1.0 + x / PT_SOFT).powf(power));
        Self { power, table }
    }

    /// Power `n` of this table.
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Whether this table serves a fireball of `mass`.
    pub fn serves(&self, mass: f64) -> bool {
        Self::power_for(mass) == self.power
    }

    /// Draw a transverse momentum for one of `multiplicity` daughters of
    /// a fireball of `mass`. Light fireballs reject draws above
    /// `mass / multiplicity`; 0 is returned after
    /// [`MAX_KINEMATIC_TRIES`] rejections.
    pub fn sample<R: RandomStream + ?Sized>(&self, mass: f64, multiplicity: usize, rng: &mut R) -> f64 {
        let cut = mass / multiplicity.max(1) as f64;
        for _ in 0..MAX_KINEMATIC_TRIES {
            let pt = self.table.sample(rng);
            if mass >= PT_CUT_MASS || pt <= cut {
                return pt;
            }
        }
        0.0
    }
}

/// Draw the rest-frame momentum of one independent daughter.
pub fn daughter_momentum<R: RandomStream + ?Sized>(
    species: Species,
    fireball_mass: f64,
    multiplicity: usize,
    spectrum: &PtSpectrum,
    rng: &mut R,
) -> FourMomentum {
    let y = sample_rapidity(fireball_mass, rng);
    let pt = spectrum.sample(fireball_mass, multiplicity, rng);
    let (sin_phi, cos_phi) = rng.azimuth().sin_cos();
    let mass = species.mass();
    let mt = (pt * pt + mass * mass).sqrt();
    FourMomentum::on_shell(pt * cos_phi, pt * sin_phi, mt * y.sinh(), mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ---- rapidity ----

    #[test]
    fn rapidity_within_log_mass() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mass: f64 = 100.0;
        for _ in 0..10_000 {
            let y = sample_rapidity(mass, &mut rng);
            assert!(y.abs() <= mass.ln());
        }
    }

    #[test]
    fn rapidity_is_symmetric() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| sample_rapidity(500.0, &mut rng)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.1, "mean {mean}");
    }

    // ---- transverse momentum ----

    #[test]
    fn light_masses_share_a_table() {
        assert_eq!(PtSpectrum::power_for(2.0), PtSpectrum::power_for(59.0));
        assert!(PtSpectrum::power_for(1800.0) < PtSpectrum::power_for(60.0));
        let spectrum = PtSpectrum::new(10.0);
        assert!(spectrum.serves(30.0));
        assert!(!spectrum.serves(200.0));
    }

    #[test]
    fn light_fireball_pt_is_capped() {
        let spectrum = PtSpectrum::new(2.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..5_000 {
            let pt = spectrum.sample(2.0, 5, &mut rng);
            assert!(pt <= 0.4 + 1e-12);
        }
    }

    #[test]
    fn mean_pt_is_soft() {
        let spectrum = PtSpectrum::new(1800.0);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let n = 20_000;
        let mean = (0..n).map(|_| spectrum.sample(1800.0, 60, &mut rng)).sum::<f64>() / n as f64;
        assert!(mean > 0.2 && mean < 1.0, "mean pT {mean}");
    }

    proptest! {
        #[test]
        fn daughters_are_on_shell(seed in any::<u64>(), mass in 2.0f64..2000.0) {
            let spectrum = PtSpectrum::new(mass);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = daughter_momentum(Species::PiPlus, mass, 10, &spectrum, &mut rng);
            prop_assert!((p.mass2() - Species::PiPlus.mass().powi(2)).abs() < 1e-6 * p.e.powi(2).max(1.0));
            prop_assert!(p.pt() <= PT_MAX);
        }
    }
}
