//! Exact two- and three-body phase space for light fireballs.
//!
//! The leading (first) daughter is emitted with a `1 + cos^2(theta)`
//! polar distribution; the others follow from momentum conservation in
//! the fireball rest frame.

use std::f64::consts::PI;

use mbr_core::constants::MAX_REJECTION_TRIALS;
use mbr_core::{rotate_euler, FourMomentum, FragmentError, InverseCdfTable, RandomStream, Species};

/// Bins of the polar-angle table.
pub const POLAR_BINS: usize = 500;

/// Inverse CDF of `1 + cos^2(theta)` on `[0, pi]`.
#[derive(Clone, Debug, PartialEq)]
pub struct PolarAngleTable(InverseCdfTable);

impl PolarAngleTable {
    /// Tabulate the distribution.
    pub fn new() -> Self {
        Self(InverseCdfTable::from_density(0.0, PI, POLAR_BINS, |theta| {
            let c = theta.cos();
            1.0 + c * c
        }))
    }

    /// Draw a polar angle.
    pub fn sample<R: RandomStream + ?Sized>(&self, rng: &mut R) -> f64 {
        self.0.sample(rng)
    }
}

impl Default for PolarAngleTable {
    fn default() -> Self {
        Self::new()
    }
}

fn check_threshold(mass: f64, species: &[Species]) -> Result<(), FragmentError> {
    let threshold: f64 = species.iter().map(|s| s.mass()).sum();
    if mass <= threshold {
        return Err(FragmentError::BelowThreshold { mass, threshold });
    }
    Ok(())
}

/// Decay a fireball of `mass` at rest into `species`.
pub fn two_body<R: RandomStream + ?Sized>(
    mass: f64,
    species: [Species; 2],
    polar: &PolarAngleTable,
    rng: &mut R,
) -> Result<[FourMomentum; 2], FragmentError> {
    check_threshold(mass, &species)?;
    let (m1, m2) = (species[0].mass(), species[1].mass());
    let e1 = 0.5 * (mass * mass + m1 * m1 - m2 * m2) / mass;
    let p = (e1 * e1 - m1 * m1).sqrt();

    let theta = polar.sample(rng);
    let phi = rng.azimuth();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (px, py, pz) = (p * sin_theta * cos_phi, p * sin_theta * sin_phi, p * cos_theta);
    Ok([
        FourMomentum::on_shell(px, py, pz, m1),
        FourMomentum::on_shell(-px, -py, -pz, m2),
    ])
}

/// Decay a fireball of `mass` at rest into `species`.
///
/// The energies of the first two daughters are drawn uniformly over
/// their kinematic ranges until the opening angle between them is
/// physical; the third takes the recoil.
pub fn three_body<R: RandomStream + ?Sized>(
    mass: f64,
    species: [Species; 3],
    polar: &PolarAngleTable,
    rng: &mut R,
) -> Result<[FourMomentum; 3], FragmentError> {
    check_threshold(mass, &species)?;
    let [m1, m2, m3] = species.map(Species::mass);
    let m0 = mass;
    let range1 = 0.5 * (m0 * m0 - (m2 + m3).powi(2) + m1 * m1) / m0 - m1;
    let range2 = 0.5 * (m0 * m0 - (m1 + m3).powi(2) + m2 * m2) / m0 - m2;

    let mut opening = None;
    for _ in 0..MAX_REJECTION_TRIALS {
        let e1 = rng.uniform() * range1 + m1;
        let e2 = rng.uniform() * range2 + m2;
        let p1 = (e1 * e1 - m1 * m1).sqrt();
        let p2 = (e2 * e2 - m2 * m2).sqrt();
        let cos12 = (m0 * m0 + m1 * m1 + m2 * m2 - m3 * m3 - 2.0 * (e1 * m0 + e2 * m0 - e1 * e2)) / (2.0 * p1 * p2);
        if (-1.0..=1.0).contains(&cos12) {
            opening = Some((p1, p2, cos12));
            break;
        }
    }
    let Some((p1, p2, cos12)) = opening else {
        return Err(FragmentError::PhaseSpaceUnsampled { mass });
    };
    let sin12 = (1.0 - cos12 * cos12).sqrt();

    let theta = polar.sample(rng);
    let phi = rng.azimuth();
    let psi = rng.azimuth();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let first = [p1 * sin_theta * cos_phi, p1 * sin_theta * sin_phi, p1 * cos_theta];
    let second = rotate_euler([p2 * sin12, 0.0, p2 * cos12], phi, theta, psi);
    let third = [-first[0] - second[0], -first[1] - second[1], -first[2] - second[2]];
    Ok([
        FourMomentum::on_shell(first[0], first[1], first[2], m1),
        FourMomentum::on_shell(second[0], second[1], second[2], m2),
        FourMomentum::on_shell(third[0], third[1], third[2], m3),
    ])
}
