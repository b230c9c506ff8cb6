//! Four-momenta, Lorentz boosts, and Euler rotations.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A four-momentum `(px, py, pz, E)` in GeV.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FourMomentum {
    /// x component of momentum.
    pub px: f64,
    /// y component of momentum.
    pub py: f64,
    /// z (beam axis) component of momentum.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// The zero four-vector.
    pub const ZERO: Self = Self {
        px: 0.0,
        py: 0.0,
        pz: 0.0,
        e: 0.0,
    };

    /// Build from explicit components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Build an on-shell four-momentum from a three-momentum and a rest mass.
    pub fn on_shell(px: f64, py: f64, pz: f64, mass: f64) -> Self {
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        Self { px, py, pz, e }
    }

    /// A particle of the given mass at rest.
    pub const fn at_rest(mass: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mass)
    }

    /// Same three-momentum with the energy recomputed for `mass`.
    pub fn with_mass(self, mass: f64) -> Self {
        Self::on_shell(self.px, self.py, self.pz, mass)
    }

    /// Squared magnitude of the three-momentum.
    pub fn p2(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        self.p2().sqrt()
    }

    /// Transverse momentum with respect to the beam axis.
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Invariant mass squared, `E^2 - |p|^2`.
    pub fn mass2(&self) -> f64 {
        self.e * self.e - self.p2()
    }

    /// The three-momentum as an array.
    pub fn three(&self) -> [f64; 3] {
        [self.px, self.py, self.pz]
    }

    /// Largest absolute component difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (self.px - other.px)
            .abs()
            .max((self.py - other.py).abs())
            .max((self.pz - other.pz).abs())
            .max((self.e - other.e).abs())
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FourMomentum {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.px - rhs.px,
            self.py - rhs.py,
            self.pz - rhs.pz,
            self.e - rhs.e,
        )
    }
}

impl Neg for FourMomentum {
    type Output = Self;

    /// Reverses the three-momentum and keeps the energy.
    fn neg(self) -> Self {
        Self::new(-self.px, -self.py, -self.pz, self.e)
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// ── Boost ──────────────────────────────────────────────────────────

/// A pure Lorentz boost stored as the velocity `beta` of the target
/// frame together with its Lorentz factor `gamma`.
///
/// [`apply`](Boost::apply) maps a four-momentum into a frame moving
/// with velocity `beta`, so taking a fireball's daughters from its rest
/// frame into the frame where it moves with velocity `v` uses
/// `beta = -v`; [`Boost::from_rest_frame`] builds exactly that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boost {
    beta: [f64; 3],
    gamma: f64,
}

impl Boost {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        beta: [0.0; 3],
        gamma: 1.0,
    };

    /// Build from raw `(beta, gamma)` parameters.
    ///
    /// No consistency check between the two is made; see
    /// [`is_physical`](Boost::is_physical).
    pub const fn new(beta: [f64; 3], gamma: f64) -> Self {
        Self { beta, gamma }
    }

    /// Build from a frame velocity, deriving `gamma`.
    pub fn from_velocity(beta: [f64; 3]) -> Self {
        let b2 = beta[0] * beta[0] + beta[1] * beta[1] + beta[2] * beta[2];
        Self {
            beta,
            gamma: 1.0 / (1.0 - b2).sqrt(),
        }
    }

    /// The boost that takes the rest frame of a system with four-momentum
    /// `momentum` and rest mass `mass` into the frame where the system
    /// has that four-momentum.
    pub fn from_rest_frame(momentum: &FourMomentum, mass: f64) -> Self {
        let e = momentum.e;
        Self {
            beta: [-momentum.px / e, -momentum.py / e, -momentum.pz / e],
            gamma: e / mass,
        }
    }

    /// Target frame velocity.
    pub fn beta(&self) -> [f64; 3] {
        self.beta
    }

    /// Lorentz factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Whether this boost leaves every four-vector unchanged.
    pub fn is_identity(&self) -> bool {
        self.beta == [0.0; 3] && self.gamma == 1.0
    }

    /// Whether the parameters describe a real boost: finite, `|beta| < 1`,
    /// and `gamma >= 1`.
    pub fn is_physical(&self) -> bool {
        let b2 = self.beta.iter().map(|b| b * b).sum::<f64>();
        self.beta.iter().all(|b| b.is_finite())
            && self.gamma.is_finite()
            && b2 < 1.0
            && self.gamma >= 1.0
    }

    /// The boost with the opposite velocity.
    pub fn inverse(&self) -> Self {
        Self {
            beta: [-self.beta[0], -self.beta[1], -self.beta[2]],
            gamma: self.gamma,
        }
    }

    /// Transform `p` into the target frame.
    pub fn apply(&self, p: &FourMomentum) -> FourMomentum {
        let [bx, by, bz] = self.beta;
        let g = self.gamma;
        let bp = bx * p.px + by * p.py + bz * p.pz;
        let shift = (bp * g / (g + 1.0) - p.e) * g;
        FourMomentum {
            px: p.px + bx * shift,
            py: p.py + by * shift,
            pz: p.pz + bz * shift,
            e: g * (p.e - bp),
        }
    }
}

impl Default for Boost {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotate a three-vector by the Euler angles `(phi, theta, psi)`.
///
/// `psi` turns about z first, then `theta` tilts the z axis towards x,
/// and `phi` finally turns about z again. A vector along z ends up at
/// polar angle `theta` and azimuth `phi`.
pub fn rotate_euler(v: [f64; 3], phi: f64, theta: f64, psi: f64) -> [f64; 3] {
    let [x, y, z] = v;
    let (sin_psi, cos_psi) = psi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let ax = x * cos_psi - y * sin_psi;
    let ay = x * sin_psi + y * cos_psi;
    let bx = z * sin_theta + ax * cos_theta;
    let rz = z * cos_theta - ax * sin_theta;
    [bx * cos_phi - ay * sin_phi, bx * sin_phi + ay * cos_phi, rz]
}
