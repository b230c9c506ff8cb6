//! Pieces shared by the single- and double-diffractive generators.

use mbr_core::constants::PROTON_MASS;
use mbr_core::{Boost, Fireball, FireballOrigin, FourMomentum, Particle, ParticleArena};

/// Kinematics-plus-fragmentation attempts per diffractive event.
pub const MAX_DIFFRACTIVE_ATTEMPTS: u32 = 10;

/// Squared transverse momentum of a diffractive system of `mass`
/// produced with momentum transfer `t` at `s`.
///
/// Non-positive values mean the pair `(mass, t)` is kinematically
/// forbidden.
pub fn transverse_momentum2(mass: f64, t: f64, s: f64) -> f64 {
    let xf = 1.0 - (mass * mass - PROTON_MASS * PROTON_MASS) / s;
    xf * t.abs() - (PROTON_MASS * (1.0 - xf)).powi(2)
}

/// Push the cluster record of a diffractive fireball with event-frame
/// `momentum` and return the fireball handed to the fragmenter.
pub(crate) fn place_fireball(arena: &mut ParticleArena, momentum: FourMomentum, mass: f64, charge: i32) -> Fireball {
    let index = arena.push(Particle::cluster(momentum, mass));
    Fireball {
        index,
        mass,
        charge,
        boost: Boost::from_rest_frame(&momentum, mass),
        origin: FireballOrigin::Diffractive,
    }
}
