//! Fireballs: excited hadronic systems awaiting fragmentation.

use crate::kinematics::Boost;

/// How a fireball was created; selects the longitudinal balancing power.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireballOrigin {
    /// The whole collision at rest in the event frame.
    HardCore,
    /// A diffractively excited beam particle.
    Diffractive,
}

/// Transient record handed from a process generator to the fragmenter.
///
/// The matching intermediate [`Particle`](crate::Particle) already sits
/// in the arena at `index`; the fragmenter links its daughters there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fireball {
    /// Arena position of the intermediate cluster record.
    pub index: usize,
    /// Rest mass in GeV.
    pub mass: f64,
    /// Net electric charge the daughters must carry.
    pub charge: i32,
    /// Boost from the fireball rest frame into the event frame.
    pub boost: Boost,
    /// Creating process family.
    pub origin: FireballOrigin,
}
