//! Final assembly of a generated event.

use mbr_core::{Boost, Event, ParticleArena, ProcessKind};

/// Applies the lab boost and freezes the particle list.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventAssembler {
    boost: Boost,
}

impl EventAssembler {
    /// Assembler applying `boost` (event centre-of-mass to lab).
    pub fn new(boost: Boost) -> Self {
        Self { boost }
    }

    /// The configured boost.
    pub fn boost(&self) -> &Boost {
        &self.boost
    }

    /// Boost every particle in `arena` and return the finished event.
    pub fn assemble(&self, arena: &mut ParticleArena, process: ProcessKind) -> Event {
        arena.boost_all(&self.boost);
        arena.finish(process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_core::{FourMomentum, Particle, Species};

    fn arena() -> ParticleArena {
        let mut arena = ParticleArena::new();
        arena.push(Particle::final_state(
            Species::PiPlus,
            FourMomentum::on_shell(0.3, 0.1, 2.0, Species::PiPlus.mass()),
        ));
        arena
    }

    #[test]
    fn identity_leaves_momenta_untouched() {
        let mut a = arena();
        let before = a.particles()[0].momentum;
        let event = EventAssembler::default().assemble(&mut a, ProcessKind::HardCore);
        assert_eq!(event.particles()[0].momentum, before);
        assert_eq!(event.process(), ProcessKind::HardCore);
        assert!(a.is_empty());
    }

    #[test]
    fn boost_preserves_mass() {
        let mut a = arena();
        let assembler = EventAssembler::new(Boost::from_velocity([0.0, 0.0, 0.6]));
        let event = assembler.assemble(&mut a, ProcessKind::Elastic);
        let p = event.particles()[0].momentum;
        assert!((p.mass2() - Species::PiPlus.mass().powi(2)).abs() < 1e-9);
        assert!(p.pz != 2.0);
    }
}
