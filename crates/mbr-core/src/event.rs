//! The per-event particle arena and the finished [`Event`].

use std::fmt;

use crate::kinematics::{Boost, FourMomentum};
use crate::particle::{Particle, ParticleRange};

/// The four collision processes the generator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    /// Whole collision treated as one fireball at rest.
    HardCore,
    /// Both beam particles dissociate.
    DoubleDiffractive,
    /// One beam particle dissociates, the other recoils intact.
    SingleDiffractive,
    /// Both beam particles scatter intact.
    Elastic,
}

impl ProcessKind {
    /// All processes in selection order.
    pub const ALL: [ProcessKind; 4] = [
        ProcessKind::HardCore,
        ProcessKind::DoubleDiffractive,
        ProcessKind::SingleDiffractive,
        ProcessKind::Elastic,
    ];

    /// Position in [`ProcessKind::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::HardCore => 0,
            Self::DoubleDiffractive => 1,
            Self::SingleDiffractive => 2,
            Self::Elastic => 3,
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HardCore => "hard-core",
            Self::DoubleDiffractive => "double-diffractive",
            Self::SingleDiffractive => "single-diffractive",
            Self::Elastic => "elastic",
        };
        f.write_str(name)
    }
}

/// Retry counts accumulated while generating one event.
///
/// Soft failures only: every counted retry was followed by further
/// attempts. The engine folds these into its run statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryTally {
    /// Diffractive mass/momentum-transfer attempts beyond the first.
    pub mass_retries: u32,
    /// Multiplicity resamplings beyond the first, over all fireballs.
    pub multiplicity_retries: u32,
    /// Kinematics resamplings beyond the first, over all fireballs.
    pub kinematics_retries: u32,
    /// Rejection candidates whose density exceeded the sampling envelope.
    pub envelope_violations: u32,
}

impl RetryTally {
    /// Whether any retry was recorded.
    pub fn any_retry(&self) -> bool {
        self.mass_retries > 0 || self.multiplicity_retries > 0 || self.kinematics_retries > 0
    }
}

// ── ParticleArena ──────────────────────────────────────────────────

/// Growable particle sequence used while an event is being built.
///
/// Positions handed out by [`push`](ParticleArena::push) stay valid
/// until [`truncate`](ParticleArena::truncate) drops them; retries
/// roll the arena back to a saved length.
#[derive(Clone, Debug, Default)]
pub struct ParticleArena {
    particles: Vec<Particle>,
}

impl ParticleArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena with room for `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Append a particle and return its position.
    pub fn push(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// Number of particles currently stored.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the arena holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Mutable particle at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// All particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles from `start` to the end.
    pub fn tail(&self, start: usize) -> &[Particle] {
        self.particles.get(start..).unwrap_or(&[])
    }

    /// Mutable particles from `start` to the end.
    pub fn tail_mut(&mut self, start: usize) -> &mut [Particle] {
        match self.particles.get_mut(start..) {
            Some(tail) => tail,
            None => &mut [],
        }
    }

    /// Drop every particle at or after `len`.
    pub fn truncate(&mut self, len: usize) {
        self.particles.truncate(len);
    }

    /// Remove every particle, keeping the allocation.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Record that `parent` decayed into the particles in `daughters`.
    pub fn link_daughters(&mut self, parent: usize, daughters: ParticleRange) {
        if let Some(p) = self.particles.get_mut(parent) {
            p.daughters = Some(daughters);
        }
    }

    /// Apply `boost` to every particle.
    pub fn boost_all(&mut self, boost: &Boost) {
        if boost.is_identity() {
            return;
        }
        for p in &mut self.particles {
            p.momentum = boost.apply(&p.momentum);
        }
    }

    /// Freeze the contents into an [`Event`], leaving the arena empty.
    pub fn finish(&mut self, process: ProcessKind) -> Event {
        Event {
            process,
            particles: std::mem::take(&mut self.particles),
        }
    }
}

// ── Event ──────────────────────────────────────────────────────────

/// A completed collision: the selected process and its ordered particle
/// list. Mother and daughter links index into this list.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    process: ProcessKind,
    particles: Vec<Particle>,
}

impl Event {
    /// The process that produced this event.
    pub fn process(&self) -> ProcessKind {
        self.process
    }

    /// All particle records in generation order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particle records, intermediate ones included.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the event holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Final-state particles only.
    pub fn final_state(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_final())
    }

    /// Number of final-state particles.
    pub fn multiplicity(&self) -> usize {
        self.final_state().count()
    }

    /// Summed four-momentum of the final state.
    pub fn final_momentum(&self) -> FourMomentum {
        self.final_state().map(|p| p.momentum).sum()
    }

    /// Net electric charge of the final state.
    pub fn final_charge(&self) -> i32 {
        self.final_state().map(|p| p.charge()).sum()
    }

    /// Consume the event and return its particle records.
    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;

    fn pion(pz: f64) -> Particle {
        Particle::final_state(Species::PiPlus, FourMomentum::on_shell(0.0, 0.0, pz, 0.139))
    }

    #[test]
    fn process_indices_follow_selection_order() {
        for (i, kind) in ProcessKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(ProcessKind::Elastic.to_string(), "elastic");
    }

    #[test]
    fn tally_any_retry() {
        let mut t = RetryTally::default();
        assert!(!t.any_retry());
        t.envelope_violations = 3;
        assert!(!t.any_retry());
        t.kinematics_retries = 1;
        assert!(t.any_retry());
    }

    #[test]
    fn push_truncate_rolls_back() {
        let mut arena = ParticleArena::new();
        arena.push(pion(1.0));
        let mark = arena.len();
        arena.push(pion(2.0));
        arena.push(pion(3.0));
        assert_eq!(arena.tail(mark).len(), 2);
        arena.truncate(mark);
        assert_eq!(arena.len(), 1);
        assert!(arena.tail(5).is_empty());
    }

    #[test]
    fn link_daughters_sets_range() {
        let mut arena = ParticleArena::new();
        let parent = arena.push(Particle::cluster(FourMomentum::at_rest(3.0), 3.0));
        arena.push(pion(1.0).with_mother(parent));
        arena.push(pion(-1.0).with_mother(parent));
        arena.link_daughters(parent, ParticleRange { first: 1, last: 2 });
        assert_eq!(
            arena.get(parent).and_then(|p| p.daughters),
            Some(ParticleRange { first: 1, last: 2 })
        );
    }

    #[test]
    fn finish_moves_particles_into_event() {
        let mut arena = ParticleArena::new();
        arena.push(Particle::cluster(FourMomentum::at_rest(3.0), 3.0));
        arena.push(pion(1.0));
        arena.push(pion(-1.0));
        let event = arena.finish(ProcessKind::HardCore);
        assert!(arena.is_empty());
        assert_eq!(event.len(), 3);
        assert_eq!(event.multiplicity(), 2);
        assert_eq!(event.final_charge(), 2);
        let total = event.final_momentum();
        assert!(total.pz.abs() < 1e-15);
        assert_eq!(event.process(), ProcessKind::HardCore);
    }

    #[test]
    fn boost_all_moves_every_particle() {
        let mut arena = ParticleArena::new();
        arena.push(pion(0.0));
        arena.boost_all(&Boost::from_velocity([0.0, 0.0, -0.5]));
        let p = arena.particles()[0].momentum;
        assert!(p.pz > 0.0);
    }
}
