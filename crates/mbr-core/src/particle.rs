//! Particle records stored in an event.

use crate::kinematics::FourMomentum;
use crate::species::Species;

/// Lifecycle status of a particle record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Stable final-state particle (status code 1).
    Final,
    /// Intermediate record that decayed into daughters (status code 3).
    Intermediate,
}

impl Status {
    /// Numeric status code used by downstream event records.
    pub const fn code(self) -> i32 {
        match self {
            Self::Final => 1,
            Self::Intermediate => 3,
        }
    }
}

/// An inclusive range of positions `[first, last]` in the same event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParticleRange {
    /// First position, inclusive.
    pub first: usize,
    /// Last position, inclusive.
    pub last: usize,
}

impl ParticleRange {
    /// A range holding exactly one position.
    pub const fn single(index: usize) -> Self {
        Self {
            first: index,
            last: index,
        }
    }

    /// Number of positions covered.
    pub const fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always false; ranges are never empty.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies inside the range.
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.first && index <= self.last
    }

    /// As a half-open `Range` suitable for slicing.
    pub const fn as_range(&self) -> std::ops::Range<usize> {
        self.first..self.last + 1
    }
}

/// One entry of an event's particle list.
///
/// Mother and daughter links are positions in the same event; they are
/// back-references only and never imply ownership.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Particle species.
    pub species: Species,
    /// Final or intermediate.
    pub status: Status,
    /// Position(s) of the record this particle was produced by.
    pub mothers: Option<ParticleRange>,
    /// Position(s) of the records this particle decayed into.
    pub daughters: Option<ParticleRange>,
    /// Four-momentum in the event frame.
    pub momentum: FourMomentum,
    /// Rest mass in GeV.
    pub mass: f64,
}

impl Particle {
    /// A final-state hadron with its tabulated mass and no parent.
    pub fn final_state(species: Species, momentum: FourMomentum) -> Self {
        Self {
            species,
            status: Status::Final,
            mothers: None,
            daughters: None,
            momentum,
            mass: species.mass(),
        }
    }

    /// An intermediate fireball record with its own mass.
    pub fn cluster(momentum: FourMomentum, mass: f64) -> Self {
        Self {
            species: Species::Cluster,
            status: Status::Intermediate,
            mothers: None,
            daughters: None,
            momentum,
            mass,
        }
    }

    /// Attach a mother link.
    pub fn with_mother(mut self, mother: usize) -> Self {
        self.mothers = Some(ParticleRange::single(mother));
        self
    }

    /// Whether this record is a stable final-state particle.
    pub fn is_final(&self) -> bool {
        self.status == Status::Final
    }

    /// Electric charge in units of e.
    pub fn charge(&self) -> i32 {
        self.species.charge()
    }
}
