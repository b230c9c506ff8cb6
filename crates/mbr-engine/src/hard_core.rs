//! Hard-core events: the whole collision as one fireball at rest.

use mbr_core::{
    Boost, Fireball, FireballOrigin, FourMomentum, GenerateError, Particle, ParticleArena, RandomStream, RetryTally,
};
use mbr_fragment::FireballFragmenter;

/// Generator of hard-core events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HardCoreGenerator {
    sqrt_s: f64,
}

impl HardCoreGenerator {
    /// Generator for a collision of centre-of-mass energy `sqrt_s`.
    pub fn new(sqrt_s: f64) -> Self {
        Self { sqrt_s }
    }

    /// Append the neutral `sqrt(s)` fireball and its fragments to `arena`.
    ///
    /// A fragmentation failure abandons the event; there is no
    /// process-level retry.
    pub fn generate<R: RandomStream + ?Sized>(
        &self,
        fragmenter: &FireballFragmenter,
        arena: &mut ParticleArena,
        rng: &mut R,
        tally: &mut RetryTally,
    ) -> Result<(), GenerateError> {
        let index = arena.push(Particle::cluster(FourMomentum::at_rest(self.sqrt_s), self.sqrt_s));
        let fireball = Fireball {
            index,
            mass: self.sqrt_s,
            charge: 0,
            boost: Boost::IDENTITY,
            origin: FireballOrigin::HardCore,
        };
        fragmenter.fragment(arena, &fireball, rng, tally)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbr_core::{Species, Status};
    use mbr_test_utils::seeded;

    #[test]
    fn cluster_first_then_neutral_daughters() {
        let generator = HardCoreGenerator::new(1800.0);
        let fragmenter = FireballFragmenter::default();
        let mut rng = seeded(1);
        let mut arena = ParticleArena::new();
        let mut tally = RetryTally::default();
        generator.generate(&fragmenter, &mut arena, &mut rng, &mut tally).unwrap();

        let cluster = &arena.particles()[0];
        assert_eq!(cluster.species, Species::Cluster);
        assert_eq!(cluster.status, Status::Intermediate);
        assert_eq!(cluster.mass, 1800.0);
        let daughters = arena.tail(1);
        assert!(daughters.len() >= 2);
        assert_eq!(daughters.iter().map(|p| p.charge()).sum::<i32>(), 0);
        let e: f64 = daughters.iter().map(|p| p.momentum.e).sum();
        assert!((e - 1800.0).abs() <= 1.8);
    }
}
