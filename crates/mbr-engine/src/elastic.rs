//! Elastic scattering: the beams exchange momentum `t` and stay intact.

use mbr_core::{FourMomentum, Particle, ParticleArena, RandomStream, Species};

/// Generator of elastic events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElasticGenerator {
    beam_momentum: f64,
    slope: f64,
}

impl ElasticGenerator {
    /// Generator for beams of `beam_momentum` (GeV) and elastic slope
    /// `slope` (GeV^-2).
    pub fn new(beam_momentum: f64, slope: f64) -> Self {
        Self { beam_momentum, slope }
    }

    /// Draw `|t|` from `exp(-b |t|)`, capped at backward scattering
    /// `4 p^2`.
    pub fn sample_t<R: RandomStream + ?Sized>(&self, rng: &mut R) -> f64 {
        let t = -(1.0 - rng.uniform()).ln() / self.slope;
        t.min(4.0 * self.beam_momentum * self.beam_momentum)
    }

    /// Append the scattered proton and antiproton to `arena`.
    pub fn generate<R: RandomStream + ?Sized>(&self, arena: &mut ParticleArena, rng: &mut R) {
        let p = self.beam_momentum;
        let x = self.sample_t(rng) / (p * p);
        let cos_theta = 1.0 - 0.5 * x;
        let sin_theta = (x - 0.25 * x * x).max(0.0).sqrt();
        let (sin_phi, cos_phi) = rng.azimuth().sin_cos();
        let (px, py, pz) = (p * sin_theta * cos_phi, p * sin_theta * sin_phi, p * cos_theta);
        arena.push(Particle::final_state(
            Species::Proton,
            FourMomentum::on_shell(px, py, pz, Species::Proton.mass()),
        ));
        arena.push(Particle::final_state(
            Species::AntiProton,
            FourMomentum::on_shell(-px, -py, -pz, Species::AntiProton.mass()),
        ));
    }
}
