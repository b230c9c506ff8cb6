//! Benchmark profiles and utilities for the MBR event generator.
//!
//! Provides pre-built configurations for benchmarks and examples:
//!
//! - [`tevatron_profile`]: 900 GeV beams, every process, default models
//! - [`legacy_profile`]: the same mixture on the legacy diffraction models
//! - [`fireball_at_rest`]: a cluster record ready for the fragmenter

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mbr_core::{Boost, Fireball, FireballOrigin, FourMomentum, Particle, ParticleArena};
use mbr_xsec::{DiffractionModel, GenerationConfig, ProcessSet};

/// 900 GeV beams with all four processes and the renormalized flux.
pub fn tevatron_profile(seed: u64) -> GenerationConfig {
    GenerationConfig {
        processes: ProcessSet::ALL,
        seed,
        ..GenerationConfig::default()
    }
}

/// [`tevatron_profile`] with both diffraction models on the legacy
/// mass spectrum.
pub fn legacy_profile(seed: u64) -> GenerationConfig {
    GenerationConfig {
        sd_model: DiffractionModel::Legacy,
        dd_model: DiffractionModel::Legacy,
        ..tevatron_profile(seed)
    }
}

/// Push a neutral cluster of `mass` at rest and return its fireball.
pub fn fireball_at_rest(arena: &mut ParticleArena, mass: f64, origin: FireballOrigin) -> Fireball {
    let index = arena.push(Particle::cluster(FourMomentum::at_rest(mass), mass));
    Fireball {
        index,
        mass,
        charge: 0,
        boost: Boost::IDENTITY,
        origin,
    }
}
