//! MBR: a minimum-bias proton-antiproton Monte Carlo event generator.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all MBR sub-crates. For most users, adding `mbr` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use mbr::prelude::*;
//!
//! let config = GenerationConfig {
//!     processes: ProcessSet::ALL,
//!     ..GenerationConfig::default()
//! };
//! let generator = EventGenerator::new(config).unwrap();
//!
//! let mut rng = worker_stream(generator.config().seed, 0);
//! let mut stats = GenerationStats::default();
//! let event = generator.next_event(&mut rng, &mut stats).unwrap();
//!
//! assert_eq!(event.final_charge(), 0);
//! let sqrt_s = generator.config().sqrt_s();
//! assert!((event.final_momentum().e - sqrt_s).abs() < 1e-3 * sqrt_s);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mbr-core` | Four-vectors, species, particles, events, random streams, errors |
//! | [`xsec`] | `mbr-xsec` | Configuration, cross sections, pomeron flux integrals |
//! | [`fragment`] | `mbr-fragment` | Multiplicity, phase space, momentum balancing |
//! | [`engine`] | `mbr-engine` | Process generators, event driver, statistics, batches |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`mbr-core`).
///
/// Four-momenta, boosts, the species table, particle records, the event
/// arena, the [`types::RandomStream`] abstraction, and per-event errors.
pub use mbr_core as types;

/// Configuration and cross sections (`mbr-xsec`).
///
/// [`xsec::GenerationConfig`] is validated and turned into a
/// [`xsec::CrossSectionTable`] once per generator.
pub use mbr_xsec as xsec;

/// Fireball fragmentation (`mbr-fragment`).
pub use mbr_fragment as fragment;

/// Event generation (`mbr-engine`).
///
/// [`engine::EventGenerator`] for single events,
/// [`engine::generate_batch`] for reproducible multi-threaded runs.
pub use mbr_engine as engine;

/// Common imports for typical MBR usage.
///
/// ```rust
/// use mbr::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mbr_core::{
        worker_stream, Boost, Event, FourMomentum, Particle, ParticleRange, ProcessKind, RandomStream, RngStream,
        Species, Status,
    };

    // Errors
    pub use mbr_core::{BalanceError, FragmentError, GenerateError};
    pub use mbr_xsec::ConfigError;

    // Configuration
    pub use mbr_xsec::{CrossSectionTable, DiffractionModel, GenerationConfig, ProcessSet, ReggeParameters};

    // Engine
    pub use mbr_engine::{
        event_fingerprint, generate_batch, run_fingerprint, BatchOutput, EventGenerator, GenerationStats,
    };
}
