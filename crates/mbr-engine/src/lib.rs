//! Event generation for the MBR minimum-bias generator.
//!
//! [`EventGenerator`] owns the cross-section table and one generator per
//! process. Each call draws a process with the [`ProcessSelector`],
//! builds its fireballs, fragments them, and hands the arena to the
//! [`EventAssembler`]:
//!
//! - [`hard_core`]: one fireball at rest carrying all of `sqrt(s)`
//! - [`double_diffractive`]: two recoiling fireballs
//! - [`single_diffractive`]: a leading (anti)proton and one fireball
//! - [`elastic`]: the scattered beam pair
//!
//! [`GenerationStats`] separates soft failures from abandoned events,
//! [`generate_batch`] spreads a run over threads reproducibly, and
//! [`fingerprint`] hashes events for determinism checks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assembler;
pub mod batch;
pub mod diffraction;
pub mod double_diffractive;
pub mod elastic;
pub mod fingerprint;
pub mod generator;
pub mod hard_core;
pub mod mass_spectrum;
pub mod metrics;
pub mod selector;
pub mod single_diffractive;

pub use assembler::EventAssembler;
pub use batch::{generate_batch, BatchFailure, BatchOutput};
pub use double_diffractive::{DoubleDiffractiveGenerator, DoubleDiffractiveKinematics, GapDraw, GapSampler};
pub use elastic::ElasticGenerator;
pub use fingerprint::{event_fingerprint, run_fingerprint};
pub use generator::EventGenerator;
pub use hard_core::HardCoreGenerator;
pub use mass_spectrum::LegacyMassSpectrum;
pub use metrics::GenerationStats;
pub use selector::ProcessSelector;
pub use single_diffractive::{Recoil, SingleDiffractiveGenerator, SingleDiffractiveKinematics, XiSampler};
