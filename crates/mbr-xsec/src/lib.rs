//! Configuration and cross sections for the MBR event generator.
//!
//! [`GenerationConfig`] is validated and turned into a read-only
//! [`CrossSectionTable`] by [`CrossSectionModel::initialize`]. The table
//! is computed once per generator and shared by every event.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod flux;
pub mod table;

pub use config::{ConfigError, DiffractionModel, GenerationConfig, ProcessSet, ReggeParameters};
pub use flux::{DoubleDiffractiveFlux, GapDensity, SingleDiffractiveFlux};
pub use table::{CrossSectionModel, CrossSectionTable, CrossSections, FluxSummary, KinematicWindow};
