//! Core types for the MBR minimum-bias event generator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace:
//! four-momenta and Lorentz boosts, the hadron species table, particle
//! records and the arena they live in during generation, fireballs,
//! the injected random stream, reusable sampling utilities, and the
//! per-event error taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod event;
pub mod fireball;
pub mod kinematics;
pub mod particle;
pub mod random;
pub mod sampling;
pub mod species;

pub use error::{Axis, BalanceError, FragmentError, GenerateError, PhysicalFault};
pub use event::{Event, ParticleArena, ProcessKind, RetryTally};
pub use fireball::{Fireball, FireballOrigin};
pub use kinematics::{rotate_euler, Boost, FourMomentum};
pub use particle::{Particle, ParticleRange, Status};
pub use random::{worker_stream, RandomStream, RngStream};
pub use sampling::{accept_reject, Accepted, InverseCdfTable, Proposal};
pub use species::Species;
