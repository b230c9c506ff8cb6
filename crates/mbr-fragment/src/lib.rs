//! Fireball fragmentation for the MBR event generator.
//!
//! [`FireballFragmenter::fragment`] turns one [`Fireball`](mbr_core::Fireball)
//! into final-state hadrons appended to the event arena. The building
//! blocks are public so they can be tested and benchmarked alone:
//!
//! - [`multiplicity`]: average multiplicity fit and the dino sampler
//! - [`plan`]: species assignment and the choice of decay mode
//! - [`kinematics`]: rapidity and transverse-momentum sampling
//! - [`decay`]: exact two- and three-body phase space
//! - [`balance`]: the energy-momentum balancing solver

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod balance;
pub mod decay;
pub mod fragmenter;
pub mod kinematics;
pub mod multiplicity;
pub mod plan;

pub use balance::{balance_momentum, longitudinal_power, BalanceReport};
pub use decay::PolarAngleTable;
pub use fragmenter::{FireballFragmenter, FragmenterParams};
pub use kinematics::PtSpectrum;
pub use multiplicity::MultiplicityModel;
pub use plan::{DecayMode, FragmentPlan};
