//! Per-event error types for the MBR generator.
//!
//! Organized by the level that raises them: momentum balancing,
//! fireball fragmentation, and whole-event generation. All of these are
//! recoverable; callers retry at the next coarser level or abandon the
//! event. Configuration errors live with the configuration.

use std::error::Error;
use std::fmt;

use crate::event::ProcessKind;

/// A Cartesian momentum axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Transverse x.
    X,
    /// Transverse y.
    Y,
    /// Longitudinal z.
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// What made a balancing pass physically impossible.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicalFault {
    /// Energy tied up in transverse motion already exceeds the mass.
    TransverseEnergyExceedsMass {
        /// Sum of `E - |pz|` over the daughters.
        transverse: f64,
        /// Fireball mass.
        mass: f64,
    },
    /// No daughter left on one side of `pz = 0`.
    EmptyHemisphere,
    /// A correction flipped the sign of a longitudinal momentum.
    SignFlip {
        /// Position of the offending daughter within the fireball.
        daughter: usize,
    },
}

impl fmt::Display for PhysicalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransverseEnergyExceedsMass { transverse, mass } => {
                write!(f, "transverse energy {transverse:.4} exceeds mass {mass:.4}")
            }
            Self::EmptyHemisphere => write!(f, "one longitudinal hemisphere is empty"),
            Self::SignFlip { daughter } => {
                write!(f, "correction flipped pz sign of daughter {daughter}")
            }
        }
    }
}

/// Errors from energy-momentum balancing of one fireball's daughters.
#[derive(Clone, Debug, PartialEq)]
pub enum BalanceError {
    /// Every daughter lies on the same side of an axis, so no common
    /// rescale can cancel that momentum component.
    Geometric {
        /// The unbalanceable axis.
        axis: Axis,
    },
    /// The correction broke down numerically or physically.
    Physical {
        /// Which check failed.
        fault: PhysicalFault,
    },
    /// Energy was still off after the iteration cap.
    Convergence {
        /// Iterations performed.
        iterations: u32,
        /// Remaining `|sum E - M| / M`.
        residual: f64,
    },
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometric { axis } => {
                write!(f, "all daughters on one side of the {axis} axis")
            }
            Self::Physical { fault } => write!(f, "physical breakdown: {fault}"),
            Self::Convergence {
                iterations,
                residual,
            } => write!(
                f,
                "energy not restored after {iterations} iterations (residual {residual:.2e})"
            ),
        }
    }
}

impl Error for BalanceError {}

/// Errors from fragmenting one fireball.
#[derive(Clone, Debug, PartialEq)]
pub enum FragmentError {
    /// The fireball is lighter than the daughters it must produce.
    BelowThreshold {
        /// Fireball mass.
        mass: f64,
        /// Minimum mass required.
        threshold: f64,
    },
    /// The multiplicity sampler hit its trial cap.
    MultiplicityUnsampled {
        /// Fireball mass.
        mass: f64,
    },
    /// The three-body phase-space sampler hit its trial cap.
    PhaseSpaceUnsampled {
        /// Fireball mass.
        mass: f64,
    },
    /// Every multiplicity and kinematics retry failed to balance.
    Exhausted {
        /// Multiplicity samples tried.
        attempts: u32,
        /// The last balancing failure.
        last: BalanceError,
    },
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowThreshold { mass, threshold } => {
                write!(f, "fireball mass {mass:.4} below threshold {threshold:.4}")
            }
            Self::MultiplicityUnsampled { mass } => {
                write!(f, "no multiplicity accepted for fireball mass {mass:.4}")
            }
            Self::PhaseSpaceUnsampled { mass } => {
                write!(f, "no three-body configuration accepted for mass {mass:.4}")
            }
            Self::Exhausted { attempts, last } => {
                write!(f, "fragmentation failed after {attempts} multiplicity attempts: {last}")
            }
        }
    }
}

impl Error for FragmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Exhausted { last, .. } => Some(last),
            _ => None,
        }
    }
}

/// Errors that abandon the event being generated.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerateError {
    /// A diffractive process used up its attempts without producing
    /// valid kinematics and fragments.
    KinematicsExhausted {
        /// The process being generated.
        process: ProcessKind,
        /// Attempts made.
        attempts: u32,
        /// The last fragmentation failure, when that was the cause.
        last: Option<FragmentError>,
    },
    /// A hard-core fireball could not be fragmented.
    Fragment(FragmentError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KinematicsExhausted {
                process,
                attempts,
                last,
            } => {
                write!(f, "{process} kinematics exhausted after {attempts} attempts")?;
                if let Some(e) = last {
                    write!(f, ": {e}")?;
                }
                Ok(())
            }
            Self::Fragment(e) => write!(f, "fragmentation failed: {e}"),
        }
    }
}

impl Error for GenerateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::KinematicsExhausted { last, .. } => last.as_ref().map(|e| e as &(dyn Error + 'static)),
            Self::Fragment(e) => Some(e),
        }
    }
}

impl From<FragmentError> for GenerateError {
    fn from(e: FragmentError) -> Self {
        Self::Fragment(e)
    }
}
