//! Fireball multiplicity.
//!
//! The average total multiplicity is a log fit in the mass available
//! above one proton, `M - m_p`. The event-by-event multiplicity is drawn
//! from the "dino" distribution: a gamma-like density in `z = n / <n>`
//! whose width parameter `w` shrinks slowly with the mass.

use mbr_core::constants::{MAX_MULTIPLICITY, MAX_REJECTION_TRIALS, MIN_FRAGMENTING_MASS, PROTON_MASS};
use mbr_core::{accept_reject, Accepted, FragmentError, Proposal, RandomStream};

/// Upper edge of the `z` proposal range.
const Z_MAX: f64 = 8.0;

/// Floor for the density mode, reached only for `w <= 1`.
const Z_MODE_FLOOR: f64 = 1e-6;

/// Width-parameter fit `w = 1 / (a + b ln(am + c))`.
const WIDTH_FIT: (f64, f64, f64) = (-0.104, 0.058, 6.0);

/// Multiplicity law of one fireball mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultiplicityModel {
    mass: f64,
    average: f64,
    width: f64,
    max: usize,
}

impl MultiplicityModel {
    /// Build the law for a fireball of `mass` GeV with the average
    /// multiplicity multiplied by `scale`.
    pub fn new(mass: f64, scale: f64) -> Result<Self, FragmentError> {
        if !(mass >= MIN_FRAGMENTING_MASS) {
            return Err(FragmentError::BelowThreshold {
                mass,
                threshold: MIN_FRAGMENTING_MASS,
            });
        }
        let am = mass - PROTON_MASS;
        let average = if am <= 1.0 {
            2.0
        } else {
            let l = (am * am).ln();
            1.5 * (2.0 + 0.13 * l + 0.175 * l * l) * scale
        };
        let (a, b, c) = WIDTH_FIT;
        let width = 1.0 / (a + b * (am + c).ln());
        let max = if mass < 1.3 {
            2
        } else if mass < 1.5 {
            3
        } else if mass < 2.0 {
            4
        } else {
            1000
        };
        Ok(Self {
            mass,
            average,
            width,
            max: max.min(MAX_MULTIPLICITY),
        })
    }

    /// Fireball mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Average total multiplicity.
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Width parameter `w` of the dino density.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Largest multiplicity this mass may produce.
    pub fn max_multiplicity(&self) -> usize {
        self.max
    }

    /// Log of the unnormalized dino density `z^(w-1) e^(-w z)`.
    fn log_density(&self, z: f64) -> f64 {
        (self.width - 1.0) * z.ln() - self.width * z
    }

    /// Draw a multiplicity in `[2, max_multiplicity()]`.
    ///
    /// Draws outside the range are redrawn; the trial cap covers both
    /// the density rejection and the range rejection.
    pub fn sample<R: RandomStream + ?Sized>(&self, rng: &mut R) -> Result<Accepted<usize>, FragmentError> {
        let mode = ((self.width - 1.0) / self.width).max(Z_MODE_FLOOR);
        let log_envelope = self.log_density(mode);
        let mut trials = 0;
        let mut violations = 0;
        while trials < MAX_REJECTION_TRIALS {
            let Some(draw) = accept_reject(rng, MAX_REJECTION_TRIALS - trials, |r| {
                let z = r.uniform() * Z_MAX;
                Proposal {
                    value: z,
                    density: (self.log_density(z) - log_envelope).exp(),
                    envelope: 1.0,
                }
            }) else {
                break;
            };
            trials += draw.trials;
            violations += draw.envelope_violations;
            let n = (draw.value * self.average) as usize;
            if (2..=self.max).contains(&n) {
                return Ok(Accepted {
                    value: n,
                    trials,
                    envelope_violations: violations,
                });
            }
        }
        Err(FragmentError::MultiplicityUnsampled { mass: self.mass })
    }
}
