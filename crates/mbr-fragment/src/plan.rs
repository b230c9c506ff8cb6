//! Daughter species of one fireball.
//!
//! A charged fireball always emits a leading nucleon carrying its
//! charge: the charged nucleon itself, or the neutral one together with
//! a charged pion. The remaining multiplicity is split into "objects",
//! each either a neutral pion or a charged pion pair, so the net charge
//! of the daughters is always the fireball's.

use smallvec::{smallvec, SmallVec};

use mbr_core::constants::MAX_MULTIPLICITY;
use mbr_core::{Accepted, FragmentError, RandomStream, Species};

use crate::multiplicity::MultiplicityModel;

/// How the daughters of a fireball get their momenta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayMode {
    /// Exact two-body phase space; the first species is the leading one.
    TwoBody([Species; 2]),
    /// Exact three-body phase space; the first species is the leading one.
    ThreeBody([Species; 3]),
    /// Independent rapidity and transverse momentum per daughter,
    /// followed by momentum balancing.
    Independent,
}

/// Species content of one fragmentation attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct FragmentPlan {
    /// Leading particles: empty, a charged nucleon, or a neutral nucleon
    /// and a charged pion.
    pub leading: SmallVec<[Species; 2]>,
    /// Number of charged pion pairs.
    pub pairs: usize,
    /// Number of neutral pions.
    pub neutrals: usize,
    /// Momentum model.
    pub mode: DecayMode,
}

impl FragmentPlan {
    /// Draw a multiplicity from `model` and assign species for a fireball
    /// of net `charge` (-1, 0 or +1). `charged_fraction` is the
    /// probability that the leading nucleon is charged.
    ///
    /// Plans with more than [`MAX_MULTIPLICITY`] daughters are redrawn;
    /// `trials` counts the plans drawn.
    pub fn draw<R: RandomStream + ?Sized>(
        model: &MultiplicityModel,
        charge: i32,
        charged_fraction: f64,
        rng: &mut R,
    ) -> Result<Accepted<Self>, FragmentError> {
        let mut trials = 0;
        let mut envelope_violations = 0;
        loop {
            let sampled = model.sample(rng)?;
            trials += 1;
            envelope_violations += sampled.envelope_violations;
            let mut remaining = sampled.value;
            let mut charged_leading = false;
            let mut leading: SmallVec<[Species; 2]> = SmallVec::new();
            if charge != 0 {
                charged_leading = rng.uniform() < charged_fraction;
                leading = leading_species(charge, charged_leading);
                remaining = remaining.saturating_sub(leading.len());
            }

            let mut objects = (0.5 + remaining as f64 * 2.0 / 3.0) as usize;
            if charge == 0 && objects == 1 {
                objects = 2;
            }
            let mut pairs = 0;
            let mut neutrals = 0;
            for _ in 0..objects {
                if rng.uniform() > 0.5 {
                    neutrals += 1;
                } else {
                    pairs += 1;
                }
            }

            let total = leading.len() + 2 * pairs + neutrals;
            if total > MAX_MULTIPLICITY {
                continue;
            }
            let mode = match (total, charge != 0) {
                (2, true) => DecayMode::TwoBody([leading[0], *leading.get(1).unwrap_or(&Species::PiZero)]),
                (3, true) => DecayMode::ThreeBody(three_body_species(&leading, charged_leading, rng)),
                _ => DecayMode::Independent,
            };
            return Ok(Accepted {
                value: Self {
                    leading,
                    pairs,
                    neutrals,
                    mode,
                },
                trials,
                envelope_violations,
            });
        }
    }

    /// Total number of daughters.
    pub fn len(&self) -> usize {
        self.leading.len() + 2 * self.pairs + self.neutrals
    }

    /// Whether the plan has no daughters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Net charge of the planned daughters.
    pub fn charge(&self) -> i32 {
        self.species().map(Species::charge).sum()
    }

    /// Daughter species in emission order: leading particles, then
    /// `pi+ pi-` pairs, then neutral pions.
    pub fn species(&self) -> impl Iterator<Item = Species> + '_ {
        let pairs = std::iter::repeat([Species::PiPlus, Species::PiMinus])
            .take(self.pairs)
            .flatten();
        let neutrals = std::iter::repeat(Species::PiZero).take(self.neutrals);
        self.leading.iter().copied().chain(pairs).chain(neutrals)
    }
}

fn leading_species(charge: i32, charged: bool) -> SmallVec<[Species; 2]> {
    match (charge > 0, charged) {
        (true, true) => smallvec![Species::Proton],
        (true, false) => smallvec![Species::Neutron, Species::PiPlus],
        (false, true) => smallvec![Species::AntiProton],
        (false, false) => smallvec![Species::AntiNeutron, Species::PiMinus],
    }
}

/// Three-body content: a charged nucleon gets a `pi+ pi-` or `pi0 pi0`
/// pair with equal odds, a neutral one keeps its pion and adds a `pi0`.
fn three_body_species<R: RandomStream + ?Sized>(
    leading: &[Species],
    charged_leading: bool,
    rng: &mut R,
) -> [Species; 3] {
    match leading {
        [nucleon] if charged_leading => {
            if rng.uniform() > 0.5 {
                [*nucleon, Species::PiPlus, Species::PiMinus]
            } else {
                [*nucleon, Species::PiZero, Species::PiZero]
            }
        }
        [nucleon, pion] => [*nucleon, *pion, Species::PiZero],
        _ => [Species::PiPlus, Species::PiMinus, Species::PiZero],
    }
}
