//! Event fingerprints for reproducibility checks.
//!
//! FNV-1a over every particle record, bit-exact in the momenta. Two
//! runs with the same configuration and seed must produce the same
//! fingerprints; these hashes are not cryptographically secure.

use mbr_core::{Event, Particle, ParticleRange};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn fold_range(hash: u64, range: Option<ParticleRange>) -> u64 {
    match range {
        Some(r) => fnv1a_u64(fnv1a_u64(hash, r.first as u64), r.last as u64),
        None => fnv1a_u64(hash, u64::MAX),
    }
}

fn fold_particle(mut hash: u64, p: &Particle) -> u64 {
    hash = fnv1a_u64(hash, p.species.pdg_code() as i64 as u64);
    hash = fnv1a_u64(hash, p.status.code() as i64 as u64);
    hash = fold_range(hash, p.mothers);
    hash = fold_range(hash, p.daughters);
    let m = &p.momentum;
    for v in [m.px, m.py, m.pz, m.e, p.mass] {
        hash = fnv1a_u64(hash, v.to_bits());
    }
    hash
}

/// Hash of one event: its process, then every record in order.
pub fn event_fingerprint(event: &Event) -> u64 {
    let hash = fnv1a_u64(FNV_OFFSET, event.process().index() as u64);
    event.particles().iter().fold(hash, fold_particle)
}

/// Hash of a sequence of events; order matters.
pub fn run_fingerprint<'a>(events: impl IntoIterator<Item = &'a Event>) -> u64 {
    events
        .into_iter()
        .fold(FNV_OFFSET, |hash, event| fnv1a_u64(hash, event_fingerprint(event)))
}
