//! Pseudo-random stream provisioning for workers and re-evaluations.
//!
//! Spread estimates only need statistically independent streams, not
//! cryptographic strength. With an explicit master seed every stream is a
//! pure function of `(master, candidate, iteration)`, which makes a whole
//! selection run reproducible and independent of how candidates are
//! assigned to threads. Without one, streams mix OS entropy with the wall
//! clock and the per-evaluation salt.

use crate::graph::NodeId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Derives the RNG streams used across Phase-1 workers and Phase-2
/// re-evaluations.
#[derive(Debug, Clone, Copy)]
pub struct SeedSchedule {
    master: Option<u64>,
}

impl SeedSchedule {
    pub fn new(master: Option<u64>) -> Self {
        Self { master }
    }

    /// Whether streams are derived deterministically from a master seed.
    pub fn is_deterministic(&self) -> bool {
        self.master.is_some()
    }

    /// The stream for estimating `candidate` against a seed set of size
    /// `iteration`. Phase 1 is `iteration == 0`.
    pub fn rng_for(&self, candidate: NodeId, iteration: usize) -> StdRng {
        let salt = mix(((candidate as u64) << 32) | iteration as u64);
        let seed = match self.master {
            Some(master) => mix(master ^ salt),
            None => {
                let clock = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(0);
                rand::thread_rng().gen::<u64>() ^ mix(clock) ^ salt
            }
        };
        StdRng::seed_from_u64(seed)
    }
}

/// SplitMix64 finalizer: decorrelates nearby salts into well-spread seeds.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
