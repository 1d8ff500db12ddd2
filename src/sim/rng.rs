//! Named random streams derived from the session seed
//!
//! Each subsystem draws from its own stream so that adding draws in one
//! (say, an extra zoning roll) never perturbs another's sequence.

use rand_pcg::Pcg32;

/// Building placement during terrain zoning
pub const TERRAIN_STREAM: u64 = 1;
/// Tornado spawn, strength, pattern and heading rolls
pub const LIFECYCLE_STREAM: u64 = 2;

/// Build the RNG for a named stream of a session seed
pub fn stream_rng(seed: u64, stream: u64) -> Pcg32 {
    // Pcg32 state is an arbitrary u64; mix so nearby seeds diverge quickly
    let state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    Pcg32::new(state, stream)
}
