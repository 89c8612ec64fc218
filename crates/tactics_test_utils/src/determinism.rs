//! Determinism testing utilities.
//!
//! The agent must produce the identical order stream every time it is
//! fed the same snapshot sequence. Sources of non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different
//!   results. The core uses fixed-point arithmetic throughout.
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The core scans units and pool commands in host/insertion order.
//! - **System randomness**: No unseeded randomness anywhere.
//!
//! The harness reruns an agent over the same scripted snapshots and
//! hashes the resulting order stream.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tactics_core::prelude::{Agent, Order, WorldSnapshot};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Order-stream hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks fed per run.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Whether all runs produced identical order streams.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert that the agent was deterministic, with a detailed error
    /// message.
    ///
    /// # Panics
    ///
    /// Panics if runs produced different order-stream hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Agent is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Hash an emitted order stream.
#[must_use]
pub fn hash_orders(orders: &[Option<Order>]) -> u64 {
    let mut hasher = DefaultHasher::new();
    orders.len().hash(&mut hasher);
    for order in orders {
        order.hash(&mut hasher);
    }
    hasher.finish()
}

/// Run an agent `runs` times over the same snapshot sequence and
/// compare the order streams.
///
/// # Panics
///
/// Panics if the agent returns an error for any snapshot; determinism
/// scenarios are expected to be valid.
pub fn verify_determinism<Setup>(
    runs: usize,
    snapshots: &[WorldSnapshot],
    setup: Setup,
) -> DeterminismResult
where
    Setup: Fn() -> Agent,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut agent = setup();
        let orders: Vec<Option<Order>> = snapshots
            .iter()
            .map(|snapshot| agent.step(snapshot).expect("scenario snapshot is valid"))
            .collect();
        hashes.push(hash_orders(&orders));
    }

    DeterminismResult {
        hashes,
        ticks: snapshots.len() as u64,
    }
}
