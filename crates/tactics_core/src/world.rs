//! Per-tick world snapshot and the derived unit views.
//!
//! The host supplies a fresh [`WorldSnapshot`] every tick. The
//! [`UnitSet`] views are rebuilt atomically from it and are never
//! mutated mid-tick: commands read them and emit orders, they do not
//! write unit positions.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::geometry::Rect;
use crate::units::{Unit, UnitKind};

/// The unit collection for one side at the current tick.
///
/// Units are kept in host-supplied order, which the host guarantees to
/// be stable for a given tick; all scans over the set are therefore
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSet {
    units: Vec<Unit>,
}

impl UnitSet {
    /// Build a set from the host's unit list for one side.
    #[must_use]
    pub fn new(units: Vec<Unit>) -> Self {
        Self { units }
    }

    /// Number of units on this side.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the side has no units left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate over the units in host order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Bounding rectangle of every unit on this side.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        self.units
            .iter()
            .fold(Rect::EMPTY, |rect, unit| rect.union_point(unit.position))
    }

    /// Bounding rectangle restricted to one unit kind.
    #[must_use]
    pub fn kind_rect(&self, kind: UnitKind) -> Rect {
        self.units
            .iter()
            .filter(|unit| unit.kind == kind)
            .fold(Rect::EMPTY, |rect, unit| rect.union_point(unit.position))
    }

    /// Count units matching a predicate.
    #[must_use]
    pub fn count_where(&self, pred: impl Fn(&Unit) -> bool) -> usize {
        self.units.iter().filter(|unit| pred(unit)).count()
    }

    /// Whether every unit of `kind` is currently stationary.
    ///
    /// Vacuously true when no unit of that kind remains.
    #[must_use]
    pub fn all_stopped(&self, kind: UnitKind) -> bool {
        self.units
            .iter()
            .filter(|unit| unit.kind == kind)
            .all(|unit| !unit.in_move)
    }
}

/// Everything the host hands the agent for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Current tick index, starting at 0.
    pub tick: u64,
    /// Ticks between action budget refills.
    pub refill_interval: u64,
    /// Budget capacity restored at each refill boundary.
    pub refill_capacity: u32,
    /// Remaining cooldown ticks before a strike is permitted.
    pub strike_cooldown: u64,
    /// Our units.
    pub allies: UnitSet,
    /// Opponent units.
    pub enemies: UnitSet,
}

impl WorldSnapshot {
    /// Whether a strike may be launched this tick.
    #[must_use]
    pub const fn strike_ready(&self) -> bool {
        self.strike_cooldown == 0
    }

    /// Serialize the snapshot for replay recording.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SnapshotCodec`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| AgentError::SnapshotCodec(e.to_string()))
    }

    /// Deserialize a recorded snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SnapshotCodec`] if deserialization fails.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| AgentError::SnapshotCodec(e.to_string()))
    }
}
