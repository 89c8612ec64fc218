//! Test fixtures and helpers.
//!
//! Pre-built units, clusters and snapshots for consistent testing.

use fixed::types::I32F32;

use tactics_core::prelude::{Side, Unit, UnitKind, UnitSet, Vec2Fixed, WorldSnapshot};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real decision code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a point from integer coordinates.
#[must_use]
pub fn point(x: i32, y: i32) -> Vec2Fixed {
    Vec2Fixed::new(fixed(x), fixed(y))
}

/// A healthy, stationary unit.
#[must_use]
pub fn unit(id: u64, side: Side, kind: UnitKind, x: i32, y: i32) -> Unit {
    Unit {
        id,
        position: point(x, y),
        kind,
        durability: 100,
        in_move: false,
        side,
    }
}

/// A tight 2x2 block of same-kind units anchored at `(x, y)`.
///
/// Ids are `base..base + 4`.
#[must_use]
pub fn cluster(base: u64, side: Side, kind: UnitKind, x: i32, y: i32) -> Vec<Unit> {
    [(0, 0), (4, 0), (0, 4), (4, 4)]
        .iter()
        .enumerate()
        .map(|(i, (dx, dy))| unit(base + i as u64, side, kind, x + dx, y + dy))
        .collect()
}

/// The standard starting layout: all five kinds in their 3x3 corners.
#[must_use]
pub fn starting_allies() -> Vec<Unit> {
    let mut units = Vec::new();
    units.extend(cluster(10, Side::Ally, UnitKind::Recovery, 45, 45));
    units.extend(cluster(20, Side::Ally, UnitKind::Fighter, 119, 45));
    units.extend(cluster(30, Side::Ally, UnitKind::Helicopter, 193, 45));
    units.extend(cluster(40, Side::Ally, UnitKind::Ifv, 45, 193));
    units.extend(cluster(50, Side::Ally, UnitKind::Tank, 193, 193));
    units
}

/// A snapshot with sensible defaults: refill every 60 ticks with
/// capacity 12, strike on cooldown.
#[must_use]
pub fn snapshot(tick: u64, allies: Vec<Unit>, enemies: Vec<Unit>) -> WorldSnapshot {
    WorldSnapshot {
        tick,
        refill_interval: 60,
        refill_capacity: 12,
        strike_cooldown: u64::MAX,
        allies: UnitSet::new(allies),
        enemies: UnitSet::new(enemies),
    }
}
