//! Unit snapshot types.
//!
//! Units are pure data, replaced wholesale each tick by the host
//! snapshot. The agent never mutates a unit; intended movement is
//! expressed only through emitted [`Order`](crate::order::Order)s.

use serde::{Deserialize, Serialize};

use crate::math::Vec2Fixed;

/// Unique identifier for units, assigned by the host.
pub type UnitId = u64;

/// Which side of the battle a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Controlled by this agent.
    Ally,
    /// Controlled by the opponent.
    Enemy,
}

/// The closed set of vehicle kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Repair vehicle. Unpaired; see [`UnitKind::pair`].
    Recovery,
    /// Air superiority unit, paired with helicopters.
    Fighter,
    /// Ground attack aircraft, paired with fighters.
    Helicopter,
    /// Infantry fighting vehicle, paired with tanks.
    Ifv,
    /// Heavy armor, paired with IFVs.
    Tank,
}

/// All unit kinds in a stable evaluation order.
pub const UNIT_KINDS: [UnitKind; 5] = [
    UnitKind::Recovery,
    UnitKind::Fighter,
    UnitKind::Helicopter,
    UnitKind::Ifv,
    UnitKind::Tank,
];

impl UnitKind {
    /// The pairing partner this kind deploys alongside.
    ///
    /// Pairing is a static configuration: Fighter ↔ Helicopter and
    /// Ifv ↔ Tank. Recovery vehicles have no partner, so asking for
    /// one is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics when called on [`UnitKind::Recovery`]. This indicates a
    /// bug in command construction, not a transient world state, so it
    /// aborts rather than returning a recoverable error.
    #[must_use]
    pub fn pair(self) -> UnitKind {
        match self {
            UnitKind::Fighter => UnitKind::Helicopter,
            UnitKind::Helicopter => UnitKind::Fighter,
            UnitKind::Ifv => UnitKind::Tank,
            UnitKind::Tank => UnitKind::Ifv,
            UnitKind::Recovery => panic!("recovery vehicles have no pairing partner"),
        }
    }

    /// Whether this kind participates in paired deployment.
    #[must_use]
    pub const fn is_paired(self) -> bool {
        !matches!(self, UnitKind::Recovery)
    }
}

/// One unit as reported by the host for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Host-assigned unit id.
    pub id: UnitId,
    /// World position.
    pub position: Vec2Fixed,
    /// Vehicle kind.
    pub kind: UnitKind,
    /// Remaining durability (hit points).
    pub durability: u32,
    /// Whether the unit is currently executing a move.
    pub in_move: bool,
    /// Owning side.
    pub side: Side,
}
