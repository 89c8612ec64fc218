//! Outbound action records.
//!
//! One [`Order`] is the single action the agent may emit in a tick.
//! Orders are contextual the way the host's control protocol is:
//! selection orders establish which units later move/scale orders
//! apply to.

use serde::{Deserialize, Serialize};

use crate::math::{Fixed, Vec2Fixed};
use crate::units::{UnitId, UnitKind};

/// Logical group identifier assigned via [`Order::AssignGroup`].
pub type GroupId = u32;

/// A single emitted action. Fields are meaningful per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Clear the current selection and select every unit of a kind.
    SelectKind {
        /// Kind to select.
        kind: UnitKind,
    },
    /// Tag the current selection with a logical group id.
    AssignGroup {
        /// Group id to assign.
        group: GroupId,
    },
    /// Move the current selection by a relative offset.
    MoveBy {
        /// Translation to apply.
        offset: Vec2Fixed,
    },
    /// Spread (factor > 1) or contract (factor < 1) the current
    /// selection around a center point.
    ScaleAt {
        /// Scale center.
        center: Vec2Fixed,
        /// Scale factor.
        #[serde(with = "crate::math::fixed_serde")]
        factor: Fixed,
    },
    /// Launch an area-effect strike.
    Strike {
        /// Blast center.
        center: Vec2Fixed,
        /// Allied unit at the blast center used as delivery reference.
        unit: UnitId,
    },
}
