//! The fixed 3×3 formation matrix built from the starting unit layout.
//!
//! Built exactly once, at tick 0, by binning each kind's bounding-rect
//! center into thirds of the overall allied bounding rect. Read-only
//! afterwards except for the `assigned` marker set when a command
//! claims a group, which is what keeps [`FormationMatrix::claim_free_group`]
//! from handing out the same group twice.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::math::Fixed;
use crate::units::{UnitKind, UNIT_KINDS};
use crate::world::UnitSet;

/// Grid dimension of the starting formation.
pub const MATRIX_SIZE: usize = 3;

/// A named cluster of same-kind units at one cell of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Vehicle kind of every unit in this group.
    pub kind: UnitKind,
    /// Matrix row (0 = top).
    pub row: usize,
    /// Matrix column (0 = left).
    pub col: usize,
}

/// The 3×3 grid of starting groups.
///
/// Invariants: at most one group exists per unit kind; a cell may be
/// empty. The current bounding rectangle of a group is always read
/// live from the tick's [`UnitSet`] via
/// [`UnitSet::kind_rect`](crate::world::UnitSet::kind_rect).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormationMatrix {
    cells: [[Option<Group>; MATRIX_SIZE]; MATRIX_SIZE],
    /// Kinds whose group has been claimed by a command.
    claimed: Vec<UnitKind>,
}

impl FormationMatrix {
    /// Build the matrix from the initial allied unit layout.
    ///
    /// Each kind present in `allies` gets exactly one group, placed at
    /// the cell its bounding-rect center falls into relative to the
    /// overall allied bounding rect. If two kinds bin to the same cell
    /// the later one takes the next empty cell in row-major order, so
    /// construction is total and deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::EmptyFormation`] when `allies` is empty.
    pub fn build(allies: &UnitSet) -> Result<Self> {
        if allies.is_empty() {
            return Err(AgentError::EmptyFormation);
        }

        let overall = allies.bounding_rect();
        let mut matrix = Self::default();

        for kind in UNIT_KINDS {
            let rect = allies.kind_rect(kind);
            if rect.is_empty() {
                continue;
            }
            let center = rect.center();
            let row = bin_third(center.y - overall.location().y, overall.height());
            let col = bin_third(center.x - overall.location().x, overall.width());
            matrix.place(kind, row, col);
        }

        Ok(matrix)
    }

    /// Place a group, falling back to the next empty cell on collision.
    fn place(&mut self, kind: UnitKind, row: usize, col: usize) {
        let start = row * MATRIX_SIZE + col;
        for offset in 0..MATRIX_SIZE * MATRIX_SIZE {
            let idx = (start + offset) % (MATRIX_SIZE * MATRIX_SIZE);
            let (r, c) = (idx / MATRIX_SIZE, idx % MATRIX_SIZE);
            if self.cells[r][c].is_none() {
                self.cells[r][c] = Some(Group { kind, row: r, col: c });
                return;
            }
        }
    }

    /// The group at a cell, if any.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Group> {
        self.cells[row][col]
    }

    /// Iterate all groups in row-major order.
    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.cells
            .iter()
            .flatten()
            .filter_map(|cell| cell.as_ref().copied())
    }

    /// The group of a given kind. Stable across the whole game.
    #[must_use]
    pub fn group_of_kind(&self, kind: UnitKind) -> Option<Group> {
        self.groups().find(|group| group.kind == kind)
    }

    /// Whether the group of `kind` has been claimed.
    #[must_use]
    pub fn is_claimed(&self, kind: UnitKind) -> bool {
        self.claimed.contains(&kind)
    }

    /// Whether any unclaimed group matches `pred`.
    #[must_use]
    pub fn has_free_group_where(&self, pred: impl Fn(&Group) -> bool) -> bool {
        self.groups()
            .any(|group| !self.is_claimed(group.kind) && pred(&group))
    }

    /// Claim the first unclaimed group, in row-major order.
    ///
    /// Returns `None` once every group has been claimed; a group is
    /// never returned twice within one game.
    pub fn claim_free_group(&mut self) -> Option<Group> {
        self.claim_free_group_where(|_| true)
    }

    /// Claim the first unclaimed group matching `pred`.
    pub fn claim_free_group_where(&mut self, pred: impl Fn(&Group) -> bool) -> Option<Group> {
        let group = self
            .groups()
            .find(|group| !self.is_claimed(group.kind) && pred(group))?;
        self.claimed.push(group.kind);
        Some(group)
    }

    /// Claim the group of a specific kind, regardless of position.
    pub fn claim_kind(&mut self, kind: UnitKind) -> Option<Group> {
        let group = self.group_of_kind(kind)?;
        if self.is_claimed(kind) {
            return None;
        }
        self.claimed.push(kind);
        Some(group)
    }
}

/// Bin an offset within `extent` into one of three equal bands.
fn bin_third(offset: Fixed, extent: Fixed) -> usize {
    if extent <= Fixed::ZERO {
        return 0;
    }
    let scaled = offset * Fixed::from_num(3) / extent;
    let band: i64 = scaled.int().to_num();
    band.clamp(0, 2) as usize
}
