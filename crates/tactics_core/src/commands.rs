//! Concrete command variants.
//!
//! New plan steps are added here by composition: a variant carries
//! its continuation and spawn list, never a scheduler change.

use std::mem;

use crate::command::{Command, Context};
use crate::formation::{FormationMatrix, Group, MATRIX_SIZE};
use crate::math::{Fixed, Vec2Fixed};
use crate::order::{GroupId, Order};
use crate::units::UnitKind;

/// Select every unit of one kind.
pub struct SelectKindCommand {
    kind: UnitKind,
    next: Option<Box<dyn Command>>,
    spawn: Vec<Box<dyn Command>>,
}

impl SelectKindCommand {
    /// Select units of `kind`.
    #[must_use]
    pub fn new(kind: UnitKind) -> Self {
        Self {
            kind,
            next: None,
            spawn: Vec::new(),
        }
    }

    /// Set the continuation.
    #[must_use]
    pub fn with_next(mut self, next: impl Command + 'static) -> Self {
        self.next = Some(Box::new(next));
        self
    }
}

impl Command for SelectKindCommand {
    fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
        Some(Order::SelectKind { kind: self.kind })
    }

    fn next(&mut self) -> Option<Box<dyn Command>> {
        self.next.take()
    }

    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        mem::take(&mut self.spawn)
    }
}

/// Tag the current selection with a logical group id.
pub struct AssignGroupCommand {
    group: GroupId,
    next: Option<Box<dyn Command>>,
    spawn: Vec<Box<dyn Command>>,
}

impl AssignGroupCommand {
    /// Assign group id `group` to the current selection.
    #[must_use]
    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            next: None,
            spawn: Vec::new(),
        }
    }

    /// Set the continuation.
    #[must_use]
    pub fn with_next(mut self, next: impl Command + 'static) -> Self {
        self.next = Some(Box::new(next));
        self
    }
}

impl Command for AssignGroupCommand {
    fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
        Some(Order::AssignGroup { group: self.group })
    }

    fn next(&mut self) -> Option<Box<dyn Command>> {
        self.next.take()
    }

    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        mem::take(&mut self.spawn)
    }
}

/// Move the current selection by a pre-computed offset.
pub struct ShiftCommand {
    offset: Vec2Fixed,
    next: Option<Box<dyn Command>>,
    spawn: Vec<Box<dyn Command>>,
}

impl ShiftCommand {
    /// Shift the selection by `offset`.
    #[must_use]
    pub fn new(offset: Vec2Fixed) -> Self {
        Self {
            offset,
            next: None,
            spawn: Vec::new(),
        }
    }

    /// Set the continuation.
    #[must_use]
    pub fn with_next(mut self, next: impl Command + 'static) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Set the spawn list.
    #[must_use]
    pub fn with_spawned(mut self, spawn: Vec<Box<dyn Command>>) -> Self {
        self.spawn = spawn;
        self
    }
}

impl Command for ShiftCommand {
    fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
        Some(Order::MoveBy {
            offset: self.offset,
        })
    }

    fn next(&mut self) -> Option<Box<dyn Command>> {
        self.next.take()
    }

    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        mem::take(&mut self.spawn)
    }
}

/// Wait until every unit of a kind has stopped, then spread the group
/// around its current bounding-box center.
pub struct ScaleOnStopCommand {
    kind: UnitKind,
    factor: Fixed,
    /// Center cached while evaluating readiness, consumed by `apply`.
    cached_center: Option<Vec2Fixed>,
}

impl ScaleOnStopCommand {
    /// Default spread factor once the group has stopped.
    pub const DEFAULT_FACTOR: i32 = 2;

    /// Spread units of `kind` by the default factor once stationary.
    #[must_use]
    pub fn new(kind: UnitKind) -> Self {
        Self {
            kind,
            factor: Fixed::from_num(Self::DEFAULT_FACTOR),
            cached_center: None,
        }
    }
}

impl Command for ScaleOnStopCommand {
    fn ready(&mut self, cx: &Context<'_>) -> bool {
        let rect = cx.world.allies.kind_rect(self.kind);
        if rect.is_empty() || !cx.world.allies.all_stopped(self.kind) {
            return false;
        }
        self.cached_center = Some(rect.center());
        true
    }

    fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
        let center = self.cached_center.take()?;
        tracing::debug!(kind = ?self.kind, ?center, "scale on stop");
        Some(Order::ScaleAt {
            center,
            factor: self.factor,
        })
    }
}

/// Seed command for paired deployment.
///
/// Claims the first free paired-kind formation group, resolves its
/// partner, and routes one group to the top destination and the other
/// to the bottom one by starting row. Completing it builds the whole
/// chain: select → assign → shift for the claimed kind, spawning a
/// scale-on-stop plus the mirror chain for the partner kind.
pub struct DeployCommand {
    top: Vec2Fixed,
    bottom: Vec2Fixed,
    next: Option<Box<dyn Command>>,
    spawn: Vec<Box<dyn Command>>,
}

impl DeployCommand {
    /// Deploy one kind pair toward `top` and `bottom` destinations.
    #[must_use]
    pub fn new(top: Vec2Fixed, bottom: Vec2Fixed) -> Self {
        Self {
            top,
            bottom,
            next: None,
            spawn: Vec::new(),
        }
    }
}

impl Command for DeployCommand {
    fn ready(&mut self, cx: &Context<'_>) -> bool {
        deployable_pair(cx.formation).is_some()
    }

    fn apply(&mut self, cx: &mut Context<'_>) -> Option<Order> {
        // Resolve both groups before claiming either, so a skipped
        // effect leaves the matrix untouched.
        let (group, pair_group) = deployable_pair(cx.formation)?;
        let kind = group.kind;
        let pair_kind = pair_group.kind;
        cx.formation.claim_kind(kind)?;
        cx.formation.claim_kind(pair_kind)?;

        // Lower starting row deploys to the top destination.
        let (dest, pair_dest) = if group.row <= pair_group.row {
            (self.top, self.bottom)
        } else {
            (self.bottom, self.top)
        };

        let shift = dest - cx.world.allies.kind_rect(kind).location();
        let pair_shift = pair_dest - cx.world.allies.kind_rect(pair_kind).location();

        let group_id = cell_group_id(group.row, group.col);
        let pair_group_id = cell_group_id(pair_group.row, pair_group.col);

        tracing::debug!(
            ?kind,
            ?pair_kind,
            ?shift,
            ?pair_shift,
            "deploying kind pair"
        );

        self.next = Some(Box::new(AssignGroupCommand::new(group_id).with_next(
            ShiftCommand::new(shift).with_spawned(vec![
                Box::new(ScaleOnStopCommand::new(kind)),
                Box::new(SelectKindCommand::new(pair_kind).with_next(
                    AssignGroupCommand::new(pair_group_id).with_next(
                        ShiftCommand::new(pair_shift)
                            .with_spawned(vec![Box::new(ScaleOnStopCommand::new(pair_kind))]),
                    ),
                )),
            ]),
        )));

        Some(Order::SelectKind { kind })
    }

    fn next(&mut self) -> Option<Box<dyn Command>> {
        self.next.take()
    }

    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        mem::take(&mut self.spawn)
    }
}

/// Logical group id derived from a matrix cell (row-major, 1-based).
fn cell_group_id(row: usize, col: usize) -> GroupId {
    (row * MATRIX_SIZE + col + 1) as GroupId
}

/// First unclaimed paired group whose partner also holds an unclaimed
/// group, with that partner, in row-major order.
fn deployable_pair(formation: &FormationMatrix) -> Option<(Group, Group)> {
    formation.groups().find_map(|group| {
        if !group.kind.is_paired() || formation.is_claimed(group.kind) {
            return None;
        }
        let pair = formation.group_of_kind(group.kind.pair())?;
        (!formation.is_claimed(pair.kind)).then_some((group, pair))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::FormationMatrix;
    use crate::units::{Side, Unit};
    use crate::world::{UnitSet, WorldSnapshot};

    fn unit(id: u64, kind: UnitKind, x: i32, y: i32, in_move: bool) -> Unit {
        Unit {
            id,
            position: Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)),
            kind,
            durability: 100,
            in_move,
            side: Side::Ally,
        }
    }

    fn snapshot(allies: Vec<Unit>) -> WorldSnapshot {
        WorldSnapshot {
            tick: 0,
            refill_interval: 60,
            refill_capacity: 12,
            strike_cooldown: 0,
            allies: UnitSet::new(allies),
            enemies: UnitSet::new(Vec::new()),
        }
    }

    fn v(x: i32, y: i32) -> Vec2Fixed {
        Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y))
    }

    #[test]
    fn test_select_emits_and_hands_over_chain() {
        let world = snapshot(vec![unit(1, UnitKind::Tank, 0, 0, false)]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        let mut cmd = SelectKindCommand::new(UnitKind::Tank)
            .with_next(AssignGroupCommand::new(1));
        assert!(cmd.ready(&cx));
        assert_eq!(
            cmd.apply(&mut cx),
            Some(Order::SelectKind {
                kind: UnitKind::Tank
            })
        );
        assert!(cmd.next().is_some());
        // Ownership transferred out: a second take yields nothing.
        assert!(cmd.next().is_none());
        assert!(cmd.spawned().is_empty());
    }

    #[test]
    fn test_scale_on_stop_waits_for_movement_to_end() {
        let moving = snapshot(vec![
            unit(1, UnitKind::Tank, 0, 0, true),
            unit(2, UnitKind::Tank, 10, 10, false),
        ]);
        let mut formation = FormationMatrix::build(&moving.allies).unwrap();
        let mut cmd = ScaleOnStopCommand::new(UnitKind::Tank);
        assert!(!cmd.ready(&Context {
            world: &moving,
            formation: &mut formation,
        }));

        let stopped = snapshot(vec![
            unit(1, UnitKind::Tank, 0, 0, false),
            unit(2, UnitKind::Tank, 10, 10, false),
        ]);
        let mut cx = Context {
            world: &stopped,
            formation: &mut formation,
        };
        assert!(cmd.ready(&cx));
        // Center was cached during the readiness check.
        assert_eq!(
            cmd.apply(&mut cx),
            Some(Order::ScaleAt {
                center: v(5, 5),
                factor: Fixed::from_num(2),
            })
        );
    }

    #[test]
    fn test_scale_on_stop_not_ready_without_units() {
        let world = snapshot(vec![unit(1, UnitKind::Ifv, 0, 0, false)]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cmd = ScaleOnStopCommand::new(UnitKind::Tank);
        assert!(!cmd.ready(&Context {
            world: &world,
            formation: &mut formation,
        }));
    }

    #[test]
    fn test_deploy_builds_paired_chain() {
        let world = snapshot(vec![
            unit(1, UnitKind::Fighter, 100, 20, false),
            unit(2, UnitKind::Helicopter, 100, 180, false),
            unit(3, UnitKind::Recovery, 20, 20, false),
        ]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        let mut deploy = DeployCommand::new(v(200, 100), v(200, 200));
        assert!(deploy.ready(&cx));
        let order = deploy.apply(&mut cx);
        assert_eq!(
            order,
            Some(Order::SelectKind {
                kind: UnitKind::Fighter
            })
        );
        // Both groups of the pair are claimed.
        assert!(formation.is_claimed(UnitKind::Fighter));
        assert!(formation.is_claimed(UnitKind::Helicopter));
        assert!(!formation.is_claimed(UnitKind::Recovery));
        assert!(deploy.next().is_some());
    }

    #[test]
    fn test_deploy_skips_when_no_paired_group_free() {
        let world = snapshot(vec![unit(1, UnitKind::Recovery, 0, 0, false)]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        let mut deploy = DeployCommand::new(v(200, 100), v(200, 200));
        assert!(!deploy.ready(&cx));
        // Effect skipped entirely: no order, no continuation.
        assert_eq!(deploy.apply(&mut cx), None);
        assert!(deploy.next().is_none());
    }

    #[test]
    fn test_deploy_without_partner_leaves_matrix_untouched() {
        // Fighters with no helicopters anywhere: the pair cannot be
        // resolved, so the skipped effect must not claim anything.
        let world = snapshot(vec![
            unit(1, UnitKind::Fighter, 100, 20, false),
            unit(2, UnitKind::Recovery, 20, 20, false),
        ]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        let mut deploy = DeployCommand::new(v(200, 100), v(200, 200));
        assert!(!deploy.ready(&cx));
        assert_eq!(deploy.apply(&mut cx), None);
        assert!(deploy.next().is_none());

        assert!(!formation.is_claimed(UnitKind::Fighter));
        // The fighter group is still claimable by later commands.
        assert!(formation.claim_kind(UnitKind::Fighter).is_some());
    }

    #[test]
    fn test_deploy_skips_partnerless_kind_for_a_complete_pair() {
        // Fighters lack their partner but the ifv/tank pair is whole:
        // deployment moves on to the complete pair.
        let world = snapshot(vec![
            unit(1, UnitKind::Fighter, 100, 20, false),
            unit(2, UnitKind::Ifv, 20, 100, false),
            unit(3, UnitKind::Tank, 180, 100, false),
        ]);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        let mut deploy = DeployCommand::new(v(200, 100), v(200, 200));
        assert!(deploy.ready(&cx));
        let order = deploy.apply(&mut cx);
        assert!(matches!(
            order,
            Some(Order::SelectKind {
                kind: UnitKind::Ifv | UnitKind::Tank
            })
        ));
        assert!(!formation.is_claimed(UnitKind::Fighter));
        assert!(formation.is_claimed(UnitKind::Ifv));
        assert!(formation.is_claimed(UnitKind::Tank));
    }
}
