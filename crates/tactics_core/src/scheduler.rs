//! The action scheduler.
//!
//! Owns the pending-command pool, the active-chain pointer and the
//! periodically refilled action budget, and drives exactly one command
//! dispatch per tick.
//!
//! # Budget semantics
//!
//! The budget refills to capacity on ticks where
//! `tick % refill_interval == 0` and only there; surplus budget
//! accumulates capacity for future ticks rather than enabling several
//! dispatches in one tick. Once a chain is active it owns the tick's
//! action slot even while merely waiting on its own readiness
//! predicate, so a waiting tick still burns one budget unit and emits
//! nothing. A chain whose predicate never becomes true therefore
//! starves every pending command for the rest of the game; command
//! authors must keep readiness predicates eventually satisfiable.

use crate::command::{Command, Context};
use crate::order::Order;

/// Pool + active chain + budget. One instance per game.
#[derive(Default)]
pub struct Scheduler {
    pool: Vec<Box<dyn Command>>,
    active: Option<Box<dyn Command>>,
    budget: u32,
}

impl Scheduler {
    /// Empty scheduler with a zero budget (first refill happens at
    /// tick 0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root command into the pending pool.
    pub fn enqueue(&mut self, command: Box<dyn Command>) {
        self.pool.push(command);
    }

    /// Remaining action budget.
    #[must_use]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Number of pending root commands.
    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Whether a multi-tick chain is in progress.
    #[must_use]
    pub fn has_active_chain(&self) -> bool {
        self.active.is_some()
    }

    /// Run one tick: refill the budget if on a boundary, then dispatch
    /// at most one command.
    ///
    /// A zero `refill_interval` never refills; any pre-existing budget
    /// drains as usual. Hosts that consider a zero interval invalid
    /// must reject the snapshot before stepping, as
    /// [`Agent::step`](crate::agent::Agent::step) does.
    pub fn step(&mut self, cx: &mut Context<'_>) -> Option<Order> {
        if cx.world.refill_interval > 0 && cx.world.tick % cx.world.refill_interval == 0 {
            self.budget = cx.world.refill_capacity;
            tracing::debug!(tick = cx.world.tick, budget = self.budget, "budget refilled");
        }

        if self.budget == 0 {
            return None;
        }

        if let Some(mut command) = self.active.take() {
            // A held chain re-evaluates readiness each tick. Waiting
            // burns the budget unit without advancing the chain.
            if command.ready(cx) {
                self.dispatch(command, cx)
            } else {
                self.active = Some(command);
                self.budget -= 1;
                None
            }
        } else {
            // At most one pool scan per tick. No ready member means no
            // eligible work: the budget is preserved.
            let idx = self.pool.iter_mut().position(|cmd| cmd.ready(cx))?;
            let command = self.pool.remove(idx);
            self.dispatch(command, cx)
        }
    }

    /// Run `apply`, advance the chain, spill the spawn list into the
    /// pool and consume one budget unit.
    fn dispatch(&mut self, mut command: Box<dyn Command>, cx: &mut Context<'_>) -> Option<Order> {
        let order = command.apply(cx);
        self.active = command.next();
        self.pool.extend(command.spawned());
        self.budget -= 1;
        order
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::formation::FormationMatrix;
    use crate::math::{Fixed, Vec2Fixed};
    use crate::units::{Side, Unit, UnitKind};
    use crate::world::{UnitSet, WorldSnapshot};

    /// Scripted test command: readiness flag shared with the test,
    /// optional continuation, counts its own applications.
    struct Probe {
        ready: Rc<Cell<bool>>,
        applied: Rc<Cell<u32>>,
        next: Option<Box<dyn Command>>,
        order: Order,
    }

    impl Probe {
        fn new(ready: &Rc<Cell<bool>>, applied: &Rc<Cell<u32>>) -> Self {
            Self {
                ready: Rc::clone(ready),
                applied: Rc::clone(applied),
                next: None,
                order: Order::AssignGroup { group: 1 },
            }
        }

        fn with_next(mut self, next: Probe) -> Self {
            self.next = Some(Box::new(next));
            self
        }
    }

    impl Command for Probe {
        fn ready(&mut self, _cx: &Context<'_>) -> bool {
            self.ready.get()
        }

        fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
            self.applied.set(self.applied.get() + 1);
            Some(self.order)
        }

        fn next(&mut self) -> Option<Box<dyn Command>> {
            self.next.take()
        }
    }

    fn snapshot(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick,
            refill_interval: 10,
            refill_capacity: 3,
            strike_cooldown: 0,
            allies: UnitSet::new(vec![Unit {
                id: 1,
                position: Vec2Fixed::new(Fixed::from_num(0), Fixed::from_num(0)),
                kind: UnitKind::Tank,
                durability: 100,
                in_move: false,
                side: Side::Ally,
            }]),
            enemies: UnitSet::new(Vec::new()),
        }
    }

    fn run_tick(scheduler: &mut Scheduler, tick: u64) -> Option<Order> {
        let world = snapshot(tick);
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };
        scheduler.step(&mut cx)
    }

    fn flags() -> (Rc<Cell<bool>>, Rc<Cell<u32>>) {
        (Rc::new(Cell::new(true)), Rc::new(Cell::new(0)))
    }

    #[test]
    fn test_refill_only_on_boundaries() {
        let mut scheduler = Scheduler::new();
        assert_eq!(run_tick(&mut scheduler, 0), None);
        assert_eq!(scheduler.budget(), 3);

        // Non-boundary ticks leave the budget alone (no work queued).
        for tick in 1..10 {
            run_tick(&mut scheduler, tick);
            assert_eq!(scheduler.budget(), 3);
        }

        let (ready, applied) = flags();
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));
        run_tick(&mut scheduler, 10);
        // Refilled to 3 on the boundary, then one dispatch.
        assert_eq!(scheduler.budget(), 2);
    }

    #[test]
    fn test_zero_refill_interval_never_refills() {
        let mut scheduler = Scheduler::new();
        let (ready, applied) = flags();
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));

        let mut world = snapshot(0);
        world.refill_interval = 0;
        let mut formation = FormationMatrix::build(&world.allies).unwrap();
        let mut cx = Context {
            world: &world,
            formation: &mut formation,
        };

        // No boundary ever: the budget stays at zero and nothing runs.
        assert_eq!(scheduler.step(&mut cx), None);
        assert_eq!(scheduler.budget(), 0);
        assert_eq!(applied.get(), 0);
    }

    #[test]
    fn test_one_dispatch_per_tick_despite_surplus_budget() {
        let mut scheduler = Scheduler::new();
        let (ready, applied) = flags();
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));

        assert!(run_tick(&mut scheduler, 0).is_some());
        assert_eq!(applied.get(), 1, "only one command may run per tick");
        assert_eq!(scheduler.budget(), 2);
    }

    #[test]
    fn test_idle_tick_preserves_budget() {
        let mut scheduler = Scheduler::new();
        let (ready, applied) = flags();
        ready.set(false);
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));

        run_tick(&mut scheduler, 0);
        assert_eq!(run_tick(&mut scheduler, 1), None);
        // No ready pool member and no active chain: budget untouched.
        assert_eq!(scheduler.budget(), 3);
        assert_eq!(applied.get(), 0);
    }

    #[test]
    fn test_waiting_chain_burns_budget_without_emitting() {
        let mut scheduler = Scheduler::new();
        let (gate, gate_applied) = flags();
        let (ready, applied) = flags();

        // Head is ready; its continuation waits on `gate`.
        let chain = Probe::new(&ready, &applied).with_next(Probe::new(&gate, &gate_applied));
        gate.set(false);
        scheduler.enqueue(Box::new(chain));

        assert!(run_tick(&mut scheduler, 0).is_some());
        assert_eq!(scheduler.budget(), 2);
        assert!(scheduler.has_active_chain());

        // The chain holds its slot while waiting: budget strictly
        // decreases, nothing is emitted, nothing else can run.
        assert_eq!(run_tick(&mut scheduler, 1), None);
        assert_eq!(scheduler.budget(), 1);
        assert_eq!(run_tick(&mut scheduler, 2), None);
        assert_eq!(scheduler.budget(), 0);
        assert_eq!(gate_applied.get(), 0);

        // Budget exhausted: further ticks are no-ops until the refill.
        assert_eq!(run_tick(&mut scheduler, 3), None);
        assert_eq!(scheduler.budget(), 0);

        gate.set(true);
        assert!(run_tick(&mut scheduler, 10).is_some());
        assert_eq!(gate_applied.get(), 1);
        assert!(!scheduler.has_active_chain());
    }

    #[test]
    fn test_waiting_chain_starves_pending_pool() {
        let mut scheduler = Scheduler::new();
        let (stuck, stuck_applied) = flags();
        let (head_ready, head_applied) = flags();
        let (other, other_applied) = flags();

        let chain =
            Probe::new(&head_ready, &head_applied).with_next(Probe::new(&stuck, &stuck_applied));
        stuck.set(false);
        scheduler.enqueue(Box::new(chain));
        scheduler.enqueue(Box::new(Probe::new(&other, &other_applied)));

        run_tick(&mut scheduler, 0);
        for tick in 1..20 {
            run_tick(&mut scheduler, tick);
        }
        // The ready pool command never got a look-in.
        assert_eq!(other_applied.get(), 0);
    }

    #[test]
    fn test_chain_reaches_third_command_on_third_tick() {
        let mut scheduler = Scheduler::new();
        let (ready, applied_a) = flags();
        let (_, applied_b) = flags();
        let (_, applied_c) = flags();

        let c = Probe::new(&ready, &applied_c);
        let b = Probe {
            next: Some(Box::new(c)),
            ..Probe::new(&ready, &applied_b)
        };
        let a = Probe {
            next: Some(Box::new(b)),
            ..Probe::new(&ready, &applied_a)
        };
        scheduler.enqueue(Box::new(a));

        run_tick(&mut scheduler, 0);
        assert_eq!((applied_a.get(), applied_b.get(), applied_c.get()), (1, 0, 0));
        run_tick(&mut scheduler, 1);
        assert_eq!((applied_a.get(), applied_b.get(), applied_c.get()), (1, 1, 0));
        // C becomes the active chain on the third tick, never earlier.
        run_tick(&mut scheduler, 2);
        assert_eq!((applied_a.get(), applied_b.get(), applied_c.get()), (1, 1, 1));
    }

    #[test]
    fn test_completed_command_never_reappears() {
        let mut scheduler = Scheduler::new();
        let (ready, applied) = flags();
        scheduler.enqueue(Box::new(Probe::new(&ready, &applied)));

        for tick in 0..30 {
            run_tick(&mut scheduler, tick);
        }
        assert_eq!(applied.get(), 1);
        assert_eq!(scheduler.pool_len(), 0);
        assert!(!scheduler.has_active_chain());
    }

    #[test]
    fn test_spawned_commands_enter_the_pool() {
        struct Spawner {
            spawn: Vec<Box<dyn Command>>,
        }
        impl Command for Spawner {
            fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
                Some(Order::AssignGroup { group: 9 })
            }
            fn spawned(&mut self) -> Vec<Box<dyn Command>> {
                std::mem::take(&mut self.spawn)
            }
        }

        let (ready, applied) = flags();
        let mut scheduler = Scheduler::new();
        scheduler.enqueue(Box::new(Spawner {
            spawn: vec![Box::new(Probe::new(&ready, &applied))],
        }));

        run_tick(&mut scheduler, 0);
        assert_eq!(scheduler.pool_len(), 1);
        run_tick(&mut scheduler, 1);
        assert_eq!(applied.get(), 1);
    }
}
