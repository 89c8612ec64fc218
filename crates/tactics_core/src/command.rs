//! The command graph node abstraction.
//!
//! A command is one atomic, independently re-evaluated step of a
//! larger plan. Completing a command can yield a continuation (the
//! single next step of the same chain) and a spawn list (new root
//! commands for the pending pool). Ownership is strict: once the
//! scheduler takes `next()` and `spawned()`, the node itself is
//! dropped, so the reachable graph is always a tree owned by
//! pool ∪ active chain and no cycles can form.

use crate::formation::FormationMatrix;
use crate::order::Order;
use crate::world::WorldSnapshot;

/// Everything a command may look at (snapshot) or claim (formation)
/// while executing.
pub struct Context<'a> {
    /// The immutable world snapshot for the current tick.
    pub world: &'a WorldSnapshot,
    /// The formation matrix; commands may claim groups from it.
    pub formation: &'a mut FormationMatrix,
}

/// One step of a plan.
///
/// The scheduler guarantees that for any dispatch, [`ready`](Command::ready)
/// is invoked immediately before [`apply`](Command::apply). A command
/// may therefore cache state computed while evaluating readiness
/// (a target rectangle, a chosen blast candidate) and consume it in
/// `apply`.
pub trait Command {
    /// Whether the effect may run this tick. Defaults to always ready.
    fn ready(&mut self, cx: &Context<'_>) -> bool {
        let _ = cx;
        true
    }

    /// Run the effect, emitting at most one order.
    ///
    /// Returning `None` means the command's precondition was not met
    /// (or the variant has a bookkeeping-only effect); the command is
    /// discarded either way.
    fn apply(&mut self, cx: &mut Context<'_>) -> Option<Order>;

    /// Transfer the continuation out, if any. Called once, after
    /// `apply`.
    fn next(&mut self) -> Option<Box<dyn Command>> {
        None
    }

    /// Transfer the spawn list out, emptying it. Called once, after
    /// `apply`.
    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        Vec::new()
    }
}
