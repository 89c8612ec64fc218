//! The top-level decision agent.
//!
//! One [`Agent`] value per game. It owns the scheduler and the
//! formation matrix and is fed one [`WorldSnapshot`] per tick; all
//! state lives here explicitly, never in ambient globals.

use crate::command::{Command, Context};
use crate::commands::DeployCommand;
use crate::error::{AgentError, Result};
use crate::formation::FormationMatrix;
use crate::math::{Fixed, Vec2Fixed};
use crate::order::Order;
use crate::scheduler::Scheduler;
use crate::strike::{StrikeCommand, StrikeConfig};

/// Agent construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    /// Deployment destination for the pair group starting higher up.
    pub deploy_top: Vec2Fixed,
    /// Deployment destination for the pair group starting lower down.
    pub deploy_bottom: Vec2Fixed,
    /// Strike heuristic thresholds.
    pub strike: StrikeConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            deploy_top: Vec2Fixed::new(Fixed::from_num(200), Fixed::from_num(100)),
            deploy_bottom: Vec2Fixed::new(Fixed::from_num(200), Fixed::from_num(200)),
            strike: StrikeConfig::default(),
        }
    }
}

/// Per-turn decision agent.
pub struct Agent {
    scheduler: Scheduler,
    formation: Option<FormationMatrix>,
}

impl Agent {
    /// Agent with the standard seed commands: one paired deployment
    /// plus the self-requeuing strike capability.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_commands(vec![
            Box::new(DeployCommand::new(config.deploy_top, config.deploy_bottom)),
            Box::new(StrikeCommand::new(config.strike)),
        ])
    }

    /// Agent seeded with an arbitrary set of root commands.
    #[must_use]
    pub fn with_commands(seeds: Vec<Box<dyn Command>>) -> Self {
        let mut scheduler = Scheduler::new();
        for seed in seeds {
            scheduler.enqueue(seed);
        }
        Self {
            scheduler,
            formation: None,
        }
    }

    /// The scheduler, for inspection by hosts and tests.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Consume one tick's snapshot and emit at most one order.
    ///
    /// The formation matrix is built from the first snapshot (tick 0)
    /// and never rebuilt.
    ///
    /// # Errors
    ///
    /// [`AgentError::ZeroRefillInterval`] for an invalid snapshot,
    /// [`AgentError::EmptyFormation`] when the first snapshot has no
    /// allied units.
    pub fn step(&mut self, world: &crate::world::WorldSnapshot) -> Result<Option<Order>> {
        if world.refill_interval == 0 {
            return Err(AgentError::ZeroRefillInterval);
        }

        let formation = match &mut self.formation {
            Some(formation) => formation,
            empty => {
                let matrix = FormationMatrix::build(&world.allies)?;
                tracing::debug!(
                    groups = matrix.groups().count(),
                    "formation matrix built from starting layout"
                );
                for group in matrix.groups() {
                    tracing::trace!(kind = ?group.kind, row = group.row, col = group.col, "group");
                }
                empty.insert(matrix)
            }
        };

        let mut cx = Context { world, formation };
        let order = self.scheduler.step(&mut cx);

        tracing::trace!(
            tick = world.tick,
            budget = self.scheduler.budget(),
            emitted = order.is_some(),
            "tick complete"
        );
        Ok(order)
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}
