//! Synthetic host: owns mutable unit state, feeds snapshots to the
//! agent and applies emitted orders with toy kinematics.
//!
//! This is a stand-in for the real game server, good enough to watch
//! a whole plan unfold: selection tracking, destination movement with
//! `in_move` reporting, scale-as-radial-move and strike damage with
//! cooldown reset.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use tactics_core::prelude::{
    Agent, Fixed, GroupId, Order, Side, StrikeConfig, Unit, UnitId, UnitSet, Vec2Fixed,
    WorldSnapshot,
};

use crate::replay::{self, ReplayError};
use crate::scenario::{Placement, Scenario};

/// Errors surfaced while running a scenario.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The agent rejected a snapshot.
    #[error("agent error: {0}")]
    Agent(#[from] tactics_core::error::AgentError),
    /// Writing a tick report failed.
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
    /// The report sink rejected a write.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    /// Recording a replay frame failed.
    #[error("replay recording failed: {0}")]
    Replay(#[from] ReplayError),
}

/// Units travel this far per tick on each axis.
const UNIT_SPEED: i32 = 4;

/// Durability lost at the heart of a blast / at its fringe.
const BLAST_CORE_DAMAGE: u32 = 100;
const BLAST_FRINGE_DAMAGE: u32 = 40;

/// One unit plus the host-side motion state the snapshot types do not
/// carry.
#[derive(Debug, Clone)]
struct HostUnit {
    unit: Unit,
    destination: Option<Vec2Fixed>,
}

/// Per-tick record written as one JSON line.
#[derive(Debug, Serialize)]
pub struct TickReport {
    /// Tick index.
    pub tick: u64,
    /// Order the agent emitted, if any.
    pub order: Option<Order>,
    /// Allied units still alive.
    pub allies: usize,
    /// Enemy units still alive.
    pub enemies: usize,
    /// Remaining action budget after the tick.
    pub budget: u32,
}

/// Drives one game from a scenario.
pub struct Runner {
    scenario: Scenario,
    agent: Agent,
    units: Vec<HostUnit>,
    selection: Vec<UnitId>,
    groups: HashMap<GroupId, Vec<UnitId>>,
    strike_cooldown: u64,
    replay: Option<Box<dyn Write>>,
}

impl Runner {
    /// Build a runner (and its agent) from a scenario.
    #[must_use]
    pub fn new(scenario: Scenario) -> Self {
        let units = scenario
            .placements
            .iter()
            .scan(0u64, |next_id, placement| {
                let block = expand_placement(*next_id, placement);
                *next_id += u64::from(placement.count);
                Some(block)
            })
            .flatten()
            .map(|unit| HostUnit {
                unit,
                destination: None,
            })
            .collect();

        let agent = Agent::new(scenario.agent_config());

        Self {
            scenario,
            agent,
            units,
            selection: Vec::new(),
            groups: HashMap::new(),
            strike_cooldown: 0,
            replay: None,
        }
    }

    /// Record every tick's snapshot as a replay frame to `sink`.
    #[must_use]
    pub fn with_replay(mut self, sink: Box<dyn Write>) -> Self {
        self.replay = Some(sink);
        self
    }

    /// Run the whole scenario, writing one JSON line per tick.
    ///
    /// # Errors
    ///
    /// Fails on agent errors (invalid scenario parameters) or when the
    /// sink rejects a write.
    pub fn run(&mut self, sink: &mut impl Write) -> Result<Vec<TickReport>, RunnerError> {
        let mut reports = Vec::with_capacity(self.scenario.ticks as usize);

        for tick in 0..self.scenario.ticks {
            let report = self.step(tick)?;
            serde_json::to_writer(&mut *sink, &report)?;
            writeln!(sink)?;
            reports.push(report);
        }

        Ok(reports)
    }

    /// Advance the battlefield one tick and consult the agent.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Agent`] if the snapshot is rejected.
    pub fn step(&mut self, tick: u64) -> Result<TickReport, RunnerError> {
        self.advance_units();
        self.strike_cooldown = self.strike_cooldown.saturating_sub(1);

        let snapshot = self.snapshot(tick);
        if let Some(sink) = self.replay.as_mut() {
            replay::write_frame(sink, &snapshot)?;
        }
        let order = self.agent.step(&snapshot)?;

        if let Some(order) = order {
            tracing::debug!(tick, ?order, "applying order");
            self.apply_order(order);
        }

        Ok(TickReport {
            tick,
            order,
            allies: self.count_side(Side::Ally),
            enemies: self.count_side(Side::Enemy),
            budget: self.agent.scheduler().budget(),
        })
    }

    fn count_side(&self, side: Side) -> usize {
        self.units.iter().filter(|h| h.unit.side == side).count()
    }

    /// Move every unit one speed-step toward its destination.
    fn advance_units(&mut self) {
        for host in &mut self.units {
            let Some(dest) = host.destination else {
                continue;
            };
            let pos = host.unit.position;
            let step = Vec2Fixed::new(
                clamp_step(dest.x - pos.x),
                clamp_step(dest.y - pos.y),
            );
            host.unit.position = pos + step;
            if host.unit.position == dest {
                host.destination = None;
            }
        }
    }

    fn snapshot(&self, tick: u64) -> WorldSnapshot {
        let collect = |side: Side| -> UnitSet {
            UnitSet::new(
                self.units
                    .iter()
                    .filter(|h| h.unit.side == side)
                    .map(|h| Unit {
                        in_move: h.destination.is_some(),
                        ..h.unit
                    })
                    .collect(),
            )
        };

        WorldSnapshot {
            tick,
            refill_interval: self.scenario.refill_interval,
            refill_capacity: self.scenario.refill_capacity,
            strike_cooldown: self.strike_cooldown,
            allies: collect(Side::Ally),
            enemies: collect(Side::Enemy),
        }
    }

    fn apply_order(&mut self, order: Order) {
        match order {
            Order::SelectKind { kind } => {
                self.selection = self
                    .units
                    .iter()
                    .filter(|h| h.unit.side == Side::Ally && h.unit.kind == kind)
                    .map(|h| h.unit.id)
                    .collect();
            }
            Order::AssignGroup { group } => {
                self.groups.insert(group, self.selection.clone());
            }
            Order::MoveBy { offset } => {
                for host in &mut self.units {
                    if self.selection.contains(&host.unit.id) {
                        host.destination = Some(host.unit.position + offset);
                    }
                }
            }
            Order::ScaleAt { center, factor } => {
                for host in &mut self.units {
                    if self.selection.contains(&host.unit.id) {
                        let radial = host.unit.position - center;
                        host.destination = Some(Vec2Fixed::new(
                            center.x + radial.x * factor,
                            center.y + radial.y * factor,
                        ));
                    }
                }
            }
            Order::Strike { center, unit } => {
                tracing::info!(reference = unit, "strike lands");
                self.resolve_strike(center);
                self.strike_cooldown = self.scenario.strike_cooldown;
            }
        }
    }

    /// Apply blast damage in two rings and remove the dead.
    fn resolve_strike(&mut self, center: Vec2Fixed) {
        let radius = StrikeConfig::default().radius;
        let core_sq = (radius / Fixed::from_num(2)) * (radius / Fixed::from_num(2));
        let fringe_sq = radius * radius;

        for host in &mut self.units {
            let dist_sq = host.unit.position.distance_squared(center);
            let damage = if dist_sq <= core_sq {
                BLAST_CORE_DAMAGE
            } else if dist_sq <= fringe_sq {
                BLAST_FRINGE_DAMAGE
            } else {
                continue;
            };
            host.unit.durability = host.unit.durability.saturating_sub(damage);
        }
        self.units.retain(|h| h.unit.durability > 0);
    }
}

/// Expand a placement block into units laid out in rows of five.
fn expand_placement(base_id: u64, placement: &Placement) -> Vec<Unit> {
    (0..placement.count)
        .map(|i| Unit {
            id: base_id + u64::from(i),
            position: Vec2Fixed::new(
                Fixed::from_num(placement.x + (i as i32 % 5) * 4),
                Fixed::from_num(placement.y + (i as i32 / 5) * 4),
            ),
            kind: placement.kind,
            durability: 100,
            in_move: false,
            side: placement.side,
        })
        .collect()
}

/// Clamp a per-axis delta to the unit speed.
fn clamp_step(delta: Fixed) -> Fixed {
    let speed = Fixed::from_num(UNIT_SPEED);
    delta.clamp(-speed, speed)
}
