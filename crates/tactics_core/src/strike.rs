//! Area-effect strike targeting.
//!
//! A self-requeuing pool command: firing consumes the command but its
//! spawn list re-inserts a fresh instance, so the capability persists
//! across cooldowns without any internal mutation tricks.

use serde::{Deserialize, Serialize};

use crate::command::{Command, Context};
use crate::geometry::Circle;
use crate::math::{Fixed, Vec2Fixed};
use crate::order::Order;
use crate::units::{Unit, UnitId};

/// Tunable thresholds for the strike heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeConfig {
    /// Blast radius.
    #[serde(with = "crate::math::fixed_serde")]
    pub radius: Fixed,
    /// Only allies with durability strictly above this floor are
    /// considered as blast-center candidates.
    pub durability_floor: u32,
    /// A candidate is discarded once this many allies sit in the blast.
    pub ally_ceiling: usize,
    /// Minimum enemy count inside the blast before firing is worth it.
    pub min_effect: usize,
    /// Stop scanning candidates once one catches this many enemies.
    pub early_exit: usize,
}

impl Default for StrikeConfig {
    fn default() -> Self {
        Self {
            radius: Fixed::from_num(50),
            durability_floor: 50,
            ally_ceiling: 20,
            min_effect: 50,
            early_exit: 200,
        }
    }
}

/// The winning blast candidate, cached between `ready` and `apply`.
#[derive(Debug, Clone, Copy)]
struct BlastCandidate {
    unit: UnitId,
    position: Vec2Fixed,
    enemies_hit: usize,
}

/// Evaluate candidate blast centers and fire when one is worth it.
pub struct StrikeCommand {
    config: StrikeConfig,
    candidate: Option<BlastCandidate>,
    respawn: Vec<Box<dyn Command>>,
}

impl StrikeCommand {
    /// Strike command with the given thresholds.
    #[must_use]
    pub fn new(config: StrikeConfig) -> Self {
        Self {
            config,
            candidate: None,
            respawn: Vec::new(),
        }
    }

    /// Pick the best viable blast candidate, if any.
    ///
    /// Candidates are the healthy allies inside the enemy bounding
    /// rect, scanned in host order. A candidate is viable when the
    /// blast catches fewer allies than enemies and fewer allies than
    /// the safety ceiling; the viable candidate catching the most
    /// enemies wins.
    fn best_candidate(&self, cx: &Context<'_>) -> Option<BlastCandidate> {
        let enemy_rect = cx.world.enemies.bounding_rect();
        let healthy = |unit: &&Unit| {
            unit.durability > self.config.durability_floor && enemy_rect.contains(unit.position)
        };

        let mut best: Option<BlastCandidate> = None;
        for unit in cx.world.allies.iter().filter(healthy) {
            let blast = Circle::new(unit.position, self.config.radius);
            let enemies_hit = cx.world.enemies.count_where(|e| blast.contains(e.position));
            let allies_hit = cx.world.allies.count_where(|a| blast.contains(a.position));

            let viable = allies_hit < enemies_hit
                && allies_hit < self.config.ally_ceiling
                && best.map_or(true, |b| enemies_hit > b.enemies_hit);
            if viable {
                best = Some(BlastCandidate {
                    unit: unit.id,
                    position: unit.position,
                    enemies_hit,
                });
            }
            if best.is_some_and(|b| b.enemies_hit > self.config.early_exit) {
                break;
            }
        }
        best
    }
}

impl Command for StrikeCommand {
    fn ready(&mut self, cx: &Context<'_>) -> bool {
        if !cx.world.strike_ready() {
            return false;
        }

        let best = self.best_candidate(cx);
        self.candidate = best.filter(|b| b.enemies_hit > self.config.min_effect);
        self.candidate.is_some()
    }

    fn apply(&mut self, _cx: &mut Context<'_>) -> Option<Order> {
        let candidate = self.candidate.take()?;
        tracing::info!(
            unit = candidate.unit,
            enemies_hit = candidate.enemies_hit,
            "launching strike"
        );
        // The capability persists: queue a fresh instance of ourselves.
        self.respawn = vec![Box::new(StrikeCommand::new(self.config))];
        Some(Order::Strike {
            center: candidate.position,
            unit: candidate.unit,
        })
    }

    fn spawned(&mut self) -> Vec<Box<dyn Command>> {
        std::mem::take(&mut self.respawn)
    }
}
