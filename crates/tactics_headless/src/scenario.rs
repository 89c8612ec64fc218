//! Scenario loading and configuration.
//!
//! Scenarios define the synthetic battlefield a game runs on: unit
//! placements per side, the action budget parameters the host
//! advertises, and the deployment destinations handed to the agent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tactics_core::prelude::{AgentConfig, Fixed, Side, StrikeConfig, UnitKind, Vec2Fixed};

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
}

/// A block of same-kind units placed on the battlefield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    /// Owning side.
    pub side: Side,
    /// Vehicle kind.
    pub kind: UnitKind,
    /// Block anchor (top-left), integer battlefield coordinates.
    pub x: i32,
    /// Block anchor (top-left).
    pub y: i32,
    /// Number of units, laid out in rows of five.
    pub count: u32,
}

impl Placement {
    /// A block of `count` units for `side`/`kind` anchored at `(x, y)`.
    #[must_use]
    pub fn new(side: Side, kind: UnitKind, x: i32, y: i32, count: u32) -> Self {
        Self {
            side,
            kind,
            x,
            y,
            count,
        }
    }
}

/// A complete scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Ticks to simulate.
    pub ticks: u64,
    /// Ticks between action budget refills.
    pub refill_interval: u64,
    /// Budget capacity restored at each refill.
    pub refill_capacity: u32,
    /// Cooldown imposed after each strike launch.
    pub strike_cooldown: u64,
    /// Deployment destination for the upper pair group.
    pub deploy_top: (i32, i32),
    /// Deployment destination for the lower pair group.
    pub deploy_bottom: (i32, i32),
    /// Unit blocks for both sides.
    pub placements: Vec<Placement>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Agent parameters for a game run on this scenario.
    #[must_use]
    pub fn agent_config(&self) -> AgentConfig {
        let point = |(x, y): (i32, i32)| Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y));
        AgentConfig {
            deploy_top: point(self.deploy_top),
            deploy_bottom: point(self.deploy_bottom),
            strike: StrikeConfig::default(),
        }
    }

    /// The standard skirmish: five allied starting groups in the 3x3
    /// corner layout, one enemy blob mid-field.
    #[must_use]
    pub fn skirmish() -> Self {
        Self {
            name: "Standard Skirmish".to_string(),
            description: "Five starting groups against a mid-field enemy blob".to_string(),
            ticks: 600,
            refill_interval: 60,
            refill_capacity: 12,
            strike_cooldown: 300,
            deploy_top: (200, 100),
            deploy_bottom: (200, 200),
            placements: vec![
                Placement::new(Side::Ally, UnitKind::Recovery, 45, 45, 10),
                Placement::new(Side::Ally, UnitKind::Fighter, 119, 45, 10),
                Placement::new(Side::Ally, UnitKind::Helicopter, 193, 45, 10),
                Placement::new(Side::Ally, UnitKind::Ifv, 45, 193, 10),
                Placement::new(Side::Ally, UnitKind::Tank, 193, 193, 10),
                Placement::new(Side::Enemy, UnitKind::Tank, 500, 500, 25),
                Placement::new(Side::Enemy, UnitKind::Ifv, 520, 520, 25),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_has_all_five_kinds() {
        let scenario = Scenario::default();
        for kind in tactics_core::prelude::UNIT_KINDS {
            assert!(
                scenario
                    .placements
                    .iter()
                    .any(|p| p.side == Side::Ally && p.kind == kind),
                "{kind:?} missing from default scenario"
            );
        }
    }

    #[test]
    fn test_scenario_ron_roundtrip() {
        let scenario = Scenario::skirmish();
        let ron = ron::to_string(&scenario).unwrap();
        let parsed = Scenario::from_ron_str(&ron).unwrap();
        assert_eq!(parsed.name, scenario.name);
        assert_eq!(parsed.placements.len(), scenario.placements.len());
    }

    #[test]
    fn test_missing_file_is_reported() {
        assert!(matches!(
            Scenario::load("no/such/scenario.ron"),
            Err(ScenarioError::FileNotFound(_))
        ));
    }
}
