//! # Tactics Core
//!
//! Deterministic per-tick decision core for the vehicle wars agent.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! Each tick the host hands the agent a [`world::WorldSnapshot`]; the
//! agent answers with at most one [`order::Order`], chosen by driving
//! a command graph under a periodically refilled action budget.
//!
//! ## Crate Structure
//!
//! - [`math`] / [`geometry`] - Fixed-point math, rectangles, circles
//! - [`units`] / [`world`] - Unit snapshot types and per-side views
//! - [`formation`] - The 3×3 starting formation matrix
//! - [`command`] / [`commands`] - The command graph and its variants
//! - [`strike`] - Area-effect strike targeting
//! - [`scheduler`] - Pending pool, active chain, action budget
//! - [`agent`] - The top-level per-game agent value

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod agent;
pub mod command;
pub mod commands;
pub mod error;
pub mod formation;
pub mod geometry;
pub mod math;
pub mod order;
pub mod scheduler;
pub mod strike;
pub mod units;
pub mod world;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{Agent, AgentConfig};
    pub use crate::command::{Command, Context};
    pub use crate::commands::{
        AssignGroupCommand, DeployCommand, ScaleOnStopCommand, SelectKindCommand, ShiftCommand,
    };
    pub use crate::error::{AgentError, Result};
    pub use crate::formation::{FormationMatrix, Group};
    pub use crate::geometry::{Circle, Rect};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::order::{GroupId, Order};
    pub use crate::scheduler::Scheduler;
    pub use crate::strike::{StrikeCommand, StrikeConfig};
    pub use crate::units::{Side, Unit, UnitId, UnitKind, UNIT_KINDS};
    pub use crate::world::{UnitSet, WorldSnapshot};
}
