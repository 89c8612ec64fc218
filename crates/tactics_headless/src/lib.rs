//! Headless tactics runner for agent testing and CI verification.
//!
//! This crate drives the tactics agent against a synthetic battlefield
//! without a real game server attached. This enables:
//!
//! - **Agent testing**: Watch a whole deployment plan unfold tick by tick
//! - **CI verification**: Assert budget accounting and determinism
//! - **Replay verification**: Re-run recorded snapshot frames and check
//!   the order stream matches
//!
//! # Output
//!
//! One JSON object per tick on stdout (emitted order, surviving unit
//! counts, remaining budget). Logs go to stderr.
//!
//! # Example
//!
//! ```bash
//! # Run the built-in skirmish
//! cargo run -p tactics_headless
//!
//! # Run a RON scenario for 1200 ticks
//! cargo run -p tactics_headless -- --scenario scenarios/rush.ron --ticks 1200
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod replay;
pub mod runner;
pub mod scenario;

pub use replay::{read_frames, replay_orders, write_frame, ReplayError, ReplayedTick};
pub use runner::{Runner, RunnerError, TickReport};
pub use scenario::{Placement, Scenario, ScenarioError};
