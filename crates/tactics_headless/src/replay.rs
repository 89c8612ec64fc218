//! Snapshot replay recording and verification.
//!
//! A replay is a flat stream of length-prefixed snapshot frames, one
//! per tick, written while a game runs. Feeding the recorded frames to
//! a fresh agent must reproduce the exact order stream of the original
//! run; the core is deterministic, so any divergence points at a
//! nondeterminism bug.

use std::io::{ErrorKind, Read, Write};

use serde::Serialize;
use thiserror::Error;

use tactics_core::error::AgentError;
use tactics_core::prelude::{Agent, Order, WorldSnapshot};

/// Errors surfaced while recording or replaying snapshot frames.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading or writing the frame stream failed.
    #[error("replay stream error: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot codec failure, or the agent rejected a frame.
    #[error("replay frame error: {0}")]
    Agent(#[from] AgentError),
}

/// Append one snapshot frame (u32 little-endian length prefix plus
/// payload) to the stream.
///
/// # Errors
///
/// Fails when the snapshot does not serialize or the sink rejects the
/// write.
pub fn write_frame(sink: &mut impl Write, snapshot: &WorldSnapshot) -> Result<(), ReplayError> {
    let payload = snapshot.to_bytes()?;
    let len = u32::try_from(payload.len()).map_err(|_| {
        AgentError::SnapshotCodec("snapshot frame exceeds u32 length".to_string())
    })?;
    sink.write_all(&len.to_le_bytes())?;
    sink.write_all(&payload)?;
    Ok(())
}

/// Read every frame from a recorded stream.
///
/// A clean end of stream at a frame boundary terminates the read; a
/// frame cut short mid-payload is an error.
///
/// # Errors
///
/// Fails on a truncated payload or an undecodable frame.
pub fn read_frames(reader: &mut impl Read) -> Result<Vec<WorldSnapshot>, ReplayError> {
    let mut frames = Vec::new();
    loop {
        let mut prefix = [0u8; 4];
        match reader.read_exact(&mut prefix) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        }
        let mut payload = vec![0u8; u32::from_le_bytes(prefix) as usize];
        reader.read_exact(&mut payload)?;
        frames.push(WorldSnapshot::from_bytes(&payload)?);
    }
    Ok(frames)
}

/// One replayed tick.
#[derive(Debug, Serialize)]
pub struct ReplayedTick {
    /// Tick index from the recorded frame.
    pub tick: u64,
    /// Order the agent reproduced for that frame.
    pub order: Option<Order>,
}

/// Drive a fresh agent over recorded frames, reproducing the original
/// run's order stream.
///
/// # Errors
///
/// Fails when the agent rejects a frame.
pub fn replay_orders(
    frames: &[WorldSnapshot],
    mut agent: Agent,
) -> Result<Vec<ReplayedTick>, ReplayError> {
    frames
        .iter()
        .map(|frame| {
            let order = agent.step(frame)?;
            Ok(ReplayedTick {
                tick: frame.tick,
                order,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactics_core::prelude::{AgentConfig, UnitSet};

    fn frame(tick: u64) -> WorldSnapshot {
        WorldSnapshot {
            tick,
            refill_interval: 60,
            refill_capacity: 12,
            strike_cooldown: u64::MAX,
            allies: UnitSet::new(tactics_test_utils::fixtures::starting_allies()),
            enemies: UnitSet::new(Vec::new()),
        }
    }

    #[test]
    fn test_frames_roundtrip_through_the_stream() {
        let mut stream = Vec::new();
        write_frame(&mut stream, &frame(0)).unwrap();
        write_frame(&mut stream, &frame(1)).unwrap();

        let frames = read_frames(&mut stream.as_slice()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frame(0));
        assert_eq!(frames[1], frame(1));
    }

    #[test]
    fn test_truncated_payload_is_an_error() {
        let mut stream = Vec::new();
        write_frame(&mut stream, &frame(0)).unwrap();
        stream.truncate(stream.len() - 1);

        assert!(matches!(
            read_frames(&mut stream.as_slice()),
            Err(ReplayError::Io(_))
        ));
    }

    #[test]
    fn test_replay_reproduces_a_live_order_stream() {
        let frames: Vec<WorldSnapshot> = (0..10).map(frame).collect();

        let mut live = Agent::new(AgentConfig::default());
        let live_orders: Vec<Option<Order>> = frames
            .iter()
            .map(|f| live.step(f).unwrap())
            .collect();

        let replayed = replay_orders(&frames, Agent::new(AgentConfig::default())).unwrap();
        let replayed_orders: Vec<Option<Order>> =
            replayed.into_iter().map(|t| t.order).collect();
        assert_eq!(replayed_orders, live_orders);
    }
}
