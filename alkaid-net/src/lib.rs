//! A simple synchronous networking layer for MPC protocols.
//!
//! The trait below is deliberately minimal: parties are addressed by their
//! 0-based id, `send`/`recv` move opaque byte frames, and a single connection
//! between two parties delivers frames in send order. Everything typed
//! (serialization, message tags, rotation patterns) lives in the protocol
//! crates on top of this.

#![warn(missing_docs)]

use std::{collections::BTreeMap, time::Duration};

pub mod local;
pub mod tcp;

/// How long connection setup and blocking reads wait before giving up.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// The maximum length (in bytes) of a single frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 1 << 30;

/// A network that connects this party to its peers.
pub trait Network: Send + Sync {
    /// Returns the id of this party.
    fn id(&self) -> usize;

    /// Sends one frame to the party with the given id.
    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()>;

    /// Receives one frame from the party with the given id, blocking until it
    /// arrives or the connection times out.
    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>>;

    /// Returns the per-peer traffic counters.
    fn get_connection_stats(&self) -> ConnectionStats {
        ConnectionStats {
            my_id: self.id(),
            stats: BTreeMap::new(),
        }
    }
}

/// Sent and received byte counts, per peer.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStats {
    /// The id of the party the stats belong to
    pub my_id: usize,
    /// peer id -> (sent bytes, received bytes)
    pub stats: BTreeMap<usize, (usize, usize)>,
}

impl std::fmt::Display for ConnectionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, (sent, recv)) in &self.stats {
            writeln!(
                f,
                "party {} <-> {id}: sent {sent} bytes, recv {recv} bytes",
                self.my_id
            )?;
        }
        Ok(())
    }
}
