//! Typed, tagged messaging on top of the raw byte network.
//!
//! Every protocol message carries a tag string naming the protocol step it
//! belongs to. All three parties execute the same sequence of tagged calls;
//! the tags disambiguate otherwise-identical messages inside one kernel, and
//! a received frame with the wrong tag aborts the kernel.

use super::id::PartyId;
use alkaid_net::Network;
use serde::{de::DeserializeOwned, Serialize};

/// Tagged send/receive patterns for the three-party ring.
pub trait AlkaidNetworkExt: Network {
    /// This party's rank.
    fn rank(&self) -> eyre::Result<PartyId> {
        Ok(PartyId::try_from(self.id())?)
    }

    /// Sends a batch of values to `to` under `tag`.
    fn send_many<F: Serialize>(&self, to: PartyId, tag: &str, data: &[F]) -> eyre::Result<()> {
        let frame = bincode::serialize(&(tag, data))?;
        self.send(usize::from(to), &frame)
    }

    /// Sends one value to `to` under `tag`.
    fn send_one<F: Serialize>(&self, to: PartyId, tag: &str, data: F) -> eyre::Result<()> {
        self.send_many(to, tag, &[data])
    }

    /// Receives a batch of values from `from`, checking the tag.
    fn recv_many<F: DeserializeOwned>(&self, from: PartyId, tag: &str) -> eyre::Result<Vec<F>> {
        let frame = self.recv(usize::from(from))?;
        let (got, data): (String, Vec<F>) = bincode::deserialize(&frame)?;
        if got != tag {
            eyre::bail!("channel tag mismatch: expected \"{tag}\", got \"{got}\"");
        }
        Ok(data)
    }

    /// Receives exactly one value from `from`, checking the tag.
    fn recv_one<F: DeserializeOwned>(&self, from: PartyId, tag: &str) -> eyre::Result<F> {
        let mut res = self.recv_many(from, tag)?;
        if res.len() != 1 {
            eyre::bail!("expected 1 element, got {}", res.len());
        }
        Ok(res.pop().expect("checked length"))
    }

    /// Sends the batch to the next party and returns the batch received from
    /// the previous party.
    fn rotate_many<F: Serialize + DeserializeOwned>(
        &self,
        tag: &str,
        data: &[F],
    ) -> eyre::Result<Vec<F>> {
        let me = self.rank()?;
        self.send_many(me.next(), tag, data)?;
        let res = self.recv_many(me.prev(), tag)?;
        if res.len() != data.len() {
            eyre::bail!("rotate received {} elements, sent {}", res.len(), data.len());
        }
        Ok(res)
    }

    /// Sends one value to the next party and returns the one received from
    /// the previous party.
    fn rotate_one<F: Serialize + DeserializeOwned>(&self, tag: &str, data: F) -> eyre::Result<F> {
        let me = self.rank()?;
        self.send_one(me.next(), tag, data)?;
        self.recv_one(me.prev(), tag)
    }

    /// Sends the batch to the previous party and returns the batch received
    /// from the next party.
    fn rotate_r_many<F: Serialize + DeserializeOwned>(
        &self,
        tag: &str,
        data: &[F],
    ) -> eyre::Result<Vec<F>> {
        let me = self.rank()?;
        self.send_many(me.prev(), tag, data)?;
        let res = self.recv_many(me.next(), tag)?;
        if res.len() != data.len() {
            eyre::bail!("rotate received {} elements, sent {}", res.len(), data.len());
        }
        Ok(res)
    }

    /// Root sends its batch to both other parties; everyone returns the
    /// root's batch.
    fn bcast_many<F: Serialize + DeserializeOwned + Clone>(
        &self,
        root: PartyId,
        tag: &str,
        data: &[F],
    ) -> eyre::Result<Vec<F>> {
        let me = self.rank()?;
        if me == root {
            self.send_many(root.next(), tag, data)?;
            self.send_many(root.prev(), tag, data)?;
            Ok(data.to_vec())
        } else {
            self.recv_many(root, tag)
        }
    }
}

impl<N: Network> AlkaidNetworkExt for N {}
