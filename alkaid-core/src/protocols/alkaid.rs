//! # Alkaid protocol
//!
//! Semi-honest three-party computation over rings with 2^k elements, built
//! on replicated secret sharing in the style of
//! [ABY3](https://eprint.iacr.org/2018/403.pdf), extended with a masked
//! replicated Boolean sharing whose public external value makes two-input
//! AND gates free of online communication. The conversion kernels combine
//! these representations into multi-fan-in parallel-prefix circuits.

use crate::{MpcState, RngType, SEED_SIZE};
use alkaid_net::Network;
use rand::{Rng, SeedableRng};

pub mod arithmetic;
pub mod binary;
pub mod bits;
pub mod conversion;
pub(crate) mod detail;
pub mod equality;
pub mod id;
pub mod mss;
pub mod network;
pub mod resharing;
pub(crate) mod rngs;

pub use id::PartyId;
pub use network::AlkaidNetworkExt;
pub use rngs::PrgState;

/// Per-party protocol state: the rank and the correlated PRG streams.
///
/// Constructing the state performs the seed exchange: every party deals a
/// fresh seed to its next neighbour (the pairwise streams), and party 0
/// deals the seed of the public stream.
#[derive(Debug)]
pub struct AlkaidState {
    /// This party's rank
    pub id: PartyId,
    /// The correlated randomness streams
    pub rngs: PrgState,
}

impl AlkaidState {
    /// Runs the seed exchange over an established network.
    pub fn new<N: Network>(net: &N) -> eyre::Result<Self> {
        let id = net.rank()?;

        let seed_next: [u8; SEED_SIZE] = RngType::from_entropy().gen();
        let seed_prev = net.rotate_one("setup.prss", seed_next)?;

        let seed_publ: [u8; SEED_SIZE] = if id == PartyId::P0 {
            let seed: [u8; SEED_SIZE] = RngType::from_entropy().gen();
            net.bcast_many(PartyId::P0, "setup.publ", &[seed])?
                .pop()
                .expect("bcast returns one element")
        } else {
            let mut res = net.bcast_many::<[u8; SEED_SIZE]>(PartyId::P0, "setup.publ", &[])?;
            if res.len() != 1 {
                eyre::bail!("expected one public seed, got {}", res.len());
            }
            res.pop().expect("checked length")
        };

        Ok(Self {
            id,
            rngs: PrgState::new(seed_next, seed_prev, seed_publ),
        })
    }
}

impl MpcState for AlkaidState {
    type PartyID = PartyId;

    fn id(&self) -> Self::PartyID {
        self.id
    }

    fn fork(&mut self) -> eyre::Result<Self> {
        Ok(Self {
            id: self.id,
            rngs: self.rngs.fork(),
        })
    }
}
