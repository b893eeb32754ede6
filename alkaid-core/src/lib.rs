//! # Alkaid Core
//!
//! Semi-honest three-party share conversion over rings with 2^k elements:
//! replicated, masked-replicated and additive Boolean sharings, the
//! resharings between them, multi-fan-in Boolean gates, the 4-ary
//! parallel-prefix conversions between arithmetic and Boolean form, and
//! equality tests.

#![warn(missing_docs)]

pub mod protocols;

pub(crate) type RngType = rand_chacha::ChaCha12Rng;
pub(crate) const SEED_SIZE: usize = std::mem::size_of::<<RngType as rand::SeedableRng>::Seed>();

/// Trait for MPC protocol states
pub trait MpcState: Sized {
    /// The type of a party id
    type PartyID: Clone + Copy + Send + Sync;

    /// Get the id of the party
    fn id(&self) -> Self::PartyID;

    /// Create an independent state for a concurrent protocol run
    fn fork(&mut self) -> eyre::Result<Self>;
}
