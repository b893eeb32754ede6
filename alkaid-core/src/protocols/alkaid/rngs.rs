//! Correlated randomness for the three-party protocols.
//!
//! Each party owns four ChaCha streams: one seeded jointly with the next
//! party, one with the previous party, one shared by all three, and one
//! private. A pair stream only ever advances when both of its owners draw
//! from it, and both always draw the same amount in the same kernel, so the
//! cursors stay aligned by construction.

use super::id::PartyId;
use crate::{RngType, SEED_SIZE};
use alkaid_types::ring::{int_ring::IntRing2k, ring_impl::RingElement};
use rand::{distributions::Standard, prelude::Distribution, Rng, SeedableRng};

/// The per-party PRG state.
#[derive(Debug)]
pub struct PrgState {
    /// Stream shared with the next party
    rng_next: RngType,
    /// Stream shared with the previous party
    rng_prev: RngType,
    /// Stream shared by all three parties
    publ: RngType,
    /// Stream known only to this party
    private: RngType,
}

impl PrgState {
    /// Builds the state from the exchanged seeds. The private stream is
    /// seeded from entropy.
    pub fn new(
        seed_next: [u8; SEED_SIZE],
        seed_prev: [u8; SEED_SIZE],
        seed_publ: [u8; SEED_SIZE],
    ) -> Self {
        Self {
            rng_next: RngType::from_seed(seed_next),
            rng_prev: RngType::from_seed(seed_prev),
            publ: RngType::from_seed(seed_publ),
            private: RngType::from_entropy(),
        }
    }

    /// Derives an independent state; both pair streams fork on both sides.
    pub fn fork(&mut self) -> Self {
        let seed_next = self.rng_next.gen();
        let seed_prev = self.rng_prev.gen();
        let seed_publ = self.publ.gen();
        Self::new(seed_next, seed_prev, seed_publ)
    }

    /// Draws one element from both pair streams: `(next, prev)`.
    pub fn random_pair<T: IntRing2k>(&mut self) -> (RingElement<T>, RingElement<T>)
    where
        Standard: Distribution<T>,
    {
        (self.rng_next.gen::<RingElement<T>>(), self.rng_prev.gen::<RingElement<T>>())
    }

    /// Draws a fresh XOR-zero mask: the pairwise values cancel across the
    /// three parties.
    pub fn xor_mask<T: IntRing2k>(&mut self) -> RingElement<T>
    where
        Standard: Distribution<T>,
    {
        let (a, b) = self.random_pair::<T>();
        a ^ b
    }

    /// Draws one element from the stream shared with the next party.
    pub fn random_next<T: IntRing2k>(&mut self) -> RingElement<T>
    where
        Standard: Distribution<T>,
    {
        self.rng_next.gen::<RingElement<T>>()
    }

    /// Draws one element from the stream shared with the previous party.
    pub fn random_prev<T: IntRing2k>(&mut self) -> RingElement<T>
    where
        Standard: Distribution<T>,
    {
        self.rng_prev.gen::<RingElement<T>>()
    }

    /// Vector form of [`Self::random_pair`].
    pub fn random_pair_vec<T: IntRing2k>(
        &mut self,
        len: usize,
    ) -> (Vec<RingElement<T>>, Vec<RingElement<T>>)
    where
        Standard: Distribution<T>,
    {
        let next = (0..len).map(|_| self.rng_next.gen::<RingElement<T>>()).collect();
        let prev = (0..len).map(|_| self.rng_prev.gen::<RingElement<T>>()).collect();
        (next, prev)
    }

    /// Vector form of [`Self::random_next`].
    pub fn random_next_vec<T: IntRing2k>(&mut self, len: usize) -> Vec<RingElement<T>>
    where
        Standard: Distribution<T>,
    {
        (0..len).map(|_| self.rng_next.gen::<RingElement<T>>()).collect()
    }

    /// Vector form of [`Self::random_prev`].
    pub fn random_prev_vec<T: IntRing2k>(&mut self, len: usize) -> Vec<RingElement<T>>
    where
        Standard: Distribution<T>,
    {
        (0..len).map(|_| self.rng_prev.gen::<RingElement<T>>()).collect()
    }

    /// Vector of elements known only to this party.
    pub fn random_priv_vec<T: IntRing2k>(&mut self, len: usize) -> Vec<RingElement<T>>
    where
        Standard: Distribution<T>,
    {
        (0..len).map(|_| self.private.gen::<RingElement<T>>()).collect()
    }

    /// A party id that all three parties sample identically. Used to rotate
    /// dealer/helper roles across kernel invocations.
    pub fn random_pivot(&mut self) -> PartyId {
        PartyId::try_from(self.publ.gen::<u64>() as usize % 3).expect("mod 3 is a valid rank")
    }
}
