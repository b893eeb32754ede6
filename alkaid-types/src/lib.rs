//! # Alkaid Types
//!
//! Share representations for the Alkaid semi-honest three-party protocols
//! over rings with 2^k elements, plus the share/reconstruct helpers used by
//! drivers and tests.

#![warn(missing_docs)]

pub mod ring;
pub mod share;
pub mod typing;

pub use share::{AssShare, MssShare, RssShare};

use rand::{distributions::Standard, prelude::Distribution, CryptoRng, Rng};
use ring::{bit::Bit, int_ring::IntRing2k, ring_impl::RingElement};

/// Shorthand for a replicated share of a single bit.
pub type BitShare = RssShare<Bit>;

/// Secret shares a ring element arithmetically: the element is split into
/// three additive slots, each party holds its own and the previous party's.
pub fn share_ring_element<T: IntRing2k, R: Rng + CryptoRng>(
    val: RingElement<T>,
    rng: &mut R,
) -> [RssShare<T>; 3]
where
    Standard: Distribution<T>,
{
    let a = rng.gen::<RingElement<T>>();
    let b = rng.gen::<RingElement<T>>();
    let c = val - a - b;
    [
        RssShare::new_ring(a, c),
        RssShare::new_ring(b, a),
        RssShare::new_ring(c, b),
    ]
}

/// Secret shares a vector of ring elements arithmetically.
pub fn share_ring_elements<T: IntRing2k, R: Rng + CryptoRng>(
    vals: &[RingElement<T>],
    rng: &mut R,
) -> [Vec<RssShare<T>>; 3]
where
    Standard: Distribution<T>,
{
    let mut shares = [
        Vec::with_capacity(vals.len()),
        Vec::with_capacity(vals.len()),
        Vec::with_capacity(vals.len()),
    ];
    for val in vals {
        let [s0, s1, s2] = share_ring_element(*val, rng);
        shares[0].push(s0);
        shares[1].push(s1);
        shares[2].push(s2);
    }
    shares
}

/// Secret shares a ring element as XOR shares.
pub fn share_ring_element_binary<T: IntRing2k, R: Rng + CryptoRng>(
    val: RingElement<T>,
    rng: &mut R,
) -> [RssShare<T>; 3]
where
    Standard: Distribution<T>,
{
    let a = rng.gen::<RingElement<T>>();
    let b = rng.gen::<RingElement<T>>();
    let c = val ^ a ^ b;
    [
        RssShare::new_ring(a, c),
        RssShare::new_ring(b, a),
        RssShare::new_ring(c, b),
    ]
}

/// Secret shares a vector of ring elements as XOR shares.
pub fn share_ring_elements_binary<T: IntRing2k, R: Rng + CryptoRng>(
    vals: &[RingElement<T>],
    rng: &mut R,
) -> [Vec<RssShare<T>>; 3]
where
    Standard: Distribution<T>,
{
    let mut shares = [
        Vec::with_capacity(vals.len()),
        Vec::with_capacity(vals.len()),
        Vec::with_capacity(vals.len()),
    ];
    for val in vals {
        let [s0, s1, s2] = share_ring_element_binary(*val, rng);
        shares[0].push(s0);
        shares[1].push(s1);
        shares[2].push(s2);
    }
    shares
}

/// Reconstructs a ring element from its arithmetic replicated shares.
pub fn combine_ring_element<T: IntRing2k>(
    s0: RssShare<T>,
    s1: RssShare<T>,
    s2: RssShare<T>,
) -> RingElement<T> {
    s0.a + s1.a + s2.a
}

/// Reconstructs a vector of ring elements from arithmetic replicated shares.
///
/// # Panics
/// Panics if the share vector lengths differ.
pub fn combine_ring_elements<T: IntRing2k>(
    s0: &[RssShare<T>],
    s1: &[RssShare<T>],
    s2: &[RssShare<T>],
) -> Vec<RingElement<T>> {
    assert_eq!(s0.len(), s1.len());
    assert_eq!(s1.len(), s2.len());
    itertools::multizip((s0, s1, s2))
        .map(|(x0, x1, x2)| x0.a + x1.a + x2.a)
        .collect()
}

/// Reconstructs a ring element from its Boolean replicated shares.
pub fn combine_ring_element_binary<T: IntRing2k>(
    s0: RssShare<T>,
    s1: RssShare<T>,
    s2: RssShare<T>,
) -> RingElement<T> {
    s0.a ^ s1.a ^ s2.a
}

/// Reconstructs a vector of ring elements from Boolean replicated shares.
///
/// # Panics
/// Panics if the share vector lengths differ.
pub fn combine_ring_elements_binary<T: IntRing2k>(
    s0: &[RssShare<T>],
    s1: &[RssShare<T>],
    s2: &[RssShare<T>],
) -> Vec<RingElement<T>> {
    assert_eq!(s0.len(), s1.len());
    assert_eq!(s1.len(), s2.len());
    itertools::multizip((s0, s1, s2))
        .map(|(x0, x1, x2)| x0.a ^ x1.a ^ x2.a)
        .collect()
}

/// Reconstructs a ring element from its masked replicated shares.
///
/// # Panics
/// Panics if the external values of the three parties disagree, which means
/// the sharing is malformed.
pub fn combine_masked_binary<T: IntRing2k>(
    s0: MssShare<T>,
    s1: MssShare<T>,
    s2: MssShare<T>,
) -> RingElement<T> {
    assert_eq!(s0.e, s1.e);
    assert_eq!(s1.e, s2.e);
    s0.e ^ s0.d.a ^ s1.d.a ^ s2.d.a
}

/// Reconstructs a ring element from its additive Boolean shares.
pub fn combine_additive_binary<T: IntRing2k>(
    s0: AssShare<T>,
    s1: AssShare<T>,
    s2: AssShare<T>,
) -> RingElement<T> {
    s0.a ^ s1.a ^ s2.a
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn roundtrip<T: IntRing2k>()
    where
        Standard: Distribution<T>,
    {
        let mut rng = ChaCha12Rng::from_entropy();
        for _ in 0..10 {
            let x = rng.gen::<RingElement<T>>();
            let [s0, s1, s2] = share_ring_element(x, &mut rng);
            // replication invariant
            assert_eq!(s1.b, s0.a);
            assert_eq!(s2.b, s1.a);
            assert_eq!(s0.b, s2.a);
            assert_eq!(combine_ring_element(s0, s1, s2), x);

            let [s0, s1, s2] = share_ring_element_binary(x, &mut rng);
            assert_eq!(s1.b, s0.a);
            assert_eq!(combine_ring_element_binary(s0, s1, s2), x);
        }
    }

    #[test]
    fn share_combine_roundtrip() {
        roundtrip::<Bit>();
        roundtrip::<u8>();
        roundtrip::<u16>();
        roundtrip::<u32>();
        roundtrip::<u64>();
        roundtrip::<u128>();
    }
}
