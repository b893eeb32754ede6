//! Gates on masked replicated shares.
//!
//! With `x = e_x ^ d_x` and `y = e_y ^ d_y`, the product expands to
//! `e_x e_y ^ e_x d_y ^ d_x e_y ^ d_x d_y`. The first three terms are local;
//! the cross term `d_x d_y` is a function of the masks alone, so it can be
//! precomputed before the external values even exist. [`and_triple_many`]
//! produces a batch of these mask products with a single resharing round;
//! [`and_pre`] then evaluates the gate without any online communication.

use super::{binary, id::PartyId, network::AlkaidNetworkExt, resharing, AlkaidState};
use alkaid_net::Network;
use alkaid_types::{
    ring::{int_ring::IntRing2k, ring_impl::RingElement},
    AssShare, MssShare, RssShare,
};
use itertools::izip;
use rand::{distributions::Standard, prelude::Distribution};

/// Performs a bitwise XOR of two masked shared values.
pub fn xor<T: IntRing2k>(a: &MssShare<T>, b: &MssShare<T>) -> MssShare<T> {
    a ^ b
}

/// Performs a bitwise XOR of a masked shared value and a public value. The
/// public value folds into the external value at every party.
pub fn xor_public<T: IntRing2k>(shared: &MssShare<T>, public: RingElement<T>) -> MssShare<T> {
    let mut res = *shared;
    res.e ^= public;
    res
}

/// Computes replicated sharings of the mask products `d_x & d_y` for a batch
/// of gate inputs. One resharing round for the whole batch.
pub fn and_triple_many<T: IntRing2k, N: Network>(
    lhs: &[MssShare<T>],
    rhs: &[MssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<T>>>
where
    Standard: Distribution<T>,
{
    if lhs.len() != rhs.len() {
        eyre::bail!("triples for {} and {} elements", lhs.len(), rhs.len());
    }
    let local_a = izip!(lhs, rhs)
        .map(|(x, y)| (&x.d & &y.d) ^ state.rngs.xor_mask::<T>())
        .collect::<Vec<_>>();
    let local_b = net.rotate_many("mss.triple", &local_a)?;
    Ok(izip!(local_a, local_b)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect())
}

/// The masked AND gate: consumes a mask-product triple, produces a
/// replicated sharing, no communication.
pub fn and_pre<T: IntRing2k>(
    x: &MssShare<T>,
    y: &MssShare<T>,
    triple: &RssShare<T>,
) -> RssShare<T> {
    let ee = x.e & y.e;
    RssShare::new_ring(
        ee ^ (x.e & y.d.a) ^ (x.d.a & y.e) ^ triple.a,
        ee ^ (x.e & y.d.b) ^ (x.d.b & y.e) ^ triple.b,
    )
}

/// AND of three masked operands as a two-level tree; the result is additive
/// and must be reshared before reuse.
pub fn and3<T: IntRing2k>(
    x: &MssShare<T>,
    y: &MssShare<T>,
    z: &MssShare<T>,
    triple_xy: &RssShare<T>,
    state: &mut AlkaidState,
) -> AssShare<T>
where
    Standard: Distribution<T>,
{
    let lo = and_pre(x, y, triple_xy);
    let hi = resharing::mss_to_rss(z);
    binary::and_to_additive(&lo, &hi, state)
}

/// AND of four masked operands as a two-level tree; the result is additive
/// and must be reshared before reuse.
pub fn and4<T: IntRing2k>(
    x: &MssShare<T>,
    y: &MssShare<T>,
    z: &MssShare<T>,
    w: &MssShare<T>,
    triple_xy: &RssShare<T>,
    triple_zw: &RssShare<T>,
    state: &mut AlkaidState,
) -> AssShare<T>
where
    Standard: Distribution<T>,
{
    let lo = and_pre(x, y, triple_xy);
    let hi = and_pre(z, w, triple_zw);
    binary::and_to_additive(&lo, &hi, state)
}

/// Lifts a public value into a trivial masked sharing: the external value is
/// the value itself, all mask slots are zero.
pub fn promote_to_trivial_share<T: IntRing2k>(
    _id: PartyId,
    public: RingElement<T>,
) -> MssShare<T> {
    MssShare::new(public, RssShare::zero())
}
