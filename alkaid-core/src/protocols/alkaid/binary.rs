//! Boolean gates on replicated shares.
//!
//! XOR is local in every representation. The replicated AND comes in two
//! shapes: [`and`] spends one resharing round and stays replicated, while
//! [`and_to_additive`] is free of communication but degrades the result to
//! an additive sharing that must be reshared before the next non-linear
//! gate. Batching multiple degraded ANDs behind a single resharing is what
//! the carry circuits are built from.

use super::{id::PartyId, network::AlkaidNetworkExt, AlkaidState};
use alkaid_net::Network;
use alkaid_types::{
    ring::{int_ring::IntRing2k, ring_impl::RingElement},
    AssShare, RssShare,
};
use itertools::izip;
use num_traits::Zero;
use rand::{distributions::Standard, prelude::Distribution};

/// Performs a bitwise XOR of two shared values.
pub fn xor<T: IntRing2k>(a: &RssShare<T>, b: &RssShare<T>) -> RssShare<T> {
    a ^ b
}

/// Performs a bitwise XOR of a shared value and a public value.
pub fn xor_public<T: IntRing2k>(
    shared: &RssShare<T>,
    public: &RingElement<T>,
    id: PartyId,
) -> RssShare<T> {
    let mut res = shared.to_owned();
    match id {
        PartyId::P0 => res.a ^= public,
        PartyId::P1 => res.b ^= public,
        PartyId::P2 => {}
    }
    res
}

/// Performs a bitwise AND of two shared values. One resharing round.
pub fn and<T: IntRing2k, N: Network>(
    a: &RssShare<T>,
    b: &RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<T>>
where
    Standard: Distribution<T>,
{
    let local_a = (a & b) ^ state.rngs.xor_mask::<T>();
    let local_b = net.rotate_one("and.bb", local_a)?;
    Ok(RssShare::new_ring(local_a, local_b))
}

/// Performs an element-wise bitwise AND on the batches. One resharing round.
pub fn and_many<T: IntRing2k, N: Network>(
    a: &[RssShare<T>],
    b: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<T>>>
where
    Standard: Distribution<T>,
{
    if a.len() != b.len() {
        eyre::bail!("and on {} and {} elements", a.len(), b.len());
    }
    let local_a = izip!(a, b)
        .map(|(a, b)| (a & b) ^ state.rngs.xor_mask::<T>())
        .collect::<Vec<_>>();
    let local_b = net.rotate_many("and.bb", &local_a)?;
    Ok(izip!(local_a, local_b)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect())
}

/// Performs a bitwise AND without communication. The result is an additive
/// sharing and must be reshared before it can feed another non-linear gate.
pub fn and_to_additive<T: IntRing2k>(
    a: &RssShare<T>,
    b: &RssShare<T>,
    state: &mut AlkaidState,
) -> AssShare<T>
where
    Standard: Distribution<T>,
{
    AssShare::new((a & b) ^ state.rngs.xor_mask::<T>())
}

/// Batched form of [`and_to_additive`].
pub fn and_to_additive_many<T: IntRing2k>(
    a: &[RssShare<T>],
    b: &[RssShare<T>],
    state: &mut AlkaidState,
) -> eyre::Result<Vec<AssShare<T>>>
where
    Standard: Distribution<T>,
{
    if a.len() != b.len() {
        eyre::bail!("and on {} and {} elements", a.len(), b.len());
    }
    Ok(izip!(a, b)
        .map(|(a, b)| AssShare::new((a & b) ^ state.rngs.xor_mask::<T>()))
        .collect())
}

/// Performs a bitwise AND of a shared value and a public value.
pub fn and_with_public<T: IntRing2k>(
    shared: &RssShare<T>,
    public: RingElement<T>,
) -> RssShare<T> {
    *shared & public
}

/// Opens a Boolean shared value towards all parties.
pub fn open<T: IntRing2k, N: Network>(a: &RssShare<T>, net: &N) -> eyre::Result<RingElement<T>> {
    let c = net.rotate_one("bin.open", a.b)?;
    Ok(a.a ^ a.b ^ c)
}

/// Opens a batch of Boolean shared values towards all parties.
pub fn open_many<T: IntRing2k, N: Network>(
    a: &[RssShare<T>],
    net: &N,
) -> eyre::Result<Vec<RingElement<T>>> {
    let bs = a.iter().map(|x| x.b).collect::<Vec<_>>();
    let cs = net.rotate_many("bin.open", &bs)?;
    Ok(izip!(a, cs).map(|(x, c)| x.a ^ x.b ^ c).collect())
}

/// Lifts a public value into a trivial Boolean sharing.
pub fn promote_to_trivial_share<T: IntRing2k>(
    id: PartyId,
    public: &RingElement<T>,
) -> RssShare<T> {
    match id {
        PartyId::P0 => RssShare::new_ring(*public, RingElement::zero()),
        PartyId::P1 => RssShare::new_ring(RingElement::zero(), *public),
        PartyId::P2 => RssShare::zero(),
    }
}
