//! Moves between the share representations.
//!
//! The three Boolean representations form a small lattice: masked replicated
//! (MSS) above replicated (RSS) above additive (ASS). Going down is local,
//! going up costs one communication round. Every message leaving a party is
//! blinded by a pairwise PRG value the receiver does not know.

use super::{network::AlkaidNetworkExt, AlkaidState};
use alkaid_net::Network;
use alkaid_types::{
    ring::int_ring::IntRing2k,
    {AssShare, MssShare, RssShare},
};
use itertools::izip;
use rand::{distributions::Standard, prelude::Distribution};

/// Degrades a replicated sharing to an additive sharing. Local: the first
/// slots of a replicated sharing already form an additive sharing.
pub fn rss_to_ass<T: IntRing2k>(x: &RssShare<T>) -> AssShare<T> {
    AssShare::new(x.a)
}

/// Degrades a masked sharing to a replicated sharing. Local.
pub fn mss_to_rss<T: IntRing2k>(x: &MssShare<T>) -> RssShare<T> {
    RssShare::new_ring(x.e ^ x.d.a, x.e ^ x.d.b)
}

/// Batched form of [`mss_to_rss`].
pub fn mss_to_rss_many<T: IntRing2k>(x: &[MssShare<T>]) -> Vec<RssShare<T>> {
    x.iter().map(mss_to_rss).collect()
}

/// Upgrades a batch of replicated sharings to masked sharings. One round of
/// k bits per element.
pub fn rss_to_mss_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<MssShare<T>>>
where
    Standard: Distribution<T>,
{
    let mut masks = Vec::with_capacity(x.len());
    let msg = x
        .iter()
        .map(|x| {
            let (f_next, f_prev) = state.rngs.random_pair::<T>();
            masks.push(RssShare::new_ring(f_next, f_prev));
            x.a ^ f_next
        })
        .collect::<Vec<_>>();
    let recv = net.rotate_r_many("reshare.r2m", &msg)?;

    Ok(izip!(x, masks, recv)
        .map(|(x, d, r)| MssShare::new(x.a ^ x.b ^ d.a ^ d.b ^ r, d))
        .collect())
}

/// Upgrades a batch of additive sharings to replicated sharings. One round
/// of k bits per element.
pub fn ass_to_rss_many<T: IntRing2k, N: Network>(
    x: &[AssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<T>>>
where
    Standard: Distribution<T>,
{
    let masked = x
        .iter()
        .map(|x| x.a ^ state.rngs.xor_mask::<T>())
        .collect::<Vec<_>>();
    let recv = net.rotate_many("reshare.a2r", &masked)?;
    Ok(izip!(masked, recv)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect())
}

/// Upgrades a batch of additive sharings straight to masked sharings. One
/// round with two messages, 2k bits per element. Both messages carry a
/// fresh pairwise blind of a pair the receiver is not part of; the external
/// value absorbs all six pair draws so it comes out identical everywhere.
pub fn ass_to_mss_many<T: IntRing2k, N: Network>(
    x: &[AssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<MssShare<T>>>
where
    Standard: Distribution<T>,
{
    let mut masks = Vec::with_capacity(x.len());
    let mut own = Vec::with_capacity(x.len());
    let mut msg_fwd = Vec::with_capacity(x.len());
    let mut msg_bwd = Vec::with_capacity(x.len());
    for x in x {
        let (f_next, f_prev) = state.rngs.random_pair::<T>();
        let (s_next, s_prev) = state.rngs.random_pair::<T>();
        masks.push(RssShare::new_ring(f_next ^ s_next, f_prev ^ s_prev));
        own.push(x.a ^ f_next ^ f_prev ^ s_next ^ s_prev);
        msg_fwd.push(x.a ^ f_prev);
        msg_bwd.push(x.a ^ s_next);
    }
    let recv_prev = net.rotate_many("reshare.a2m.fwd", &msg_fwd)?;
    let recv_next = net.rotate_r_many("reshare.a2m.bwd", &msg_bwd)?;

    Ok(izip!(own, masks, recv_prev, recv_next)
        .map(|(own, d, rp, rn)| MssShare::new(own ^ rp ^ rn, d))
        .collect())
}

/// Scalar form of [`rss_to_mss_many`].
pub fn rss_to_mss<T: IntRing2k, N: Network>(
    x: &RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<MssShare<T>>
where
    Standard: Distribution<T>,
{
    Ok(rss_to_mss_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element in, one out"))
}

/// Scalar form of [`ass_to_rss_many`].
pub fn ass_to_rss<T: IntRing2k, N: Network>(
    x: &AssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<T>>
where
    Standard: Distribution<T>,
{
    Ok(ass_to_rss_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element in, one out"))
}

/// Scalar form of [`ass_to_mss_many`].
pub fn ass_to_mss<T: IntRing2k, N: Network>(
    x: &AssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<MssShare<T>>
where
    Standard: Distribution<T>,
{
    Ok(ass_to_mss_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element in, one out"))
}
