//! Operations on arithmetic replicated shares. Everything here except the
//! openings is local.

use super::{id::PartyId, network::AlkaidNetworkExt};
use alkaid_net::Network;
use alkaid_types::{
    ring::{int_ring::IntRing2k, ring_impl::RingElement},
    RssShare,
};
use itertools::izip;

/// Performs addition of two shared values.
pub fn add<T: IntRing2k>(a: RssShare<T>, b: RssShare<T>) -> RssShare<T> {
    a + b
}

/// Performs subtraction of two shared values, returning a - b.
pub fn sub<T: IntRing2k>(a: RssShare<T>, b: RssShare<T>) -> RssShare<T> {
    a - b
}

/// Negates a shared value.
pub fn neg<T: IntRing2k>(a: RssShare<T>) -> RssShare<T> {
    -a
}

/// Adds a public value to a shared value.
pub fn add_public<T: IntRing2k>(
    shared: RssShare<T>,
    public: RingElement<T>,
    id: PartyId,
) -> RssShare<T> {
    let mut res = shared;
    match id {
        PartyId::P0 => res.a += public,
        PartyId::P1 => res.b += public,
        PartyId::P2 => {}
    }
    res
}

/// Subtracts a public value from a shared value.
pub fn sub_shared_by_public<T: IntRing2k>(
    shared: RssShare<T>,
    public: RingElement<T>,
    id: PartyId,
) -> RssShare<T> {
    add_public(shared, -public, id)
}

/// Subtracts a shared value from a public value.
pub fn sub_public_by_shared<T: IntRing2k>(
    public: RingElement<T>,
    shared: RssShare<T>,
    id: PartyId,
) -> RssShare<T> {
    add_public(-shared, public, id)
}

/// Opens an arithmetic shared value towards all parties.
pub fn open<T: IntRing2k, N: Network>(a: RssShare<T>, net: &N) -> eyre::Result<RingElement<T>> {
    let c = net.rotate_one("arith.open", a.b)?;
    Ok(a.a + a.b + c)
}

/// Opens a batch of arithmetic shared values towards all parties.
pub fn open_many<T: IntRing2k, N: Network>(
    a: &[RssShare<T>],
    net: &N,
) -> eyre::Result<Vec<RingElement<T>>> {
    let bs = a.iter().map(|x| x.b).collect::<Vec<_>>();
    let cs = net.rotate_many("arith.open", &bs)?;
    Ok(izip!(a, cs).map(|(x, c)| x.a + x.b + c).collect())
}
