//! Equality tests on arithmetic sharings.
//!
//! The zero test follows the masked-reveal pattern: a dealer (rotated by
//! public randomness) deals arithmetic and Boolean sharings of the same
//! private mask `r`, the two other parties reveal `c = x + r` between
//! themselves, and `x = 0` exactly when `~c ^ [r]^B` is all ones. A halving
//! AND tree folds that word into a single bit.

use super::{arithmetic, binary, network::AlkaidNetworkExt, AlkaidState};
use alkaid_net::Network;
use alkaid_types::{
    ring::{bit::Bit, int_ring::IntRing2k, ring_impl::RingElement},
    RssShare,
};
use itertools::izip;
use num_traits::One;
use rand::{distributions::Standard, prelude::Distribution};

/// Tests a batch of arithmetic sharings for equality to zero. The result is
/// a Boolean sharing of one bit per element, 1 iff the element is zero.
pub fn eq_zero_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<Bit>>>
where
    Standard: Distribution<T>,
{
    let len = x.len();
    let dealer = state.rngs.random_pivot();
    let opener = dealer.next();
    let second = dealer.prev();
    tracing::debug!("eq_zero over {len} elements, dealer {dealer}");

    // the all-ones-iff-zero flag, replicated-shared across the three parties
    let flag = if state.id == dealer {
        let r = state.rngs.random_priv_vec::<T>(len);
        let r_arith = state.rngs.random_next_vec::<T>(len);
        let r_bool = state.rngs.random_next_vec::<T>(len);
        let r_z = state.rngs.random_next_vec::<T>(len);

        let r_arith_1 = izip!(&r, &r_arith).map(|(r, s)| *r - *s).collect::<Vec<_>>();
        let r_bool_1 = izip!(&r, &r_bool).map(|(r, s)| *r ^ *s).collect::<Vec<_>>();
        net.send_many(second, "eqz.ra", &r_arith_1)?;
        net.send_many(second, "eqz.rb", &r_bool_1)?;

        izip!(r_z, r_bool_1)
            .map(|(a, b)| RssShare::new_ring(a, b))
            .collect::<Vec<_>>()
    } else if state.id == opener {
        let r_arith = state.rngs.random_prev_vec::<T>(len);
        let r_bool = state.rngs.random_prev_vec::<T>(len);
        let r_z = state.rngs.random_prev_vec::<T>(len);

        // this party holds both remaining arithmetic slots
        let c_own = izip!(x, &r_arith)
            .map(|(x, s)| x.a + x.b + *s)
            .collect::<Vec<_>>();
        let c_other = net.recv_many::<RingElement<T>>(second, "eqz.c")?;
        if c_other.len() != len {
            eyre::bail!("expected {len} reveal shares, got {}", c_other.len());
        }

        let masked = izip!(c_own, c_other, &r_bool, &r_z)
            .map(|(c0, c1, rb, rz)| !((c0 + c1) ^ *rb) ^ *rz)
            .collect::<Vec<_>>();
        net.send_many(second, "eqz.flag", &masked)?;

        izip!(masked, r_z)
            .map(|(a, b)| RssShare::new_ring(a, b))
            .collect()
    } else {
        let r_arith_1 = net.recv_many::<RingElement<T>>(dealer, "eqz.ra")?;
        let r_bool_1 = net.recv_many::<RingElement<T>>(dealer, "eqz.rb")?;
        if r_arith_1.len() != len || r_bool_1.len() != len {
            eyre::bail!("unexpected mask share lengths from the dealer");
        }

        let c_own = izip!(x, r_arith_1)
            .map(|(x, s)| x.a + s)
            .collect::<Vec<_>>();
        net.send_many(opener, "eqz.c", &c_own)?;

        let masked = net.recv_many::<RingElement<T>>(opener, "eqz.flag")?;
        if masked.len() != len {
            eyre::bail!("expected {len} flag shares, got {}", masked.len());
        }
        izip!(r_bool_1, masked)
            .map(|(a, b)| RssShare::new_ring(a, b))
            .collect()
    };

    // fold the k-bit flag into its AND over all bits
    let mut v = flag;
    let mut width = T::K;
    while width > 1 {
        width /= 2;
        let mask = (RingElement::<T>::one() << width) - RingElement::one();
        let lo = v.iter().map(|v| *v & mask).collect::<Vec<_>>();
        let hi = v.iter().map(|v| (*v >> width) & mask).collect::<Vec<_>>();
        v = binary::and_many(&lo, &hi, net, state)?;
    }

    Ok(v.iter().map(|v| v.get_bit(0)).collect())
}

/// Scalar form of [`eq_zero_many`].
pub fn eq_zero<T: IntRing2k, N: Network>(
    x: RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<Bit>>
where
    Standard: Distribution<T>,
{
    Ok(eq_zero_many(&[x], net, state)?.pop().expect("one element"))
}

/// Tests two batches of arithmetic sharings for element-wise equality.
pub fn eq_many<T: IntRing2k, N: Network>(
    lhs: &[RssShare<T>],
    rhs: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<Bit>>>
where
    Standard: Distribution<T>,
{
    if lhs.len() != rhs.len() {
        eyre::bail!("comparing {} and {} elements", lhs.len(), rhs.len());
    }
    let diff = izip!(lhs, rhs)
        .map(|(l, r)| arithmetic::sub(*l, *r))
        .collect::<Vec<_>>();
    eq_zero_many(&diff, net, state)
}

/// Scalar form of [`eq_many`].
pub fn eq<T: IntRing2k, N: Network>(
    lhs: RssShare<T>,
    rhs: RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<Bit>>
where
    Standard: Distribution<T>,
{
    Ok(eq_many(&[lhs], &[rhs], net, state)?
        .pop()
        .expect("one element"))
}

/// Tests a batch of arithmetic sharings for element-wise equality to public
/// constants.
pub fn eq_public_many<T: IntRing2k, N: Network>(
    lhs: &[RssShare<T>],
    rhs: &[RingElement<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<Bit>>>
where
    Standard: Distribution<T>,
{
    if lhs.len() != rhs.len() {
        eyre::bail!("comparing {} and {} elements", lhs.len(), rhs.len());
    }
    let id = state.id;
    let diff = izip!(lhs, rhs)
        .map(|(l, r)| arithmetic::sub_shared_by_public(*l, *r, id))
        .collect::<Vec<_>>();
    eq_zero_many(&diff, net, state)
}

/// Scalar form of [`eq_public_many`].
pub fn eq_public<T: IntRing2k, N: Network>(
    lhs: RssShare<T>,
    rhs: RingElement<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<Bit>>
where
    Standard: Distribution<T>,
{
    Ok(eq_public_many(&[lhs], &[rhs], net, state)?
        .pop()
        .expect("one element"))
}
