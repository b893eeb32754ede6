//! Conversions between arithmetic and Boolean sharings.
//!
//! Arithmetic to Boolean runs a 4-ary carry network over masked Boolean
//! operands built from the arithmetic slots; Boolean to arithmetic either
//! masks with a correlated random value and a Kogge-Stone adder (wide
//! inputs) or runs a bitwise three-party oblivious transfer (inputs of at
//! most 8 bits).

use super::{
    bits, detail,
    id::PartyId,
    mss,
    network::AlkaidNetworkExt,
    resharing, AlkaidState,
};
use alkaid_net::Network;
use alkaid_types::{
    ring::{bit::Bit, int_ring::IntRing2k, ring_impl::RingElement},
    MssShare, RssShare,
};
use itertools::izip;
use num_traits::{One, Zero};
use rand::{distributions::Standard, prelude::Distribution};

/// Zero-extends a Boolean share into a wider ring.
fn widen<T: IntRing2k, U: IntRing2k>(x: &RssShare<T>) -> RssShare<U> {
    RssShare::new_ring(
        RingElement(U::cast_from_u128(x.a.convert().into())),
        RingElement(U::cast_from_u128(x.b.convert().into())),
    )
}

/// Builds the two masked Boolean operands `m` and `n` with `m + n = x` from
/// an arithmetic sharing. Party 1 holds both `x_0` and `x_1` and deals the
/// masked sum; parties 2 and 0 share the pair mask of `n = x_2`. One round.
fn masked_operands_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let len = x.len();
    let zero = RingElement::<T>::zero();
    match state.id {
        PartyId::P0 => {
            let u = state.rngs.random_next_vec::<T>(len);
            let w = state.rngs.random_prev_vec::<T>(len);
            let em = net.recv_many::<RingElement<T>>(PartyId::P1, "a2b.em")?;
            if em.len() != len {
                eyre::bail!("expected {len} masked sums, got {}", em.len());
            }
            let m = izip!(em, &u)
                .map(|(e, u)| MssShare::new(e, RssShare::new_ring(*u, zero)))
                .collect();
            let n = izip!(x, &w)
                .map(|(x, w)| MssShare::new(x.b ^ w, RssShare::new_ring(zero, *w)))
                .collect();
            Ok((m, n))
        }
        PartyId::P1 => {
            let v = state.rngs.random_next_vec::<T>(len);
            let u = state.rngs.random_prev_vec::<T>(len);
            let em = izip!(x, &u, &v)
                .map(|(x, u, v)| (x.a + x.b) ^ u ^ v)
                .collect::<Vec<_>>();
            net.send_many(PartyId::P0, "a2b.em", &em)?;
            net.send_many(PartyId::P2, "a2b.em", &em)?;
            let en = net.recv_many::<RingElement<T>>(PartyId::P2, "a2b.en")?;
            if en.len() != len {
                eyre::bail!("expected {len} masked values, got {}", en.len());
            }
            let m = izip!(em, &v, &u)
                .map(|(e, v, u)| MssShare::new(e, RssShare::new_ring(*v, *u)))
                .collect();
            let n = en
                .into_iter()
                .map(|e| MssShare::new(e, RssShare::zero()))
                .collect();
            Ok((m, n))
        }
        PartyId::P2 => {
            let w = state.rngs.random_next_vec::<T>(len);
            let v = state.rngs.random_prev_vec::<T>(len);
            let en = izip!(x, &w).map(|(x, w)| x.a ^ w).collect::<Vec<_>>();
            net.send_many(PartyId::P1, "a2b.en", &en)?;
            let em = net.recv_many::<RingElement<T>>(PartyId::P1, "a2b.em")?;
            if em.len() != len {
                eyre::bail!("expected {len} masked sums, got {}", em.len());
            }
            let m = izip!(em, &v)
                .map(|(e, v)| MssShare::new(e, RssShare::new_ring(zero, *v)))
                .collect();
            let n = izip!(en, &w)
                .map(|(e, w)| MssShare::new(e, RssShare::new_ring(*w, zero)))
                .collect();
            Ok((m, n))
        }
    }
}

/// Propagate and generate signals of `m + n`: `p` is a local XOR, `g` costs
/// the mask-product round plus one packed upgrade round.
fn carry_signals_many<T: IntRing2k, N: Network>(
    m: &[MssShare<T>],
    n: &[MssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let trip = mss::and_triple_many(m, n, net, state)?;
    let g_ass = izip!(m, n, &trip)
        .map(|(m, n, t)| resharing::rss_to_ass(&mss::and_pre(m, n, t)))
        .collect::<Vec<_>>();
    let g = resharing::ass_to_mss_many(&g_ass, net, state)?;
    let p = izip!(m, n).map(|(m, n)| m ^ n).collect();
    Ok((p, g))
}

/// Transforms a batch of arithmetic sharings into Boolean sharings of the
/// same values: x = x_0 + x_1 + x_2 becomes x = x'_0 ^ x'_1 ^ x'_2.
pub fn a2b_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<T>>>
where
    Standard: Distribution<T>,
{
    if T::K == 1 {
        // addition and XOR coincide in the two-element ring
        return Ok(x.to_vec());
    }
    tracing::debug!("a2b over {} elements of {} bits", x.len(), T::K);

    let (m, n) = masked_operands_many(x, net, state)?;
    let (mut p, mut g) = carry_signals_many(&m, &n, net, state)?;

    // the sum without carries; carries are XORed in at the end
    let mut out = p.iter().map(resharing::mss_to_rss).collect::<Vec<_>>();

    let (gc, pc) = detail::nibble_cell_many(&p, &g, net, state)?;
    g = gc;
    p = pc;

    let m7 = bits::nibble_body_mask::<T>();
    let mut stride = 4;
    while stride < T::K {
        tracing::trace!("carry window level, stride {stride}");
        let (gc, pc) = detail::window_cell_many(&p, &g, stride, net, state)?;
        for (g, gc) in izip!(g.iter_mut(), gc) {
            *g = (*g & m7) ^ gc;
        }
        for (p, pc) in izip!(p.iter_mut(), pc) {
            *p = (*p & m7) ^ pc;
        }
        stride *= 4;
    }

    // terminal level: spread each leader's generate over the three positions
    // above it, one masked AND against the in-nibble propagate
    let m8 = bits::nibble_msb_mask::<T>();
    let g_spread = g
        .iter()
        .map(|g| {
            let lead = *g & m8;
            (lead << 1) ^ (lead << 2) ^ (lead << 3)
        })
        .collect::<Vec<_>>();
    let p_body = p.iter().map(|p| *p & m7).collect::<Vec<_>>();
    let trip = mss::and_triple_many(&g_spread, &p_body, net, state)?;
    for (out, g, gs, pb, t) in izip!(out.iter_mut(), &g, &g_spread, &p_body, &trip) {
        let carry = resharing::mss_to_rss(g) ^ mss::and_pre(gs, pb, t);
        *out ^= carry << 1;
    }
    Ok(out)
}

/// Scalar form of [`a2b_many`].
pub fn a2b<T: IntRing2k, N: Network>(
    x: RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<T>>
where
    Standard: Distribution<T>,
{
    Ok(a2b_many(&[x], net, state)?.pop().expect("one element"))
}

/// Extracts the most significant bit of a batch of arithmetic sharings as
/// single-bit Boolean sharings.
pub fn msb_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<Bit>>>
where
    Standard: Distribution<T>,
{
    if T::K == 1 {
        return Ok(x.iter().map(|x| x.get_bit(0)).collect());
    }
    tracing::debug!("msb over {} elements of {} bits", x.len(), T::K);

    let (m, n) = masked_operands_many(x, net, state)?;
    let (mut p, mut g) = carry_signals_many(&m, &n, net, state)?;

    // msb(x) = msb(p) ^ carry into the top bit
    let mut out = p
        .iter()
        .map(|p| resharing::mss_to_rss(p) >> (T::K - 1))
        .collect::<Vec<_>>();

    // force the top propagate to 1 and the top generate to 0; the carry tree
    // over all k lanes then folds to exactly the carry into the top bit
    let top = RingElement::<T>::one() << (T::K - 1);
    let body = top - RingElement::one();
    for p in p.iter_mut() {
        p.e = (p.e & body) | top;
        p.d &= body;
    }
    for g in g.iter_mut() {
        g.e &= body;
        g.d &= body;
    }

    let mut width = T::K;
    let g_final = loop {
        if width >= 4 {
            tracing::trace!("msb tree level, width {width}");
            let (p_res, g_res) = detail::msb_tree_level(&p, &g, width, net, state)?;
            width /= 4;
            if width > 1 {
                let packed = bits::pack_ass_many(&p_res, &g_res, width)?;
                let packed = resharing::ass_to_mss_many(&packed, net, state)?;
                let (gh, pl) = bits::unpack_mss_many(&packed, 2 * width)?;
                g = gh;
                p = pl;
            } else {
                break resharing::ass_to_rss_many(&g_res, net, state)?;
            }
        } else {
            // two positions left: carry = g_hi ^ g_lo & p_hi
            let (p_hi, _) = bits::bit_split_mss_many(&p, 2)?;
            let (g_hi, g_lo) = bits::bit_split_mss_many(&g, 2)?;
            let trip = mss::and_triple_many(&g_lo, &p_hi, net, state)?;
            let g_res = izip!(&g_hi, &g_lo, &p_hi, &trip)
                .map(|(gh, gl, ph, t)| {
                    resharing::rss_to_ass(&resharing::mss_to_rss(gh))
                        ^ resharing::rss_to_ass(&mss::and_pre(gl, ph, t))
                })
                .collect::<Vec<_>>();
            break resharing::ass_to_rss_many(&g_res, net, state)?;
        }
    };

    for (out, carry) in izip!(out.iter_mut(), g_final) {
        *out ^= carry;
    }
    Ok(out.iter().map(|x| x.get_bit(0)).collect())
}

/// Scalar form of [`msb_many`].
pub fn msb<T: IntRing2k, N: Network>(
    x: RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<Bit>>
where
    Standard: Distribution<T>,
{
    Ok(msb_many(&[x], net, state)?.pop().expect("one element"))
}

/// Transforms a batch of Boolean sharings into arithmetic sharings of the
/// same values, picking the conversion by input width: oblivious transfer up
/// to 8 bits, masked addition above.
pub fn b2a_many<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<U>>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    if T::K <= 8 {
        b2a_by_ot_many(x, net, state)
    } else {
        b2a_by_ppa_many(x, net, state)
    }
}

/// Scalar form of [`b2a_many`].
pub fn b2a<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<U>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    Ok(b2a_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element"))
}

/// Boolean to arithmetic via a masked adder: both Boolean and arithmetic
/// sharings of a random `r` come out of the pair streams, a Kogge-Stone
/// adder computes `[x + r]^B`, the sum opens towards party 0, and
/// `[x]^A = (x + r) - r` assembles with one final rotate.
pub fn b2a_by_ppa_many<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<U>>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    if T::K > U::K {
        eyre::bail!("cannot convert {} bits into a {} bit ring", T::K, U::K);
    }
    tracing::debug!("b2a (adder) over {} elements of {} bits", x.len(), T::K);
    let len = x.len();
    let xw = x.iter().map(widen::<T, U>).collect::<Vec<_>>();

    // r = pair(0,1) + pair(1,2); party 1 folds the sum into its Boolean
    // piece, the pair owners keep the negated halves as arithmetic shares
    let mut r_prev = Vec::with_capacity(len);
    let mut rb = Vec::with_capacity(len);
    for _ in 0..len {
        let (ra_next, ra_prev) = state.rngs.random_pair::<U>();
        let mut piece = state.rngs.xor_mask::<U>();
        if state.id == PartyId::P1 {
            piece ^= ra_next + ra_prev;
        }
        r_prev.push(ra_prev);
        rb.push(piece);
    }
    let rb_b = net.rotate_many("b2a.rand", &rb)?;
    let y = izip!(rb, rb_b)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect::<Vec<_>>();

    let z = detail::binary_add_many(&xw, &y, net, state)?;

    let s = match state.id {
        PartyId::P0 => {
            let z1 = net.recv_many::<RingElement<U>>(PartyId::P1, "b2a.reveal")?;
            if z1.len() != len {
                eyre::bail!("expected {len} sum shares, got {}", z1.len());
            }
            izip!(&z, z1).map(|(z, z1)| z.a ^ z.b ^ z1).collect::<Vec<_>>()
        }
        PartyId::P1 => {
            let za = z.iter().map(|z| z.a).collect::<Vec<_>>();
            net.send_many(PartyId::P0, "b2a.reveal", &za)?;
            r_prev.iter().map(|r| -*r).collect()
        }
        PartyId::P2 => r_prev.iter().map(|r| -*r).collect(),
    };
    let s_b = net.rotate_many("b2a.rotate", &s)?;
    Ok(izip!(s, s_b)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect())
}

/// Recombines per-bit arithmetic values into ring elements.
fn bit_compose<U: IntRing2k>(
    bits: &[RingElement<U>],
    len: usize,
    nbits: usize,
) -> Vec<RingElement<U>> {
    (0..len)
        .map(|i| {
            let mut acc = RingElement::zero();
            for j in 0..nbits {
                acc += bits[i * nbits + j] << j;
            }
            acc
        })
        .collect()
}

/// Boolean to arithmetic via three-party oblivious transfer, two rounds.
///
/// The pivot party is the helper: it replicates the receiver's Boolean slot
/// and therefore knows the choice bits. The next party is the sender and
/// holds the other two Boolean slots; the previous party is the receiver.
/// Per bit, the sender offers `m_i = (i ^ b_s ^ b_h) - c_1 - c_3` masked by
/// pads shared with the helper; the helper forwards the pad selected by the
/// choice bit, and the receiver unmasks its arithmetic share
/// `c_2 = x - c_1 - c_3` and returns it to the helper to complete the
/// replication.
pub fn b2a_by_ot_many<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<U>>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    if T::K > 8 {
        eyre::bail!("the oblivious transfer conversion takes at most 8 bits, got {}", T::K);
    }
    if T::K > U::K {
        eyre::bail!("cannot convert {} bits into a {} bit ring", T::K, U::K);
    }
    tracing::debug!("b2a (ot) over {} elements of {} bits", x.len(), T::K);

    let len = x.len();
    let nbits = T::K;
    let total = len * nbits;
    let pivot = state.rngs.random_pivot();
    let helper = pivot;
    let sender = pivot.next();
    let receiver = pivot.prev();

    let (a, b) = if state.id == helper {
        let c1_bits = state.rngs.random_next_vec::<U>(total);
        let pad0 = state.rngs.random_next_vec::<U>(total);
        let pad1 = state.rngs.random_next_vec::<U>(total);

        // the receiver sits behind us, so our second slot is its choice share
        let mut selected = Vec::with_capacity(total);
        for (i, x) in x.iter().enumerate() {
            for j in 0..nbits {
                let flat = i * nbits + j;
                selected.push(if x.b.bit(j) { pad1[flat] } else { pad0[flat] });
            }
        }
        net.send_many(receiver, "b2a.ot.mc", &selected)?;

        let c1 = bit_compose(&c1_bits, len, nbits);
        let c2 = net.recv_many::<RingElement<U>>(helper.prev(), "b2a.ot.c2")?;
        if c2.len() != len {
            eyre::bail!("expected {len} shares, got {}", c2.len());
        }
        (c1, c2)
    } else if state.id == sender {
        let c1_bits = state.rngs.random_prev_vec::<U>(total);
        let c3_bits = state.rngs.random_next_vec::<U>(total);
        let pad0 = state.rngs.random_prev_vec::<U>(total);
        let pad1 = state.rngs.random_prev_vec::<U>(total);

        let mut m0 = Vec::with_capacity(total);
        let mut m1 = Vec::with_capacity(total);
        for (i, x) in x.iter().enumerate() {
            // our two slots are exactly the non-receiver shares
            let known = x.a ^ x.b;
            for j in 0..nbits {
                let flat = i * nbits + j;
                let t = c1_bits[flat] + c3_bits[flat];
                m0.push((RingElement::from_bool(known.bit(j)) - t) ^ pad0[flat]);
                m1.push((RingElement::from_bool(!known.bit(j)) - t) ^ pad1[flat]);
            }
        }
        net.send_many(receiver, "b2a.ot.m0", &m0)?;
        net.send_many(receiver, "b2a.ot.m1", &m1)?;

        let c3 = bit_compose(&c3_bits, len, nbits);
        let c1 = bit_compose(&c1_bits, len, nbits);
        (c3, c1)
    } else {
        let c3_bits = state.rngs.random_prev_vec::<U>(total);

        let selected = net.recv_many::<RingElement<U>>(helper, "b2a.ot.mc")?;
        let m0 = net.recv_many::<RingElement<U>>(sender, "b2a.ot.m0")?;
        let m1 = net.recv_many::<RingElement<U>>(sender, "b2a.ot.m1")?;
        if selected.len() != total || m0.len() != total || m1.len() != total {
            eyre::bail!("unexpected oblivious transfer message lengths");
        }

        let mut c2_bits = Vec::with_capacity(total);
        for (i, x) in x.iter().enumerate() {
            for j in 0..nbits {
                let flat = i * nbits + j;
                let chosen = if x.a.bit(j) { m1[flat] } else { m0[flat] };
                c2_bits.push(chosen ^ selected[flat]);
            }
        }
        let c2 = bit_compose(&c2_bits, len, nbits);
        net.send_many(helper, "b2a.ot.c2", &c2)?;

        let c3 = bit_compose(&c3_bits, len, nbits);
        (c2, c3)
    };

    Ok(izip!(a, b)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect())
}

/// Scalar form of [`b2a_by_ot_many`].
pub fn b2a_by_ot<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<U>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    Ok(b2a_by_ot_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element"))
}

/// Scalar form of [`b2a_by_ppa_many`].
pub fn b2a_by_ppa<T: IntRing2k, U: IntRing2k, N: Network>(
    x: &RssShare<T>,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<RssShare<U>>
where
    Standard: Distribution<T> + Distribution<U>,
{
    Ok(b2a_by_ppa_many(std::slice::from_ref(x), net, state)?
        .pop()
        .expect("one element"))
}
