//! Internal circuits: the Kogge-Stone adder used by the Boolean-to-
//! arithmetic conversion, and the cells of the 4-ary carry network.
//!
//! The carry cells follow one discipline: all AND gates run in their
//! communication-free forms (masked gates eat a precomputed mask product,
//! replicated gates degrade to additive), the additive results XOR together
//! locally, and a single batched resharing per cell lifts the propagate and
//! generate signals back to masked form. The mask products of one cell batch
//! into one offline rotate as well, so every cell costs two rounds total
//! regardless of its gate count.

use super::{
    binary,
    bits::{self, nibble_lsb_mask, nibble_msb_mask},
    mss,
    network::AlkaidNetworkExt,
    resharing, AlkaidState,
};
use alkaid_net::Network;
use alkaid_types::{ring::int_ring::IntRing2k, AssShare, MssShare, RssShare};
use itertools::izip;
use rand::{distributions::Standard, prelude::Distribution};
use rayon::prelude::*;

/// Two replicated ANDs sharing one resharing round: returns
/// `(a & b1, a & b2)`.
fn and_twice_many<T: IntRing2k, N: Network>(
    a: &[RssShare<T>],
    b1: &[RssShare<T>],
    b2: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<RssShare<T>>, Vec<RssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let mut local = Vec::with_capacity(2 * a.len());
    for (a, b1) in izip!(a, b1) {
        local.push((a & b1) ^ state.rngs.xor_mask::<T>());
    }
    for (a, b2) in izip!(a, b2) {
        local.push((a & b2) ^ state.rngs.xor_mask::<T>());
    }
    let remote = net.rotate_many("add.and2", &local)?;
    let r = izip!(local, remote)
        .map(|(a, b)| RssShare::new_ring(a, b))
        .collect::<Vec<_>>();
    let (r1, r2) = r.split_at(a.len());
    Ok((r1.to_vec(), r2.to_vec()))
}

/// Adds two Boolean-shared batches with a packed Kogge-Stone adder:
/// `log2(k)` levels, each one resharing round for both ANDs.
pub(super) fn binary_add_many<T: IntRing2k, N: Network>(
    x: &[RssShare<T>],
    y: &[RssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<Vec<RssShare<T>>>
where
    Standard: Distribution<T>,
{
    if x.len() != y.len() {
        eyre::bail!("adding {} and {} elements", x.len(), y.len());
    }
    let p0 = izip!(x, y).map(|(x, y)| x ^ y).collect::<Vec<_>>();
    let mut p = p0.clone();
    let mut g = binary::and_many(x, y, net, state)?;

    for i in 0..T::K.ilog2() {
        let shift = 1usize << i;
        let g_shifted = g.iter().map(|g| *g << shift).collect::<Vec<_>>();
        let p_shifted = p.iter().map(|p| *p << shift).collect::<Vec<_>>();
        let (r1, r2) = and_twice_many(&p, &g_shifted, &p_shifted, net, state)?;
        for (g, r1) in izip!(g.iter_mut(), r1) {
            *g ^= r1;
        }
        p = r2;
    }

    Ok(izip!(g, p0).map(|(g, p0)| (g << 1) ^ p0).collect())
}

/// Splits a batch of triples produced in one rotate back into its parts.
fn split3<S>(mut v: Vec<S>, n: usize) -> (Vec<S>, Vec<S>, Vec<S>) {
    let c = v.split_off(2 * n);
    let b = v.split_off(n);
    (v, b, c)
}

/// The first carry level: a 4-fan-in cell with all four prefix outputs,
/// evaluated on every nibble of the word in parallel. Input and output are
/// full-width masked signals; output position `j` of each nibble holds the
/// prefix over the nibble's bits `0..=j`.
pub(super) fn nibble_cell_many<T: IntRing2k, N: Network>(
    p: &[MssShare<T>],
    g: &[MssShare<T>],
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let n = p.len();
    let m1 = nibble_lsb_mask::<T>();
    // lane i of each nibble, aligned at the nibble msb
    let gather = |x: &[MssShare<T>], i: usize| -> Vec<MssShare<T>> {
        x.par_iter()
            .with_min_len(512)
            .map(|x| (*x & (m1 << i)) << (3 - i))
            .collect()
    };
    let pops: [Vec<MssShare<T>>; 4] = std::array::from_fn(|i| gather(p, i));
    let gops: [Vec<MssShare<T>>; 4] = std::array::from_fn(|i| gather(g, i));

    // offline: the three mask products of this cell, one rotate
    let mut lhs = Vec::with_capacity(3 * n);
    lhs.extend_from_slice(&pops[0]);
    lhs.extend_from_slice(&pops[2]);
    lhs.extend_from_slice(&gops[0]);
    let mut rhs = Vec::with_capacity(3 * n);
    rhs.extend_from_slice(&pops[1]);
    rhs.extend_from_slice(&pops[3]);
    rhs.extend_from_slice(&pops[1]);
    let (t_p01, t_p23, t_g0p1) = split3(mss::and_triple_many(&lhs, &rhs, net, state)?, n);

    // online: gate tree and recombination, local
    let mut combined = Vec::with_capacity(2 * n);
    let mut p_out = Vec::with_capacity(n);
    for idx in 0..n {
        let (p0, p1, p2, p3) = (&pops[0][idx], &pops[1][idx], &pops[2][idx], &pops[3][idx]);
        let (g0, g1, g2, g3) = (&gops[0][idx], &gops[1][idx], &gops[2][idx], &gops[3][idx]);

        let p2_rss = resharing::mss_to_rss(p2);
        let p3_rss = resharing::mss_to_rss(p3);
        let g1_rss = resharing::mss_to_rss(g1);
        let g2_rss = resharing::mss_to_rss(g2);

        let p01 = mss::and_pre(p0, p1, &t_p01[idx]);
        let p23 = mss::and_pre(p2, p3, &t_p23[idx]);
        let g0p1 = mss::and_pre(g0, p1, &t_g0p1[idx]);

        let p0123 = binary::and_to_additive(&p01, &p23, state);
        let p012 = binary::and_to_additive(&p01, &p2_rss, state);
        let g2p3 = binary::and_to_additive(&g2_rss, &p3_rss, state);
        let g1p23 = binary::and_to_additive(&g1_rss, &p23, state);
        let g0p123 = binary::and_to_additive(&g0p1, &p23, state);
        let g1p2 = binary::and_to_additive(&g1_rss, &p2_rss, state);
        let g0p12 = binary::and_to_additive(&g0p1, &p2_rss, state);

        // prefix outputs for j = 3, 2, 1, 0, shifted into their lanes
        let gr3 = g2p3 ^ g1p23 ^ g0p123;
        let gr2 = g1p2 ^ g0p12;
        let gr1 = resharing::rss_to_ass(&g0p1);
        let gr0 = resharing::rss_to_ass(&resharing::mss_to_rss(g0));
        let g3a = resharing::rss_to_ass(&resharing::mss_to_rss(g3));
        let g2a = resharing::rss_to_ass(&g2_rss);
        let g1a = resharing::rss_to_ass(&g1_rss);
        let big_g =
            gr3 ^ (gr2 >> 1) ^ (gr1 >> 2) ^ (gr0 >> 3) ^ g3a ^ (g2a >> 1) ^ (g1a >> 2);

        let pr1 = resharing::rss_to_ass(&p01);
        let pr0 = resharing::rss_to_ass(&resharing::mss_to_rss(p0));
        let big_p = p0123 ^ (p012 >> 1) ^ (pr1 >> 2) ^ (pr0 >> 3);

        combined.push(big_g);
        p_out.push(big_p);
    }
    combined.extend(p_out);

    // one packed upgrade round for both signals
    let both = resharing::ass_to_mss_many(&combined, net, state)?;
    let (g_out, p_out) = both.split_at(n);
    Ok((g_out.to_vec(), p_out.to_vec()))
}

/// A window carry level: the 4-fan-in single-output cell evaluated on all
/// group leaders at once. `stride` is the leader distance covered by the
/// previous level; the output at each leader position combines the four
/// leaders `q, q-s, q-2s, q-3s`.
pub(super) fn window_cell_many<T: IntRing2k, N: Network>(
    p: &[MssShare<T>],
    g: &[MssShare<T>],
    stride: usize,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let n = p.len();
    let m8 = nibble_msb_mask::<T>();
    let gather = |x: &[MssShare<T>], i: usize| -> Vec<MssShare<T>> {
        x.par_iter()
            .with_min_len(512)
            .map(|x| (*x & m8) << (stride * (3 - i)))
            .collect()
    };
    let pops: [Vec<MssShare<T>>; 4] = std::array::from_fn(|i| gather(p, i));
    let gops: [Vec<MssShare<T>>; 4] = std::array::from_fn(|i| gather(g, i));

    let mut lhs = Vec::with_capacity(3 * n);
    lhs.extend_from_slice(&pops[0]);
    lhs.extend_from_slice(&pops[2]);
    lhs.extend_from_slice(&gops[0]);
    let mut rhs = Vec::with_capacity(3 * n);
    rhs.extend_from_slice(&pops[1]);
    rhs.extend_from_slice(&pops[3]);
    rhs.extend_from_slice(&pops[1]);
    let (t_p01, t_p23, t_g0p1) = split3(mss::and_triple_many(&lhs, &rhs, net, state)?, n);

    let mut combined = Vec::with_capacity(2 * n);
    let mut p_out = Vec::with_capacity(n);
    for idx in 0..n {
        let (p0, p1, p2, p3) = (&pops[0][idx], &pops[1][idx], &pops[2][idx], &pops[3][idx]);
        let (g0, g1, g2, g3) = (&gops[0][idx], &gops[1][idx], &gops[2][idx], &gops[3][idx]);

        let p3_rss = resharing::mss_to_rss(p3);
        let g1_rss = resharing::mss_to_rss(g1);
        let g2_rss = resharing::mss_to_rss(g2);

        let p01 = mss::and_pre(p0, p1, &t_p01[idx]);
        let p23 = mss::and_pre(p2, p3, &t_p23[idx]);
        let g0p1 = mss::and_pre(g0, p1, &t_g0p1[idx]);

        let p0123 = binary::and_to_additive(&p01, &p23, state);
        let g2p3 = binary::and_to_additive(&g2_rss, &p3_rss, state);
        let g1p23 = binary::and_to_additive(&g1_rss, &p23, state);
        let g0p123 = binary::and_to_additive(&g0p1, &p23, state);
        let g3a = resharing::rss_to_ass(&resharing::mss_to_rss(g3));

        combined.push(g3a ^ g2p3 ^ g1p23 ^ g0p123);
        p_out.push(p0123);
    }
    combined.extend(p_out);

    let both = resharing::ass_to_mss_many(&combined, net, state)?;
    let (g_out, p_out) = both.split_at(n);
    Ok((g_out.to_vec(), p_out.to_vec()))
}

/// One level of the msb carry tree: the signals are split into their four
/// bit classes mod 4, and the cell folds each group of four adjacent
/// positions into one. The outputs are additive sharings of `width / 4`
/// effective bits, still to be reshared by the caller.
pub(super) fn msb_tree_level<T: IntRing2k, N: Network>(
    p: &[MssShare<T>],
    g: &[MssShare<T>],
    width: usize,
    net: &N,
    state: &mut AlkaidState,
) -> eyre::Result<(Vec<AssShare<T>>, Vec<AssShare<T>>)>
where
    Standard: Distribution<T>,
{
    let n = p.len();
    let (p_hi, p_lo) = bits::bit_split_mss_many(p, width)?;
    let (p3, p1) = bits::bit_split_mss_many(&p_hi, width / 2)?;
    let (p2, p0) = bits::bit_split_mss_many(&p_lo, width / 2)?;
    let (g_hi, g_lo) = bits::bit_split_mss_many(g, width)?;
    let (g3, g1) = bits::bit_split_mss_many(&g_hi, width / 2)?;
    let (g2, g0) = bits::bit_split_mss_many(&g_lo, width / 2)?;

    // offline: six mask products, one rotate
    let mut lhs = Vec::with_capacity(6 * n);
    let mut rhs = Vec::with_capacity(6 * n);
    for (l, r) in [
        (&p0, &p1),
        (&p2, &p3),
        (&g2, &p3),
        (&g1, &p3),
        (&g0, &p3),
        (&p2, &p1),
    ] {
        lhs.extend_from_slice(l);
        rhs.extend_from_slice(r);
    }
    let mut trip = mss::and_triple_many(&lhs, &rhs, net, state)?;
    let t_p2p1 = trip.split_off(5 * n);
    let t_g0p3 = trip.split_off(4 * n);
    let t_g1p3 = trip.split_off(3 * n);
    let t_g2p3 = trip.split_off(2 * n);
    let t_p2p3 = trip.split_off(n);
    let t_p0p1 = trip;

    let mut p_res = Vec::with_capacity(n);
    let mut g_res = Vec::with_capacity(n);
    for idx in 0..n {
        let pr = mss::and4(
            &p0[idx], &p1[idx], &p2[idx], &p3[idx], &t_p0p1[idx], &t_p2p3[idx], state,
        );
        let g3a = resharing::rss_to_ass(&resharing::mss_to_rss(&g3[idx]));
        let g2p3 = resharing::rss_to_ass(&mss::and_pre(&g2[idx], &p3[idx], &t_g2p3[idx]));
        let g1p32 = mss::and3(&g1[idx], &p3[idx], &p2[idx], &t_g1p3[idx], state);
        let g0p321 = mss::and4(
            &g0[idx], &p3[idx], &p2[idx], &p1[idx], &t_g0p3[idx], &t_p2p1[idx], state,
        );
        p_res.push(pr);
        g_res.push(g3a ^ g2p3 ^ g1p32 ^ g0p321);
    }
    Ok((p_res, g_res))
}
