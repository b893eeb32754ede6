//! Bit-level layout helpers for the bit-sliced circuits: even/odd bit
//! splitting, and packing two half-width vectors into one word so that two
//! resharings collapse into one round.
//!
//! All functions take the effective bit count of the input; bits above it
//! must be and stay zero.

use alkaid_types::{
    ring::{int_ring::IntRing2k, ring_impl::RingElement},
    AssShare, MssShare, RssShare,
};
use num_traits::One;

/// Replicates a bit pattern of `period` bits across the full 128-bit width.
const fn replicate_u128(base: u128, period: u32) -> u128 {
    let mut m = base;
    let mut w = period;
    while w < 128 {
        m |= m << w;
        w <<= 1;
    }
    m
}

/// `0x1111…` truncated to the ring width.
pub(crate) fn nibble_lsb_mask<T: IntRing2k>() -> RingElement<T> {
    RingElement(T::cast_from_u128(replicate_u128(0x1, 4)))
}

/// `0x8888…` truncated to the ring width.
pub(crate) fn nibble_msb_mask<T: IntRing2k>() -> RingElement<T> {
    RingElement(T::cast_from_u128(replicate_u128(0x8, 4)))
}

/// `0x7777…` truncated to the ring width.
pub(crate) fn nibble_body_mask<T: IntRing2k>() -> RingElement<T> {
    RingElement(T::cast_from_u128(replicate_u128(0x7, 4)))
}

/// Splits the low `nbits` bits of an element into its odd bits (`hi`) and
/// even bits (`lo`), each compressed into `nbits / 2` bits.
fn split_element<T: IntRing2k>(
    x: RingElement<T>,
    nbits: usize,
) -> (RingElement<T>, RingElement<T>) {
    debug_assert!(nbits >= 2 && nbits % 2 == 0);
    let half = nbits / 2;
    let hmask: u128 = (1u128 << half) - 1;
    let v: u128 = x.convert().into();

    #[cfg(all(target_arch = "x86_64", target_feature = "bmi2"))]
    if T::K <= 64 {
        const EVEN: u64 = 0x5555_5555_5555_5555;
        // SAFETY: bmi2 is statically enabled for this build
        let lo = unsafe { core::arch::x86_64::_pext_u64(v as u64, EVEN) } as u128;
        let hi = unsafe { core::arch::x86_64::_pext_u64(v as u64, !EVEN) } as u128;
        return (
            RingElement(T::cast_from_u128(hi & hmask)),
            RingElement(T::cast_from_u128(lo & hmask)),
        );
    }

    // Butterfly ladder:
    //      0101010101010101
    // swap  ^^  ^^  ^^  ^^
    //      0011001100110011
    // swap   ^^^^    ^^^^
    //      0000111100001111
    // until the even bits fill the low half.
    let mut v = v;
    for k in 0..nbits.ilog2() - 1 {
        let h = 1u32 << k;
        let mv = replicate_u128(((1u128 << h) - 1) << h, 4 * h);
        let keep = !(mv | (mv << h));
        v = (v & keep) ^ ((v >> h) & mv) ^ ((v & mv) << h);
    }
    (
        RingElement(T::cast_from_u128((v >> half) & hmask)),
        RingElement(T::cast_from_u128(v & hmask)),
    )
}

fn check_split_width<T: IntRing2k>(nbits: usize) -> eyre::Result<()> {
    if nbits == 0 || nbits % 2 != 0 || nbits > T::K {
        eyre::bail!("cannot bit-split a {nbits} bit value");
    }
    Ok(())
}

/// Splits each replicated share of `nbits` effective bits into odd-bit and
/// even-bit halves.
pub fn bit_split_many<T: IntRing2k>(
    x: &[RssShare<T>],
    nbits: usize,
) -> eyre::Result<(Vec<RssShare<T>>, Vec<RssShare<T>>)> {
    check_split_width::<T>(nbits)?;
    let mut hi = Vec::with_capacity(x.len());
    let mut lo = Vec::with_capacity(x.len());
    for x in x {
        let (ha, la) = split_element(x.a, nbits);
        let (hb, lb) = split_element(x.b, nbits);
        hi.push(RssShare::new_ring(ha, hb));
        lo.push(RssShare::new_ring(la, lb));
    }
    Ok((hi, lo))
}

/// Splits each masked share of `nbits` effective bits into odd-bit and
/// even-bit halves; identical logic per slot.
pub fn bit_split_mss_many<T: IntRing2k>(
    x: &[MssShare<T>],
    nbits: usize,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)> {
    check_split_width::<T>(nbits)?;
    let mut hi = Vec::with_capacity(x.len());
    let mut lo = Vec::with_capacity(x.len());
    for x in x {
        let (he, le) = split_element(x.e, nbits);
        let (ha, la) = split_element(x.d.a, nbits);
        let (hb, lb) = split_element(x.d.b, nbits);
        hi.push(MssShare::new(he, RssShare::new_ring(ha, hb)));
        lo.push(MssShare::new(le, RssShare::new_ring(la, lb)));
    }
    Ok((hi, lo))
}

fn check_pack_width<T: IntRing2k>(half: usize) -> eyre::Result<()> {
    if half == 0 || 2 * half > T::K {
        eyre::bail!("cannot pack two {half} bit values into {} bits", T::K);
    }
    Ok(())
}

/// Concatenates two additive sharings of `half` effective bits each into one
/// of `2 * half` bits.
pub fn pack_ass_many<T: IntRing2k>(
    lo: &[AssShare<T>],
    hi: &[AssShare<T>],
    half: usize,
) -> eyre::Result<Vec<AssShare<T>>> {
    check_pack_width::<T>(half)?;
    if lo.len() != hi.len() {
        eyre::bail!("packing {} and {} elements", lo.len(), hi.len());
    }
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(lo, hi)| *lo | (*hi << half))
        .collect())
}

/// Concatenates two replicated sharings of `half` effective bits each.
pub fn pack_rss_many<T: IntRing2k>(
    lo: &[RssShare<T>],
    hi: &[RssShare<T>],
    half: usize,
) -> eyre::Result<Vec<RssShare<T>>> {
    check_pack_width::<T>(half)?;
    if lo.len() != hi.len() {
        eyre::bail!("packing {} and {} elements", lo.len(), hi.len());
    }
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(lo, hi)| {
            let hi = *hi << half;
            RssShare::new_ring(lo.a | hi.a, lo.b | hi.b)
        })
        .collect())
}

/// Concatenates two masked sharings of `half` effective bits each.
pub fn pack_mss_many<T: IntRing2k>(
    lo: &[MssShare<T>],
    hi: &[MssShare<T>],
    half: usize,
) -> eyre::Result<Vec<MssShare<T>>> {
    check_pack_width::<T>(half)?;
    if lo.len() != hi.len() {
        eyre::bail!("packing {} and {} elements", lo.len(), hi.len());
    }
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(lo, hi)| {
            let hi = *hi << half;
            MssShare::new(
                lo.e | hi.e,
                RssShare::new_ring(lo.d.a | hi.d.a, lo.d.b | hi.d.b),
            )
        })
        .collect())
}

fn half_mask<T: IntRing2k>(half: usize) -> RingElement<T> {
    (RingElement::one() << half) - RingElement::one()
}

/// Splits packed additive sharings of `nbits` effective bits back into the
/// `(hi, lo)` halves.
pub fn unpack_ass_many<T: IntRing2k>(
    x: &[AssShare<T>],
    nbits: usize,
) -> eyre::Result<(Vec<AssShare<T>>, Vec<AssShare<T>>)> {
    check_split_width::<T>(nbits)?;
    let half = nbits / 2;
    let m = half_mask::<T>(half);
    Ok(x.iter()
        .map(|x| ((*x >> half) & m, *x & m))
        .unzip())
}

/// Splits packed replicated sharings of `nbits` effective bits back into the
/// `(hi, lo)` halves.
pub fn unpack_rss_many<T: IntRing2k>(
    x: &[RssShare<T>],
    nbits: usize,
) -> eyre::Result<(Vec<RssShare<T>>, Vec<RssShare<T>>)> {
    check_split_width::<T>(nbits)?;
    let half = nbits / 2;
    let m = half_mask::<T>(half);
    Ok(x.iter()
        .map(|x| ((*x >> half) & m, *x & m))
        .unzip())
}

/// Splits packed masked sharings of `nbits` effective bits back into the
/// `(hi, lo)` halves.
pub fn unpack_mss_many<T: IntRing2k>(
    x: &[MssShare<T>],
    nbits: usize,
) -> eyre::Result<(Vec<MssShare<T>>, Vec<MssShare<T>>)> {
    check_split_width::<T>(nbits)?;
    let half = nbits / 2;
    let m = half_mask::<T>(half);
    Ok(x.iter()
        .map(|x| {
            let hi = MssShare::new(
                (x.e >> half) & m,
                RssShare::new_ring((x.d.a >> half) & m, (x.d.b >> half) & m),
            );
            let lo = MssShare::new(x.e & m, RssShare::new_ring(x.d.a & m, x.d.b & m));
            (hi, lo)
        })
        .unzip())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{thread_rng, Rng};

    fn split_law<T: IntRing2k>()
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        let mut rng = thread_rng();
        for _ in 0..50 {
            let x = rng.gen::<RingElement<T>>();
            let (hi, lo) = split_element(x, T::K);
            for j in 0..T::K / 2 {
                assert_eq!(lo.bit(j), x.bit(2 * j));
                assert_eq!(hi.bit(j), x.bit(2 * j + 1));
            }
        }
    }

    #[test]
    fn split_even_odd() {
        split_law::<u8>();
        split_law::<u16>();
        split_law::<u32>();
        split_law::<u64>();
        split_law::<u128>();
    }

    #[test]
    fn split_partial_width() {
        // 16 effective bits in a 64 bit container
        let x = RingElement(0xB3A5u64);
        let (hi, lo) = split_element(x, 16);
        for j in 0..8 {
            assert_eq!(lo.bit(j), x.bit(2 * j));
            assert_eq!(hi.bit(j), x.bit(2 * j + 1));
        }
    }

    #[test]
    fn pack_unpack_roundtrip() {
        let lo = [AssShare::new(RingElement(0x0Fu8))];
        let hi = [AssShare::new(RingElement(0x05u8))];
        let packed = pack_ass_many(&lo, &hi, 4).unwrap();
        assert_eq!(packed[0].a, RingElement(0x5F));
        let (hi2, lo2) = unpack_ass_many(&packed, 8).unwrap();
        assert_eq!(hi2, hi);
        assert_eq!(lo2, lo);
    }

    #[test]
    fn invalid_widths_rejected() {
        let x = [RssShare::<u8>::zero()];
        assert!(bit_split_many(&x, 0).is_err());
        assert!(bit_split_many(&x, 3).is_err());
        assert!(bit_split_many(&x, 16).is_err());
        assert!(pack_ass_many(&[AssShare::<u8>::zero()], &[AssShare::zero()], 5).is_err());
    }
}
