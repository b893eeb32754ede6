use super::bit::Bit;
use num_traits::{One, WrappingAdd, WrappingMul, WrappingNeg, WrappingSub, Zero};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Debug, Display},
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr},
};

/// Backing storage for a ring with 2^k elements.
///
/// Implemented for the unsigned machine integers and for [`Bit`]. All
/// arithmetic is wrapping, all shifts with an out-of-range amount are handled
/// by the [`RingElement`](super::ring_impl::RingElement) wrapper.
pub trait IntRing2k:
    Display
    + Debug
    + Copy
    + Default
    + Eq
    + PartialEq
    + Send
    + Sync
    + 'static
    + Serialize
    + for<'a> Deserialize<'a>
    + Zero
    + One
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingNeg
    + Not<Output = Self>
    + BitXor<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXorAssign
    + BitAndAssign
    + BitOrAssign
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + Into<u128>
{
    /// The bit size k of the ring
    const K: usize;
    /// The serialized byte size of one element
    const BYTES: usize;

    /// Truncating cast from a u128 bit pattern
    fn cast_from_u128(val: u128) -> Self;
}

macro_rules! int_ring_impl {
    ($($t:ty),*) => {$(
        impl IntRing2k for $t {
            const K: usize = <$t>::BITS as usize;
            const BYTES: usize = Self::K / 8;

            #[inline(always)]
            fn cast_from_u128(val: u128) -> Self {
                val as $t
            }
        }
    )*};
}

int_ring_impl!(u8, u16, u32, u64, u128);

impl IntRing2k for Bit {
    const K: usize = 1;
    const BYTES: usize = 1;

    #[inline(always)]
    fn cast_from_u128(val: u128) -> Self {
        Bit::new(val & 1 == 1)
    }
}
