//! Wrapping-arithmetic wrapper around the [`IntRing2k`] backing types.

use super::int_ring::IntRing2k;
use num_traits::{One, Zero};
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Mul, MulAssign,
    Neg, Not, Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
};

/// An element of the ring with 2^k elements. All arithmetic wraps, shifts by
/// k or more yield zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
#[repr(transparent)]
pub struct RingElement<T: IntRing2k>(pub T);

impl<T: IntRing2k> RingElement<T> {
    /// Unwraps the element into the backing type
    pub fn convert(self) -> T {
        self.0
    }

    /// Returns the bit at position `index` as a bool
    pub fn bit(&self, index: usize) -> bool {
        (self.0 >> index as u32) & T::one() == T::one()
    }

    /// Returns the bit at position `index` in the lsb of a fresh element
    pub fn get_bit(&self, index: usize) -> Self {
        RingElement((self.0 >> index as u32) & T::one())
    }

    /// 0 or 1 as a ring element
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self(T::one())
        } else {
            Self(T::zero())
        }
    }
}

impl<T: IntRing2k> std::fmt::Display for RingElement<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl<T: IntRing2k> From<T> for RingElement<T> {
    fn from(other: T) -> Self {
        RingElement(other)
    }
}

macro_rules! wrapping_op {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident, $wrapping:ident) => {
        impl<T: IntRing2k> $trait for RingElement<T> {
            type Output = Self;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$wrapping(&rhs.0))
            }
        }

        impl<T: IntRing2k> $trait<&Self> for RingElement<T> {
            type Output = Self;

            fn $fn(self, rhs: &Self) -> Self::Output {
                Self(self.0.$wrapping(&rhs.0))
            }
        }

        impl<T: IntRing2k> $assign_trait for RingElement<T> {
            fn $assign_fn(&mut self, rhs: Self) {
                self.0 = self.0.$wrapping(&rhs.0);
            }
        }

        impl<T: IntRing2k> $assign_trait<&Self> for RingElement<T> {
            fn $assign_fn(&mut self, rhs: &Self) {
                self.0 = self.0.$wrapping(&rhs.0);
            }
        }
    };
}

wrapping_op!(Add, add, AddAssign, add_assign, wrapping_add);
wrapping_op!(Sub, sub, SubAssign, sub_assign, wrapping_sub);
wrapping_op!(Mul, mul, MulAssign, mul_assign, wrapping_mul);

macro_rules! bit_op {
    ($trait:ident, $fn:ident, $assign_trait:ident, $assign_fn:ident, $op:tt) => {
        impl<T: IntRing2k> $trait for RingElement<T> {
            type Output = Self;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0 $op rhs.0)
            }
        }

        impl<T: IntRing2k> $trait<&Self> for RingElement<T> {
            type Output = Self;

            fn $fn(self, rhs: &Self) -> Self::Output {
                Self(self.0 $op rhs.0)
            }
        }

        impl<T: IntRing2k> $assign_trait for RingElement<T> {
            fn $assign_fn(&mut self, rhs: Self) {
                self.0 = self.0 $op rhs.0;
            }
        }

        impl<T: IntRing2k> $assign_trait<&Self> for RingElement<T> {
            fn $assign_fn(&mut self, rhs: &Self) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);
bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);

impl<T: IntRing2k> Neg for RingElement<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0.wrapping_neg())
    }
}

impl<T: IntRing2k> Not for RingElement<T> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl<T: IntRing2k> Shl<usize> for RingElement<T> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        if rhs >= T::K {
            Self(T::zero())
        } else {
            Self(self.0 << rhs as u32)
        }
    }
}

impl<T: IntRing2k> ShlAssign<usize> for RingElement<T> {
    fn shl_assign(&mut self, rhs: usize) {
        *self = *self << rhs;
    }
}

impl<T: IntRing2k> Shr<usize> for RingElement<T> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        if rhs >= T::K {
            Self(T::zero())
        } else {
            Self(self.0 >> rhs as u32)
        }
    }
}

impl<T: IntRing2k> ShrAssign<usize> for RingElement<T> {
    fn shr_assign(&mut self, rhs: usize) {
        *self = *self >> rhs;
    }
}

impl<T: IntRing2k> Zero for RingElement<T> {
    fn zero() -> Self {
        Self(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T: IntRing2k> One for RingElement<T> {
    fn one() -> Self {
        Self(T::one())
    }
}

impl<T: IntRing2k> Distribution<RingElement<T>> for Standard
where
    Standard: Distribution<T>,
{
    #[inline(always)]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> RingElement<T> {
        RingElement(rng.gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::bit::Bit;

    #[test]
    fn shifts_truncate() {
        let x = RingElement(0xFFu8);
        assert_eq!(x << 8, RingElement(0));
        assert_eq!(x >> 8, RingElement(0));
        assert_eq!(x << 4, RingElement(0xF0));
        let b = RingElement(Bit::new(true));
        assert_eq!(b << 1, RingElement(Bit::new(false)));
        assert_eq!(b << 0, b);
    }

    #[test]
    fn wrapping_arithmetic() {
        let x = RingElement(0xFFu8);
        assert_eq!(x + RingElement(1), RingElement(0));
        assert_eq!(RingElement(0u8) - RingElement(1), RingElement(0xFF));
        assert_eq!(-RingElement(1u8), RingElement(0xFF));
    }

    #[test]
    fn bit_access() {
        let x = RingElement(0b1010u8);
        assert!(!x.bit(0));
        assert!(x.bit(1));
        assert_eq!(x.get_bit(3), RingElement(1));
        assert_eq!(RingElement::<u8>::from_bool(true), RingElement(1));
    }
}
