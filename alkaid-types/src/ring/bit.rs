//! A one-bit ring, used as the carrier for single-bit share outputs.

use num_traits::{One, WrappingAdd, WrappingMul, WrappingNeg, WrappingSub, Zero};
use rand::{distributions::Standard, prelude::Distribution, Rng};
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Mul, Not, Shl, Shr, Sub,
};

/// A single ring bit. Addition is XOR, multiplication is AND.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Bit(bool);

impl Bit {
    /// Wraps a bool into a Bit
    pub fn new(value: bool) -> Self {
        Self(value)
    }

    /// Unwraps the Bit into a bool
    pub fn convert(self) -> bool {
        self.0
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0 as u8)
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<Bit> for u128 {
    fn from(value: Bit) -> Self {
        value.0 as u128
    }
}

impl Not for Bit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl BitXor for Bit {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl BitAnd for Bit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Bit {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitXorAssign for Bit {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl BitAndAssign for Bit {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Bit {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Add for Bit {
    type Output = Self;

    #[expect(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self::Output {
        self ^ rhs
    }
}

impl Sub for Bit {
    type Output = Self;

    #[expect(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self::Output {
        self ^ rhs
    }
}

impl Mul for Bit {
    type Output = Self;

    #[expect(clippy::suspicious_arithmetic_impl)]
    fn mul(self, rhs: Self) -> Self::Output {
        self & rhs
    }
}

impl Zero for Bit {
    fn zero() -> Self {
        Self(false)
    }

    fn is_zero(&self) -> bool {
        !self.0
    }
}

impl One for Bit {
    fn one() -> Self {
        Self(true)
    }
}

impl WrappingAdd for Bit {
    fn wrapping_add(&self, v: &Self) -> Self {
        *self ^ *v
    }
}

impl WrappingSub for Bit {
    fn wrapping_sub(&self, v: &Self) -> Self {
        *self ^ *v
    }
}

impl WrappingMul for Bit {
    fn wrapping_mul(&self, v: &Self) -> Self {
        *self & *v
    }
}

impl WrappingNeg for Bit {
    fn wrapping_neg(&self) -> Self {
        *self
    }
}

impl Shl<u32> for Bit {
    type Output = Self;

    fn shl(self, rhs: u32) -> Self::Output {
        if rhs > 0 {
            Self(false)
        } else {
            self
        }
    }
}

impl Shr<u32> for Bit {
    type Output = Self;

    fn shr(self, rhs: u32) -> Self::Output {
        if rhs > 0 {
            Self(false)
        } else {
            self
        }
    }
}

impl Distribution<Bit> for Standard {
    #[inline(always)]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Bit {
        Bit(rng.gen())
    }
}
