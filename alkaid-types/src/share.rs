//! The three share containers of the Alkaid protocol family.
//!
//! * [`RssShare`] — replicated sharing, party i holds `(s_i, s_{i-1})`. The
//!   same container carries arithmetic shares (reconstruction by wrapping
//!   addition of the first slots) and Boolean shares (reconstruction by XOR).
//! * [`MssShare`] — masked replicated Boolean sharing. All parties hold the
//!   identical external value `e = x ^ d` plus a replicated sharing of the
//!   mask `d`.
//! * [`AssShare`] — plain additive Boolean sharing, one slot per party. A
//!   transient form produced by the communication-free AND gates; it must be
//!   reshared upwards before reuse.

use crate::ring::{bit::Bit, int_ring::IntRing2k, ring_impl::RingElement};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitXor, BitXorAssign, Neg, Shl, Shr, Sub,
    SubAssign,
};

/// A replicated share of one ring element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RssShare<T: IntRing2k> {
    /// This party's additive slot
    pub a: RingElement<T>,
    /// Replica of the previous party's additive slot
    pub b: RingElement<T>,
}

impl<T: IntRing2k> RssShare<T> {
    /// Constructs a share from two backing values
    pub fn new(a: T, b: T) -> Self {
        Self {
            a: RingElement(a),
            b: RingElement(b),
        }
    }

    /// Constructs a share from two ring elements
    pub fn new_ring(a: RingElement<T>, b: RingElement<T>) -> Self {
        Self { a, b }
    }

    /// The all-zero share
    pub fn zero() -> Self {
        Self {
            a: RingElement::zero(),
            b: RingElement::zero(),
        }
    }

    /// Unwraps into the two slots
    pub fn ab(self) -> (RingElement<T>, RingElement<T>) {
        (self.a, self.b)
    }

    /// Extracts the share of the bit at `index` into a [`Bit`] share
    pub fn get_bit(&self, index: usize) -> RssShare<Bit> {
        RssShare {
            a: RingElement(Bit::new(self.a.bit(index))),
            b: RingElement(Bit::new(self.b.bit(index))),
        }
    }
}

impl<T: IntRing2k> Default for RssShare<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: IntRing2k> Add for RssShare<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
        }
    }
}

impl<T: IntRing2k> AddAssign for RssShare<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

impl<T: IntRing2k> Sub for RssShare<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            a: self.a - rhs.a,
            b: self.b - rhs.b,
        }
    }
}

impl<T: IntRing2k> SubAssign for RssShare<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.a -= rhs.a;
        self.b -= rhs.b;
    }
}

impl<T: IntRing2k> Neg for RssShare<T> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            a: -self.a,
            b: -self.b,
        }
    }
}

impl<T: IntRing2k> BitXor for RssShare<T> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            a: self.a ^ rhs.a,
            b: self.b ^ rhs.b,
        }
    }
}

impl<T: IntRing2k> BitXor for &RssShare<T> {
    type Output = RssShare<T>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        RssShare {
            a: self.a ^ rhs.a,
            b: self.b ^ rhs.b,
        }
    }
}

impl<T: IntRing2k> BitXorAssign for RssShare<T> {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.a ^= rhs.a;
        self.b ^= rhs.b;
    }
}

/// The local cross term of the replicated AND gate:
/// `a_i & b_i ^ a_i & b_{i-1} ^ a_{i-1} & b_i`.
impl<T: IntRing2k> BitAnd for &RssShare<T> {
    type Output = RingElement<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        (self.a & rhs.a) ^ (self.a & rhs.b) ^ (self.b & rhs.a)
    }
}

impl<T: IntRing2k> BitAnd<RingElement<T>> for RssShare<T> {
    type Output = Self;

    fn bitand(self, rhs: RingElement<T>) -> Self::Output {
        Self {
            a: self.a & rhs,
            b: self.b & rhs,
        }
    }
}

impl<T: IntRing2k> BitAndAssign<RingElement<T>> for RssShare<T> {
    fn bitand_assign(&mut self, rhs: RingElement<T>) {
        self.a &= rhs;
        self.b &= rhs;
    }
}

impl<T: IntRing2k> Shl<usize> for RssShare<T> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        Self {
            a: self.a << rhs,
            b: self.b << rhs,
        }
    }
}

impl<T: IntRing2k> Shr<usize> for RssShare<T> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        Self {
            a: self.a >> rhs,
            b: self.b >> rhs,
        }
    }
}

/// A masked replicated Boolean share: `x = e ^ d`, where the external value
/// `e` is public to all three parties and `d` is replicated-shared.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MssShare<T: IntRing2k> {
    /// The public external value, byte-identical at all parties
    pub e: RingElement<T>,
    /// Replicated share of the mask
    pub d: RssShare<T>,
}

impl<T: IntRing2k> MssShare<T> {
    /// Constructs a masked share
    pub fn new(e: RingElement<T>, d: RssShare<T>) -> Self {
        Self { e, d }
    }

    /// The all-zero share
    pub fn zero() -> Self {
        Self {
            e: RingElement::zero(),
            d: RssShare::zero(),
        }
    }
}

impl<T: IntRing2k> Default for MssShare<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: IntRing2k> BitXor for MssShare<T> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            e: self.e ^ rhs.e,
            d: self.d ^ rhs.d,
        }
    }
}

impl<T: IntRing2k> BitXor for &MssShare<T> {
    type Output = MssShare<T>;

    fn bitxor(self, rhs: Self) -> Self::Output {
        MssShare {
            e: self.e ^ rhs.e,
            d: self.d ^ rhs.d,
        }
    }
}

impl<T: IntRing2k> BitXorAssign for MssShare<T> {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.e ^= rhs.e;
        self.d ^= rhs.d;
    }
}

impl<T: IntRing2k> BitAnd<RingElement<T>> for MssShare<T> {
    type Output = Self;

    fn bitand(self, rhs: RingElement<T>) -> Self::Output {
        Self {
            e: self.e & rhs,
            d: self.d & rhs,
        }
    }
}

impl<T: IntRing2k> Shl<usize> for MssShare<T> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        Self {
            e: self.e << rhs,
            d: self.d << rhs,
        }
    }
}

impl<T: IntRing2k> Shr<usize> for MssShare<T> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        Self {
            e: self.e >> rhs,
            d: self.d >> rhs,
        }
    }
}

/// An additive Boolean share, one slot per party.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct AssShare<T: IntRing2k> {
    /// This party's additive slot
    pub a: RingElement<T>,
}

impl<T: IntRing2k> AssShare<T> {
    /// Wraps an additive slot
    pub fn new(a: RingElement<T>) -> Self {
        Self { a }
    }

    /// The all-zero share
    pub fn zero() -> Self {
        Self {
            a: RingElement::zero(),
        }
    }
}

impl<T: IntRing2k> Default for AssShare<T> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: IntRing2k> BitXor for AssShare<T> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self { a: self.a ^ rhs.a }
    }
}

impl<T: IntRing2k> BitXorAssign for AssShare<T> {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.a ^= rhs.a;
    }
}

impl<T: IntRing2k> BitOr for AssShare<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self { a: self.a | rhs.a }
    }
}

impl<T: IntRing2k> BitAnd<RingElement<T>> for AssShare<T> {
    type Output = Self;

    fn bitand(self, rhs: RingElement<T>) -> Self::Output {
        Self { a: self.a & rhs }
    }
}

impl<T: IntRing2k> Shl<usize> for AssShare<T> {
    type Output = Self;

    fn shl(self, rhs: usize) -> Self::Output {
        Self { a: self.a << rhs }
    }
}

impl<T: IntRing2k> Shr<usize> for AssShare<T> {
    type Output = Self;

    fn shr(self, rhs: usize) -> Self::Output {
        Self { a: self.a >> rhs }
    }
}
