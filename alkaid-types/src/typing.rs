//! Share type descriptors.
//!
//! The kernels themselves are generic over the backing type, but callers that
//! route values dynamically need a runtime description of what a shared array
//! contains: the storage width, the effective bit count of Boolean shares and
//! the representation. This module also hosts the common-type resolution used
//! when two private operands of different widths meet.

use serde::{Deserialize, Serialize};

/// Storage width of a shared array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Backtype {
    /// 8 bit storage
    U8,
    /// 16 bit storage
    U16,
    /// 32 bit storage
    U32,
    /// 64 bit storage
    U64,
    /// 128 bit storage
    U128,
}

impl Backtype {
    /// The number of bits of this storage type
    pub fn bits(&self) -> usize {
        match self {
            Backtype::U8 => 8,
            Backtype::U16 => 16,
            Backtype::U32 => 32,
            Backtype::U64 => 64,
            Backtype::U128 => 128,
        }
    }

    /// The smallest storage type holding `nbits` bits
    pub fn for_nbits(nbits: usize) -> eyre::Result<Self> {
        match nbits {
            1..=8 => Ok(Backtype::U8),
            9..=16 => Ok(Backtype::U16),
            17..=32 => Ok(Backtype::U32),
            33..=64 => Ok(Backtype::U64),
            65..=128 => Ok(Backtype::U128),
            _ => eyre::bail!("no storage type for {nbits} bits"),
        }
    }
}

/// Descriptor of a shared (or public) array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareTy {
    /// Arithmetic replicated sharing over the full ring
    Arith {
        /// The ring width
        field: Backtype,
    },
    /// Boolean replicated sharing
    Bool {
        /// Storage width
        backtype: Backtype,
        /// Effective bit count; bits above are zero
        nbits: usize,
    },
    /// Boolean masked replicated sharing
    BoolMasked {
        /// Storage width
        backtype: Backtype,
        /// Effective bit count; bits above are zero
        nbits: usize,
    },
    /// A value held in plain by one party
    Private {
        /// The ring width
        field: Backtype,
    },
    /// A public ring value
    Public {
        /// The ring width
        field: Backtype,
    },
}

/// Resolves the sharing two private inputs are lifted to before a joint
/// kernel touches them: the arithmetic replicated sharing over the wider of
/// the two rings.
pub fn common_type(lhs: &ShareTy, rhs: &ShareTy) -> eyre::Result<ShareTy> {
    match (lhs, rhs) {
        (ShareTy::Private { field: l }, ShareTy::Private { field: r }) => Ok(ShareTy::Arith {
            field: (*l).max(*r),
        }),
        _ => eyre::bail!("no common type for {lhs:?} and {rhs:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backtype_for_nbits() {
        assert_eq!(Backtype::for_nbits(1).unwrap(), Backtype::U8);
        assert_eq!(Backtype::for_nbits(8).unwrap(), Backtype::U8);
        assert_eq!(Backtype::for_nbits(9).unwrap(), Backtype::U16);
        assert_eq!(Backtype::for_nbits(64).unwrap(), Backtype::U64);
        assert_eq!(Backtype::for_nbits(65).unwrap(), Backtype::U128);
        assert!(Backtype::for_nbits(0).is_err());
        assert!(Backtype::for_nbits(129).is_err());
    }

    #[test]
    fn common_type_picks_wider_field() {
        let lhs = ShareTy::Private {
            field: Backtype::U32,
        };
        let rhs = ShareTy::Private {
            field: Backtype::U64,
        };
        assert_eq!(
            common_type(&lhs, &rhs).unwrap(),
            ShareTy::Arith {
                field: Backtype::U64
            }
        );
        assert!(common_type(&lhs, &ShareTy::Public { field: Backtype::U8 }).is_err());
    }
}
