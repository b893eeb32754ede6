//! The ring data layer: backing integer types and the wrapping element type.

pub mod bit;
pub mod int_ring;
pub mod ring_impl;
