//! Protocol implementations.

pub mod alkaid;
