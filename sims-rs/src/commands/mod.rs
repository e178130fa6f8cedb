//! Command implementations

pub mod iff;
