//! Shared utilities for the sims-rs CLI

pub mod format;
pub mod table;

pub use format::*;
pub use table::*;
