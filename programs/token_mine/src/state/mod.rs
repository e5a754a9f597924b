//! State structures for the Token Mine program.
//!
//! This module defines all account structures used to store program state.

pub mod pool;
pub mod registry;
pub mod user_stake;

pub use pool::*;
pub use registry::*;
pub use user_stake::*;
