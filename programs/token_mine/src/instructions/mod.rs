//! Instruction handlers for the Token Mine program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod deploy;
pub mod deposit;
pub mod emergency_withdraw;
pub mod initialize_registry;
pub mod owner_reclaim;
pub mod pending_reward;
pub mod withdraw;

pub use admin::*;
pub use deploy::*;
pub use deposit::*;
pub use emergency_withdraw::*;
pub use initialize_registry::*;
pub use owner_reclaim::*;
pub use pending_reward::*;
pub use withdraw::*;
