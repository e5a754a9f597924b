//! Program constants for the Token Mine program.
//!
//! PDA seeds, the fixed-point scale used by the accrual engine, and
//! bounds applied when the registry admits a new pool.

/// Seed for deriving the registry PDA (one per program).
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Seed for deriving pool PDAs: `[POOL_SEED, registry, index_le]`.
pub const POOL_SEED: &[u8] = b"pool";

/// Seed for deriving user stake PDAs: `[USER_STAKE_SEED, pool, owner]`.
pub const USER_STAKE_SEED: &[u8] = b"user_stake";

/// Seed for deriving the vault holding staked tokens.
pub const STAKING_VAULT_SEED: &[u8] = b"staking_vault";

/// Seed for deriving the vault holding the funded reward.
pub const REWARD_VAULT_SEED: &[u8] = b"reward_vault";

/// Fixed-point scale for `acc_reward_per_share` (10^12).
///
/// Every per-share quotient is floored; the remainder stays in the
/// reward vault and is returned to the owner on reclaim.
pub const SCALE: u128 = 1_000_000_000_000;

/// Maximum byte length of a pool name.
pub const MAX_NAME_LEN: usize = 32;
