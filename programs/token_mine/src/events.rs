//! Events emitted for off-chain indexers.

use anchor_lang::prelude::*;

/// Emitted exactly once per successful `deploy`.
#[event]
pub struct PoolDeployed {
    pub owner: Pubkey,
    pub name: String,
    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub reward_amount: u64,
    pub pool: Pubkey,
    pub index: u64,
    pub staking_is_pair: bool,
    pub deposit_fee: Option<u64>,
}

#[event]
pub struct RewardHarvested {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
}

#[event]
pub struct PoolReclaimed {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}
