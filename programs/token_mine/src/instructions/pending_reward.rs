//! Pending reward view.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::MineError;
use crate::state::{Pool, UserStake};

/// Accounts required for the pending reward view.
#[derive(Accounts)]
pub struct PendingReward<'info> {
    #[account(
        seeds = [POOL_SEED, pool.registry.as_ref(), &pool.index.to_le_bytes()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        constraint = user_stake.pool == pool.key() @ MineError::StakeAccountMismatch
    )]
    pub user_stake: Box<Account<'info, UserStake>>,
}

/// Reward the position could harvest right now. Mutates nothing.
pub fn handler(ctx: Context<PendingReward>) -> Result<u64> {
    let pool = &ctx.accounts.pool;
    let now = pool.epoch_unit.current()?;
    let pending = pool.pending_reward(&ctx.accounts.user_stake, now)?;

    msg!("Pending reward for {}: {}", ctx.accounts.user_stake.owner, pending);

    Ok(pending)
}
