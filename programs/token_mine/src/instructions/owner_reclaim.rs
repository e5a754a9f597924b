//! Owner reclaim instruction handler.
//!
//! Settles a finished campaign and returns the reward the per-share
//! ledger never credited (rounding dust and unmatched epochs) to the owner.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::MineError;
use crate::events::PoolReclaimed;
use crate::state::Pool;
use crate::transfers::transfer_from_pool;

/// Accounts required for reclaiming.
#[derive(Accounts)]
pub struct OwnerReclaim<'info> {
    /// Caller; must be the pool owner (checked after the end-epoch check).
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.registry.as_ref(), &pool.index.to_le_bytes()],
        bump = pool.bump,
        has_one = reward_vault @ MineError::VaultMismatch
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(mut)]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = owner_reward_account.mint == pool.reward_mint @ MineError::MintMismatch,
        constraint = owner_reward_account.owner == owner.key()
    )]
    pub owner_reward_account: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Reclaim unallocated reward.
///
/// # Errors
/// `MiningNotOver`, then `NotOwner`, then `AlreadyReclaimed`.
pub fn handler(ctx: Context<OwnerReclaim>) -> Result<()> {
    let now = ctx.accounts.pool.epoch_unit.current()?;
    let owner_key = ctx.accounts.owner.key();
    let vault_balance = ctx.accounts.reward_vault.amount;

    let unallocated = ctx
        .accounts
        .pool
        .reclaim(&owner_key, vault_balance, now)?;

    transfer_from_pool(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_vault,
        &ctx.accounts.owner_reward_account,
        &ctx.accounts.pool,
        unallocated,
    )?;

    let pool = &ctx.accounts.pool;
    emit!(PoolReclaimed {
        pool: pool.key(),
        owner: owner_key,
        amount: unallocated,
    });

    msg!("Reclaimed {} reward tokens", unallocated);
    msg!(
        "Emitted: {}, harvested: {}, still owed: {}",
        pool.cumulative_emitted,
        pool.total_harvested,
        pool.outstanding_rewards()?
    );

    Ok(())
}
