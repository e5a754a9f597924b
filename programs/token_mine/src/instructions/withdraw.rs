//! Withdraw instruction handler.
//!
//! Returns staked tokens to the user after harvesting pending reward.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::MineError;
use crate::events::RewardHarvested;
use crate::state::{Pool, UserStake};
use crate::transfers::transfer_from_pool;

/// Accounts required for withdrawing.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.registry.as_ref(), &pool.index.to_le_bytes()],
        bump = pool.bump,
        has_one = staking_vault @ MineError::VaultMismatch,
        has_one = reward_vault @ MineError::VaultMismatch
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [USER_STAKE_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump = user_stake.bump,
        constraint = user_stake.owner == user.key() @ MineError::StakeAccountMismatch,
        constraint = user_stake.pool == pool.key() @ MineError::StakeAccountMismatch
    )]
    pub user_stake: Box<Account<'info, UserStake>>,

    /// Destination for the returned stake.
    #[account(
        mut,
        constraint = user_staking_account.mint == pool.staking_mint @ MineError::MintMismatch,
        constraint = user_staking_account.owner == user.key()
    )]
    pub user_staking_account: Box<Account<'info, TokenAccount>>,

    /// Destination for harvested reward.
    #[account(
        mut,
        constraint = user_reward_account.mint == pool.reward_mint @ MineError::MintMismatch,
        constraint = user_reward_account.owner == user.key()
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

/// Withdraw staked tokens.
///
/// # Arguments
/// * `ctx` - Withdraw accounts context
/// * `amount` - Staking tokens to return (0 to only harvest)
///
/// # Errors
/// `InsufficientStake` if `amount` exceeds the user's stake.
pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let now = ctx.accounts.pool.epoch_unit.current()?;

    let harvested = ctx
        .accounts
        .pool
        .withdraw(&mut ctx.accounts.user_stake, amount, now)?;

    transfer_from_pool(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_vault,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.pool,
        harvested,
    )?;
    transfer_from_pool(
        &ctx.accounts.token_program,
        &ctx.accounts.staking_vault,
        &ctx.accounts.user_staking_account,
        &ctx.accounts.pool,
        amount,
    )?;

    if harvested > 0 {
        emit!(RewardHarvested {
            pool: ctx.accounts.pool.key(),
            user: ctx.accounts.user.key(),
            amount: harvested,
        });
    }

    msg!("Withdrew {} tokens", amount);
    msg!("Harvested {} reward tokens", harvested);
    msg!(
        "User staked: {}, pool staked: {}",
        ctx.accounts.user_stake.staked_amount,
        ctx.accounts.pool.total_staked
    );

    Ok(())
}
