//! Emergency withdraw instruction handler.
//!
//! Returns the whole stake without touching the accumulator. Any pending
//! reward is forfeited and stays in the reward vault.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::MineError;
use crate::state::{Pool, UserStake};
use crate::transfers::transfer_from_pool;

/// Accounts required for an emergency withdraw.
#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.registry.as_ref(), &pool.index.to_le_bytes()],
        bump = pool.bump,
        has_one = staking_vault @ MineError::VaultMismatch
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

    #[account(
        mut,
        constraint = user_staking_account.mint == pool.staking_mint @ MineError::MintMismatch,
        constraint = user_staking_account.owner == user.key()
    )]
    pub user_staking_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<EmergencyWithdraw>) -> Result<()> {
    let amount = ctx
        .accounts
        .pool
        .emergency_withdraw(&mut ctx.accounts.user_stake)?;

    transfer_from_pool(
        &ctx.accounts.token_program,
        &ctx.accounts.staking_vault,
        &ctx.accounts.user_staking_account,
        &ctx.accounts.pool,
        amount,
    )?;

    msg!("Emergency withdrew {} tokens, pending reward forfeited", amount);
    msg!("User: {}", ctx.accounts.user.key());

    Ok(())
}
