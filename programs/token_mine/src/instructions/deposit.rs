//! Deposit instruction handler.
//!
//! Stakes tokens into a pool, harvesting any pending reward first.
//! A zero-amount deposit is a plain harvest.

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::MineError;
use crate::events::RewardHarvested;
use crate::state::{Pool, UserStake};
use crate::transfers::{transfer_from_pool, transfer_from_user, transfer_lamports};
use crate::validation::{ensure_lamports, Spendable};

/// Accounts required for depositing.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The staker (owner or approved delegate of the source account).
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.registry.as_ref(), &pool.index.to_le_bytes()],
        bump = pool.bump,
        has_one = staking_vault @ MineError::VaultMismatch,
        has_one = reward_vault @ MineError::VaultMismatch,
        has_one = owner @ MineError::NotOwner
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// User's position (created on first deposit).
    #[account(
        init_if_needed,
        payer = user,
        space = UserStake::LEN,
        seeds = [USER_STAKE_SEED, pool.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub user_stake: Box<Account<'info, UserStake>>,

    /// Source of the staked tokens.
    #[account(
        mut,
        constraint = user_staking_account.mint == pool.staking_mint @ MineError::MintMismatch
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

    /// Pool owner, receives the deposit fee.
    /// CHECK: Validated through pool.owner (has_one).
    #[account(mut)]
    pub owner: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,
}

/// Deposit tokens into the pool.
///
/// # Arguments
/// * `ctx` - Deposit accounts context
/// * `amount` - Staking tokens to add (0 to only harvest)
/// * `attached_fee` - Lamports offered as deposit fee; must equal the pool's fee
///
/// The fee is forwarded before the stake moves; both happen in the same
/// transaction, so a failed stake transfer also reverts the fee.
pub fn handler(ctx: Context<Deposit>, amount: u64, attached_fee: u64) -> Result<()> {
    let now = ctx.accounts.pool.epoch_unit.current()?;
    let user_key = ctx.accounts.user.key();

    // === DEPOSIT FEE ===

    let fee = ctx.accounts.pool.deposit_fee_due(amount, attached_fee)?;
    if fee > 0 {
        ensure_lamports(&ctx.accounts.user.to_account_info(), fee)?;
        transfer_lamports(
            &ctx.accounts.system_program,
            &ctx.accounts.user,
            &ctx.accounts.owner.to_account_info(),
            fee,
        )?;
    }

    if amount > 0 {
        Spendable::from(&**ctx.accounts.user_staking_account).ensure(&user_key, amount)?;
    }

    // === ACCRUAL ===

    let pool_key = ctx.accounts.pool.key();
    let user_stake = &mut ctx.accounts.user_stake;
    if !user_stake.is_initialized() {
        user_stake.owner = user_key;
        user_stake.pool = pool_key;
        user_stake.bump = ctx.bumps.user_stake;
    }
    require_keys_eq!(user_stake.pool, pool_key, MineError::StakeAccountMismatch);

    let harvested = ctx
        .accounts
        .pool
        .deposit(&mut ctx.accounts.user_stake, amount, now)?;

    // === TRANSFERS ===

    transfer_from_pool(
        &ctx.accounts.token_program,
        &ctx.accounts.reward_vault,
        &ctx.accounts.user_reward_account,
        &ctx.accounts.pool,
        harvested,
    )?;
    transfer_from_user(
        &ctx.accounts.token_program,
        &ctx.accounts.user_staking_account,
        &ctx.accounts.staking_vault,
        &ctx.accounts.user,
        amount,
    )?;

    if harvested > 0 {
        emit!(RewardHarvested {
            pool: pool_key,
            user: user_key,
            amount: harvested,
        });
    }

    msg!("Deposited {} tokens (fee {} lamports)", amount, fee);
    msg!("Harvested {} reward tokens", harvested);
    msg!(
        "User staked: {}, pool staked: {}",
        ctx.accounts.user_stake.staked_amount,
        ctx.accounts.pool.total_staked
    );

    Ok(())
}
