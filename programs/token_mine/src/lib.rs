//! # Token Mine Program
//!
//! A registry of liquidity-mining pools. An owner funds a fixed reward
//! which each pool emits linearly over a bounded window, split between
//! stakers in proportion to stake-time.
//!
//! ## Features
//! - Registry-admitted deployments with start-delay and pair-asset checks
//! - Deployment fee in lamports or an SPL token
//! - Reward-per-share accrual with harvest on every deposit and withdraw
//! - Window extension while nobody is staked
//! - Optional per-deposit fee paid to the pool owner
//! - Emergency withdraw and post-campaign reclaim of unallocated reward

use anchor_lang::prelude::*;

declare_id!("9Fy5cMq8dLx8ZQ2kQJtFh1sWcS2q6aZ9n7VbZ7pXq1Hk");

pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod math;
pub mod state;
pub mod transfers;
pub mod validation;

#[cfg(test)]
mod test_utils;

use instructions::*;
use state::{DeployParams, EpochUnit};

#[program]
pub mod token_mine {
    use super::*;

    /// Creates the registry holding deployment policy.
    ///
    /// # Arguments
    /// * `ctx` - The context containing the admin and registry accounts
    /// * `fee` - Deployment fee amount
    /// * `fee_mint` - `None` to charge lamports, `Some(mint)` to charge an SPL token
    /// * `fee_recipient` - Wallet receiving deployment fees
    /// * `max_start_delay` - Furthest ahead of now a pool may start, in epochs
    /// * `epoch_unit` - Slot height or unix timestamp
    pub fn initialize_registry(
        ctx: Context<InitializeRegistry>,
        fee: u64,
        fee_mint: Option<Pubkey>,
        fee_recipient: Pubkey,
        max_start_delay: u64,
        epoch_unit: EpochUnit,
    ) -> Result<()> {
        instructions::initialize_registry::handler(
            ctx,
            fee,
            fee_mint,
            fee_recipient,
            max_start_delay,
            epoch_unit,
        )
    }

    /// Admin: replaces the deployment fee amount.
    pub fn set_fee(ctx: Context<RegistryAdmin>, fee: u64) -> Result<()> {
        instructions::admin::set_fee_handler(ctx, fee)
    }

    /// Admin: switches the deployment fee between lamports and an SPL mint.
    pub fn set_fee_mint(ctx: Context<RegistryAdmin>, fee_mint: Option<Pubkey>) -> Result<()> {
        instructions::admin::set_fee_mint_handler(ctx, fee_mint)
    }

    /// Admin: replaces the fee recipient.
    pub fn set_fee_recipient(ctx: Context<RegistryAdmin>, fee_recipient: Pubkey) -> Result<()> {
        instructions::admin::set_fee_recipient_handler(ctx, fee_recipient)
    }

    /// Admin: replaces the maximum start delay.
    pub fn set_max_start_delay(ctx: Context<RegistryAdmin>, max_start_delay: u64) -> Result<()> {
        instructions::admin::set_max_start_delay_handler(ctx, max_start_delay)
    }

    /// Admin: replaces the pair validator program and its LP-mint offset.
    pub fn set_pair_validator(
        ctx: Context<RegistryAdmin>,
        program: Option<Pubkey>,
        lp_mint_offset: u16,
    ) -> Result<()> {
        instructions::admin::set_pair_validator_handler(ctx, program, lp_mint_offset)
    }

    /// Admin: hands the admin role to `new_admin`.
    pub fn transfer_admin(ctx: Context<RegistryAdmin>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::transfer_admin_handler(ctx, new_admin)
    }

    /// Deploys and funds a new pool.
    ///
    /// # Arguments
    /// * `ctx` - The context containing registry, pool, vault and fee accounts
    /// * `params` - Pool name, window, reward amount, pair flag and deposit fee
    ///
    /// # Errors
    /// Returns an error if:
    /// - The start is beyond `now + max_start_delay`
    /// - A pair staking asset is not confirmed by the validator
    /// - The window is empty or the reward is zero
    /// - The fee or reward cannot be paid
    pub fn deploy(ctx: Context<Deploy>, params: DeployParams) -> Result<()> {
        instructions::deploy::handler(ctx, params)
    }

    /// Stakes tokens, harvesting pending reward first.
    ///
    /// # Arguments
    /// * `ctx` - The context containing pool, position and token accounts
    /// * `amount` - Tokens to stake; 0 only harvests
    /// * `attached_fee` - Lamports offered as deposit fee
    ///
    /// # Errors
    /// Returns an error if:
    /// - The attached fee differs from the pool's deposit fee
    /// - The source account cannot cover `amount`
    pub fn deposit(ctx: Context<Deposit>, amount: u64, attached_fee: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount, attached_fee)
    }

    /// Unstakes tokens, harvesting pending reward first.
    ///
    /// # Errors
    /// Returns an error if `amount` exceeds the caller's stake.
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler(ctx, amount)
    }

    /// Returns the whole stake immediately, forfeiting pending reward.
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>) -> Result<()> {
        instructions::emergency_withdraw::handler(ctx)
    }

    /// Returns unallocated reward to the owner once the campaign is over.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The end epoch has not been reached
    /// - The caller is not the pool owner
    /// - The pool was already reclaimed
    pub fn owner_reclaim(ctx: Context<OwnerReclaim>) -> Result<()> {
        instructions::owner_reclaim::handler(ctx)
    }

    /// Read-only: reward the position could harvest now.
    pub fn pending_reward(ctx: Context<PendingReward>) -> Result<u64> {
        instructions::pending_reward::handler(ctx)
    }
}
