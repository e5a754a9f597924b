/// Deploy instruction handler.
///
/// Admits a new pool under registry policy, collects the deployment fee,
/// funds the pool's reward vault and records the deployment.
///
/// ## Security Guarantees
/// - Pool address is derived from the registry deployment counter, so
///   every deployment gets a fresh, never reused identity
/// - Both vaults are PDAs with the pool as token authority
/// - Everything happens in one transaction; a failed check leaves no pool

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::MineError;
use crate::events::PoolDeployed;
use crate::math::emission_dust;
use crate::state::{DeployParams, FeeAccount, FeeRoute, Pool, Registry};
use crate::transfers::{transfer_from_user, transfer_lamports};
use crate::validation::{ensure_lamports, PairAccountValidator, Spendable};

/// Accounts required for deploying a pool.
#[derive(Accounts)]
pub struct Deploy<'info> {
    /// The funder; becomes the pool owner.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Box<Account<'info, Registry>>,

    /// The pool to be created.
    /// SECURITY: seeded by the current deployment counter.
    #[account(
        init,
        payer = owner,
        space = Pool::LEN,
        seeds = [
            POOL_SEED,
            registry.key().as_ref(),
            &registry.deployment_count.to_le_bytes()
        ],
        bump
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub staking_mint: Box<Account<'info, Mint>>,

    pub reward_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = owner,
        seeds = [STAKING_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = staking_mint,
        token::authority = pool
    )]
    pub staking_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = owner,
        seeds = [REWARD_VAULT_SEED, pool.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = pool
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    /// Source of the reward funding.
    #[account(
        mut,
        constraint = owner_reward_account.mint == reward_mint.key() @ MineError::MintMismatch
    )]
    pub owner_reward_account: Box<Account<'info, TokenAccount>>,

    /// Wallet receiving the lamport fee.
    /// CHECK: Address pinned to registry.fee_recipient.
    #[account(
        mut,
        constraint = fee_recipient.key() == registry.fee_recipient @ MineError::FeeRecipientMismatch
    )]
    pub fee_recipient: UncheckedAccount<'info>,

    /// Payer side of a token fee. Required when the registry has a fee mint.
    #[account(mut)]
    pub owner_fee_account: Option<Account<'info, TokenAccount>>,

    /// Recipient side of a token fee, owned by registry.fee_recipient.
    #[account(mut)]
    pub fee_recipient_account: Option<Account<'info, TokenAccount>>,

    /// AMM pair account vouching for the staking mint.
    /// CHECK: Only read by the pair validator (owner + layout checks).
    pub pair_account: Option<UncheckedAccount<'info>>,

    pub system_program: Program<'info, System>,

    pub token_program: Program<'info, Token>,

    pub rent: Sysvar<'info, Rent>,
}

/// Deploy a new pool.
///
/// # Arguments
/// * `ctx` - Deploy accounts context
/// * `params` - Name, window, reward amount, pair flag and optional deposit fee
///
/// # Errors
/// `GenesisTooLate`, `InvalidPair`, window sanity errors, then
/// `InsufficientBalance` / `InsufficientAllowance` for the fee and funding.
pub fn handler(ctx: Context<Deploy>, params: DeployParams) -> Result<()> {
    let registry = &ctx.accounts.registry;
    let now = registry.epoch_unit.current()?;
    let staking_mint = ctx.accounts.staking_mint.key();

    // === ADMISSION ===

    let pair_info = ctx
        .accounts
        .pair_account
        .as_ref()
        .map(|account| account.to_account_info());
    let validator = PairAccountValidator {
        program: registry.pair_validator,
        lp_mint_offset: registry.pair_lp_mint_offset as usize,
        pair_account: pair_info.as_ref(),
    };
    let emission_rate = registry.admit(now, &params, &staking_mint, &validator)?;
    let dust = emission_dust(
        params.reward_amount,
        emission_rate,
        params.end_epoch - params.start_epoch,
    )?;

    // === DEPLOYMENT FEE ===

    charge_deployment_fee(&ctx)?;

    // === REWARD FUNDING ===

    let owner_key = ctx.accounts.owner.key();
    Spendable::from(&**ctx.accounts.owner_reward_account)
        .ensure(&owner_key, params.reward_amount)?;
    transfer_from_user(
        &ctx.accounts.token_program,
        &ctx.accounts.owner_reward_account,
        &ctx.accounts.reward_vault,
        &ctx.accounts.owner,
        params.reward_amount,
    )?;

    // === STATE INITIALIZATION ===

    let registry_key = ctx.accounts.registry.key();
    let registry = &mut ctx.accounts.registry;
    let index = registry.next_deployment_index()?;
    let epoch_unit = registry.epoch_unit;

    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;
    pool.registry = registry_key;
    pool.owner = owner_key;
    pool.index = index;
    pool.staking_mint = staking_mint;
    pool.reward_mint = ctx.accounts.reward_mint.key();
    pool.staking_vault = ctx.accounts.staking_vault.key();
    pool.reward_vault = ctx.accounts.reward_vault.key();
    pool.epoch_unit = epoch_unit;
    pool.bump = ctx.bumps.pool;
    pool.staking_vault_bump = ctx.bumps.staking_vault;
    pool.reward_vault_bump = ctx.bumps.reward_vault;
    pool.launch(&params, emission_rate);

    msg!("Pool #{} deployed: {}", index, pool_key);
    msg!("Owner: {}", owner_key);
    msg!(
        "Window: {}..{} ({:?}), reward {} at {}/epoch",
        params.start_epoch,
        params.end_epoch,
        epoch_unit,
        params.reward_amount,
        emission_rate
    );
    msg!("Rounding dust left for reclaim: {}", dust);

    emit!(PoolDeployed {
        owner: owner_key,
        name: params.name,
        staking_mint,
        reward_mint: pool.reward_mint,
        start_epoch: params.start_epoch,
        end_epoch: params.end_epoch,
        reward_amount: params.reward_amount,
        pool: pool_key,
        index,
        staking_is_pair: params.staking_is_pair,
        deposit_fee: params.deposit_fee,
    });

    Ok(())
}

/// Charges the registry fee in lamports or in the configured fee mint.
fn charge_deployment_fee(ctx: &Context<Deploy>) -> Result<()> {
    let accounts = &ctx.accounts;
    let route = accounts.registry.fee_route(
        fee_account(&accounts.owner_fee_account),
        fee_account(&accounts.fee_recipient_account),
    )?;

    match route {
        FeeRoute::Free => {}
        FeeRoute::Lamports(fee) => {
            ensure_lamports(&accounts.owner.to_account_info(), fee)?;
            transfer_lamports(
                &accounts.system_program,
                &accounts.owner,
                &accounts.fee_recipient.to_account_info(),
                fee,
            )?;
            msg!("Deployment fee: {} lamports", fee);
        }
        FeeRoute::Token { mint, amount } => {
            let (Some(payer), Some(recipient)) = (
                accounts.owner_fee_account.as_ref(),
                accounts.fee_recipient_account.as_ref(),
            ) else {
                return err!(MineError::MissingFeeAccount);
            };
            Spendable::from(&**payer).ensure(&accounts.owner.key(), amount)?;
            transfer_from_user(
                &accounts.token_program,
                payer,
                recipient,
                &accounts.owner,
                amount,
            )?;
            msg!("Deployment fee: {} of mint {}", amount, mint);
        }
    }

    Ok(())
}

fn fee_account(account: &Option<Account<TokenAccount>>) -> Option<FeeAccount> {
    account.as_ref().map(|a| FeeAccount {
        mint: a.mint,
        owner: a.owner,
    })
}
