/// Initialize registry instruction handler.
///
/// Creates the program-wide registry holding deployment policy.
///
/// ## Security Guarantees
/// - Registry is a singleton PDA; a second initialization fails at `init`
/// - The signer becomes the only account allowed to change policy

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::{EpochUnit, Registry};

/// Accounts required for registry initialization.
#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    /// The admin that will control deployment policy.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// The registry account to be created.
    #[account(
        init,
        payer = admin,
        space = Registry::LEN,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    /// System program for account creation.
    pub system_program: Program<'info, System>,
}

/// Initialize the registry.
///
/// # Arguments
/// * `ctx` - InitializeRegistry accounts context
/// * `fee` - Deployment fee (lamports, or fee-mint base units)
/// * `fee_mint` - `None` for a lamport fee, `Some(mint)` for an SPL fee
/// * `fee_recipient` - Wallet receiving deployment fees
/// * `max_start_delay` - Furthest a pool may start ahead of now, in epochs
/// * `epoch_unit` - Clock field every pool accrues against
pub fn handler(
    ctx: Context<InitializeRegistry>,
    fee: u64,
    fee_mint: Option<Pubkey>,
    fee_recipient: Pubkey,
    max_start_delay: u64,
    epoch_unit: EpochUnit,
) -> Result<()> {
    let registry = &mut ctx.accounts.registry;

    registry.admin = ctx.accounts.admin.key();
    registry.fee = fee;
    registry.fee_mint = fee_mint;
    registry.fee_recipient = fee_recipient;
    registry.max_start_delay = max_start_delay;
    registry.pair_validator = None;
    registry.pair_lp_mint_offset = 0;
    registry.epoch_unit = epoch_unit;
    registry.deployment_count = 0;
    registry.bump = ctx.bumps.registry;

    msg!("Token Mine registry initialized");
    msg!("Admin: {}", registry.admin);
    msg!("Fee: {} ({:?}) -> {}", fee, fee_mint, fee_recipient);
    msg!("Max start delay: {} ({:?})", max_start_delay, epoch_unit);

    Ok(())
}
