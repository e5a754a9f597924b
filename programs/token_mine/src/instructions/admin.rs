/// Admin instruction handlers.
///
/// Each handler replaces one registry policy field and nothing else.
///
/// ## Security Guarantees
/// - All admin functions require signer == registry.admin
/// - PDA validation ensures the canonical registry

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::MineError;
use crate::state::Registry;

/// Accounts required for admin operations.
#[derive(Accounts)]
pub struct RegistryAdmin<'info> {
    /// The registry admin.
    /// SECURITY: Must be signer AND match registry.admin.
    #[account(
        constraint = admin.key() == registry.admin @ MineError::NotAdmin
    )]
    pub admin: Signer<'info>,

    /// The registry to modify.
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,
}

/// Set the deployment fee amount.
pub fn set_fee_handler(ctx: Context<RegistryAdmin>, fee: u64) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    msg!("Deployment fee: {} -> {}", registry.fee, fee);
    registry.fee = fee;
    Ok(())
}

/// Switch the deployment fee between lamports (`None`) and an SPL mint.
pub fn set_fee_mint_handler(ctx: Context<RegistryAdmin>, fee_mint: Option<Pubkey>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    msg!("Fee mint: {:?} -> {:?}", registry.fee_mint, fee_mint);
    registry.fee_mint = fee_mint;
    Ok(())
}

/// Set the wallet that receives deployment fees.
pub fn set_fee_recipient_handler(ctx: Context<RegistryAdmin>, fee_recipient: Pubkey) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    msg!("Fee recipient: {} -> {}", registry.fee_recipient, fee_recipient);
    registry.fee_recipient = fee_recipient;
    Ok(())
}

/// Set how far ahead of now a new pool may start.
pub fn set_max_start_delay_handler(ctx: Context<RegistryAdmin>, max_start_delay: u64) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    msg!(
        "Max start delay: {} -> {}",
        registry.max_start_delay,
        max_start_delay
    );
    registry.max_start_delay = max_start_delay;
    Ok(())
}

/// Set (or clear) the AMM program whose pair accounts vouch for LP mints.
///
/// # Arguments
/// * `ctx` - RegistryAdmin accounts context
/// * `program` - AMM program id, `None` disables pair-asset deployments
/// * `lp_mint_offset` - Byte offset of the LP mint within a pair account
pub fn set_pair_validator_handler(
    ctx: Context<RegistryAdmin>,
    program: Option<Pubkey>,
    lp_mint_offset: u16,
) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    msg!(
        "Pair validator: {:?} -> {:?} (lp mint at {})",
        registry.pair_validator,
        program,
        lp_mint_offset
    );
    registry.pair_validator = program;
    registry.pair_lp_mint_offset = lp_mint_offset;
    Ok(())
}

/// Hand the admin role to another key.
///
/// # Security
/// - New admin must be a valid pubkey (non-zero)
pub fn transfer_admin_handler(ctx: Context<RegistryAdmin>, new_admin: Pubkey) -> Result<()> {
    require!(new_admin != Pubkey::default(), MineError::InvalidAdmin);

    let registry = &mut ctx.accounts.registry;
    let old_admin = registry.admin;
    registry.admin = new_admin;

    msg!("Admin transferred: {} -> {}", old_admin, new_admin);

    Ok(())
}
