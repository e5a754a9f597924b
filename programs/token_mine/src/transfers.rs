//! Token and lamport movements used by the instruction handlers.
//!
//! Vaults are owned by the pool PDA, so outgoing transfers sign with the
//! pool seeds `[POOL_SEED, registry, index_le, bump]`.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::POOL_SEED;
use crate::state::Pool;

/// Moves `amount` out of a pool vault. No-op for zero.
pub fn transfer_from_pool<'info>(
    token_program: &Program<'info, Token>,
    vault: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    pool: &Account<'info, Pool>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let registry_key = pool.registry;
    let index = pool.index.to_le_bytes();
    let bump = [pool.bump];
    let seeds: &[&[u8]] = &[POOL_SEED, registry_key.as_ref(), &index, &bump];
    let signer_seeds = &[seeds];

    let cpi_accounts = Transfer {
        from: vault.to_account_info(),
        to: destination.to_account_info(),
        authority: pool.to_account_info(),
    };
    let cpi_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        cpi_accounts,
        signer_seeds,
    );
    token::transfer(cpi_ctx, amount)
}

/// Moves `amount` from a caller-controlled token account. No-op for zero.
///
/// `authority` is the owner or an approved delegate of `source`.
pub fn transfer_from_user<'info>(
    token_program: &Program<'info, Token>,
    source: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    authority: &Signer<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_accounts = Transfer {
        from: source.to_account_info(),
        to: destination.to_account_info(),
        authority: authority.to_account_info(),
    };
    let cpi_ctx = CpiContext::new(token_program.to_account_info(), cpi_accounts);
    token::transfer(cpi_ctx, amount)
}

/// Native value transfer through the system program. No-op for zero.
pub fn transfer_lamports<'info>(
    system: &Program<'info, System>,
    from: &Signer<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_ctx = CpiContext::new(
        system.to_account_info(),
        system_program::Transfer {
            from: from.to_account_info(),
            to: to.clone(),
        },
    );
    system_program::transfer(cpi_ctx, amount)
}
