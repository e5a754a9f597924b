//! Error types for the Token Mine program.
//!
//! Every failure aborts the whole transaction; nothing is partially
//! committed.
//!
//! ## Error Groups
//! - 6000-6002: Authorization errors
//! - 6003-6007: Admission (deploy) errors
//! - 6008-6013: Balance and fee errors
//! - 6014-6015: Pool lifecycle errors
//! - 6016-6018: Account validation errors
//! - 6019: Math errors

use anchor_lang::prelude::*;

/// Custom error codes for the Token Mine program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum MineError {
    // ========== Authorization Errors ==========

    /// [6000] Caller is not the registry admin.
    #[msg("Caller is not the registry admin")]
    NotAdmin,

    /// [6001] Caller is not the pool owner.
    #[msg("Caller is not the pool owner")]
    NotOwner,

    /// [6002] The new admin cannot be the default key.
    #[msg("Admin cannot be the default pubkey")]
    InvalidAdmin,

    // ========== Admission Errors ==========

    /// [6003] Pool start is further away than the registry allows.
    #[msg("Deploy: genesis too late")]
    GenesisTooLate,

    /// [6004] Staking mint is flagged as a pair asset but the validator rejected it.
    #[msg("Staking asset is not a valid pair")]
    InvalidPair,

    /// [6005] End epoch must be strictly after the start epoch.
    #[msg("End epoch must be after start epoch")]
    InvalidWindow,

    /// [6006] Reward funding must be non-zero.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// [6007] Pool name is longer than MAX_NAME_LEN bytes.
    #[msg("Pool name is too long")]
    NameTooLong,

    // ========== Balance / Fee Errors ==========

    /// [6008] Source account does not hold enough tokens or lamports.
    #[msg("Insufficient balance")]
    InsufficientBalance,

    /// [6009] Signer is neither owner nor an approved delegate for the amount.
    #[msg("Insufficient allowance")]
    InsufficientAllowance,

    /// [6010] Attached deposit fee differs from the pool's configured fee.
    #[msg("Attached fee does not match the deposit fee")]
    FeeMismatch,

    /// [6011] Withdraw amount exceeds the caller's stake.
    #[msg("Withdraw amount exceeds staked balance")]
    InsufficientStake,

    /// [6012] Fee token accounts are required when the fee is paid in tokens.
    #[msg("Fee token accounts missing")]
    MissingFeeAccount,

    /// [6013] Fee destination does not match the registry fee recipient.
    #[msg("Fee recipient mismatch")]
    FeeRecipientMismatch,

    // ========== Lifecycle Errors ==========

    /// [6014] Reclaim attempted before the (possibly extended) end epoch.
    #[msg("Mining is not over yet")]
    MiningNotOver,

    /// [6015] Reclaim already performed for this pool.
    #[msg("Pool has already been reclaimed")]
    AlreadyReclaimed,

    // ========== Account Validation Errors ==========

    /// [6016] Token account mint does not match the pool asset.
    #[msg("Token mint mismatch")]
    MintMismatch,

    /// [6017] Vault does not belong to this pool.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6018] User stake account does not belong to this pool or signer.
    #[msg("User stake account mismatch")]
    StakeAccountMismatch,

    // ========== Math Errors ==========

    /// [6019] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,
}
