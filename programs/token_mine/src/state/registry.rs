use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::MineError;
use crate::math::emission_rate;
use crate::validation::PairValidator;

/// Monotonic counter driving accrual.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EpochUnit {
    /// Clock slot height.
    #[default]
    Slot,
    /// Clock unix timestamp in seconds.
    Timestamp,
}

impl EpochUnit {
    pub fn now(&self, clock: &Clock) -> u64 {
        match self {
            EpochUnit::Slot => clock.slot,
            EpochUnit::Timestamp => clock.unix_timestamp.max(0) as u64,
        }
    }

    pub fn current(&self) -> Result<u64> {
        let clock = Clock::get()?;
        Ok(self.now(&clock))
    }
}

/// Parameters supplied by the caller of `deploy`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct DeployParams {
    pub name: String,
    pub start_epoch: u64,
    pub end_epoch: u64,
    pub reward_amount: u64,
    pub staking_is_pair: bool,
    pub deposit_fee: Option<u64>,
}

/// Mint and owner of a token account offered for the deployment fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
}

/// How a deployment fee is collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeRoute {
    Free,
    Lamports(u64),
    Token { mint: Pubkey, amount: u64 },
}

#[account]
#[derive(Default)]
pub struct Registry {
    pub admin: Pubkey,

    pub fee: u64,
    /// `None` charges `fee` in lamports, `Some(mint)` in that SPL token.
    pub fee_mint: Option<Pubkey>,
    pub fee_recipient: Pubkey,

    pub max_start_delay: u64,

    /// AMM program owning valid pair accounts.
    pub pair_validator: Option<Pubkey>,
    /// Byte offset of the LP mint inside a pair account.
    pub pair_lp_mint_offset: u16,

    pub epoch_unit: EpochUnit,
    pub deployment_count: u64,

    pub bump: u8,
}

impl Registry {
    pub const LEN: usize = 8
        + 32
        + 8
        + (1 + 32)
        + 32
        + 8
        + (1 + 32)
        + 2
        + 1
        + 8
        + 1;

    /// Runs the admission checks for a new pool and returns its emission rate.
    ///
    /// Checks run in a fixed order so callers see the same failure for the
    /// same input: start delay, pair validity, then window sanity.
    pub fn admit(
        &self,
        now: u64,
        params: &DeployParams,
        staking_mint: &Pubkey,
        validator: &dyn PairValidator,
    ) -> Result<u64> {
        let latest_start = now
            .checked_add(self.max_start_delay)
            .ok_or(MineError::MathOverflow)?;
        require!(
            params.start_epoch <= latest_start,
            MineError::GenesisTooLate
        );

        if params.staking_is_pair {
            require!(
                self.pair_validator.is_some() && validator.is_valid_pair(staking_mint),
                MineError::InvalidPair
            );
        }

        require!(params.name.len() <= MAX_NAME_LEN, MineError::NameTooLong);
        require!(params.reward_amount > 0, MineError::ZeroAmount);

        emission_rate(params.reward_amount, params.start_epoch, params.end_epoch)
    }

    /// Decides how the deployment fee is paid given the offered token accounts.
    ///
    /// Token accounts are only inspected when a fee mint is configured.
    pub fn fee_route(
        &self,
        payer: Option<FeeAccount>,
        recipient: Option<FeeAccount>,
    ) -> Result<FeeRoute> {
        if self.fee == 0 {
            return Ok(FeeRoute::Free);
        }
        let Some(mint) = self.fee_mint else {
            return Ok(FeeRoute::Lamports(self.fee));
        };

        let payer = payer.ok_or(MineError::MissingFeeAccount)?;
        let recipient = recipient.ok_or(MineError::MissingFeeAccount)?;
        require_keys_eq!(payer.mint, mint, MineError::MintMismatch);
        require_keys_eq!(recipient.mint, mint, MineError::MintMismatch);
        require_keys_eq!(
            recipient.owner,
            self.fee_recipient,
            MineError::FeeRecipientMismatch
        );

        Ok(FeeRoute::Token {
            mint,
            amount: self.fee,
        })
    }

    /// Consumes the next deployment index. Indices are never reused.
    pub fn next_deployment_index(&mut self) -> Result<u64> {
        let index = self.deployment_count;
        self.deployment_count = index.checked_add(1).ok_or(MineError::MathOverflow)?;
        Ok(index)
    }
}
