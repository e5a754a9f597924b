//! Admission and transfer preconditions.
//!
//! The token program would reject an unfunded transfer on its own; these
//! checks run first so callers get `InsufficientBalance` /
//! `InsufficientAllowance` instead of an opaque CPI failure.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::TokenAccount;

use crate::error::MineError;

/// Confirms that a staking mint is the LP mint of a real trading pair.
pub trait PairValidator {
    fn is_valid_pair(&self, staking_mint: &Pubkey) -> bool;
}

/// Validator backed by an AMM pair account supplied with the instruction.
///
/// A pair is valid when the account is owned by the configured AMM program
/// and stores the staking mint at `lp_mint_offset`.
pub struct PairAccountValidator<'a, 'info> {
    pub program: Option<Pubkey>,
    pub lp_mint_offset: usize,
    pub pair_account: Option<&'a AccountInfo<'info>>,
}

impl<'a, 'info> PairValidator for PairAccountValidator<'a, 'info> {
    fn is_valid_pair(&self, staking_mint: &Pubkey) -> bool {
        let (Some(program), Some(account)) = (self.program, self.pair_account) else {
            return false;
        };
        if *account.owner != program {
            return false;
        }
        let Ok(data) = account.try_borrow_data() else {
            return false;
        };
        data.get(self.lp_mint_offset..self.lp_mint_offset + 32)
            .map(|bytes| bytes == staking_mint.as_ref())
            .unwrap_or(false)
    }
}

/// The parts of a token account that decide whether `authority` may move funds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Spendable {
    pub owner: Pubkey,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
    pub amount: u64,
}

impl From<&TokenAccount> for Spendable {
    fn from(account: &TokenAccount) -> Self {
        let delegate = match account.delegate {
            COption::Some(delegate) => Some(delegate),
            COption::None => None,
        };
        Self {
            owner: account.owner,
            delegate,
            delegated_amount: account.delegated_amount,
            amount: account.amount,
        }
    }
}

impl Spendable {
    /// Balance first, then authorization: owners spend freely, delegates
    /// only up to their approved amount.
    pub fn ensure(&self, authority: &Pubkey, amount: u64) -> Result<()> {
        require!(self.amount >= amount, MineError::InsufficientBalance);
        if self.owner == *authority {
            return Ok(());
        }
        let allowance = match self.delegate {
            Some(delegate) if delegate == *authority => self.delegated_amount,
            _ => 0,
        };
        require!(allowance >= amount, MineError::InsufficientAllowance);
        Ok(())
    }
}

/// Fails with `InsufficientBalance` if `payer` cannot cover `amount` lamports.
pub fn ensure_lamports(payer: &AccountInfo, amount: u64) -> Result<()> {
    require!(payer.lamports() >= amount, MineError::InsufficientBalance);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::error_code;

    #[test]
    fn owner_spends_up_to_balance() {
        let owner = Pubkey::new_unique();
        let account = Spendable {
            owner,
            amount: 100,
            ..Spendable::default()
        };
        assert!(account.ensure(&owner, 100).is_ok());
        let err = account.ensure(&owner, 101).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::InsufficientBalance));
    }

    #[test]
    fn delegate_is_bounded_by_allowance() {
        let delegate = Pubkey::new_unique();
        let account = Spendable {
            owner: Pubkey::new_unique(),
            delegate: Some(delegate),
            delegated_amount: 40,
            amount: 100,
        };
        assert!(account.ensure(&delegate, 40).is_ok());
        let err = account.ensure(&delegate, 41).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::InsufficientAllowance));

        let stranger = Pubkey::new_unique();
        let err = account.ensure(&stranger, 1).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::InsufficientAllowance));
    }

    #[test]
    fn balance_is_reported_before_allowance() {
        let account = Spendable {
            owner: Pubkey::new_unique(),
            amount: 0,
            ..Spendable::default()
        };
        let err = account.ensure(&Pubkey::new_unique(), 10).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::InsufficientBalance));
    }

    #[test]
    fn pair_account_must_match_owner_and_mint() {
        let amm = Pubkey::new_unique();
        let lp_mint = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let mut lamports = 0u64;
        let mut data = vec![0u8; 72];
        data[8..40].copy_from_slice(lp_mint.as_ref());
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &amm, false, 0);

        let validator = PairAccountValidator {
            program: Some(amm),
            lp_mint_offset: 8,
            pair_account: Some(&info),
        };
        assert!(validator.is_valid_pair(&lp_mint));
        assert!(!validator.is_valid_pair(&Pubkey::new_unique()));

        let foreign = PairAccountValidator {
            program: Some(Pubkey::new_unique()),
            ..validator
        };
        assert!(!foreign.is_valid_pair(&lp_mint));

        let out_of_range = PairAccountValidator {
            program: Some(amm),
            lp_mint_offset: 64,
            pair_account: Some(&info),
        };
        assert!(!out_of_range.is_valid_pair(&lp_mint));

        let missing = PairAccountValidator {
            program: Some(amm),
            lp_mint_offset: 8,
            pair_account: None,
        };
        assert!(!missing.is_valid_pair(&lp_mint));
    }
}
