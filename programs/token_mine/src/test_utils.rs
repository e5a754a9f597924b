use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::validation::PairValidator;

/// Custom error code carried by an Anchor error.
pub fn error_code(err: Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        Error::ProgramError(e) => panic!("expected an anchor error, got {e:?}"),
    }
}

/// Pair validator that accepts at most one LP mint.
pub struct FakeValidator {
    valid: Option<Pubkey>,
}

impl FakeValidator {
    pub fn accepting(lp_mint: Pubkey) -> Self {
        Self { valid: Some(lp_mint) }
    }

    pub fn rejecting() -> Self {
        Self { valid: None }
    }
}

impl PairValidator for FakeValidator {
    fn is_valid_pair(&self, staking_mint: &Pubkey) -> bool {
        self.valid.as_ref() == Some(staking_mint)
    }
}
