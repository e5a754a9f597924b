use anchor_lang::prelude::*;

use crate::math::accrued_reward;

#[account]
#[derive(Default)]
pub struct UserStake {
    pub owner: Pubkey,
    pub pool: Pubkey,

    pub staked_amount: u64,
    /// `staked_amount * acc_reward_per_share / SCALE` at the last interaction.
    pub reward_debt: u128,
    pub total_harvested: u64,

    pub bump: u8,
}

impl UserStake {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 16 + 8 + 1;

    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn sync_reward_debt(&mut self, acc_reward_per_share: u128) -> Result<()> {
        self.reward_debt = accrued_reward(self.staked_amount, acc_reward_per_share)?;
        Ok(())
    }
}
