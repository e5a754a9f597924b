//! Fixed-point helpers for reward accrual.
//!
//! All quantities are integers. Per-share values are scaled by [`SCALE`]
//! and every division floors, so rounding always favours the pool: the
//! remainder stays in custody and is only released by `owner_reclaim`.

use anchor_lang::prelude::*;

use crate::constants::SCALE;
use crate::error::MineError;

#[allow(clippy::assign_op_pattern, clippy::manual_range_contains, clippy::ptr_offset_with_cast)]
mod wide {
    uint::construct_uint! {
        /// 256-bit intermediate for products of two 128-bit values.
        pub struct U256(4);
    }
}

use wide::U256;

/// `floor(a * b / denominator)` with a 256-bit intermediate product.
///
/// Fails if the denominator is zero or the quotient exceeds `u128`.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    require!(denominator > 0, MineError::MathOverflow);
    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(MineError::MathOverflow)?;
    let quotient = product / U256::from(denominator);
    u128::try_from(quotient).map_err(|_| error!(MineError::MathOverflow))
}

/// Reward emitted per epoch: `floor(reward_amount / (end_epoch - start_epoch))`.
pub fn emission_rate(reward_amount: u64, start_epoch: u64, end_epoch: u64) -> Result<u64> {
    require!(end_epoch > start_epoch, MineError::InvalidWindow);
    let span = end_epoch - start_epoch;
    Ok(reward_amount / span)
}

/// Rounding dust left by [`emission_rate`] over the original span.
pub fn emission_dust(reward_amount: u64, rate: u64, span: u64) -> Result<u64> {
    let emitted = rate.checked_mul(span).ok_or(MineError::MathOverflow)?;
    reward_amount
        .checked_sub(emitted)
        .ok_or_else(|| error!(MineError::MathOverflow))
}

/// Increase in `acc_reward_per_share` when `reward` is spread over `total_staked`.
pub fn per_share_increment(reward: u64, total_staked: u64) -> Result<u128> {
    mul_div(reward as u128, SCALE, total_staked as u128)
}

/// Reward attributable to `staked` units at accumulator value `acc`, floored.
pub fn accrued_reward(staked: u64, acc: u128) -> Result<u128> {
    mul_div(staked as u128, acc, SCALE)
}

/// Pending reward for a position: `accrued - reward_debt`, clamped at zero.
pub fn pending_reward(staked: u64, acc: u128, reward_debt: u128) -> Result<u64> {
    let accrued = accrued_reward(staked, acc)?;
    let pending = accrued.saturating_sub(reward_debt);
    u64::try_from(pending).map_err(|_| error!(MineError::MathOverflow))
}
