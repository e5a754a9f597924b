use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::MineError;
use crate::math::{self, per_share_increment};
use crate::state::{DeployParams, EpochUnit, UserStake};

/// One reward campaign.
///
/// Identity fields are fixed at deploy time. The accrual fields follow the
/// reward-per-share model: `acc_reward_per_share` only grows, and each
/// position stores the share already credited to it as `reward_debt`.
#[account]
#[derive(Default)]
pub struct Pool {
    pub registry: Pubkey,
    pub owner: Pubkey,
    pub index: u64,
    pub name: String,

    pub staking_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub staking_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub staking_is_pair: bool,

    pub epoch_unit: EpochUnit,
    pub start_epoch: u64,
    /// Pushed out by every zero-stake gap.
    pub end_epoch: u64,
    /// End epoch as deployed, before any idle extension.
    pub original_end_epoch: u64,
    pub emission_rate: u64,
    /// Reward moved into the vault at deploy time.
    pub total_reward_funded: u64,

    pub last_checkpoint_epoch: u64,
    pub acc_reward_per_share: u128,
    pub total_staked: u64,
    pub cumulative_emitted: u64,
    pub total_harvested: u64,

    pub deposit_fee: Option<u64>,
    pub reclaimed: bool,

    pub bump: u8,
    pub staking_vault_bump: u8,
    pub reward_vault_bump: u8,
}

impl Pool {
    pub const LEN: usize = 8
        + (32 * 2)
        + 8
        + (4 + MAX_NAME_LEN)
        + (32 * 4)
        + 1
        + 1
        + (8 * 5)
        + 8
        + 16
        + (8 * 3)
        + (1 + 8)
        + 1
        + 3;

    /// Sets the campaign window and zeroes the accrual state.
    pub fn launch(&mut self, params: &DeployParams, emission_rate: u64) {
        self.name = params.name.clone();
        self.staking_is_pair = params.staking_is_pair;
        self.start_epoch = params.start_epoch;
        self.end_epoch = params.end_epoch;
        self.original_end_epoch = params.end_epoch;
        self.emission_rate = emission_rate;
        self.total_reward_funded = params.reward_amount;
        self.last_checkpoint_epoch = params.start_epoch;
        self.acc_reward_per_share = 0;
        self.total_staked = 0;
        self.cumulative_emitted = 0;
        self.total_harvested = 0;
        self.deposit_fee = params.deposit_fee;
        self.reclaimed = false;
    }

    /// Brings the accumulator up to `now`.
    ///
    /// While nothing is staked no reward is emitted; instead the end epoch
    /// moves out by the idle span so the number of rewarded epochs stays
    /// `original_end_epoch - start_epoch`. Once reclaimed the pool is frozen.
    pub fn checkpoint(&mut self, now: u64) -> Result<()> {
        if self.reclaimed {
            return Ok(());
        }
        if self.total_staked == 0 {
            self.extend_idle(now)
        } else {
            self.accrue(now)
        }
    }

    fn extend_idle(&mut self, now: u64) -> Result<()> {
        // remaining span (end - last) is preserved; nothing left once last reaches end
        if now <= self.last_checkpoint_epoch || self.last_checkpoint_epoch >= self.end_epoch {
            return Ok(());
        }
        let idle = now - self.last_checkpoint_epoch;
        self.end_epoch = self
            .end_epoch
            .checked_add(idle)
            .ok_or(MineError::MathOverflow)?;
        self.last_checkpoint_epoch = now;
        Ok(())
    }

    fn accrue(&mut self, now: u64) -> Result<()> {
        let cur = now.min(self.end_epoch);
        if cur <= self.last_checkpoint_epoch {
            return Ok(());
        }
        let reward = self.emission_since_checkpoint(cur)?;
        self.acc_reward_per_share = self
            .acc_reward_per_share
            .checked_add(per_share_increment(reward, self.total_staked)?)
            .ok_or(MineError::MathOverflow)?;
        self.cumulative_emitted = self
            .cumulative_emitted
            .checked_add(reward)
            .ok_or(MineError::MathOverflow)?;
        self.last_checkpoint_epoch = cur;
        Ok(())
    }

    fn emission_since_checkpoint(&self, cur: u64) -> Result<u64> {
        let elapsed = cur - self.last_checkpoint_epoch;
        self.emission_rate
            .checked_mul(elapsed)
            .ok_or_else(|| error!(MineError::MathOverflow))
    }

    /// Accumulator value a checkpoint at `now` would produce, without mutating.
    pub fn simulated_acc_reward_per_share(&self, now: u64) -> Result<u128> {
        let cur = now.min(self.end_epoch);
        if self.reclaimed || self.total_staked == 0 || cur <= self.last_checkpoint_epoch {
            return Ok(self.acc_reward_per_share);
        }
        let reward = self.emission_since_checkpoint(cur)?;
        self.acc_reward_per_share
            .checked_add(per_share_increment(reward, self.total_staked)?)
            .ok_or_else(|| error!(MineError::MathOverflow))
    }

    /// Reward `user` could harvest at `now`. Read-only.
    pub fn pending_reward(&self, user: &UserStake, now: u64) -> Result<u64> {
        let acc = self.simulated_acc_reward_per_share(now)?;
        math::pending_reward(user.staked_amount, acc, user.reward_debt)
    }

    /// Lamports owed to the owner for a deposit of `amount`.
    ///
    /// Zero-amount deposits are harvests and carry no fee.
    pub fn deposit_fee_due(&self, amount: u64, attached_fee: u64) -> Result<u64> {
        let due = match self.deposit_fee {
            Some(fee) if amount > 0 => fee,
            _ => 0,
        };
        require!(attached_fee == due, MineError::FeeMismatch);
        Ok(due)
    }

    /// Credits `user` with everything pending at the current accumulator.
    fn harvest(&mut self, user: &mut UserStake) -> Result<u64> {
        if user.staked_amount == 0 {
            return Ok(0);
        }
        let pending = math::pending_reward(
            user.staked_amount,
            self.acc_reward_per_share,
            user.reward_debt,
        )?;
        if pending > 0 {
            user.total_harvested = user
                .total_harvested
                .checked_add(pending)
                .ok_or(MineError::MathOverflow)?;
            self.total_harvested = self
                .total_harvested
                .checked_add(pending)
                .ok_or(MineError::MathOverflow)?;
        }
        Ok(pending)
    }

    /// Checkpoints, harvests, then adds `amount` to the position.
    /// Returns the reward to pay out.
    pub fn deposit(&mut self, user: &mut UserStake, amount: u64, now: u64) -> Result<u64> {
        self.checkpoint(now)?;
        let harvested = self.harvest(user)?;

        user.staked_amount = user
            .staked_amount
            .checked_add(amount)
            .ok_or(MineError::MathOverflow)?;
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(MineError::MathOverflow)?;
        user.sync_reward_debt(self.acc_reward_per_share)?;

        Ok(harvested)
    }

    /// Checkpoints, harvests, then removes `amount` from the position.
    /// Returns the reward to pay out.
    pub fn withdraw(&mut self, user: &mut UserStake, amount: u64, now: u64) -> Result<u64> {
        require!(
            amount <= user.staked_amount,
            MineError::InsufficientStake
        );

        self.checkpoint(now)?;
        let harvested = self.harvest(user)?;

        user.staked_amount -= amount;
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(MineError::MathOverflow)?;
        user.sync_reward_debt(self.acc_reward_per_share)?;

        Ok(harvested)
    }

    /// Drops the whole position without accruing. Pending reward is forfeited.
    /// Returns the stake to hand back.
    pub fn emergency_withdraw(&mut self, user: &mut UserStake) -> Result<u64> {
        let amount = user.staked_amount;
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(MineError::MathOverflow)?;
        user.staked_amount = 0;
        user.reward_debt = 0;
        Ok(amount)
    }

    /// Reward emitted into the accumulator but not yet paid out.
    pub fn outstanding_rewards(&self) -> Result<u64> {
        self.cumulative_emitted
            .checked_sub(self.total_harvested)
            .ok_or_else(|| error!(MineError::MathOverflow))
    }

    /// Closes the campaign and returns what the owner may take back from
    /// a reward vault holding `reward_vault_balance`.
    pub fn reclaim(&mut self, caller: &Pubkey, reward_vault_balance: u64, now: u64) -> Result<u64> {
        require!(now >= self.end_epoch, MineError::MiningNotOver);
        require_keys_eq!(*caller, self.owner, MineError::NotOwner);
        require!(!self.reclaimed, MineError::AlreadyReclaimed);

        // final accrual only; an idle pool is not extended on close
        if self.total_staked > 0 {
            self.accrue(now)?;
        }

        let unallocated = reward_vault_balance.saturating_sub(self.outstanding_rewards()?);
        self.reclaimed = true;
        Ok(unallocated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::emission_rate;
    use crate::test_utils::error_code;

    /// Pool plus a simulated reward vault balance.
    struct Harness {
        pool: Pool,
        vault: u64,
    }

    impl Harness {
        fn new(start: u64, end: u64, reward: u64) -> Self {
            let params = DeployParams {
                name: "TokenFarm".to_string(),
                start_epoch: start,
                end_epoch: end,
                reward_amount: reward,
                staking_is_pair: false,
                deposit_fee: Some(1_000_000_000),
            };
            let mut pool = Pool {
                owner: Pubkey::new_unique(),
                ..Pool::default()
            };
            pool.launch(&params, emission_rate(reward, start, end).unwrap());
            Self { pool, vault: reward }
        }

        fn deposit(&mut self, user: &mut UserStake, amount: u64, now: u64) -> u64 {
            let paid = self.pool.deposit(user, amount, now).unwrap();
            self.vault -= paid;
            paid
        }

        fn withdraw(&mut self, user: &mut UserStake, amount: u64, now: u64) -> u64 {
            let paid = self.pool.withdraw(user, amount, now).unwrap();
            self.vault -= paid;
            paid
        }
    }

    fn staker() -> UserStake {
        UserStake {
            owner: Pubkey::new_unique(),
            ..UserStake::default()
        }
    }

    #[test]
    fn test_pool_len() {
        let pool = Pool {
            name: "x".repeat(MAX_NAME_LEN),
            deposit_fee: Some(1),
            ..Pool::default()
        };
        assert_eq!(pool.try_to_vec().unwrap().len() + 8, Pool::LEN);
    }

    #[test]
    fn launch_sets_initial_accrual_state() {
        let h = Harness::new(100, 600, 1_000_000);
        assert_eq!(h.pool.emission_rate, 2_000);
        assert_eq!(h.pool.last_checkpoint_epoch, 100);
        assert_eq!(h.pool.end_epoch, 600);
        assert_eq!(h.pool.acc_reward_per_share, 0);
        assert!(!h.pool.reclaimed);
    }

    #[test]
    fn rewards_only_flow_after_start() {
        let mut h = Harness::new(100, 1_100, 100_000);
        let mut bob = staker();

        assert_eq!(h.deposit(&mut bob, 100, 10), 0);
        assert_eq!(h.deposit(&mut bob, 0, 90), 0);
        assert_eq!(h.pool.pending_reward(&bob, 90).unwrap(), 0);
        assert_eq!(h.pool.pending_reward(&bob, 99).unwrap(), 0);
        assert_eq!(h.deposit(&mut bob, 0, 100), 0);

        assert_eq!(h.deposit(&mut bob, 0, 101), 100);
        assert_eq!(h.pool.cumulative_emitted, 100);
        assert_eq!(h.deposit(&mut bob, 0, 105), 400);
        assert_eq!(bob.total_harvested, 500);
        assert_eq!(h.pool.cumulative_emitted, 500);
        assert_eq!(h.pool.total_staked, 100);
    }

    #[test]
    fn pending_is_side_effect_free() {
        let mut h = Harness::new(0, 100, 10_000);
        let mut bob = staker();
        h.deposit(&mut bob, 10, 0);
        let before = h.pool.acc_reward_per_share;
        assert_eq!(h.pool.pending_reward(&bob, 7).unwrap(), 700);
        assert_eq!(h.pool.acc_reward_per_share, before);
        assert_eq!(h.pool.last_checkpoint_epoch, 0);
    }

    #[test]
    fn no_emission_without_stakers() {
        let mut h = Harness::new(100, 1_100, 100_000);
        let mut bob = staker();

        h.pool.checkpoint(104).unwrap();
        assert_eq!(h.pool.cumulative_emitted, 0);
        assert_eq!(h.pool.pending_reward(&bob, 104).unwrap(), 0);

        h.deposit(&mut bob, 100, 110);
        assert_eq!(h.pool.cumulative_emitted, 0);
        assert_eq!(h.pool.end_epoch, 1_110);

        assert_eq!(h.withdraw(&mut bob, 90, 120), 1_000);
        assert_eq!(h.pool.cumulative_emitted, 1_000);
        assert_eq!(h.vault, 99_000);
        assert_eq!(bob.staked_amount, 10);
    }

    #[test]
    fn stakers_share_proportionally() {
        let mut h = Harness::new(100, 1_100, 1_000_000);
        let (mut dev, mut bob, mut carol) = (staker(), staker(), staker());

        h.deposit(&mut dev, 10, 110);
        h.deposit(&mut bob, 20, 114);
        h.deposit(&mut carol, 30, 118);

        // 4*1000 + 4*1/3*1000 + 2*1/6*1000
        assert_eq!(h.deposit(&mut dev, 10, 120), 5_666);
        assert_eq!(h.pool.cumulative_emitted, 10_000);
        assert_eq!(h.vault, 1_000_000 - 5_666);

        // 4*2/3*1000 + 2*2/6*1000 + 10*2/7*1000
        assert_eq!(h.withdraw(&mut bob, 10, 130), 6_190);
        assert_eq!(h.pool.cumulative_emitted, 20_000);
        assert_eq!(h.pool.pending_reward(&carol, 130).unwrap(), 5_286);
        assert_eq!(h.pool.pending_reward(&dev, 130).unwrap(), 2_857);

        h.withdraw(&mut dev, 20, 140);
        h.withdraw(&mut bob, 10, 150);
        h.withdraw(&mut carol, 30, 160);
        assert_eq!(h.pool.cumulative_emitted, 50_000);
        assert_eq!(dev.total_harvested, 11_856);
        assert_eq!(bob.total_harvested, 10_356);
        assert_eq!(carol.total_harvested, 27_786);
        assert_eq!(h.pool.total_staked, 0);
    }

    #[test]
    fn emission_stops_at_end_epoch() {
        let mut h = Harness::new(100, 110, 10_000);
        let mut bob = staker();

        h.deposit(&mut bob, 10, 100);
        assert_eq!(h.pool.pending_reward(&bob, 105).unwrap(), 5_000);
        assert_eq!(h.deposit(&mut bob, 0, 110), 10_000);
        assert_eq!(h.vault, 0);

        assert_eq!(h.deposit(&mut bob, 0, 120), 0);
        assert_eq!(h.pool.pending_reward(&bob, 125).unwrap(), 0);
        assert_eq!(h.withdraw(&mut bob, 10, 130), 0);
        assert_eq!(h.pool.cumulative_emitted, 10_000);
        assert_eq!(h.pool.last_checkpoint_epoch, 110);
    }

    #[test]
    fn idle_gaps_extend_the_window() {
        let mut h = Harness::new(100, 130, 10_000);
        let mut bob = staker();
        assert_eq!(h.pool.emission_rate, 333);

        h.deposit(&mut bob, 10, 105);
        assert_eq!(h.pool.end_epoch, 135);
        assert_eq!(h.pool.pending_reward(&bob, 110).unwrap(), 1_665);

        assert_eq!(h.withdraw(&mut bob, 10, 120), 4_995);
        assert_eq!(h.vault, 10_000 - 4_995);

        // gap of 20 crosses the old end epoch
        h.deposit(&mut bob, 10, 140);
        assert_eq!(h.pool.end_epoch, 155);
        h.withdraw(&mut bob, 10, 154);
        assert_eq!(bob.total_harvested, 9_657);
        assert_eq!(h.vault, 343);

        h.deposit(&mut bob, 10, 155);
        assert_eq!(h.pool.end_epoch, 156);
        h.withdraw(&mut bob, 10, 160);
        assert_eq!(bob.total_harvested, 9_990);
        assert_eq!(h.vault, 10);

        // campaign exhausted: no further extension
        h.deposit(&mut bob, 10, 170);
        assert_eq!(h.pool.end_epoch, 156);
        assert_eq!(h.pool.pending_reward(&bob, 179).unwrap(), 0);
        h.withdraw(&mut bob, 10, 180);
        assert_eq!(h.pool.end_epoch, 156);
        assert_eq!(h.pool.cumulative_emitted, 9_990);
        assert!(h.pool.cumulative_emitted <= h.pool.total_reward_funded);
    }

    #[test]
    fn idle_extension_sums_gaps() {
        let mut h = Harness::new(0, 100, 1_000);
        let mut bob = staker();
        let mut gaps = 0;

        h.deposit(&mut bob, 1, 7);
        gaps += 7;
        h.withdraw(&mut bob, 1, 20);
        h.deposit(&mut bob, 1, 33);
        gaps += 13;
        h.withdraw(&mut bob, 1, 50);
        h.deposit(&mut bob, 1, 51);
        gaps += 1;

        assert_eq!(h.pool.end_epoch, 100 + gaps);
    }

    #[test]
    fn withdraw_more_than_staked_fails() {
        let mut h = Harness::new(0, 100, 1_000);
        let mut bob = staker();
        h.deposit(&mut bob, 5, 1);
        let err = h.pool.withdraw(&mut bob, 6, 2).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::InsufficientStake));
        // rejected before any checkpoint
        assert_eq!(h.pool.last_checkpoint_epoch, 1);
    }

    #[test]
    fn emergency_withdraw_forfeits_pending() {
        let mut h = Harness::new(0, 100, 10_000);
        let mut bob = staker();
        let mut carol = staker();
        h.deposit(&mut bob, 10, 0);
        h.deposit(&mut carol, 10, 0);

        assert_eq!(h.pool.pending_reward(&bob, 10).unwrap(), 500);
        assert_eq!(h.pool.emergency_withdraw(&mut bob).unwrap(), 10);
        assert_eq!(h.pool.pending_reward(&bob, 10).unwrap(), 0);
        assert_eq!(bob.reward_debt, 0);
        assert_eq!(h.pool.total_staked, 10);

        // re-entry starts from the current accumulator
        h.deposit(&mut bob, 10, 20);
        assert_eq!(bob.reward_debt, 10 * h.pool.acc_reward_per_share / crate::constants::SCALE);
        assert_eq!(h.pool.pending_reward(&bob, 20).unwrap(), 0);
        assert_eq!(h.pool.pending_reward(&bob, 22).unwrap(), 100);
    }

    #[test]
    fn deposit_fee_is_exact_and_only_for_stake() {
        let h = Harness::new(0, 100, 1_000);
        assert_eq!(h.pool.deposit_fee_due(10, 1_000_000_000).unwrap(), 1_000_000_000);
        assert_eq!(h.pool.deposit_fee_due(0, 0).unwrap(), 0);

        let err = h.pool.deposit_fee_due(10, 1).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::FeeMismatch));
        let err = h.pool.deposit_fee_due(0, 1_000_000_000).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::FeeMismatch));

        let free = Pool::default();
        assert_eq!(free.deposit_fee_due(10, 0).unwrap(), 0);
        assert!(free.deposit_fee_due(10, 5).is_err());
    }

    #[test]
    fn reclaim_returns_rounding_dust() {
        let mut h = Harness::new(100, 130, 10_000);
        let mut bob = staker();
        h.deposit(&mut bob, 10, 90);

        let owner = h.pool.owner;
        let dust = h.pool.reclaim(&owner, h.vault, 130).unwrap();
        assert_eq!(dust, 10_000 - 333 * 30);
        assert!(h.pool.reclaimed);
        assert_eq!(h.pool.cumulative_emitted, 9_990);

        // staker can still collect the full emission afterwards
        h.vault -= dust;
        assert_eq!(h.withdraw(&mut bob, 10, 200), 9_990);
        assert_eq!(h.vault, 0);
    }

    #[test]
    fn reclaim_after_harvests_keeps_outstanding_rewards() {
        let mut h = Harness::new(0, 30, 10_000);
        let (mut bob, mut carol) = (staker(), staker());
        h.deposit(&mut bob, 10, 0);
        h.deposit(&mut carol, 10, 0);
        h.withdraw(&mut bob, 10, 10);

        let owner = h.pool.owner;
        let unallocated = h.pool.reclaim(&owner, h.vault, 40).unwrap();
        let outstanding = h.pool.outstanding_rewards().unwrap();
        assert_eq!(unallocated + outstanding, h.vault);
        assert_eq!(unallocated, 10);
    }

    #[test]
    fn reclaim_guards_run_in_order() {
        let mut h = Harness::new(0, 30, 10_000);
        let owner = h.pool.owner;
        let stranger = Pubkey::new_unique();

        let err = h.pool.reclaim(&stranger, h.vault, 29).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::MiningNotOver));

        let err = h.pool.reclaim(&stranger, h.vault, 30).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::NotOwner));

        assert_eq!(h.pool.reclaim(&owner, h.vault, 30).unwrap(), 10_000);
        let err = h.pool.reclaim(&owner, 0, 31).unwrap_err();
        assert_eq!(error_code(err), u32::from(MineError::AlreadyReclaimed));
    }

    #[test]
    fn reclaimed_pool_stops_accruing() {
        let mut h = Harness::new(0, 30, 10_000);
        let owner = h.pool.owner;
        h.pool.reclaim(&owner, h.vault, 30).unwrap();

        let mut bob = staker();
        h.deposit(&mut bob, 10, 40);
        assert_eq!(h.pool.end_epoch, 30);
        assert_eq!(h.pool.pending_reward(&bob, 90).unwrap(), 0);
        assert_eq!(h.withdraw(&mut bob, 10, 90), 0);
        assert_eq!(bob.staked_amount, 0);
    }

    #[test]
    fn large_deposit_after_single_unit_staker() {
        let mut h = Harness::new(0, 1_000_000, 1_000_000_000_000_000);
        assert_eq!(h.pool.emission_rate, 1_000_000_000);

        let mut dust = staker();
        let mut whale = staker();
        h.deposit(&mut dust, 1, 0);
        h.deposit(&mut whale, 100_000_000_000_000, 10_000);
        assert_eq!(h.pool.acc_reward_per_share, 10_000_000_000_000_000_000_000_000);
        assert_eq!(whale.reward_debt, 1_000_000_000_000_000_000_000_000_000);

        assert_eq!(h.pool.pending_reward(&dust, 10_010).unwrap(), 10_000_000_000_000);
        assert_eq!(h.pool.pending_reward(&whale, 10_010).unwrap(), 9_999_999_900);
        assert_eq!(h.withdraw(&mut whale, 100_000_000_000_000, 10_010), 9_999_999_900);
        assert_eq!(h.pool.total_staked, 1);
    }
}
