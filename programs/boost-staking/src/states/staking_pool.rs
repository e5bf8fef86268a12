use crate::error::ErrorCode;
use crate::math::*;
use crate::states::Position;
use crate::utils::{Custody, Outbox};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// StakingPool Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive a pool: `STAKING_POOL_SEED + creator + pool_id`.
pub const STAKING_POOL_SEED: &str = "staking_pool";
/// PDA seed string for the vault holding locked principal.
pub const LOCK_VAULT_SEED: &str = "lock_vault";
/// PDA seed string for the vault holding pool rewards.
pub const REWARD_VAULT_SEED: &str = "reward_vault";

/// Global accrual state of one staking pool.
///
/// Rewards stream at `farming_speed` tokens per day and are shared pro rata
/// by locked value. Instead of touching every position on every tick, the pool
/// keeps a cumulative reward-per-locked-unit accumulator (scaled by 1e38);
/// a position is owed `locked_value * (accumulator - snapshot) / 1e38`.
///
/// Every operation that changes `total_locked`, `farming_speed` or
/// `rewards_remaining` calls [`StakingPool::accrue`] first.
#[account]
#[derive(Default, Debug)]
pub struct StakingPool {
    /// PDA bump for this account.
    pub bump: u8,

    /// Creator-chosen discriminator so one creator can run several pools.
    pub pool_id: u64,

    /// Pool creator; funds rewards, creates boosts, tunes parameters.
    pub creator: Pubkey,

    /// Mint of the token being staked.
    pub lock_mint: Pubkey,

    /// Mint rewards are paid in.
    pub reward_mint: Pubkey,

    /// Program-owned vault holding all locked principal.
    pub lock_vault: Pubkey,

    /// Program-owned vault holding undistributed and unclaimed rewards.
    pub reward_vault: Pubkey,

    /// Wallet receiving the commission on reward funding.
    pub commission_wallet: Pubkey,

    /// Sum of the locked value of all active positions (TVL).
    pub total_locked: u64,

    /// Cumulative reward per locked unit, scaled by 1e38. Never decreases.
    pub reward_accumulator: FixedPoint,

    /// Current emission rate in reward base units per day.
    pub farming_speed: u128,

    /// Reward balance held in custody (accrued-but-unclaimed included).
    pub rewards_remaining: u64,

    /// Upper bound of rewards already streamed into the accumulator but not
    /// yet claimed. Excluded when the farming speed is recomputed.
    pub rewards_committed: u64,

    /// Last time the accumulator was brought up to date.
    pub last_update_time: i64,

    /// Minimum lock period for new positions, in seconds.
    pub min_lock_duration: u64,

    /// Minimum locked value for new positions.
    pub minimum_deposit: u64,

    /// Commission numerator over `COMMISSION_DIVIDER`.
    pub commission_factor: u16,

    pub pool_start_time: i64,
    pub pool_end_time: i64,

    /// Index handed to the next position.
    pub next_position_index: u64,

    /// Index handed to the next boost campaign.
    pub next_campaign_index: u64,

    /// Gross rewards ever funded (commission included).
    pub total_funded: u64,

    /// Commission ever forwarded.
    pub total_commission: u64,

    /// Rewards ever paid out to positions.
    pub total_claimed: u64,
}

/// Creator-supplied pool parameters.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolParams {
    pub min_lock_duration: u64,
    pub minimum_deposit: u64,
    pub start_time: i64,
    pub end_time: i64,
}

/// Result of a reward funding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FundingReceipt {
    pub commission: u64,
    pub credited: u64,
}

/// Result of a withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub rewards: u64,
    pub principal: u64,
}

/// A stake about to be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeRequest {
    pub owner: Pubkey,
    pub amount: u64,
    pub lock_period: u64,
    pub transferable: bool,
}

impl StakingPool {
    /// Fixed serialized size of the account.
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 8: pool id
    /// - 32 * 6: six Pubkeys
    /// - FixedPoint: accumulator
    /// - 16: farming speed
    /// - 8 * 13: u64 / i64 fields
    /// - 2: commission factor
    pub const LEN: usize = 8 + 1 + 8 + 32 * 6 + FixedPoint::LEN + 16 + 8 * 13 + 2;

    /// Validates and writes the numeric parameters of a fresh pool.
    pub fn open(&mut self, params: &PoolParams, commission_factor: u16, now: i64) -> Result<()> {
        require!(
            u64::from(commission_factor) <= COMMISSION_DIVIDER,
            ErrorCode::InvalidCommissionFactor
        );
        require!(params.minimum_deposit > 0, ErrorCode::InvalidAmount);
        require!(params.start_time < params.end_time, ErrorCode::InvalidTimestamp);
        require!(params.end_time > now, ErrorCode::InvalidTimestamp);

        self.min_lock_duration = params.min_lock_duration;
        self.minimum_deposit = params.minimum_deposit;
        self.pool_start_time = params.start_time;
        self.pool_end_time = params.end_time;
        self.commission_factor = commission_factor;
        self.last_update_time = now;
        self.reward_accumulator = FixedPoint::ZERO;
        Ok(())
    }

    /// Seconds of the pool window covered between the last update and `now`.
    fn accrual_window(&self, now: i64) -> u64 {
        let from = self.last_update_time.min(self.pool_end_time);
        let to = now.min(self.pool_end_time);
        if to > from {
            (to - from) as u64
        } else {
            0
        }
    }

    /// Accumulator value at `now` without writing it.
    pub fn accumulator_at(&self, now: i64) -> Result<U256> {
        let current = self.reward_accumulator.to_u256();
        let elapsed = self.accrual_window(now);
        if elapsed == 0 || self.total_locked == 0 || self.farming_speed == 0 {
            return Ok(current);
        }
        // (dt * speed) * D / (day * tvl), in this grouping.
        let streamed = U256::from(elapsed) * U256::from(self.farming_speed);
        let denominator = U256::from(FARMING_SPEED_DIVIDER) * U256::from(self.total_locked);
        let step = mul_div_floor(streamed, distributed_rewards_divider(), denominator)?;
        current
            .checked_add(step)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// Brings the accumulator up to `now`. Time with no locked value passes
    /// without accrual; `last_update_time` never moves backwards.
    pub fn accrue(&mut self, now: i64) -> Result<()> {
        let elapsed = self.accrual_window(now);
        if elapsed > 0 && self.total_locked > 0 && self.farming_speed > 0 {
            self.reward_accumulator = self.accumulator_at(now)?.into();

            let promised = mul_div_ceil(
                U256::from(elapsed),
                U256::from(self.farming_speed),
                U256::from(FARMING_SPEED_DIVIDER),
            )?;
            let committed = (U256::from(self.rewards_committed) + promised)
                .min(U256::from(self.rewards_remaining));
            self.rewards_committed = to_amount(committed)?;
        }
        self.last_update_time = self.last_update_time.max(now);
        Ok(())
    }

    /// Rewards in custody that are not yet promised to any position.
    pub fn unallocated_rewards(&self) -> u64 {
        self.rewards_remaining.saturating_sub(self.rewards_committed)
    }

    /// Spreads the unallocated balance evenly over what is left of the pool
    /// window. Callers must have accrued up to `now`.
    fn recompute_farming_speed(&mut self, now: i64) -> Result<()> {
        let from = now.max(self.pool_start_time);
        if self.pool_end_time <= from {
            self.farming_speed = 0;
            return Ok(());
        }
        let remaining = (self.pool_end_time - from) as u64;
        self.farming_speed = to_speed(mul_div_floor(
            U256::from(self.unallocated_rewards()),
            U256::from(FARMING_SPEED_DIVIDER),
            U256::from(remaining),
        )?)?;
        Ok(())
    }

    /// Credits newly funded rewards, minus the operator commission, and
    /// re-derives the farming speed. `new_end_time` extends the pool window.
    pub fn fund_rewards(
        &mut self,
        amount: u64,
        new_end_time: Option<i64>,
        now: i64,
        outbox: &mut Outbox,
    ) -> Result<FundingReceipt> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        if let Some(end_time) = new_end_time {
            require!(end_time > self.pool_end_time, ErrorCode::InvalidTimestamp);
        }

        self.accrue(now)?;

        let commission = to_amount(mul_div_floor(
            U256::from(amount),
            U256::from(self.commission_factor),
            U256::from(COMMISSION_DIVIDER),
        )?)?;
        let credited = amount
            .checked_sub(commission)
            .ok_or(ErrorCode::MathOverflow)?;

        self.rewards_remaining = self
            .rewards_remaining
            .checked_add(credited)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_funded = self
            .total_funded
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        self.total_commission = self
            .total_commission
            .checked_add(commission)
            .ok_or(ErrorCode::MathOverflow)?;
        if let Some(end_time) = new_end_time {
            self.pool_end_time = end_time;
        }
        self.recompute_farming_speed(now)?;

        outbox.push(
            self.reward_mint,
            Custody::RewardVault,
            self.commission_wallet,
            commission,
        );
        Ok(FundingReceipt {
            commission,
            credited,
        })
    }

    /// Returns unallocated rewards to the creator.
    pub fn withdraw_rewards(&mut self, amount: u64, now: i64, outbox: &mut Outbox) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        self.accrue(now)?;
        require!(
            amount <= self.unallocated_rewards(),
            ErrorCode::InsufficientUnallocatedRewards
        );
        self.rewards_remaining -= amount;
        self.recompute_farming_speed(now)?;
        outbox.push(self.reward_mint, Custody::RewardVault, self.creator, amount);
        Ok(())
    }

    /// Opens `position` for a new stake and returns its index.
    pub fn stake(
        &mut self,
        pool_key: Pubkey,
        position: &mut Position,
        request: StakeRequest,
        now: i64,
    ) -> Result<u64> {
        require!(
            request.amount > 0 && request.amount >= self.minimum_deposit,
            ErrorCode::InvalidAmount
        );
        require!(
            request.lock_period >= self.min_lock_duration,
            ErrorCode::InvalidAmount
        );
        require!(now >= self.pool_start_time, ErrorCode::PoolNotStarted);
        require!(now < self.pool_end_time, ErrorCode::PoolClosed);
        let lock_period = i64::try_from(request.lock_period).map_err(|_| ErrorCode::MathOverflow)?;
        let unlock_time = now.checked_add(lock_period).ok_or(ErrorCode::MathOverflow)?;

        self.accrue(now)?;

        let was_empty = self.total_locked == 0;
        self.total_locked = self
            .total_locked
            .checked_add(request.amount)
            .ok_or(ErrorCode::MathOverflow)?;
        if was_empty {
            self.recompute_farming_speed(now)?;
        }

        let index = self.next_position_index;
        self.next_position_index = index.checked_add(1).ok_or(ErrorCode::MathOverflow)?;

        position.pool = pool_key;
        position.index = index;
        position.owner = request.owner;
        position.locked_value = request.amount;
        position.open_time = now;
        position.unlock_time = unlock_time;
        position.active = true;
        position.transferable = request.transferable;
        position.reward_snapshot = self.reward_accumulator;
        position.claimed_total = 0;
        position.campaign_horizon = u64::MAX;
        Ok(index)
    }

    /// Rewards `position` could claim at `now`.
    pub fn pending_rewards(&self, position: &Position, now: i64) -> Result<u64> {
        if !position.active {
            return Ok(0);
        }
        let accumulator = self.accumulator_at(now)?;
        Self::entitlement(accumulator, position)
    }

    fn entitlement(accumulator: U256, position: &Position) -> Result<u64> {
        let growth = accumulator
            .checked_sub(position.reward_snapshot.to_u256())
            .ok_or(ErrorCode::MathOverflow)?;
        to_amount(mul_div_floor(
            growth,
            U256::from(position.locked_value),
            distributed_rewards_divider(),
        )?)
    }

    /// Pays `position` everything accrued since its snapshot.
    pub fn settle(&mut self, position: &mut Position, now: i64, outbox: &mut Outbox) -> Result<u64> {
        require!(position.active, ErrorCode::PositionInactive);
        self.accrue(now)?;

        let accumulator = self.reward_accumulator.to_u256();
        let entitled = Self::entitlement(accumulator, position)?;
        require!(
            entitled <= self.rewards_remaining,
            ErrorCode::InsufficientRewardBalance
        );
        let claimed_total = position
            .claimed_total
            .checked_add(entitled)
            .ok_or(ErrorCode::MathOverflow)?;
        let total_claimed = self
            .total_claimed
            .checked_add(entitled)
            .ok_or(ErrorCode::MathOverflow)?;

        position.reward_snapshot = self.reward_accumulator;
        position.claimed_total = claimed_total;
        self.rewards_remaining -= entitled;
        self.rewards_committed = self.rewards_committed.saturating_sub(entitled);
        self.total_claimed = total_claimed;

        outbox.push(self.reward_mint, Custody::RewardVault, position.owner, entitled);
        Ok(entitled)
    }

    /// Settles and releases an unlocked position.
    pub fn withdraw(
        &mut self,
        position: &mut Position,
        now: i64,
        outbox: &mut Outbox,
    ) -> Result<WithdrawReceipt> {
        require!(position.active, ErrorCode::PositionInactive);
        require!(position.is_unlocked(now), ErrorCode::NotYetUnlocked);

        let rewards = self.settle(position, now, outbox)?;
        self.total_locked = self
            .total_locked
            .checked_sub(position.locked_value)
            .ok_or(ErrorCode::MathOverflow)?;
        position.deactivate(self.next_campaign_index);

        outbox.push(
            self.lock_mint,
            Custody::LockVault,
            position.owner,
            position.locked_value,
        );
        Ok(WithdrawReceipt {
            rewards,
            principal: position.locked_value,
        })
    }

    /// Moves the start of a pool that has not started yet.
    pub fn set_start_time(&mut self, start_time: i64, now: i64) -> Result<()> {
        require!(now < self.pool_start_time, ErrorCode::InvalidTimestamp);
        require!(
            start_time > now && start_time < self.pool_end_time,
            ErrorCode::InvalidTimestamp
        );
        self.accrue(now)?;
        self.pool_start_time = start_time;
        self.recompute_farming_speed(now)
    }

    pub fn set_min_lock_duration(&mut self, min_lock_duration: u64) {
        self.min_lock_duration = min_lock_duration;
    }

    pub fn set_minimum_deposit(&mut self, minimum_deposit: u64) -> Result<()> {
        require!(minimum_deposit > 0, ErrorCode::InvalidAmount);
        self.minimum_deposit = minimum_deposit;
        Ok(())
    }

    /// Pays out `amount` of tokens that sit in a pool vault without being
    /// owed to anyone: lock vault balance above `total_locked`, reward vault
    /// balance above `rewards_remaining`.
    pub fn recover_stray_tokens(
        &self,
        custody: Custody,
        vault_balance: u64,
        amount: u64,
        outbox: &mut Outbox,
    ) -> Result<()> {
        let (accounted, asset) = match custody {
            Custody::LockVault => (self.total_locked, self.lock_mint),
            Custody::RewardVault => (self.rewards_remaining, self.reward_mint),
            Custody::BoostVault => return err!(ErrorCode::InvalidVault),
        };
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(
            amount <= vault_balance.saturating_sub(accounted),
            ErrorCode::StrayBalanceExceeded
        );
        outbox.push(asset, custody, self.creator, amount);
        Ok(())
    }

    /// Custody a pool vault address stands for.
    pub fn custody_of(&self, vault: &Pubkey) -> Result<Custody> {
        if *vault == self.lock_vault {
            Ok(Custody::LockVault)
        } else if *vault == self.reward_vault {
            Ok(Custody::RewardVault)
        } else {
            err!(ErrorCode::InvalidVault)
        }
    }

    /// Reserves the next campaign index.
    pub(crate) fn take_campaign_index(&mut self) -> Result<u64> {
        let index = self.next_campaign_index;
        self.next_campaign_index = index.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DAY: i64 = FARMING_SPEED_DIVIDER as i64;

    fn pool(start: i64, end: i64, commission_factor: u16) -> StakingPool {
        let mut pool = StakingPool {
            creator: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            lock_mint: Pubkey::new_unique(),
            commission_wallet: Pubkey::new_unique(),
            ..Default::default()
        };
        pool.open(
            &PoolParams {
                min_lock_duration: 0,
                minimum_deposit: 1,
                start_time: start,
                end_time: end,
            },
            commission_factor,
            0,
        )
        .unwrap();
        pool
    }

    fn stake(pool: &mut StakingPool, amount: u64, now: i64) -> Position {
        let mut position = Position::default();
        pool.stake(
            Pubkey::new_unique(),
            &mut position,
            StakeRequest {
                owner: Pubkey::new_unique(),
                amount,
                lock_period: 0,
                transferable: true,
            },
            now,
        )
        .unwrap();
        position
    }

    #[test]
    fn single_staker_receives_full_stream() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        assert_eq!(pool.farming_speed, 100);

        let mut position = stake(&mut pool, 500, 0);
        let paid = pool.settle(&mut position, 5 * DAY, &mut outbox).unwrap();
        assert_eq!(pool.reward_accumulator.to_u256(), distributed_rewards_divider());
        assert_eq!(paid, 500);
        assert_eq!(pool.rewards_remaining, 500);
        assert_eq!(outbox.total_to(&position.owner, Custody::RewardVault), 500);
    }

    #[test]
    fn settle_twice_at_same_time_pays_zero() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = stake(&mut pool, 500, 0);
        pool.settle(&mut position, 3 * DAY, &mut outbox).unwrap();
        assert_eq!(pool.settle(&mut position, 3 * DAY, &mut outbox).unwrap(), 0);
    }

    #[test]
    fn commission_is_forwarded_before_crediting() {
        let mut pool = pool(0, 10 * DAY, 1);
        let mut outbox = Outbox::new();
        let receipt = pool.fund_rewards(2_000_000, None, 0, &mut outbox).unwrap();
        assert_eq!(receipt.commission, 20);
        assert_eq!(receipt.credited, 1_999_980);
        assert_eq!(pool.rewards_remaining, 1_999_980);
        assert_eq!(
            outbox.total_to(&pool.commission_wallet, Custody::RewardVault),
            20
        );
    }

    #[test]
    fn empty_pool_does_not_accrue_retroactively() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        pool.accrue(2 * DAY).unwrap();
        assert_eq!(pool.reward_accumulator, FixedPoint::ZERO);
        assert_eq!(pool.last_update_time, 2 * DAY);

        // Idle rewards are re-streamed over the remaining 8 days.
        let mut position = stake(&mut pool, 100, 2 * DAY);
        assert_eq!(pool.farming_speed, 125);
        let paid = pool.settle(&mut position, 10 * DAY, &mut outbox).unwrap();
        assert_eq!(paid, 1_000);
    }

    #[test]
    fn accrual_stops_at_pool_end() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = stake(&mut pool, 7, 0);
        let paid = pool.settle(&mut position, 50 * DAY, &mut outbox).unwrap();
        assert!(paid <= 1_000);
        assert!(paid >= 999);
        assert_eq!(pool.pending_rewards(&position, 60 * DAY).unwrap(), 0);
    }

    #[test]
    fn refund_does_not_repromise_owed_rewards() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = stake(&mut pool, 100, 0);

        // Half the stream is owed but unclaimed when the top-up arrives.
        pool.fund_rewards(500, None, 5 * DAY, &mut outbox).unwrap();
        assert_eq!(pool.rewards_committed, 500);
        assert_eq!(pool.farming_speed, 200);

        let paid = pool.settle(&mut position, 10 * DAY, &mut outbox).unwrap();
        assert_eq!(paid, 1_500);
        assert_eq!(pool.rewards_remaining, 0);
    }

    #[test]
    fn extending_the_window_does_not_fill_the_gap() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = stake(&mut pool, 100, 0);
        pool.fund_rewards(1_000, Some(30 * DAY), 20 * DAY, &mut outbox)
            .unwrap();
        assert_eq!(pool.farming_speed, 100);
        let paid = pool.settle(&mut position, 30 * DAY, &mut outbox).unwrap();
        assert_eq!(paid, 2_000);
    }

    #[test]
    fn new_end_time_must_extend() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        let err = pool.fund_rewards(1, Some(5 * DAY), 0, &mut outbox).unwrap_err();
        assert_eq!(err, ErrorCode::InvalidTimestamp.into());
    }

    #[test]
    fn stake_rejects_small_amounts_and_locks() {
        let mut pool = pool(0, 10 * DAY, 0);
        pool.set_minimum_deposit(100).unwrap();
        pool.set_min_lock_duration(DAY as u64);
        let mut position = Position::default();
        let request = StakeRequest {
            owner: Pubkey::new_unique(),
            amount: 99,
            lock_period: DAY as u64,
            transferable: false,
        };
        assert_eq!(
            pool.stake(Pubkey::new_unique(), &mut position, request, 0)
                .unwrap_err(),
            ErrorCode::InvalidAmount.into()
        );
        let request = StakeRequest {
            amount: 100,
            lock_period: DAY as u64 - 1,
            ..request
        };
        assert_eq!(
            pool.stake(Pubkey::new_unique(), &mut position, request, 0)
                .unwrap_err(),
            ErrorCode::InvalidAmount.into()
        );
        assert_eq!(pool.next_position_index, 0);
    }

    #[test]
    fn stake_respects_pool_window() {
        let mut pool = pool(DAY, 10 * DAY, 0);
        let mut position = Position::default();
        let request = StakeRequest {
            owner: Pubkey::new_unique(),
            amount: 10,
            lock_period: 0,
            transferable: true,
        };
        assert_eq!(
            pool.stake(Pubkey::new_unique(), &mut position, request, 0)
                .unwrap_err(),
            ErrorCode::PoolNotStarted.into()
        );
        assert_eq!(
            pool.stake(Pubkey::new_unique(), &mut position, request, 10 * DAY)
                .unwrap_err(),
            ErrorCode::PoolClosed.into()
        );
    }

    #[test]
    fn withdraw_requires_unlock_and_deactivates() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = Position::default();
        pool.stake(
            Pubkey::new_unique(),
            &mut position,
            StakeRequest {
                owner: Pubkey::new_unique(),
                amount: 400,
                lock_period: 4 * DAY as u64,
                transferable: true,
            },
            0,
        )
        .unwrap();

        let err = pool.withdraw(&mut position, 3 * DAY, &mut outbox).unwrap_err();
        assert_eq!(err, ErrorCode::NotYetUnlocked.into());
        assert!(position.active);

        pool.take_campaign_index().unwrap();
        let receipt = pool.withdraw(&mut position, 4 * DAY, &mut outbox).unwrap();
        assert_eq!(receipt.principal, 400);
        assert_eq!(receipt.rewards, 400);
        assert!(!position.active);
        assert_eq!(position.campaign_horizon, 1);
        assert_eq!(pool.total_locked, 0);
        assert_eq!(outbox.total_to(&position.owner, Custody::LockVault), 400);

        let err = pool.settle(&mut position, 5 * DAY, &mut outbox).unwrap_err();
        assert_eq!(err, ErrorCode::PositionInactive.into());
    }

    #[test]
    fn creator_can_only_withdraw_unallocated_rewards() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let _position = stake(&mut pool, 100, 0);

        let err = pool.withdraw_rewards(600, 5 * DAY, &mut outbox).unwrap_err();
        assert_eq!(err, ErrorCode::InsufficientUnallocatedRewards.into());

        pool.withdraw_rewards(500, 5 * DAY, &mut outbox).unwrap();
        assert_eq!(pool.farming_speed, 0);
        assert_eq!(outbox.total_to(&pool.creator, Custody::RewardVault), 500);
    }

    #[test]
    fn only_unaccounted_vault_balance_is_recoverable() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let _position = stake(&mut pool, 400, 0);

        // 25 tokens were sent straight to each vault.
        let mut sweeps = Outbox::new();
        let err = pool
            .recover_stray_tokens(Custody::LockVault, 425, 26, &mut sweeps)
            .unwrap_err();
        assert_eq!(err, ErrorCode::StrayBalanceExceeded.into());
        pool.recover_stray_tokens(Custody::LockVault, 425, 25, &mut sweeps)
            .unwrap();
        pool.recover_stray_tokens(Custody::RewardVault, 1_025, 25, &mut sweeps)
            .unwrap();
        let err = pool
            .recover_stray_tokens(Custody::RewardVault, 1_000, 1, &mut sweeps)
            .unwrap_err();
        assert_eq!(err, ErrorCode::StrayBalanceExceeded.into());
        let err = pool
            .recover_stray_tokens(Custody::BoostVault, 1_000, 1, &mut sweeps)
            .unwrap_err();
        assert_eq!(err, ErrorCode::InvalidVault.into());

        assert_eq!(sweeps.total_to(&pool.creator, Custody::LockVault), 25);
        assert_eq!(sweeps.total_to(&pool.creator, Custody::RewardVault), 25);
        assert_eq!(sweeps.orders()[0].asset, pool.lock_mint);
        assert_eq!(sweeps.orders()[1].asset, pool.reward_mint);
        assert_eq!(pool.total_locked, 400);
        assert_eq!(pool.rewards_remaining, 1_000);
    }

    #[test]
    fn vaults_map_to_custody() {
        let mut pool = pool(0, 10 * DAY, 0);
        pool.lock_vault = Pubkey::new_unique();
        pool.reward_vault = Pubkey::new_unique();
        assert_eq!(pool.custody_of(&pool.lock_vault).unwrap(), Custody::LockVault);
        assert_eq!(pool.custody_of(&pool.reward_vault).unwrap(), Custody::RewardVault);
        assert!(pool.custody_of(&Pubkey::new_unique()).is_err());
    }

    #[test]
    fn start_time_moves_only_before_start() {
        let mut pool = pool(DAY, 10 * DAY, 0);
        pool.set_start_time(2 * DAY, 0).unwrap();
        assert_eq!(pool.pool_start_time, 2 * DAY);
        assert!(pool.set_start_time(3 * DAY, 2 * DAY).is_err());
        assert!(pool.set_start_time(11 * DAY, 0).is_err());
    }

    #[test]
    fn settle_failure_leaves_position_untouched() {
        let mut pool = pool(0, 10 * DAY, 0);
        let mut outbox = Outbox::new();
        pool.fund_rewards(1_000, None, 0, &mut outbox).unwrap();
        let mut position = stake(&mut pool, 100, 0);
        // Simulate custody drifting below what is owed.
        pool.rewards_remaining = 10;
        let before = position.reward_snapshot;
        let err = pool.settle(&mut position, 5 * DAY, &mut outbox).unwrap_err();
        assert_eq!(err, ErrorCode::InsufficientRewardBalance.into());
        assert_eq!(position.reward_snapshot, before);
        assert_eq!(position.claimed_total, 0);
    }

    proptest! {
        #[test]
        fn accumulator_is_monotonic(
            stake_amount in 1u64..1_000_000_000,
            funded in 1u64..1_000_000_000_000,
            t1 in 0i64..(30 * DAY),
            t2 in 0i64..(30 * DAY),
        ) {
            let mut pool = pool(0, 20 * DAY, 0);
            let mut outbox = Outbox::new();
            pool.fund_rewards(funded, None, 0, &mut outbox).unwrap();
            let _position = stake(&mut pool, stake_amount, 0);
            let (early, late) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            let a = pool.accumulator_at(early).unwrap();
            let b = pool.accumulator_at(late).unwrap();
            prop_assert!(a <= b);
            pool.accrue(late).unwrap();
            pool.accrue(early).unwrap();
            prop_assert_eq!(pool.reward_accumulator.to_u256(), b);
        }

        #[test]
        fn pending_matches_settlement(
            stake_amount in 1u64..1_000_000_000,
            funded in 1u64..1_000_000_000_000,
            at in 0i64..(20 * DAY),
        ) {
            let mut pool = pool(0, 20 * DAY, 0);
            let mut outbox = Outbox::new();
            pool.fund_rewards(funded, None, 0, &mut outbox).unwrap();
            let mut position = stake(&mut pool, stake_amount, 0);
            let pending = pool.pending_rewards(&position, at).unwrap();
            prop_assert_eq!(pool.settle(&mut position, at, &mut outbox).unwrap(), pending);
        }
    }
}
