use crate::error::ErrorCode;
use crate::math::*;
use crate::states::{BoostClaimRecord, Position, StakingPool};
use crate::utils::{Custody, Outbox};
use anchor_lang::prelude::*;

/// PDA seed string used to derive a campaign: `BOOST_SEED + pool + index`.
pub const BOOST_SEED: &str = "boost";
/// PDA seed string for a campaign's bonus vault: `BOOST_VAULT_SEED + campaign`.
pub const BOOST_VAULT_SEED: &str = "boost_vault";

/// A time-boxed bonus stream over a frozen set of positions.
///
/// Unlike the pool accumulator, `distributed_at` tracks the *cumulative amount*
/// released so far (scaled by 1e38), not a per-unit value. Claimants divide
/// by `eligibility_tvl_snapshot`, which never changes after creation.
#[account]
#[derive(Default, Debug)]
pub struct BoostCampaign {
    pub bump: u8,

    /// Pool whose positions are eligible.
    pub pool: Pubkey,

    /// Creation order within the pool.
    pub index: u64,

    pub creator: Pubkey,

    /// Mint the bonus is paid in. May differ from the pool reward mint.
    pub reward_mint: Pubkey,

    /// Vault holding this campaign's bonus.
    pub vault: Pubkey,

    pub campaign_start: i64,
    pub campaign_end: i64,

    /// Positions with a lower index are eligible.
    pub eligibility_index_cutoff: u64,

    /// Pool TVL when the campaign was created.
    pub eligibility_tvl_snapshot: u64,

    pub total_funded: u64,

    /// `total_funded * 1e38` per day of campaign duration.
    pub campaign_speed: FixedPoint,

    pub total_claimed: u64,
}

impl BoostCampaign {
    pub const LEN: usize = 8 + 1 + 32 + 8 + 32 * 3 + 8 * 6 + FixedPoint::LEN;

    /// Freezes the eligibility snapshot from `pool` and reserves the next
    /// campaign index.
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &mut self,
        pool_key: Pubkey,
        pool: &mut StakingPool,
        reward_mint: Pubkey,
        vault: Pubkey,
        start: i64,
        end: i64,
        now: i64,
    ) -> Result<u64> {
        require!(start < end, ErrorCode::InvalidTimestamp);
        require!(end > now, ErrorCode::InvalidTimestamp);
        require!(pool.total_locked > 0, ErrorCode::EmptyEligibilitySnapshot);
        end.checked_sub(start).ok_or(ErrorCode::InvalidTimestamp)?;

        let index = pool.take_campaign_index()?;
        self.pool = pool_key;
        self.index = index;
        self.creator = pool.creator;
        self.reward_mint = reward_mint;
        self.vault = vault;
        self.campaign_start = start;
        self.campaign_end = end;
        self.eligibility_index_cutoff = pool.next_position_index;
        self.eligibility_tvl_snapshot = pool.total_locked;
        self.total_funded = 0;
        self.campaign_speed = FixedPoint::ZERO;
        self.total_claimed = 0;
        Ok(index)
    }

    fn duration(&self) -> Result<u64> {
        let seconds = self
            .campaign_end
            .checked_sub(self.campaign_start)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(seconds as u64)
    }

    /// Adds `amount` to the campaign and re-derives its speed. The cutoff and
    /// TVL snapshot are left alone.
    pub fn fund(&mut self, amount: u64, now: i64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(now < self.campaign_end, ErrorCode::CampaignFinished);

        let total_funded = self
            .total_funded
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        let scaled = U256::from(total_funded) * distributed_rewards_divider();
        let speed = mul_div_floor(
            scaled,
            U256::from(FARMING_SPEED_DIVIDER),
            U256::from(self.duration()?),
        )?;

        self.total_funded = total_funded;
        self.campaign_speed = speed.into();
        Ok(())
    }

    /// Cumulative amount released by `now`, scaled by 1e38.
    pub fn distributed_at(&self, now: i64) -> Result<U256> {
        if now < self.campaign_start {
            return Ok(U256::zero());
        }
        if now >= self.campaign_end {
            return Ok(U256::from(self.total_funded) * distributed_rewards_divider());
        }
        let elapsed = now
            .checked_sub(self.campaign_start)
            .ok_or(ErrorCode::MathOverflow)? as u64;
        mul_div_floor(
            self.campaign_speed.to_u256(),
            U256::from(elapsed),
            U256::from(FARMING_SPEED_DIVIDER),
        )
    }

    /// Pays the pool creator `amount` of tokens in the campaign vault beyond
    /// what the campaign still owes (`total_funded - total_claimed`).
    pub fn recover_stray_tokens(
        &self,
        vault_balance: u64,
        amount: u64,
        outbox: &mut Outbox,
    ) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        let owed = self.total_funded.saturating_sub(self.total_claimed);
        require!(
            amount <= vault_balance.saturating_sub(owed),
            ErrorCode::StrayBalanceExceeded
        );
        outbox.push(self.reward_mint, Custody::BoostVault, self.creator, amount);
        Ok(())
    }

    /// Whether `position` was counted in the eligibility snapshot.
    pub fn is_eligible(&self, position: &Position) -> bool {
        position.pool == self.pool
            && position.index < self.eligibility_index_cutoff
            && self.index < position.campaign_horizon
    }

    /// Fraction of the campaign owed to `position`, scaled by 1e38.
    pub fn share_of(&self, position: &Position) -> Result<U256> {
        mul_div_floor(
            U256::from(position.locked_value),
            distributed_rewards_divider(),
            U256::from(self.eligibility_tvl_snapshot),
        )
    }

    /// What a holder of `share` is owed once `distributed` has been released.
    /// Both inputs carry the 1e38 scale, so the product is divided by its square.
    pub fn entitled(distributed: U256, share: U256) -> Result<u64> {
        let divider = distributed_rewards_divider();
        to_amount(mul_div_floor(distributed, share, divider * divider)?)
    }

    /// Bonus `position` could claim at `now`, given its claim record if one
    /// exists. Ineligible positions and closed records yield zero.
    pub fn pending_for(
        &self,
        position: &Position,
        record: Option<&BoostClaimRecord>,
        now: i64,
    ) -> Result<u64> {
        if !self.is_eligible(position) {
            return Ok(0);
        }
        let (closed, snapshot) = match record {
            Some(record) => (record.closed, record.user_reward_snapshot.to_u256()),
            None => (false, U256::zero()),
        };
        if closed {
            return Ok(0);
        }
        let share = self.share_of(position)?;
        let now_entitled = Self::entitled(self.distributed_at(now)?, share)?;
        let claimed = Self::entitled(snapshot, share)?;
        Ok(now_entitled.saturating_sub(claimed))
    }
}
