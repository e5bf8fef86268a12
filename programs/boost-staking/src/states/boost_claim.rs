use crate::error::ErrorCode;
use crate::math::*;
use crate::states::{BoostCampaign, Position};
use crate::utils::{Custody, Outbox};
use anchor_lang::prelude::*;

/// PDA seed string for a claim record: `BOOST_CLAIM_SEED + campaign + position`.
pub const BOOST_CLAIM_SEED: &str = "boost_claim";

/// Claim progress of one position in one campaign.
///
/// Created on the first claim attempt. Every claim moves
/// `user_reward_snapshot` to the campaign's distributed amount; the first
/// claim at or after the campaign end closes the record for good.
#[account]
#[derive(Default, Debug)]
pub struct BoostClaimRecord {
    pub bump: u8,
    pub campaign: Pubkey,
    pub position: Pubkey,
    pub closed: bool,
    pub user_reward_snapshot: FixedPoint,
    pub claimed_total: u64,
}

impl BoostClaimRecord {
    pub const LEN: usize = 8 + 1 + 32 * 2 + 1 + FixedPoint::LEN + 8;

    /// Binds a freshly allocated record to its pair, or checks that an
    /// existing one belongs to it.
    pub fn bind(&mut self, campaign: Pubkey, position: Pubkey, bump: u8) -> Result<()> {
        if self.campaign == Pubkey::default() {
            self.bump = bump;
            self.campaign = campaign;
            self.position = position;
            return Ok(());
        }
        require_keys_eq!(self.campaign, campaign, ErrorCode::InvalidOwner);
        require_keys_eq!(self.position, position, ErrorCode::InvalidOwner);
        Ok(())
    }

    /// Pays the position its share of everything the campaign released since
    /// the last claim. Nothing is written when a check fails.
    pub fn claim(
        &mut self,
        campaign: &mut BoostCampaign,
        position: &Position,
        now: i64,
        outbox: &mut Outbox,
    ) -> Result<u64> {
        require!(campaign.is_eligible(position), ErrorCode::NotEligible);
        require!(!self.closed, ErrorCode::AlreadyClosed);
        require!(
            campaign.eligibility_tvl_snapshot > 0,
            ErrorCode::ZeroDenominator
        );

        let share = campaign.share_of(position)?;
        let distributed = campaign.distributed_at(now)?;
        let delta = BoostCampaign::entitled(distributed, share)?
            .checked_sub(BoostCampaign::entitled(self.user_reward_snapshot.to_u256(), share)?)
            .ok_or(ErrorCode::MathOverflow)?;

        let total_claimed = campaign
            .total_claimed
            .checked_add(delta)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(
            total_claimed <= campaign.total_funded,
            ErrorCode::InsufficientRewardBalance
        );
        let claimed_total = self
            .claimed_total
            .checked_add(delta)
            .ok_or(ErrorCode::MathOverflow)?;

        self.user_reward_snapshot = distributed.into();
        self.claimed_total = claimed_total;
        if now >= campaign.campaign_end {
            self.closed = true;
        }
        campaign.total_claimed = total_claimed;

        outbox.push(campaign.reward_mint, Custody::BoostVault, position.owner, delta);
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::{PoolParams, StakeRequest, StakingPool};

    const DAY: i64 = FARMING_SPEED_DIVIDER as i64;

    struct Fixture {
        pool: StakingPool,
        campaign: BoostCampaign,
        positions: Vec<Position>,
    }

    fn fixture(amounts: &[u64], funded: u64, days: i64) -> Fixture {
        let pool_key = Pubkey::new_unique();
        let mut pool = StakingPool::default();
        pool.open(
            &PoolParams {
                min_lock_duration: 0,
                minimum_deposit: 1,
                start_time: 0,
                end_time: 100 * DAY,
            },
            0,
            0,
        )
        .unwrap();
        let mut positions = Vec::new();
        for amount in amounts {
            let mut position = Position::default();
            pool.stake(
                pool_key,
                &mut position,
                StakeRequest {
                    owner: Pubkey::new_unique(),
                    amount: *amount,
                    lock_period: 0,
                    transferable: true,
                },
                0,
            )
            .unwrap();
            positions.push(position);
        }
        let mut campaign = BoostCampaign::default();
        campaign
            .open(
                pool_key,
                &mut pool,
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                0,
                days * DAY,
                0,
            )
            .unwrap();
        campaign.fund(funded, 0).unwrap();
        Fixture {
            pool,
            campaign,
            positions,
        }
    }

    #[test]
    fn partial_claims_then_close() {
        let Fixture {
            mut campaign,
            positions,
            ..
        } = fixture(&[300], 900, 9);
        let position = &positions[0];
        let mut record = BoostClaimRecord::default();
        let mut outbox = Outbox::new();

        assert_eq!(record.claim(&mut campaign, position, 3 * DAY, &mut outbox).unwrap(), 300);
        assert!(!record.closed);
        assert_eq!(record.claim(&mut campaign, position, 9 * DAY, &mut outbox).unwrap(), 600);
        assert!(record.closed);
        assert_eq!(record.claimed_total, 900);
        assert_eq!(outbox.total_to(&position.owner, Custody::BoostVault), 900);

        let snapshot = record.user_reward_snapshot;
        let err = record
            .claim(&mut campaign, position, 10 * DAY, &mut outbox)
            .unwrap_err();
        assert_eq!(err, ErrorCode::AlreadyClosed.into());
        assert_eq!(record.user_reward_snapshot, snapshot);
    }

    #[test]
    fn claim_before_start_pays_nothing() {
        let Fixture {
            mut campaign,
            positions,
            ..
        } = fixture(&[10], 100, 1);
        campaign.campaign_start = DAY;
        campaign.campaign_end = 2 * DAY;
        let mut record = BoostClaimRecord::default();
        let mut outbox = Outbox::new();
        assert_eq!(record.claim(&mut campaign, &positions[0], 0, &mut outbox).unwrap(), 0);
        assert!(outbox.is_empty());
        assert!(!record.closed);
    }

    #[test]
    fn ineligible_position_is_rejected_without_mutation() {
        let Fixture {
            mut pool,
            mut campaign,
            ..
        } = fixture(&[100], 100, 1);
        let mut late = Position::default();
        pool.stake(
            campaign.pool,
            &mut late,
            StakeRequest {
                owner: Pubkey::new_unique(),
                amount: 100,
                lock_period: 0,
                transferable: true,
            },
            0,
        )
        .unwrap();
        let mut record = BoostClaimRecord::default();
        let mut outbox = Outbox::new();
        for now in [0, DAY / 2, DAY, 50 * DAY] {
            let err = record.claim(&mut campaign, &late, now, &mut outbox).unwrap_err();
            assert_eq!(err, ErrorCode::NotEligible.into());
        }
        assert_eq!(record.user_reward_snapshot, FixedPoint::ZERO);
        assert_eq!(campaign.total_claimed, 0);
    }

    #[test]
    fn shares_split_by_snapshot_tvl() {
        let Fixture {
            mut campaign,
            positions,
            ..
        } = fixture(&[100, 300], 4_000, 3);
        let mut outbox = Outbox::new();
        let mut paid = 0;
        for position in &positions {
            let mut record = BoostClaimRecord::default();
            paid += record.claim(&mut campaign, position, 3 * DAY, &mut outbox).unwrap();
        }
        assert_eq!(outbox.total_to(&positions[0].owner, Custody::BoostVault), 1_000);
        assert_eq!(outbox.total_to(&positions[1].owner, Custody::BoostVault), 3_000);
        assert_eq!(paid, campaign.total_claimed);
    }

    #[test]
    fn bind_rejects_foreign_record() {
        let mut record = BoostClaimRecord::default();
        let campaign = Pubkey::new_unique();
        let position = Pubkey::new_unique();
        record.bind(campaign, position, 7).unwrap();
        record.bind(campaign, position, 7).unwrap();
        assert_eq!(record.bump, 7);
        assert!(record.bind(campaign, Pubkey::new_unique(), 7).is_err());
    }
}
