use anchor_lang::prelude::*;
use boost_staking::error::ErrorCode;
use boost_staking::math::*;
use boost_staking::states::*;
use boost_staking::utils::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DAY: i64 = FARMING_SPEED_DIVIDER as i64;

#[derive(Default)]
struct RecordingPort {
    paid: Vec<TransferOrder>,
}

impl AssetTransferPort for RecordingPort {
    fn transfer(&mut self, order: &TransferOrder) -> Result<()> {
        self.paid.push(*order);
        Ok(())
    }
}

impl RecordingPort {
    fn total_from(&self, from: Custody) -> u64 {
        self.paid
            .iter()
            .filter(|order| order.from == from)
            .map(|order| order.amount)
            .sum()
    }
}

struct Harness {
    key: Pubkey,
    pool: StakingPool,
    positions: Vec<Position>,
    port: RecordingPort,
}

impl Harness {
    fn new(start: i64, end: i64, commission_factor: u16) -> Self {
        let mut pool = StakingPool {
            creator: Pubkey::new_unique(),
            lock_mint: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
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
        Self {
            key: Pubkey::new_unique(),
            pool,
            positions: Vec::new(),
            port: RecordingPort::default(),
        }
    }

    fn fund(&mut self, amount: u64, now: i64) -> FundingReceipt {
        let mut outbox = Outbox::new();
        let receipt = self.pool.fund_rewards(amount, None, now, &mut outbox).unwrap();
        outbox.dispatch(&mut self.port).unwrap();
        receipt
    }

    fn stake(&mut self, amount: u64, lock_period: u64, now: i64) -> usize {
        let mut position = Position::default();
        self.pool
            .stake(
                self.key,
                &mut position,
                StakeRequest {
                    owner: Pubkey::new_unique(),
                    amount,
                    lock_period,
                    transferable: false,
                },
                now,
            )
            .unwrap();
        self.positions.push(position);
        self.positions.len() - 1
    }

    fn settle(&mut self, slot: usize, now: i64) -> Result<u64> {
        let mut outbox = Outbox::new();
        let paid = self.pool.settle(&mut self.positions[slot], now, &mut outbox)?;
        outbox.dispatch(&mut self.port)?;
        Ok(paid)
    }

    fn withdraw(&mut self, slot: usize, now: i64) -> Result<WithdrawReceipt> {
        let mut outbox = Outbox::new();
        let receipt = self.pool.withdraw(&mut self.positions[slot], now, &mut outbox)?;
        outbox.dispatch(&mut self.port)?;
        Ok(receipt)
    }

    fn claimed_by_positions(&self) -> u64 {
        self.positions.iter().map(|position| position.claimed_total).sum()
    }

    fn campaign(&mut self, start: i64, end: i64, now: i64) -> BoostCampaign {
        let mut campaign = BoostCampaign::default();
        campaign
            .open(
                self.key,
                &mut self.pool,
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                start,
                end,
                now,
            )
            .unwrap();
        campaign
    }
}

#[test]
fn single_staker_scenario() {
    let mut harness = Harness::new(0, 10 * DAY, 0);
    harness.fund(1_000, 0);
    assert_eq!(harness.pool.farming_speed, 100);

    let slot = harness.stake(500, 0, 0);
    assert_eq!(harness.settle(slot, 5 * DAY).unwrap(), 500);
    assert_eq!(
        harness.pool.reward_accumulator.to_u256(),
        U256::from(5u64 * 100) * distributed_rewards_divider() / U256::from(500u64)
    );
    assert_eq!(harness.port.total_from(Custody::RewardVault), 500);
}

#[test]
fn boost_partial_claim_scenario() {
    let mut harness = Harness::new(0, 30 * DAY, 0);
    let slot = harness.stake(300, 0, 0);
    let mut campaign = harness.campaign(0, 9 * DAY, 0);
    campaign.fund(900, 0).unwrap();
    let position = &harness.positions[slot];

    let mut record = BoostClaimRecord::default();
    let mut outbox = Outbox::new();
    assert_eq!(record.claim(&mut campaign, position, 3 * DAY, &mut outbox).unwrap(), 300);
    assert_eq!(record.claim(&mut campaign, position, 9 * DAY, &mut outbox).unwrap(), 600);
    let err = record
        .claim(&mut campaign, position, 9 * DAY + 1, &mut outbox)
        .unwrap_err();
    assert_eq!(err, ErrorCode::AlreadyClosed.into());

    outbox.dispatch(&mut harness.port).unwrap();
    assert_eq!(harness.port.total_from(Custody::BoostVault), 900);
}

#[test]
fn second_settle_at_same_time_pays_nothing() {
    let mut harness = Harness::new(0, 10 * DAY, 0);
    harness.fund(7_777, 0);
    let a = harness.stake(123, 0, 0);
    let b = harness.stake(456, 0, DAY / 3);
    for slot in [a, b] {
        harness.settle(slot, 4 * DAY).unwrap();
        assert_eq!(harness.settle(slot, 4 * DAY).unwrap(), 0);
    }
}

#[test]
fn conservation_under_random_activity() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..32 {
        let end = rng.random_range(5..60) * DAY;
        let factor = rng.random_range(0..5_000u16);
        let mut harness = Harness::new(0, end, factor);
        let mut credited = 0u64;
        let mut now = 0i64;
        let mut last_accumulator = U256::zero();

        for _ in 0..80 {
            now += rng.random_range(0..DAY);
            match rng.random_range(0..5) {
                0 => {
                    let amount = rng.random_range(1..10_000_000u64);
                    let receipt = harness.fund(amount, now);
                    assert_eq!(receipt.commission + receipt.credited, amount);
                    credited += receipt.credited;
                }
                1 if now < end => {
                    let amount = rng.random_range(1..1_000_000u64);
                    let lock = rng.random_range(0..(3 * DAY as u64));
                    harness.stake(amount, lock, now);
                }
                2 | 3 if !harness.positions.is_empty() => {
                    let slot = rng.random_range(0..harness.positions.len());
                    if harness.positions[slot].active {
                        harness.settle(slot, now).unwrap();
                    }
                }
                4 if !harness.positions.is_empty() => {
                    let slot = rng.random_range(0..harness.positions.len());
                    let position = &harness.positions[slot];
                    if position.active && position.is_unlocked(now) {
                        harness.withdraw(slot, now).unwrap();
                    }
                }
                _ => {}
            }

            let accumulator = harness.pool.reward_accumulator.to_u256();
            assert!(accumulator >= last_accumulator);
            last_accumulator = accumulator;
            assert!(harness.pool.rewards_committed <= harness.pool.rewards_remaining);
            assert_eq!(
                harness.claimed_by_positions() + harness.pool.rewards_remaining,
                credited
            );
            assert_eq!(
                harness.port.total_from(Custody::RewardVault),
                harness.claimed_by_positions() + harness.pool.total_commission
            );
        }

        // Everyone exits after the pool ends; nothing is owed beyond custody.
        let after = end.max(now) + 3 * DAY;
        for slot in 0..harness.positions.len() {
            if harness.positions[slot].active {
                harness.withdraw(slot, after).unwrap();
            }
        }
        assert_eq!(harness.pool.total_locked, 0);
        assert_eq!(
            harness.claimed_by_positions() + harness.pool.rewards_remaining,
            credited
        );
    }
}

#[test]
fn eligibility_cutoff_is_permanent() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut harness = Harness::new(0, 100 * DAY, 0);
    for _ in 0..5 {
        let amount = rng.random_range(1..1_000u64);
        harness.stake(amount, 0, 0);
    }
    let mut campaign = harness.campaign(DAY, 10 * DAY, 0);
    let late = harness.stake(10, 0, 0);
    let mut record = BoostClaimRecord::default();

    for _ in 0..20 {
        let now = rng.random_range(0..(20 * DAY));
        if now < campaign.campaign_end {
            campaign.fund(rng.random_range(1..1_000u64), now).unwrap();
        }
        let mut outbox = Outbox::new();
        let err = record
            .claim(&mut campaign, &harness.positions[late], now, &mut outbox)
            .unwrap_err();
        assert_eq!(err, ErrorCode::NotEligible.into());
        assert!(outbox.is_empty());
    }
    assert_eq!(campaign.eligibility_index_cutoff, 5);
    assert!(!record.closed);
}

proptest! {
    #[test]
    fn partial_claims_add_up_to_single_claim(
        stakes in proptest::collection::vec(1u64..1_000_000_000, 1..6),
        funded in 1u64..1_000_000_000_000,
        days in 1i64..120,
        mut times in proptest::collection::vec(0i64..(150 * DAY), 0..12),
    ) {
        let mut harness = Harness::new(0, 200 * DAY, 0);
        for amount in &stakes {
            harness.stake(*amount, 0, 0);
        }
        let mut campaign = harness.campaign(0, days * DAY, 0);
        campaign.fund(funded, 0).unwrap();
        times.sort_unstable();
        times.push(days * DAY);

        for position in &harness.positions {
            let mut partial = BoostClaimRecord::default();
            let mut partial_sum = 0u64;
            let mut outbox = Outbox::new();
            for now in &times {
                if partial.closed {
                    break;
                }
                partial_sum += partial.claim(&mut campaign, position, *now, &mut outbox).unwrap();
            }
            prop_assert!(partial.closed);

            let single = BoostCampaign::entitled(
                campaign.distributed_at(days * DAY).unwrap(),
                campaign.share_of(position).unwrap(),
            ).unwrap();
            prop_assert_eq!(partial_sum, single);
        }
        prop_assert!(campaign.total_claimed <= campaign.total_funded);
    }

    #[test]
    fn pool_payouts_never_exceed_funding(
        stakes in proptest::collection::vec((1u64..1_000_000_000, 0i64..(10 * DAY)), 1..8),
        funded in 1u64..1_000_000_000_000,
        claim_at in 0i64..(30 * DAY),
    ) {
        let mut harness = Harness::new(0, 20 * DAY, 0);
        harness.fund(funded, 0);
        let mut stakes = stakes;
        stakes.sort_by_key(|(_, at)| *at);
        for (amount, at) in &stakes {
            harness.stake(*amount, 0, *at);
        }
        let claim_at = claim_at.max(stakes[stakes.len() - 1].1);
        let mut paid = 0u64;
        for slot in 0..harness.positions.len() {
            paid += harness.settle(slot, claim_at).unwrap();
        }
        prop_assert!(paid <= funded);
        prop_assert_eq!(paid + harness.pool.rewards_remaining, funded);
    }
}
