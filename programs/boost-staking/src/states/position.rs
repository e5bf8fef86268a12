use crate::math::FixedPoint;
use anchor_lang::prelude::*;

/// PDA seed string used to derive a position: `POSITION_SEED + pool + index`.
pub const POSITION_SEED: &str = "position";

/// One stake in a pool.
///
/// Positions are never closed: withdrawing only flips `active`, so claim
/// history stays readable. `reward_snapshot` is the pool accumulator value at
/// the last settlement; the next payout is the accumulator growth since then.
#[account]
#[derive(Default, Debug)]
pub struct Position {
    pub bump: u8,

    /// Pool this position belongs to.
    pub pool: Pubkey,

    /// Creation order within the pool; drives boost eligibility.
    pub index: u64,

    /// Wallet that receives payouts and may claim or withdraw.
    pub owner: Pubkey,

    pub locked_value: u64,
    pub open_time: i64,
    pub unlock_time: i64,
    pub active: bool,

    /// Whether the holder allowed ownership transfers at stake time.
    pub transferable: bool,

    pub reward_snapshot: FixedPoint,

    /// Cumulative pool rewards paid to this position.
    pub claimed_total: u64,

    /// `u64::MAX` while active. After withdrawal, the pool's campaign counter
    /// at that moment: only campaigns with a lower index counted this position
    /// in their TVL snapshot.
    pub campaign_horizon: u64,
}

impl Position {
    pub const LEN: usize = 8 + 1 + 32 + 8 + 32 + 8 + 8 + 8 + 1 + 1 + FixedPoint::LEN + 8 + 8;

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.unlock_time
    }

    /// Marks the position withdrawn. `campaign_horizon` is the pool's next
    /// campaign index at the time of withdrawal.
    pub(crate) fn deactivate(&mut self, campaign_horizon: u64) {
        self.active = false;
        self.campaign_horizon = campaign_horizon;
    }
}
