use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: Emitted for off-chain indexers/clients to track ledger changes
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when the global configuration is initialized.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct GlobalConfigInitialized {
    pub admin: Pubkey,
    /// Commission numerator over `COMMISSION_DIVIDER`.
    pub commission_factor: u16,
    pub commission_wallet: Pubkey,
    pub pool_creation_enabled: bool,
}

/// Emitted whenever `update_config` changes a parameter.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct ConfigUpdated {
    /// Admin after the update (may be newly set).
    pub admin: Pubkey,
    /// Selector that was applied.
    pub param: u8,
    pub commission_factor: u16,
    pub commission_wallet: Pubkey,
    pub pool_creation_enabled: bool,
}

/// Emitted when a creator opens a new staking pool.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub creator: Pubkey,
    pub pool_id: u64,
    pub lock_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub min_lock_duration: u64,
    pub minimum_deposit: u64,
    pub commission_factor: u16,
    pub pool_start_time: i64,
    pub pool_end_time: i64,
}

/// Emitted when the creator changes a pool parameter through `update_pool`.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolUpdated {
    pub pool: Pubkey,
    pub param: u8,
    pub min_lock_duration: u64,
    pub minimum_deposit: u64,
    pub pool_start_time: i64,
    pub farming_speed: u128,
}

/// Emitted when rewards are funded into a pool.
///
/// `farming_speed` is the rate after the funding was credited.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolRewardsAdded {
    pub pool: Pubkey,
    pub funder: Pubkey,
    /// Gross amount transferred in.
    pub amount: u64,
    /// Part forwarded to the commission wallet.
    pub commission: u64,
    pub rewards_remaining: u64,
    pub farming_speed: u128,
    pub pool_end_time: i64,
}

/// Emitted when the creator takes unallocated rewards back.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PoolRewardsWithdrawn {
    pub pool: Pubkey,
    pub amount: u64,
    pub rewards_remaining: u64,
    pub farming_speed: u128,
}

/// Emitted for every new position.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct Staked {
    pub pool: Pubkey,
    pub position: Pubkey,
    pub owner: Pubkey,
    pub index: u64,
    pub amount: u64,
    pub unlock_time: i64,
    pub total_locked: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct RewardsClaimed {
    pub pool: Pubkey,
    pub position: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub claimed_total: u64,
}

/// Emitted when a position is settled and its principal released.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct PositionWithdrawn {
    pub pool: Pubkey,
    pub position: Pubkey,
    pub owner: Pubkey,
    pub principal: u64,
    pub rewards: u64,
    pub total_locked: u64,
}

/// Emitted when a boost campaign is created and its eligibility frozen.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct BoostCreated {
    pub pool: Pubkey,
    pub campaign: Pubkey,
    pub index: u64,
    pub reward_mint: Pubkey,
    pub campaign_start: i64,
    pub campaign_end: i64,
    pub eligibility_index_cutoff: u64,
    pub eligibility_tvl_snapshot: u64,
}

#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct BoostToppedUp {
    pub campaign: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub total_funded: u64,
}

/// Emitted for every boost claim, including the one that closes the record.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct BoostRewardsClaimed {
    pub campaign: Pubkey,
    pub position: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub closed: bool,
}

/// Emitted when the creator sweeps tokens that reached a vault outside the
/// ledger.
#[event]
#[cfg_attr(feature = "client", derive(Debug))]
pub struct StrayTokensRecovered {
    pub pool: Pubkey,
    pub vault: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
}
