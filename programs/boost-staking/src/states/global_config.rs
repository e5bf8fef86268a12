use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Global Configuration Account
// ──────────────────────────────────────────────────────────────────────────────
//

/// PDA seed string used to derive the global configuration account.
pub const GLOBAL_CONFIG_SEED: &str = "global_config";

/// Protocol-wide settings shared by every staking pool.
///
/// Created once by the program admin (`InitialiseConfigs`). Pools copy the
/// commission factor and commission wallet at creation time, so later
/// updates only affect pools created afterwards.
#[account]
#[derive(Default, Debug)]
pub struct GlobalConfig {
    /// PDA bump for this account (for seed derivation).
    pub bump: u8,

    /// Current admin of the protocol (authorized to update config).
    pub admin: Pubkey,

    /// Commission numerator applied to funded pool rewards,
    /// over `COMMISSION_DIVIDER`.
    pub commission_factor: u16,

    /// Wallet receiving the commission cut of every reward funding.
    pub commission_wallet: Pubkey,

    /// Global switch: if `false`, new pools cannot be created.
    pub pool_creation_enabled: bool,

    /// Number of pools created so far (informational).
    pub pools_created: u64,
}

impl GlobalConfig {
    /// Fixed serialized size of the account (for allocation at initialization).
    ///
    /// Breakdown:
    /// - 8: account discriminator
    /// - 1: bump
    /// - 32 * 2: two Pubkeys
    /// - 2: commission factor
    /// - 1: boolean
    /// - 8: pool counter
    pub const LEN: usize = 8 + 1 + 32 * 2 + 2 + 1 + 8;
}
