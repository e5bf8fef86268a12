use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Amount or lock period is below the pool minimum")]
    InvalidAmount,

    #[msg("Position is still locked")]
    NotYetUnlocked,

    #[msg("Position is not eligible for this boost")]
    NotEligible,

    #[msg("Boost rewards for this position are already fully claimed")]
    AlreadyClosed,

    #[msg("Reward entitlement exceeds the pool reward balance")]
    InsufficientRewardBalance,

    #[msg("Division by zero")]
    ZeroDenominator,

    #[msg("Input account owner is not the program address")]
    InvalidOwner,

    #[msg("Signer is not allowed to perform this action")]
    Unauthorized,

    #[msg("Invalid parameter provided")]
    InvalidParam,

    #[msg("Staking pool has not started yet")]
    PoolNotStarted,

    #[msg("Staking pool has already ended")]
    PoolClosed,

    #[msg("Position has already been withdrawn")]
    PositionInactive,

    #[msg("Invalid timestamp or time window")]
    InvalidTimestamp,

    #[msg("Commission factor exceeds the commission divider")]
    InvalidCommissionFactor,

    #[msg("Boost has already finished")]
    CampaignFinished,

    #[msg("Cannot snapshot a boost while the pool has no locked value")]
    EmptyEligibilitySnapshot,

    #[msg("Requested amount exceeds rewards not yet allocated to stakers")]
    InsufficientUnallocatedRewards,

    #[msg("Pool creation is currently disabled")]
    PoolCreationDisabled,

    #[msg("Invalid vault account")]
    InvalidVault,

    #[msg("No token account provided for the transfer recipient")]
    InvalidRecipient,

    #[msg("Math operation overflowed or underflowed")]
    MathOverflow,

    #[msg("Missing remaining account")]
    MissingRemainingAccount,

    #[msg("Requested amount exceeds the vault balance the ledger does not account for")]
    StrayBalanceExceeded,

    #[msg("Mints with a transfer fee are not supported")]
    UnsupportedMint,
}
