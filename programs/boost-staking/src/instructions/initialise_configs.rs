use crate::error::ErrorCode;
use crate::math::COMMISSION_DIVIDER;
use crate::states::*;
use anchor_lang::prelude::*;
use std::ops::DerefMut;

/// Accounts context for `initialise_configs`.
///
/// Creates the single `GlobalConfig` PDA. Only the program-level admin may
/// call it, and only once (the `init` constraint fails on a second attempt).
#[derive(Accounts)]
pub struct InitialiseConfigs<'info> {
    /// Admin signer (must match the program-level admin id). Pays for the account.
    #[account(
        mut,
        address = crate::admin::id() @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    /// Global configuration account holding protocol parameters.
    #[account(
        init,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump,
        payer = owner,
        space = GlobalConfig::LEN
    )]
    pub global_config: Account<'info, GlobalConfig>,

    pub system_program: Program<'info, System>,
}

/// Writes the protocol-wide parameters.
///
/// Steps:
/// 1. Validate the commission factor against `COMMISSION_DIVIDER`.
/// 2. Write admin, commission settings and the pool-creation switch.
/// 3. Emit `GlobalConfigInitialized`.
pub fn initialise_configs(
    ctx: Context<InitialiseConfigs>,
    admin: Pubkey,
    commission_factor: u16,
    commission_wallet: Pubkey,
    pool_creation_enabled: bool,
) -> Result<()> {
    require!(
        u64::from(commission_factor) <= COMMISSION_DIVIDER,
        ErrorCode::InvalidCommissionFactor
    );
    require_keys_neq!(admin, Pubkey::default());

    let global_config = ctx.accounts.global_config.deref_mut();
    global_config.bump = ctx.bumps.global_config;
    global_config.admin = admin;
    global_config.commission_factor = commission_factor;
    global_config.commission_wallet = commission_wallet;
    global_config.pool_creation_enabled = pool_creation_enabled;
    global_config.pools_created = 0;
    msg!("Global Config initialized");

    emit!(GlobalConfigInitialized {
        admin,
        commission_factor,
        commission_wallet,
        pool_creation_enabled,
    });
    Ok(())
}
