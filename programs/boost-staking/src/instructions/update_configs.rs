use crate::error::ErrorCode;
use crate::math::COMMISSION_DIVIDER;
use crate::states::{ConfigUpdated, GlobalConfig, GLOBAL_CONFIG_SEED};
use anchor_lang::prelude::*;

/// Accounts context for the `update_config` instruction.
///
/// Only the current `admin` in `global_config` or the program-level admin
/// (`crate::admin::id()`) may update it.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// Authorized signer: must be the stored admin or the hardcoded program admin.
    #[account(
        constraint = (owner.key() == global_config.admin || owner.key() == crate::admin::id()) @ ErrorCode::InvalidOwner
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
    )]
    pub global_config: Account<'info, GlobalConfig>,
}

/// Updates one field of the global configuration.
///
/// # Param Mapping
/// - `0`: **Admin change**. New admin Pubkey passed via `remaining_accounts[0]`.
/// - `1`: **commission_factor**. Must not exceed `COMMISSION_DIVIDER`; applies
///   to pools created afterwards.
/// - `2`: **commission_wallet**. New wallet passed via `remaining_accounts[0]`.
/// - `3`: **pool_creation_enabled**. Nonzero `value` enables.
///
/// Any other `param` value returns `ErrorCode::InvalidParam`.
pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
    let global_config = &mut ctx.accounts.global_config;
    match param {
        0 => {
            let new_admin = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?
                .key;
            require_keys_neq!(new_admin, Pubkey::default());
            global_config.admin = new_admin;
        }
        1 => {
            require!(value <= COMMISSION_DIVIDER, ErrorCode::InvalidCommissionFactor);
            global_config.commission_factor =
                u16::try_from(value).map_err(|_| ErrorCode::InvalidCommissionFactor)?;
        }
        2 => {
            let new_wallet = *ctx
                .remaining_accounts
                .iter()
                .next()
                .ok_or(error!(ErrorCode::MissingRemainingAccount))?
                .key;
            require_keys_neq!(new_wallet, Pubkey::default());
            global_config.commission_wallet = new_wallet;
        }
        3 => {
            global_config.pool_creation_enabled = value != 0;
        }
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(ConfigUpdated {
        admin: global_config.admin,
        param,
        commission_factor: global_config.commission_factor,
        commission_wallet: global_config.commission_wallet,
        pool_creation_enabled: global_config.pool_creation_enabled,
    });
    Ok(())
}
