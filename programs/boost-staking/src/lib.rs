use anchor_lang::prelude::*;

declare_id!("9BAf4vfu1cMftzuAUevjcfocVVdykd5xGZwVYLWLGPyj");

pub mod admin {
    use anchor_lang::prelude::declare_id;
    declare_id!("2pWaPQQFNSFxnSXtVKrk71m3vXrGZKWSvT8zY2ESVMSu");
}

/// PDA seed of the authority owning every vault of the program.
pub const AUTH_SEED: &str = "vault_and_ledger_auth";

pub mod error;
pub mod instructions;
pub mod math;
pub mod states;
pub mod utils;

use instructions::*;
use states::PoolParams;

#[program]
pub mod boost_staking {

    use super::*;

    pub fn initialise_configs(
        ctx: Context<InitialiseConfigs>,
        admin: Pubkey,
        commission_factor: u16,
        commission_wallet: Pubkey,
        pool_creation_enabled: bool,
    ) -> Result<()> {
        instructions::initialise_configs(
            ctx,
            admin,
            commission_factor,
            commission_wallet,
            pool_creation_enabled,
        )
    }

    pub fn update_config(ctx: Context<UpdateConfig>, param: u8, value: u64) -> Result<()> {
        instructions::update_config(ctx, param, value)
    }

    pub fn create_pool(ctx: Context<CreatePool>, pool_id: u64, params: PoolParams) -> Result<()> {
        instructions::create_pool(ctx, pool_id, params)
    }

    pub fn update_pool(ctx: Context<UpdatePool>, param: u8, value: u64) -> Result<()> {
        instructions::update_pool(ctx, param, value)
    }

    pub fn add_pool_rewards(
        ctx: Context<AddPoolRewards>,
        amount: u64,
        new_end_time: Option<i64>,
    ) -> Result<()> {
        instructions::add_pool_rewards(ctx, amount, new_end_time)
    }

    pub fn withdraw_pool_rewards(ctx: Context<WithdrawPoolRewards>, amount: u64) -> Result<()> {
        instructions::withdraw_pool_rewards(ctx, amount)
    }

    pub fn stake(
        ctx: Context<Stake>,
        amount: u64,
        lock_period: u64,
        transferable: bool,
    ) -> Result<()> {
        instructions::stake(ctx, amount, lock_period, transferable)
    }

    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        instructions::claim_rewards(ctx)
    }

    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw(ctx)
    }

    pub fn create_boost(ctx: Context<CreateBoost>, start_time: i64, end_time: i64) -> Result<()> {
        instructions::create_boost(ctx, start_time, end_time)
    }

    pub fn top_up_boost(ctx: Context<TopUpBoost>, amount: u64) -> Result<()> {
        instructions::top_up_boost(ctx, amount)
    }

    pub fn claim_boost_rewards(ctx: Context<ClaimBoostRewards>) -> Result<()> {
        instructions::claim_boost_rewards(ctx)
    }

    pub fn recover_stray_tokens(ctx: Context<RecoverStrayTokens>, amount: u64) -> Result<()> {
        instructions::recover_stray_tokens(ctx, amount)
    }
}
