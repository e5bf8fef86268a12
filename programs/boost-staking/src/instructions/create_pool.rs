use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::require_fee_free_mint;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `create_pool`.
///
/// Creates the pool PDA together with its lock vault and reward vault, both
/// owned by the program authority PDA.
#[derive(Accounts)]
#[instruction(pool_id: u64)]
pub struct CreatePool<'info> {
    /// Pool creator; pays for all new accounts.
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Global configuration; pool creation must be enabled.
    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED.as_bytes()],
        bump = global_config.bump,
        constraint = global_config.pool_creation_enabled @ ErrorCode::PoolCreationDisabled,
    )]
    pub global_config: Box<Account<'info, GlobalConfig>>,

    /// CHECK: PDA derivation enforced via seeds; only used as vault authority.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(
        init,
        seeds = [
            STAKING_POOL_SEED.as_bytes(),
            creator.key().as_ref(),
            pool_id.to_le_bytes().as_ref(),
        ],
        bump,
        payer = creator,
        space = StakingPool::LEN
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// Mint of the token users lock.
    #[account(mint::token_program = token_program)]
    pub lock_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Mint pool rewards are paid in.
    #[account(mint::token_program = token_program)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        seeds = [LOCK_VAULT_SEED.as_bytes(), pool.key().as_ref()],
        bump,
        payer = creator,
        token::mint = lock_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub lock_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        seeds = [REWARD_VAULT_SEED.as_bytes(), pool.key().as_ref()],
        bump,
        payer = creator,
        token::mint = reward_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Opens a staking pool.
///
/// Steps:
/// 1. Reject transfer-fee mints, validate the pool window and minimum deposit.
/// 2. Copy commission factor and commission wallet from `global_config`.
/// 3. Record mints and vaults, start the accumulator at zero.
/// 4. Emit `PoolCreated`.
pub fn create_pool(ctx: Context<CreatePool>, pool_id: u64, params: PoolParams) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    require_fee_free_mint(&ctx.accounts.lock_mint.to_account_info())?;
    require_fee_free_mint(&ctx.accounts.reward_mint.to_account_info())?;
    let global_config = ctx.accounts.global_config.deref_mut();
    let pool_key = ctx.accounts.pool.key();

    let pool = ctx.accounts.pool.deref_mut();
    pool.open(&params, global_config.commission_factor, now)?;
    pool.bump = ctx.bumps.pool;
    pool.pool_id = pool_id;
    pool.creator = ctx.accounts.creator.key();
    pool.lock_mint = ctx.accounts.lock_mint.key();
    pool.reward_mint = ctx.accounts.reward_mint.key();
    pool.lock_vault = ctx.accounts.lock_vault.key();
    pool.reward_vault = ctx.accounts.reward_vault.key();
    pool.commission_wallet = global_config.commission_wallet;

    global_config.pools_created = global_config
        .pools_created
        .checked_add(1)
        .ok_or(ErrorCode::MathOverflow)?;
    msg!("Pool {} created by {}", pool_key, pool.creator);

    emit!(PoolCreated {
        pool: pool_key,
        creator: pool.creator,
        pool_id,
        lock_mint: pool.lock_mint,
        reward_mint: pool.reward_mint,
        min_lock_duration: pool.min_lock_duration,
        minimum_deposit: pool.minimum_deposit,
        commission_factor: pool.commission_factor,
        pool_start_time: pool.pool_start_time,
        pool_end_time: pool.pool_end_time,
    });
    Ok(())
}
