use crate::error::ErrorCode;
use crate::states::{PoolRewardsWithdrawn, StakingPool};
use crate::utils::{Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `withdraw_pool_rewards`. Creator only.
#[derive(Accounts)]
pub struct WithdrawPoolRewards<'info> {
    pub creator: Signer<'info>,

    #[account(
        mut,
        has_one = creator @ ErrorCode::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: PDA derivation enforced via seeds; signs the payout.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = pool.reward_mint @ ErrorCode::InvalidVault)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = creator,
        token::token_program = token_program,
    )]
    pub creator_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Returns rewards that no position has accrued yet to the creator and
/// re-derives the farming speed from what is left.
pub fn withdraw_pool_rewards(ctx: Context<WithdrawPoolRewards>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let auth_bump = [ctx.bumps.authority];
    let seeds: &[&[u8]] = &[crate::AUTH_SEED.as_bytes(), &auth_bump];
    let signer_seeds = &[seeds];
    let mut port = VaultTransferPort::new(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )
    .with_source(
        Custody::RewardVault,
        &ctx.accounts.reward_vault,
        &ctx.accounts.reward_mint,
    )
    .with_recipient(&ctx.accounts.creator_token_account);

    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;
    let mut outbox = Outbox::new();
    pool.withdraw_rewards(amount, now, &mut outbox)?;
    outbox.dispatch(&mut port)?;

    emit!(PoolRewardsWithdrawn {
        pool: pool_key,
        amount,
        rewards_remaining: pool.rewards_remaining,
        farming_speed: pool.farming_speed,
    });
    Ok(())
}
