use crate::error::ErrorCode;
use crate::states::{Position, RewardsClaimed, StakingPool};
use crate::utils::{Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `claim_rewards`.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    /// Position owner.
    pub owner: Signer<'info>,

    #[account(mut)]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        mut,
        has_one = pool @ ErrorCode::InvalidOwner,
        has_one = owner @ ErrorCode::Unauthorized,
    )]
    pub position: Box<Account<'info, Position>>,

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

    /// Owner's reward-token account.
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_reward_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Pays the position everything accrued since its last settlement.
///
/// Steps:
/// 1. Ledger: accrue, compute the entitlement from the accumulator growth,
///    move the snapshot, deduct from `rewards_remaining`.
/// 2. Pay out of the reward vault.
/// 3. Emit `RewardsClaimed`.
pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
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
    .with_recipient(&ctx.accounts.owner_reward_account);

    let pool_key = ctx.accounts.pool.key();
    let position_key = ctx.accounts.position.key();
    let pool = ctx.accounts.pool.deref_mut();
    let position = ctx.accounts.position.deref_mut();
    let mut outbox = Outbox::new();
    let amount = pool.settle(position, now, &mut outbox)?;
    outbox.dispatch(&mut port)?;

    emit!(RewardsClaimed {
        pool: pool_key,
        position: position_key,
        owner: position.owner,
        amount,
        claimed_total: position.claimed_total,
    });
    Ok(())
}
