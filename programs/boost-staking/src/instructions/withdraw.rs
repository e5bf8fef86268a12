use crate::error::ErrorCode;
use crate::states::{Position, PositionWithdrawn, StakingPool};
use crate::utils::{Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `withdraw`.
///
/// Needs both vaults: outstanding rewards are settled before the principal
/// leaves the lock vault.
#[derive(Accounts)]
pub struct Withdraw<'info> {
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

    /// CHECK: PDA derivation enforced via seeds; signs both payouts.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = pool.lock_mint @ ErrorCode::InvalidVault)]
    pub lock_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.lock_vault @ ErrorCode::InvalidVault)]
    pub lock_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = pool.reward_mint @ ErrorCode::InvalidVault)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Owner's lock-token account receiving the principal.
    #[account(
        mut,
        token::mint = lock_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_lock_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Owner's reward-token account. Omit it when the pool locks and pays the
    /// same mint; `owner_lock_account` then receives both transfers.
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_reward_account: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Closes out an unlocked position.
///
/// Steps:
/// 1. Ledger: require `now >= unlock_time`, settle outstanding rewards,
///    lower TVL, deactivate the position and record its campaign horizon.
/// 2. Pay the rewards, then return the principal.
/// 3. Emit `PositionWithdrawn`.
///
/// The position account is kept so its history stays queryable.
pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
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
        Custody::LockVault,
        &ctx.accounts.lock_vault,
        &ctx.accounts.lock_mint,
    )
    .with_source(
        Custody::RewardVault,
        &ctx.accounts.reward_vault,
        &ctx.accounts.reward_mint,
    )
    .with_recipient(&ctx.accounts.owner_lock_account);
    if let Some(owner_reward_account) = &ctx.accounts.owner_reward_account {
        port = port.with_recipient(owner_reward_account);
    }

    let pool_key = ctx.accounts.pool.key();
    let position_key = ctx.accounts.position.key();
    let pool = ctx.accounts.pool.deref_mut();
    let position = ctx.accounts.position.deref_mut();
    let mut outbox = Outbox::new();
    let receipt = pool.withdraw(position, now, &mut outbox)?;
    outbox.dispatch(&mut port)?;
    msg!(
        "Position {} withdrawn: {} principal, {} rewards",
        position.index,
        receipt.principal,
        receipt.rewards
    );

    emit!(PositionWithdrawn {
        pool: pool_key,
        position: position_key,
        owner: position.owner,
        principal: receipt.principal,
        rewards: receipt.rewards,
        total_locked: pool.total_locked,
    });
    Ok(())
}
