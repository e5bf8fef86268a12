use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::transfer_from_user_to_pool_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `stake`.
///
/// The position PDA is derived from the pool's `next_position_index`, so
/// indices are dense and follow creation order.
#[derive(Accounts)]
pub struct Stake<'info> {
    /// Staker; owns the new position and pays for it.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(mut)]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        init,
        seeds = [
            POSITION_SEED.as_bytes(),
            pool.key().as_ref(),
            pool.next_position_index.to_le_bytes().as_ref(),
        ],
        bump,
        payer = owner,
        space = Position::LEN
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(address = pool.lock_mint @ ErrorCode::InvalidVault)]
    pub lock_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.lock_vault @ ErrorCode::InvalidVault)]
    pub lock_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Staker's token account the locked amount is taken from.
    #[account(
        mut,
        token::mint = lock_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Locks `amount` for at least `lock_period` seconds.
///
/// Steps:
/// 1. Transfer `amount` from the staker into the lock vault.
/// 2. Ledger: accrue, check minimums and the pool window, raise TVL, open
///    the position at the current accumulator.
/// 3. Emit `Staked`.
pub fn stake(ctx: Context<Stake>, amount: u64, lock_period: u64, transferable: bool) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    transfer_from_user_to_pool_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_token_account.to_account_info(),
        ctx.accounts.lock_vault.to_account_info(),
        ctx.accounts.lock_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.lock_mint.decimals,
    )?;

    let pool_key = ctx.accounts.pool.key();
    let position_key = ctx.accounts.position.key();
    let owner = ctx.accounts.owner.key();
    let pool = ctx.accounts.pool.deref_mut();
    let position = ctx.accounts.position.deref_mut();

    let index = pool.stake(
        pool_key,
        position,
        StakeRequest {
            owner,
            amount,
            lock_period,
            transferable,
        },
        now,
    )?;
    position.bump = ctx.bumps.position;
    msg!("Position {} opened with {}", index, amount);

    emit!(Staked {
        pool: pool_key,
        position: position_key,
        owner,
        index,
        amount,
        unlock_time: position.unlock_time,
        total_locked: pool.total_locked,
    });
    Ok(())
}
