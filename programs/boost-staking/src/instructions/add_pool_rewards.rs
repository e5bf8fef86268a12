use crate::error::ErrorCode;
use crate::states::{PoolRewardsAdded, StakingPool};
use crate::utils::{transfer_from_user_to_pool_vault, Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `add_pool_rewards`.
///
/// Anyone may fund a pool; only the creator may extend its end time.
#[derive(Accounts)]
pub struct AddPoolRewards<'info> {
    pub funder: Signer<'info>,

    #[account(mut)]
    pub pool: Box<Account<'info, StakingPool>>,

    /// CHECK: PDA derivation enforced via seeds; signs the commission payout.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = pool.reward_mint @ ErrorCode::InvalidVault)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = pool.reward_vault @ ErrorCode::InvalidVault)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Funder's reward-token account the gross amount is taken from.
    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = funder,
        token::token_program = token_program,
    )]
    pub funder_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Reward-token account of the pool's commission wallet.
    #[account(
        mut,
        constraint = commission_token_account.owner == pool.commission_wallet @ ErrorCode::InvalidRecipient,
        constraint = commission_token_account.mint == pool.reward_mint @ ErrorCode::InvalidRecipient,
    )]
    pub commission_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Funds pool rewards.
///
/// Steps:
/// 1. Transfer the gross `amount` from the funder into the reward vault.
/// 2. Ledger: accrue, split off the commission, credit the rest, optionally
///    extend `pool_end_time`, recompute the farming speed.
/// 3. Forward the commission out of the reward vault.
/// 4. Emit `PoolRewardsAdded`.
pub fn add_pool_rewards(
    ctx: Context<AddPoolRewards>,
    amount: u64,
    new_end_time: Option<i64>,
) -> Result<()> {
    if new_end_time.is_some() {
        require_keys_eq!(
            ctx.accounts.funder.key(),
            ctx.accounts.pool.creator,
            ErrorCode::Unauthorized
        );
    }
    let now = Clock::get()?.unix_timestamp;

    transfer_from_user_to_pool_vault(
        ctx.accounts.funder.to_account_info(),
        ctx.accounts.funder_token_account.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
    )?;

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
    .with_recipient(&ctx.accounts.commission_token_account);

    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;
    let mut outbox = Outbox::new();
    let receipt = pool.fund_rewards(amount, new_end_time, now, &mut outbox)?;
    outbox.dispatch(&mut port)?;

    msg!(
        "Funded {} ({} commission), speed {} per day",
        amount,
        receipt.commission,
        pool.farming_speed
    );
    emit!(PoolRewardsAdded {
        pool: pool_key,
        funder: ctx.accounts.funder.key(),
        amount,
        commission: receipt.commission,
        rewards_remaining: pool.rewards_remaining,
        farming_speed: pool.farming_speed,
        pool_end_time: pool.pool_end_time,
    });
    Ok(())
}
