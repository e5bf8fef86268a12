use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::require_fee_free_mint;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `create_boost`. Pool creator only.
///
/// The campaign PDA is derived from the pool's `next_campaign_index`; its
/// vault may hold a different mint than the pool rewards.
#[derive(Accounts)]
pub struct CreateBoost<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        has_one = creator @ ErrorCode::Unauthorized,
    )]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(
        init,
        seeds = [
            BOOST_SEED.as_bytes(),
            pool.key().as_ref(),
            pool.next_campaign_index.to_le_bytes().as_ref(),
        ],
        bump,
        payer = creator,
        space = BoostCampaign::LEN
    )]
    pub campaign: Box<Account<'info, BoostCampaign>>,

    /// CHECK: PDA derivation enforced via seeds; only used as vault authority.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Mint the bonus is paid in.
    #[account(mint::token_program = token_program)]
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        seeds = [BOOST_VAULT_SEED.as_bytes(), campaign.key().as_ref()],
        bump,
        payer = creator,
        token::mint = boost_mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Opens a boost campaign over `[start_time, end_time)`.
///
/// Positions that exist in the pool right now, and the pool TVL right now,
/// form the eligibility snapshot. Funding arrives through `top_up_boost`.
pub fn create_boost(ctx: Context<CreateBoost>, start_time: i64, end_time: i64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    require_fee_free_mint(&ctx.accounts.boost_mint.to_account_info())?;
    let pool_key = ctx.accounts.pool.key();
    let campaign_key = ctx.accounts.campaign.key();
    let boost_mint = ctx.accounts.boost_mint.key();
    let boost_vault = ctx.accounts.boost_vault.key();

    let pool = ctx.accounts.pool.deref_mut();
    let campaign = ctx.accounts.campaign.deref_mut();
    let index = campaign.open(
        pool_key,
        pool,
        boost_mint,
        boost_vault,
        start_time,
        end_time,
        now,
    )?;
    campaign.bump = ctx.bumps.campaign;
    msg!(
        "Boost {} covers {} positions, {} locked",
        index,
        campaign.eligibility_index_cutoff,
        campaign.eligibility_tvl_snapshot
    );

    emit!(BoostCreated {
        pool: pool_key,
        campaign: campaign_key,
        index,
        reward_mint: boost_mint,
        campaign_start: campaign.campaign_start,
        campaign_end: campaign.campaign_end,
        eligibility_index_cutoff: campaign.eligibility_index_cutoff,
        eligibility_tvl_snapshot: campaign.eligibility_tvl_snapshot,
    });
    Ok(())
}
