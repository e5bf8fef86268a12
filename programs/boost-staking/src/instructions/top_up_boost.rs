use crate::error::ErrorCode;
use crate::states::{BoostCampaign, BoostToppedUp};
use crate::utils::transfer_from_user_to_pool_vault;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `top_up_boost`. Anyone may fund a running campaign.
#[derive(Accounts)]
pub struct TopUpBoost<'info> {
    pub funder: Signer<'info>,

    #[account(mut)]
    pub campaign: Box<Account<'info, BoostCampaign>>,

    #[account(address = campaign.reward_mint @ ErrorCode::InvalidVault)]
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = campaign.vault @ ErrorCode::InvalidVault)]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = boost_mint,
        token::authority = funder,
        token::token_program = token_program,
    )]
    pub funder_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Adds `amount` to the campaign and re-derives its speed. The eligibility
/// snapshot is not touched.
pub fn top_up_boost(ctx: Context<TopUpBoost>, amount: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    transfer_from_user_to_pool_vault(
        ctx.accounts.funder.to_account_info(),
        ctx.accounts.funder_token_account.to_account_info(),
        ctx.accounts.boost_vault.to_account_info(),
        ctx.accounts.boost_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.boost_mint.decimals,
    )?;

    let campaign_key = ctx.accounts.campaign.key();
    let campaign = &mut ctx.accounts.campaign;
    campaign.fund(amount, now)?;

    emit!(BoostToppedUp {
        campaign: campaign_key,
        funder: ctx.accounts.funder.key(),
        amount,
        total_funded: campaign.total_funded,
    });
    Ok(())
}
