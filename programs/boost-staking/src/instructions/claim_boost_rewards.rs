use crate::error::ErrorCode;
use crate::states::*;
use crate::utils::{Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};
use std::ops::DerefMut;

/// Accounts context for `claim_boost_rewards`.
///
/// The claim record is created on the first attempt, paid for by the owner.
#[derive(Accounts)]
pub struct ClaimBoostRewards<'info> {
    /// Position owner.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(mut)]
    pub campaign: Box<Account<'info, BoostCampaign>>,

    #[account(
        has_one = owner @ ErrorCode::Unauthorized,
        constraint = position.pool == campaign.pool @ ErrorCode::NotEligible,
    )]
    pub position: Box<Account<'info, Position>>,

    #[account(
        init_if_needed,
        seeds = [
            BOOST_CLAIM_SEED.as_bytes(),
            campaign.key().as_ref(),
            position.key().as_ref(),
        ],
        bump,
        payer = owner,
        space = BoostClaimRecord::LEN
    )]
    pub claim_record: Box<Account<'info, BoostClaimRecord>>,

    /// CHECK: PDA derivation enforced via seeds; signs the payout.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(address = campaign.reward_mint @ ErrorCode::InvalidVault)]
    pub boost_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut, address = campaign.vault @ ErrorCode::InvalidVault)]
    pub boost_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Owner's account for the bonus mint.
    #[account(
        mut,
        token::mint = boost_mint,
        token::authority = owner,
        token::token_program = token_program,
    )]
    pub owner_boost_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Pays the position its share of the bonus released since its last claim.
///
/// Steps:
/// 1. Bind the claim record to (campaign, position) on first use.
/// 2. Ledger: check eligibility and closure, compute the delta against the
///    frozen TVL snapshot, move the record snapshot, close it once the
///    campaign has ended.
/// 3. Pay out of the boost vault.
/// 4. Emit `BoostRewardsClaimed`.
pub fn claim_boost_rewards(ctx: Context<ClaimBoostRewards>) -> Result<()> {
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
        Custody::BoostVault,
        &ctx.accounts.boost_vault,
        &ctx.accounts.boost_mint,
    )
    .with_recipient(&ctx.accounts.owner_boost_account);

    let campaign_key = ctx.accounts.campaign.key();
    let position_key = ctx.accounts.position.key();
    let campaign = ctx.accounts.campaign.deref_mut();
    let position = &ctx.accounts.position;
    let record = ctx.accounts.claim_record.deref_mut();
    record.bind(campaign_key, position_key, ctx.bumps.claim_record)?;

    let mut outbox = Outbox::new();
    let amount = record.claim(campaign, position, now, &mut outbox)?;
    outbox.dispatch(&mut port)?;
    if record.closed {
        msg!("Boost claim record {} closed", position_key);
    }

    emit!(BoostRewardsClaimed {
        campaign: campaign_key,
        position: position_key,
        owner: position.owner,
        amount,
        closed: record.closed,
    });
    Ok(())
}
