use crate::error::ErrorCode;
use crate::states::{BoostCampaign, StakingPool, StrayTokensRecovered};
use crate::utils::{Custody, Outbox, VaultTransferPort};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

/// Accounts context for `recover_stray_tokens`. Creator only.
///
/// `vault` is the pool lock vault, the pool reward vault, or, when `campaign`
/// is given, that campaign's boost vault.
#[derive(Accounts)]
pub struct RecoverStrayTokens<'info> {
    pub creator: Signer<'info>,

    #[account(has_one = creator @ ErrorCode::Unauthorized)]
    pub pool: Box<Account<'info, StakingPool>>,

    #[account(has_one = pool @ ErrorCode::InvalidOwner)]
    pub campaign: Option<Box<Account<'info, BoostCampaign>>>,

    /// CHECK: PDA derivation enforced via seeds; signs the payout.
    #[account(
        seeds = [crate::AUTH_SEED.as_bytes()],
        bump,
    )]
    pub authority: UncheckedAccount<'info>,

    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = authority,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = mint,
        token::authority = creator,
        token::token_program = token_program,
    )]
    pub creator_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Sends the creator tokens that reached a vault without going through the
/// ledger. Only the balance above what the ledger owes can leave.
pub fn recover_stray_tokens(ctx: Context<RecoverStrayTokens>, amount: u64) -> Result<()> {
    let vault_key = ctx.accounts.vault.key();
    let vault_balance = ctx.accounts.vault.amount;

    let mut outbox = Outbox::new();
    let custody = match &ctx.accounts.campaign {
        Some(campaign) => {
            require_keys_eq!(vault_key, campaign.vault, ErrorCode::InvalidVault);
            campaign.recover_stray_tokens(vault_balance, amount, &mut outbox)?;
            Custody::BoostVault
        }
        None => {
            let custody = ctx.accounts.pool.custody_of(&vault_key)?;
            ctx.accounts
                .pool
                .recover_stray_tokens(custody, vault_balance, amount, &mut outbox)?;
            custody
        }
    };

    let auth_bump = [ctx.bumps.authority];
    let seeds: &[&[u8]] = &[crate::AUTH_SEED.as_bytes(), &auth_bump];
    let signer_seeds = &[seeds];
    let mut port = VaultTransferPort::new(
        ctx.accounts.authority.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        signer_seeds,
    )
    .with_source(custody, &ctx.accounts.vault, &ctx.accounts.mint)
    .with_recipient(&ctx.accounts.creator_token_account);
    outbox.dispatch(&mut port)?;
    msg!("Recovered {} stray tokens from {}", amount, vault_key);

    emit!(StrayTokensRecovered {
        pool: ctx.accounts.pool.key(),
        vault: vault_key,
        recipient: ctx.accounts.creator.key(),
        amount,
    });
    Ok(())
}
