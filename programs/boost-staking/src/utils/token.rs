use crate::error::ErrorCode;
use anchor_lang::prelude::*;
use anchor_spl::token_2022::spl_token_2022::{
    extension::{transfer_fee::TransferFeeConfig, BaseStateWithExtensions, StateWithExtensions},
    state::Mint,
};
use anchor_spl::token_interface;

/// Whether a mint account (SPL Token or Token-2022) carries the transfer-fee
/// extension. Such mints deliver less than the amount sent, so vaults would
/// fall short of what the ledger credits.
pub fn has_transfer_fee(mint_data: &[u8]) -> Result<bool> {
    let mint = StateWithExtensions::<Mint>::unpack(mint_data)
        .map_err(|_| error!(ErrorCode::UnsupportedMint))?;
    Ok(mint.get_extension::<TransferFeeConfig>().is_ok())
}

/// Fails with `UnsupportedMint` for mints with a transfer fee.
pub fn require_fee_free_mint(mint: &AccountInfo) -> Result<()> {
    let data = mint.try_borrow_data()?;
    require!(!has_transfer_fee(&data)?, ErrorCode::UnsupportedMint);
    Ok(())
}

/// Moves `amount` from a user-owned token account into a program vault.
/// The user signs the outer transaction, so no PDA seeds are needed.
pub fn transfer_from_user_to_pool_vault<'a>(
    authority: AccountInfo<'a>,
    from: AccountInfo<'a>,
    to_vault: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new(
            token_program,
            token_interface::TransferChecked {
                from,
                to: to_vault,
                authority,
                mint,
            },
        ),
        amount,
        mint_decimals,
    )
}

/// Moves `amount` out of a program vault, signed by the vault authority PDA.
pub fn transfer_from_pool_vault_to_user<'a>(
    authority: AccountInfo<'a>,
    from_vault: AccountInfo<'a>,
    to: AccountInfo<'a>,
    mint: AccountInfo<'a>,
    token_program: AccountInfo<'a>,
    amount: u64,
    mint_decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            token_program,
            token_interface::TransferChecked {
                from: from_vault,
                to,
                authority,
                mint,
            },
            signer_seeds,
        ),
        amount,
        mint_decimals,
    )
}
