//! Outbound asset movements.
//!
//! Ledger operations never call the token program. They append
//! [`TransferOrder`]s to an [`Outbox`] while mutating their own state, and the
//! instruction handler drains the outbox into an [`AssetTransferPort`] once all
//! state changes are written. Replaying or dropping an order cannot make the
//! ledger pay twice: the snapshots and the `closed` flag are already updated.

use crate::error::ErrorCode;
use crate::utils::transfer_from_pool_vault_to_user;
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

/// Program-controlled holding an order is paid from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Custody {
    /// Principal locked by stakers.
    LockVault,
    /// Pool-wide reward balance.
    RewardVault,
    /// Bonus balance of a single boost campaign.
    BoostVault,
}

/// Instruction to move `amount` of `asset` from `from` to the wallet `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferOrder {
    pub asset: Pubkey,
    pub from: Custody,
    pub to: Pubkey,
    pub amount: u64,
}

/// External collaborator that actually moves tokens.
pub trait AssetTransferPort {
    fn transfer(&mut self, order: &TransferOrder) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct Outbox {
    orders: Vec<TransferOrder>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a transfer. Zero amounts are dropped.
    pub fn push(&mut self, asset: Pubkey, from: Custody, to: Pubkey, amount: u64) {
        if amount == 0 {
            return;
        }
        self.orders.push(TransferOrder {
            asset,
            from,
            to,
            amount,
        });
    }

    pub fn orders(&self) -> &[TransferOrder] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of everything queued for `to` out of `from`.
    pub fn total_to(&self, to: &Pubkey, from: Custody) -> u64 {
        self.orders
            .iter()
            .filter(|order| order.to == *to && order.from == from)
            .map(|order| order.amount)
            .sum()
    }

    /// Hands every queued order to `port`, in the order they were queued.
    pub fn dispatch<P: AssetTransferPort + ?Sized>(self, port: &mut P) -> Result<()> {
        for order in self.orders.iter() {
            port.transfer(order)?;
        }
        Ok(())
    }
}

struct VaultSource<'info> {
    custody: Custody,
    vault: AccountInfo<'info>,
    mint: AccountInfo<'info>,
    mint_key: Pubkey,
    decimals: u8,
}

struct Recipient<'info> {
    owner: Pubkey,
    mint: Pubkey,
    account: AccountInfo<'info>,
}

/// On-chain port: pays orders out of PDA-owned vaults with `transfer_checked`.
///
/// Sources are registered per [`Custody`]; recipients are matched by the
/// owner and mint of the token accounts passed to the instruction.
pub struct VaultTransferPort<'a, 'info> {
    authority: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    signer_seeds: &'a [&'a [&'a [u8]]],
    sources: Vec<VaultSource<'info>>,
    recipients: Vec<Recipient<'info>>,
}

impl<'a, 'info> VaultTransferPort<'a, 'info> {
    pub fn new(
        authority: AccountInfo<'info>,
        token_program: AccountInfo<'info>,
        signer_seeds: &'a [&'a [&'a [u8]]],
    ) -> Self {
        Self {
            authority,
            token_program,
            signer_seeds,
            sources: Vec::new(),
            recipients: Vec::new(),
        }
    }

    pub fn with_source(
        mut self,
        custody: Custody,
        vault: &InterfaceAccount<'info, TokenAccount>,
        mint: &InterfaceAccount<'info, Mint>,
    ) -> Self {
        self.sources.push(VaultSource {
            custody,
            vault: vault.to_account_info(),
            mint: mint.to_account_info(),
            mint_key: mint.key(),
            decimals: mint.decimals,
        });
        self
    }

    pub fn with_recipient(mut self, account: &InterfaceAccount<'info, TokenAccount>) -> Self {
        self.recipients.push(Recipient {
            owner: account.owner,
            mint: account.mint,
            account: account.to_account_info(),
        });
        self
    }
}

impl<'a, 'info> AssetTransferPort for VaultTransferPort<'a, 'info> {
    fn transfer(&mut self, order: &TransferOrder) -> Result<()> {
        let source = self
            .sources
            .iter()
            .find(|source| source.custody == order.from && source.mint_key == order.asset)
            .ok_or(ErrorCode::InvalidVault)?;
        let recipient = self
            .recipients
            .iter()
            .find(|recipient| recipient.owner == order.to && recipient.mint == order.asset)
            .ok_or(ErrorCode::InvalidRecipient)?;

        msg!(
            "transfer {} from {:?} to {}",
            order.amount,
            order.from,
            order.to
        );
        transfer_from_pool_vault_to_user(
            self.authority.clone(),
            source.vault.clone(),
            recipient.account.clone(),
            source.mint.clone(),
            self.token_program.clone(),
            order.amount,
            source.decimals,
            self.signer_seeds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingPort {
        seen: Vec<TransferOrder>,
        fail_after: Option<usize>,
    }

    impl AssetTransferPort for RecordingPort {
        fn transfer(&mut self, order: &TransferOrder) -> Result<()> {
            if self.fail_after == Some(self.seen.len()) {
                return Err(ErrorCode::InvalidRecipient.into());
            }
            self.seen.push(*order);
            Ok(())
        }
    }

    #[test]
    fn zero_amounts_are_not_queued() {
        let mut outbox = Outbox::new();
        outbox.push(Pubkey::new_unique(), Custody::RewardVault, Pubkey::new_unique(), 0);
        assert!(outbox.is_empty());
    }

    #[test]
    fn dispatch_preserves_queue_order() {
        let asset = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let mut outbox = Outbox::new();
        outbox.push(asset, Custody::RewardVault, user, 5);
        outbox.push(asset, Custody::LockVault, user, 100);
        assert_eq!(outbox.total_to(&user, Custody::RewardVault), 5);
        assert_eq!(outbox.total_to(&user, Custody::LockVault), 100);

        let mut port = RecordingPort::default();
        outbox.dispatch(&mut port).unwrap();
        assert_eq!(port.seen.len(), 2);
        assert_eq!(port.seen[0].from, Custody::RewardVault);
        assert_eq!(port.seen[1].amount, 100);
    }

    #[test]
    fn port_failure_is_propagated() {
        let mut outbox = Outbox::new();
        outbox.push(Pubkey::new_unique(), Custody::BoostVault, Pubkey::new_unique(), 7);
        let mut port = RecordingPort {
            fail_after: Some(0),
            ..Default::default()
        };
        assert!(outbox.dispatch(&mut port).is_err());
        assert!(port.seen.is_empty());
    }
}
