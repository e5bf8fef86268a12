use anchor_client::{Client, Cluster, Program};
use anchor_lang::prelude::AccountMeta;
use anyhow::Result;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};

use boost_staking::accounts as staking_accounts;
use boost_staking::instruction as staking_instructions;
use boost_staking::states::{BoostCampaign, PoolParams, Position, StakingPool};
use std::rc::Rc;

use crate::instructions::utils::*;

use super::super::{read_keypair_file, ClientConfig};

fn staking_program(config: &ClientConfig) -> Result<Program<Rc<Keypair>>> {
    let payer = read_keypair_file(&config.payer_path)?;
    let url = Cluster::Custom(config.http_url.clone(), config.ws_url.clone());
    let client = Client::new(url, Rc::new(payer));
    Ok(client.program(config.boost_staking_program)?)
}

/// Associated token account of `owner` for `mint`, plus an idempotent create
/// instruction so payouts never fail on a missing account.
fn associated_account(
    program: &Program<Rc<Keypair>>,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, Instruction)> {
    let token_program = get_token_program(&program.rpc(), mint)?;
    let address = get_associated_token_address_with_program_id(owner, mint, &token_program);
    let create = create_associated_token_account_idempotent(
        &program.payer(),
        owner,
        mint,
        &token_program,
    );
    Ok((address, create))
}

pub fn initialise_configs_instr(
    config: &ClientConfig,
    admin: Pubkey,
    commission_factor: u16,
    commission_wallet: Pubkey,
    pool_creation_enabled: bool,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let instructions = program
        .request()
        .accounts(staking_accounts::InitialiseConfigs {
            owner: read_keypair_file(&config.admin_path)?.pubkey(),
            global_config: get_global_config_address(&program.id()),
            system_program: system_program::id(),
        })
        .args(staking_instructions::InitialiseConfigs {
            admin,
            commission_factor,
            commission_wallet,
            pool_creation_enabled,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn update_config_instr(
    config: &ClientConfig,
    param: u8,
    value: u64,
    key: Option<Pubkey>,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let mut ixs = program
        .request()
        .accounts(staking_accounts::UpdateConfig {
            owner: read_keypair_file(&config.admin_path)?.pubkey(),
            global_config: get_global_config_address(&program.id()),
        })
        .args(staking_instructions::UpdateConfig { param, value })
        .instructions()?;

    // New admin or commission wallet travels as the first remaining account.
    if let Some(key) = key {
        ixs[0].accounts.push(AccountMeta::new_readonly(key, false));
    }
    Ok(ixs)
}

pub fn create_pool_instr(
    config: &ClientConfig,
    pool_id: u64,
    lock_mint: Pubkey,
    reward_mint: Pubkey,
    params: PoolParams,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let creator = program.payer();
    let pool = get_pool_address(&program.id(), &creator, pool_id);
    let token_program = get_token_program(&program.rpc(), &lock_mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::CreatePool {
            creator,
            global_config: get_global_config_address(&program.id()),
            authority: get_authority_address(&program.id()),
            pool,
            lock_mint,
            reward_mint,
            lock_vault: get_lock_vault_address(&program.id(), &pool),
            reward_vault: get_reward_vault_address(&program.id(), &pool),
            token_program,
            system_program: system_program::id(),
        })
        .args(staking_instructions::CreatePool { pool_id, params })
        .instructions()?;
    Ok(instructions)
}

pub fn update_pool_instr(
    config: &ClientConfig,
    pool: Pubkey,
    param: u8,
    value: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let instructions = program
        .request()
        .accounts(staking_accounts::UpdatePool {
            creator: program.payer(),
            pool,
        })
        .args(staking_instructions::UpdatePool { param, value })
        .instructions()?;
    Ok(instructions)
}

pub fn add_pool_rewards_instr(
    config: &ClientConfig,
    pool: Pubkey,
    amount: u64,
    new_end_time: Option<i64>,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let funder = program.payer();
    let (funder_token_account, _) =
        associated_account(&program, &funder, &pool_state.reward_mint)?;
    let (commission_token_account, create_commission_account) = associated_account(
        &program,
        &pool_state.commission_wallet,
        &pool_state.reward_mint,
    )?;

    let mut instructions = vec![create_commission_account];
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::AddPoolRewards {
                funder,
                pool,
                authority: get_authority_address(&program.id()),
                reward_mint: pool_state.reward_mint,
                reward_vault: pool_state.reward_vault,
                funder_token_account,
                commission_token_account,
                token_program: get_token_program(&program.rpc(), &pool_state.reward_mint)?,
            })
            .args(staking_instructions::AddPoolRewards {
                amount,
                new_end_time,
            })
            .instructions()?,
    );
    Ok(instructions)
}

pub fn withdraw_pool_rewards_instr(
    config: &ClientConfig,
    pool: Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let creator = program.payer();
    let (creator_token_account, create_creator_account) =
        associated_account(&program, &creator, &pool_state.reward_mint)?;

    let mut instructions = vec![create_creator_account];
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::WithdrawPoolRewards {
                creator,
                pool,
                authority: get_authority_address(&program.id()),
                reward_mint: pool_state.reward_mint,
                reward_vault: pool_state.reward_vault,
                creator_token_account,
                token_program: get_token_program(&program.rpc(), &pool_state.reward_mint)?,
            })
            .args(staking_instructions::WithdrawPoolRewards { amount })
            .instructions()?,
    );
    Ok(instructions)
}

pub fn stake_instr(
    config: &ClientConfig,
    pool: Pubkey,
    amount: u64,
    lock_period: u64,
    transferable: bool,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let owner = program.payer();
    let (owner_token_account, _) = associated_account(&program, &owner, &pool_state.lock_mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::Stake {
            owner,
            pool,
            position: get_position_address(
                &program.id(),
                &pool,
                pool_state.next_position_index,
            ),
            lock_mint: pool_state.lock_mint,
            lock_vault: pool_state.lock_vault,
            owner_token_account,
            token_program: get_token_program(&program.rpc(), &pool_state.lock_mint)?,
            system_program: system_program::id(),
        })
        .args(staking_instructions::Stake {
            amount,
            lock_period,
            transferable,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn claim_rewards_instr(
    config: &ClientConfig,
    pool: Pubkey,
    index: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let owner = program.payer();
    let (owner_reward_account, create_reward_account) =
        associated_account(&program, &owner, &pool_state.reward_mint)?;

    let mut instructions = vec![create_reward_account];
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::ClaimRewards {
                owner,
                pool,
                position: get_position_address(&program.id(), &pool, index),
                authority: get_authority_address(&program.id()),
                reward_mint: pool_state.reward_mint,
                reward_vault: pool_state.reward_vault,
                owner_reward_account,
                token_program: get_token_program(&program.rpc(), &pool_state.reward_mint)?,
            })
            .args(staking_instructions::ClaimRewards {})
            .instructions()?,
    );
    Ok(instructions)
}

pub fn withdraw_instr(config: &ClientConfig, pool: Pubkey, index: u64) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let owner = program.payer();
    let (owner_lock_account, create_lock_account) =
        associated_account(&program, &owner, &pool_state.lock_mint)?;

    let mut instructions = vec![create_lock_account];
    let owner_reward_account = if pool_state.reward_mint == pool_state.lock_mint {
        None
    } else {
        let (account, create) = associated_account(&program, &owner, &pool_state.reward_mint)?;
        instructions.push(create);
        Some(account)
    };
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::Withdraw {
                owner,
                pool,
                position: get_position_address(&program.id(), &pool, index),
                authority: get_authority_address(&program.id()),
                lock_mint: pool_state.lock_mint,
                lock_vault: pool_state.lock_vault,
                reward_mint: pool_state.reward_mint,
                reward_vault: pool_state.reward_vault,
                owner_lock_account,
                owner_reward_account,
                token_program: get_token_program(&program.rpc(), &pool_state.lock_mint)?,
            })
            .args(staking_instructions::Withdraw {})
            .instructions()?,
    );
    Ok(instructions)
}

pub fn create_boost_instr(
    config: &ClientConfig,
    pool: Pubkey,
    boost_mint: Pubkey,
    start_time: i64,
    end_time: i64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let campaign = get_boost_address(&program.id(), &pool, pool_state.next_campaign_index);

    let instructions = program
        .request()
        .accounts(staking_accounts::CreateBoost {
            creator: program.payer(),
            pool,
            campaign,
            authority: get_authority_address(&program.id()),
            boost_mint,
            boost_vault: get_boost_vault_address(&program.id(), &campaign),
            token_program: get_token_program(&program.rpc(), &boost_mint)?,
            system_program: system_program::id(),
        })
        .args(staking_instructions::CreateBoost {
            start_time,
            end_time,
        })
        .instructions()?;
    Ok(instructions)
}

pub fn top_up_boost_instr(
    config: &ClientConfig,
    pool: Pubkey,
    campaign_index: u64,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let campaign = get_boost_address(&program.id(), &pool, campaign_index);
    let campaign_state: BoostCampaign = program.account(campaign)?;
    let funder = program.payer();
    let (funder_token_account, _) =
        associated_account(&program, &funder, &campaign_state.reward_mint)?;

    let instructions = program
        .request()
        .accounts(staking_accounts::TopUpBoost {
            funder,
            campaign,
            boost_mint: campaign_state.reward_mint,
            boost_vault: campaign_state.vault,
            funder_token_account,
            token_program: get_token_program(&program.rpc(), &campaign_state.reward_mint)?,
        })
        .args(staking_instructions::TopUpBoost { amount })
        .instructions()?;
    Ok(instructions)
}

pub fn claim_boost_rewards_instr(
    config: &ClientConfig,
    pool: Pubkey,
    campaign_index: u64,
    position_index: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let campaign = get_boost_address(&program.id(), &pool, campaign_index);
    let campaign_state: BoostCampaign = program.account(campaign)?;
    let position = get_position_address(&program.id(), &pool, position_index);
    let position_state: Position = program.account(position)?;
    let owner = program.payer();
    anyhow::ensure!(
        position_state.owner == owner,
        "position {} is not owned by the payer",
        position_index
    );
    let (owner_boost_account, create_boost_account) =
        associated_account(&program, &owner, &campaign_state.reward_mint)?;

    let mut instructions = vec![create_boost_account];
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::ClaimBoostRewards {
                owner,
                campaign,
                position,
                claim_record: get_boost_claim_address(&program.id(), &campaign, &position),
                authority: get_authority_address(&program.id()),
                boost_mint: campaign_state.reward_mint,
                boost_vault: campaign_state.vault,
                owner_boost_account,
                token_program: get_token_program(&program.rpc(), &campaign_state.reward_mint)?,
                system_program: system_program::id(),
            })
            .args(staking_instructions::ClaimBoostRewards {})
            .instructions()?,
    );
    Ok(instructions)
}

/// Vault `recover-stray-tokens` sweeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StrayVault {
    Lock,
    Reward,
    Boost,
}

pub fn recover_stray_tokens_instr(
    config: &ClientConfig,
    pool: Pubkey,
    vault: StrayVault,
    campaign_index: Option<u64>,
    amount: u64,
) -> Result<Vec<Instruction>> {
    let program = staking_program(config)?;
    let pool_state: StakingPool = program.account(pool)?;
    let (campaign, vault_key, mint) = match vault {
        StrayVault::Lock => (None, pool_state.lock_vault, pool_state.lock_mint),
        StrayVault::Reward => (None, pool_state.reward_vault, pool_state.reward_mint),
        StrayVault::Boost => {
            let index = campaign_index
                .ok_or_else(|| anyhow::format_err!("--campaign-index is required for the boost vault"))?;
            let campaign = get_boost_address(&program.id(), &pool, index);
            let campaign_state: BoostCampaign = program.account(campaign)?;
            (Some(campaign), campaign_state.vault, campaign_state.reward_mint)
        }
    };
    let creator = program.payer();
    let (creator_token_account, create_creator_account) =
        associated_account(&program, &creator, &mint)?;

    let mut instructions = vec![create_creator_account];
    instructions.extend(
        program
            .request()
            .accounts(staking_accounts::RecoverStrayTokens {
                creator,
                pool,
                campaign,
                authority: get_authority_address(&program.id()),
                mint,
                vault: vault_key,
                creator_token_account,
                token_program: get_token_program(&program.rpc(), &mint)?,
            })
            .args(staking_instructions::RecoverStrayTokens { amount })
            .instructions()?,
    );
    Ok(instructions)
}
