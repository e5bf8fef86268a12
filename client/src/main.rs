use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use boost_staking::states::{BoostCampaign, BoostClaimRecord, PoolParams, Position, StakingPool};
use clap::Parser;
use configparser::ini::Ini;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::str::FromStr;

mod instructions;
use instructions::rpc::*;
use instructions::staking_instructions::*;
use instructions::utils::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    ws_url: String,
    payer_path: String,
    admin_path: String,
    boost_staking_program: Pubkey,
}

fn required(config: &Ini, key: &str) -> Result<String> {
    match config.get("Global", key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format_err!("{} must not be empty", key)),
    }
}

fn load_cfg(client_config: &str) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config.load(client_config).map_err(|err| format_err!(err))?;
    let boost_staking_program = required(&config, "boost_staking_program")?;

    Ok(ClientConfig {
        http_url: required(&config, "http_url")?,
        ws_url: required(&config, "ws_url")?,
        payer_path: required(&config, "payer_path")?,
        admin_path: required(&config, "admin_path")?,
        boost_staking_program: Pubkey::from_str(&boost_staking_program)?,
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| format_err!("failed to read keypair from {}", s))
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: BoostStakingCommands,
}

#[derive(Debug, Parser)]
pub enum BoostStakingCommands {
    InitialiseConfigs {
        #[arg(long)]
        admin: Pubkey,
        #[arg(long)]
        commission_factor: u16,
        #[arg(long)]
        commission_wallet: Pubkey,
        #[arg(long)]
        pool_creation_enabled: bool,
    },
    /// `--key` carries the new admin (param 0) or commission wallet (param 2).
    UpdateConfig {
        #[arg(long)]
        param: u8,
        #[arg(long, default_value_t = 0)]
        value: u64,
        #[arg(long)]
        key: Option<Pubkey>,
    },
    CreatePool {
        #[arg(long)]
        pool_id: u64,
        #[arg(long)]
        lock_mint: Pubkey,
        #[arg(long)]
        reward_mint: Pubkey,
        #[arg(long)]
        min_lock_duration: u64,
        #[arg(long)]
        minimum_deposit: u64,
        #[arg(long)]
        start_time: i64,
        #[arg(long)]
        end_time: i64,
    },
    UpdatePool {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        param: u8,
        #[arg(long)]
        value: u64,
    },
    AddPoolRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        new_end_time: Option<i64>,
    },
    WithdrawPoolRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    Stake {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        amount: u64,
        #[arg(long)]
        lock_period: u64,
        #[arg(long)]
        transferable: bool,
    },
    ClaimRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        index: u64,
    },
    Withdraw {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        index: u64,
    },
    CreateBoost {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        boost_mint: Pubkey,
        #[arg(long)]
        start_time: i64,
        #[arg(long)]
        end_time: i64,
    },
    TopUpBoost {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        campaign_index: u64,
        #[arg(long)]
        amount: u64,
    },
    ClaimBoostRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        campaign_index: u64,
        #[arg(long)]
        position_index: u64,
    },
    /// Sweeps tokens sent straight to a vault. `--campaign-index` selects the
    /// boost vault.
    RecoverStrayTokens {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long, value_enum)]
        vault: StrayVault,
        #[arg(long)]
        campaign_index: Option<u64>,
        #[arg(long)]
        amount: u64,
    },
    PoolState {
        #[arg(long)]
        pool: Pubkey,
    },
    Position {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        index: u64,
    },
    Campaign {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        index: u64,
    },
    PendingRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        index: u64,
    },
    PendingBoostRewards {
        #[arg(long)]
        pool: Pubkey,
        #[arg(long)]
        campaign_index: u64,
        #[arg(long)]
        position_index: u64,
    },
}

fn sign_and_send(
    rpc_client: &RpcClient,
    payer: &Keypair,
    instructions: Vec<Instruction>,
) -> Result<()> {
    sign_and_send_with(rpc_client, payer, None, instructions)
}

fn signers_for<'a>(payer: &'a Keypair, extra: Option<&'a Keypair>) -> Vec<&'a Keypair> {
    let mut signers = vec![payer];
    if let Some(extra) = extra.filter(|extra| extra.pubkey() != payer.pubkey()) {
        signers.push(extra);
    }
    signers
}

/// `extra` co-signs, e.g. the config admin when it is not the fee payer.
fn sign_and_send_with(
    rpc_client: &RpcClient,
    payer: &Keypair,
    extra: Option<&Keypair>,
    instructions: Vec<Instruction>,
) -> Result<()> {
    let signers = signers_for(payer, extra);
    let recent_hash = rpc_client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        &instructions,
        Some(&payer.pubkey()),
        &signers,
        recent_hash,
    );
    let signature = send_txn(rpc_client, &txn, true)?;
    println!("{}", signature);
    Ok(())
}

fn fetch<T: AccountDeserialize>(rpc_client: &RpcClient, address: &Pubkey) -> Result<T> {
    deserialize_anchor_account(&rpc_client.get_account(address)?)
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let pool_config = load_cfg(client_config)?;
    let payer = read_keypair_file(&pool_config.payer_path)?;
    let rpc_client = RpcClient::new(pool_config.http_url.to_string());
    let program_id = pool_config.boost_staking_program;

    let opts = Opts::parse();
    match opts.command {
        BoostStakingCommands::InitialiseConfigs {
            admin,
            commission_factor,
            commission_wallet,
            pool_creation_enabled,
        } => {
            let instructions = initialise_configs_instr(
                &pool_config,
                admin,
                commission_factor,
                commission_wallet,
                pool_creation_enabled,
            )?;
            let admin = read_keypair_file(&pool_config.admin_path)?;
            sign_and_send_with(&rpc_client, &payer, Some(&admin), instructions)?;
        }
        BoostStakingCommands::UpdateConfig { param, value, key } => {
            let instructions = update_config_instr(&pool_config, param, value, key)?;
            let admin = read_keypair_file(&pool_config.admin_path)?;
            sign_and_send_with(&rpc_client, &payer, Some(&admin), instructions)?;
        }
        BoostStakingCommands::CreatePool {
            pool_id,
            lock_mint,
            reward_mint,
            min_lock_duration,
            minimum_deposit,
            start_time,
            end_time,
        } => {
            let params = PoolParams {
                min_lock_duration,
                minimum_deposit,
                start_time,
                end_time,
            };
            let instructions =
                create_pool_instr(&pool_config, pool_id, lock_mint, reward_mint, params)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
            println!(
                "pool: {}",
                get_pool_address(&program_id, &payer.pubkey(), pool_id)
            );
        }
        BoostStakingCommands::UpdatePool { pool, param, value } => {
            let instructions = update_pool_instr(&pool_config, pool, param, value)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::AddPoolRewards {
            pool,
            amount,
            new_end_time,
        } => {
            let instructions = add_pool_rewards_instr(&pool_config, pool, amount, new_end_time)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::WithdrawPoolRewards { pool, amount } => {
            let instructions = withdraw_pool_rewards_instr(&pool_config, pool, amount)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::Stake {
            pool,
            amount,
            lock_period,
            transferable,
        } => {
            let instructions = stake_instr(&pool_config, pool, amount, lock_period, transferable)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::ClaimRewards { pool, index } => {
            let instructions = claim_rewards_instr(&pool_config, pool, index)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::Withdraw { pool, index } => {
            let instructions = withdraw_instr(&pool_config, pool, index)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::CreateBoost {
            pool,
            boost_mint,
            start_time,
            end_time,
        } => {
            let instructions =
                create_boost_instr(&pool_config, pool, boost_mint, start_time, end_time)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::TopUpBoost {
            pool,
            campaign_index,
            amount,
        } => {
            let instructions = top_up_boost_instr(&pool_config, pool, campaign_index, amount)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::ClaimBoostRewards {
            pool,
            campaign_index,
            position_index,
        } => {
            let instructions =
                claim_boost_rewards_instr(&pool_config, pool, campaign_index, position_index)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::RecoverStrayTokens {
            pool,
            vault,
            campaign_index,
            amount,
        } => {
            let instructions =
                recover_stray_tokens_instr(&pool_config, pool, vault, campaign_index, amount)?;
            sign_and_send(&rpc_client, &payer, instructions)?;
        }
        BoostStakingCommands::PoolState { pool } => {
            let pool_state: StakingPool = fetch(&rpc_client, &pool)?;
            println!("{:#?}", pool_state);
            println!("reward_accumulator: {}", pool_state.reward_accumulator);
            println!("unallocated_rewards: {}", pool_state.unallocated_rewards());
        }
        BoostStakingCommands::Position { pool, index } => {
            let position: Position =
                fetch(&rpc_client, &get_position_address(&program_id, &pool, index))?;
            println!("{:#?}", position);
        }
        BoostStakingCommands::Campaign { pool, index } => {
            let campaign: BoostCampaign =
                fetch(&rpc_client, &get_boost_address(&program_id, &pool, index))?;
            println!("{:#?}", campaign);
        }
        BoostStakingCommands::PendingRewards { pool, index } => {
            let pool_state: StakingPool = fetch(&rpc_client, &pool)?;
            let position: Position =
                fetch(&rpc_client, &get_position_address(&program_id, &pool, index))?;
            let now = get_cluster_time(&rpc_client)?;
            println!("{}", pool_state.pending_rewards(&position, now)?);
        }
        BoostStakingCommands::PendingBoostRewards {
            pool,
            campaign_index,
            position_index,
        } => {
            let campaign_key = get_boost_address(&program_id, &pool, campaign_index);
            let position_key = get_position_address(&program_id, &pool, position_index);
            let campaign: BoostCampaign = fetch(&rpc_client, &campaign_key)?;
            let position: Position = fetch(&rpc_client, &position_key)?;
            let record_key = get_boost_claim_address(&program_id, &campaign_key, &position_key);
            let record = match get_account(&rpc_client, &record_key)? {
                Some(data) => Some(BoostClaimRecord::try_deserialize(&mut data.as_slice())?),
                None => None,
            };
            let now = get_cluster_time(&rpc_client)?;
            println!("{}", campaign.pending_for(&position, record.as_ref(), now)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_cosigns_only_when_distinct_from_payer() {
        let payer = Keypair::new();
        let admin = Keypair::new();
        let signers = signers_for(&payer, Some(&admin));
        assert_eq!(signers.len(), 2);
        assert_eq!(signers[1].pubkey(), admin.pubkey());

        let same = Keypair::from_bytes(&payer.to_bytes()).unwrap();
        assert_eq!(signers_for(&payer, Some(&same)).len(), 1);
        assert_eq!(signers_for(&payer, None).len(), 1);
    }
}
