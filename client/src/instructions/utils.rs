use anchor_lang::AccountDeserialize;
use anyhow::{format_err, Result};
use boost_staking::states::{
    BOOST_CLAIM_SEED, BOOST_SEED, BOOST_VAULT_SEED, GLOBAL_CONFIG_SEED, LOCK_VAULT_SEED,
    POSITION_SEED, REWARD_VAULT_SEED, STAKING_POOL_SEED,
};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{account::Account, pubkey::Pubkey};

pub fn deserialize_anchor_account<T: AccountDeserialize>(account: &Account) -> Result<T> {
    let mut data: &[u8] = &account.data;
    T::try_deserialize(&mut data).map_err(Into::into)
}

/// Token program owning `mint` (SPL Token or Token-2022).
pub fn get_token_program(rpc_client: &RpcClient, mint: &Pubkey) -> Result<Pubkey> {
    Ok(rpc_client.get_account(mint)?.owner)
}

/// Unix time of the latest confirmed slot, as the program would read it.
pub fn get_cluster_time(rpc_client: &RpcClient) -> Result<i64> {
    let slot = rpc_client.get_slot()?;
    rpc_client
        .get_block_time(slot)
        .map_err(|err| format_err!("failed to read block time for slot {}: {}", slot, err))
}

pub fn get_global_config_address(program_id: &Pubkey) -> Pubkey {
    let (global_config, _bump) =
        Pubkey::find_program_address(&[GLOBAL_CONFIG_SEED.as_bytes()], program_id);
    global_config
}

pub fn get_authority_address(program_id: &Pubkey) -> Pubkey {
    let (authority, _bump) =
        Pubkey::find_program_address(&[boost_staking::AUTH_SEED.as_bytes()], program_id);
    authority
}

pub fn get_pool_address(program_id: &Pubkey, creator: &Pubkey, pool_id: u64) -> Pubkey {
    let (pool, _bump) = Pubkey::find_program_address(
        &[
            STAKING_POOL_SEED.as_bytes(),
            creator.as_ref(),
            &pool_id.to_le_bytes(),
        ],
        program_id,
    );
    pool
}

pub fn get_lock_vault_address(program_id: &Pubkey, pool: &Pubkey) -> Pubkey {
    let (lock_vault, _bump) =
        Pubkey::find_program_address(&[LOCK_VAULT_SEED.as_bytes(), pool.as_ref()], program_id);
    lock_vault
}

pub fn get_reward_vault_address(program_id: &Pubkey, pool: &Pubkey) -> Pubkey {
    let (reward_vault, _bump) =
        Pubkey::find_program_address(&[REWARD_VAULT_SEED.as_bytes(), pool.as_ref()], program_id);
    reward_vault
}

pub fn get_position_address(program_id: &Pubkey, pool: &Pubkey, index: u64) -> Pubkey {
    let (position, _bump) = Pubkey::find_program_address(
        &[POSITION_SEED.as_bytes(), pool.as_ref(), &index.to_le_bytes()],
        program_id,
    );
    position
}

pub fn get_boost_address(program_id: &Pubkey, pool: &Pubkey, index: u64) -> Pubkey {
    let (campaign, _bump) = Pubkey::find_program_address(
        &[BOOST_SEED.as_bytes(), pool.as_ref(), &index.to_le_bytes()],
        program_id,
    );
    campaign
}

pub fn get_boost_vault_address(program_id: &Pubkey, campaign: &Pubkey) -> Pubkey {
    let (boost_vault, _bump) = Pubkey::find_program_address(
        &[BOOST_VAULT_SEED.as_bytes(), campaign.as_ref()],
        program_id,
    );
    boost_vault
}

pub fn get_boost_claim_address(program_id: &Pubkey, campaign: &Pubkey, position: &Pubkey) -> Pubkey {
    let (claim_record, _bump) = Pubkey::find_program_address(
        &[
            BOOST_CLAIM_SEED.as_bytes(),
            campaign.as_ref(),
            position.as_ref(),
        ],
        program_id,
    );
    claim_record
}
