use crate::error::ErrorCode;
use crate::states::{PoolUpdated, StakingPool};
use anchor_lang::prelude::*;

/// Accounts context for `update_pool`. Creator only.
#[derive(Accounts)]
pub struct UpdatePool<'info> {
    pub creator: Signer<'info>,

    #[account(
        mut,
        has_one = creator @ ErrorCode::Unauthorized,
    )]
    pub pool: Account<'info, StakingPool>,
}

/// Changes one creator-tunable pool parameter.
///
/// # Param Mapping
/// - `0`: **pool_start_time**. Only before the pool starts; `value` is Unix
///   seconds and must lie between now and `pool_end_time`.
/// - `1`: **min_lock_duration** in seconds. Applies to new positions only.
/// - `2`: **minimum_deposit**. Nonzero; applies to new positions only.
///
/// Any other `param` value returns `ErrorCode::InvalidParam`.
pub fn update_pool(ctx: Context<UpdatePool>, param: u8, value: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let pool_key = ctx.accounts.pool.key();
    let pool = &mut ctx.accounts.pool;
    match param {
        0 => {
            let start_time = i64::try_from(value).map_err(|_| ErrorCode::InvalidTimestamp)?;
            pool.set_start_time(start_time, now)?;
        }
        1 => pool.set_min_lock_duration(value),
        2 => pool.set_minimum_deposit(value)?,
        _ => return Err(error!(ErrorCode::InvalidParam)),
    }

    emit!(PoolUpdated {
        pool: pool_key,
        param,
        min_lock_duration: pool.min_lock_duration,
        minimum_deposit: pool.minimum_deposit,
        pool_start_time: pool.pool_start_time,
        farming_speed: pool.farming_speed,
    });
    Ok(())
}
