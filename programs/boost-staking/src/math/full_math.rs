//! Wide-integer multiply-divide used by every reward formula.
//!
//! Accumulators are scaled by [`DISTRIBUTED_REWARDS_DIVIDER`] (1e38), so the
//! intermediate product `a * b` routinely exceeds 256 bits. All products are
//! taken in 512-bit precision and only the quotient is narrowed back.

use crate::error::ErrorCode;
use anchor_lang::prelude::*;

// Kept apart from the Anchor prelude: the macro expansion names the
// two-argument `Result`.
mod wide {
    uint::construct_uint! {
        /// 256-bit unsigned integer backing every stored accumulator.
        pub struct U256(4);
    }

    uint::construct_uint! {
        /// 512-bit unsigned integer, only ever used for intermediate products.
        pub struct U512(8);
    }
}

pub use wide::{U256, U512};

/// Scale applied to reward accumulators (`1e38`).
pub fn distributed_rewards_divider() -> U256 {
    U256::exp10(38)
}

/// Seconds per farming-speed unit: speeds are expressed per day.
pub const FARMING_SPEED_DIVIDER: u64 = 86_400;

/// Denominator of the flat commission factor.
pub const COMMISSION_DIVIDER: u64 = 100_000;

fn widen(value: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(&value.0);
    U512(limbs)
}

fn narrow(value: U512) -> Result<U256> {
    if value.0[4..].iter().any(|limb| *limb != 0) {
        return Err(ErrorCode::MathOverflow.into());
    }
    let mut limbs = [0u64; 4];
    limbs.copy_from_slice(&value.0[..4]);
    Ok(U256(limbs))
}

/// `floor(a * b / c)` with a 512-bit intermediate product.
///
/// Callers keep the grouping of their formula when choosing `a`, `b`, `c`;
/// regrouping changes where the floor happens and therefore the payout.
pub fn mul_div_floor(a: U256, b: U256, c: U256) -> Result<U256> {
    require!(!c.is_zero(), ErrorCode::ZeroDenominator);
    let product = widen(a)
        .checked_mul(widen(b))
        .ok_or(ErrorCode::MathOverflow)?;
    narrow(product / widen(c))
}

/// `ceil(a * b / c)` with a 512-bit intermediate product.
pub fn mul_div_ceil(a: U256, b: U256, c: U256) -> Result<U256> {
    require!(!c.is_zero(), ErrorCode::ZeroDenominator);
    let product = widen(a)
        .checked_mul(widen(b))
        .ok_or(ErrorCode::MathOverflow)?;
    let divisor = widen(c);
    let quotient = product / divisor;
    let rounded = if (product % divisor).is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };
    narrow(rounded)
}

/// Narrows a wide value to a token amount, failing instead of truncating.
pub fn to_amount(value: U256) -> Result<u64> {
    if value > U256::from(u64::MAX) {
        return Err(ErrorCode::MathOverflow.into());
    }
    Ok(value.low_u64())
}

/// Narrows a wide value to a `u128` speed, failing instead of truncating.
pub fn to_speed(value: U256) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(ErrorCode::MathOverflow.into());
    }
    Ok(value.low_u128())
}
