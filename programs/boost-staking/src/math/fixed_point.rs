use super::U256;
use anchor_lang::prelude::*;

/// Account-storable form of a [`U256`] accumulator (little-endian limbs).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct FixedPoint {
    pub limbs: [u64; 4],
}

impl FixedPoint {
    pub const LEN: usize = 8 * 4;

    pub const ZERO: FixedPoint = FixedPoint { limbs: [0; 4] };

    pub fn to_u256(self) -> U256 {
        U256(self.limbs)
    }
}

impl From<U256> for FixedPoint {
    fn from(value: U256) -> Self {
        FixedPoint { limbs: value.0 }
    }
}

impl From<FixedPoint> for U256 {
    fn from(value: FixedPoint) -> Self {
        value.to_u256()
    }
}

impl std::fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_u256())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limbs_survive_borsh() {
        let value = FixedPoint::from(U256::exp10(38) * U256::from(12_345u64));
        let mut bytes = Vec::new();
        value.serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), FixedPoint::LEN);
        let decoded = FixedPoint::try_from_slice(&bytes).unwrap();
        assert_eq!(decoded.to_u256(), U256::exp10(38) * U256::from(12_345u64));
    }
}
