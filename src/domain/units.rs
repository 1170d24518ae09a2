use crate::error::{PoolError, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Highest supported number of fractional digits (ether-style 10^18 scaling).
pub const MAX_DECIMALS: u32 = 18;

/// Converts between whole-token decimals and the ledger's integral base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units {
    decimals: u32,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            decimals: MAX_DECIMALS,
        }
    }
}

impl Units {
    pub fn new(decimals: u32) -> Result<Self> {
        if decimals > MAX_DECIMALS {
            return Err(PoolError::InvalidConfiguration(format!(
                "decimals must be at most {}",
                MAX_DECIMALS
            )));
        }
        Ok(Self { decimals })
    }

    fn factor(&self) -> Decimal {
        // 10^18 fits in u64, and MAX_DECIMALS bounds the exponent
        Decimal::from_u64(10u64.pow(self.decimals)).unwrap_or(Decimal::ONE)
    }

    /// Parses a whole-token amount into base units.
    ///
    /// Non-positive values are `ZeroAmount`; precision finer than one base unit is rejected.
    pub fn to_base(&self, value: Decimal) -> Result<u128> {
        if value <= Decimal::ZERO {
            return Err(PoolError::ZeroAmount);
        }
        let scaled = value
            .checked_mul(self.factor())
            .ok_or(PoolError::ArithmeticOverflow)?;
        if !scaled.fract().is_zero() {
            return Err(PoolError::InvalidCommand(format!(
                "amount {} has more than {} decimal places",
                value, self.decimals
            )));
        }
        scaled.to_u128().ok_or(PoolError::ArithmeticOverflow)
    }

    /// Renders base units as a whole-token decimal, normalized.
    pub fn to_decimal(&self, base: u128) -> Result<Decimal> {
        let mantissa = i128::try_from(base).map_err(|_| PoolError::ArithmeticOverflow)?;
        Decimal::try_from_i128_with_scale(mantissa, self.decimals)
            .map(|value| value.normalize())
            .map_err(|_| PoolError::ArithmeticOverflow)
    }

    /// Like `to_decimal`, falling back to the raw base-unit integer when out of range.
    pub fn format(&self, base: u128) -> String {
        match self.to_decimal(base) {
            Ok(value) => value.to_string(),
            Err(_) => format!("{}e-{}", base, self.decimals),
        }
    }
}
