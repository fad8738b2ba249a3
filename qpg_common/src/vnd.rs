use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const VND_CURRENCY_CODE: &str = "VND";

//--------------------------------------        Vnd        -----------------------------------------------------------
/// An amount of Vietnamese đồng, in whole currency units. The đồng has no minor unit in practice, so bank APIs
/// report plain integers. Signed, since running balances and outbound transfers can be negative; transfer amounts
/// on canonical records hold the absolute value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vnd(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in đồng: {0}")]
pub struct VndConversionError(String);

impl From<i64> for Vnd {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for Vnd {
    type Error = VndConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(VndConversionError(format!("Value {} is too large to convert to Vnd", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Vnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {VND_CURRENCY_CODE}", group_thousands(self.0))
    }
}

impl Vnd {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead % 3 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
