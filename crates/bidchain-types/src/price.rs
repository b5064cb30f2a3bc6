use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A bid price.
///
/// Always finite and non-negative. `Display` renders the shortest decimal
/// form that parses back to the same value (`5`, `7.5`, `0.25`); this is the
/// form that goes into signed messages, so both parties must agree on it.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    /// Validate and wrap a raw price.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() {
            return Err(TypeError::InvalidPrice(format!("{value} is not finite")));
        }
        if value < 0.0 {
            return Err(TypeError::InvalidPrice(format!("{value} is negative")));
        }
        // -0.0 would render as "-0"
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price({})", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidPrice(s.to_string()))?;
        Self::new(value)
    }
}
