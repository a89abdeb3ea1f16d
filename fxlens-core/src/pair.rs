use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Currency pair quoted as `BASE/QUOTE`, e.g. `USD/JPY`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    /// Builds a pair from its two currency codes. Codes are upper-cased.
    pub fn new(base: &str, quote: &str) -> Result<Self, CoreError> {
        let base = normalize_code(base);
        let quote = normalize_code(quote);
        let valid = |code: &str| !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid(&base) || !valid(&quote) || base == quote {
            return Err(CoreError::InvalidPair(format!("{base}/{quote}")));
        }
        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl FromStr for CurrencyPair {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (base, quote) = value
            .split_once('/')
            .ok_or_else(|| CoreError::InvalidPair(value.to_string()))?;
        Self::new(base, quote).map_err(|_| CoreError::InvalidPair(value.to_string()))
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
