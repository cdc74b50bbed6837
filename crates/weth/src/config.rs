//! Deployment configuration for the ledger.
//!
//! The configuration picks between the observed WETH variants: the event
//! convention of the conversion gateway, whether `U256::MAX` allowances are
//! treated as unlimited, and how the flash-loan ceiling is computed.

use crate::constants::{
    BPS_DENOMINATOR, DEFAULT_FLASH_LIQUIDITY_BPS, DEFAULT_NAME, DEFAULT_SYMBOL,
    WETH10_MAX_FLASH_LOAN, WETH10_NAME, WETH10_SYMBOL,
};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{env, str::FromStr};
use thiserror::Error;

/// Environment variable overriding the token name.
pub const ENV_NAME: &str = "WETH_NAME";
/// Environment variable overriding the token symbol.
pub const ENV_SYMBOL: &str = "WETH_SYMBOL";
/// Environment variable selecting the event convention (`transfer` or `deposit`).
pub const ENV_EVENT_STYLE: &str = "WETH_EVENT_STYLE";
/// Environment variable toggling the unlimited-allowance sentinel.
pub const ENV_UNLIMITED_ALLOWANCE: &str = "WETH_UNLIMITED_ALLOWANCE";
/// Environment variable setting a fixed flash-loan ceiling.
pub const ENV_FLASH_CAP: &str = "WETH_FLASH_CAP";
/// Environment variable setting a liquidity-share flash-loan ceiling.
pub const ENV_FLASH_LIQUIDITY_BPS: &str = "WETH_FLASH_LIQUIDITY_BPS";

/// How the conversion gateway reports mints and burns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventStyle {
    /// `Transfer(0x0, dst, value)` / `Transfer(src, 0x0, value)` (WETH8, WETH10).
    #[default]
    ZeroAddressTransfer,
    /// `Deposit(dst, wad)` / `Withdrawal(src, wad)` (WETH9).
    DepositWithdrawal,
}

impl FromStr for EventStyle {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transfer" | "zeroaddresstransfer" => Ok(Self::ZeroAddressTransfer),
            "deposit" | "depositwithdrawal" => Ok(Self::DepositWithdrawal),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_EVENT_STYLE.into(),
                value: value.into(),
            }),
        }
    }
}

/// Upper bound on a single flash loan of the ledger's own token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FlashLoanCeiling {
    /// A constant ceiling, independent of deposits.
    Fixed {
        /// Maximum loan in token units.
        cap: U256,
    },
    /// A share of the native currency currently backing the ledger.
    LiquidityShare {
        /// Share in basis points; `10_000` lends the whole backing.
        bps: u16,
    },
}

impl Default for FlashLoanCeiling {
    fn default() -> Self {
        Self::LiquidityShare { bps: DEFAULT_FLASH_LIQUIDITY_BPS }
    }
}

impl FlashLoanCeiling {
    /// Resolves the ceiling against the ledger's current native liquidity.
    pub fn resolve(&self, liquidity: U256) -> U256 {
        match *self {
            Self::Fixed { cap } => cap,
            Self::LiquidityShare { bps } => {
                // Split to avoid overflowing `liquidity * bps` near U256::MAX.
                // Saturates for shares above 100%, which `validate` rejects.
                let denominator = U256::from(BPS_DENOMINATOR);
                let bps = U256::from(bps);
                let whole = (liquidity / denominator).saturating_mul(bps);
                let rest = liquidity % denominator * bps / denominator;
                whole.saturating_add(rest)
            }
        }
    }
}

/// Configuration of a ledger deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WethConfig {
    /// ERC-20 name, also the EIP-712 domain name.
    pub name: String,
    /// ERC-20 symbol.
    pub symbol: String,
    /// Event convention of the conversion gateway.
    pub event_style: EventStyle,
    /// Whether a `U256::MAX` allowance is never decremented.
    pub unlimited_allowance: bool,
    /// Flash-loan ceiling policy.
    pub flash_loan_ceiling: FlashLoanCeiling,
}

impl Default for WethConfig {
    fn default() -> Self {
        Self::wrapped_ether()
    }
}

impl WethConfig {
    /// WETH8-style deployment: zero-address transfer events, unlimited
    /// allowances, flash loans up to 1% of the backing.
    pub fn wrapped_ether() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            event_style: EventStyle::ZeroAddressTransfer,
            unlimited_allowance: true,
            flash_loan_ceiling: FlashLoanCeiling::default(),
        }
    }

    /// WETH9-style deployment: `Deposit`/`Withdrawal` events.
    pub fn wrapped_ether_v9() -> Self {
        Self { event_style: EventStyle::DepositWithdrawal, ..Self::wrapped_ether() }
    }

    /// WETH10-style deployment with a fixed `2^112 - 1` flash-loan ceiling.
    pub fn wrapped_ether_v10() -> Self {
        Self {
            name: WETH10_NAME.to_string(),
            symbol: WETH10_SYMBOL.to_string(),
            flash_loan_ceiling: FlashLoanCeiling::Fixed { cap: WETH10_MAX_FLASH_LOAN },
            ..Self::wrapped_ether()
        }
    }

    /// Reads the `weth` object from a chainspec-extras style JSON blob.
    ///
    /// Expected shape (every key optional):
    /// ```json
    /// {
    ///   "weth": {
    ///     "name": "Wrapped Ether",
    ///     "symbol": "WETH",
    ///     "eventStyle": "zeroAddressTransfer",
    ///     "unlimitedAllowance": true,
    ///     "flashLoanCeiling": { "mode": "liquidityShare", "bps": 100 }
    ///   }
    /// }
    /// ```
    pub fn from_extras(extras: &Value) -> Result<Self, ConfigError> {
        let section = extras.get("weth").ok_or(ConfigError::Missing)?;
        let config: Self = serde_json::from_value(section.clone())
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from the process environment, starting from
    /// [`WethConfig::wrapped_ether`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset or blank
    /// keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::wrapped_ether();

        if let Some(name) = get(ENV_NAME) {
            config.name = name.trim().to_string();
        }
        if let Some(symbol) = get(ENV_SYMBOL) {
            config.symbol = symbol.trim().to_string();
        }
        if let Some(style) = get(ENV_EVENT_STYLE) {
            config.event_style = style.parse()?;
        }
        if let Some(raw) = get(ENV_UNLIMITED_ALLOWANCE) {
            config.unlimited_allowance = parse_value(ENV_UNLIMITED_ALLOWANCE, &raw)?;
        }
        match (get(ENV_FLASH_CAP), get(ENV_FLASH_LIQUIDITY_BPS)) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Conflict {
                    first: ENV_FLASH_CAP.into(),
                    second: ENV_FLASH_LIQUIDITY_BPS.into(),
                })
            }
            (Some(raw), None) => {
                config.flash_loan_ceiling =
                    FlashLoanCeiling::Fixed { cap: parse_value(ENV_FLASH_CAP, &raw)? };
            }
            (None, Some(raw)) => {
                config.flash_loan_ceiling = FlashLoanCeiling::LiquidityShare {
                    bps: parse_value(ENV_FLASH_LIQUIDITY_BPS, &raw)?,
                };
            }
            (None, None) => {}
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "name" });
        }
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "symbol" });
        }
        if let FlashLoanCeiling::LiquidityShare { bps } = self.flash_loan_ceiling {
            if bps > BPS_DENOMINATOR {
                return Err(ConfigError::LiquidityShareTooLarge(bps));
            }
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        value: raw.into(),
    })
}

/// Errors that can occur while building a [`WethConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The extras blob has no `weth` section.
    #[error("missing weth config in chainspec extras")]
    Missing,
    /// The `weth` section could not be deserialized.
    #[error("invalid weth config: {0}")]
    Invalid(String),
    /// A setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Raw value.
        value: String,
    },
    /// Two mutually exclusive settings were both provided.
    #[error("{first} and {second} cannot both be set")]
    Conflict {
        /// First setting.
        first: String,
        /// Second setting.
        second: String,
    },
    /// A required string field is empty.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },
    /// The liquidity share is above 100%.
    #[error("flash-loan liquidity share of {0} bps exceeds 10000")]
    LiquidityShareTooLarge(u16),
}
