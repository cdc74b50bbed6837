//! # Wrapped Native Token Ledger
//!
//! An ERC-20 ledger whose supply is backed 1:1 by native currency held at the
//! ledger's own address, extended with ERC-2612 signed approvals and ERC-3156
//! flash loans of the ledger's own token.
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ledger`] | Balances, allowances, permit nonces, total supply, event log |
//! | [`gateway`] | `deposit` / `withdraw` conversion between native currency and tokens |
//! | [`permit`] | ERC-2612 permits with pluggable digest and signer recovery |
//! | [`flash`] | ERC-3156 self-token flash loans and the borrower callback |
//! | [`dispatch`] | `IWETH` calldata entry point, bare native receipt |
//! | [`host`] | Native balances, block time and chain id |
//!
//! ## Atomicity
//!
//! Every state-changing call on [`Weth`] runs under a checkpoint spanning the
//! ledger and the host. A failing call, including one re-entered from a
//! flash-loan callback, rolls back its balance, allowance, nonce and supply
//! writes, its events and its native transfers.
//!
//! ## Variants
//!
//! [`WethConfig`] selects between the common deployments:
//!
//! | Preset | Mint/burn events | `U256::MAX` allowance | Flash-loan ceiling |
//! |--------|------------------|-----------------------|--------------------|
//! | [`WethConfig::wrapped_ether`] | `Transfer` to/from `0x0` | unlimited | 1% of backing |
//! | [`WethConfig::wrapped_ether_v9`] | `Deposit` / `Withdrawal` | unlimited | 1% of backing |
//! | [`WethConfig::wrapped_ether_v10`] | `Transfer` to/from `0x0` | unlimited | `2^112 - 1` |
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{address, U256};
//! use ev_weth::{InMemoryHost, Weth, WethConfig};
//!
//! let alice = address!("0x00000000000000000000000000000000000000a1");
//! let mut host = InMemoryHost::new(1, 0);
//! host.set_native_balance(alice, U256::from(100u64));
//!
//! let weth_address = address!("0x00000000000000000000000000000000000000e0");
//! let mut weth = Weth::new(weth_address, WethConfig::default(), host);
//! weth.deposit(alice, U256::from(60u64)).unwrap();
//! assert_eq!(weth.balance_of(alice), U256::from(60u64));
//! assert!(weth.is_fully_backed());
//! ```

pub mod abi;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod flash;
pub mod gateway;
pub mod host;
mod journal;
pub mod ledger;
pub mod permit;
mod weth;

pub use config::{ConfigError, EventStyle, FlashLoanCeiling, WethConfig};
pub use dispatch::CallContext;
pub use error::WethError;
pub use events::WethEvent;
pub use flash::{callback_success, BorrowerRegistry, Borrowers, FlashBorrower};
pub use host::{Host, HostCheckpoint, HostError, InMemoryHost};
pub use ledger::Ledger;
pub use permit::{EcdsaVerifier, PermitVerifier};
pub use weth::Weth;
