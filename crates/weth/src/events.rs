//! Events emitted by the ledger.
//!
//! Events are appended to the ledger's log in emission order and are rolled
//! back together with the state changes of a failed call.

use crate::abi::IWETH;
use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;

/// A ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WethEvent {
    /// `Transfer(from, to, value)`. Mints and burns use the zero address
    /// under [`crate::EventStyle::ZeroAddressTransfer`].
    Transfer {
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        value: U256,
    },
    /// `Approval(owner, spender, value)` with the new allowance.
    Approval {
        /// Token owner.
        owner: Address,
        /// Approved spender.
        spender: Address,
        /// Allowance after the update.
        value: U256,
    },
    /// `Deposit(dst, wad)` under [`crate::EventStyle::DepositWithdrawal`].
    Deposit {
        /// Credited account.
        dst: Address,
        /// Amount wrapped.
        wad: U256,
    },
    /// `Withdrawal(src, wad)` under [`crate::EventStyle::DepositWithdrawal`].
    Withdrawal {
        /// Debited account.
        src: Address,
        /// Amount unwrapped.
        wad: U256,
    },
}

impl WethEvent {
    /// Encodes the event as an EVM log emitted by `emitter`.
    pub fn to_log(&self, emitter: Address) -> Log {
        let data = match *self {
            Self::Transfer { from, to, value } => {
                IWETH::Transfer { from, to, value }.encode_log_data()
            }
            Self::Approval { owner, spender, value } => {
                IWETH::Approval { owner, spender, value }.encode_log_data()
            }
            Self::Deposit { dst, wad } => IWETH::Deposit { dst, wad }.encode_log_data(),
            Self::Withdrawal { src, wad } => IWETH::Withdrawal { src, wad }.encode_log_data(),
        };
        Log { address: emitter, data }
    }
}
