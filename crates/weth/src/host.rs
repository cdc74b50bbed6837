//! Execution environment seen by the ledger.
//!
//! The host owns native-currency balances, the block timestamp and the chain
//! id. Native transfers made during a call must be reversible so that a
//! failed call leaves the host exactly as it found it; [`Host::checkpoint`]
//! and friends mirror the ledger's own journal.

use crate::constants::LOG_TARGET;
use alloy_primitives::{Address, U256};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Opaque position in a host's native-transfer journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCheckpoint(pub usize);

/// Why the host refused a native transfer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The sender does not hold enough native currency.
    #[error("{account} holds {balance} wei, needs {needed}")]
    InsufficientFunds {
        /// Sender.
        account: Address,
        /// Native balance of the sender.
        balance: U256,
        /// Requested amount.
        needed: U256,
    },
    /// The recipient does not accept native currency.
    #[error("{account} rejects native transfers")]
    Rejected {
        /// Recipient.
        account: Address,
    },
    /// The recipient's native balance would overflow.
    #[error("native balance overflow for {account}")]
    Overflow {
        /// Recipient.
        account: Address,
    },
}

/// The execution environment the ledger runs in.
pub trait Host: fmt::Debug {
    /// Current block timestamp in seconds.
    fn timestamp(&self) -> u64;

    /// Chain id bound into permit signatures.
    fn chain_id(&self) -> u64;

    /// Native balance of `account`.
    fn native_balance(&self, account: Address) -> U256;

    /// Moves native currency. Must either fully succeed or change nothing.
    fn transfer_native(&mut self, from: Address, to: Address, amount: U256)
        -> Result<(), HostError>;

    /// Opens a checkpoint covering subsequent native transfers.
    fn checkpoint(&mut self) -> HostCheckpoint;

    /// Undoes every native transfer made since `checkpoint`.
    fn checkpoint_revert(&mut self, checkpoint: HostCheckpoint);

    /// Closes `checkpoint`, keeping its transfers.
    fn checkpoint_commit(&mut self, _checkpoint: HostCheckpoint) {}
}

/// In-memory host with a settable clock.
///
/// Native balances live in a map; transfers made inside a checkpoint are
/// journaled and undone on revert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    chain_id: u64,
    timestamp: u64,
    balances: HashMap<Address, U256>,
    rejecting: HashSet<Address>,
    transfers: Vec<(Address, Address, U256)>,
    depth: usize,
}

impl InMemoryHost {
    /// Creates a host for `chain_id` at time `timestamp`.
    pub fn new(chain_id: u64, timestamp: u64) -> Self {
        Self { chain_id, timestamp, ..Default::default() }
    }

    /// Sets the native balance of `account` outside any call.
    pub fn set_native_balance(&mut self, account: Address, balance: U256) {
        self.balances.insert(account, balance);
    }

    /// Sets the block timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Advances the block timestamp by `seconds`.
    pub fn advance(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    /// Makes `account` refuse incoming native transfers, like a contract
    /// without a payable fallback.
    pub fn reject_native(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    /// Makes `account` accept native transfers again.
    pub fn accept_native(&mut self, account: Address) {
        self.rejecting.remove(&account);
    }

    fn move_native(&mut self, from: Address, to: Address, amount: U256) -> Result<(), HostError> {
        let balance = self.native_balance(from);
        let debited = balance.checked_sub(amount).ok_or(HostError::InsufficientFunds {
            account: from,
            balance,
            needed: amount,
        })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .native_balance(to)
            .checked_add(amount)
            .ok_or(HostError::Overflow { account: to })?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl Host for InMemoryHost {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn native_balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        if self.rejecting.contains(&to) {
            return Err(HostError::Rejected { account: to });
        }
        self.move_native(from, to, amount)?;
        if self.depth > 0 {
            self.transfers.push((from, to, amount));
        }
        Ok(())
    }

    fn checkpoint(&mut self) -> HostCheckpoint {
        self.depth += 1;
        HostCheckpoint(self.transfers.len())
    }

    fn checkpoint_revert(&mut self, checkpoint: HostCheckpoint) {
        self.depth = self.depth.saturating_sub(1);
        let start = checkpoint.0.min(self.transfers.len());
        for (from, to, amount) in self.transfers.split_off(start).into_iter().rev() {
            // Reversing a transfer that succeeded cannot underflow `to`.
            if let Err(err) = self.move_native(to, from, amount) {
                tracing::error!(target: LOG_TARGET, %err, "native rollback failed");
            }
        }
    }

    fn checkpoint_commit(&mut self, _checkpoint: HostCheckpoint) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.transfers.clear();
        }
    }
}
