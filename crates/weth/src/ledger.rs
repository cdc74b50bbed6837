//! Ledger core: balances, allowances, permit nonces, total supply and the
//! event log.
//!
//! Individual writes are journaled but not atomic on their own; multi-step
//! operations rely on the checkpoint opened by [`crate::Weth`] around every
//! external call. All arithmetic is checked.

use crate::{
    constants::LOG_TARGET,
    events::WethEvent,
    journal::{Journal, JournalCheckpoint, JournalEntry},
    WethError,
};
use alloy_primitives::{Address, U256};
use std::{collections::HashMap, hash::Hash};

/// Accounting state of the wrapped token.
///
/// Invariant: `total_supply` equals the sum of all balances after every
/// completed external call.
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, U256>,
    total_supply: U256,
    unlimited_allowance: bool,
    events: Vec<WethEvent>,
    journal: Journal,
}

impl Ledger {
    /// Creates an empty ledger. With `unlimited_allowance` set, an allowance
    /// of `U256::MAX` is never decremented.
    pub fn new(unlimited_allowance: bool) -> Self {
        Self { unlimited_allowance, ..Default::default() }
    }

    /// Token balance of `account`.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or_default()
    }

    /// Next permit nonce of `owner`.
    pub fn nonce(&self, owner: Address) -> U256 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    /// Total token units in circulation.
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Iterates over accounts holding a nonzero balance.
    pub fn holders(&self) -> impl Iterator<Item = (Address, U256)> + '_ {
        self.balances.iter().map(|(account, balance)| (*account, *balance))
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[WethEvent] {
        &self.events
    }

    /// Drains the event log. While a checkpoint is open the log stays in
    /// place and nothing is returned.
    pub(crate) fn take_events(&mut self) -> Vec<WethEvent> {
        if self.depth() > 0 {
            tracing::debug!(
                target: LOG_TARGET,
                depth = self.depth(),
                "event log drain deferred inside a call"
            );
            return Vec::new();
        }
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: WethEvent) {
        self.events.push(event);
    }

    // === Checkpoints ===

    pub(crate) fn checkpoint(&mut self) -> JournalCheckpoint {
        self.journal.checkpoint(self.events.len())
    }

    pub(crate) fn checkpoint_commit(&mut self) {
        self.journal.commit();
    }

    pub(crate) fn checkpoint_revert(&mut self, checkpoint: JournalCheckpoint) {
        for entry in self.journal.revert(checkpoint).into_iter().rev() {
            match entry {
                JournalEntry::BalanceChanged { account, previous } => {
                    write_slot(&mut self.balances, account, previous);
                }
                JournalEntry::AllowanceChanged { owner, spender, previous } => {
                    write_slot(&mut self.allowances, (owner, spender), previous);
                }
                JournalEntry::NonceChanged { account, previous } => {
                    write_slot(&mut self.nonces, account, previous);
                }
                JournalEntry::SupplyChanged { previous } => self.total_supply = previous,
            }
        }
        self.events.truncate(checkpoint.log_i);
    }

    pub(crate) const fn depth(&self) -> usize {
        self.journal.depth()
    }

    // === Writes ===

    fn set_balance(&mut self, account: Address, value: U256) {
        let previous = write_slot(&mut self.balances, account, value);
        self.journal.record(JournalEntry::BalanceChanged { account, previous });
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, value: U256) {
        let previous = write_slot(&mut self.allowances, (owner, spender), value);
        self.journal.record(JournalEntry::AllowanceChanged { owner, spender, previous });
    }

    fn set_total_supply(&mut self, value: U256) {
        let previous = std::mem::replace(&mut self.total_supply, value);
        self.journal.record(JournalEntry::SupplyChanged { previous });
    }

    fn debit(&mut self, account: Address, amount: U256) -> Result<(), WethError> {
        let balance = self.balance_of(account);
        let remaining = balance.checked_sub(amount).ok_or_else(|| {
            tracing::debug!(target: LOG_TARGET, ?account, %balance, %amount, "debit rejected");
            WethError::InsufficientBalance { account, balance, needed: amount }
        })?;
        self.set_balance(account, remaining);
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: U256) -> Result<(), WethError> {
        let balance = self.balance_of(account).checked_add(amount).ok_or(WethError::Overflow)?;
        self.set_balance(account, balance);
        Ok(())
    }

    /// Moves `amount` from `from` to `to` and emits `Transfer`. Zero amounts
    /// and self-transfers are ordinary transfers.
    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        self.emit(WethEvent::Transfer { from, to, value: amount });
        Ok(())
    }

    /// Overwrites the allowance and emits `Approval`.
    pub(crate) fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.set_allowance(owner, spender, amount);
        self.emit(WethEvent::Approval { owner, spender, value: amount });
    }

    /// Consumes `amount` of `spender`'s allowance over `owner`. A finite
    /// allowance is decremented and re-announced with `Approval`.
    pub(crate) fn spend_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        let allowance = self.allowance(owner, spender);
        if self.unlimited_allowance && allowance == U256::MAX {
            return Ok(());
        }
        let remaining = allowance.checked_sub(amount).ok_or_else(|| {
            tracing::debug!(
                target: LOG_TARGET,
                ?owner,
                ?spender,
                %allowance,
                %amount,
                "allowance exhausted"
            );
            WethError::InsufficientAllowance { owner, spender, allowance, needed: amount }
        })?;
        self.set_allowance(owner, spender, remaining);
        self.emit(WethEvent::Approval { owner, spender, value: remaining });
        Ok(())
    }

    /// Spends the allowance, then transfers.
    pub(crate) fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.spend_allowance(owner, spender, amount)?;
        self.transfer(owner, to, amount)
    }

    /// Creates `amount` units for `to`. Emits nothing; callers choose the
    /// event convention.
    pub(crate) fn mint(&mut self, to: Address, amount: U256) -> Result<(), WethError> {
        let supply = self.total_supply.checked_add(amount).ok_or(WethError::Overflow)?;
        self.credit(to, amount)?;
        self.set_total_supply(supply);
        Ok(())
    }

    /// Destroys `amount` units held by `from`. Emits nothing.
    pub(crate) fn burn(&mut self, from: Address, amount: U256) -> Result<(), WethError> {
        self.debit(from, amount)?;
        let supply = self.total_supply.checked_sub(amount).ok_or(WethError::Overflow)?;
        self.set_total_supply(supply);
        Ok(())
    }

    /// Consumes `owner`'s current nonce and returns it.
    pub(crate) fn use_nonce(&mut self, owner: Address) -> Result<U256, WethError> {
        let current = self.nonce(owner);
        let next = current.checked_add(U256::from(1u64)).ok_or(WethError::Overflow)?;
        let previous = write_slot(&mut self.nonces, owner, next);
        self.journal.record(JournalEntry::NonceChanged { account: owner, previous });
        Ok(current)
    }
}

/// Writes `value` under `key`, keeping zero values out of the map. Returns
/// the replaced value.
fn write_slot<K: Eq + Hash>(map: &mut HashMap<K, U256>, key: K, value: U256) -> U256 {
    let previous = if value.is_zero() { map.remove(&key) } else { map.insert(key, value) };
    previous.unwrap_or_default()
}
