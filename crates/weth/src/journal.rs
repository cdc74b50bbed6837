//! Undo log backing whole-call rollback.
//!
//! Every ledger write made while a checkpoint is open records the value it
//! replaced. Reverting to a checkpoint replays those records newest-first and
//! truncates the event log to the length it had when the checkpoint was
//! taken. Checkpoints nest, so a call re-entered from a flash-loan callback
//! can fail and roll back on its own without disturbing the outer call.

use alloy_primitives::{Address, U256};

/// A single reversible ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JournalEntry {
    /// `balances[account]` was `previous`.
    BalanceChanged { account: Address, previous: U256 },
    /// `allowances[(owner, spender)]` was `previous`.
    AllowanceChanged { owner: Address, spender: Address, previous: U256 },
    /// `nonces[account]` was `previous`.
    NonceChanged { account: Address, previous: U256 },
    /// `total_supply` was `previous`.
    SupplyChanged { previous: U256 },
}

/// Position in the journal and the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JournalCheckpoint {
    pub(crate) journal_i: usize,
    pub(crate) log_i: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<JournalEntry>,
    depth: usize,
}

impl Journal {
    /// Records a write. Writes outside any checkpoint cannot be reverted and
    /// are not recorded.
    pub(crate) fn record(&mut self, entry: JournalEntry) {
        if self.depth > 0 {
            self.entries.push(entry);
        }
    }

    pub(crate) fn checkpoint(&mut self, log_i: usize) -> JournalCheckpoint {
        let checkpoint = JournalCheckpoint { journal_i: self.entries.len(), log_i };
        self.depth += 1;
        checkpoint
    }

    pub(crate) fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Closes the checkpoint and hands back the writes made since it was
    /// taken, oldest first.
    pub(crate) fn revert(&mut self, checkpoint: JournalCheckpoint) -> Vec<JournalEntry> {
        self.depth = self.depth.saturating_sub(1);
        let start = checkpoint.journal_i.min(self.entries.len());
        self.entries.split_off(start)
    }

    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }
}
