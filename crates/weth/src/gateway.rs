//! Conversion gateway between native currency and the wrapped token.
//!
//! Deposits pull native currency into the ledger address before minting.
//! Withdrawals burn first and pay out last, so a callee that re-enters during
//! the payout already sees the reduced balance.

use crate::{
    config::EventStyle, constants::LOG_TARGET, events::WethEvent, host::Host, Weth, WethError,
};
use alloy_primitives::{Address, U256};

impl<H: Host> Weth<H> {
    /// Wraps `value` native units sent by `caller` into `caller`'s balance.
    pub fn deposit(&mut self, caller: Address, value: U256) -> Result<(), WethError> {
        self.deposit_to(caller, caller, value)
    }

    /// Wraps `value` native units sent by `caller` into `to`'s balance.
    pub fn deposit_to(
        &mut self,
        caller: Address,
        to: Address,
        value: U256,
    ) -> Result<(), WethError> {
        self.transact("deposit", |weth| {
            weth.receive_native(caller, value)?;
            weth.ledger_mut().mint(to, value)?;
            weth.emit_mint(to, value);
            tracing::info!(target: LOG_TARGET, ?caller, ?to, %value, "deposit");
            Ok(())
        })
    }

    /// Unwraps `amount` of `caller`'s balance back to `caller`.
    pub fn withdraw(&mut self, caller: Address, amount: U256) -> Result<(), WethError> {
        self.withdraw_to(caller, caller, amount)
    }

    /// Unwraps `amount` of `caller`'s balance and pays the native currency to
    /// `to`.
    pub fn withdraw_to(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.transact("withdraw", |weth| weth.burn_and_pay(caller, to, amount))
    }

    /// Unwraps `amount` of `owner`'s balance using `caller`'s allowance and
    /// pays the native currency to `to`.
    pub fn withdraw_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.transact("withdraw_from", |weth| {
            weth.ledger_mut().spend_allowance(owner, caller, amount)?;
            weth.burn_and_pay(owner, to, amount)
        })
    }

    fn burn_and_pay(&mut self, owner: Address, to: Address, amount: U256) -> Result<(), WethError> {
        self.ledger_mut().burn(owner, amount)?;
        self.emit_burn(owner, amount);
        self.send_native(to, amount)?;
        tracing::info!(target: LOG_TARGET, ?owner, ?to, %amount, "withdraw");
        Ok(())
    }

    fn emit_mint(&mut self, to: Address, value: U256) {
        let event = match self.config().event_style {
            EventStyle::ZeroAddressTransfer => {
                WethEvent::Transfer { from: Address::ZERO, to, value }
            }
            EventStyle::DepositWithdrawal => WethEvent::Deposit { dst: to, wad: value },
        };
        self.ledger_mut().emit(event);
    }

    fn emit_burn(&mut self, from: Address, value: U256) {
        let event = match self.config().event_style {
            EventStyle::ZeroAddressTransfer => {
                WethEvent::Transfer { from, to: Address::ZERO, value }
            }
            EventStyle::DepositWithdrawal => WethEvent::Withdrawal { src: from, wad: value },
        };
        self.ledger_mut().emit(event);
    }

    fn receive_native(&mut self, from: Address, amount: U256) -> Result<(), WethError> {
        let to = self.address();
        self.host_mut().transfer_native(from, to, amount).map_err(|source| {
            tracing::warn!(target: LOG_TARGET, ?from, %amount, %source, "native deposit failed");
            WethError::NativeTransferFailed { from, to, amount, source }
        })
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), WethError> {
        let from = self.address();
        self.host_mut().transfer_native(from, to, amount).map_err(|source| {
            tracing::warn!(target: LOG_TARGET, ?to, %amount, %source, "native payout failed");
            WethError::NativeTransferFailed { from, to, amount, source }
        })
    }
}
