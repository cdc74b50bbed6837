//! ERC-3156 flash loans of the ledger's own token.
//!
//! The loan is minted to the receiver, the receiver's callback runs with
//! exclusive access to the ledger, and repayment is pulled back through the
//! receiver's allowance to the ledger before the borrowed amount is burned.
//! Supply is restored exactly on success; any failure rolls the whole loan
//! back.

use crate::{constants::LOG_TARGET, events::WethEvent, host::Host, Weth, WethError};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use std::{collections::HashMap, fmt, sync::OnceLock};

/// `keccak256("ERC3156FlashBorrower.onFlashLoan")`, the value a borrower
/// returns to accept a loan.
pub fn callback_success() -> B256 {
    static SUCCESS: OnceLock<B256> = OnceLock::new();
    *SUCCESS.get_or_init(|| keccak256("ERC3156FlashBorrower.onFlashLoan"))
}

/// Receiver of a flash loan.
///
/// The callback gets the ledger itself and may call back into any entry
/// point. To accept the loan it must return [`callback_success`] and leave an
/// allowance of at least `amount + fee` for the ledger address.
pub trait FlashBorrower<H: Host>: fmt::Debug {
    /// Account the loan is credited to.
    fn address(&self) -> Address;

    /// Called after the loan has been credited.
    #[allow(clippy::too_many_arguments)]
    fn on_flash_loan(
        &mut self,
        weth: &mut Weth<H>,
        initiator: Address,
        token: Address,
        amount: U256,
        fee: U256,
        data: &Bytes,
    ) -> Result<B256, WethError>;
}

/// Resolves receiver addresses to callbacks for calldata-driven loans.
pub trait Borrowers<H: Host> {
    /// Callback registered for `address`, if any.
    fn borrower(&mut self, address: Address) -> Option<&mut dyn FlashBorrower<H>>;
}

/// Address-keyed set of registered borrowers.
pub type BorrowerRegistry<H> = HashMap<Address, Box<dyn FlashBorrower<H>>>;

impl<H: Host> Borrowers<H> for BorrowerRegistry<H> {
    fn borrower(&mut self, address: Address) -> Option<&mut dyn FlashBorrower<H>> {
        let boxed = self.get_mut(&address)?;
        let borrower: &mut dyn FlashBorrower<H> = boxed.as_mut();
        Some(borrower)
    }
}

/// No registered borrowers: every receiver behaves like an account without
/// code.
impl<H: Host> Borrowers<H> for () {
    fn borrower(&mut self, _address: Address) -> Option<&mut dyn FlashBorrower<H>> {
        None
    }
}

impl<H: Host> Weth<H> {
    /// Largest loan of `token` currently available. Zero for any token other
    /// than the ledger's own.
    pub fn max_flash_loan(&self, token: Address) -> U256 {
        if token != self.address() {
            return U256::ZERO;
        }
        self.config().flash_loan_ceiling.resolve(self.native_liquidity())
    }

    /// Fee charged for borrowing `amount` of `token`. Loans are free.
    pub fn flash_fee(&self, token: Address, _amount: U256) -> Result<U256, WethError> {
        if token != self.address() {
            return Err(WethError::UnsupportedToken { token });
        }
        Ok(U256::ZERO)
    }

    /// Lends `amount` of the ledger's own token to `receiver` for the
    /// duration of its callback.
    pub fn flash_loan(
        &mut self,
        initiator: Address,
        receiver: &mut dyn FlashBorrower<H>,
        token: Address,
        amount: U256,
        data: &Bytes,
    ) -> Result<bool, WethError> {
        self.transact("flash_loan", |weth| {
            let lender = weth.address();
            if token != lender {
                return Err(WethError::UnsupportedToken { token });
            }
            let fee = weth.flash_fee(token, amount)?;
            let max = weth.max_flash_loan(token);
            if amount > max {
                tracing::debug!(target: LOG_TARGET, %amount, %max, "flash loan above ceiling");
                return Err(WethError::ExceedsMaxLoan { amount, max });
            }

            let borrower = receiver.address();
            weth.ledger_mut().mint(borrower, amount)?;
            weth.ledger_mut().emit(WethEvent::Transfer {
                from: Address::ZERO,
                to: borrower,
                value: amount,
            });

            let ack = receiver
                .on_flash_loan(weth, initiator, token, amount, fee, data)
                .map_err(|err| {
                    tracing::warn!(target: LOG_TARGET, ?borrower, %err, "flash borrower failed");
                    match err {
                        WethError::CallbackRejected { .. } => err,
                        other => WethError::CallbackRejected {
                            receiver: borrower,
                            reason: other.to_string(),
                        },
                    }
                })?;
            if ack != callback_success() {
                tracing::warn!(
                    target: LOG_TARGET,
                    ?borrower,
                    %ack,
                    "flash borrower returned wrong value"
                );
                return Err(WethError::CallbackRejected {
                    receiver: borrower,
                    reason: format!("unexpected callback return value {ack}"),
                });
            }

            let repayment = amount.checked_add(fee).ok_or(WethError::Overflow)?;
            weth.ledger_mut().transfer_from(lender, borrower, lender, repayment)?;
            weth.ledger_mut().burn(lender, amount)?;
            weth.ledger_mut().emit(WethEvent::Transfer {
                from: lender,
                to: Address::ZERO,
                value: amount,
            });

            tracing::info!(target: LOG_TARGET, ?initiator, ?borrower, %amount, %fee, "flash loan");
            Ok(true)
        })
    }
}
