//! Error taxonomy of ledger calls.

use crate::host::HostError;
use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Reasons a ledger call aborts.
///
/// Every variant is a whole-call abort: the call's ledger and host effects
/// are rolled back before the error reaches the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum WethError {
    /// The debited account holds less than the requested amount.
    #[error("insufficient balance: {account} holds {balance}, needs {needed}")]
    InsufficientBalance {
        /// Account being debited.
        account: Address,
        /// Balance at the time of the debit.
        balance: U256,
        /// Requested amount.
        needed: U256,
    },
    /// The spender's allowance does not cover the requested amount.
    #[error("insufficient allowance: {spender} may move {allowance} of {owner}, needs {needed}")]
    InsufficientAllowance {
        /// Token owner.
        owner: Address,
        /// Spender using the allowance.
        spender: Address,
        /// Allowance at the time of the spend.
        allowance: U256,
        /// Requested amount.
        needed: U256,
    },
    /// The permit deadline is in the past.
    #[error("permit expired: deadline {deadline} is before block time {timestamp}")]
    Expired {
        /// Deadline carried by the permit.
        deadline: U256,
        /// Current block timestamp.
        timestamp: u64,
    },
    /// The permit signature does not recover to the owner.
    #[error("invalid permit signature for {owner}")]
    InvalidSignature {
        /// Claimed signer.
        owner: Address,
    },
    /// Flash loans are only offered in the ledger's own token.
    #[error("unsupported flash-loan token {token}")]
    UnsupportedToken {
        /// Requested token.
        token: Address,
    },
    /// The requested loan is above the lender's ceiling.
    #[error("flash loan of {amount} exceeds maximum {max}")]
    ExceedsMaxLoan {
        /// Requested amount.
        amount: U256,
        /// Ceiling at the time of the request.
        max: U256,
    },
    /// The borrower's callback failed or returned the wrong acknowledgement.
    #[error("flash borrower {receiver} rejected the loan: {reason}")]
    CallbackRejected {
        /// Borrower address.
        receiver: Address,
        /// Why the callback was not accepted.
        reason: String,
    },
    /// The host refused to move native currency.
    #[error("native transfer of {amount} from {from} to {to} failed: {source}")]
    NativeTransferFailed {
        /// Sender of the native currency.
        from: Address,
        /// Recipient of the native currency.
        to: Address,
        /// Amount in wei.
        amount: U256,
        /// Host-side reason.
        #[source]
        source: HostError,
    },
    /// A balance or the total supply would exceed `U256::MAX`.
    #[error("arithmetic overflow")]
    Overflow,
    /// Native value was attached to a non-payable function.
    #[error("function is not payable (value {value})")]
    NonPayable {
        /// Attached native value.
        value: U256,
    },
    /// Calldata does not match the interface.
    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),
}
