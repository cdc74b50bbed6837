//! Calldata entry point.
//!
//! Decodes `IWETH` calldata, routes it to the typed API and ABI-encodes the
//! result. Empty calldata is a bare native transfer and wraps the attached
//! value like `deposit()`.

use crate::{
    abi::IWETH::{self, IWETHCalls},
    constants::LOG_TARGET,
    flash::{Borrowers, FlashBorrower},
    host::Host,
    Weth, WethError,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall, SolInterface, SolValue};

/// Caller and attached native value of a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller.
    pub caller: Address,
    /// Native value sent with the call.
    pub value: U256,
}

impl CallContext {
    /// A call from `caller` without native value.
    pub const fn new(caller: Address) -> Self {
        Self { caller, value: U256::ZERO }
    }

    /// Attaches `value` native units to the call.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Stand-in for a flash-loan receiver with no registered callback. Behaves
/// like an account without code: the call returns no data.
#[derive(Debug)]
struct MissingBorrower(Address);

impl<H: Host> FlashBorrower<H> for MissingBorrower {
    fn address(&self) -> Address {
        self.0
    }

    fn on_flash_loan(
        &mut self,
        _weth: &mut Weth<H>,
        _initiator: Address,
        _token: Address,
        _amount: U256,
        _fee: U256,
        _data: &Bytes,
    ) -> Result<B256, WethError> {
        Err(WethError::CallbackRejected {
            receiver: self.0,
            reason: "receiver returned no data".to_string(),
        })
    }
}

impl<H: Host> Weth<H> {
    /// Executes ABI-encoded `data` on behalf of `ctx.caller` and returns the
    /// ABI-encoded result. `borrowers` resolves `flashLoan` receivers.
    pub fn call(
        &mut self,
        ctx: CallContext,
        data: &[u8],
        borrowers: &mut dyn Borrowers<H>,
    ) -> Result<Bytes, WethError> {
        let CallContext { caller, value } = ctx;

        if data.is_empty() {
            self.deposit(caller, value)?;
            return Ok(Bytes::new());
        }

        let decoded = IWETHCalls::abi_decode(data).map_err(|err| {
            tracing::debug!(
                target: LOG_TARGET,
                ?caller,
                calldata_len = data.len(),
                %err,
                "undecodable calldata"
            );
            WethError::InvalidCalldata(err.to_string())
        })?;

        let payable = matches!(decoded, IWETHCalls::deposit(_) | IWETHCalls::depositTo(_));
        if !payable && !value.is_zero() {
            return Err(WethError::NonPayable { value });
        }

        let output = match decoded {
            IWETHCalls::name(_) => {
                IWETH::nameCall::abi_encode_returns(&self.name().to_string())
            }
            IWETHCalls::symbol(_) => {
                IWETH::symbolCall::abi_encode_returns(&self.symbol().to_string())
            }
            IWETHCalls::decimals(_) => {
                IWETH::decimalsCall::abi_encode_returns(&self.decimals())
            }
            IWETHCalls::totalSupply(_) => self.total_supply().abi_encode(),
            IWETHCalls::balanceOf(call) => self.balance_of(call.account).abi_encode(),
            IWETHCalls::allowance(call) => self.allowance(call.owner, call.spender).abi_encode(),
            IWETHCalls::transfer(call) => {
                self.transfer(caller, call.to, call.value)?;
                true.abi_encode()
            }
            IWETHCalls::approve(call) => {
                self.approve(caller, call.spender, call.value)?;
                true.abi_encode()
            }
            IWETHCalls::transferFrom(call) => {
                self.transfer_from(caller, call.from, call.to, call.value)?;
                true.abi_encode()
            }
            IWETHCalls::deposit(_) => {
                self.deposit(caller, value)?;
                Vec::new()
            }
            IWETHCalls::depositTo(call) => {
                self.deposit_to(caller, call.to, value)?;
                Vec::new()
            }
            IWETHCalls::withdraw(call) => {
                self.withdraw(caller, call.value)?;
                Vec::new()
            }
            IWETHCalls::withdrawTo(call) => {
                self.withdraw_to(caller, call.to, call.value)?;
                Vec::new()
            }
            IWETHCalls::withdrawFrom(call) => {
                self.withdraw_from(caller, call.from, call.to, call.value)?;
                Vec::new()
            }
            IWETHCalls::permit(call) => {
                self.permit_vrs(
                    call.owner,
                    call.spender,
                    call.value,
                    call.deadline,
                    call.v,
                    call.r,
                    call.s,
                )?;
                Vec::new()
            }
            IWETHCalls::nonces(call) => self.nonces(call.owner).abi_encode(),
            IWETHCalls::DOMAIN_SEPARATOR(_) => self.domain_separator().abi_encode(),
            IWETHCalls::maxFlashLoan(call) => self.max_flash_loan(call.token).abi_encode(),
            IWETHCalls::flashFee(call) => self.flash_fee(call.token, call.amount)?.abi_encode(),
            IWETHCalls::flashLoan(call) => {
                let ok = match borrowers.borrower(call.receiver) {
                    Some(receiver) => {
                        self.flash_loan(caller, receiver, call.token, call.amount, &call.data)?
                    }
                    None => self.flash_loan(
                        caller,
                        &mut MissingBorrower(call.receiver),
                        call.token,
                        call.amount,
                        &call.data,
                    )?,
                };
                ok.abi_encode()
            }
        };

        Ok(output.into())
    }
}
