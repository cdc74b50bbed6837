//! The ledger aggregate and its ERC-20 entry points.

use crate::{
    constants::{DECIMALS, LOG_TARGET},
    events::WethEvent,
    host::Host,
    ledger::Ledger,
    permit::{EcdsaVerifier, PermitVerifier},
    WethConfig, WethError,
};
use alloy_primitives::{Address, Log, U256};

/// A wrapped native token deployed at `address`.
///
/// Every state-changing entry point runs inside a checkpoint covering both
/// the ledger and the host: it either completes or leaves no trace. Entry
/// points may be re-entered from a flash-loan callback; each re-entered call
/// gets its own nested checkpoint and validates against the state as it is at
/// that moment.
#[derive(Debug)]
pub struct Weth<H> {
    address: Address,
    config: WethConfig,
    ledger: Ledger,
    host: H,
    verifier: Box<dyn PermitVerifier>,
}

impl<H: Host> Weth<H> {
    /// Deploys an empty ledger at `address` on `host`.
    pub fn new(address: Address, config: WethConfig, host: H) -> Self {
        let ledger = Ledger::new(config.unlimited_allowance);
        tracing::info!(
            target: LOG_TARGET,
            ?address,
            name = %config.name,
            symbol = %config.symbol,
            event_style = ?config.event_style,
            flash_loan_ceiling = ?config.flash_loan_ceiling,
            "wrapped token deployed"
        );
        Self { address, config, ledger, host, verifier: Box::new(EcdsaVerifier) }
    }

    /// Replaces the permit digest and signature recovery functions.
    pub fn with_verifier(mut self, verifier: impl PermitVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Address the ledger is deployed at; also the flash-loan token.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Deployment configuration.
    pub const fn config(&self) -> &WethConfig {
        &self.config
    }

    /// Read access to the ledger state.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The execution environment.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the execution environment, e.g. to move the clock
    /// between calls.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub(crate) fn verifier(&self) -> &dyn PermitVerifier {
        self.verifier.as_ref()
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    // === Views ===

    /// Token name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Token decimals, always 18.
    pub const fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// Total token units in circulation.
    pub const fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    /// Token balance of `account`.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.ledger.balance_of(account)
    }

    /// Amount `spender` may move out of `owner`'s balance.
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    /// Native currency held by the ledger.
    pub fn native_liquidity(&self) -> U256 {
        self.host.native_balance(self.address)
    }

    /// Whether the supply is fully backed by native currency held by the
    /// ledger. Holds between calls; may not hold inside a flash loan.
    pub fn is_fully_backed(&self) -> bool {
        self.native_liquidity() == self.total_supply()
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[WethEvent] {
        self.ledger.events()
    }

    /// Drains the event log. Inside a call, e.g. from a flash-loan callback,
    /// the log is left in place and nothing is returned.
    pub fn take_events(&mut self) -> Vec<WethEvent> {
        self.ledger.take_events()
    }

    /// Events emitted so far, encoded as EVM logs.
    pub fn logs(&self) -> Vec<Log> {
        self.events().iter().map(|event| event.to_log(self.address)).collect()
    }

    // === ERC-20 ===

    /// Moves `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.transact("transfer", |weth| weth.ledger.transfer(caller, to, amount))
    }

    /// Sets `caller`'s allowance for `spender` to `amount`.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.transact("approve", |weth| {
            weth.ledger.approve(caller, spender, amount);
            Ok(())
        })
    }

    /// Moves `amount` from `owner` to `to` using `caller`'s allowance.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), WethError> {
        self.transact("transfer_from", |weth| weth.ledger.transfer_from(caller, owner, to, amount))
    }

    // === Atomicity ===

    /// Runs `op` as one all-or-nothing call.
    pub(crate) fn transact<T>(
        &mut self,
        name: &'static str,
        op: impl FnOnce(&mut Self) -> Result<T, WethError>,
    ) -> Result<T, WethError> {
        let ledger_checkpoint = self.ledger.checkpoint();
        let host_checkpoint = self.host.checkpoint();

        match op(self) {
            Ok(value) => {
                self.host.checkpoint_commit(host_checkpoint);
                self.ledger.checkpoint_commit();
                Ok(value)
            }
            Err(err) => {
                self.ledger.checkpoint_revert(ledger_checkpoint);
                self.host.checkpoint_revert(host_checkpoint);
                tracing::debug!(
                    target: LOG_TARGET,
                    call = name,
                    depth = self.ledger.depth(),
                    %err,
                    "call reverted"
                );
                Err(err)
            }
        }
    }
}
