//! ERC-2612 signed approvals.
//!
//! A permit is an EIP-712 signature over
//! `Permit(owner, spender, value, nonce, deadline)` in the domain
//! `(name, "1", chain id, ledger address)`. Digest construction and signer
//! recovery are delegated to a [`PermitVerifier`] so that deployments can
//! swap the signature scheme; the default is secp256k1 ECDSA.
//!
//! Checks run in a fixed order: deadline, signature, nonce consumption, then
//! the approval itself.

use crate::{
    abi::Permit,
    constants::{LOG_TARGET, PERMIT_VERSION, SECP256K1N_HALF},
    host::Host,
    Weth, WethError,
};
use alloy_primitives::{keccak256, Address, Signature, B256, U256};
use alloy_sol_types::{Eip712Domain, SolStruct};
use std::{borrow::Cow, fmt, sync::OnceLock};

/// EIP-712 type string of the permit message.
pub const PERMIT_TYPE: &str =
    "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// `keccak256(PERMIT_TYPE)`.
pub fn permit_typehash() -> B256 {
    static TYPEHASH: OnceLock<B256> = OnceLock::new();
    *TYPEHASH.get_or_init(|| keccak256(PERMIT_TYPE))
}

/// Builds the signed digest of a permit and recovers its signer.
pub trait PermitVerifier: fmt::Debug + Send + Sync {
    /// EIP-712 signing hash of `permit` in `domain`.
    fn digest(&self, domain: &Eip712Domain, permit: &Permit) -> B256 {
        permit.eip712_signing_hash(domain)
    }

    /// Signer of `digest`, or `None` if the signature is unusable.
    fn recover(&self, digest: B256, signature: &Signature) -> Option<Address>;
}

/// secp256k1 recovery that rejects malleable high-`s` signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl PermitVerifier for EcdsaVerifier {
    fn recover(&self, digest: B256, signature: &Signature) -> Option<Address> {
        if signature.s() > SECP256K1N_HALF {
            return None;
        }
        signature.recover_address_from_prehash(&digest).ok()
    }
}

/// Builds a signature from its `(v, r, s)` parts. `v` may be 27/28 or 0/1.
pub fn signature_from_vrs(v: u8, r: B256, s: B256) -> Option<Signature> {
    let y_parity = match v {
        0 | 27 => false,
        1 | 28 => true,
        _ => return None,
    };
    Some(Signature::new(U256::from_be_bytes(r.0), U256::from_be_bytes(s.0), y_parity))
}

/// Parses a packed 65-byte `r || s || v` signature.
pub fn signature_from_packed(bytes: &[u8]) -> Option<Signature> {
    let bytes: &[u8; 65] = bytes.try_into().ok()?;
    signature_from_vrs(bytes[64], B256::from_slice(&bytes[..32]), B256::from_slice(&bytes[32..64]))
}

impl<H: Host> Weth<H> {
    /// EIP-712 domain permits are signed in.
    pub fn domain(&self) -> Eip712Domain {
        Eip712Domain::new(
            Some(Cow::Owned(self.name().to_owned())),
            Some(Cow::Borrowed(PERMIT_VERSION)),
            Some(U256::from(self.host().chain_id())),
            Some(self.address()),
            None,
        )
    }

    /// `DOMAIN_SEPARATOR()`.
    pub fn domain_separator(&self) -> B256 {
        self.domain().separator()
    }

    /// Next permit nonce of `owner`.
    pub fn nonces(&self, owner: Address) -> U256 {
        self.ledger().nonce(owner)
    }

    /// Digest `owner` must sign to approve `spender` for `value` with the
    /// current nonce.
    pub fn permit_digest(
        &self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
    ) -> B256 {
        let permit = Permit { owner, spender, value, nonce: self.nonces(owner), deadline };
        self.verifier().digest(&self.domain(), &permit)
    }

    /// Approves `spender` for `value` of `owner`'s tokens on the strength of
    /// `owner`'s signature.
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &Signature,
    ) -> Result<(), WethError> {
        self.transact("permit", |weth| {
            let timestamp = weth.host().timestamp();
            if U256::from(timestamp) > deadline {
                tracing::debug!(target: LOG_TARGET, ?owner, %deadline, timestamp, "permit expired");
                return Err(WethError::Expired { deadline, timestamp });
            }

            let digest = weth.permit_digest(owner, spender, value, deadline);
            match weth.verifier().recover(digest, signature) {
                Some(signer) if signer == owner && !signer.is_zero() => {}
                recovered => {
                    tracing::debug!(
                        target: LOG_TARGET,
                        ?owner,
                        ?recovered,
                        "permit signer mismatch"
                    );
                    return Err(WethError::InvalidSignature { owner });
                }
            }

            let nonce = weth.ledger_mut().use_nonce(owner)?;
            weth.ledger_mut().approve(owner, spender, value);
            tracing::info!(target: LOG_TARGET, ?owner, ?spender, %value, %nonce, "permit");
            Ok(())
        })
    }

    /// [`Weth::permit`] with a `(v, r, s)` signature.
    #[allow(clippy::too_many_arguments)]
    pub fn permit_vrs(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
    ) -> Result<(), WethError> {
        let signature =
            signature_from_vrs(v, r, s).ok_or(WethError::InvalidSignature { owner })?;
        self.permit(owner, spender, value, deadline, &signature)
    }

    /// [`Weth::permit`] with a packed 65-byte `r || s || v` signature.
    pub fn permit_packed(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        signature: &[u8],
    ) -> Result<(), WethError> {
        let signature =
            signature_from_packed(signature).ok_or(WethError::InvalidSignature { owner })?;
        self.permit(owner, spender, value, deadline, &signature)
    }
}
