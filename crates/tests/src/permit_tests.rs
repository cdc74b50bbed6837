use alloy_primitives::{Address, B256, U256};
use ev_weth::{
    permit::permit_typehash, EcdsaVerifier, PermitVerifier, WethConfig, WethError, WethEvent,
};
use eyre::Result;

use crate::common::{deploy, presets, sign_permit, test_signer, TEST_TIMESTAMP};

#[test]
fn test_permit() -> Result<()> {
    let owner = test_signer(0)?;
    let spender = test_signer(1)?.address();
    let amount = U256::from(100u64);
    let deadline = U256::from(TEST_TIMESTAMP + 60);

    for (label, config) in presets() {
        let mut weth = deploy(config)?;
        assert_eq!(weth.nonces(owner.address()), U256::ZERO);
        assert_eq!(weth.allowance(owner.address(), spender), U256::ZERO);
        let signature = sign_permit(&weth, &owner, spender, amount, deadline)?;

        let tampered = [
            (spender, spender, amount, deadline),
            (owner.address(), owner.address(), amount, deadline),
            (owner.address(), spender, amount + U256::from(1u64), deadline),
            (owner.address(), spender, amount, deadline + U256::from(1u64)),
        ];
        for (claimed_owner, claimed_spender, value, deadline) in tampered {
            let err = weth
                .permit(claimed_owner, claimed_spender, value, deadline, &signature)
                .unwrap_err();
            assert_eq!(err, WethError::InvalidSignature { owner: claimed_owner }, "{label}");
        }

        weth.permit(owner.address(), spender, amount, deadline, &signature)?;

        assert_eq!(weth.allowance(owner.address(), spender), amount, "{label}");
        assert_eq!(weth.nonces(owner.address()), U256::from(1u64), "{label}");
        assert_eq!(
            weth.events(),
            &[WethEvent::Approval { owner: owner.address(), spender, value: amount }],
            "{label}"
        );
    }
    Ok(())
}

#[test]
fn test_permit_replay_fails() -> Result<()> {
    let owner = test_signer(0)?;
    let spender = test_signer(1)?.address();
    let deadline = U256::from(TEST_TIMESTAMP + 60);
    let mut weth = deploy(WethConfig::default())?;
    let signature = sign_permit(&weth, &owner, spender, U256::from(5u64), deadline)?;

    weth.permit(owner.address(), spender, U256::from(5u64), deadline, &signature)?;
    weth.approve(owner.address(), spender, U256::ZERO)?;
    let err = weth
        .permit(owner.address(), spender, U256::from(5u64), deadline, &signature)
        .unwrap_err();

    assert_eq!(err, WethError::InvalidSignature { owner: owner.address() });
    assert_eq!(weth.allowance(owner.address(), spender), U256::ZERO);
    Ok(())
}

#[test]
fn test_permit_deadline_boundary() -> Result<()> {
    let owner = test_signer(0)?;
    let spender = test_signer(1)?.address();
    let deadline = U256::from(TEST_TIMESTAMP + 60);
    let mut weth = deploy(WethConfig::default())?;
    let signature = sign_permit(&weth, &owner, spender, U256::from(1u64), deadline)?;

    weth.host_mut().advance(61);
    let err = weth
        .permit(owner.address(), spender, U256::from(1u64), deadline, &signature)
        .unwrap_err();
    assert_eq!(err, WethError::Expired { deadline, timestamp: TEST_TIMESTAMP + 61 });
    assert_eq!(weth.nonces(owner.address()), U256::ZERO);

    weth.host_mut().set_timestamp(TEST_TIMESTAMP + 60);
    weth.permit(owner.address(), spender, U256::from(1u64), deadline, &signature)?;
    Ok(())
}

#[test]
fn test_permit_signed_for_other_chain_fails() -> Result<()> {
    let owner = test_signer(0)?;
    let spender = test_signer(1)?.address();
    let deadline = U256::MAX;

    let foreign = ev_weth::Weth::new(
        crate::common::WETH_ADDRESS,
        WethConfig::default(),
        ev_weth::InMemoryHost::new(1, TEST_TIMESTAMP),
    );
    let signature = sign_permit(&foreign, &owner, spender, U256::from(1u64), deadline)?;

    let mut weth = deploy(WethConfig::default())?;
    assert_ne!(weth.domain_separator(), foreign.domain_separator());
    let err = weth
        .permit(owner.address(), spender, U256::from(1u64), deadline, &signature)
        .unwrap_err();
    assert_eq!(err, WethError::InvalidSignature { owner: owner.address() });
    Ok(())
}

#[test]
fn test_permit_via_vrs_and_packed() -> Result<()> {
    let owner = test_signer(2)?;
    let spender = test_signer(0)?.address();
    let deadline = U256::from(TEST_TIMESTAMP + 3600);
    let mut weth = deploy(WethConfig::wrapped_ether_v10())?;

    let signature = sign_permit(&weth, &owner, spender, U256::from(9u64), deadline)?;
    let packed = signature.as_bytes();
    weth.permit_vrs(
        owner.address(),
        spender,
        U256::from(9u64),
        deadline,
        packed[64],
        B256::from_slice(&packed[..32]),
        B256::from_slice(&packed[32..64]),
    )?;

    let signature = sign_permit(&weth, &owner, spender, U256::from(10u64), deadline)?;
    let packed = signature.as_bytes();
    weth.permit_packed(owner.address(), spender, U256::from(10u64), deadline, &packed)?;

    assert_eq!(weth.allowance(owner.address(), spender), U256::from(10u64));
    assert_eq!(weth.nonces(owner.address()), U256::from(2u64));
    Ok(())
}

/// Accepts any signature as coming from one fixed account.
#[derive(Debug)]
struct FixedSigner(Address);

impl PermitVerifier for FixedSigner {
    fn recover(&self, _digest: B256, _signature: &alloy_primitives::Signature) -> Option<Address> {
        Some(self.0)
    }
}

#[test]
fn test_custom_verifier_replaces_recovery() -> Result<()> {
    let owner = test_signer(0)?.address();
    let spender = test_signer(1)?.address();
    let mut weth = deploy(WethConfig::default())?.with_verifier(FixedSigner(owner));
    let garbage = alloy_primitives::Signature::new(U256::from(1u64), U256::from(2u64), false);

    weth.permit(owner, spender, U256::from(3u64), U256::MAX, &garbage)?;
    assert_eq!(weth.allowance(owner, spender), U256::from(3u64));

    let err = weth.permit(spender, owner, U256::from(3u64), U256::MAX, &garbage).unwrap_err();
    assert_eq!(err, WethError::InvalidSignature { owner: spender });
    Ok(())
}

#[test]
fn test_default_verifier_recovers_signer() -> Result<()> {
    let owner = test_signer(1)?;
    let weth = deploy(WethConfig::default())?;
    let digest = weth.permit_digest(owner.address(), Address::ZERO, U256::ZERO, U256::MAX);
    let signature = sign_permit(&weth, &owner, Address::ZERO, U256::ZERO, U256::MAX)?;

    assert_eq!(EcdsaVerifier.recover(digest, &signature), Some(owner.address()));
    assert_ne!(permit_typehash(), B256::ZERO);
    Ok(())
}
