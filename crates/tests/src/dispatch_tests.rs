use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolValue};
use ev_weth::{
    abi::IWETH, BorrowerRegistry, CallContext, FlashBorrower, Host, InMemoryHost, WethConfig,
    WethError, WethEvent,
};
use eyre::Result;

use crate::common::{
    deploy, one_ether, sign_permit, test_accounts, test_signer, TestFlashReceiver, TEST_TIMESTAMP,
    WETH_ADDRESS,
};

const RECEIVER: Address = alloy_primitives::address!("0x00000000000000000000000000000000000f1a54");

#[test]
fn test_selectors_match_weth_abi() {
    assert_eq!(hex::encode(IWETH::depositCall::SELECTOR), "d0e30db0");
    assert_eq!(hex::encode(IWETH::withdrawCall::SELECTOR), "2e1a7d4d");
    assert_eq!(hex::encode(IWETH::transferFromCall::SELECTOR), "23b872dd");
    assert_eq!(hex::encode(IWETH::flashLoanCall::SELECTOR), "5cffe9de");
}

#[test]
fn test_deposit_by_send() -> Result<()> {
    let owner = test_accounts()?[0];
    let mut weth = deploy(WethConfig::default())?;

    let out = weth.call(CallContext::new(owner).with_value(one_ether()), &[], &mut ())?;

    assert!(out.is_empty());
    assert_eq!(weth.host().native_balance(WETH_ADDRESS), one_ether());
    assert_eq!(weth.balance_of(owner), one_ether());
    assert_eq!(
        weth.events(),
        &[WethEvent::Transfer { from: Address::ZERO, to: owner, value: one_ether() }]
    );
    Ok(())
}

#[test]
fn test_erc20_round_trip_through_calldata() -> Result<()> {
    let accounts = test_accounts()?;
    let (owner, receiver, spender) = (accounts[0], accounts[1], accounts[2]);
    let mut weth = deploy(WethConfig::default())?;

    let deposit = IWETH::depositCall {}.abi_encode();
    weth.call(CallContext::new(owner).with_value(U256::from(1_000u64)), &deposit, &mut ())?;

    let approve = IWETH::approveCall { spender, value: U256::from(300u64) }.abi_encode();
    let out = weth.call(CallContext::new(owner), &approve, &mut ())?;
    assert!(bool::abi_decode(&out)?);

    let transfer_from =
        IWETH::transferFromCall { from: owner, to: receiver, value: U256::from(200u64) }
            .abi_encode();
    let out = weth.call(CallContext::new(spender), &transfer_from, &mut ())?;
    assert!(bool::abi_decode(&out)?);

    let query = IWETH::balanceOfCall { account: receiver }.abi_encode();
    let out = weth.call(CallContext::new(spender), &query, &mut ())?;
    assert_eq!(U256::abi_decode(&out)?, U256::from(200u64));

    let query = IWETH::allowanceCall { owner, spender }.abi_encode();
    let out = weth.call(CallContext::new(spender), &query, &mut ())?;
    assert_eq!(U256::abi_decode(&out)?, U256::from(100u64));

    let withdraw = IWETH::withdrawCall { value: U256::from(200u64) }.abi_encode();
    weth.call(CallContext::new(receiver), &withdraw, &mut ())?;

    let query = IWETH::totalSupplyCall {}.abi_encode();
    let out = weth.call(CallContext::new(receiver), &query, &mut ())?;
    assert_eq!(U256::abi_decode(&out)?, U256::from(800u64));
    assert!(weth.is_fully_backed());
    Ok(())
}

#[test]
fn test_name_and_domain_views() -> Result<()> {
    let caller = test_accounts()?[0];
    let mut weth = deploy(WethConfig::wrapped_ether_v10())?;

    let out = weth.call(CallContext::new(caller), &IWETH::nameCall {}.abi_encode(), &mut ())?;
    assert_eq!(IWETH::nameCall::abi_decode_returns(&out)?, "Wrapped Ether v10");

    let out =
        weth.call(CallContext::new(caller), &IWETH::DOMAIN_SEPARATORCall {}.abi_encode(), &mut ())?;
    assert_eq!(&out[..], weth.domain_separator().as_slice());

    let out = weth.call(
        CallContext::new(caller),
        &IWETH::maxFlashLoanCall { token: WETH_ADDRESS }.abi_encode(),
        &mut (),
    )?;
    assert_eq!(U256::abi_decode(&out)?, ev_weth::constants::WETH10_MAX_FLASH_LOAN);
    Ok(())
}

#[test]
fn test_payable_rules() -> Result<()> {
    let accounts = test_accounts()?;
    let (owner, receiver) = (accounts[0], accounts[1]);
    let mut weth = deploy(WethConfig::wrapped_ether_v10())?;

    let deposit_to = IWETH::depositToCall { to: receiver }.abi_encode();
    weth.call(CallContext::new(owner).with_value(U256::from(5u64)), &deposit_to, &mut ())?;
    assert_eq!(weth.balance_of(receiver), U256::from(5u64));

    let withdraw = IWETH::withdrawCall { value: U256::from(1u64) }.abi_encode();
    let err = weth
        .call(CallContext::new(receiver).with_value(U256::from(1u64)), &withdraw, &mut ())
        .unwrap_err();
    assert_eq!(err, WethError::NonPayable { value: U256::from(1u64) });
    assert_eq!(weth.balance_of(receiver), U256::from(5u64));
    Ok(())
}

#[test]
fn test_truncated_calldata_is_rejected() -> Result<()> {
    let owner = test_accounts()?[0];
    let mut weth = deploy(WethConfig::default())?;
    let transfer = IWETH::transferCall { to: owner, value: U256::from(1u64) }.abi_encode();

    let err = weth.call(CallContext::new(owner), &transfer[..20], &mut ()).unwrap_err();

    assert!(matches!(err, WethError::InvalidCalldata(_)), "{err}");
    Ok(())
}

#[test]
fn test_permit_through_calldata() -> Result<()> {
    let owner = test_signer(0)?;
    let spender = test_signer(1)?.address();
    let deadline = U256::from(TEST_TIMESTAMP + 60);
    let mut weth = deploy(WethConfig::default())?;
    let signature = sign_permit(&weth, &owner, spender, U256::from(100u64), deadline)?;
    let packed = signature.as_bytes();

    let permit = IWETH::permitCall {
        owner: owner.address(),
        spender,
        value: U256::from(100u64),
        deadline,
        v: packed[64],
        r: alloy_primitives::B256::from_slice(&packed[..32]),
        s: alloy_primitives::B256::from_slice(&packed[32..64]),
    }
    .abi_encode();
    weth.call(CallContext::new(spender), &permit, &mut ())?;

    let nonces = IWETH::noncesCall { owner: owner.address() }.abi_encode();
    let out = weth.call(CallContext::new(spender), &nonces, &mut ())?;
    assert_eq!(U256::abi_decode(&out)?, U256::from(1u64));
    assert_eq!(weth.allowance(owner.address(), spender), U256::from(100u64));
    Ok(())
}

#[test]
fn test_flash_loan_resolves_registered_borrower() -> Result<()> {
    let caller = test_accounts()?[0];
    let mut weth = deploy(WethConfig::default())?;
    weth.deposit(caller, one_ether())?;

    let mut borrowers = BorrowerRegistry::<InMemoryHost>::new();
    let receiver: Box<dyn FlashBorrower<InMemoryHost>> =
        Box::new(TestFlashReceiver::new(RECEIVER));
    borrowers.insert(RECEIVER, receiver);

    let amount = one_ether() / U256::from(100u64);
    let loan = |receiver: Address| {
        IWETH::flashLoanCall { receiver, token: WETH_ADDRESS, amount, data: Bytes::new() }
            .abi_encode()
    };

    let err = weth.call(CallContext::new(caller), &loan(caller), &mut borrowers).unwrap_err();
    assert!(matches!(err, WethError::CallbackRejected { receiver, .. } if receiver == caller));

    let out = weth.call(CallContext::new(caller), &loan(RECEIVER), &mut borrowers)?;
    assert!(bool::abi_decode(&out)?);
    assert_eq!(weth.total_supply(), one_ether());

    let fee = IWETH::flashFeeCall { token: caller, amount }.abi_encode();
    let err = weth.call(CallContext::new(caller), &fee, &mut borrowers).unwrap_err();
    assert_eq!(err, WethError::UnsupportedToken { token: caller });
    Ok(())
}
