use alloy_primitives::{Address, Bytes, U256};
use ev_weth::{ConfigError, FlashLoanCeiling, WethConfig, WethEvent};
use eyre::Result;
use serde_json::json;

use crate::common::{deploy, one_ether, test_accounts, TestFlashReceiver, WETH_ADDRESS};

const BORROWER: Address = alloy_primitives::address!("0x00000000000000000000000000000000000c0f19");

#[test]
fn test_chainspec_extras_drive_deployment() -> Result<()> {
    let owner = test_accounts()?[0];
    let extras = json!({
        "evolve": { "baseFeeSink": "0x0000000000000000000000000000000000000001" },
        "weth": {
            "name": "Wrapped Native",
            "symbol": "WNAT",
            "eventStyle": "depositWithdrawal",
            "flashLoanCeiling": { "mode": "liquidityShare", "bps": 5000 }
        }
    });
    let mut weth = deploy(WethConfig::from_extras(&extras)?)?;

    assert_eq!(weth.name(), "Wrapped Native");
    assert_eq!(weth.symbol(), "WNAT");

    weth.deposit(owner, one_ether())?;
    assert_eq!(weth.events(), &[WethEvent::Deposit { dst: owner, wad: one_ether() }]);
    assert_eq!(weth.max_flash_loan(WETH_ADDRESS), one_ether() / U256::from(2u64));

    let half = one_ether() / U256::from(2u64);
    let mut borrower = TestFlashReceiver::new(BORROWER);
    weth.flash_loan(owner, &mut borrower, WETH_ADDRESS, half, &Bytes::new())?;
    assert_eq!(borrower.calls, 1);
    assert_eq!(weth.total_supply(), one_ether());
    assert!(weth.is_fully_backed());
    Ok(())
}

#[test]
fn test_config_round_trips_through_extras() -> Result<()> {
    let config = WethConfig::wrapped_ether_v10();
    let extras = json!({ "weth": serde_json::to_value(&config)? });

    let loaded = WethConfig::from_extras(&extras)?;

    assert_eq!(loaded, config);
    assert!(matches!(loaded.flash_loan_ceiling, FlashLoanCeiling::Fixed { .. }));
    Ok(())
}

#[test]
fn test_invalid_extras_are_rejected_before_deployment() {
    let extras = json!({ "weth": { "symbol": " " } });
    let err = WethConfig::from_extras(&extras).unwrap_err();
    assert_eq!(err, ConfigError::EmptyField { field: "symbol" });

    let extras = json!({ "weth": { "eventStyle": "mintBurn" } });
    let err = WethConfig::from_extras(&extras).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}
