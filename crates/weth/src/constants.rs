//! Fixed parameters of the wrapped-token ledger.

use alloy_primitives::U256;

/// Default token name (WETH8/WETH9 deployments).
pub const DEFAULT_NAME: &str = "Wrapped Ether";

/// Default token symbol.
pub const DEFAULT_SYMBOL: &str = "WETH";

/// Token name used by the WETH10 preset.
pub const WETH10_NAME: &str = "Wrapped Ether v10";

/// Token symbol used by the WETH10 preset.
pub const WETH10_SYMBOL: &str = "WETH10";

/// Token decimals. One token unit equals one wei of native currency.
pub const DECIMALS: u8 = 18;

/// EIP-712 domain version used for permits.
pub const PERMIT_VERSION: &str = "1";

/// Fixed flash-loan ceiling of the WETH10 preset: `2^112 - 1`.
pub const WETH10_MAX_FLASH_LOAN: U256 =
    U256::from_limbs([u64::MAX, 0x0000_FFFF_FFFF_FFFF, 0, 0]);

/// Denominator for basis-point ratios.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Liquidity share lent by the default preset (1%).
pub const DEFAULT_FLASH_LIQUIDITY_BPS: u16 = 100;

/// Half of the secp256k1 curve order. Signatures with a larger `s` are
/// malleable and rejected (EIP-2).
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
]);

/// Tracing target shared by every module of the crate.
pub(crate) const LOG_TARGET: &str = "weth";
