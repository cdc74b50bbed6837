//! Solidity-facing surface of the ledger.
//!
//! The interface mirrors WETH10: ERC-20, the payable conversion gateway,
//! ERC-2612 permits and ERC-3156 flash loans. Empty calldata is a bare native
//! transfer and is handled as `deposit()` by [`crate::Weth::call`].

use alloy_sol_types::sol;

sol! {
    /// Wrapped native token interface.
    interface IWETH {
        /// ERC-20 transfer, including zero-value transfers.
        event Transfer(address indexed from, address indexed to, uint256 value);

        /// ERC-20 allowance update.
        event Approval(address indexed owner, address indexed spender, uint256 value);

        /// Mint event of the WETH9 event convention.
        event Deposit(address indexed dst, uint256 wad);

        /// Burn event of the WETH9 event convention.
        event Withdrawal(address indexed src, uint256 wad);

        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        function transfer(address to, uint256 value) external returns (bool);
        function approve(address spender, uint256 value) external returns (bool);
        function transferFrom(address from, address to, uint256 value) external returns (bool);

        /// Wrap the attached native value for the caller.
        function deposit() external payable;
        /// Wrap the attached native value for `to`.
        function depositTo(address to) external payable;
        /// Unwrap `value` tokens back to the caller.
        function withdraw(uint256 value) external;
        /// Unwrap `value` tokens of the caller, paying `to`.
        function withdrawTo(address to, uint256 value) external;
        /// Unwrap `value` tokens of `from` against the caller's allowance, paying `to`.
        function withdrawFrom(address from, address to, uint256 value) external;

        /// ERC-2612 approval by signature.
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
        function nonces(address owner) external view returns (uint256);
        function DOMAIN_SEPARATOR() external view returns (bytes32);

        /// ERC-3156 lender views and entry point.
        function maxFlashLoan(address token) external view returns (uint256);
        function flashFee(address token, uint256 amount) external view returns (uint256);
        function flashLoan(address receiver, address token, uint256 amount, bytes data) external returns (bool);
    }

    /// EIP-712 message signed by a token owner to grant an allowance.
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }
}
