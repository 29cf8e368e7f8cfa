//! Mainnet addresses of commonly used tokens.

use {
    crate::currency::{Currency, NativeCurrency, Token},
    alloy::primitives::{Address, address},
    contracts::networks::MAINNET,
};

/// Address for the `WETH` token.
pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Address for the `USDC` token.
pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

/// Address for the `USDT` token.
pub const USDT: Address = address!("dAC17F958D2ee523a2206206994597C13D831ec7");

/// Address for the `DAI` token.
pub const DAI: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

pub fn weth() -> Token {
    Token::new(MAINNET, WETH, 18, "WETH", "Wrapped Ether")
}

pub fn usdc() -> Token {
    Token::new(MAINNET, USDC, 6, "USDC", "USD//C")
}

pub fn usdt() -> Token {
    Token::new(MAINNET, USDT, 6, "USDT", "Tether USD")
}

pub fn dai() -> Token {
    Token::new(MAINNET, DAI, 18, "DAI", "Dai Stablecoin")
}

pub fn ether() -> Currency {
    NativeCurrency::ether(MAINNET).into()
}
