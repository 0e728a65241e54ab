use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported network. Variant order is the chain priority order used to break
/// ties when merging records from several chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Ethereum,
    Base,
    Arbitrum,
}

/// ERC-20 contract the balance adapter queries on a given chain.
#[derive(Debug, Clone, Copy)]
pub struct TokenContract {
    pub symbol: &'static str,
    pub address: &'static str,
    pub decimals: u8,
}

impl ChainId {
    pub const ALL: [ChainId; 3] = [ChainId::Ethereum, ChainId::Base, ChainId::Arbitrum];

    /// EVM chain id. Stable, never reused for another network.
    pub fn numeric_id(self) -> u64 {
        match self {
            ChainId::Ethereum => 1,
            ChainId::Base => 8453,
            ChainId::Arbitrum => 42161,
        }
    }

    pub fn from_numeric(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.numeric_id() == id)
    }

    /// Lowercase slug, also the serde representation.
    pub fn slug(self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Base => "base",
            ChainId::Arbitrum => "arbitrum",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChainId::Ethereum => "Ethereum",
            ChainId::Base => "Base",
            ChainId::Arbitrum => "Arbitrum",
        }
    }

    /// Parse the chain names used by yield catalogs ("Ethereum", "Arbitrum", ...).
    pub fn from_catalog_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ethereum" | "mainnet" => Some(ChainId::Ethereum),
            "base" => Some(ChainId::Base),
            "arbitrum" | "arbitrum one" => Some(ChainId::Arbitrum),
            _ => None,
        }
    }

    pub fn native_symbol(self) -> &'static str {
        "ETH"
    }

    pub fn explorer_url(self) -> &'static str {
        match self {
            ChainId::Ethereum => "https://etherscan.io",
            ChainId::Base => "https://basescan.org",
            ChainId::Arbitrum => "https://arbiscan.io",
        }
    }

    /// Stablecoin contracts tracked on this chain.
    pub fn token_contracts(self) -> &'static [TokenContract] {
        match self {
            ChainId::Ethereum => &[
                TokenContract {
                    symbol: "USDC",
                    address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
                    decimals: 6,
                },
                TokenContract {
                    symbol: "USDT",
                    address: "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                    decimals: 6,
                },
                TokenContract {
                    symbol: "DAI",
                    address: "0x6B175474E89094C44Da98b954EedeAC495271d0F",
                    decimals: 18,
                },
            ],
            ChainId::Base => &[
                TokenContract {
                    symbol: "USDC",
                    address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
                    decimals: 6,
                },
                TokenContract {
                    symbol: "DAI",
                    address: "0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb",
                    decimals: 18,
                },
            ],
            ChainId::Arbitrum => &[
                TokenContract {
                    symbol: "USDC",
                    address: "0xaf88d065e77c8cC2239327C5EDb3A432268e5831",
                    decimals: 6,
                },
                TokenContract {
                    symbol: "USDT",
                    address: "0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9",
                    decimals: 6,
                },
                TokenContract {
                    symbol: "DAI",
                    address: "0xDA10009cBd5D07dd0CeCc66161FC93D7c9000da1",
                    decimals: 18,
                },
            ],
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
