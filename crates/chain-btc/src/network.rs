use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BtcError;

/// Supported Bitcoin networks and their encoding parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
    Regtest,
}

impl BtcNetwork {
    pub const ALL: [BtcNetwork; 3] = [BtcNetwork::Mainnet, BtcNetwork::Testnet, BtcNetwork::Regtest];

    /// Version byte for pay-to-public-key-hash addresses.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x00,
            BtcNetwork::Testnet | BtcNetwork::Regtest => 0x6f,
        }
    }

    /// Version byte for pay-to-script-hash addresses.
    pub fn p2sh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x05,
            BtcNetwork::Testnet | BtcNetwork::Regtest => 0xc4,
        }
    }

    /// Version byte for Wallet Import Format private keys.
    pub fn wif_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x80,
            BtcNetwork::Testnet | BtcNetwork::Regtest => 0xef,
        }
    }

    /// Human-readable part of bech32 segwit addresses.
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            BtcNetwork::Mainnet => "bc",
            BtcNetwork::Testnet => "tb",
            BtcNetwork::Regtest => "bcrt",
        }
    }

    /// Resolve the network from a WIF version byte.
    ///
    /// Testnet and regtest share a version byte; testnet is returned.
    pub fn from_wif_version(version: u8) -> Option<Self> {
        match version {
            0x80 => Some(BtcNetwork::Mainnet),
            0xef => Some(BtcNetwork::Testnet),
            _ => None,
        }
    }
}

impl fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
            BtcNetwork::Regtest => write!(f, "regtest"),
        }
    }
}

impl FromStr for BtcNetwork {
    type Err = BtcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(BtcNetwork::Mainnet),
            "testnet" | "test" => Ok(BtcNetwork::Testnet),
            "regtest" => Ok(BtcNetwork::Regtest),
            other => Err(BtcError::InvalidEncoding(format!("unknown network: {other}"))),
        }
    }
}
