//! Static per-cryptocurrency network parameters.
//!
//! Every entry is a compile-time constant. The version-to-semantic reverse
//! index is built once on first use and shared read-only afterwards.

use core::fmt;
use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::path::{ChildIndex, DerivationPath};
use crate::semantic::Semantic;

/// Main or test network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Test network.
    Testnet,
}

impl Network {
    /// Get network name as string.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an extended key carries private or public key data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// `0x00 ‖ scalar` key data.
    Private,
    /// Compressed point key data.
    Public,
}

/// How a network renders its public-key address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressStyle {
    /// Bitcoin-style base58check hashes with one-byte version prefixes.
    Base58 {
        /// P2PKH version byte.
        pubkey_hash: u8,
        /// P2SH version byte.
        script_hash: u8,
    },
    /// Keccak account address with a mixed-case checksum.
    Checksummed {
        /// Literal prepended to the hex digits.
        prefix: &'static str,
    },
}

/// Extended-key version words per semantic. `None` means not defined for the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedVersions {
    /// P2PKH version.
    pub p2pkh: Option<[u8; 4]>,
    /// P2SH version.
    pub p2sh: Option<[u8; 4]>,
    /// P2WPKH version.
    pub p2wpkh: Option<[u8; 4]>,
    /// P2WPKH-in-P2SH version.
    pub p2wpkh_in_p2sh: Option<[u8; 4]>,
    /// P2WSH version.
    pub p2wsh: Option<[u8; 4]>,
    /// P2WSH-in-P2SH version.
    pub p2wsh_in_p2sh: Option<[u8; 4]>,
}

impl ExtendedVersions {
    /// Same version for P2PKH and P2SH, no segwit versions.
    const fn legacy(version: [u8; 4]) -> Self {
        Self {
            p2pkh: Some(version),
            p2sh: Some(version),
            p2wpkh: None,
            p2wpkh_in_p2sh: None,
            p2wsh: None,
            p2wsh_in_p2sh: None,
        }
    }

    /// Version for P2PKH only.
    const fn account(version: [u8; 4]) -> Self {
        Self {
            p2sh: None,
            ..Self::legacy(version)
        }
    }

    /// Version word for `semantic`, if the network defines one.
    #[inline]
    #[must_use]
    pub const fn get(&self, semantic: Semantic) -> Option<[u8; 4]> {
        match semantic {
            Semantic::P2pkh => self.p2pkh,
            Semantic::P2sh => self.p2sh,
            Semantic::P2wpkh => self.p2wpkh,
            Semantic::P2wpkhInP2sh => self.p2wpkh_in_p2sh,
            Semantic::P2wsh => self.p2wsh,
            Semantic::P2wshInP2sh => self.p2wsh_in_p2sh,
        }
    }
}

/// Network parameters for one cryptocurrency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cryptocurrency {
    /// Human readable name.
    pub name: &'static str,
    /// Ticker symbol, uppercase.
    pub symbol: &'static str,
    /// Main or test network.
    pub network: Network,
    /// Address rendering rules.
    pub address_style: AddressStyle,
    /// Segwit human-readable prefix, if the network supports segwit.
    pub segwit_hrp: Option<&'static str>,
    /// WIF version byte.
    pub wif_secret_key: u8,
    /// Extended private key versions.
    pub extended_private_key: ExtendedVersions,
    /// Extended public key versions.
    pub extended_public_key: ExtendedVersions,
    /// BIP-44 coin type.
    pub coin_type: ChildIndex,
    /// Default derivation path.
    pub default_path: &'static str,
}

impl Cryptocurrency {
    /// Version word for a semantic and key kind.
    pub const fn version(&self, semantic: Semantic, kind: KeyKind) -> Option<[u8; 4]> {
        match kind {
            KeyKind::Private => self.extended_private_key.get(semantic),
            KeyKind::Public => self.extended_public_key.get(semantic),
        }
    }

    /// Like [`version`](Self::version), but a missing entry is an [`Error::UnsupportedSemantic`].
    pub fn require_version(&self, semantic: Semantic, kind: KeyKind) -> Result<[u8; 4]> {
        self.version(semantic, kind)
            .ok_or(Error::UnsupportedSemantic {
                semantic,
                symbol: self.symbol,
            })
    }

    /// Recover the semantic and key kind from extended-key version bytes.
    ///
    /// When several semantics share a version word the first in
    /// [`Semantic::ALL`] order wins, so `xprv` maps to p2pkh.
    pub fn semantic_of(&self, version: [u8; 4]) -> Option<(Semantic, KeyKind)> {
        SEMANTIC_INDEX
            .get(self.symbol)
            .and_then(|index| index.get(&version))
            .copied()
    }

    /// Parsed default derivation path.
    pub fn default_derivation_path(&self) -> Result<DerivationPath> {
        self.default_path.parse()
    }

    /// Whether the network renders keccak account addresses.
    #[inline]
    pub const fn is_account_model(&self) -> bool {
        matches!(self.address_style, AddressStyle::Checksummed { .. })
    }
}

type SemanticIndex = HashMap<[u8; 4], (Semantic, KeyKind)>;

static SEMANTIC_INDEX: LazyLock<HashMap<&'static str, SemanticIndex>> = LazyLock::new(|| {
    CRYPTOCURRENCIES
        .iter()
        .map(|crypto| {
            let mut index = SemanticIndex::new();
            for kind in [KeyKind::Private, KeyKind::Public] {
                for semantic in Semantic::ALL {
                    if let Some(version) = crypto.version(semantic, kind) {
                        index.entry(version).or_insert((semantic, kind));
                    }
                }
            }
            (crypto.symbol, index)
        })
        .collect()
});

/// Look up a cryptocurrency by symbol, ignoring case.
pub fn get_cryptocurrency(symbol: &str) -> Result<&'static Cryptocurrency> {
    CRYPTOCURRENCIES
        .iter()
        .find(|crypto| crypto.symbol.eq_ignore_ascii_case(symbol.trim()))
        .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
}

/// Every known cryptocurrency.
pub fn all() -> &'static [Cryptocurrency] {
    CRYPTOCURRENCIES
}

const BTC_PRIVATE: ExtendedVersions = ExtendedVersions {
    p2wpkh: Some([0x04, 0xb2, 0x43, 0x0c]),
    p2wpkh_in_p2sh: Some([0x04, 0x9d, 0x78, 0x78]),
    p2wsh: Some([0x02, 0xaa, 0x7a, 0x99]),
    p2wsh_in_p2sh: Some([0x02, 0x95, 0xb0, 0x05]),
    ..ExtendedVersions::legacy([0x04, 0x88, 0xad, 0xe4])
};

const BTC_PUBLIC: ExtendedVersions = ExtendedVersions {
    p2wpkh: Some([0x04, 0xb2, 0x47, 0x46]),
    p2wpkh_in_p2sh: Some([0x04, 0x9d, 0x7c, 0xb2]),
    p2wsh: Some([0x02, 0xaa, 0x7e, 0xd3]),
    p2wsh_in_p2sh: Some([0x02, 0x95, 0xb4, 0x3f]),
    ..ExtendedVersions::legacy([0x04, 0x88, 0xb2, 0x1e])
};

const TESTNET_PRIVATE: ExtendedVersions = ExtendedVersions {
    p2wpkh: Some([0x04, 0x5f, 0x18, 0xbc]),
    p2wpkh_in_p2sh: Some([0x04, 0x4a, 0x4e, 0x28]),
    p2wsh: Some([0x02, 0x57, 0x50, 0x48]),
    p2wsh_in_p2sh: Some([0x02, 0x42, 0x85, 0xb5]),
    ..ExtendedVersions::legacy([0x04, 0x35, 0x83, 0x94])
};

const TESTNET_PUBLIC: ExtendedVersions = ExtendedVersions {
    p2wpkh: Some([0x04, 0x5f, 0x1c, 0xf6]),
    p2wpkh_in_p2sh: Some([0x04, 0x4a, 0x52, 0x62]),
    p2wsh: Some([0x02, 0x57, 0x54, 0x83]),
    p2wsh_in_p2sh: Some([0x02, 0x42, 0x89, 0xef]),
    ..ExtendedVersions::legacy([0x04, 0x35, 0x87, 0xcf])
};

const XPRV: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
const XPUB: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
const TPRV: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const TPUB: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];

static CRYPTOCURRENCIES: &[Cryptocurrency] = &[
    Cryptocurrency {
        name: "Bitcoin",
        symbol: "BTC",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x00,
            script_hash: 0x05,
        },
        segwit_hrp: Some("bc"),
        wif_secret_key: 0x80,
        extended_private_key: BTC_PRIVATE,
        extended_public_key: BTC_PUBLIC,
        coin_type: ChildIndex::Hardened(0),
        default_path: "m/44'/0'/0'/0/0",
    },
    Cryptocurrency {
        name: "Bitcoin",
        symbol: "BTCTEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x6f,
            script_hash: 0xc4,
        },
        segwit_hrp: Some("tb"),
        wif_secret_key: 0xef,
        extended_private_key: TESTNET_PRIVATE,
        extended_public_key: TESTNET_PUBLIC,
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Bitcoin Cash",
        symbol: "BCH",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x00,
            script_hash: 0x05,
        },
        segwit_hrp: None,
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions::legacy(XPRV),
        extended_public_key: ExtendedVersions::legacy(XPUB),
        coin_type: ChildIndex::Hardened(145),
        default_path: "m/44'/145'/0'/0/0",
    },
    Cryptocurrency {
        name: "Litecoin",
        symbol: "LTC",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x30,
            script_hash: 0x05,
        },
        segwit_hrp: Some("ltc"),
        wif_secret_key: 0xb0,
        extended_private_key: ExtendedVersions {
            p2wpkh: Some([0x04, 0xb2, 0x43, 0x0c]),
            p2wpkh_in_p2sh: Some([0x01, 0xb2, 0x67, 0x92]),
            ..ExtendedVersions::legacy([0x01, 0x9d, 0x9c, 0xfe])
        },
        extended_public_key: ExtendedVersions {
            p2wpkh: Some([0x04, 0xb2, 0x47, 0x46]),
            p2wpkh_in_p2sh: Some([0x01, 0xb2, 0x6e, 0xf6]),
            ..ExtendedVersions::legacy([0x01, 0x9d, 0xa4, 0x62])
        },
        coin_type: ChildIndex::Hardened(2),
        default_path: "m/44'/2'/0'/0/0",
    },
    Cryptocurrency {
        name: "Litecoin",
        symbol: "LTCTEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x6f,
            script_hash: 0xc4,
        },
        segwit_hrp: Some("tltc"),
        wif_secret_key: 0xef,
        extended_private_key: ExtendedVersions {
            p2wpkh: Some([0x04, 0x5f, 0x18, 0xbc]),
            p2wpkh_in_p2sh: Some([0x04, 0x4a, 0x4e, 0x28]),
            ..ExtendedVersions::legacy([0x04, 0x36, 0xef, 0x7d])
        },
        extended_public_key: ExtendedVersions {
            p2wpkh: Some([0x04, 0x5f, 0x1c, 0xf6]),
            p2wpkh_in_p2sh: Some([0x04, 0x4a, 0x52, 0x62]),
            ..ExtendedVersions::legacy([0x04, 0x36, 0xf6, 0xe1])
        },
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Dogecoin",
        symbol: "DOGE",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x1e,
            script_hash: 0x16,
        },
        segwit_hrp: None,
        wif_secret_key: 0x9e,
        extended_private_key: ExtendedVersions::legacy([0x02, 0xfa, 0xc3, 0x98]),
        extended_public_key: ExtendedVersions::legacy([0x02, 0xfa, 0xca, 0xfd]),
        coin_type: ChildIndex::Hardened(3),
        default_path: "m/44'/3'/0'/0/0",
    },
    Cryptocurrency {
        name: "Dogecoin",
        symbol: "DOGETEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x71,
            script_hash: 0xc4,
        },
        segwit_hrp: None,
        wif_secret_key: 0xf1,
        extended_private_key: ExtendedVersions::legacy(TPRV),
        extended_public_key: ExtendedVersions::legacy(TPUB),
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Dash",
        symbol: "DASH",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x4c,
            script_hash: 0x10,
        },
        segwit_hrp: None,
        wif_secret_key: 0xcc,
        extended_private_key: ExtendedVersions::legacy(XPRV),
        extended_public_key: ExtendedVersions::legacy(XPUB),
        coin_type: ChildIndex::Hardened(5),
        default_path: "m/44'/5'/0'/0/0",
    },
    Cryptocurrency {
        name: "Dash",
        symbol: "DASHTEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x8c,
            script_hash: 0x13,
        },
        segwit_hrp: None,
        wif_secret_key: 0xef,
        extended_private_key: ExtendedVersions::legacy(TPRV),
        extended_public_key: ExtendedVersions::legacy(TPUB),
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Qtum",
        symbol: "QTUM",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x3a,
            script_hash: 0x32,
        },
        segwit_hrp: Some("qc"),
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions {
            p2wpkh: BTC_PRIVATE.p2wpkh,
            p2wpkh_in_p2sh: BTC_PRIVATE.p2wpkh_in_p2sh,
            ..ExtendedVersions::legacy(XPRV)
        },
        extended_public_key: ExtendedVersions {
            p2wpkh: BTC_PUBLIC.p2wpkh,
            p2wpkh_in_p2sh: BTC_PUBLIC.p2wpkh_in_p2sh,
            ..ExtendedVersions::legacy(XPUB)
        },
        coin_type: ChildIndex::Hardened(88),
        default_path: "m/44'/88'/0'/0/0",
    },
    Cryptocurrency {
        name: "Qtum",
        symbol: "QTUMTEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x78,
            script_hash: 0x6e,
        },
        segwit_hrp: Some("tq"),
        wif_secret_key: 0xef,
        extended_private_key: ExtendedVersions {
            p2wpkh: TESTNET_PRIVATE.p2wpkh,
            p2wpkh_in_p2sh: TESTNET_PRIVATE.p2wpkh_in_p2sh,
            ..ExtendedVersions::legacy(TPRV)
        },
        extended_public_key: ExtendedVersions {
            p2wpkh: TESTNET_PUBLIC.p2wpkh,
            p2wpkh_in_p2sh: TESTNET_PUBLIC.p2wpkh_in_p2sh,
            ..ExtendedVersions::legacy(TPUB)
        },
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Omni",
        symbol: "OMNI",
        network: Network::Mainnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x00,
            script_hash: 0x05,
        },
        segwit_hrp: None,
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions::legacy(XPRV),
        extended_public_key: ExtendedVersions::legacy(XPUB),
        coin_type: ChildIndex::Hardened(200),
        default_path: "m/44'/200'/0'/0/0",
    },
    Cryptocurrency {
        name: "Omni",
        symbol: "OMNITEST",
        network: Network::Testnet,
        address_style: AddressStyle::Base58 {
            pubkey_hash: 0x6f,
            script_hash: 0xc4,
        },
        segwit_hrp: None,
        wif_secret_key: 0xef,
        extended_private_key: ExtendedVersions::legacy(TPRV),
        extended_public_key: ExtendedVersions::legacy(TPUB),
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "Ethereum",
        symbol: "ETH",
        network: Network::Mainnet,
        address_style: AddressStyle::Checksummed { prefix: "0x" },
        segwit_hrp: None,
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions::account(XPRV),
        extended_public_key: ExtendedVersions::account(XPUB),
        coin_type: ChildIndex::Hardened(60),
        default_path: "m/44'/60'/0'/0/0",
    },
    Cryptocurrency {
        name: "Ethereum",
        symbol: "ETHTEST",
        network: Network::Testnet,
        address_style: AddressStyle::Checksummed { prefix: "0x" },
        segwit_hrp: None,
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions::account(XPRV),
        extended_public_key: ExtendedVersions::account(XPUB),
        coin_type: ChildIndex::Hardened(1),
        default_path: "m/44'/1'/0'/0/0",
    },
    Cryptocurrency {
        name: "XinFin",
        symbol: "XDC",
        network: Network::Mainnet,
        address_style: AddressStyle::Checksummed { prefix: "xdc" },
        segwit_hrp: None,
        wif_secret_key: 0x80,
        extended_private_key: ExtendedVersions::account(XPRV),
        extended_public_key: ExtendedVersions::account(XPUB),
        coin_type: ChildIndex::Hardened(550),
        default_path: "m/44'/550'/0'/0/0",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let btc = get_cryptocurrency("btc").unwrap();
        assert_eq!(btc.symbol, "BTC");
        assert_eq!(btc.network, Network::Mainnet);
        assert_eq!(get_cryptocurrency(" ltcTest ").unwrap().symbol, "LTCTEST");
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            get_cryptocurrency("NOPE"),
            Err(Error::UnknownSymbol("NOPE".to_string()))
        );
    }

    #[test]
    fn test_symbols_are_unique() {
        let mut symbols: Vec<_> = all().iter().map(|c| c.symbol).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), all().len());
    }

    #[test]
    fn test_default_paths_parse_and_match_coin_type() {
        for crypto in all() {
            let path = crypto.default_derivation_path().unwrap();
            assert_eq!(path.indices()[1], crypto.coin_type, "{}", crypto.symbol);
        }
    }

    #[test]
    fn test_reverse_lookup_prefers_first_semantic() {
        let btc = get_cryptocurrency("BTC").unwrap();
        assert_eq!(
            btc.semantic_of([0x04, 0x88, 0xad, 0xe4]),
            Some((Semantic::P2pkh, KeyKind::Private))
        );
        assert_eq!(
            btc.semantic_of([0x04, 0xb2, 0x47, 0x46]),
            Some((Semantic::P2wpkh, KeyKind::Public))
        );
        assert_eq!(
            btc.semantic_of([0x02, 0x95, 0xb0, 0x05]),
            Some((Semantic::P2wshInP2sh, KeyKind::Private))
        );
        assert_eq!(btc.semantic_of([0xde, 0xad, 0xbe, 0xef]), None);
    }

    #[test]
    fn test_reverse_lookup_is_per_network() {
        let doge = get_cryptocurrency("DOGE").unwrap();
        assert_eq!(doge.semantic_of([0x04, 0x88, 0xad, 0xe4]), None);
        assert_eq!(
            doge.semantic_of([0x02, 0xfa, 0xc3, 0x98]),
            Some((Semantic::P2pkh, KeyKind::Private))
        );
    }

    #[test]
    fn test_missing_version_is_unsupported_semantic() {
        let doge = get_cryptocurrency("DOGE").unwrap();
        assert_eq!(
            doge.require_version(Semantic::P2wsh, KeyKind::Public),
            Err(Error::UnsupportedSemantic {
                semantic: Semantic::P2wsh,
                symbol: "DOGE"
            })
        );
        assert!(doge.require_version(Semantic::P2sh, KeyKind::Public).is_ok());
    }

    #[test]
    fn test_account_model_networks() {
        let eth = get_cryptocurrency("ETH").unwrap();
        assert!(eth.is_account_model());
        assert_eq!(eth.version(Semantic::P2sh, KeyKind::Private), None);
        assert!(!get_cryptocurrency("BCH").unwrap().is_account_model());
    }
}
