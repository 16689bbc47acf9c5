//! Address rendering from a public key and network parameters.
//!
//! All functions are pure. A `None` result means the network has no
//! version byte or HRP for that script type.

use core::fmt;

use k256::PublicKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::Serialize;

use crate::cryptocurrencies::{AddressStyle, Cryptocurrency};
use crate::encoding::{base58check_encode, bech32_encode, checksum_encode};
use crate::hash::{hash160, keccak256, sha256};
use crate::keys::compressed;
use crate::semantic::Semantic;

/// `OP_DUP OP_HASH160 <20> ... OP_EQUALVERIFY OP_CHECKSIG`
fn p2pkh_script(pubkey_hash: &[u8; 20]) -> [u8; 25] {
    let mut script = [0u8; 25];
    script[..3].copy_from_slice(&[0x76, 0xa9, 0x14]);
    script[3..23].copy_from_slice(pubkey_hash);
    script[23..].copy_from_slice(&[0x88, 0xac]);
    script
}

/// `OP_1 <33> ... OP_1 OP_CHECKMULTISIG`
fn witness_script(public: &PublicKey) -> [u8; 37] {
    let mut script = [0u8; 37];
    script[..2].copy_from_slice(&[0x51, 0x21]);
    script[2..35].copy_from_slice(&compressed(public));
    script[35..].copy_from_slice(&[0x51, 0xae]);
    script
}

/// `<version> <len> <program>` witness output script.
fn witness_program(program: &[u8]) -> Vec<u8> {
    let mut script = Vec::with_capacity(program.len() + 2);
    script.push(0x00);
    // Programs are 20 or 32 bytes, both fit a direct push.
    script.push(program.len() as u8);
    script.extend_from_slice(program);
    script
}

const fn script_hash_byte(cryptocurrency: &Cryptocurrency) -> Option<u8> {
    match cryptocurrency.address_style {
        AddressStyle::Base58 { script_hash, .. } => Some(script_hash),
        AddressStyle::Checksummed { .. } => None,
    }
}

fn p2sh_of(script: &[u8], cryptocurrency: &Cryptocurrency) -> Option<String> {
    script_hash_byte(cryptocurrency).map(|version| base58check_encode(&[version], &hash160(script)))
}

fn segwit_of(program: &[u8], cryptocurrency: &Cryptocurrency) -> Option<String> {
    // Table HRPs are valid, so encoding cannot fail for them.
    cryptocurrency
        .segwit_hrp
        .and_then(|hrp| bech32_encode(hrp, 0, program).ok())
}

/// Keccak account address: the last 20 bytes of `keccak256(X ‖ Y)`.
pub fn account_hash(public: &PublicKey) -> [u8; 20] {
    let point = public.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&hash[12..]);
    out
}

/// Pay-to-public-key-hash address.
///
/// Account-model networks get their checksummed keccak address instead.
pub fn p2pkh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> String {
    match cryptocurrency.address_style {
        AddressStyle::Base58 { pubkey_hash, .. } => {
            base58check_encode(&[pubkey_hash], &hash160(&compressed(public)))
        }
        AddressStyle::Checksummed { prefix } => checksum_encode(&account_hash(public), prefix),
    }
}

/// P2SH wrapping the P2PKH script of `public`.
pub fn p2sh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> Option<String> {
    let script = p2pkh_script(&hash160(&compressed(public)));
    p2sh_of(&script, cryptocurrency)
}

/// Native segwit v0 key-hash address.
pub fn p2wpkh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> Option<String> {
    segwit_of(&hash160(&compressed(public)), cryptocurrency)
}

/// Segwit v0 key-hash program nested in P2SH.
pub fn p2wpkh_in_p2sh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> Option<String> {
    let script = witness_program(&hash160(&compressed(public)));
    p2sh_of(&script, cryptocurrency)
}

/// Native segwit v0 script-hash address over the 1-of-1 witness script.
pub fn p2wsh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> Option<String> {
    segwit_of(&sha256(&witness_script(public)), cryptocurrency)
}

/// Segwit v0 script-hash program nested in P2SH.
pub fn p2wsh_in_p2sh(public: &PublicKey, cryptocurrency: &Cryptocurrency) -> Option<String> {
    let script = witness_program(&sha256(&witness_script(public)));
    p2sh_of(&script, cryptocurrency)
}

/// A rendered address and the semantic that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    /// Script type.
    pub semantic: Semantic,
    /// Encoded address.
    pub value: String,
}

impl Address {
    /// Render the address for `semantic`, if the network supports it.
    pub fn render(
        semantic: Semantic,
        public: &PublicKey,
        cryptocurrency: &Cryptocurrency,
    ) -> Option<Self> {
        let value = match semantic {
            Semantic::P2pkh => Some(p2pkh(public, cryptocurrency)),
            Semantic::P2sh => p2sh(public, cryptocurrency),
            Semantic::P2wpkh => p2wpkh(public, cryptocurrency),
            Semantic::P2wpkhInP2sh => p2wpkh_in_p2sh(public, cryptocurrency),
            Semantic::P2wsh => p2wsh(public, cryptocurrency),
            Semantic::P2wshInP2sh => p2wsh_in_p2sh(public, cryptocurrency),
        }?;
        Some(Self { semantic, value })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
