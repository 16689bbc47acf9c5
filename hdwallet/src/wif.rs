//! Wallet Import Format for private keys.

use k256::SecretKey;
use zeroize::Zeroizing;

use crate::encoding::{base58check_decode, base58check_encode};
use crate::error::{Error, Result};

/// Trailing flag marking a compressed public key.
pub const COMPRESSED_FLAG: u8 = 0x01;

/// Encode `secret` with the compressed-key flag.
pub fn encode(secret: &SecretKey, wif_byte: u8) -> String {
    let mut payload: Zeroizing<[u8; 33]> = Zeroizing::new([0u8; 33]);
    payload[..32].copy_from_slice(&secret.to_bytes());
    payload[32] = COMPRESSED_FLAG;
    base58check_encode(&[wif_byte], &*payload)
}

/// Decode a WIF string produced for `wif_byte`.
///
/// Both compressed (34-byte) and uncompressed (33-byte) payloads are accepted.
pub fn decode(encoded: &str, wif_byte: u8) -> Result<SecretKey> {
    let payload = Zeroizing::new(base58check_decode(encoded.trim())?);

    if payload[0] != wif_byte {
        return Err(Error::invalid(
            "wif",
            format!("prefix {:#04x} does not match {wif_byte:#04x}", payload[0]),
        ));
    }

    let scalar = match payload.len() {
        33 => &payload[1..],
        34 if payload[33] == COMPRESSED_FLAG => &payload[1..33],
        34 => return Err(Error::invalid("wif", "bad compression flag")),
        len => return Err(Error::invalid("wif", format!("unexpected payload length {len}"))),
    };

    SecretKey::from_slice(scalar)
        .map_err(|_| Error::invalid("wif", "scalar is zero or not below the curve order"))
}
