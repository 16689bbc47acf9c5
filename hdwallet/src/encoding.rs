//! Base58check, bech32 and checksummed-hex encodings.

use bech32::primitives::decode::{SegwitHrpstring, SegwitHrpstringError};
use bech32::{Fe32, Hrp};

use crate::error::{Error, Result};
use crate::hash::{double_sha256, keccak256};

const CHECKSUM_LEN: usize = 4;

/// Highest witness version a segwit program may carry.
const MAX_WITNESS_VERSION: u8 = 16;

/// First four bytes of `double_sha256(data)`.
fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = double_sha256(data);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Base58 of `version ‖ payload ‖ checksum`.
pub fn base58check_encode(version: &[u8], payload: &[u8]) -> String {
    let body = [version, payload].concat();
    bs58::encode([body.as_slice(), &checksum(&body)].concat()).into_string()
}

/// Decode a Base58Check string.
///
/// Returns the checked payload with its version prefix still attached, since
/// the prefix width differs between addresses (1 byte) and extended keys (4 bytes).
pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::invalid("base58 string", e))?;

    if data.len() <= CHECKSUM_LEN {
        return Err(Error::invalid(
            "base58 string",
            format!("decoded to {} bytes", data.len()),
        ));
    }

    let split = data.len() - CHECKSUM_LEN;
    if data[split..] != checksum(&data[..split]) {
        return Err(Error::ChecksumMismatch);
    }

    data.truncate(split);
    Ok(data)
}

/// Encode a witness program as a segwit address.
///
/// Bech32 for witness version 0, bech32m for version 1 and above.
pub fn bech32_encode(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    if version > MAX_WITNESS_VERSION {
        return Err(Error::invalid(
            "witness version",
            format!("{version} is above {MAX_WITNESS_VERSION}"),
        ));
    }
    let witness_version = Fe32::try_from(version).map_err(|e| Error::invalid("witness version", e))?;
    let hrp = Hrp::parse(hrp).map_err(|e| Error::invalid("bech32 hrp", e))?;

    bech32::segwit::encode(hrp, witness_version, program)
        .map_err(|e| Error::invalid("witness program", e))
}

/// Decode a segwit address into (hrp, witness version, witness program).
///
/// A failed bech32 or bech32m checksum is [`Error::ChecksumMismatch`].
pub fn bech32_decode(encoded: &str) -> Result<(String, u8, Vec<u8>)> {
    let segwit = SegwitHrpstring::new(encoded).map_err(|e| match e {
        SegwitHrpstringError::Checksum(_) => Error::ChecksumMismatch,
        e => Error::invalid("segwit address", e),
    })?;

    Ok((
        segwit.hrp().to_string(),
        segwit.witness_version().to_u8(),
        segwit.byte_iter().collect(),
    ))
}

/// Mixed-case checksum encoding of a 20-byte account address.
///
/// Each hex letter is uppercased when the matching nibble of
/// `keccak256(lowercase_hex)` is 8 or more. The result is prefixed with
/// `prefix` (`"0x"` for Ethereum, `"xdc"` for XinFin).
pub fn checksum_encode(address: &[u8; 20], prefix: &str) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(prefix.len() + lower.len());
    result.push_str(prefix);

    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };

        if c.is_ascii_alphabetic() && nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const PUBKEY_HASH: [u8; 20] = hex!("751e76e8199196d454941c45d1b3a323f1433bd6");

    mod base58check_tests {
        use super::*;

        #[test]
        fn test_encode_pubkey_hash() {
            assert_eq!(
                base58check_encode(&[0x00], &PUBKEY_HASH),
                "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
            );
        }

        #[test]
        fn test_encode_script_hash_version() {
            assert_eq!(
                base58check_encode(&[0x05], &PUBKEY_HASH),
                "3CNHUhP3uyB9EUtRLsmvFUmvGdjGdkTxJw"
            );
        }

        #[test]
        fn test_decode_keeps_version_prefix() {
            let payload = base58check_decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap();
            assert_eq!(payload[0], 0x00);
            assert_eq!(payload[1..], PUBKEY_HASH);
        }

        #[test]
        fn test_decode_rejects_bad_checksum() {
            assert_eq!(
                base58check_decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMJ"),
                Err(Error::ChecksumMismatch)
            );
        }

        #[test]
        fn test_decode_rejects_non_alphabet() {
            let err = base58check_decode("0OIl").unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }));
        }

        #[test]
        fn test_decode_rejects_short_payload() {
            let err = base58check_decode("1111").unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }));
        }
    }

    mod bech32_tests {
        use super::*;

        #[test]
        fn test_encode_mainnet_v0() {
            assert_eq!(
                bech32_encode("bc", 0, &PUBKEY_HASH).unwrap(),
                "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
            );
        }

        #[test]
        fn test_encode_testnet_v0() {
            assert_eq!(
                bech32_encode("tb", 0, &PUBKEY_HASH).unwrap(),
                "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx"
            );
        }

        #[test]
        fn test_decode_v0() {
            let (hrp, version, program) =
                bech32_decode("tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx").unwrap();
            assert_eq!(hrp, "tb");
            assert_eq!(version, 0);
            assert_eq!(program, PUBKEY_HASH);
        }

        #[test]
        fn test_decode_rejects_bad_checksum() {
            assert_eq!(
                bech32_decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5"),
                Err(Error::ChecksumMismatch)
            );
        }

        #[test]
        fn test_encode_rejects_bad_version() {
            assert!(matches!(
                bech32_encode("bc", 17, &PUBKEY_HASH),
                Err(Error::InvalidInput { what: "witness version", .. })
            ));
        }

        #[test]
        fn test_decode_bech32m_v1() {
            let program = hex!("751e76e8199196d454941c45d1b3a323f1433bd6751e76e8199196d454941c45d1b3a323f1433bd6");
            let (hrp, version, decoded) = bech32_decode(
                "bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kt5nd6y",
            )
            .unwrap();
            assert_eq!(hrp, "bc");
            assert_eq!(version, 1);
            assert_eq!(decoded, program);
        }

        #[test]
        fn test_decode_v0_with_bech32m_checksum_fails() {
            // v0 program carrying a bech32m checksum
            assert_eq!(
                bech32_decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh"),
                Err(Error::ChecksumMismatch)
            );
        }

        #[test]
        fn test_decode_rejects_malformed() {
            assert!(matches!(
                bech32_decode("not a segwit address"),
                Err(Error::InvalidInput { what: "segwit address", .. })
            ));
        }
    }

    mod checksum_tests {
        use super::*;

        #[test]
        fn test_eip55_vector() {
            let address = hex!("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
            assert_eq!(
                checksum_encode(&address, "0x"),
                "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
            );
        }

        #[test]
        fn test_custom_prefix_keeps_checksum() {
            let address = hex!("fb6916095ca1df60bb79ce92ce3ea74c37c5d359");
            assert_eq!(
                checksum_encode(&address, "xdc"),
                "xdcfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
            );
        }
    }
}
