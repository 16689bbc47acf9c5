//! Digest functions used by key derivation, fingerprints and address rendering.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// Compute SHA-256 hash
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Compute double SHA-256 hash (base58check checksums)
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash
#[inline]
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// Compute Hash160, RIPEMD-160 over SHA-256.
///
/// Used for public key hashes, script hashes and key fingerprints.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute Keccak-256 hash (pre-standard SHA-3 padding, as used by Ethereum)
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Compute HMAC-SHA512 over the concatenation of `parts`.
pub fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64]> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| Error::invalid("hmac key", e))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    mod sha256_tests {
        use super::*;

        #[test]
        fn test_sha256_abc() {
            assert_eq!(
                sha256(b"abc"),
                hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
            );
        }

        #[test]
        fn test_double_sha256_abc() {
            assert_eq!(
                double_sha256(b"abc"),
                hex!("4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358")
            );
        }
    }

    mod hash160_tests {
        use super::*;

        #[test]
        fn test_ripemd160_abc() {
            assert_eq!(
                ripemd160(b"abc"),
                hex!("8eb208f7e05d987a9b044a8e98c6b087f15a0bfc")
            );
        }

        #[test]
        fn test_hash160_generator_point() {
            // Compressed secp256k1 generator, i.e. the public key of scalar 1.
            let pubkey = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
            assert_eq!(
                hash160(&pubkey),
                hex!("751e76e8199196d454941c45d1b3a323f1433bd6")
            );
        }
    }

    mod keccak256_tests {
        use super::*;

        #[test]
        fn test_keccak256_empty() {
            assert_eq!(
                keccak256(b""),
                hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
            );
        }

        #[test]
        fn test_keccak256_abc() {
            assert_eq!(
                keccak256(b"abc"),
                hex!("4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45")
            );
        }
    }

    mod hmac_tests {
        use super::*;

        #[test]
        fn test_hmac_sha512_rfc4231_case2() {
            let mac = hmac_sha512(b"Jefe", &[b"what do ya ", b"want for nothing?"]).unwrap();
            assert_eq!(
                mac,
                hex!(
                    "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554"
                    "9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
                )
            );
        }

        #[test]
        fn test_hmac_sha512_bitcoin_seed() {
            let mac = hmac_sha512(b"Bitcoin seed", &[&hex!("000102030405060708090a0b0c0d0e0f")])
                .unwrap();
            assert_eq!(
                mac[..32],
                hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
            );
            assert_eq!(
                mac[32..],
                hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
            );
        }
    }
}
