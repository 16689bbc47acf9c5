//! 78-byte extended key serialization (xprv/xpub and SLIP-132 variants).

use core::fmt;
use core::str::FromStr;

use tracing::debug;

use crate::ckd::ExtendedKey;
use crate::cryptocurrencies::{Cryptocurrency, KeyKind};
use crate::encoding::{base58check_decode, base58check_encode};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;
use crate::path::ChildIndex;

/// Serialized length before the base58check checksum.
pub const EXTENDED_KEY_LEN: usize = 78;

/// Decoded extended key fields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtendedKeyRecord {
    /// Network and semantic version word.
    pub version: [u8; 4],
    /// Depth below the master node.
    pub depth: u8,
    /// First four bytes of the parent identifier.
    pub parent_fingerprint: [u8; 4],
    /// Raw child index, hardened offset applied.
    pub child_number: u32,
    /// Chain code.
    pub chain_code: [u8; 32],
    /// `0x00 ‖ scalar` or a compressed point.
    pub key_data: [u8; 33],
}

impl ExtendedKeyRecord {
    /// Serialize to the 78-byte layout.
    pub fn to_bytes(&self) -> [u8; EXTENDED_KEY_LEN] {
        let mut out = [0u8; EXTENDED_KEY_LEN];
        out[..4].copy_from_slice(&self.version);
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint);
        out[9..13].copy_from_slice(&self.child_number.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
        out[45..].copy_from_slice(&self.key_data);
        out
    }

    /// Parse the 78-byte layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != EXTENDED_KEY_LEN {
            return Err(Error::invalid(
                "extended key",
                format!("expected {EXTENDED_KEY_LEN} bytes, got {}", bytes.len()),
            ));
        }

        let mut record = Self {
            version: [0; 4],
            depth: bytes[4],
            parent_fingerprint: [0; 4],
            child_number: u32::from_be_bytes([bytes[9], bytes[10], bytes[11], bytes[12]]),
            chain_code: [0; 32],
            key_data: [0; 33],
        };
        record.version.copy_from_slice(&bytes[..4]);
        record.parent_fingerprint.copy_from_slice(&bytes[5..9]);
        record.chain_code.copy_from_slice(&bytes[13..45]);
        record.key_data.copy_from_slice(&bytes[45..]);
        Ok(record)
    }

    /// Base58check string.
    pub fn encode(&self) -> String {
        let bytes = self.to_bytes();
        base58check_encode(&bytes[..4], &bytes[4..])
    }

    /// Parse a base58check string.
    pub fn decode(encoded: &str) -> Result<Self> {
        Self::from_bytes(&base58check_decode(encoded.trim())?)
    }

    /// Hex of the 78 bytes, without checksum.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Key data starts with `0x00`.
    #[inline]
    pub const fn is_private(&self) -> bool {
        self.key_data[0] == 0x00
    }

    /// Depth, parent fingerprint and child number are all zero.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.depth == 0 && self.parent_fingerprint == [0; 4] && self.child_number == 0
    }

    /// Key kind implied by the key data prefix.
    #[inline]
    pub const fn kind(&self) -> KeyKind {
        if self.is_private() {
            KeyKind::Private
        } else {
            KeyKind::Public
        }
    }
}

impl fmt::Display for ExtendedKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for ExtendedKeyRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

impl fmt::Debug for ExtendedKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ExtendedKeyRecord");
        debug
            .field("version", &hex::encode(self.version))
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_number", &format_args!("{:#010x}", self.child_number));
        if self.is_private() {
            debug.field("key_data", &"[REDACTED]");
        } else {
            debug.field("key_data", &hex::encode(self.key_data));
        }
        debug.finish_non_exhaustive()
    }
}

/// Decode an extended private key.
pub fn decode_private(encoded: &str) -> Result<ExtendedKeyRecord> {
    let record = ExtendedKeyRecord::decode(encoded)?;
    if !record.is_private() {
        return Err(Error::invalid(
            "extended private key",
            "key data does not start with 0x00",
        ));
    }
    KeyMaterial::from_private_bytes(&record.key_data[1..])?;
    Ok(record)
}

/// Decode an extended public key.
pub fn decode_public(encoded: &str) -> Result<ExtendedKeyRecord> {
    let record = ExtendedKeyRecord::decode(encoded)?;
    if !matches!(record.key_data[0], 0x02 | 0x03) {
        return Err(Error::invalid(
            "extended public key",
            "key data is not a compressed point",
        ));
    }
    KeyMaterial::from_public_bytes(&record.key_data)?;
    Ok(record)
}

/// Whether `encoded` is a root key of `kind` with a version known to `cryptocurrency`.
pub fn is_root_xkey(encoded: &str, cryptocurrency: &Cryptocurrency, kind: KeyKind) -> bool {
    let record = match kind {
        KeyKind::Private => decode_private(encoded),
        KeyKind::Public => decode_public(encoded),
    };
    record.is_ok_and(|record| {
        record.is_root()
            && cryptocurrency
                .semantic_of(record.version)
                .is_some_and(|(_, found)| found == kind)
    })
}

impl ExtendedKey {
    /// Build the record for this node under `version`.
    pub fn to_record(&self, version: [u8; 4], kind: KeyKind) -> Result<ExtendedKeyRecord> {
        let mut key_data = [0u8; 33];
        match kind {
            KeyKind::Private => {
                let scalar = self
                    .material()
                    .private_bytes()
                    .ok_or(Error::PrivateKeyRequired("extended private key"))?;
                key_data[1..].copy_from_slice(&*scalar);
            }
            KeyKind::Public => key_data = self.material().compressed(),
        }

        Ok(ExtendedKeyRecord {
            version,
            depth: self.depth(),
            parent_fingerprint: self.parent_fingerprint(),
            child_number: self.child_index().to_u32(),
            chain_code: *self.chain_code(),
            key_data,
        })
    }

    /// Rebuild a node from a decoded record.
    pub fn from_record(record: &ExtendedKeyRecord) -> Result<Self> {
        let material = if record.is_private() {
            KeyMaterial::from_private_bytes(&record.key_data[1..])?
        } else {
            KeyMaterial::from_public_bytes(&record.key_data)?
        };
        debug!(
            depth = record.depth,
            index = record.child_number,
            private = record.is_private(),
            "imported extended key"
        );
        Ok(Self::new(
            material,
            record.chain_code,
            record.depth,
            record.parent_fingerprint,
            ChildIndex::from(record.child_number),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptocurrencies::get_cryptocurrency;
    use hex_literal::hex;

    const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
    const CHILD_XPUB: &str = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";

    mod record_tests {
        use super::*;

        #[test]
        fn test_decode_root_xprv_fields() {
            let record = decode_private(XPRV).unwrap();
            assert_eq!(record.version, hex!("0488ade4"));
            assert!(record.is_root());
            assert!(record.is_private());
            assert_eq!(
                record.chain_code,
                hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
            );
            assert_eq!(
                record.key_data[1..],
                hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
            );
            assert_eq!(record.encode(), XPRV);
        }

        #[test]
        fn test_decode_child_xpub_fields() {
            let record = decode_public(CHILD_XPUB).unwrap();
            assert_eq!(record.depth, 1);
            assert_eq!(record.parent_fingerprint, hex!("3442193e"));
            assert_eq!(record.child_number, 0x8000_0000);
            assert!(!record.is_root());
            assert_eq!(record.to_string(), CHILD_XPUB);
        }

        #[test]
        fn test_hex_form_is_unencoded_layout() {
            let record: ExtendedKeyRecord = XPUB.parse().unwrap();
            let hex_form = record.to_hex();
            assert_eq!(hex_form.len(), EXTENDED_KEY_LEN * 2);
            assert!(hex_form.starts_with("0488b21e00000000000000000"));
        }

        #[test]
        fn test_rejects_wrong_length() {
            assert!(ExtendedKeyRecord::from_bytes(&[0u8; 77]).is_err());
            let short = base58check_encode(&hex!("0488b21e"), &[0u8; 70]);
            assert!(matches!(
                ExtendedKeyRecord::decode(&short),
                Err(Error::InvalidInput { .. })
            ));
        }

        #[test]
        fn test_rejects_bad_checksum() {
            let mut corrupted = XPUB.to_string();
            corrupted.pop();
            corrupted.push('9');
            assert_eq!(ExtendedKeyRecord::decode(&corrupted), Err(Error::ChecksumMismatch));
        }

        #[test]
        fn test_kind_checks() {
            assert!(decode_private(XPUB).is_err());
            assert!(decode_public(XPRV).is_err());
        }

        #[test]
        fn test_debug_redacts_private_key_data() {
            let record = decode_private(XPRV).unwrap();
            let debug = format!("{record:?}");
            assert!(debug.contains("REDACTED"));
            assert!(!debug.contains("e8f32e72"));
        }
    }

    mod root_tests {
        use super::*;

        #[test]
        fn test_strict_root_check() {
            let btc = get_cryptocurrency("BTC").unwrap();
            assert!(is_root_xkey(XPRV, btc, KeyKind::Private));
            assert!(is_root_xkey(XPUB, btc, KeyKind::Public));
            assert!(!is_root_xkey(XPRV, btc, KeyKind::Public));
            assert!(!is_root_xkey(CHILD_XPUB, btc, KeyKind::Public));
        }

        #[test]
        fn test_root_check_requires_known_version() {
            let doge = get_cryptocurrency("DOGE").unwrap();
            assert!(!is_root_xkey(XPRV, doge, KeyKind::Private));
        }
    }

    mod node_tests {
        use super::*;

        #[test]
        fn test_node_round_trip() {
            let record = decode_private(XPRV).unwrap();
            let node = ExtendedKey::from_record(&record).unwrap();
            assert!(node.is_private());
            assert_eq!(node.to_record(record.version, KeyKind::Private).unwrap(), record);

            let public = node.to_record(hex!("0488b21e"), KeyKind::Public).unwrap();
            assert_eq!(public.encode(), XPUB);
        }

        #[test]
        fn test_public_node_cannot_produce_private_record() {
            let node = ExtendedKey::from_record(&decode_public(XPUB).unwrap()).unwrap();
            assert_eq!(
                node.to_record(hex!("0488ade4"), KeyKind::Private),
                Err(Error::PrivateKeyRequired("extended private key"))
            );
        }
    }
}
