//! secp256k1 key material held by a wallet node.

use core::fmt;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::hash::hash160;

/// Key material that drives derivation.
///
/// `Private` can derive hardened and normal children. `PublicOnly`
/// can only derive normal children.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Private scalar (the public key is computed on demand).
    Private(SecretKey),
    /// Public point without its scalar.
    PublicOnly(PublicKey),
}

impl KeyMaterial {
    /// Parse a 32-byte big-endian private scalar.
    pub fn from_private_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::invalid(
                "private key",
                format!("expected 32 bytes, got {}", bytes.len()),
            ));
        }
        SecretKey::from_slice(bytes)
            .map(Self::Private)
            .map_err(|_| Error::invalid("private key", "scalar is zero or not below the curve order"))
    }

    /// Parse a 33-byte compressed or 65-byte uncompressed SEC1 point.
    pub fn from_public_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(Error::invalid(
                "public key",
                format!("expected 33 or 65 bytes, got {}", bytes.len()),
            ));
        }
        PublicKey::from_sec1_bytes(bytes)
            .map(Self::PublicOnly)
            .map_err(|_| Error::invalid("public key", "not a point on secp256k1"))
    }

    /// Whether a private scalar is held.
    #[inline]
    pub const fn is_private(&self) -> bool {
        matches!(self, Self::Private(_))
    }

    /// The private scalar, if held.
    #[inline]
    pub const fn secret_key(&self) -> Option<&SecretKey> {
        match self {
            Self::Private(secret) => Some(secret),
            Self::PublicOnly(_) => None,
        }
    }

    /// Raw private scalar bytes, if held.
    pub fn private_bytes(&self) -> Option<Zeroizing<[u8; 32]>> {
        self.secret_key()
            .map(|secret| Zeroizing::new(secret.to_bytes().into()))
    }

    /// The public point.
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Private(secret) => secret.public_key(),
            Self::PublicOnly(public) => *public,
        }
    }

    /// 33-byte compressed SEC1 encoding of the public point.
    pub fn compressed(&self) -> [u8; 33] {
        compressed(&self.public_key())
    }

    /// 65-byte uncompressed SEC1 encoding of the public point.
    pub fn uncompressed(&self) -> [u8; 65] {
        let point = self.public_key().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Hash160 of the compressed public key.
    pub fn hash(&self) -> [u8; 20] {
        hash160(&self.compressed())
    }

    /// Drop the private scalar, keeping the public point.
    #[must_use]
    pub fn neuter(&self) -> Self {
        Self::PublicOnly(self.public_key())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private(_) => f
                .debug_tuple("Private")
                .field(&format_args!("[REDACTED]"))
                .finish(),
            Self::PublicOnly(_) => f
                .debug_tuple("PublicOnly")
                .field(&format_args!("{}", hex::encode(self.compressed())))
                .finish(),
        }
    }
}

/// 33-byte compressed SEC1 encoding of `public`.
pub(crate) fn compressed(public: &PublicKey) -> [u8; 33] {
    let point = public.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(point.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SECRET: [u8; 32] = hex!("0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d");

    #[test]
    fn test_scalar_one_is_generator() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let key = KeyMaterial::from_private_bytes(&one).unwrap();
        assert_eq!(
            key.compressed(),
            hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
        );
        assert_eq!(key.hash(), hex!("751e76e8199196d454941c45d1b3a323f1433bd6"));
    }

    #[test]
    fn test_rejects_bad_private_scalars() {
        assert!(KeyMaterial::from_private_bytes(&[0u8; 32]).is_err());
        assert!(KeyMaterial::from_private_bytes(&[0xff; 32]).is_err());
        assert!(KeyMaterial::from_private_bytes(&SECRET[..31]).is_err());
    }

    #[test]
    fn test_public_bytes_accept_both_encodings() {
        let key = KeyMaterial::from_private_bytes(&SECRET).unwrap();
        let from_compressed = KeyMaterial::from_public_bytes(&key.compressed()).unwrap();
        let from_uncompressed = KeyMaterial::from_public_bytes(&key.uncompressed()).unwrap();
        assert_eq!(from_compressed, from_uncompressed);
        assert_eq!(from_compressed, key.neuter());
        assert!(!from_compressed.is_private());
    }

    #[test]
    fn test_public_bytes_reject_bad_encoding() {
        let mut bad = hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        bad[0] = 0x05;
        assert!(KeyMaterial::from_public_bytes(&bad).is_err());
        assert!(KeyMaterial::from_public_bytes(&bad[..32]).is_err());
    }

    #[test]
    fn test_debug_redacts_scalar() {
        let key = KeyMaterial::from_private_bytes(&SECRET).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&hex::encode(SECRET)));
    }
}
