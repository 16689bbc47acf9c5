//! BIP-32 master key generation and child key derivation.

use core::fmt;

use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey};
use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::hash::{hash160, hmac_sha512};
use crate::keys::{KeyMaterial, compressed};
use crate::path::{ChildIndex, DerivationPath};

/// HMAC key for master key generation.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Accepted seed lengths in bytes.
pub const SEED_LEN: core::ops::RangeInclusive<usize> = 16..=64;

/// Master private key and chain code from a seed.
pub fn master_from_seed(seed: &[u8]) -> Result<(SecretKey, [u8; 32])> {
    if !SEED_LEN.contains(&seed.len()) {
        return Err(Error::invalid(
            "seed",
            format!("expected 16 to 64 bytes, got {}", seed.len()),
        ));
    }

    let i = Zeroizing::new(hmac_sha512(MASTER_HMAC_KEY, &[seed])?);
    let secret = SecretKey::from_slice(&i[..32]).map_err(|_| Error::InvalidSeed)?;

    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    Ok((secret, chain_code))
}

/// A node in the derivation tree.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    material: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: ChildIndex,
}

impl ExtendedKey {
    /// Assemble a node from its parts.
    pub const fn new(
        material: KeyMaterial,
        chain_code: [u8; 32],
        depth: u8,
        parent_fingerprint: [u8; 4],
        child_index: ChildIndex,
    ) -> Self {
        Self {
            material,
            chain_code,
            depth,
            parent_fingerprint,
            child_index,
        }
    }

    /// Master node for `seed`.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let (secret, chain_code) = master_from_seed(seed)?;
        let master = Self::new(
            KeyMaterial::Private(secret),
            chain_code,
            0,
            [0; 4],
            ChildIndex::Normal(0),
        );
        debug!(fingerprint = %hex::encode(master.fingerprint()), "created master key");
        Ok(master)
    }

    /// Derive one child.
    ///
    /// Collisions surface as [`Error::InvalidChild`]; the next index is not tried.
    /// An index at or above 2^31 before the hardened offset is [`Error::InvalidInput`].
    pub fn derive_child(&self, index: ChildIndex) -> Result<Self> {
        let index = index.checked()?;
        let depth = self.depth.checked_add(1).ok_or(Error::MaxDepthExceeded)?;
        let raw = index.to_u32();

        let (material, chain_code) = match &self.material {
            KeyMaterial::Private(secret) => self.ckd_private(secret, index)?,
            KeyMaterial::PublicOnly(public) => self.ckd_public(public, index)?,
        };

        trace!(depth, index = raw, hardened = index.is_hardened(), "derived child key");

        Ok(Self {
            material,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_index: index,
        })
    }

    /// Derive every segment of `path` in order.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.iter()
            .try_fold(self.clone(), |node, index| node.derive_child(*index))
    }

    fn ckd_private(&self, secret: &SecretKey, index: ChildIndex) -> Result<(KeyMaterial, [u8; 32])> {
        let raw = index.to_u32();
        let raw_be = raw.to_be_bytes();

        let i = Zeroizing::new(match index {
            ChildIndex::Hardened(_) => {
                let scalar: Zeroizing<[u8; 32]> = Zeroizing::new(secret.to_bytes().into());
                let data: [&[u8]; 3] = [&[0x00], &*scalar, &raw_be];
                hmac_sha512(&self.chain_code, &data)?
            }
            ChildIndex::Normal(_) => {
                let point = compressed(&secret.public_key());
                let data: [&[u8]; 2] = [&point, &raw_be];
                hmac_sha512(&self.chain_code, &data)?
            }
        });

        let tweak = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&i[..32])))
            .ok_or(Error::InvalidChild { index: raw })?;
        let child = Option::<NonZeroScalar>::from(NonZeroScalar::new(tweak + *secret.to_nonzero_scalar()))
            .ok_or(Error::InvalidChild { index: raw })?;

        Ok((KeyMaterial::Private(SecretKey::from(child)), chain_code_of(&i)))
    }

    fn ckd_public(&self, public: &PublicKey, index: ChildIndex) -> Result<(KeyMaterial, [u8; 32])> {
        let raw = index.to_u32();
        if index.is_hardened() {
            return Err(Error::HardenedDerivationUnavailable { index: raw });
        }

        let point = compressed(public);
        let raw_be = raw.to_be_bytes();
        let data: [&[u8]; 2] = [&point, &raw_be];
        let i = hmac_sha512(&self.chain_code, &data)?;

        // A zero tweak is point(I_L) at infinity.
        let tweak = NonZeroScalar::try_from(&i[..32]).map_err(|_| Error::InvalidChild { index: raw })?;
        let child = ProjectivePoint::GENERATOR * *tweak + public.to_projective();
        let child = PublicKey::from_affine(child.to_affine())
            .map_err(|_| Error::InvalidChild { index: raw })?;

        Ok((KeyMaterial::PublicOnly(child), chain_code_of(&i)))
    }

    /// Public-only copy of this node.
    #[must_use]
    pub fn neuter(&self) -> Self {
        Self::new(
            self.material.neuter(),
            self.chain_code,
            self.depth,
            self.parent_fingerprint,
            self.child_index,
        )
    }

    /// Hash160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.material.compressed())
    }

    /// First four bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }

    /// Key material.
    #[inline]
    pub const fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Chain code.
    #[inline]
    pub const fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Depth below the master node.
    #[inline]
    pub const fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent node.
    #[inline]
    pub const fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Index this node was derived at.
    #[inline]
    pub const fn child_index(&self) -> ChildIndex {
        self.child_index
    }

    /// Public key of this node.
    pub fn public_key(&self) -> PublicKey {
        self.material.public_key()
    }

    /// Whether the node holds a private scalar.
    #[inline]
    pub const fn is_private(&self) -> bool {
        self.material.is_private()
    }

    /// Depth, parent fingerprint and index are all zero.
    pub fn is_root(&self) -> bool {
        self.depth == 0 && self.parent_fingerprint == [0; 4] && self.child_index.to_u32() == 0
    }
}

impl Drop for ExtendedKey {
    fn drop(&mut self) {
        self.chain_code.zeroize();
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("material", &self.material)
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .finish_non_exhaustive()
    }
}

fn chain_code_of(i: &[u8; 64]) -> [u8; 32] {
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    chain_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    fn path(s: &str) -> DerivationPath {
        s.parse().unwrap()
    }

    mod master_tests {
        use super::*;

        #[test]
        fn test_master_from_seed() {
            let (secret, chain_code) = master_from_seed(&SEED).unwrap();
            assert_eq!(
                secret.to_bytes().as_slice(),
                hex!("e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35")
            );
            assert_eq!(
                chain_code,
                hex!("873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508")
            );
        }

        #[test]
        fn test_seed_length_bounds() {
            assert!(master_from_seed(&[7u8; 15]).is_err());
            assert!(master_from_seed(&[7u8; 16]).is_ok());
            assert!(master_from_seed(&[7u8; 64]).is_ok());
            assert!(matches!(
                master_from_seed(&[7u8; 65]),
                Err(Error::InvalidInput { what: "seed", .. })
            ));
        }

        #[test]
        fn test_master_node_is_root() {
            let master = ExtendedKey::from_seed(&SEED).unwrap();
            assert!(master.is_root());
            assert!(master.is_private());
            assert_eq!(master.fingerprint(), hex!("3442193e"));
        }
    }

    mod derive_tests {
        use super::*;

        #[test]
        fn test_child_links_to_parent() {
            let master = ExtendedKey::from_seed(&SEED).unwrap();
            let child = master.derive_child(ChildIndex::Hardened(0)).unwrap();
            assert_eq!(child.depth(), 1);
            assert_eq!(child.parent_fingerprint(), master.fingerprint());
            assert_eq!(child.child_index().to_u32(), 0x8000_0000);
            assert_eq!(
                child.chain_code(),
                &hex!("47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141")
            );
            assert!(!child.is_root());
        }

        #[test]
        fn test_derivation_is_deterministic() {
            let a = ExtendedKey::from_seed(&SEED).unwrap().derive_path(&path("m/0'/0'")).unwrap();
            let b = ExtendedKey::from_seed(&SEED).unwrap().derive_path(&path("m/0'/0'")).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn test_public_derivation_matches_private() {
            let account = ExtendedKey::from_seed(&SEED)
                .unwrap()
                .derive_path(&path("m/44'/0'/0'"))
                .unwrap();
            let via_private = account.derive_path(&path("m/0/5")).unwrap().neuter();
            let via_public = account.neuter().derive_path(&path("m/0/5")).unwrap();
            assert_eq!(via_private, via_public);
        }

        #[test]
        fn test_hardened_on_public_fails() {
            let public = ExtendedKey::from_seed(&SEED).unwrap().neuter();
            for index in [0, 1, 0x7fff_ffff] {
                assert_eq!(
                    public.derive_child(ChildIndex::Hardened(index)),
                    Err(Error::HardenedDerivationUnavailable {
                        index: index | ChildIndex::HARDENED_OFFSET
                    })
                );
            }
        }

        #[test]
        fn test_rejects_index_carrying_offset() {
            let master = ExtendedKey::from_seed(&SEED).unwrap();
            for index in [ChildIndex::Normal(0x8000_0000), ChildIndex::Hardened(0x8000_0005)] {
                assert!(matches!(
                    master.derive_child(index),
                    Err(Error::InvalidInput { what: "child index", .. })
                ));
            }
            assert!(master.derive_path(&DerivationPath::new(vec![ChildIndex::Normal(u32::MAX)])).is_err());
        }

        #[test]
        fn test_max_depth() {
            let master = ExtendedKey::from_seed(&SEED).unwrap();
            let deep = ExtendedKey::new(
                master.material().clone(),
                *master.chain_code(),
                u8::MAX,
                [1, 2, 3, 4],
                ChildIndex::Normal(1),
            );
            assert_eq!(
                deep.derive_child(ChildIndex::Normal(0)),
                Err(Error::MaxDepthExceeded)
            );
        }

        #[test]
        fn test_neuter_keeps_position() {
            let node = ExtendedKey::from_seed(&SEED).unwrap().derive_path(&path("m/1/2'")).unwrap();
            let public = node.neuter();
            assert!(!public.is_private());
            assert_eq!(public.depth(), node.depth());
            assert_eq!(public.fingerprint(), node.fingerprint());
            assert_eq!(public.chain_code(), node.chain_code());
        }
    }
}
