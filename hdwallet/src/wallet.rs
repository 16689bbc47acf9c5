//! Stateful HD wallet over one cryptocurrency.
//!
//! An [`HdWallet`] is loaded by one of the `from_*` entry points and then
//! walked down the tree with [`HdWallet::from_path`] or
//! [`HdWallet::from_index`]. Every operation either fully applies or
//! leaves the wallet untouched.
//!
//! ```
//! use hdwallet::{HdWallet, Language};
//!
//! let mut wallet = HdWallet::new("BTC")?;
//! wallet.from_entropy("ee535b143b0d9d1f87546f9df0d06b1a", Language::English, "")?;
//! wallet.from_path(&"m/44'/0'/0'/0/0".parse()?)?;
//! assert_eq!(wallet.p2pkh_address().as_deref(), Some("17gqwj8hehs8tigsD3NsPLf9sn5nR2r7su"));
//! # Ok::<(), hdwallet::Error>(())
//! ```

use core::fmt;

use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::address::{self, Address};
use crate::ckd::ExtendedKey;
use crate::cryptocurrencies::{Cryptocurrency, KeyKind, Network, get_cryptocurrency};
use crate::derivation::Derivation;
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;
use crate::mnemonic::{self, Language, Strength};
use crate::path::{ChildIndex, DerivationPath};
use crate::semantic::Semantic;
use crate::wif;
use crate::xkey::{self, ExtendedKeyRecord};

/// Where derivation restarts after [`HdWallet::clean_derivation`].
#[derive(Clone)]
enum Base {
    /// Master node from a seed, or an imported root extended key.
    Root(ExtendedKey),
    /// Imported extended key below the root.
    Imported(ExtendedKey),
    /// Raw key without a chain code.
    Bare(KeyMaterial),
}

/// Mnemonic metadata kept for the summary.
#[derive(Clone)]
struct Phrase {
    entropy: Zeroizing<Vec<u8>>,
    mnemonic: Zeroizing<String>,
    language: Language,
    passphrase: Zeroizing<String>,
    strength: Strength,
}

/// HD wallet state for one cryptocurrency.
#[derive(Clone)]
pub struct HdWallet {
    cryptocurrency: &'static Cryptocurrency,
    default_semantic: Semantic,
    semantic: Semantic,
    use_default_path: bool,
    phrase: Option<Phrase>,
    seed: Option<Zeroizing<Vec<u8>>>,
    base: Option<Base>,
    current: Option<ExtendedKey>,
    path: DerivationPath,
}

impl HdWallet {
    /// Empty wallet for `symbol` with the p2pkh semantic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the symbol is not in the table.
    pub fn new(symbol: &str) -> Result<Self> {
        Self::with_options(symbol, None, false)
    }

    /// Empty wallet with explicit options.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Cryptocurrency symbol, case-insensitive
    /// * `semantic` - Semantic for extended keys, p2pkh when `None`
    /// * `use_default_path` - Derive the network's default path after loading a root
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSymbol`] if the symbol is not in the table.
    pub fn with_options(
        symbol: &str,
        semantic: Option<Semantic>,
        use_default_path: bool,
    ) -> Result<Self> {
        let cryptocurrency = get_cryptocurrency(symbol)?;
        let semantic = semantic.unwrap_or(Semantic::P2pkh);
        Ok(Self {
            cryptocurrency,
            default_semantic: semantic,
            semantic,
            use_default_path,
            phrase: None,
            seed: None,
            base: None,
            current: None,
            path: DerivationPath::master(),
        })
    }

    // ----- loading -----

    /// Load from hex entropy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for non-hex entropy or a length
    /// outside 16, 20, 24, 28 and 32 bytes.
    pub fn from_entropy(
        &mut self,
        entropy: &str,
        language: Language,
        passphrase: &str,
    ) -> Result<&mut Self> {
        let entropy = Zeroizing::new(hex::decode(entropy.trim())?);
        let phrase = mnemonic::entropy_to_mnemonic(&entropy, language)?;
        self.load_phrase(&phrase, Some(language), passphrase)
    }

    /// Load from a mnemonic phrase. The language is detected when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown word, a bad word
    /// count or a bad checksum word.
    pub fn from_mnemonic(
        &mut self,
        phrase: &str,
        language: Option<Language>,
        passphrase: &str,
    ) -> Result<&mut Self> {
        self.load_phrase(phrase, language, passphrase)
    }

    fn load_phrase(
        &mut self,
        phrase: &str,
        language: Option<Language>,
        passphrase: &str,
    ) -> Result<&mut Self> {
        let language = match language {
            Some(language) => language,
            None => mnemonic::mnemonic_language(phrase)?,
        };
        let entropy = mnemonic::mnemonic_to_entropy(phrase, Some(language))?;
        let strength = Strength::from_entropy_len(entropy.len())?;
        let seed = mnemonic::mnemonic_to_seed(phrase, passphrase, Some(language))?;
        let master = ExtendedKey::from_seed(&*seed)?;

        let phrase = Phrase {
            mnemonic: mnemonic::entropy_to_mnemonic(&entropy, language)?,
            entropy,
            language,
            passphrase: Zeroizing::new(passphrase.to_string()),
            strength,
        };
        self.load(Base::Root(master), Some(Zeroizing::new(seed.to_vec())), Some(phrase), None)
    }

    /// Load from a hex seed of 16 to 64 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for bad hex or length, and
    /// [`Error::InvalidSeed`] if the seed yields no valid master key.
    pub fn from_seed(&mut self, seed: &str) -> Result<&mut Self> {
        let seed = Zeroizing::new(hex::decode(seed.trim())?);
        let master = ExtendedKey::from_seed(&seed)?;
        self.load(Base::Root(master), Some(seed), None, None)
    }

    /// Load from an extended private key.
    ///
    /// With `strict`, only root keys are accepted. Otherwise a non-root key
    /// becomes the derivation base and the root accessors report `None`.
    pub fn from_xprivate_key(&mut self, xprivate_key: &str, strict: bool) -> Result<&mut Self> {
        let record = xkey::decode_private(xprivate_key)?;
        self.load_xkey(&record, KeyKind::Private, strict)
    }

    /// Load from an extended public key. Hardened derivation is unavailable afterwards.
    pub fn from_xpublic_key(&mut self, xpublic_key: &str, strict: bool) -> Result<&mut Self> {
        let record = xkey::decode_public(xpublic_key)?;
        self.load_xkey(&record, KeyKind::Public, strict)
    }

    fn load_xkey(
        &mut self,
        record: &ExtendedKeyRecord,
        kind: KeyKind,
        strict: bool,
    ) -> Result<&mut Self> {
        let semantic = match self.cryptocurrency.semantic_of(record.version) {
            Some((semantic, found)) if found == kind => semantic,
            _ => {
                return Err(Error::invalid(
                    "extended key",
                    format!(
                        "version {} is not a {} {} version",
                        hex::encode(record.version),
                        self.cryptocurrency.symbol,
                        if kind == KeyKind::Private { "private" } else { "public" },
                    ),
                ));
            }
        };

        if strict && !record.is_root() {
            return Err(Error::invalid("extended key", "strict import requires a root key"));
        }

        let node = ExtendedKey::from_record(record)?;
        let base = if record.is_root() {
            Base::Root(node)
        } else {
            Base::Imported(node)
        };
        self.load(base, None, None, Some(semantic))
    }

    /// Load a WIF private key. The wallet is not derivable afterwards.
    pub fn from_wif(&mut self, wif: &str) -> Result<&mut Self> {
        let secret = wif::decode(wif, self.cryptocurrency.wif_secret_key)?;
        self.load(Base::Bare(KeyMaterial::Private(secret)), None, None, None)
    }

    /// Load a hex private scalar. The wallet is not derivable afterwards.
    pub fn from_private_key(&mut self, private_key: &str) -> Result<&mut Self> {
        let bytes = Zeroizing::new(hex::decode(private_key.trim())?);
        let material = KeyMaterial::from_private_bytes(&bytes)?;
        self.load(Base::Bare(material), None, None, None)
    }

    /// Load a hex SEC1 public key. The wallet is not derivable afterwards.
    pub fn from_public_key(&mut self, public_key: &str) -> Result<&mut Self> {
        let bytes = hex::decode(public_key.trim())?;
        let material = KeyMaterial::from_public_bytes(&bytes)?;
        self.load(Base::Bare(material), None, None, None)
    }

    fn load(
        &mut self,
        base: Base,
        seed: Option<Zeroizing<Vec<u8>>>,
        phrase: Option<Phrase>,
        semantic: Option<Semantic>,
    ) -> Result<&mut Self> {
        let mut next = Self {
            cryptocurrency: self.cryptocurrency,
            default_semantic: self.default_semantic,
            semantic: semantic.unwrap_or(self.default_semantic),
            use_default_path: self.use_default_path,
            phrase,
            seed,
            current: match &base {
                Base::Root(node) | Base::Imported(node) => Some(node.clone()),
                Base::Bare(_) => None,
            },
            base: Some(base),
            path: DerivationPath::master(),
        };

        if next.use_default_path && matches!(next.base, Some(Base::Root(_))) {
            let path = next.cryptocurrency.default_derivation_path()?;
            next.from_path(&Derivation::raw(path))?;
        }

        debug!(symbol = self.cryptocurrency.symbol, semantic = %next.semantic, "loaded wallet key");
        *self = next;
        Ok(self)
    }

    // ----- derivation -----

    /// Apply a derivation, segment by segment, below the current node.
    ///
    /// Templated and BIP-141 derivations also switch the semantic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotDerivable`] for raw keys, and the CKD errors of
    /// [`ExtendedKey::derive_child`]. The wallet is unchanged on error.
    pub fn from_path(&mut self, derivation: &Derivation) -> Result<&mut Self> {
        let current = self.derivable()?;
        let path = derivation.path();
        let derived = current.derive_path(&path)?;

        debug!(path = %path, "applied derivation");
        self.current = Some(derived);
        self.path = self.path.extend(&path);
        if let Some(semantic) = derivation.semantic() {
            self.semantic = semantic;
        }
        Ok(self)
    }

    /// Derive a single child below the current node.
    pub fn from_index(&mut self, index: u32, hardened: bool) -> Result<&mut Self> {
        let index = ChildIndex::new(index, hardened)?;
        self.from_path(&Derivation::raw(DerivationPath::new(vec![index])))
    }

    /// Return to the loaded base node and reset the path to `m`.
    pub fn clean_derivation(&mut self) -> &mut Self {
        if let Some(Base::Root(node) | Base::Imported(node)) = &self.base {
            self.current = Some(node.clone());
            self.path = DerivationPath::master();
            debug!("reset derivation");
        }
        self
    }

    fn derivable(&self) -> Result<&ExtendedKey> {
        match (&self.base, &self.current) {
            (None, _) => Err(Error::KeyNotLoaded),
            (_, Some(current)) => Ok(current),
            (Some(_), None) => Err(Error::NotDerivable),
        }
    }

    fn material(&self) -> Option<&KeyMaterial> {
        match (&self.current, &self.base) {
            (Some(current), _) => Some(current.material()),
            (None, Some(Base::Bare(material))) => Some(material),
            _ => None,
        }
    }

    // ----- extended keys -----

    fn encode_xkey(&self, node: Option<&ExtendedKey>, kind: KeyKind) -> Result<Option<String>> {
        if self.base.is_none() {
            return Err(Error::KeyNotLoaded);
        }
        let Some(node) = node else {
            return Ok(None);
        };
        if kind == KeyKind::Private && !node.is_private() {
            return Ok(None);
        }
        let version = self.cryptocurrency.require_version(self.semantic, kind)?;
        Ok(Some(node.to_record(version, kind)?.encode()))
    }

    fn root(&self) -> Option<&ExtendedKey> {
        match &self.base {
            Some(Base::Root(node)) => Some(node),
            _ => None,
        }
    }

    /// Root extended private key.
    ///
    /// `Ok(None)` without a true root or a private key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotLoaded`] before any loader has run, and
    /// [`Error::UnsupportedSemantic`] if the network has no version for the
    /// active semantic. The other extended-key accessors fail the same way.
    pub fn root_xprivate_key(&self) -> Result<Option<String>> {
        self.encode_xkey(self.root(), KeyKind::Private)
    }

    /// Root extended public key. `Ok(None)` without a true root.
    pub fn root_xpublic_key(&self) -> Result<Option<String>> {
        self.encode_xkey(self.root(), KeyKind::Public)
    }

    /// Current extended private key. `Ok(None)` without a chain code or private key.
    pub fn xprivate_key(&self) -> Result<Option<String>> {
        self.encode_xkey(self.current.as_ref(), KeyKind::Private)
    }

    /// Current extended public key. `Ok(None)` without a chain code.
    pub fn xpublic_key(&self) -> Result<Option<String>> {
        self.encode_xkey(self.current.as_ref(), KeyKind::Public)
    }

    // ----- key accessors -----

    /// Compressed public key hex.
    pub fn compressed(&self) -> Option<String> {
        self.material().map(|m| hex::encode(m.compressed()))
    }

    /// Uncompressed public key hex.
    pub fn uncompressed(&self) -> Option<String> {
        self.material().map(|m| hex::encode(m.uncompressed()))
    }

    /// Private key hex.
    pub fn private_key(&self) -> Option<String> {
        self.material()
            .and_then(KeyMaterial::private_bytes)
            .map(|bytes| hex::encode(&*bytes))
    }

    /// Public key hex (compressed).
    pub fn public_key(&self) -> Option<String> {
        self.compressed()
    }

    /// Chain code hex of the current node.
    pub fn chain_code(&self) -> Option<String> {
        self.current.as_ref().map(|node| hex::encode(node.chain_code()))
    }

    /// Compressed-key WIF.
    pub fn wif(&self) -> Option<String> {
        self.material()
            .and_then(KeyMaterial::secret_key)
            .map(|secret| wif::encode(secret, self.cryptocurrency.wif_secret_key))
    }

    /// Hash160 of the compressed public key, hex.
    pub fn hash(&self) -> Option<String> {
        self.material().map(|m| hex::encode(m.hash()))
    }

    /// Own fingerprint, the first four bytes of [`hash`](Self::hash).
    pub fn finger_print(&self) -> Option<String> {
        self.material().map(|m| hex::encode(&m.hash()[..4]))
    }

    /// Fingerprint of the current node's parent.
    pub fn parent_fingerprint(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|node| hex::encode(node.parent_fingerprint()))
    }

    /// Depth of the current node.
    pub fn depth(&self) -> Option<u8> {
        self.current.as_ref().map(ExtendedKey::depth)
    }

    /// Raw child index of the current node.
    pub fn index(&self) -> Option<u32> {
        self.current.as_ref().map(|node| node.child_index().to_u32())
    }

    /// Path applied since the base, `None` for raw keys.
    pub fn path(&self) -> Option<String> {
        self.current.as_ref().map(|_| self.path.to_string())
    }

    /// Seed hex.
    pub fn seed(&self) -> Option<String> {
        self.seed.as_ref().map(|seed| hex::encode(&**seed))
    }

    /// Active semantic.
    #[inline]
    pub const fn semantic(&self) -> Semantic {
        self.semantic
    }

    /// Network parameters.
    #[inline]
    pub const fn cryptocurrency(&self) -> &'static Cryptocurrency {
        self.cryptocurrency
    }

    /// Main or test network.
    #[inline]
    pub const fn network(&self) -> Network {
        self.cryptocurrency.network
    }

    /// Ticker symbol.
    #[inline]
    pub const fn symbol(&self) -> &'static str {
        self.cryptocurrency.symbol
    }

    /// Mnemonic strength.
    pub fn strength(&self) -> Option<Strength> {
        self.phrase.as_ref().map(|p| p.strength)
    }

    /// Entropy hex.
    pub fn entropy(&self) -> Option<String> {
        self.phrase.as_ref().map(|p| hex::encode(&*p.entropy))
    }

    /// Mnemonic phrase.
    pub fn mnemonic(&self) -> Option<&str> {
        self.phrase.as_ref().map(|p| p.mnemonic.as_str())
    }

    /// Mnemonic language.
    pub fn language(&self) -> Option<Language> {
        self.phrase.as_ref().map(|p| p.language)
    }

    /// Mnemonic passphrase, `None` when empty.
    pub fn passphrase(&self) -> Option<&str> {
        self.phrase
            .as_ref()
            .map(|p| p.passphrase.as_str())
            .filter(|p| !p.is_empty())
    }

    // ----- addresses -----

    fn render(&self, semantic: Semantic) -> Option<Address> {
        let public = self.material()?.public_key();
        Address::render(semantic, &public, self.cryptocurrency)
    }

    /// P2PKH address, or the checksummed account address.
    pub fn p2pkh_address(&self) -> Option<String> {
        let public = self.material()?.public_key();
        Some(address::p2pkh(&public, self.cryptocurrency))
    }

    /// P2SH address.
    pub fn p2sh_address(&self) -> Option<String> {
        self.render(Semantic::P2sh).map(|a| a.value)
    }

    /// Native P2WPKH address.
    pub fn p2wpkh_address(&self) -> Option<String> {
        self.render(Semantic::P2wpkh).map(|a| a.value)
    }

    /// P2WPKH-in-P2SH address.
    pub fn p2wpkh_in_p2sh_address(&self) -> Option<String> {
        self.render(Semantic::P2wpkhInP2sh).map(|a| a.value)
    }

    /// Native P2WSH address.
    pub fn p2wsh_address(&self) -> Option<String> {
        self.render(Semantic::P2wsh).map(|a| a.value)
    }

    /// P2WSH-in-P2SH address.
    pub fn p2wsh_in_p2sh_address(&self) -> Option<String> {
        self.render(Semantic::P2wshInP2sh).map(|a| a.value)
    }

    /// Address for the active semantic.
    pub fn address(&self) -> Option<Address> {
        self.render(self.semantic)
    }

    // ----- summary -----

    /// Snapshot of every accessor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotLoaded`] on an empty wallet and
    /// [`Error::UnsupportedSemantic`] if extended keys cannot be encoded for
    /// the active semantic.
    pub fn dumps(&self) -> Result<WalletSummary> {
        Ok(WalletSummary {
            cryptocurrency: self.cryptocurrency.name,
            symbol: self.cryptocurrency.symbol,
            network: self.network(),
            strength: self.strength().map(Strength::bits),
            entropy: self.entropy(),
            mnemonic: self.mnemonic().map(str::to_string),
            language: self.language(),
            passphrase: self.passphrase().map(str::to_string),
            seed: self.seed(),
            root_xprivate_key: self.root_xprivate_key()?,
            root_xpublic_key: self.root_xpublic_key()?,
            xprivate_key: self.xprivate_key()?,
            xpublic_key: self.xpublic_key()?,
            uncompressed: self.uncompressed(),
            compressed: self.compressed(),
            chain_code: self.chain_code(),
            private_key: self.private_key(),
            public_key: self.public_key(),
            wif: self.wif(),
            finger_print: self.finger_print(),
            semantic: self.semantic,
            path: self.path(),
            hash: self.hash(),
            addresses: Addresses {
                p2pkh: self.p2pkh_address(),
                p2sh: self.p2sh_address(),
                p2wpkh: self.p2wpkh_address(),
                p2wpkh_in_p2sh: self.p2wpkh_in_p2sh_address(),
                p2wsh: self.p2wsh_address(),
                p2wsh_in_p2sh: self.p2wsh_in_p2sh_address(),
            },
        })
    }
}

impl fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdWallet")
            .field("symbol", &self.cryptocurrency.symbol)
            .field("semantic", &self.semantic)
            .field("current", &self.current)
            .field("path", &self.path.to_string())
            .finish_non_exhaustive()
    }
}

/// Every address of the current key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addresses {
    /// P2PKH or checksummed account address.
    pub p2pkh: Option<String>,
    /// P2SH address.
    pub p2sh: Option<String>,
    /// P2WPKH address.
    pub p2wpkh: Option<String>,
    /// P2WPKH-in-P2SH address.
    pub p2wpkh_in_p2sh: Option<String>,
    /// P2WSH address.
    pub p2wsh: Option<String>,
    /// P2WSH-in-P2SH address.
    pub p2wsh_in_p2sh: Option<String>,
}

/// Serializable snapshot of a wallet, see [`HdWallet::dumps`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct WalletSummary {
    pub cryptocurrency: &'static str,
    pub symbol: &'static str,
    pub network: Network,
    pub strength: Option<usize>,
    pub entropy: Option<String>,
    pub mnemonic: Option<String>,
    pub language: Option<Language>,
    pub passphrase: Option<String>,
    pub seed: Option<String>,
    pub root_xprivate_key: Option<String>,
    pub root_xpublic_key: Option<String>,
    pub xprivate_key: Option<String>,
    pub xpublic_key: Option<String>,
    pub uncompressed: Option<String>,
    pub compressed: Option<String>,
    pub chain_code: Option<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub wif: Option<String>,
    pub finger_print: Option<String>,
    pub semantic: Semantic,
    pub path: Option<String>,
    pub hash: Option<String>,
    pub addresses: Addresses,
}
