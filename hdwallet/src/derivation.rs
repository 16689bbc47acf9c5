//! Path templates (BIP-32/44/49/84) and BIP-141 semantic tagging.
//!
//! A [`Derivation`] is either a literal [`DerivationPath`] with an optional
//! semantic override, or a [`Template`] whose semantic is fixed by its
//! standard.
//!
//! ```
//! use hdwallet::{ChildIndex, Derivation, Standard, Template};
//!
//! let template = Template::new(Standard::Bip84)
//!     .account(ChildIndex::Hardened(1))
//!     .address(ChildIndex::Normal(7));
//! assert_eq!(template.path().to_string(), "m/84'/0'/1'/0/7");
//!
//! let derivation = Derivation::from(template);
//! assert_eq!(derivation.semantic().map(|s| s.name()), Some("p2wpkh"));
//! ```

use core::fmt;
use core::str::FromStr;

use crate::cryptocurrencies::Cryptocurrency;
use crate::error::{Error, Result};
use crate::path::{ChildIndex, DerivationPath};
use crate::semantic::Semantic;

/// Path standard a [`Template`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Standard {
    /// Free purpose level, legacy keys.
    Bip32,
    /// `44'` purpose, legacy keys.
    Bip44,
    /// `49'` purpose, segwit nested in P2SH.
    Bip49,
    /// `84'` purpose, native segwit.
    Bip84,
}

impl Standard {
    /// Default purpose index.
    #[must_use]
    pub const fn purpose(self) -> u32 {
        match self {
            Self::Bip32 => 0,
            Self::Bip44 => 44,
            Self::Bip49 => 49,
            Self::Bip84 => 84,
        }
    }

    /// Semantic implied by the standard.
    #[must_use]
    pub const fn semantic(self) -> Semantic {
        match self {
            Self::Bip32 | Self::Bip44 => Semantic::P2pkh,
            Self::Bip49 => Semantic::P2wpkhInP2sh,
            Self::Bip84 => Semantic::P2wpkh,
        }
    }
}

/// Five-level `purpose/coin_type/account/change/address` path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Template {
    standard: Standard,
    purpose: ChildIndex,
    coin_type: ChildIndex,
    account: ChildIndex,
    change: ChildIndex,
    address: ChildIndex,
}

impl Template {
    /// Template with default levels and coin type `0'`.
    #[must_use]
    pub const fn new(standard: Standard) -> Self {
        Self {
            standard,
            purpose: ChildIndex::Hardened(standard.purpose()),
            coin_type: ChildIndex::Hardened(0),
            account: ChildIndex::Hardened(0),
            change: ChildIndex::Normal(0),
            address: ChildIndex::Normal(0),
        }
    }

    /// Template with the coin type of `cryptocurrency`.
    #[must_use]
    pub const fn for_cryptocurrency(standard: Standard, cryptocurrency: &Cryptocurrency) -> Self {
        Self::new(standard).coin_type(cryptocurrency.coin_type)
    }

    /// Override the purpose level. Only BIP-32 templates leave it free.
    pub fn purpose(mut self, purpose: ChildIndex) -> Result<Self> {
        if self.standard != Standard::Bip32 {
            return Err(Error::invalid(
                "template",
                format!("purpose of {:?} is fixed at {}'", self.standard, self.standard.purpose()),
            ));
        }
        self.purpose = purpose;
        Ok(self)
    }

    /// Set the coin type level.
    #[must_use]
    pub const fn coin_type(mut self, coin_type: ChildIndex) -> Self {
        self.coin_type = coin_type;
        self
    }

    /// Set the account level.
    #[must_use]
    pub const fn account(mut self, account: ChildIndex) -> Self {
        self.account = account;
        self
    }

    /// Set the change level.
    #[must_use]
    pub const fn change(mut self, change: ChildIndex) -> Self {
        self.change = change;
        self
    }

    /// Set the address level.
    #[must_use]
    pub const fn address(mut self, address: ChildIndex) -> Self {
        self.address = address;
        self
    }

    /// The template's standard.
    #[inline]
    pub const fn standard(&self) -> Standard {
        self.standard
    }

    /// Semantic implied by the standard.
    #[inline]
    pub const fn semantic(&self) -> Semantic {
        self.standard.semantic()
    }

    /// Render to a literal path.
    pub fn path(&self) -> DerivationPath {
        DerivationPath::new(vec![
            self.purpose,
            self.coin_type,
            self.account,
            self.change,
            self.address,
        ])
    }
}

/// What to apply to a wallet: a literal path or a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// Literal path, optionally tagged with a semantic.
    Raw {
        /// Path to apply.
        path: DerivationPath,
        /// Semantic to switch the wallet to, if any.
        semantic: Option<Semantic>,
    },
    /// Standard template with its implied semantic.
    Templated(Template),
}

impl Derivation {
    /// Literal path with no semantic change.
    pub const fn raw(path: DerivationPath) -> Self {
        Self::Raw {
            path,
            semantic: None,
        }
    }

    /// BIP-141 derivation: a literal path tagged with a segwit semantic.
    pub fn bip141(path: DerivationPath, semantic: Semantic) -> Result<Self> {
        if !semantic.is_segwit() {
            return Err(Error::invalid(
                "bip141 semantic",
                format!("{semantic} is not a segwit semantic"),
            ));
        }
        Ok(Self::Raw {
            path,
            semantic: Some(semantic),
        })
    }

    /// Literal path this derivation applies.
    pub fn path(&self) -> DerivationPath {
        match self {
            Self::Raw { path, .. } => path.clone(),
            Self::Templated(template) => template.path(),
        }
    }

    /// Semantic carried by the derivation, if any.
    pub const fn semantic(&self) -> Option<Semantic> {
        match self {
            Self::Raw { semantic, .. } => *semantic,
            Self::Templated(template) => Some(template.semantic()),
        }
    }
}

impl From<DerivationPath> for Derivation {
    fn from(path: DerivationPath) -> Self {
        Self::raw(path)
    }
}

impl From<Template> for Derivation {
    fn from(template: Template) -> Self {
        Self::Templated(template)
    }
}

impl FromStr for Derivation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.parse().map(Self::raw)
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path().fmt(f)
    }
}
