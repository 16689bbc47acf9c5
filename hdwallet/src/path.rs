//! Child indices and literal derivation paths such as `m/44'/0'/0'/0/0`.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, Result};

/// One path segment: an index below 2^31 plus a hardened flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChildIndex {
    /// Normal (non-hardened) index.
    Normal(u32),
    /// Hardened index, stored without the offset.
    Hardened(u32),
}

impl ChildIndex {
    /// Offset added to hardened indices before hashing (2^31).
    pub const HARDENED_OFFSET: u32 = 0x8000_0000;

    /// Create a normal child index.
    pub fn normal(index: u32) -> Result<Self> {
        Self::new(index, false)
    }

    /// Create a hardened child index.
    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(index, true)
    }

    /// Create a child index, rejecting values that already carry the offset.
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index >= Self::HARDENED_OFFSET {
            return Err(Error::invalid(
                "child index",
                format!("{index} is not below 2^31"),
            ));
        }
        Ok(if hardened {
            Self::Hardened(index)
        } else {
            Self::Normal(index)
        })
    }

    /// Re-check a variant built directly, rejecting an index at or above 2^31.
    pub fn checked(self) -> Result<Self> {
        Self::new(self.index(), self.is_hardened())
    }

    /// Check if this is a hardened index.
    #[inline]
    pub const fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }

    /// Get the index without the hardened offset.
    #[inline]
    pub const fn index(&self) -> u32 {
        match self {
            Self::Normal(i) | Self::Hardened(i) => *i,
        }
    }

    /// Raw index as serialized in CKD data and extended keys.
    #[inline]
    pub const fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(i) => *i,
            Self::Hardened(i) => *i | Self::HARDENED_OFFSET,
        }
    }
}

impl From<u32> for ChildIndex {
    fn from(raw: u32) -> Self {
        if raw >= Self::HARDENED_OFFSET {
            Self::Hardened(raw & !Self::HARDENED_OFFSET)
        } else {
            Self::Normal(raw)
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{i}"),
            Self::Hardened(i) => write!(f, "{i}'"),
        }
    }
}

impl FromStr for ChildIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid("path component", format!("{s:?}")));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| Error::invalid("path component", format!("{s:?} is out of range")))?;

        Self::new(index, hardened)
    }
}

/// A literal BIP-32 derivation path rooted at `m`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    indices: Vec<ChildIndex>,
}

impl DerivationPath {
    /// The empty path `m`.
    pub fn master() -> Self {
        Self::default()
    }

    /// Create a path from child indices.
    pub fn new(indices: Vec<ChildIndex>) -> Self {
        Self { indices }
    }

    /// Get the child indices in this path.
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    /// Iterate over the segments left to right.
    pub fn iter(&self) -> core::slice::Iter<'_, ChildIndex> {
        self.indices.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if this is the bare `m` path.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a child index.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.indices.clone();
        indices.push(index);
        Self { indices }
    }

    /// Append every segment of `other`.
    pub fn extend(&self, other: &Self) -> Self {
        let mut indices = self.indices.clone();
        indices.extend_from_slice(&other.indices);
        Self { indices }
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildIndex;
    type IntoIter = core::slice::Iter<'a, ChildIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indices {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parse `m` or `m/<index>[']/...`.
    ///
    /// The leading `m` is mandatory and empty components are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "m" {
            return Ok(Self::master());
        }

        let rest = s.strip_prefix("m/").ok_or_else(|| {
            Error::invalid("derivation path", format!("{s:?} must start with \"m/\""))
        })?;

        let indices = rest
            .split('/')
            .map(str::parse)
            .collect::<Result<Vec<ChildIndex>>>()?;

        Ok(Self { indices })
    }
}
