//! Error types for derivation, codec and address operations.

use core::fmt::Display;

use thiserror::Error;

use crate::semantic::Semantic;

/// Errors that can occur while building or deriving a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed entropy, mnemonic, seed, path, extended key, raw key or WIF.
    #[error("invalid {what}: {reason}")]
    InvalidInput {
        /// What kind of input was rejected.
        what: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// The seed produced a master scalar of zero or not below the curve order.
    #[error("seed does not produce a valid master key")]
    InvalidSeed,
    /// A CKD step produced an unusable scalar or point.
    #[error("child derivation at index {index:#010x} produced an invalid key")]
    InvalidChild {
        /// Raw child index (hardened offset applied).
        index: u32,
    },
    /// Hardened derivation was requested on public-only key material.
    #[error("hardened index {index:#010x} cannot be derived without a private key")]
    HardenedDerivationUnavailable {
        /// Raw child index (hardened offset applied).
        index: u32,
    },
    /// The network defines no version bytes for the requested semantic.
    #[error("{semantic} extended keys are not defined for {symbol}")]
    UnsupportedSemantic {
        /// Requested semantic.
        semantic: Semantic,
        /// Cryptocurrency symbol.
        symbol: &'static str,
    },
    /// Base58check or bech32 checksum failure.
    #[error("checksum mismatch")]
    ChecksumMismatch,
    /// The operation needs a private key but only a public key is held.
    #[error("{0} requires a private key")]
    PrivateKeyRequired(&'static str),
    /// The key was imported without a chain code.
    #[error("key has no chain code and cannot be derived")]
    NotDerivable,
    /// No `from_*` entry point has loaded a key yet.
    #[error("no key has been loaded into the wallet")]
    KeyNotLoaded,
    /// Symbol missing from the cryptocurrency table.
    #[error("unknown cryptocurrency symbol {0:?}")]
    UnknownSymbol(String),
    /// Depth byte would overflow.
    #[error("maximum derivation depth exceeded")]
    MaxDepthExceeded,
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(what: &'static str, reason: impl Display) -> Self {
        Self::InvalidInput {
            what,
            reason: reason.to_string(),
        }
    }
}

impl From<bip39::Error> for Error {
    fn from(err: bip39::Error) -> Self {
        Self::invalid("mnemonic", err)
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Self::invalid("hex", err)
    }
}

/// Result type alias for hdwallet operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bip39_errors_are_invalid_input() {
        let err: Error = bip39::Error::InvalidChecksum.into();
        assert!(matches!(err, Error::InvalidInput { what: "mnemonic", .. }));
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::UnsupportedSemantic {
            semantic: Semantic::P2wsh,
            symbol: "DOGE",
        };
        assert_eq!(err.to_string(), "p2wsh extended keys are not defined for DOGE");

        let err = Error::HardenedDerivationUnavailable { index: 0x8000_0000 };
        assert_eq!(
            err.to_string(),
            "hardened index 0x80000000 cannot be derived without a private key"
        );
    }
}
