//! Extended key semantics (the script type an extended key is meant to produce).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Address/script type that selects extended-key version bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Semantic {
    /// Pay to public key hash.
    P2pkh,
    /// Pay to script hash.
    P2sh,
    /// Native segwit v0 key hash.
    P2wpkh,
    /// Segwit v0 key hash nested in P2SH.
    P2wpkhInP2sh,
    /// Native segwit v0 script hash.
    P2wsh,
    /// Segwit v0 script hash nested in P2SH.
    P2wshInP2sh,
}

impl Semantic {
    /// All semantics in lookup order.
    pub const ALL: [Self; 6] = [
        Self::P2pkh,
        Self::P2sh,
        Self::P2wpkh,
        Self::P2wpkhInP2sh,
        Self::P2wsh,
        Self::P2wshInP2sh,
    ];

    /// Get the snake_case name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::P2pkh => "p2pkh",
            Self::P2sh => "p2sh",
            Self::P2wpkh => "p2wpkh",
            Self::P2wpkhInP2sh => "p2wpkh_in_p2sh",
            Self::P2wsh => "p2wsh",
            Self::P2wshInP2sh => "p2wsh_in_p2sh",
        }
    }

    /// Whether this semantic is a segwit script type.
    #[inline]
    #[must_use]
    pub const fn is_segwit(self) -> bool {
        matches!(
            self,
            Self::P2wpkh | Self::P2wpkhInP2sh | Self::P2wsh | Self::P2wshInP2sh
        )
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Semantic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|semantic| semantic.name() == lower)
            .ok_or_else(|| Error::invalid("semantic", format!("unknown semantic {s:?}")))
    }
}
