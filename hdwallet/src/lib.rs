//! # hdwallet - BIP32 Hierarchical Deterministic Wallet Engine
//!
//! Derives keys and addresses for UTXO and account-model networks from a
//! mnemonic, entropy, seed, extended key or raw key.
//!
//! ## Features
//!
//! - **BIP32 CKD**: private and public-only child derivation with exact vectors
//! - **Path templates**: BIP32/44/49/84 builders plus BIP141 semantic tagging
//! - **Extended keys**: 78-byte codec with per-network, per-semantic version bytes
//! - **Addresses**: P2PKH, P2SH, native and nested P2WPKH/P2WSH, keccak accounts
//! - **Mnemonics**: ten BIP39 languages with detection and prefix expansion
//! - **Secure by default**: secrets are zeroized and redacted from `Debug`
//!
//! ## Example
//!
//! ```
//! use hdwallet::{Derivation, HdWallet, Semantic, Standard, Template};
//!
//! let mut wallet = HdWallet::new("BTC")?;
//! wallet.from_mnemonic(
//!     "unusual onion shallow invite supply more bubble mistake over make bracket cry",
//!     None,
//!     "",
//! )?;
//! wallet.from_path(&Derivation::from(Template::new(Standard::Bip84)))?;
//!
//! assert_eq!(wallet.semantic(), Semantic::P2wpkh);
//! assert!(wallet.address().unwrap().value.starts_with("bc1q"));
//! # Ok::<(), hdwallet::Error>(())
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::use_self,
    clippy::uninlined_format_args,
    clippy::return_self_not_must_use,
    clippy::cast_possible_truncation,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::many_single_char_names,
    clippy::redundant_closure_for_method_calls,
    clippy::option_if_let_else,
    clippy::wrong_self_convention,
    clippy::unreadable_literal,
    clippy::missing_fields_in_debug
)]
#![forbid(unsafe_code)]

pub mod address;
pub mod ckd;
pub mod cryptocurrencies;
pub mod derivation;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod path;
pub mod semantic;
pub mod wallet;
pub mod wif;
pub mod xkey;

pub use address::Address;
pub use ckd::ExtendedKey;
pub use cryptocurrencies::{AddressStyle, Cryptocurrency, KeyKind, Network, get_cryptocurrency};
pub use derivation::{Derivation, Standard, Template};
pub use error::{Error, Result};
pub use keys::KeyMaterial;
pub use mnemonic::{Language, Strength};
pub use path::{ChildIndex, DerivationPath};
pub use semantic::Semantic;
pub use wallet::{Addresses, HdWallet, WalletSummary};
pub use xkey::ExtendedKeyRecord;
