//! BIP-39 entropy, mnemonic and seed conversions.
//!
//! Wordlists, checksums and PBKDF2 stretching come from the `bip39` crate;
//! this module adds language and strength types, OS entropy and prefix
//! expansion for abbreviated phrases.
//!
//! # Example
//!
//! ```
//! use hdwallet::mnemonic::{self, Language};
//!
//! let entropy = hex::decode("ee535b143b0d9d1f87546f9df0d06b1a").unwrap();
//! let phrase = mnemonic::entropy_to_mnemonic(&entropy, Language::English).unwrap();
//! assert_eq!(
//!     phrase.as_str(),
//!     "unusual onion shallow invite supply more bubble mistake over make bracket cry"
//! );
//!
//! let expanded = mnemonic::expand("unus onio shal invi supp more bubb mist over make brac cry", Language::English).unwrap();
//! assert_eq!(expanded, phrase.as_str());
//! ```

use std::borrow::Cow;

use core::fmt;
use core::str::FromStr;

use bip39::Mnemonic;
use rand_core::{OsRng, RngCore};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Minimum prefix length for unambiguous word expansion.
///
/// The English list is unique at four characters.
const MIN_PREFIX_LEN: usize = 4;

/// Wordlist language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English.
    #[default]
    English,
    /// French.
    French,
    /// Italian.
    Italian,
    /// Spanish.
    Spanish,
    /// Simplified Chinese.
    ChineseSimplified,
    /// Traditional Chinese.
    ChineseTraditional,
    /// Japanese.
    Japanese,
    /// Korean.
    Korean,
    /// Czech.
    Czech,
    /// Portuguese.
    Portuguese,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Self; 10] = [
        Self::English,
        Self::French,
        Self::Italian,
        Self::Spanish,
        Self::ChineseSimplified,
        Self::ChineseTraditional,
        Self::Japanese,
        Self::Korean,
        Self::Czech,
        Self::Portuguese,
    ];

    /// Get the snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::French => "french",
            Self::Italian => "italian",
            Self::Spanish => "spanish",
            Self::ChineseSimplified => "chinese_simplified",
            Self::ChineseTraditional => "chinese_traditional",
            Self::Japanese => "japanese",
            Self::Korean => "korean",
            Self::Czech => "czech",
            Self::Portuguese => "portuguese",
        }
    }

    const fn to_bip39(self) -> bip39::Language {
        match self {
            Self::English => bip39::Language::English,
            Self::French => bip39::Language::French,
            Self::Italian => bip39::Language::Italian,
            Self::Spanish => bip39::Language::Spanish,
            Self::ChineseSimplified => bip39::Language::SimplifiedChinese,
            Self::ChineseTraditional => bip39::Language::TraditionalChinese,
            Self::Japanese => bip39::Language::Japanese,
            Self::Korean => bip39::Language::Korean,
            Self::Czech => bip39::Language::Czech,
            Self::Portuguese => bip39::Language::Portuguese,
        }
    }

    const fn from_bip39(language: bip39::Language) -> Self {
        match language {
            bip39::Language::English => Self::English,
            bip39::Language::French => Self::French,
            bip39::Language::Italian => Self::Italian,
            bip39::Language::Spanish => Self::Spanish,
            bip39::Language::SimplifiedChinese => Self::ChineseSimplified,
            bip39::Language::TraditionalChinese => Self::ChineseTraditional,
            bip39::Language::Japanese => Self::Japanese,
            bip39::Language::Korean => Self::Korean,
            bip39::Language::Czech => Self::Czech,
            bip39::Language::Portuguese => Self::Portuguese,
        }
    }

    /// Word separator used when rendering a phrase.
    #[must_use]
    pub const fn separator(self) -> &'static str {
        match self {
            Self::Japanese => "\u{3000}",
            _ => " ",
        }
    }

    /// The 2048-word list.
    pub fn word_list(self) -> &'static [&'static str; 2048] {
        self.to_bip39().word_list()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|language| language.name() == lower)
            .ok_or_else(|| Error::invalid("language", format!("unknown language {s:?}")))
    }
}

/// Entropy strength in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Strength {
    /// 128 bits, 12 words.
    #[default]
    Bits128,
    /// 160 bits, 15 words.
    Bits160,
    /// 192 bits, 18 words.
    Bits192,
    /// 224 bits, 21 words.
    Bits224,
    /// 256 bits, 24 words.
    Bits256,
}

impl Strength {
    /// Every strength, weakest first.
    pub const ALL: [Self; 5] = [
        Self::Bits128,
        Self::Bits160,
        Self::Bits192,
        Self::Bits224,
        Self::Bits256,
    ];

    /// Entropy size in bits.
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    /// Entropy size in bytes.
    #[must_use]
    pub const fn entropy_len(self) -> usize {
        self.bits() / 8
    }

    /// Mnemonic word count.
    #[must_use]
    pub const fn words(self) -> usize {
        self.bits() * 33 / 32 / 11
    }

    /// Strength for a bit count.
    pub fn from_bits(bits: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.bits() == bits)
            .ok_or_else(|| Error::invalid("strength", format!("{bits} is not one of 128, 160, 192, 224, 256")))
    }

    /// Strength for an entropy length in bytes.
    pub fn from_entropy_len(len: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.entropy_len() == len)
            .ok_or_else(|| Error::invalid("entropy", format!("{len} bytes is not 16, 20, 24, 28 or 32")))
    }

    /// Strength for a word count.
    pub fn from_words(words: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.words() == words)
            .ok_or_else(|| Error::invalid("mnemonic", format!("{words} words is not 12, 15, 18, 21 or 24")))
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Random entropy from the OS generator.
pub fn generate_entropy(strength: Strength) -> Zeroizing<Vec<u8>> {
    let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_len()]);
    OsRng.fill_bytes(&mut entropy);
    entropy
}

/// Random mnemonic phrase.
pub fn generate_mnemonic(language: Language, strength: Strength) -> Result<Zeroizing<String>> {
    entropy_to_mnemonic(&generate_entropy(strength), language)
}

/// Whether `entropy` is hex of an accepted length.
pub fn is_entropy(entropy: &str) -> bool {
    hex::decode(entropy.trim()).is_ok_and(|bytes| Strength::from_entropy_len(bytes.len()).is_ok())
}

/// Mnemonic phrase for `entropy`.
///
/// Japanese phrases are joined with the ideographic space (U+3000).
pub fn entropy_to_mnemonic(entropy: &[u8], language: Language) -> Result<Zeroizing<String>> {
    Strength::from_entropy_len(entropy.len())?;
    let mnemonic = Mnemonic::from_entropy_in(language.to_bip39(), entropy)?;
    let words: Vec<&str> = mnemonic.words().collect();
    Ok(Zeroizing::new(words.join(language.separator())))
}

fn normalize(phrase: &str) -> Cow<'_, str> {
    let mut cow = Cow::Borrowed(phrase);
    Mnemonic::normalize_utf8_cow(&mut cow);
    cow
}

/// Wordlist of `phrase`.
///
/// Some lists share words (the two Chinese lists most of all). A phrase
/// that fits several resolves to the first whose checksum verifies.
fn detect(phrase: &str) -> Result<Language> {
    let normalized = normalize(phrase);
    match Mnemonic::language_of(&normalized) {
        Ok(language) => Ok(Language::from_bip39(language)),
        Err(bip39::Error::AmbiguousLanguages(candidates)) => candidates
            .iter()
            .find(|language| Mnemonic::parse_in_normalized(*language, &normalized).is_ok())
            .map(Language::from_bip39)
            .ok_or_else(|| Error::invalid("mnemonic", "checksum fails in every candidate wordlist")),
        Err(e) => Err(e.into()),
    }
}

fn parse(phrase: &str, language: Option<Language>) -> Result<Mnemonic> {
    let language = match language {
        Some(language) => language,
        None => detect(phrase)?,
    };
    Ok(Mnemonic::parse_in(language.to_bip39(), phrase)?)
}

/// Entropy bits of a parsed phrase, rebuilt from its word indices.
fn entropy_of(mnemonic: &Mnemonic) -> Zeroizing<Vec<u8>> {
    let len = mnemonic.word_count() * 11 * 32 / 33 / 8;
    let mut entropy = Zeroizing::new(Vec::with_capacity(len));
    let mut acc: u32 = 0;
    let mut pending = 0;

    for index in mnemonic.word_indices() {
        acc = (acc << 11) | index as u32;
        pending += 11;
        while pending >= 8 && entropy.len() < len {
            pending -= 8;
            entropy.push((acc >> pending) as u8);
        }
        acc &= (1 << pending) - 1;
    }
    entropy
}

/// Entropy encoded by `phrase`. The language is detected when `None`.
pub fn mnemonic_to_entropy(phrase: &str, language: Option<Language>) -> Result<Zeroizing<Vec<u8>>> {
    Ok(entropy_of(&parse(phrase, language)?))
}

/// Detect the wordlist a phrase is written in.
pub fn mnemonic_language(phrase: &str) -> Result<Language> {
    detect(phrase)
}

/// Whether `phrase` is a valid mnemonic, checksum included.
pub fn is_mnemonic(phrase: &str, language: Option<Language>) -> bool {
    parse(phrase, language).is_ok()
}

/// Word count of a valid phrase.
pub fn mnemonic_strength(phrase: &str, language: Option<Language>) -> Result<Strength> {
    Strength::from_words(parse(phrase, language)?.word_count())
}

/// 64-byte seed (PBKDF2-HMAC-SHA512, 2048 rounds, NFKD-normalized inputs).
///
/// The phrase is checked against `language`, or the detected one when `None`.
pub fn mnemonic_to_seed(
    phrase: &str,
    passphrase: &str,
    language: Option<Language>,
) -> Result<Zeroizing<[u8; 64]>> {
    Ok(Zeroizing::new(parse(phrase, language)?.to_seed(passphrase)))
}

/// Expand abbreviated words to full wordlist entries.
///
/// Exact words are kept. Other tokens must be a prefix of at least
/// four characters that matches exactly one word.
pub fn expand(phrase: &str, language: Language) -> Result<String> {
    let word_list = language.word_list();
    let words = phrase
        .split_whitespace()
        .map(|token| resolve_token(word_list, token))
        .collect::<Result<Vec<_>>>()?;
    Ok(words.join(language.separator()))
}

fn resolve_token(word_list: &'static [&'static str; 2048], token: &str) -> Result<&'static str> {
    if let Some(word) = word_list.iter().copied().find(|word| *word == token) {
        return Ok(word);
    }

    if token.chars().count() < MIN_PREFIX_LEN {
        return Err(Error::invalid(
            "mnemonic",
            format!("{token:?} is shorter than {MIN_PREFIX_LEN} characters"),
        ));
    }

    let mut matches = word_list.iter().copied().filter(|word| word.starts_with(token));
    match (matches.next(), matches.next()) {
        (Some(word), None) => Ok(word),
        (None, _) => Err(Error::invalid("mnemonic", format!("unknown word {token:?}"))),
        (Some(_), Some(_)) => Err(Error::invalid("mnemonic", format!("ambiguous prefix {token:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ENTROPY: [u8; 16] = hex!("ee535b143b0d9d1f87546f9df0d06b1a");
    const PHRASE: &str = "unusual onion shallow invite supply more bubble mistake over make bracket cry";

    mod codec_tests {
        use super::*;

        #[test]
        fn test_entropy_to_mnemonic() {
            let phrase = entropy_to_mnemonic(&ENTROPY, Language::English).unwrap();
            assert_eq!(phrase.as_str(), PHRASE);
            assert_eq!(
                mnemonic_to_entropy(PHRASE, Some(Language::English)).unwrap().as_slice(),
                ENTROPY
            );
        }

        #[test]
        fn test_seed_with_empty_passphrase() {
            let seed = mnemonic_to_seed(PHRASE, "", None).unwrap();
            assert_eq!(
                *seed,
                hex!(
                    "313a29e024ad78b0ce1d978c850c4e0284ec18caff25059449fd583e6f7aa265"
                    "f1c2968cb2e5867fc6d51ad2a40c72ee451f3b81a36d5f3dc4ea4e94a25c8f79"
                )
            );
        }

        #[test]
        fn test_passphrase_changes_seed() {
            let seed = mnemonic_to_seed(PHRASE, "talonlab", Some(Language::English)).unwrap();
            assert_eq!(seed[..16], hex!("ea17757208b72b9318e15527f4589abb"));
        }

        #[test]
        fn test_rejects_bad_entropy_lengths() {
            for len in [0, 4, 15, 17, 31, 33, 64] {
                assert!(
                    matches!(
                        entropy_to_mnemonic(&vec![1u8; len], Language::English),
                        Err(Error::InvalidInput { what: "entropy", .. })
                    ),
                    "{len} bytes should be rejected"
                );
            }
        }

        #[test]
        fn test_rejects_bad_checksum_word() {
            let bad = PHRASE.replace("cry", "abandon");
            assert!(!is_mnemonic(&bad, None));
            assert!(matches!(
                mnemonic_to_entropy(&bad, Some(Language::English)),
                Err(Error::InvalidInput { what: "mnemonic", .. })
            ));
        }

        #[test]
        fn test_rejects_unknown_word_and_count() {
            assert!(!is_mnemonic(&PHRASE.replace("onion", "onions"), None));
            assert!(!is_mnemonic("unusual onion shallow", None));
        }
    }

    mod language_tests {
        use super::*;

        #[test]
        fn test_detects_language() {
            assert_eq!(mnemonic_language(PHRASE).unwrap(), Language::English);

            let french = entropy_to_mnemonic(&hex!("50f002376c81c96e430b48f1fe71df57"), Language::French)
                .unwrap();
            assert_eq!(mnemonic_language(&french).unwrap(), Language::French);
            assert!(is_mnemonic(&french, Some(Language::French)));
        }

        #[test]
        fn test_every_language_round_trips() {
            for language in Language::ALL {
                let phrase = entropy_to_mnemonic(&ENTROPY, language).unwrap();
                let entropy = mnemonic_to_entropy(&phrase, Some(language)).unwrap();
                assert_eq!(entropy.as_slice(), ENTROPY, "{language}");
            }
        }

        #[test]
        fn test_shared_chinese_words() {
            let zero = [0u8; 16];
            let phrase = entropy_to_mnemonic(&zero, Language::ChineseSimplified).unwrap();
            assert_eq!(phrase.as_str(), "的 的 的 的 的 的 的 的 的 的 的 在");

            for language in [Some(Language::ChineseSimplified), Some(Language::ChineseTraditional), None] {
                assert_eq!(mnemonic_to_entropy(&phrase, language).unwrap().as_slice(), zero);
                assert_eq!(mnemonic_strength(&phrase, language).unwrap(), Strength::Bits128);
            }
            assert_eq!(mnemonic_language(&phrase).unwrap(), Language::ChineseSimplified);

            let seed = mnemonic_to_seed(&phrase, "", Some(Language::ChineseTraditional)).unwrap();
            assert_eq!(
                *seed,
                hex!(
                    "c015b86e4b208402bb0bdd0febb746708b869bb6e433cb227fd66d444f3ccdc3"
                    "60fee9ca9271014c2a684df380fcc40bd80a37eaa41a8061a52a18d319cdd899"
                )
            );
        }

        #[test]
        fn test_seed_checks_given_language() {
            assert!(mnemonic_to_seed(PHRASE, "", Some(Language::French)).is_err());
        }

        #[test]
        fn test_japanese_ideographic_space() {
            let phrase = entropy_to_mnemonic(&ENTROPY, Language::Japanese).unwrap();
            assert_eq!(phrase.split('\u{3000}').count(), 12);
            assert!(!phrase.contains(' '));

            let ascii = phrase.replace('\u{3000}', " ");
            assert_eq!(
                *mnemonic_to_seed(&phrase, "", None).unwrap(),
                *mnemonic_to_seed(&ascii, "", None).unwrap()
            );
            assert_eq!(mnemonic_language(&phrase).unwrap(), Language::Japanese);
            assert_eq!(expand(&ascii, Language::Japanese).unwrap(), phrase.as_str());
        }

        #[test]
        fn test_parse_names() {
            assert_eq!("Chinese-Simplified".parse::<Language>().unwrap(), Language::ChineseSimplified);
            assert_eq!("korean".parse::<Language>().unwrap(), Language::Korean);
            assert!("klingon".parse::<Language>().is_err());
        }
    }

    mod strength_tests {
        use super::*;

        #[test]
        fn test_word_counts() {
            let words: Vec<_> = Strength::ALL.into_iter().map(Strength::words).collect();
            assert_eq!(words, [12, 15, 18, 21, 24]);
        }

        #[test]
        fn test_lookups() {
            assert_eq!(Strength::from_bits(192).unwrap(), Strength::Bits192);
            assert_eq!(Strength::from_entropy_len(32).unwrap(), Strength::Bits256);
            assert_eq!(Strength::from_words(15).unwrap(), Strength::Bits160);
            assert!(Strength::from_bits(100).is_err());
        }

        #[test]
        fn test_generated_entropy_and_mnemonic() {
            for strength in Strength::ALL {
                let entropy = generate_entropy(strength);
                assert_eq!(entropy.len(), strength.entropy_len());
                assert!(is_entropy(&hex::encode(&*entropy)));

                let phrase = generate_mnemonic(Language::English, strength).unwrap();
                assert_eq!(mnemonic_strength(&phrase, None).unwrap(), strength);
            }
        }

        #[test]
        fn test_is_entropy() {
            assert!(is_entropy("ee535b143b0d9d1f87546f9df0d06b1a"));
            assert!(!is_entropy("ee535b"));
            assert!(!is_entropy("not hex"));
        }
    }

    mod expand_tests {
        use super::*;

        #[test]
        fn test_full_words_unchanged() {
            assert_eq!(expand(PHRASE, Language::English).unwrap(), PHRASE);
        }

        #[test]
        fn test_prefix_expansion() {
            let abbreviated = "unus onio shal invi supp more bubb mist over make brac cry";
            assert_eq!(expand(abbreviated, Language::English).unwrap(), PHRASE);
        }

        #[test]
        fn test_short_or_ambiguous_prefix() {
            assert!(expand("ab", Language::English).is_err());
            assert!(expand("zzzz", Language::English).is_err());
        }
    }
}
