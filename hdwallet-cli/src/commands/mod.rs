//! CLI command definitions and handlers.

mod addresses;
mod generate;
mod list;

pub use addresses::AddressesCommand;
use clap::{Args, Parser, Subcommand};
pub use generate::GenerateCommand;
use hdwallet::mnemonic::generate_mnemonic;
use hdwallet::{
    ChildIndex, Derivation, DerivationPath, HdWallet, Language, Semantic, Standard, Strength,
    Template, get_cryptocurrency,
};
pub use list::ListCommand;
use tracing::debug;

/// hdwallet - BIP32 wallet key and address derivation.
#[derive(Parser)]
#[command(name = "hdwallet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the full summary of one derived key.
    #[command(alias = "g")]
    Generate(GenerateCommand),

    /// Print selected fields for a range of address indices.
    #[command(alias = "a")]
    Addresses(AddressesCommand),

    /// List supported cryptocurrencies, languages or strengths.
    #[command(alias = "l")]
    List(ListCommand),
}

/// Key source and derivation options shared by `generate` and `addresses`.
#[derive(Args)]
pub struct KeySource {
    /// Cryptocurrency ticker symbol.
    #[arg(short, long, default_value = "BTC")]
    symbol: String,

    /// Entropy strength in bits when generating a new mnemonic.
    #[arg(long, default_value = "128")]
    strength: usize,

    /// Load from entropy hex.
    #[arg(short, long)]
    entropy: Option<String>,

    /// Load from a mnemonic phrase.
    #[arg(short, long)]
    mnemonic: Option<String>,

    /// Mnemonic language.
    #[arg(short, long, default_value = "english")]
    language: Language,

    /// BIP39 passphrase.
    #[arg(long)]
    passphrase: Option<String>,

    /// Load from seed hex.
    #[arg(long)]
    seed: Option<String>,

    /// Load from an extended private key.
    #[arg(long)]
    xprivate_key: Option<String>,

    /// Load from an extended public key.
    #[arg(long)]
    xpublic_key: Option<String>,

    /// Only accept root extended keys.
    #[arg(long)]
    strict: bool,

    /// Load from a WIF private key (not derivable).
    #[arg(long)]
    wif: Option<String>,

    /// Load from private key hex (not derivable).
    #[arg(long)]
    private_key: Option<String>,

    /// Load from public key hex (not derivable).
    #[arg(long)]
    public_key: Option<String>,

    /// Derivation path, overrides the BIP44 template.
    #[arg(short, long)]
    path: Option<String>,

    /// BIP44 account index.
    #[arg(long, default_value = "0")]
    account: u32,

    /// Use the change chain.
    #[arg(long)]
    change: bool,

    /// Semantic for extended keys.
    #[arg(long, default_value = "p2pkh")]
    semantic: Semantic,
}

impl KeySource {
    /// Build a wallet from whichever key source was given.
    ///
    /// With no source, a fresh mnemonic is generated.
    fn load(&self) -> anyhow::Result<HdWallet> {
        let mut wallet = HdWallet::with_options(&self.symbol, Some(self.semantic), false)?;
        let passphrase = self.passphrase.as_deref().unwrap_or_default();

        if let Some(entropy) = &self.entropy {
            wallet.from_entropy(entropy, self.language, passphrase)?;
        } else if let Some(mnemonic) = &self.mnemonic {
            wallet.from_mnemonic(mnemonic, None, passphrase)?;
        } else if let Some(seed) = &self.seed {
            wallet.from_seed(seed)?;
        } else if let Some(xprv) = &self.xprivate_key {
            wallet.from_xprivate_key(xprv, self.strict)?;
        } else if let Some(xpub) = &self.xpublic_key {
            wallet.from_xpublic_key(xpub, self.strict)?;
        } else if let Some(private_key) = &self.private_key {
            wallet.from_private_key(private_key)?;
        } else if let Some(public_key) = &self.public_key {
            wallet.from_public_key(public_key)?;
        } else if let Some(wif) = &self.wif {
            wallet.from_wif(wif)?;
        } else {
            let strength = Strength::from_bits(self.strength)?;
            let mnemonic = generate_mnemonic(self.language, strength)?;
            debug!(%strength, language = %self.language, "generated mnemonic");
            wallet.from_mnemonic(&mnemonic, Some(self.language), passphrase)?;
        }
        Ok(wallet)
    }

    /// Whether the loaded key has a chain code to derive from.
    fn is_derivable(&self) -> bool {
        self.wif.is_none() && self.private_key.is_none() && self.public_key.is_none()
    }

    /// Explicit `--path`, or the BIP44 template down to `address`.
    ///
    /// Public-key imports get an all-normal template.
    fn derivation(&self, address: Option<u32>) -> anyhow::Result<Derivation> {
        if let Some(path) = &self.path {
            return Ok(path.parse()?);
        }

        let cryptocurrency = get_cryptocurrency(&self.symbol)?;
        let hardened = self.xpublic_key.is_none();
        let coin_type = cryptocurrency.coin_type;

        let template = Template::for_cryptocurrency(Standard::Bip32, cryptocurrency)
            .purpose(ChildIndex::new(44, hardened)?)?
            .coin_type(ChildIndex::new(
                coin_type.index(),
                hardened && coin_type.is_hardened(),
            )?)
            .account(ChildIndex::new(self.account, hardened)?)
            .change(ChildIndex::normal(u32::from(self.change))?);

        let path = match address {
            Some(index) => template.address(ChildIndex::normal(index)?).path(),
            // Batch mode stops at the change level.
            None => DerivationPath::new(template.path().indices()[..4].to_vec()),
        };
        Ok(Derivation::raw(path))
    }
}
