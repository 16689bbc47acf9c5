//! `generate`: one derived key as a JSON summary.

use clap::Args;

use super::KeySource;

/// Print the full summary of one derived key.
#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    source: KeySource,

    /// BIP44 address index.
    #[arg(long, default_value = "0")]
    address: u32,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub fn execute(self) -> anyhow::Result<()> {
        let mut wallet = self.source.load()?;
        if self.source.is_derivable() {
            wallet.from_path(&self.source.derivation(Some(self.address))?)?;
        }

        println!("{}", serde_json::to_string_pretty(&wallet.dumps()?)?);
        Ok(())
    }
}
