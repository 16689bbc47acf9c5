//! `addresses`: selected summary fields over a range of indices.

use anyhow::{anyhow, bail};
use clap::Args;
use serde_json::Value;

use super::KeySource;

/// Print selected fields for a range of address indices.
#[derive(Args)]
pub struct AddressesCommand {
    #[command(flatten)]
    source: KeySource,

    /// First address index.
    #[arg(long, default_value = "0")]
    start_index: u32,

    /// One past the last address index.
    #[arg(long, default_value = "20")]
    end_index: u32,

    /// Derive hardened address indices.
    #[arg(long)]
    hardened: bool,

    /// Comma-separated summary keys; nested keys use `parent:child`.
    #[arg(long, default_value = "path,addresses:p2pkh,public_key,wif")]
    show: String,
}

impl AddressesCommand {
    /// Execute the addresses command.
    pub fn execute(self) -> anyhow::Result<()> {
        if !self.source.is_derivable() {
            bail!("addresses need a derivable key source");
        }
        if self.start_index >= self.end_index {
            bail!(
                "start index {} must be below end index {}",
                self.start_index,
                self.end_index
            );
        }

        let mut base = self.source.load()?;
        base.from_path(&self.source.derivation(None)?)?;

        let keys: Vec<&str> = self.show.split(',').map(str::trim).collect();
        for index in self.start_index..self.end_index {
            let mut wallet = base.clone();
            wallet.from_index(index, self.hardened)?;
            let summary = serde_json::to_value(wallet.dumps()?)?;

            let fields = keys
                .iter()
                .map(|key| lookup(&summary, key))
                .collect::<anyhow::Result<Vec<_>>>()?;
            println!("{}", fields.join(" "));
        }
        Ok(())
    }
}

/// Resolve a `parent:child` key against the summary.
fn lookup(summary: &Value, key: &str) -> anyhow::Result<String> {
    let value = key
        .split(':')
        .try_fold(summary, |value, part| value.get(part))
        .ok_or_else(|| anyhow!("unknown summary key {key:?}"))?;

    Ok(match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
