//! `list`: print the supported tables.

use clap::{Args, Subcommand};
use colored::Colorize;
use hdwallet::cryptocurrencies::all;
use hdwallet::{Language, Strength};

/// List supported cryptocurrencies, languages or strengths.
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    command: ListSubcommand,
}

#[derive(Subcommand)]
enum ListSubcommand {
    /// Supported cryptocurrencies and their parameters.
    Cryptocurrencies,
    /// Mnemonic languages.
    Languages,
    /// Entropy strengths and word counts.
    Strengths,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self) {
        match self.command {
            ListSubcommand::Cryptocurrencies => print_cryptocurrencies(),
            ListSubcommand::Languages => print_languages(),
            ListSubcommand::Strengths => print_strengths(),
        }
    }
}

#[rustfmt::skip]
fn print_cryptocurrencies() {
    println!(
        "{:<20} {:<10} {:<8} {:<10} {:<18} {}",
        "Cryptocurrency".cyan().bold(), "Symbol".cyan().bold(), "Network".cyan().bold(),
        "Coin Type".cyan().bold(), "Default Path".cyan().bold(), "Segwit".cyan().bold(),
    );
    for crypto in all() {
        println!(
            "{:<20} {:<10} {:<8} {:<10} {:<18} {}",
            crypto.name,
            crypto.symbol,
            crypto.network.name(),
            crypto.coin_type.to_string(),
            crypto.default_path,
            crypto.segwit_hrp.unwrap_or("-"),
        );
    }
}

fn print_languages() {
    println!("{}", "Language".cyan().bold());
    for language in Language::ALL {
        println!("{language}");
    }
}

fn print_strengths() {
    println!("{:<10} {}", "Strength".cyan().bold(), "Words".cyan().bold());
    for strength in Strength::ALL {
        println!("{:<10} {}", strength.bits(), strength.words());
    }
}
