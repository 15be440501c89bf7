//! Demo 1: Account Balances
//!
//! Showcases: credential loading, signed private calls, balance helpers
//!
//! Run: KRAKEN_API_KEY=... KRAKEN_PRIVATE_KEY=... cargo run --bin balances

use colored::*;
use kraken_rest::{Credentials, KrakenRestClient};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("{}", "═".repeat(55).cyan());
    println!("{}", "  ACCOUNT BALANCES".cyan().bold());
    println!("{}", "  Kraken REST Demo - Balance / BalanceEx".cyan());
    println!("{}", "═".repeat(55).cyan());
    println!();

    let client = KrakenRestClient::new(Credentials::from_env()?)?;
    println!("{} Credentials loaded", "✓".green());

    let balances = client.balances().await?;
    let extended = client.extended_balances().await?;

    let mut rows: Vec<(String, Decimal)> = balances.non_zero().into_iter().collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    if rows.is_empty() {
        println!("{} No non-zero balances", "!".yellow());
        return Ok(());
    }

    println!(
        "\n  {:<10}  {:>20}  {:>20}",
        "ASSET".white().bold(),
        "BALANCE".white().bold(),
        "AVAILABLE".white().bold()
    );
    println!("  {}", "─".repeat(54));

    for (asset, amount) in rows {
        let available = extended
            .get(&asset)
            .and_then(|b| b.available())
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10}  {:>20}  {:>20}",
            asset.yellow(),
            amount.to_string(),
            available.green()
        );
    }

    Ok(())
}
