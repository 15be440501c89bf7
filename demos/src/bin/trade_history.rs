//! Demo 2: Trade History
//!
//! Showcases: paginated TradesHistory retrieval with throttling
//!
//! Run: cargo run --bin trade_history -- [days]

use chrono::{Duration, TimeZone, Utc};
use colored::*;
use kraken_rest::{Credentials, HistoryWindow, KrakenRestClient};
use tracing_subscriber::EnvFilter;

const DEFAULT_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let days = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<i64>())
        .transpose()?
        .unwrap_or(DEFAULT_DAYS);

    println!("{}", "═".repeat(70).cyan());
    println!("{}", "  TRADE HISTORY".cyan().bold());
    println!(
        "{}",
        format!("  Kraken REST Demo - last {} days", days).cyan()
    );
    println!("{}", "═".repeat(70).cyan());
    println!();

    let client = KrakenRestClient::new(Credentials::from_env()?)?;
    let window = HistoryWindow::since(Utc::now() - Duration::days(days));

    println!("{} Fetching pages (large histories are throttled)...", "✓".green());
    let trades = client.trade_history(window).await?;

    let mut trades: Vec<_> = trades.into_iter().collect();
    trades.sort_by(|a, b| a.1.time.total_cmp(&b.1.time));

    println!(
        "\n  {:<20}  {:<10}  {:<5}  {:>14}  {:>14}",
        "TIME".white().bold(),
        "PAIR".white().bold(),
        "SIDE".white().bold(),
        "VOLUME".white().bold(),
        "PRICE".white().bold()
    );
    println!("  {}", "─".repeat(70));

    for (_, trade) in &trades {
        let time = Utc
            .timestamp_opt(trade.time as i64, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        let side = if trade.side == "buy" {
            trade.side.green()
        } else {
            trade.side.red()
        };
        println!(
            "  {:<20}  {:<10}  {:<5}  {:>14}  {:>14}",
            time, trade.pair, side, trade.vol, trade.price
        );
    }

    println!("\n{} {} trades", "✓".green(), trades.len());
    Ok(())
}
