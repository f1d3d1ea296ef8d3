//! Walks through the GameHub endpoints against a live hub.
//!
//! Run with:
//! `GAMEHUB_URL=... GAMEHUB_GAME_ID=... GAMEHUB_API_KEY=... GAMEHUB_SESSION=... cargo run --example basic`

use gamehub_client::{ApiError, Client, Error};
use std::env;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("gamehub_client=debug,basic=info")
        .init();

    let var = |name: &str| env::var(name).unwrap_or_default();

    let client = Client::builder()
        .base_url(var("GAMEHUB_URL"))
        .game_id(var("GAMEHUB_GAME_ID"))
        .api_key(var("GAMEHUB_API_KEY"))
        .timeout(Duration::from_secs(15))
        .retry_count(2)
        .build()?;

    // Ctrl-C aborts whatever call is in flight.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    println!("=== Current user ===");
    let user = client.get_user(&cancel, &var("GAMEHUB_SESSION")).await?;
    println!("{} (id {}), {} coins", user.display_name, user.id, user.global_coins);

    println!("=== Entry fee ===");
    match client
        .deduct_coins(&cancel, user.id, 10, "demo entry fee", "demo-1")
        .await
    {
        Ok(()) => {
            client.report_score(&cancel, user.id, 1234).await?;
            println!("Score reported");
        }
        Err(Error::Api(ApiError::InsufficientCoins)) => println!("Not enough coins to play"),
        Err(e) => return Err(e),
    }
    println!("Balance now: {}", client.get_user_coins(&cancel, user.id).await?);

    println!("=== Games ===");
    for game in client.get_available_games(&cancel).await? {
        println!("{:<12} {:<10} {}", game.id, game.status, game.name);
    }

    println!("=== Top 10 ===");
    for entry in client.get_global_rankings(&cancel, 10, 0).await? {
        println!("#{:<3} {:<20} {}", entry.rank, entry.display_name, entry.score);
    }

    Ok(())
}
