//! # gamehub-client - A typed client for the GameHub API
//!
//! Typed access to the GameHub user, coin balance, score reporting and ranking
//! endpoints over HTTP/JSON, built on top of `reqwest`.
//!
//! Every GameHub response is wrapped in an envelope
//! `{"success": bool, "data": ..., "error": "...", "message": "..."}`. The client
//! unwraps it, returning either the typed `data` or a typed [`ApiError`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use gamehub_client::{ApiError, Client, Error};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::with_credentials("https://hub.example.com", "snake", "secret")?;
//!     let cancel = CancellationToken::new();
//!
//!     let user = client.get_user(&cancel, "session-token").await?;
//!     println!("Hello {}", user.display_name);
//!
//!     match client.deduct_coins(&cancel, user.id, 100, "entry fee", "match-77").await {
//!         Ok(()) => client.report_score(&cancel, user.id, 4200).await?,
//!         Err(Error::Api(ApiError::InsufficientCoins)) => println!("Not enough coins"),
//!         Err(e) => return Err(e),
//!     }
//!
//!     for entry in client.get_global_rankings(&cancel, 10, 0).await? {
//!         println!("#{} {} {}", entry.rank, entry.display_name, entry.score);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Retries
//!
//! Transport errors and 5xx responses are retried up to `retry_count` times
//! (default 3), waiting one backoff unit (default one second) after the first
//! attempt, two after the second, and so on. Responses below 500, 4xx included,
//! are never retried. The configured timeout (default 30 seconds) bounds the
//! whole call, and cancelling the call's [`CancellationToken`] stops it at once
//! with [`Error::Cancelled`].
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod client;
pub mod config;
pub mod envelope;
mod error;
pub mod models;
pub mod request;
mod response;
pub mod retry;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, Error, Result};
pub use response::Response;
pub use retry::{RetryPolicy, Sleeper};
