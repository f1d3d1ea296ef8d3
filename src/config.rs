//! Client configuration.
//!
//! A [`ClientConfig`] is fixed once the [`Client`](crate::Client) is built and is
//! shared read-only by every call made through that client.

use std::time::Duration;

/// Default overall timeout for a single call, retries included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_COUNT: usize = 3;

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = "GameHub-Client/1.0";

/// Default backoff unit. The wait after attempt `i` is `(i + 1)` units.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Settings for a GameHub client.
///
/// # Examples
///
/// ```
/// use gamehub_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_base_url("https://hub.example.com")
///     .with_game_id("snake")
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(10))
///     .with_retry_count(2);
///
/// assert_eq!(config.retry_count, 2);
/// assert_eq!(config.user_agent, "GameHub-Client/1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Game identifier sent on privileged requests and in coin/score payloads.
    pub game_id: String,
    /// Service API key sent on privileged requests.
    pub api_key: String,
    /// Deadline for a whole call, including retries and backoff.
    pub timeout: Duration,
    /// Retries after the first attempt; a call makes at most `retry_count + 1` attempts.
    pub retry_count: usize,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Length of one backoff step.
    pub backoff_unit: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            game_id: String::new(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
            retry_count: DEFAULT_RETRY_COUNT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl ClientConfig {
    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the game identifier.
    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    /// Sets the service API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the overall call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of retries.
    pub fn with_retry_count(mut self, retry_count: usize) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the backoff unit.
    pub fn with_backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.backoff_unit = backoff_unit;
        self
    }
}
