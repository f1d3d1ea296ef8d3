//! GameHub API client.
//!
//! The [`Client`] type is the main entry point. Each endpoint method builds a
//! [`RequestDescriptor`], sends it with bounded retry, unwraps the response
//! envelope and returns the typed payload. Use [`ClientBuilder`] to configure
//! and create clients.

use crate::{
    config::ClientConfig,
    envelope::Envelope,
    models::{CoinBalance, CoinMutation, Game, RankingEntry, ScoreReport, User},
    request::{RequestDescriptor, API_KEY_HEADER, GAME_ID_HEADER},
    retry::{RetryPolicy, Sleeper, TokioSleeper},
    Error, Response, Result,
};
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// A client for the GameHub API.
///
/// Cloning is cheap; clones share configuration and the connection pool, and
/// the client may be used from many tasks at once.
///
/// Every call takes a [`CancellationToken`]. Cancelling it aborts the in-flight
/// attempt or pending backoff and the call fails with [`Error::Cancelled`].
/// The configured timeout bounds each call as a whole, retries included.
///
/// # Examples
///
/// ```no_run
/// use gamehub_client::Client;
/// use tokio_util::sync::CancellationToken;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), gamehub_client::Error> {
/// let client = Client::builder()
///     .base_url("https://hub.example.com")
///     .game_id("snake")
///     .api_key("secret")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let cancel = CancellationToken::new();
/// let balance = client.get_user_coins(&cancel, 42).await?;
/// if balance >= 100 {
///     client.deduct_coins(&cancel, 42, 100, "entry fee", "match-1").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    config: ClientConfig,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

/// Why an attempt is eligible for retry.
enum TransientFailure {
    Status(reqwest::Response),
    Transport(reqwest::Error),
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or invalid.
    pub fn new(config: ClientConfig) -> Result<Client> {
        ClientBuilder::new().config(config).build()
    }

    /// Creates a client with default settings and the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or invalid.
    pub fn with_credentials(
        base_url: impl Into<String>,
        game_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Client> {
        ClientBuilder::new()
            .base_url(base_url)
            .game_id(game_id)
            .api_key(api_key)
            .build()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Builds a request for `path`, serializing `body` as JSON if present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if the body cannot be serialized.
    pub fn new_request<B>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: Option<&B>,
    ) -> Result<RequestDescriptor>
    where
        B: Serialize + ?Sized,
    {
        let request = RequestDescriptor::new(method, path);
        match body {
            Some(body) => request.with_json(body),
            None => Ok(request),
        }
    }

    /// Builds a request carrying the service API key and game identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized or the credentials are
    /// not valid header values.
    pub fn new_privileged_request<B>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: Option<&B>,
    ) -> Result<RequestDescriptor>
    where
        B: Serialize + ?Sized,
    {
        self.new_request(method, path, body)?
            .with_header(API_KEY_HEADER, &self.inner.config.api_key)?
            .with_header(GAME_ID_HEADER, &self.inner.config.game_id)
    }

    /// Sends a request and deserializes the envelope's `data` into `T`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gamehub_client::{models::UserRanking, Client};
    /// use http::Method;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # async fn example() -> Result<(), gamehub_client::Error> {
    /// let client = Client::with_credentials("https://hub.example.com", "snake", "secret")?;
    /// let request = client.new_request::<()>(Method::GET, "/api/v1/rankings/me", None)?
    ///     .with_bearer("session-token")?;
    ///
    /// let response = client.call::<UserRanking>(&CancellationToken::new(), request).await?;
    /// println!("Rank {} after {} attempts", response.global_rank, response.attempts);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T>(
        &self,
        cancel: &CancellationToken,
        request: RequestDescriptor,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let Response {
            data: envelope,
            status,
            latency,
            attempts,
        } = self.execute(cancel, &request).await?;

        let data = envelope.into_data(status)?;
        Ok(Response::new(data, status, latency, attempts))
    }

    /// Sends a request whose successful response carries nothing of interest.
    pub async fn call_unit(
        &self,
        cancel: &CancellationToken,
        request: RequestDescriptor,
    ) -> Result<Response<()>> {
        let response = self.execute(cancel, &request).await?;
        Ok(response.map(|_| ()))
    }

    /// Runs the whole call under the caller's token and the configured deadline.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        request: &RequestDescriptor,
    ) -> Result<Response<Envelope>> {
        let url = self.resolve_url(&request.path)?;
        let timeout = self.inner.config.timeout;

        let work = async {
            // Zero disables the deadline.
            if timeout.is_zero() {
                return self.exchange(cancel, request, &url).await;
            }
            match tokio::time::timeout(timeout, self.exchange(cancel, request, &url)).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        timeout_ms = timeout.as_millis(),
                        "Request timed out"
                    );
                    Err(Error::Timeout)
                }
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = work => result,
        }
    }

    /// Sends with retry, then reads and checks the envelope.
    async fn exchange(
        &self,
        cancel: &CancellationToken,
        request: &RequestDescriptor,
        url: &Url,
    ) -> Result<Response<Envelope>> {
        let start_time = Instant::now();
        let (response, attempts) = self.dispatch(cancel, request, url).await?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|source| Error::Network { attempts, source })?;
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        let envelope = Envelope::decode(&raw_body, status)?;
        if !envelope.success {
            log_failure(status, envelope.error.as_deref().unwrap_or_default());
        }
        let envelope = envelope.check(status)?;

        Ok(Response::new(envelope, status, latency, attempts))
    }

    /// Attempts the request up to `retry_count + 1` times.
    ///
    /// Returns the first response below 500, or, once attempts run out, the last
    /// 5xx response or transport error.
    async fn dispatch(
        &self,
        cancel: &CancellationToken,
        request: &RequestDescriptor,
        url: &Url,
    ) -> Result<(reqwest::Response, usize)> {
        let policy = self.inner.retry_policy;
        let mut attempt_index = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let attempts = attempt_index + 1;
            let failure = match self.send_once(request, url, attempts).await {
                Ok(response) if !RetryPolicy::is_transient_status(response.status()) => {
                    return Ok((response, attempts));
                }
                Ok(response) => {
                    tracing::warn!(
                        status = response.status().as_u16(),
                        attempt = attempts,
                        method = %request.method,
                        path = %request.path,
                        "Server error (5xx)"
                    );
                    TransientFailure::Status(response)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempts,
                        method = %request.method,
                        path = %request.path,
                        "Request failed"
                    );
                    TransientFailure::Transport(e)
                }
            };

            let Some(delay) = policy.delay_after(attempt_index) else {
                tracing::warn!(attempts = attempts, path = %request.path, "Retries exhausted");
                return match failure {
                    TransientFailure::Status(response) => Ok((response, attempts)),
                    TransientFailure::Transport(source) => {
                        Err(Error::Network { attempts, source })
                    }
                };
            };
            drop(failure);

            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            tracing::info!(
                delay_ms = delay.as_millis(),
                attempt = attempts,
                "Retrying request after delay"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = self.inner.sleeper.sleep(delay) => {}
            }

            attempt_index += 1;
        }
    }

    /// Executes a single attempt.
    async fn send_once(
        &self,
        request: &RequestDescriptor,
        url: &Url,
        attempt: usize,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        tracing::debug!(
            method = %request.method,
            url = %url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let mut builder = self
            .inner
            .http_client
            .request(request.method.clone(), url.clone());

        for (name, value) in &self.inner.default_headers {
            builder = builder.header(name, value);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        builder.send().await
    }

    fn resolve_url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}", self.inner.config.base_url, path))?)
    }

    /// Fetches the user behind a session token.
    pub async fn get_user(&self, cancel: &CancellationToken, session_token: &str) -> Result<User> {
        let request = self
            .new_request::<()>(Method::GET, "/api/v1/auth/me", None)?
            .with_bearer(session_token)?;

        let response = self.call::<Option<User>>(cancel, request).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Fetches a user's coin balance. Privileged.
    pub async fn get_user_coins(&self, cancel: &CancellationToken, user_id: i64) -> Result<i64> {
        let path = format!("/api/v1/internal/users/{}/coins", user_id);
        let request = self.new_privileged_request::<()>(Method::GET, path, None)?;

        let response = self.call::<Option<CoinBalance>>(cancel, request).await?;
        Ok(response.data.unwrap_or_default().balance)
    }

    /// Deducts coins from a user's balance. Privileged.
    ///
    /// Fails with [`ApiError::InsufficientCoins`](crate::ApiError::InsufficientCoins)
    /// when the balance is too low.
    pub async fn deduct_coins(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        amount: i64,
        reason: &str,
        reference_id: &str,
    ) -> Result<()> {
        let path = "/api/v1/internal/coins/deduct";
        self.mutate_coins(cancel, path, user_id, amount, reason, reference_id)
            .await
    }

    /// Adds coins to a user's balance. Privileged.
    pub async fn add_coins(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        amount: i64,
        reason: &str,
        reference_id: &str,
    ) -> Result<()> {
        let path = "/api/v1/internal/coins/add";
        self.mutate_coins(cancel, path, user_id, amount, reason, reference_id)
            .await
    }

    async fn mutate_coins(
        &self,
        cancel: &CancellationToken,
        path: &str,
        user_id: i64,
        amount: i64,
        reason: &str,
        reference_id: &str,
    ) -> Result<()> {
        let body = CoinMutation {
            user_id,
            amount,
            game_id: &self.inner.config.game_id,
            reason,
            reference_id,
        };
        let request = self.new_privileged_request(Method::POST, path, Some(&body))?;

        self.call_unit(cancel, request).await?;
        Ok(())
    }

    /// Reports a score for the configured game. Privileged.
    pub async fn report_score(
        &self,
        cancel: &CancellationToken,
        user_id: i64,
        score: i64,
    ) -> Result<()> {
        let body = ScoreReport {
            user_id,
            game_id: &self.inner.config.game_id,
            score,
        };
        let path = "/api/v1/internal/games/report-score";
        let request = self.new_privileged_request(Method::POST, path, Some(&body))?;

        self.call_unit(cancel, request).await?;
        Ok(())
    }

    /// Lists the games available on the hub.
    pub async fn get_available_games(&self, cancel: &CancellationToken) -> Result<Vec<Game>> {
        let request = self.new_request::<()>(Method::GET, "/api/v1/games", None)?;

        let response = self.call::<Option<Vec<Game>>>(cancel, request).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Fetches a page of the global leaderboard.
    pub async fn get_global_rankings(
        &self,
        cancel: &CancellationToken,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RankingEntry>> {
        let path = format!("/api/v1/rankings/global?limit={}&offset={}", limit, offset);
        let request = self.new_request::<()>(Method::GET, path, None)?;

        let response = self.call::<Option<Vec<RankingEntry>>>(cancel, request).await?;
        Ok(response.data.unwrap_or_default())
    }
}

fn log_failure(status: StatusCode, message: &str) {
    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), error = %message, "Server reported failure");
    } else {
        tracing::error!(status = status.as_u16(), error = %message, "Request rejected");
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use gamehub_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), gamehub_client::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://hub.example.com")
///     .game_id("snake")
///     .api_key("secret")
///     .retry_count(5)
///     .user_agent("snake-server/2.1")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            sleeper: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the base URL for all requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Sets the game identifier.
    pub fn game_id(mut self, game_id: impl Into<String>) -> Self {
        self.config.game_id = game_id.into();
        self
    }

    /// Sets the service API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Sets the overall call timeout. Zero disables it.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets how many times a transient failure is retried.
    pub fn retry_count(mut self, retry_count: usize) -> Self {
        self.config.retry_count = retry_count;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets the backoff unit.
    pub fn backoff_unit(mut self, backoff_unit: Duration) -> Self {
        self.config.backoff_unit = backoff_unit;
        self
    }

    /// Sets what waits between retries. Defaults to [`TokioSleeper`].
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided, the base URL does not
    /// parse, the user agent is not a valid header value, or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<Client> {
        let mut config = self.config;

        if config.base_url.is_empty() {
            return Err(Error::ConfigurationError("Base URL is required".to_string()));
        }
        Url::parse(&config.base_url)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let user_agent = HeaderValue::try_from(config.user_agent.as_str())
            .map_err(|e| Error::ConfigurationError(format!("Invalid user agent: {}", e)))?;
        default_headers.insert(header::USER_AGENT, user_agent);

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        let retry_policy = RetryPolicy::new(config.retry_count, config.backoff_unit);
        let sleeper = self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper));

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                config,
                default_headers,
                retry_policy,
                sleeper,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::with_credentials("https://hub.example.com/", "snake", "secret").unwrap()
    }

    #[test]
    fn test_build_requires_base_url() {
        let err = Client::builder().build().err().unwrap();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_build_rejects_bad_base_url() {
        let err = Client::builder().base_url("not a url").build().err().unwrap();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_build_rejects_bad_user_agent() {
        let err = Client::builder()
            .base_url("https://hub.example.com")
            .user_agent("bad\r\nagent")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }

    #[test]
    fn test_resolve_url_keeps_query() {
        let url = client()
            .resolve_url("/api/v1/rankings/global?limit=10&offset=20")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://hub.example.com/api/v1/rankings/global?limit=10&offset=20"
        );
    }

    #[test]
    fn test_privileged_request_headers() {
        let request = client()
            .new_privileged_request::<()>(Method::GET, "/api/v1/internal/users/1/coins", None)
            .unwrap();

        assert_eq!(request.headers[API_KEY_HEADER], "secret");
        assert_eq!(request.headers[GAME_ID_HEADER], "snake");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_plain_request_has_no_credentials() {
        let request = client()
            .new_request(Method::POST, "/x", Some(&serde_json::json!({"a": 1})))
            .unwrap();

        assert!(request.headers.get(API_KEY_HEADER).is_none());
        assert_eq!(request.body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }
}
