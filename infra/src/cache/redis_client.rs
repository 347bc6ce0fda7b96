//! Redis client implementation
//!
//! This module provides a Redis client with a multiplexed connection, retry
//! logic and the binary-safe operations the verification store needs:
//! plain and conditional writes, reads and an atomic compare-and-set.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::cache::CacheConfig;
use crate::InfrastructureError;

/// Replace KEYS[1] with ARGV[2] only if it currently holds ARGV[1].
/// KEEPTTL leaves any expiry set at creation in place.
const COMPARE_AND_SET_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
if current == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'KEEPTTL')
    return 1
end
return 0
"#;

/// Upper bound for the exponential backoff between retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Whether a command may be sent again after a transient failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryPolicy {
    /// Resending has the same effect as sending once
    Idempotent,
    /// The command may have run even though its reply was lost, so a resend
    /// could observe its own write. Sent exactly once.
    Once,
}

/// Redis client with retry logic
///
/// Cloning is cheap: clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Compiled compare-and-set script
    compare_and_set_script: Script,
}

impl RedisClient {
    /// Connect to Redis, retrying the initial connection with exponential
    /// backoff up to `config.max_retries` times.
    ///
    /// # Returns
    /// * `Err(InfrastructureError::Config)` - The URL does not parse
    /// * `Err(InfrastructureError::Cache)` - No connection could be made
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            compare_and_set_script: Script::new(COMPARE_AND_SET_SCRIPT),
        })
    }

    /// The configuration this client was created with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Store a value, with an expiry unless `expiry_seconds` is 0
    pub async fn set(
        &self,
        key: &str,
        value: &[u8],
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(RetryPolicy::Idempotent, |mut conn| {
            let key = key.to_string();
            let value = value.to_vec();

            Box::pin(async move {
                if expiry_seconds == 0 {
                    conn.set::<_, _, ()>(key, value).await
                } else {
                    conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await
                }
            })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Store a value only if the key is unused (`SET NX`)
    ///
    /// Not retried: a resend after a lost reply would find its own value
    /// and report the key as taken.
    ///
    /// # Returns
    /// * `Ok(true)` - The value was written
    /// * `Ok(false)` - The key already existed; nothing was written
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &[u8],
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        debug!("Setting key '{}' if absent with expiry {}s", key, expiry_seconds);

        let reply = self
            .execute_with_retry(RetryPolicy::Once, |mut conn| {
                let mut cmd = redis::cmd("SET");
                cmd.arg(key).arg(value).arg("NX");
                if expiry_seconds > 0 {
                    cmd.arg("EX").arg(expiry_seconds);
                }

                Box::pin(async move { cmd.query_async::<_, Option<String>>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to set key '{}' if absent: {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        let created = reply.is_some();
        if !created {
            debug!("Key '{}' already exists", key);
        }
        Ok(created)
    }

    /// Get a value
    ///
    /// # Returns
    /// * `Ok(None)` - The key does not exist or has expired
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let value = self
            .execute_with_retry(RetryPolicy::Idempotent, |mut conn| {
                let key = key.to_string();

                Box::pin(async move { conn.get::<_, Option<Vec<u8>>>(key).await })
            })
            .await
            .map_err(|e| {
                error!("Failed to get key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        if value.is_none() {
            debug!("Key '{}' not found", key);
        }
        Ok(value)
    }

    /// Atomically replace the value if it still equals `expected`
    ///
    /// The comparison and the write run server-side in one script, so no
    /// other client can interleave. The key's remaining TTL is kept.
    /// Not retried, for the same reason as `set_if_absent`.
    ///
    /// # Returns
    /// * `Ok(false)` - The key is missing or holds a different value
    pub async fn compare_and_set(
        &self,
        key: &str,
        expected: &[u8],
        value: &[u8],
    ) -> Result<bool, InfrastructureError> {
        debug!("Compare-and-set on key '{}'", key);

        let replaced = self
            .execute_with_retry(RetryPolicy::Once, |mut conn| {
                let script = self.compare_and_set_script.clone();
                let key = key.to_string();
                let expected = expected.to_vec();
                let value = value.to_vec();

                Box::pin(async move {
                    script
                        .key(key)
                        .arg(expected)
                        .arg(value)
                        .invoke_async::<_, i32>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| {
                error!("Failed compare-and-set on key '{}': {}", key, e);
                InfrastructureError::Cache(e)
            })?;

        Ok(replaced == 1)
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(RetryPolicy::Idempotent, |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => {
                debug!("Redis health check passed");
                Ok(true)
            }
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Execute a Redis operation on the shared connection
    async fn execute_with_retry<F, T>(&self, policy: RetryPolicy, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        run_with_retry(
            policy,
            self.config.max_retries,
            self.config.retry_delay_ms,
            || operation(self.connection.clone()),
        )
        .await
    }
}

/// Run an operation, retrying transient errors with exponential backoff
/// capped at five seconds when `policy` allows it.
pub(crate) async fn run_with_retry<F, Fut, T>(
    policy: RetryPolicy,
    max_retries: u32,
    retry_delay_ms: u64,
    mut operation: F,
) -> RedisResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RedisResult<T>>,
{
    let mut attempts = 0;
    let mut delay = retry_delay_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e)
                if policy == RetryPolicy::Idempotent
                    && attempts < max_retries
                    && is_retriable_error(&e) =>
            {
                warn!(
                    "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempts, max_retries, e, delay
                );
                sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
            }
            Err(e) => {
                error!("Redis operation failed after {} attempts: {}", attempts, e);
                return Err(e);
            }
        }
    }
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
