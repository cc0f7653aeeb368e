//! Redis connection setup
//!
//! A single multiplexed connection is shared by every request; clones
//! pipeline over the same socket.

use redis::{aio::MultiplexedConnection, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::InfrastructureError;

const CONNECT_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 100;

/// Open a multiplexed connection, retrying with exponential backoff
pub async fn connect(url: &str) -> Result<MultiplexedConnection, InfrastructureError> {
    info!(event = "redis_connecting", url = %mask_url(url), "Connecting to Redis");

    let client = Client::open(url).map_err(|e| {
        error!("Failed to parse Redis URL: {}", e);
        InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
    })?;

    let mut attempts = 0;
    let mut delay = RETRY_DELAY_MS;
    loop {
        attempts += 1;
        debug!("Attempting to connect to Redis (attempt {})", attempts);

        match client.get_multiplexed_async_connection().await {
            Ok(connection) => {
                info!(event = "redis_connected", "Successfully connected to Redis");
                return Ok(connection);
            }
            Err(e) if attempts < CONNECT_RETRIES => {
                warn!(
                    "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                    attempts, CONNECT_RETRIES, e, delay
                );
                sleep(Duration::from_millis(delay)).await;
                delay = (delay * 2).min(5000);
            }
            Err(e) => {
                error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                return Err(InfrastructureError::Cache(e));
            }
        }
    }
}

/// Hide credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &url[scheme_end + 3..at];
            let masked = match credentials.split_once(':') {
                Some((user, _)) => format!("{}:****", user),
                None => "****".to_string(),
            };
            format!("{}{}{}", &url[..scheme_end + 3], masked, &url[at..])
        }
        _ => url.to_string(),
    }
}
