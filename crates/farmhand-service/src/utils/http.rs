use std::time::Duration;

use crate::config::Config;

/// Creates a [`reqwest::Client`] for talking to the crop catalog.
///
/// Only the connection timeout is enforced here. The total timeout for a
/// fetch is enforced around the whole request in the catalog client, which
/// is what produces `CacheError::Timeout`.
pub fn create_client(config: &Config) -> reqwest::Client {
    reqwest::ClientBuilder::new()
        .gzip(true)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .unwrap()
}
