//! Client for the crop catalog API.
//!
//! The catalog is an OpenFarm-compatible HTTP API: crop metadata lives under
//! `{base}/{slug}` and comes back as a JSON:API-ish envelope in which every
//! layer is optional. This module does the fetching and decoding; turning
//! payloads into display values (and absorbing failures) is the job of the
//! caches built on top, see [`crate::caches::icons`].

use std::error::Error;

use reqwest::{StatusCode, header};
use serde::Deserialize;
use url::Url;

use crate::caching::{CacheEntry, CacheError};
use crate::config::Config;
use crate::utils::api_errors::pretty_print_api_errors;

/// The user agent string for catalog requests.
pub const USER_AGENT: &str = concat!("farmhand/", env!("CARGO_PKG_VERSION"));

/// The envelope the catalog wraps crop metadata in.
///
/// Every layer is optional: unknown crops, crops without attributes, and
/// crops without an icon all occur in the wild.
#[derive(Debug, Clone, Deserialize)]
pub struct CropResponse {
    #[serde(default)]
    pub data: Option<CropData>,
}

impl CropResponse {
    /// The inline SVG icon, if the crop has one.
    pub fn svg_icon(self) -> Option<String> {
        self.data?.attributes?.svg_icon
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CropData {
    #[serde(default)]
    pub attributes: Option<CropAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CropAttributes {
    #[serde(default)]
    pub slug: Option<String>,
    /// Inline SVG markup for the crop's icon.
    #[serde(default)]
    pub svg_icon: Option<String>,
    /// Spread diameter in centimeters.
    #[serde(default)]
    pub spread: Option<u32>,
}

impl CacheError {
    /// Flattens a transport error into a readable detail string.
    fn transport_error(mut error: &dyn Error) -> Self {
        while let Some(source) = error.source() {
            error = source;
        }

        let mut error_string = error.to_string();

        // Special-case a few error strings
        if error_string.contains("certificate verify failed") {
            error_string = "certificate verify failed".to_string();
        }

        if error_string.contains("SSL routines") {
            error_string = "SSL error".to_string();
        }

        Self::DownloadError(error_string)
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport_error(&error)
    }
}

/// Fetches crop metadata from the configured catalog.
///
/// The client is cheap to clone and safe to share; connection pooling lives
/// inside [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
    fetch_timeout: std::time::Duration,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: crate::utils::http::create_client(config),
            base_url: config.catalog_url.clone(),
            fetch_timeout: config.fetch_timeout,
        }
    }

    /// Fetches the metadata payload for one crop slug.
    pub async fn fetch_crop(&self, slug: &str) -> CacheEntry<CropResponse> {
        let url = self
            .base_url
            .join(slug)
            .map_err(|_| CacheError::NotFound)?;

        tracing::debug!("Fetching crop metadata from `{url}`");

        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send();

        let result = async {
            let response = tokio::time::timeout(self.fetch_timeout, request)
                .await
                .map_err(|_| CacheError::Timeout(self.fetch_timeout))??;

            let status = response.status();
            if !status.is_success() {
                return Err(error_for_status(slug, status, response).await);
            }

            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|err| CacheError::Malformed(err.to_string()))
        }
        .await;

        if let Err(ref error @ (CacheError::DownloadError(_) | CacheError::Timeout(_))) = result {
            metric!(counter("catalog.fetch.failure") += 1);
            tracing::debug!("Failed to fetch crop `{slug}`: {error}");
        }

        result
    }
}

/// Infers the [`CacheError`] for a non-success catalog response.
///
/// Client errors mean the crop does not exist in the catalog; everything
/// else is the catalog's problem, with the API error payload flattened into
/// the detail string when there is one.
async fn error_for_status(slug: &str, status: StatusCode, response: reqwest::Response) -> CacheError {
    if status.is_client_error() {
        tracing::debug!("Crop `{slug}` not found in catalog: {status}");
        return CacheError::NotFound;
    }

    let details = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str(&body).ok())
        .map(|payload| pretty_print_api_errors(&payload))
        .filter(|details| !details.is_empty())
        .unwrap_or_else(|| status.to_string());

    tracing::debug!("Unexpected status code from catalog for `{slug}`: {status}");
    CacheError::DownloadError(details)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use farmhand_test as test;

    use super::*;

    fn client_for(base_url: Url) -> CatalogClient {
        let config = Config {
            catalog_url: base_url,
            ..Default::default()
        };
        CatalogClient::new(&config)
    }

    #[tokio::test]
    async fn test_fetch_crop() {
        test::setup();

        let server = test::CatalogServer::new();
        server.insert_crop("lettuce", Some("<svg>leaf</svg>"));

        let client = client_for(server.crops_url());
        let response = client.fetch_crop("lettuce").await.unwrap();

        assert_eq!(response.svg_icon().as_deref(), Some("<svg>leaf</svg>"));
    }

    #[tokio::test]
    async fn test_fetch_crop_missing() {
        test::setup();

        let server = test::CatalogServer::new();
        let client = client_for(server.crops_url());

        let result = client.fetch_crop("i-do-not-exist").await;
        assert_eq!(result.unwrap_err(), CacheError::NotFound);
    }

    #[tokio::test]
    async fn test_server_error() {
        test::setup();

        let server = test::CatalogServer::new();
        let client = client_for(server.url("/respond_statuscode/500/"));

        let result = client.fetch_crop("lettuce").await;
        assert_eq!(
            result.unwrap_err(),
            CacheError::DownloadError("500 Internal Server Error".to_string())
        );
    }

    #[tokio::test]
    async fn test_garbage_payload() {
        test::setup();

        let server = test::CatalogServer::new();
        let client = client_for(server.url("/garbage_data/"));

        let result = client.fetch_crop("lettuce").await;
        assert!(matches!(result.unwrap_err(), CacheError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        test::setup();

        let server = test::CatalogServer::new();
        let config = Config {
            catalog_url: server.url("/delay/1s/"),
            fetch_timeout: Duration::from_millis(100),
            ..Default::default()
        };
        let client = CatalogClient::new(&config);

        let result = client.fetch_crop("lettuce").await;
        assert_eq!(
            result.unwrap_err(),
            CacheError::Timeout(Duration::from_millis(100))
        );
    }
}
