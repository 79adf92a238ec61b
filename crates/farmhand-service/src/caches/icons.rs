//! Cached access to crop icons.
//!
//! PROBLEM: a garden bed has 100 lettuce plants, and the map renders an icon
//! for every one of them. Downloading the same SVG 100 times is not an
//! option, and neither is letting a slow catalog break the map.
//!
//! SOLUTION: derive the display value once per crop, behind the
//! request-coalescing [`Cacher`], and substitute a generic icon whenever the
//! catalog cannot produce one.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesOrdered, StreamExt};

use crate::caching::{CacheEntry, CacheItemRequest, CacheKey, Cacher};
use crate::catalog::{CatalogClient, CropResponse};
use crate::utils::progress::Progress;

/// Prefix that turns inline SVG markup into an `img`-renderable URI.
pub const DATA_URI: &str = "data:image/svg+xml;utf8,";

/// Served for crops without an icon, and whenever the catalog fetch fails.
pub const DEFAULT_ICON: &str = "/app-resources/img/generic-plant.svg";

/// Provides cached access to crop display icons.
///
/// Icons are derived values: the raw catalog payload is reduced to a single
/// string, either an inline data URI or the [`DEFAULT_ICON`] fallback.
/// Derivation runs at most once per slug for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct IconCache {
    cache: Cacher<FetchIconRequest>,
    catalog: Arc<CatalogClient>,
}

impl IconCache {
    /// Creates a new [`IconCache`] on top of the given catalog client.
    pub fn new(catalog: Arc<CatalogClient>) -> Self {
        Self {
            cache: Cacher::new("icons"),
            catalog,
        }
    }

    /// Resolves the display icon for a crop slug.
    ///
    /// The first call for a slug fetches from the catalog; calls issued
    /// while that fetch is in flight attach to it, and later calls are
    /// served from memory. This never fails: any fetch or decode problem
    /// resolves to [`DEFAULT_ICON`].
    pub async fn fetch_icon(&self, slug: &str) -> Arc<str> {
        let cache_key = CacheKey::from_slug(slug);
        let request = FetchIconRequest {
            catalog: Arc::clone(&self.catalog),
            slug: cache_key.as_str().to_owned(),
        };

        self.cache.compute_memoized(request, cache_key).await
    }

    /// Warms the cache for a batch of slugs, reporting progress after each
    /// resolved icon.
    ///
    /// Returns the icons in input order.
    pub async fn prefetch<S, F>(&self, slugs: &[S], mut on_progress: F) -> Vec<Arc<str>>
    where
        S: AsRef<str>,
        F: FnMut(&Progress),
    {
        let mut progress = Progress::new(slugs.len());
        let mut pending: FuturesOrdered<_> = slugs
            .iter()
            .map(|slug| self.fetch_icon(slug.as_ref()))
            .collect();

        let mut icons = Vec::with_capacity(slugs.len());
        while let Some(icon) = pending.next().await {
            progress.inc();
            on_progress(&progress);
            icons.push(icon);
        }
        icons
    }
}

#[derive(Debug, Clone)]
struct FetchIconRequest {
    catalog: Arc<CatalogClient>,
    slug: String,
}

impl FetchIconRequest {
    /// The derivation boundary: reduces whatever the catalog produced to the
    /// one string the UI renders. Failures of any kind, and payloads without
    /// an icon, become [`DEFAULT_ICON`] here.
    fn derive(&self, result: CacheEntry<CropResponse>) -> Arc<str> {
        let svg_icon = match result {
            Ok(response) => response.svg_icon(),
            Err(error) => {
                tracing::debug!("Using default icon for crop `{}`: {error}", self.slug);
                None
            }
        };

        match svg_icon {
            Some(svg) if !svg.is_empty() => format!("{DATA_URI}{svg}").into(),
            _ => DEFAULT_ICON.into(),
        }
    }
}

impl CacheItemRequest for FetchIconRequest {
    type Item = Arc<str>;

    fn compute(&self) -> BoxFuture<'_, Self::Item> {
        let fut = async {
            metric!(counter("icons.computation") += 1);
            let result = self.catalog.fetch_crop(&self.slug).await;
            self.derive(result)
        };
        Box::pin(fut)
    }
}
