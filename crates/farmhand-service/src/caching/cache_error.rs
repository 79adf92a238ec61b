use std::time::Duration;

use thiserror::Error;

/// An error that happens when fetching a resource from the crop catalog.
///
/// These errors are absorbed into fallback values at the derivation boundary
/// of each cache; they exist so that the catalog layer can report precisely
/// what went wrong to logs and metrics before the fallback kicks in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The resource was not found in the catalog.
    #[error("not found")]
    NotFound,
    /// The resource could not be fetched due to a timeout.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    /// The resource could not be fetched due to another problem, like
    /// connection loss, DNS resolution, or a 5xx server response.
    ///
    /// The attached string contains the catalog's response.
    #[error("fetch failed: {0}")]
    DownloadError(String),
    /// The resource was fetched successfully, but its payload could not be
    /// decoded.
    #[error("malformed: {0}")]
    Malformed(String),
    /// An unexpected error in farmhand itself.
    #[error("internal error")]
    InternalError,
}

/// Shorthand for a [`Result`] with a [`CacheError`].
pub type CacheEntry<T = ()> = Result<T, CacheError>;
