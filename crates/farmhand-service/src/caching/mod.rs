//! # Farmhand caching infrastructure
//!
//! The app renders hundreds of plant markers at a time, and most of them
//! share a handful of crops. Fetching the crop metadata for every marker
//! individually would hammer the catalog, so every catalog-derived value goes
//! through the in-memory caching layer in this module.
//!
//! The layer is intentionally a single tier: a request-coalescing in-memory
//! cache. There is no filesystem or shared cache, no expiry, and no eviction.
//! The keyspace is bounded by the crop catalog, entries are immutable once
//! computed, and a cached value is valid for the lifetime of the process.
//!
//! A cache request goes through the following steps:
//! - It is looked up in the in-memory cache.
//! - On miss, the computation is started, and the pending computation itself
//!   is stored under the key. Every concurrent request for the same key
//!   attaches to that one computation instead of starting a second one.
//! - Once resolved, the value is retained and served to all later requests.
//!
//! ## Metrics
//!
//! Each metric is tagged with a `cache` field naming the cache:
//!
//! - `caches.access`: all accesses.
//! - `caches.memory.hit`: accesses served from memory (including attaching
//!   to a pending computation).
//! - `caches.computation`: computations actually run.
//!
//! ## [`CacheEntry`] / [`CacheError`]
//!
//! Fallible steps feeding a cache (catalog fetches, payload decoding) deal in
//! [`CacheEntry`]s, an alias for a [`Result`] around a [`CacheError`]. The
//! cached computations themselves absorb those failures into a fallback
//! value before anything is inserted: what the [`Cacher`] stores is the plain
//! item, and callers of [`Cacher::compute_memoized`] never observe an error.
//!
//! ## Creating a cached item
//!
//! Implement [`CacheItemRequest`] for a request type. Its `compute` method
//! produces the value to retain, converting any [`CacheError`] along the way
//! into the item's fallback representation. Wrap a [`Cacher`] in a concrete
//! cache struct with a domain-specific entry point, as
//! [`IconCache`](crate::caches::icons::IconCache) does.

mod cache_error;
mod cache_key;
mod memory;

pub use cache_error::{CacheEntry, CacheError};
pub use cache_key::CacheKey;
pub use memory::{CacheItemRequest, Cacher};
