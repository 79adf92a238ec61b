//! Concrete caches built on the [`caching`](crate::caching) infrastructure.

pub mod icons;

pub use icons::IconCache;
