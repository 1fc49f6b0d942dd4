//! Central configuration constants for catalog fetching and refresh.

/// Public demo catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Number of products requested per fetch.
pub const DEFAULT_CATALOG_LIMIT: usize = 12;

/// Minimum allowed catalog limit.
pub const MIN_CATALOG_LIMIT: usize = 1;

/// Maximum allowed catalog limit.
pub const MAX_CATALOG_LIMIT: usize = 100;

/// Upper bound on a single catalog fetch (milliseconds).
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;

/// Interval between periodic catalog refreshes (seconds). 5 minutes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Size of the synthetic catalog installed when the source is unavailable.
pub const FALLBACK_CATALOG_SIZE: usize = 12;

/// Convenience function to clamp a limit into the allowed range.
pub fn clamp_limit(v: usize) -> usize {
    v.clamp(MIN_CATALOG_LIMIT, MAX_CATALOG_LIMIT)
}
