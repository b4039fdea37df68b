//! Shared constants for end-to-end tests

// ============================================================================
// Catalog Feed
// ============================================================================

/// API key the mock feed accepts. Requests without it get a 401.
pub const API_KEY: &str = "test-api-key";

/// Region the tests enrich for.
pub const REGION: &str = "KR";

// ============================================================================
// Document Store
// ============================================================================

/// Index every test publishes into.
pub const INDEX_NAME: &str = "movies";

/// Version reported by the mock store on ping.
pub const STORE_VERSION: &str = "8.11.0";

// ============================================================================
// Timeouts
// ============================================================================

/// Backoff used by test clients, small enough to keep retry tests fast.
pub const TEST_BACKOFF_MS: u64 = 10;
