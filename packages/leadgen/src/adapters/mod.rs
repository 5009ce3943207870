//! Provider adapter implementations.
//!
//! Each adapter owns its HTTP client, its timeout, and its provider-specific
//! rate limit (governor direct limiter). The pipeline treats them uniformly
//! through the [`SourceAdapter`](crate::traits::SourceAdapter) trait.

mod duckduckgo;
mod google_places;
mod mock;
mod opencorporates;

pub use duckduckgo::DuckDuckGoAdapter;
pub use google_places::GooglePlacesAdapter;
pub use mock::MockAdapter;
pub use opencorporates::OpenCorporatesAdapter;

use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{Quota, RateLimiter};

/// Direct (un-keyed) in-memory rate limiter shared by the adapters.
pub(crate) type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Build a limiter allowing `per_minute` calls per minute with no burst.
pub(crate) fn per_minute_limiter(per_minute: u32) -> Arc<DirectRateLimiter> {
    let quota = Quota::per_minute(NonZeroU32::new(per_minute).expect("rate must be > 0"));
    Arc::new(RateLimiter::direct(quota))
}

/// Default request timeout for provider HTTP calls.
pub(crate) const HTTP_TIMEOUT_SECS: u64 = 10;

pub(crate) fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
}
