//! Network layer: breed list fetch service and remote image loading.

#[cfg(feature = "http")]
pub mod http;

/// Canned-reply HTTP server for exercising the client in tests.
#[cfg(any(test, feature = "test-util"))]
pub mod test_server;

#[cfg(feature = "http")]
pub use http::{
    BreedClient, BreedService, ClientConfig, DEFAULT_API_URL, FetchError, IMAGE_CONCURRENCY,
    ImageLoader,
};
