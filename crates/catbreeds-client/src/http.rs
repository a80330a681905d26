//! HTTP fetch service for the breeds endpoint and the image CDN.

use std::collections::HashSet;
use std::time::Duration;

use catbreeds_core::{
    Breed, BreedAction, BreedStore, DEFAULT_IMAGE_BASE, FetchErrorKind, ImageFailure, ImageState,
    RemoteImage,
};
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Default breed list endpoint.
pub const DEFAULT_API_URL: &str = "https://api.thecatapi.com/v1/breeds";

/// Maximum image requests in flight at once.
pub const IMAGE_CONCURRENCY: usize = 8;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server is not responding ({status}): {body}")]
    ServerNotResponding { status: u16, body: String },
    #[error("unexpected response ({status}): {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Transport(_) => FetchErrorKind::Transport,
            FetchError::ServerNotResponding { status, .. } => {
                FetchErrorKind::ServerNotResponding(*status)
            }
            FetchError::UnexpectedStatus { status, .. } => {
                FetchErrorKind::UnexpectedStatus(*status)
            }
            FetchError::Decode(_) => FetchErrorKind::Decode,
        }
    }
}

/// Map a non-2xx status to its error class. 400 through 500 inclusive counts as
/// "server not responding"; everything else is unexpected.
fn status_error(status: u16, body: String) -> FetchError {
    if (400..=500).contains(&status) {
        FetchError::ServerNotResponding { status, body }
    } else {
        FetchError::UnexpectedStatus { status, body }
    }
}

/// Endpoints and transport settings shared by the breed client and image loader.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub image_base: String,
    /// `None` leaves reqwest's default (no overall timeout).
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    fn build_http(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("catbreeds/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// Stateless client for the breeds endpoint.
#[derive(Debug, Clone)]
pub struct BreedClient {
    client: reqwest::Client,
    api_url: String,
}

impl BreedClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: config.build_http()?,
            api_url: config.api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// GET the breed list, classify the status, decode the body.
    pub async fn fetch_breeds(&self) -> Result<Vec<Breed>, FetchError> {
        info!(url = %self.api_url, "fetching breeds");
        let resp = self.client.get(&self.api_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), body));
        }

        let bytes = resp.bytes().await?;
        let breeds: Vec<Breed> = serde_json::from_slice(&bytes)?;
        warn_duplicate_ids(&breeds);
        info!(count = breeds.len(), "fetched breeds");
        Ok(breeds)
    }
}

fn warn_duplicate_ids(breeds: &[Breed]) {
    let mut seen = HashSet::with_capacity(breeds.len());
    for breed in breeds {
        if !seen.insert(breed.id.as_str()) {
            warn!(id = %breed.id, "duplicate breed id in response");
        }
    }
}

/// Fetch service: runs [`BreedClient::fetch_breeds`] and publishes the outcome to a [`BreedStore`].
#[derive(Debug, Clone)]
pub struct BreedService {
    client: BreedClient,
    store: BreedStore,
}

impl BreedService {
    pub fn new(client: BreedClient, store: BreedStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &BreedStore {
        &self.store
    }

    /// Load breeds into the store.
    ///
    /// The store moves to `Loading` as soon as this is called, before the
    /// returned future is first polled, so a caller can render the busy state
    /// from [`BreedStore::snapshot`] and then await the request. The store ends
    /// in `Loaded` or `Failed`; the error is also returned so callers can show
    /// it. Resolves to the number of breeds loaded.
    pub fn load_breeds(&self) -> impl Future<Output = Result<usize, FetchError>> + Send + '_ {
        self.store.dispatch(BreedAction::FetchStarted);
        async move {
            match self.client.fetch_breeds().await {
                Ok(breeds) => {
                    let count = breeds.len();
                    self.store.dispatch(BreedAction::FetchSucceeded(breeds));
                    Ok(count)
                }
                Err(e) => {
                    match &e {
                        FetchError::ServerNotResponding { status, .. } => {
                            warn!(status, "server is not responding")
                        }
                        FetchError::UnexpectedStatus { status, .. } => {
                            warn!(status, "something went wrong fetching breeds")
                        }
                        FetchError::Transport(err) => error!(error = %err, "breed request failed"),
                        FetchError::Decode(err) => error!(error = %err, "could not decode breeds"),
                    }
                    self.store.dispatch(BreedAction::FetchFailed(e.kind()));
                    Err(e)
                }
            }
        }
    }
}

/// Resolves [`RemoteImage`]s against the image CDN.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    client: reqwest::Client,
    base: String,
}

impl ImageLoader {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: config.build_http()?,
            base: config.image_base.clone(),
        })
    }

    /// Image for `breed` against this loader's CDN base, still unresolved.
    pub fn image_for(&self, breed: &Breed) -> RemoteImage {
        RemoteImage::for_breed(&self.base, breed)
    }

    /// Resolve one image. Images without a URL or already terminal are returned as-is.
    pub async fn load(&self, image: RemoteImage) -> RemoteImage {
        if !image.needs_fetch() {
            return image;
        }
        let Some(url) = image.url().map(str::to_owned) else {
            return image;
        };
        let state = self.fetch_state(&url).await;
        if let ImageState::Failed(reason) = &state {
            debug!(url = %url, reason = %reason, "image load failed");
        }
        image.resolve(state)
    }

    async fn fetch_state(&self, url: &str) -> ImageState {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => return ImageState::Failed(ImageFailure::Transport(e.to_string())),
        };
        let status = resp.status();
        if !status.is_success() {
            return ImageState::Failed(ImageFailure::Status(status.as_u16()));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/") {
            return ImageState::Failed(ImageFailure::NotAnImage(content_type));
        }
        match resp.bytes().await {
            Ok(bytes) => ImageState::Loaded {
                bytes: bytes.len(),
                content_type,
            },
            Err(e) => ImageState::Failed(ImageFailure::Transport(e.to_string())),
        }
    }

    /// Resolve many images concurrently. Output order matches input order.
    pub async fn load_all(&self, images: Vec<RemoteImage>) -> Vec<RemoteImage> {
        stream::iter(images)
            .map(|image| self.load(image))
            .buffered(IMAGE_CONCURRENCY)
            .collect()
            .await
    }
}
