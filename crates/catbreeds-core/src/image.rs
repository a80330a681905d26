//! Remote images: URL derivation and the three-state load model.
//!
//! Both the list rows and the detail card render images through [`RemoteImage`].
//! A breed without a usable `reference_image_id` never gets a URL, so no request
//! is ever built around an absent key.
//!
//! # States
//!
//! - `Pending`: a URL exists, nothing fetched yet.
//! - `Loaded`: payload received with an `image/*` content type.
//! - `Failed`: terminal; no retry within a session.

use thiserror::Error;

use crate::breed::Breed;

/// Default CDN base for breed images.
pub const DEFAULT_IMAGE_BASE: &str = "https://cdn2.thecatapi.com/images";

/// Build `{base}/{reference_image_id}.jpg`.
///
/// Returns `None` for an absent, empty, or whitespace-only id.
pub fn image_url(base: &str, reference_image_id: Option<&str>) -> Option<String> {
    let id = reference_image_id.map(str::trim).filter(|id| !id.is_empty())?;
    Some(format!("{}/{}.jpg", base.trim_end_matches('/'), id))
}

/// Why an image ended up in the failed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageFailure {
    #[error("breed has no reference image")]
    NoReference,
    #[error("image server returned {0}")]
    Status(u16),
    #[error("image request failed: {0}")]
    Transport(String),
    #[error("unexpected content type: {0}")]
    NotAnImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded { bytes: usize, content_type: String },
    Failed(ImageFailure),
}

impl ImageState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImageState::Pending)
    }
}

/// An image bound to one render site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    url: Option<String>,
    state: ImageState,
}

impl RemoteImage {
    /// Image for a URL that may be missing. No URL means `Failed(NoReference)` from the start.
    pub fn new(url: Option<String>) -> Self {
        let state = match url {
            Some(_) => ImageState::Pending,
            None => ImageState::Failed(ImageFailure::NoReference),
        };
        Self { url, state }
    }

    pub fn for_breed(base: &str, breed: &Breed) -> Self {
        Self::new(image_url(base, breed.reference_image_id.as_deref()))
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn state(&self) -> &ImageState {
        &self.state
    }

    /// True when a loader should issue a request for this image.
    pub fn needs_fetch(&self) -> bool {
        self.url.is_some() && matches!(self.state, ImageState::Pending)
    }

    /// Move a pending image to `next`. Terminal states are left untouched.
    pub fn resolve(self, next: ImageState) -> Self {
        if self.state.is_terminal() {
            return self;
        }
        Self {
            url: self.url,
            state: next,
        }
    }

    /// Fixed-width placeholder glyph for text rendering.
    pub fn glyph(&self) -> &'static str {
        match &self.state {
            ImageState::Pending => "[ ... ]",
            ImageState::Loaded { .. } => "[ img ]",
            ImageState::Failed(ImageFailure::NoReference) => "[=^.^=]",
            ImageState::Failed(_) => "[  x  ]",
        }
    }
}
