//! Core types for catbreeds: breed records, remote images, and the observable breed store.

pub mod breed;
pub mod image;
pub mod state;

pub use breed::{Breed, Weight};
pub use image::{DEFAULT_IMAGE_BASE, ImageFailure, ImageState, RemoteImage, image_url};
pub use state::{BreedAction, BreedState, BreedStore, FetchErrorKind, LoadPhase};
