//! Import map schema for trex.
//!
//! This crate defines the data layer: the `Manifest` document (`imports`
//! mapping package names to locations), `Location` classification of those
//! location strings, and `ManifestStore` for reading and atomically rewriting
//! the manifest file in canonical sorted form.

pub mod location;
pub mod manifest;

pub use location::{Location, LOCAL_SENTINEL};
pub use manifest::{Manifest, ManifestError, ManifestStore, DEFAULT_MANIFEST_FILE};
