// SPDX-License-Identifier: MPL-2.0
//! Photo records and collections.
//!
//! Records are opaque string maps; the carousel only ever reads the field
//! named by the configured source key. Collections can be built in code,
//! from a directory scan, or from a TOML manifest:
//!
//! ```toml
//! [[photos]]
//! src = "beach.jpg"
//! title = "Morning"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(BTreeMap<String, String>);

impl Photo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// All fields, ordered by key.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Ordered, immutable photo sequence. Replacing it is the only way to change it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoCollection {
    photos: Arc<[Photo]>,
}

impl PhotoCollection {
    #[must_use]
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos: photos.into(),
        }
    }

    /// Convenience constructor: one record per source, stored under `key`.
    #[must_use]
    pub fn from_sources<I, S>(key: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            sources
                .into_iter()
                .map(|src| Photo::new().with_field(key, src))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    /// Image source of the photo at `index`, read through `key`.
    #[must_use]
    pub fn source(&self, index: usize, key: &str) -> Option<&str> {
        self.get(index)
            .and_then(|photo| photo.field(key))
            .filter(|src| !src.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter()
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    photos: Vec<Photo>,
}

/// Parses a manifest document.
///
/// # Errors
///
/// Returns [`Error::Manifest`] if the document is not valid TOML or does not
/// match the `[[photos]]` layout.
pub fn parse_manifest(content: &str) -> Result<PhotoCollection> {
    let manifest: Manifest =
        toml::from_str(content).map_err(|e| Error::Manifest(e.to_string()))?;
    Ok(PhotoCollection::new(manifest.photos))
}

/// Loads a manifest file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Manifest`]
/// if it cannot be parsed.
pub fn load_manifest(path: &Path) -> Result<PhotoCollection> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content)
}
