// SPDX-License-Identifier: MPL-2.0
//! Image fetching for the front-end.
//!
//! A photo source is either a local path (absolute, relative to the folder
//! the photos came from, or a `file://` URL) or an `http(s)://` URL. Fetching
//! reads the encoded bytes, probes their natural size and hands back an Iced
//! image handle built from the same bytes, so nothing is decoded twice.

use crate::carousel::ImageDimensions;
use crate::error::{Error, Result};
use iced::widget::image;
use image_rs::ImageReader;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub handle: image::Handle,
    pub dimensions: ImageDimensions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    /// Classifies a photo source string. Relative paths are resolved against
    /// `base` when one is given.
    #[must_use]
    pub fn parse(src: &str, base: Option<&Path>) -> Self {
        if src.starts_with("http://") || src.starts_with("https://") {
            return Source::Remote(src.to_string());
        }
        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        match base {
            Some(base) if path.is_relative() => Source::Local(base.join(path)),
            _ => Source::Local(path.to_path_buf()),
        }
    }
}

/// Builds the HTTP client shared by all remote fetches.
///
/// # Errors
///
/// Returns [`Error::Network`] if the TLS backend cannot be initialized.
pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(concat!("IcedCarousel/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Probes the natural size of encoded image bytes and wraps them in a handle.
///
/// # Errors
///
/// Returns [`Error::Image`] if the format is unknown or the header is corrupt.
pub fn decode(bytes: Vec<u8>) -> Result<FetchedImage> {
    let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(FetchedImage {
        handle: image::Handle::from_bytes(bytes),
        dimensions: ImageDimensions::new(width, height),
    })
}

/// Reads and probes a local image file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or [`Error::Image`] if
/// it is not a supported image.
pub fn read_local(path: &Path) -> Result<FetchedImage> {
    decode(fs::read(path)?)
}

/// Downloads and probes a remote image.
///
/// # Errors
///
/// Returns [`Error::Network`] on transport failures or non-success statuses,
/// or [`Error::Image`] if the body is not a supported image.
pub async fn download(client: &reqwest::Client, url: &str) -> Result<FetchedImage> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(Error::Network(format!("HTTP status: {}", response.status())));
    }
    let bytes = response.bytes().await?.to_vec();
    tokio::task::spawn_blocking(move || decode(bytes))
        .await
        .unwrap_or_else(|e| Err(Error::Io(format!("Decode task failed: {e}"))))
}

/// Fetches an image from any supported source.
///
/// # Errors
///
/// See [`read_local`] and [`download`]. Remote sources also fail with
/// [`Error::Network`] when no HTTP client is available.
pub async fn fetch(source: Source, client: Option<reqwest::Client>) -> Result<FetchedImage> {
    match (source, client) {
        (Source::Local(path), _) => tokio::task::spawn_blocking(move || read_local(&path))
            .await
            .unwrap_or_else(|e| Err(Error::Io(format!("Fetch task failed: {e}")))),
        (Source::Remote(url), Some(client)) => download(&client, &url).await,
        (Source::Remote(url), None) => Err(Error::Network(format!(
            "no HTTP client available for {url}"
        ))),
    }
}
