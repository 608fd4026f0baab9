// SPDX-License-Identifier: MPL-2.0
//! `iced_carousel` is a five-slide image carousel.
//!
//! The [`carousel`] engine is UI-agnostic: it consumes messages (photo
//! collection changes, resizes, touches, keys, timer and fetch completions)
//! and returns the effects a front-end must apply. The [`app`] module hosts
//! it in an Iced window, fed by a directory scan or a TOML photo manifest.

#![doc(html_root_url = "https://docs.rs/iced_carousel/0.1.0")]

pub mod app;
pub mod carousel;
pub mod config;
pub mod directory_scanner;
pub mod error;
pub mod fetch;

#[cfg(test)]
mod test_utils;
