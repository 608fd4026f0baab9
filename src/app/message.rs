// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::carousel::{self, RequestId, SlideRole};
use crate::error::Error;
use crate::fetch::FetchedImage;
use iced::{window, Point, Size};
use std::time::Instant;

/// Raw touch events, keyed by finger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FingerEvent {
    Pressed { id: u64, position: Point },
    Moved { id: u64, position: Point },
    Lifted { id: u64, position: Point },
}

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Forwarded straight to the carousel engine.
    Carousel(carousel::Message),
    ImageFetched {
        request: RequestId,
        src: String,
        result: Result<FetchedImage, Error>,
    },
    /// Refetched handle for a source the engine already settled.
    HandleFetched {
        src: String,
        result: Result<FetchedImage, Error>,
    },
    /// A slide was clicked; toggles fullscreen around it.
    SlideClicked(SlideRole),
    WindowOpened {
        id: window::Id,
        size: Size,
    },
    WindowResized {
        id: window::Id,
        size: Size,
    },
    Finger(FingerEvent),
    /// Animation frame while the track glides.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Image directory or `.toml` photo manifest to show.
    pub source: Option<String>,
    /// Photo to start on.
    pub start_index: Option<usize>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_CAROUSEL_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}
