// SPDX-License-Identifier: MPL-2.0
//! Commands the engine hands to the front-end.

use super::gesture::ZoomTransform;
use super::loader::RequestId;
use super::window::SlideRole;
use serde::Serialize;
use std::time::Duration;

/// Positioning command for one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideCommand {
    pub role: SlideRole,
    pub width: f32,
    /// Background image source; `None` paints an empty slide.
    pub source: Option<String>,
}

/// Named delayed callbacks. The front-end schedules them and reports back
/// through [`super::Message::TimerFired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// The visual transition has run its course.
    Settle,
    /// One scheduling tick after settling.
    Finalize,
    /// Speculative warm-up of the indices just outside the window.
    Preload,
    /// The pinch of the given generation is over once this fires.
    PinchRelease(u64),
    /// One tick after a fullscreen change.
    FullscreenSettle,
}

/// Change notifications for the embedding container.
///
/// Serializes as `{ action = "change" | "fullscreen", data = ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "data", rename_all = "lowercase")]
pub enum Notification {
    /// The current index after a completed transition.
    Change(usize),
    /// The new fullscreen flag.
    Fullscreen(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PositionSlide(SlideCommand),
    /// Resolve an image and report back with [`super::Message::ImageResolved`].
    FetchImage {
        request: RequestId,
        index: usize,
        src: String,
    },
    /// Horizontal track offset in pixels.
    SetTrackOffset(f32),
    /// Enables an eased track transition of the given length, or disables it.
    SetTrackTransition(Option<Duration>),
    SetSlideActive { role: SlideRole, active: bool },
    /// Transform for the main slide; `None` clears it.
    SetZoomTransform(Option<ZoomTransform>),
    Schedule { timer: Timer, after: Duration },
    /// Pin the page at `top` so it cannot scroll behind the fullscreen view.
    LockScroll { top: f32 },
    /// Release the page and scroll back to `restore_top`.
    UnlockScroll { restore_top: f32 },
    Emit(Notification),
}
