// SPDX-License-Identifier: MPL-2.0
//! Render state of the slide track.
//!
//! The engine speaks in absolute positions and on/off transitions; this
//! module keeps what the view needs (five slide boxes, the track offset and
//! the zoom transform) and interpolates the offset while a transition is
//! enabled, with an ease-out curve.

use crate::carousel::{SlideCommand, SlideRole, ZoomTransform};
use iced::widget::scrollable::AbsoluteOffset;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideView {
    pub width: f32,
    pub source: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glide {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Glide {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    fn value_at(&self, now: Instant) -> f32 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}

#[derive(Debug, Clone, Default)]
pub struct Track {
    slides: [SlideView; 5],
    offset: f32,
    transition: Option<Duration>,
    glide: Option<Glide>,
    zoom: Option<ZoomTransform>,
}

impl Track {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&mut self, command: SlideCommand) {
        let slide = &mut self.slides[command.role.position()];
        slide.width = command.width;
        slide.source = command.source;
    }

    pub fn set_active(&mut self, role: SlideRole, active: bool) {
        self.slides[role.position()].active = active;
    }

    #[must_use]
    pub fn slide(&self, role: SlideRole) -> &SlideView {
        &self.slides[role.position()]
    }

    /// Current (possibly mid-glide) track offset.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[must_use]
    pub fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }

    /// Enables or disables the eased transition. Disabling it cuts any glide
    /// short and returns the offset to jump to.
    pub fn set_transition(&mut self, transition: Option<Duration>) -> Option<f32> {
        self.transition = transition;
        if transition.is_some() {
            return None;
        }
        self.glide.take().map(|glide| {
            self.offset = glide.to;
            self.offset
        })
    }

    /// Moves the track. Returns the offset to apply right away, or `None`
    /// when a glide was started and [`Track::tick`] drives it.
    pub fn move_to(&mut self, target: f32, now: Instant) -> Option<f32> {
        match self.transition {
            Some(duration) if !duration.is_zero() => {
                self.glide = Some(Glide {
                    from: self.offset,
                    to: target,
                    started: now,
                    duration,
                });
                None
            }
            _ => {
                self.glide = None;
                self.offset = target;
                Some(target)
            }
        }
    }

    /// Advances a running glide. Returns the new offset, if gliding.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let glide = self.glide?;
        self.offset = glide.value_at(now);
        if glide.progress(now) >= 1.0 {
            self.glide = None;
        }
        Some(self.offset)
    }

    #[must_use]
    pub fn zoom(&self) -> Option<ZoomTransform> {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: Option<ZoomTransform>) {
        self.zoom = zoom;
    }
}

/// Scroll position of the zoomed main slide in a `width` × `height` box.
///
/// Without a pan the scaled image stays centered; the pan shifts the content
/// by `(dx, dy)`, within the part of the image that overflows the box.
#[must_use]
pub fn zoom_offset(width: f32, height: f32, transform: ZoomTransform) -> AbsoluteOffset {
    let axis = |extent: f32, shift: f32| {
        let overflow = (extent * transform.scale - extent).max(0.0);
        (overflow / 2.0 - shift).clamp(0.0, overflow)
    };
    AbsoluteOffset {
        x: axis(width, transform.dx),
        y: axis(height, transform.dy),
    }
}
