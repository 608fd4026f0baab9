// SPDX-License-Identifier: MPL-2.0
//! Two-finger pinch-zoom on the main slide.
//!
//! The gesture only listens while armed (fullscreen on a touch device). It
//! produces a translate + scale transform relative to where the pinch began;
//! the transform is dropped as soon as the fingers lift, but the gesture
//! stays active for a short grace period so the release is not mistaken
//! for a swipe.

use super::{TouchInput, TouchPoint};
use crate::config::{PINCH_MAX_SCALE, PINCH_MIN_SCALE, PINCH_PAN_FACTOR};
use std::fmt;

/// Transform applied to the main slide while pinching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransform {
    pub dx: f32,
    pub dy: f32,
    pub scale: f32,
}

impl fmt::Display for ZoomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate3d({}px, {}px, 0) scale({})",
            self.dx, self.dy, self.scale
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinchZoom {
    armed: bool,
    active: bool,
    origin: Option<TouchPoint>,
    start_distance: f32,
    /// Bumped on every pinch start; release timers carry the value they
    /// were armed with.
    generation: u64,
}

impl PinchZoom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches or detaches the gesture.
    pub fn arm(&mut self, armed: bool) {
        self.armed = armed;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether a pinch is in progress or within its release grace period.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begins a pinch if exactly two fingers are down. Returns whether it did.
    pub fn start(&mut self, input: &TouchInput) -> bool {
        if !self.armed {
            return false;
        }
        let Some((midpoint, distance)) = input.two_finger_geometry() else {
            return false;
        };
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
        self.origin = Some(midpoint);
        self.start_distance = distance;
        true
    }

    /// Computes the transform for a two-finger move.
    #[must_use]
    pub fn update(&self, input: &TouchInput) -> Option<ZoomTransform> {
        if !self.armed || !self.active {
            return None;
        }
        let origin = self.origin?;
        let (midpoint, distance) = input.two_finger_geometry()?;

        let raw = input.native_scale.unwrap_or_else(|| {
            if self.start_distance > 0.0 {
                distance / self.start_distance
            } else {
                PINCH_MIN_SCALE
            }
        });
        Some(ZoomTransform {
            dx: (midpoint.x - origin.x) * PINCH_PAN_FACTOR,
            dy: (midpoint.y - origin.y) * PINCH_PAN_FACTOR,
            scale: clamp_scale(raw),
        })
    }

    /// Handles fingers lifting. Returns the generation to expire later when
    /// a pinch was in progress, `None` for plain taps and swipes.
    #[must_use]
    pub fn release(&self) -> Option<u64> {
        (self.armed && self.active).then_some(self.generation)
    }

    /// Ends the grace period started by [`PinchZoom::release`]. Releases of
    /// an earlier pinch leave a newer one running.
    pub fn expire(&mut self, generation: u64) {
        if generation != self.generation {
            log::trace!(
                "Ignoring release of pinch {generation}, now at {}",
                self.generation
            );
            return;
        }
        self.active = false;
        self.origin = None;
    }
}

/// Clamps a pinch scale to the supported `[1, 4]` range.
#[must_use]
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return PINCH_MIN_SCALE;
    }
    scale.clamp(PINCH_MIN_SCALE, PINCH_MAX_SCALE)
}
