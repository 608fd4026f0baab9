// SPDX-License-Identifier: MPL-2.0
//! Single-finger horizontal swipe detection.

use super::{TouchInput, TouchPoint};
use crate::carousel::animator::Direction;
use crate::config::{SWIPE_MAX_DURATION, SWIPE_MIN_DISTANCE_PX};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct SwipeRecognizer {
    start: Option<(TouchPoint, Instant)>,
}

impl SwipeRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records where and when the touch began.
    pub fn start(&mut self, input: &TouchInput) {
        if let Some(point) = input.changed.first() {
            self.start = Some((*point, input.at));
        }
    }

    /// Classifies the finished touch.
    ///
    /// A swipe is fast (under a second), mostly horizontal, and travels more
    /// than 30 px. Leftward travel means `Next`.
    pub fn finish(&mut self, input: &TouchInput) -> Option<Direction> {
        let (origin, started_at) = self.start.take()?;
        let end = input.changed.first()?;
        let dx = end.x - origin.x;
        let dy = end.y - origin.y;
        let elapsed = input.at.saturating_duration_since(started_at);

        if elapsed < SWIPE_MAX_DURATION && dy.abs() < dx.abs() && dx.abs() > SWIPE_MIN_DISTANCE_PX {
            Some(if dx < 0.0 {
                Direction::Next
            } else {
                Direction::Prev
            })
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}
