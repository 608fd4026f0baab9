// SPDX-License-Identifier: MPL-2.0
//! Touch gesture recognizers: single-finger swipe and two-finger pinch-zoom.

mod pinch;
mod swipe;

pub use pinch::{PinchZoom, ZoomTransform};
pub use swipe::SwipeRecognizer;

use std::time::Instant;

/// A touch point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: TouchPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: TouchPoint) -> TouchPoint {
        TouchPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// One touch event as delivered by the front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    /// Fingers currently on the surface.
    pub touches: Vec<TouchPoint>,
    /// Fingers that changed in this event (pressed, moved or lifted).
    pub changed: Vec<TouchPoint>,
    pub at: Instant,
    /// Pinch scale reported directly by the platform, when it has one.
    pub native_scale: Option<f32>,
}

impl TouchInput {
    #[must_use]
    pub fn new(touches: Vec<TouchPoint>, changed: Vec<TouchPoint>, at: Instant) -> Self {
        Self {
            touches,
            changed,
            at,
            native_scale: None,
        }
    }

    /// Midpoint and distance of exactly two fingers.
    #[must_use]
    pub fn two_finger_geometry(&self) -> Option<(TouchPoint, f32)> {
        match self.touches.as_slice() {
            [a, b] => Some((a.midpoint(*b), a.distance_to(*b))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn geometry_requires_exactly_two_fingers() {
        let now = Instant::now();
        let one = TouchInput::new(vec![TouchPoint::new(0.0, 0.0)], vec![], now);
        let three = TouchInput::new(vec![TouchPoint::new(0.0, 0.0); 3], vec![], now);
        assert!(one.two_finger_geometry().is_none());
        assert!(three.two_finger_geometry().is_none());
    }

    #[test]
    fn geometry_reports_midpoint_and_distance() {
        let input = TouchInput::new(
            vec![TouchPoint::new(0.0, 0.0), TouchPoint::new(30.0, 40.0)],
            vec![],
            Instant::now(),
        );
        let (mid, distance) = input.two_finger_geometry().expect("two fingers");
        assert_abs_diff_eq!(mid.x, 15.0, epsilon = 0.001);
        assert_abs_diff_eq!(mid.y, 20.0, epsilon = 0.001);
        assert_abs_diff_eq!(distance, 50.0, epsilon = 0.001);
    }
}
