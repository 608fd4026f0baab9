// SPDX-License-Identifier: MPL-2.0
//! Transition state machine and track positioning math.
//!
//! A transition runs through three phases:
//!
//! - `Idle`: no transition; `begin` is accepted.
//! - `Settling`: the track is gliding towards the incoming slide. Entered by
//!   `begin`, left when the settle timer fires.
//! - `Finalizing`: transition styling is off and the window has been
//!   recomputed; one tick later the lock is released.
//!
//! Requests to start a transition while not `Idle` are dropped, not queued.

use super::cache::{ImageCache, Viewport};
use super::window::{validate_index, SlideOrder, SlideRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Direction {
    /// Slide that becomes the main slide when moving in this direction.
    #[must_use]
    pub fn incoming(self) -> SlideRole {
        match self {
            Direction::Next => SlideRole::Next,
            Direction::Prev => SlideRole::Prev,
        }
    }

    #[must_use]
    pub fn step(self) -> isize {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Settling(Direction),
    Finalizing(Direction),
}

/// Outcome of a successfully started transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub direction: Direction,
    /// Track offset to animate towards.
    pub track_offset: f32,
    /// Current index after the (optimistic) advance.
    pub new_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TransitionAnimator {
    phase: Phase,
}

impl TransitionAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a transition holds the lock.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// `Idle → Settling`. Returns `None` (and changes nothing) while locked.
    pub fn begin(
        &mut self,
        direction: Direction,
        current: usize,
        len: usize,
        order: &SlideOrder,
        cache: &ImageCache,
        viewport: &Viewport,
    ) -> Option<Transition> {
        if self.is_locked() {
            log::trace!("Dropping {direction:?} transition, another one is running");
            return None;
        }
        self.phase = Phase::Settling(direction);
        let current = isize::try_from(current).unwrap_or(isize::MAX);
        let new_index = validate_index(current + direction.step(), len);
        log::debug!("Transition {direction:?} towards photo {new_index}");
        Some(Transition {
            direction,
            track_offset: travel_offset(direction, order, cache, viewport),
            new_index,
        })
    }

    /// `Settling → Finalizing`. Returns the direction in flight, or `None`
    /// if the animator was not settling.
    pub fn settle(&mut self) -> Option<Direction> {
        match self.phase {
            Phase::Settling(direction) => {
                self.phase = Phase::Finalizing(direction);
                Some(direction)
            }
            _ => None,
        }
    }

    /// `Finalizing → Idle`, releasing the lock.
    pub fn finish(&mut self) -> Option<Direction> {
        match self.phase {
            Phase::Finalizing(direction) => {
                self.phase = Phase::Idle;
                Some(direction)
            }
            _ => None,
        }
    }
}

/// Resting track offset that centers the main slide.
///
/// Slides that have not settled count as zero width, which yields a
/// provisional position until their loads complete.
#[must_use]
pub fn center_offset(order: &SlideOrder, cache: &ImageCache, viewport: &Viewport) -> f32 {
    let pre_prev = cache.width_of(order.pre_prev);
    let prev = cache.width_of(order.prev);
    let main = cache.width_of(order.main);
    viewport.container_width / 2.0 - (prev + pre_prev + main / 2.0)
}

/// Track offset that brings the incoming slide to the center.
#[must_use]
pub fn travel_offset(
    direction: Direction,
    order: &SlideOrder,
    cache: &ImageCache,
    viewport: &Viewport,
) -> f32 {
    let pre_prev = cache.width_of(order.pre_prev);
    let prev = cache.width_of(order.prev);
    let main = cache.width_of(order.main);
    let container = viewport.container_width;

    match direction {
        Direction::Next => {
            let next = cache.width_of(order.next);
            -((prev + pre_prev + main) - (container - next) / 2.0)
        }
        Direction::Prev if viewport.is_mobile => -(pre_prev - (container - prev) / 2.0),
        Direction::Prev => {
            let resting = container / 2.0 - (main / 2.0 + (prev + pre_prev));
            resting + main / 2.0 + prev / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::cache::{CachedImage, ImageDimensions};
    use crate::test_utils::assert_abs_diff_eq;

    fn viewport(is_mobile: bool) -> Viewport {
        Viewport {
            container_width: 1000.0,
            track_height: 100.0,
            is_mobile,
        }
    }

    /// Cache where photo `i` is `widths[i]` pixels wide on the desktop layout.
    fn cache_with_widths(widths: &[u32]) -> ImageCache {
        let view = viewport(false);
        let mut cache = ImageCache::new();
        for (index, width) in widths.iter().enumerate() {
            cache.insert(
                index,
                CachedImage::settled(
                    format!("{index}.jpg"),
                    Some(ImageDimensions::new(*width, 100)),
                    &view,
                ),
            );
        }
        cache
    }

    #[test]
    fn begin_while_locked_is_dropped() {
        let mut animator = TransitionAnimator::new();
        let order = SlideOrder::compute(0, 5);
        let cache = ImageCache::new();
        let view = viewport(false);

        let first = animator.begin(Direction::Next, 0, 5, &order, &cache, &view);
        let second = animator.begin(Direction::Next, 1, 5, &order, &cache, &view);

        assert_eq!(first.map(|t| t.new_index), Some(1));
        assert!(second.is_none());
        assert_eq!(animator.phase(), Phase::Settling(Direction::Next));
    }

    #[test]
    fn phases_advance_in_order() {
        let mut animator = TransitionAnimator::new();
        let order = SlideOrder::compute(0, 5);
        let view = viewport(false);
        animator.begin(Direction::Prev, 0, 5, &order, &ImageCache::new(), &view);

        assert_eq!(animator.finish(), None);
        assert_eq!(animator.settle(), Some(Direction::Prev));
        assert_eq!(animator.phase(), Phase::Finalizing(Direction::Prev));
        assert_eq!(animator.settle(), None);
        assert_eq!(animator.finish(), Some(Direction::Prev));
        assert!(!animator.is_locked());
    }

    #[test]
    fn prev_from_zero_clamps_to_last() {
        let mut animator = TransitionAnimator::new();
        let order = SlideOrder::compute(0, 5);
        let transition = animator
            .begin(Direction::Prev, 0, 5, &order, &ImageCache::new(), &viewport(false))
            .expect("idle animator accepts a transition");
        assert_eq!(transition.new_index, 4);
    }

    #[test]
    fn center_offset_centers_main() {
        // order at 2 of 5: pre_prev=0, prev=1, main=2
        let cache = cache_with_widths(&[100, 200, 300, 400, 500]);
        let order = SlideOrder::compute(2, 5);
        let offset = center_offset(&order, &cache, &viewport(false));
        // 500 - (200 + 100 + 150)
        assert_abs_diff_eq!(offset, 50.0, epsilon = 0.001);
    }

    #[test]
    fn center_offset_treats_unloaded_as_zero() {
        let order = SlideOrder::compute(2, 5);
        let offset = center_offset(&order, &ImageCache::new(), &viewport(false));
        assert_abs_diff_eq!(offset, 500.0, epsilon = 0.001);
    }

    #[test]
    fn next_offset_centers_next_slide() {
        let cache = cache_with_widths(&[100, 200, 300, 400, 500]);
        let order = SlideOrder::compute(2, 5);
        let offset = travel_offset(Direction::Next, &order, &cache, &viewport(false));
        // -((200 + 100 + 300) - (1000 - 400) / 2)
        assert_abs_diff_eq!(offset, -300.0, epsilon = 0.001);
    }

    #[test]
    fn prev_offset_desktop_is_positive_formula() {
        let cache = cache_with_widths(&[100, 200, 300, 400, 500]);
        let order = SlideOrder::compute(2, 5);
        let offset = travel_offset(Direction::Prev, &order, &cache, &viewport(false));
        // resting 50, + 150 + 100
        assert_abs_diff_eq!(offset, 300.0, epsilon = 0.001);
    }

    #[test]
    fn prev_offset_mobile_uses_pre_prev_only() {
        let cache = cache_with_widths(&[100, 200, 300, 400, 500]);
        let order = SlideOrder::compute(2, 5);
        let offset = travel_offset(Direction::Prev, &order, &cache, &viewport(true));
        // -(100 - (1000 - 200) / 2)
        assert_abs_diff_eq!(offset, 300.0, epsilon = 0.001);
    }

    #[test]
    fn direction_maps_to_incoming_role() {
        assert_eq!(Direction::Next.incoming(), SlideRole::Next);
        assert_eq!(Direction::Prev.incoming(), SlideRole::Prev);
    }
}
