// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the carousel. Constants are organized by category.
//!
//! # Categories
//!
//! - **Transition**: Slide animation timing
//! - **Layout**: Breakpoint and fallback geometry
//! - **Loading**: Speculative preload timing
//! - **Gestures**: Swipe thresholds and pinch-zoom bounds

use std::time::Duration;

// ==========================================================================
// Transition Defaults
// ==========================================================================

/// Default slide transition duration in milliseconds.
pub const DEFAULT_TRANSITION_DURATION_MS: u32 = 300;

/// Minimum transition duration (0 = instant).
pub const MIN_TRANSITION_DURATION_MS: u32 = 0;

/// Maximum transition duration.
pub const MAX_TRANSITION_DURATION_MS: u32 = 5_000;

/// Extra delay added after the transition duration before the track settles.
pub const SETTLE_PADDING: Duration = Duration::from_millis(10);

/// Default photo record field holding the image source.
pub const DEFAULT_SRC_KEY: &str = "src";

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Windows narrower than this (in logical pixels) use the mobile layout.
pub const DEFAULT_MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// Natural width assumed when an image reports no dimensions.
pub const FALLBACK_NATURAL_WIDTH: u32 = 800;

/// Natural height assumed when an image reports no dimensions.
pub const FALLBACK_NATURAL_HEIGHT: u32 = 600;

/// Placeholder slide width on the desktop layout while an image loads.
pub const PLACEHOLDER_WIDTH_PX: f32 = 800.0;

// ==========================================================================
// Loading Defaults
// ==========================================================================

/// Delay before the two indices just outside the window are warmed up.
pub const PRELOAD_DELAY: Duration = Duration::from_millis(1000);

/// Number of renderable image handles the front-end keeps around.
pub const DEFAULT_HANDLE_CACHE_CAPACITY: usize = 64;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// A swipe must finish within this time to count.
pub const SWIPE_MAX_DURATION: Duration = Duration::from_millis(1000);

/// Minimum horizontal travel (pixels) for a swipe.
pub const SWIPE_MIN_DISTANCE_PX: f32 = 30.0;

/// Smallest scale a pinch can apply.
pub const PINCH_MIN_SCALE: f32 = 1.0;

/// Largest scale a pinch can apply.
pub const PINCH_MAX_SCALE: f32 = 4.0;

/// Multiplier applied to the pinch midpoint displacement.
pub const PINCH_PAN_FACTOR: f32 = 2.0;

/// Delay between finger release and the pinch gesture being considered over.
pub const PINCH_RELEASE_DELAY: Duration = Duration::from_millis(100);
