// SPDX-License-Identifier: MPL-2.0
//! Per-index image cache and slide width computation.
//!
//! Entries are keyed by photo index and created once the first load attempt
//! for that index settles. The cache is never evicted piecemeal; it is
//! cleared wholesale when the photo collection or its source key changes.

use crate::config::{FALLBACK_NATURAL_HEIGHT, FALLBACK_NATURAL_WIDTH, PLACEHOLDER_WIDTH_PX};
use std::collections::HashMap;

/// Pixel dimensions reported by an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Replaces zero dimensions with the 800×600 fallback.
    #[must_use]
    pub fn or_fallback(self) -> Self {
        Self {
            width: if self.width == 0 {
                FALLBACK_NATURAL_WIDTH
            } else {
                self.width
            },
            height: if self.height == 0 {
                FALLBACK_NATURAL_HEIGHT
            } else {
                self.height
            },
        }
    }
}

/// Terminal outcome of a load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedImage {
    /// Render width for the current viewport.
    pub display_width: f32,
    pub natural_width: u32,
    pub natural_height: u32,
    pub load_state: LoadState,
    pub src: String,
}

impl CachedImage {
    /// Builds an entry from a settled load. Failed loads carry no dimensions
    /// and fall back to 800×600 like images that report none.
    #[must_use]
    pub fn settled(
        src: String,
        dimensions: Option<ImageDimensions>,
        viewport: &Viewport,
    ) -> Self {
        let load_state = if dimensions.is_some() {
            LoadState::Loaded
        } else {
            LoadState::Failed
        };
        let natural = dimensions.unwrap_or_default().or_fallback();
        Self {
            display_width: viewport.display_width(natural),
            natural_width: natural.width,
            natural_height: natural.height,
            load_state,
            src,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    /// Source to paint on the slide; failed images have none.
    #[must_use]
    pub fn visible_source(&self) -> Option<&str> {
        match self.load_state {
            LoadState::Loaded => Some(self.src.as_str()),
            LoadState::Failed => None,
        }
    }
}

/// Layout geometry the width computation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Current width of the carousel container.
    pub container_width: f32,
    /// Current height of the slide track.
    pub track_height: f32,
    pub is_mobile: bool,
}

impl Viewport {
    /// Render width for an image of the given natural size.
    ///
    /// Mobile slides are full-bleed. Desktop slides keep the aspect ratio at
    /// the track height, capped at the container width.
    #[must_use]
    pub fn display_width(&self, natural: ImageDimensions) -> f32 {
        if self.is_mobile {
            return self.container_width;
        }
        let natural = natural.or_fallback();
        let ratio = natural.width as f32 / natural.height as f32;
        (self.track_height * ratio).min(self.container_width)
    }

    /// Width of a slide whose image has not settled yet.
    #[must_use]
    pub fn placeholder_width(&self) -> f32 {
        if self.is_mobile {
            self.container_width
        } else {
            PLACEHOLDER_WIDTH_PX
        }
    }
}

/// Index → [`CachedImage`] mapping shared by the engine components.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    entries: HashMap<usize, CachedImage>,
}

impl ImageCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CachedImage> {
        self.entries.get(&index)
    }

    pub fn insert(&mut self, index: usize, image: CachedImage) {
        self.entries.insert(index, image);
    }

    /// Whether a load for `index` has already reached a terminal state.
    #[must_use]
    pub fn is_settled(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Cached display width, `0.0` while the index has not settled.
    #[must_use]
    pub fn width_of(&self, index: usize) -> f32 {
        self.entries.get(&index).map_or(0.0, |image| image.display_width)
    }

    /// Recomputes display widths of successfully loaded entries.
    pub fn recompute_widths(&mut self, viewport: &Viewport) {
        for image in self.entries.values_mut().filter(|image| image.is_loaded()) {
            image.display_width = viewport.display_width(ImageDimensions::new(
                image.natural_width,
                image.natural_height,
            ));
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn desktop() -> Viewport {
        Viewport {
            container_width: 1200.0,
            track_height: 500.0,
            is_mobile: false,
        }
    }

    fn mobile() -> Viewport {
        Viewport {
            container_width: 390.0,
            track_height: 300.0,
            is_mobile: true,
        }
    }

    #[test]
    fn desktop_width_follows_aspect_ratio() {
        let width = desktop().display_width(ImageDimensions::new(1600, 1000));
        assert_abs_diff_eq!(width, 800.0, epsilon = 0.001);
    }

    #[test]
    fn desktop_width_is_capped_at_container() {
        let width = desktop().display_width(ImageDimensions::new(4000, 500));
        assert_abs_diff_eq!(width, 1200.0, epsilon = 0.001);
    }

    #[test]
    fn mobile_width_is_full_bleed() {
        let width = mobile().display_width(ImageDimensions::new(100, 1000));
        assert_abs_diff_eq!(width, 390.0, epsilon = 0.001);
    }

    #[test]
    fn zero_dimensions_use_fallback_ratio() {
        let width = desktop().display_width(ImageDimensions::new(0, 0));
        // 500 * 800 / 600
        assert_abs_diff_eq!(width, 666.666_7, epsilon = 0.01);
    }

    #[test]
    fn placeholder_width_depends_on_layout() {
        assert_abs_diff_eq!(desktop().placeholder_width(), 800.0, epsilon = 0.001);
        assert_abs_diff_eq!(mobile().placeholder_width(), 390.0, epsilon = 0.001);
    }

    #[test]
    fn failed_entry_has_fallback_geometry_and_no_source() {
        let image = CachedImage::settled("broken.jpg".into(), None, &desktop());
        assert_eq!(image.load_state, LoadState::Failed);
        assert_eq!(image.natural_width, 800);
        assert_eq!(image.natural_height, 600);
        assert!(image.visible_source().is_none());
    }

    #[test]
    fn width_of_missing_entry_is_zero() {
        let cache = ImageCache::new();
        assert_abs_diff_eq!(cache.width_of(3), 0.0, epsilon = f32::EPSILON);
        assert!(!cache.is_settled(3));
    }

    #[test]
    fn recompute_skips_failed_entries() {
        let mut cache = ImageCache::new();
        let view = desktop();
        cache.insert(
            0,
            CachedImage::settled("a.jpg".into(), Some(ImageDimensions::new(1000, 1000)), &view),
        );
        cache.insert(1, CachedImage::settled("b.jpg".into(), None, &view));
        let failed_width = cache.width_of(1);

        cache.recompute_widths(&mobile());

        assert_abs_diff_eq!(cache.width_of(0), 390.0, epsilon = 0.001);
        assert_abs_diff_eq!(cache.width_of(1), failed_width, epsilon = 0.001);
    }

    #[test]
    fn clear_removes_all_entries() {
        let mut cache = ImageCache::new();
        cache.insert(0, CachedImage::settled("a.jpg".into(), None, &desktop()));
        cache.insert(4, CachedImage::settled("e.jpg".into(), None, &desktop()));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
