// SPDX-License-Identifier: MPL-2.0
//! Carousel engine.
//!
//! [`Carousel`] owns all carousel state for one instance and is driven by
//! [`Message`]s. Every call to [`Carousel::handle`] returns the [`Effect`]s
//! the front-end must apply, in order: slide positioning, track offsets,
//! image fetches, timers and notifications. Asynchronous work (fetches and
//! timers) comes back in as messages, so the engine itself is synchronous
//! and single-threaded.
//!
//! # Components
//!
//! - [`window`]: which five photos are visible
//! - [`cache`] and [`loader`]: image geometry and load bookkeeping
//! - [`animator`]: transition state machine and offset math
//! - [`gesture`]: swipe and pinch-zoom recognizers
//! - [`fullscreen`]: fullscreen actions and page scroll lock

pub mod animator;
pub mod cache;
pub mod effect;
pub mod fullscreen;
pub mod gesture;
pub mod loader;
pub mod photos;
pub mod window;

pub use animator::{Direction, Phase, TransitionAnimator};
pub use cache::{CachedImage, ImageCache, ImageDimensions, LoadState, Viewport};
pub use effect::{Effect, Notification, SlideCommand, Timer};
pub use fullscreen::{FullscreenAction, ScrollLock};
pub use gesture::{PinchZoom, SwipeRecognizer, TouchInput, TouchPoint, ZoomTransform};
pub use loader::{AfterLoad, LoadContext, LoadRequest, Loader, RequestId};
pub use photos::{Photo, PhotoCollection};
pub use window::{validate_index, SlideOrder, SlideRole};

use crate::config::{
    CarouselConfig, DEFAULT_MOBILE_BREAKPOINT_PX, PINCH_RELEASE_DELAY, PRELOAD_DELAY,
};
use std::time::Duration;

/// Keys the carousel reacts to (on key release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Escape,
}

/// Window and container measurements supplied by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub window_width: f32,
    pub container_width: f32,
    pub track_height: f32,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Replaces the photo collection.
    SetPhotos(PhotoCollection),
    SetIndex(usize),
    SetConfig(CarouselConfig),
    Resized(Layout),
    /// A fetch settled; `Err` carries the failure reason.
    ImageResolved {
        request: RequestId,
        result: Result<ImageDimensions, String>,
    },
    TimerFired(Timer),
    /// Arrow buttons and other explicit navigation.
    Animate(Direction),
    TouchStart(TouchInput),
    TouchMove(TouchInput),
    TouchEnd(TouchInput),
    KeyReleased(Key),
    Fullscreen {
        action: FullscreenAction,
        /// Slide that was clicked to trigger the action, if any.
        slide: Option<SlideRole>,
    },
    /// Current vertical scroll offset of the page hosting the carousel.
    PageScrolled(f32),
    /// Declares whether the device supports touch input.
    TouchSupport(bool),
}

#[derive(Debug)]
pub struct Carousel {
    config: CarouselConfig,
    photos: PhotoCollection,
    index: usize,
    order: SlideOrder,
    cache: ImageCache,
    loader: Loader,
    animator: TransitionAnimator,
    layout: Layout,
    viewport: Viewport,
    mobile_breakpoint: f32,
    swipe: SwipeRecognizer,
    pinch: PinchZoom,
    scroll_lock: ScrollLock,
    page_top: f32,
    fullscreen: bool,
    touch_capable: bool,
    keyboard_enabled: bool,
}

impl Carousel {
    /// Creates an engine with no photos.
    ///
    /// Keyboard navigation is enabled only if this initial layout is not
    /// mobile.
    #[must_use]
    pub fn new(config: CarouselConfig, layout: Layout) -> Self {
        let mut carousel = Self {
            config,
            photos: PhotoCollection::default(),
            index: 0,
            order: SlideOrder::default(),
            cache: ImageCache::new(),
            loader: Loader::new(),
            animator: TransitionAnimator::new(),
            layout,
            viewport: Viewport::default(),
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT_PX,
            swipe: SwipeRecognizer::new(),
            pinch: PinchZoom::new(),
            scroll_lock: ScrollLock::default(),
            page_top: 0.0,
            fullscreen: false,
            touch_capable: false,
            keyboard_enabled: false,
        };
        carousel.apply_layout(layout);
        carousel.keyboard_enabled = !carousel.viewport.is_mobile;
        carousel
    }

    /// Overrides the window width below which the mobile layout applies.
    #[must_use]
    pub fn with_mobile_breakpoint(mut self, breakpoint: f32) -> Self {
        self.mobile_breakpoint = breakpoint;
        self.apply_layout(self.layout);
        self.keyboard_enabled = !self.viewport.is_mobile;
        self
    }

    #[must_use]
    pub fn with_touch(mut self, touch_capable: bool) -> Self {
        self.touch_capable = touch_capable;
        self
    }

    /// Handles one message and returns the effects to apply, in order.
    pub fn handle(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();
        match message {
            Message::SetPhotos(photos) => {
                self.photos = photos;
                self.on_collection_change(&mut effects);
            }
            Message::SetConfig(config) => {
                self.config = config;
                self.on_collection_change(&mut effects);
            }
            Message::SetIndex(index) => {
                self.index = index;
                if self.is_ready() {
                    self.refresh_order();
                    self.load_window(Some(AfterLoad::Center), &mut effects);
                }
            }
            Message::Resized(layout) => self.relayout(layout, &mut effects),
            Message::ImageResolved { request, result } => {
                let dimensions = match result {
                    Ok(dimensions) => Some(dimensions),
                    Err(reason) => {
                        log::debug!("Fetch {request:?} failed: {reason}");
                        None
                    }
                };
                let ctx = LoadContext {
                    photos: &self.photos,
                    src_key: &self.config.src_key,
                    viewport: &self.viewport,
                };
                let continuations = self.loader.resolve(
                    &mut self.cache,
                    ctx,
                    &self.order,
                    request,
                    dimensions,
                    &mut effects,
                );
                self.run_continuations(continuations, &mut effects);
            }
            Message::TimerFired(timer) => self.on_timer(timer, &mut effects),
            Message::Animate(direction) => self.animate(direction, &mut effects),
            Message::TouchStart(input) => {
                self.pinch.start(&input);
                if !self.pinch.is_active() {
                    self.swipe.start(&input);
                }
            }
            Message::TouchMove(input) => {
                if let Some(transform) = self.pinch.update(&input) {
                    effects.push(Effect::SetZoomTransform(Some(transform)));
                }
            }
            Message::TouchEnd(input) => self.on_touch_end(&input, &mut effects),
            Message::KeyReleased(key) => self.on_key(key, &mut effects),
            Message::Fullscreen { action, slide } => {
                self.on_fullscreen(action, slide, &mut effects);
            }
            Message::PageScrolled(top) => {
                if !self.scroll_lock.is_locked() {
                    self.page_top = top;
                }
            }
            Message::TouchSupport(touch_capable) => {
                self.touch_capable = touch_capable;
                self.rearm_pinch();
            }
        }
        effects
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn order(&self) -> SlideOrder {
        self.order
    }

    #[must_use]
    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    #[must_use]
    pub fn photos(&self) -> &PhotoCollection {
        &self.photos
    }

    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_locked()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.animator.phase()
    }

    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.pinch.is_active()
    }

    #[must_use]
    pub fn is_pinch_armed(&self) -> bool {
        self.pinch.is_armed()
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_lock.is_locked()
    }

    #[must_use]
    pub fn keyboard_enabled(&self) -> bool {
        self.keyboard_enabled
    }

    fn is_ready(&self) -> bool {
        !self.photos.is_empty() && !self.config.src_key.is_empty()
    }

    fn refresh_order(&mut self) {
        self.order = SlideOrder::compute(self.index, self.photos.len());
        self.index = self.order.main;
    }

    fn apply_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.viewport = Viewport {
            container_width: layout.container_width,
            track_height: layout.track_height,
            is_mobile: layout.window_width < self.mobile_breakpoint,
        };
    }

    fn on_collection_change(&mut self, effects: &mut Vec<Effect>) {
        if !self.is_ready() {
            log::debug!("Photo collection or source key empty, nothing to show");
            return;
        }
        log::debug!(
            "Rebuilding carousel for {} photos keyed by '{}'",
            self.photos.len(),
            self.config.src_key
        );
        self.cache.clear();
        self.loader.reset();
        self.refresh_order();
        self.load_window(Some(AfterLoad::Center), effects);
        effects.push(Effect::Schedule {
            timer: Timer::Preload,
            after: PRELOAD_DELAY,
        });
    }

    fn load(&mut self, request: LoadRequest, effects: &mut Vec<Effect>) -> Option<AfterLoad> {
        let ctx = LoadContext {
            photos: &self.photos,
            src_key: &self.config.src_key,
            viewport: &self.viewport,
        };
        self.loader.load(&mut self.cache, ctx, request, effects)
    }

    /// Loads all five slides of the current window.
    fn load_window(&mut self, after: Option<AfterLoad>, effects: &mut Vec<Effect>) {
        let order = self.order;
        let continuations: Vec<AfterLoad> = order
            .entries(SlideRole::LOAD_ORDER)
            .filter_map(|(role, index)| self.load(LoadRequest::slide(index, role, after), effects))
            .collect();
        self.run_continuations(continuations, effects);
    }

    fn load_window_and_neighbors(&mut self, after: Option<AfterLoad>, effects: &mut Vec<Effect>) {
        self.load_window(after, effects);
        effects.push(Effect::Schedule {
            timer: Timer::Preload,
            after: PRELOAD_DELAY,
        });
    }

    fn preload_neighbors(&mut self, effects: &mut Vec<Effect>) {
        for index in self.order.outer_neighbors(self.photos.len()) {
            self.load(LoadRequest::warm(index), effects);
        }
    }

    fn run_continuations(&mut self, continuations: Vec<AfterLoad>, effects: &mut Vec<Effect>) {
        if continuations.contains(&AfterLoad::Center) {
            self.center(effects);
        }
    }

    fn center(&self, effects: &mut Vec<Effect>) {
        effects.push(Effect::SetTrackOffset(animator::center_offset(
            &self.order,
            &self.cache,
            &self.viewport,
        )));
    }

    fn relayout(&mut self, layout: Layout, effects: &mut Vec<Effect>) {
        self.apply_layout(layout);
        self.cache.recompute_widths(&self.viewport);
        if self.is_ready() {
            self.load_window(None, effects);
            self.center(effects);
        }
    }

    fn animate(&mut self, direction: Direction, effects: &mut Vec<Effect>) {
        if !self.is_ready() {
            return;
        }
        let Some(transition) = self.animator.begin(
            direction,
            self.index,
            self.photos.len(),
            &self.order,
            &self.cache,
            &self.viewport,
        ) else {
            return;
        };

        effects.push(Effect::SetTrackTransition(Some(
            self.config.transition_duration.as_duration(),
        )));
        self.index = transition.new_index;
        effects.push(Effect::SetSlideActive {
            role: SlideRole::Main,
            active: false,
        });
        effects.push(Effect::SetSlideActive {
            role: direction.incoming(),
            active: true,
        });
        effects.push(Effect::SetTrackOffset(transition.track_offset));
        effects.push(Effect::Schedule {
            timer: Timer::Settle,
            after: self.config.transition_duration.settle_delay(),
        });
        // Warm-up runs against the outgoing window, independent of the lock.
        self.preload_neighbors(effects);
    }

    fn on_timer(&mut self, timer: Timer, effects: &mut Vec<Effect>) {
        match timer {
            Timer::Settle => {
                if self.animator.settle().is_some() {
                    effects.push(Effect::SetTrackTransition(None));
                    self.refresh_order();
                    effects.push(Effect::Schedule {
                        timer: Timer::Finalize,
                        after: Duration::ZERO,
                    });
                }
            }
            Timer::Finalize => {
                let Some(direction) = self.animator.finish() else {
                    return;
                };
                effects.push(Effect::SetSlideActive {
                    role: SlideRole::Main,
                    active: true,
                });
                effects.push(Effect::SetSlideActive {
                    role: direction.incoming(),
                    active: false,
                });
                self.load_window_and_neighbors(None, effects);
                self.center(effects);
                self.rearm_pinch();
                log::debug!("Transition {direction:?} done, now at photo {}", self.index);
                effects.push(Effect::Emit(Notification::Change(self.index)));
            }
            Timer::Preload => {
                if self.is_ready() {
                    self.preload_neighbors(effects);
                }
            }
            Timer::PinchRelease(generation) => self.pinch.expire(generation),
            Timer::FullscreenSettle => {
                self.relayout(self.layout, effects);
                self.center(effects);
                effects.push(Effect::Emit(Notification::Fullscreen(self.fullscreen)));
            }
        }
    }

    fn on_touch_end(&mut self, input: &TouchInput, effects: &mut Vec<Effect>) {
        if let Some(generation) = self.pinch.release() {
            effects.push(Effect::SetZoomTransform(None));
            effects.push(Effect::Schedule {
                timer: Timer::PinchRelease(generation),
                after: PINCH_RELEASE_DELAY,
            });
        }
        if self.pinch.is_active() {
            self.swipe.cancel();
            return;
        }
        effects.push(Effect::SetZoomTransform(None));
        if let Some(direction) = self.swipe.finish(input) {
            self.animate(direction, effects);
        }
    }

    fn on_key(&mut self, key: Key, effects: &mut Vec<Effect>) {
        if !self.keyboard_enabled {
            return;
        }
        match key {
            Key::ArrowRight => self.animate(Direction::Next, effects),
            Key::ArrowLeft => self.animate(Direction::Prev, effects),
            Key::Escape => {
                if self.fullscreen {
                    self.on_fullscreen(FullscreenAction::Close, None, effects);
                }
            }
        }
    }

    fn on_fullscreen(
        &mut self,
        action: FullscreenAction,
        slide: Option<SlideRole>,
        effects: &mut Vec<Effect>,
    ) {
        match action {
            FullscreenAction::Toggle => {
                if let Some(role) = slide.filter(|_| self.is_ready()) {
                    self.index = self.order.get(role);
                    self.refresh_order();
                    self.load_window(Some(AfterLoad::Center), effects);
                }
                effects.extend(self.scroll_lock.toggle(self.page_top));
                self.fullscreen = !self.fullscreen;
            }
            FullscreenAction::Open => {
                effects.extend(self.scroll_lock.lock(self.page_top));
                self.fullscreen = true;
            }
            FullscreenAction::Close => {
                effects.extend(self.scroll_lock.unlock());
                self.fullscreen = false;
            }
        }
        self.rearm_pinch();
        effects.push(Effect::Schedule {
            timer: Timer::FullscreenSettle,
            after: Duration::ZERO,
        });
    }

    fn rearm_pinch(&mut self) {
        self.pinch.arm(self.fullscreen && self.touch_capable);
    }
}
