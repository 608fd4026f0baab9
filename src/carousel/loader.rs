// SPDX-License-Identifier: MPL-2.0
//! Image loader: resolves photo indices into cache entries and slide commands.
//!
//! # Design
//!
//! - **Fast path**: an index that already settled (loaded or failed) is served
//!   from the cache synchronously, without touching the network.
//! - **Placeholder first**: a role waiting on a fetch is positioned with an
//!   empty placeholder so it never shows stale content.
//! - **One fetch per index**: a second request for an index already in
//!   flight waits on the existing fetch.
//! - **No retries, no cancellation**: every fetch settles exactly once.

use super::cache::{CachedImage, ImageCache, ImageDimensions, Viewport};
use super::effect::{Effect, SlideCommand};
use super::photos::PhotoCollection;
use super::window::{SlideOrder, SlideRole};
use std::collections::HashMap;

/// Identifies one outstanding fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Continuation run once a load completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterLoad {
    /// Recenter the track on the main slide.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub index: usize,
    /// Slide to position with the result, if any.
    pub role: Option<SlideRole>,
    pub after: Option<AfterLoad>,
}

impl LoadRequest {
    /// Load `index` into the slide at `role`.
    #[must_use]
    pub fn slide(index: usize, role: SlideRole, after: Option<AfterLoad>) -> Self {
        Self {
            index,
            role: Some(role),
            after,
        }
    }

    /// Cache warm-up with no visual effect.
    #[must_use]
    pub fn warm(index: usize) -> Self {
        Self {
            index,
            role: None,
            after: None,
        }
    }
}

/// Read-only inputs a load needs besides the cache.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    pub photos: &'a PhotoCollection,
    pub src_key: &'a str,
    pub viewport: &'a Viewport,
}

#[derive(Debug, Clone, Copy)]
struct Waiter {
    role: Option<SlideRole>,
    after: Option<AfterLoad>,
}

#[derive(Debug, Clone)]
struct InFlight {
    index: usize,
    waiters: Vec<Waiter>,
}

#[derive(Debug, Default)]
pub struct Loader {
    next_id: u64,
    in_flight: HashMap<RequestId, InFlight>,
    by_index: HashMap<usize, RequestId>,
}

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or short-circuits) a load.
    ///
    /// Slide commands and fetches are appended to `effects`. Returns the
    /// continuation to run now when the request completed synchronously.
    pub fn load(
        &mut self,
        cache: &mut ImageCache,
        ctx: LoadContext<'_>,
        request: LoadRequest,
        effects: &mut Vec<Effect>,
    ) -> Option<AfterLoad> {
        let LoadRequest { index, role, after } = request;

        if let Some(image) = cache.get(index) {
            if let Some(role) = role {
                effects.push(Effect::PositionSlide(command_for(role, image)));
            }
            return after;
        }

        if let Some(role) = role {
            effects.push(Effect::PositionSlide(SlideCommand {
                role,
                width: ctx.viewport.placeholder_width(),
                source: None,
            }));
        }

        let Some(src) = ctx.photos.source(index, ctx.src_key) else {
            log::warn!(
                "Photo {index} has no '{}' field, marking it as failed",
                ctx.src_key
            );
            let image = CachedImage::settled(String::new(), None, ctx.viewport);
            if let Some(role) = role {
                effects.push(Effect::PositionSlide(command_for(role, &image)));
            }
            cache.insert(index, image);
            return after;
        };

        let waiter = Waiter { role, after };
        if let Some(pending) = self
            .by_index
            .get(&index)
            .and_then(|id| self.in_flight.get_mut(id))
        {
            log::trace!("Photo {index} already in flight, joining existing fetch");
            pending.waiters.push(waiter);
            return None;
        }

        let id = RequestId(self.next_id);
        self.next_id += 1;
        log::debug!("Fetching photo {index} from {src} ({id:?})");
        self.in_flight.insert(
            id,
            InFlight {
                index,
                waiters: vec![waiter],
            },
        );
        self.by_index.insert(index, id);
        effects.push(Effect::FetchImage {
            request: id,
            index,
            src: src.to_string(),
        });
        None
    }

    /// Settles a fetch. `dimensions` is `None` when the image failed to load.
    ///
    /// The result is always written to the cache. Waiting roles whose index
    /// has moved on since the request are neither repositioned nor continued.
    /// Returns the continuations to run.
    pub fn resolve(
        &mut self,
        cache: &mut ImageCache,
        ctx: LoadContext<'_>,
        order: &SlideOrder,
        request: RequestId,
        dimensions: Option<ImageDimensions>,
        effects: &mut Vec<Effect>,
    ) -> Vec<AfterLoad> {
        let Some(pending) = self.in_flight.remove(&request) else {
            log::trace!("Ignoring resolution for unknown request {request:?}");
            return Vec::new();
        };
        if self.by_index.get(&pending.index) == Some(&request) {
            self.by_index.remove(&pending.index);
        }

        let src = ctx
            .photos
            .source(pending.index, ctx.src_key)
            .unwrap_or_default()
            .to_string();
        if dimensions.is_none() {
            log::warn!("Photo {} failed to load from {src}", pending.index);
        }
        let image = CachedImage::settled(src, dimensions, ctx.viewport);

        let mut continuations = Vec::new();
        for waiter in pending.waiters {
            match waiter.role {
                Some(role) if order.get(role) != pending.index => {
                    log::trace!("Slide {role:?} moved on from photo {}", pending.index);
                }
                Some(role) => {
                    effects.push(Effect::PositionSlide(command_for(role, &image)));
                    continuations.extend(waiter.after);
                }
                None => continuations.extend(waiter.after),
            }
        }
        cache.insert(pending.index, image);
        continuations
    }

    /// Forgets every outstanding fetch; their late results are ignored.
    pub fn reset(&mut self) {
        self.in_flight.clear();
        self.by_index.clear();
    }

    #[must_use]
    pub fn is_in_flight(&self, index: usize) -> bool {
        self.by_index.contains_key(&index)
    }

    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

fn command_for(role: SlideRole, image: &CachedImage) -> SlideCommand {
    SlideCommand {
        role,
        width: image.display_width,
        source: image.visible_source().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::cache::LoadState;

    struct Fixture {
        photos: PhotoCollection,
        viewport: Viewport,
        cache: ImageCache,
        loader: Loader,
    }

    impl Fixture {
        fn new(count: usize) -> Self {
            Self {
                photos: PhotoCollection::from_sources(
                    "src",
                    (0..count).map(|i| format!("photo{i}.jpg")),
                ),
                viewport: Viewport {
                    container_width: 1000.0,
                    track_height: 400.0,
                    is_mobile: false,
                },
                cache: ImageCache::new(),
                loader: Loader::new(),
            }
        }

        fn load(&mut self, request: LoadRequest, effects: &mut Vec<Effect>) -> Option<AfterLoad> {
            let ctx = LoadContext {
                photos: &self.photos,
                src_key: "src",
                viewport: &self.viewport,
            };
            self.loader.load(&mut self.cache, ctx, request, effects)
        }

        fn resolve(
            &mut self,
            order: &SlideOrder,
            request: RequestId,
            dimensions: Option<ImageDimensions>,
            effects: &mut Vec<Effect>,
        ) -> Vec<AfterLoad> {
            let ctx = LoadContext {
                photos: &self.photos,
                src_key: "src",
                viewport: &self.viewport,
            };
            self.loader
                .resolve(&mut self.cache, ctx, order, request, dimensions, effects)
        }
    }

    fn fetch_id(effects: &[Effect]) -> RequestId {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::FetchImage { request, .. } => Some(*request),
                _ => None,
            })
            .expect("expected a fetch")
    }

    fn fetch_count(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|effect| matches!(effect, Effect::FetchImage { .. }))
            .count()
    }

    #[test]
    fn first_load_places_placeholder_and_fetches() {
        let mut fx = Fixture::new(5);
        let mut effects = Vec::new();
        let after = fx.load(
            LoadRequest::slide(0, SlideRole::Main, Some(AfterLoad::Center)),
            &mut effects,
        );

        assert_eq!(after, None);
        assert_eq!(
            effects[0],
            Effect::PositionSlide(SlideCommand {
                role: SlideRole::Main,
                width: 800.0,
                source: None,
            })
        );
        assert!(matches!(
            &effects[1],
            Effect::FetchImage { index: 0, src, .. } if src == "photo0.jpg"
        ));
        assert!(fx.loader.is_in_flight(0));
        assert!(!fx.cache.is_settled(0));
    }

    #[test]
    fn resolution_positions_slide_and_runs_continuation() {
        let mut fx = Fixture::new(5);
        let order = SlideOrder::compute(0, 5);
        let mut effects = Vec::new();
        fx.load(
            LoadRequest::slide(0, SlideRole::Main, Some(AfterLoad::Center)),
            &mut effects,
        );
        let id = fetch_id(&effects);

        let mut effects = Vec::new();
        let after = fx.resolve(&order, id, Some(ImageDimensions::new(800, 400)), &mut effects);

        assert_eq!(after, vec![AfterLoad::Center]);
        assert_eq!(
            effects,
            vec![Effect::PositionSlide(SlideCommand {
                role: SlideRole::Main,
                width: 800.0,
                source: Some("photo0.jpg".to_string()),
            })]
        );
        assert_eq!(fx.cache.get(0).map(|i| i.load_state), Some(LoadState::Loaded));
        assert!(!fx.loader.is_in_flight(0));
    }

    #[test]
    fn settled_index_takes_fast_path() {
        let mut fx = Fixture::new(5);
        let order = SlideOrder::compute(0, 5);
        let mut effects = Vec::new();
        fx.load(LoadRequest::warm(2), &mut effects);
        let id = fetch_id(&effects);
        fx.resolve(&order, id, Some(ImageDimensions::new(400, 400)), &mut Vec::new());

        let mut effects = Vec::new();
        let after = fx.load(
            LoadRequest::slide(2, SlideRole::NextNext, Some(AfterLoad::Center)),
            &mut effects,
        );

        assert_eq!(after, Some(AfterLoad::Center));
        assert_eq!(fetch_count(&effects), 0);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn failed_index_is_not_refetched() {
        let mut fx = Fixture::new(5);
        let order = SlideOrder::compute(0, 5);
        let mut effects = Vec::new();
        fx.load(LoadRequest::slide(1, SlideRole::Next, None), &mut effects);
        let id = fetch_id(&effects);

        let mut effects = Vec::new();
        fx.resolve(&order, id, None, &mut effects);
        assert_eq!(
            effects,
            vec![Effect::PositionSlide(SlideCommand {
                role: SlideRole::Next,
                width: fx.cache.width_of(1),
                source: None,
            })]
        );

        let mut effects = Vec::new();
        fx.load(LoadRequest::slide(1, SlideRole::Next, None), &mut effects);
        assert_eq!(fetch_count(&effects), 0);
    }

    #[test]
    fn concurrent_loads_share_one_fetch() {
        let mut fx = Fixture::new(5);
        let order = SlideOrder::compute(0, 5);
        let mut effects = Vec::new();
        fx.load(LoadRequest::warm(3), &mut effects);
        fx.load(
            LoadRequest::slide(3, SlideRole::PrePrev, Some(AfterLoad::Center)),
            &mut effects,
        );
        assert_eq!(fetch_count(&effects), 1);
        assert_eq!(fx.loader.in_flight_count(), 1);

        let id = fetch_id(&effects);
        let mut effects = Vec::new();
        let after = fx.resolve(&order, id, Some(ImageDimensions::new(600, 400)), &mut effects);
        assert_eq!(after, vec![AfterLoad::Center]);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn stale_role_is_cached_but_not_positioned() {
        let mut fx = Fixture::new(8);
        let mut effects = Vec::new();
        fx.load(
            LoadRequest::slide(0, SlideRole::Main, Some(AfterLoad::Center)),
            &mut effects,
        );
        let id = fetch_id(&effects);

        // The window moved on before the image arrived.
        let moved = SlideOrder::compute(1, 8);
        let mut effects = Vec::new();
        let after = fx.resolve(&moved, id, Some(ImageDimensions::new(800, 600)), &mut effects);

        assert!(after.is_empty());
        assert!(effects.is_empty());
        assert!(fx.cache.is_settled(0));
    }

    #[test]
    fn missing_source_fails_without_fetch() {
        let mut fx = Fixture::new(0);
        fx.photos = PhotoCollection::new(vec![crate::carousel::Photo::new()]);
        let mut effects = Vec::new();
        let after = fx.load(
            LoadRequest::slide(0, SlideRole::Main, Some(AfterLoad::Center)),
            &mut effects,
        );

        assert_eq!(after, Some(AfterLoad::Center));
        assert_eq!(fetch_count(&effects), 0);
        assert_eq!(fx.cache.get(0).map(|i| i.load_state), Some(LoadState::Failed));
    }

    #[test]
    fn reset_discards_late_results() {
        let mut fx = Fixture::new(5);
        let order = SlideOrder::compute(0, 5);
        let mut effects = Vec::new();
        fx.load(LoadRequest::slide(0, SlideRole::Main, None), &mut effects);
        let id = fetch_id(&effects);

        fx.loader.reset();
        let mut effects = Vec::new();
        let after = fx.resolve(&order, id, Some(ImageDimensions::new(10, 10)), &mut effects);

        assert!(after.is_empty());
        assert!(effects.is_empty());
        assert!(!fx.cache.is_settled(0));
    }

    #[test]
    fn request_ids_are_unique() {
        let mut fx = Fixture::new(5);
        let mut effects = Vec::new();
        fx.load(LoadRequest::warm(0), &mut effects);
        fx.load(LoadRequest::warm(1), &mut effects);
        let ids: Vec<u64> = effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::FetchImage { request, .. } => Some(request.value()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
