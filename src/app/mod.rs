// SPDX-License-Identifier: MPL-2.0
//! Application root: hosts one carousel in an Iced window.
//!
//! The `App` struct owns the engine and translates its effects into Iced
//! tasks: timers become sleeps, image fetches run on the Tokio runtime, track
//! offsets become scroll operations and fullscreen notifications switch the
//! window mode. Native events come back in through the subscription.

mod message;
mod subscription;
pub mod track;
mod view;

pub use message::{FingerEvent, Flags, Message};

use crate::carousel::{
    self, Carousel, Effect, Layout, Notification, PhotoCollection, SlideRole, TouchInput,
    TouchPoint,
};
use crate::config::{self, SortOrder, DEFAULT_HANDLE_CACHE_CAPACITY};
use crate::directory_scanner;
use crate::error::Result;
use crate::fetch::{self, FetchedImage, Source};
use iced::widget::scrollable::AbsoluteOffset;
use iced::widget::{operation, Id};
use iced::{window, Element, Size, Subscription, Task, Theme};
use lru::LruCache;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use track::Track;

pub const WINDOW_DEFAULT_WIDTH: f32 = 1024.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 720.0;
pub const MIN_WINDOW_WIDTH: f32 = 360.0;
pub const MIN_WINDOW_HEIGHT: f32 = 320.0;
/// Share of the window height used by the track outside fullscreen.
pub const TRACK_HEIGHT_RATIO: f32 = 0.7;

pub struct App {
    carousel: Carousel,
    track: Track,
    handles: LruCache<String, FetchedImage>,
    /// Sources whose evicted handle is being fetched again.
    refilling: HashSet<String>,
    client: Option<reqwest::Client>,
    /// Folder relative manifest sources are resolved against.
    base_dir: Option<PathBuf>,
    window_id: Option<window::Id>,
    window_size: Size,
    fingers: BTreeMap<u64, TouchPoint>,
    /// Touch support is unknown until the first touch event.
    detect_touch: bool,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("index", &self.carousel.index())
            .field("photos", &self.carousel.photos().len())
            .field("fullscreen", &self.carousel.is_fullscreen())
            .finish()
    }
}

/// Builds the window settings
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced requires an `Fn` boot closure; the flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || App::new(boot_state.borrow_mut().take().unwrap_or_default());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

/// Loads photos from an image directory or a `.toml` manifest.
///
/// Returns the collection and, for manifests, the folder their relative
/// sources are resolved against.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or the manifest cannot be
/// read or parsed.
pub fn load_photos(
    path: &Path,
    sort_order: SortOrder,
    src_key: &str,
) -> Result<(PhotoCollection, Option<PathBuf>)> {
    let is_manifest = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_manifest {
        let photos = carousel::photos::load_manifest(path)?;
        log::info!("Loaded {} photos from {}", photos.len(), path.display());
        Ok((photos, path.parent().map(Path::to_path_buf)))
    } else {
        Ok((
            directory_scanner::scan_directory(path, sort_order, src_key)?,
            None,
        ))
    }
}

/// Carousel geometry for a window of `size`.
#[must_use]
pub fn layout_for(size: Size, fullscreen: bool) -> Layout {
    Layout {
        window_width: size.width,
        container_width: size.width,
        track_height: if fullscreen {
            size.height
        } else {
            size.height * TRACK_HEIGHT_RATIO
        },
    }
}

impl App {
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let (config, _warning) = match flags.config_dir.as_deref() {
            Some(dir) => config::load_or_default(&config::path_in_dir(Path::new(dir))),
            None => config::load(),
        };
        let engine_config = config.carousel_config();

        let (photos, base_dir) = match flags.source.as_deref() {
            Some(source) => load_photos(
                Path::new(source),
                config.sort_order(),
                &engine_config.src_key,
            )
            .unwrap_or_else(|err| {
                log::error!("Cannot load photos from {source}: {err}");
                (PhotoCollection::default(), None)
            }),
            None => (PhotoCollection::default(), None),
        };

        let client = match fetch::http_client() {
            Ok(client) => Some(client),
            Err(err) => {
                log::warn!("Remote photos are unavailable: {err}");
                None
            }
        };

        let window_size = Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT);
        let touch_capable = config.display.touch_capable;
        let engine = Carousel::new(engine_config, layout_for(window_size, false))
            .with_mobile_breakpoint(config.mobile_breakpoint())
            .with_touch(touch_capable.unwrap_or(false));

        let mut track = Track::new();
        track.set_active(SlideRole::Main, true);

        let mut app = App {
            carousel: engine,
            track,
            handles: LruCache::new(
                NonZeroUsize::new(DEFAULT_HANDLE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
            refilling: HashSet::new(),
            client,
            base_dir,
            window_id: None,
            window_size,
            fingers: BTreeMap::new(),
            detect_touch: touch_capable.is_none(),
        };

        let start = app.dispatch(carousel::Message::SetIndex(flags.start_index.unwrap_or(0)));
        let load = app.dispatch(carousel::Message::SetPhotos(photos));
        (app, Task::batch([start, load]))
    }

    fn title(&self) -> String {
        let count = self.carousel.photos().len();
        if count == 0 {
            "Iced Carousel".to_string()
        } else {
            format!("{}/{count} - Iced Carousel", self.carousel.index() + 1)
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            subscription::create_event_subscription(),
            subscription::create_tick_subscription(self.track.is_gliding()),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Carousel(message) => self.dispatch(message),
            Message::ImageFetched {
                request,
                src,
                result,
            } => {
                let result = match result {
                    Ok(image) => {
                        let dimensions = image.dimensions;
                        self.handles.put(src, image);
                        Ok(dimensions)
                    }
                    Err(err) => {
                        if err.is_transient() {
                            log::warn!("Fetching {src} failed: {err}");
                        } else {
                            log::info!("Fetching {src} failed: {err}");
                        }
                        Err(err.to_string())
                    }
                };
                self.dispatch(carousel::Message::ImageResolved { request, result })
            }
            Message::HandleFetched { src, result } => {
                self.refilling.remove(&src);
                match result {
                    Ok(image) => {
                        self.handles.put(src, image);
                    }
                    Err(err) => log::warn!("Refetching {src} failed: {err}"),
                }
                Task::none()
            }
            Message::SlideClicked(role) => {
                if self.carousel.is_animating() || self.carousel.is_zooming() {
                    return Task::none();
                }
                self.dispatch(carousel::Message::Fullscreen {
                    action: carousel::FullscreenAction::Toggle,
                    slide: Some(role),
                })
            }
            Message::WindowOpened { id, size } | Message::WindowResized { id, size } => {
                self.window_id = Some(id);
                self.window_size = size;
                self.dispatch(carousel::Message::Resized(self.layout()))
            }
            Message::Finger(event) => self.on_finger(event),
            Message::Tick(now) => match self.track.tick(now) {
                Some(offset) => self.scroll_track(offset),
                None => Task::none(),
            },
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let layout = self.layout();
        let index = self.carousel.index();
        view::view(view::ViewContext {
            track: &self.track,
            handles: &self.handles,
            base_dir: self.base_dir.as_deref(),
            container_width: layout.container_width,
            track_height: layout.track_height,
            fullscreen: self.carousel.is_fullscreen(),
            index,
            count: self.carousel.photos().len(),
            current: self.carousel.photos().get(index),
        })
    }

    fn layout(&self) -> Layout {
        layout_for(self.window_size, self.carousel.is_fullscreen())
    }

    fn dispatch(&mut self, message: carousel::Message) -> Task<Message> {
        let effects = self.carousel.handle(message);
        let tasks: Vec<Task<Message>> = effects
            .into_iter()
            .map(|effect| self.apply(effect))
            .collect();
        Task::batch(tasks)
    }

    fn apply(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::PositionSlide(command) => {
                let refill = match command.source.clone() {
                    Some(src) => self.ensure_handle(src),
                    None => Task::none(),
                };
                self.track.position(command);
                refill
            }
            Effect::FetchImage { request, src, .. } => self.fetch(request, src),
            Effect::SetTrackOffset(offset) => match self.track.move_to(offset, Instant::now()) {
                Some(offset) => self.scroll_track(offset),
                None => Task::none(),
            },
            Effect::SetTrackTransition(transition) => match self.track.set_transition(transition) {
                Some(offset) => self.scroll_track(offset),
                None => Task::none(),
            },
            Effect::SetSlideActive { role, active } => {
                self.track.set_active(role, active);
                Task::none()
            }
            Effect::SetZoomTransform(transform) => {
                self.track.set_zoom(transform);
                let offset = transform.map_or(AbsoluteOffset { x: 0.0, y: 0.0 }, |transform| {
                    track::zoom_offset(
                        self.track.slide(SlideRole::Main).width,
                        self.layout().track_height,
                        transform,
                    )
                });
                operation::scroll_to(Id::new(view::ZOOM_ID), offset)
            }
            Effect::Schedule { timer, after } => Task::perform(tokio::time::sleep(after), move |()| {
                Message::Carousel(carousel::Message::TimerFired(timer))
            }),
            Effect::LockScroll { top } => scroll_page(top),
            Effect::UnlockScroll { restore_top } => scroll_page(restore_top),
            Effect::Emit(notification) => self.on_notification(notification),
        }
    }

    fn fetch(&mut self, request: carousel::RequestId, src: String) -> Task<Message> {
        if let Some(image) = self.handles.get(&src) {
            log::trace!("Serving {src} from the handle cache");
            return Task::done(Message::ImageFetched {
                request,
                src,
                result: Ok(image.clone()),
            });
        }
        let source = Source::parse(&src, self.base_dir.as_deref());
        let client = self.client.clone();
        Task::perform(fetch::fetch(source, client), move |result| {
            Message::ImageFetched {
                request,
                src,
                result,
            }
        })
    }

    /// Keeps the handle of a slide being positioned fresh in the LRU. The
    /// engine never refetches a settled index, so an evicted handle is
    /// fetched again here.
    fn ensure_handle(&mut self, src: String) -> Task<Message> {
        if self.handles.get(&src).is_some() || self.refilling.contains(&src) {
            return Task::none();
        }
        log::debug!("Handle for {src} was evicted, fetching it again");
        self.refilling.insert(src.clone());
        let source = Source::parse(&src, self.base_dir.as_deref());
        let client = self.client.clone();
        Task::perform(fetch::fetch(source, client), move |result| {
            Message::HandleFetched { src, result }
        })
    }

    fn on_notification(&mut self, notification: Notification) -> Task<Message> {
        match toml::to_string(&notification) {
            Ok(payload) => log::info!("Carousel event: {}", payload.replace('\n', " ")),
            Err(err) => log::debug!("Cannot serialize {notification:?}: {err}"),
        }
        match notification {
            Notification::Change(_) => Task::none(),
            Notification::Fullscreen(fullscreen) => {
                let relayout = Task::done(Message::Carousel(carousel::Message::Resized(
                    self.layout(),
                )));
                let Some(id) = self.window_id else {
                    return relayout;
                };
                let mode = if fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                Task::batch([window::set_mode(id, mode), relayout])
            }
        }
    }

    fn on_finger(&mut self, event: FingerEvent) -> Task<Message> {
        let mut tasks = Vec::new();
        if self.detect_touch {
            self.detect_touch = false;
            log::debug!("Touch input detected");
            tasks.push(self.dispatch(carousel::Message::TouchSupport(true)));
        }

        let now = Instant::now();
        let message = match event {
            FingerEvent::Pressed { id, position } => {
                let point = TouchPoint::new(position.x, position.y);
                self.fingers.insert(id, point);
                carousel::Message::TouchStart(self.touch_input(point, now))
            }
            FingerEvent::Moved { id, position } => {
                let point = TouchPoint::new(position.x, position.y);
                self.fingers.insert(id, point);
                carousel::Message::TouchMove(self.touch_input(point, now))
            }
            FingerEvent::Lifted { id, position } => {
                self.fingers.remove(&id);
                let point = TouchPoint::new(position.x, position.y);
                carousel::Message::TouchEnd(self.touch_input(point, now))
            }
        };
        tasks.push(self.dispatch(message));
        Task::batch(tasks)
    }

    fn touch_input(&self, changed: TouchPoint, at: Instant) -> TouchInput {
        TouchInput::new(self.fingers.values().copied().collect(), vec![changed], at)
    }

    fn scroll_track(&self, offset: f32) -> Task<Message> {
        // The track row starts with a spacer as wide as the container.
        let padding = self.layout().container_width;
        operation::scroll_to(
            Id::new(view::TRACK_ID),
            AbsoluteOffset {
                x: (padding - offset).max(0.0),
                y: 0.0,
            },
        )
    }
}

fn scroll_page(top: f32) -> Task<Message> {
    operation::scroll_to(
        Id::new(view::PAGE_ID),
        AbsoluteOffset {
            x: 0.0,
            y: top.max(0.0),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{ImageDimensions, SlideCommand};
    use crate::config::CarouselConfig;
    use crate::test_utils::assert_abs_diff_eq;
    use iced::widget::image::Handle;
    use std::fs;
    use tempfile::tempdir;

    fn app_with_capacity(capacity: usize) -> App {
        let window_size = Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT);
        App {
            carousel: Carousel::new(CarouselConfig::default(), layout_for(window_size, false)),
            track: Track::new(),
            handles: LruCache::new(NonZeroUsize::new(capacity).expect("non-zero capacity")),
            refilling: HashSet::new(),
            client: None,
            base_dir: None,
            window_id: None,
            window_size,
            fingers: BTreeMap::new(),
            detect_touch: false,
        }
    }

    fn fetched() -> FetchedImage {
        FetchedImage {
            handle: Handle::from_bytes(Vec::<u8>::new()),
            dimensions: ImageDimensions::new(800, 600),
        }
    }

    fn show(app: &mut App, src: &str) {
        let _ = app.apply(Effect::PositionSlide(SlideCommand {
            role: SlideRole::Main,
            width: 800.0,
            source: Some(src.to_string()),
        }));
    }

    #[test]
    fn positioned_slides_stay_in_handle_cache() {
        let mut app = app_with_capacity(2);
        app.handles.put("a.jpg".to_string(), fetched());
        app.handles.put("b.jpg".to_string(), fetched());

        show(&mut app, "a.jpg");
        app.handles.put("c.jpg".to_string(), fetched());

        assert!(app.handles.contains("a.jpg"));
        assert!(!app.handles.contains("b.jpg"));
        assert!(app.refilling.is_empty());
    }

    #[test]
    fn evicted_handle_is_fetched_again_once() {
        let mut app = app_with_capacity(1);
        let remote = "https://example.org/0.jpg";
        app.handles.put(remote.to_string(), fetched());
        app.handles.put("https://example.org/64.jpg".to_string(), fetched());
        assert!(!app.handles.contains(remote));

        show(&mut app, remote);
        show(&mut app, remote);
        assert_eq!(app.refilling.len(), 1);

        let _ = app.update(Message::HandleFetched {
            src: remote.to_string(),
            result: Ok(fetched()),
        });
        assert!(app.refilling.is_empty());
        assert!(app.handles.contains(remote));
    }

    #[test]
    fn failed_refetch_can_be_retried_on_next_visit() {
        let mut app = app_with_capacity(1);
        show(&mut app, "gone.jpg");
        let _ = app.update(Message::HandleFetched {
            src: "gone.jpg".to_string(),
            result: Err(crate::error::Error::Io("missing".into())),
        });
        assert!(app.refilling.is_empty());
        assert!(!app.handles.contains("gone.jpg"));
    }

    #[test]
    fn layout_uses_full_height_in_fullscreen() {
        let size = Size::new(1000.0, 800.0);
        let windowed = layout_for(size, false);
        let fullscreen = layout_for(size, true);

        assert_abs_diff_eq!(windowed.track_height, 560.0, epsilon = 0.001);
        assert_abs_diff_eq!(fullscreen.track_height, 800.0, epsilon = 0.001);
        assert_abs_diff_eq!(windowed.container_width, 1000.0, epsilon = f32::EPSILON);
    }

    #[test]
    fn load_photos_reads_manifest_with_base_dir() {
        let dir = tempdir().expect("failed to create temp dir");
        let manifest = dir.path().join("photos.toml");
        fs::write(&manifest, "[[photos]]\nsrc = \"a.jpg\"\n").expect("failed to write");

        let (photos, base) =
            load_photos(&manifest, SortOrder::Alphabetical, "src").expect("manifest loads");
        assert_eq!(photos.len(), 1);
        assert_eq!(base.as_deref(), Some(dir.path()));
    }

    #[test]
    fn load_photos_scans_directories() {
        let dir = tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("b.png"), b"png").expect("failed to write");
        fs::write(dir.path().join("a.jpg"), b"jpg").expect("failed to write");

        let (photos, base) =
            load_photos(dir.path(), SortOrder::Alphabetical, "src").expect("scan works");
        assert_eq!(photos.len(), 2);
        assert!(base.is_none());
    }
}
