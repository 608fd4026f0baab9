// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The track is a horizontally scrolled row holding the five slides between
//! two spacers as wide as the container, so any offset the engine asks for
//! maps to a non-negative scroll position. In windowed mode the carousel sits
//! at the top of a scrollable page listing the current photo's fields.

use super::track::Track;
use super::Message;
use crate::carousel::{self, Direction, FullscreenAction, Photo, SlideRole};
use crate::fetch::{FetchedImage, Source};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::image::Handle;
use iced::widget::scrollable::{self, Scrollbar};
use iced::widget::{
    button, mouse_area, Column, Container, Id, Image, Row, Scrollable, Space, Stack, Text,
};
use iced::{ContentFit, Element, Length};
use lru::LruCache;
use std::path::{Path, PathBuf};

pub const TRACK_ID: &str = "carousel-track";
pub const PAGE_ID: &str = "carousel-page";
/// Scrollable hosting the main slide; pinch pans move its offset.
pub const ZOOM_ID: &str = "carousel-zoom";

const INACTIVE_OPACITY: f32 = 0.55;
const CAPTION_PADDING: f32 = 16.0;

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub track: &'a Track,
    pub handles: &'a LruCache<String, FetchedImage>,
    /// Folder relative manifest sources resolve against.
    pub base_dir: Option<&'a Path>,
    pub container_width: f32,
    pub track_height: f32,
    pub fullscreen: bool,
    pub index: usize,
    pub count: usize,
    pub current: Option<&'a Photo>,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let slides = view_carousel(&ctx);
    if ctx.fullscreen {
        return slides;
    }

    let page = Column::new().push(slides).push(view_caption(&ctx));
    Scrollable::new(page)
        .id(Id::new(PAGE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(|viewport: scrollable::Viewport| {
            Message::Carousel(carousel::Message::PageScrolled(
                viewport.absolute_offset().y,
            ))
        })
        .into()
}

fn view_carousel<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let spacer = || Space::new().width(Length::Fixed(ctx.container_width.max(0.0)));
    let slides = SlideRole::ALL
        .iter()
        .fold(Row::new().push(spacer()), |row, role| {
            row.push(view_slide(ctx, *role))
        })
        .push(spacer());

    let track = Scrollable::new(slides)
        .id(Id::new(TRACK_ID))
        .width(Length::Fill)
        .height(Length::Fixed(ctx.track_height))
        .direction(scrollable::Direction::Horizontal(Scrollbar::hidden()));

    let arrow = |label: &'a str, direction: Direction| {
        button(Text::new(label).size(28))
            .padding(12)
            .on_press(Message::Carousel(carousel::Message::Animate(direction)))
    };
    let fullscreen_label = if ctx.fullscreen { "✕" } else { "⛶" };
    let controls = Row::new()
        .push(arrow("◀", Direction::Prev))
        .push(Space::new().width(Length::Fill))
        .push(
            button(Text::new(fullscreen_label).size(20))
                .padding(8)
                .on_press(Message::Carousel(carousel::Message::Fullscreen {
                    action: FullscreenAction::Toggle,
                    slide: None,
                })),
        )
        .push(Space::new().width(Length::Fill))
        .push(arrow("▶", Direction::Next))
        .align_y(Vertical::Center)
        .padding(12);

    Stack::new()
        .push(track)
        .push(
            Container::new(controls)
                .width(Length::Fill)
                .height(Length::Fixed(ctx.track_height))
                .align_y(Vertical::Center),
        )
        .into()
}

fn view_slide<'a>(ctx: &ViewContext<'a>, role: SlideRole) -> Element<'a, Message> {
    let slide = ctx.track.slide(role);
    let box_width = slide.width.max(0.0);
    let mut width = box_width;
    let mut height = ctx.track_height;
    if let (SlideRole::Main, Some(zoom)) = (role, ctx.track.zoom()) {
        width *= zoom.scale;
        height *= zoom.scale;
    }

    let handle = slide.source.as_deref().and_then(|src| {
        ctx.handles.peek(src).map_or_else(
            || fallback_path(src, ctx.base_dir).map(Handle::from_path),
            |image| Some(image.handle.clone()),
        )
    });
    let content: Element<'a, Message> = match handle {
        Some(handle) => Image::new(handle)
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .opacity(if slide.active { 1.0 } else { INACTIVE_OPACITY })
            .into(),
        None => Space::new()
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .into(),
    };

    // The scaled main slide overflows its box; the pan is its scroll offset.
    let content: Element<'a, Message> = if role == SlideRole::Main {
        Scrollable::new(content)
            .id(Id::new(ZOOM_ID))
            .width(Length::Fixed(box_width))
            .height(Length::Fixed(ctx.track_height))
            .direction(scrollable::Direction::Both {
                vertical: Scrollbar::hidden(),
                horizontal: Scrollbar::hidden(),
            })
            .into()
    } else {
        content
    };

    let boxed = Container::new(content)
        .width(Length::Fixed(box_width))
        .height(Length::Fixed(ctx.track_height))
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .clip(true);

    mouse_area(boxed)
        .on_release(Message::SlideClicked(role))
        .into()
}

/// File to paint while a slide's handle is not cached. Remote sources have
/// none and stay blank until the front-end refetches them.
fn fallback_path(src: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
    match Source::parse(src, base_dir) {
        Source::Local(path) => Some(path),
        Source::Remote(_) => None,
    }
}

fn view_caption<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let heading = if ctx.count == 0 {
        "No photos".to_string()
    } else {
        format!("Photo {} of {}", ctx.index + 1, ctx.count)
    };

    let fields = ctx
        .current
        .into_iter()
        .flat_map(|photo| photo.fields())
        .fold(Column::new().spacing(4), |column, (key, value)| {
            column.push(Text::new(format!("{key}: {value}")).size(14))
        });

    Column::new()
        .push(Text::new(heading).size(20))
        .push(fields)
        .spacing(8)
        .padding(CAPTION_PADDING)
        .into()
}
