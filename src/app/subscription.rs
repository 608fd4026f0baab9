// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Routes native keyboard, touch and window events to the carousel. Key
//! releases are only forwarded when no widget captured them.

use super::message::FingerEvent;
use super::Message;
use crate::carousel::{self, Key};
use iced::{event, keyboard, time, touch, window, Subscription};
use std::time::Duration;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| match event {
        event::Event::Window(window::Event::Opened { size, .. }) => Some(Message::WindowOpened {
            id: window_id,
            size,
        }),
        event::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            id: window_id,
            size,
        }),
        event::Event::Touch(touch_event) => route_touch(touch_event).map(Message::Finger),
        event::Event::Keyboard(keyboard::Event::KeyReleased { key, .. }) => match status {
            event::Status::Ignored => map_key(&key)
                .map(|key| Message::Carousel(carousel::Message::KeyReleased(key))),
            event::Status::Captured => None,
        },
        _ => None,
    })
}

/// Frames for the track glide; idle otherwise.
pub fn create_tick_subscription(gliding: bool) -> Subscription<Message> {
    if gliding {
        time::every(FRAME_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

fn route_touch(event: touch::Event) -> Option<FingerEvent> {
    match event {
        touch::Event::FingerPressed { id, position } => Some(FingerEvent::Pressed {
            id: id.0,
            position,
        }),
        touch::Event::FingerMoved { id, position } => Some(FingerEvent::Moved {
            id: id.0,
            position,
        }),
        touch::Event::FingerLifted { id, position } | touch::Event::FingerLost { id, position } => {
            Some(FingerEvent::Lifted {
                id: id.0,
                position,
            })
        }
    }
}

fn map_key(key: &keyboard::Key) -> Option<Key> {
    match key {
        keyboard::Key::Named(keyboard::key::Named::ArrowRight) => Some(Key::ArrowRight),
        keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => Some(Key::ArrowLeft),
        keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Key::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    #[test]
    fn named_keys_map_to_carousel_keys() {
        assert_eq!(
            map_key(&keyboard::Key::Named(keyboard::key::Named::ArrowRight)),
            Some(Key::ArrowRight)
        );
        assert_eq!(
            map_key(&keyboard::Key::Named(keyboard::key::Named::Escape)),
            Some(Key::Escape)
        );
        assert_eq!(
            map_key(&keyboard::Key::Named(keyboard::key::Named::Enter)),
            None
        );
    }

    #[test]
    fn lost_finger_counts_as_lifted() {
        let event = touch::Event::FingerLost {
            id: touch::Finger(3),
            position: Point::new(4.0, 5.0),
        };
        assert_eq!(
            route_touch(event),
            Some(FingerEvent::Lifted {
                id: 3,
                position: Point::new(4.0, 5.0),
            })
        );
    }
}
