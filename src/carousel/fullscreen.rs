// SPDX-License-Identifier: MPL-2.0
//! Fullscreen actions and page scroll locking.

use super::effect::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenAction {
    Toggle,
    Open,
    Close,
}

/// Keeps the page behind the fullscreen view from scrolling.
///
/// Locking remembers the page offset; unlocking restores it. Both are
/// no-ops when already in the requested state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollLock {
    locked: bool,
    saved_top: f32,
}

impl ScrollLock {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self, page_top: f32) -> Option<Effect> {
        if self.locked {
            return None;
        }
        self.locked = true;
        self.saved_top = page_top;
        Some(Effect::LockScroll { top: page_top })
    }

    pub fn unlock(&mut self) -> Option<Effect> {
        if !self.locked {
            return None;
        }
        let restore_top = self.saved_top;
        self.locked = false;
        self.saved_top = 0.0;
        Some(Effect::UnlockScroll { restore_top })
    }

    pub fn toggle(&mut self, page_top: f32) -> Option<Effect> {
        if self.locked {
            self.unlock()
        } else {
            self.lock(page_top)
        }
    }
}
