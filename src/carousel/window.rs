// SPDX-License-Identifier: MPL-2.0
//! Sliding five-slide window over the photo collection.
//!
//! The window is derived from the current index alone. Out-of-range indices
//! are resolved by [`validate_index`], which clamps below-range values to the
//! last index and sends everything past the end back to `0`. This is not a
//! modulo wrap: for indices more than one step outside the range the two
//! rules disagree.

/// One of the five fixed slide positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideRole {
    PrePrev,
    Prev,
    Main,
    Next,
    NextNext,
}

impl SlideRole {
    /// All roles in visual order (left to right).
    pub const ALL: [SlideRole; 5] = [
        SlideRole::PrePrev,
        SlideRole::Prev,
        SlideRole::Main,
        SlideRole::Next,
        SlideRole::NextNext,
    ];

    /// Order in which a window reload requests its slides.
    pub const LOAD_ORDER: [SlideRole; 5] = [
        SlideRole::Main,
        SlideRole::Prev,
        SlideRole::PrePrev,
        SlideRole::Next,
        SlideRole::NextNext,
    ];

    /// Position of the role in visual order, `0..5`.
    #[must_use]
    pub fn position(self) -> usize {
        match self {
            SlideRole::PrePrev => 0,
            SlideRole::Prev => 1,
            SlideRole::Main => 2,
            SlideRole::Next => 3,
            SlideRole::NextNext => 4,
        }
    }
}

/// Resolves a possibly out-of-range index against a collection of `len` items.
///
/// In-range indices are returned unchanged. Anything below the last valid
/// index is clamped to the last index; anything else wraps to `0`.
/// An empty collection always resolves to `0`.
#[must_use]
pub fn validate_index(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if index >= 0 && (index as usize) < len {
        return index as usize;
    }
    let last = len - 1;
    if index < last as isize {
        last
    } else {
        0
    }
}

/// Mapping from slide role to photo index for the current position.
///
/// Roles are pairwise distinct for collections of five or more photos;
/// smaller collections repeat indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideOrder {
    pub pre_prev: usize,
    pub prev: usize,
    pub main: usize,
    pub next: usize,
    pub next_next: usize,
}

impl SlideOrder {
    /// Computes the window around `current` for a collection of `len` items.
    #[must_use]
    pub fn compute(current: usize, len: usize) -> Self {
        let main = validate_index(to_signed(current), len);
        let next = validate_index(to_signed(main) + 1, len);
        let next_next = validate_index(to_signed(next) + 1, len);
        let prev = validate_index(to_signed(main) - 1, len);
        let pre_prev = validate_index(to_signed(prev) - 1, len);
        Self {
            pre_prev,
            prev,
            main,
            next,
            next_next,
        }
    }

    #[must_use]
    pub fn get(&self, role: SlideRole) -> usize {
        match role {
            SlideRole::PrePrev => self.pre_prev,
            SlideRole::Prev => self.prev,
            SlideRole::Main => self.main,
            SlideRole::Next => self.next,
            SlideRole::NextNext => self.next_next,
        }
    }

    /// Iterates `(role, index)` pairs in the given role order.
    pub fn entries(&self, roles: [SlideRole; 5]) -> impl Iterator<Item = (SlideRole, usize)> + '_ {
        roles.into_iter().map(move |role| (role, self.get(role)))
    }

    /// The two indices just outside the window, warmed up speculatively.
    #[must_use]
    pub fn outer_neighbors(&self, len: usize) -> [usize; 2] {
        [
            validate_index(to_signed(self.next_next) + 1, len),
            validate_index(to_signed(self.pre_prev) - 1, len),
        ]
    }
}

fn to_signed(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}
