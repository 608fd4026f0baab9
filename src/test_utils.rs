// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons.
//!
//! Slide widths and track offsets are computed in `f32`, so tests compare
//! them with the `approx` assertion macros instead of `assert_eq!`.

pub use approx::assert_abs_diff_eq;
