// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What can go wrong before (never during) a carve.
//!
//! Every check happens up front; once the first seam is cut the run
//! is a deterministic function of its input and cannot fail except
//! by running out of memory on the final copy.

use failure::Fail;

#[derive(Debug, Fail, PartialEq)]
pub enum CarveError {
    #[fail(
        display = "seamcarve cannot upscale an image: {}x{} to {}x{}",
        from_width, from_height, to_width, to_height
    )]
    Upscale {
        from_width: usize,
        from_height: usize,
        to_width: usize,
        to_height: usize,
    },

    #[fail(display = "target dimensions must be at least 1x1")]
    EmptyTarget,

    #[fail(
        display = "a {}x{} region is too small to carve, both sides must be at least {}",
        width, height, minimum
    )]
    TooSmall {
        width: usize,
        height: usize,
        minimum: usize,
    },

    #[fail(display = "could not allocate a {}x{} grid", width, height)]
    Allocation { width: usize, height: usize },

    #[fail(
        display = "buffer of {} cells does not fit a {}x{} grid",
        len, width, height
    )]
    ShapeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[fail(display = "invalid carving configuration: {}", _0)]
    Config(String),
}
