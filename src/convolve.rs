// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convolve a grid with a small kernel
//!
//! The convolver only ever *adds* into the destination.  Callers zero
//! the destination first for a plain response, or leave earlier
//! results in place to stack several responses on top of each other.
//!
//! Only cells at least `radius` away from every edge of the source's
//! live region are written; the border is left holding whatever the
//! caller put there, and the source is never read out of bounds.

use crate::grid::Grid;
use crate::kernel::Kernel;
use std::ops::Range;

/// Add the kernel's weighted neighbourhood sum for every interior
/// cell of `src` into the matching cell of `dst`.
pub fn convolve(src: &Grid, dst: &mut Grid, kernel: &Kernel) {
    assert_eq!(
        src.dimensions(),
        dst.dimensions(),
        "convolution source and destination must match"
    );
    let (rows, cols) = match interior(src, kernel) {
        Some(bounds) => bounds,
        None => return,
    };

    #[cfg(feature = "threaded")]
    {
        threaded::convolve(src, dst, kernel, rows, cols);
    }

    #[cfg(not(feature = "threaded"))]
    {
        for y in rows {
            convolve_row(src, dst.row_mut(y), kernel, y, cols.clone());
        }
    }
}

// The rows and columns the kernel can be centred on without reaching
// past the live region.
fn interior(src: &Grid, kernel: &Kernel) -> Option<(Range<usize>, Range<usize>)> {
    let r = kernel.radius();
    let (width, height) = src.dimensions();
    if width < kernel.size() || height < kernel.size() {
        return None;
    }
    Some((r..height - r, r..width - r))
}

// One destination row.  The neighbourhood sum is gathered first and
// then added, so a cell is touched exactly once per call.
fn convolve_row(src: &Grid, out: &mut [f32], kernel: &Kernel, y: usize, cols: Range<usize>) {
    let (r, size) = (kernel.radius(), kernel.size());
    for x in cols {
        let mut acc = 0.0f32;
        for ky in 0..size {
            let line = &src.row(y + ky - r)[x - r..x - r + size];
            acc += line
                .iter()
                .zip(kernel.row(ky))
                .map(|(p, w)| p * w)
                .sum::<f32>();
        }
        out[x] += acc;
    }
}

// Every destination row depends only on the (read-only) source, so
// the rows can be dealt out in contiguous bands, one band per CPU.
// The scope join is the barrier: nothing downstream runs until every
// band is done.
#[cfg(feature = "threaded")]
mod threaded {
    use super::convolve_row;
    use crate::grid::Grid;
    use crate::kernel::Kernel;
    use std::ops::Range;

    pub(super) fn convolve(
        src: &Grid,
        dst: &mut Grid,
        kernel: &Kernel,
        rows: Range<usize>,
        cols: Range<usize>,
    ) {
        let (stride, width) = (dst.stride(), dst.width());
        let workers = num_cpus::get().max(1);
        let band_rows = (dst.height() + workers - 1) / workers;
        let band_rows = band_rows.max(1);

        let outcome = crossbeam::scope(|scope| {
            for (band, chunk) in dst.data_mut().chunks_mut(band_rows * stride).enumerate() {
                let first = band * band_rows;
                let rows = rows.clone();
                let cols = cols.clone();
                scope.spawn(move |_| {
                    for (offset, line) in chunk.chunks_mut(stride).enumerate() {
                        let y = first + offset;
                        if rows.contains(&y) {
                            convolve_row(src, &mut line[..width], kernel, y, cols.clone());
                        }
                    }
                });
            }
        });

        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }
    }
}
