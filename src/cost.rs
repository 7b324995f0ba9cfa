// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Cumulative cost
//!
//! The dynamic-programming half of seam carving.  Working down from
//! the top, each cell of the cost table becomes its own energy plus
//! the cheapest of the three cells above it:
//!
//! ```text
//!                          ⎧ M(x−1, y−1)
//!   M(x, y) = E(x, y) + min⎨ M(x,   y−1)
//!                          ⎩ M(x+1, y−1)
//! ```
//!
//! Only the region `inset` away from every edge is computed.  The rows
//! above it are the base case and hold whatever the caller seeded
//! them with (zero, or the border guard).

use crate::grid::Grid;

/// Accumulate `energy` into `cost`, row by row, top to bottom.  Each
/// row depends on the finished row above it, so rows are strictly
/// sequential.
pub fn accumulate(energy: &Grid, cost: &mut Grid, inset: usize) {
    assert_eq!(
        energy.dimensions(),
        cost.dimensions(),
        "energy map and cost table must match"
    );
    assert!(inset >= 1, "the DP reads one cell either side");
    let (width, height) = cost.dimensions();
    if width < inset.saturating_mul(2) || height < inset.saturating_mul(2) {
        return;
    }
    let (xxdim, yydim) = (width - inset, height - inset);

    for y in inset..yydim {
        let erow = energy.row(y);
        let (above, here) = cost.split_rows_mut(y);
        for x in inset..xxdim {
            // f32::min, like C's fmin, quietly drops a NaN operand.
            here[x] = erow[x] + above[x - 1].min(above[x]).min(above[x + 1]);
        }
    }
}
