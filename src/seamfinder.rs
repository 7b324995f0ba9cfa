// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the seam
//!
//! Walk the cost table from the bottom of the DP region to the top,
//! producing one column index per image row.
//!
//! The step rule is *not* a plain argmin over the three cells above.
//! With L, C and R the costs left of, at, and right of the current
//! column:
//!
//!   L <  C:  go left if L < R, otherwise go right
//!   L >= C:  stay if C < R, otherwise go right
//!
//! so on ties the seam drifts right.  Changing the comparison order
//! changes which seam is picked, and carved output with it.

use crate::cq;
use crate::grid::Grid;

/// One column index per row, top to bottom.
pub type Seam = Vec<usize>;

/// Given a cost table, return the x-coordinates that, paired with
/// `0..height`, name the pixels of the cheapest vertical seam.
pub fn find_vertical_seam(cost: &Grid, inset: usize) -> Seam {
    let mut seam = vec![0; cost.height()];
    backtrack(cost, inset, &mut seam);
    seam
}

/// Backtrack into a caller-provided buffer, resized to the table's
/// height.  Columns are always within `[inset, width - inset - 1]`.
pub fn backtrack(cost: &Grid, inset: usize, seam: &mut Seam) {
    let (width, height) = cost.dimensions();
    assert!(inset >= 1, "the backtrack reads one column either side");
    let minimum = inset.saturating_mul(2).saturating_add(2);
    assert!(
        width >= minimum && height >= minimum,
        "a {}x{} cost table has no room for an inset of {}",
        width,
        height,
        inset
    );
    seam.clear();
    seam.resize(height, 0);

    let (leftmost, rightmost) = (inset, width - inset - 1);
    let yydim = height - inset;

    // Start from the cheapest cell of the last DP row.  The comparison
    // is strict, so the first of several equal minima wins.
    let bottom = cost.row(yydim - 1);
    let mut idx = leftmost;
    for x in leftmost + 1..=rightmost {
        if bottom[x] < bottom[idx] {
            idx = x;
        }
    }
    seam[yydim - 1] = idx;

    for y in (2..yydim - 1).rev() {
        let row = cost.row(y);
        let (l, c, r) = (row[idx - 1], row[idx], row[idx + 1]);
        idx = cq!(
            l < c,
            cq!(l < r, idx - 1, idx + 1),
            cq!(c < r, idx, idx + 1)
        );
        idx = idx.max(leftmost).min(rightmost);
        seam[y] = idx;
    }

    // There's no DP data above row 2 or below the DP region; the seam
    // runs straight through both.
    let (top, last) = (seam[2], seam[yydim - 1]);
    seam[..2].iter_mut().for_each(|s| *s = top);
    seam[yydim..].iter_mut().for_each(|s| *s = last);
}
