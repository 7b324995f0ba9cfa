// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two-dimensional float field every stage works on.
//!
//! A `Grid` is row-major storage of `f32` with a fixed *stride* (the
//! width it was allocated at) and a *logical* width that can only
//! shrink.  Carving narrows the logical width by one column per
//! iteration without ever reallocating, so the working image, the
//! energy map and the cost table all keep the capacity they were
//! born with.

use crate::error::CarveError;
use itertools::iproduct;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<f32>,
}

impl Grid {
    /// A zero-filled grid.  Aborts on allocation failure, the way
    /// `vec!` does; use `try_new` where that has to be reported.
    pub fn new(width: usize, height: usize) -> Self {
        Grid {
            width,
            height,
            stride: width,
            data: vec![0.0; width * height],
        }
    }

    /// A zero-filled grid, reporting allocation failure as an error
    /// instead of aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self, CarveError> {
        let cells = width
            .checked_mul(height)
            .ok_or(CarveError::Allocation { width, height })?;
        let mut data = Vec::new();
        data.try_reserve_exact(cells)
            .map_err(|_| CarveError::Allocation { width, height })?;
        data.resize(cells, 0.0);
        Ok(Grid {
            width,
            height,
            stride: width,
            data,
        })
    }

    /// Wrap a row-major buffer of exactly `width * height` cells.
    pub fn from_vec(width: usize, height: usize, data: Vec<f32>) -> Result<Self, CarveError> {
        if width.checked_mul(height) != Some(data.len()) {
            return Err(CarveError::ShapeMismatch {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Grid {
            width,
            height,
            stride: width,
            data,
        })
    }

    /// Build a grid by asking for the value at every `(x, y)`.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f32,
    {
        Grid {
            width,
            height,
            stride: width,
            data: iproduct!(0..height, 0..width).map(|(y, x)| f(x, y)).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The allocated row length.  Never changes after construction.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    // All of the index math lives here and nowhere else.
    fn get_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.stride && y < self.height);
        y * self.stride + x
    }

    /// Shrink (or restore, up to the stride) the logical width.  The
    /// backing storage is untouched.
    pub fn set_width(&mut self, width: usize) {
        assert!(
            width <= self.stride,
            "logical width {} exceeds allocated stride {}",
            width,
            self.stride
        );
        self.width = width;
    }

    /// Zero every cell of the logical region.
    pub fn zero(&mut self) {
        let width = self.width;
        if width == 0 {
            return;
        }
        self.rows_mut().for_each(|row| {
            row[..width].iter_mut().for_each(|c| *c = 0.0);
        });
    }

    /// The live cells of row `y`.
    pub fn row(&self, y: usize) -> &[f32] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width]
    }

    /// The live cells of row `y`, mutably.
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = self.get_index(0, y);
        let width = self.width;
        &mut self.data[start..start + width]
    }

    /// Row `y - 1` for reading alongside row `y` for writing; the DP
    /// pass needs both at once.
    pub fn split_rows_mut(&mut self, y: usize) -> (&[f32], &mut [f32]) {
        assert!(y > 0 && y < self.height);
        let (stride, width) = (self.stride, self.width);
        let (above, rest) = self.data.split_at_mut(y * stride);
        let above = &above[(y - 1) * stride..(y - 1) * stride + width];
        (above, &mut rest[..width])
    }

    /// Every full-stride row, mutably.  Callers must respect `width()`.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.data.chunks_mut(self.stride)
    }

    #[cfg(feature = "threaded")]
    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Copy the top-left `width` x `height` corner of the live region
    /// into a freshly allocated, tightly packed grid.  Panics if the
    /// corner is larger than the live region.
    pub fn crop(&self, width: usize, height: usize) -> Result<Grid, CarveError> {
        assert!(width <= self.width && height <= self.height);
        let mut out = Grid::try_new(width, height)?;
        for y in 0..height {
            out.row_mut(y).copy_from_slice(&self.row(y)[..width]);
        }
        Ok(out)
    }

    /// The live region as a tightly packed row-major vector.
    pub fn to_vec(&self) -> Vec<f32> {
        (0..self.height)
            .flat_map(|y| self.row(y).iter().copied())
            .collect()
    }

    /// Largest value in the live region, if there is one.
    pub fn max_value(&self) -> Option<f32> {
        (0..self.height)
            .flat_map(|y| self.row(y).iter().copied())
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f32;

    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f32 {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

// Two grids are equal when their live regions are; stride and any
// stale cells past the logical width don't count.
impl PartialEq for Grid {
    fn eq(&self, other: &Grid) -> bool {
        self.dimensions() == other.dimensions()
            && (0..self.height).all(|y| self.row(y) == other.row(y))
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid {}x{} (stride {})", self.width, self.height, self.stride)?;
        for y in 0..self.height {
            let cells: Vec<String> = self.row(y).iter().map(|c| format!("{:.2}", c)).collect();
            writeln!(f, "  {}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(width: usize, height: usize) -> Grid {
        Grid::from_fn(width, height, |x, y| (y * width + x) as f32)
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid = counting(3, 2);
        assert_eq!(grid.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(grid[(2, 1)], 5.0);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Grid::from_vec(3, 3, vec![0.0; 8]).is_err());
        assert!(Grid::from_vec(3, 3, vec![0.0; 9]).is_ok());
    }

    #[test]
    fn narrowing_keeps_the_stride() {
        let mut grid = counting(4, 2);
        grid.set_width(3);
        assert_eq!(grid.stride(), 4);
        assert_eq!(grid.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(grid.to_vec(), vec![0.0, 1.0, 2.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn zero_only_touches_the_live_region() {
        let mut grid = counting(4, 2);
        grid.set_width(2);
        grid.zero();
        grid.set_width(4);
        assert_eq!(grid.row(0), &[0.0, 0.0, 2.0, 3.0]);
        assert_eq!(grid.row(1), &[0.0, 0.0, 6.0, 7.0]);
    }

    #[test]
    fn split_rows_hands_out_neighbours() {
        let mut grid = counting(3, 3);
        let (above, here) = grid.split_rows_mut(2);
        assert_eq!(above, &[3.0, 4.0, 5.0]);
        here[0] = above[1];
        assert_eq!(grid[(0, 2)], 4.0);
    }

    #[test]
    fn crop_packs_the_live_corner() {
        let mut grid = counting(5, 3);
        grid.set_width(4);
        let out = grid.crop(3, 2).unwrap();
        assert_eq!(out.stride(), 3);
        assert_eq!(out.to_vec(), vec![0.0, 1.0, 2.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn equality_ignores_stale_columns() {
        let mut wide = counting(4, 2);
        wide.set_width(3);
        let narrow = Grid::from_vec(3, 2, vec![0.0, 1.0, 2.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(wide, narrow);
    }

    #[test]
    fn max_value_of_live_region() {
        let mut grid = counting(4, 2);
        assert_eq!(grid.max_value(), Some(7.0));
        grid.set_width(2);
        assert_eq!(grid.max_value(), Some(5.0));
        assert_eq!(Grid::new(0, 0).max_value(), None);
    }
}
