// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Images in and out of grids
//!
//! The carver only knows about a single channel of floats.  Going in,
//! every pixel is reduced to its luma channel and scaled to the 0-255
//! range whatever the subpixel type.  Coming out, values are rounded
//! and clamped back into 8-bit grey.

use crate::error::CarveError;
use crate::grid::Grid;
use image::{GenericImageView, GrayImage, ImageBuffer, Luma, Pixel, Primitive};
use num_traits::NumCast;

// Pixel -> intensity in [0, 255]
#[inline]
fn lumachannel<P, S>(p: &P) -> f32
where
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let c = p.to_luma().channels()[0];
    let value: f32 = NumCast::from(c).unwrap_or(0.0);
    let max: f32 = NumCast::from(S::DEFAULT_MAX_VALUE).unwrap_or(1.0);
    value * 255.0 / max
}

/// Reduce any image to a grid of luma intensities.
pub fn image_to_grid<I, P, S>(image: &I) -> Result<Grid, CarveError>
where
    I: GenericImageView<Pixel = P>,
    P: Pixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);
    let mut grid = Grid::try_new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            grid[(x, y)] = lumachannel(&image.get_pixel(x as u32, y as u32));
        }
    }
    Ok(grid)
}

fn to_u8(v: f32) -> u8 {
    NumCast::from(v.round().max(0.0).min(255.0)).unwrap_or(0)
}

/// Write a grid of 0-255 intensities back out as an 8-bit grey image.
pub fn grid_to_image(grid: &Grid) -> GrayImage {
    let (width, height) = grid.dimensions();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Luma([to_u8(grid[(x as usize, y as usize)])])
    })
}

/// Render an energy map as grey, scaled so the largest energy is
/// white.  An all-zero map comes out black.
pub fn energy_to_image(energy: &Grid) -> GrayImage {
    let factor = energy.max_value().filter(|m| *m > 0.0).unwrap_or(1.0);
    let (width, height) = energy.dimensions();
    ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Luma([to_u8(energy[(x as usize, y as usize)] * 255.0 / factor)])
    })
}
