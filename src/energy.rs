// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! Given the working image, calculate the energy map: a non-negative
//! "cost of removing this pixel" for every cell.  The classic energy
//! is just the Gaussian response of the intensities.  The gradient
//! variant blurs first and then sums the magnitudes of the two Sobel
//! responses, which is what the GPU pipeline in this family did.
//!
//! Also here: the border guard, which prices the columns along the
//! left and right edges out of contention before the DP pass.

use crate::config::EnergyKind;
use crate::convolve::convolve;
use crate::error::CarveError;
use crate::grid::Grid;
use crate::kernel::Kernel;

// Scratch space for the gradient energy, allocated once per run at
// the starting dimensions and narrowed along with the image.
struct GradientScratch {
    blurred: Grid,
    response: Grid,
    sobel_x: Kernel,
    sobel_y: Kernel,
}

/// Turns the working image into an energy map, reusing its kernels
/// and scratch grids across iterations.
pub struct EnergyMapper {
    kernel: Kernel,
    gradient: Option<GradientScratch>,
}

impl EnergyMapper {
    pub fn new(kind: EnergyKind, sigma: f32, width: usize, height: usize) -> Result<Self, CarveError> {
        let gradient = match kind {
            EnergyKind::Blur => None,
            EnergyKind::Gradient => Some(GradientScratch {
                blurred: Grid::try_new(width, height)?,
                response: Grid::try_new(width, height)?,
                sobel_x: Kernel::sobel_x(),
                sobel_y: Kernel::sobel_y(),
            }),
        };
        Ok(EnergyMapper {
            kernel: Kernel::gaussian(sigma),
            gradient,
        })
    }

    /// Fill `energy` (already sized to the image) from `image`.  The
    /// map is zeroed first.
    pub fn compute(&mut self, image: &Grid, energy: &mut Grid) {
        energy.zero();
        match self.gradient.as_mut() {
            None => convolve(image, energy, &self.kernel),
            Some(scratch) => {
                let (width, _) = image.dimensions();
                scratch.blurred.set_width(width);
                scratch.response.set_width(width);

                scratch.blurred.zero();
                convolve(image, &mut scratch.blurred, &self.kernel);

                for sobel in &[&scratch.sobel_x, &scratch.sobel_y] {
                    scratch.response.zero();
                    convolve(&scratch.blurred, &mut scratch.response, sobel);
                    add_magnitude(&scratch.response, energy);
                }
            }
        }
    }
}

// energy += |response|, cell by cell.
fn add_magnitude(response: &Grid, energy: &mut Grid) {
    for y in 0..response.height() {
        energy
            .row_mut(y)
            .iter_mut()
            .zip(response.row(y))
            .for_each(|(e, r)| *e += r.abs());
    }
}

/// One-shot energy map of an image, for callers outside a carve (the
/// CLI's energy dump, mostly).
pub fn calculate_energy(image: &Grid, kind: EnergyKind, sigma: f32) -> Result<Grid, CarveError> {
    let (width, height) = image.dimensions();
    let mut mapper = EnergyMapper::new(kind, sigma, width, height)?;
    let mut energy = Grid::try_new(width, height)?;
    mapper.compute(image, &mut energy);
    Ok(energy)
}

/// Pin the `guard_width` leftmost and rightmost columns of every row
/// to `guard_value`.  Bands wider than half the grid simply overlap.
pub fn apply_border_guard(cost: &mut Grid, guard_width: usize, guard_value: f32) {
    let width = cost.width();
    let band = guard_width.min(width);
    for y in 0..cost.height() {
        let row = cost.row_mut(y);
        for x in 0..band {
            row[x] = guard_value;
            row[width - 1 - x] = guard_value;
        }
    }
}
