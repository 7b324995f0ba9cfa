// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! Each iteration recomputes the energy of the working image, runs
//! the DP pass over it, backtracks the cheapest seam and closes the
//! gap the seam leaves, one column narrower than before.  The stages
//! run strictly in that order and each finishes before the next one
//! starts; only the seam remover ever writes to the image.
//!
//! Nothing is reallocated inside the loop.  The energy map, the cost
//! table and the image itself are narrowed in place, and only at the
//! end is the live corner copied out into a right-sized grid.

use crate::config::CarveConfig;
use crate::cost::accumulate;
use crate::energy::{apply_border_guard, EnergyMapper};
use crate::error::CarveError;
use crate::grid::Grid;
use crate::seamfinder::{backtrack, Seam};
use log::{debug, info, trace, warn};
use std::time::Instant;

/// Close the gap left by `seam`: in every row, shift the pixels right
/// of the seam one place to the left, then drop the last column.
pub fn remove_vertical_seam(image: &mut Grid, seam: &[usize]) {
    let (width, height) = image.dimensions();
    assert_eq!(seam.len(), height, "one seam entry per row");
    assert!(width > 0, "nothing left to carve");
    for (y, &x) in seam.iter().enumerate() {
        assert!(x < width, "seam leaves the image at row {}", y);
        image.row_mut(y).copy_within(x + 1..width, x);
    }
    image.set_width(width - 1);
}

/// The state of one carving run: the working image plus the grids
/// and kernels it reuses on every iteration.
pub struct Carving {
    config: CarveConfig,
    image: Grid,
    energy: Grid,
    cost: Grid,
    seam: Seam,
    mapper: EnergyMapper,
    iterations: usize,
}

impl Carving {
    /// Take ownership of `image` and allocate the run's scratch grids
    /// at its starting size.
    pub fn new(image: Grid, config: CarveConfig) -> Result<Self, CarveError> {
        config.validate()?;
        let (width, height) = image.dimensions();
        let energy = Grid::try_new(width, height)?;
        let cost = Grid::try_new(width, height)?;
        let mapper = EnergyMapper::new(config.energy, config.sigma, width, height)?;
        let mut seam = Seam::new();
        seam.try_reserve_exact(height)
            .map_err(|_| CarveError::Allocation { width: 1, height })?;
        Ok(Carving {
            config,
            image,
            energy,
            cost,
            seam,
            mapper,
            iterations: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// The working image, narrowed to the current width.
    pub fn image(&self) -> &Grid {
        &self.image
    }

    /// The energy map from the most recent iteration.
    pub fn energy(&self) -> &Grid {
        &self.energy
    }

    /// The cost table from the most recent iteration.
    pub fn cost(&self) -> &Grid {
        &self.cost
    }

    /// Carve one seam out of the working image and return it.
    pub fn step(&mut self) -> Result<&[usize], CarveError> {
        let (width, height) = self.image.dimensions();
        let minimum = self.config.min_extent();
        if width < minimum || height < minimum {
            return Err(CarveError::TooSmall {
                width,
                height,
                minimum,
            });
        }
        let started = Instant::now();

        self.energy.set_width(width);
        self.cost.set_width(width);
        self.energy.zero();
        self.cost.zero();

        self.mapper.compute(&self.image, &mut self.energy);
        trace!("energy map computed for width {}", width);

        apply_border_guard(&mut self.cost, self.config.guard_width, self.config.guard_value);
        accumulate(&self.energy, &mut self.cost, self.config.inset);
        trace!("cost table accumulated for width {}", width);

        backtrack(&self.cost, self.config.inset, &mut self.seam);
        remove_vertical_seam(&mut self.image, &self.seam);
        self.iterations += 1;

        debug!(
            "carved seam {} (bottom column {}), width {} -> {} in {:?}",
            self.iterations,
            self.seam[height - 1],
            width,
            width - 1,
            started.elapsed()
        );
        Ok(self.seam.as_slice())
    }

    /// Carve until the working image is `target_width` wide.  Returns
    /// the number of seams removed.
    pub fn carve_to(&mut self, target_width: usize) -> Result<usize, CarveError> {
        let before = self.iterations;
        while self.width() > target_width {
            self.step()?;
        }
        Ok(self.iterations - before)
    }

    /// Give back the top-left `width` x `height` corner of the working
    /// image as a freshly allocated grid.  The corner has to fit inside
    /// what is left of the image.
    pub fn finish(self, width: usize, height: usize) -> Result<Grid, CarveError> {
        let (from_width, from_height) = self.image.dimensions();
        if width > from_width || height > from_height {
            return Err(CarveError::Upscale {
                from_width,
                from_height,
                to_width: width,
                to_height: height,
            });
        }
        self.image.crop(width, height)
    }
}

/// Holds the configuration for carving images.
#[derive(Debug, Clone, Default)]
pub struct SeamCarver {
    config: CarveConfig,
}

impl SeamCarver {
    pub fn new(config: CarveConfig) -> Self {
        SeamCarver { config }
    }

    pub fn config(&self) -> &CarveConfig {
        &self.config
    }

    /// Check that `image` can be carved down to `newwidth` x
    /// `newheight` without starting any work.
    pub fn check(&self, image: &Grid, newwidth: usize, newheight: usize) -> Result<(), CarveError> {
        self.config.validate()?;
        let (width, height) = image.dimensions();
        if newwidth > width || newheight > height {
            return Err(CarveError::Upscale {
                from_width: width,
                from_height: height,
                to_width: newwidth,
                to_height: newheight,
            });
        }
        if newwidth == 0 || newheight == 0 {
            return Err(CarveError::EmptyTarget);
        }
        // The narrowest image the loop works on is one column wider
        // than the target.
        let minimum = self.config.min_extent();
        if newwidth < width && (newwidth + 1 < minimum || height < minimum) {
            return Err(CarveError::TooSmall {
                width: newwidth + 1,
                height,
                minimum,
            });
        }
        Ok(())
    }

    /// Given an image and a desired new width and height, repeatedly
    /// carve vertical seams out of the image.  Height is never carved;
    /// a shorter target keeps the top `newheight` rows.
    pub fn carve(&self, image: Grid, newwidth: usize, newheight: usize) -> Result<Grid, CarveError> {
        self.check(&image, newwidth, newheight)?;
        let (width, height) = image.dimensions();
        info!(
            "carving {}x{} to {}x{} ({} seams, sigma {}, inset {}, guard {})",
            width,
            height,
            newwidth,
            newheight,
            width - newwidth,
            self.config.sigma,
            self.config.inset,
            self.config.guard_width
        );
        if newheight < height {
            warn!(
                "horizontal seams are not carved; cropping {} rows from the bottom",
                height - newheight
            );
        }

        let started = Instant::now();
        let mut carving = Carving::new(image, self.config.clone())?;
        let seams = carving.carve_to(newwidth)?;
        debug!("{} seams carved in {:?}", seams, started.elapsed());
        carving.finish(newwidth, newheight)
    }
}

/// Carve `image` down to `newwidth` x `newheight` with the default
/// configuration.
pub fn seamcarve(image: Grid, newwidth: usize, newheight: usize) -> Result<Grid, CarveError> {
    SeamCarver::default().carve(image, newwidth, newheight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(width: usize, height: usize) -> Grid {
        Grid::from_fn(width, height, |x, y| (y * 100 + x) as f32)
    }

    #[test]
    fn removal_shifts_left_of_the_seam() {
        let mut image = counting(5, 3);
        remove_vertical_seam(&mut image, &[0, 2, 4]);
        assert_eq!(image.width(), 4);
        assert_eq!(image.stride(), 5);
        assert_eq!(image.row(0), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(image.row(1), &[100.0, 101.0, 103.0, 104.0]);
        assert_eq!(image.row(2), &[200.0, 201.0, 202.0, 203.0]);
    }

    #[test]
    fn one_step_removes_exactly_the_seam() {
        let before = Grid::from_fn(40, 30, |x, y| ((x * 31 + y * 17) % 23) as f32);
        let mut carving = Carving::new(before.clone(), CarveConfig::default()).unwrap();
        let seam = carving.step().unwrap().to_vec();
        let after = carving.image();
        assert_eq!(after.width(), 39);
        for y in 0..30 {
            for x in 0..39 {
                let source = if x < seam[y] { x } else { x + 1 };
                assert_eq!(after[(x, y)], before[(source, y)]);
            }
        }
    }

    #[test]
    fn step_refuses_a_tiny_image() {
        let mut carving = Carving::new(counting(11, 40), CarveConfig::default()).unwrap();
        assert_eq!(
            carving.step().unwrap_err(),
            CarveError::TooSmall {
                width: 11,
                height: 40,
                minimum: 12
            }
        );
    }

    #[test]
    fn no_upscaling() {
        let err = seamcarve(counting(40, 40), 41, 40).unwrap_err();
        assert!(matches!(err, CarveError::Upscale { .. }));
        let err = seamcarve(counting(40, 40), 40, 41).unwrap_err();
        assert!(matches!(err, CarveError::Upscale { .. }));
    }

    #[test]
    fn targets_must_fit_the_inset() {
        assert_eq!(seamcarve(counting(40, 40), 0, 40).unwrap_err(), CarveError::EmptyTarget);
        assert!(matches!(
            seamcarve(counting(40, 40), 10, 40).unwrap_err(),
            CarveError::TooSmall { .. }
        ));
        assert!(matches!(
            seamcarve(counting(40, 11), 30, 11).unwrap_err(),
            CarveError::TooSmall { .. }
        ));
        assert!(seamcarve(counting(40, 40), 11, 40).is_ok());
    }

    #[test]
    fn shorter_target_crops_rows() {
        let out = seamcarve(counting(40, 40), 38, 20).unwrap();
        assert_eq!(out.dimensions(), (38, 20));
    }

    #[test]
    fn finish_refuses_a_corner_bigger_than_the_image() {
        let carving = Carving::new(counting(40, 30), CarveConfig::default()).unwrap();
        assert_eq!(
            carving.finish(50, 30).unwrap_err(),
            CarveError::Upscale {
                from_width: 40,
                from_height: 30,
                to_width: 50,
                to_height: 30
            }
        );
        let mut carving = Carving::new(counting(40, 30), CarveConfig::default()).unwrap();
        carving.carve_to(38).unwrap();
        assert!(matches!(
            carving.finish(39, 30).unwrap_err(),
            CarveError::Upscale { .. }
        ));
    }

    #[test]
    fn finish_hands_back_the_live_corner() {
        let mut carving = Carving::new(counting(40, 30), CarveConfig::default()).unwrap();
        carving.step().unwrap();
        let out = carving.finish(39, 20).unwrap();
        assert_eq!(out.dimensions(), (39, 20));
        assert_eq!(out.stride(), 39);
    }

    #[test]
    fn huge_inset_is_reported_not_a_panic() {
        let carver = SeamCarver::new(CarveConfig::default().with_inset(usize::MAX / 2 + 1));
        assert!(matches!(
            carver.carve(counting(40, 40), 30, 40).unwrap_err(),
            CarveError::Config(_)
        ));
    }

    #[test]
    fn bad_config_is_reported() {
        let carver = SeamCarver::new(CarveConfig::default().with_sigma(-1.0));
        assert!(matches!(
            carver.carve(counting(40, 40), 30, 40).unwrap_err(),
            CarveError::Config(_)
        ));
    }
}
