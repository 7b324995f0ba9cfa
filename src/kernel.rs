// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Convolution kernels
//!
//! Small, odd-sized, square weight tables.  They are built once per
//! run and only ever read afterward.

use itertools::iproduct;
use std::ops::Index;

/// Side length of the Gaussian used for the energy map.
pub const GAUSSIAN_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Wrap a row-major table of `size * size` weights.  `size` must
    /// be odd so the kernel has a centre.
    pub fn from_weights(size: usize, weights: Vec<f32>) -> Self {
        assert!(size % 2 == 1, "kernel size must be odd, got {}", size);
        assert_eq!(weights.len(), size * size, "kernel must be square");
        Kernel { size, weights }
    }

    /// The 5x5 Gaussian:
    ///
    ///   K(x, y) = c0 · exp(c1 · ((x − 2)² + (y − 2)²))
    ///   c0 = 1 / (2πσ²),  c1 = −1 / (2σ²)
    ///
    /// Truncated to 5x5 the raw weights no longer sum to one (about
    /// 0.53 at σ = 2.3), so the table is rescaled to unit mass.  That
    /// keeps a flat image flat through the blur.
    pub fn gaussian(sigma: f32) -> Self {
        let c0 = 1.0 / (2.0 * std::f32::consts::PI * sigma * sigma);
        let c1 = -1.0 / (2.0 * sigma * sigma);
        let centre = (GAUSSIAN_SIZE / 2) as f32;

        let raw: Vec<f32> = iproduct!(0..GAUSSIAN_SIZE, 0..GAUSSIAN_SIZE)
            .map(|(y, x)| {
                let (dx, dy) = (x as f32 - centre, y as f32 - centre);
                c0 * (c1 * (dx * dx + dy * dy)).exp()
            })
            .collect();
        let mass: f32 = raw.iter().sum();
        Kernel::from_weights(GAUSSIAN_SIZE, raw.into_iter().map(|w| w / mass).collect())
    }

    /// Horizontal 3x3 Sobel derivative.
    pub fn sobel_x() -> Self {
        #[rustfmt::skip]
        let weights = vec![
            -1.0, 0.0, 1.0,
            -2.0, 0.0, 2.0,
            -1.0, 0.0, 1.0,
        ];
        Kernel::from_weights(3, weights)
    }

    /// Vertical 3x3 Sobel derivative.
    pub fn sobel_y() -> Self {
        #[rustfmt::skip]
        let weights = vec![
            -1.0, -2.0, -1.0,
             0.0,  0.0,  0.0,
             1.0,  2.0,  1.0,
        ];
        Kernel::from_weights(3, weights)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// How far the kernel reaches from its centre in any direction.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// The weights of row `y`.
    pub fn row(&self, y: usize) -> &[f32] {
        &self.weights[y * self.size..(y + 1) * self.size]
    }
}

impl Index<(usize, usize)> for Kernel {
    type Output = f32;

    fn index(&self, (x, y): (usize, usize)) -> &f32 {
        &self.weights[y * self.size + x]
    }
}
