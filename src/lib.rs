// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image resizing by seam carving.
//!
//! The working image is a single channel of `f32` intensities held in
//! a [`Grid`].  Each iteration blurs it into an energy map, runs the
//! cumulative-cost DP over that, backtracks the cheapest top-to-bottom
//! seam and squeezes it out, until the image is as narrow as asked.
//!
//! ```
//! use seamcarve::{seamcarve, Grid};
//!
//! let image = Grid::from_fn(100, 100, |x, y| ((x * y) % 255) as f32);
//! let smaller = seamcarve(image, 60, 100).unwrap();
//! assert_eq!(smaller.dimensions(), (60, 100));
//! ```

pub mod ternary;

pub mod config;
pub mod convolve;
pub mod cost;
pub mod energy;
pub mod error;
pub mod grid;
pub mod imageio;
pub mod kernel;
pub mod seamcarver;
pub mod seamfinder;

pub use config::{CarveConfig, EnergyKind};
pub use energy::calculate_energy;
pub use error::CarveError;
pub use grid::Grid;
pub use kernel::Kernel;
pub use seamcarver::{seamcarve, Carving, SeamCarver};
pub use seamfinder::{find_vertical_seam, Seam};
