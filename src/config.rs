// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Knobs for a carving run.
//!
//! The defaults are the constants the classic implementation
//! hard-wired: a 5-pixel inset around the DP region, a 20-column
//! guard band at either edge priced at a million, and a Gaussian
//! spread of 2.3.

use crate::error::CarveError;
use std::str::FromStr;

/// How the energy map is derived from the working image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyKind {
    /// The Gaussian response of the image itself.
    Blur,
    /// Sobel gradient magnitude (|gx| + |gy|) of the blurred image.
    Gradient,
}

impl Default for EnergyKind {
    fn default() -> Self {
        EnergyKind::Blur
    }
}

impl FromStr for EnergyKind {
    type Err = CarveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(EnergyKind::Blur),
            "gradient" => Ok(EnergyKind::Gradient),
            other => Err(CarveError::Config(format!(
                "unknown energy kind '{}' (expected blur or gradient)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarveConfig {
    /// Rows and columns on every side excluded from the DP pass.
    pub inset: usize,
    /// Columns at the left and right edges pinned to `guard_value`.
    pub guard_width: usize,
    /// The cost written into the guard band.
    pub guard_value: f32,
    /// Standard deviation of the 5x5 Gaussian kernel.
    pub sigma: f32,
    pub energy: EnergyKind,
}

impl Default for CarveConfig {
    fn default() -> Self {
        CarveConfig {
            inset: 5,
            guard_width: 20,
            guard_value: 1_000_000.0,
            sigma: 2.3,
            energy: EnergyKind::Blur,
        }
    }
}

impl CarveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inset(mut self, inset: usize) -> Self {
        self.inset = inset;
        self
    }

    pub fn with_guard_width(mut self, guard_width: usize) -> Self {
        self.guard_width = guard_width;
        self
    }

    pub fn with_guard_value(mut self, guard_value: f32) -> Self {
        self.guard_value = guard_value;
        self
    }

    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_energy(mut self, energy: EnergyKind) -> Self {
        self.energy = energy;
        self
    }

    /// The smallest width or height the pipeline can work on.  The
    /// backtrack needs at least two candidate columns between the
    /// insets and a row above and below each one it reads.
    pub fn min_extent(&self) -> usize {
        self.inset.saturating_mul(2).saturating_add(2)
    }

    pub fn validate(&self) -> Result<(), CarveError> {
        if self.inset == 0 {
            return Err(CarveError::Config(
                "inset must be at least 1; the DP reads one column either side".to_string(),
            ));
        }
        if self.inset.checked_mul(2).and_then(|d| d.checked_add(2)).is_none() {
            return Err(CarveError::Config(format!(
                "inset {} is larger than any image could be",
                self.inset
            )));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(CarveError::Config(format!(
                "sigma must be a positive number, got {}",
                self.sigma
            )));
        }
        if !self.guard_value.is_finite() {
            return Err(CarveError::Config(format!(
                "guard value must be finite, got {}",
                self.guard_value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_classic_constants() {
        let config = CarveConfig::default();
        assert_eq!(config.inset, 5);
        assert_eq!(config.guard_width, 20);
        assert_eq!(config.guard_value, 1_000_000.0);
        assert_eq!(config.sigma, 2.3);
        assert_eq!(config.energy, EnergyKind::Blur);
        assert_eq!(config.min_extent(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_nonsense() {
        assert!(CarveConfig::new().with_inset(0).validate().is_err());
        assert!(CarveConfig::new().with_sigma(0.0).validate().is_err());
        assert!(CarveConfig::new().with_sigma(std::f32::NAN).validate().is_err());
        assert!(CarveConfig::new()
            .with_guard_value(std::f32::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn huge_inset_is_a_config_error() {
        let config = CarveConfig::new().with_inset(usize::MAX / 2 + 1);
        assert!(matches!(config.validate(), Err(CarveError::Config(_))));
        assert_eq!(config.min_extent(), usize::MAX);
    }

    #[test]
    fn energy_kinds_parse() {
        assert_eq!("blur".parse::<EnergyKind>(), Ok(EnergyKind::Blur));
        assert_eq!("Gradient".parse::<EnergyKind>(), Ok(EnergyKind::Gradient));
        assert!("laplace".parse::<EnergyKind>().is_err());
    }
}
