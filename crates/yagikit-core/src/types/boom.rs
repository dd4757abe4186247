//! Tapered boom model.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Conical boom running along +Z from its base (Z = 0) to its tip (Z = length).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoomProfile {
    /// Boom length in millimeters.
    pub length: f64,
    /// Diameter at the base (Z = 0).
    pub base_diameter: f64,
    /// Diameter at the tip (Z = length).
    pub tip_diameter: f64,
}

impl BoomProfile {
    /// Create a validated boom profile.
    pub fn new(length: f64, base_diameter: f64, tip_diameter: f64) -> Result<Self, GeometryError> {
        let boom = Self {
            length,
            base_diameter,
            tip_diameter,
        };
        boom.validate()?;
        Ok(boom)
    }

    /// Check that the boom has a positive length and narrows toward the tip.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if !(self.length > 0.0 && self.length.is_finite()) {
            return Err(GeometryError::dimension("boom length", self.length));
        }
        if !(self.tip_diameter > 0.0) {
            return Err(GeometryError::dimension("boom tip diameter", self.tip_diameter));
        }
        if !(self.base_diameter > self.tip_diameter) {
            return Err(GeometryError::NonTapering {
                base: self.base_diameter,
                tip: self.tip_diameter,
            });
        }
        Ok(())
    }

    pub fn base_radius(&self) -> f64 {
        self.base_diameter / 2.0
    }

    pub fn tip_radius(&self) -> f64 {
        self.tip_diameter / 2.0
    }

    /// Boom radius at an axial position, interpolated linearly.
    ///
    /// Positions outside `[0, length]` are rejected rather than extrapolated.
    pub fn radius_at(&self, position: f64) -> Result<f64, GeometryError> {
        if !(0.0..=self.length).contains(&position) {
            return Err(GeometryError::OutsideBoom {
                position,
                length: self.length,
            });
        }
        let t = position / self.length;
        Ok(self.base_radius() + t * (self.tip_radius() - self.base_radius()))
    }

    /// Half-angle of the cone in degrees; negative when the boom narrows
    /// toward +Z.
    ///
    /// This is the slope of the surface, `atan((r_tip - r_base) / length)`.
    /// The diameter slope `atan((d_tip - d_base) / length)` gives about
    /// twice the angle and tilts the sleeve past the rod surface.
    pub fn taper_angle(&self) -> f64 {
        ((self.tip_radius() - self.base_radius()) / self.length)
            .atan()
            .to_degrees()
    }
}
