//! Two-lug barrel screw terminal ("choco" terminal).

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Physical dimensions of a purchasable screw terminal, in millimeters.
///
/// In its own frame the terminal's flat (screw) side points up (+Y) and its
/// barrel runs along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalSpec {
    /// Outer diameter of the brass barrel.
    pub outer_diameter: f64,
    /// Inner diameter of the barrel (wire hole).
    pub inner_diameter: f64,
    /// Length of the barrel.
    pub length: f64,
    /// Height from the bottom of the barrel to the flat side.
    pub height: f64,
    /// Width of the flat side.
    pub flat_width: f64,
    /// Bevel radius at the corners of the flat side.
    pub flat_bevel: f64,
    /// Diameter of the screw shaft.
    pub screw_diameter: f64,
    /// Distance of each screw from the center of the barrel.
    pub screw_offset_from_center: f64,
    /// Diameter of the center through hole.
    pub center_hole_diameter: f64,
}

impl TerminalSpec {
    /// Terminal strip for 10 mm² wire.
    pub fn terminal_10mm2() -> Self {
        Self {
            outer_diameter: 4.3,
            inner_diameter: 3.4,
            length: 12.0,
            height: 5.8,
            flat_width: 3.55,
            flat_bevel: 0.2,
            screw_diameter: 3.0,
            screw_offset_from_center: 4.0,
            center_hole_diameter: 3.0,
        }
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_diameter / 2.0
    }

    /// Distance from the barrel axis to the flat side.
    pub fn flat_height(&self) -> f64 {
        self.height - self.outer_radius()
    }

    /// Check that every dimension is positive and the barrel has a wall.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let dims = [
            ("terminal outer diameter", self.outer_diameter),
            ("terminal inner diameter", self.inner_diameter),
            ("terminal length", self.length),
            ("terminal height", self.height),
            ("terminal flat width", self.flat_width),
            ("terminal screw diameter", self.screw_diameter),
            ("terminal center hole diameter", self.center_hole_diameter),
        ];
        for (name, value) in dims {
            if !(value > 0.0 && value.is_finite()) {
                return Err(GeometryError::dimension(name, value));
            }
        }
        if self.inner_diameter >= self.outer_diameter {
            return Err(GeometryError::dimension(
                "terminal inner diameter",
                self.inner_diameter,
            ));
        }
        if self.flat_height() <= 0.0 {
            return Err(GeometryError::dimension("terminal height", self.height));
        }
        if self.flat_bevel < 0.0 {
            return Err(GeometryError::dimension("terminal flat bevel", self.flat_bevel));
        }
        if self.screw_offset_from_center + self.screw_diameter / 2.0 > self.length / 2.0 {
            return Err(GeometryError::dimension(
                "terminal screw offset",
                self.screw_offset_from_center,
            ));
        }
        Ok(())
    }
}

impl Default for TerminalSpec {
    fn default() -> Self {
        Self::terminal_10mm2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_10mm2_is_valid() {
        let t = TerminalSpec::terminal_10mm2();
        assert!(t.validate().is_ok());
        assert!((t.flat_height() - 3.65).abs() < 1e-12);
    }

    #[test]
    fn test_inner_larger_than_outer_rejected() {
        let t = TerminalSpec {
            inner_diameter: 5.0,
            ..TerminalSpec::terminal_10mm2()
        };
        assert!(t.validate().is_err());
    }
}
