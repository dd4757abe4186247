//! Antenna elements and their grouping per band.

use crate::error::Error;
use crate::types::TerminalSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One antenna rod (reflector, driven element or director).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Axial position along the boom, measured from the boom base.
    pub position: f64,
    /// Rod length.
    pub length: f64,
    /// Flip the housing so it faces the boom base.
    #[serde(default)]
    pub reversed: bool,
    /// Two character band/role code, e.g. `2R` or `74`.
    pub label: String,
}

impl Element {
    pub fn new(position: f64, length: f64, reversed: bool, label: impl Into<String>) -> Self {
        Self {
            position,
            length,
            reversed,
            label: label.into(),
        }
    }
}

/// Mounting style shared by the elements of one band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementType {
    /// Bare rod pushed through the housing.
    Wire,
    /// Wire clamped by two screw terminals embedded in the housing.
    ScrewTerminal(TerminalSpec),
}

impl ElementType {
    /// Configuration tag of this type.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementType::Wire => "wire",
            ElementType::ScrewTerminal(_) => "screw_terminal",
        }
    }

    /// Resolve a configuration tag, using `terminal` for terminal-mounted sets.
    pub fn from_tag(tag: &str, terminal: TerminalSpec) -> Result<Self, Error> {
        match tag.trim().to_lowercase().as_str() {
            "wire" => Ok(ElementType::Wire),
            "screw_terminal" | "screw-terminal" | "choco" => {
                Ok(ElementType::ScrewTerminal(terminal))
            }
            _ => Err(Error::UnknownElementType(tag.to_string())),
        }
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s, TerminalSpec::terminal_10mm2())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Orientation of the elements of one band around the boom axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarization {
    #[default]
    Horizontal,
    Vertical,
}

impl Polarization {
    /// Rotation about the boom axis in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        match self {
            Polarization::Horizontal => 0.0,
            Polarization::Vertical => 90.0,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Polarization::Vertical)
    }
}

impl fmt::Display for Polarization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarization::Horizontal => write!(f, "horizontal"),
            Polarization::Vertical => write!(f, "vertical"),
        }
    }
}

/// Elements of one band sharing mounting style and polarization.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet {
    /// Band name, e.g. `2m`.
    pub name: String,
    pub elements: Vec<Element>,
    pub element_type: ElementType,
    pub polarization: Polarization,
    /// Height of the element axis above the boom surface.
    pub elevation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_from_str() {
        assert_eq!("wire".parse::<ElementType>().unwrap(), ElementType::Wire);
        assert_eq!(
            "Screw_Terminal".parse::<ElementType>().unwrap(),
            ElementType::ScrewTerminal(TerminalSpec::terminal_10mm2())
        );
    }

    #[test]
    fn test_unknown_element_type_rejected() {
        let err = "rivet".parse::<ElementType>().unwrap_err();
        assert!(matches!(err, Error::UnknownElementType(ref tag) if tag == "rivet"));
    }

    #[test]
    fn test_polarization_rotation() {
        assert_eq!(Polarization::Horizontal.rotation_degrees(), 0.0);
        assert_eq!(Polarization::Vertical.rotation_degrees(), 90.0);
        assert_eq!(Polarization::Vertical.to_string(), "vertical");
    }
}
