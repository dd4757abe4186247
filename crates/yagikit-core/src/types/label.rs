//! Engraved labels and display colors.

use serde::{Deserialize, Serialize};

/// Engraving spec for the two opposite faces of a housing.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Text for the front and back face.
    pub texts: [String; 2],
    /// Font family name.
    pub font: String,
    /// Font size in millimeters.
    pub size: f64,
    /// Engraving depth.
    pub depth: f64,
}

impl Label {
    /// Split an element code such as `7R` into one character per face.
    pub fn from_code(code: &str, font: impl Into<String>, size: f64, depth: f64) -> Self {
        let mut chars = code.chars();
        let first = chars.next().map(String::from).unwrap_or_default();
        let second: String = chars.collect();
        Self {
            texts: [first, second],
            font: font.into(),
            size,
            depth,
        }
    }
}

/// RGB display color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const ROD: Rgb = Rgb::new(0.35, 0.35, 0.35);
    pub const ELEMENT: Rgb = Rgb::new(1.0, 1.0, 0.0);
    pub const HOUSING: Rgb = Rgb::new(1.0, 0.5, 0.5);
    pub const TERMINAL: Rgb = Rgb::new(0.8, 0.6, 0.2);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_code() {
        let label = Label::from_code("7R", "Arial Black", 6.0, 0.28);
        assert_eq!(label.texts, ["7".to_string(), "R".to_string()]);
        let short = Label::from_code("X", "Sans", 6.0, 0.28);
        assert_eq!(short.texts, ["X".to_string(), String::new()]);
    }
}
