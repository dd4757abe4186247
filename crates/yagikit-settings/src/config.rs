//! Generation configuration for YagiKit
//!
//! Every dimension used by a generation run lives here, organized into
//! sections:
//! - Output (directory, variant suffix, tessellation, failure policy)
//! - Print tolerances
//! - Boom, housing, label and terminal dimensions
//! - Element tables of every band
//!
//! Supports JSON and TOML files. The defaults reproduce the two-band
//! 2 m / 70 cm antenna on a 1130 mm fishing-rod boom.

use crate::error::{ConfigError, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use yagikit_core::{BoomProfile, ElementType, GeometryError, Polarization, TerminalSpec};

/// Diameter of the element rods of both default bands.
const ROD_DIAMETER: f64 = 3.175;

/// What to do when one part fails to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the run on the first failed part
    #[default]
    Halt,
    /// Log the failed part and continue with the rest
    Skip,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Halt => write!(f, "halt"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory receiving one STL file per housing
    pub directory: PathBuf,
    /// Suffix appended to every file name, e.g. `7R-1.stl`
    pub variant: String,
    /// Segments used to tessellate a full circle
    pub arc_segments: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            variant: "1".to_string(),
            arc_segments: 64,
            failure_policy: FailurePolicy::Halt,
        }
    }
}

/// Print tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSettings {
    /// Clearance between printed parts and the boom or terminals
    pub gap: f64,
    /// Clearance around the element rods
    pub gap_element: f64,
    /// Extrusion line width
    pub line_width: f64,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            gap: 0.15,
            gap_element: 0.1,
            line_width: 0.4,
        }
    }
}

impl PrintSettings {
    /// Two extrusion lines.
    pub fn wall(&self) -> f64 {
        2.0 * self.line_width
    }

    /// Wall around an element rod, including its clearance.
    pub fn element_wall(&self) -> f64 {
        self.gap_element + self.wall()
    }
}

/// Housing and sleeve dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingSettings {
    /// Extent of a wire housing along the element
    pub width: f64,
    pub sleeve_thickness: f64,
    pub sleeve_length: f64,
    /// Angular coverage of the sleeve in degrees
    pub sleeve_angle: f64,
    /// Extra material above the element
    pub top_extra: f64,
    /// Free space between the two terminals of a terminal housing
    pub terminal_spacing: f64,
    /// Material beyond the outer terminal ends
    pub terminal_extra_width: f64,
}

impl Default for HousingSettings {
    fn default() -> Self {
        Self {
            width: 24.5,
            sleeve_thickness: 1.6,
            sleeve_length: 18.0,
            sleeve_angle: 270.0,
            top_extra: 0.4,
            terminal_spacing: 6.0,
            terminal_extra_width: 1.0,
        }
    }
}

/// Label engraving style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSettings {
    pub font: String,
    pub size: f64,
    pub depth: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            font: "Arial Black".to_string(),
            size: 6.0,
            depth: 0.28,
        }
    }
}

/// Placement of the bands along the boom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Span of the longest band, measured back from the boom tip to find
    /// the reference position
    pub longest_span: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            longest_span: 1016.0,
        }
    }
}

/// One row of a band's element table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    /// Position relative to the band's reflector
    pub offset: f64,
    pub length: f64,
    #[serde(default)]
    pub reversed: bool,
    pub label: String,
}

impl ElementEntry {
    pub fn new(offset: f64, length: f64, reversed: bool, label: &str) -> Self {
        Self {
            offset,
            length,
            reversed,
            label: label.to_string(),
        }
    }
}

/// One band of the antenna
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSettings {
    pub name: String,
    /// `wire` or `screw_terminal`
    pub element_type: String,
    #[serde(default)]
    pub polarization: Polarization,
    /// Height of the element axis above the boom surface
    pub elevation: f64,
    pub element_diameter: f64,
    /// Reflector position relative to the reference position
    pub reflector_offset: f64,
    pub elements: Vec<ElementEntry>,
}

impl BandSettings {
    /// Resolve the element type tag.
    pub fn element_type(&self, terminal: TerminalSpec) -> SettingsResult<ElementType> {
        Ok(ElementType::from_tag(&self.element_type, terminal)?)
    }
}

/// Complete generation configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub output: OutputSettings,
    pub print: PrintSettings,
    pub boom: BoomProfile,
    pub housing: HousingSettings,
    pub label: LabelSettings,
    pub terminal: TerminalSpec,
    pub layout: LayoutSettings,
    pub bands: Vec<BandSettings>,
}

impl Default for Config {
    fn default() -> Self {
        let print = PrintSettings::default();
        let elevation_2m = print.gap + print.wall() + ROD_DIAMETER / 2.0;
        // The 70 cm rods cross above the 2 m rods.
        let elevation_70cm = elevation_2m + ROD_DIAMETER / 2.0;

        let band_2m = BandSettings {
            name: "2m".to_string(),
            element_type: "wire".to_string(),
            polarization: Polarization::Horizontal,
            elevation: elevation_2m,
            element_diameter: ROD_DIAMETER,
            reflector_offset: -30.0,
            elements: vec![
                ElementEntry::new(0.0, 1028.7, false, "2R"),
                ElementEntry::new(610.0, 927.1, false, "2D"),
                ElementEntry::new(910.0, 927.1, true, "21"),
            ],
        };
        let band_70cm = BandSettings {
            name: "70cm".to_string(),
            element_type: "wire".to_string(),
            polarization: Polarization::Vertical,
            elevation: elevation_70cm,
            element_diameter: ROD_DIAMETER,
            reflector_offset: 19.0,
            elements: vec![
                ElementEntry::new(0.0, 340.4, true, "7R"),
                ElementEntry::new(63.5, 315.0, false, "7D"),
                ElementEntry::new(139.7, 315.0, false, "71"),
                ElementEntry::new(285.8, 304.8, false, "72"),
                ElementEntry::new(444.5, 304.8, false, "73"),
                ElementEntry::new(609.6, 304.8, false, "74"),
                ElementEntry::new(774.7, 304.8, false, "75"),
                ElementEntry::new(958.9, 281.9, true, "76"),
            ],
        };

        Self {
            output: OutputSettings::default(),
            print,
            boom: BoomProfile {
                length: 1130.0,
                base_diameter: 19.5,
                tip_diameter: 16.0,
            },
            housing: HousingSettings::default(),
            label: LabelSettings::default(),
            terminal: TerminalSpec::terminal_10mm2(),
            layout: LayoutSettings::default(),
            bands: vec![band_2m, band_70cm],
        }
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {}", value)))
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), bands = config.bands.len(), "config loaded");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Band by name.
    pub fn band(&self, name: &str) -> Option<&BandSettings> {
        self.bands.iter().find(|b| b.name == name)
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        // Output
        if self.output.variant.trim().is_empty()
            || self.output.variant.contains(['/', '\\'])
        {
            return Err(SettingsError::invalid(
                "output.variant",
                "must be a non-empty file name fragment",
            ));
        }
        if self.output.arc_segments < 8 {
            return Err(SettingsError::invalid(
                "output.arc_segments",
                "must be at least 8",
            ));
        }

        // Print tolerances
        positive("print.gap", self.print.gap)?;
        positive("print.gap_element", self.print.gap_element)?;
        positive("print.line_width", self.print.line_width)?;

        // Parts
        self.boom.validate()?;
        self.terminal.validate()?;
        positive("housing.width", self.housing.width)?;
        positive("housing.sleeve_thickness", self.housing.sleeve_thickness)?;
        positive("housing.sleeve_length", self.housing.sleeve_length)?;
        if !(self.housing.sleeve_angle > 180.0 && self.housing.sleeve_angle < 360.0) {
            return Err(GeometryError::SleeveAngle {
                angle: self.housing.sleeve_angle,
            }
            .into());
        }
        if self.housing.top_extra < 0.0 {
            return Err(SettingsError::invalid("housing.top_extra", "must be >= 0"));
        }
        positive("housing.terminal_spacing", self.housing.terminal_spacing)?;
        positive("label.size", self.label.size)?;
        positive("label.depth", self.label.depth)?;
        positive("layout.longest_span", self.layout.longest_span)?;

        // Bands
        if self.bands.is_empty() {
            return Err(ConfigError::NoBands.into());
        }
        let mut labels = HashSet::new();
        for band in &self.bands {
            band.element_type(self.terminal)?;
            positive(&format!("bands.{}.elevation", band.name), band.elevation)?;
            positive(
                &format!("bands.{}.element_diameter", band.name),
                band.element_diameter,
            )?;
            for element in &band.elements {
                positive(&format!("bands.{}.{}.length", band.name, element.label), element.length)?;
                if element.label.trim().is_empty() {
                    return Err(SettingsError::invalid(
                        format!("bands.{}.elements", band.name),
                        "element label must not be empty",
                    ));
                }
                if !labels.insert(element.label.as_str()) {
                    return Err(ConfigError::DuplicateLabel(element.label.clone()).into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bands.len(), 2);
        assert_eq!(config.output.failure_policy, FailurePolicy::Halt);
    }

    #[test]
    fn test_default_elevations() {
        let config = Config::default();
        let b2 = config.band("2m").unwrap();
        let b70 = config.band("70cm").unwrap();
        assert!((b2.elevation - 2.5375).abs() < 1e-12);
        assert!((b70.elevation - 4.125).abs() < 1e-12);
        assert!((config.print.element_wall() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let mut config = Config::default();
        config.bands[1].elements[0].label = "2R".to_string();
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::DuplicateLabel(l))) if l == "2R"
        ));
    }

    #[test]
    fn test_sleeve_angle_rejected() {
        let mut config = Config::default();
        config.housing.sleeve_angle = 180.0;
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Geometry(GeometryError::SleeveAngle { .. }))
        ));
    }

    #[test]
    fn test_variant_must_be_file_name() {
        let mut config = Config::default();
        config.output.variant = "a/b".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_failure_policy_display() {
        assert_eq!(FailurePolicy::Halt.to_string(), "halt");
        assert_eq!(FailurePolicy::Skip.to_string(), "skip");
    }
}
