//! Error handling for YagiKit
//!
//! Provides the error types shared by every layer of the generator:
//! - Geometry errors (precondition violations and degenerate kernel results)
//! - Part errors (a geometry failure tagged with the element label)
//! - Configuration errors (unknown element type tags)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Represents a violated precondition of one of the builders or an empty
/// result returned by the solid modeling kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The tangent point lies inside the circle
    #[error("Point at distance {distance} lies inside circle of radius {radius}")]
    TangentDomain {
        /// The circle radius.
        radius: f64,
        /// The distance of the point from the circle center.
        distance: f64,
    },

    /// A dimension is zero, negative or not finite
    #[error("Invalid dimension '{name}': {value}")]
    InvalidDimension {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// The C-sleeve opening angle does not grip the boom
    #[error("Sleeve angle must be within (180, 360) degrees, got {angle}")]
    SleeveAngle {
        /// The rejected angle in degrees.
        angle: f64,
    },

    /// The boom does not narrow from base to tip
    #[error("Boom base diameter {base} must exceed tip diameter {tip}")]
    NonTapering {
        /// Base diameter in millimeters.
        base: f64,
        /// Tip diameter in millimeters.
        tip: f64,
    },

    /// An axial position lies outside the boom
    #[error("Position {position} lies outside boom of length {length}")]
    OutsideBoom {
        /// The requested axial position.
        position: f64,
        /// The boom length.
        length: f64,
    },

    /// No profile edge has the requested tangent direction
    #[error("Tangent point not found for angle {angle} degrees")]
    TangentPointNotFound {
        /// The tangent direction in degrees.
        angle: f64,
    },

    /// A single edge has more than one point with the requested tangent
    #[error("Edge has more than one tangent point for angle {angle} degrees")]
    AmbiguousTangent {
        /// The tangent direction in degrees.
        angle: f64,
    },

    /// A 2D profile has no area
    #[error("Profile '{name}' is empty")]
    EmptyProfile {
        /// The profile name.
        name: String,
    },

    /// The kernel returned an empty solid
    #[error("Degenerate result from {operation}")]
    Degenerate {
        /// The operation that produced the empty solid.
        operation: String,
    },
}

impl GeometryError {
    /// Shorthand for an invalid dimension.
    pub fn dimension(name: impl Into<String>, value: f64) -> Self {
        GeometryError::InvalidDimension {
            name: name.into(),
            value,
        }
    }

    /// Shorthand for a degenerate kernel result.
    pub fn degenerate(operation: impl Into<String>) -> Self {
        GeometryError::Degenerate {
            operation: operation.into(),
        }
    }
}

/// Main error type for YagiKit
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Geometry error raised while building one labeled part
    #[error("Part '{label}' failed: {source}")]
    Part {
        /// The element label, e.g. `7R`.
        label: String,
        /// The underlying geometry error.
        #[source]
        source: GeometryError,
    },

    /// Unknown element type tag in the configuration
    #[error("Unknown element type '{0}' (expected 'wire' or 'screw_terminal')")]
    UnknownElementType(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Attach an element label to a geometry error
    pub fn part(label: impl Into<String>, source: GeometryError) -> Self {
        Error::Part {
            label: label.into(),
            source,
        }
    }

    /// Check if this is a geometry error, labeled or not
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_) | Error::Part { .. })
    }

    /// Label of the part that failed, if any
    pub fn label(&self) -> Option<&str> {
        match self {
            Error::Part { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Result type for YagiKit operations
pub type Result<T> = std::result::Result<T, Error>;
