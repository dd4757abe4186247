//! # YagiKit Core
//!
//! Core types, errors, and transforms for YagiKit.
//! Provides the value objects describing the boom, the antenna elements and
//! the screw terminals, plus the error types shared by all builders.

pub mod error;
pub mod placement;
pub mod types;

pub use error::{Error, GeometryError, Result};
pub use placement::Placement;
pub use types::{
    BoomProfile, Element, ElementSet, ElementType, Label, Polarization, Rgb, TerminalSpec,
};
