//! YagiKit Settings Crate
//!
//! Holds the immutable generation configuration: print tolerances, boom and
//! housing dimensions, label style and the element tables of every band.

pub mod config;
pub mod error;

pub use config::{
    BandSettings, Config, ElementEntry, FailurePolicy, HousingSettings, LabelSettings,
    LayoutSettings, OutputSettings, PrintSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
