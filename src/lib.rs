//! # YagiKit
//!
//! Generates 3D-printable element housings for a dual-band Yagi antenna
//! built on a tapered fishing-rod boom:
//! - C-shaped sleeves that clip onto the boom at the local rod radius
//! - Holders for straight wire elements and for pairs of screw terminals
//! - Engraved element labels
//! - One binary STL file per housing, ready for the slicer
//!
//! ## Architecture
//!
//! YagiKit is organized as a workspace with multiple crates:
//!
//! 1. **yagikit-core** - Core types, errors, placements
//! 2. **yagikit-designer** - Profiles, tangent geometry, sleeves, terminals, housings
//! 3. **yagikit-settings** - Generation configuration (TOML/JSON)
//! 4. **yagikit-layout** - Element positions, scene assembly, STL export
//! 5. **yagikit** - Command line binary that integrates all crates

use anyhow::Context;
use std::path::PathBuf;

pub use yagikit_core::{
    BoomProfile, Element, ElementSet, ElementType, Error, GeometryError, Label, Placement,
    Polarization, Result, Rgb, TerminalSpec,
};
pub use yagikit_designer::{HousingBuilder, SleeveParams, TerminalBuilder};
pub use yagikit_layout::{
    export_housings, write_preview, AntennaLayout, BandDistances, FailurePolicy, MeshReport,
    Scene,
};
pub use yagikit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

/// Overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Configuration file; the built-in defaults when `None`
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub variant: Option<String>,
    /// Directory for the full scene dump
    pub preview: Option<PathBuf>,
    /// Write the effective configuration here before generating
    pub write_config: Option<PathBuf>,
    pub skip_failed: bool,
}

impl RunOptions {
    /// Load the configuration file, or the defaults, and apply overrides.
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if let Some(variant) = &self.variant {
            config.output.variant = variant.clone();
        }
        if self.skip_failed {
            config.output.failure_policy = FailurePolicy::Skip;
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Generate every housing and write the STL files.
pub fn run(options: &RunOptions) -> anyhow::Result<Vec<MeshReport>> {
    let config = options.resolve_config()?;
    tracing::info!(
        bands = config.bands.len(),
        policy = %config.output.failure_policy,
        "YagiKit {} (built {})",
        VERSION,
        BUILD_DATE
    );

    if let Some(path) = &options.write_config {
        config
            .save_to_file(path)
            .with_context(|| format!("Failed to write configuration {}", path.display()))?;
        tracing::info!(file = %path.display(), "wrote configuration");
    }

    let layout = AntennaLayout::new(&config).context("Failed to lay out the antenna")?;
    let scene = layout.assemble().context("Failed to build the housings")?;

    let reports = export_housings(
        scene.parts(),
        &config.output.directory,
        &config.output.variant,
    )
    .with_context(|| {
        format!(
            "Failed to export housings to {}",
            config.output.directory.display()
        )
    })?;

    if let Some(dir) = &options.preview {
        write_preview(&scene, dir)
            .with_context(|| format!("Failed to write preview to {}", dir.display()))?;
    }

    tracing::info!(
        parts = reports.len(),
        dir = %config.output.directory.display(),
        "done"
    );
    Ok(reports)
}
