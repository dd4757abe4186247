//! Named, colored solids of one generation run.

use yagikit_core::{Placement, Rgb};
use yagikit_designer::Solid;

/// One preview object.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub name: String,
    pub color: Rgb,
    pub solid: Solid,
}

/// One housing destined for its own mesh file.
#[derive(Debug, Clone)]
pub struct ExportPart {
    pub label: String,
    /// Housing in its own frame
    pub solid: Solid,
    /// Housing frame to antenna frame
    pub placement: Placement,
    /// Housing frame to print orientation
    pub orientation: Placement,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    entries: Vec<SceneEntry>,
    parts: Vec<ExportPart>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, color: Rgb, solid: Solid) {
        let name = name.into();
        tracing::debug!(name = %name, polygons = solid.polygons.len(), "scene entry");
        self.entries.push(SceneEntry { name, color, solid });
    }

    pub fn add_parts(&mut self, parts: impl IntoIterator<Item = ExportPart>) {
        self.parts.extend(parts);
    }

    pub fn entries(&self) -> &[SceneEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&SceneEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn parts(&self) -> &[ExportPart] {
        &self.parts
    }
}
