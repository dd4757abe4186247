//! STL export of housings and preview dumps.

use crate::mesh::TriangleMesh;
use crate::scene::{ExportPart, Scene};
use serde::Serialize;
use std::path::{Path, PathBuf};
use yagikit_core::{Error, GeometryError, Placement, Result};
use yagikit_designer::Solid;

/// Summary of one written mesh file.
#[derive(Debug, Clone, Serialize)]
pub struct MeshReport {
    pub name: String,
    pub path: PathBuf,
    pub triangles: usize,
    pub volume: f64,
    pub open_edges: usize,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    name: &'a str,
    color: [f32; 3],
    file: String,
    triangles: usize,
}

/// A printable part must not have a single open edge.
fn ensure_closed(name: &str, open_edges: usize) -> Result<()> {
    if open_edges > 0 {
        return Err(Error::part(
            name,
            GeometryError::degenerate(format!("mesh export ({} open edges)", open_edges)),
        ));
    }
    Ok(())
}

/// Write one mesh. Printable parts must be closed; preview entries only
/// warn about open edges.
fn write_mesh(
    name: &str,
    solid: &Solid,
    placement: &Placement,
    path: &Path,
    require_closed: bool,
) -> Result<MeshReport> {
    let mesh = TriangleMesh::from_solid(solid).transformed(placement);
    if mesh.is_empty() {
        return Err(Error::part(name, GeometryError::degenerate("mesh export")));
    }
    let open_edges = mesh.open_edges();
    if require_closed {
        ensure_closed(name, open_edges)?;
    } else if open_edges > 0 {
        tracing::warn!(name, open_edges, "preview mesh is not closed");
    }
    mesh.write_stl(path)?;

    Ok(MeshReport {
        name: name.to_string(),
        path: path.to_path_buf(),
        triangles: mesh.len(),
        volume: mesh.volume(),
        open_edges,
    })
}

/// Write every housing as `<label>-<variant>.stl` into `dir`, creating the
/// directory when missing.
pub fn export_housings(parts: &[ExportPart], dir: &Path, variant: &str) -> Result<Vec<MeshReport>> {
    std::fs::create_dir_all(dir)?;
    let mut reports = Vec::with_capacity(parts.len());
    for part in parts {
        let path = dir.join(format!("{}-{}.stl", part.label, variant));
        let report = write_mesh(&part.label, &part.solid, &part.orientation, &path, true)?;
        tracing::info!(
            file = %path.display(),
            triangles = report.triangles,
            volume = report.volume,
            "exported housing"
        );
        reports.push(report);
    }
    Ok(reports)
}

/// Dump every scene entry as `<name>.stl` plus a `scene.json` manifest of
/// names and colors.
pub fn write_preview(scene: &Scene, dir: &Path) -> Result<Vec<MeshReport>> {
    std::fs::create_dir_all(dir)?;
    let mut reports = Vec::with_capacity(scene.entries().len());
    let mut manifest = Vec::with_capacity(scene.entries().len());
    for entry in scene.entries() {
        let file = format!("{}.stl", entry.name.replace(char::is_whitespace, "_"));
        let report = write_mesh(
            &entry.name,
            &entry.solid,
            &Placement::identity(),
            &dir.join(&file),
            false,
        )?;
        manifest.push(ManifestEntry {
            name: &entry.name,
            color: entry.color.to_array(),
            file,
            triangles: report.triangles,
        });
        reports.push(report);
    }

    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| Error::other(format!("Failed to serialize scene manifest: {}", e)))?;
    std::fs::write(dir.join("scene.json"), json)?;
    tracing::info!(dir = %dir.display(), entries = manifest.len(), "wrote preview");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_open_mesh_fails_with_part_label() {
        let mesh = TriangleMesh::from_triangles(&[[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]]);
        assert_eq!(mesh.open_edges(), 3);
        match ensure_closed("7R", mesh.open_edges()) {
            Err(Error::Part { label, source }) => {
                assert_eq!(label, "7R");
                assert!(matches!(source, GeometryError::Degenerate { .. }));
            }
            other => panic!("expected a part error, got {:?}", other),
        }
        assert!(ensure_closed("7R", 0).is_ok());
    }
}
