use std::path::Path;
use tempfile::TempDir;
use yagikit_core::{Error, GeometryError};
use yagikit_layout::{export_housings, write_preview, AntennaLayout, FailurePolicy};
use yagikit_settings::{Config, ElementEntry};

fn quick_config() -> Config {
    let mut config = Config::default();
    config.output.arc_segments = 16;
    config
}

fn stl_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".stl"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_element_rods_sit_above_boom() {
    let layout = AntennaLayout::new(&quick_config()).unwrap();
    let set = layout.element_set("2m").unwrap();
    let rods = layout.elements(set).unwrap();
    assert_eq!(rods.len(), 3);

    for el in &set.elements {
        let r = layout.radius_at(el.position).unwrap();
        assert!(r > 8.0 && r < 9.75, "radius {} at {}", r, el.position);
    }
}

#[test]
fn test_export_writes_one_file_per_element() {
    let layout = AntennaLayout::new(&quick_config()).unwrap();
    let set = layout.element_set("70cm").unwrap();
    let parts = layout.housings(set).unwrap();
    assert_eq!(parts.len(), 8);

    let dir = TempDir::new().unwrap();
    let reports = export_housings(&parts, dir.path(), "1").unwrap();
    assert_eq!(reports.len(), 8);
    for report in &reports {
        assert!(report.triangles > 0);
        assert!(report.volume > 0.0, "{} has volume {}", report.name, report.volume);
        assert_eq!(report.open_edges, 0, "{} is not closed", report.name);
    }
    assert_eq!(
        stl_names(dir.path()),
        vec!["71-1.stl", "72-1.stl", "73-1.stl", "74-1.stl", "75-1.stl", "76-1.stl", "7D-1.stl", "7R-1.stl"]
    );
}

#[test]
fn test_export_is_repeatable() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    for dir in [&first, &second] {
        let layout = AntennaLayout::new(&quick_config()).unwrap();
        let set = layout.element_set("2m").unwrap();
        let parts = layout.housings(set).unwrap();
        export_housings(&parts, dir.path(), "a").unwrap();
    }

    let names = stl_names(first.path());
    assert_eq!(names, vec!["21-a.stl", "2D-a.stl", "2R-a.stl"]);
    for name in names {
        let a = std::fs::read(first.path().join(&name)).unwrap();
        let b = std::fs::read(second.path().join(&name)).unwrap();
        assert_eq!(a, b, "{} differs between runs", name);
    }
}

fn config_with_element_off_the_boom(policy: FailurePolicy) -> Config {
    let mut config = quick_config();
    config.output.failure_policy = policy;
    config.bands[0]
        .elements
        .push(ElementEntry::new(5000.0, 900.0, false, "2X"));
    config
}

#[test]
fn test_halt_policy_reports_failing_label() {
    let layout = AntennaLayout::new(&config_with_element_off_the_boom(FailurePolicy::Halt)).unwrap();
    let set = layout.element_set("2m").unwrap();
    match layout.housings(set) {
        Err(Error::Part { label, source }) => {
            assert_eq!(label, "2X");
            assert!(matches!(source, GeometryError::OutsideBoom { .. }));
        }
        other => panic!("expected a part error, got {:?}", other.map(|p| p.len())),
    }
}

#[test]
fn test_skip_policy_keeps_remaining_parts() {
    let layout = AntennaLayout::new(&config_with_element_off_the_boom(FailurePolicy::Skip)).unwrap();
    let set = layout.element_set("2m").unwrap();
    let parts = layout.housings(set).unwrap();
    let labels: Vec<&str> = parts.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["2R", "2D", "21"]);
}

#[test]
fn test_terminal_band_assembles() {
    let mut config = quick_config();
    config.bands.truncate(1);
    config.bands[0].element_type = "screw_terminal".to_string();
    config.bands[0].elevation = 4.75;
    config.bands[0].elements.truncate(1);

    let layout = AntennaLayout::new(&config).unwrap();
    let scene = layout.assemble().unwrap();
    assert!(scene.entry("rod").is_some());
    assert!(scene.entry("2m housing").is_some());
    assert!(scene.entry("2m terminals").is_some());
    assert_eq!(scene.parts().len(), 1);
}

#[test]
fn test_preview_writes_manifest() {
    let mut config = quick_config();
    config.bands.truncate(1);
    let layout = AntennaLayout::new(&config).unwrap();
    let scene = layout.assemble().unwrap();

    let dir = TempDir::new().unwrap();
    let reports = write_preview(&scene, dir.path()).unwrap();
    assert_eq!(reports.len(), scene.entries().len());

    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("scene.json")).unwrap())
            .unwrap();
    let entries = manifest.as_array().unwrap();
    assert!(entries.iter().any(|e| e["name"] == "rod" && e["file"] == "rod.stl"));
    assert!(entries.iter().any(|e| e["file"] == "2m_housing.stl"));
}
