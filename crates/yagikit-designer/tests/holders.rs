//! Integration tests for the holder builders

use yagikit_core::{GeometryError, Label, TerminalSpec};
use yagikit_designer::kernel;
use yagikit_designer::{HousingBuilder, HousingParams, SleeveParams, TerminalMount, WireMount};

const BOOM_RADIUS: f64 = 9.75;

fn sleeve() -> SleeveParams {
    SleeveParams {
        base_radius: BOOM_RADIUS + 0.15,
        thickness: 1.6,
        length: 18.0,
        angle: 270.0,
        taper_angle: -0.0887,
    }
}

fn wire_mount() -> WireMount {
    WireMount {
        element_diameter: 3.175,
        axis_height: BOOM_RADIUS + 2.5375,
        wall: 0.9,
        top_extra: 0.4,
    }
}

fn terminal_mount() -> TerminalMount {
    TerminalMount {
        axis_height: 14.5,
        wall: 0.8,
        top_extra: 0.4,
        gap: 0.15,
        spacing: 6.0,
        extra_width: 1.0,
    }
}

#[test]
fn test_wire_holder_is_bounded_by_sleeve_and_housing() {
    let holder = HousingBuilder::new(32)
        .holder_for_wire(&sleeve(), 24.5, &wire_mount(), None)
        .unwrap();
    assert!(kernel::volume(&holder) > 0.0);

    let (min, max) = kernel::bounds(&holder);
    assert!(min.x >= -12.25 - 1e-6);
    assert!(max.x <= 12.25 + 1e-6);
    assert!(min.z >= -9.0 - 1e-6);
    assert!(max.z <= 9.0 + 1e-6);
    // Housing top: axis height + half the element + wall + extra.
    assert!(max.y <= BOOM_RADIUS + 2.5375 + 1.5875 + 0.9 + 0.4 + 1e-6);
}

#[test]
fn test_wire_channel_removes_material() {
    let builder = HousingBuilder::new(32);
    let mount = wire_mount();
    let reach = mount.element_diameter / 2.0 + mount.wall;
    let top = mount.axis_height + reach + mount.top_extra;
    let bottom = mount.axis_height - reach;
    let body = builder
        .holder_body(&HousingParams {
            sleeve: sleeve(),
            width: 24.5,
            depth: 2.0 * reach,
            top,
            bottom,
            dent_depth: 0.75 * (top - bottom),
            extra_profile: None,
            label: None,
        })
        .unwrap();
    let drilled = builder
        .holder_for_wire(&sleeve(), 24.5, &mount, None)
        .unwrap();
    assert!(kernel::volume(&drilled) < kernel::volume(&body));
}

#[test]
fn test_label_is_engraved() {
    // An unknown family falls back to the bundled font.
    let label = Label::from_code("2D", "No Such Font Family 42", 6.0, 0.28);
    let builder = HousingBuilder::new(32);
    let plain = builder
        .holder_for_wire(&sleeve(), 24.5, &wire_mount(), None)
        .unwrap();
    let labelled = builder
        .holder_for_wire(&sleeve(), 24.5, &wire_mount(), Some(label))
        .unwrap();
    assert!(kernel::volume(&labelled) > 0.0);
    assert!(kernel::volume(&labelled) < kernel::volume(&plain));
}

#[test]
fn test_terminal_holder_builds() {
    let terminal = TerminalSpec::terminal_10mm2();
    let mount = terminal_mount();
    let holder = HousingBuilder::new(32)
        .holder_for_choco_terminal(&sleeve(), &terminal, &mount, None)
        .unwrap();
    assert!(kernel::volume(&holder) > 0.0);

    let half_width = mount.housing_width(&terminal) / 2.0;
    let (min, max) = kernel::bounds(&holder);
    assert!(min.x >= -half_width - 1e-6);
    assert!(max.x <= half_width + 1e-6);
    assert!(min.z >= -9.0 - 1e-6);
    assert!(max.z <= 9.0 + 1e-6);
}

#[test]
fn test_invalid_sleeve_angle_is_rejected() {
    let narrow = SleeveParams {
        angle: 180.0,
        ..sleeve()
    };
    let err = HousingBuilder::new(32)
        .holder_for_wire(&narrow, 24.5, &wire_mount(), None)
        .unwrap_err();
    assert_eq!(err, GeometryError::SleeveAngle { angle: 180.0 });
}
