//! Tapered C-shaped sleeves that clamp the boom.
//!
//! The sleeve axis is Z. The slot is centered on +Y and opens toward -Y.

use crate::kernel::{self, Solid};
use crate::profile::{direction, Edge, Profile};
use nalgebra::Point2;
use yagikit_core::{GeometryError, Placement};

pub(crate) fn check_angle(angle: f64) -> Result<(), GeometryError> {
    if angle > 180.0 && angle < 360.0 {
        Ok(())
    } else {
        Err(GeometryError::SleeveAngle { angle })
    }
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), GeometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::dimension(name, value))
    }
}

/// C-shaped slot between radius `r` and `r + thickness` spanning `angle`
/// degrees, with both open ends rounded by `thickness / 2`.
pub fn c_slot_profile(r: f64, thickness: f64, angle: f64) -> Result<Profile, GeometryError> {
    check_angle(angle)?;
    check_positive("sleeve radius", r)?;
    check_positive("sleeve thickness", thickness)?;

    let cap = thickness / 2.0;
    let mid = r + cap;
    // Pull the cap centers in so the rounded ends stay inside `angle`.
    let pull = (cap / mid).asin().to_degrees();
    let start = 90.0 - angle / 2.0 + pull;
    let end = 90.0 + angle / 2.0 - pull;
    let span = end - start;
    let origin = Point2::origin();

    Profile::new(
        "sleeve slot",
        vec![
            Edge::arc(origin, r + thickness, start, span),
            Edge::arc(origin + direction(end) * mid, cap, end, 180.0),
            Edge::arc(origin, r, end, -span),
            Edge::arc(origin + direction(start) * mid, cap, start + 180.0, 180.0),
        ],
    )
}

/// Sleeve with inner radius `r1` at Z = 0 and `r2` at Z = `length`.
pub fn make_c_sleeve(
    r1: f64,
    r2: f64,
    length: f64,
    thickness: f64,
    angle: f64,
    arc_segments: usize,
) -> Result<Solid, GeometryError> {
    check_positive("sleeve length", length)?;
    let bottom = c_slot_profile(r1, thickness, angle)?;
    let top = c_slot_profile(r2, thickness, angle)?;
    kernel::loft_profiles(&bottom, 0.0, &top, length, arc_segments)
}

/// Sleeve around the boom spanning `-length_neg..length_pos` along Z, with
/// inner radius `base_radius` at Z = 0 following the boom taper.
pub fn make_c_sleeve_slice(
    base_radius: f64,
    thickness: f64,
    length_pos: f64,
    length_neg: f64,
    sleeve_angle: f64,
    taper_angle: f64,
    arc_segments: usize,
) -> Result<Solid, GeometryError> {
    check_positive("sleeve base radius", base_radius)?;
    check_positive("sleeve forward length", length_pos)?;
    check_positive("sleeve backward length", length_neg)?;
    check_angle(sleeve_angle)?;

    let slope = taper_angle.to_radians().tan();
    let r1 = base_radius - length_neg * slope;
    let r2 = base_radius + length_pos * slope;
    let sleeve = make_c_sleeve(
        r1,
        r2,
        length_pos + length_neg,
        thickness,
        sleeve_angle,
        arc_segments,
    )?;
    Ok(kernel::place(
        &sleeve,
        &Placement::translation(0.0, 0.0, -length_neg),
    ))
}
