//! Screw terminal profiles and bodies.
//!
//! In the terminal frame the flat (screw) side points up along +Y, the barrel
//! axis is the origin and the barrel runs along Z.

use crate::kernel::{self, Solid};
use crate::profile::{convex_hull, Edge, Profile};
use crate::tangent::{tangent_angle, tangent_point};
use nalgebra::{Point2, Point3, Vector2};
use yagikit_core::{GeometryError, TerminalSpec};

/// Rotation that turns the flat side from +Y to +X.
pub const TEARDROP_ROTATION: f64 = -90.0;

/// Drillable terminal cross-section: outer contour minus the wire hole.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalFace {
    pub outer: Profile,
    pub hole: Profile,
}

impl TerminalFace {
    pub fn area(&self, arc_segments: usize) -> f64 {
        self.outer.signed_area(arc_segments).abs() - self.hole.signed_area(arc_segments).abs()
    }
}

/// Builds the 2D profiles and the 3D body of one terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalBuilder {
    spec: TerminalSpec,
    arc_segments: usize,
}

impl TerminalBuilder {
    pub fn new(spec: TerminalSpec, arc_segments: usize) -> Self {
        Self { spec, arc_segments }
    }

    pub fn spec(&self) -> &TerminalSpec {
        &self.spec
    }

    /// Outer contour with the flat side up, inflated by `offset`.
    pub fn outer_profile(&self, offset: f64) -> Result<Profile, GeometryError> {
        let t = &self.spec;
        let r2 = t.outer_radius();
        let top = t.flat_height();
        let half_flat = t.flat_width / 2.0;
        if !(top > 0.0) {
            return Err(GeometryError::dimension("terminal height", t.height));
        }
        if !(half_flat > 0.0) {
            return Err(GeometryError::dimension("terminal flat width", t.flat_width));
        }

        let sweep = 180.0 - tangent_angle(r2, top, half_flat)?;
        let arc = Edge::arc(Point2::origin(), r2, -90.0, sweep);
        let corner = Point2::new(half_flat, top);
        let half = vec![
            arc,
            Edge::line(arc.end(), corner),
            Edge::line(corner, Point2::new(0.0, top)),
        ];
        let mut profile = Profile::mirrored_closed("terminal", half)?;

        if t.flat_bevel > 0.0 {
            // Filleting inserts an arc after each corner, so locate the two
            // flat corners by position rather than by index.
            for x in [half_flat, -half_flat] {
                let index = profile
                    .edges()
                    .iter()
                    .position(|e| (e.end() - Point2::new(x, top)).norm() < 1e-9)
                    .ok_or_else(|| GeometryError::degenerate("terminal flat corner"))?;
                profile = profile.fillet(index, t.flat_bevel)?;
            }
        }
        profile.offset("terminal", offset)
    }

    /// Wire hole.
    pub fn hole(&self) -> Result<Profile, GeometryError> {
        Profile::circle("terminal hole", Point2::origin(), self.spec.inner_diameter / 2.0)
    }

    /// Outer contour with the wire hole removed.
    pub fn profile(&self) -> Result<TerminalFace, GeometryError> {
        Ok(TerminalFace {
            outer: self.outer_profile(0.0)?,
            hole: self.hole()?,
        })
    }

    /// Convex teardrop around the terminal, flat side turned to +X.
    ///
    /// The 45° tangent point at the upper left is extended along (-1, -1)
    /// until it meets the vertical through the leftmost point, which gives a
    /// chamfer that prints without support.
    pub fn teardrop_profile(&self, offset: f64) -> Result<Profile, GeometryError> {
        let rotated = self.outer_profile(offset)?.rotated(TEARDROP_ROTATION);
        let edges = rotated.edges();

        let upper = tangent_point(edges, 45.0, Vector2::new(-1.0, 1.0))?
            .ok_or(GeometryError::TangentPointNotFound { angle: 45.0 })?;
        let left = tangent_point(edges, 90.0, Vector2::new(-1.0, 0.0))?
            .ok_or(GeometryError::TangentPointNotFound { angle: 90.0 })?;

        let run = upper.x - left.x;
        let chamfer_end = Point2::new(left.x, upper.y - run);

        let mut points = rotated.tessellate(self.arc_segments);
        points.push(upper);
        points.push(chamfer_end);
        let hull = convex_hull(&points);
        Profile::polygon("terminal teardrop", &hull)
    }

    /// Terminal solid centered along Z, optionally drilled for the two
    /// screws and the center hole.
    pub fn body(&self, drill_screw_holes: bool) -> Result<Solid, GeometryError> {
        let t = &self.spec;
        t.validate()?;
        let face = self.profile()?;
        let region = kernel::region_difference(
            &kernel::profile_region(&face.outer, self.arc_segments),
            &kernel::profile_region(&face.hole, self.arc_segments),
        );
        let barrel = kernel::extrude(&region, t.length)?;
        let barrel = kernel::place(
            &barrel,
            &yagikit_core::Placement::translation(0.0, 0.0, -t.length / 2.0),
        );
        if !drill_screw_holes {
            return Ok(barrel);
        }

        let screw_r = t.screw_diameter / 2.0;
        let screw = |z: f64| {
            kernel::cylinder(
                Point3::new(0.0, 0.0, z),
                Point3::new(0.0, t.height, z),
                screw_r,
                self.arc_segments,
            )
        };
        let center_hole = kernel::cylinder(
            Point3::new(0.0, -t.height, 0.0),
            Point3::new(0.0, t.height, 0.0),
            t.center_hole_diameter / 2.0,
            self.arc_segments,
        );
        let drilled = kernel::subtract(
            &barrel,
            &[
                screw(-t.screw_offset_from_center),
                screw(t.screw_offset_from_center),
                center_hole,
            ],
        );
        kernel::ensure_solid(drilled, "terminal body")
    }
}
