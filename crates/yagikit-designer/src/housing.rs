//! Element housings and the holders built from them.
//!
//! Housing frame: the boom axis is Z, the element runs along X and +Y points
//! away from the boom. The along-boom cross-section is drawn in (u, v)
//! coordinates, where u maps to Z and v maps to Y.

use crate::font_manager;
use crate::kernel::{self, Region, Solid};
use crate::profile::{direction, Edge, Profile};
use crate::sleeve::{check_angle, check_positive, make_c_sleeve_slice};
use crate::tangent::tangent_angle;
use crate::terminal::{TerminalBuilder, TEARDROP_ROTATION};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use yagikit_core::{GeometryError, Label, Placement, TerminalSpec};

/// Radial overlap of the housing into the sleeve wall.
pub const ARC_OVERLAP: f64 = 0.5;

/// Extension of trimming solids past the faces they trim.
const OVERSHOOT: f64 = 1.0;

/// Label offset from the housing center, as a fraction of the width.
const LABEL_OFFSET: f64 = 0.3;

/// Gap between the housing top and the top edge of the label text.
const LABEL_TOP_MARGIN: f64 = 1.0;

/// Sleeve that clamps a holder to the boom.
#[derive(Debug, Clone, PartialEq)]
pub struct SleeveParams {
    /// Inner radius at the holder center
    pub base_radius: f64,
    pub thickness: f64,
    pub length: f64,
    /// Angular coverage in degrees, strictly between 180 and 360
    pub angle: f64,
    /// Boom taper in degrees, negative when the boom narrows toward +Z
    pub taper_angle: f64,
}

impl SleeveParams {
    /// Outer sleeve radius at `z` along the boom.
    pub fn outer_radius_at(&self, z: f64) -> f64 {
        self.base_radius + self.thickness + z * self.taper_angle.to_radians().tan()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        check_angle(self.angle)?;
        check_positive("sleeve base radius", self.base_radius)?;
        check_positive("sleeve thickness", self.thickness)?;
        check_positive("sleeve length", self.length)
    }
}

/// Everything needed to build one holder body.
#[derive(Debug, Clone)]
pub struct HousingParams {
    pub sleeve: SleeveParams,
    /// Extent along the element (X)
    pub width: f64,
    /// Extent along the boom (Z)
    pub depth: f64,
    /// Top and bottom of the housing measured from the boom axis
    pub top: f64,
    pub bottom: f64,
    /// Depth of the V notch cut into the top face
    pub dent_depth: f64,
    /// Additional along-boom cross-section in (u, v) merged into the drop
    pub extra_profile: Option<Profile>,
    pub label: Option<Label>,
}

impl HousingParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.sleeve.validate()?;
        check_positive("housing width", self.width)?;
        check_positive("housing depth", self.depth)?;
        if !(self.top > self.bottom) {
            return Err(GeometryError::dimension("housing top", self.top));
        }
        if !(self.dent_depth >= 0.0) {
            return Err(GeometryError::dimension("dent depth", self.dent_depth));
        }
        Ok(())
    }
}

/// Seat of a round wire element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireMount {
    pub element_diameter: f64,
    /// Element axis height above the boom axis
    pub axis_height: f64,
    pub wall: f64,
    pub top_extra: f64,
}

/// Seat of a pair of screw terminals on either side of the boom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalMount {
    /// Terminal barrel axis height above the boom axis
    pub axis_height: f64,
    pub wall: f64,
    pub top_extra: f64,
    /// Print clearance around the terminal
    pub gap: f64,
    /// Free space between the two terminals
    pub spacing: f64,
    /// Housing material beyond the outer terminal ends
    pub extra_width: f64,
}

impl TerminalMount {
    pub fn housing_width(&self, terminal: &TerminalSpec) -> f64 {
        2.0 * (terminal.length + self.extra_width) + self.spacing
    }

    /// X positions of the two terminal centers.
    pub fn terminal_centers(&self, terminal: &TerminalSpec) -> [f64; 2] {
        let x = (self.spacing + terminal.length) / 2.0;
        [-x, x]
    }

    /// Along-boom shift that centers the terminal cross-section on the
    /// housing.
    pub fn barrel_shift(terminal: &TerminalSpec) -> f64 {
        -(terminal.height / 2.0 - terminal.outer_radius())
    }

    /// Placements taking terminal bodies from their own frame into the
    /// housing frame, flat side facing +Z.
    pub fn terminal_placements(&self, terminal: &TerminalSpec) -> Vec<Placement> {
        let shift = Self::barrel_shift(terminal);
        self.terminal_centers(terminal)
            .iter()
            .map(|&x| {
                Placement::rotation_z(TEARDROP_ROTATION)
                    .then(Placement::rotation_y(-90.0))
                    .then(Placement::translation(x, self.axis_height, shift))
            })
            .collect()
    }

    /// Screw shafts as (start, end) pairs. Each shaft starts on a barrel
    /// axis and runs along that terminal's flat-side normal out to `face`
    /// on Z, so it crosses the element axis at a right angle.
    pub fn screw_axes(&self, terminal: &TerminalSpec, face: f64) -> Vec<(Point3<f64>, Point3<f64>)> {
        let offset = terminal.screw_offset_from_center;
        let mut axes = Vec::with_capacity(4);
        for placement in self.terminal_placements(terminal) {
            let normal = placement.apply_vector(Vector3::y());
            for z in [-offset, offset] {
                let start = placement.apply_point(Point3::new(0.0, 0.0, z));
                let reach = (face - start.z) / normal.z;
                axes.push((start, start + normal * reach));
            }
        }
        axes
    }
}

/// Across-boom cross-section of a housing (XY plane).
///
/// A rectangle of `width` between `bottom` and `top` with a V notch of
/// `dent_depth` in the top face. Its lower sides run tangent to the sleeve
/// of outer radius `base_radius`, and its seat overlaps the sleeve by
/// [`ARC_OVERLAP`].
pub fn profile_xy(
    width: f64,
    top: f64,
    bottom: f64,
    dent_depth: f64,
    base_radius: f64,
) -> Result<Profile, GeometryError> {
    let hx = width / 2.0;
    let seat = base_radius - ARC_OVERLAP;
    check_positive("housing width", width)?;
    check_positive("housing seat radius", seat)?;
    if !(top > bottom) {
        return Err(GeometryError::dimension("housing top", top));
    }
    if !(dent_depth >= 0.0 && dent_depth < hx) {
        return Err(GeometryError::dimension("dent depth", dent_depth));
    }
    if top - dent_depth <= seat {
        return Err(GeometryError::dimension("dent depth", dent_depth));
    }

    let alpha = tangent_angle(base_radius, hx, -bottom)?;
    let seat_arc = Edge::arc(Point2::origin(), seat, 90.0, -(90.0 + alpha));
    let touch = Point2::origin() + direction(-alpha) * base_radius;
    let low = Point2::new(hx, bottom);
    let high = Point2::new(hx, top);
    let dent = Point2::new(dent_depth, top);
    let notch = Point2::new(0.0, top - dent_depth);

    Profile::mirrored_closed(
        "housing xy",
        vec![
            seat_arc,
            Edge::line(seat_arc.end(), touch),
            Edge::line(touch, low),
            Edge::line(low, high),
            Edge::line(high, dent),
            Edge::line(dent, notch),
        ],
    )
}

/// Drop-shaped along-boom outline in (u, v).
///
/// The top is a half circle of diameter `depth` touching `top`, closed on
/// the -u side by a 45° chamfer. The outline reaches past both housing
/// faces and below the boom so the intersection that uses it never meets
/// coplanar faces.
pub fn drop_outline(depth: f64, top: f64, base_radius: f64) -> Result<Profile, GeometryError> {
    check_positive("housing depth", depth)?;
    let half = depth / 2.0;
    let center = Point2::new(0.0, top - half);
    let floor = -base_radius - OVERSHOOT;
    let left = -half - OVERSHOOT;
    let right = half + OVERSHOOT;

    let shoulder = center + direction(135.0) * half;
    let chamfer_end = Point2::new(left, shoulder.y - (shoulder.x - left));
    if !(chamfer_end.y > floor) {
        return Err(GeometryError::dimension("housing top", top));
    }

    Profile::new(
        "housing yz",
        vec![
            Edge::line(Point2::new(right, floor), Point2::new(right, center.y)),
            Edge::line(Point2::new(right, center.y), Point2::new(half, center.y)),
            Edge::arc(center, half, 0.0, 135.0),
            Edge::line(shoulder, chamfer_end),
            Edge::line(chamfer_end, Point2::new(left, floor)),
            Edge::line(Point2::new(left, floor), Point2::new(right, floor)),
        ],
    )
}

/// Along-boom cross-section of a housing (YZ plane) as a region in (u, v),
/// merged with `extra` when given.
pub fn profile_yz(
    depth: f64,
    top: f64,
    base_radius: f64,
    extra: Option<&Profile>,
    arc_segments: usize,
) -> Result<Region, GeometryError> {
    let outline = kernel::profile_region(&drop_outline(depth, top, base_radius)?, arc_segments);
    Ok(match extra {
        Some(extra) => kernel::region_union(&outline, &kernel::profile_region(extra, arc_segments)),
        None => outline,
    })
}

/// Builds housings and complete holders.
#[derive(Debug, Clone, Copy)]
pub struct HousingBuilder {
    arc_segments: usize,
}

impl HousingBuilder {
    pub fn new(arc_segments: usize) -> Self {
        Self { arc_segments }
    }

    /// Housing block without the sleeve: the across-boom section lofted
    /// along the boom taper, trimmed by the along-boom drop.
    pub fn element_housing(&self, params: &HousingParams) -> Result<Solid, GeometryError> {
        params.validate()?;
        let half = params.depth / 2.0;
        let r_start = params.sleeve.outer_radius_at(-half);
        let r_end = params.sleeve.outer_radius_at(half);

        let xy = |r: f64| profile_xy(params.width, params.top, params.bottom, params.dent_depth, r);
        let block = kernel::loft_profiles(&xy(r_start)?, -half, &xy(r_end)?, half, self.arc_segments)?;

        let yz = profile_yz(
            params.depth,
            params.top,
            r_start.max(r_end),
            params.extra_profile.as_ref(),
            self.arc_segments,
        )?;
        let drop = self.across_width(&yz, params.width)?;
        kernel::ensure_solid(kernel::intersect(&[block, drop]), "element housing")
    }

    /// Sleeve plus housing, with the label engraved into both faces.
    pub fn holder_body(&self, params: &HousingParams) -> Result<Solid, GeometryError> {
        params.validate()?;
        let s = &params.sleeve;
        let sleeve = make_c_sleeve_slice(
            s.base_radius,
            s.thickness,
            s.length / 2.0,
            s.length / 2.0,
            s.angle,
            s.taper_angle,
            self.arc_segments,
        )?;
        let housing = self.element_housing(params)?;
        let mut body = kernel::union(&[sleeve.clone(), housing]);
        if let Some(label) = &params.label {
            let reliefs = self.label_reliefs(params, label, &sleeve)?;
            body = kernel::subtract(&body, &reliefs);
        }
        kernel::ensure_solid(body, "holder body")
    }

    /// Holder for a round wire element passing straight through along X.
    pub fn holder_for_wire(
        &self,
        sleeve: &SleeveParams,
        width: f64,
        mount: &WireMount,
        label: Option<Label>,
    ) -> Result<Solid, GeometryError> {
        check_positive("element diameter", mount.element_diameter)?;
        let reach = mount.element_diameter / 2.0 + mount.wall;
        let top = mount.axis_height + reach + mount.top_extra;
        let bottom = mount.axis_height - reach;
        let params = HousingParams {
            sleeve: sleeve.clone(),
            width,
            depth: 2.0 * reach,
            top,
            bottom,
            dent_depth: 0.75 * (top - bottom),
            extra_profile: None,
            label,
        };
        let body = self.holder_body(&params)?;

        let end = width / 2.0 + OVERSHOOT;
        let channel = kernel::cylinder(
            Point3::new(-end, mount.axis_height, 0.0),
            Point3::new(end, mount.axis_height, 0.0),
            mount.element_diameter / 2.0,
            self.arc_segments,
        );
        kernel::ensure_solid(kernel::subtract(&body, &[channel]), "wire holder")
    }

    /// Holder for two screw terminals in line along X, flat sides facing
    /// +Z, with screw access holes along the flat-side normals through the
    /// +Z face.
    pub fn holder_for_choco_terminal(
        &self,
        sleeve: &SleeveParams,
        terminal: &TerminalSpec,
        mount: &TerminalMount,
        label: Option<Label>,
    ) -> Result<Solid, GeometryError> {
        terminal.validate()?;
        let builder = TerminalBuilder::new(*terminal, self.arc_segments);
        let shift = TerminalMount::barrel_shift(terminal);
        let axis = mount.axis_height;
        let to_housing = Vector2::new(shift, axis);
        let width = mount.housing_width(terminal);
        let depth = terminal.height + 2.0 * mount.wall;
        let reach = terminal.outer_radius() + mount.wall;

        let params = HousingParams {
            sleeve: sleeve.clone(),
            width,
            depth,
            top: axis + reach + mount.top_extra,
            bottom: axis - reach,
            dent_depth: mount.spacing / 2.0,
            extra_profile: Some(builder.teardrop_profile(mount.wall)?.translated(to_housing)),
            label,
        };
        let body = self.holder_body(&params)?;

        let pocket = builder.teardrop_profile(mount.gap)?.translated(to_housing);
        let mut tools = vec![self.across_width(
            &kernel::profile_region(&pocket, self.arc_segments),
            width,
        )?];
        for (start, end) in mount.screw_axes(terminal, depth / 2.0 + OVERSHOOT) {
            tools.push(kernel::cylinder(
                start,
                end,
                terminal.screw_diameter / 2.0,
                self.arc_segments,
            ));
        }
        kernel::ensure_solid(kernel::subtract(&body, &tools), "terminal holder")
    }

    /// Extrude a (u, v) region across the full housing width along X.
    fn across_width(&self, region: &Region, width: f64) -> Result<Solid, GeometryError> {
        let span = width + 2.0 * OVERSHOOT;
        let slab = kernel::extrude(region, span)?;
        Ok(kernel::place(
            &slab,
            &Placement::rotation_y(-90.0).then(Placement::translation(span / 2.0, 0.0, 0.0)),
        ))
    }

    /// Text reliefs for both housing faces. The first text reads from -Z,
    /// the second from +Z. Each text hangs from just below the housing top;
    /// the part of it inside `sleeve` is dropped.
    fn label_reliefs(
        &self,
        params: &HousingParams,
        label: &Label,
        sleeve: &Solid,
    ) -> Result<Vec<Solid>, GeometryError> {
        let font = font_manager::font_data(&label.font);
        let half = params.depth / 2.0;
        let v_mid = params.top - LABEL_TOP_MARGIN - label.size / 2.0;
        let x = LABEL_OFFSET * params.width;
        let faces = [
            (
                &label.texts[0],
                Placement::rotation_y(180.0).then(Placement::translation(-x, v_mid, -half)),
            ),
            (&label.texts[1], Placement::translation(x, v_mid, half)),
        ];

        let mut reliefs = Vec::with_capacity(2);
        for (text, face) in faces {
            if text.trim().is_empty() {
                continue;
            }
            let glyphs = kernel::text_region(text, font, label.size)?;
            let (min, max) = kernel::region_bounds(&glyphs);
            let relief = kernel::extrude(&glyphs, 2.0 * label.depth)?;
            let centered = Placement::translation(
                -(min.x + max.x) / 2.0,
                -(min.y + max.y) / 2.0,
                -label.depth,
            );
            let placed = kernel::place(&relief, &centered.then(face));
            reliefs.push(kernel::subtract(&placed, std::slice::from_ref(sleeve)));
        }
        Ok(reliefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::polygon_area;

    fn sleeve() -> SleeveParams {
        SleeveParams {
            base_radius: 9.9,
            thickness: 1.6,
            length: 18.0,
            angle: 270.0,
            taper_angle: -0.0887,
        }
    }

    #[test]
    fn test_profile_xy_is_counter_clockwise_and_symmetric() {
        let p = profile_xy(24.5, 15.0, 9.8, 3.5, 11.5).unwrap();
        let pts = p.tessellate(64);
        assert!(polygon_area(&pts) > 0.0);
        let max_x = pts.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_x = pts.iter().map(|p| p.x).fold(f64::MAX, f64::min);
        assert!((max_x - 12.25).abs() < 1e-9);
        assert!((min_x + 12.25).abs() < 1e-9);
        let max_y = pts.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((max_y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_xy_seat_overlaps_sleeve() {
        let p = profile_xy(24.5, 15.0, 9.8, 3.5, 11.5).unwrap();
        let seat_top = p
            .tessellate(64)
            .iter()
            .filter(|q| q.x.abs() < 1e-9)
            .map(|q| q.y)
            .fold(f64::MAX, f64::min);
        assert!((seat_top - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_profile_xy_rejects_deep_dent() {
        assert!(profile_xy(24.5, 15.0, 9.8, 4.5, 11.5).is_err());
        assert!(profile_xy(24.5, 9.0, 9.8, 0.0, 11.5).is_err());
    }

    #[test]
    fn test_drop_outline_reaches_top() {
        let outline = drop_outline(5.0, 15.0, 11.5).unwrap();
        let pts = outline.tessellate(256);
        let max_v = pts.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((max_v - 15.0).abs() < 1e-3);
        assert!(polygon_area(&pts) > 0.0);
    }

    #[test]
    fn test_terminal_mount_layout() {
        let t = TerminalSpec::terminal_10mm2();
        let mount = TerminalMount {
            axis_height: 16.0,
            wall: 0.8,
            top_extra: 0.4,
            gap: 0.15,
            spacing: 6.0,
            extra_width: 1.0,
        };
        assert!((mount.housing_width(&t) - 32.0).abs() < 1e-9);
        assert_eq!(mount.terminal_centers(&t), [-9.0, 9.0]);
        let shift = TerminalMount::barrel_shift(&t);
        assert!((shift + 0.75).abs() < 1e-9);

        // The flat side of each terminal ends up facing +Z.
        for placement in mount.terminal_placements(&t) {
            let normal = placement.apply_vector(nalgebra::Vector3::y());
            assert!((normal - nalgebra::Vector3::z()).norm() < 1e-9);
            let barrel = placement.apply_vector(nalgebra::Vector3::z());
            assert!(barrel.x.abs() > 1.0 - 1e-9);
        }
    }

    #[test]
    fn test_screw_axes_follow_flat_normal() {
        let t = TerminalSpec::terminal_10mm2();
        let mount = TerminalMount {
            axis_height: 16.0,
            wall: 0.8,
            top_extra: 0.4,
            gap: 0.15,
            spacing: 6.0,
            extra_width: 1.0,
        };
        let face = 4.5;
        let axes = mount.screw_axes(&t, face);
        assert_eq!(axes.len(), 4);

        let mut xs: Vec<f64> = axes.iter().map(|(start, _)| start.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (x, expected) in xs.iter().zip([-13.0, -5.0, 5.0, 13.0]) {
            assert!((x - expected).abs() < 1e-9, "screw at {}", x);
        }

        let shift = TerminalMount::barrel_shift(&t);
        for (start, end) in axes {
            assert!((start.y - 16.0).abs() < 1e-9);
            assert!((start.z - shift).abs() < 1e-9);
            assert!((end.z - face).abs() < 1e-9);
            // Square to the element, parallel to the boom.
            let dir = (end - start).normalize();
            assert!(dir.dot(&Vector3::x()).abs() < 1e-9);
            assert!((dir - Vector3::z()).norm() < 1e-9);
        }
    }

    #[test]
    fn test_element_housing_stays_inside_width_and_depth() {
        let params = HousingParams {
            sleeve: sleeve(),
            width: 24.5,
            depth: 5.0,
            top: 15.3,
            bottom: 9.9,
            dent_depth: 4.0,
            extra_profile: None,
            label: None,
        };
        let housing = HousingBuilder::new(32).element_housing(&params).unwrap();
        let (min, max) = kernel::bounds(&housing);
        assert!(min.x >= -12.25 - 1e-6 && max.x <= 12.25 + 1e-6);
        assert!(min.z >= -2.5 - 1e-6 && max.z <= 2.5 + 1e-6);
        assert!(max.y <= 15.3 + 1e-6);
        assert!(kernel::volume(&housing) > 0.0);
    }

    #[test]
    fn test_labels_hang_from_housing_top() {
        let params = HousingParams {
            sleeve: sleeve(),
            width: 24.5,
            depth: 5.0,
            top: 15.3,
            bottom: 9.9,
            dent_depth: 3.5,
            extra_profile: None,
            label: None,
        };
        let label = Label::from_code("7T", "No Such Font Family 42", 6.0, 0.28);
        let s = &params.sleeve;
        let sleeve = make_c_sleeve_slice(
            s.base_radius,
            s.thickness,
            s.length / 2.0,
            s.length / 2.0,
            s.angle,
            s.taper_angle,
            32,
        )
        .unwrap();
        let builder = HousingBuilder::new(32);
        let reliefs = builder.label_reliefs(&params, &label, &sleeve).unwrap();
        assert_eq!(reliefs.len(), 2);

        let text_top = 15.3 - LABEL_TOP_MARGIN;
        for (relief, side) in reliefs.iter().zip([-1.0, 1.0]) {
            let (min, max) = kernel::bounds(relief);
            assert!((max.y - text_top).abs() < 0.15, "text top at {}", max.y);
            assert!(max.y <= 15.3);
            assert!(((min.x + max.x) / 2.0 - side * 7.35).abs() < 1e-6);
            assert!((min.z - (side * 2.5 - 0.28)).abs() < 1e-6);
            assert!((max.z - (side * 2.5 + 0.28)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_holder_rejects_narrow_sleeve() {
        let params = HousingParams {
            sleeve: SleeveParams {
                angle: 170.0,
                ..sleeve()
            },
            width: 24.5,
            depth: 5.0,
            top: 15.3,
            bottom: 9.9,
            dent_depth: 4.0,
            extra_profile: None,
            label: None,
        };
        assert!(matches!(
            HousingBuilder::new(32).holder_body(&params),
            Err(GeometryError::SleeveAngle { .. })
        ));
    }
}
