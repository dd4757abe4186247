//! Thin adapter over the csgrs solid modeling kernel.
//!
//! Boolean operations take explicit operand lists and fold them left to
//! right, so the construction order of every part is reproducible.

use crate::profile::{polygon_area, triangulate, Profile};
use csgrs::mesh::polygon::Polygon;
use csgrs::mesh::vertex::Vertex;
use csgrs::mesh::Mesh;
use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use nalgebra::{Point2, Point3, Vector3};
use yagikit_core::{GeometryError, Placement};

/// 3D solid as produced by the kernel.
pub type Solid = Mesh<()>;

/// 2D region in the XY plane.
pub type Region = Sketch<()>;

/// Region bounded by a closed polygon.
pub fn region(points: &[Point2<f64>]) -> Region {
    let coords: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    Sketch::polygon(&coords, None)
}

/// Region bounded by a tessellated profile.
pub fn profile_region(profile: &Profile, arc_segments: usize) -> Region {
    region(&profile.tessellate(arc_segments))
}

pub fn region_union(a: &Region, b: &Region) -> Region {
    a.union(b)
}

pub fn region_difference(a: &Region, b: &Region) -> Region {
    a.difference(b)
}

/// Font size handed to the outline flattener before rescaling.
const TEXT_REFERENCE_SIZE: f64 = 100.0;

/// Outline of `text` set in the given TrueType font, baseline on Y = 0,
/// scaled so capital letters are `height` tall.
pub fn text_region(text: &str, font: &[u8], height: f64) -> Result<Region, GeometryError> {
    if !(height > 0.0) {
        return Err(GeometryError::dimension("text height", height));
    }
    let reference: Region = Sketch::text("H", font, TEXT_REFERENCE_SIZE, None);
    let (min, max) = region_bounds(&reference);
    let cap_height = max.y - min.y;
    if !(cap_height > 0.0) {
        return Err(GeometryError::degenerate("text outline"));
    }
    let k = height / cap_height;
    Ok(Sketch::text(text, font, TEXT_REFERENCE_SIZE, None).scale(k, k, 1.0))
}

/// Axis-aligned bounds of a region as (min, max) corners.
pub fn region_bounds(region: &Region) -> (Point2<f64>, Point2<f64>) {
    let bb = region.bounding_box();
    (
        Point2::new(bb.mins.x, bb.mins.y),
        Point2::new(bb.maxs.x, bb.maxs.y),
    )
}

/// Extrude a region along +Z from Z = 0 to Z = `height`.
pub fn extrude(region: &Region, height: f64) -> Result<Solid, GeometryError> {
    if !(height > 0.0) {
        return Err(GeometryError::dimension("extrusion height", height));
    }
    ensure_solid(region.extrude(height), "extrude")
}

/// Loft between two polygons with the same number of points, placed at
/// Z = `z0` and Z = `z1`.
///
/// Side quads are split into triangles since the two outlines are not
/// similar in general. Caps are ear-clipped so concave outlines stay
/// valid for the BSP booleans.
pub fn loft(
    bottom: &[Point2<f64>],
    z0: f64,
    top: &[Point2<f64>],
    z1: f64,
) -> Result<Solid, GeometryError> {
    if bottom.len() != top.len() || bottom.len() < 3 {
        return Err(GeometryError::degenerate(format!(
            "loft of {} and {} points",
            bottom.len(),
            top.len()
        )));
    }
    if !(z1 > z0) {
        return Err(GeometryError::dimension("loft height", z1 - z0));
    }
    let (bottom, top): (Vec<Point2<f64>>, Vec<Point2<f64>>) = if polygon_area(bottom) < 0.0 {
        (
            bottom.iter().rev().copied().collect(),
            top.iter().rev().copied().collect(),
        )
    } else {
        (bottom.to_vec(), top.to_vec())
    };

    let n = bottom.len();
    let lift = |p: &Point2<f64>, z: f64| Point3::new(p.x, p.y, z);
    let mut polygons: Vec<Polygon<()>> = Vec::with_capacity(4 * n);

    for [a, b, c] in triangulate(&bottom)? {
        let down = -Vector3::z();
        polygons.push(Polygon::new(
            vec![
                Vertex::new(lift(&bottom[a], z0), down),
                Vertex::new(lift(&bottom[c], z0), down),
                Vertex::new(lift(&bottom[b], z0), down),
            ],
            None,
        ));
    }
    for [a, b, c] in triangulate(&top)? {
        let up = Vector3::z();
        polygons.push(Polygon::new(
            vec![
                Vertex::new(lift(&top[a], z1), up),
                Vertex::new(lift(&top[b], z1), up),
                Vertex::new(lift(&top[c], z1), up),
            ],
            None,
        ));
    }

    for i in 0..n {
        let j = (i + 1) % n;
        let a0 = lift(&bottom[i], z0);
        let a1 = lift(&bottom[j], z0);
        let b0 = lift(&top[i], z1);
        let b1 = lift(&top[j], z1);
        for [p, q, r] in [[a0, a1, b1], [a0, b1, b0]] {
            let normal = (q - p).cross(&(r - p));
            if normal.norm() < 1e-12 {
                continue;
            }
            let normal = normal.normalize();
            polygons.push(Polygon::new(
                vec![
                    Vertex::new(p, normal),
                    Vertex::new(q, normal),
                    Vertex::new(r, normal),
                ],
                None,
            ));
        }
    }

    ensure_solid(Mesh::from_polygons(&polygons, None), "loft")
}

/// Loft between two structurally identical profiles.
pub fn loft_profiles(
    bottom: &Profile,
    z0: f64,
    top: &Profile,
    z1: f64,
    arc_segments: usize,
) -> Result<Solid, GeometryError> {
    let counts = bottom.segment_counts(arc_segments);
    let a = bottom.tessellate_with(&counts)?;
    let b = top.tessellate_with(&counts)?;
    loft(&a, z0, &b, z1)
}

/// Cylinder of `radius` from `start` to `end`.
pub fn cylinder(start: Point3<f64>, end: Point3<f64>, radius: f64, segments: usize) -> Solid {
    frustum(start, end, radius, radius, segments)
}

/// Truncated cone from `start` (radius `r1`) to `end` (radius `r2`).
pub fn frustum(
    start: Point3<f64>,
    end: Point3<f64>,
    r1: f64,
    r2: f64,
    segments: usize,
) -> Solid {
    Mesh::frustum_ptp(start, end, r1, r2, segments, None)
}

/// Union of all operands, folded left to right.
pub fn union(operands: &[Solid]) -> Solid {
    match operands.split_first() {
        Some((first, rest)) => rest.iter().fold(first.clone(), |acc, s| acc.union(s)),
        None => Mesh::new(),
    }
}

/// `base` minus every tool, in order.
pub fn subtract(base: &Solid, tools: &[Solid]) -> Solid {
    tools.iter().fold(base.clone(), |acc, t| acc.difference(t))
}

/// Intersection of all operands, folded left to right.
pub fn intersect(operands: &[Solid]) -> Solid {
    match operands.split_first() {
        Some((first, rest)) => rest.iter().fold(first.clone(), |acc, s| acc.intersection(s)),
        None => Mesh::new(),
    }
}

pub fn place(solid: &Solid, placement: &Placement) -> Solid {
    solid.transform(placement.matrix())
}

/// Gather solids into one without Boolean evaluation.
pub fn compound(parts: &[Solid]) -> Solid {
    let polygons: Vec<Polygon<()>> = parts
        .iter()
        .flat_map(|p| p.polygons.iter().cloned())
        .collect();
    Mesh::from_polygons(&polygons, None)
}

/// Reject an empty kernel result.
pub fn ensure_solid(solid: Solid, operation: &str) -> Result<Solid, GeometryError> {
    if solid.polygons.is_empty() {
        return Err(GeometryError::degenerate(operation));
    }
    Ok(solid)
}

/// Triangles of the solid's boundary.
///
/// BSP polygons are convex, so each one is fanned from its sharpest corner
/// on the exact vertex positions. Vertices lying on a polygon edge are kept,
/// they are what the neighbouring polygons split against.
pub fn triangles(solid: &Solid) -> Vec<[Point3<f64>; 3]> {
    solid
        .polygons
        .iter()
        .flat_map(|p| {
            let points: Vec<Point3<f64>> = p.vertices.iter().map(|v| v.pos).collect();
            fan(&points)
        })
        .collect()
}

fn fan(points: &[Point3<f64>]) -> Vec<[Point3<f64>; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let turn = |k: usize| {
        let prev = points[(k + n - 1) % n];
        let next = points[(k + 1) % n];
        (points[k] - prev).cross(&(next - points[k])).norm()
    };
    let apex = (0..n).fold(0, |best, k| if turn(k) > turn(best) { k } else { best });
    (1..n - 1)
        .map(|i| {
            [
                points[apex],
                points[(apex + i) % n],
                points[(apex + i + 1) % n],
            ]
        })
        .collect()
}

/// Enclosed volume by the divergence theorem.
pub fn volume(solid: &Solid) -> f64 {
    triangles(solid)
        .iter()
        .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)) / 6.0)
        .sum()
}

/// Axis-aligned bounds as (min, max) corners.
pub fn bounds(solid: &Solid) -> (Point3<f64>, Point3<f64>) {
    let bb = solid.bounding_box();
    (bb.mins, bb.maxs)
}
