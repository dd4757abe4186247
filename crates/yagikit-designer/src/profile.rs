//! Closed 2D contours made of line and arc edges.
//!
//! Profiles are built in millimeters with angles in degrees. A valid
//! [`Profile`] is a closed chain: the end of every edge coincides with the
//! start of the next one and the last edge returns to the first.

use nalgebra::{Point2, Vector2};
use yagikit_core::GeometryError;

/// Tolerance for coincident points and zero-length edges.
pub const EPS: f64 = 1e-6;

/// Tolerance for angle comparisons, in degrees.
pub const ANGLE_EPS: f64 = 1e-7;

/// Unit vector at `degrees` from +X.
pub fn direction(degrees: f64) -> Vector2<f64> {
    let rad = degrees.to_radians();
    Vector2::new(rad.cos(), rad.sin())
}

/// Normalize an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a >= 360.0 - ANGLE_EPS {
        0.0
    } else {
        a
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Line {
        start: Point2<f64>,
        end: Point2<f64>,
    },
    /// Circular arc starting at `start_angle`; positive `sweep` runs
    /// counter-clockwise.
    Arc {
        center: Point2<f64>,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
}

impl Edge {
    pub fn line(start: Point2<f64>, end: Point2<f64>) -> Self {
        Edge::Line { start, end }
    }

    pub fn arc(center: Point2<f64>, radius: f64, start_angle: f64, sweep: f64) -> Self {
        Edge::Arc {
            center,
            radius,
            start_angle,
            sweep,
        }
    }

    pub fn start(&self) -> Point2<f64> {
        match *self {
            Edge::Line { start, .. } => start,
            Edge::Arc {
                center,
                radius,
                start_angle,
                ..
            } => center + direction(start_angle) * radius,
        }
    }

    pub fn end(&self) -> Point2<f64> {
        match *self {
            Edge::Line { end, .. } => end,
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => center + direction(start_angle + sweep) * radius,
        }
    }

    pub fn length(&self) -> f64 {
        match *self {
            Edge::Line { start, end } => (end - start).norm(),
            Edge::Arc { radius, sweep, .. } => radius * sweep.abs().to_radians(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < EPS
    }

    /// Unit direction of travel at the start of the edge.
    pub fn start_tangent(&self) -> Vector2<f64> {
        match *self {
            Edge::Line { start, end } => (end - start).normalize(),
            Edge::Arc {
                start_angle, sweep, ..
            } => direction(start_angle + 90.0_f64.copysign(sweep)),
        }
    }

    /// Unit direction of travel at the end of the edge.
    pub fn end_tangent(&self) -> Vector2<f64> {
        match *self {
            Edge::Line { start, end } => (end - start).normalize(),
            Edge::Arc {
                start_angle, sweep, ..
            } => direction(start_angle + sweep + 90.0_f64.copysign(sweep)),
        }
    }

    /// The same edge traversed backwards.
    pub fn reversed(&self) -> Self {
        match *self {
            Edge::Line { start, end } => Edge::line(end, start),
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Edge::arc(center, radius, start_angle + sweep, -sweep),
        }
    }

    /// Mirror image about the Y axis (x becomes -x). Direction of travel is kept.
    pub fn mirrored_x(&self) -> Self {
        let flip = |p: Point2<f64>| Point2::new(-p.x, p.y);
        match *self {
            Edge::Line { start, end } => Edge::line(flip(start), flip(end)),
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Edge::arc(flip(center), radius, 180.0 - start_angle, -sweep),
        }
    }

    /// Rotate about the origin by `degrees`.
    pub fn rotated(&self, degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        let rot = |p: Point2<f64>| Point2::new(c * p.x - s * p.y, s * p.x + c * p.y);
        match *self {
            Edge::Line { start, end } => Edge::line(rot(start), rot(end)),
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Edge::arc(rot(center), radius, start_angle + degrees, sweep),
        }
    }

    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        match *self {
            Edge::Line { start, end } => Edge::line(start + offset, end + offset),
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => Edge::arc(center + offset, radius, start_angle, sweep),
        }
    }

    /// Offset to the right of the direction of travel, which is outward for
    /// a counter-clockwise contour.
    pub fn offset(&self, distance: f64) -> Self {
        match *self {
            Edge::Line { start, end } => {
                let d = (end - start).normalize();
                let normal = Vector2::new(d.y, -d.x) * distance;
                Edge::line(start + normal, end + normal)
            }
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let radius = if sweep > 0.0 {
                    radius + distance
                } else {
                    radius - distance
                };
                Edge::arc(center, radius, start_angle, sweep)
            }
        }
    }

    /// Points along the edge, starting at `start()` and excluding `end()`.
    pub fn tessellate(&self, segments: usize) -> Vec<Point2<f64>> {
        match *self {
            Edge::Line { start, .. } => vec![start],
            Edge::Arc {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let n = segments.max(1);
                (0..n)
                    .map(|i| {
                        let a = start_angle + sweep * i as f64 / n as f64;
                        center + direction(a) * radius
                    })
                    .collect()
            }
        }
    }
}

/// A closed chain of edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    edges: Vec<Edge>,
}

impl Profile {
    /// Build a profile, dropping zero-length edges and checking closure.
    pub fn new(name: &str, edges: Vec<Edge>) -> Result<Self, GeometryError> {
        let edges: Vec<Edge> = edges.into_iter().filter(|e| !e.is_degenerate()).collect();
        if edges.is_empty() {
            return Err(GeometryError::EmptyProfile {
                name: name.to_string(),
            });
        }
        for (i, edge) in edges.iter().enumerate() {
            let next = &edges[(i + 1) % edges.len()];
            if (edge.end() - next.start()).norm() > 1e-4 {
                return Err(GeometryError::degenerate(format!(
                    "{} profile: edge {} is not connected",
                    name, i
                )));
            }
        }
        Ok(Self { edges })
    }

    /// Closed polygon through `points`.
    pub fn polygon(name: &str, points: &[Point2<f64>]) -> Result<Self, GeometryError> {
        let edges = (0..points.len())
            .map(|i| Edge::line(points[i], points[(i + 1) % points.len()]))
            .collect();
        Self::new(name, edges)
    }

    /// Full circle traversed counter-clockwise.
    pub fn circle(name: &str, center: Point2<f64>, radius: f64) -> Result<Self, GeometryError> {
        if !(radius > EPS) {
            return Err(GeometryError::dimension(format!("{} radius", name), radius));
        }
        Self::new(name, vec![Edge::arc(center, radius, 0.0, 360.0)])
    }

    /// Close a half contour that starts and ends on the Y axis by appending
    /// its mirror image.
    pub fn mirrored_closed(name: &str, half: Vec<Edge>) -> Result<Self, GeometryError> {
        let mirrored: Vec<Edge> = half.iter().rev().map(|e| e.mirrored_x().reversed()).collect();
        let mut edges = half;
        edges.extend(mirrored);
        let profile = Self::new(name, edges)?;
        Ok(profile.merge_collinear())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Join consecutive collinear lines into one.
    pub fn merge_collinear(self) -> Self {
        let mut merged: Vec<Edge> = Vec::with_capacity(self.edges.len());
        for edge in self.edges {
            if let (Some(Edge::Line { start, end }), Edge::Line { end: next_end, .. }) =
                (merged.last().copied(), edge)
            {
                let a = (end - start).normalize();
                let b = (next_end - end).normalize();
                if (a - b).norm() < EPS {
                    if let Some(last) = merged.last_mut() {
                        *last = Edge::line(start, next_end);
                    }
                    continue;
                }
            }
            merged.push(edge);
        }
        if merged.len() > 2 {
            if let (Some(Edge::Line { start, end }), Some(Edge::Line { end: first_end, .. })) =
                (merged.last().copied(), merged.first().copied())
            {
                let a = (end - start).normalize();
                let b = (first_end - end).normalize();
                if (a - b).norm() < EPS {
                    merged.pop();
                    merged[0] = Edge::line(start, first_end);
                }
            }
        }
        Self { edges: merged }
    }

    /// Round the convex corner where line `index` meets the next line.
    pub fn fillet(self, index: usize, radius: f64) -> Result<Self, GeometryError> {
        let n = self.edges.len();
        let next = (index + 1) % n;
        let (a_start, corner, b_end) = match (self.edges[index % n], self.edges[next]) {
            (Edge::Line { start, end }, Edge::Line { end: b_end, .. }) => (start, end, b_end),
            _ => return Err(GeometryError::degenerate("fillet of a non-line corner")),
        };
        if radius <= EPS {
            return Ok(self);
        }
        let u = (a_start - corner).normalize();
        let v = (b_end - corner).normalize();
        let half = u.angle(&v) / 2.0;
        if half < 1e-9 || (std::f64::consts::FRAC_PI_2 - half) < 1e-9 {
            return Err(GeometryError::degenerate("fillet of a straight corner"));
        }
        let setback = radius / half.tan();
        if setback > (a_start - corner).norm() + EPS || setback > (b_end - corner).norm() + EPS {
            return Err(GeometryError::dimension("fillet radius", radius));
        }
        let t1 = corner + u * setback;
        let t2 = corner + v * setback;
        let center = corner + (u + v).normalize() * (radius / half.sin());
        let a1 = (t1 - center).y.atan2((t1 - center).x).to_degrees();
        let a2 = (t2 - center).y.atan2((t2 - center).x).to_degrees();
        let mut sweep = a2 - a1;
        if sweep > 180.0 {
            sweep -= 360.0;
        } else if sweep < -180.0 {
            sweep += 360.0;
        }

        let mut edges = self.edges;
        edges[index % n] = Edge::line(a_start, t1);
        edges[next] = Edge::line(t2, b_end);
        edges.insert(index % n + 1, Edge::arc(center, radius, a1, sweep));
        Ok(Self { edges })
    }

    /// Offset every edge outward by `distance`; joints must be tangent.
    pub fn offset(&self, name: &str, distance: f64) -> Result<Self, GeometryError> {
        if distance == 0.0 {
            return Ok(self.clone());
        }
        let sign = if self.signed_area(32) >= 0.0 { 1.0 } else { -1.0 };
        let edges: Vec<Edge> = self.edges.iter().map(|e| e.offset(sign * distance)).collect();
        for edge in &edges {
            if let Edge::Arc { radius, .. } = edge {
                if *radius < 0.0 {
                    return Err(GeometryError::dimension(format!("{} offset", name), distance));
                }
            }
        }
        Self::new(name, edges)
    }

    pub fn rotated(&self, degrees: f64) -> Self {
        Self {
            edges: self.edges.iter().map(|e| e.rotated(degrees)).collect(),
        }
    }

    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        Self {
            edges: self.edges.iter().map(|e| e.translated(offset)).collect(),
        }
    }

    /// Segments per edge for a full-circle resolution of `arc_segments`.
    pub fn segment_counts(&self, arc_segments: usize) -> Vec<usize> {
        self.edges
            .iter()
            .map(|e| match e {
                Edge::Line { .. } => 1,
                Edge::Arc { sweep, .. } => {
                    ((sweep.abs() / 360.0 * arc_segments as f64).ceil() as usize).max(2)
                }
            })
            .collect()
    }

    /// Tessellate with explicit per-edge segment counts, so that two
    /// structurally identical profiles produce the same number of points.
    pub fn tessellate_with(&self, counts: &[usize]) -> Result<Vec<Point2<f64>>, GeometryError> {
        if counts.len() != self.edges.len() {
            return Err(GeometryError::degenerate("tessellation with mismatched edges"));
        }
        Ok(self
            .edges
            .iter()
            .zip(counts)
            .flat_map(|(e, n)| e.tessellate(*n))
            .collect())
    }

    pub fn tessellate(&self, arc_segments: usize) -> Vec<Point2<f64>> {
        self.edges
            .iter()
            .zip(self.segment_counts(arc_segments))
            .flat_map(|(e, n)| e.tessellate(n))
            .collect()
    }

    /// Shoelace area of the tessellated contour, positive when counter-clockwise.
    pub fn signed_area(&self, arc_segments: usize) -> f64 {
        polygon_area(&self.tessellate(arc_segments))
    }
}

/// Shoelace area of a closed polygon, positive when counter-clockwise.
pub fn polygon_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Ear-clipping triangulation of a simple polygon.
///
/// Returns index triples in counter-clockwise order whatever the winding of
/// the input.
pub fn triangulate(points: &[Point2<f64>]) -> Result<Vec<[usize; 3]>, GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::degenerate("triangulation of fewer than 3 points"));
    }
    let mut ring: Vec<usize> = if polygon_area(points) >= 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };
    let inside = |p: Point2<f64>, a: Point2<f64>, b: Point2<f64>, c: Point2<f64>| {
        cross(a, b, p) >= -1e-12 && cross(b, c, p) >= -1e-12 && cross(c, a, p) >= -1e-12
    };

    let mut triangles = Vec::with_capacity(n - 2);
    while ring.len() > 3 {
        let m = ring.len();
        let ear = (0..m).find(|&i| {
            let (a, b, c) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
            let (pa, pb, pc) = (points[a], points[b], points[c]);
            cross(pa, pb, pc) > 1e-12
                && !ring
                    .iter()
                    .filter(|&&k| k != a && k != b && k != c)
                    .any(|&k| inside(points[k], pa, pb, pc))
        });
        match ear {
            Some(i) => {
                triangles.push([ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]]);
                ring.remove(i);
            }
            None => {
                // Only collinear vertices remain clippable.
                let flat = (0..m).find(|&i| {
                    let (a, b, c) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
                    cross(points[a], points[b], points[c]).abs() <= 1e-12
                });
                match flat {
                    Some(i) => {
                        ring.remove(i);
                    }
                    None => return Err(GeometryError::degenerate("triangulation")),
                }
            }
        }
    }
    if cross(points[ring[0]], points[ring[1]], points[ring[2]]) > 1e-12 {
        triangles.push([ring[0], ring[1], ring[2]]);
    }
    Ok(triangles)
}

/// Counter-clockwise convex hull (monotone chain).
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts: Vec<Point2<f64>> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (*a - *b).norm() < EPS);
    if pts.len() < 3 {
        return pts;
    }
    let mut hull: Vec<Point2<f64>> = Vec::with_capacity(pts.len() * 2);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 1e-12 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 1e-12
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}
