//! Indexed triangle meshes for export.
//!
//! BSP Booleans leave vertices that are equal only up to rounding and split
//! faces on one side of an edge but not on the other. [`TriangleMesh::repair`]
//! welds that soup into an indexed mesh, splits T-junctions and closes any
//! boundary loops that remain, so exported housings are watertight.

use nalgebra::{Point3, Vector3};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use yagikit_core::Placement;
use yagikit_designer::kernel::{self, Solid};

/// Maximum distance for vertices to be merged.
const WELD_EPSILON: f64 = 1e-5;

/// Maximum distance of a vertex from an edge it splits.
const ON_EDGE_EPSILON: f64 = 1e-4;

const MAX_SPLIT_PASSES: usize = 8;

/// Boundary loops longer than this are reported, not filled.
const MAX_HOLE_EDGES: usize = 4096;

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn pos_to_cell(p: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

/// Rotate a face so its smallest index comes first, keeping the winding.
fn normalize_face(face: [usize; 3]) -> [usize; 3] {
    let k = (0..3).min_by_key(|&k| face[k]).unwrap_or(0);
    [face[k], face[(k + 1) % 3], face[(k + 2) % 3]]
}

/// What [`TriangleMesh::repair`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub duplicate_faces: usize,
    pub split_triangles: usize,
    pub holes_filled: usize,
}

impl RepairSummary {
    pub fn had_changes(&self) -> bool {
        self.duplicate_faces > 0 || self.split_triangles > 0 || self.holes_filled > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Weld a triangle soup. Triangles that collapse are dropped.
    pub fn from_triangles(soup: &[[Point3<f64>; 3]]) -> Self {
        let cell_size = WELD_EPSILON * 2.0;
        let mut spatial_hash: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut mesh = TriangleMesh::default();

        let mut index_of = |p: Point3<f64>, mesh: &mut TriangleMesh| -> usize {
            let cell = pos_to_cell(&p, cell_size);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                        if let Some(candidates) = spatial_hash.get(&neighbor) {
                            for &idx in candidates {
                                if (mesh.vertices[idx] - p).norm() < WELD_EPSILON {
                                    return idx;
                                }
                            }
                        }
                    }
                }
            }
            let idx = mesh.vertices.len();
            mesh.vertices.push(p);
            spatial_hash.entry(cell).or_default().push(idx);
            idx
        };

        for tri in soup {
            let face = [
                index_of(tri[0], &mut mesh),
                index_of(tri[1], &mut mesh),
                index_of(tri[2], &mut mesh),
            ];
            if face[0] != face[1] && face[1] != face[2] && face[0] != face[2] {
                mesh.triangles.push(face);
            }
        }
        mesh
    }

    /// Welded and repaired mesh of a solid's boundary.
    pub fn from_solid(solid: &Solid) -> Self {
        let mut mesh = Self::from_triangles(&kernel::triangles(solid));
        let summary = mesh.repair();
        if summary.had_changes() {
            tracing::debug!(
                duplicates = summary.duplicate_faces,
                splits = summary.split_triangles,
                holes = summary.holes_filled,
                "repaired mesh"
            );
        }
        mesh
    }

    /// Remove duplicate faces, split T-junctions, then fill what is still
    /// open.
    pub fn repair(&mut self) -> RepairSummary {
        let duplicate_faces = self.remove_duplicate_faces();
        let split_triangles = self.split_t_junctions();
        let holes_filled = self.fill_holes();
        RepairSummary {
            duplicate_faces,
            split_triangles,
            holes_filled,
        }
    }

    pub fn transformed(&self, placement: &Placement) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|p| placement.apply_point(*p))
                .collect(),
            triangles: self.triangles.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Enclosed volume by the divergence theorem.
    pub fn volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (a, b, c) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    /// Per undirected edge, uses as `lo -> hi` minus uses as `hi -> lo`.
    fn edge_balance(&self) -> BTreeMap<(usize, usize), i64> {
        let mut balance = BTreeMap::new();
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let d = if u < v { 1 } else { -1 };
                *balance.entry(edge_key(u, v)).or_insert(0) += d;
            }
        }
        balance
    }

    /// Face edges without an opposite partner, once per missing partner.
    fn unmatched_half_edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for ((lo, hi), b) in self.edge_balance() {
            let edge = if b > 0 { (lo, hi) } else { (hi, lo) };
            out.extend(std::iter::repeat(edge).take(b.unsigned_abs() as usize));
        }
        out
    }

    /// Edges not matched by a face running the opposite way.
    pub fn open_edges(&self) -> usize {
        self.edge_balance().values().filter(|&&b| b != 0).count()
    }

    /// Drop repeated faces with the same winding. Returns the number removed.
    pub fn remove_duplicate_faces(&mut self) -> usize {
        let before = self.triangles.len();
        let mut seen = BTreeSet::new();
        self.triangles.retain(|&face| seen.insert(normalize_face(face)));
        before - self.triangles.len()
    }

    /// Split triangles along unmatched edges that pass through other
    /// vertices. Returns the number of triangles split.
    pub fn split_t_junctions(&mut self) -> usize {
        let mut total = 0;
        for _ in 0..MAX_SPLIT_PASSES {
            let open: BTreeSet<(usize, usize)> = self.unmatched_half_edges().into_iter().collect();
            let on_edge: BTreeMap<(usize, usize), Vec<usize>> = open
                .into_iter()
                .filter_map(|(a, b)| {
                    let inner = self.vertices_on_edge(a, b);
                    (!inner.is_empty()).then_some(((a, b), inner))
                })
                .collect();
            if on_edge.is_empty() {
                break;
            }

            let mut split = 0;
            let mut triangles = Vec::with_capacity(self.triangles.len());
            for &tri in &self.triangles {
                match split_triangle(tri, &on_edge) {
                    Some(parts) => {
                        split += 1;
                        triangles.extend(parts);
                    }
                    None => triangles.push(tri),
                }
            }
            self.triangles = triangles;
            if split == 0 {
                break;
            }
            total += split;
        }
        total
    }

    /// Vertices strictly inside segment `a`-`b`, ordered from `a` to `b`.
    fn vertices_on_edge(&self, a: usize, b: usize) -> Vec<usize> {
        let pa = self.vertices[a];
        let pb = self.vertices[b];
        let ab = pb - pa;
        let len2 = ab.norm_squared();
        if len2 < WELD_EPSILON * WELD_EPSILON {
            return Vec::new();
        }
        let pad = Vector3::repeat(ON_EDGE_EPSILON);
        let lo = pa.coords.inf(&pb.coords) - pad;
        let hi = pa.coords.sup(&pb.coords) + pad;

        let mut inner: Vec<(f64, usize)> = self
            .vertices
            .iter()
            .enumerate()
            .filter(|&(v, p)| {
                v != a
                    && v != b
                    && p.coords.iter().zip(lo.iter()).all(|(x, l)| x >= l)
                    && p.coords.iter().zip(hi.iter()).all(|(x, h)| x <= h)
            })
            .filter_map(|(v, p)| {
                let t = (p - pa).dot(&ab) / len2;
                if t <= 0.0 || t >= 1.0 {
                    return None;
                }
                let off_edge = (p - (pa + ab * t)).norm();
                (off_edge < ON_EDGE_EPSILON).then_some((t, v))
            })
            .collect();
        inner.sort_by(|x, y| x.0.total_cmp(&y.0));
        inner.into_iter().map(|(_, v)| v).collect()
    }

    /// Close every boundary loop with new triangles. Returns the number of
    /// loops filled.
    pub fn fill_holes(&mut self) -> usize {
        // Each unmatched face edge a -> b needs a fill edge b -> a.
        let mut fill_edges: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (a, b) in self.unmatched_half_edges() {
            fill_edges.entry(b).or_default().push(a);
        }

        let mut filled = 0;
        while let Some(&start) = fill_edges.keys().next() {
            let mut ring = vec![start];
            let mut current = start;
            let mut closed = false;
            while let Some(outs) = fill_edges.get_mut(&current) {
                let Some(to) = outs.pop() else { break };
                if outs.is_empty() {
                    fill_edges.remove(&current);
                }
                if to == start {
                    closed = true;
                    break;
                }
                ring.push(to);
                current = to;
                if ring.len() > MAX_HOLE_EDGES {
                    break;
                }
            }

            if !closed || ring.len() < 3 {
                tracing::warn!(edges = ring.len(), closed, "boundary loop left open");
                continue;
            }
            let faces = self.fill_ring(&ring);
            if !faces.is_empty() {
                self.triangles.extend(faces);
                filled += 1;
            }
        }
        filled
    }

    /// Ear clipping over a boundary loop, falling back to a fan when no ear
    /// is found (collinear slivers).
    fn fill_ring(&self, ring: &[usize]) -> Vec<[usize; 3]> {
        let points: Vec<Point3<f64>> = ring.iter().map(|&v| self.vertices[v]).collect();
        let normal = newell_normal(&points);

        let mut remaining: Vec<usize> = (0..ring.len()).collect();
        let mut faces = Vec::with_capacity(ring.len() - 2);
        while remaining.len() > 3 {
            let n = remaining.len();
            let ear = (0..n).find(|&i| {
                let (p, c, q) = (remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]);
                is_ear(&points, &remaining, [p, c, q], &normal)
            });
            let Some(i) = ear else { break };
            faces.push([
                ring[remaining[(i + n - 1) % n]],
                ring[remaining[i]],
                ring[remaining[(i + 1) % n]],
            ]);
            remaining.remove(i);
        }
        for i in 1..remaining.len().saturating_sub(1) {
            faces.push([
                ring[remaining[0]],
                ring[remaining[i]],
                ring[remaining[i + 1]],
            ]);
        }
        faces.retain(|f| f[0] != f[1] && f[1] != f[2] && f[0] != f[2]);
        faces
    }

    pub fn to_stl_triangles(&self) -> Vec<stl_io::Triangle> {
        let f = |p: Point3<f64>| [p.x as f32, p.y as f32, p.z as f32];
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let (pa, pb, pc) = (self.vertices[a], self.vertices[b], self.vertices[c]);
                let n = (pb - pa).cross(&(pc - pa));
                let n = if n.norm() > 0.0 { n.normalize() } else { n };
                stl_io::Triangle {
                    normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: [
                        stl_io::Vertex::new(f(pa)),
                        stl_io::Vertex::new(f(pb)),
                        stl_io::Vertex::new(f(pc)),
                    ],
                }
            })
            .collect()
    }

    /// Write as binary STL.
    pub fn write_stl(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        stl_io::write_stl(&mut writer, self.to_stl_triangles().iter())
    }
}

fn split_triangle(
    tri: [usize; 3],
    on_edge: &BTreeMap<(usize, usize), Vec<usize>>,
) -> Option<Vec<[usize; 3]>> {
    for k in 0..3 {
        let (a, b, c) = (tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]);
        let Some(inner) = on_edge.get(&(a, b)) else {
            continue;
        };
        let inner: Vec<usize> = inner.iter().copied().filter(|&v| v != c).collect();
        if inner.is_empty() {
            continue;
        }
        let mut chain = Vec::with_capacity(inner.len() + 2);
        chain.push(a);
        chain.extend(inner);
        chain.push(b);
        return Some(chain.windows(2).map(|w| [w[0], w[1], c]).collect());
    }
    None
}

fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    (0..n).fold(Vector3::zeros(), |acc, i| {
        let (p, q) = (points[i], points[(i + 1) % n]);
        acc + Vector3::new(
            (p.y - q.y) * (p.z + q.z),
            (p.z - q.z) * (p.x + q.x),
            (p.x - q.x) * (p.y + q.y),
        )
    })
}

fn is_ear(
    points: &[Point3<f64>],
    remaining: &[usize],
    [prev, curr, next]: [usize; 3],
    normal: &Vector3<f64>,
) -> bool {
    let (a, b, c) = (points[prev], points[curr], points[next]);
    let tri_normal = (b - a).cross(&(c - a));
    if tri_normal.norm() < 1e-12 || tri_normal.dot(normal) <= 0.0 {
        return false;
    }
    remaining
        .iter()
        .filter(|&&i| i != prev && i != curr && i != next)
        .all(|&i| !in_triangle(&points[i], [&a, &b, &c], &tri_normal))
}

fn in_triangle(p: &Point3<f64>, [a, b, c]: [&Point3<f64>; 3], normal: &Vector3<f64>) -> bool {
    let side = |u: &Point3<f64>, v: &Point3<f64>| (v - u).cross(&(p - u)).dot(normal);
    side(a, b) >= 0.0 && side(b, c) >= 0.0 && side(c, a) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn tetra_with_t_junction() -> Vec<[Point3<f64>; 3]> {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 1.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 1.0);
        let m = Point3::new(0.5, 0.0, 0.0);
        vec![
            [p0, p2, p1],
            [p0, m, p3],
            [m, p1, p3],
            [p0, p3, p2],
            [p1, p2, p3],
        ]
    }

    fn unit_cube() -> Vec<[Point3<f64>; 3]> {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let quads = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
        ];
        quads
            .iter()
            .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
            .collect()
    }

    #[test]
    fn test_weld_merges_near_duplicates() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let b2 = Point3::new(1.0 + 1e-9, 0.0, 0.0);
        let mesh = TriangleMesh::from_triangles(&[[a, b, c], [b2, a, Point3::new(0.0, -1.0, 0.0)]]);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.len(), 2);
    }

    #[test]
    fn test_t_junction_is_split() {
        let mut mesh = TriangleMesh::from_triangles(&tetra_with_t_junction());
        assert_eq!(mesh.open_edges(), 3);
        assert_eq!(mesh.split_t_junctions(), 1);
        assert_eq!(mesh.open_edges(), 0);
        assert!((mesh.volume() - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_repair_splits_face_against_neighbour_vertex() {
        // The bottom is split at a vertex on the slanted face's lower edge.
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(2.0, 0.0, 0.0);
        let p2 = Point3::new(0.0, 2.0, 0.0);
        let p3 = Point3::new(0.0, 0.0, 2.0);
        let m = Point3::new(1.0, 1.0, 0.0);
        let mut mesh = TriangleMesh::from_triangles(&[
            [p0, p2, m],
            [p0, m, p1],
            [p0, p1, p3],
            [p0, p3, p2],
            [p1, p2, p3],
        ]);
        assert_eq!(mesh.open_edges(), 3);
        mesh.repair();
        assert_eq!(mesh.open_edges(), 0);
        assert!((mesh.volume() - 8.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_face_is_filled() {
        let mut soup = unit_cube();
        soup.truncate(soup.len() - 2);
        let mut mesh = TriangleMesh::from_triangles(&soup);
        assert_eq!(mesh.open_edges(), 4);
        assert_eq!(mesh.fill_holes(), 1);
        assert_eq!(mesh.open_edges(), 0);
        assert!((mesh.volume() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_faces_are_removed() {
        let mut soup = unit_cube();
        soup.push(soup[0]);
        let mut mesh = TriangleMesh::from_triangles(&soup);
        assert_eq!(mesh.open_edges(), 3);
        let summary = mesh.repair();
        assert_eq!(summary.duplicate_faces, 1);
        assert_eq!(summary.holes_filled, 0);
        assert_eq!(mesh.open_edges(), 0);
    }

    #[test]
    fn test_loft_box_is_closed() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let solid = kernel::loft(&square, 0.0, &square, 2.0).unwrap();
        let mesh = TriangleMesh::from_solid(&solid);
        assert_eq!(mesh.open_edges(), 0);
        assert!((mesh.volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_drilled_block_is_closed() {
        let square = [
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ];
        let block = kernel::loft(&square, 0.0, &square, 4.0).unwrap();
        let hole = kernel::cylinder(
            Point3::new(-3.0, 0.0, 2.0),
            Point3::new(3.0, 0.0, 2.0),
            1.0,
            24,
        );
        let drilled = kernel::subtract(&block, &[hole]);
        let mesh = TriangleMesh::from_solid(&drilled);
        assert_eq!(mesh.open_edges(), 0);
        assert!(mesh.volume() < 64.0 && mesh.volume() > 50.0);
    }

    #[test]
    fn test_binary_stl_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tetra.stl");
        let mesh = TriangleMesh::from_triangles(&tetra_with_t_junction());
        mesh.write_stl(&path).unwrap();
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(len, 84 + 50 * mesh.len() as u64);
    }
}
