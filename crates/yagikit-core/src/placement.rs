//! Affine transform values.
//!
//! A [`Placement`] wraps a homogeneous 4×4 matrix. Placements are composed
//! with [`Placement::then`], which applies `self` first and the argument
//! second, so `a.then(b).then(c)` is the matrix product `c * b * a`.

use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    matrix: Matrix4<f64>,
}

impl Placement {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(x, y, z)),
        }
    }

    /// Rotation about +X by `degrees` (right-handed).
    pub fn rotation_x(degrees: f64) -> Self {
        Self::rotation(Vector3::x_axis(), degrees)
    }

    /// Rotation about +Y by `degrees` (right-handed).
    pub fn rotation_y(degrees: f64) -> Self {
        Self::rotation(Vector3::y_axis(), degrees)
    }

    /// Rotation about +Z by `degrees` (right-handed).
    pub fn rotation_z(degrees: f64) -> Self {
        Self::rotation(Vector3::z_axis(), degrees)
    }

    fn rotation(axis: nalgebra::Unit<Vector3<f64>>, degrees: f64) -> Self {
        Self {
            matrix: Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous(),
        }
    }

    /// Apply `outer` after `self`.
    pub fn then(self, outer: Placement) -> Self {
        Self {
            matrix: outer.matrix * self.matrix,
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn apply_point(&self, point: Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(&point)
    }

    pub fn apply_vector(&self, vector: Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(&vector)
    }

    /// The same transform without its translation part.
    pub fn rotation_only(&self) -> Self {
        let mut matrix = self.matrix;
        matrix[(0, 3)] = 0.0;
        matrix[(1, 3)] = 0.0;
        matrix[(2, 3)] = 0.0;
        Self { matrix }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point3<f64>, b: Point3<f64>) -> bool {
        (a - b).norm() < 1e-9
    }

    #[test]
    fn test_then_applies_inner_first() {
        let p = Placement::rotation_z(90.0).then(Placement::translation(10.0, 0.0, 0.0));
        assert!(close(
            p.apply_point(Point3::new(1.0, 0.0, 0.0)),
            Point3::new(10.0, 1.0, 0.0)
        ));

        let q = Placement::translation(10.0, 0.0, 0.0).then(Placement::rotation_z(90.0));
        assert!(close(
            q.apply_point(Point3::new(1.0, 0.0, 0.0)),
            Point3::new(0.0, 11.0, 0.0)
        ));
    }

    #[test]
    fn test_rotation_y_minus_90_maps_x_to_z() {
        let p = Placement::rotation_y(-90.0);
        assert!(close(
            p.apply_point(Point3::new(1.0, 0.0, 0.0)),
            Point3::new(0.0, 0.0, 1.0)
        ));
        assert!(close(
            p.apply_point(Point3::new(0.0, 0.0, 1.0)),
            Point3::new(-1.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn test_rotation_only_drops_translation() {
        let p = Placement::rotation_x(180.0).then(Placement::translation(1.0, 2.0, 3.0));
        let r = p.rotation_only();
        assert!(close(
            r.apply_point(Point3::new(0.0, 1.0, 0.0)),
            Point3::new(0.0, -1.0, 0.0)
        ));
    }
}
