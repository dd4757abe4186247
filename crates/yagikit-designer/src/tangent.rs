//! Tangent helpers between circles, points and profile edges.

use crate::profile::{normalize_degrees, Edge, ANGLE_EPS, EPS};
use nalgebra::{Point2, Vector2};
use yagikit_core::GeometryError;

/// Angle in degrees of the top tangent line from the point `(x, y)` to a
/// circle of radius `r` centered at the origin.
///
/// The point must lie right of the Y axis and outside the circle.
pub fn tangent_angle(r: f64, x: f64, y: f64) -> Result<f64, GeometryError> {
    if !(x > 0.0) {
        return Err(GeometryError::dimension("tangent pivot x", x));
    }
    let distance = x.hypot(y);
    if distance < r {
        return Err(GeometryError::TangentDomain {
            radius: r,
            distance,
        });
    }
    Ok(((r / distance).acos() + (y / x).atan()).to_degrees())
}

/// Point of `edge` whose tangent direction equals `angle` modulo 180°.
///
/// A line parallel to `angle` yields its start point.
pub fn edge_tangent_point(edge: &Edge, angle: f64) -> Result<Option<Point2<f64>>, GeometryError> {
    match *edge {
        Edge::Line { start, end } => {
            let d = end - start;
            let dir = d.y.atan2(d.x).to_degrees();
            let diff = (dir - angle).rem_euclid(180.0);
            if diff < ANGLE_EPS || 180.0 - diff < ANGLE_EPS {
                Ok(Some(start))
            } else {
                Ok(None)
            }
        }
        Edge::Arc {
            center,
            radius,
            start_angle,
            sweep,
        } => {
            if radius < EPS {
                return Ok(None);
            }
            let span = sweep.abs();
            let mut hits: Vec<Point2<f64>> = Vec::with_capacity(2);
            for candidate in [angle - 90.0, angle + 90.0] {
                let along = normalize_degrees((candidate - start_angle) * sweep.signum());
                let on_arc = along <= span + ANGLE_EPS || 360.0 - along < ANGLE_EPS;
                if on_arc {
                    let rad = candidate.to_radians();
                    let p = center + Vector2::new(rad.cos(), rad.sin()) * radius;
                    if !hits.iter().any(|h| (h - p).norm() < EPS) {
                        hits.push(p);
                    }
                }
            }
            match hits.len() {
                0 => Ok(None),
                1 => Ok(hits.pop()),
                _ => Err(GeometryError::AmbiguousTangent { angle }),
            }
        }
    }
}

/// Among all edges, the tangent point at `angle` that lies furthest along
/// `preference`. The first point found wins a tie.
pub fn tangent_point(
    edges: &[Edge],
    angle: f64,
    preference: Vector2<f64>,
) -> Result<Option<Point2<f64>>, GeometryError> {
    let mut best: Option<(f64, Point2<f64>)> = None;
    for edge in edges {
        if let Some(p) = edge_tangent_point(edge, angle)? {
            let score = p.coords.dot(&preference);
            match best {
                Some((s, _)) if score > s => best = Some((score, p)),
                None => best = Some((score, p)),
                _ => {}
            }
        }
    }
    Ok(best.map(|(_, p)| p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::SQRT_2;

    #[test]
    fn test_tangent_angle_at_45_degrees() {
        let r = 2.0;
        let angle = tangent_angle(r, r * SQRT_2, r * SQRT_2).unwrap();
        let expected = (0.5f64.acos() + 1.0f64.atan()).to_degrees();
        assert!((angle - expected).abs() < 1e-12);
        assert!((angle - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_tangent_angle_rejects_point_inside() {
        assert!(matches!(
            tangent_angle(5.0, 1.0, 1.0),
            Err(GeometryError::TangentDomain { .. })
        ));
        assert!(tangent_angle(1.0, 0.0, 3.0).is_err());
    }

    #[test]
    fn test_tangent_on_circle_point_of_tangency() {
        let r = 3.0;
        let angle = tangent_angle(r, 5.0, 0.0).unwrap();
        // The tangent point seen from (5, 0) at angle a sits at r*(cos a, sin a).
        let t = Vector2::new(angle.to_radians().cos(), angle.to_radians().sin()) * r;
        let to_pivot = Vector2::new(5.0, 0.0) - t;
        assert!(t.dot(&to_pivot).abs() < 1e-9);
    }

    #[test]
    fn test_arc_tangent_point() {
        let arc = Edge::arc(Point2::origin(), 1.0, 90.0, 180.0);
        let p = edge_tangent_point(&arc, 45.0).unwrap().unwrap();
        assert!((p - Point2::new(-SQRT_2 / 2.0, SQRT_2 / 2.0)).norm() < 1e-12);
        let outside = Edge::arc(Point2::origin(), 1.0, 0.0, 30.0);
        assert_eq!(edge_tangent_point(&outside, 45.0).unwrap(), None);
    }

    #[test]
    fn test_full_circle_is_ambiguous() {
        let circle = Edge::arc(Point2::origin(), 1.0, 0.0, 360.0);
        assert!(matches!(
            edge_tangent_point(&circle, 45.0),
            Err(GeometryError::AmbiguousTangent { .. })
        ));
    }

    #[test]
    fn test_tangent_point_prefers_direction_and_first_on_tie() {
        let edges = [
            Edge::line(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0)),
            Edge::line(Point2::new(-2.0, 0.0), Point2::new(-2.0, 1.0)),
            Edge::line(Point2::new(-2.0, 5.0), Point2::new(-2.0, 6.0)),
        ];
        let p = tangent_point(&edges, 90.0, Vector2::new(-1.0, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(p, Point2::new(-2.0, 0.0));
        assert_eq!(
            tangent_point(&edges, 10.0, Vector2::new(-1.0, 0.0)).unwrap(),
            None
        );
    }
}
