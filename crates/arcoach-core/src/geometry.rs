//! Spatial primitives for marker detections.
//!
//! A recognized marker arrives as an ordered corner quad in world space.
//! The only geometry the engine performs is deriving an outline slightly
//! larger than the marker, oriented to face the viewer, from those four
//! corners. The derivation is stateless.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Default distance by which the outline is pushed outward from the
/// marker's corners.
pub const DEFAULT_OUTLINE_MARGIN: f32 = 0.01;

/// A 3D point in world/camera space.
///
/// Newtype over [`nalgebra::Vector3<f32>`] for downstream math convenience.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3(pub Vector3<f32>);

impl Point3 {
    /// Convenience constructor.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The origin.
    #[must_use]
    pub fn zero() -> Self {
        Self(Vector3::zeros())
    }

    #[must_use]
    pub fn x(&self) -> f32 {
        self.0.x
    }

    #[must_use]
    pub fn y(&self) -> f32 {
        self.0.y
    }

    #[must_use]
    pub fn z(&self) -> f32 {
        self.0.z
    }
}

/// A position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position.
    pub position: Point3,
    /// World orientation.
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    /// The identity pose at the origin.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::zero(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Creates a pose at `position` with the identity orientation.
    #[must_use]
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// An ordered marker corner quad.
///
/// Corner ordering follows the recognizer convention: top-left,
/// top-right, bottom-right, bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerQuad {
    corners: [Point3; 4],
}

impl CornerQuad {
    /// Creates a quad from four ordered corners.
    #[must_use]
    pub fn new(corners: [Point3; 4]) -> Self {
        Self { corners }
    }

    /// Returns the ordered corners.
    #[must_use]
    pub fn corners(&self) -> &[Point3; 4] {
        &self.corners
    }

    /// The average of the four corners.
    #[must_use]
    pub fn center(&self) -> Point3 {
        let c = self.corners.map(|p| p.0);
        Point3((c[0] + c[1] + c[2] + c[3]) / 4.0)
    }

    /// Derives the drawable outline for this quad.
    ///
    /// Each corner is pushed outward from the center by `margin` so the
    /// outline is slightly larger than the marker itself. The outline's
    /// anchor sits at the top-edge midpoint and its orientation is built
    /// from the quad's edge vectors so it faces the viewer. Degenerate
    /// quads (coincident corners) fall back to the identity orientation
    /// with uninflated points rather than producing NaNs.
    #[must_use]
    pub fn outline(&self, margin: f32) -> Outline {
        let c = self.corners.map(|p| p.0);
        let center = (c[0] + c[1] + c[2] + c[3]) / 4.0;

        let mut points = [Point3::zero(); 4];
        for (point, corner) in points.iter_mut().zip(&c) {
            let dir = (corner - center)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            *point = Point3(corner + dir * margin);
        }

        let top_center = (c[0] + c[1]) / 2.0;
        let up = (c[0] - c[3]).try_normalize(f32::EPSILON);
        let right = (c[2] - c[3]).try_normalize(f32::EPSILON);

        let rotation = match (up, right) {
            (Some(up), Some(right)) => (-up.cross(&right))
                .try_normalize(f32::EPSILON)
                .map_or_else(
                    UnitQuaternion::identity,
                    |normal| UnitQuaternion::face_towards(&normal, &up),
                ),
            _ => UnitQuaternion::identity(),
        };

        Outline {
            pose: Pose {
                position: Point3(top_center),
                rotation,
            },
            points,
        }
    }
}

/// The drawable outline derived from a corner quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Anchor pose for the outline (top-edge midpoint, facing the viewer).
    pub pose: Pose,
    /// Inflated corner positions, same ordering as the source quad.
    pub points: [Point3; 4],
}

impl Outline {
    /// An empty outline with all points at the origin. Used before the
    /// first detection and after a session reset.
    #[must_use]
    pub fn degenerate() -> Self {
        Self {
            pose: Pose::identity(),
            points: [Point3::zero(); 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::{CornerQuad, Outline, Point3};

    fn unit_square() -> CornerQuad {
        CornerQuad::new([
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ])
    }

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).norm() < 1e-5
    }

    #[test]
    fn center_is_corner_average() {
        let quad = CornerQuad::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]);
        assert!(close(quad.center().0, Vector3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn outline_points_are_inflated_outward() {
        let outline = unit_square().outline(0.1);
        let expected_norm = 2.0_f32.sqrt() + 0.1;
        for point in &outline.points {
            assert!((point.0.norm() - expected_norm).abs() < 1e-5);
        }
    }

    #[test]
    fn outline_anchor_sits_at_top_edge_midpoint() {
        let outline = unit_square().outline(0.1);
        assert!(close(outline.pose.position.0, Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn outline_faces_the_viewer() {
        let outline = unit_square().outline(0.1);
        let forward = outline.pose.rotation * Vector3::z();
        assert!(close(forward, Vector3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn degenerate_quad_produces_no_nans() {
        let quad = CornerQuad::new([Point3::new(0.5, 0.5, 0.5); 4]);
        let outline = quad.outline(0.1);
        for point in &outline.points {
            assert!(point.0.iter().all(|v| v.is_finite()));
            assert!(close(point.0, Vector3::new(0.5, 0.5, 0.5)));
        }
        assert!(close(outline.pose.rotation * Vector3::z(), Vector3::z()));
    }

    #[test]
    fn degenerate_outline_is_all_zeros() {
        let outline = Outline::degenerate();
        for point in &outline.points {
            assert!(close(point.0, Vector3::zeros()));
        }
    }
}
