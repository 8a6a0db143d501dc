//! Oriented-box vertex providers and the GJK support function.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Unit quad template in the XY plane, counter-clockwise from the bottom-left
/// corner. Vertex order is fixed; `furthest` tie-breaking depends on it.
const UNIT_QUAD: [Vec3; 4] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
];

/// Unit box template, bottom face then top face, same winding as the quad.
const UNIT_BOX: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
];

/// Rotation from Euler angles in degrees (`.x` pitch, `.y` roll, `.z` yaw).
/// Yaw turns about Z, so it is the in-plane rotation of the quad template.
#[inline]
fn rotation(orientation: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZXY,
        orientation.z.to_radians(),
        orientation.x.to_radians(),
        orientation.y.to_radians(),
    )
}

/// World-space vertices of an oriented quad: scale, then rotate, then
/// translate the unit template. Pure function.
#[inline]
pub fn box_vertices(position: Vec3, orientation: Vec3, extent: Vec2) -> [Vec3; 4] {
    let model = Mat4::from_scale_rotation_translation(
        Vec3::new(extent.x, extent.y, 1.0),
        rotation(orientation),
        position,
    );
    UNIT_QUAD.map(|v| model.transform_point3(v))
}

/// World-space vertices of an oriented box, for callers with depth.
#[inline]
pub fn box_vertices_3d(position: Vec3, orientation: Vec3, extent: Vec3) -> [Vec3; 8] {
    let model =
        Mat4::from_scale_rotation_translation(extent, rotation(orientation), position);
    UNIT_BOX.map(|v| model.transform_point3(v))
}

/// The vertex furthest along `direction`. Ties break toward the first
/// maximal vertex in encounter order, which is deterministic because the
/// template order is fixed.
#[inline]
pub fn furthest(vertices: &[Vec3], direction: Vec3) -> Vec3 {
    let mut best = vertices[0];
    let mut best_dot = best.dot(direction);
    for v in &vertices[1..] {
        let d = v.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = *v;
        }
    }
    best
}

/// Minkowski-difference support point: the point of `A - B` furthest along
/// `direction`.
#[inline]
pub fn support(a: &[Vec3], b: &[Vec3], direction: Vec3) -> Vec3 {
    furthest(a, direction) - furthest(b, -direction)
}

/// Arithmetic mean of a vertex set. Used to seed the GJK search direction.
#[inline]
pub fn centroid(vertices: &[Vec3]) -> Vec3 {
    if vertices.is_empty() {
        return Vec3::ZERO;
    }
    vertices.iter().copied().sum::<Vec3>() / vertices.len() as f32
}
