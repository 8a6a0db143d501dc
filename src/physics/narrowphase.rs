//! Narrowphase collision detection: GJK intersection tests and EPA
//! penetration resolution over the Minkowski difference.

use glam::{Vec2, Vec3};

use super::shape;

/// Iteration bound for the GJK loop. The naive algorithm can cycle on
/// degenerate input; exhausting the bound is treated as "no collision".
const GJK_MAX_ITERATIONS: usize = 32;

/// Iteration bound for EPA expansion. Exhaustion returns the best
/// approximation found so far instead of failing.
const EPA_MAX_ITERATIONS: usize = 32;

/// EPA convergence tolerance: stop once a new support point is no farther
/// than the closest polytope edge.
const EPA_TOLERANCE: f32 = 1e-4;

/// Squared-length threshold below which a search direction is degenerate.
const DEGENERATE_SQ: f32 = 1e-10;

/// The working set of up to four points in Minkowski-difference space.
///
/// Fixed capacity, indexed by count. The newest support point is always at
/// index 0; reductions keep at most three survivors, so a push never
/// overflows.
#[derive(Debug, Clone, Default)]
pub struct Simplex {
    points: [Vec3; 4],
    len: usize,
}

impl Simplex {
    fn new() -> Self {
        Self::default()
    }

    /// Prepend a support point, shifting the rest toward the tail.
    fn push_front(&mut self, point: Vec3) {
        debug_assert!(self.len < 4);
        self.points.copy_within(0..3, 1);
        self.points[0] = point;
        self.len = (self.len + 1).min(4);
    }

    fn set1(&mut self, a: Vec3) {
        self.points[0] = a;
        self.len = 1;
    }

    fn set2(&mut self, a: Vec3, b: Vec3) {
        self.points[0] = a;
        self.points[1] = b;
        self.len = 2;
    }

    fn set3(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        self.points[0] = a;
        self.points[1] = b;
        self.points[2] = c;
        self.len = 3;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The live points, newest first.
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }
}

/// Which simplex dimensionality encloses the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hull {
    /// Coplanar vertex sets: the triangle case is terminal.
    Planar,
    /// Full 3D: termination requires a tetrahedron.
    Spatial,
}

/// GJK intersection test between two oriented quads.
///
/// Returns the terminal witness simplex when the quads overlap, `None`
/// otherwise. The simplex is the required input to [`penetration`].
pub fn intersect_boxes(
    a_position: Vec3,
    a_orientation: Vec3,
    a_extent: Vec2,
    b_position: Vec3,
    b_orientation: Vec3,
    b_extent: Vec2,
) -> Option<Simplex> {
    let a = shape::box_vertices(a_position, a_orientation, a_extent);
    let b = shape::box_vertices(b_position, b_orientation, b_extent);
    intersect_planar(&a, &b, a_position - b_position)
}

/// GJK over pre-computed coplanar vertex sets (quads in the XY plane).
pub(crate) fn intersect_planar(a: &[Vec3], b: &[Vec3], initial: Vec3) -> Option<Simplex> {
    gjk(a, b, initial, Hull::Planar)
}

/// GJK over pre-computed convex vertex sets in full 3D.
pub fn intersect_hulls(a: &[Vec3], b: &[Vec3]) -> Option<Simplex> {
    gjk(a, b, shape::centroid(a) - shape::centroid(b), Hull::Spatial)
}

fn gjk(a: &[Vec3], b: &[Vec3], initial: Vec3, hull: Hull) -> Option<Simplex> {
    let seed_direction = if initial.length_squared() > DEGENERATE_SQ {
        initial
    } else {
        Vec3::X
    };

    let mut simplex = Simplex::new();
    let first = shape::support(a, b, seed_direction);
    simplex.push_front(first);
    let mut direction = -first;

    for _ in 0..GJK_MAX_ITERATIONS {
        if direction.length_squared() <= DEGENERATE_SQ {
            // The origin sits on the current simplex.
            return Some(simplex);
        }
        let point = shape::support(a, b, direction);
        if point.dot(direction) <= 0.0 {
            // The support point never crossed the origin-ward half-space.
            return None;
        }
        simplex.push_front(point);
        if next_simplex(&mut simplex, &mut direction, hull) {
            return Some(simplex);
        }
    }

    None
}

/// Reduce the simplex and refine the search direction.
/// Returns true once the origin is enclosed.
fn next_simplex(simplex: &mut Simplex, direction: &mut Vec3, hull: Hull) -> bool {
    match (simplex.len(), hull) {
        (2, _) => line(simplex, direction),
        (3, Hull::Planar) => triangle_planar(simplex, direction),
        (3, Hull::Spatial) => triangle(simplex, direction),
        (4, _) => tetrahedron(simplex, direction),
        _ => false,
    }
}

fn line(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points()[0];
    let b = simplex.points()[1];
    let ab = b - a;
    let ao = -a;

    if ab.dot(ao) > 0.0 {
        *direction = ab.cross(ao).cross(ab);
    } else {
        simplex.set1(a);
        *direction = ao;
    }
    false
}

/// Triangle case for coplanar input: with nothing outside either edge, the
/// origin lies inside the triangle and the test is over.
fn triangle_planar(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points()[0];
    let b = simplex.points()[1];
    let c = simplex.points()[2];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(ac);

    if abc.cross(ac).dot(ao) > 0.0 {
        simplex.set2(a, c);
        *direction = ac.cross(ao).cross(ac);
        false
    } else if ab.cross(abc).dot(ao) > 0.0 {
        simplex.set2(a, b);
        *direction = ab.cross(ao).cross(ab);
        false
    } else {
        true
    }
}

fn triangle(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points()[0];
    let b = simplex.points()[1];
    let c = simplex.points()[2];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(ac);

    if abc.cross(ac).dot(ao) > 0.0 {
        if ac.dot(ao) > 0.0 {
            simplex.set2(a, c);
            *direction = ac.cross(ao).cross(ac);
        } else {
            simplex.set2(a, b);
            return line(simplex, direction);
        }
    } else if ab.cross(abc).dot(ao) > 0.0 {
        simplex.set2(a, b);
        return line(simplex, direction);
    } else if abc.dot(ao) > 0.0 {
        // Origin above the face; keep the winding.
        *direction = abc;
    } else {
        // Origin below; flip the winding so the face normal tracks it.
        simplex.set3(a, c, b);
        *direction = -abc;
    }
    false
}

fn tetrahedron(simplex: &mut Simplex, direction: &mut Vec3) -> bool {
    let a = simplex.points()[0];
    let b = simplex.points()[1];
    let c = simplex.points()[2];
    let d = simplex.points()[3];
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if abc.dot(ao) > 0.0 {
        simplex.set3(a, b, c);
        *direction = abc;
        return triangle(simplex, direction);
    }
    if acd.dot(ao) > 0.0 {
        simplex.set3(a, c, d);
        *direction = acd;
        return triangle(simplex, direction);
    }
    if adb.dot(ao) > 0.0 {
        simplex.set3(a, d, b);
        *direction = adb;
        return triangle(simplex, direction);
    }

    // Origin is inside all three faces spanned from the newest point.
    true
}

/// EPA penetration resolution for coplanar (quad/quad) collisions.
///
/// Expands the terminal GJK simplex into a polygon on the Minkowski
/// boundary and returns `normal * depth` for the edge closest to the
/// origin. Subtracting the result from the first body's position separates
/// the pair.
pub fn penetration(simplex: &Simplex, a: &[Vec3], b: &[Vec3]) -> Vec3 {
    let mut polytope: Vec<Vec3> = simplex.points().to_vec();
    seed_polytope(&mut polytope, a, b);

    let mut best = Vec3::ZERO;
    for _ in 0..EPA_MAX_ITERATIONS {
        let Some((index, normal, distance)) = closest_edge(&polytope) else {
            return best;
        };
        best = normal * distance;

        let point = shape::support(a, b, normal);
        if point.dot(normal) - distance < EPA_TOLERANCE {
            return best;
        }
        polytope.insert(index + 1, point);
    }

    best
}

/// The polytope edge closest to the origin, with its outward normal.
fn closest_edge(polytope: &[Vec3]) -> Option<(usize, Vec3, f32)> {
    let mut found: Option<(usize, Vec3, f32)> = None;
    for i in 0..polytope.len() {
        let p = polytope[i];
        let q = polytope[(i + 1) % polytope.len()];
        let edge = q - p;
        let mut normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();
        if normal == Vec3::ZERO {
            continue;
        }
        let mut distance = normal.dot(p);
        if distance < 0.0 {
            normal = -normal;
            distance = -distance;
        }
        if found.map_or(true, |(_, _, d)| distance < d) {
            found = Some((i, normal, distance));
        }
    }
    found
}

/// GJK can terminate before the simplex reaches a triangle when the origin
/// lands exactly on a lower-dimensional feature. Re-seed with axis supports
/// until the polytope spans an area.
fn seed_polytope(polytope: &mut Vec<Vec3>, a: &[Vec3], b: &[Vec3]) {
    const SEEDS: [Vec3; 4] = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y];
    for seed in SEEDS {
        if polytope.len() >= 3 {
            break;
        }
        let candidate = shape::support(a, b, seed);
        if !polytope
            .iter()
            .any(|p| (*p - candidate).length_squared() < DEGENERATE_SQ)
        {
            polytope.push(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(position: Vec3, extent: Vec2) -> [Vec3; 4] {
        shape::box_vertices(position, Vec3::ZERO, extent)
    }

    #[test]
    fn test_boxes_apart_miss() {
        let result = intersect_boxes(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec2::new(10.0, 10.0),
            Vec3::new(0.0, -20.0, 0.0),
            Vec3::ZERO,
            Vec2::new(100.0, 10.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_boxes_overlapping_hit() {
        let result = intersect_boxes(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec2::new(10.0, 10.0),
            Vec3::new(0.0, -8.0, 0.0),
            Vec3::ZERO,
            Vec2::new(100.0, 10.0),
        );
        assert!(result.is_some());
    }

    #[test]
    fn test_coincident_boxes_hit() {
        let result = intersect_boxes(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec2::splat(10.0),
            Vec3::ZERO,
            Vec3::ZERO,
            Vec2::splat(10.0),
        );
        assert!(result.is_some());
    }

    #[test]
    fn test_cubes_apart_miss() {
        let a = shape::box_vertices_3d(Vec3::ZERO, Vec3::ZERO, Vec3::splat(10.0));
        let b = shape::box_vertices_3d(Vec3::new(0.0, 20.0, 0.0), Vec3::ZERO, Vec3::splat(10.0));
        assert!(intersect_hulls(&a, &b).is_none());
    }

    #[test]
    fn test_cubes_overlapping_hit() {
        let a = shape::box_vertices_3d(Vec3::ZERO, Vec3::ZERO, Vec3::splat(10.0));
        let b = shape::box_vertices_3d(Vec3::new(0.0, 8.0, 0.0), Vec3::ZERO, Vec3::splat(10.0));
        assert!(intersect_hulls(&a, &b).is_some());
    }

    #[test]
    fn test_simplex_newest_first() {
        let mut simplex = Simplex::new();
        simplex.push_front(Vec3::X);
        simplex.push_front(Vec3::Y);
        simplex.push_front(Vec3::Z);

        assert_eq!(simplex.len(), 3);
        assert_eq!(simplex.points()[0], Vec3::Z);
        assert_eq!(simplex.points()[2], Vec3::X);
    }

    #[test]
    fn test_penetration_depth_and_direction() {
        // A 20-wide box one unit into a floor below it: the shortest
        // separation is straight down by the overlap amount.
        let a = quad(Vec3::new(0.0, -31.0, 0.0), Vec2::splat(20.0));
        let b = quad(Vec3::new(0.0, -50.0, 0.0), Vec2::splat(20.0));

        let simplex = intersect_planar(&a, &b, Vec3::new(0.0, 19.0, 0.0))
            .expect("overlapping boxes must collide");
        let push = penetration(&simplex, &a, &b);

        let eps = 1e-3;
        assert!(push.x.abs() < eps, "push = {push:?}");
        assert!((push.y - (-1.0)).abs() < eps, "push = {push:?}");
    }

    #[test]
    fn test_penetration_sideways() {
        // Overlap is smallest along X; the push must be horizontal, toward
        // the other body.
        let a = quad(Vec3::new(9.0, 0.0, 0.0), Vec2::splat(10.0));
        let b = quad(Vec3::ZERO, Vec2::splat(10.0));

        let simplex = intersect_planar(&a, &b, Vec3::new(9.0, 0.0, 0.0))
            .expect("overlapping boxes must collide");
        let push = penetration(&simplex, &a, &b);

        let eps = 1e-3;
        assert!((push.x - (-1.0)).abs() < eps, "push = {push:?}");
        assert!(push.y.abs() < eps, "push = {push:?}");
    }

    #[test]
    fn test_penetration_from_degenerate_simplex() {
        // Coincident centers short-circuit GJK with a sub-triangle simplex;
        // EPA must still produce a finite answer from the re-seeded
        // polytope.
        let a = quad(Vec3::ZERO, Vec2::splat(10.0));
        let b = quad(Vec3::ZERO, Vec2::splat(10.0));

        let simplex = intersect_planar(&a, &b, Vec3::ZERO).expect("coincident boxes collide");
        let push = penetration(&simplex, &a, &b);
        assert!(push.is_finite(), "push = {push:?}");
    }

    #[test]
    fn test_rotated_box_hit() {
        // A quad rotated 45 degrees reaches further along the diagonal than
        // its axis-aligned extent.
        let result = intersect_boxes(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 45.0),
            Vec2::new(10.0, 10.0),
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec2::new(10.0, 10.0),
        );
        assert!(result.is_some());

        // The same pair without rotation stays apart.
        let result = intersect_boxes(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec2::new(10.0, 10.0),
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec2::new(10.0, 10.0),
        );
        assert!(result.is_none());
    }
}
