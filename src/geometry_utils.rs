use nalgebra::Vector2;

use crate::Point2D;

pub fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    (x2 - x1).hypot(y2 - y1)
}

pub fn distance_points(a: &Point2D, b: &Point2D) -> f32 {
    let (x1, y1) = *a;
    let (x2, y2) = *b;

    distance(x1, y1, x2, y2)
}

pub fn to_vector(p: &Point2D) -> Vector2<f32> {
    Vector2::new(p.0, p.1)
}

pub fn to_point(v: &Vector2<f32>) -> Point2D {
    (v.x, v.y)
}

/// Closest point to `p` on the infinite line through `origin` and `towards`.
///
/// The result is not clamped to the segment; a point "beyond" either end projects
/// outside of it. Returns None if the two line points coincide.
pub fn project_onto_line(origin: &Point2D, towards: &Point2D, p: &Point2D) -> Option<Point2D> {
    let o = to_vector(origin);
    let direction = to_vector(towards) - o;
    // hypot rather than norm(): squaring overflows f32 long before the length does
    let length = direction.x.hypot(direction.y);
    if length == 0. || !length.is_finite() {
        return None;
    }
    let unit = direction / length;
    let t = (to_vector(p) - o).dot(&unit);
    Some(to_point(&(o + unit * t)))
}

/// Angle in degrees between two vectors, or None if either has zero length
fn angle_between(v1: Vector2<f32>, v2: Vector2<f32>) -> Option<f32> {
    let n1 = v1.norm();
    let n2 = v2.norm();
    if n1 == 0. || n2 == 0. {
        return None;
    }
    // Rounding can push the cosine just outside [-1,1]
    let cos_theta = (v1.dot(&v2) / (n1 * n2)).clamp(-1.0, 1.0);
    Some(cos_theta.acos().to_degrees())
}

/// The angle (in degrees) at `vertex`, formed by `a -> vertex -> c`
pub fn angle_at(a: &Point2D, vertex: &Point2D, c: &Point2D) -> Option<f32> {
    let v = to_vector(vertex);
    angle_between(to_vector(a) - v, to_vector(c) - v)
}

/// The angle (in degrees) between the lines `a_start -> a_end` and `b_start -> b_end`
pub fn angle_between_lines(
    a_start: &Point2D,
    a_end: &Point2D,
    b_start: &Point2D,
    b_end: &Point2D,
) -> Option<f32> {
    angle_between(
        to_vector(a_end) - to_vector(a_start),
        to_vector(b_end) - to_vector(b_start),
    )
}
