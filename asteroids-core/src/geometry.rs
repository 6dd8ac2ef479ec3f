//! Plane geometry and random-shape helpers shared by every entity kind.
//!
//! Conventions:
//! - positions and velocities are `f64` pixels and pixels per tick
//! - angles are radians, 0 pointing along +x, growing clockwise on screen
//! - the wrap domain is `[0, width) x [0, height)`

use crate::config::Viewport;
use crate::rng::SeededRng;

/// Euclidean distance between two points.
#[inline]
pub fn dist_between(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    (bx - ax).hypot(by - ay)
}

/// Circle/circle overlap on center distance. Asteroid silhouettes are drawn
/// jagged but always collide as circles of radius `size`.
#[inline]
pub fn circles_overlap(ax: f64, ay: f64, ar: f64, bx: f64, by: f64, br: f64) -> bool {
    dist_between(ax, ay, bx, by) < ar + br
}

/// Folds a coordinate into `[0, extent)`, carrying any overshoot across the
/// opposite edge.
#[inline]
pub fn wrap_coord(value: f64, extent: f64) -> f64 {
    if (0.0..extent).contains(&value) {
        return value;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

#[inline]
pub fn wrap_position(x: f64, y: f64, viewport: &Viewport) -> (f64, f64) {
    (wrap_coord(x, viewport.width), wrap_coord(y, viewport.height))
}

/// True once a point has left the viewport rectangle. Points on the edge are
/// still inside.
#[inline]
pub fn outside_viewport(x: f64, y: f64, viewport: &Viewport) -> bool {
    x < 0.0 || x > viewport.width || y < 0.0 || y > viewport.height
}

/// True once a point is more than `margin` outside the viewport rectangle.
#[inline]
pub fn beyond_viewport(x: f64, y: f64, margin: f64, viewport: &Viewport) -> bool {
    x < -margin || x > viewport.width + margin || y < -margin || y > viewport.height + margin
}

/// Components of a vector of length `magnitude` pointing along `angle`.
#[inline]
pub fn heading(angle: f64, magnitude: f64) -> (f64, f64) {
    (angle.cos() * magnitude, angle.sin() * magnitude)
}

#[inline]
pub fn speed(vx: f64, vy: f64) -> f64 {
    vx.hypot(vy)
}

/// Rescales a velocity so its length does not exceed `max`, keeping its
/// direction.
#[inline]
pub fn clamp_speed(vx: f64, vy: f64, max: f64) -> (f64, f64) {
    let current = speed(vx, vy);
    if current <= max || current == 0.0 {
        return (vx, vy);
    }
    let scale = max / current;
    (vx * scale, vy * scale)
}

/// Uniform draw in `[min, max)`.
#[inline]
pub fn random_between(rng: &mut SeededRng, min: f64, max: f64) -> f64 {
    min + rng.next_f64() * (max - min)
}

/// Uniform draw in `[-magnitude, magnitude)`.
#[inline]
pub fn random_symmetric(rng: &mut SeededRng, magnitude: f64) -> f64 {
    rng.next_f64() * magnitude * 2.0 - magnitude
}

/// Vertex count for a new asteroid outline: centred on `base_verts`, spread
/// over `base_verts / 2 ..= base_verts * 3 / 2`.
pub fn polygon_vertex_count(rng: &mut SeededRng, base_verts: u32) -> u32 {
    let base = f64::from(base_verts);
    (rng.next_f64() * (base + 1.0) + base / 2.0).floor() as u32
}

/// One multiplicative radius perturbation per vertex, each in
/// `[1 - jag, 1 + jag)`.
pub fn jag_offsets(rng: &mut SeededRng, verts: u32, jag: f64) -> Vec<f64> {
    (0..verts)
        .map(|_| rng.next_f64() * jag * 2.0 + 1.0 - jag)
        .collect()
}
