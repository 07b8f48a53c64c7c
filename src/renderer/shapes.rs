//! Shape tessellation for 2D primitives
//!
//! Every generator appends triangles to a caller-owned buffer so one frame
//! reuses a single allocation.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

fn push_tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

fn on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::new(radius * theta.cos(), radius * theta.sin())
}

/// Filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;
        push_tri(
            out,
            center,
            on_circle(center, radius, theta1),
            on_circle(center, radius, theta2),
            color,
        );
    }
}

/// Hollow circle band
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = i as f32 / segments as f32 * TAU;
        let theta2 = (i + 1) as f32 / segments as f32 * TAU;

        let inner1 = on_circle(center, inner_radius, theta1);
        let outer1 = on_circle(center, outer_radius, theta1);
        let inner2 = on_circle(center, inner_radius, theta2);
        let outer2 = on_circle(center, outer_radius, theta2);

        push_tri(out, inner1, outer1, inner2, color);
        push_tri(out, inner2, outer1, outer2, color);
    }
}

/// Axis-aligned filled rectangle
pub fn rect(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, color: [f32; 4]) {
    let tr = Vec2::new(max.x, min.y);
    let bl = Vec2::new(min.x, max.y);
    push_tri(out, min, tr, bl, color);
    push_tri(out, bl, tr, max, color);
}

/// Rectangle border of the given thickness, drawn inside the bounds
pub fn rect_outline(out: &mut Vec<Vertex>, min: Vec2, max: Vec2, thickness: f32, color: [f32; 4]) {
    let t = thickness;
    rect(out, min, Vec2::new(max.x, min.y + t), color);
    rect(out, Vec2::new(min.x, max.y - t), max, color);
    rect(out, Vec2::new(min.x, min.y + t), Vec2::new(min.x + t, max.y - t), color);
    rect(out, Vec2::new(max.x - t, min.y + t), Vec2::new(max.x, max.y - t), color);
}

/// Straight segment of the given width
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    push_tri(out, a + perp, a - perp, b + perp, color);
    push_tri(out, b + perp, a - perp, b - perp, color);
}

/// Curved blade pointing along `facing`: an outer flame-colored crescent
/// with a pale inner edge
pub fn blade(
    out: &mut Vec<Vertex>,
    center: Vec2,
    facing: f32,
    size: f32,
    outer: [f32; 4],
    inner: [f32; 4],
) {
    let fwd = Vec2::from_angle(facing);
    let side = fwd.perp();

    let tip = center + fwd * size;
    let heel = center - fwd * (size * 0.3);
    let belly = center + side * (size * 0.45) + fwd * (size * 0.2);
    let spine = center - side * (size * 0.1) + fwd * (size * 0.3);
    push_tri(out, heel, belly, tip, outer);
    push_tri(out, heel, tip, spine, outer);

    let inner_tip = center + fwd * (size * 0.6);
    let inner_belly = center + side * (size * 0.25) + fwd * (size * 0.15);
    push_tri(out, center - fwd * (size * 0.2), inner_belly, inner_tip, inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: [f32; 4] = [1.0; 4];

    #[test]
    fn test_vertex_counts() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 10.0, C, 16);
        assert_eq!(out.len(), 16 * 3);

        out.clear();
        ring(&mut out, Vec2::ZERO, 5.0, 10.0, C, 16);
        assert_eq!(out.len(), 16 * 6);

        out.clear();
        rect_outline(&mut out, Vec2::ZERO, Vec2::splat(30.0), 2.0, C);
        assert_eq!(out.len(), 4 * 6);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let mut out = Vec::new();
        let center = Vec2::new(50.0, -20.0);
        circle(&mut out, center, 8.0, C, 12);
        for v in &out {
            let d = Vec2::from(v.position).distance(center);
            assert!(d <= 8.0 + 1e-3);
        }
    }

    #[test]
    fn test_blade_tip_points_forward() {
        let mut out = Vec::new();
        blade(&mut out, Vec2::ZERO, 0.0, 60.0, C, C);
        let max_x = out
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert!((max_x - 60.0).abs() < 1e-3);
    }
}
