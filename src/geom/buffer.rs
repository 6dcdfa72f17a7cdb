use std::f64::consts::TAU;

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

/// Vertices used to approximate the round join at each corner.
const ARC_SEGMENTS: usize = 32;

/// Grow `shape` outward by `distance`, with rounded corners.
///
/// Built as the union of the shape, a rectangle around every ring edge and a disc
/// at every vertex. Holes shrink by the same distance. A non-positive distance
/// returns the shape unchanged.
pub(crate) fn buffer(shape: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance.is_nan() || distance <= 0.0 || shape.0.is_empty() {
        return shape.clone();
    }

    let mut parts = vec![shape.clone()];
    for polygon in &shape.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for line in ring.lines() {
                if let Some(rect) = edge_rectangle(line.start, line.end, distance) {
                    parts.push(MultiPolygon(vec![rect]));
                }
            }
            for &coord in &ring.0 {
                parts.push(MultiPolygon(vec![disc(coord, distance)]));
            }
        }
    }

    union_all(parts)
}

/// Rectangle extending `distance` either side of the segment `a`-`b`.
fn edge_rectangle(a: Coord<f64>, b: Coord<f64>, distance: f64) -> Option<Polygon<f64>> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length = dx.hypot(dy);
    if length == 0.0 {
        return None;
    }
    let normal = Coord { x: -dy / length * distance, y: dx / length * distance };
    Some(Polygon::new(LineString(vec![a + normal, b + normal, b - normal, a - normal, a + normal]), vec![]))
}

/// Regular polygon inscribed in the circle of radius `distance` around `center`.
fn disc(center: Coord<f64>, distance: f64) -> Polygon<f64> {
    let mut ring: Vec<Coord<f64>> = (0..ARC_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / ARC_SEGMENTS as f64;
            Coord { x: center.x + distance * angle.cos(), y: center.y + distance * angle.sin() }
        })
        .collect();
    ring.push(ring[0]);
    Polygon::new(LineString(ring), vec![])
}

/// Union pairwise, level by level, so each union works on similarly sized inputs.
fn union_all(mut parts: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while parts.len() > 1 {
        parts = parts.chunks(2)
            .map(|pair| match pair {
                [a, b] => a.union(b),
                [a] => a.clone(),
                _ => MultiPolygon(vec![]),
            })
            .collect();
    }
    parts.pop().unwrap_or_else(|| MultiPolygon(vec![]))
}
