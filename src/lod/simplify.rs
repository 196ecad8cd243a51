//! Douglas-Peucker ring simplification.
//!
//! Runs on an explicit work stack instead of recursion so that long,
//! nearly collinear boundaries cannot exhaust the call stack.

use std::borrow::Cow;

use geo::Coord;

use super::distance::perpendicular_distance;
use crate::models::LayerPolicy;

/// Reduce a polyline, keeping its endpoints and every point that deviates
/// more than `tolerance` from the chord of its enclosing sub-range.
///
/// Inputs with two points or fewer are returned as-is.
pub fn simplify_polyline(points: &[Coord<f64>], tolerance: f64) -> Vec<Coord<f64>> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[last] = true;

    let mut stack = vec![(0, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (index, dmax) = farthest_point(points, start, end);
        if index > start && dmax > tolerance {
            kept[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    points
        .iter()
        .zip(&kept)
        .filter_map(|(p, keep)| keep.then_some(*p))
        .collect()
}

/// Interior point of `start..=end` farthest from the chord; first wins on ties.
fn farthest_point(points: &[Coord<f64>], start: usize, end: usize) -> (usize, f64) {
    let (a, b) = (points[start], points[end]);
    let mut index = start;
    let mut dmax = 0.0;

    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = perpendicular_distance(*p, a, b);
        if d > dmax {
            index = i;
            dmax = d;
        }
    }

    (index, dmax)
}

/// Simplify a ring and restore closure.
///
/// If the reduced ring's first and last points differ, the first point is
/// appended once, after the whole reduction.
pub fn simplify_ring(ring: &[Coord<f64>], tolerance: f64) -> Vec<Coord<f64>> {
    let mut simplified = simplify_polyline(ring, tolerance);
    if let (Some(&first), Some(&last)) = (simplified.first(), simplified.last()) {
        if first != last {
            simplified.push(first);
        }
    }
    simplified
}

/// Apply the layer policy gate: rings at or below the threshold are
/// borrowed back untouched.
pub fn simplify_if_needed<'a>(
    ring: &'a [Coord<f64>],
    policy: &LayerPolicy,
) -> Cow<'a, [Coord<f64>]> {
    if policy.should_simplify(ring.len()) {
        Cow::Owned(simplify_ring(ring, policy.tolerance))
    } else {
        Cow::Borrowed(ring)
    }
}
