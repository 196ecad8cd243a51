use geo::Coord;

/// Distance from `p` to the segment `a`-`b`.
///
/// The projection of `p` is clamped to the segment, so points beyond
/// either end measure to the nearer endpoint. When `a` and `b` coincide
/// this is the distance from `p` to `a`.
pub fn perpendicular_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let ap = p - a;
    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;

    if length_sq == 0.0 {
        return ap.x.hypot(ap.y);
    }

    let t = (ap.x * ab.x + ap.y * ab.y) / length_sq;
    let closest = if t < 0.0 {
        a
    } else if t > 1.0 {
        b
    } else {
        a + ab * t
    };

    let d = p - closest;
    d.x.hypot(d.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_distance_to_segment_interior() {
        let d = perpendicular_distance(c(1.0, 2.0), c(0.0, 0.0), c(4.0, 0.0));
        assert_eq!(d, 2.0);
    }

    #[test]
    fn test_distance_clamped_to_endpoints() {
        // Beyond b: measures to b, not to the infinite line
        let d = perpendicular_distance(c(7.0, 4.0), c(0.0, 0.0), c(4.0, 0.0));
        assert_eq!(d, 5.0);

        // Before a
        let d = perpendicular_distance(c(-3.0, -4.0), c(0.0, 0.0), c(4.0, 0.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_zero_length_segment() {
        let d = perpendicular_distance(c(3.0, 4.0), c(0.0, 0.0), c(0.0, 0.0));
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_point_on_segment() {
        let d = perpendicular_distance(c(1.0, 0.0), c(0.0, 0.0), c(2.0, 0.0));
        assert_eq!(d, 0.0);
    }
}
