//! Fan triangulation of convex polygons
use crate::geometry::{FaceVertexRef, Triangle};

/// Split a polygon into triangles that all share its first vertex.
///
/// Fewer than three references yield no triangles. Winding order follows the
/// input. Concave polygons triangulate incorrectly.
pub fn triangulate(polygon: &[FaceVertexRef]) -> Vec<Triangle> {
    if polygon.len() < 3 {
        return Vec::new();
    }

    (1..polygon.len() - 1)
        .map(|i| [polygon[0], polygon[i], polygon[i + 1]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(len: i32) -> Vec<FaceVertexRef> {
        (0..len)
            .map(|i| FaceVertexRef::new(i, Some(i), None))
            .collect()
    }

    #[test]
    fn test_degenerate_polygons_dropped() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&polygon(1)).is_empty());
        assert!(triangulate(&polygon(2)).is_empty());
    }

    #[test]
    fn test_triangle_unchanged() {
        let input = polygon(3);
        assert_eq!(triangulate(&input), vec![[input[0], input[1], input[2]]]);
    }

    #[test]
    fn test_quad_fan() {
        let input = polygon(4);
        assert_eq!(
            triangulate(&input),
            vec![
                [input[0], input[1], input[2]],
                [input[0], input[2], input[3]],
            ]
        );
    }

    #[test]
    fn test_n_gon_has_n_minus_two_triangles() {
        for len in 3..12 {
            let input = polygon(len);
            let triangles = triangulate(&input);
            assert_eq!(triangles.len(), len as usize - 2);
            assert!(triangles.iter().all(|triangle| triangle[0] == input[0]));
        }
    }
}
