// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for planar 3D polygons with optional holes.

use crate::{Error, Point3, Result, Vector3};

/// Newell normal of a closed loop (not normalized)
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    for (i, p0) in points.iter().enumerate() {
        let p1 = &points[(i + 1) % points.len()];
        normal.x += (p0.y - p1.y) * (p0.z + p1.z);
        normal.y += (p0.z - p1.z) * (p0.x + p1.x);
        normal.z += (p0.x - p1.x) * (p0.y + p1.y);
    }
    normal
}

/// Drop the dominant axis of `normal` to project onto a 2D plane
#[inline]
fn project(point: &Point3<f64>, normal: &Vector3<f64>) -> [f64; 2] {
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    if az >= ax && az >= ay {
        [point.x, point.y]
    } else if ay >= ax {
        [point.x, point.z]
    } else {
        [point.y, point.z]
    }
}

/// Triangulate a planar polygon given as 3D loops
///
/// Returns index triples into the concatenation `outer ++ holes[0] ++ ...`,
/// wound to agree with the outer loop's normal. Holes with fewer than three
/// points are ignored.
pub fn triangulate_polygon_3d(
    outer: &[Point3<f64>],
    holes: &[Vec<Point3<f64>>],
) -> Result<Vec<[usize; 3]>> {
    let n = outer.len();
    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }

    let normal = newell_normal(outer);

    // FAST PATH: Triangle - no triangulation needed
    if n == 3 && holes.is_empty() {
        return Ok(vec![[0, 1, 2]]);
    }

    let valid_holes: Vec<&Vec<Point3<f64>>> = holes.iter().filter(|h| h.len() >= 3).collect();
    let total = n + valid_holes.iter().map(|h| h.len()).sum::<usize>();

    // Skipped holes must not shift indices of later loops
    let mut offsets = Vec::with_capacity(valid_holes.len());
    let mut vertices = Vec::with_capacity(total * 2);
    let mut index_map = Vec::with_capacity(total);

    vertices.extend(outer.iter().flat_map(|p| project(p, &normal)));
    index_map.extend(0..n);

    let mut source_offset = n;
    for hole in holes {
        if hole.len() >= 3 {
            offsets.push(index_map.len());
            vertices.extend(hole.iter().flat_map(|p| project(p, &normal)));
            index_map.extend(source_offset..source_offset + hole.len());
        }
        source_offset += hole.len();
    }

    let points: Vec<&Point3<f64>> = outer
        .iter()
        .chain(holes.iter().flatten())
        .collect();

    let indices = earcutr::earcut(&vertices, &offsets, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    let mut triangles = Vec::with_capacity(indices.len() / 3);
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [index_map[tri[0]], index_map[tri[1]], index_map[tri[2]]];

        // earcut works in the projected plane; restore the 3D winding
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let face_normal = (pb - pa).cross(&(pc - pa));
        if face_normal.dot(&normal) < 0.0 {
            triangles.push([a, c, b]);
        } else {
            triangles.push([a, b, c]);
        }
    }

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64, size: f64, offset: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(offset, offset, z),
            Point3::new(offset + size, offset, z),
            Point3::new(offset + size, offset + size, z),
            Point3::new(offset, offset + size, z),
        ]
    }

    #[test]
    fn test_triangle_fast_path() {
        let tri = triangulate_polygon_3d(&square(0.0, 1.0, 0.0)[..3], &[]).unwrap();
        assert_eq!(tri, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_quad() {
        let tris = triangulate_polygon_3d(&square(0.0, 1.0, 0.0), &[]).unwrap();
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn test_vertical_polygon_keeps_winding() {
        // Square in the XZ plane, normal pointing -Y
        let outer = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let expected = newell_normal(&outer);
        for [a, b, c] in triangulate_polygon_3d(&outer, &[]).unwrap() {
            let n = (outer[b] - outer[a]).cross(&(outer[c] - outer[a]));
            assert!(n.dot(&expected) > 0.0);
        }
    }

    #[test]
    fn test_polygon_with_hole() {
        let mut hole = square(0.0, 1.0, 1.0);
        hole.reverse();
        let tris = triangulate_polygon_3d(&square(0.0, 3.0, 0.0), &[hole]).unwrap();
        // Square ring: 8 vertices, 8 triangles
        assert_eq!(tris.len(), 8);
        assert!(tris.iter().flatten().all(|&i| i < 8));
    }

    #[test]
    fn test_degenerate_outer() {
        assert!(triangulate_polygon_3d(&square(0.0, 1.0, 0.0)[..2], &[]).is_err());
    }
}
