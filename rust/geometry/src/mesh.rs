// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::{Error, Result};
use nalgebra::{Matrix4, Point3};

/// Indexed triangle mesh as produced by the tessellation engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2), 0-based
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions
            .extend_from_slice(&[position.x, position.y, position.z]);
        index
    }

    /// Add a triangle by vertex indices
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Vertex position by index
    #[inline]
    pub fn vertex(&self, index: u32) -> Option<Point3<f64>> {
        let base = index as usize * 3;
        let p = self.positions.get(base..base + 3)?;
        Some(Point3::new(p[0], p[1], p[2]))
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|index| index + offset));
    }

    /// Apply a transformation matrix to all positions
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = matrix.transform_point(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk.copy_from_slice(&[p.x, p.y, p.z]);
        }
    }

    /// Dereference every index triple into a [`Triangle`]
    ///
    /// An index past the vertex buffer yields [`Error::IndexOutOfRange`].
    pub fn triangles(&self) -> impl Iterator<Item = Result<Triangle>> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            let point = |index: u32| {
                self.vertex(index).ok_or(Error::IndexOutOfRange {
                    index: i64::from(index),
                    vertex_count: self.vertex_count(),
                })
            };
            Ok(Triangle::new(point(tri[0])?, point(tri[1])?, point(tri[2])?))
        })
    }
}

/// Three independent points; no adjacency is kept
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f64>; 3],
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Vertex coordinates split per axis: (xs, ys, zs)
    pub fn axes(&self) -> ([f64; 3], [f64; 3], [f64; 3]) {
        let [a, b, c] = self.vertices;
        ([a.x, b.x, c.x], [a.y, b.y, c.y], [a.z, b.z, c.z])
    }
}

/// Ordered triangles gathered across a whole model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceList {
    triangles: Vec<Triangle>,
}

impl FaceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Append every triangle of `mesh`, all or nothing
    ///
    /// Returns the number of triangles added.
    pub fn extend_from_mesh(&mut self, mesh: &Mesh) -> Result<usize> {
        let triangles = mesh.triangles().collect::<Result<Vec<_>>>()?;
        let added = triangles.len();
        self.triangles.extend(triangles);
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    pub fn as_slice(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl From<Vec<Triangle>> for FaceList {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl<'a> IntoIterator for &'a FaceList {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_triangle() -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_triangles_dereference_indices() {
        let mesh = unit_triangle();
        let triangles: Vec<Triangle> = mesh.triangles().collect::<Result<_>>().unwrap();
        assert_eq!(
            triangles,
            vec![Triangle::new(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            )]
        );
    }

    #[test]
    fn test_out_of_range_index() {
        let mut mesh = unit_triangle();
        mesh.add_triangle(0, 1, 7);

        let mut faces = FaceList::new();
        let err = faces.extend_from_mesh(&mesh).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                index: 7,
                vertex_count: 3
            }
        ));
        assert!(faces.is_empty(), "a failing mesh adds nothing");
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut mesh = unit_triangle();
        mesh.merge(&unit_triangle());
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_transform() {
        let mut mesh = unit_triangle();
        mesh.transform(&Matrix4::new_translation(&Vector3::new(10.0, 0.0, 2.0)));
        let p = mesh.vertex(1).unwrap();
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.z, 2.0);
    }

    #[test]
    fn test_triangle_axes() {
        let t = Triangle::new(
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(4.0, 5.0, 6.0),
            Point3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(t.axes(), ([1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]));
    }
}
