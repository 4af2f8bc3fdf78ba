// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene building: one blue, half-transparent mesh3d trace per face.

use crate::types::{Layout, MeshTrace, Scene, FACE_COLOR, FACE_OPACITY, TRACE_TYPE};
use ifc_facets_geometry::Triangle;

/// Build the trace of a single face.
pub fn face_trace(face: &Triangle) -> MeshTrace {
    let (x, y, z) = face.axes();
    MeshTrace {
        trace_type: TRACE_TYPE.to_string(),
        x,
        y,
        z,
        color: FACE_COLOR.to_string(),
        opacity: FACE_OPACITY,
    }
}

/// Build the figure for `faces`, one trace per face in order.
///
/// An empty input gives a scene with no traces.
pub fn build_scene<'a>(faces: impl IntoIterator<Item = &'a Triangle>) -> Scene {
    Scene {
        data: faces.into_iter().map(face_trace).collect(),
        layout: Layout::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_facets_geometry::{FaceList, Point3};

    fn face(offset: f64) -> Triangle {
        Triangle::new(
            Point3::new(offset, 0.0, 0.0),
            Point3::new(offset + 1.0, 0.0, 0.0),
            Point3::new(offset, 1.0, 0.5),
        )
    }

    #[test]
    fn test_one_trace_per_face_in_order() {
        let faces: FaceList = vec![face(0.0), face(10.0), face(20.0)].into();
        let scene = build_scene(&faces);

        assert_eq!(scene.trace_count(), 3);
        let firsts: Vec<f64> = scene.data.iter().map(|trace| trace.x[0]).collect();
        assert_eq!(firsts, vec![0.0, 10.0, 20.0]);
        assert_eq!(scene.data[0].z, [0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_uniform_styling() {
        let faces: FaceList = vec![face(0.0), face(1.0)].into();
        for trace in build_scene(&faces).data {
            assert_eq!(trace.trace_type, "mesh3d");
            assert_eq!(trace.color, "blue");
            assert_eq!(trace.opacity, 0.5);
        }
    }

    #[test]
    fn test_idempotent() {
        let faces: FaceList = vec![face(0.0), face(3.0)].into();
        assert_eq!(build_scene(&faces), build_scene(&faces));
    }

    #[test]
    fn test_empty_input_gives_empty_scene() {
        let scene = build_scene(&FaceList::new());
        assert!(scene.data.is_empty());
        assert!(!scene.layout.scene.zaxis.showbackground);
    }

    #[test]
    fn test_serialized_shape() {
        let faces: FaceList = vec![face(0.0)].into();
        let json = serde_json::to_value(build_scene(&faces)).unwrap();

        assert_eq!(json["data"][0]["type"], "mesh3d");
        assert_eq!(json["data"][0]["x"], serde_json::json!([0.0, 1.0, 0.0]));
        for axis in ["xaxis", "yaxis", "zaxis"] {
            assert_eq!(json["layout"]["scene"][axis]["showbackground"], false);
        }
    }
}
