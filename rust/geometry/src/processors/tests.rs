// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for geometry processors.

use super::*;
use crate::router::GeometryProcessor;
use crate::Error;
use ifc_facets_core::IfcModel;

fn model(data: &str) -> IfcModel {
    IfcModel::parse(&format!("ISO-10303-21;\nDATA;\n{}\nENDSEC;\n", data)).unwrap()
}

#[test]
fn test_triangulated_face_set() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.0,0.0,0.0),(100.0,0.0,0.0),(50.0,100.0,0.0)));
#2=IFCTRIANGULATEDFACESET(#1,$,$,((1,2,3)),$);"#,
    );
    let processor = TriangulatedFaceSetProcessor::new();

    let mesh = processor.process(model.get(2).unwrap(), &model).unwrap();

    assert_eq!(mesh.positions.len(), 9); // 3 vertices * 3 coordinates
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn test_triangulated_face_set_pn_index() {
    // PnIndex remaps CoordIndex values into the point list
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((9.,9.,9.),(0.,0.,0.),(1.,0.,0.),(0.,1.,0.)));
#2=IFCTRIANGULATEDFACESET(#1,$,.F.,((1,2,3)),(2,3,4));"#,
    );
    let mesh = TriangulatedFaceSetProcessor::new()
        .process(model.get(2).unwrap(), &model)
        .unwrap();

    assert_eq!(mesh.indices, vec![1, 2, 3]);
}

#[test]
fn test_triangulated_face_set_pn_index_extreme_values() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(0.,1.,0.)));
#2=IFCTRIANGULATEDFACESET(#1,$,.F.,((1,2,-9223372036854775808)),(1,2,3));
#3=IFCTRIANGULATEDFACESET(#1,$,.F.,((1,2,4)),(1,2,3));"#,
    );
    let processor = TriangulatedFaceSetProcessor::new();

    let err = processor.process(model.get(2).unwrap(), &model).unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfRange {
            index: i64::MIN,
            vertex_count: 3
        }
    ));

    let err = processor.process(model.get(3).unwrap(), &model).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 4, .. }));
}

#[test]
fn test_triangulated_face_set_index_out_of_range() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(0.,1.,0.)));
#2=IFCTRIANGULATEDFACESET(#1,$,$,((1,2,3),(1,2,4)),$);
#3=IFCTRIANGULATEDFACESET(#1,$,$,((0,1,2)),$);"#,
    );
    let processor = TriangulatedFaceSetProcessor::new();

    let err = processor.process(model.get(2).unwrap(), &model).unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfRange {
            index: 4,
            vertex_count: 3
        }
    ));

    let err = processor.process(model.get(3).unwrap(), &model).unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 0, .. }));
}

#[test]
fn test_triangulated_face_set_requires_point_list() {
    let model = model(
        r#"#1=IFCCARTESIANPOINT((0.,0.,0.));
#2=IFCTRIANGULATEDFACESET(#1,$,$,((1,1,1)),$);"#,
    );
    let err = TriangulatedFaceSetProcessor::new()
        .process(model.get(2).unwrap(), &model)
        .unwrap_err();
    assert!(err.to_string().contains("IfcCartesianPointList3D"));
}

#[test]
fn test_triangulated_irregular_network() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.),(0.,1.,0.)));
#2=IFCTRIANGULATEDIRREGULARNETWORK(#1,$,$,((1,2,3),(1,3,4)),$,(1,1));"#,
    );
    let processor = TriangulatedFaceSetProcessor::new();
    assert!(processor
        .supported_types()
        .contains(&ifc_facets_core::IfcType::IfcTriangulatedIrregularNetwork));

    let mesh = processor.process(model.get(2).unwrap(), &model).unwrap();
    assert_eq!(mesh.triangle_count(), 2);
}

#[test]
fn test_polygonal_face_set_quad() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.),(0.,1.,0.)));
#2=IFCINDEXEDPOLYGONALFACE((1,2,3,4));
#3=IFCPOLYGONALFACESET(#1,.T.,(#2),$);"#,
    );
    let mesh = PolygonalFaceSetProcessor::new()
        .process(model.get(3).unwrap(), &model)
        .unwrap();

    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.indices.iter().all(|&i| i < 4));
}

#[test]
fn test_polygonal_face_set_with_void() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(3.,0.,0.),(3.,3.,0.),(0.,3.,0.),(1.,1.,0.),(1.,2.,0.),(2.,2.,0.),(2.,1.,0.)));
#2=IFCINDEXEDPOLYGONALFACEWITHVOIDS((1,2,3,4),((5,6,7,8)));
#3=IFCPOLYGONALFACESET(#1,.T.,(#2),$);"#,
    );
    let mesh = PolygonalFaceSetProcessor::new()
        .process(model.get(3).unwrap(), &model)
        .unwrap();

    assert_eq!(mesh.triangle_count(), 8);
    // Every hole vertex is used
    for v in 4..8u32 {
        assert!(mesh.indices.contains(&v));
    }
}

#[test]
fn test_polygonal_face_set_bad_index() {
    let model = model(
        r#"#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(1.,1.,0.)));
#2=IFCINDEXEDPOLYGONALFACE((1,2,5));
#3=IFCPOLYGONALFACESET(#1,.T.,(#2),$);"#,
    );
    let err = PolygonalFaceSetProcessor::new()
        .process(model.get(3).unwrap(), &model)
        .unwrap_err();
    assert!(matches!(err, Error::IndexOutOfRange { index: 5, .. }));
}
