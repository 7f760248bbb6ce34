//! Integration tests for u-cutlist-projection.

use nalgebra::{Point3, Vector3};
use u_cutlist_core::geometry::{net_area, rectangle, signed_area};
use u_cutlist_core::{BooleanOps, Error, OverlayBoolean, Path2, PolyTree, Result};
use u_cutlist_projection::{
    Bounds3, Face, LayerType, ProjectionConfig, ProjectionFrame, ProjectionResult, Projector,
    Scene,
};

fn rect_loop(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Vec<Point3<f64>> {
    vec![
        Point3::new(x0, y0, z),
        Point3::new(x1, y0, z),
        Point3::new(x1, y1, z),
        Point3::new(x0, y1, z),
    ]
}

/// Six faces of an axis-aligned box.
fn box_faces(min: [f64; 3], max: [f64; 3]) -> Vec<Face> {
    let [x0, y0, z0] = min;
    let [x1, y1, z1] = max;
    vec![
        Face::new(Vector3::z()).with_outer(rect_loop(x0, y0, x1, y1, z1)),
        Face::new(-Vector3::z()).with_outer(rect_loop(x0, y0, x1, y1, z0)),
        Face::new(Vector3::x()).with_outer(vec![
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x1, y1, z1),
            Point3::new(x1, y0, z1),
        ]),
        Face::new(-Vector3::x()).with_outer(vec![
            Point3::new(x0, y0, z0),
            Point3::new(x0, y0, z1),
            Point3::new(x0, y1, z1),
            Point3::new(x0, y1, z0),
        ]),
        Face::new(Vector3::y()).with_outer(vec![
            Point3::new(x0, y1, z0),
            Point3::new(x0, y1, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x1, y1, z0),
        ]),
        Face::new(-Vector3::y()).with_outer(vec![
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y0, z1),
            Point3::new(x0, y0, z1),
        ]),
    ]
}

/// 100x100x20 plate with a 10x10 through-hole centered at (50, 50).
fn plate_with_through_hole() -> Scene {
    let hole = rect_loop(45.0, 45.0, 55.0, 55.0, 20.0);
    let mut bottom_hole = hole.clone();
    for p in &mut bottom_hole {
        p.z = 0.0;
    }
    let faces = vec![
        Face::new(Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 20.0))
            .with_hole(hole),
        Face::new(-Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 0.0))
            .with_hole(bottom_hole),
        // hole walls
        Face::new(Vector3::x()).with_outer(vec![
            Point3::new(45.0, 45.0, 0.0),
            Point3::new(45.0, 55.0, 0.0),
            Point3::new(45.0, 55.0, 20.0),
            Point3::new(45.0, 45.0, 20.0),
        ]),
        Face::new(-Vector3::x()).with_outer(vec![
            Point3::new(55.0, 45.0, 0.0),
            Point3::new(55.0, 45.0, 20.0),
            Point3::new(55.0, 55.0, 20.0),
            Point3::new(55.0, 55.0, 0.0),
        ]),
    ];
    Scene::new(Bounds3::new(
        Point3::origin(),
        Point3::new(100.0, 100.0, 20.0),
    ))
    .with_faces(faces)
}

/// 100x100x20 plate with a 40x40 pocket of depth 10 whose floor has a
/// 10x10 through-hole.
fn plate_with_pocket_and_hole() -> Scene {
    let faces = vec![
        Face::new(Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 20.0))
            .with_hole(rect_loop(30.0, 30.0, 70.0, 70.0, 20.0)),
        Face::new(Vector3::z())
            .with_outer(rect_loop(30.0, 30.0, 70.0, 70.0, 10.0))
            .with_hole(rect_loop(45.0, 45.0, 55.0, 55.0, 10.0)),
        Face::new(-Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 0.0))
            .with_hole(rect_loop(45.0, 45.0, 55.0, 55.0, 0.0)),
    ];
    Scene::new(Bounds3::new(
        Point3::origin(),
        Point3::new(100.0, 100.0, 20.0),
    ))
    .with_faces(faces)
}

/// 100x100x20 frame with a 40x40 through-hole and a 10x10 pin standing in
/// its middle at full height.
fn frame_with_pin() -> Scene {
    let faces = vec![
        Face::new(Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 20.0))
            .with_hole(rect_loop(30.0, 30.0, 70.0, 70.0, 20.0)),
        Face::new(Vector3::z()).with_outer(rect_loop(45.0, 45.0, 55.0, 55.0, 20.0)),
        Face::new(-Vector3::z())
            .with_outer(rect_loop(0.0, 0.0, 100.0, 100.0, 0.0))
            .with_hole(rect_loop(30.0, 30.0, 70.0, 70.0, 0.0)),
        Face::new(-Vector3::z()).with_outer(rect_loop(45.0, 45.0, 55.0, 55.0, 0.0)),
    ];
    Scene::new(Bounds3::new(
        Point3::origin(),
        Point3::new(100.0, 100.0, 20.0),
    ))
    .with_faces(faces)
}

fn assert_strictly_ascending(result: &ProjectionResult) {
    let depths = result.depths();
    for pair in depths.windows(2) {
        assert!(pair[0] < pair[1], "depths not strictly ascending: {:?}", depths);
    }
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_cube_projects_to_single_default_layer() {
        let scene = Scene::from_faces(box_faces([0.0; 3], [10.0, 10.0, 10.0])).unwrap();
        let result = Projector::new(ProjectionConfig::new().with_merge_holes(false))
            .project(&scene)
            .unwrap();

        assert_eq!(result.layers.len(), 1);
        let layer = &result.layers[0];
        assert_eq!(layer.layer_type, LayerType::Default);
        assert_eq!(layer.depth, 0.0);
        assert_eq!(layer.polygons.len(), 1);
        assert!(layer.polygons[0].is_outer);
        assert!((layer.area() - 100.0).abs() < 1e-6);
        assert!((result.max_depth - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_through_hole_without_merge() {
        let result = Projector::default_config()
            .project(&plate_with_through_hole())
            .unwrap();

        assert_eq!(result.layers.len(), 1);
        let layer = &result.layers[0];
        assert_eq!(layer.polygons.len(), 2);
        assert_eq!(layer.polygons.iter().filter(|p| p.is_outer).count(), 1);
        assert_eq!(layer.polygons.iter().filter(|p| !p.is_outer).count(), 1);
        assert!((layer.area() - 9900.0).abs() < 1e-6);
    }

    #[test]
    fn test_hole_merge_round_trip() {
        let result = Projector::new(ProjectionConfig::new().with_merge_holes(true))
            .project(&plate_with_through_hole())
            .unwrap();

        assert_eq!(result.layers.len(), 2);
        assert_eq!(result.layers[0].layer_type, LayerType::Outer);
        assert!((result.layers[0].area() - 10000.0).abs() < 1e-6);

        let holes: Vec<_> = result.layers_of_type(LayerType::Holes).collect();
        assert_eq!(holes.len(), 1);
        let holes = holes[0];
        assert!((holes.depth - 20.0).abs() < 1e-6);
        assert_eq!(holes.polygons.len(), 1);
        assert!((holes.area() - 100.0).abs() < 1e-6);

        // geometrically equal to the hole boundary
        let ops = OverlayBoolean::new();
        let expected = vec![rectangle(45.0, 45.0, 10.0, 10.0)];
        let xor_a = ops.difference(&holes.paths(), &expected).unwrap();
        let xor_b = ops.difference(&expected, &holes.paths()).unwrap();
        assert!(net_area(&xor_a).abs() < 1e-6);
        assert!(net_area(&xor_b).abs() < 1e-6);
    }

    #[test]
    fn test_hole_merge_with_island_in_through_hole() {
        let result = Projector::new(ProjectionConfig::new().with_merge_holes(true))
            .project(&frame_with_pin())
            .unwrap();
        assert_strictly_ascending(&result);

        let outer = result.layers_of_type(LayerType::Outer).next().unwrap();
        assert_eq!(outer.depth, 0.0);
        assert!((outer.area() - 10000.0).abs() < 1e-6);

        let holes = result.layers_of_type(LayerType::Holes).next().unwrap();
        assert!((holes.depth - 20.0).abs() < 1e-6);
        assert!((holes.area() - 1500.0).abs() < 1e-6);

        // the pin is not cut through
        let ops = OverlayBoolean::new();
        let pin = vec![rectangle(45.0, 45.0, 10.0, 10.0)];
        let overlap = ops.intersection(&holes.paths(), &pin).unwrap();
        assert!(net_area(&overlap).abs() < 1e-6);
    }

    #[test]
    fn test_hole_absent_from_intermediate_layer() {
        let result = Projector::new(ProjectionConfig::new().with_merge_holes(true))
            .project(&plate_with_pocket_and_hole())
            .unwrap();
        assert_strictly_ascending(&result);

        let types: Vec<LayerType> = result.layers.iter().map(|l| l.layer_type).collect();
        assert_eq!(
            types,
            vec![LayerType::Outer, LayerType::Default, LayerType::Holes]
        );

        let pocket = &result.layers[1];
        assert!((pocket.depth - 10.0).abs() < 1e-6);
        assert!((pocket.area() - 1500.0).abs() < 1e-6);

        let ops = OverlayBoolean::new();
        let hole = vec![rectangle(45.0, 45.0, 10.0, 10.0)];
        let overlap = ops.intersection(&pocket.paths(), &hole).unwrap();
        assert!(net_area(&overlap).abs() < 1e-6);

        let holes = result.layers_of_type(LayerType::Holes).next().unwrap();
        assert!((holes.area() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_stepped_block() {
        let mut faces = box_faces([0.0, 0.0, 0.0], [100.0, 50.0, 10.0]);
        faces.extend(box_faces([0.0, 0.0, 10.0], [50.0, 50.0, 20.0]));
        let scene = Scene::from_faces(faces).unwrap();
        let result = Projector::default_config().project(&scene).unwrap();

        assert_eq!(result.layers.len(), 2);
        assert_eq!(result.layers[0].depth, 0.0);
        assert!((result.layers[0].area() - 2500.0).abs() < 1e-6);
        assert!((result.layers[1].depth - 10.0).abs() < 1e-6);
        assert!((result.layers[1].area() - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn test_side_view() {
        let scene = Scene::from_faces(box_faces([0.0; 3], [30.0, 20.0, 10.0]))
            .unwrap()
            .with_reference_normal(Vector3::x());
        let result = Projector::default_config().project(&scene).unwrap();
        assert_eq!(result.layers.len(), 1);
        assert!((result.layers[0].area() - 200.0).abs() < 1e-6);
        assert!((result.max_depth - 30.0).abs() < 1e-9);
    }
}

mod property_tests {
    use super::*;

    fn raw_footprint(scene: &Scene) -> f64 {
        let frame = ProjectionFrame::new(&scene.reference_normal, &scene.bounds).unwrap();
        let ops = OverlayBoolean::new();
        let paths: Vec<Path2> = scene
            .faces
            .iter()
            .flat_map(|f| u_cutlist_projection::bucket::face_paths(f, &frame))
            .filter(|p| signed_area(p).abs() > 1e-9)
            .collect();
        net_area(&ops.union(&paths).unwrap())
    }

    #[test]
    fn test_occlusion_monotonicity() {
        let mut faces = box_faces([0.0, 0.0, 0.0], [100.0, 50.0, 10.0]);
        faces.extend(box_faces([20.0, 10.0, 10.0], [60.0, 40.0, 25.0]));
        faces.extend(box_faces([70.0, 0.0, 10.0], [100.0, 20.0, 15.0]));
        let scene = Scene::from_faces(faces).unwrap();

        let result = Projector::default_config().project(&scene).unwrap();
        let layered: f64 = result.layers.iter().map(|l| l.area()).sum();

        assert_strictly_ascending(&result);
        assert_eq!(result.layers.len(), 3);
        assert!(layered <= raw_footprint(&scene) + 1e-6);
        assert!((layered - 5000.0).abs() < 1e-6);
    }

    #[test]
    fn test_layers_disjoint_after_occlusion() {
        let mut faces = box_faces([0.0, 0.0, 0.0], [40.0, 40.0, 5.0]);
        faces.extend(box_faces([10.0, 10.0, 5.0], [30.0, 30.0, 9.0]));
        let scene = Scene::from_faces(faces).unwrap();
        let result = Projector::default_config().project(&scene).unwrap();

        let ops = OverlayBoolean::new();
        for (i, a) in result.layers.iter().enumerate() {
            for b in &result.layers[i + 1..] {
                let overlap = ops.intersection(&a.paths(), &b.paths()).unwrap();
                assert!(net_area(&overlap).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_coplanar_group_collapses_fragments() {
        let faces = vec![
            Face::new(Vector3::z())
                .with_outer(rect_loop(0.0, 0.0, 10.0, 10.0, 10.0))
                .with_group(1),
            Face::new(Vector3::z())
                .with_outer(rect_loop(10.0, 0.0, 20.0, 10.0, 9.9999))
                .with_group(1),
        ];
        let scene = Scene::new(Bounds3::new(
            Point3::origin(),
            Point3::new(20.0, 10.0, 10.0),
        ))
        .with_faces(faces);
        let result = Projector::default_config().project(&scene).unwrap();
        assert_eq!(result.layers.len(), 1);
        assert_eq!(result.layers[0].polygons.len(), 1);
        assert!((result.layers[0].area() - 200.0).abs() < 1e-6);
    }
}

mod error_tests {
    use super::*;

    /// Boolean engine that always fails, standing in for a broken library.
    struct FailingBoolean;

    impl BooleanOps for FailingBoolean {
        fn union(&self, _: &[Path2]) -> Result<Vec<Path2>> {
            Err(Error::Internal("union failed".into()))
        }
        fn difference(&self, _: &[Path2], _: &[Path2]) -> Result<Vec<Path2>> {
            Err(Error::Internal("difference failed".into()))
        }
        fn intersection(&self, _: &[Path2], _: &[Path2]) -> Result<Vec<Path2>> {
            Err(Error::Internal("intersection failed".into()))
        }
        fn polytree(&self, _: &[Path2]) -> Result<PolyTree> {
            Err(Error::Internal("polytree failed".into()))
        }
    }

    #[test]
    fn test_boolean_failure_surfaces_as_internal() {
        let scene = Scene::from_faces(box_faces([0.0; 3], [10.0, 10.0, 10.0]))
            .unwrap()
            .with_face(
                Face::new(Vector3::z()).with_outer(rect_loop(0.0, 0.0, 5.0, 5.0, 10.0)),
            );
        let projector = Projector::with_boolean(ProjectionConfig::default(), FailingBoolean);
        assert!(matches!(projector.project(&scene), Err(Error::Internal(_))));
    }

    #[test]
    fn test_empty_input() {
        let scene = Scene::new(Bounds3::new(Point3::origin(), Point3::new(1.0, 1.0, 1.0)));
        assert!(matches!(
            Projector::default_config().project(&scene),
            Err(Error::InvalidInput(_))
        ));
    }
}
