use float_cmp::assert_approx_eq;
use quiver_common::types::StyleColor;
use quiver_geometry::marks::ShapeCoreUtils;
use quiver_geometry::rtree::SceneRTree;
use quiver_marks::marks::mark::Frame;
use quiver_marks::marks::shape::{MarkShape, ShapeMark};
use quiver_scales::ordinal::OrdinalScale;

#[derive(Clone)]
struct Flower {
    species: &'static str,
}

#[test]
fn test_scene_hit_testing() {
    let data = vec![
        Flower { species: "setosa" },
        Flower {
            species: "versicolor",
        },
        Flower {
            species: "virginica",
        },
    ];
    let x = OrdinalScale::<&str, f32>::new()
        .domain_by(&data, |f| f.species)
        .split(0.0, 120.0)
        .shared();

    // Circles of radius 6 at the split midpoints 20, 60, 100
    let mark = ShapeMark::new()
        .shape(MarkShape::Circle)
        .left(x.by(|f: &Flower| f.species))
        .top(55.0)
        .shape_radius(6.0)
        .stroke_style(StyleColor::TRANSPARENT);
    let scene = mark.build(&data, &Frame::new(120.0, 100.0));
    let tree = SceneRTree::from_scene(&scene);

    let hit = tree.locate_at_point(&[60.0, 55.0]).unwrap();
    assert_eq!(hit.index, 1);
    assert_eq!(data[hit.index].species, "versicolor");

    // Between circles nothing contains the point; the nearest is still found
    assert!(tree.locate_at_point(&[40.0, 55.0]).is_none());
    assert_eq!(tree.nearest_neighbor(&[44.0, 55.0]).unwrap().index, 1);
}

#[test]
fn test_rect_glyph_hit_area() {
    // A square with aspect 4 is 18 wide and 4.5 tall; its hit rectangle
    // takes the extents in swapped order, 4.5 wide and 18 tall
    let scene = ShapeMark::<()>::new()
        .shape(MarkShape::Square)
        .aspect_ratio(4.0)
        .left(50.0)
        .top(50.0)
        .stroke_style(StyleColor::TRANSPARENT)
        .build(&[()], &Frame::new(100.0, 100.0));
    let tree = SceneRTree::from_scene(&scene);

    assert!(tree.locate_at_point(&[50.0, 58.0]).is_some());
    assert!(tree.locate_at_point(&[58.0, 50.0]).is_none());

    let bbox = scene.bounding_box();
    assert_approx_eq!(f32, bbox.lower()[0], 47.75);
    assert_approx_eq!(f32, bbox.lower()[1], 41.0);
    assert_approx_eq!(f32, bbox.upper()[1], 59.0);
}

#[test]
fn test_diamond_hit_rect_inflated() {
    let scene = ShapeMark::<()>::new()
        .shape(MarkShape::Diamond)
        .shape_radius(4.5)
        .left(50.0)
        .top(50.0)
        .stroke_style(StyleColor::TRANSPARENT)
        .build(&[()], &Frame::new(100.0, 100.0));
    let tree = SceneRTree::from_scene(&scene);

    // 6 right of center: beyond the plain square's 4.5 half-side, inside
    // the sqrt(2)-scaled diamond rectangle (half-side 6.36)
    assert!(tree.locate_at_point(&[56.0, 50.0]).is_some());
    assert!(tree.locate_at_point(&[57.0, 50.0]).is_none());
}
