use float_cmp::assert_approx_eq;
use quiver_common::types::{StyleColor, TextBaseline};
use quiver_marks::marks::anchor::AnchorPosition;
use quiver_marks::marks::mark::Frame;
use quiver_marks::marks::shape::{ShapeMark, ShapeProperties};
use quiver_marks::PropertyValue;
use quiver_scales::error::QuiverScaleError;
use quiver_scales::ordinal::OrdinalScale;

#[derive(Clone)]
struct Flower {
    species: &'static str,
    petal_width: f32,
}

fn flowers() -> Vec<Flower> {
    vec![
        Flower {
            species: "setosa",
            petal_width: 0.2,
        },
        Flower {
            species: "versicolor",
            petal_width: 1.3,
        },
        Flower {
            species: "virginica",
            petal_width: 2.0,
        },
        Flower {
            species: "setosa",
            petal_width: 0.4,
        },
    ]
}

#[test]
fn test_scale_driven_positions() {
    let data = flowers();
    let x = OrdinalScale::<&str, f32>::new()
        .domain_by(&data, |f| f.species)
        .split_banded(0.0, 120.0, 1.0)
        .shared();

    let mark = ShapeMark::new()
        .left(x.by(|f: &Flower| f.species))
        .top(PropertyValue::derived(|f: &Flower| {
            100.0 - f.petal_width * 40.0
        }));
    let scene = mark.build(&data, &Frame::new(120.0, 100.0));

    // Bands of width 40 starting at 0: setosa 0, versicolor 40, virginica 80
    assert_eq!(scene[0].left, Some(0.0));
    assert_eq!(scene[1].left, Some(40.0));
    assert_eq!(scene[2].left, Some(80.0));
    // The repeated species lands on its first band
    assert_eq!(scene[3].left, Some(0.0));

    assert_eq!(scene[0].top, Some(92.0));
    // The undeclared right edge mirrors the scale-driven left edge
    assert_eq!(scene[1].right, Some(80.0));
}

#[test]
fn test_domain_discovered_during_build() {
    let data = flowers();
    // No seeded domain: species are discovered as instances resolve
    let x = OrdinalScale::<&str, f32>::new()
        .range([15.0, 55.0, 95.0])
        .shared();

    let mark = ShapeMark::new().left(x.by(|f: &Flower| f.species));
    let scene = mark.build(&data, &Frame::new(120.0, 100.0));

    assert_eq!(
        x.get_domain(),
        vec!["setosa", "versicolor", "virginica"]
    );
    assert_eq!(scene[0].left, Some(15.0));
    assert_eq!(scene[1].left, Some(55.0));
    // The second setosa reuses the position discovery assigned first
    assert_eq!(scene[3].left, Some(15.0));
}

#[test]
fn test_scale_state_spans_builds() {
    let data = flowers();
    let x = OrdinalScale::<&str, f32>::new()
        .range([10.0, 20.0, 30.0])
        .shared();
    let mark = ShapeMark::new().left(x.by(|f: &Flower| f.species));
    let frame = Frame::new(100.0, 100.0);

    let first = mark.build(&data[..1], &frame);
    assert_eq!(first[0].left, Some(10.0));
    assert_eq!(x.get_domain(), vec!["setosa"]);

    // A later build keeps earlier assignments and extends the domain
    let second = mark.build(&data[1..3], &frame);
    assert_eq!(second[0].left, Some(20.0));
    assert_eq!(second[1].left, Some(30.0));
    assert_eq!(
        x.get_domain(),
        vec!["setosa", "versicolor", "virginica"]
    );
}

#[test]
fn test_layered_defaults_with_style_scale() -> Result<(), QuiverScaleError> {
    let data = flowers();
    let fill = OrdinalScale::<&str, StyleColor>::new()
        .domain(["setosa", "versicolor", "virginica"])
        .styles(["red", "lime", "blue"])?
        .shared();

    let mark = ShapeMark::new()
        .fill_style(PropertyValue::derived(move |f: &Flower| {
            fill.invoke(&f.species).unwrap_or(StyleColor::TRANSPARENT)
        }))
        .extend(ShapeProperties::new().shape_size(64.0).top(30.0));
    let scene = mark.build(&data, &Frame::new(120.0, 100.0));

    assert_eq!(scene[0].fill_style, StyleColor([1.0, 0.0, 0.0, 1.0]));
    assert_eq!(scene[1].fill_style, StyleColor([0.0, 1.0, 0.0, 1.0]));

    // The theme layer's size implies the radius; its top fills the gap the
    // type defaults leave open
    assert_approx_eq!(f32, scene[0].shape_radius, 8.0);
    assert_eq!(scene[0].top, Some(30.0));
    Ok(())
}

#[test]
fn test_anchor_labels_over_scene() {
    let data = flowers();
    let x = OrdinalScale::<&str, f32>::new()
        .domain_by(&data, |f| f.species)
        .split(0.0, 120.0)
        .shared();

    let mark = ShapeMark::new()
        .left(x.by(|f: &Flower| f.species))
        .top(50.0)
        .shape_radius(5.0);
    let scene = mark.build(&data, &Frame::new(120.0, 100.0));
    let labels = mark.anchor(AnchorPosition::Top);

    let instances = labels.build(&scene);
    assert_eq!(instances.len(), 4);

    // split midpoints for 3 species over [0, 120]: 20, 60, 100
    assert_eq!(instances[0].left, Some(20.0));
    assert_eq!(instances[1].left, Some(60.0));
    assert_eq!(instances[2].left, Some(100.0));

    // Labels grow upward from 5 above the center
    assert_eq!(instances[2].bottom, Some(55.0));
    assert_eq!(instances[2].top, None);
    assert_eq!(instances[0].text_baseline, TextBaseline::Bottom);
}
