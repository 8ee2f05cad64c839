use quiver_common::types::StyleColor;
use quiver_geometry::rtree::SceneRTree;
use quiver_marks::marks::anchor::AnchorPosition;
use quiver_marks::marks::mark::Frame;
use quiver_marks::marks::shape::{MarkShape, ShapeMark};
use quiver_marks::PropertyValue;
use quiver_scales::ordinal::OrdinalScale;

#[derive(Clone)]
struct Flower {
    species: &'static str,
    petal_width: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Shape Mark Scatter Example ===\n");

    let flowers = vec![
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
    ];

    // Example 1: Banded positions for the species axis
    println!("1. Banded species positions:");

    let x = OrdinalScale::<&str, f32>::new()
        .domain_by(&flowers, |f| f.species)
        .split_banded(0.0, 120.0, 1.0)
        .shared();

    for species in ["setosa", "versicolor", "virginica"] {
        println!(
            "  '{}' → x: {:.1}",
            species,
            x.lookup(&species).unwrap_or(f32::NAN)
        );
    }

    // Example 2: A mark driven by the scale and per-datum functions
    println!("\n2. Resolved scene instances:");

    let fill = OrdinalScale::<&str, StyleColor>::new()
        .domain(["setosa", "versicolor", "virginica"])
        .styles(["#1f77b4", "#ff7f0e", "#2ca02c"])?
        .shared();

    let mark = ShapeMark::new()
        .shape(MarkShape::Circle)
        .left(x.by(|f: &Flower| f.species))
        .top(PropertyValue::derived(|f: &Flower| {
            100.0 - f.petal_width * 40.0
        }))
        .shape_size(PropertyValue::derived(|f: &Flower| {
            20.0 + f.petal_width * 30.0
        }))
        .fill_style(PropertyValue::derived(move |f: &Flower| {
            fill.invoke(&f.species).unwrap_or(StyleColor::TRANSPARENT)
        }));

    let frame = Frame::new(120.0, 100.0);
    let scene = mark.build(&flowers, &frame);

    for (flower, instance) in flowers.iter().zip(scene.iter()) {
        println!(
            "  '{}' → left: {:.1}, top: {:.1}, radius: {:.2}",
            flower.species,
            instance.left.unwrap_or(f32::NAN),
            instance.top.unwrap_or(f32::NAN),
            instance.shape_radius
        );
    }

    // Example 3: Labels hung from the top anchor grow upward
    println!("\n3. Top anchor label positions:");

    let labels = mark.anchor(AnchorPosition::Top);
    for (flower, instance) in flowers.iter().zip(scene.iter()) {
        let label = labels.instance(instance);
        println!(
            "  '{}' → bottom: {:.1}, align: {:?}, baseline: {:?}",
            flower.species,
            label.bottom.unwrap_or(f32::NAN),
            label.text_align,
            label.text_baseline
        );
    }

    // Example 4: Hit testing against the scene's R-tree
    println!("\n4. Hit tests:");

    let tree = SceneRTree::from_scene(&scene);
    for point in [[0.0, 92.0], [40.0, 48.0], [100.0, 50.0]] {
        match tree.locate_at_point(&point) {
            Some(hit) => println!(
                "  [{:.0}, {:.0}] → instance {} ('{}')",
                point[0], point[1], hit.index, flowers[hit.index].species
            ),
            None => println!("  [{:.0}, {:.0}] → no hit", point[0], point[1]),
        }
    }

    // Example 5: Mapping a pixel back to a band index
    println!("\n5. Inverse lookup on a split axis:");

    let y_bands = OrdinalScale::<&str, f32>::new()
        .domain(["low", "mid", "high"])
        .split(0.0, 90.0);
    for y in [10.0, 50.0, 95.0] {
        println!("  y = {:.0} → band index {:.0}", y, y_bands.invert_index(y));
    }

    Ok(())
}
