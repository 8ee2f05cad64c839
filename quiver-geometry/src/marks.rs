use std::f32::consts::SQRT_2;

use geo::{Distance, Euclidean};
use geo_types::{coord, Point, Rect};
use rstar::{Envelope, RTreeObject, AABB};

use crate::CoreInstance;
use quiver_marks::marks::shape::{MarkShape, ShapeInstance, ShapeScene};

/// The hit-testable primitive behind one resolved instance.
///
/// Square, cross and diamond glyphs reduce to an axis-aligned rectangle; the
/// diamond's is the sqrt(2)-scaled square it is inscribed in. Every other
/// shape is treated as a circle of the instance's radius.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeCore {
    Circle { cx: f32, cy: f32, radius: f32 },
    Rect(Rect<f32>),
}

impl ShapeCore {
    /// Extracts the primitive for one instance, centered on its `left`/`top`
    /// position (0 for axes the instance never resolved).
    ///
    /// Rectangle extents are the instance's implied extents in swapped order:
    /// the rectangle is `height()` wide and `width()` tall. The primitive is
    /// always axis aligned; a `shape_angle` on the instance is not applied,
    /// so rotated squares, crosses and diamonds hit-test against the
    /// unrotated rectangle. Known inaccuracy.
    pub fn from_instance(instance: &ShapeInstance) -> Self {
        let cx = instance.left.unwrap_or(0.0);
        let cy = instance.top.unwrap_or(0.0);
        match instance.shape {
            MarkShape::Square | MarkShape::Cross => {
                Self::centered_rect(cx, cy, instance.height(), instance.width())
            }
            MarkShape::Diamond => Self::centered_rect(
                cx,
                cy,
                instance.height() * SQRT_2,
                instance.width() * SQRT_2,
            ),
            _ => ShapeCore::Circle {
                cx,
                cy,
                radius: instance.shape_radius,
            },
        }
    }

    fn centered_rect(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        ShapeCore::Rect(Rect::new(
            coord!(x: cx - width / 2.0, y: cy - height / 2.0),
            coord!(x: cx + width / 2.0, y: cy + height / 2.0),
        ))
    }

    /// Distance from `point` to the primitive's surface: negative inside a
    /// circle, 0 inside a rectangle.
    pub fn surface_distance(&self, point: &Point<f32>) -> f32 {
        match self {
            ShapeCore::Circle { cx, cy, radius } => {
                Euclidean::distance(Point::new(*cx, *cy), *point) - radius
            }
            ShapeCore::Rect(rect) => Euclidean::distance(&rect.to_polygon(), point),
        }
    }

    pub fn bounding_rect(&self) -> Rect<f32> {
        match self {
            ShapeCore::Circle { cx, cy, radius } => Rect::new(
                coord!(x: cx - radius, y: cy - radius),
                coord!(x: cx + radius, y: cy + radius),
            ),
            ShapeCore::Rect(rect) => *rect,
        }
    }
}

pub trait ShapeCoreUtils {
    /// Extracts one hit-testable primitive per scene instance, tagged with
    /// the instance index.
    fn core_iter(&self) -> Box<dyn Iterator<Item = CoreInstance> + '_>;

    fn bounding_box(&self) -> AABB<[f32; 2]> {
        self.core_iter()
            .map(|c| c.envelope())
            .reduce(|a, b| a.merged(&b))
            .unwrap_or(AABB::from_corners([0.0, 0.0], [0.0, 0.0]))
    }
}

impl ShapeCoreUtils for ShapeScene {
    fn core_iter(&self) -> Box<dyn Iterator<Item = CoreInstance> + '_> {
        Box::new(self.iter().enumerate().map(|(index, instance)| {
            // An invisible stroke contributes nothing to the hit area
            let half_stroke_width = if instance.stroke_style.is_visible() {
                instance.line_width / 2.0
            } else {
                0.0
            };
            CoreInstance {
                index,
                core: ShapeCore::from_instance(instance),
                half_stroke_width,
            }
        }))
    }
}
