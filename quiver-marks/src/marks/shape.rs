use serde::{Deserialize, Serialize};

use quiver_common::types::{LineCap, StyleColor};
use quiver_common::value::PropertyValue;

use crate::marks::anchor::{AnchorPosition, ShapeAnchor};
use crate::marks::mark::{BaseMark, Frame, ImpliedHook};

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkShape {
    #[default]
    Circle,
    Square,
    Cross,
    Diamond,
    Triangle,
    Tick,
    Bar,
}

/// One configuration layer: the properties a mark or one of its ancestors
/// declares. Unset fields defer to the next layer in the cascade.
#[derive(Debug, Clone)]
pub struct ShapeProperties<D> {
    pub shape: Option<PropertyValue<D, MarkShape>>,
    pub shape_angle: Option<PropertyValue<D, f32>>,
    pub shape_radius: Option<PropertyValue<D, f32>>,
    pub shape_size: Option<PropertyValue<D, f32>>,
    pub aspect_ratio: Option<PropertyValue<D, f32>>,
    pub line_width: Option<PropertyValue<D, f32>>,
    pub stroke_style: Option<PropertyValue<D, StyleColor>>,
    pub line_cap: Option<PropertyValue<D, LineCap>>,
    pub stroke_dasharray: Option<PropertyValue<D, Vec<f32>>>,
    pub fill_style: Option<PropertyValue<D, StyleColor>>,
    pub left: Option<PropertyValue<D, f32>>,
    pub top: Option<PropertyValue<D, f32>>,
    pub right: Option<PropertyValue<D, f32>>,
    pub bottom: Option<PropertyValue<D, f32>>,
}

macro_rules! property_fn {
    ($name:ident, $t:ty) => {
        pub fn $name(mut self, value: impl Into<PropertyValue<D, $t>>) -> Self {
            self.$name = Some(value.into());
            self
        }
    };
}

impl<D> ShapeProperties<D> {
    pub fn new() -> Self {
        Self {
            shape: None,
            shape_angle: None,
            shape_radius: None,
            shape_size: None,
            aspect_ratio: None,
            line_width: None,
            stroke_style: None,
            line_cap: None,
            stroke_dasharray: None,
            fill_style: None,
            left: None,
            top: None,
            right: None,
            bottom: None,
        }
    }

    /// The type-default layer installed by `ShapeMark::new`.
    ///
    /// Radius and size are deliberately absent so the implied pass can tell
    /// whether either was declared.
    pub fn shape_defaults() -> Self {
        Self::new()
            .shape(MarkShape::Circle)
            .shape_angle(0.0)
            .aspect_ratio(1.0)
            .line_width(1.5)
            .line_cap(LineCap::Butt)
            .stroke_dasharray(Vec::new())
            .stroke_style(StyleColor::BLACK)
            .fill_style(StyleColor::TRANSPARENT)
    }

    property_fn!(shape, MarkShape);
    property_fn!(shape_angle, f32);
    property_fn!(shape_radius, f32);
    property_fn!(shape_size, f32);
    property_fn!(aspect_ratio, f32);
    property_fn!(line_width, f32);
    property_fn!(stroke_style, StyleColor);
    property_fn!(line_cap, LineCap);
    property_fn!(stroke_dasharray, Vec<f32>);
    property_fn!(fill_style, StyleColor);
    property_fn!(left, f32);
    property_fn!(top, f32);
    property_fn!(right, f32);
    property_fn!(bottom, f32);
}

impl<D> Default for ShapeProperties<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// One resolved scene instance: concrete attribute values for a single datum
/// from a single build pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInstance {
    pub shape: MarkShape,
    pub shape_angle: f32,
    pub shape_radius: f32,
    pub shape_size: f32,
    pub aspect_ratio: f32,
    pub line_width: f32,
    pub stroke_style: StyleColor,
    pub line_cap: LineCap,
    pub stroke_dasharray: Vec<f32>,
    pub fill_style: StyleColor,
    pub left: Option<f32>,
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub(crate) implied_width: f32,
    pub(crate) implied_height: f32,
}

impl ShapeInstance {
    /// Implied horizontal extent. A derived query, not a declarable property.
    pub fn width(&self) -> f32 {
        self.implied_width
    }

    /// Implied vertical extent. A derived query, not a declarable property.
    pub fn height(&self) -> f32 {
        self.implied_height
    }
}

impl Default for ShapeInstance {
    fn default() -> Self {
        Self {
            shape: MarkShape::Circle,
            shape_angle: 0.0,
            shape_radius: 4.5,
            shape_size: 20.25,
            aspect_ratio: 1.0,
            line_width: 1.5,
            stroke_style: StyleColor::BLACK,
            line_cap: LineCap::Butt,
            stroke_dasharray: Vec::new(),
            fill_style: StyleColor::TRANSPARENT,
            left: None,
            top: None,
            right: None,
            bottom: None,
            implied_width: 9.0,
            implied_height: 9.0,
        }
    }
}

/// The product of one build pass over a mark's data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeScene {
    pub instances: Vec<ShapeInstance>,
}

impl ShapeScene {
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeInstance> {
        self.instances.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ShapeInstance> {
        self.instances.get(index)
    }
}

impl std::ops::Index<usize> for ShapeScene {
    type Output = ShapeInstance;

    fn index(&self, index: usize) -> &ShapeInstance {
        &self.instances[index]
    }
}

/// A declarative shape mark: a per-datum glyph description resolved into
/// concrete scene instances by `build`.
///
/// Properties resolve through an ordered cascade, first hit wins: values
/// declared on the mark, then the type defaults, then ancestor layers in the
/// order they were added with `extend`.
#[derive(Debug)]
pub struct ShapeMark<D> {
    declared: ShapeProperties<D>,
    defaults: Vec<ShapeProperties<D>>,
    base: Box<dyn ImpliedHook>,
}

macro_rules! declare_fn {
    ($name:ident, $t:ty) => {
        pub fn $name(mut self, value: impl Into<PropertyValue<D, $t>>) -> Self {
            self.declared.$name = Some(value.into());
            self
        }
    };
}

// Cascade resolution for one property: scan the layers in priority order and
// evaluate the first declaration found.
macro_rules! resolve {
    ($self:ident, $datum:ident, $field:ident) => {
        $self
            .layers()
            .find_map(|layer| layer.$field.as_ref())
            .map(|value| value.eval($datum))
    };
}

impl<D> ShapeMark<D> {
    pub fn new() -> Self {
        Self {
            declared: ShapeProperties::new(),
            defaults: vec![ShapeProperties::shape_defaults()],
            base: Box::new(BaseMark),
        }
    }

    declare_fn!(shape, MarkShape);
    declare_fn!(shape_angle, f32);
    declare_fn!(shape_radius, f32);
    declare_fn!(shape_size, f32);
    declare_fn!(aspect_ratio, f32);
    declare_fn!(line_width, f32);
    declare_fn!(stroke_style, StyleColor);
    declare_fn!(line_cap, LineCap);
    declare_fn!(stroke_dasharray, Vec<f32>);
    declare_fn!(fill_style, StyleColor);
    declare_fn!(left, f32);
    declare_fn!(top, f32);
    declare_fn!(right, f32);
    declare_fn!(bottom, f32);

    /// Appends an ancestor default layer. Layers added earlier are consulted
    /// earlier (nearest ancestor wins).
    pub fn extend(mut self, layer: ShapeProperties<D>) -> Self {
        self.defaults.push(layer);
        self
    }

    /// Replaces the ancestor hook run at the end of every instance build.
    pub fn with_base(mut self, base: Box<dyn ImpliedHook>) -> Self {
        self.base = base;
        self
    }

    /// Returns an anchor sub-mark attached to this mark's instances.
    pub fn anchor(&self, position: AnchorPosition) -> ShapeAnchor {
        ShapeAnchor::new(position)
    }

    // Layers in resolution order: overrides first, type defaults, ancestors.
    fn layers(&self) -> impl Iterator<Item = &ShapeProperties<D>> {
        std::iter::once(&self.declared).chain(self.defaults.iter())
    }

    /// Resolves every datum into a fresh scene. Instances are recomputed in
    /// full on every call; nothing carries over between passes.
    pub fn build(&self, data: &[D], frame: &Frame) -> ShapeScene {
        ShapeScene {
            instances: data
                .iter()
                .map(|datum| self.build_instance(datum, frame))
                .collect(),
        }
    }

    fn build_instance(&self, datum: &D, frame: &Frame) -> ShapeInstance {
        let radius = resolve!(self, datum, shape_radius);
        let size = resolve!(self, datum, shape_size);
        let aspect = resolve!(self, datum, aspect_ratio).unwrap_or(1.0);

        // Radius/size duality: derive whichever half is missing. When both
        // are declared they are kept exactly as supplied.
        let (radius, size) = match (radius, size) {
            (None, None) => (4.5, 20.25),
            (None, Some(size)) => (size.sqrt(), size),
            (Some(radius), None) => (radius, radius * radius),
            (Some(radius), Some(size)) => (radius, size),
        };

        // A negative aspect means ignore: extents fall back to the diameter.
        let (width, height) = if aspect == 1.0 || aspect < 0.0 {
            (2.0 * radius, 2.0 * radius)
        } else {
            let height = 2.0 * radius / aspect.sqrt();
            (aspect * height, height)
        };

        let mut instance = ShapeInstance {
            shape: resolve!(self, datum, shape).unwrap_or_default(),
            shape_angle: resolve!(self, datum, shape_angle).unwrap_or(0.0),
            shape_radius: radius,
            shape_size: size,
            aspect_ratio: aspect,
            line_width: resolve!(self, datum, line_width).unwrap_or(1.5),
            stroke_style: resolve!(self, datum, stroke_style).unwrap_or_default(),
            line_cap: resolve!(self, datum, line_cap).unwrap_or_default(),
            stroke_dasharray: resolve!(self, datum, stroke_dasharray).unwrap_or_default(),
            fill_style: resolve!(self, datum, fill_style).unwrap_or_default(),
            left: resolve!(self, datum, left),
            top: resolve!(self, datum, top),
            right: resolve!(self, datum, right),
            bottom: resolve!(self, datum, bottom),
            implied_width: width,
            implied_height: height,
        };
        self.base.build_implied(frame, &mut instance);
        instance
    }
}

impl<D> Default for ShapeMark<D> {
    fn default() -> Self {
        Self::new()
    }
}
