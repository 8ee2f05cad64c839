use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::marks::shape::ShapeInstance;

/// Extent of the panel a mark resolves its positions against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Ancestor hook run at the end of every instance build, after the mark has
/// resolved its own implied properties.
pub trait ImpliedHook: Debug {
    fn build_implied(&self, frame: &Frame, instance: &mut ShapeInstance);
}

/// Root of the hook chain: completes positional pairs against the frame so
/// both edges of each axis are available downstream (anchors read them).
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseMark;

impl ImpliedHook for BaseMark {
    fn build_implied(&self, frame: &Frame, instance: &mut ShapeInstance) {
        match (instance.left, instance.right) {
            (None, None) => {
                let center = frame.width / 2.0;
                instance.left = Some(center);
                instance.right = Some(center);
            }
            (Some(left), None) => instance.right = Some(frame.width - left),
            (None, Some(right)) => instance.left = Some(frame.width - right),
            (Some(_), Some(_)) => {}
        }
        match (instance.top, instance.bottom) {
            (None, None) => {
                let middle = frame.height / 2.0;
                instance.top = Some(middle);
                instance.bottom = Some(middle);
            }
            (Some(top), None) => instance.bottom = Some(frame.height - top),
            (None, Some(bottom)) => instance.top = Some(frame.height - bottom),
            (Some(_), Some(_)) => {}
        }
    }
}
