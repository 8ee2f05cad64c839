use serde::{Deserialize, Serialize};

use quiver_common::types::{TextAlign, TextBaseline};

use crate::marks::shape::{ShapeInstance, ShapeScene};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPosition {
    Top,
    Left,
    Center,
    Bottom,
    Right,
}

/// A positional sub-mark attached to one of five named positions on a host
/// mark's instances, used to hang labels and secondary marks off a glyph.
///
/// Anchors follow the opposite-edge convention: the `Top` anchor supplies a
/// `bottom` coordinate so content attached to it grows upward, away from the
/// glyph. Per axis at most one of the opposing pair is set, offset outward
/// from center by half the host extent, except for `Center` which coincides
/// with the host's own left/top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeAnchor {
    position: AnchorPosition,
}

impl ShapeAnchor {
    pub fn new(position: AnchorPosition) -> Self {
        Self { position }
    }

    pub fn position(&self) -> AnchorPosition {
        self.position
    }

    /// The host instance this anchor reads when attached at `index`.
    pub fn host_instance<'a>(
        &self,
        host: &'a ShapeScene,
        index: usize,
    ) -> Option<&'a ShapeInstance> {
        host.get(index)
    }

    pub fn left(&self, host: &ShapeInstance) -> Option<f32> {
        match self.position {
            AnchorPosition::Left => None,
            AnchorPosition::Right => host.left.map(|left| left + host.width() / 2.0),
            _ => host.left,
        }
    }

    pub fn right(&self, host: &ShapeInstance) -> Option<f32> {
        match self.position {
            AnchorPosition::Left => host.right.map(|right| right + host.width() / 2.0),
            _ => None,
        }
    }

    pub fn top(&self, host: &ShapeInstance) -> Option<f32> {
        match self.position {
            AnchorPosition::Top => None,
            AnchorPosition::Bottom => host.top.map(|top| top + host.height() / 2.0),
            _ => host.top,
        }
    }

    pub fn bottom(&self, host: &ShapeInstance) -> Option<f32> {
        match self.position {
            AnchorPosition::Top => host.top.map(|top| top + host.height() / 2.0),
            _ => None,
        }
    }

    pub fn text_align(&self) -> TextAlign {
        match self.position {
            AnchorPosition::Left => TextAlign::Right,
            AnchorPosition::Right => TextAlign::Left,
            _ => TextAlign::Center,
        }
    }

    pub fn text_baseline(&self) -> TextBaseline {
        match self.position {
            AnchorPosition::Top => TextBaseline::Bottom,
            AnchorPosition::Bottom => TextBaseline::Top,
            _ => TextBaseline::Middle,
        }
    }

    /// Evaluates every derivation against one host instance.
    pub fn instance(&self, host: &ShapeInstance) -> AnchorInstance {
        AnchorInstance {
            left: self.left(host),
            right: self.right(host),
            top: self.top(host),
            bottom: self.bottom(host),
            text_align: self.text_align(),
            text_baseline: self.text_baseline(),
        }
    }

    /// Re-evaluates the anchor against a freshly built host scene. Anchors
    /// hold no state of their own, so a rebuilt host is picked up in full.
    pub fn build(&self, host: &ShapeScene) -> Vec<AnchorInstance> {
        host.iter().map(|instance| self.instance(instance)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorInstance {
    pub left: Option<f32>,
    pub right: Option<f32>,
    pub top: Option<f32>,
    pub bottom: Option<f32>,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marks::mark::Frame;
    use crate::marks::shape::ShapeMark;
    use crate::PropertyValue;

    #[test]
    fn test_top_anchor() {
        let anchor = ShapeAnchor::new(AnchorPosition::Top);
        let host = ShapeInstance {
            left: Some(10.0),
            top: Some(20.0),
            implied_width: 8.0,
            implied_height: 6.0,
            ..Default::default()
        };

        assert_eq!(anchor.left(&host), Some(10.0));
        assert_eq!(anchor.right(&host), None);
        assert_eq!(anchor.top(&host), None);
        assert_eq!(anchor.bottom(&host), Some(23.0));
        assert_eq!(anchor.text_align(), TextAlign::Center);
        assert_eq!(anchor.text_baseline(), TextBaseline::Bottom);
    }

    #[test]
    fn test_all_positions() {
        // Host built through the mark so every edge is resolved
        let scene = ShapeMark::<()>::new()
            .left(10.0)
            .top(20.0)
            .shape_radius(4.0)
            .build(&[()], &Frame::new(100.0, 100.0));
        let host = &scene[0];
        assert_eq!(host.right, Some(90.0));
        assert_eq!(host.bottom, Some(80.0));

        let at = |position: AnchorPosition| ShapeAnchor::new(position).instance(host);

        let top = at(AnchorPosition::Top);
        assert_eq!((top.left, top.right), (Some(10.0), None));
        assert_eq!((top.top, top.bottom), (None, Some(24.0)));

        let bottom = at(AnchorPosition::Bottom);
        assert_eq!((bottom.left, bottom.right), (Some(10.0), None));
        assert_eq!((bottom.top, bottom.bottom), (Some(24.0), None));
        assert_eq!(bottom.text_baseline, TextBaseline::Top);

        let left = at(AnchorPosition::Left);
        assert_eq!((left.left, left.right), (None, Some(94.0)));
        assert_eq!((left.top, left.bottom), (Some(20.0), None));
        assert_eq!(left.text_align, TextAlign::Right);

        let right = at(AnchorPosition::Right);
        assert_eq!((right.left, right.right), (Some(14.0), None));
        assert_eq!((right.top, right.bottom), (Some(20.0), None));
        assert_eq!(right.text_align, TextAlign::Left);

        let center = at(AnchorPosition::Center);
        assert_eq!((center.left, center.top), (Some(10.0), Some(20.0)));
        assert_eq!((center.right, center.bottom), (None, None));
        assert_eq!(center.text_align, TextAlign::Center);
        assert_eq!(center.text_baseline, TextBaseline::Middle);
    }

    #[test]
    fn test_anchor_reads_current_scene() {
        let mark = ShapeMark::new()
            .left(PropertyValue::derived(|x: &f32| *x))
            .top(5.0);
        let anchor = mark.anchor(AnchorPosition::Right);
        let frame = Frame::new(100.0, 100.0);

        // Default radius 4.5 gives width 9, so the offset is 4.5
        let scene = mark.build(&[10.0], &frame);
        assert_eq!(anchor.left(&scene[0]), Some(14.5));

        let scene = mark.build(&[40.0], &frame);
        assert_eq!(anchor.left(&scene[0]), Some(44.5));
    }

    #[test]
    fn test_build_over_scene() {
        let scene = ShapeMark::new()
            .left(PropertyValue::derived(|x: &f32| *x))
            .build(&[10.0, 30.0, 50.0], &Frame::new(100.0, 100.0));
        let anchor = ShapeAnchor::new(AnchorPosition::Center);

        let instances = anchor.build(&scene);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[1].left, Some(30.0));

        assert!(anchor.host_instance(&scene, 2).is_some());
        assert!(anchor.host_instance(&scene, 3).is_none());
    }
}
