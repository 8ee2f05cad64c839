use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

pub use csscolorparser::ParseColorError;

/// Resolved RGBA paint with channels in `0..=1`.
///
/// `TRANSPARENT` stands in for "no paint"; resolved instances never carry an
/// optional color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleColor(pub [f32; 4]);

impl StyleColor {
    pub const TRANSPARENT: StyleColor = StyleColor([0.0, 0.0, 0.0, 0.0]);
    pub const BLACK: StyleColor = StyleColor([0.0, 0.0, 0.0, 1.0]);

    /// Normalizes any CSS color string ("red", "#ff8800", "rgba(10,20,30,0.5)").
    pub fn from_css(color_str: &str) -> Result<Self, ParseColorError> {
        let c = csscolorparser::parse(color_str)?;
        Ok(StyleColor([c.r as f32, c.g as f32, c.b as f32, c.a as f32]))
    }

    pub fn rgba(&self) -> [f32; 4] {
        self.0
    }

    pub fn is_visible(&self) -> bool {
        self.0[3] > 0.0
    }
}

impl Default for StyleColor {
    fn default() -> Self {
        StyleColor::TRANSPARENT
    }
}

impl Hash for StyleColor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        [
            OrderedFloat::from(self.0[0]),
            OrderedFloat::from(self.0[1]),
            OrderedFloat::from(self.0[2]),
            OrderedFloat::from(self.0[3]),
        ]
        .hash(state)
    }
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Error)]
#[error("invalid dasharray component: {0}")]
pub struct InvalidDasharray(pub String);

/// Parses a CSS `stroke-dasharray` string into dash lengths.
///
/// Components may be separated by whitespace or commas; negative lengths are
/// folded to their magnitude.
pub fn parse_dasharray(dash_str: &str) -> Result<Vec<f32>, InvalidDasharray> {
    let clean_dash_str = dash_str.replace(',', " ");
    let mut dashes: Vec<f32> = Vec::new();
    for s in clean_dash_str.split_whitespace() {
        let d = f32::from_str(s)
            .map_err(|_| InvalidDasharray(s.to_string()))?
            .abs();
        dashes.push(d);
    }
    Ok(dashes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_from_css() -> Result<(), ParseColorError> {
        let red = StyleColor::from_css("red")?;
        assert_eq!(red, StyleColor([1.0, 0.0, 0.0, 1.0]));

        let hex = StyleColor::from_css("#ff8800")?;
        assert_approx_eq!(f32, hex.rgba()[1], 136.0 / 255.0);

        assert!(StyleColor::from_css("not-a-color").is_err());
        Ok(())
    }

    #[test]
    fn test_visibility() {
        assert!(StyleColor::BLACK.is_visible());
        assert!(!StyleColor::TRANSPARENT.is_visible());
        assert!(!StyleColor([1.0, 0.0, 0.0, 0.0]).is_visible());
    }

    #[test]
    fn test_parse_dasharray() -> Result<(), InvalidDasharray> {
        assert_eq!(parse_dasharray("3,2")?, vec![3.0, 2.0]);
        assert_eq!(parse_dasharray("4 1 2")?, vec![4.0, 1.0, 2.0]);
        assert_eq!(parse_dasharray("-3, 2")?, vec![3.0, 2.0]);
        assert_eq!(parse_dasharray("")?, Vec::<f32>::new());
        assert!(parse_dasharray("3,x").is_err());
        Ok(())
    }
}
