//! Mapping of SVG `transform` attributes onto `group(...)` parameters
//!
//! Only a single `translate`, `scale` or `rotate` maps cleanly. Anything else (matrices,
//! skews, lists of functions) is reported as unsupported and left to the caller.

use std::sync::LazyLock;

use regex::Regex;

use crate::format;

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(translate|scale|rotate)\s*\(([^()]*)\)\s*$")
        .expect("transform pattern is valid")
});

/// Parameters of a Compose vector group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupTransform {
    pub rotate: f32,
    pub pivot_x: f32,
    pub pivot_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub translation_x: f32,
    pub translation_y: f32,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            pivot_x: 0.0,
            pivot_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            translation_x: 0.0,
            translation_y: 0.0,
        }
    }
}

impl GroupTransform {
    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            translation_x: x,
            translation_y: y,
            ..Self::default()
        }
    }

    /// Parse a single-function transform. Returns `None` for anything unsupported.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = FUNCTION.captures(text)?;
        let args: Vec<f32> = caps[2]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()?;

        let transform = match (&caps[1], args.as_slice()) {
            ("translate", &[x]) => Self::translation(x, 0.0),
            ("translate", &[x, y]) => Self::translation(x, y),
            ("scale", &[s]) => Self {
                scale_x: s,
                scale_y: s,
                ..Self::default()
            },
            ("scale", &[x, y]) => Self {
                scale_x: x,
                scale_y: y,
                ..Self::default()
            },
            ("rotate", &[angle]) => Self {
                rotate: angle,
                ..Self::default()
            },
            ("rotate", &[angle, cx, cy]) => Self {
                rotate: angle,
                pivot_x: cx,
                pivot_y: cy,
                ..Self::default()
            },
            _ => return None,
        };
        Some(transform)
    }

    /// Named arguments that differ from their defaults, in Compose parameter order
    pub fn arguments(&self) -> Vec<String> {
        let defaults = Self::default();
        [
            ("rotate", self.rotate, defaults.rotate),
            ("pivotX", self.pivot_x, defaults.pivot_x),
            ("pivotY", self.pivot_y, defaults.pivot_y),
            ("scaleX", self.scale_x, defaults.scale_x),
            ("scaleY", self.scale_y, defaults.scale_y),
            ("translationX", self.translation_x, defaults.translation_x),
            ("translationY", self.translation_y, defaults.translation_y),
        ]
        .into_iter()
        .filter(|(_, value, default)| value != default)
        .map(|(name, value, _)| format!("{name} = {}", format::float(value)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let t = GroupTransform::parse("translate(2, -3)").unwrap();
        assert_eq!(t.arguments(), vec!["translationX = 2.00f", "translationY = -3.00f"]);
        assert_eq!(GroupTransform::parse("translate(5)").unwrap().translation_y, 0.0);
    }

    #[test]
    fn test_scale_uniform_and_axes() {
        let t = GroupTransform::parse("scale(2)").unwrap();
        assert_eq!((t.scale_x, t.scale_y), (2.0, 2.0));
        let t = GroupTransform::parse(" scale( 1 -1 ) ").unwrap();
        assert_eq!(t.arguments(), vec!["scaleY = -1.00f"]);
    }

    #[test]
    fn test_rotate_with_pivot() {
        let t = GroupTransform::parse("rotate(45 12 12)").unwrap();
        assert_eq!(
            t.arguments(),
            vec!["rotate = 45.00f", "pivotX = 12.00f", "pivotY = 12.00f"]
        );
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(GroupTransform::parse("matrix(1 0 0 1 5 5)"), None);
        assert_eq!(GroupTransform::parse("translate(1) scale(2)"), None);
        assert_eq!(GroupTransform::parse("rotate(1 2)"), None);
        assert_eq!(GroupTransform::parse("skewX(10)"), None);
    }
}
