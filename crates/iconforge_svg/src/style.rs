//! Style resolution for icon elements
//!
//! Values are applied lowest precedence first, each source overwriting the previous:
//! group-inherited values, then presentation attributes, then class rules (in the order
//! the `class` attribute lists them), then the inline `style` attribute.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::color::{parse_paint, ParsedColor};

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is valid"));

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}]+)\{([^}]*)\}").expect("rule pattern is valid"));

static CLASS_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.([A-Za-z0-9_-]+)$").expect("selector pattern is valid"));

/// Properties read by the resolver, in attribute form
const PROPERTIES: &[&str] = &[
    "fill",
    "stroke",
    "stroke-width",
    "opacity",
    "fill-opacity",
    "stroke-opacity",
    "fill-rule",
];

/// Winding rule for filled paths
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "nonzero" => Some(FillRule::NonZero),
            "evenodd" => Some(FillRule::EvenOdd),
            _ => None,
        }
    }
}

/// Class rules collected from a document's `<style>` blocks
#[derive(Clone, Debug, Default)]
pub struct Stylesheet {
    rules: FxHashMap<String, Vec<(String, String)>>,
}

impl Stylesheet {
    /// Scan CSS text for `.class { prop: value; }` blocks.
    ///
    /// Selectors other than a bare class are ignored. When a class appears in more than
    /// one block, the first block is kept.
    pub fn parse(css: &str) -> Self {
        let mut stylesheet = Self::default();
        stylesheet.extend(css);
        stylesheet
    }

    /// Add the rules from another block of CSS text
    pub fn extend(&mut self, css: &str) {
        let css = COMMENT.replace_all(css, "");

        for rule in RULE.captures_iter(&css) {
            let declarations = parse_declarations(&rule[2]);
            for selector in rule[1].split(',') {
                let Some(class) = CLASS_SELECTOR.captures(selector.trim()) else {
                    debug!(selector = selector.trim(), "Ignoring non-class selector");
                    continue;
                };
                self.rules
                    .entry(class[1].to_string())
                    .or_insert_with(|| declarations.clone());
            }
        }
    }

    /// Declarations for a class, in source order
    pub fn class(&self, name: &str) -> Option<&[(String, String)]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Split `prop: value; prop: value` into trimmed pairs.
///
/// Property names are lowercased. Entries without a colon are skipped.
pub fn parse_declarations(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}

/// Anything that can answer attribute lookups for the resolver
pub trait StyleSource {
    fn attribute(&self, name: &str) -> Option<&str>;
}

impl StyleSource for [(&str, &str)] {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }
}

impl<const N: usize> StyleSource for [(&str, &str); N] {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.as_slice().attribute(name)
    }
}

/// Properties a group passes down to its children
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Inherited {
    pub fill: ParsedColor,
    pub stroke: ParsedColor,
    pub stroke_width: f32,
    pub fill_rule: FillRule,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
}

impl Default for Inherited {
    fn default() -> Self {
        Self {
            fill: ParsedColor::BLACK,
            stroke: ParsedColor::NONE,
            stroke_width: 0.0,
            fill_rule: FillRule::NonZero,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

/// Fully resolved style of one element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub fill: ParsedColor,
    pub stroke: ParsedColor,
    pub stroke_width: f32,
    pub opacity: f32,
    pub fill_rule: FillRule,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
}

impl ResolvedStyle {
    fn from_inherited(inherited: &Inherited) -> Self {
        Self {
            fill: inherited.fill,
            stroke: inherited.stroke,
            stroke_width: inherited.stroke_width,
            opacity: 1.0,
            fill_rule: inherited.fill_rule,
            fill_opacity: inherited.fill_opacity,
            stroke_opacity: inherited.stroke_opacity,
        }
    }

    /// What this element hands down when it is a group.
    ///
    /// Group `opacity` is not inherited; it is composited into the children instead.
    pub fn inherited(&self) -> Inherited {
        Inherited {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            fill_rule: self.fill_rule,
            fill_opacity: self.fill_opacity,
            stroke_opacity: self.stroke_opacity,
        }
    }

    /// Effective fill alpha: element opacity × fill-opacity × color alpha
    pub fn effective_fill_opacity(&self) -> f32 {
        (self.opacity * self.fill_opacity * self.fill.alpha).clamp(0.0, 1.0)
    }

    /// Effective stroke alpha: element opacity × stroke-opacity × color alpha
    pub fn effective_stroke_opacity(&self) -> f32 {
        (self.opacity * self.stroke_opacity * self.stroke.alpha).clamp(0.0, 1.0)
    }

    fn apply(&mut self, property: &str, value: &str) {
        match property {
            "fill" => self.fill = parse_paint(value),
            "stroke" => self.stroke = parse_paint(value),
            "stroke-width" => match parse_length(value) {
                Some(width) => self.stroke_width = width.max(0.0),
                None => debug!(value, "Ignoring invalid stroke-width"),
            },
            "opacity" | "fill-opacity" | "stroke-opacity" => {
                let Some(amount) = parse_opacity(value) else {
                    debug!(property, value, "Ignoring invalid opacity");
                    return;
                };
                match property {
                    "opacity" => self.opacity = amount,
                    "fill-opacity" => self.fill_opacity = amount,
                    _ => self.stroke_opacity = amount,
                }
            }
            "fill-rule" => match FillRule::parse(value) {
                Some(rule) => self.fill_rule = rule,
                None => debug!(value, "Ignoring invalid fill-rule"),
            },
            _ => {}
        }
    }
}

/// Parse a length, dropping `px`/`pt`/`em`/`rem`/`%` units
pub(crate) fn parse_length(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = ["rem", "px", "pt", "em", "%"]
        .iter()
        .find_map(|unit| value.strip_suffix(unit))
        .unwrap_or(value);
    number.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parse an opacity number or percentage, clamped to `[0, 1]`
fn parse_opacity(value: &str) -> Option<f32> {
    let value = value.trim();
    let amount = match value.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok()? / 100.0,
        None => value.parse::<f32>().ok()?,
    };
    amount.is_finite().then(|| amount.clamp(0.0, 1.0))
}

/// Resolves element styles against one document's stylesheet
#[derive(Clone, Copy, Debug)]
pub struct StyleResolver<'s> {
    stylesheet: &'s Stylesheet,
}

impl<'s> StyleResolver<'s> {
    pub fn new(stylesheet: &'s Stylesheet) -> Self {
        Self { stylesheet }
    }

    pub fn resolve<S: StyleSource + ?Sized>(
        &self,
        element: &S,
        inherited: &Inherited,
    ) -> ResolvedStyle {
        let mut style = ResolvedStyle::from_inherited(inherited);

        for property in PROPERTIES {
            if let Some(value) = element.attribute(property) {
                style.apply(property, value);
            }
        }

        if let Some(classes) = element.attribute("class") {
            for class in classes.split_whitespace() {
                match self.stylesheet.class(class) {
                    Some(declarations) => {
                        for (property, value) in declarations {
                            style.apply(property, value);
                        }
                    }
                    None => debug!(class, "No stylesheet rule for class"),
                }
            }
        }

        if let Some(inline) = element.attribute("style") {
            for (property, value) in parse_declarations(inline) {
                style.apply(&property, &value);
            }
        }

        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Paint, Rgb};

    const NO_ATTRIBUTES: [(&str, &str); 0] = [];

    fn hex(color: ParsedColor) -> String {
        color.paint.to_string()
    }

    #[test]
    fn test_defaults() {
        let sheet = Stylesheet::default();
        let style = StyleResolver::new(&sheet).resolve(&NO_ATTRIBUTES, &Inherited::default());
        assert_eq!(hex(style.fill), "#000000");
        assert_eq!(style.stroke.paint, Paint::None);
        assert_eq!(style.stroke_width, 0.0);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.fill_rule, FillRule::NonZero);
    }

    #[test]
    fn test_precedence_inline_over_class_over_attribute() {
        let sheet = Stylesheet::parse(".a { fill: #00ff00; stroke: blue }");
        let resolver = StyleResolver::new(&sheet);

        let attrs_only = [("fill", "red")];
        assert_eq!(hex(resolver.resolve(&attrs_only, &Inherited::default()).fill), "#FF0000");

        let with_class = [("fill", "red"), ("class", "a")];
        let style = resolver.resolve(&with_class, &Inherited::default());
        assert_eq!(hex(style.fill), "#00FF00");
        assert_eq!(hex(style.stroke), "#0000FF");

        let with_inline = [("fill", "red"), ("class", "a"), ("style", "fill: white")];
        let style = resolver.resolve(&with_inline, &Inherited::default());
        assert_eq!(hex(style.fill), "#FFFFFF");
        assert_eq!(hex(style.stroke), "#0000FF");
    }

    #[test]
    fn test_inherited_below_attributes() {
        let sheet = Stylesheet::default();
        let resolver = StyleResolver::new(&sheet);
        let group = resolver.resolve(
            &[("fill", "red"), ("fill-rule", "evenodd")],
            &Inherited::default(),
        );
        let inherited = group.inherited();

        let child = resolver.resolve(&NO_ATTRIBUTES, &inherited);
        assert_eq!(hex(child.fill), "#FF0000");
        assert_eq!(child.fill_rule, FillRule::EvenOdd);

        let overriding = resolver.resolve(&[("fill", "blue")], &inherited);
        assert_eq!(hex(overriding.fill), "#0000FF");
    }

    #[test]
    fn test_multiple_classes_apply_in_order() {
        let sheet = Stylesheet::parse(".base { fill: red; stroke: red } .accent { stroke: blue }");
        let style = StyleResolver::new(&sheet)
            .resolve(&[("class", "base accent")], &Inherited::default());
        assert_eq!(hex(style.fill), "#FF0000");
        assert_eq!(hex(style.stroke), "#0000FF");
    }

    #[test]
    fn test_stylesheet_first_block_wins_and_comments_stripped() {
        let sheet = Stylesheet::parse(
            "/* .a { fill: green } */ .a { fill: red; fill: blue } .a { fill: white } \
             #id { fill: black } .b, .c { stroke-width: 2px }",
        );
        assert_eq!(sheet.len(), 3);
        let a = sheet.class("a").unwrap();
        assert_eq!(a.len(), 2);
        let style = StyleResolver::new(&sheet).resolve(&[("class", "a")], &Inherited::default());
        assert_eq!(hex(style.fill), "#0000FF");
        assert_eq!(sheet.class("c").unwrap()[0].1, "2px");
    }

    #[test]
    fn test_stroke_width_units_and_invalid_values() {
        let sheet = Stylesheet::default();
        let resolver = StyleResolver::new(&sheet);
        let style = resolver.resolve(&[("stroke-width", "1.5px")], &Inherited::default());
        assert_eq!(style.stroke_width, 1.5);

        let style = resolver.resolve(
            &[("stroke-width", "2"), ("style", "stroke-width: thick")],
            &Inherited::default(),
        );
        assert_eq!(style.stroke_width, 2.0);
    }

    #[test]
    fn test_opacity_and_alpha_fold_into_paint_opacity() {
        let sheet = Stylesheet::default();
        let style = StyleResolver::new(&sheet).resolve(
            &[
                ("fill", "rgba(255, 0, 0, 0.5)"),
                ("opacity", "0.5"),
                ("fill-opacity", "50%"),
                ("stroke", "black"),
                ("stroke-opacity", "2"),
            ],
            &Inherited::default(),
        );
        assert_eq!(style.fill.paint, Paint::Solid(Rgb::new(255, 0, 0)));
        assert_eq!(style.effective_fill_opacity(), 0.125);
        assert_eq!(style.effective_stroke_opacity(), 0.5);
    }

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations(" fill : red ; Stroke:blue;;broken; opacity:");
        assert_eq!(
            decls,
            vec![
                ("fill".to_string(), "red".to_string()),
                ("stroke".to_string(), "blue".to_string()),
            ]
        );
    }
}
