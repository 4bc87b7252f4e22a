//! SVG document type and loading

use std::fs;
use std::path::Path as FilePath;

use roxmltree::{Node, ParsingOptions};
use tracing::{debug, warn};

use crate::error::SvgError;
use crate::path::{parse_path_data, DrawingCommand, Point};
use crate::shape::{GroupShape, PathShape, Shape};
use crate::style::{parse_length, Inherited, StyleResolver, StyleSource, Stylesheet};

/// Size used when `width`/`height` are missing or unreadable
const DEFAULT_SIZE: f32 = 24.0;

impl StyleSource for Node<'_, '_> {
    fn attribute(&self, name: &str) -> Option<&str> {
        Node::attribute(self, name)
    }
}

/// The `viewBox` rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub const DEFAULT: ViewBox = ViewBox::new(0.0, 0.0, DEFAULT_SIZE, DEFAULT_SIZE);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `"minx miny width height"` (comma or whitespace separated)
    pub fn parse(text: &str) -> Option<Self> {
        let values: Vec<f32> = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()?;
        match values.as_slice() {
            &[x, y, width, height] => Some(Self::new(x, y, width, height)),
            _ => None,
        }
    }

    /// Whether the origin is shifted away from `(0, 0)`
    pub fn is_offset(&self) -> bool {
        self.x != 0.0 || self.y != 0.0
    }
}

/// A loaded icon: canvas size plus the shape tree in document order
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub width: f32,
    pub height: f32,
    pub view_box: ViewBox,
    pub shapes: Vec<Shape>,
    /// Source identifier, normally the file stem
    pub name: String,
}

impl Document {
    /// Load an SVG document from a file, named after the file stem
    pub fn from_file(path: impl AsRef<FilePath>) -> Result<Self, SvgError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_str(&text, &name)
    }

    /// Load an SVG document from a string
    pub fn from_str(svg_str: &str, name: &str) -> Result<Self, SvgError> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(svg_str, options)
            .map_err(|e| SvgError::Parse(e.to_string()))?;

        let root = xml.root_element();
        if root.tag_name().name() != "svg" {
            return Err(SvgError::NotSvg(root.tag_name().name().to_string()));
        }

        let width = dimension(root, "width");
        let height = dimension(root, "height");
        let view_box = match root.attribute("viewBox") {
            None => ViewBox::new(0.0, 0.0, width, height),
            Some(text) => ViewBox::parse(text).unwrap_or_else(|| {
                warn!(view_box = text, "Unreadable viewBox, using 0 0 24 24");
                ViewBox::DEFAULT
            }),
        };

        let mut stylesheet = Stylesheet::default();
        for style in xml.descendants().filter(|n| n.has_tag_name("style")) {
            for text in style.children().filter_map(|n| n.text()) {
                stylesheet.extend(text);
            }
        }
        if !stylesheet.is_empty() {
            debug!(classes = stylesheet.len(), "Parsed stylesheet");
        }

        let resolver = StyleResolver::new(&stylesheet);
        let shapes = collect_shapes(root, &resolver, &Inherited::default());

        Ok(Self {
            width,
            height,
            view_box,
            shapes,
            name: name.to_string(),
        })
    }

    /// Declared width and height
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Top-level paths, in document order
    pub fn paths(&self) -> impl Iterator<Item = &PathShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Path(path) => Some(path),
            Shape::Group(_) => None,
        })
    }

    /// Top-level groups, in document order
    pub fn groups(&self) -> impl Iterator<Item = &GroupShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Group(group) => Some(group),
            Shape::Path(_) => None,
        })
    }

    /// Total number of path commands across the whole tree
    pub fn command_count(&self) -> usize {
        fn count(shapes: &[Shape]) -> usize {
            shapes
                .iter()
                .map(|shape| match shape {
                    Shape::Path(path) => path.commands.len(),
                    Shape::Group(group) => count(&group.children),
                })
                .sum()
        }
        count(&self.shapes)
    }
}

fn dimension(root: Node, name: &str) -> f32 {
    match root.attribute(name) {
        None => DEFAULT_SIZE,
        Some(text) => parse_length(text).filter(|v| *v > 0.0).unwrap_or_else(|| {
            warn!(attribute = name, value = text, "Unreadable dimension, using 24");
            DEFAULT_SIZE
        }),
    }
}

/// Recursively collect drawable children of `parent`
fn collect_shapes(parent: Node, resolver: &StyleResolver, inherited: &Inherited) -> Vec<Shape> {
    let mut shapes = Vec::new();

    for child in parent.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "path" | "polygon" | "polyline" => {
                if let Some(path) = path_shape(child, resolver, inherited) {
                    shapes.push(Shape::Path(path));
                }
            }
            "g" => shapes.push(Shape::Group(group_shape(child, resolver, inherited))),
            "style" | "title" | "desc" | "metadata" => {}
            other => debug!(element = other, "Skipping unsupported element"),
        }
    }

    shapes
}

fn path_shape(node: Node, resolver: &StyleResolver, inherited: &Inherited) -> Option<PathShape> {
    let tag = node.tag_name().name();
    let commands = match tag {
        "path" => parse_path_data(node.attribute("d").unwrap_or_default()),
        _ => poly_commands(node.attribute("points").unwrap_or_default(), tag == "polygon"),
    };
    if commands.is_empty() {
        debug!(element = tag, "Skipping element with no drawable data");
        return None;
    }

    let style = resolver.resolve(&node, inherited);
    let transform = node.attribute("transform").map(str::to_string);
    Some(PathShape::styled(commands, &style, transform))
}

fn group_shape(node: Node, resolver: &StyleResolver, inherited: &Inherited) -> GroupShape {
    let style = resolver.resolve(&node, inherited);
    let children = collect_shapes(node, resolver, &style.inherited());
    GroupShape {
        opacity: style.opacity,
        transform: node.attribute("transform").map(str::to_string),
        children,
    }
}

/// Convert a `points` list into `M` followed by `L`s, closed for polygons.
///
/// A trailing unpaired number is dropped like any incomplete path operand.
fn poly_commands(points: &str, close: bool) -> Vec<DrawingCommand> {
    if points.trim().is_empty() {
        return Vec::new();
    }
    let mut commands = parse_path_data(&format!("M{points}"));
    if close && !commands.is_empty() {
        commands.push(DrawingCommand::ClosePath);
    }
    commands
}
