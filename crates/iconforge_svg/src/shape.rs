//! Styled shape tree and group opacity composition

use crate::color::Paint;
use crate::path::DrawingCommand;
use crate::style::{FillRule, ResolvedStyle};

/// One drawable path with its resolved paint
#[derive(Clone, Debug, PartialEq)]
pub struct PathShape {
    pub commands: Vec<DrawingCommand>,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub fill_rule: FillRule,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    /// Raw `transform` attribute, passed through untouched
    pub transform: Option<String>,
}

impl PathShape {
    /// A path with default styling: black fill, no stroke.
    pub fn new(commands: Vec<DrawingCommand>) -> Self {
        Self {
            commands,
            fill: Paint::Solid(crate::color::Rgb::BLACK),
            stroke: Paint::None,
            stroke_width: 0.0,
            fill_rule: FillRule::NonZero,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            transform: None,
        }
    }

    pub fn styled(
        commands: Vec<DrawingCommand>,
        style: &ResolvedStyle,
        transform: Option<String>,
    ) -> Self {
        Self {
            commands,
            fill: style.fill.paint,
            stroke: style.stroke.paint,
            stroke_width: style.stroke_width,
            fill_rule: style.fill_rule,
            fill_opacity: style.effective_fill_opacity(),
            stroke_opacity: style.effective_stroke_opacity(),
            transform,
        }
    }

    pub fn has_fill(&self) -> bool {
        !self.fill.is_none()
    }

    /// A stroke is drawn only with a paint and a positive width
    pub fn has_stroke(&self) -> bool {
        !self.stroke.is_none() && self.stroke_width > 0.0
    }

    /// Copy of this path with both paint opacities scaled by `factor`
    pub fn with_opacity(&self, factor: f32) -> PathShape {
        PathShape {
            fill_opacity: (self.fill_opacity * factor).clamp(0.0, 1.0),
            stroke_opacity: (self.stroke_opacity * factor).clamp(0.0, 1.0),
            ..self.clone()
        }
    }
}

/// A `<g>` element
#[derive(Clone, Debug, PartialEq)]
pub struct GroupShape {
    pub opacity: f32,
    pub transform: Option<String>,
    pub children: Vec<Shape>,
}

impl GroupShape {
    pub fn new(children: Vec<Shape>) -> Self {
        Self {
            opacity: 1.0,
            transform: None,
            children,
        }
    }

    /// Children with this group's opacity folded in.
    ///
    /// Nested groups come back with opacity 1.0 and their own descendants already
    /// scaled, so compositing a returned group again changes nothing.
    pub fn composite(&self) -> Vec<Shape> {
        self.children
            .iter()
            .map(|child| child.with_opacity(self.opacity))
            .collect()
    }

    /// All descendant paths, composited, in document order
    pub fn flatten(&self) -> Vec<PathShape> {
        let mut paths = Vec::new();
        for child in self.composite() {
            match child {
                Shape::Path(path) => paths.push(path),
                Shape::Group(group) => paths.extend(group.flatten()),
            }
        }
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node of the shape tree
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Path(PathShape),
    Group(GroupShape),
}

impl Shape {
    fn with_opacity(&self, factor: f32) -> Shape {
        match self {
            Shape::Path(path) => Shape::Path(path.with_opacity(factor)),
            Shape::Group(group) => {
                let factor = factor * group.opacity;
                Shape::Group(GroupShape {
                    opacity: 1.0,
                    transform: group.transform.clone(),
                    children: group
                        .children
                        .iter()
                        .map(|child| child.with_opacity(factor))
                        .collect(),
                })
            }
        }
    }
}
