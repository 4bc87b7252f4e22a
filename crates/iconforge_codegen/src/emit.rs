//! Kotlin `ImageVector` emission
//!
//! One icon becomes a file declaring a lazily built, cached `ImageVector` property. Each
//! path becomes a `path { }` block and each group a `group { }` block. Paths longer
//! than the configured limit are moved into `PathBuilder` extension functions.

use std::collections::BTreeSet;

use iconforge_svg::{Document, DrawingCommand, FillRule, GroupShape, PathShape, Point, Shape};
use tracing::warn;

use crate::format;
use crate::split::{needs_split, split_commands, DEFAULT_MAX_COMMANDS};
use crate::transform::GroupTransform;
use crate::writer::CodeWriter;

const IMPORT_COLOR: &str = "androidx.compose.ui.graphics.Color";
const IMPORT_SOLID_COLOR: &str = "androidx.compose.ui.graphics.SolidColor";
const IMPORT_FILL_TYPE: &str = "androidx.compose.ui.graphics.PathFillType";
const IMPORT_IMAGE_VECTOR: &str = "androidx.compose.ui.graphics.vector.ImageVector";
const IMPORT_PATH: &str = "androidx.compose.ui.graphics.vector.path";
const IMPORT_GROUP: &str = "androidx.compose.ui.graphics.vector.group";
const IMPORT_PATH_BUILDER: &str = "androidx.compose.ui.graphics.vector.PathBuilder";
const IMPORT_DP: &str = "androidx.compose.ui.unit.dp";

/// Depth of statements inside `ImageVector.Builder(...).apply { }`
const BODY_DEPTH: usize = 3;

/// Settings for emitting one icon
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Base package; directory namespaces are appended to it
    pub package: String,
    /// Paths with more commands than this are split into helper routines
    pub max_commands: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            package: "com.example.icons".to_string(),
            max_commands: DEFAULT_MAX_COMMANDS,
        }
    }
}

/// Render one icon file.
///
/// `identifier` names the property, `package` is the fully qualified package the file
/// declares.
pub fn emit_icon(
    document: &Document,
    identifier: &str,
    package: &str,
    max_commands: usize,
) -> String {
    let mut emitter = IconEmitter::new(identifier, max_commands);
    let body = emitter.body(document);

    let mut w = CodeWriter::new();
    if !document.name.is_empty() {
        w.line(format!(
            "// Auto-generated by iconforge from {}.svg - DO NOT EDIT",
            document.name
        ));
        w.blank();
    }
    if !package.is_empty() {
        w.line(format!("package {package}"));
        w.blank();
    }
    for import in &emitter.imports {
        w.line(format!("import {import}"));
    }
    w.blank();

    let cache = format!("_{identifier}");
    w.line(format!("val {identifier}: ImageVector"));
    w.indent();
    w.open("get() {");
    w.open(format!("if ({cache} != null) {{"));
    w.line(format!("return {cache}!!"));
    w.close("}");
    w.open(format!("{cache} = ImageVector.Builder("));
    w.line(format!("name = {},", format::string(identifier)));
    w.line(format!("defaultWidth = {},", format::dp(document.width)));
    w.line(format!("defaultHeight = {},", format::dp(document.height)));
    w.line(format!("viewportWidth = {},", format::float(document.view_box.width)));
    w.line(format!("viewportHeight = {}", format::float(document.view_box.height)));
    w.close_open(").apply {");
    w.raw(&body);
    w.close("}.build()");
    w.line(format!("return {cache}!!"));
    w.close("}");
    w.dedent();
    w.blank();
    w.line(format!("private var {cache}: ImageVector? = null"));

    for routine in &emitter.routines {
        w.blank();
        w.raw(routine);
    }

    w.finish()
}

/// Per-call emission state: imports in use and helper routines produced so far
struct IconEmitter<'a> {
    identifier: &'a str,
    max_commands: usize,
    imports: BTreeSet<&'static str>,
    routines: Vec<String>,
}

impl<'a> IconEmitter<'a> {
    fn new(identifier: &'a str, max_commands: usize) -> Self {
        let imports = [IMPORT_IMAGE_VECTOR, IMPORT_PATH, IMPORT_DP].into_iter().collect();
        Self {
            identifier,
            max_commands,
            imports,
            routines: Vec::new(),
        }
    }

    fn body(&mut self, document: &Document) -> String {
        let mut w = CodeWriter::with_depth(BODY_DEPTH);
        let view_box = document.view_box;

        // Compose viewports always start at the origin
        let shifted = view_box.is_offset();
        if shifted {
            let shift = GroupTransform::translation(-view_box.x, -view_box.y);
            self.open_group(&mut w, &shift.arguments());
        }
        for shape in &document.shapes {
            self.shape(&mut w, shape);
        }
        if shifted {
            w.close("}");
        }

        w.finish()
    }

    fn shape(&mut self, w: &mut CodeWriter, shape: &Shape) {
        match shape {
            Shape::Path(path) => self.path(w, path),
            Shape::Group(group) => self.group(w, group),
        }
    }

    fn group(&mut self, w: &mut CodeWriter, group: &GroupShape) {
        if group.is_empty() {
            return;
        }
        let arguments = self.transform_arguments(w, group.transform.as_deref());
        self.open_group(w, &arguments);
        for child in group.composite() {
            self.shape(w, &child);
        }
        w.close("}");
    }

    fn path(&mut self, w: &mut CodeWriter, path: &PathShape) {
        if path.commands.is_empty() {
            return;
        }

        let arguments = self.transform_arguments(w, path.transform.as_deref());
        let wrapped = !arguments.is_empty();
        if wrapped {
            self.open_group(w, &arguments);
        }

        let params = self.path_params(path);
        if params.is_empty() {
            w.open("path {");
        } else {
            w.open("path(");
            write_arguments(w, &params);
            w.close_open(") {");
        }

        if needs_split(path.commands.len(), self.max_commands) {
            for chunk in split_commands(&path.commands, self.max_commands) {
                let name = self.routine(&chunk.commands(), chunk.origin);
                w.line(format!("{name}()"));
            }
        } else {
            write_commands(w, &path.commands, Point::ZERO);
        }

        w.close("}");
        if wrapped {
            w.close("}");
        }
    }

    /// Named arguments for `path(...)`
    fn path_params(&mut self, path: &PathShape) -> Vec<String> {
        let mut params = Vec::new();

        if let Some(rgb) = path.fill.color() {
            self.use_colors();
            params.push(format!(
                "fill = SolidColor({})",
                format::color(rgb, path.fill_opacity)
            ));
        }
        if path.fill_rule == FillRule::EvenOdd {
            self.imports.insert(IMPORT_FILL_TYPE);
            params.push("pathFillType = PathFillType.EvenOdd".to_string());
        }
        if let (Some(rgb), true) = (path.stroke.color(), path.has_stroke()) {
            self.use_colors();
            params.push(format!(
                "stroke = SolidColor({})",
                format::color(rgb, path.stroke_opacity)
            ));
            params.push(format!("strokeLineWidth = {}", format::float(path.stroke_width)));
        }

        params
    }

    fn use_colors(&mut self) {
        self.imports.insert(IMPORT_COLOR);
        self.imports.insert(IMPORT_SOLID_COLOR);
    }

    /// Map a raw transform to group arguments. Unsupported transforms become a comment.
    fn transform_arguments(&mut self, w: &mut CodeWriter, transform: Option<&str>) -> Vec<String> {
        let Some(text) = transform.map(str::trim).filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        match GroupTransform::parse(text) {
            Some(parsed) => parsed.arguments(),
            None => {
                warn!(
                    icon = self.identifier,
                    transform = text,
                    "Unsupported transform, emitting as comment"
                );
                w.line(format!("// transform: {}", text.replace('\n', " ")));
                Vec::new()
            }
        }
    }

    fn open_group(&mut self, w: &mut CodeWriter, arguments: &[String]) {
        self.imports.insert(IMPORT_GROUP);
        if arguments.is_empty() {
            w.open("group {");
        } else {
            w.open("group(");
            write_arguments(w, arguments);
            w.close_open(") {");
        }
    }

    /// Render a helper routine and return its name
    fn routine(&mut self, commands: &[DrawingCommand], origin: Point) -> String {
        self.imports.insert(IMPORT_PATH_BUILDER);
        let name = format!("build{}Path{}", self.identifier, self.routines.len() + 1);

        let mut w = CodeWriter::new();
        w.open(format!("private fun PathBuilder.{name}() {{"));
        write_commands(&mut w, commands, origin);
        w.close("}");
        self.routines.push(w.finish());

        name
    }
}

fn write_arguments(w: &mut CodeWriter, arguments: &[String]) {
    let last = arguments.len().saturating_sub(1);
    for (i, argument) in arguments.iter().enumerate() {
        if i == last {
            w.line(argument);
        } else {
            w.line(format!("{argument},"));
        }
    }
}

fn write_commands(w: &mut CodeWriter, commands: &[DrawingCommand], origin: Point) {
    let mut pen = origin;
    for command in commands {
        w.line(instruction(command, pen));
        pen = command.end_point(pen);
    }
}

/// The `PathBuilder` call for one command, given the pen position before it
pub fn instruction(command: &DrawingCommand, pen: Point) -> String {
    let f = format::float;
    match *command {
        DrawingCommand::MoveTo(p) => format!("moveTo({}, {})", f(p.x), f(p.y)),
        DrawingCommand::LineTo(p) => format!("lineTo({}, {})", f(p.x), f(p.y)),
        DrawingCommand::HorizontalLineTo { x, relative: true } => {
            format!("horizontalLineToRelative({})", f(x - pen.x))
        }
        DrawingCommand::HorizontalLineTo { x, relative: false } => {
            format!("horizontalLineTo({})", f(x))
        }
        DrawingCommand::VerticalLineTo { y, relative: true } => {
            format!("verticalLineToRelative({})", f(y - pen.y))
        }
        DrawingCommand::VerticalLineTo { y, relative: false } => {
            format!("verticalLineTo({})", f(y))
        }
        DrawingCommand::CubicCurveTo {
            control1,
            control2,
            end,
        } => format!(
            "curveTo({}, {}, {}, {}, {}, {})",
            f(control1.x),
            f(control1.y),
            f(control2.x),
            f(control2.y),
            f(end.x),
            f(end.y)
        ),
        DrawingCommand::SmoothCubicCurveTo { control2, end } => format!(
            "reflectiveCurveTo({}, {}, {}, {})",
            f(control2.x),
            f(control2.y),
            f(end.x),
            f(end.y)
        ),
        DrawingCommand::QuadraticCurveTo { control, end } => format!(
            "quadTo({}, {}, {}, {})",
            f(control.x),
            f(control.y),
            f(end.x),
            f(end.y)
        ),
        DrawingCommand::SmoothQuadraticCurveTo { end } => {
            format!("reflectiveQuadTo({}, {})", f(end.x), f(end.y))
        }
        DrawingCommand::ArcTo {
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            end,
        } => format!(
            "arcTo({}, {}, {}, {}, {}, {}, {})",
            f(rx),
            f(ry),
            f(rotation),
            large_arc,
            sweep,
            f(end.x),
            f(end.y)
        ),
        DrawingCommand::ClosePath => "close()".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(svg: &str, max_commands: usize) -> String {
        let doc = Document::from_str(svg, "test").unwrap();
        emit_icon(&doc, "Test", "com.example.icons", max_commands)
    }

    fn svg(body: &str) -> String {
        format!(r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24">{body}</svg>"#)
    }

    const INSTRUCTIONS: &[&str] = &[
        "moveTo(",
        "lineTo(",
        "horizontalLineTo",
        "verticalLineTo",
        "curveTo(",
        "reflectiveCurveTo(",
        "quadTo(",
        "reflectiveQuadTo(",
        "arcTo(",
        "close()",
    ];

    /// Builder instruction lines, indentation stripped
    fn body_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|l| INSTRUCTIONS.iter().any(|p| l.starts_with(p)))
            .map(str::to_string)
            .collect()
    }

    fn long_path(segments: usize) -> String {
        let mut d = String::from("M0 0");
        for i in 1..segments {
            d.push_str(if i % 2 == 0 { " h1" } else { " l1 1" });
        }
        d
    }

    #[test]
    fn test_cached_accessor_shape() {
        let out = emit(&svg(r#"<path d="M10 10 L20 20 Z"/>"#), 300);
        assert!(out.starts_with("// Auto-generated by iconforge from test.svg - DO NOT EDIT\n\npackage com.example.icons\n"));
        assert!(out.contains("val Test: ImageVector\n    get() {\n        if (_Test != null) {\n            return _Test!!\n        }\n"));
        assert!(out.contains("        _Test = ImageVector.Builder(\n            name = \"Test\",\n            defaultWidth = 24.00.dp,\n"));
        assert!(out.contains("            viewportHeight = 24.00f\n        ).apply {\n"));
        assert!(out.contains("            path(\n                fill = SolidColor(Color(0xFF000000))\n            ) {\n                moveTo(10.00f, 10.00f)\n                lineTo(20.00f, 20.00f)\n                close()\n            }\n"));
        assert!(out.contains("        }.build()\n        return _Test!!\n    }\n\nprivate var _Test: ImageVector? = null\n"));
        assert!(out.contains("import androidx.compose.ui.graphics.SolidColor\n"));
        assert!(!out.contains("PathBuilder"));
        assert!(!out.contains("vector.group"));
    }

    #[test]
    fn test_path_directives() {
        let out = emit(
            &svg(r##"<path d="M0 0 H5" fill="none" stroke="#ff0000" stroke-width="2" stroke-opacity="0.5" fill-rule="evenodd"/>"##),
            300,
        );
        assert!(!out.contains("fill = "));
        assert!(out.contains("pathFillType = PathFillType.EvenOdd,\n"));
        assert!(out.contains("stroke = SolidColor(Color(0x80FF0000)),\n"));
        assert!(out.contains("strokeLineWidth = 2.00f\n"));
        assert!(out.contains("horizontalLineTo(5.00f)"));
    }

    #[test]
    fn test_stroke_without_width_is_omitted() {
        let out = emit(&svg(r#"<path d="M0 0 L1 1" fill="none" stroke="black"/>"#), 300);
        assert!(out.contains("            path {\n"));
        assert!(!out.contains("stroke"));
    }

    #[test]
    fn test_relative_lines_keep_style() {
        let out = emit(&svg(r#"<path d="M2 3 h4 v-1 H1 V0"/>"#), 300);
        assert_eq!(
            body_lines(&out),
            vec![
                "moveTo(2.00f, 3.00f)",
                "horizontalLineToRelative(4.00f)",
                "verticalLineToRelative(-1.00f)",
                "horizontalLineTo(1.00f)",
                "verticalLineTo(0.00f)",
            ]
        );
    }

    #[test]
    fn test_curves_and_arcs() {
        let out = emit(
            &svg(r#"<path d="M0 0 C1 2 3 4 5 6 S7 8 9 10 Q1 1 2 2 T3 3 A4 4 0 1 0 5 5"/>"#),
            300,
        );
        assert!(out.contains("curveTo(1.00f, 2.00f, 3.00f, 4.00f, 5.00f, 6.00f)"));
        assert!(out.contains("reflectiveCurveTo(7.00f, 8.00f, 9.00f, 10.00f)"));
        assert!(out.contains("quadTo(1.00f, 1.00f, 2.00f, 2.00f)"));
        assert!(out.contains("reflectiveQuadTo(3.00f, 3.00f)"));
        assert!(out.contains("arcTo(4.00f, 4.00f, 0.00f, true, false, 5.00f, 5.00f)"));
    }

    #[test]
    fn test_group_opacity_composited_into_children() {
        let out = emit(
            &svg(r#"<g opacity="0.5" transform="translate(1 2)"><path d="M0 0 L1 1" fill-opacity="0.5"/></g>"#),
            300,
        );
        assert!(out.contains("            group(\n                translationX = 1.00f,\n                translationY = 2.00f\n            ) {\n"));
        assert!(out.contains("fill = SolidColor(Color(0x40000000))"));
        assert!(out.contains("import androidx.compose.ui.graphics.vector.group\n"));
    }

    #[test]
    fn test_unsupported_transform_becomes_comment() {
        let out = emit(
            &svg(r#"<g transform="matrix(1 0 0 1 2 2)"><path d="M0 0 L1 1"/></g>"#),
            300,
        );
        assert!(out.contains("            // transform: matrix(1 0 0 1 2 2)\n            group {\n"));
    }

    #[test]
    fn test_path_transform_wraps_in_group() {
        let out = emit(&svg(r#"<path d="M0 0 L1 1" transform="rotate(90 12 12)"/>"#), 300);
        assert!(out.contains("group(\n                rotate = 90.00f,"));
    }

    #[test]
    fn test_view_box_offset_shifts_content() {
        let doc = Document::from_str(
            r#"<svg viewBox="-2 4 20 20"><path d="M0 0 L1 1"/></svg>"#,
            "shifted",
        )
        .unwrap();
        let out = emit_icon(&doc, "Shifted", "", 300);
        assert!(out.contains("translationX = 2.00f,\n"));
        assert!(out.contains("translationY = -4.00f\n"));
        assert!(!out.contains("package "));
    }

    #[test]
    fn test_split_into_routines() {
        let d = long_path(650);
        let split = emit(&svg(&format!(r#"<path d="{d}"/>"#)), 300);
        let whole = emit(&svg(&format!(r#"<path d="{d}"/>"#)), 1000);

        assert!(split.contains("                buildTestPath1()\n                buildTestPath2()\n                buildTestPath3()\n            }\n"));
        assert!(!split.contains("buildTestPath4"));
        assert!(split.contains("import androidx.compose.ui.graphics.vector.PathBuilder\n"));

        let routine_sizes: Vec<usize> = split
            .split("private fun PathBuilder.")
            .skip(1)
            .map(|routine| body_lines(routine).len())
            .collect();
        assert_eq!(routine_sizes, vec![300, 300, 50]);

        // Concatenated routine bodies match the inline rendering
        assert_eq!(body_lines(&split), body_lines(&whole));
        assert!(!whole.contains("buildTestPath"));
    }

    #[test]
    fn test_routine_numbering_is_per_icon() {
        let d = long_path(20);
        let text = svg(&format!(r#"<path d="{d}"/><path d="{d}"/>"#));
        let first = emit(&text, 10);
        let second = emit(&text, 10);
        assert!(first.contains("buildTestPath4()"));
        assert!(!first.contains("buildTestPath5"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_group_skipped() {
        let out = emit(&svg("<g><defs/></g>"), 300);
        assert!(!out.contains("group"));
    }
}
