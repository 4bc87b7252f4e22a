//! SVG path-data parsing into absolute drawing commands
//!
//! The parser is fail-soft: incomplete operand groups and unknown command letters are
//! logged and dropped, and parsing resumes at the next token.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Numbers (with optional sign, fraction and exponent) or single command letters.
/// Commas and whitespace fall between matches and are discarded.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<num>[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)|(?P<cmd>[A-Za-z])")
        .expect("path token pattern is valid")
});

/// A 2D point in user space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One resolved path-data command.
///
/// Coordinates are always absolute. `relative` on the horizontal/vertical variants only
/// records how the author wrote the command so it can be emitted the same way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawingCommand {
    MoveTo(Point),
    LineTo(Point),
    HorizontalLineTo {
        x: f32,
        relative: bool,
    },
    VerticalLineTo {
        y: f32,
        relative: bool,
    },
    CubicCurveTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Second control point and end only; the first control point is the reflection of
    /// the previous segment's and is left for the consumer to compute.
    SmoothCubicCurveTo {
        control2: Point,
        end: Point,
    },
    QuadraticCurveTo {
        control: Point,
        end: Point,
    },
    SmoothQuadraticCurveTo {
        end: Point,
    },
    ArcTo {
        rx: f32,
        ry: f32,
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        end: Point,
    },
    ClosePath,
}

impl DrawingCommand {
    /// Pen position after this command, given the position before it.
    ///
    /// `ClosePath` leaves the pen where it was.
    pub fn end_point(&self, pen: Point) -> Point {
        match *self {
            DrawingCommand::MoveTo(p) | DrawingCommand::LineTo(p) => p,
            DrawingCommand::HorizontalLineTo { x, .. } => Point::new(x, pen.y),
            DrawingCommand::VerticalLineTo { y, .. } => Point::new(pen.x, y),
            DrawingCommand::CubicCurveTo { end, .. }
            | DrawingCommand::SmoothCubicCurveTo { end, .. }
            | DrawingCommand::QuadraticCurveTo { end, .. }
            | DrawingCommand::SmoothQuadraticCurveTo { end }
            | DrawingCommand::ArcTo { end, .. } => end,
            DrawingCommand::ClosePath => pen,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Move,
    Line,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Arc,
    Close,
}

impl Kind {
    fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => Kind::Move,
            'L' => Kind::Line,
            'H' => Kind::Horizontal,
            'V' => Kind::Vertical,
            'C' => Kind::Cubic,
            'S' => Kind::SmoothCubic,
            'Q' => Kind::Quadratic,
            'T' => Kind::SmoothQuadratic,
            'A' => Kind::Arc,
            'Z' => Kind::Close,
            _ => return None,
        };
        Some(kind)
    }

    fn arity(self) -> usize {
        match self {
            Kind::Move | Kind::Line | Kind::SmoothQuadratic => 2,
            Kind::Horizontal | Kind::Vertical => 1,
            Kind::Cubic => 6,
            Kind::SmoothCubic | Kind::Quadratic => 4,
            Kind::Arc => 7,
            Kind::Close => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token<'a> {
    Command(char),
    Number(&'a str),
}

fn tokenize(data: &str) -> Vec<Token<'_>> {
    TOKEN
        .captures_iter(data)
        .filter_map(|caps| {
            if let Some(num) = caps.name("num") {
                Some(Token::Number(num.as_str()))
            } else {
                caps.name("cmd")
                    .and_then(|cmd| cmd.as_str().chars().next())
                    .map(Token::Command)
            }
        })
        .collect()
}

/// Parse path data starting from the origin.
pub fn parse_path_data(data: &str) -> Vec<DrawingCommand> {
    PathParser::new(data).parse()
}

/// Path-data interpreter over a token stream
pub struct PathParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    current: Point,
    commands: Vec<DrawingCommand>,
}

impl<'a> PathParser<'a> {
    pub fn new(data: &'a str) -> Self {
        Self::with_origin(data, Point::ZERO)
    }

    /// Start with the pen at `origin` instead of `(0, 0)`.
    ///
    /// Used to re-parse a fragment cut out of a longer path, where leading relative
    /// commands are relative to wherever the previous fragment left the pen.
    pub fn with_origin(data: &'a str, origin: Point) -> Self {
        Self {
            tokens: tokenize(data),
            pos: 0,
            current: origin,
            commands: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Vec<DrawingCommand> {
        while let Some(token) = self.tokens.get(self.pos).copied() {
            self.pos += 1;
            match token {
                Token::Command(letter) => self.command(letter),
                Token::Number(text) => {
                    warn!(token = text, "Path number without a command, skipping");
                }
            }
        }
        self.commands
    }

    fn command(&mut self, letter: char) {
        let Some(mut kind) = Kind::from_letter(letter) else {
            warn!(command = %letter, "Unknown path command, skipping");
            return;
        };
        if kind == Kind::Close {
            self.commands.push(DrawingCommand::ClosePath);
            return;
        }

        let relative = letter.is_ascii_lowercase();
        let mut first = true;
        loop {
            if !first && !matches!(self.tokens.get(self.pos), Some(Token::Number(_))) {
                break;
            }
            match self.operands(kind) {
                Some(values) => self.push(kind, relative, &values),
                None => {
                    warn!(
                        command = %letter,
                        expected = kind.arity(),
                        "Incomplete path command, dropping"
                    );
                    break;
                }
            }
            // Extra coordinate pairs after a moveto are implicit linetos
            if kind == Kind::Move {
                kind = Kind::Line;
            }
            first = false;
        }
    }

    fn operands(&mut self, kind: Kind) -> Option<[f32; 7]> {
        let mut values = [0.0; 7];
        for (i, slot) in values.iter_mut().take(kind.arity()).enumerate() {
            let is_flag = kind == Kind::Arc && (i == 3 || i == 4);
            *slot = if is_flag {
                self.next_flag()?
            } else {
                self.next_number()?
            };
        }
        Some(values)
    }

    /// Next operand; out-of-range literals such as `1e39` count as missing
    fn next_number(&mut self) -> Option<f32> {
        match self.tokens.get(self.pos).copied() {
            Some(Token::Number(text)) => {
                self.pos += 1;
                text.parse::<f32>().ok().filter(|value| value.is_finite())
            }
            _ => None,
        }
    }

    /// Arc flags are single digits and may be packed against the following number,
    /// e.g. `011` is large-arc `0`, sweep `1`, then `1`.
    fn next_flag(&mut self) -> Option<f32> {
        let Some(Token::Number(text)) = self.tokens.get(self.pos).copied() else {
            return None;
        };
        match text.as_bytes().first() {
            Some(&digit @ (b'0' | b'1')) if text.len() > 1 => {
                self.tokens[self.pos] = Token::Number(&text[1..]);
                Some(if digit == b'1' { 1.0 } else { 0.0 })
            }
            _ => {
                let value = self.next_number()?;
                Some(if value != 0.0 { 1.0 } else { 0.0 })
            }
        }
    }

    fn push(&mut self, kind: Kind, relative: bool, v: &[f32; 7]) {
        let base = if relative { self.current } else { Point::ZERO };
        let at = |x: f32, y: f32| Point::new(base.x + x, base.y + y);

        let command = match kind {
            Kind::Move => DrawingCommand::MoveTo(at(v[0], v[1])),
            Kind::Line => DrawingCommand::LineTo(at(v[0], v[1])),
            Kind::Horizontal => DrawingCommand::HorizontalLineTo {
                x: base.x + v[0],
                relative,
            },
            Kind::Vertical => DrawingCommand::VerticalLineTo {
                y: base.y + v[0],
                relative,
            },
            Kind::Cubic => DrawingCommand::CubicCurveTo {
                control1: at(v[0], v[1]),
                control2: at(v[2], v[3]),
                end: at(v[4], v[5]),
            },
            Kind::SmoothCubic => DrawingCommand::SmoothCubicCurveTo {
                control2: at(v[0], v[1]),
                end: at(v[2], v[3]),
            },
            Kind::Quadratic => DrawingCommand::QuadraticCurveTo {
                control: at(v[0], v[1]),
                end: at(v[2], v[3]),
            },
            Kind::SmoothQuadratic => DrawingCommand::SmoothQuadraticCurveTo { end: at(v[0], v[1]) },
            Kind::Arc => DrawingCommand::ArcTo {
                rx: v[0].abs(),
                ry: v[1].abs(),
                rotation: v[2],
                large_arc: v[3] != 0.0,
                sweep: v[4] != 0.0,
                end: at(v[5], v[6]),
            },
            Kind::Close => DrawingCommand::ClosePath,
        };

        self.current = command.end_point(self.current);
        self.commands.push(command);
    }
}

/// Write commands back to path-data text.
///
/// Everything is written absolute except horizontal/vertical lines the author wrote
/// relative, which are written as `h`/`v` deltas from the pen. Parsing the result with
/// [`PathParser::with_origin`] and the same `origin` reproduces `commands`.
pub fn to_path_data(commands: &[DrawingCommand], origin: Point) -> String {
    let mut out = String::new();
    let mut pen = origin;

    for command in commands {
        if !out.is_empty() {
            out.push(' ');
        }
        let text = match *command {
            DrawingCommand::MoveTo(p) => format!("M{} {}", p.x, p.y),
            DrawingCommand::LineTo(p) => format!("L{} {}", p.x, p.y),
            DrawingCommand::HorizontalLineTo { x, relative: true } => format!("h{}", x - pen.x),
            DrawingCommand::HorizontalLineTo { x, relative: false } => format!("H{}", x),
            DrawingCommand::VerticalLineTo { y, relative: true } => format!("v{}", y - pen.y),
            DrawingCommand::VerticalLineTo { y, relative: false } => format!("V{}", y),
            DrawingCommand::CubicCurveTo {
                control1,
                control2,
                end,
            } => format!(
                "C{} {} {} {} {} {}",
                control1.x, control1.y, control2.x, control2.y, end.x, end.y
            ),
            DrawingCommand::SmoothCubicCurveTo { control2, end } => {
                format!("S{} {} {} {}", control2.x, control2.y, end.x, end.y)
            }
            DrawingCommand::QuadraticCurveTo { control, end } => {
                format!("Q{} {} {} {}", control.x, control.y, end.x, end.y)
            }
            DrawingCommand::SmoothQuadraticCurveTo { end } => format!("T{} {}", end.x, end.y),
            DrawingCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                end,
            } => format!(
                "A{} {} {} {} {} {} {}",
                rx,
                ry,
                rotation,
                u8::from(large_arc),
                u8::from(sweep),
                end.x,
                end.y
            ),
            DrawingCommand::ClosePath => "Z".to_string(),
        };
        out.push_str(&text);
        pen = command.end_point(pen);
    }

    out
}
