//! Paint and color normalization
//!
//! Colors are reduced to a canonical `#RRGGBB` string (or `none`). Alpha never appears in
//! the canonical form; it is returned alongside so the style resolver can fold it into
//! the paint's opacity.
//!
//! Supported forms: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()` (numbers or
//! percentages), a handful of named colors, `currentColor`, `none`.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, multispace0},
    combinator::opt,
    error::{ErrorKind, ParseError as NomParseError},
    multi::separated_list1,
    number::complete::float,
    sequence::delimited,
    IResult,
};
use tracing::{debug, warn};

/// An opaque sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical `#RRGGBB` form
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// What a fill or stroke paints with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    None,
    Solid(Rgb),
}

impl Paint {
    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }

    pub fn color(&self) -> Option<Rgb> {
        match self {
            Paint::None => None,
            Paint::Solid(rgb) => Some(*rgb),
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Solid(rgb) => f.write_str(&rgb.to_hex()),
        }
    }
}

/// A paint plus the alpha carried by its color syntax (1.0 when none was given)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParsedColor {
    pub paint: Paint,
    pub alpha: f32,
}

impl ParsedColor {
    pub const BLACK: ParsedColor = ParsedColor::opaque(Paint::Solid(Rgb::BLACK));
    pub const NONE: ParsedColor = ParsedColor::opaque(Paint::None);

    pub const fn opaque(paint: Paint) -> Self {
        Self { paint, alpha: 1.0 }
    }
}

/// Normalize a color string to `#RRGGBB` or `none`.
pub fn normalize_color(input: &str) -> String {
    parse_paint(input).paint.to_string()
}

/// Parse a fill/stroke value. Never fails: unrecognized values become black.
pub fn parse_paint(input: &str) -> ParsedColor {
    let input = input.trim();

    if input.is_empty() || input.eq_ignore_ascii_case("none") {
        return ParsedColor::NONE;
    }
    if input.eq_ignore_ascii_case("currentColor") {
        debug!("currentColor has no context here, using black");
        return ParsedColor::BLACK;
    }

    if let Ok(("", color)) = parse_hex_color::<nom::error::Error<&str>>(input) {
        return color;
    }
    if let Ok((rest, color)) = parse_rgb_function::<nom::error::Error<&str>>(input) {
        if rest.trim().is_empty() {
            return color;
        }
    }
    if let Some(color) = parse_named_color(input) {
        return color;
    }

    warn!(value = input, "Unrecognized color, using black");
    ParsedColor::BLACK
}

fn ws<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    multispace0(input)
}

fn hex_pair(hex: &str) -> Option<u8> {
    u8::from_str_radix(hex, 16).ok()
}

fn hex_nibble(hex: &str) -> Option<u8> {
    hex_pair(&hex.repeat(2))
}

/// Parse hex color: #RGB, #RGBA, #RRGGBB, or #RRGGBBAA
fn parse_hex_color<'a, E: NomParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, ParsedColor, E> {
    let (rest, _) = char('#')(input)?;
    let (rest, hex) = take_while1(|c: char| c.is_ascii_hexdigit())(rest)?;

    let channels = match hex.len() {
        3 | 4 => {
            let alpha = if hex.len() == 4 {
                hex_nibble(&hex[3..4])
            } else {
                Some(255)
            };
            (
                hex_nibble(&hex[0..1]),
                hex_nibble(&hex[1..2]),
                hex_nibble(&hex[2..3]),
                alpha,
            )
        }
        6 | 8 => {
            let alpha = if hex.len() == 8 {
                hex_pair(&hex[6..8])
            } else {
                Some(255)
            };
            (
                hex_pair(&hex[0..2]),
                hex_pair(&hex[2..4]),
                hex_pair(&hex[4..6]),
                alpha,
            )
        }
        _ => (None, None, None, None),
    };

    match channels {
        (Some(r), Some(g), Some(b), Some(a)) => Ok((
            rest,
            ParsedColor {
                paint: Paint::Solid(Rgb::new(r, g, b)),
                alpha: a as f32 / 255.0,
            },
        )),
        _ => Err(nom::Err::Error(E::from_error_kind(
            input,
            ErrorKind::HexDigit,
        ))),
    }
}

/// One `rgb()` argument: a number with an optional `%`
fn component<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (f32, bool), E> {
    let (input, _) = ws(input)?;
    let (input, value) = float(input)?;
    let (input, percent) = opt(char('%'))(input)?;
    let (input, _) = ws(input)?;
    Ok((input, (value, percent.is_some())))
}

fn channel((value, percent): (f32, bool)) -> u8 {
    let value = if percent { value / 100.0 * 255.0 } else { value };
    value.round().clamp(0.0, 255.0) as u8
}

fn alpha_channel((value, percent): (f32, bool)) -> f32 {
    let value = if percent { value / 100.0 } else { value };
    value.clamp(0.0, 1.0)
}

/// Parse `rgb(r, g, b)` or `rgba(r, g, b, a)`; either name accepts an optional alpha
fn parse_rgb_function<'a, E: NomParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, ParsedColor, E> {
    let (rest, _) = alt((tag_no_case("rgba"), tag_no_case("rgb")))(input)?;
    let (rest, _) = ws(rest)?;
    let (rest, parts) =
        delimited(char('('), separated_list1(char(','), component), char(')'))(rest)?;

    if parts.len() != 3 && parts.len() != 4 {
        return Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Verify)));
    }

    let rgb = Rgb::new(channel(parts[0]), channel(parts[1]), channel(parts[2]));
    let alpha = parts.get(3).copied().map(alpha_channel).unwrap_or(1.0);
    Ok((
        rest,
        ParsedColor {
            paint: Paint::Solid(rgb),
            alpha,
        },
    ))
}

fn parse_named_color(name: &str) -> Option<ParsedColor> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => Rgb::new(0, 0, 0),
        "white" => Rgb::new(255, 255, 255),
        "red" => Rgb::new(255, 0, 0),
        "green" => Rgb::new(0, 128, 0),
        "blue" => Rgb::new(0, 0, 255),
        "transparent" => return Some(ParsedColor::NONE),
        _ => return None,
    };
    Some(ParsedColor::opaque(Paint::Solid(rgb)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts WARN events seen while installed
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn warnings_while<T>(f: impl FnOnce() -> T) -> (T, usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        let value = tracing::subscriber::with_default(subscriber, f);
        (value, count.load(Ordering::SeqCst))
    }

    #[test]
    fn test_short_hex_expands() {
        assert_eq!(normalize_color("#abc"), "#AABBCC");
        assert_eq!(normalize_color("#FFF"), "#FFFFFF");
    }

    #[test]
    fn test_long_hex_uppercased() {
        assert_eq!(normalize_color("#1a2b3c"), "#1A2B3C");
    }

    #[test]
    fn test_hex_alpha_split_out() {
        let color = parse_paint("#FF000080");
        assert_eq!(color.paint, Paint::Solid(Rgb::new(255, 0, 0)));
        assert!((color.alpha - 128.0 / 255.0).abs() < 1e-6);

        let short = parse_paint("#f008");
        assert_eq!(short.paint.to_string(), "#FF0000");
        assert!((short.alpha - 136.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(normalize_color("rgb(255,0,0)"), "#FF0000");
        assert_eq!(normalize_color("RGB( 0 , 128 , 255 )"), "#0080FF");
        assert_eq!(normalize_color("rgb(100%, 0%, 50%)"), "#FF0080");
        assert_eq!(normalize_color("rgb(300, -5, 0)"), "#FF0000");
    }

    #[test]
    fn test_rgba_alpha() {
        let color = parse_paint("rgba(0, 0, 255, 0.5)");
        assert_eq!(color.paint.to_string(), "#0000FF");
        assert_eq!(color.alpha, 0.5);

        let percent = parse_paint("rgba(0,0,0,25%)");
        assert_eq!(percent.alpha, 0.25);
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(normalize_color("black"), "#000000");
        assert_eq!(normalize_color("White"), "#FFFFFF");
        assert_eq!(normalize_color("red"), "#FF0000");
        assert_eq!(normalize_color("green"), "#008000");
        assert_eq!(normalize_color("BLUE"), "#0000FF");
        assert_eq!(normalize_color("transparent"), "none");
    }

    #[test]
    fn test_none_and_current_color() {
        assert_eq!(parse_paint("none"), ParsedColor::NONE);
        assert_eq!(parse_paint(""), ParsedColor::NONE);
        assert_eq!(parse_paint("currentColor"), ParsedColor::BLACK);
    }

    #[test]
    fn test_unrecognized_color_warns() {
        let (color, warnings) = warnings_while(|| normalize_color("bogus"));
        assert_eq!(color, "#000000");
        assert_eq!(warnings, 1);

        let (color, warnings) = warnings_while(|| normalize_color("#abc"));
        assert_eq!(color, "#AABBCC");
        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_unrecognized_defaults_to_black() {
        assert_eq!(normalize_color("bogus"), "#000000");
        assert_eq!(normalize_color("#12345"), "#000000");
        assert_eq!(normalize_color("rgb(1,2)"), "#000000");
        assert_eq!(normalize_color("url(#gradient)"), "#000000");
    }
}
