//! Kotlin literal formatting
//!
//! Every number in generated code carries exactly two fractional digits.

use iconforge_svg::Rgb;

/// Round to two places and fold negative zero into zero
fn settle(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Plain two-digit number, e.g. `24.00`
pub fn number(value: f32) -> String {
    format!("{:.2}", settle(value))
}

/// Kotlin `Float` literal, e.g. `12.50f`
pub fn float(value: f32) -> String {
    format!("{}f", number(value))
}

/// Kotlin `Dp` expression, e.g. `24.00.dp`
pub fn dp(value: f32) -> String {
    format!("{}.dp", number(value))
}

/// `Color(0xAARRGGBB)` with opacity folded into the alpha byte
pub fn color(rgb: Rgb, opacity: f32) -> String {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "Color(0x{:02X}{:02X}{:02X}{:02X})",
        alpha, rgb.r, rgb.g, rgb.b
    )
}

/// Escape text for a double-quoted Kotlin string
pub fn string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_fraction_digits() {
        assert_eq!(float(10.0), "10.00f");
        assert_eq!(float(0.125), "0.13f");
        assert_eq!(float(-3.5), "-3.50f");
        assert_eq!(dp(24.0), "24.00.dp");
        assert_eq!(number(1.0 / 3.0), "0.33");
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(float(-0.0), "0.00f");
        assert_eq!(float(-0.004), "0.00f");
        assert_eq!(float(f32::NAN), "0.00f");
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(color(Rgb::new(0, 0, 0), 1.0), "Color(0xFF000000)");
        assert_eq!(color(Rgb::new(0xAA, 0xBB, 0xCC), 0.5), "Color(0x80AABBCC)");
        assert_eq!(color(Rgb::new(255, 0, 0), 0.0), "Color(0x00FF0000)");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(string("Edit"), "\"Edit\"");
        assert_eq!(string("a\"b$c"), "\"a\\\"b\\$c\"");
    }
}
