//! Color helpers: hex parsing, opacity, and id-derived default colors.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use uuid::Uuid;

/// Fallback stroke color when a shape carries an unparseable color.
pub const FALLBACK_COLOR: &str = "#ff8800";

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<(u8, u8, u8)> {
    let hex = raw.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some((
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

fn channel(pair: &str) -> Option<u8> {
    match u8::from_str_radix(pair, 16) {
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Normalize a color to canonical lowercase `#rrggbb`.
#[must_use]
pub fn normalize_hex_color(value: &str, fallback: &str) -> String {
    let fallback_rgb = parse_hex_rgb(fallback).unwrap_or((255, 136, 0));
    let (r, g, b) = parse_hex_rgb(value).unwrap_or(fallback_rgb);
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// CSS `rgba(...)` string for a hex color at `opacity_pct` percent.
#[must_use]
pub fn with_opacity(hex: &str, opacity_pct: f64) -> String {
    let (r, g, b) = parse_hex_rgb(hex).unwrap_or((255, 136, 0));
    let alpha = (opacity_pct / 100.0).clamp(0.0, 1.0);
    format!("rgba({r}, {g}, {b}, {alpha:.3})")
}

/// Convert HSL (all components in `[0, 1]`) to RGB channels.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s == 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }
    let hue_to_rgb = |p: f64, q: f64, t: f64| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_rgb(p, q, h)),
        to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

/// Stable 31-bit string hash (`h = h * 31 + c`, wrapping).
#[must_use]
pub fn hash_str(s: &str) -> u32 {
    let h = s
        .chars()
        .fold(0_i32, |h, c| h.wrapping_shl(5).wrapping_sub(h).wrapping_add(c as i32));
    h.unsigned_abs()
}

/// Default color for a new shape: a hue derived from its id at 65% saturation
/// and 60% lightness.
#[must_use]
pub fn auto_color(id: &Uuid) -> String {
    let hue = f64::from(hash_str(&id.to_string()) % 360);
    let (r, g, b) = hsl_to_rgb(hue / 360.0, 0.65, 0.60);
    format!("#{r:02x}{g:02x}{b:02x}")
}
