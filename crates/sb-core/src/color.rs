//! RGBA colors as stored on elements.
//!
//! Colors arrive from inspectors and saved documents as CSS-ish strings.
//! The accepted forms are `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`,
//! `rgb(r, g, b)`, `rgba(r, g, b, a)` and `transparent`. They are always
//! written back out as the shortest hex form.

use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use winnow::combinator::{alt, preceded};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels, as written in `#RRGGBB`.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse hex digits (`RGB`, `RGBA`, `RRGGBB`, `RRGGBBAA`).
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let nibble = |i: usize| hex_val(bytes[i]);
        let byte = |i: usize| Some(nibble(i)? << 4 | nibble(i + 1)?);

        let (r, g, b, a) = match bytes.len() {
            3 => (nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, 255),
            4 => (
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
                nibble(3)? * 17,
            ),
            6 => (byte(0)?, byte(2)?, byte(4)?, 255),
            8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
            _ => return None,
        };
        Some(Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ))
    }

    /// Emit as shortest valid hex string (`#RRGGBB`, or `#RRGGBBAA` when
    /// not fully opaque).
    pub fn to_hex(&self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        );
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Parse any accepted color notation.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        parse_color
            .parse(input.trim())
            .map_err(|_| ModelError::InvalidColor(input.to_string()))
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Parser ──────────────────────────────────────────────────────────────

fn parse_color(input: &mut &str) -> ModalResult<Color> {
    alt((parse_hex_color, parse_rgb_function, parse_transparent)).parse_next(input)
}

fn parse_hex_color(input: &mut &str) -> ModalResult<Color> {
    preceded('#', take_while(3..=8, |c: char| c.is_ascii_hexdigit()))
        .verify_map(Color::from_hex)
        .parse_next(input)
}

fn parse_transparent(input: &mut &str) -> ModalResult<Color> {
    "transparent".value(Color::TRANSPARENT).parse_next(input)
}

/// `rgb(r, g, b)` / `rgba(r, g, b, a)` with 0–255 channels and 0–1 alpha.
fn parse_rgb_function(input: &mut &str) -> ModalResult<Color> {
    let name: &str = alt(("rgba", "rgb")).parse_next(input)?;
    skip_space(input);
    let _ = '('.parse_next(input)?;
    skip_space(input);
    let r = parse_number(input)?;
    parse_separator(input)?;
    let g = parse_number(input)?;
    parse_separator(input)?;
    let b = parse_number(input)?;
    let a = if name == "rgba" {
        parse_separator(input)?;
        parse_number(input)?
    } else {
        1.0
    };
    skip_space(input);
    let _ = ')'.parse_next(input)?;

    let channel = |v: f32| v.clamp(0.0, 255.0) / 255.0;
    Ok(Color::rgba(channel(r), channel(g), channel(b), a.clamp(0.0, 1.0)))
}

fn parse_separator(input: &mut &str) -> ModalResult<()> {
    skip_space(input);
    let _ = ','.parse_next(input)?;
    skip_space(input);
    Ok(())
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let digits: &str =
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.').parse_next(input)?;
    digits
        .parse::<f32>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    use winnow::ascii::space0;
    let _: Result<&str, winnow::error::ErrMode<ContextError>> = space0.parse_next(input);
}
