//! Colors and the qualitative series palette.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid color: {0}")]
pub struct ColorParseError(pub String);

/// 24-bit RGB color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);

    /// Build from a packed value; bits above the low 24 are dropped.
    pub const fn new(packed: u32) -> Self {
        Self(packed & 0xFFFFFF)
    }

    pub const fn from_channels(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn channels(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }

    /// Full channel inversion, `0xFFFFFF ^ c`. Self-inverse.
    pub const fn invert(self) -> Self {
        Self(0xFFFFFF ^ self.0)
    }

    /// Linear interpolation per channel, rounded half up.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let (r0, g0, b0) = self.channels();
        let (r1, g1, b1) = other.channels();
        let lerp = |a: u8, b: u8| {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            (v + 0.5).floor().clamp(0.0, 255.0) as u8
        };
        Rgb::from_channels(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(s.to_string()))?;
        if hex.len() != 6 {
            return Err(ColorParseError(s.to_string()));
        }
        u32::from_str_radix(hex, 16)
            .map(Rgb::new)
            .map_err(|_| ColorParseError(s.to_string()))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// RGB color with opacity, rendered as CSS `rgba(r,g,b,a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "String")]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl Rgba {
    pub const fn new(rgb: Rgb, alpha: f64) -> Self {
        Self { rgb, alpha }
    }

    pub const fn opaque(rgb: Rgb) -> Self {
        Self::new(rgb, 1.0)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb.channels();
        write!(f, "rgba({r},{g},{b},{})", self.alpha)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// Muted color for segments bridging a missing reading.
pub const GAP_COLOR: Rgba = Rgba::new(Rgb::BLACK, 0.2);

/// ColorBrewer Set1 stops.
pub const SET1: [Rgb; 9] = [
    Rgb::new(0xe41a1c),
    Rgb::new(0x377eb8),
    Rgb::new(0x4daf4a),
    Rgb::new(0x984ea3),
    Rgb::new(0xff7f00),
    Rgb::new(0xffff33),
    Rgb::new(0xa65628),
    Rgb::new(0xf781bf),
    Rgb::new(0x999999),
];

/// Fixed-size palette sampled from a qualitative scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Sample the Set1 scale into exactly `count` colors.
    pub fn set1(count: usize) -> Self {
        Self::sample(&SET1, count)
    }

    /// Sample `stops` at `count` evenly spaced positions, ends included.
    pub fn sample(stops: &[Rgb], count: usize) -> Self {
        let colors = (0..count)
            .map(|i| {
                let t = if count > 1 {
                    i as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                scale_at(stops, t)
            })
            .collect();
        Self { colors }
    }

    /// Color at a palette index; indices wrap past the end.
    pub fn color(&self, index: usize) -> Rgb {
        if self.colors.is_empty() {
            return Rgb::BLACK;
        }
        self.colors[index % self.colors.len()]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn scale_at(stops: &[Rgb], t: f64) -> Rgb {
    match stops.len() {
        0 => Rgb::BLACK,
        1 => stops[0],
        len => {
            let position = t.clamp(0.0, 1.0) * (len - 1) as f64;
            let lower = position.floor() as usize;
            if lower >= len - 1 {
                return stops[len - 1];
            }
            stops[lower].mix(stops[lower + 1], position - lower as f64)
        }
    }
}
