//! Colours shared by the curve renderer and the particle systems.

use std::fmt;

pub const DEEP_PINK: &str = "#FF1493";
pub const LIGHT_PINK: &str = "#FFB6C1";

/// Background dust alternates between these two.
pub const DUST: [&str; 2] = [DEEP_PINK, LIGHT_PINK];

pub const CONFETTI: [&str; 6] = [
    DEEP_PINK, LIGHT_PINK, "#FF00FF", "#9B30FF", "#FFD700", "#B76E79",
];

pub const BURST: [&str; 4] = ["#FFD700", "#FF6B00", DEEP_PINK, LIGHT_PINK];

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.1}, {:.0}%, {:.1}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// `rgba(...)` string with the alpha clamped into `[0, 1]`.
pub fn rgba(r: u8, g: u8, b: u8, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {:.3})", alpha.clamp(0.0, 1.0))
}
