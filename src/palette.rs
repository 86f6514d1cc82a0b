use crate::error::{GardenError, Result};
use crossterm::style::Color;

/// Stem, leaf, flower and pot colours for one plant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub stem: &'static str,
    pub leaf: &'static str,
    pub flower: &'static str,
    pub pot: &'static str,
}

pub const PALETTES: [Palette; 5] = [
    Palette { name: "classic", stem: "#4a7c59", leaf: "#88d498", flower: "#ff6b6b", pot: "#d4a373" },
    Palette { name: "forest", stem: "#2d6a4f", leaf: "#52b788", flower: "#ffd166", pot: "#bc6c25" },
    Palette { name: "vibrant", stem: "#004b23", leaf: "#008000", flower: "#ccff33", pot: "#dda15e" },
    Palette { name: "muted", stem: "#386641", leaf: "#6a994e", flower: "#f2e8cf", pot: "#a7c957" },
    Palette { name: "retro", stem: "#588157", leaf: "#a3b18a", flower: "#ffb703", pot: "#e63946" },
];

/// Candidate hues for the primary and secondary flower colours
pub const FLOWER_COLORS: [&str; 15] = [
    "#ff6b6b", "#ffd166", "#ccff33", "#f2e8cf", "#ffb703",
    "#e63946", "#9d4edd", "#ff006e", "#3a86ff", "#8338ec",
    "#fb8500", "#023047", "#219ebc", "#ef476f", "#06d6a0",
];

/// Darker rim along the top row of every pot
pub const POT_RIM: &str = "#8d6e63";

/// Light yellow centre used by daisy and rose flowers
pub const FLOWER_CENTER: &str = "#FFF9C4";

/// Parse `#rrggbb` (leading `#` optional) into an RGB triple
pub fn parse_hex(hex: &str) -> Result<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(GardenError::InvalidArgument(format!("bad colour: {}", hex)));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| GardenError::InvalidArgument(format!("bad colour: {}", hex)))
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Terminal colour for a hex string
pub fn term_color(hex: &str) -> Result<Color> {
    let (r, g, b) = parse_hex(hex)?;
    Ok(Color::Rgb { r, g, b })
}
