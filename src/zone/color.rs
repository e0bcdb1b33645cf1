use image::{Rgb, Rgba};

/// Number of hues in the zone palette
pub const PALETTE_SIZE: usize = 32;

/// Fixed HSL saturation of palette colors (0-255 scale)
pub const PALETTE_SATURATION: u8 = 200;
/// Fixed HSL lightness of palette colors (0-255 scale)
pub const PALETTE_LIGHTNESS: u8 = 150;
/// Fixed alpha of palette colors
pub const PALETTE_ALPHA: u8 = 200;

/// Alpha of a frame's fill over the canvas
pub const FRAME_FILL_ALPHA: u8 = 110;
/// Alpha of the zone's origin marker
pub const MARKER_ALPHA: u8 = 200;
/// Alpha of the zone's bounding-rectangle tint
pub const ZONE_TINT_ALPHA: u8 = 30;

/// Luminance above which frame labels are drawn black instead of white
const LABEL_LUMINANCE_THRESHOLD: f32 = 140.0;

/// A color in HSL space, hue in degrees and the rest on a 0-255 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsla {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
    pub alpha: u8,
}

impl Hsla {
    /// Convert to RGBA
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_rgba(self) -> Rgba<u8> {
        let h = f32::from(self.hue % 360) / 60.0;
        let s = f32::from(self.saturation) / 255.0;
        let l = f32::from(self.lightness) / 255.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba([channel(r), channel(g), channel(b), self.alpha])
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        let Rgba([r, g, b, _]) = self.to_rgba();
        Rgb([r, g, b])
    }
}

/// Generate `n` evenly spaced hues at the fixed palette saturation,
/// lightness, and alpha. Color `i` has hue `(i * 360 / n) mod 360`.
#[allow(clippy::cast_possible_truncation)]
pub fn make_palette(n: usize) -> Vec<Hsla> {
    let divisor = n.max(1) as u64;
    (0..n as u64)
        .map(|i| Hsla {
            // Always < 360 after the modulo
            hue: ((i * 360 / divisor) % 360) as u16,
            saturation: PALETTE_SATURATION,
            lightness: PALETTE_LIGHTNESS,
            alpha: PALETTE_ALPHA,
        })
        .collect()
}

/// Parse a 6-hex-digit color, `#` prefix optional.
///
/// Anything else yields `None`, which callers treat as "no color".
pub fn parse_hex_color(text: &str) -> Option<Rgb<u8>> {
    let text = text.trim();
    let hex = text.strip_prefix('#').unwrap_or(text);

    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Format a color as lowercase `#rrggbb`
pub fn to_hex(color: Rgb<u8>) -> String {
    let Rgb([r, g, b]) = color;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

pub fn luminance(color: Rgb<u8>) -> f32 {
    let Rgb([r, g, b]) = color;
    0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b)
}

/// Text color that stays readable on top of `color`
pub fn label_color(color: Rgb<u8>) -> Rgb<u8> {
    if luminance(color) > LABEL_LUMINANCE_THRESHOLD {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    }
}

pub fn with_alpha(color: Rgb<u8>, alpha: u8) -> Rgba<u8> {
    let Rgb([r, g, b]) = color;
    Rgba([r, g, b, alpha])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_of_four() {
        let hues: Vec<u16> = make_palette(4).iter().map(|c| c.hue).collect();
        assert_eq!(hues, vec![0, 90, 180, 270]);
    }

    #[test]
    fn test_palette_fixed_components() {
        let palette = make_palette(PALETTE_SIZE);
        assert_eq!(palette.len(), 32);
        assert_eq!(palette[1].hue, 11); // 360 / 32 = 11.25, truncated
        assert!(palette.iter().all(|c| c.saturation == PALETTE_SATURATION
            && c.lightness == PALETTE_LIGHTNESS
            && c.alpha == PALETTE_ALPHA));
    }

    #[test]
    fn test_palette_empty() {
        assert!(make_palette(0).is_empty());
    }

    #[test]
    fn test_hsl_primary_hues() {
        let red = make_palette(3)[0].to_rgb();
        let green = make_palette(3)[1].to_rgb();
        let blue = make_palette(3)[2].to_rgb();

        assert!(red[0] > red[1] && red[1] == red[2]);
        assert!(green[1] > green[0] && green[0] == green[2]);
        assert!(blue[2] > blue[0] && blue[0] == blue[1]);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ffffff"), Some(Rgb([255, 255, 255])));
        assert_eq!(parse_hex_color("0A141e"), Some(Rgb([10, 20, 30])));
        assert_eq!(parse_hex_color("  #00ff00 "), Some(Rgb([0, 255, 0])));
    }

    #[test]
    fn test_parse_hex_color_rejects_malformed() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("##ffffff"), None);
        assert_eq!(parse_hex_color("#ffffff00"), None);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Rgb([10, 20, 255])), "#0a14ff");
    }

    #[test]
    fn test_label_color() {
        assert_eq!(label_color(Rgb([255, 255, 255])), Rgb([0, 0, 0]));
        assert_eq!(label_color(Rgb([20, 20, 20])), Rgb([255, 255, 255]));
    }
}
