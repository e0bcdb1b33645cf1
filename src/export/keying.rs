use image::{Rgb, Rgba, RgbaImage};

/// Replacement for pixels matching the background color: fully transparent white
pub const KEYED_PIXEL: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Make every pixel whose RGB exactly equals `background` transparent.
///
/// Alpha is ignored when matching. Returns the number of pixels replaced.
pub fn key_out_background(image: &mut RgbaImage, background: Rgb<u8>) -> usize {
    let Rgb([br, bg, bb]) = background;
    let mut keyed = 0;

    for pixel in image.pixels_mut() {
        let Rgba([r, g, b, _]) = *pixel;
        if r == br && g == bg && b == bb {
            *pixel = KEYED_PIXEL;
            keyed += 1;
        }
    }

    keyed
}
