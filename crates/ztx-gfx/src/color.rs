use image::{Rgba, RgbaImage};
use shrinkwraprs::Shrinkwrap;

use crate::error::GfxError;

pub type Color = Rgba<u8>;

/// A 4-bit color index can address 16 entries.
pub const MIN_PALETTE_LEN: usize = 16;

// -------------------------------------------------------------------------------------------------

/// Ordered color table. Entry 0 is the backdrop of every composite canvas.
#[derive(Clone, Debug, Shrinkwrap)]
pub struct Palette(Vec<Color>);

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, GfxError> {
        if colors.len() < MIN_PALETTE_LEN {
            Err(GfxError::PaletteTooSmall(colors.len()))
        } else {
            Ok(Self(colors))
        }
    }

    pub fn backdrop(&self) -> Color {
        self.0[0]
    }

    pub fn canvas(&self, width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, self.backdrop())
    }
}

// -------------------------------------------------------------------------------------------------

/// Pastes `image` onto `canvas` at (`x`, `y`), using the image's own alpha channel as the mask.
///
/// All four channels are blended, so a half transparent pixel also lowers the alpha of an opaque
/// backdrop. Pixels falling outside of the canvas are clipped.
pub fn paste_masked(canvas: &mut RgbaImage, image: &RgbaImage, x: u32, y: u32) {
    for (ix, iy, src) in image.enumerate_pixels() {
        let Some(dst) = canvas.get_pixel_mut_checked(x + ix, y + iy) else {
            continue;
        };
        let mask = src[3] as u32;
        for (d, &s) in dst.0.iter_mut().zip(src.0.iter()) {
            *d = blend(*d, s, mask);
        }
    }
}

fn blend(dst: u8, src: u8, mask: u32) -> u8 {
    div255(dst as u32 * (255 - mask) + src as u32 * mask)
}

#[inline]
fn div255(value: u32) -> u8 {
    let tmp = value + 128;
    (((tmp >> 8) + tmp) >> 8) as u8
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{div255, paste_masked, Palette};
    use crate::error::GfxError;

    #[test]
    fn test_palette_needs_sixteen_colors() {
        let colors = vec![Rgba([0, 0, 0, 255]); 15];
        assert!(matches!(Palette::new(colors), Err(GfxError::PaletteTooSmall(15))));

        let mut colors = vec![Rgba([0, 0, 0, 255]); 16];
        colors[0] = Rgba([1, 2, 3, 4]);
        let palette = Palette::new(colors).unwrap();
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.backdrop(), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn test_div255_is_rounded_division() {
        for value in (0..=255 * 255).step_by(7) {
            let expected = (value as f64 / 255.0).round() as u8;
            assert_eq!(div255(value), expected, "value = {value}");
        }
    }

    #[test]
    fn test_paste_masked() {
        let backdrop = Rgba([10, 20, 30, 255]);
        let mut canvas = RgbaImage::from_pixel(4, 2, backdrop);

        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([200, 100, 50, 255]));
        image.put_pixel(1, 0, Rgba([200, 100, 50, 0]));
        paste_masked(&mut canvas, &image, 1, 1);

        assert_eq!(*canvas.get_pixel(1, 1), Rgba([200, 100, 50, 255]));
        assert_eq!(*canvas.get_pixel(2, 1), backdrop);
        assert_eq!(*canvas.get_pixel(0, 0), backdrop);
    }

    #[test]
    fn test_paste_masked_half_transparent() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));
        paste_masked(&mut canvas, &image, 0, 0);
        // 255 * 128 / 255 for color, 255 * 127 / 255 + 128 * 128 / 255 for alpha
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([128, 128, 128, 191]));
    }

    #[test]
    fn test_paste_masked_clips() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let image = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255]));
        paste_masked(&mut canvas, &image, 1, 1);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([9, 9, 9, 255]));
        assert_eq!(*canvas.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    }
}
