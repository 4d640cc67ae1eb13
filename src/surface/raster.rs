//! Software rasterizer for paint commands

use std::fmt;

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

use super::layout::GLYPH;
use super::paint::{PaintCommand, Rgba};
use crate::export::ExportError;

/// Largest canvas side, in device pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// How a surface is sampled into a bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Canvas width in logical units.
    pub width: u32,
    /// Canvas height in logical units.
    pub height: u32,
    /// Device pixels per logical unit.
    pub pixel_ratio: u32,
    /// Fill behind everything the surface paints.
    pub background: Rgba,
    /// Ignore any cached rasterization.
    pub cache_bust: bool,
}

/// RGBA8 pixel buffer.
#[derive(Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let Rgba(r, g, b, a) = fill;
        let pixels = [r, g, b, a].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ))
    }

    /// Fill a device-pixel rectangle, clipped to the bitmap.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u64, height: u64, color: Rgba) {
        let x0 = x.max(0) as u64;
        let y0 = y.max(0) as u64;
        let x1 = ((x + width as i64).max(0) as u64).min(self.width as u64);
        let y1 = ((y + height as i64).max(0) as u64).min(self.height as u64);
        if x0 >= x1 || y0 >= y1 || color.3 == 0 {
            return;
        }

        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            for px in x0..x1 {
                let i = (row + px as usize) * 4;
                blend(&mut self.pixels[i..i + 4], color);
            }
        }
    }

    /// Encode as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, png::EncodingError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(out)
    }

    /// Packed RGB samples with alpha dropped.
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect()
    }
}

fn blend(dst: &mut [u8], src: Rgba) {
    let Rgba(r, g, b, a) = src;
    if a == 255 {
        dst.copy_from_slice(&[r, g, b, 255]);
        return;
    }
    let alpha = a as u32;
    let inv = 255 - alpha;
    dst[0] = ((r as u32 * alpha + dst[0] as u32 * inv) / 255) as u8;
    dst[1] = ((g as u32 * alpha + dst[1] as u32 * inv) / 255) as u8;
    dst[2] = ((b as u32 * alpha + dst[2] as u32 * inv) / 255) as u8;
    dst[3] = (alpha + dst[3] as u32 * inv / 255).min(255) as u8;
}

fn glyph_for(ch: char) -> [u8; 8] {
    let ch = match ch {
        '•' => '·',
        '\u{a0}' => ' ',
        other => other,
    };
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn check_canvas(options: &RasterOptions) -> Result<(u32, u32), ExportError> {
    if options.width == 0 || options.height == 0 || options.pixel_ratio == 0 {
        return Err(ExportError::Rasterize(format!(
            "empty canvas {}x{} at ratio {}",
            options.width, options.height, options.pixel_ratio
        )));
    }
    let width = options.width.checked_mul(options.pixel_ratio);
    let height = options.height.checked_mul(options.pixel_ratio);
    match (width, height) {
        (Some(w), Some(h)) if w <= MAX_CANVAS_SIDE && h <= MAX_CANVAS_SIDE => Ok((w, h)),
        _ => Err(ExportError::Rasterize(format!(
            "canvas {}x{} at ratio {} exceeds {} pixels per side",
            options.width, options.height, options.pixel_ratio, MAX_CANVAS_SIDE
        ))),
    }
}

/// Paint `commands` onto a fresh canvas.
pub fn rasterize(commands: &[PaintCommand], options: &RasterOptions) -> Result<Bitmap, ExportError> {
    let (width, height) = check_canvas(options)?;
    let ratio = options.pixel_ratio as i64;
    let mut bitmap = Bitmap::new(width, height, options.background);

    for command in commands {
        match command {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                color,
            } => bitmap.fill_rect(
                *x as i64 * ratio,
                *y as i64 * ratio,
                *width as u64 * ratio as u64,
                *height as u64 * ratio as u64,
                *color,
            ),
            PaintCommand::Text {
                x,
                y,
                text,
                scale,
                color,
            } => {
                let cell = *scale as i64 * ratio;
                let top = *y as i64 * ratio;
                let mut pen = *x as i64 * ratio;
                for ch in text.chars() {
                    for (row, bits) in glyph_for(ch).iter().enumerate() {
                        for col in 0..GLYPH as i64 {
                            if bits & (1 << col) != 0 {
                                bitmap.fill_rect(
                                    pen + col * cell,
                                    top + row as i64 * cell,
                                    cell as u64,
                                    cell as u64,
                                    *color,
                                );
                            }
                        }
                    }
                    pen += GLYPH as i64 * cell;
                }
            }
        }
    }

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::paint::palette;

    fn options(width: u32, height: u32, pixel_ratio: u32) -> RasterOptions {
        RasterOptions {
            width,
            height,
            pixel_ratio,
            background: palette::BLACK,
            cache_bust: true,
        }
    }

    #[test]
    fn rasterize_scales_canvas_by_pixel_ratio() {
        let bitmap = rasterize(&[], &options(128, 64, 2)).unwrap();
        assert_eq!(bitmap.width(), 256);
        assert_eq!(bitmap.height(), 128);
        assert_eq!(bitmap.pixel(0, 0), Some(palette::BLACK));
    }

    #[test]
    fn rasterize_rejects_empty_and_oversized_canvas() {
        assert!(matches!(
            rasterize(&[], &options(0, 10, 1)),
            Err(ExportError::Rasterize(_))
        ));
        assert!(matches!(
            rasterize(&[], &options(10_000, 10, 2)),
            Err(ExportError::Rasterize(_))
        ));
    }

    #[test]
    fn solid_rect_is_scaled_and_clipped() {
        let cmd = PaintCommand::rect(-2, 1, 4, 2, palette::WHITE);
        let bitmap = rasterize(&[cmd], &options(8, 8, 2)).unwrap();
        assert_eq!(bitmap.pixel(0, 2), Some(palette::WHITE));
        assert_eq!(bitmap.pixel(3, 5), Some(palette::WHITE));
        assert_eq!(bitmap.pixel(4, 2), Some(palette::BLACK));
        assert_eq!(bitmap.pixel(0, 6), Some(palette::BLACK));
    }

    #[test]
    fn text_paints_glyph_pixels() {
        let cmd = PaintCommand::text(0, 0, "I", 1, palette::WHITE);
        let bitmap = rasterize(&[cmd], &options(8, 8, 1)).unwrap();
        let lit = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| bitmap.pixel(x, y) == Some(palette::WHITE))
            .count();
        assert!(lit > 0);
    }

    #[test]
    fn translucent_rect_blends() {
        let cmd = PaintCommand::rect(0, 0, 1, 1, Rgba(255, 255, 255, 128));
        let bitmap = rasterize(&[cmd], &options(1, 1, 1)).unwrap();
        let Rgba(r, _, _, a) = bitmap.pixel(0, 0).unwrap();
        assert!(r > 100 && r < 160);
        assert_eq!(a, 255);
    }

    #[test]
    fn encode_png_roundtrips_dimensions() {
        let bitmap = Bitmap::new(4, 3, palette::GREEN);
        let data = bitmap.encode_png().unwrap();
        assert_eq!(&data[0..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(&data[..]);
        let reader = decoder.read_info().expect("decode");
        assert_eq!(reader.info().width, 4);
        assert_eq!(reader.info().height, 3);
    }

    #[test]
    fn to_rgb_drops_alpha() {
        let bitmap = Bitmap::new(2, 1, Rgba(1, 2, 3, 255));
        assert_eq!(bitmap.to_rgb(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn unknown_glyph_falls_back() {
        assert_eq!(glyph_for('\u{4e00}'), BASIC_FONTS.get('?').unwrap());
        assert_ne!(glyph_for('•'), [0; 8]);
    }
}
