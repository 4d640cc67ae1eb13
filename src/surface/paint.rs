//! Paint command set produced by the layout pass

/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba(r, g, b, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.3 == 255
    }
}

pub mod palette {
    use super::Rgba;

    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);
    pub const CARD: Rgba = Rgba::rgb(0x0a, 0x0a, 0x0a);
    pub const INPUT: Rgba = Rgba::rgb(0x0d, 0x0d, 0x0d);
    pub const BORDER: Rgba = Rgba::rgb(0x27, 0x27, 0x2a);
    pub const BORDER_STRONG: Rgba = Rgba::rgb(0x3f, 0x3f, 0x46);
    pub const TEXT: Rgba = Rgba::rgb(0xf4, 0xf4, 0xf5);
    pub const TEXT_SOFT: Rgba = Rgba::rgb(0xd4, 0xd4, 0xd8);
    pub const TEXT_MUTED: Rgba = Rgba::rgb(0xa1, 0xa1, 0xaa);
    pub const TEXT_DIM: Rgba = Rgba::rgb(0x71, 0x71, 0x7a);
    pub const GREEN: Rgba = Rgba::rgb(0x4a, 0xde, 0x80);
    pub const INDIGO: Rgba = Rgba::rgb(0x4b, 0x00, 0x82);
    pub const NAVY: Rgba = Rgba::rgb(0x0d, 0x1a, 0x29);
    pub const MIDNIGHT: Rgba = Rgba::rgb(0x1a, 0x1c, 0x3d);
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgba,
    },
    /// One line of text on the 8x8 glyph grid; `scale` multiplies the grid.
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        color: Rgba,
    },
}

impl PaintCommand {
    pub fn rect(x: i32, y: i32, width: u32, height: u32, color: Rgba) -> Self {
        PaintCommand::SolidRect {
            x,
            y,
            width,
            height,
            color,
        }
    }

    pub fn text(x: i32, y: i32, text: impl Into<String>, scale: u32, color: Rgba) -> Self {
        PaintCommand::Text {
            x,
            y,
            text: text.into(),
            scale,
            color,
        }
    }
}
