//! Visual surface of a rendered document.
//!
//! The export pipeline only talks to the [`Surface`] capability: read the
//! current presentation, override it temporarily, restore it, rasterize.
//! [`DocumentSurface`] implements it over a [`DocumentView`] with the
//! layout and rasterizer in this module.

pub mod layout;
pub mod paint;
pub mod raster;

use parking_lot::Mutex;

use crate::document::DocumentView;
use crate::export::ExportError;
pub use paint::{PaintCommand, Rgba};
pub use raster::{Bitmap, RasterOptions};

/// Width the document takes on screen when no width is forced.
pub const ONSCREEN_WIDTH: u32 = 1300;

/// Logical layout dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// One sizing rule of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeRule {
    #[default]
    Auto,
    Px(u32),
}

impl SizeRule {
    pub fn resolve(&self, auto: u32) -> u32 {
        match self {
            SizeRule::Auto => auto,
            SizeRule::Px(px) => *px,
        }
    }
}

/// Sizing rules and background fill currently applied to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PresentationState {
    pub width: SizeRule,
    pub height: SizeRule,
    pub min_width: SizeRule,
    pub background: Option<Rgba>,
}

impl PresentationState {
    /// Fixed size on every axis plus an explicit background.
    pub fn fixed(viewport: Viewport, background: Rgba) -> Self {
        Self {
            width: SizeRule::Px(viewport.width),
            height: SizeRule::Px(viewport.height),
            min_width: SizeRule::Px(viewport.width),
            background: Some(background),
        }
    }

    /// Width used for layout: the width rule, never below min-width.
    pub fn layout_width(&self, auto: u32) -> u32 {
        let width = self.width.resolve(auto);
        match self.min_width {
            SizeRule::Auto => width,
            SizeRule::Px(min) => width.max(min),
        }
    }
}

/// Capability handed to the export pipeline.
pub trait Surface {
    fn current_presentation(&self) -> PresentationState;

    /// Override the presentation until it is restored.
    fn apply_presentation(&mut self, state: PresentationState);

    fn restore_presentation(&mut self, state: PresentationState) {
        self.apply_presentation(state);
    }

    fn rasterize(&self, options: &RasterOptions) -> Result<Bitmap, ExportError>;
}

struct CachedRaster {
    presentation: PresentationState,
    options: RasterOptions,
    bitmap: Bitmap,
}

/// A rendered task document as it sits on screen.
pub struct DocumentSurface {
    view: DocumentView,
    presentation: PresentationState,
    cache: Mutex<Option<CachedRaster>>,
}

impl DocumentSurface {
    pub fn new(view: DocumentView) -> Self {
        Self {
            view,
            presentation: PresentationState::default(),
            cache: Mutex::new(None),
        }
    }

    pub fn view(&self) -> &DocumentView {
        &self.view
    }

    /// Layout viewport for a rasterization with `options`.
    pub fn viewport(&self, options: &RasterOptions) -> Viewport {
        Viewport {
            width: self.presentation.layout_width(ONSCREEN_WIDTH),
            height: self.presentation.height.resolve(options.height),
        }
    }

    fn cached(&self, options: &RasterOptions) -> Option<Bitmap> {
        self.cache
            .lock()
            .as_ref()
            .filter(|c| c.presentation == self.presentation && c.options == *options)
            .map(|c| c.bitmap.clone())
    }
}

impl Surface for DocumentSurface {
    fn current_presentation(&self) -> PresentationState {
        self.presentation.clone()
    }

    fn apply_presentation(&mut self, state: PresentationState) {
        log::debug!("surface presentation -> {:?}", state);
        self.presentation = state;
    }

    fn rasterize(&self, options: &RasterOptions) -> Result<Bitmap, ExportError> {
        if !options.cache_bust {
            if let Some(bitmap) = self.cached(options) {
                log::debug!("surface raster cache hit");
                return Ok(bitmap);
            }
        }

        let viewport = self.viewport(options);
        let mut commands = Vec::new();
        if let Some(background) = self.presentation.background {
            commands.push(PaintCommand::rect(0, 0, viewport.width, viewport.height, background));
        }
        commands.extend(layout::layout_document(&self.view, viewport));

        let bitmap = raster::rasterize(&commands, options)?;
        log::debug!(
            "rasterized {} paint commands into {}x{} bitmap (layout {}x{})",
            commands.len(),
            bitmap.width(),
            bitmap.height(),
            viewport.width,
            viewport.height
        );

        if !options.cache_bust {
            *self.cache.lock() = Some(CachedRaster {
                presentation: self.presentation.clone(),
                options: options.clone(),
                bitmap: bitmap.clone(),
            });
        }
        Ok(bitmap)
    }
}
