//! Capture sequence for exports.
//!
//! Every export forces the surface to the canonical desktop size, waits for
//! the surface to settle, rasterizes at a fixed pixel ratio and restores the
//! previous presentation before packaging the bitmap.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{export_filename, pdf, ExportError, ExportedFile, FileKind};
use crate::surface::paint::palette;
use crate::surface::{Bitmap, PresentationState, RasterOptions, Rgba, Surface, Viewport};

pub const CANONICAL_SIZE: Viewport = Viewport {
    width: 1440,
    height: 900,
};
pub const EXPORT_PIXEL_RATIO: u32 = 2;
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Runs exports of a document surface, one at a time.
pub struct ExportPipeline {
    in_flight: AtomicBool,
    settle_delay: Duration,
    canvas: Viewport,
    pixel_ratio: u32,
    background: Rgba,
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportPipeline {
    pub fn new() -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            settle_delay: SETTLE_DELAY,
            canvas: CANONICAL_SIZE,
            pixel_ratio: EXPORT_PIXEL_RATIO,
            background: palette::BLACK,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Options every export rasterizes with.
    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            width: self.canvas.width,
            height: self.canvas.height,
            pixel_ratio: self.pixel_ratio,
            background: self.background,
            cache_bust: true,
        }
    }

    /// Export the surface as `GUCCI_DESKTOP_TASK_<phone>.png`.
    ///
    /// Returns `Ok(None)` without touching anything when there is no surface.
    pub async fn export_image<S: Surface + ?Sized>(
        &self,
        surface: Option<&mut S>,
        phone_number: &str,
    ) -> Result<Option<ExportedFile>, ExportError> {
        self.export(surface, phone_number, FileKind::Png).await
    }

    /// Export the surface as a one-page `GUCCI_DESKTOP_PDF_<phone>.pdf`.
    ///
    /// Returns `Ok(None)` without touching anything when there is no surface.
    pub async fn export_document<S: Surface + ?Sized>(
        &self,
        surface: Option<&mut S>,
        phone_number: &str,
    ) -> Result<Option<ExportedFile>, ExportError> {
        self.export(surface, phone_number, FileKind::Pdf).await
    }

    async fn export<S: Surface + ?Sized>(
        &self,
        surface: Option<&mut S>,
        phone_number: &str,
        kind: FileKind,
    ) -> Result<Option<ExportedFile>, ExportError> {
        let Some(surface) = surface else {
            log::debug!("{:?} export requested without a surface", kind);
            return Ok(None);
        };
        let _flight = InFlight::acquire(&self.in_flight)?;

        let bitmap = self.capture(surface).await.map_err(|e| {
            log::error!("{:?} export failed during capture: {}", kind, e);
            e
        })?;

        let bytes = match kind {
            FileKind::Png => bitmap.encode_png()?,
            FileKind::Pdf => pdf::package(&bitmap, self.canvas)?,
        };
        let file = ExportedFile {
            filename: export_filename(kind, phone_number),
            kind,
            bytes,
            width: bitmap.width(),
            height: bitmap.height(),
        };
        log::info!("exported {} ({} bytes)", file.filename, file.bytes.len());
        Ok(Some(file))
    }

    async fn capture<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<Bitmap, ExportError> {
        let forced = PresentationState::fixed(self.canvas, self.background);
        let surface = Presented::force(surface, forced);
        tokio::time::sleep(self.settle_delay).await;
        log::debug!(
            "rasterizing at {}x{} ratio {}",
            self.canvas.width,
            self.canvas.height,
            self.pixel_ratio
        );
        surface.rasterize(&self.raster_options())
    }
}

/// Holds the in-flight flag for the duration of one export.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, ExportError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                log::warn!("export rejected: another export is running");
                ExportError::InProgress
            })?;
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A surface with a forced presentation; the captured one is put back on drop.
struct Presented<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    saved: Option<PresentationState>,
}

impl<'a, S: Surface + ?Sized> Presented<'a, S> {
    fn force(surface: &'a mut S, state: PresentationState) -> Self {
        let saved = surface.current_presentation();
        surface.apply_presentation(state);
        Self {
            surface,
            saved: Some(saved),
        }
    }
}

impl<S: Surface + ?Sized> Deref for Presented<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for Presented<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for Presented<'_, S> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.surface.restore_presentation(saved);
            log::debug!("surface presentation restored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SizeRule;
    use std::cell::RefCell;

    struct FakeSurface {
        presentation: PresentationState,
        seen: RefCell<Vec<(PresentationState, RasterOptions)>>,
        restored: usize,
        fail: bool,
    }

    impl FakeSurface {
        fn new() -> Self {
            Self {
                presentation: PresentationState {
                    width: SizeRule::Px(980),
                    height: SizeRule::Auto,
                    min_width: SizeRule::Auto,
                    background: Some(palette::CARD),
                },
                seen: RefCell::new(Vec::new()),
                restored: 0,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }
    }

    impl Surface for FakeSurface {
        fn current_presentation(&self) -> PresentationState {
            self.presentation.clone()
        }

        fn apply_presentation(&mut self, state: PresentationState) {
            self.presentation = state;
        }

        fn restore_presentation(&mut self, state: PresentationState) {
            self.restored += 1;
            self.presentation = state;
        }

        fn rasterize(&self, options: &RasterOptions) -> Result<Bitmap, ExportError> {
            self.seen
                .borrow_mut()
                .push((self.presentation.clone(), options.clone()));
            if self.fail {
                return Err(ExportError::Rasterize("surface detached".to_string()));
            }
            Ok(Bitmap::new(
                options.width * options.pixel_ratio,
                options.height * options.pixel_ratio,
                options.background,
            ))
        }
    }

    fn pipeline() -> ExportPipeline {
        ExportPipeline::new().with_settle_delay(Duration::ZERO)
    }

    #[test]
    fn defaults_match_canonical_capture() {
        let p = ExportPipeline::new();
        assert_eq!(p.settle_delay(), Duration::from_millis(200));
        let options = p.raster_options();
        assert_eq!((options.width, options.height), (1440, 900));
        assert_eq!(options.pixel_ratio, 2);
        assert_eq!(options.background, palette::BLACK);
        assert!(options.cache_bust);
    }

    #[tokio::test]
    async fn image_export_forces_canonical_state_then_restores() {
        let mut surface = FakeSurface::new();
        let before = surface.current_presentation();

        let file = pipeline()
            .export_image(Some(&mut surface), "08123456789")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(file.filename, "GUCCI_DESKTOP_TASK_08123456789.png");
        assert_eq!(file.mime_type(), "image/png");
        assert_eq!((file.width, file.height), (2880, 1800));

        let seen = surface.seen.borrow();
        assert_eq!(seen.len(), 1);
        let (during, options) = &seen[0];
        assert_eq!(during.width, SizeRule::Px(1440));
        assert_eq!(during.min_width, SizeRule::Px(1440));
        assert_eq!(during.height, SizeRule::Px(900));
        assert_eq!(during.background, Some(palette::BLACK));
        assert!(options.cache_bust);
        drop(seen);

        assert_eq!(surface.current_presentation(), before);
        assert_eq!(surface.restored, 1);
    }

    #[tokio::test]
    async fn png_bytes_decode_at_double_resolution() {
        let mut surface = FakeSurface::new();
        let file = pipeline()
            .export_image(Some(&mut surface), "1")
            .await
            .unwrap()
            .unwrap();
        let decoder = png::Decoder::new(&file.bytes[..]);
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 2880);
        assert_eq!(reader.info().height, 1800);
    }

    #[tokio::test]
    async fn document_export_packages_pdf() {
        let mut surface = FakeSurface::new();
        let file = pipeline()
            .export_document(Some(&mut surface), "08123456789")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.filename, "GUCCI_DESKTOP_PDF_08123456789.pdf");
        assert_eq!(file.mime_type(), "application/pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
        assert_eq!(surface.restored, 1);
    }

    #[tokio::test]
    async fn failure_propagates_after_restore() {
        let p = pipeline();
        let mut surface = FakeSurface::failing();
        let before = surface.current_presentation();

        let err = p
            .export_image(Some(&mut surface), "08123456789")
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Rasterize(_)));
        assert_eq!(surface.current_presentation(), before);
        assert_eq!(surface.restored, 1);
        assert!(!p.is_busy());
    }

    #[tokio::test]
    async fn missing_surface_is_a_no_op() {
        let p = pipeline();
        let image = p.export_image(None::<&mut FakeSurface>, "x").await.unwrap();
        let document = p.export_document(None::<&mut FakeSurface>, "x").await.unwrap();
        assert!(image.is_none());
        assert!(document.is_none());
        assert!(!p.is_busy());
    }

    #[tokio::test]
    async fn overlapping_export_is_rejected() {
        let p = ExportPipeline::new().with_settle_delay(Duration::from_millis(50));
        let mut first = FakeSurface::new();
        let mut second = FakeSurface::new();

        let (a, b) = tokio::join!(
            p.export_image(Some(&mut first), "1"),
            p.export_document(Some(&mut second), "2"),
        );

        assert!(a.unwrap().is_some());
        assert!(matches!(b, Err(ExportError::InProgress)));
        assert!(second.seen.borrow().is_empty());
        assert_eq!(second.restored, 0);
        assert!(!p.is_busy());

        let again = p.export_image(Some(&mut second), "2").await.unwrap();
        assert!(again.is_some());
    }
}
