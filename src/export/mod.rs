//! Export of a rendered task document to downloadable files.
//!
//! - `pipeline` - capture sequence at the canonical size
//! - `pdf` - single-page PDF packaging

pub mod pdf;
pub mod pipeline;

pub use pipeline::ExportPipeline;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use thiserror::Error;

pub const PNG_FILE_PREFIX: &str = "GUCCI_DESKTOP_TASK_";
pub const PDF_FILE_PREFIX: &str = "GUCCI_DESKTOP_PDF_";

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("another export is already running")]
    InProgress,
    #[error("failed to rasterize surface: {0}")]
    Rasterize(String),
    #[error("failed to encode PNG: {0}")]
    EncodePng(#[from] png::EncodingError),
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// Exportable file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Png,
    Pdf,
}

impl FileKind {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    /// `bytes` of this kind as a base64 data URL.
    pub fn data_url(&self, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(bytes))
    }

    fn prefix(&self) -> &'static str {
        match self {
            Self::Png => PNG_FILE_PREFIX,
            Self::Pdf => PDF_FILE_PREFIX,
        }
    }
}

/// Download name for an export of `phone_number`'s task.
pub fn export_filename(kind: FileKind, phone_number: &str) -> String {
    let safe = sanitize_filename::sanitize(phone_number);
    format!("{}{}.{}", kind.prefix(), safe, kind.extension())
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub kind: FileKind,
    pub bytes: Vec<u8>,
    /// Pixel dimensions of the captured bitmap.
    pub width: u32,
    pub height: u32,
}

impl ExportedFile {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }

    /// Write the file into `dir` under its download name.
    pub fn save_to(&self, dir: &Path) -> Result<std::path::PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}
