//! Task-detail document rendering.
//!
//! - `view` - the rendered document structure
//! - `renderer` - record to document mapping
//! - `id` - footer identifier sources

pub mod id;
pub mod renderer;
pub mod view;

pub use id::{DocumentIdSource, FixedDocumentId, RandomDocumentId};
pub use renderer::render;
pub use view::DocumentView;
