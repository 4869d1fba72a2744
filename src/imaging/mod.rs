//! Image identification and thumbnail generation — pure Rust.
//!
//! The module is split into:
//! - **Calculations**: pure functions for the thumbnail dimension policy
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ThumbnailParams};
pub use calculations::{THUMB_TALL_EDGE, THUMB_WIDE_EDGE, thumbnail_dimensions};
pub use rust_backend::{RustBackend, supported_input_extensions};
