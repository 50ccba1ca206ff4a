//! Shared utility functions.
//!
//! - `format`: Human-readable formatting (sizes, truncation)
//! - `mime`: MIME type categorization and file-type classification

mod format;
mod mime;

pub use format::{format_kb, format_size, truncate_utf8};
pub use mime::{
    classify, guess_from_name, mime_label, mime_type_category, sniff_mime, FileCategory,
};
