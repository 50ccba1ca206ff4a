//! Text extraction for uploaded documents.
//!
//! Extraction never fails: files that cannot be read yield a human-readable
//! notice flagged with `is_fallback_notice` instead of an error.

mod extractor;
mod notice;
mod pdf;

pub use extractor::{ExtractionResult, TextExtractor, DEFAULT_MIN_PDF_CHARS};
pub use notice::{
    empty_file_notice, image_pdf_notice, legacy_document_notice, unsupported_format_notice,
    NOTICE_FOOTER, PDF_NOTICE_HEADER,
};
pub use pdf::{extract_pdf_text, PdfError, PdfText};

#[cfg(test)]
pub(crate) use pdf::test_support;
