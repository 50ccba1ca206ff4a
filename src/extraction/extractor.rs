//! Text extraction from uploaded documents.

use tracing::{debug, warn};

use super::notice::{
    empty_file_notice, image_pdf_notice, legacy_document_notice, unsupported_format_notice,
};
use super::pdf::extract_pdf_text;
use crate::models::SourceFile;
use crate::utils::FileCategory;

/// Minimum characters of PDF text to consider extraction successful.
pub const DEFAULT_MIN_PDF_CHARS: usize = 50;

/// Share of control characters above which decoded content counts as binary.
const MAX_CONTROL_CHAR_RATIO: f64 = 0.10;

/// Result of text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Extracted text, or a human-readable explanation when `is_fallback_notice`.
    pub text: String,
    /// True when `text` is a notice rather than document content.
    pub is_fallback_notice: bool,
    /// Number of pages processed (for PDFs).
    pub page_count: Option<usize>,
}

impl ExtractionResult {
    fn content(text: String) -> Self {
        Self {
            text,
            is_fallback_notice: false,
            page_count: None,
        }
    }

    fn notice(text: String) -> Self {
        Self {
            text,
            is_fallback_notice: true,
            page_count: None,
        }
    }
}

/// Best-effort text extractor. Never fails; unreadable input becomes a notice.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    min_pdf_chars: usize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            min_pdf_chars: DEFAULT_MIN_PDF_CHARS,
        }
    }
}

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum PDF text length below which a PDF counts as image-based.
    pub fn with_min_pdf_chars(mut self, min_chars: usize) -> Self {
        self.min_pdf_chars = min_chars;
        self
    }

    /// Extract text from a file according to its category.
    pub fn extract(&self, file: &SourceFile, category: FileCategory) -> ExtractionResult {
        debug!(
            "Extracting text from {} ({:?}, {} bytes)",
            file.name, category, file.size_bytes
        );

        if file.raw_bytes.is_empty() {
            return ExtractionResult::notice(empty_file_notice(&file.name));
        }

        match category {
            FileCategory::PlainText => match decode_utf8(&file.raw_bytes) {
                Some(text) => self.text_or_empty_notice(file, text),
                None => {
                    debug!("{} is not valid UTF-8, treating as unknown", file.name);
                    self.extract_unknown(file)
                }
            },
            FileCategory::Pdf => self.extract_pdf(file),
            FileCategory::LegacyDocument => {
                ExtractionResult::notice(legacy_document_notice(&file.name))
            }
            FileCategory::Unknown => self.extract_unknown(file),
        }
    }

    fn extract_pdf(&self, file: &SourceFile) -> ExtractionResult {
        match extract_pdf_text(&file.raw_bytes) {
            Ok(pdf) if pdf.text.trim().chars().count() >= self.min_pdf_chars => {
                debug!(
                    "PDF extraction succeeded: {} pages, {} chars",
                    pdf.page_count,
                    pdf.text.len()
                );
                ExtractionResult {
                    text: pdf.text,
                    is_fallback_notice: false,
                    page_count: Some(pdf.page_count),
                }
            }
            Ok(pdf) => {
                warn!(
                    "{} yielded only {} characters, likely image-based",
                    file.name,
                    pdf.text.trim().chars().count()
                );
                ExtractionResult {
                    page_count: Some(pdf.page_count),
                    ..ExtractionResult::notice(image_pdf_notice(&file.name, file.size_bytes))
                }
            }
            Err(e) => {
                warn!("PDF extraction failed for {}: {}", file.name, e);
                ExtractionResult::notice(image_pdf_notice(&file.name, file.size_bytes))
            }
        }
    }

    fn extract_unknown(&self, file: &SourceFile) -> ExtractionResult {
        match decode_utf8(&file.raw_bytes) {
            Some(text) if !looks_binary(&text) => self.text_or_empty_notice(file, text),
            _ => ExtractionResult::notice(unsupported_format_notice(&file.name)),
        }
    }

    fn text_or_empty_notice(&self, file: &SourceFile, text: String) -> ExtractionResult {
        if text.trim().is_empty() {
            ExtractionResult::notice(empty_file_notice(&file.name))
        } else {
            ExtractionResult::content(text)
        }
    }
}

/// Decode bytes as UTF-8, dropping a leading byte-order mark.
fn decode_utf8(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).ok()
}

/// Whether decoded text is really binary data.
fn looks_binary(text: &str) -> bool {
    if text.contains('\0') {
        return true;
    }
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let control = text
        .chars()
        .filter(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\u{0C}'))
        .count();
    control as f64 / total as f64 > MAX_CONTROL_CHAR_RATIO
}

#[cfg(test)]
mod tests {
    use super::super::notice::PDF_NOTICE_HEADER;
    use super::super::pdf::test_support::make_test_pdf;
    use super::*;

    fn file(name: &str, mime: Option<&str>, bytes: &[u8]) -> SourceFile {
        SourceFile::new(name, mime.map(str::to_string), bytes.to_vec())
    }

    #[test]
    fn test_plain_text_is_byte_equal() {
        let input = "This is a test sentence.\nSecond line, with ünïcödé.";
        let f = file("notes.txt", Some("text/plain"), input.as_bytes());
        let result = TextExtractor::new().extract(&f, FileCategory::PlainText);
        assert!(!result.is_fallback_notice);
        assert_eq!(result.text, input);
    }

    #[test]
    fn test_bom_is_stripped() {
        let f = file("bom.txt", None, b"\xEF\xBB\xBFhello");
        let result = TextExtractor::new().extract(&f, FileCategory::PlainText);
        assert_eq!(result.text, "hello");
    }

    #[test]
    fn test_empty_file_is_notice() {
        for category in [
            FileCategory::PlainText,
            FileCategory::Pdf,
            FileCategory::LegacyDocument,
            FileCategory::Unknown,
        ] {
            let result = TextExtractor::new().extract(&file("empty.bin", None, b""), category);
            assert!(result.is_fallback_notice);
            assert!(result.text.contains("empty.bin"));
        }
    }

    #[test]
    fn test_invalid_utf8_plain_text_degrades_to_notice() {
        let f = file("latin1.txt", Some("text/plain"), &[0x66, 0x6f, 0xff, 0xfe, 0x00]);
        let result = TextExtractor::new().extract(&f, FileCategory::PlainText);
        assert!(result.is_fallback_notice);
        assert!(result.text.contains("supported format"));
    }

    #[test]
    fn test_unknown_text_is_read() {
        let f = file("README", None, b"Plain words in an unknown file.");
        let result = TextExtractor::new().extract(&f, FileCategory::Unknown);
        assert!(!result.is_fallback_notice);
        assert_eq!(result.text, "Plain words in an unknown file.");
    }

    #[test]
    fn test_unknown_binary_is_notice() {
        let f = file("blob.bin", None, b"\x01\x02\x03\x04abc\x05\x06\x07");
        let result = TextExtractor::new().extract(&f, FileCategory::Unknown);
        assert!(result.is_fallback_notice);
        assert!(result.text.contains("blob.bin"));
    }

    #[test]
    fn test_legacy_document_is_always_notice() {
        let f = file("memo.doc", Some("application/msword"), b"binary word stuff");
        let result = TextExtractor::new().extract(&f, FileCategory::LegacyDocument);
        assert!(result.is_fallback_notice);
        assert!(result.text.contains("memo.doc"));
    }

    #[test]
    fn test_non_pdf_bytes_with_pdf_category() {
        let f = file("fake.pdf", Some("application/pdf"), b"definitely not a pdf");
        let result = TextExtractor::new().extract(&f, FileCategory::Pdf);
        assert!(result.is_fallback_notice);
        assert!(result.text.contains(PDF_NOTICE_HEADER));
        assert!(result.text.contains("fake.pdf"));
    }

    #[test]
    fn test_short_pdf_text_is_notice() {
        let pdf = make_test_pdf(&["Tiny"]);
        let f = file("scan.pdf", Some("application/pdf"), &pdf);
        let result = TextExtractor::new().extract(&f, FileCategory::Pdf);
        assert!(result.is_fallback_notice);
        assert!(result.text.contains("scan.pdf"));
    }

    #[test]
    fn test_pdf_with_enough_text() {
        let pdf = make_test_pdf(&[
            "The quarterly report describes revenue growth across all regions",
            "Second page continues the discussion of operating costs in detail",
        ]);
        let f = file("report.pdf", Some("application/pdf"), &pdf);
        let result = TextExtractor::new().extract(&f, FileCategory::Pdf);
        assert!(!result.is_fallback_notice, "got notice: {}", result.text);
        assert_eq!(result.page_count, Some(2));
    }

    #[test]
    fn test_min_pdf_chars_is_configurable() {
        let pdf = make_test_pdf(&["Tiny"]);
        let f = file("tiny.pdf", Some("application/pdf"), &pdf);
        let result = TextExtractor::new()
            .with_min_pdf_chars(1)
            .extract(&f, FileCategory::Pdf);
        assert!(!result.is_fallback_notice);
    }
}
