//! Fallback notices substituted for document text when extraction cannot
//! recover real content.

use crate::utils::format_kb;

/// Header line of the image-based PDF notice.
pub const PDF_NOTICE_HEADER: &str = "=== PDF TEXT EXTRACTION LIMITATION ===";

/// Footer line shared by multi-line notices.
pub const NOTICE_FOOTER: &str = "=== END OF NOTICE ===";

/// Notice for PDFs that are image-based, protected, or unparseable.
pub fn image_pdf_notice(file_name: &str, size_bytes: u64) -> String {
    format!(
        r#"{PDF_NOTICE_HEADER}

We detected that the PDF file "{file_name}" ({size}) may be image-based,
protected, or have limited text content.

For better results:
1. Use an OCR (Optical Character Recognition) tool to convert your PDF to text
2. Copy the text manually from your PDF viewer:
   - Open the PDF in a PDF viewer
   - Select all text and copy it
   - Paste it into a text file (.txt)
   - Upload the text file for analysis
3. Use a different PDF that contains selectable text

Image-based PDFs contain pictures of text rather than actual text characters,
so their text cannot be extracted directly.

{NOTICE_FOOTER}"#,
        size = format_kb(size_bytes),
    )
}

/// Notice for Word documents, which are never parsed in-process.
pub fn legacy_document_notice(file_name: &str) -> String {
    format!(
        "This is a Word document ({file_name}) which cannot be parsed directly. \
         Please convert it to PDF or plain text for analysis."
    )
}

/// Notice for content that does not decode as text.
pub fn unsupported_format_notice(file_name: &str) -> String {
    format!(
        "This file type ({file_name}) cannot be processed directly. \
         Please convert it to PDF, TXT, or another supported format."
    )
}

/// Notice for files with no readable content at all.
pub fn empty_file_notice(file_name: &str) -> String {
    format!(
        "The file ({file_name}) is empty or contains no readable text. \
         Please upload a document with text content."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_pdf_notice_names_file_and_size() {
        let notice = image_pdf_notice("scan.pdf", 2048);
        assert!(notice.starts_with(PDF_NOTICE_HEADER));
        assert!(notice.contains("\"scan.pdf\" (2.00 KB)"));
        assert!(notice.contains("image-based"));
        assert!(notice.contains("OCR"));
        assert!(notice.trim_end().ends_with(NOTICE_FOOTER));
    }

    #[test]
    fn test_legacy_notice_recommends_conversion() {
        let notice = legacy_document_notice("memo.docx");
        assert!(notice.contains("memo.docx"));
        assert!(notice.contains("PDF or plain text"));
    }
}
