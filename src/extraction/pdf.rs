//! PDF text extraction using the pdf-extract crate.

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Errors from the PDF text layer.
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing failed: {0}")]
    Parse(String),

    #[error("PDF parser panicked on malformed input")]
    Panicked,
}

/// Text pulled from a PDF's embedded text layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Page texts joined with a blank line, in page order.
    pub text: String,
    pub page_count: usize,
}

/// Extract the text layer page by page.
///
/// pdf-extract can panic on malformed streams, so the call is isolated
/// with `catch_unwind` and reported as [`PdfError::Panicked`].
pub fn extract_pdf_text(bytes: &[u8]) -> Result<PdfText, PdfError> {
    let pages = guarded(|| pdf_extract::extract_text_from_mem_by_pages(bytes))?;

    let page_count = pages.len();
    let text = pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(PdfText { text, page_count })
}

/// Run a page extraction, mapping panics and parse errors to [`PdfError`].
///
/// No small input is known to panic the current pdf-extract release, so the
/// panic path is exercised with a panicking closure in tests.
fn guarded<F, E>(extract: F) -> Result<Vec<String>, PdfError>
where
    F: FnOnce() -> Result<Vec<String>, E>,
    E: std::fmt::Display,
{
    panic::catch_unwind(AssertUnwindSafe(extract))
        .map_err(|_| PdfError::Panicked)?
        .map_err(|e| PdfError::Parse(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    /// Build a real PDF with one page per entry, using lopdf.
    pub fn make_test_pdf(pages: &[&str]) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = format!("BT /F1 12 Tf 72 700 Td ({text}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
