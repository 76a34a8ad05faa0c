use super::ExtractionError;

/// Pull the native text layer out of a digital document, one string per
/// page, in page order.
pub(super) fn extract_pages(document: &[u8]) -> Result<Vec<String>, ExtractionError> {
    pdf_extract::extract_text_from_mem_by_pages(document)
        .map_err(|err| ExtractionError::PdfParsing(err.to_string()))
}
