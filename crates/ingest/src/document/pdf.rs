use crate::error::LoadError;

/// Extract text from PDF bytes. pdf-extract returns the whole document as
/// one string with form feeds between pages; those become paragraph breaks
/// so the chunker can cut there.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, LoadError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| LoadError::Pdf(e.to_string()))?;

    let text = text.replace('\x0C', "\n\n");
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_with_pdf_error() {
        let result = extract_pdf(b"definitely not a pdf");
        assert!(matches!(result, Err(LoadError::Pdf(_))));
    }
}
