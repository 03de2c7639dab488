mod docx;
mod pdf;
mod txt;

use crate::error::LoadError;
use docsage_core::UploadedFile;

/// Text pulled out of one uploaded file, with the format label that ends
/// up in document metadata.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub text: String,
    pub format: &'static str,
}

/// Extract plain text from file bytes based on the filename extension.
/// Everything happens in memory; nothing touches the filesystem.
pub fn extract_file(file: &UploadedFile) -> Result<ExtractedFile, LoadError> {
    let ext = file.name.rsplit('.').next().unwrap_or("").to_lowercase();

    let (text, format) = match ext.as_str() {
        "pdf" => (pdf::extract_pdf(&file.bytes)?, "pdf"),
        "docx" => (docx::extract_docx(&file.bytes)?, "docx"),
        "txt" | "text" => (txt::extract_txt(&file.bytes), "txt"),
        // Markdown reads as plain text; headings survive inside the body.
        "md" | "markdown" => (txt::extract_txt(&file.bytes), "md"),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    Ok(ExtractedFile { text, format })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_extension_dispatches() {
        let file = UploadedFile::new("notes.txt", b"plain notes".to_vec());
        let extracted = extract_file(&file).unwrap();
        assert_eq!(extracted.format, "txt");
        assert_eq!(extracted.text, "plain notes");
    }

    #[test]
    fn markdown_keeps_its_own_format_label() {
        let file = UploadedFile::new("README.md", b"# Title\n\nBody.".to_vec());
        let extracted = extract_file(&file).unwrap();
        assert_eq!(extracted.format, "md");
        assert!(extracted.text.contains("# Title"));
    }

    #[test]
    fn extension_is_case_insensitive() {
        let file = UploadedFile::new("REPORT.TXT", b"caps".to_vec());
        assert!(extract_file(&file).is_ok());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = UploadedFile::new("slides.pptx", vec![0u8; 8]);
        match extract_file(&file) {
            Err(LoadError::UnsupportedFormat(ext)) => assert_eq!(ext, "pptx"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn extensionless_name_is_rejected() {
        let file = UploadedFile::new("README", b"text".to_vec());
        assert!(matches!(
            extract_file(&file),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }
}
