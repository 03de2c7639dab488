use std::io::{Cursor, Read};

use crate::error::LoadError;

/// Extract text from DOCX bytes. A .docx file is a zip container; the body
/// lives in `word/document.xml` as `<w:t>` text runs grouped into `<w:p>`
/// paragraphs.
pub fn extract_docx(bytes: &[u8]) -> Result<String, LoadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| LoadError::Docx(format!("not a valid docx container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| LoadError::Docx(format!("missing document body: {e}")))?
        .read_to_string(&mut xml)?;

    Ok(document_xml_to_text(&xml))
}

/// Walk the document XML tag by tag, keeping only run text. Paragraph ends
/// become newlines, explicit tabs and line breaks keep their meaning.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::new();
    let mut rest = xml;

    loop {
        let Some(open) = rest.find('<') else { break };
        let Some(close) = rest[open + 1..].find('>').map(|i| open + 1 + i) else { break };
        let tag = &rest[open + 1..close];
        rest = &rest[close + 1..];

        if (tag == "w:t" || tag.starts_with("w:t ")) && !tag.ends_with('/') {
            if let Some(end) = rest.find("</w:t>") {
                push_decoded(&mut out, &rest[..end]);
                rest = &rest[end + "</w:t>".len()..];
            }
        } else if tag == "/w:p" {
            out.push('\n');
        } else if tag == "w:tab/" || tag.starts_with("w:tab ") {
            out.push('\t');
        } else if tag == "w:br/" || tag.starts_with("w:br ") {
            out.push('\n');
        }
    }

    out.trim().to_string()
}

/// XML entity decoding for run text. `&amp;` goes last so already-decoded
/// sequences are not decoded twice.
fn push_decoded(out: &mut String, raw: &str) {
    let decoded = raw
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    out.push_str(&decoded);
}
