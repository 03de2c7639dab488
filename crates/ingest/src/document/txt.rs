/// Decode plain-text bytes. Tries strict UTF-8 first, falls back to lossy
/// conversion for odd encodings.
pub fn extract_txt(bytes: &[u8]) -> String {
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());
    text.trim().to_string()
}
