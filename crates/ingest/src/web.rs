use std::time::Duration;

use crate::error::LoadError;

/// Fetch one page and reduce it to readable text.
pub async fn fetch_url(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let fetch_err = |source| LoadError::Fetch { url: url.to_string(), source };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;

    tracing::debug!(url, "fetching page");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?;

    let html = response.text().await.map_err(fetch_err)?;
    Ok(strip_html(&html))
}

/// Elements that imply a line break when they open or close.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table",
    "blockquote", "section", "article", "header", "footer", "pre",
];

/// Strip HTML down to text: drop tags, skip script/style bodies entirely,
/// decode common entities, normalize whitespace. Block elements become
/// newlines so paragraph structure survives into chunking.
pub fn strip_html(html: &str) -> String {
    // Lowercased shadow for case-insensitive tag matching. ASCII lowering
    // keeps byte offsets aligned with the original.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len() / 2);
    let mut pos = 0;

    while let Some(open) = lower[pos..].find('<').map(|i| pos + i) {
        push_decoded(&mut out, &html[pos..open]);

        let Some(close) = lower[open + 1..].find('>').map(|i| open + 1 + i) else {
            pos = html.len();
            break;
        };
        let tag = &lower[open + 1..close];
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        if !tag.starts_with('/') && (name == "script" || name == "style") {
            // Jump past the whole element, content included.
            let closer = format!("</{name}");
            pos = match lower[close..].find(&closer) {
                Some(i) => {
                    let after = close + i;
                    lower[after..]
                        .find('>')
                        .map(|j| after + j + 1)
                        .unwrap_or(html.len())
                }
                None => html.len(),
            };
            continue;
        }

        if BLOCK_TAGS.contains(&name) {
            out.push('\n');
        }
        pos = close + 1;
    }
    if pos < html.len() {
        push_decoded(&mut out, &html[pos..]);
    }

    collapse_whitespace(&out)
}

fn push_decoded(out: &mut String, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = raw
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    out.push_str(&decoded);
}

/// Squeeze runs of spaces inside lines and runs of blank lines between
/// them, so the result is paragraphs separated by single blank lines.
fn collapse_whitespace(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in raw.lines() {
        let norm = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if norm.is_empty() {
            pending_blank = !lines.is_empty();
        } else {
            if pending_blank {
                lines.push(String::new());
                pending_blank = false;
            }
            lines.push(norm);
        }
    }

    lines.join("\n")
}
