//! Overlapping-window chunking engine.
//!
//! Splits documents into bounded chunks for embedding. Every chunk is an
//! exact substring of its document and consecutive chunks share exactly
//! `chunk_overlap` characters, so the original text can always be
//! reassembled from the chunk sequence.

use docsage_core::config::ChunkingConfig;
use docsage_core::{Chunk, Document};

// ── Public entry points ─────────────────────────────────────────────────────

/// Chunk every document, carrying each document's metadata onto its chunks.
/// Output keeps document order, then in-document order.
pub fn split_documents(documents: &[Document], config: &ChunkingConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for doc in documents {
        let pieces = split_text(&doc.text, config);
        tracing::debug!(source = doc.source(), pieces = pieces.len(), "chunked document");
        for piece in pieces {
            chunks.push(Chunk::new(piece, doc.metadata.clone()));
        }
    }
    chunks
}

/// Split one text into overlapping windows of at most `chunk_size` chars.
///
/// Window ends are pulled back to the most natural boundary available:
/// paragraph break, then sentence end, then whitespace, then a hard cut.
/// A boundary is only usable if cutting there still advances past the
/// overlap region; otherwise the next boundary class is tried. The next
/// window starts exactly `chunk_overlap` characters before the cut.
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }

    let size = config.chunk_size.max(1);
    // An overlap as large as the window cannot make progress.
    let overlap = if config.chunk_overlap >= size { size / 4 } else { config.chunk_overlap };

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + size).min(n);
        if end == n {
            chunks.push(chars[start..n].iter().collect());
            break;
        }
        let cut = cut_point(&chars, start, end, overlap);
        chunks.push(chars[start..cut].iter().collect());
        start = cut - overlap;
    }
    chunks
}

// ── Cut selection ───────────────────────────────────────────────────────────

const SENTENCE_TERMINALS: [char; 3] = ['.', '!', '?'];

/// Pick where to end the window `chars[start..end]`. Returns a position in
/// `(start + overlap, end]`; the separator itself stays in the outgoing
/// chunk.
fn cut_point(chars: &[char], start: usize, end: usize, overlap: usize) -> usize {
    // Smallest cut that still moves the next window forward.
    let min_cut = start + overlap + 1;

    // Paragraph break: cut after the blank line.
    for i in (start..end.saturating_sub(1)).rev() {
        if chars[i] == '\n' && chars[i + 1] == '\n' {
            let cut = i + 2;
            if cut >= min_cut {
                return cut;
            }
            break; // earlier breaks are closer to start, give up on this class
        }
    }

    // Sentence end: terminal punctuation followed by space or newline.
    for i in (start..end.saturating_sub(1)).rev() {
        if SENTENCE_TERMINALS.contains(&chars[i]) && (chars[i + 1] == ' ' || chars[i + 1] == '\n')
        {
            let cut = i + 2;
            if cut >= min_cut {
                return cut;
            }
            break;
        }
    }

    // Word break: cut after whitespace.
    for i in (start..end).rev() {
        if chars[i].is_whitespace() {
            let cut = i + 1;
            if cut >= min_cut {
                return cut;
            }
            break;
        }
    }

    // Hard cut mid-word.
    end
}
