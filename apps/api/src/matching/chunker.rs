//! Text Chunker — splits arbitrary-length text into overlapping fixed-size
//! segments suitable for embedding.

/// Splits `text` into chunks of at most `chunk_size` characters, with each
/// consecutive pair of chunks sharing `overlap` characters so context is not
/// lost at segment boundaries. Boundaries always fall on `char` boundaries,
/// so multi-byte input never splits mid-character.
///
/// Empty input yields no chunks. Input shorter than `chunk_size` yields
/// exactly one chunk.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the string, so
    // slices index by character position rather than raw bytes.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let total_chars = boundaries.len() - 1;

    // A stride of zero would never terminate.
    let stride = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + chunk_size).min(total_chars);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == total_chars {
            break;
        }
        start += stride;
    }
    chunks
}
