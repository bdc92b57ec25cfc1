//! Overlapping fixed-size text chunking.
//!
//! Documents are split into character windows of at most `chunk_size`
//! characters, each starting `chunk_size - overlap` characters after the
//! previous one, so consecutive chunks share exactly `overlap` characters.
//! The final chunk may be shorter. Concatenating the first
//! `chunk_size - overlap` characters of every chunk reconstructs the source
//! text exactly, so no content is lost at chunk boundaries.

/// Split `text` into overlapping chunks.
///
/// Returns a lazy iterator over `&str` slices of the input; cloning it
/// restarts iteration from the beginning. Offsets are counted in characters
/// and slices always fall on UTF-8 boundaries.
///
/// An empty `text` yields no chunks. Text of at most
/// `chunk_size - overlap` characters yields exactly one chunk equal to the
/// full text. `chunk_size == 0` yields no chunks, and `overlap >= chunk_size`
/// stops after the first chunk instead of looping forever; both are rejected
/// up front by [`RagConfig`](crate::RagConfig) validation.
pub fn chunks(text: &str, chunk_size: usize, overlap: usize) -> Chunks<'_> {
    Chunks { text, start: 0, chunk_size, overlap }
}

/// Lazy iterator over overlapping chunks of a text. See [`chunks`].
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    text: &'a str,
    start: usize,
    chunk_size: usize,
    overlap: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.start >= self.text.len() || self.chunk_size == 0 {
            return None;
        }

        let rest = &self.text[self.start..];
        let end = char_offset(rest, self.chunk_size);
        let chunk = &rest[..end];

        let step = self.chunk_size.saturating_sub(self.overlap);
        if step == 0 {
            // Zero progress per round; stop after the first chunk.
            self.start = self.text.len();
        } else {
            self.start += char_offset(rest, step);
        }

        Some(chunk)
    }
}

/// Byte offset of the `n`-th character of `text`, or `text.len()` if the
/// text has fewer than `n` characters.
fn char_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}

/// Truncate `text` to at most `max_chars` characters on a UTF-8 boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..char_offset(text, max_chars)]
}
