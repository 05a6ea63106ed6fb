//! Sentence-aware text chunking
//!
//! Sizes are counted in characters, so a chunk never splits a UTF-8 sequence.

/// Splits normalized text into bounded, sentence-aligned chunks
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chunk_size: usize,
}

impl Chunker {
    /// Create a new chunker; a zero size is treated as one
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    /// Maximum chunk size (characters)
    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Chunk the given text
    ///
    /// Sentences are packed greedily, separated by a single space. A sentence
    /// longer than the limit is emitted on its own as consecutive slices of
    /// exactly `max_chunk_size` characters (the last may be shorter).
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let max = self.max_chunk_size;
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in split_sentences(text) {
            let len = sentence.chars().count();

            if len > max {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                chunks.extend(split_at_char_limit(sentence, max));
                continue;
            }

            let separator = usize::from(!current.is_empty());
            if current_len + separator + len > max {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(sentence);
            current_len += len;
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

/// Split text after `.`, `!` or `?` followed by whitespace
///
/// Units are trimmed; blank units are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(boundary, next)) = chars.peek() else {
            break;
        };
        if !next.is_whitespace() {
            continue;
        }

        push_unit(&mut units, &text[start..boundary]);
        while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            chars.next();
        }
        start = chars.peek().map_or(text.len(), |&(i, _)| i);
    }

    push_unit(&mut units, &text[start..]);
    units
}

fn push_unit<'a>(units: &mut Vec<&'a str>, unit: &'a str) {
    let unit = unit.trim();
    if !unit.is_empty() {
        units.push(unit);
    }
}

/// Slice text into pieces of at most `limit` characters
pub fn split_at_char_limit(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit)
        .map(|piece| piece.iter().collect())
        .collect()
}
