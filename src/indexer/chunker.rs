use crate::config::SplitterConfig;
use crate::error::ConfigError;
use crate::types::{
    CHUNK_INDEX_KEY, Document, END_LINE_KEY, FILE_PATH_KEY, SPLITTER_VERSION_KEY,
    START_LINE_KEY,
};

/// Version stamped into every chunk's metadata
pub const SPLITTER_VERSION: u64 = 2;

/// Default lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 120;

/// Default lines shared by consecutive chunks
pub const DEFAULT_CHUNK_OVERLAP: usize = 30;

/// Splits documents into overlapping line ranges.
///
/// `chunk_size` and `chunk_overlap` count lines. Every chunk records its
/// `start_line`/`end_line` (1-based, inclusive), its `chunk_index` and the
/// [`SPLITTER_VERSION`]. Lines end at `\n`, `\r\n`, `\r`, the VT/FF/FS/GS/RS
/// controls, NEL, U+2028 and U+2029. Terminators are kept, so with no overlap the
/// chunk texts concatenate back to the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAwareSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl LineAwareSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chunk_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "must be less than chunk_size ({}), got {}",
                    chunk_size, chunk_overlap
                ),
            });
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self, ConfigError> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split a batch of documents; documents with empty text yield nothing
    pub fn split(&self, documents: &[Document]) -> Vec<Document> {
        documents
            .iter()
            .flat_map(|doc| self.split_document(doc))
            .collect()
    }

    /// Split a single document into line-range chunks
    pub fn split_document(&self, document: &Document) -> Vec<Document> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let lines = split_lines_keep_ends(&document.text);
        let total = lines.len();
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::with_capacity(total.div_ceil(step));
        let mut start = 0;

        while start < total {
            let end = (start + self.chunk_size).min(total);

            let mut meta_data = document.meta_data.clone();
            meta_data.insert(START_LINE_KEY.to_string(), (start + 1).into());
            meta_data.insert(END_LINE_KEY.to_string(), end.into());
            meta_data.insert(CHUNK_INDEX_KEY.to_string(), chunks.len().into());
            meta_data.insert(SPLITTER_VERSION_KEY.to_string(), SPLITTER_VERSION.into());

            chunks.push(Document {
                text: lines[start..end].concat(),
                meta_data,
            });

            start += step;
        }

        tracing::debug!(
            "Split {} ({} lines) into {} chunks",
            document
                .meta_data
                .get(FILE_PATH_KEY)
                .and_then(|v| v.as_str())
                .unwrap_or("<unnamed>"),
            total,
            chunks.len()
        );

        chunks
    }
}

impl Default for LineAwareSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// LF, CR, VT, FF, FS, GS, RS, NEL and the Unicode line/paragraph separators
const fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split `text` into lines, each keeping its terminator. `\r\n` counts as one.
fn split_lines_keep_ends(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        let mut line_end = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            line_end += 1;
        }
        lines.push(&text[line_start..line_end]);
        line_start = line_end;
    }

    if line_start < text.len() {
        lines.push(&text[line_start..]);
    }
    lines
}
