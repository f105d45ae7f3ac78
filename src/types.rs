use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open string-keyed metadata carried alongside document text
pub type Metadata = Map<String, Value>;

/// Metadata key holding the source file path
pub const FILE_PATH_KEY: &str = "file_path";
/// 1-based first line of a chunk
pub const START_LINE_KEY: &str = "start_line";
/// 1-based, inclusive last line of a chunk
pub const END_LINE_KEY: &str = "end_line";
/// 0-based position of a chunk within its source document
pub const CHUNK_INDEX_KEY: &str = "chunk_index";
/// Version of the splitter that produced a chunk
pub const SPLITTER_VERSION_KEY: &str = "splitter_version";

/// A unit of text flowing through the indexing pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Raw content
    pub text: String,
    /// Arbitrary metadata (at minimum `file_path` when known)
    #[serde(default)]
    pub meta_data: Metadata,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            meta_data: Metadata::new(),
        }
    }

    /// Document for a file, with `file_path` set
    pub fn for_file(file_path: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(text).with_meta(FILE_PATH_KEY, file_path.into())
    }

    /// Builder-style metadata insert
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta_data.insert(key.into(), value.into());
        self
    }

    pub fn file_path(&self) -> Option<&str> {
        self.meta_data.get(FILE_PATH_KEY).and_then(Value::as_str)
    }

    /// Integer metadata value (line numbers, chunk index, version)
    pub fn meta_u64(&self, key: &str) -> Option<u64> {
        self.meta_data.get(key).and_then(Value::as_u64)
    }
}
