//! Text chunking for downstream indexing
//!
//! Splits documents into overlapping, line-numbered chunks so search hits can be
//! traced back to a file and line range.

mod chunker;

pub use chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, LineAwareSplitter, SPLITTER_VERSION};
