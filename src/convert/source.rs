//! Conversion inputs: sources and their metadata.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{ByteStream, Meta};

/// A document to convert.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// File on disk
    Path(PathBuf),
    /// Bytes already in memory
    Bytes(ByteStream),
}

impl Source {
    /// Read the source into a byte stream.
    pub fn load(&self) -> Result<ByteStream> {
        match self {
            Source::Path(path) => ByteStream::from_file(path),
            Source::Bytes(stream) => Ok(stream.clone()),
        }
    }

    /// Human-readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Bytes(stream) => match stream.meta.get("file_path").and_then(|v| v.as_str()) {
                Some(path) => path.to_string(),
                None => format!("<{} bytes>", stream.len()),
            },
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<ByteStream> for Source {
    fn from(stream: ByteStream) -> Self {
        Source::Bytes(stream)
    }
}

/// Metadata supplied alongside sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MetaInput {
    /// No extra metadata
    #[default]
    None,
    /// Same metadata for every source
    Single(Meta),
    /// One entry per source, in order
    PerSource(Vec<Meta>),
}

impl MetaInput {
    /// Expand into exactly one map per source.
    pub fn normalize(self, sources_count: usize) -> Result<Vec<Meta>> {
        match self {
            MetaInput::None => Ok(vec![Meta::new(); sources_count]),
            MetaInput::Single(meta) => Ok(vec![meta; sources_count]),
            MetaInput::PerSource(list) if list.len() == sources_count => Ok(list),
            MetaInput::PerSource(list) => Err(Error::InvalidConfig(format!(
                "The length of the metadata list ({}) must match the number of sources ({}).",
                list.len(),
                sources_count
            ))),
        }
    }
}

impl From<Meta> for MetaInput {
    fn from(meta: Meta) -> Self {
        MetaInput::Single(meta)
    }
}

impl From<Vec<Meta>> for MetaInput {
    fn from(list: Vec<Meta>) -> Self {
        MetaInput::PerSource(list)
    }
}

impl From<Option<Meta>> for MetaInput {
    fn from(meta: Option<Meta>) -> Self {
        meta.map_or(MetaInput::None, MetaInput::Single)
    }
}

/// Combine byte-stream metadata with caller metadata.
///
/// Caller values win. Unless `store_full_path` is set, a `file_path` taken
/// from the byte stream is reduced to its file name.
pub fn merge_meta(stream_meta: &Meta, meta: Meta, store_full_path: bool) -> Meta {
    let mut merged = stream_meta.clone();
    merged.extend(meta);

    if !store_full_path {
        if let Some(path) = stream_meta.get("file_path").and_then(|v| v.as_str()) {
            if !path.is_empty() {
                let name = Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                merged.insert("file_path".into(), name.into());
            }
        }
    }

    merged
}
