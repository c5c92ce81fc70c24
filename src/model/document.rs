//! Document-level types.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

use super::fingerprint::{
    bytes_literal, float_list_literal, float_literal, int_list_literal, map_literal,
};
use crate::error::{Error, Result};

/// Document metadata: JSON values keyed by name, in insertion order.
pub type Meta = Map<String, Value>;

/// Binary data attached to a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ByteStream {
    /// Raw bytes
    pub data: Vec<u8>,

    /// Metadata about the source (file path, ...)
    pub meta: Meta,

    /// MIME type of the data
    pub mime_type: Option<String>,
}

impl ByteStream {
    /// Create a byte stream from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            meta: Meta::new(),
            mime_type: None,
        }
    }

    /// Set the MIME type and return self.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the metadata and return self.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Read a file into a byte stream, recording its path in `file_path`.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut meta = Meta::new();
        meta.insert(
            "file_path".to_string(),
            Value::String(path.to_string_lossy().into_owned()),
        );
        Ok(Self::new(data).with_meta(meta))
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the stream holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sparse vector representation of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseEmbedding {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl SparseEmbedding {
    /// Create a sparse embedding; indices and values must pair up.
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::InvalidDocument(format!(
                "sparse embedding has {} indices but {} values",
                indices.len(),
                values.len()
            )));
        }
        Ok(Self { indices, values })
    }

    fn literal(&self) -> String {
        format!(
            "{{'indices': {}, 'values': {}}}",
            int_list_literal(&self.indices),
            float_list_literal(&self.values)
        )
    }
}

/// A unit of content flowing through the pipeline.
///
/// The `id` is derived from the other identity fields (see
/// [`Document::compute_id`]) unless set explicitly. Two documents are equal
/// when all their fields are equal, which matches comparing their dictionary
/// representations.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub content: Option<String>,
    pub blob: Option<ByteStream>,
    pub meta: Meta,
    pub score: Option<f64>,
    pub embedding: Option<Vec<f64>>,
    pub sparse_embedding: Option<SparseEmbedding>,
}

impl Document {
    /// Create a text document.
    pub fn with_content(content: impl Into<String>) -> Self {
        DocumentBuilder::new().content(content).build()
    }

    /// Create a text document with metadata.
    pub fn with_content_and_meta(content: impl Into<String>, meta: Meta) -> Self {
        DocumentBuilder::new().content(content).meta(meta).build()
    }

    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Compute the content-addressed id from the identity fields.
    ///
    /// `score` does not take part. Empty content hashes like absent content.
    pub fn compute_id(&self) -> String {
        let text = match self.content.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => "None".to_string(),
        };
        let blob = self
            .blob
            .as_ref()
            .map(|b| bytes_literal(&b.data))
            .unwrap_or_else(|| "None".to_string());
        let mime_type = self
            .blob
            .as_ref()
            .and_then(|b| b.mime_type.clone())
            .unwrap_or_else(|| "None".to_string());
        let meta = map_literal(&self.meta);
        let embedding = self
            .embedding
            .as_deref()
            .map(float_list_literal)
            .unwrap_or_else(|| "None".to_string());
        let sparse = self
            .sparse_embedding
            .as_ref()
            .map(SparseEmbedding::literal)
            .unwrap_or_default();

        let data = format!("{text}{blob}{mime_type}{meta}{embedding}{sparse}");
        hex::encode(Sha256::digest(data.as_bytes()))
    }

    /// Content kind, kept for callers that still ask for it.
    pub fn content_type(&self) -> Result<&'static str> {
        match self.content {
            Some(_) => Ok("text"),
            None => Err(Error::InvalidDocument("Content is not set.".into())),
        }
    }

    /// Convert into the dictionary representation.
    ///
    /// With `flatten`, metadata keys are merged into the top level instead of
    /// being nested under `meta`.
    pub fn to_value(&self, flatten: bool) -> Value {
        let blob = self.blob.as_ref().map(|b| {
            json!({
                "data": b.data,
                "mime_type": b.mime_type,
            })
        });

        let mut map = Map::new();
        map.insert("id".into(), json!(self.id));
        map.insert("content".into(), json!(self.content));
        map.insert("blob".into(), blob.unwrap_or(Value::Null));
        if !flatten {
            map.insert("meta".into(), Value::Object(self.meta.clone()));
        }
        map.insert("score".into(), json!(self.score));
        map.insert("embedding".into(), json!(self.embedding));
        map.insert("sparse_embedding".into(), json!(self.sparse_embedding));
        if flatten {
            for (k, v) in &self.meta {
                map.insert(k.clone(), v.clone());
            }
        }
        Value::Object(map)
    }

    /// Build a document from its dictionary representation.
    ///
    /// Accepts nested `meta` or flattened metadata keys, but not both. Legacy
    /// fields are translated first (see [`translate_legacy_fields`]).
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(fields) = value else {
            return Err(Error::InvalidDocument(
                "document must be a JSON object".into(),
            ));
        };
        let fields = translate_legacy_fields(fields)?;

        let mut builder = DocumentBuilder::new();
        let mut nested_meta = Meta::new();
        let mut flat_meta = Meta::new();

        for (key, value) in fields {
            match key.as_str() {
                "id" => {
                    if let Value::String(id) = value {
                        if !id.is_empty() {
                            builder = builder.id(id);
                        }
                    }
                }
                "content" => {
                    if let Value::String(content) = value {
                        builder = builder.content(content);
                    }
                }
                "blob" => {
                    if !value.is_null() {
                        let raw: RawBlob = serde_json::from_value(value)?;
                        let mut blob = ByteStream::new(raw.data);
                        blob.mime_type = raw.mime_type;
                        builder = builder.blob(blob);
                    }
                }
                "meta" => match value {
                    Value::Object(meta) => nested_meta = meta,
                    Value::Null => {}
                    other => {
                        return Err(Error::InvalidDocument(format!(
                            "`meta` must be an object, got {}",
                            other
                        )))
                    }
                },
                "score" => {
                    if let Some(score) = value.as_f64() {
                        builder = builder.score(score);
                    }
                }
                "embedding" => {
                    if !value.is_null() {
                        builder = builder.embedding(serde_json::from_value(value)?);
                    }
                }
                "sparse_embedding" => {
                    if !value.is_null() {
                        builder = builder.sparse_embedding(serde_json::from_value(value)?);
                    }
                }
                _ => {
                    flat_meta.insert(key, value);
                }
            }
        }

        if !nested_meta.is_empty() && !flat_meta.is_empty() {
            return Err(Error::InvalidDocument(
                "You can pass either the 'meta' parameter or flattened metadata keys, \
                 but currently you're passing both."
                    .into(),
            ));
        }

        let meta = if flat_meta.is_empty() {
            nested_meta
        } else {
            flat_meta
        };
        Ok(builder.meta(meta).build())
    }
}

impl Default for Document {
    fn default() -> Self {
        DocumentBuilder::new().build()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value(true).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Document::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::new();
        if let Some(content) = &self.content {
            if content.chars().count() < 100 {
                fields.push(format!("content: '{}'", content));
            } else {
                let head: String = content.chars().take(100).collect();
                fields.push(format!("content: '{}...'", head));
            }
        }
        if let Some(blob) = &self.blob {
            fields.push(format!("blob: {} bytes", blob.len()));
        }
        if !self.meta.is_empty() {
            fields.push(format!("meta: {}", map_literal(&self.meta)));
        }
        if let Some(score) = self.score {
            fields.push(format!("score: {}", float_literal(score)));
        }
        if let Some(embedding) = &self.embedding {
            fields.push(format!("embedding: vector of size {}", embedding.len()));
        }
        if let Some(sparse) = &self.sparse_embedding {
            fields.push(format!(
                "sparse_embedding: vector with {} non-zero elements",
                sparse.indices.len()
            ));
        }
        write!(f, "Document(id={}, {})", self.id, fields.join(", "))
    }
}

/// Builder for [`Document`]; computes the id on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    id: Option<String>,
    content: Option<String>,
    blob: Option<ByteStream>,
    meta: Meta,
    score: Option<f64>,
    embedding: Option<Vec<f64>>,
    sparse_embedding: Option<SparseEmbedding>,
}

impl DocumentBuilder {
    /// Create a builder with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the computed id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn blob(mut self, blob: ByteStream) -> Self {
        self.blob = Some(blob);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Add one metadata entry.
    pub fn meta_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn sparse_embedding(mut self, sparse_embedding: SparseEmbedding) -> Self {
        self.sparse_embedding = Some(sparse_embedding);
        self
    }

    /// Build the document, computing its id unless one was given.
    pub fn build(self) -> Document {
        let mut doc = Document {
            id: String::new(),
            content: self.content,
            blob: self.blob,
            meta: self.meta,
            score: self.score,
            embedding: self.embedding,
            sparse_embedding: self.sparse_embedding,
        };
        doc.id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => doc.compute_id(),
        };
        doc
    }
}

/// Translate legacy document fields into the current field set.
///
/// Drops `content_type` and `id_hash_keys`, which no longer have meaning, and
/// rejects `dataframe` documents and non-string content.
pub fn translate_legacy_fields(mut fields: Meta) -> Result<Meta> {
    match fields.get("content") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => {
            return Err(Error::InvalidDocument(
                "The `content` field must be a string or None.".into(),
            ))
        }
    }

    if fields.contains_key("dataframe") {
        return Err(Error::InvalidDocument(
            "The `dataframe` field is no longer supported.".into(),
        ));
    }

    if fields.contains_key("content_type") || fields.contains_key("id_hash_keys") {
        fields = fields
            .into_iter()
            .filter(|(k, _)| k != "content_type" && k != "id_hash_keys")
            .collect();
    }
    Ok(fields)
}

#[derive(Deserialize)]
struct RawBlob {
    data: Vec<u8>,
    #[serde(default)]
    mime_type: Option<String>,
}
