//! Configuration sources.
//!
//! A [`Source`] yields raw key/value blobs; the loader decodes each one by
//! its [`Format`] and deep-merges the results in source order.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use crate::format::Format;
use crate::ConfigError;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One encoded configuration blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    /// File name or KV key.
    pub key: String,
    /// Raw bytes.
    pub value: Vec<u8>,
    /// Encoding of `value`.
    pub format: Format,
}

impl KeyValue {
    /// Creates a key/value with an explicit format.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>, format: Format) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            format,
        }
    }
}

/// A provider of configuration key/values.
pub trait Source: Send + Sync {
    /// Human-readable source name for logs.
    fn name(&self) -> String;

    /// Loads every key/value this source currently holds.
    fn load(&self) -> BoxFuture<'_, Result<Vec<KeyValue>, ConfigError>>;
}

/// Local file source.
///
/// The path may be a single file or a directory. In a directory, every
/// non-hidden file with a supported extension is loaded in file-name order;
/// subdirectories and other files are skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Creates a file source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_sync(&self) -> Result<Vec<KeyValue>, ConfigError> {
        let metadata =
            fs::metadata(&self.path).map_err(|_| ConfigError::file_not_found(&self.path))?;

        if metadata.is_file() {
            let format = Format::from_path(&self.path)
                .ok_or_else(|| ConfigError::unsupported_format(self.path.display().to_string()))?;
            return Ok(vec![read_file(&self.path, format)?]);
        }

        let entries =
            fs::read_dir(&self.path).map_err(|e| ConfigError::read_error(&self.path, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::read_error(&self.path, e))?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || !path.is_file() {
                continue;
            }
            match Format::from_path(&path) {
                Some(format) => files.push((path, format)),
                None => tracing::debug!(path = %path.display(), "skipping unsupported config file"),
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        files
            .into_iter()
            .map(|(path, format)| read_file(&path, format))
            .collect()
    }
}

fn read_file(path: &Path, format: Format) -> Result<KeyValue, ConfigError> {
    let value = fs::read(path).map_err(|e| ConfigError::read_error(path, e))?;
    let key = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(KeyValue::new(key, value, format))
}

impl Source for FileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> BoxFuture<'_, Result<Vec<KeyValue>, ConfigError>> {
        Box::pin(async move { self.load_sync() })
    }
}

/// In-memory source holding a single document.
#[derive(Debug, Clone)]
pub struct MemorySource {
    kv: KeyValue,
}

impl MemorySource {
    /// Creates a source from document text.
    pub fn new(name: impl Into<String>, content: impl Into<String>, format: Format) -> Self {
        Self {
            kv: KeyValue::new(name, content.into().into_bytes(), format),
        }
    }
}

impl Source for MemorySource {
    fn name(&self) -> String {
        format!("memory:{}", self.kv.key)
    }

    fn load(&self) -> BoxFuture<'_, Result<Vec<KeyValue>, ConfigError>> {
        let kv = self.kv.clone();
        Box::pin(async move { Ok(vec![kv]) })
    }
}
