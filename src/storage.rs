// 💾 Persistence - the registry as one flat JSON document
//
// Full overwrite on every flush, no append or merge. Loading is fail-soft:
// an absent or corrupt file yields an empty document so a session can always
// start.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::registry::Registry;

/// `{"Kind.id": {...dict form...}, ...}`
pub type Document = Map<String, Value>;

/// Where the registry is loaded from and flushed to
pub trait Persistence {
    /// Read the persisted document; empty when there is nothing usable
    fn load(&self) -> Result<Document>;

    /// Write the whole registry, replacing what was there
    fn flush(&mut self, registry: &Registry) -> Result<()>;
}

// ============================================================================
// JSON FILE
// ============================================================================

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub const DEFAULT_PATH: &'static str = "file.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl Persistence for JsonFileStorage {
    fn load(&self) -> Result<Document> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file yet, starting empty");
                return Ok(Document::new());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %e, "backing file is not UTF-8, starting empty");
                return Ok(Document::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read backing file: {}", self.path.display()))
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(document)) => {
                info!(path = %self.path.display(), entries = document.len(), "loaded backing file");
                Ok(document)
            }
            Ok(_) => {
                warn!(path = %self.path.display(), "backing file is not a JSON object, starting empty");
                Ok(Document::new())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "backing file is malformed, starting empty");
                Ok(Document::new())
            }
        }
    }

    /// Written to a temporary file next to the target, then renamed over it,
    /// so a reader never sees half a document.
    fn flush(&mut self, registry: &Registry) -> Result<()> {
        let document = registry.to_document();

        let mut tmp = NamedTempFile::new_in(self.directory())
            .with_context(|| format!("Failed to write backing file: {}", self.path.display()))?;
        serde_json::to_writer(&mut tmp, &document)
            .with_context(|| format!("Failed to serialize registry to {}", self.path.display()))?;
        tmp.flush()
            .with_context(|| format!("Failed to write backing file: {}", self.path.display()))?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace backing file: {}", self.path.display()))?;

        debug!(path = %self.path.display(), entries = document.len(), "flushed registry");
        Ok(())
    }
}

// ============================================================================
// IN MEMORY
// ============================================================================

/// Keeps the last flushed document in process; counts flushes
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Document,
    flushes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, as if it had been read from disk
    pub fn with_document(document: Document) -> Self {
        MemoryStorage {
            document,
            flushes: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Persistence for MemoryStorage {
    fn load(&self) -> Result<Document> {
        Ok(self.document.clone())
    }

    fn flush(&mut self, registry: &Registry) -> Result<()> {
        self.document = registry.to_document();
        self.flushes += 1;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
