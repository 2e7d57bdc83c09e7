//! Cache file store
//!
//! Loads and saves a single serialized value per file. The `try_*` methods
//! return errors; `load` and `save` report them and degrade to `None` /
//! `false`, which is what the memoization wrapper relies on.

use crate::codec::{Codec, JsonCodec};
use memo_core::error::{MemoError, MemoResult};
use memo_core::report::{CacheEvent, Reporter, TracingReporter};
use memo_core::types::WriteMode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Reads and writes serialized values at caller-chosen paths
#[derive(Clone)]
pub struct CacheStore<C = JsonCodec> {
    codec: C,
    write_mode: WriteMode,
    reporter: Arc<dyn Reporter>,
}

impl CacheStore<JsonCodec> {
    /// Create a JSON store that reports through `tracing`
    pub fn new() -> Self {
        Self::with_codec(JsonCodec::new())
    }
}

impl Default for CacheStore<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> CacheStore<C> {
    /// Create a store with the given codec
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            write_mode: WriteMode::default(),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub(crate) fn reporter_handle(&self) -> Arc<dyn Reporter> {
        Arc::clone(&self.reporter)
    }

    /// Read and decode the value stored at `path`
    pub fn try_load<T: DeserializeOwned>(&self, path: &Path) -> MemoResult<T> {
        let bytes = fs::read(path)
            .map_err(|e| MemoError::io(format!("Failed to open {}", path.display()), e))?;
        debug!(path = %path.display(), bytes = bytes.len(), codec = self.codec.name(), "decoding cache file");
        self.codec.decode(&bytes)
    }

    /// Read and decode the value stored at `path`, reporting any failure
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        match self.try_load(path) {
            Ok(value) => Some(value),
            Err(e @ MemoError::Io { .. }) => {
                self.reporter.report(&CacheEvent::OpenFailed {
                    path: path.to_path_buf(),
                    reason: describe(&e),
                });
                None
            },
            Err(e) => {
                self.reporter.report(&CacheEvent::DecodeFailed {
                    path: path.to_path_buf(),
                    reason: describe(&e),
                });
                None
            },
        }
    }

    /// Encode `value` and write it to `path`, replacing any previous content
    pub fn try_save<T: Serialize>(&self, value: &T, path: &Path) -> MemoResult<()> {
        let bytes = self.codec.encode(value)?;
        let written = match self.write_mode {
            WriteMode::Atomic => write_atomic(path, &bytes),
            WriteMode::Direct => fs::write(path, &bytes)
                .map_err(|e| MemoError::io(format!("Failed to write {}", path.display()), e)),
        };
        written?;
        debug!(path = %path.display(), bytes = bytes.len(), mode = %self.write_mode, "wrote cache file");
        Ok(())
    }

    /// Encode `value` and write it to `path`, reporting any failure
    pub fn save<T: Serialize>(&self, value: &T, path: &Path) -> bool {
        match self.try_save(value, path) {
            Ok(()) => true,
            Err(e) => {
                self.reporter.report(&CacheEvent::WriteFailed {
                    path: path.to_path_buf(),
                    reason: describe(&e),
                });
                false
            },
        }
    }
}

/// Error text for a reported event, with a fix hint when there is one
fn describe(err: &MemoError) -> String {
    match err.suggestion() {
        Some(hint) => format!("{} ({})", err, hint),
        None => err.to_string(),
    }
}

/// Create the temp file that will replace `path`
///
/// The file ends up with the mode a plain write would give it: the existing
/// file's permissions when `path` exists, otherwise 0o666 minus the umask.
fn temp_file_for(dir: &Path, path: &Path) -> MemoResult<NamedTempFile> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let tmp = builder.tempfile_in(dir).map_err(|e| {
        MemoError::io(format!("Failed to create temp file in {}", dir.display()), e)
    })?;

    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| MemoError::io(format!("Failed to set permissions on {}", tmp.path().display()), e))?;
    }
    Ok(tmp)
}

/// Write to a temp file next to `path`, then rename it into place
fn write_atomic(path: &Path, bytes: &[u8]) -> MemoResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = temp_file_for(dir, path)?;
    tmp.write_all(bytes)
        .map_err(|e| MemoError::io(format!("Failed to write {}", tmp.path().display()), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| MemoError::io(format!("Failed to sync {}", tmp.path().display()), e))?;

    tmp.persist(path)
        .map_err(|e| MemoError::io(format!("Failed to rename into {}", path.display()), e.error))?;
    Ok(())
}
