//! Cache events and the reporters that receive them.
//!
//! Every outcome the cache layer swallows (a missing file, a corrupt payload,
//! a failed write) is still surfaced here as a `CacheEvent`, so callers and
//! tests can observe what happened without parsing log output.

use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Something the cache layer did or failed to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The cache file could not be opened or read
    OpenFailed { path: PathBuf, reason: String },
    /// The cache file was read but its contents did not decode
    DecodeFailed { path: PathBuf, reason: String },
    /// The cache file hash differs from the expected one
    HashMismatch {
        path: PathBuf,
        expected: Option<String>,
        actual: String,
    },
    /// The hash matched but the loaded value was refused, so it is recomputed
    Rejected { path: PathBuf, hash: String },
    /// A cached value was loaded and its hash matched
    Loaded { path: PathBuf, hash: String },
    /// A freshly computed value was written
    Saved { path: PathBuf, hash: String },
    /// A freshly computed value could not be written
    WriteFailed { path: PathBuf, reason: String },
}

/// Discriminant of a `CacheEvent`, handy for assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OpenFailed,
    DecodeFailed,
    HashMismatch,
    Rejected,
    Loaded,
    Saved,
    WriteFailed,
}

impl CacheEvent {
    /// Get the kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            CacheEvent::OpenFailed { .. } => EventKind::OpenFailed,
            CacheEvent::DecodeFailed { .. } => EventKind::DecodeFailed,
            CacheEvent::HashMismatch { .. } => EventKind::HashMismatch,
            CacheEvent::Rejected { .. } => EventKind::Rejected,
            CacheEvent::Loaded { .. } => EventKind::Loaded,
            CacheEvent::Saved { .. } => EventKind::Saved,
            CacheEvent::WriteFailed { .. } => EventKind::WriteFailed,
        }
    }

    /// Path of the cache file the event concerns
    pub fn path(&self) -> &PathBuf {
        match self {
            CacheEvent::OpenFailed { path, .. }
            | CacheEvent::DecodeFailed { path, .. }
            | CacheEvent::HashMismatch { path, .. }
            | CacheEvent::Rejected { path, .. }
            | CacheEvent::Loaded { path, .. }
            | CacheEvent::Saved { path, .. }
            | CacheEvent::WriteFailed { path, .. } => path,
        }
    }

    /// Whether the event describes a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::OpenFailed | EventKind::DecodeFailed | EventKind::WriteFailed
        )
    }
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheEvent::OpenFailed { path, reason } => {
                write!(f, "Could not open file {}: {}", path.display(), reason)
            },
            CacheEvent::DecodeFailed { path, reason } => {
                write!(f, "Could not decode cache {}: {}", path.display(), reason)
            },
            CacheEvent::HashMismatch {
                expected, actual, ..
            } => write!(
                f,
                "Hashes did not match (expected {}, got {}). Computing result and storing to file.",
                expected.as_deref().unwrap_or("<none>"),
                if actual.is_empty() { "<none>" } else { actual.as_str() }
            ),
            CacheEvent::Rejected { hash, .. } => write!(
                f,
                "Cached value is empty (hash = {}). Computing result and storing to file.",
                hash
            ),
            CacheEvent::Loaded { hash, .. } => {
                write!(f, "Loaded matching data from file (hash = {})", hash)
            },
            CacheEvent::Saved { path, hash } => {
                write!(f, "Saved result to file: {} [{}]", path.display(), hash)
            },
            CacheEvent::WriteFailed { path, reason } => {
                write!(f, "Could not write cache {}: {}", path.display(), reason)
            },
        }
    }
}

/// Receives cache events
pub trait Reporter: Send + Sync {
    /// Report a single event
    fn report(&self, event: &CacheEvent);
}

/// Reporter that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &CacheEvent) {
        let path = event.path().display();
        if event.is_failure() {
            warn!(kind = ?event.kind(), path = %path, "{}", event);
        } else {
            info!(kind = ?event.kind(), path = %path, "{}", event);
        }
    }
}

/// Reporter that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &CacheEvent) {}
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<CacheEvent>>,
}

impl RecordingReporter {
    /// Create an empty recording reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events reported so far
    pub fn events(&self) -> Vec<CacheEvent> {
        self.events.lock().clone()
    }

    /// Kinds of all events reported so far, in order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(CacheEvent::kind).collect()
    }

    /// Number of events of the given kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }

    /// Forget all recorded events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &CacheEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(hash: &str) -> CacheEvent {
        CacheEvent::Saved {
            path: PathBuf::from("cache.json"),
            hash: hash.to_string(),
        }
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let reporter = RecordingReporter::new();
        reporter.report(&CacheEvent::OpenFailed {
            path: PathBuf::from("cache.json"),
            reason: "missing".to_string(),
        });
        reporter.report(&saved("abc"));

        assert_eq!(reporter.kinds(), vec![EventKind::OpenFailed, EventKind::Saved]);
        assert_eq!(reporter.count(EventKind::Saved), 1);
        assert_eq!(reporter.events()[1], saved("abc"));

        reporter.clear();
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_failure_classification() {
        assert!(!saved("abc").is_failure());
        let failed = CacheEvent::WriteFailed {
            path: PathBuf::from("/no_rights"),
            reason: "denied".to_string(),
        };
        assert!(failed.is_failure());
        assert_eq!(failed.path(), &PathBuf::from("/no_rights"));
    }

    #[test]
    fn test_mismatch_display_shows_both_hashes() {
        let event = CacheEvent::HashMismatch {
            path: PathBuf::from("cache.json"),
            expected: Some("0".to_string()),
            actual: String::new(),
        };
        let text = event.to_string();
        assert!(text.contains("expected 0"));
        assert!(text.contains("got <none>"));
    }

    #[test]
    fn test_rejected_is_a_miss_not_a_failure() {
        let event = CacheEvent::Rejected {
            path: PathBuf::from("cache.json"),
            hash: "d751713988987e9331980363e24189ce".to_string(),
        };
        assert_eq!(event.kind(), EventKind::Rejected);
        assert!(!event.is_failure());
        assert!(event.to_string().contains("Computing result"));
    }

    #[test]
    fn test_tracing_and_null_reporters_accept_events() {
        TracingReporter.report(&saved("abc"));
        NullReporter.report(&saved("abc"));
    }
}
