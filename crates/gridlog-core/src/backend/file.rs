//! File outputs
//!
//! `FileOutput` is the seam through which any file-backed sink plugs into
//! categories and into the appender registry. Sinks that want the node
//! identity in their file name additionally expose `IdentityAware`.

use super::record::Record;
use crate::errors::{GridLogError, Result};
use crate::level::Level;
use gridlog_core_types::NodeId;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Capability of outputs whose configuration depends on the node identity.
pub trait IdentityAware: Send + Sync {
    fn set_identity(&self, id: NodeId);

    fn identity(&self) -> Option<NodeId>;

    /// Re-derive identity-dependent configuration (e.g. the file path) and
    /// reopen. Must complete synchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the re-derived configuration cannot be applied.
    fn activate(&self) -> Result<()>;
}

/// A sink writing formatted records to a file.
pub trait FileOutput: Send + Sync {
    fn name(&self) -> &str;

    /// Current file path.
    fn path(&self) -> String;

    /// Minimum level accepted.
    fn threshold(&self) -> Level {
        Level::Trace
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    fn append(&self, record: &Record) -> Result<()>;

    fn identity_aware(&self) -> Option<&dyn IdentityAware> {
        None
    }
}

/// Insert the node's short identity before the extension:
/// `logs/grid.log` becomes `logs/grid-3f2504e0.log`.
pub fn node_file_name(path: &Path, id: &NodeId) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, id.short(), ext.to_string_lossy()),
        None => format!("{}-{}", stem, id.short()),
    };
    path.with_file_name(name)
}

struct FileState {
    path: PathBuf,
    identity: Option<NodeId>,
    sink: Option<RollingFileAppender>,
}

/// Built-in append-mode file output over a non-rotating `tracing_appender`
/// sink. The sink is built lazily on the first record, or eagerly by
/// `activate`.
pub struct FileAppender {
    name: String,
    base_path: PathBuf,
    threshold: Level,
    node_aware: bool,
    state: Mutex<FileState>,
}

impl FileAppender {
    /// A plain file output; never receives the node identity.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::build(name.into(), path.into(), false)
    }

    /// A file output that embeds the node identity in its file name once set.
    pub fn node_aware(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::build(name.into(), path.into(), true)
    }

    fn build(name: String, base_path: PathBuf, node_aware: bool) -> Self {
        Self {
            name,
            state: Mutex::new(FileState {
                path: base_path.clone(),
                identity: None,
                sink: None,
            }),
            base_path,
            threshold: Level::Trace,
            node_aware,
        }
    }

    pub fn with_threshold(mut self, threshold: Level) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn state(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build a sink appending to exactly `path`. Missing parent directories
    /// are created by the sink.
    fn open(path: &Path) -> Result<RollingFileAppender> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = RollingFileAppender::builder().rotation(Rotation::NEVER);
        if let Some(stem) = path.file_stem() {
            builder = builder.filename_prefix(stem.to_string_lossy());
        }
        if let Some(ext) = path.extension() {
            builder = builder.filename_suffix(ext.to_string_lossy());
        }
        builder.build(dir).map_err(|err| GridLogError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }
}

impl FileOutput for FileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> String {
        self.state().path.display().to_string()
    }

    fn threshold(&self) -> Level {
        self.threshold
    }

    fn append(&self, record: &Record) -> Result<()> {
        let mut state = self.state();
        if state.sink.is_none() {
            state.sink = Some(Self::open(&state.path)?);
        }
        let path = state.path.display().to_string();
        match state.sink.as_mut() {
            Some(sink) => writeln!(sink, "{}", record.format()).map_err(|e| GridLogError::io(path, &e)),
            None => Ok(()),
        }
    }

    fn identity_aware(&self) -> Option<&dyn IdentityAware> {
        if self.node_aware {
            Some(self)
        } else {
            None
        }
    }
}

impl IdentityAware for FileAppender {
    fn set_identity(&self, id: NodeId) {
        self.state().identity = Some(id);
    }

    fn identity(&self) -> Option<NodeId> {
        self.state().identity
    }

    fn activate(&self) -> Result<()> {
        let mut state = self.state();
        let path = match &state.identity {
            Some(id) => node_file_name(&self.base_path, id),
            None => self.base_path.clone(),
        };
        state.sink = None;
        state.path = path;
        state.sink = Some(Self::open(&state.path)?);
        Ok(())
    }
}

impl std::fmt::Debug for FileAppender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAppender")
            .field("name", &self.name)
            .field("path", &self.path())
            .field("node_aware", &self.node_aware)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> NodeId {
        "3f2504e0-4f89-11d3-9a0c-0305e82c3301".parse().unwrap()
    }

    #[test]
    fn test_node_file_name_with_extension() {
        let path = node_file_name(Path::new("logs/grid.log"), &node());
        assert_eq!(path, PathBuf::from("logs/grid-3f2504e0.log"));
    }

    #[test]
    fn test_node_file_name_without_extension() {
        let path = node_file_name(Path::new("grid"), &node());
        assert_eq!(path, PathBuf::from("grid-3f2504e0"));
    }

    #[test]
    fn test_plain_appender_is_not_identity_aware() {
        let app = FileAppender::new("plain", "grid.log");
        assert!(app.identity_aware().is_none());
    }

    #[test]
    fn test_plain_appender_writes_lazily_to_exact_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("logs/plain.log");
        let app = FileAppender::new("plain", &target);
        assert!(!target.exists());

        app.append(&Record::new(Level::Warn, "grid.io", "disk slow")).unwrap();
        app.append(&Record::new(Level::Info, "grid.io", "recovered")).unwrap();

        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("disk slow"));
        assert_eq!(std::fs::read_dir(target.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn test_extensionless_path_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let app = FileAppender::node_aware("node", dir.path().join("gridlog"));
        app.set_identity(node());
        app.activate().unwrap();

        assert!(dir.path().join("gridlog-3f2504e0").exists());
    }

    #[test]
    fn test_activate_renames_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let app = FileAppender::node_aware("node", dir.path().join("nested/grid.log"));

        let aware = app.identity_aware().unwrap();
        aware.set_identity(node());
        aware.activate().unwrap();

        let expected = dir.path().join("nested/grid-3f2504e0.log");
        assert_eq!(app.path(), expected.display().to_string());

        app.append(&Record::new(Level::Info, "root", "joined")).unwrap();
        let written = std::fs::read_to_string(expected).unwrap();
        assert!(written.contains("joined"));
    }

    #[test]
    fn test_activate_fails_under_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();

        let app = FileAppender::node_aware("node", blocker.join("grid.log"));
        app.set_identity(node());
        let err = app.activate().unwrap_err();

        assert_eq!(err.kind(), crate::errors::ErrorKind::Io);
        assert_eq!(app.identity(), Some(node()));
    }
}
