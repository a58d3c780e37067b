//! Registry of active file outputs
//!
//! Whoever owns the lifecycle of file outputs registers them here so that
//! the node identity, once known, reaches every one of them.

use crate::backend::{read, same_output, write, FileOutput};
use crate::errors::{GridLogError, PropagationFailure, Result};
use crate::log_op_error;
use crate::schema::OP_PROPAGATE_IDENTITY;
use gridlog_core_types::NodeId;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Set of file outputs keyed by pointer identity.
#[derive(Default)]
pub struct AppenderRegistry {
    outputs: RwLock<Vec<Arc<dyn FileOutput>>>,
}

impl AppenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file output. Adding the same handle twice keeps one entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the handle reports no file path.
    pub fn add(&self, handle: Arc<dyn FileOutput>) -> Result<()> {
        if handle.path().trim().is_empty() {
            return Err(GridLogError::invalid_argument(
                "handle",
                format!("file output '{}' has no path", handle.name()),
            ));
        }
        let mut outputs = write(&self.outputs);
        if !outputs.iter().any(|o| same_output(o, &handle)) {
            outputs.push(handle);
        }
        Ok(())
    }

    /// Unregister a file output; absent handles are ignored.
    pub fn remove(&self, handle: &Arc<dyn FileOutput>) -> bool {
        let mut outputs = write(&self.outputs);
        let before = outputs.len();
        outputs.retain(|o| !same_output(o, handle));
        outputs.len() != before
    }

    pub fn contains(&self, handle: &Arc<dyn FileOutput>) -> bool {
        read(&self.outputs).iter().any(|o| same_output(o, handle))
    }

    /// Snapshot of the current file paths, one per registered output.
    pub fn list_paths(&self) -> Vec<String> {
        read(&self.outputs).iter().map(|o| o.path()).collect()
    }

    /// Path of the first registered output.
    pub fn first_path(&self) -> Option<String> {
        read(&self.outputs).first().map(|o| o.path())
    }

    pub fn len(&self) -> usize {
        read(&self.outputs).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.outputs).is_empty()
    }

    /// Snapshot of the registered handles.
    pub fn outputs(&self) -> Vec<Arc<dyn FileOutput>> {
        read(&self.outputs).clone()
    }

    /// Hand `id` to every identity-aware output and re-activate it.
    ///
    /// Every output is attempted even when some fail. Activation runs on a
    /// snapshot, outside the registry lock.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for the nil identity
    /// - `PartialPropagation` naming each output whose activation failed
    pub fn propagate_identity(&self, id: NodeId) -> Result<()> {
        let started = Instant::now();
        if id.is_nil() {
            let err = GridLogError::invalid_argument("id", "node identity must not be nil");
            log_op_error!(OP_PROPAGATE_IDENTITY, err, duration_ms = 0u64);
            return Err(err);
        }

        let outputs = self.outputs();
        let mut failed = Vec::new();
        for output in &outputs {
            let Some(aware) = output.identity_aware() else {
                continue;
            };
            aware.set_identity(id);
            if let Err(err) = aware.activate() {
                failed.push(PropagationFailure {
                    output: output.name().to_string(),
                    reason: err.to_string(),
                });
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        if failed.is_empty() {
            crate::log_op_end!(
                OP_PROPAGATE_IDENTITY,
                duration_ms = duration_ms,
                node_id = %id,
                output_count = outputs.len()
            );
            Ok(())
        } else {
            let err = GridLogError::PartialPropagation { failed };
            log_op_error!(
                OP_PROPAGATE_IDENTITY,
                err,
                duration_ms = duration_ms,
                node_id = %id,
                failed_count = err.failed_outputs().len()
            );
            Err(err)
        }
    }
}

impl std::fmt::Debug for AppenderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppenderRegistry")
            .field("paths", &self.list_paths())
            .finish()
    }
}
