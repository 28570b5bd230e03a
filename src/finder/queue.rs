//! Pending-directory FIFO
//!
//! The queue itself is plain data. It is only ever touched while the
//! coordinator's lock is held, so it carries no synchronization of its own.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::errors::{FindError, FindResult};

/// One directory waiting to be listed
///
/// Owned by exactly one party at a time: the queue, or the worker that
/// dequeued it. Not `Clone`, so a task cannot be duplicated.
#[derive(Debug, PartialEq, Eq)]
pub struct PathTask {
    path: PathBuf,
}

impl PathTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// FIFO of [`PathTask`]s: append at the tail, remove from the head
#[derive(Debug, Default)]
pub struct WorkQueue {
    tasks: VecDeque<PathTask>,
}

impl WorkQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the tail.
    ///
    /// Growth is fallible: if the backing buffer cannot be enlarged the task
    /// is handed back inside [`FindError::OutOfMemory`] instead of aborting.
    pub fn push(&mut self, task: PathTask) -> FindResult<()> {
        if self.tasks.try_reserve(1).is_err() {
            return Err(FindError::OutOfMemory {
                path: task.into_path(),
            });
        }
        self.tasks.push_back(task);
        Ok(())
    }

    /// Remove the head task, if any
    pub fn pop(&mut self) -> Option<PathTask> {
        self.tasks.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
