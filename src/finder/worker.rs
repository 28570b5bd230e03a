//! 搜索工作线程
//!
//! 每个工作线程都是一个显式的状态机：
//! `Registering → AwaitingBarrier → WaitingForWork ⇄ Searching → {Done | Errored}`。
//! 出错时线程从 `run` 正常返回，而不是靠线程退出来改变控制流。

use std::path::Path;

use log::{debug, error};

use super::coordinator::{Coordinator, Dequeued};
use super::filter::FileFilter;
use super::fs::FileSystem;
use super::latch::CountDownLatch;
use super::queue::PathTask;
use super::report::Reporter;
use crate::errors::{FindError, FindResult};

/// Everything a worker borrows from the controller
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub coordinator: &'a Coordinator,
    pub fs: &'a dyn FileSystem,
    pub filter: &'a dyn FileFilter,
    pub reporter: &'a dyn Reporter,
    /// Counted down once per registered worker
    pub registered: &'a CountDownLatch,
    /// Opened by the controller once every worker has registered
    pub start: &'a CountDownLatch,
}

/// 工作线程的状态
#[derive(Debug)]
enum WorkerState {
    Registering,
    AwaitingBarrier,
    WaitingForWork,
    Searching(PathTask),
    Done,
    Errored(FindError),
}

/// How a worker left its loop
#[derive(Debug)]
pub enum WorkerExit {
    /// Termination was detected in `dequeue`
    Done,
    /// A local resource error ended this worker only
    Errored(FindError),
}

impl WorkerExit {
    pub fn is_done(&self) -> bool {
        matches!(self, WorkerExit::Done)
    }
}

/// Deregisters a worker that unwinds, so the rest of the pool can still
/// reach termination.
struct ExitGuard<'a> {
    coordinator: &'a Coordinator,
    armed: bool,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.fail();
        }
    }
}

pub struct Worker<'a> {
    index: usize,
    ctx: SearchContext<'a>,
}

impl<'a> Worker<'a> {
    pub fn new(index: usize, ctx: SearchContext<'a>) -> Self {
        Self { index, ctx }
    }

    /// Drive the worker until it terminates
    pub fn run(self) -> WorkerExit {
        let mut guard = ExitGuard {
            coordinator: self.ctx.coordinator,
            armed: false,
        };
        let mut state = WorkerState::Registering;

        loop {
            state = match state {
                WorkerState::Registering => {
                    self.ctx.coordinator.register();
                    guard.armed = true;
                    self.ctx.registered.count_down();
                    WorkerState::AwaitingBarrier
                }
                WorkerState::AwaitingBarrier => {
                    self.ctx.start.wait();
                    debug!("worker {} released", self.index);
                    WorkerState::WaitingForWork
                }
                WorkerState::WaitingForWork => match self.ctx.coordinator.dequeue() {
                    Dequeued::Task(task) => WorkerState::Searching(task),
                    Dequeued::Terminate => WorkerState::Done,
                },
                WorkerState::Searching(task) => match self.search(&task) {
                    Ok(()) => WorkerState::WaitingForWork,
                    Err(err) => WorkerState::Errored(err),
                },
                WorkerState::Done => {
                    // dequeue already deregistered us
                    guard.armed = false;
                    debug!("worker {} done", self.index);
                    return WorkerExit::Done;
                }
                WorkerState::Errored(err) => {
                    error!("{err}");
                    guard.armed = false;
                    self.ctx.coordinator.fail();
                    return WorkerExit::Errored(err);
                }
            };
        }
    }

    /// List one directory, enqueueing subdirectories and reporting matches
    fn search(&self, task: &PathTask) -> FindResult<()> {
        let dir = task.path();
        debug!("worker {} searching {}", self.index, dir.display());

        let entries = self.ctx.fs.read_dir(dir)?;
        self.ctx.coordinator.record_listing();

        for item in entries {
            let item = item?;
            if item.name == "." || item.name == ".." {
                continue;
            }

            let path = dir.join(&item.name);
            if item.kind.is_dir() {
                self.visit_dir(&path)?;
            } else if self.ctx.filter.matches(&item.name) {
                self.ctx.reporter.found(&path);
                self.ctx.coordinator.record_match();
            }
        }
        Ok(())
    }

    fn visit_dir(&self, path: &Path) -> FindResult<()> {
        if self.ctx.fs.is_searchable(path) {
            self.ctx.coordinator.enqueue(PathTask::new(path))
        } else {
            debug!("skipping unsearchable directory {}", path.display());
            self.ctx.reporter.permission_denied(path);
            self.ctx.coordinator.record_denied();
            Ok(())
        }
    }
}
