//! 并行文件查找模块
//!
//! 固定数量的工作线程共同消费一个目录队列：列出目录、把子目录放回队列、
//! 报告文件名匹配，直到队列耗尽且每个工作线程都观察到了终止条件。

mod coordinator;
mod latch;
mod queue;
mod worker;
pub mod filter;
pub mod fs;
pub mod options;
pub mod report;

#[cfg(test)]
mod testing;

use std::path::Path;
use std::thread;

use log::{debug, error, info};

use crate::errors::{FindError, FindResult};

pub use self::coordinator::{Coordinator, CoordinatorSnapshot, Dequeued};
pub use self::filter::{FileFilter, SubstringFilter};
pub use self::fs::{FileSystem, OsFileSystem};
pub use self::latch::CountDownLatch;
pub use self::options::FindOptions;
pub use self::queue::{PathTask, WorkQueue};
pub use self::report::{Reporter, StdoutReporter};
pub use self::worker::{SearchContext, Worker, WorkerExit};

/// 一次搜索的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// 匹配的文件数
    pub found: usize,
    /// 成功打开的目录数
    pub dirs_searched: usize,
    /// 因权限不足被跳过的目录数
    pub denied: usize,
    /// 因错误退出的工作线程数
    pub errors: usize,
    /// 使用的工作线程数
    pub threads: usize,
    failed: bool,
}

impl SearchOutcome {
    /// 是否有任何工作线程遇到了错误（粘滞错误标志）
    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn is_success(&self) -> bool {
        !self.failed()
    }
}

/// 并行文件查找器
///
/// 控制器：播种队列、启动工作线程、等待全部登记后打开启动屏障，
/// 最后汇总匹配数和错误标志。
pub struct Finder {
    options: FindOptions,
    filter: Box<dyn FileFilter>,
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("options", &self.options)
            .field("filter", &self.filter.description())
            .finish()
    }
}

impl Finder {
    /// 创建查找器，`term` 作为字面子串与文件名匹配
    pub fn new(options: FindOptions, term: &str) -> FindResult<Self> {
        if options.threads == 0 {
            return Err(FindError::InvalidThreadCount(options.threads));
        }
        let filter = if options.ignore_case {
            SubstringFilter::new_ignore_case(term)?
        } else {
            SubstringFilter::new(term)?
        };
        Ok(Self {
            options,
            filter: Box::new(filter),
        })
    }

    /// 替换文件名过滤器
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: FileFilter + 'static,
    {
        self.filter = Box::new(filter);
        self
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// 在 `root` 下搜索
    ///
    /// 根目录不可搜索时输出权限不足行并返回错误，不会启动任何工作线程。
    /// 工作线程的局部错误不会中断搜索，而是体现在 [`SearchOutcome::failed`] 中。
    pub fn find(
        &self,
        root: impl AsRef<Path>,
        fs: &dyn FileSystem,
        reporter: &dyn Reporter,
    ) -> FindResult<SearchOutcome> {
        let root = root.as_ref();
        let threads = self.options.threads;
        info!(
            "Starting search in {} with {} threads ({})",
            root.display(),
            threads,
            self.filter.description()
        );

        fs.status(root).map_err(|source| FindError::RootNotFound {
            path: root.to_path_buf(),
            source,
        })?;
        if !fs.is_searchable(root) {
            reporter.permission_denied(root);
            return Err(FindError::RootNotSearchable(root.to_path_buf()));
        }

        let coordinator = Coordinator::new();
        coordinator.enqueue(PathTask::new(root))?;

        let registered = CountDownLatch::new(threads);
        let start = CountDownLatch::new(1);
        let ctx = SearchContext {
            coordinator: &coordinator,
            fs,
            filter: self.filter.as_ref(),
            reporter,
            registered: &registered,
            start: &start,
        };

        let spawn_error = thread::scope(|s| {
            let mut handles = Vec::new();
            if handles.try_reserve_exact(threads).is_err() {
                let err = FindError::ThreadAlloc { threads };
                error!("{err}");
                return Some(err);
            }
            let mut spawn_error = None;

            for index in 0..threads {
                let worker = Worker::new(index, ctx);
                let spawned = thread::Builder::new()
                    .name(format!("pfind-worker-{index}"))
                    .spawn_scoped(s, move || worker.run());
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        error!("ERROR in: spawn worker {index}: {source}");
                        spawn_error = Some(FindError::Spawn { index, source });
                        break;
                    }
                }
            }

            // Slots that never got a thread must not hold the barrier shut
            for _ in handles.len()..threads {
                registered.count_down();
            }
            registered.wait();
            debug!("{} workers registered, releasing", handles.len());
            start.count_down();

            for (index, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(WorkerExit::Done) => {}
                    Ok(WorkerExit::Errored(err)) if err.is_worker_local() => {
                        debug!("worker {index} exited: {err}")
                    }
                    Ok(WorkerExit::Errored(err)) => {
                        error!("worker {index} exited with unexpected error: {err}")
                    }
                    Err(_) => error!("{}", FindError::WorkerPanicked(index)),
                }
            }
            spawn_error
        });

        let snapshot = coordinator.snapshot();
        debug!("search finished: {:?}", snapshot);

        if let Some(err) = spawn_error {
            return Err(err);
        }

        // Every exit path deregisters; only a failed run may leave tasks behind
        debug_assert_eq!(snapshot.active, 0);
        debug_assert_eq!(snapshot.waiting, 0);
        debug_assert!(snapshot.failed || snapshot.queued == 0);

        reporter.finished(snapshot.found);
        let outcome = SearchOutcome {
            found: snapshot.found,
            dirs_searched: snapshot.dirs_searched,
            denied: snapshot.denied,
            errors: snapshot.errors,
            threads,
            failed: snapshot.failed,
        };
        info!(
            "Searched {} directories, found {} files",
            outcome.dirs_searched, outcome.found
        );
        Ok(outcome)
    }
}
