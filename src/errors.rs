use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for operations that can produce FindError
pub type FindResult<T> = Result<T, FindError>;

/// pfind 的错误类型
#[derive(Debug, Error)]
pub enum FindError {
    /// 线程数必须为正整数
    #[error("invalid thread count {0}: must be a positive integer")]
    InvalidThreadCount(usize),

    /// 搜索词为空
    #[error("search term must not be empty")]
    EmptySearchTerm,

    /// 根目录状态查询失败
    #[error("ERROR in: lstat() {}: {source}", .path.display())]
    RootNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 根目录不可搜索
    #[error("Directory {}: Permission denied.", .0.display())]
    RootNotSearchable(PathBuf),

    /// 队列扩容失败
    #[error("ERROR in: enqueue() {}: out of memory", .path.display())]
    OutOfMemory { path: PathBuf },

    /// 无法打开目录
    #[error("ERROR in: opendir() {}: {source}", .path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 读取目录条目失败
    #[error("ERROR in: readdir() {}: {source}", .path.display())]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 条目状态查询失败
    #[error("ERROR in: lstat() {}: {source}", .path.display())]
    Status {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 无法为工作线程句柄分配内存
    #[error("ERROR in: allocating handles for {threads} workers: out of memory")]
    ThreadAlloc { threads: usize },

    /// 工作线程创建失败
    #[error("ERROR in: spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// 工作线程崩溃
    #[error("ERROR in: worker {0} panicked")]
    WorkerPanicked(usize),
}

impl FindError {
    /// Whether the error is fatal only for the worker that hit it.
    ///
    /// Such errors set the sticky error flag but leave the rest of the pool
    /// running; every other variant stops a run before workers are launched.
    pub fn is_worker_local(&self) -> bool {
        matches!(
            self,
            FindError::OutOfMemory { .. }
                | FindError::OpenDir { .. }
                | FindError::ReadEntry { .. }
                | FindError::Status { .. }
                | FindError::WorkerPanicked(_)
        )
    }
}
