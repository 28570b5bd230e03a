//! 并行目录树文件名查找库
//!
//! 本库提供了多线程的文件名查找功能：
//! - 固定数量的工作线程共享一个目录队列
//! - 无中心协调者的终止检测
//! - 文件名字面子串匹配
//! - 权限不足的目录会被报告并跳过
//!
//! # 示例
//!
//! 基本用法：
//! ```no_run
//! use pfind::finder::{Finder, FindOptions, OsFileSystem, StdoutReporter};
//!
//! let options = FindOptions::new().with_threads(4);
//! let finder = Finder::new(options, "cat").unwrap();
//!
//! // 匹配行和汇总行直接写到标准输出
//! let outcome = finder.find("/tmp", &OsFileSystem, &StdoutReporter::new()).unwrap();
//! if outcome.failed() {
//!     eprintln!("部分目录搜索失败");
//! }
//! ```
//!
//! 更多用法请参考各模块文档。

pub mod cli;
pub mod errors;
pub mod finder;

// Re-export main types for convenience
pub use errors::{FindError, FindResult};
pub use finder::{Finder, SearchOutcome};
