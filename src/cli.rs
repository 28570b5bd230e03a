//! pfind 的命令行接口
//!
//! 本模块提供了命令行参数解析和验证功能。

use std::path::PathBuf;

use clap::Parser;

use crate::errors::FindError;
use crate::finder::options::FindOptions;

/// 多线程在目录树中按文件名查找文件
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 搜索的根目录
    pub root: PathBuf,

    /// 文件名中要包含的字符串（字面匹配，不是通配符）
    pub term: String,

    /// 工作线程数（默认：CPU 核心数）
    pub threads: Option<usize>,

    /// 不区分大小写
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// 启用调试日志
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// 构建查找选项
    pub fn build_options(&self) -> FindOptions {
        FindOptions::from_cli(self)
    }

    /// 验证命令行参数
    pub fn validate(&self) -> Result<(), FindError> {
        if let Some(threads) = self.threads {
            if threads == 0 {
                return Err(FindError::InvalidThreadCount(threads));
            }
        }

        if self.term.is_empty() {
            return Err(FindError::EmptySearchTerm);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from(["pfind", "/tmp", "cat", "4"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("/tmp"));
        assert_eq!(cli.term, "cat");
        assert_eq!(cli.threads, Some(4));
        assert!(!cli.ignore_case);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_threads_optional() {
        let cli = Cli::try_parse_from(["pfind", "-i", ".", "Cat"]).unwrap();
        assert_eq!(cli.threads, None);
        assert!(cli.ignore_case);
        assert_eq!(cli.build_options().threads, num_cpus::get());
    }

    #[test]
    fn test_cli_zero_threads() {
        let cli = Cli::try_parse_from(["pfind", ".", "cat", "0"]).unwrap();
        assert!(matches!(cli.validate(), Err(FindError::InvalidThreadCount(0))));
    }

    #[test]
    fn test_cli_empty_term() {
        let cli = Cli::try_parse_from(["pfind", ".", ""]).unwrap();
        assert!(matches!(cli.validate(), Err(FindError::EmptySearchTerm)));
    }

    #[test]
    fn test_cli_rejects_bad_shapes() {
        assert!(Cli::try_parse_from(["pfind", "."]).is_err());
        assert!(Cli::try_parse_from(["pfind", ".", "cat", "many"]).is_err());
        assert!(Cli::try_parse_from(["pfind", ".", "cat", "2", "extra"]).is_err());
    }
}
