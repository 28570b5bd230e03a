//! 搜索结果输出
//!
//! 匹配行、权限不足行和最终汇总行都通过 [`Reporter`] 输出，
//! 每一行独立成行，不同工作线程之间的顺序不做保证。
//! Unix 上路径按原始字节输出，不是 UTF-8 的文件名也能原样还原。

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::Path;

use log::debug;

/// Sink for the line-oriented output of a search
pub trait Reporter: Send + Sync {
    /// A file whose name contains the search term
    fn found(&self, path: &Path);

    /// A directory that is not readable and traversable
    fn permission_denied(&self, path: &Path);

    /// Called once after every worker has been joined
    fn finished(&self, found: usize);
}

/// Writes one line per event to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl StdoutReporter {
    pub fn new() -> Self {
        Self
    }

    fn line(&self, line: &[u8]) {
        // Locking stdout keeps each line whole when workers race
        write_line(&mut io::stdout().lock(), line);
    }
}

/// Write `line` plus a newline. A closed sink (e.g. `| head`) must not take
/// a worker down, so failures are only logged.
fn write_line(out: &mut impl Write, line: &[u8]) {
    if let Err(err) = out.write_all(line).and_then(|()| out.write_all(b"\n")) {
        debug!("failed to write output line: {err}");
    }
}

impl Reporter for StdoutReporter {
    fn found(&self, path: &Path) {
        self.line(&found_line(path));
    }

    fn permission_denied(&self, path: &Path) {
        self.line(&denied_line(path));
    }

    fn finished(&self, found: usize) {
        self.line(summary_line(found).as_bytes());
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    Cow::Owned(path.display().to_string().into_bytes())
}

/// `<directory>/<filename>`
pub fn found_line(path: &Path) -> Vec<u8> {
    path_bytes(path).into_owned()
}

/// `Directory <path>: Permission denied.`
pub fn denied_line(path: &Path) -> Vec<u8> {
    let mut line = b"Directory ".to_vec();
    line.extend_from_slice(&path_bytes(path));
    line.extend_from_slice(b": Permission denied.");
    line
}

/// `Done searching, found <N> files`
pub fn summary_line(found: usize) -> String {
    format!("Done searching, found {found} files")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_formats() {
        assert_eq!(found_line(Path::new("root/a/cat.txt")), b"root/a/cat.txt");
        assert_eq!(
            denied_line(Path::new("root/b")),
            b"Directory root/b: Permission denied."
        );
        assert_eq!(summary_line(2), "Done searching, found 2 files");
        assert_eq!(summary_line(0), "Done searching, found 0 files");
    }

    #[test]
    fn test_write_line() {
        let mut out = Vec::new();
        write_line(&mut out, b"root/cat");
        write_line(&mut out, summary_line(1).as_bytes());
        assert_eq!(out, b"root/cat\nDone searching, found 1 files\n");
    }

    #[test]
    fn test_write_line_closed_sink() {
        struct ClosedPipe;
        impl Write for ClosedPipe {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        // 写失败只记录日志，不会 panic
        write_line(&mut ClosedPipe, b"root/cat");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_kept_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"root/\xffcat"));
        assert_eq!(found_line(path), b"root/\xffcat");
        assert_eq!(
            denied_line(path),
            b"Directory root/\xffcat: Permission denied."
        );
    }
}
