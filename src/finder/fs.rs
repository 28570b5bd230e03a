//! Directory enumeration and permission checks
//!
//! The search engine never touches `std::fs` directly. It goes through the
//! [`FileSystem`] trait so that listings can be instrumented or faked.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

use crate::errors::{FindError, FindResult};

/// Kind of a directory entry, as reported without following links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One entry produced by [`FileSystem::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirItem {
    pub name: OsString,
    pub kind: EntryKind,
}

impl DirItem {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Lazy, single-pass listing of one directory
pub type DirItems<'a> = Box<dyn Iterator<Item = FindResult<DirItem>> + 'a>;

/// Filesystem capability used by the search
pub trait FileSystem: Send + Sync {
    /// Kind of `path` itself, without following a final symlink
    fn status(&self, path: &Path) -> io::Result<EntryKind>;

    /// Open `path` and list its entries lazily.
    ///
    /// Failing to open yields [`FindError::OpenDir`]; failures while reading
    /// show up as `Err` items in the returned iterator.
    fn read_dir<'a>(&'a self, path: &Path) -> FindResult<DirItems<'a>>;

    /// Whether `path` is both readable and traversable by the caller
    fn is_searchable(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn status(&self, path: &Path) -> io::Result<EntryKind> {
        fs::symlink_metadata(path).map(|meta| EntryKind::from(meta.file_type()))
    }

    fn read_dir<'a>(&'a self, path: &Path) -> FindResult<DirItems<'a>> {
        let entries = fs::read_dir(path).map_err(|source| FindError::OpenDir {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path.to_path_buf();

        Ok(Box::new(entries.map(move |entry| {
            let entry = entry.map_err(|source| FindError::ReadEntry {
                path: dir.clone(),
                source,
            })?;
            // DirEntry::file_type does not traverse symlinks
            let file_type = entry.file_type().map_err(|source| FindError::Status {
                path: entry.path(),
                source,
            })?;
            Ok(DirItem::new(entry.file_name(), file_type.into()))
        })))
    }

    #[cfg(unix)]
    fn is_searchable(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
            return false;
        };
        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
        unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::X_OK) == 0 }
    }

    #[cfg(not(unix))]
    fn is_searchable(&self, path: &Path) -> bool {
        fs::read_dir(path).is_ok()
    }
}
