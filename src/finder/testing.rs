//! In-memory filesystem and reporter for tests

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::fs::{DirItem, DirItems, EntryKind, FileSystem};
use super::report::{denied_line, found_line, summary_line, Reporter};
use crate::errors::{FindError, FindResult};

/// Directory tree held in memory, with injectable failures
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: HashMap<PathBuf, Vec<DirItem>>,
    kinds: HashMap<PathBuf, EntryKind>,
    denied: HashSet<PathBuf>,
    fail_open: HashSet<PathBuf>,
    fail_read_after: HashMap<PathBuf, usize>,
    panic_on: HashSet<PathBuf>,
    listings: Mutex<HashMap<PathBuf, usize>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, path: &str, entries: &[(&str, EntryKind)]) -> Self {
        let path = PathBuf::from(path);
        for (name, kind) in entries {
            self.kinds.insert(path.join(name), *kind);
        }
        self.kinds.insert(path.clone(), EntryKind::Directory);
        self.dirs.insert(
            path,
            entries.iter().map(|(name, kind)| DirItem::new(*name, *kind)).collect(),
        );
        self
    }

    pub fn deny(mut self, path: &str) -> Self {
        self.denied.insert(PathBuf::from(path));
        self
    }

    pub fn fail_open(mut self, path: &str) -> Self {
        self.fail_open.insert(PathBuf::from(path));
        self
    }

    pub fn fail_read_after(mut self, path: &str, entries: usize) -> Self {
        self.fail_read_after.insert(PathBuf::from(path), entries);
        self
    }

    pub fn panic_on(mut self, path: &str) -> Self {
        self.panic_on.insert(PathBuf::from(path));
        self
    }

    /// How many times `read_dir` was called for `path`
    pub fn listings_of(&self, path: &str) -> usize {
        self.listings
            .lock()
            .unwrap()
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_listings(&self) -> usize {
        self.listings.lock().unwrap().values().sum()
    }

    pub fn listed_paths(&self) -> HashMap<PathBuf, usize> {
        self.listings.lock().unwrap().clone()
    }
}

impl FileSystem for MemoryFs {
    fn status(&self, path: &Path) -> io::Result<EntryKind> {
        self.kinds
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }

    fn read_dir<'a>(&'a self, path: &Path) -> FindResult<DirItems<'a>> {
        *self
            .listings
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        if self.panic_on.contains(path) {
            panic!("injected panic listing {}", path.display());
        }
        if self.fail_open.contains(path) {
            return Err(FindError::OpenDir {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "injected open failure"),
            });
        }
        let Some(entries) = self.dirs.get(path) else {
            return Err(FindError::OpenDir {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            });
        };

        let mut items: Vec<FindResult<DirItem>> = entries.iter().cloned().map(Ok).collect();
        if let Some(&good) = self.fail_read_after.get(path) {
            items.truncate(good);
            items.push(Err(FindError::ReadEntry {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::Other, "injected read failure"),
            }));
        }
        Ok(Box::new(items.into_iter()))
    }

    fn is_searchable(&self, path: &Path) -> bool {
        self.dirs.contains_key(path) && !self.denied.contains(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Found(PathBuf),
    Denied(PathBuf),
    Finished(usize),
}

/// Records every reported line in arrival order
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<Event>>,
}

impl CollectingReporter {
    pub fn found_paths(&self) -> Vec<PathBuf> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                Event::Found(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn denied_paths(&self) -> Vec<PathBuf> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                Event::Denied(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn summary(&self) -> Option<usize> {
        self.events.lock().unwrap().iter().find_map(|event| match event {
            Event::Finished(found) => Some(*found),
            _ => None,
        })
    }

    pub fn lines(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| match event {
                Event::Found(path) => String::from_utf8_lossy(&found_line(path)).into_owned(),
                Event::Denied(path) => String::from_utf8_lossy(&denied_line(path)).into_owned(),
                Event::Finished(found) => summary_line(*found),
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn found(&self, path: &Path) {
        self.events.lock().unwrap().push(Event::Found(path.to_path_buf()));
    }

    fn permission_denied(&self, path: &Path) {
        self.events.lock().unwrap().push(Event::Denied(path.to_path_buf()));
    }

    fn finished(&self, found: usize) {
        self.events.lock().unwrap().push(Event::Finished(found));
    }
}
