//! File name matching
//!
//! This module provides the filters a worker applies to non-directory entries.

use std::ffi::OsStr;

use crate::errors::{FindError, FindResult};

/// Trait for file name filters
pub trait FileFilter: Send + Sync {
    /// Check if the entry name matches the filter
    fn matches(&self, name: &OsStr) -> bool;

    /// Get the filter description
    fn description(&self) -> String;
}

/// Literal substring match on the entry name
///
/// The term is not a pattern: `*`, `?` and `[` match only themselves.
#[derive(Debug, Clone)]
pub struct SubstringFilter {
    term: String,
    ignore_case: bool,
}

impl SubstringFilter {
    /// Create a case-sensitive filter. An empty term is rejected.
    pub fn new(term: &str) -> FindResult<Self> {
        if term.is_empty() {
            return Err(FindError::EmptySearchTerm);
        }
        Ok(Self {
            term: term.to_string(),
            ignore_case: false,
        })
    }

    /// Create a case-insensitive filter
    pub fn new_ignore_case(term: &str) -> FindResult<Self> {
        let mut filter = Self::new(term)?;
        filter.term = filter.term.to_lowercase();
        filter.ignore_case = true;
        Ok(filter)
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl FileFilter for SubstringFilter {
    fn matches(&self, name: &OsStr) -> bool {
        if self.ignore_case {
            return name.to_string_lossy().to_lowercase().contains(&self.term);
        }
        // Compare raw bytes so names that are not valid UTF-8 still match
        let needle = self.term.as_bytes();
        name.as_encoded_bytes()
            .windows(needle.len())
            .any(|window| window == needle)
    }

    fn description(&self) -> String {
        if self.ignore_case {
            format!("name (ignore case) contains '{}'", self.term)
        } else {
            format!("name contains '{}'", self.term)
        }
    }
}
