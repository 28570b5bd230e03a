//! Options for the search
//!
//! This module provides options for configuring a search run.

use crate::cli::Cli;

/// Options for configuring a search run
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Number of worker threads
    pub threads: usize,

    /// Whether name matching ignores case
    pub ignore_case: bool,
}

impl FindOptions {
    /// Create a new FindOptions with one worker per CPU
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get(),
            ignore_case: false,
        }
    }

    /// Set the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set whether name matching ignores case
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Create FindOptions from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let options = Self::new().with_ignore_case(cli.ignore_case);
        match cli.threads {
            Some(threads) => options.with_threads(threads),
            None => options,
        }
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}
