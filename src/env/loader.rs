//! Locating a definitions file and applying it to the environment.
//!
//! [`EnvLoader::load`] copies definitions into the process environment table.
//! [`EnvLoader::layered`] reads the same file into a [`LayeredEnv`] that
//! answers lookups without mutating the process.

use super::{Definitions, EnvSource, ProcessEnv};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// File name searched for when no explicit path is given.
pub const DEFAULT_FILENAME: &str = ".env";

/// Which side wins when a variable is defined both in the ambient
/// environment and in the definitions file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precedence {
    /// Variables already present in the environment are never overwritten.
    #[default]
    Ambient,
    /// The definitions file overrides the environment.
    File,
}

/// Outcome of [`EnvLoader::load`]. Holds variable names only, never values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The definitions file that was read, if one was found.
    pub path: Option<PathBuf>,
    /// Variables written into the process environment.
    pub applied: Vec<String>,
    /// Variables left untouched because the environment already defined them.
    pub kept: Vec<String>,
    pub skipped_lines: usize,
}

impl LoadReport {
    pub fn loaded(&self) -> bool {
        self.path.is_some()
    }
}

/// Builder-style loader for `.env` definitions.
///
/// By default it looks for `.env` in the current directory and then in each
/// parent directory, and lets the ambient environment win.
#[derive(Debug, Clone)]
pub struct EnvLoader {
    path: Option<PathBuf>,
    filename: String,
    start_dir: Option<PathBuf>,
    precedence: Precedence,
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvLoader {
    pub fn new() -> Self {
        Self {
            path: None,
            filename: DEFAULT_FILENAME.to_string(),
            start_dir: None,
            precedence: Precedence::default(),
        }
    }

    /// Load exactly this file. No directory search is performed.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new()
        }
    }

    /// File name to search for instead of `.env`.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Start the search in `dir` instead of the current directory.
    pub fn search_from(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Resolve the definitions file to use, if any.
    pub fn locate(&self) -> Result<Option<PathBuf>> {
        if let Some(ref path) = self.path {
            return Ok(Some(path.clone()));
        }

        let start = match self.start_dir {
            Some(ref dir) => dir.clone(),
            None => std::env::current_dir().map_err(Error::CurrentDir)?,
        };

        Ok(find_upwards(&start, &self.filename))
    }

    /// Locate and parse the definitions file.
    ///
    /// Returns `Ok(None)` when there is no file to read.
    pub fn read_definitions(&self) -> Result<Option<(PathBuf, Definitions)>> {
        let Some(path) = self.locate()? else {
            return Ok(None);
        };
        Ok(Definitions::read(&path)?.map(|definitions| (path, definitions)))
    }

    /// Copy definitions into the process environment.
    ///
    /// A missing file is not an error: the environment is left as inherited.
    /// Must be called during startup, before the process spawns threads.
    pub fn load(&self) -> Result<LoadReport> {
        let Some((path, definitions)) = self.read_definitions()? else {
            tracing::debug!("no definitions file found, using ambient environment");
            return Ok(LoadReport::default());
        };

        let mut report = LoadReport {
            path: Some(path),
            skipped_lines: definitions.skipped_lines(),
            ..LoadReport::default()
        };

        for (key, value) in definitions.iter() {
            if self.precedence == Precedence::Ambient && ProcessEnv.contains(key) {
                report.kept.push(key.to_string());
                continue;
            }
            set_process_var(key, value);
            report.applied.push(key.to_string());
        }

        tracing::debug!(
            path = ?report.path,
            applied = report.applied.len(),
            kept = report.kept.len(),
            skipped_lines = report.skipped_lines,
            "loaded definitions file"
        );

        Ok(report)
    }

    /// Read the definitions file into a lookup layered over the process
    /// environment. The process environment is not modified.
    pub fn layered(&self) -> Result<LayeredEnv> {
        let definitions = self
            .read_definitions()?
            .map(|(_, definitions)| definitions)
            .unwrap_or_default();
        Ok(LayeredEnv::new(ProcessEnv, definitions, self.precedence))
    }
}

fn find_upwards(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

fn set_process_var(key: &str, value: &str) {
    // SAFETY: the loader runs during startup while the process is still
    // single-threaded, so no other thread reads the environment concurrently.
    unsafe { std::env::set_var(key, value) }
}

/// Read-only view combining an ambient source with definitions.
#[derive(Debug, Clone)]
pub struct LayeredEnv<A = ProcessEnv> {
    ambient: A,
    definitions: Definitions,
    precedence: Precedence,
}

impl<A: EnvSource> LayeredEnv<A> {
    pub fn new(ambient: A, definitions: Definitions, precedence: Precedence) -> Self {
        Self {
            ambient,
            definitions,
            precedence,
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }
}

// An ambient variable shadows the file whenever it is defined, matching
// `EnvLoader::load`, even if its value is not readable as text.
impl<A: EnvSource> EnvSource for LayeredEnv<A> {
    fn var(&self, key: &str) -> Option<String> {
        let from_file = || self.definitions.get(key).map(str::to_owned);
        match self.precedence {
            Precedence::Ambient if self.ambient.contains(key) => self.ambient.var(key),
            Precedence::Ambient => from_file(),
            Precedence::File => from_file().or_else(|| self.ambient.var(key)),
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.definitions.get(key).is_some() || self.ambient.contains(key)
    }
}
