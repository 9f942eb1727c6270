//! File storage seam for every pipeline task.
//!
//! Tasks never touch `std::fs` directly. They read and write through the
//! [`FileStore`] trait, so each task is a plain function from the files it
//! reads to the files it writes:
//!
//! - [`DiskStore`]: the production implementation, rooted at the project
//!   directory. All paths handed to it are relative to that root.
//! - [`MemoryStore`]: an in-memory tree used by tests and by callers that want
//!   to run the pipeline without a real checkout.
//!
//! Paths are always project-relative (`docs/news/2025-04-23-launch.md`), never
//! absolute, and listings come back sorted so discovery order is stable across
//! platforms and runs.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// Text file operations the pipeline needs.
pub trait FileStore {
    /// Read a UTF-8 text file. Non-UTF-8 content is an `InvalidData` error.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write (create or truncate) a text file. The parent directory must exist.
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all missing parents. Succeeds if it already exists.
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;

    /// List regular files under `dir`, sorted by path.
    ///
    /// With `recursive == false` only direct children are returned. Returned
    /// paths include the `dir` prefix. A missing directory is a `NotFound`
    /// error so callers can decide whether absence matters.
    fn list_files(&self, dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>>;
}

// ============================================================================
// Disk
// ============================================================================

/// [`FileStore`] backed by the real filesystem under a project root.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileStore for DiskStore {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(self.resolve(path), contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(self.resolve(path))
    }

    fn list_files(&self, dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let base = self.resolve(dir);
        if !base.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", base.display()),
            ));
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&base)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry under {}: {err}", base.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf());
            files.push(rel);
        }
        files.sort();
        Ok(files)
    }
}

// ============================================================================
// Memory
// ============================================================================

/// In-memory [`FileStore`].
///
/// Directories are tracked explicitly: inserting a file registers all of its
/// ancestors, but [`FileStore::write`] still refuses to create a file whose
/// parent was never created, matching disk behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parent directories.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.register_dirs(parent);
        }
        self.files.insert(path, contents.into());
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Current contents of a file, if present.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    fn register_dirs(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FileStore for MemoryStore {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !self.is_dir(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("parent directory missing: {}", parent.display()),
            ));
        }
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        if self.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("a file exists at {}", path.display()),
            ));
        }
        self.register_dirs(path);
        Ok(())
    }

    fn list_files(&self, dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        if !self.is_dir(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", dir.display()),
            ));
        }
        Ok(self
            .files
            .keys()
            .filter(|p| {
                if recursive {
                    p.starts_with(dir)
                } else {
                    p.parent() == Some(dir)
                }
            })
            .cloned()
            .collect())
    }
}
