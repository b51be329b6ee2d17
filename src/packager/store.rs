//! Storage backends behind the packager.
//!
//! Paths handed to a store are relative to its root (the games directory).

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// A direct child of a store directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// Persistence port for packaged games.
pub trait PackageStore: Send + Sync {
    /// Create `dir` and any missing parents. `""` is the root itself.
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Write `contents` to `path`, replacing any existing file.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Direct children of `dir`, sorted by name. Missing `dir` lists as empty.
    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>>;

    /// Where `path` lives, for reporting to the user.
    fn locate(&self, path: &Path) -> PathBuf;
}

/// Files under a root directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageStore for FsStore {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(self.root.join(dir))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(self.root.join(path), contents)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let read_dir = match std::fs::read_dir(self.root.join(dir)) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn locate(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn has_dir(&self, dir: &Path) -> bool {
        dir.as_os_str().is_empty()
            || self
                .dirs
                .lock()
                .map(|dirs| dirs.contains(dir))
                .unwrap_or(false)
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "memory store lock poisoned")
}

impl PackageStore for MemoryStore {
    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.lock().map_err(|_| poisoned())?;
        let mut current = PathBuf::new();
        for component in dir.components() {
            current.push(component);
            dirs.insert(current.clone());
        }
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !self.has_dir(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", parent.display()),
            ));
        }
        self.files
            .lock()
            .map_err(|_| poisoned())?
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .lock()
            .map_err(|_| poisoned())?
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn list(&self, dir: &Path) -> io::Result<Vec<Entry>> {
        let mut children: BTreeMap<String, bool> = BTreeMap::new();

        let dirs = self.dirs.lock().map_err(|_| poisoned())?;
        let files = self.files.lock().map_err(|_| poisoned())?;
        let dir_paths = dirs.iter().map(|p| (p, true));
        let file_paths = files.keys().map(|p| (p, false));

        for (path, is_dir) in dir_paths.chain(file_paths) {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(Component::Normal(first)) = components.next() else {
                continue;
            };
            let nested = components.next().is_some();
            let entry = children
                .entry(first.to_string_lossy().into_owned())
                .or_insert(false);
            *entry |= is_dir || nested;
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| Entry { name, is_dir })
            .collect())
    }

    fn locate(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}
