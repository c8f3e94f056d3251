// src/store.rs
use std::{cell::RefCell, fs, io, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

/// Last observed state of the page. Both fields absent = never observed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Snapshot {
    pub fn observed(version: u64, body: impl Into<String>) -> Self {
        Self { version: Some(version), body: Some(body.into()) }
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none()
    }
}

pub trait SnapshotStore {
    /// Never fails: missing or unreadable state is an empty snapshot.
    fn load(&self) -> Snapshot;
    /// Replace the stored snapshot wholesale.
    fn save(&self, snapshot: &Snapshot) -> io::Result<()>;
}

/* ---------------- JSON file ---------------- */

/// One JSON file. Writes go to a sibling temp file first and are renamed
/// into place, so a reader never sees half a snapshot.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Snapshot {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logd!("No snapshot at {}, starting fresh", self.path.display());
                return Snapshot::default();
            }
            Err(e) => {
                logw!("Could not read snapshot {}: {e}; starting fresh", self.path.display());
                return Snapshot::default();
            }
        };
        match serde_json::from_str::<Snapshot>(&text) {
            Ok(snap) => snap,
            Err(e) => {
                logw!("Corrupt snapshot {}: {e}; starting fresh", self.path.display());
                Snapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) -> io::Result<()> {
        // Ensure parent directories exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/* ---------------- In memory ---------------- */

/// Keeps the snapshot in memory only. `--dry-run` seeds one from the state
/// file so a dry run never writes it.
#[derive(Default)]
pub struct MemoryStore {
    snap: RefCell<Snapshot>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snap: RefCell::new(snapshot), saves: RefCell::new(0) }
    }

    pub fn current(&self) -> Snapshot {
        self.snap.borrow().clone()
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        *self.saves.borrow()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Snapshot {
        self.current()
    }

    fn save(&self, snapshot: &Snapshot) -> io::Result<()> {
        *self.snap.borrow_mut() = snapshot.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
