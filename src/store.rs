use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Whole-document snapshots keyed by name, used as diff baselines.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&mut self, key: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    snapshots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.snapshots.get(key).cloned())
    }

    fn save(&mut self, key: &str, text: &str) -> Result<()> {
        self.snapshots.insert(key.to_string(), text.to_string());
        Ok(())
    }
}

/// Stores each snapshot as a file under `root`, at the path named by its key.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            bail!("invalid snapshot key {key:?}: must be a relative path without '..'");
        }
        Ok(self.root.join(relative))
    }
}

impl SnapshotStore for DirStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "loaded snapshot");
                Ok(Some(text))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot");
                Ok(None)
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read snapshot {}", path.display()))
            }
        }
    }

    fn save(&mut self, key: &str, text: &str) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, text)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), bytes = text.len(), "saved snapshot");
        Ok(())
    }
}
