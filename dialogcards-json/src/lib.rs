use chrono::{DateTime, Utc};
use dialogcards_core::{CoreError, Params, PersistedState};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub mod paths;

const FILE_VERSION: u32 = 1;

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileImage {
    version: u32,
    saved_at: DateTime<Utc>,
    state: PersistedState,
}

/// One session file plus its rotated backups.
pub struct StateStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    image: RwLock<Option<FileImage>>,
}

impl StateStore {
    pub fn open_default(content_key: &str) -> Result<Self, CoreError> {
        let (file, backups) = paths::default_state_file(content_key);
        Self::open_with(file, backups, 10)
    }

    pub fn open_with(path: PathBuf, backups_dir: PathBuf, max_backups: usize) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let image = load_image(&path)?;
        Ok(Self {
            path,
            backups_dir,
            max_backups: max_backups.max(1),
            image: RwLock::new(image),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved session, if any.
    pub fn load(&self) -> Option<PersistedState> {
        self.image.read().as_ref().map(|img| img.state.clone())
    }

    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.image.read().as_ref().map(|img| img.saved_at)
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), CoreError> {
        let img = FileImage {
            version: FILE_VERSION,
            saved_at: Utc::now(),
            state: state.clone(),
        };
        write_with_backup(&self.path, &self.backups_dir, self.max_backups, &img)
            .map_err(|_| CoreError::Storage("io"))?;
        *self.image.write() = Some(img);
        info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Forgets the session; backups are left in place.
    pub fn clear(&self) -> Result<(), CoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|_| CoreError::Storage("io"))?;
        }
        *self.image.write() = None;
        Ok(())
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|_| CoreError::Storage("io"))
}

fn load_image(path: &Path) -> Result<Option<FileImage>, CoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let buf = fs::read_to_string(path).map_err(|_| CoreError::Storage("io"))?;
    let img: FileImage =
        serde_json::from_str(&buf).map_err(|_| CoreError::Invalid("session file"))?;
    if img.version > FILE_VERSION {
        return Err(CoreError::Storage("unsupported session file version"));
    }
    debug!(path = %path.display(), saved_at = %img.saved_at, "session loaded");
    Ok(Some(img))
}

fn write_with_backup(path: &Path, backups_dir: &Path, max_backups: usize, img: &FileImage) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img).map_err(std::io::Error::other)?;
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    // Backup rotation
    let ts = img.saved_at.format("%Y%m%d-%H%M%S%.3f");
    let backup_path = backups_dir.join(format!("session-{ts}.json"));
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    btmp.persist(&backup_path).map_err(|e| e.error)?;

    rotate_backups(backups_dir, max_backups)?;

    Ok(())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    // Names carry the timestamp, so they sort oldest first.
    entries.sort_by_key(|e| e.file_name());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

/// Reads authored content params from a JSON file.
pub fn load_content(path: &Path) -> Result<Params, CoreError> {
    let buf = fs::read_to_string(path).map_err(|_| CoreError::Storage("io"))?;
    Params::from_json(&buf)
}

pub fn write_content(path: &Path, params: &Params) -> Result<(), CoreError> {
    ensure_parent_dirs(path)?;
    let json = serde_json::to_vec_pretty(params).map_err(|_| CoreError::Invalid("content params"))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|_| CoreError::Storage("io"))?;
    tmp.write_all(&json).map_err(|_| CoreError::Storage("io"))?;
    tmp.persist(path).map_err(|_| CoreError::Storage("io"))?;
    Ok(())
}
