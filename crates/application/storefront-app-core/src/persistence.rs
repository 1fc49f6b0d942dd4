use crate::domain::{StoreSettings, User, WishlistItem};
use crate::ports::{SessionPort, SettingsRepo, WishlistRepo};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io::Write;

const QUALIFIER: &str = "com";
const ORG: &str = "storefront";
const APP: &str = "catalog";

/// JSON-file key-value store: one file per key under the config directory.
pub struct FilePersistence {
    root: Option<Utf8PathBuf>,
}

impl Default for FilePersistence {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    is_authenticated: bool,
    user: Option<User>,
}

impl FilePersistence {
    /// Store under the platform config directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Store under an explicit directory (tests, `--data-dir`).
    pub fn with_root(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn config_dir(&self) -> Result<Utf8PathBuf> {
        let dir = match &self.root {
            Some(root) => root.clone(),
            None => {
                let proj_dirs = ProjectDirs::from(QUALIFIER, ORG, APP)
                    .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
                Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).map_err(|p| {
                    anyhow::anyhow!("Config directory is not valid UTF-8: {}", p.display())
                })?
            }
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create config directory {dir}"))?;
        }
        Ok(dir)
    }

    fn path(&self, file: &str) -> Result<Utf8PathBuf> {
        Ok(self.config_dir()?.join(file))
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.path(file)?;
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {path}"))?;
        Ok(Some(value))
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.path(file)?;
        let json = serde_json::to_string_pretty(value)?;
        atomic_write(&path, json.as_bytes()).with_context(|| format!("Failed to write {path}"))
    }
}

impl SettingsRepo for FilePersistence {
    fn load(&self) -> Result<StoreSettings> {
        Ok(self.read_json("settings.json")?.unwrap_or_default())
    }

    fn save(&self, settings: &StoreSettings) -> Result<()> {
        self.write_json("settings.json", settings)
    }
}

impl SessionPort for FilePersistence {
    fn current_user(&self) -> Result<Option<User>> {
        let record: Option<SessionRecord> = self.read_json("session.json")?;
        Ok(record.filter(|r| r.is_authenticated).and_then(|r| r.user))
    }

    fn set(&self, user: &User) -> Result<()> {
        self.write_json(
            "session.json",
            &SessionRecord {
                is_authenticated: true,
                user: Some(user.clone()),
            },
        )
    }

    fn clear(&self) -> Result<()> {
        let path = self.path("session.json")?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {path}")),
        }
    }
}

impl WishlistRepo for FilePersistence {
    fn load(&self) -> Result<Vec<WishlistItem>> {
        Ok(self.read_json("wishlist.json")?.unwrap_or_default())
    }

    fn save(&self, items: &[WishlistItem]) -> Result<()> {
        self.write_json("wishlist.json", items)
    }
}

fn atomic_write(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    let tmp_path = Utf8PathBuf::from(format!("{path}.tmp"));

    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create temp file {tmp_path}"))?;

    file.write_all(contents)
        .with_context(|| format!("Failed to write temp file {tmp_path}"))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {tmp_path}"))?;
    drop(file);

    match fs::rename(&tmp_path, path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            fs::remove_file(path).ok();
            fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to replace destination file {path}"))?;
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to rename temp file {tmp_path} to {path}"));
        }
    }

    if let Some(parent) = path.parent() {
        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}
