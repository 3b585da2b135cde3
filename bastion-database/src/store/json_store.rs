use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Utc;

use crate::model::warnings::Ledger;

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> anyhow::Result<Option<Ledger>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(source).with_context(|| {
                    format!("failed to read ledger file `{}`", self.path.display())
                });
            }
        };

        let ledger = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to parse ledger file `{}`", self.path.display()))?;

        Ok(Some(ledger))
    }

    /// Write the snapshot next to the target and rename it into place, so a crash
    /// mid-write never leaves a truncated ledger behind.
    pub async fn save(&self, ledger: &Ledger) -> anyhow::Result<()> {
        let mut payload =
            serde_json::to_vec_pretty(ledger).context("failed to serialize warning ledger")?;
        payload.push(b'\n');

        let staging = self.sibling_path(".tmp");
        tokio::fs::write(&staging, &payload)
            .await
            .with_context(|| format!("failed to write `{}`", staging.display()))?;

        tokio::fs::rename(&staging, &self.path)
            .await
            .with_context(|| {
                format!(
                    "failed to move `{}` over `{}`",
                    staging.display(),
                    self.path.display()
                )
            })?;

        Ok(())
    }

    /// Move an unreadable ledger aside as `<file>.corrupt` and return where it went.
    ///
    /// An earlier `.corrupt` file is kept; the new one gets a timestamp suffix instead.
    pub async fn quarantine(&self) -> anyhow::Result<Option<PathBuf>> {
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(None);
        }

        let mut target = self.sibling_path(".corrupt");
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            target = self.sibling_path(&format!(".corrupt.{}", Utc::now().timestamp()));
        }

        tokio::fs::rename(&self.path, &target)
            .await
            .with_context(|| {
                format!(
                    "failed to move `{}` to `{}`",
                    self.path.display(),
                    target.display()
                )
            })?;

        Ok(Some(target))
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("warns.json"));
        file_name.push(suffix);
        self.path.with_file_name(file_name)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::tempdir;

    use super::JsonFileStore;
    use crate::model::warnings::{Ledger, WarningRecord};

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.insert(
            11,
            vec![WarningRecord {
                moderator_id: 22,
                reason: "caps lock".to_owned(),
                time: Utc::now(),
            }],
        );
        ledger
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("warns.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_ledger() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("warns.json"));
        let ledger = sample_ledger();

        store.save(&ledger).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(ledger));
        assert!(!dir.path().join("warns.json.tmp").exists());
    }

    #[tokio::test]
    async fn snapshot_is_indented_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");
        let store = JsonFileStore::new(path.clone());

        store.save(&sample_ledger()).await.unwrap();

        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.starts_with("{\n  \"11\": [\n"));
        assert!(raw.contains("\"moderator\": 22"));
    }

    #[tokio::test]
    async fn garbage_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn quarantine_moves_the_file_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");
        std::fs::write(&path, b"not json").unwrap();
        std::fs::write(dir.path().join("warns.json.corrupt"), b"older").unwrap();

        let store = JsonFileStore::new(path.clone());
        let moved = store.quarantine().await.unwrap().unwrap();

        assert!(!path.exists());
        assert_ne!(moved, dir.path().join("warns.json.corrupt"));
        assert_eq!(std::fs::read(&moved).unwrap(), b"not json");
        assert_eq!(
            std::fs::read(dir.path().join("warns.json.corrupt")).unwrap(),
            b"older"
        );
        assert!(store.quarantine().await.unwrap().is_none());
    }
}
