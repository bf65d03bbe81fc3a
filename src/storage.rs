use crate::errors::AppError;
use crate::ledger::Ledger;
use crate::snapshot::{HISTORY_KEY, STATE_KEY, StateSnapshot, parse_history};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::error;

/// Key-value persistence over a directory: each key is `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads a key. Missing files and unparsable contents both read as absent.
    pub async fn load(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!("failed to parse {}: {err}", path.display());
                    None
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!("failed to read {}: {err}", path.display());
                None
            }
        }
    }

    /// Writes a key through `<key>.json.tmp` and a rename, so the previous
    /// contents stay readable until the new ones are complete.
    pub async fn persist<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), AppError> {
        let payload = serde_json::to_vec_pretty(data)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, payload).await?;
        fs::rename(&tmp, self.path_for(key)).await?;
        Ok(())
    }

    pub async fn load_state(&self) -> Option<StateSnapshot> {
        let value = self.load(STATE_KEY).await?;
        StateSnapshot::from_value(&value)
    }

    pub async fn load_history(&self) -> Ledger {
        let records = self
            .load(HISTORY_KEY)
            .await
            .map(|value| parse_history(&value))
            .unwrap_or_default();
        Ledger::from_records(records)
    }
}

#[cfg(test)]
pub(crate) fn temp_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("wellness_widget_{label}_{}_{nanos}", std::process::id()));
    std::fs::create_dir_all(&path).unwrap();
    path
}
