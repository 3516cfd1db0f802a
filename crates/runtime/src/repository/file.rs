//! File-based GameRepository implementation.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use vanguard_core::{GameId, GameState};

use super::error::{RepositoryError, Result};
use super::traits::GameRepository;
use super::types::{ActionRecord, GameMetadata};

const STATE_FILE: &str = "state.json";
const METADATA_FILE: &str = "metadata.json";
const HISTORY_FILE: &str = "history.jsonl";

/// File-based implementation of GameRepository.
///
/// # Layout
///
/// Each game lives in its own directory under `base_dir`:
/// - `state.json`: latest snapshot
/// - `metadata.json`: summary used by listings
/// - `history.jsonl`: one [`ActionRecord`] per line, append-only
///
/// Snapshot and metadata writes go through a temp file and a rename so a
/// crash never leaves a half-written document behind.
pub struct FileGameRepository {
    base_dir: PathBuf,
}

impl FileGameRepository {
    /// Create a new file-based repository rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory of a game. Ids that could escape `base_dir` have none.
    fn game_dir(&self, id: &GameId) -> Option<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.base_dir.join(id.as_str()))
    }

    fn existing_dir(&self, id: &GameId) -> Result<PathBuf> {
        self.game_dir(id)
            .filter(|dir| dir.join(METADATA_FILE).exists())
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    fn read_metadata(&self, dir: &Path) -> Result<GameMetadata> {
        read_json(&dir.join(METADATA_FILE))
    }

    /// Appends one history line and returns the log length before it.
    ///
    /// A failed write is cut back off so no partial line stays behind.
    fn append_line(&self, dir: &Path, record: &ActionRecord) -> Result<u64> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(HISTORY_FILE))?;
        let len = file.metadata()?.len();
        if let Err(err) = file.write_all(&line).and_then(|()| file.sync_data()) {
            let _ = file.set_len(len);
            return Err(err.into());
        }
        Ok(len)
    }

    fn truncate_history(&self, dir: &Path, len: u64) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(dir.join(HISTORY_FILE))?;
        file.set_len(len)?;
        file.sync_data()?;
        Ok(())
    }

    /// Stages both documents, appends the record, then swaps the documents in.
    ///
    /// Every failure leaves history, snapshot and metadata as they were, so a
    /// rejected commit can never leave a record behind or reuse its id.
    fn write_commit(
        &self,
        dir: &Path,
        record: &ActionRecord,
        previous: &GameMetadata,
        metadata: &GameMetadata,
    ) -> Result<()> {
        let state_path = dir.join(STATE_FILE);
        let metadata_path = dir.join(METADATA_FILE);
        let state_temp = stage_json(&state_path, &record.state_after)?;
        let metadata_temp = stage_json(&metadata_path, metadata)?;

        let history_len = self.append_line(dir, record)?;
        if let Err(err) = fs::rename(&metadata_temp, &metadata_path) {
            self.truncate_history(dir, history_len)?;
            return Err(err.into());
        }
        if let Err(err) = fs::rename(&state_temp, &state_path) {
            self.truncate_history(dir, history_len)?;
            write_json(&metadata_path, previous)?;
            return Err(err.into());
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let temp_path = temp_path(path);
    let bytes = serde_json::to_vec_pretty(value)?;

    fs::write(&temp_path, bytes)?;
    Ok(temp_path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = stage_json(path, value)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn discard_staged(dir: &Path) {
    for name in [STATE_FILE, METADATA_FILE] {
        let _ = fs::remove_file(temp_path(&dir.join(name)));
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| RepositoryError::CorruptedData(format!("{}: {}", path.display(), e)))
}

impl GameRepository for FileGameRepository {
    fn create(&self, state: &GameState) -> Result<GameMetadata> {
        let dir = self
            .game_dir(&state.id)
            .ok_or_else(|| RepositoryError::CorruptedData(format!("invalid game id {}", state.id)))?;
        if dir.exists() {
            return Err(RepositoryError::AlreadyExists(state.id.clone()));
        }
        fs::create_dir_all(&dir)?;

        let metadata = GameMetadata::new(state, Utc::now());
        write_json(&dir.join(STATE_FILE), state)?;
        fs::File::create(dir.join(HISTORY_FILE))?;
        write_json(&dir.join(METADATA_FILE), &metadata)?;

        tracing::debug!("Created game {} in {}", state.id, dir.display());
        Ok(metadata)
    }

    fn load(&self, id: &GameId) -> Result<Option<GameState>> {
        let Ok(dir) = self.existing_dir(id) else {
            return Ok(None);
        };
        let state: GameState = read_json(&dir.join(STATE_FILE))?;

        tracing::debug!("Loaded game {} from {}", id, dir.display());
        Ok(Some(state))
    }

    fn save(&self, id: &GameId, state: &GameState) -> Result<()> {
        let dir = self.existing_dir(id)?;
        let mut metadata = self.read_metadata(&dir)?;
        metadata.touch(state, Utc::now());

        write_json(&dir.join(STATE_FILE), state)?;
        write_json(&dir.join(METADATA_FILE), &metadata)?;

        tracing::debug!("Saved game {} to {}", id, dir.display());
        Ok(())
    }

    fn append_history(&self, id: &GameId, record: &ActionRecord) -> Result<()> {
        let dir = self.existing_dir(id)?;
        let mut metadata = self.read_metadata(&dir)?;
        metadata.action_count += 1;

        let history_len = self.append_line(&dir, record)?;
        if let Err(err) = write_json(&dir.join(METADATA_FILE), &metadata) {
            discard_staged(&dir);
            self.truncate_history(&dir, history_len)?;
            return Err(err);
        }
        Ok(())
    }

    /// Appends the record and rewrites snapshot and metadata as one unit.
    fn commit(&self, id: &GameId, record: &ActionRecord) -> Result<()> {
        let dir = self.existing_dir(id)?;
        let previous = self.read_metadata(&dir)?;
        let mut metadata = previous.clone();
        metadata.action_count += 1;
        metadata.touch(&record.state_after, record.timestamp);

        if let Err(err) = self.write_commit(&dir, record, &previous, &metadata) {
            discard_staged(&dir);
            tracing::warn!("Commit of action {} to game {} rolled back: {}", record.id, id, err);
            return Err(err);
        }

        tracing::debug!("Committed action {} of game {}", record.id, id);
        Ok(())
    }

    fn history(&self, id: &GameId) -> Result<Vec<ActionRecord>> {
        let dir = self.existing_dir(id)?;
        let path = dir.join(HISTORY_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: ActionRecord = serde_json::from_str(&line).map_err(|e| {
                RepositoryError::CorruptedData(format!(
                    "{} line {}: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn metadata(&self, id: &GameId) -> Result<Option<GameMetadata>> {
        match self.existing_dir(id) {
            Ok(dir) => self.read_metadata(&dir).map(Some),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn list(&self) -> Result<Vec<GameMetadata>> {
        let mut list = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path().join(METADATA_FILE);
            if path.is_file() {
                list.push(read_json::<GameMetadata>(&path)?);
            }
        }

        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    fn delete(&self, id: &GameId) -> Result<bool> {
        match self.existing_dir(id) {
            Ok(dir) => {
                fs::remove_dir_all(&dir)?;
                tracing::debug!("Deleted game {}", id);
                Ok(true)
            }
            Err(RepositoryError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
