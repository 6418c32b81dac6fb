//! Versioned JSON save blobs and where they are stored.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::constants::{SAVE_DIR_NAME, SAVE_FILE_NAME, SAVE_VERSION};
use super::error::GameResult;
use super::game_state::GameState;

/// On-disk envelope around the game state. The state itself is required;
/// everything inside it defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(default = "current_version")]
    pub version: u32,
    /// Unix timestamp (UTC seconds) of the save.
    #[serde(default)]
    pub saved_at: i64,
    pub state: GameState,
}

fn current_version() -> u32 {
    SAVE_VERSION
}

/// Serializes the state into a versioned JSON blob.
pub fn serialize_state(state: &GameState) -> GameResult<String> {
    let save = SaveFile {
        version: SAVE_VERSION,
        saved_at: Utc::now().timestamp(),
        state: state.clone(),
    };
    Ok(serde_json::to_string_pretty(&save)?)
}

/// Parses a save blob. A blob without a `state` is an error; missing fields
/// inside it take their defaults and damaged entries are repaired.
pub fn deserialize_state(json: &str) -> GameResult<GameState> {
    let save: SaveFile = serde_json::from_str(json)?;
    if save.version != SAVE_VERSION {
        tracing::warn!(
            found = save.version,
            expected = SAVE_VERSION,
            "Loading save from a different version"
        );
    }
    let mut state = save.state;
    state.repair();
    Ok(state)
}

/// Somewhere to keep a single save blob.
pub trait SaveStore {
    fn load(&self) -> GameResult<Option<String>>;
    fn save(&mut self, blob: &str) -> GameResult<()>;
}

/// Keeps the blob in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub blob: Option<String>,
}

impl SaveStore for MemoryStore {
    fn load(&self) -> GameResult<Option<String>> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> GameResult<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

/// Stores the blob as a JSON file, by default `~/.guildmaster/save.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default location in the home directory.
    pub fn in_home_dir() -> io::Result<Self> {
        Ok(Self::new(guildmaster_dir()?.join(SAVE_FILE_NAME)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> GameResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, blob: &str) -> GameResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, blob)?;
        Ok(())
    }
}

/// Get the ~/.guildmaster/ directory path, creating it if needed.
pub fn guildmaster_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roundtrip_new_game() {
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let state = GameState::new_game(GameConfig::default(), &mut rng);
        let blob = serialize_state(&state).unwrap();
        assert_eq!(deserialize_state(&blob).unwrap(), state);
    }

    #[test]
    fn test_missing_state_is_an_error() {
        assert!(deserialize_state("{}").is_err());
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let state = GameState::new_game(GameConfig::default(), &mut rng);
        let bare = serde_json::to_string(&state).unwrap();
        assert!(deserialize_state(&bare).is_err());
    }

    #[test]
    fn test_empty_state_loads_defaults() {
        let state = deserialize_state(r#"{ "state": {} }"#).unwrap();
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_partial_state_fills_missing_fields() {
        let state = deserialize_state(r#"{ "state": { "gold": 250, "rank": "D" } }"#).unwrap();
        assert_eq!(state.gold, 250);
        assert_eq!(state.rank.name(), "D");
        assert_eq!(state.config, GameConfig::default());
        assert!(state.roster.is_empty());
    }

    #[test]
    fn test_invalid_bonus_ids_dropped_on_load() {
        let json = r#"{ "state": { "bonuses": { "copies": { "gold_bonus": 2, "retired_bonus": 1 } } } }"#;
        let state = deserialize_state(json).unwrap();
        assert_eq!(state.bonuses.copies_of("gold_bonus"), 2);
        assert!(!state.bonuses.copies.contains_key("retired_bonus"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(deserialize_state("not json").is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert!(store.load().unwrap().is_none());
        store.save("{}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let path = std::env::temp_dir().join(format!("guildmaster_test_{}.json", uuid::Uuid::new_v4()));
        let mut store = JsonFileStore::new(path.clone());
        assert!(store.load().unwrap().is_none());
        store.save("{\"version\":1}").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("{\"version\":1}"));
        fs::remove_file(path).ok();
    }
}
