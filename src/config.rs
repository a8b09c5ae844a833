use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::{PracticeCorpus, WordCorpus};
use crate::error::Result;
use crate::games::Playfield;

/// One logical game frame at roughly 60 frames per second
pub const DEFAULT_TICK_RATE_MS: u64 = 16;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub playfield_width: f64,
    pub playfield_height: f64,
    /// Fixed RNG seed; a random one is drawn when absent
    pub seed: Option<u64>,
    /// Word list JSON replacing the embedded one
    pub words_file: Option<PathBuf>,
    /// Practice texts JSON replacing the embedded ones
    pub practice_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let playfield = Playfield::default();
        Self {
            tick_rate_ms: DEFAULT_TICK_RATE_MS,
            playfield_width: playfield.width,
            playfield_height: playfield.height,
            seed: None,
            words_file: None,
            practice_file: None,
        }
    }
}

impl Config {
    pub fn playfield(&self) -> Playfield {
        Playfield {
            width: self.playfield_width,
            height: self.playfield_height,
        }
    }

    /// The configured word list, or the embedded one when none is set or it
    /// cannot be read
    pub fn word_corpus(&self) -> Result<WordCorpus> {
        if let Some(path) = &self.words_file {
            match WordCorpus::from_path(path) {
                Ok(corpus) => return Ok(corpus),
                Err(e) => warn!("ignoring word list {}: {e}", path.display()),
            }
        }
        WordCorpus::embedded()
    }

    pub fn practice_corpus(&self) -> Result<PracticeCorpus> {
        if let Some(path) = &self.practice_file {
            match PracticeCorpus::from_path(path) {
                Ok(corpus) => return Ok(corpus),
                Err(e) => warn!("ignoring practice texts {}: {e}", path.display()),
            }
        }
        PracticeCorpus::embedded()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typing-arcade") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typing_arcade_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("invalid config at {}: {e}; using defaults", self.path.display());
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            tick_rate_ms: 33,
            playfield_width: 640.0,
            playfield_height: 480.0,
            seed: Some(7),
            words_file: Some(PathBuf::from("/tmp/words.json")),
            practice_file: None,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.playfield().width, 640.0);
    }

    #[test]
    fn missing_or_invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"seed": 3}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.seed, Some(3));
        assert_eq!(cfg.tick_rate_ms, DEFAULT_TICK_RATE_MS);
    }

    #[test]
    fn unreadable_word_list_falls_back_to_embedded() {
        let cfg = Config {
            words_file: Some(PathBuf::from("/definitely/not/here.json")),
            ..Config::default()
        };
        let corpus = cfg.word_corpus().unwrap();
        assert_eq!(corpus, WordCorpus::embedded().unwrap());
    }

    #[test]
    fn configured_practice_texts_are_used() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("texts.json");
        fs::write(&path, br#"{"name":"mine","size":1,"texts":["just this"]}"#).unwrap();

        let cfg = Config {
            practice_file: Some(path),
            ..Config::default()
        };
        assert_eq!(cfg.practice_corpus().unwrap().texts, vec!["just this"]);
    }
}
