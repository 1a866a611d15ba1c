use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::leaderboard::ScorePolicy;
use crate::question::{BuiltinQuestionStore, FileQuestionStore, Question, QuestionStore, DEFAULT_BANK};
use crate::session::SessionConfig;

/// Persisted defaults; command line flags override them per run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub questions: Option<PathBuf>,
    pub bank: String,
    pub leaderboard: Option<PathBuf>,
    pub timed: bool,
    pub shuffle: bool,
    pub policy: ScorePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions: None,
            bank: DEFAULT_BANK.to_string(),
            leaderboard: None,
            timed: false,
            shuffle: false,
            policy: ScorePolicy::Overwrite,
        }
    }
}

impl Config {
    pub fn leaderboard_path(&self) -> PathBuf {
        self.leaderboard
            .clone()
            .unwrap_or_else(AppDirs::leaderboard_path)
    }

    /// Fails on a bank name that no later run could load
    pub fn validate(&self) -> Result<()> {
        BuiltinQuestionStore::named(self.bank.clone()).map(|_| ())
    }

    /// A question file wins over the named built-in bank
    pub fn load_questions(&self) -> Result<Vec<Question>> {
        let mut questions = match &self.questions {
            Some(path) => FileQuestionStore::with_path(path).load()?,
            None => BuiltinQuestionStore::named(self.bank.clone())?.load()?,
        };
        if self.shuffle {
            questions.shuffle(&mut rand::thread_rng());
        }
        Ok(questions)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            timed: self.timed,
            policy: self.policy,
        }
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
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
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
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
