use itertools::Itertools;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

use crate::app_dirs::AppDirs;
use crate::error::{QuizError, Result};
use crate::scorer::format_points;

/// What happens when a name that is already on the board submits again
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
pub enum ScorePolicy {
    /// Last submission wins
    #[default]
    Overwrite,
    /// Keep whichever score is higher
    KeepBest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub name: String,
    pub score: f64,
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} - {} points",
            self.rank,
            self.name,
            format_points(self.score)
        )
    }
}

/// Name -> score mapping that keeps first-insertion order.
/// Serialized as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Merge a score under `name`. An existing entry keeps its position.
    pub fn record(&mut self, name: &str, score: f64, policy: ScorePolicy) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => match policy {
                ScorePolicy::Overwrite => entry.score = score,
                ScorePolicy::KeepBest => entry.score = entry.score.max(score),
            },
            None => self.entries.push(LeaderboardEntry {
                name: name.to_string(),
                score,
            }),
        }
    }

    /// Highest score first; equal scores stay in insertion order
    pub fn ranked(&self) -> Vec<RankedEntry> {
        self.entries
            .iter()
            .sorted_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .enumerate()
            .map(|(i, e)| RankedEntry {
                rank: i + 1,
                name: e.name.clone(),
                score: e.score,
            })
            .collect()
    }
}

impl Serialize for Leaderboard {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Leaderboard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct LeaderboardVisitor;

        impl<'de> Visitor<'de> for LeaderboardVisitor {
            type Value = Leaderboard;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of player names to scores")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut board = Leaderboard::new();
                while let Some((name, score)) = access.next_entry::<String, f64>()? {
                    board.record(&name, score, ScorePolicy::Overwrite);
                }
                Ok(board)
            }
        }

        deserializer.deserialize_map(LeaderboardVisitor)
    }
}

pub trait LeaderboardStore {
    fn load(&self) -> Result<Leaderboard>;
    fn save(&self, board: &Leaderboard) -> Result<()>;
}

/// Leaderboard persisted as pretty-printed JSON.
///
/// Sessions do an unlocked read-modify-write, so two sessions finishing
/// at once can lose one update (last save wins). Saves go through a
/// temporary sibling file and a rename, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct FileLeaderboardStore {
    path: PathBuf,
}

impl FileLeaderboardStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::leaderboard_path(),
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

    fn write_atomically(&self, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)
    }
}

impl Default for FileLeaderboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardStore for FileLeaderboardStore {
    fn load(&self) -> Result<Leaderboard> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no leaderboard yet");
                return Ok(Leaderboard::new());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, board: &Leaderboard) -> Result<()> {
        let data = serde_json::to_vec_pretty(board)?;
        self.write_atomically(&data)
            .map_err(|source| QuizError::Persistence {
                path: self.path.clone(),
                source,
            })?;
        info!(path = %self.path.display(), entries = board.len(), "leaderboard saved");
        Ok(())
    }
}

/// Leaderboard held in memory, for headless runs and tests
#[derive(Debug, Default)]
pub struct InMemoryLeaderboardStore {
    board: Mutex<Leaderboard>,
}

impl InMemoryLeaderboardStore {
    pub fn new(board: Leaderboard) -> Self {
        Self {
            board: Mutex::new(board),
        }
    }

    pub fn snapshot(&self) -> Leaderboard {
        self.board
            .lock()
            .map(|b| b.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl LeaderboardStore for InMemoryLeaderboardStore {
    fn load(&self) -> Result<Leaderboard> {
        Ok(self.snapshot())
    }

    fn save(&self, board: &Leaderboard) -> Result<()> {
        match self.board.lock() {
            Ok(mut b) => *b = board.clone(),
            Err(poisoned) => *poisoned.into_inner() = board.clone(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn board(entries: &[(&str, f64)]) -> Leaderboard {
        let mut b = Leaderboard::new();
        for (name, score) in entries {
            b.record(name, *score, ScorePolicy::Overwrite);
        }
        b
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));
        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileLeaderboardStore::with_path(dir.path().join("nested/leaderboard.json"));
        let b = board(&[("Alice", 4.0), ("Bob", 8.0), ("Carol", -1.32)]);
        store.save(&b).unwrap();
        assert_eq!(store.load().unwrap(), b);
    }

    #[test]
    fn test_saved_file_is_pretty_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let store = FileLeaderboardStore::with_path(&path);
        store.save(&board(&[("Alice", 4.0)])).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["Alice"], serde_json::json!(4.0));
        assert!(!dir.path().join("leaderboard.json.tmp").exists());
    }

    #[test]
    fn test_loads_integer_scores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, r#"{"Zed": 10, "Amy": 2.68}"#).unwrap();
        let loaded = FileLeaderboardStore::with_path(&path).load().unwrap();
        assert_eq!(loaded.get("Zed"), Some(10.0));
        assert_eq!(loaded.entries()[0].name, "Zed");
        assert_eq!(loaded.entries()[1].name, "Amy");
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert_matches!(
            FileLeaderboardStore::with_path(&path).load(),
            Err(QuizError::Json(_))
        );
    }

    #[test]
    fn test_unwritable_path_is_persistence_error() {
        let dir = tempdir().unwrap();
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileLeaderboardStore::with_path(blocker.join("leaderboard.json"));
        assert_matches!(
            store.save(&board(&[("Alice", 1.0)])),
            Err(QuizError::Persistence { .. })
        );
    }

    #[test]
    fn test_resubmission_overwrites() {
        let mut b = board(&[("Alice", 4.0), ("Bob", 8.0)]);
        b.record("Alice", 1.0, ScorePolicy::Overwrite);
        assert_eq!(b.len(), 2);
        assert_eq!(b.get("Alice"), Some(1.0));
        assert_eq!(b.entries()[0].name, "Alice");
    }

    #[test]
    fn test_keep_best_policy() {
        let mut b = board(&[("Alice", 4.0)]);
        b.record("Alice", 1.0, ScorePolicy::KeepBest);
        assert_eq!(b.get("Alice"), Some(4.0));
        b.record("Alice", 6.0, ScorePolicy::KeepBest);
        assert_eq!(b.get("Alice"), Some(6.0));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_ranked_descending() {
        let ranked = board(&[("Alice", 4.0), ("Bob", 8.0)]).ranked();
        assert_eq!(ranked[0].name, "Bob");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].name, "Alice");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[0].to_string(), "1. Bob - 8 points");
    }

    #[test]
    fn test_ranked_ties_keep_insertion_order() {
        let ranked = board(&[("Cy", 2.0), ("Ann", 5.0), ("Bea", 2.0), ("Dan", 5.0)]).ranked();
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Dan", "Cy", "Bea"]);
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryLeaderboardStore::default();
        assert!(store.load().unwrap().is_empty());
        store.save(&board(&[("Alice", 4.0)])).unwrap();
        assert_eq!(store.load().unwrap().get("Alice"), Some(4.0));
    }

    #[test]
    fn test_policy_serde_names() {
        assert_eq!(
            serde_json::to_string(&ScorePolicy::KeepBest).unwrap(),
            "\"keep-best\""
        );
    }
}
