use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::constants::HIGH_SCORE_SLOTS;

#[derive(Debug, Error)]
pub enum ScoreFileError {
    #[error("high score file unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("high score file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

impl ScoreFileError {
    fn is_missing(&self) -> bool {
        matches!(self, ScoreFileError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

pub trait ScoreStore {
    fn load(&self) -> Result<Vec<u32>, ScoreFileError>;
    fn save(&self, scores: &[u32]) -> Result<(), ScoreFileError>;
}

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<u32>, ScoreFileError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, scores: &[u32]) -> Result<(), ScoreFileError> {
        fs::write(&self.path, serde_json::to_string(scores)?)?;
        Ok(())
    }
}

/// The top ten, highest first. Always exactly `HIGH_SCORE_SLOTS` entries, zero padded.
pub struct HighScoreBoard {
    entries: [u32; HIGH_SCORE_SLOTS],
    store: Box<dyn ScoreStore>,
}

impl HighScoreBoard {
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let loaded = match store.load() {
            Ok(scores) => scores,
            Err(e) if e.is_missing() => {
                info!("No high score file yet, starting fresh.");
                Vec::new()
            }
            Err(e) => {
                warn!("Ignoring high scores: {}", e);
                Vec::new()
            }
        };
        HighScoreBoard { entries: normalize(loaded), store }
    }

    pub fn entries(&self) -> &[u32; HIGH_SCORE_SLOTS] {
        &self.entries
    }

    pub fn best(&self) -> u32 {
        self.entries[0]
    }

    pub fn lowest(&self) -> u32 {
        self.entries[HIGH_SCORE_SLOTS - 1]
    }

    pub fn qualifies(&self, score: u32) -> bool {
        score > self.lowest()
    }

    pub fn insert(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        let mut scores = self.entries.to_vec();
        scores.push(score);
        self.entries = normalize(scores);
        self.save();
        true
    }

    fn save(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            warn!("Could not save high scores: {}", e);
        }
    }
}

fn normalize(mut scores: Vec<u32>) -> [u32; HIGH_SCORE_SLOTS] {
    scores.sort_unstable_by(|a, b| b.cmp(a));
    scores.resize(HIGH_SCORE_SLOTS, 0);
    let mut entries = [0; HIGH_SCORE_SLOTS];
    entries.copy_from_slice(&scores);
    entries
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// In-memory store; `saved` is shared so tests can inspect writes.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryStore {
        pub(crate) initial: Option<Vec<u32>>,
        pub(crate) saved: Rc<RefCell<Vec<Vec<u32>>>>,
        pub(crate) fail_writes: bool,
    }

    impl ScoreStore for MemoryStore {
        fn load(&self) -> Result<Vec<u32>, ScoreFileError> {
            match &self.initial {
                Some(scores) => Ok(scores.clone()),
                None => Err(io::Error::from(io::ErrorKind::NotFound).into()),
            }
        }

        fn save(&self, scores: &[u32]) -> Result<(), ScoreFileError> {
            if self.fail_writes {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied).into());
            }
            self.saved.borrow_mut().push(scores.to_vec());
            Ok(())
        }
    }

    fn scratch_file() -> (PathBuf, TempDir) {
        let dir = TempDir::new().unwrap();
        (dir.path().join("high_scores.json"), dir)
    }

    #[test]
    fn missing_store_loads_ten_zeros() {
        let board = HighScoreBoard::load(Box::new(MemoryStore::default()));
        assert_eq!(board.entries(), &[0; 10]);
    }

    #[test]
    fn short_and_long_lists_are_normalized() {
        let store = MemoryStore { initial: Some(vec![5, 300, 20]), ..Default::default() };
        let board = HighScoreBoard::load(Box::new(store));
        assert_eq!(board.entries(), &[300, 20, 5, 0, 0, 0, 0, 0, 0, 0]);

        let long = (1..=12).collect();
        let store = MemoryStore { initial: Some(long), ..Default::default() };
        let board = HighScoreBoard::load(Box::new(store));
        assert_eq!(board.entries(), &[12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn insert_keeps_ten_sorted_entries_and_persists() {
        let store = MemoryStore { initial: Some(vec![100; 10]), ..Default::default() };
        let saved = store.saved.clone();
        let mut board = HighScoreBoard::load(Box::new(store));
        assert!(board.insert(250));
        assert_eq!(board.entries().len(), 10);
        assert_eq!(board.best(), 250);
        assert_eq!(board.entries()[1..], [100; 9]);
        assert_eq!(saved.borrow().last().map(Vec::as_slice), Some(&board.entries()[..]));
    }

    #[test]
    fn insert_not_beating_the_minimum_changes_nothing() {
        let store = MemoryStore { initial: Some(vec![50; 10]), ..Default::default() };
        let saved = store.saved.clone();
        let mut board = HighScoreBoard::load(Box::new(store));
        assert!(!board.qualifies(50));
        assert!(!board.insert(50));
        assert!(!board.insert(10));
        assert_eq!(board.entries(), &[50; 10]);
        assert!(saved.borrow().is_empty());
    }

    #[test]
    fn zero_never_qualifies_on_an_empty_board() {
        let board = HighScoreBoard::load(Box::new(MemoryStore::default()));
        assert!(!board.qualifies(0));
        assert!(board.qualifies(1));
    }

    #[test]
    fn failed_writes_are_swallowed() {
        let store = MemoryStore { fail_writes: true, ..Default::default() };
        let mut board = HighScoreBoard::load(Box::new(store));
        assert!(board.insert(70));
        assert_eq!(board.best(), 70);
    }

    #[test]
    fn json_file_round_trip() {
        let (path, _dir) = scratch_file();
        let mut board = HighScoreBoard::load(Box::new(JsonFileStore::new(&path)));
        board.insert(1200);
        board.insert(640);

        let reloaded = HighScoreBoard::load(Box::new(JsonFileStore::new(&path)));
        assert_eq!(reloaded.entries(), &[1200, 640, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn corrupt_file_loads_as_zeros() {
        for (name, contents) in [("garbage", "not json"), ("negative", "[10, -5]"), ("object", "{\"a\": 1}")] {
            let (path, _dir) = scratch_file();
            fs::write(&path, contents).unwrap();
            let board = HighScoreBoard::load(Box::new(JsonFileStore::new(&path)));
            assert_eq!(board.entries(), &[0; 10], "{name}");
        }
    }
}
