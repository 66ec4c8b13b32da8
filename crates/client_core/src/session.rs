use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Direction, FoundWord, PuzzleName, SelectedChar},
    error::FinderError,
};
use storage::SessionStore;
use tracing::warn;

pub const CHAR_LIST_KEY: &str = "char_list";
pub const WORDS_KEY: &str = "words";
pub const DIRECTION_KEY: &str = "currDirection";

/// Everything the controller keeps for one puzzle instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleSessionState {
    pub selection: Vec<SelectedChar>,
    pub direction: Option<Direction>,
    pub words: Vec<FoundWord>,
}

/// Session store view namespaced as `"{puzzle}_{key}"`.
pub struct PuzzleSession<S> {
    puzzle: PuzzleName,
    store: S,
}

impl<S: SessionStore> PuzzleSession<S> {
    pub fn new(puzzle: PuzzleName, store: S) -> Self {
        Self { puzzle, store }
    }

    pub fn puzzle(&self) -> &PuzzleName {
        &self.puzzle
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn key(&self, key: &str) -> String {
        format!("{}_{key}", self.puzzle)
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FinderError> {
        let full_key = self.key(key);
        let raw = self
            .store
            .get_item(&full_key)
            .map_err(|err| FinderError::Storage(format!("{err:#}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        serde_json::from_str::<Option<T>>(&raw).map_err(|source| FinderError::MalformedSession {
            key: full_key,
            source,
        })
    }

    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), FinderError> {
        let full_key = self.key(key);
        let raw = serde_json::to_string(value).map_err(|source| FinderError::MalformedSession {
            key: full_key.clone(),
            source,
        })?;
        self.store
            .set_item(&full_key, raw)
            .map_err(|err| FinderError::Storage(format!("{err:#}")))
    }

    /// Reads the persisted state. Missing or unreadable values count as empty.
    pub fn load_state(&self) -> PuzzleSessionState {
        let words: Vec<FoundWord> = self.load_or_default(WORDS_KEY);
        let selection: Vec<SelectedChar> = self.load_or_default(CHAR_LIST_KEY);
        let stored_direction: Option<Direction> = self.load_or_default(DIRECTION_KEY);

        match chain_direction(&selection) {
            Ok(direction) => {
                if selection.len() >= 2 && stored_direction != direction {
                    warn!(
                        puzzle = %self.puzzle,
                        "persisted direction disagrees with selection, using selection"
                    );
                }
                PuzzleSessionState {
                    selection,
                    direction,
                    words,
                }
            }
            Err(reason) => {
                warn!(puzzle = %self.puzzle, reason, "discarding persisted selection");
                PuzzleSessionState {
                    selection: Vec::new(),
                    direction: None,
                    words,
                }
            }
        }
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                warn!(puzzle = %self.puzzle, %err, "treating session value as empty");
                T::default()
            }
        }
    }
}

/// Direction locked by a persisted chain, or why the chain is not a straight line.
fn chain_direction(selection: &[SelectedChar]) -> Result<Option<Direction>, &'static str> {
    let mut locked = None;
    for pair in selection.windows(2) {
        let step = Direction::between(pair[0].coord(), pair[1].coord())
            .ok_or("consecutive cells are not adjacent")?;
        match locked {
            None => locked = Some(step),
            Some(direction) if direction != step => return Err("cells change direction"),
            Some(_) => {}
        }
    }
    Ok(locked)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
