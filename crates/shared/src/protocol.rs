use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PuzzleName, VisitorId};

/// Multipart body posted to `/submission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub name: PuzzleName,
    pub visitor: VisitorId,
    pub answer: String,
}

impl SubmissionForm {
    pub fn new<'a>(
        name: PuzzleName,
        visitor: VisitorId,
        words: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            name,
            visitor,
            answer: normalized_answer(words),
        }
    }

    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("visitor", self.visitor.as_str()),
            ("answer", self.answer.as_str()),
        ]
    }
}

/// Lower-cases, sorts and comma-joins found words.
pub fn normalized_answer<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut answer: Vec<String> = words.into_iter().map(str::to_lowercase).collect();
    answer.sort();
    answer.join(",")
}

/// Puzzle payload as rendered by the game server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleData {
    pub puzzle: Vec<Vec<String>>,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub key: BTreeMap<String, serde_json::Value>,
}

impl PuzzleData {
    /// Builds a payload from plain text, one grid row per non-empty line.
    pub fn from_text(text: &str) -> Self {
        let puzzle = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|ch| !ch.is_whitespace())
                    .map(|ch| ch.to_string())
                    .collect()
            })
            .collect();
        Self {
            puzzle,
            words: Vec::new(),
            key: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
