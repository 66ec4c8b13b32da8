//! Rendering surface the selection controller draws on.

use std::{collections::BTreeSet, fmt};

use shared::{
    domain::{Cell, CellCoord, Highlight},
    error::FinderError,
    protocol::PuzzleData,
};

/// Letter grid plus the found-word chips, addressed by `"{row}-{col}"` coordinates.
///
/// The controller mutates a surface but never owns it.
pub trait GridSurface {
    fn cell(&self, coord: CellCoord) -> Option<&Cell>;
    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell>;
    fn add_word_chip(&mut self, word: &str);
    /// Removes the first chip showing `word`.
    fn remove_word_chip(&mut self, word: &str);
    /// Replaces the whole page with a server-rendered document.
    fn replace_document(&mut self, html: String);
    /// Drops every highlight and chip, leaving the letters.
    fn clear_highlights(&mut self);
}

/// Rectangular in-memory grid.
#[derive(Debug, Clone)]
pub struct LetterGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    chips: Vec<String>,
    document: Option<String>,
}

impl LetterGrid {
    pub fn from_rows<R, S>(rows: &[R]) -> Result<Self, FinderError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let row_count = rows.len();
        let col_count = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if row_count == 0 || col_count == 0 {
            return Err(FinderError::InvalidGrid("grid has no cells".into()));
        }

        let mut cells = Vec::with_capacity(row_count * col_count);
        for (row, letters) in rows.iter().enumerate() {
            let letters = letters.as_ref();
            if letters.len() != col_count {
                return Err(FinderError::InvalidGrid(format!(
                    "row {row} has {} cells, expected {col_count}",
                    letters.len()
                )));
            }
            for (col, letter) in letters.iter().enumerate() {
                let ch = letter.as_ref().trim().chars().next().ok_or_else(|| {
                    FinderError::InvalidGrid(format!("cell {row}-{col} has no letter"))
                })?;
                cells.push(Cell::new(CellCoord::new(row, col), ch));
            }
        }

        Ok(Self {
            rows: row_count,
            cols: col_count,
            cells,
            chips: Vec::new(),
            document: None,
        })
    }

    pub fn from_puzzle(data: &PuzzleData) -> Result<Self, FinderError> {
        Self::from_rows(&data.puzzle)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn chips(&self) -> &[String] {
        &self.chips
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn selected_coords(&self) -> BTreeSet<CellCoord> {
        self.coords_where(|cell| cell.selected)
    }

    pub fn in_word_coords(&self) -> BTreeSet<CellCoord> {
        self.coords_where(|cell| cell.in_word)
    }

    fn coords_where(&self, predicate: impl Fn(&Cell) -> bool) -> BTreeSet<CellCoord> {
        self.cells
            .iter()
            .filter(|cell| predicate(cell))
            .map(|cell| cell.coord)
            .collect()
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        (coord.row < self.rows && coord.col < self.cols).then(|| coord.row * self.cols + coord.col)
    }
}

impl GridSurface for LetterGrid {
    fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        let idx = self.index(coord)?;
        self.cells.get_mut(idx)
    }

    fn add_word_chip(&mut self, word: &str) {
        self.chips.push(word.to_string());
    }

    fn remove_word_chip(&mut self, word: &str) {
        if let Some(idx) = self.chips.iter().position(|chip| chip == word) {
            self.chips.remove(idx);
        }
    }

    fn replace_document(&mut self, html: String) {
        self.document = Some(html);
    }

    fn clear_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
            cell.in_word = false;
        }
        self.chips.clear();
    }
}

/// Text rendering: `[X]` selected, `(X)` part of a found word.
impl fmt::Display for LetterGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.chunks(self.cols).enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                match cell.highlight() {
                    Highlight::Selected => write!(f, "[{}]", cell.ch)?,
                    Highlight::InWord => write!(f, "({})", cell.ch)?,
                    Highlight::None => write!(f, " {} ", cell.ch)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/grid_tests.rs"]
mod tests;
