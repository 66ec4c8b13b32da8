use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FinderError;

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_newtype!(PuzzleName);
name_newtype!(VisitorId);

/// Zero-based grid position. Rendered as the `"{row}-{col}"` cell identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Signed (row, col) delta from `self` to `other`.
    pub fn delta_to(self, other: CellCoord) -> (i64, i64) {
        (
            other.row as i64 - self.row as i64,
            other.col as i64 - self.col as i64,
        )
    }

    /// True when row and column distance are both at most one.
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        let (d_row, d_col) = self.delta_to(other);
        d_row.abs() <= 1 && d_col.abs() <= 1
    }

    /// Neighbour one step along `direction`, or `None` when it would leave the
    /// non-negative quadrant.
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let row = self.row.checked_add_signed(direction.d_row as isize)?;
        let col = self.col.checked_add_signed(direction.d_col as isize)?;
        Some(CellCoord { row, col })
    }

    /// True when `self` lies inside the closed box spanned by `a` and `b`.
    pub fn within_box(self, a: CellCoord, b: CellCoord) -> bool {
        let rows = a.row.min(b.row)..=a.row.max(b.row);
        let cols = a.col.min(b.col)..=a.col.max(b.col);
        rows.contains(&self.row) && cols.contains(&self.col)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellCoord {
    type Err = FinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FinderError::InvalidCellId(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(invalid)?;
        Ok(CellCoord {
            row: row.trim().parse().map_err(|_| invalid())?,
            col: col.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Unit step between two consecutive cells of a selection. Persisted as `[d_row, d_col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "(i32, i32)", try_from = "(i32, i32)")]
pub struct Direction {
    pub d_row: i32,
    pub d_col: i32,
}

impl Direction {
    /// Step from `from` to an adjacent, distinct `to`.
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        if from == to || !from.is_adjacent(to) {
            return None;
        }
        let (d_row, d_col) = from.delta_to(to);
        Some(Direction {
            d_row: d_row as i32,
            d_col: d_col as i32,
        })
    }

    /// Unit step pointing from `from` toward any distinct `to`.
    pub fn toward(from: CellCoord, to: CellCoord) -> Option<Direction> {
        if from == to {
            return None;
        }
        let (d_row, d_col) = from.delta_to(to);
        Some(Direction {
            d_row: d_row.signum() as i32,
            d_col: d_col.signum() as i32,
        })
    }

    pub fn matches(self, from: CellCoord, to: CellCoord) -> bool {
        Direction::between(from, to) == Some(self)
    }
}

impl From<Direction> for (i32, i32) {
    fn from(value: Direction) -> Self {
        (value.d_row, value.d_col)
    }
}

impl TryFrom<(i32, i32)> for Direction {
    type Error = FinderError;

    fn try_from((d_row, d_col): (i32, i32)) -> Result<Self, Self::Error> {
        let unit = |d: i32| (-1..=1).contains(&d);
        if !unit(d_row) || !unit(d_col) || (d_row == 0 && d_col == 0) {
            return Err(FinderError::InvalidDirection { d_row, d_col });
        }
        Ok(Direction { d_row, d_col })
    }
}

/// Letter cell as shown on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub coord: CellCoord,
    pub ch: char,
    pub selected: bool,
    pub in_word: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    InWord,
    Selected,
}

impl Cell {
    pub fn new(coord: CellCoord, ch: char) -> Self {
        Self {
            coord,
            ch,
            selected: false,
            in_word: false,
        }
    }

    /// Visible highlight; an in-progress selection hides the committed one.
    pub fn highlight(&self) -> Highlight {
        if self.selected {
            Highlight::Selected
        } else if self.in_word {
            Highlight::InWord
        } else {
            Highlight::None
        }
    }
}

/// One entry of a selection chain, in its persisted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedChar {
    #[serde(rename = "char")]
    pub ch: char,
    pub row: usize,
    pub col: usize,
}

impl SelectedChar {
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }
}

impl From<&Cell> for SelectedChar {
    fn from(cell: &Cell) -> Self {
        Self {
            ch: cell.ch,
            row: cell.coord.row,
            col: cell.coord.col,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundWord {
    pub word: String,
    pub char_list: Vec<SelectedChar>,
}

impl FoundWord {
    pub fn from_selection(char_list: Vec<SelectedChar>) -> Self {
        let word = char_list.iter().map(|item| item.ch).collect();
        Self { word, char_list }
    }

    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.char_list.iter().map(SelectedChar::coord)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
