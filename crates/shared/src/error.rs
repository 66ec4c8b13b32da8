use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("cell {row}-{col} not found")]
    CellNotFound { row: usize, col: usize },
    #[error("invalid cell id '{0}', expected '{{row}}-{{col}}'")]
    InvalidCellId(String),
    #[error("invalid direction [{d_row}, {d_col}]")]
    InvalidDirection { d_row: i32, d_col: i32 },
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("malformed session value under '{key}': {source}")]
    MalformedSession {
        key: String,
        source: serde_json::Error,
    },
    #[error("session storage failure: {0}")]
    Storage(String),
    #[error("submission failed: {0}")]
    Submission(String),
}

impl FinderError {
    pub fn cell_not_found(coord: crate::domain::CellCoord) -> Self {
        Self::CellNotFound {
            row: coord.row,
            col: coord.col,
        }
    }
}
