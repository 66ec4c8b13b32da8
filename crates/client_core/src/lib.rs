//! Word finder selection logic: the grid selection controller, the surface it
//! draws on, session persistence per puzzle and answer submission.

pub mod controller;
pub mod drag;
pub mod grid;
pub mod hint;
pub mod session;
pub mod submit;

pub use controller::{CommittedCellPolicy, GridSelectionController, SelectionOutcome};
pub use drag::DragStep;
pub use grid::{GridSurface, LetterGrid};
pub use hint::HintPanel;
pub use session::{PuzzleSession, PuzzleSessionState};
pub use submit::{AnswerSubmitter, HttpAnswerSubmitter};
