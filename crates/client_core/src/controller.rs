use shared::{
    domain::{Cell, CellCoord, Direction, FoundWord, PuzzleName, SelectedChar, VisitorId},
    error::FinderError,
    protocol::SubmissionForm,
};
use storage::SessionStore;
use tracing::{debug, error, info, warn};

use crate::{
    grid::GridSurface,
    session::{PuzzleSession, PuzzleSessionState, CHAR_LIST_KEY, DIRECTION_KEY, WORDS_KEY},
    submit::AnswerSubmitter,
};

/// What a click on a cell that already belongs to a found word does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommittedCellPolicy {
    /// The click is ignored.
    #[default]
    Ignore,
    /// The cell behaves like any other cell.
    Selectable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Ignored,
    Started,
    Extended,
    Restarted,
}

/// Tracks the in-progress selection and the found words of one puzzle instance.
pub struct GridSelectionController<S: SessionStore> {
    pub(crate) session: PuzzleSession<S>,
    pub(crate) state: PuzzleSessionState,
    pub(crate) policy: CommittedCellPolicy,
    pub(crate) dragging: bool,
}

impl<S: SessionStore> GridSelectionController<S> {
    pub fn new(puzzle: PuzzleName, store: S) -> Self {
        let session = PuzzleSession::new(puzzle, store);
        let state = session.load_state();
        Self {
            session,
            state,
            policy: CommittedCellPolicy::default(),
            dragging: false,
        }
    }

    pub fn with_policy(mut self, policy: CommittedCellPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn puzzle(&self) -> &PuzzleName {
        self.session.puzzle()
    }

    pub fn state(&self) -> &PuzzleSessionState {
        &self.state
    }

    pub fn selection(&self) -> &[SelectedChar] {
        &self.state.selection
    }

    pub fn direction(&self) -> Option<Direction> {
        self.state.direction
    }

    pub fn found_words(&self) -> &[FoundWord] {
        &self.state.words
    }

    pub fn is_selecting(&self) -> bool {
        !self.state.selection.is_empty()
    }

    pub fn store(&self) -> &S {
        self.session.store()
    }

    pub fn into_store(self) -> S {
        self.session.into_store()
    }

    /// Reloads the persisted state and redraws it from a clean surface: found words
    /// first, then the in-progress selection on top.
    pub fn rehydrate(&mut self, grid: &mut impl GridSurface) {
        self.state = self.session.load_state();
        self.dragging = false;
        grid.clear_highlights();

        for found in &self.state.words {
            for coord in found.coords() {
                update_cell(grid, coord, |cell| {
                    cell.in_word = true;
                    cell.selected = false;
                });
            }
            grid.add_word_chip(&found.word);
        }
        self.paint_selection(grid);

        info!(
            puzzle = %self.puzzle(),
            words = self.state.words.len(),
            selected = self.state.selection.len(),
            "rehydrated puzzle session"
        );
    }

    /// Begins or extends the selection at `coord`.
    pub fn click(&mut self, grid: &mut impl GridSurface, coord: CellCoord) -> SelectionOutcome {
        let Some(cell) = self.clickable_cell(grid, coord) else {
            return SelectionOutcome::Ignored;
        };

        let outcome = match self.state.selection.last().map(SelectedChar::coord) {
            None => {
                self.start_selection(&cell);
                SelectionOutcome::Started
            }
            Some(last) if !cell.selected && self.continues_from(last, coord) => {
                self.state.selection.push(SelectedChar::from(&cell));
                if self.state.selection.len() == 2 {
                    self.state.direction = Direction::between(last, coord);
                }
                SelectionOutcome::Extended
            }
            Some(_) => {
                self.clear_selection_styling(grid, Some(coord));
                self.start_selection(&cell);
                SelectionOutcome::Restarted
            }
        };

        update_cell(grid, coord, |cell| cell.selected = true);
        self.persist_selection();
        debug!(cell = %coord, ?outcome, len = self.state.selection.len(), "click");
        outcome
    }

    /// Turns the current selection into a found word. Empty selections are a no-op.
    pub fn commit(&mut self, grid: &mut impl GridSurface) -> Option<FoundWord> {
        if self.state.selection.is_empty() {
            debug!(puzzle = %self.puzzle(), "nothing selected to commit");
            return None;
        }

        let char_list = std::mem::take(&mut self.state.selection);
        self.state.direction = None;
        self.dragging = false;

        for item in &char_list {
            update_cell(grid, item.coord(), |cell| {
                cell.in_word = true;
                cell.selected = false;
            });
        }

        let found = FoundWord::from_selection(char_list);
        grid.add_word_chip(&found.word);
        self.state.words.push(found.clone());

        self.persist_words();
        self.persist_selection();
        info!(puzzle = %self.puzzle(), word = %found.word, "committed found word");
        Some(found)
    }

    /// Removes the first found word spelled `word`. Returns false when there is none.
    pub fn remove_word(&mut self, grid: &mut impl GridSurface, word: &str) -> bool {
        let Some(idx) = self.state.words.iter().position(|found| found.word == word) else {
            warn!(puzzle = %self.puzzle(), word, "no found word to remove");
            return false;
        };

        let removed = self.state.words.remove(idx);
        for coord in removed.coords() {
            update_cell(grid, coord, |cell| {
                cell.in_word = false;
                cell.selected = false;
            });
        }
        grid.remove_word_chip(&removed.word);

        // Shared cells stay highlighted while another word still claims them.
        for found in &self.state.words {
            for coord in found.coords() {
                update_cell(grid, coord, |cell| cell.in_word = true);
            }
        }
        self.paint_selection(grid);

        self.persist_words();
        info!(puzzle = %self.puzzle(), word, "removed found word");
        true
    }

    pub fn submission_form(&self, visitor: VisitorId) -> SubmissionForm {
        SubmissionForm::new(
            self.puzzle().clone(),
            visitor,
            self.state.words.iter().map(|found| found.word.as_str()),
        )
    }

    /// Posts the found words and swaps in the returned page. Failures are logged
    /// and swallowed; the user retries by submitting again.
    pub async fn submit(
        &self,
        grid: &mut impl GridSurface,
        submitter: &dyn AnswerSubmitter,
        visitor: VisitorId,
    ) -> bool {
        let form = self.submission_form(visitor);
        info!(puzzle = %form.name, answer = %form.answer, "submitting answer");
        match submitter.submit(&form).await {
            Ok(html) => {
                grid.replace_document(html);
                true
            }
            Err(err) => {
                error!(puzzle = %form.name, %err, "answer submission failed");
                false
            }
        }
    }

    pub(crate) fn clickable_cell(&self, grid: &impl GridSurface, coord: CellCoord) -> Option<Cell> {
        let Some(cell) = grid.cell(coord).copied() else {
            let err = FinderError::cell_not_found(coord);
            warn!(%err, "ignoring input on missing cell");
            return None;
        };
        if cell.in_word && self.policy == CommittedCellPolicy::Ignore {
            debug!(cell = %coord, "ignoring input on committed cell");
            return None;
        }
        Some(cell)
    }

    pub(crate) fn start_selection(&mut self, cell: &Cell) {
        self.state.selection = vec![SelectedChar::from(cell)];
        self.state.direction = None;
    }

    fn continues_from(&self, last: CellCoord, coord: CellCoord) -> bool {
        match Direction::between(last, coord) {
            Some(step) => self.state.direction.map_or(true, |locked| locked == step),
            None => false,
        }
    }

    pub(crate) fn clear_selection_styling(
        &self,
        grid: &mut impl GridSurface,
        keep: Option<CellCoord>,
    ) {
        for item in &self.state.selection {
            let coord = item.coord();
            if Some(coord) != keep {
                update_cell(grid, coord, |cell| cell.selected = false);
            }
        }
    }

    fn paint_selection(&self, grid: &mut impl GridSurface) {
        for item in &self.state.selection {
            update_cell(grid, item.coord(), |cell| cell.selected = true);
        }
    }

    pub(crate) fn persist_selection(&mut self) {
        let result = self
            .session
            .save(CHAR_LIST_KEY, &self.state.selection)
            .and_then(|_| self.session.save(DIRECTION_KEY, &self.state.direction));
        if let Err(err) = result {
            warn!(puzzle = %self.puzzle(), %err, "failed to persist selection");
        }
    }

    fn persist_words(&mut self) {
        if let Err(err) = self.session.save(WORDS_KEY, &self.state.words) {
            warn!(puzzle = %self.puzzle(), %err, "failed to persist found words");
        }
    }
}

/// Applies `f` to the cell at `coord`; missing cells are logged and skipped.
pub(crate) fn update_cell(
    grid: &mut impl GridSurface,
    coord: CellCoord,
    f: impl FnOnce(&mut Cell),
) -> bool {
    match grid.cell_mut(coord) {
        Some(cell) => {
            f(cell);
            true
        }
        None => {
            let err = FinderError::cell_not_found(coord);
            warn!(%err, "skipping missing grid cell");
            false
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
