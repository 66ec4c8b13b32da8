//! Pointer and touch input: one drag path for both, sampled per move event.

use shared::domain::{CellCoord, Direction, SelectedChar};
use storage::SessionStore;
use tracing::debug;

use crate::{
    controller::{update_cell, GridSelectionController, SelectionOutcome},
    grid::GridSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStep {
    /// No drag in progress.
    NotDragging,
    /// Pointer is still over the last added cell.
    SameCell,
    /// The hovered cell continues the line and was added.
    Appended(CellCoord),
    /// The hovered cell is off the line; the next cell on the line was added instead.
    Synthesized(CellCoord),
    /// Nothing on the line lies toward the pointer, or the next cell is off the grid.
    Skipped,
}

impl<S: SessionStore> GridSelectionController<S> {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Starts a fresh chain at `coord`, dropping any previous selection.
    pub fn pointer_down(
        &mut self,
        grid: &mut impl GridSurface,
        coord: CellCoord,
    ) -> SelectionOutcome {
        let Some(cell) = self.clickable_cell(grid, coord) else {
            return SelectionOutcome::Ignored;
        };

        let had_selection = self.is_selecting();
        self.clear_selection_styling(grid, Some(coord));
        self.start_selection(&cell);
        update_cell(grid, coord, |cell| cell.selected = true);
        self.dragging = true;
        self.persist_selection();

        if had_selection {
            SelectionOutcome::Restarted
        } else {
            SelectionOutcome::Started
        }
    }

    /// Extends the chain toward the hovered cell, adding at most one cell.
    pub fn pointer_move(&mut self, grid: &mut impl GridSurface, hovered: CellCoord) -> DragStep {
        if !self.dragging {
            return DragStep::NotDragging;
        }
        let Some(last) = self.state.selection.last().map(SelectedChar::coord) else {
            return DragStep::NotDragging;
        };
        if hovered == last {
            return DragStep::SameCell;
        }

        let (next, direction) = match self.state.direction {
            Some(direction) if direction.matches(last, hovered) => (hovered, direction),
            Some(direction) => match last.step(direction) {
                Some(next) if next.within_box(last, hovered) => (next, direction),
                _ => {
                    debug!(cell = %hovered, "pointer left the locked line");
                    return DragStep::Skipped;
                }
            },
            None => {
                let Some(direction) = Direction::toward(last, hovered) else {
                    return DragStep::SameCell;
                };
                match last.step(direction) {
                    Some(next) => (next, direction),
                    None => return DragStep::Skipped,
                }
            }
        };

        let Some(cell) = grid.cell(next).copied() else {
            debug!(cell = %next, "next cell on the line is off the grid");
            return DragStep::Skipped;
        };

        self.state.selection.push(SelectedChar::from(&cell));
        self.state.direction = Some(direction);
        update_cell(grid, next, |cell| cell.selected = true);
        self.persist_selection();

        if next == hovered {
            DragStep::Appended(next)
        } else {
            DragStep::Synthesized(next)
        }
    }

    /// Ends the drag. The selection stays in place for a later commit.
    pub fn pointer_up(&mut self) -> bool {
        std::mem::replace(&mut self.dragging, false)
    }
}

#[cfg(test)]
#[path = "tests/drag_tests.rs"]
mod tests;
