use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Client-side belief about a single cell, derived only from the masked view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Belief {
    Unknown,
    Mine,
    Revealed(u8),
}

impl Default for Belief {
    fn default() -> Self {
        Self::Unknown
    }
}

impl From<ViewCell> for Belief {
    fn from(cell: ViewCell) -> Self {
        match cell {
            ViewCell::Unknown => Self::Unknown,
            ViewCell::Number(count) => Self::Revealed(count),
            ViewCell::Exposed | ViewCell::Flagged => Self::Mine,
        }
    }
}

/// Which deduction produced a decision, in priority order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Every mine around a clue is already known, chord it.
    Chord,
    /// Every mine around a clue is known, so an unknown neighbor is safe.
    SafeNeighbor,
    /// The unknown neighbors of a clue are exactly its missing mines.
    ForcedMine,
    /// Nothing could be deduced, reveal the first unknown cell.
    Guess,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub rule: Rule,
}

/// Belief grid plus the frontier of clues that still touch unknown cells.
///
/// The view is rebuilt from scratch on every [`SolverView::observe`], nothing carries over
/// between turns. A cell that used to show a number and is masked again simply becomes unknown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverView {
    beliefs: Array2<Belief>,
    frontier: Vec<Coord2>,
}

impl SolverView {
    pub fn new(size: Coord2) -> Self {
        Self {
            beliefs: Array2::default(size.to_nd_index()),
            frontier: Vec::new(),
        }
    }

    pub fn from_view(view: &MaskedView) -> Self {
        let mut solver = Self::new(view.size());
        solver.rebuild(view);
        solver
    }

    /// Replaces every belief with what `view` shows.
    pub fn observe(&mut self, view: &MaskedView) -> Result<()> {
        if view.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }
        self.rebuild(view);
        Ok(())
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.beliefs)
    }

    pub fn belief_at(&self, coords: Coord2) -> Belief {
        self.beliefs[coords.to_nd_index()]
    }

    /// Revealed clues with at least one unknown neighbor, in row-major order.
    pub fn frontier(&self) -> &[Coord2] {
        &self.frontier
    }

    /// Picks exactly one action for the current view, or `None` if there is nothing left to do.
    pub fn decide(&self) -> Option<Decision> {
        let decision = self
            .find_chord()
            .or_else(|| self.find_certain_cell())
            .or_else(|| self.guess());

        if let Some(Decision { action, rule }) = decision {
            log::debug!("{rule:?}: {:?} at {:?}", action.kind, action.coords);
        }
        decision
    }

    fn rebuild(&mut self, view: &MaskedView) {
        self.beliefs = view.cells().mapv(Belief::from);
        self.frontier = iter_coords(self.size())
            .filter(|&coords| {
                matches!(self.belief_at(coords), Belief::Revealed(_))
                    && self.count_neighbors(coords, Belief::Unknown) > 0
            })
            .collect();
    }

    fn find_chord(&self) -> Option<Decision> {
        self.frontier.iter().find_map(|&coords| {
            let clue = self.clue_at(coords)?;
            (self.count_neighbors(coords, Belief::Mine) == clue).then_some(Decision {
                action: Action::auto_explore(coords),
                rule: Rule::Chord,
            })
        })
    }

    fn find_certain_cell(&self) -> Option<Decision> {
        self.frontier.iter().find_map(|&coords| {
            let clue = self.clue_at(coords)?;
            let unknown = self.count_neighbors(coords, Belief::Unknown);
            let mines = self.count_neighbors(coords, Belief::Mine);
            if unknown == 0 {
                return None;
            }

            let (kind, rule) = if clue == mines {
                (ActionKind::Reveal, Rule::SafeNeighbor)
            } else if clue.checked_sub(mines) == Some(unknown) {
                (ActionKind::Mark, Rule::ForcedMine)
            } else {
                return None;
            };

            let target = self.first_unknown_neighbor(coords)?;
            Some(Decision {
                action: Action::new(target, kind),
                rule,
            })
        })
    }

    fn guess(&self) -> Option<Decision> {
        iter_coords(self.size())
            .find(|&coords| self.belief_at(coords) == Belief::Unknown)
            .map(|coords| Decision {
                action: Action::reveal(coords),
                rule: Rule::Guess,
            })
    }

    fn clue_at(&self, coords: Coord2) -> Option<u8> {
        match self.belief_at(coords) {
            Belief::Revealed(count) => Some(count),
            _ => None,
        }
    }

    fn count_neighbors(&self, coords: Coord2, belief: Belief) -> u8 {
        self.beliefs
            .iter_neighbor_cells(coords)
            .filter(|&neighbor| neighbor == belief)
            .count() as u8
    }

    fn first_unknown_neighbor(&self, coords: Coord2) -> Option<Coord2> {
        self.beliefs
            .iter_neighbor_cells_with_index(coords)
            .find_map(|(pos, belief)| (belief == Belief::Unknown).then_some(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(size: Coord2, text: &str) -> SolverView {
        SolverView::from_view(&MaskedView::parse(size, text).unwrap())
    }

    #[test]
    fn frontier_only_keeps_clues_touching_unknowns() {
        let solver = solver((3, 3), "???\n12?\n01?\n");

        assert_eq!(solver.frontier(), &[(1, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn chord_wins_over_every_other_rule() {
        // (0, 0) has its single mine marked and an unknown neighbor left
        let solver = solver((2, 3), "1@?\n???\n");

        assert_eq!(
            solver.decide(),
            Some(Decision {
                action: Action::auto_explore((0, 0)),
                rule: Rule::Chord,
            })
        );
    }

    #[test]
    fn satisfied_clue_never_leads_to_mark_or_guess() {
        let solver = solver((3, 3), "0??\n???\n???\n");
        let decision = solver.decide().unwrap();

        assert_ne!(decision.action.kind, ActionKind::Mark);
        assert_ne!(decision.rule, Rule::Guess);
        assert_eq!(decision.action.coords, (0, 0));
    }

    #[test]
    fn forced_mines_get_marked_first_in_scan_order() {
        // the 2 in the corner touches exactly two unknown cells
        let solver = solver((2, 2), "2?\n?1\n");

        assert_eq!(
            solver.decide(),
            Some(Decision {
                action: Action::mark((0, 1)),
                rule: Rule::ForcedMine,
            })
        );
    }

    #[test]
    fn safe_neighbor_rule_reveals_first_unknown() {
        let solver = solver((2, 3), "1@?\n???\n");
        let decision = solver.find_certain_cell().unwrap();

        assert_eq!(decision.action, Action::reveal((1, 0)));
        assert_eq!(decision.rule, Rule::SafeNeighbor);
    }

    #[test]
    fn falls_back_to_first_unknown_cell() {
        // 1s with two unknown neighbors each cannot be resolved locally
        let solver = solver((1, 4), "?1??\n");

        assert_eq!(
            solver.decide(),
            Some(Decision {
                action: Action::reveal((0, 0)),
                rule: Rule::Guess,
            })
        );
    }

    #[test]
    fn blank_board_guesses_top_left() {
        let solver = solver((2, 2), "??\n??\n");

        assert!(solver.frontier().is_empty());
        assert_eq!(solver.decide().unwrap().action, Action::reveal((0, 0)));
    }

    #[test]
    fn nothing_to_do_without_unknown_cells() {
        let solver = solver((1, 3), "@10\n");
        assert_eq!(solver.decide(), None);
    }

    #[test]
    fn observe_discards_stale_reveals() {
        let mut solver = solver((2, 2), "1?\n??\n");
        assert_eq!(solver.belief_at((0, 0)), Belief::Revealed(1));

        solver
            .observe(&MaskedView::parse((2, 2), "??\n?@\n").unwrap())
            .unwrap();

        assert_eq!(solver.belief_at((0, 0)), Belief::Unknown);
        assert_eq!(solver.belief_at((1, 1)), Belief::Mine);
        assert!(solver.frontier().is_empty());
    }

    #[test]
    fn observe_rejects_other_board_size() {
        let mut solver = SolverView::new((2, 2));
        let view = MaskedView::parse((1, 1), "?").unwrap();

        assert_eq!(solver.observe(&view), Err(GameError::InvalidBoardShape));
    }

    #[test]
    fn exposed_cells_count_as_mines() {
        let solver = solver((1, 3), "X1?\n");

        assert_eq!(solver.belief_at((0, 0)), Belief::Mine);
        assert_eq!(solver.decide().unwrap().rule, Rule::Chord);
    }
}
