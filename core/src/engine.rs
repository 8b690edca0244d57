use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ongoing,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ongoing
    }
}

/// Per-cell player state stored by the engine. A cell is never both visited and marked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    Hidden,
    Visited,
    Marked,
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Authoritative field: mine layout, player progress and game state.
///
/// Every action on an invalid target (out of bounds, already visited or marked, game over) is
/// silently ignored and reported as `NoChange`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    visited_count: Saturating<CellCount>,
    correctly_marked_count: Saturating<CellCount>,
    state: EngineState,
    fatal_cell: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            visited_count: Saturating(0),
            correctly_marked_count: Saturating(0),
            state: Default::default(),
            fatal_cell: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    /// Safe cells revealed so far.
    pub fn visited_count(&self) -> CellCount {
        self.visited_count.0
    }

    /// Marks placed on actual mines.
    pub fn correctly_marked_count(&self) -> CellCount {
        self.correctly_marked_count.0
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.board[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    /// The cell whose reveal or mark lost the game.
    pub fn fatal_cell(&self) -> Option<Coord2> {
        self.fatal_cell
    }

    /// Applies a single turn and returns the resulting game state.
    pub fn execute(&mut self, action: Action) -> EngineState {
        let Action { coords, kind } = action;
        let updated = match kind {
            ActionKind::Reveal => self.reveal(coords).has_update(),
            ActionKind::Mark => self.mark(coords).has_update(),
            ActionKind::AutoExplore => self.auto_explore(coords).has_update(),
        };

        if updated {
            log::debug!("{kind:?} at {coords:?} -> {:?}", self.state);
        } else {
            log::debug!("{kind:?} at {coords:?} ignored");
        }
        self.state
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.accepts_action_at(coords) {
            return RevealOutcome::NoChange;
        }

        if self.mine_layout[coords] {
            // the detonated mine stays on the board as a visited cell
            self.board[coords.to_nd_index()] = EngineCell::Visited;
            self.lose_at(coords);
            return RevealOutcome::HitMine;
        }

        self.visit(coords);
        if self.mine_layout.adjacent_mine_count(coords) == 0 {
            self.cascade_from(coords);
        }

        if self.visited_count == Saturating(self.mine_layout.safe_cell_count()) {
            self.end_game(true);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn mark(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.accepts_action_at(coords) {
            return MarkOutcome::NoChange;
        }

        self.board[coords.to_nd_index()] = EngineCell::Marked;

        if self.mine_layout[coords] {
            self.correctly_marked_count += 1;
            MarkOutcome::Marked
        } else {
            self.lose_at(coords);
            MarkOutcome::Mismarked
        }
    }

    /// Chorded reveal: once the marks around a visited cell account for its number, reveal the
    /// remaining safe neighbors, stopping as soon as the game ends.
    pub fn auto_explore(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.state.is_ongoing() || !self.mine_layout.contains_coords(coords) {
            return RevealOutcome::NoChange;
        }

        if self.board[coords.to_nd_index()] != EngineCell::Visited || self.mine_layout[coords] {
            return RevealOutcome::NoChange;
        }

        if self.count_marked_neighbors(coords) != self.mine_layout.adjacent_mine_count(coords) {
            return RevealOutcome::NoChange;
        }

        let targets: Vec<Coord2> = self
            .mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| {
                self.board[pos.to_nd_index()] == EngineCell::Hidden && !self.mine_layout[pos]
            })
            .collect();

        let mut outcome = RevealOutcome::NoChange;
        for pos in targets {
            outcome = outcome | self.reveal(pos);
            if !self.state.is_ongoing() {
                break;
            }
        }
        outcome
    }

    /// Symbol a player is allowed to see at `coords`.
    pub fn render_cell(&self, coords: Coord2) -> ViewCell {
        let has_mine = self.mine_layout[coords];
        match (self.board[coords.to_nd_index()], has_mine) {
            (EngineCell::Visited, true) => ViewCell::Exposed,
            (EngineCell::Visited, false) => {
                ViewCell::Number(self.mine_layout.adjacent_mine_count(coords))
            }
            (EngineCell::Marked, true) => ViewCell::Flagged,
            (EngineCell::Marked, false) => ViewCell::Exposed,
            (EngineCell::Hidden, true) if self.state == EngineState::Won => ViewCell::Flagged,
            (EngineCell::Hidden, _) => ViewCell::Unknown,
        }
    }

    /// Final report, only available once the game has ended.
    pub fn report(&self) -> Option<GameReport> {
        let correctly_marked = match self.state {
            EngineState::Ongoing => return None,
            EngineState::Won => self.total_mines(),
            EngineState::Lost => self.correctly_marked_count.0,
        };

        Some(GameReport {
            outcome: self.state,
            visited: self.visited_count.0,
            correctly_marked,
        })
    }

    fn accepts_action_at(&self, coords: Coord2) -> bool {
        self.state.is_ongoing()
            && self.mine_layout.contains_coords(coords)
            && self.board[coords.to_nd_index()] == EngineCell::Hidden
    }

    fn visit(&mut self, coords: Coord2) {
        self.board[coords.to_nd_index()] = EngineCell::Visited;
        self.visited_count += 1;
    }

    /// Breadth-first expansion of a zero region and its numbered border.
    fn cascade_from(&mut self, origin: Coord2) {
        let before = self.visited_count;
        let mut to_visit = VecDeque::from([origin]);

        while let Some(current) = to_visit.pop_front() {
            for pos in self.mine_layout.iter_neighbors(current) {
                if self.board[pos.to_nd_index()] != EngineCell::Hidden || self.mine_layout[pos] {
                    continue;
                }

                self.visit(pos);
                if self.mine_layout.adjacent_mine_count(pos) == 0 {
                    to_visit.push_back(pos);
                }
            }
        }

        log::trace!(
            "cascade from {origin:?} opened {} extra cells",
            (self.visited_count - before).0
        );
    }

    fn lose_at(&mut self, coords: Coord2) {
        self.fatal_cell = Some(coords);
        self.end_game(false);
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        if won {
            self.fatal_cell = None;
        }
        log::info!("game ended: {:?}", self.state);
    }

    fn count_marked_neighbors(&self, coords: Coord2) -> u8 {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos.to_nd_index()] == EngineCell::Marked)
            .count() as u8
    }
}
