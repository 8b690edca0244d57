use alloc::string::ToString;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cell revealed before the solver takes over.
    pub start: Coord2,
    /// Stop after this many turns even if the game is still going.
    pub max_turns: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start: (0, 0),
            max_turns: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub action: Action,
    /// `None` for the opening move.
    pub rule: Option<Rule>,
    pub state_after: EngineState,
}

/// Drives one game between the engine and the solver.
///
/// The two sides only exchange text: the engine's masked view is rendered to a string and
/// parsed back before the solver sees it, and the solver's action goes through the turn format.
#[derive(Clone, Debug)]
pub struct Session {
    engine: PlayEngine,
    solver: SolverView,
    config: SessionConfig,
    transcript: Vec<TurnRecord>,
}

impl Session {
    pub fn new(mine_layout: MineLayout, config: SessionConfig) -> Self {
        let size = mine_layout.size();
        Self {
            engine: PlayEngine::new(mine_layout),
            solver: SolverView::new(size),
            config,
            transcript: Vec::new(),
        }
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn transcript(&self) -> &[TurnRecord] {
        &self.transcript
    }

    pub fn turns(&self) -> u32 {
        self.transcript.len().try_into().unwrap_or(u32::MAX)
    }

    pub fn report(&self) -> Option<GameReport> {
        self.engine.report()
    }

    /// Plays a single turn. Returns `None` once the game is over or the solver has nothing to do.
    pub fn step(&mut self) -> Result<Option<TurnRecord>> {
        if self.engine.is_finished() {
            return Ok(None);
        }

        let (action, rule) = if self.transcript.is_empty() {
            (Action::reveal(self.config.start), None)
        } else {
            let size = self.engine.size();
            let view_text = MaskedView::from_engine(&self.engine).to_string();
            self.solver.observe(&MaskedView::parse(size, &view_text)?)?;

            let Some(decision) = self.solver.decide() else {
                return Ok(None);
            };
            let action: Action = decision.action.to_string().parse()?;
            (action, Some(decision.rule))
        };

        let record = TurnRecord {
            action,
            rule,
            state_after: self.engine.execute(action),
        };
        self.transcript.push(record);
        Ok(Some(record))
    }

    /// Plays until the game ends, the solver gives up or the turn limit is hit.
    pub fn run(&mut self) -> Result<EngineState> {
        while self.config.max_turns.is_none_or(|limit| self.turns() < limit) {
            if self.step()?.is_none() {
                break;
            }
        }

        log::debug!(
            "session stopped after {} turns: {:?}",
            self.turns(),
            self.engine.state()
        );
        Ok(self.engine.state())
    }
}
