//! Line-oriented text formats shared by the server and client roles.
//!
//! * map: a `rows columns` header, then the grid with `X` for a mine and `.` for an empty cell
//! * turn: `row column action`, where the action selector is `0` (reveal), `1` (mark) or
//!   `2` (auto-explore)
//! * report: `YOU WIN!` or `GAME OVER!`, then `visited correctly_marked`

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Reveal,
    Mark,
    AutoExplore,
}

impl ActionKind {
    pub const fn selector(self) -> u8 {
        match self {
            Self::Reveal => 0,
            Self::Mark => 1,
            Self::AutoExplore => 2,
        }
    }
}

impl TryFrom<u8> for ActionKind {
    type Error = GameError;

    fn try_from(selector: u8) -> Result<Self> {
        match selector {
            0 => Ok(Self::Reveal),
            1 => Ok(Self::Mark),
            2 => Ok(Self::AutoExplore),
            _ => Err(GameError::UnknownAction(selector)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub coords: Coord2,
    pub kind: ActionKind,
}

impl Action {
    pub const fn new(coords: Coord2, kind: ActionKind) -> Self {
        Self { coords, kind }
    }

    pub const fn reveal(coords: Coord2) -> Self {
        Self::new(coords, ActionKind::Reveal)
    }

    pub const fn mark(coords: Coord2) -> Self {
        Self::new(coords, ActionKind::Mark)
    }

    pub const fn auto_explore(coords: Coord2) -> Self {
        Self::new(coords, ActionKind::AutoExplore)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, column) = self.coords;
        write!(f, "{row} {column} {}", self.kind.selector())
    }
}

impl FromStr for Action {
    type Err = GameError;

    fn from_str(line: &str) -> Result<Self> {
        line.parse::<TurnRequest>()?
            .action()
            .ok_or(GameError::InvalidCoords)
    }
}

/// A turn as typed by the driver. Coordinates may be negative or too large for any board,
/// such turns are valid input but never reach the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnRequest {
    pub row: i64,
    pub column: i64,
    pub kind: ActionKind,
}

impl TurnRequest {
    pub fn action(self) -> Option<Action> {
        let row = Coord::try_from(self.row).ok()?;
        let column = Coord::try_from(self.column).ok()?;
        Some(Action::new((row, column), self.kind))
    }
}

impl FromStr for TurnRequest {
    type Err = GameError;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let mut next_field = || fields.next().ok_or(GameError::MalformedTurn);

        let row = next_field()?
            .parse()
            .map_err(|_| GameError::MalformedTurn)?;
        let column = next_field()?
            .parse()
            .map_err(|_| GameError::MalformedTurn)?;
        let selector: u8 = next_field()?
            .parse()
            .map_err(|_| GameError::MalformedTurn)?;
        let kind = ActionKind::try_from(selector)?;

        if fields.next().is_some() {
            return Err(GameError::MalformedTurn);
        }

        Ok(Self { row, column, kind })
    }
}

/// Splits a leading `rows columns` header off `text`, returning the size and the remainder.
pub fn split_header(text: &str) -> Result<(Coord2, &str)> {
    let text = text.trim_start();
    let (header, rest) = text.split_once('\n').unwrap_or((text, ""));

    let mut fields = header.split_whitespace();
    let mut next_dim = || -> Result<Coord> {
        fields
            .next()
            .and_then(|field| field.parse().ok())
            .ok_or(GameError::MalformedHeader)
    };
    let size = (next_dim()?, next_dim()?);

    if fields.next().is_some() {
        return Err(GameError::MalformedHeader);
    }

    Ok((size, rest))
}

/// Parses a map in loader format into a mine layout.
pub fn parse_map(text: &str) -> Result<MineLayout> {
    let (size, grid) = split_header(text)?;
    let (rows, columns) = (usize::from(size.0), usize::from(size.1));

    let mut cells = Vec::with_capacity(rows * columns);
    let mut symbols = grid.chars().filter(|symbol| !symbol.is_whitespace());

    for row in 0..rows {
        for column in 0..columns {
            let symbol = symbols.next().ok_or(GameError::InvalidBoardShape)?;
            cells.push(match symbol {
                'X' => true,
                '.' => false,
                _ => {
                    return Err(GameError::InvalidSymbol {
                        symbol,
                        row,
                        column,
                    });
                }
            });
        }
    }

    if symbols.next().is_some() {
        return Err(GameError::InvalidBoardShape);
    }

    MineLayout::from_row_major(size, cells)
}

/// Formats a mine layout in loader format, the inverse of [`parse_map`].
pub fn format_map(layout: &MineLayout) -> String {
    use fmt::Write;

    let (rows, columns) = layout.size();
    let mut text = String::new();
    let _ = writeln!(text, "{rows} {columns}");
    for row in 0..rows {
        for column in 0..columns {
            text.push(if layout[(row, column)] { 'X' } else { '.' });
        }
        text.push('\n');
    }
    text
}

/// Summary printed when a game ends. On a win every mine counts as correctly marked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: EngineState,
    pub visited: CellCount,
    pub correctly_marked: CellCount,
}

impl GameReport {
    pub const fn headline(&self) -> &'static str {
        match self.outcome {
            EngineState::Won => "YOU WIN!",
            _ => "GAME OVER!",
        }
    }
}

impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} {}",
            self.headline(),
            self.visited,
            self.correctly_marked
        )
    }
}
