use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Expected a `rows columns` header")]
    MalformedHeader,
    #[error("Unexpected symbol {symbol:?} at row {row}, column {column}")]
    InvalidSymbol { symbol: char, row: usize, column: usize },
    #[error("Expected a `row column action` turn")]
    MalformedTurn,
    #[error("Unknown action selector {0}, expected 0, 1 or 2")]
    UnknownAction(u8),
}

pub type Result<T> = core::result::Result<T, GameError>;
