use core::fmt;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What the masked view shows for a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewCell {
    /// `?`
    Unknown,
    /// `0`-`8`
    Number(u8),
    /// `X`: a detonated mine or a mark on a safe cell.
    Exposed,
    /// `@`: a correctly marked mine, or any mine once the game is won.
    Flagged,
}

impl ViewCell {
    pub const fn symbol(self) -> char {
        match self {
            Self::Unknown => '?',
            Self::Number(count) => (b'0' + count) as char,
            Self::Exposed => 'X',
            Self::Flagged => '@',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            '?' => Self::Unknown,
            '0'..='8' => Self::Number(symbol as u8 - b'0'),
            'X' => Self::Exposed,
            '@' => Self::Flagged,
            _ => return None,
        })
    }
}

impl Default for ViewCell {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Partial, player-visible rendering of the field. This is the only thing the solver ever sees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedView {
    cells: Array2<ViewCell>,
}

impl MaskedView {
    pub fn from_engine(engine: &PlayEngine) -> Self {
        let size = engine.size();
        let mut cells = Array2::default(size.to_nd_index());
        for coords in iter_coords(size) {
            cells[coords.to_nd_index()] = engine.render_cell(coords);
        }
        Self { cells }
    }

    /// Reads `rows * columns` symbols, ignoring any whitespace between them.
    pub fn parse(size: Coord2, text: &str) -> Result<Self> {
        let (rows, columns) = (usize::from(size.0), usize::from(size.1));
        let mut cells = Array2::default(size.to_nd_index());
        let mut symbols = text.chars().filter(|symbol| !symbol.is_whitespace());

        for row in 0..rows {
            for column in 0..columns {
                let symbol = symbols.next().ok_or(GameError::InvalidBoardShape)?;
                cells[[row, column]] = ViewCell::from_symbol(symbol).ok_or(
                    GameError::InvalidSymbol {
                        symbol,
                        row,
                        column,
                    },
                )?;
            }
        }

        if symbols.next().is_some() {
            return Err(GameError::InvalidBoardShape);
        }

        Ok(Self { cells })
    }

    /// Reads a `rows columns` header line followed by the grid.
    pub fn parse_with_header(text: &str) -> Result<Self> {
        let (size, grid) = split_header(text)?;
        Self::parse(size, grid)
    }

    pub fn size(&self) -> Coord2 {
        array_size(&self.cells)
    }

    pub fn cell_at(&self, coords: Coord2) -> ViewCell {
        self.cells[coords.to_nd_index()]
    }

    pub(crate) fn cells(&self) -> &Array2<ViewCell> {
        &self.cells
    }
}

impl fmt::Display for MaskedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;

        for row in self.cells.rows() {
            for cell in row {
                f.write_char(cell.symbol())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn symbols_map_both_ways() {
        for symbol in ['?', '0', '5', '8', 'X', '@'] {
            let cell = ViewCell::from_symbol(symbol).unwrap();
            assert_eq!(cell.symbol(), symbol);
        }
        assert_eq!(ViewCell::from_symbol('9'), None);
        assert_eq!(ViewCell::from_symbol('.'), None);
    }

    #[test]
    fn parse_reads_grid_and_ignores_whitespace() {
        let view = MaskedView::parse((2, 3), "1@1\n 1 2 ?\n").unwrap();

        assert_eq!(view.cell_at((0, 1)), ViewCell::Flagged);
        assert_eq!(view.cell_at((1, 1)), ViewCell::Number(2));
        assert_eq!(view.cell_at((1, 2)), ViewCell::Unknown);
        assert_eq!(view.to_string(), "1@1\n12?\n");
    }

    #[test]
    fn parse_rejects_short_and_long_grids() {
        assert_eq!(
            MaskedView::parse((2, 2), "???"),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            MaskedView::parse((1, 2), "???"),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn parse_reports_bad_symbol_position() {
        assert_eq!(
            MaskedView::parse((2, 2), "??\n?*"),
            Err(GameError::InvalidSymbol {
                symbol: '*',
                row: 1,
                column: 1
            })
        );
    }

    #[test]
    fn parse_with_header_reads_size() {
        let view = MaskedView::parse_with_header("2 3\n???\n12?\n").unwrap();
        assert_eq!(view.size(), (2, 3));
        assert_eq!(view.cell_at((1, 0)), ViewCell::Number(1));
    }

    #[test]
    fn fresh_engine_renders_all_unknown() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        let engine = PlayEngine::new(layout);

        assert_eq!(MaskedView::from_engine(&engine).to_string(), "??\n??\n");
    }

    #[test]
    fn won_game_flags_unvisited_mines() {
        // a won game never leaves safe cells unvisited, so only mines change symbol
        let layout = MineLayout::from_mine_coords((1, 3), &[(0, 0)]).unwrap();
        let mut engine = PlayEngine::new(layout);
        engine.reveal((0, 2));

        assert_eq!(engine.state(), EngineState::Won);
        assert_eq!(MaskedView::from_engine(&engine).to_string(), "@10\n");
    }
}
