use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartTile {
    Random,
    SimpleSafe,
    AlwaysZero,
}

impl Default for StartTile {
    fn default() -> Self {
        Self::Random
    }
}
