use sapper_core::{
    CellCount, Coord, Coord2, GameConfig, MinefieldGenerator, RandomMinefieldGenerator, StartTile,
    format_map,
};

#[derive(clap::ValueEnum, Copy, Clone, Debug)]
enum StartTileArg {
    /// No guarantee for the opening cell
    Random,
    /// The opening cell is never a mine
    Safe,
    /// The opening cell and its neighbors are mine free
    Zero,
}

impl From<StartTileArg> for StartTile {
    fn from(arg: StartTileArg) -> Self {
        match arg {
            StartTileArg::Random => StartTile::Random,
            StartTileArg::Safe => StartTile::SimpleSafe,
            StartTileArg::Zero => StartTile::AlwaysZero,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[arg(long)]
    rows: Coord,

    #[arg(long)]
    columns: Coord,

    #[arg(long)]
    mines: CellCount,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Opening cell as ROW,COLUMN, used by --start-tile
    #[arg(long, value_parser = super::parse_coords, default_value = "0,0")]
    start: Coord2,

    #[arg(long, value_enum, default_value_t = StartTileArg::Random)]
    start_tile: StartTileArg,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let seed = args
        .seed
        .unwrap_or_else(|| chrono::Utc::now().timestamp_micros().unsigned_abs());
    log::info!("seed: {seed}");

    let config = GameConfig::new((args.rows, args.columns), args.mines);
    let layout =
        RandomMinefieldGenerator::new(seed, args.start, args.start_tile.into()).generate(config);

    print!("{}", format_map(&layout));
    Ok(())
}
