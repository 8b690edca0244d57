use anyhow::bail;
use sapper_core::{Coord2, MaskedView, Session, SessionConfig};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    /// Map file, stdin when omitted
    map: Option<PathBuf>,

    /// Opening reveal as ROW,COLUMN
    #[arg(long, value_parser = super::parse_coords, default_value = "0,0")]
    start: Coord2,

    /// Give up after this many turns
    #[arg(long)]
    max_turns: Option<u32>,

    /// Print the masked view after every turn
    #[arg(long)]
    trace: bool,

    /// Print the report and transcript as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let layout = super::load_map(args.map.as_deref(), &mut std::io::stdin().lock())?;
    let config = SessionConfig {
        start: args.start,
        max_turns: args.max_turns,
    };
    let mut session = Session::new(layout, config);

    if args.trace {
        while let Some(record) = session.step()? {
            println!("{} # {:?}", record.action, record.rule);
            print!("{}", MaskedView::from_engine(session.engine()));
            if args.max_turns.is_some_and(|limit| session.turns() >= limit) {
                break;
            }
        }
    } else {
        session.run()?;
    }

    let Some(report) = session.report() else {
        bail!(
            "game still running after {} turns: {:?}",
            session.turns(),
            session.engine().state()
        );
    };

    if args.json {
        let output = serde_json::json!({
            "report": report,
            "turns": session.turns(),
            "transcript": session.transcript(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", MaskedView::from_engine(session.engine()));
        println!("{report}");
    }
    Ok(())
}
