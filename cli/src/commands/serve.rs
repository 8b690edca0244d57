use anyhow::Context;
use sapper_core::{MaskedView, PlayEngine, TurnRequest};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Map file, read from stdin ahead of the turns when omitted
    map: Option<PathBuf>,

    /// Print the masked view once before the first turn
    #[arg(long)]
    show_initial: bool,
}

pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdin = stdin.lock();
    let mut engine = PlayEngine::new(super::load_map(args.map.as_deref(), &mut stdin)?);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.show_initial {
        write!(out, "{}", MaskedView::from_engine(&engine))?;
        out.flush()?;
    }

    if !serve_turns(&mut engine, stdin.lines(), &mut out)? {
        log::warn!("input ended before the game finished");
    }
    Ok(())
}

/// Applies turns until the game ends, printing the view after each one and the report at the
/// end. Returns whether the game finished.
fn serve_turns(
    engine: &mut PlayEngine,
    lines: impl Iterator<Item = std::io::Result<String>>,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    for line in lines {
        let line = line.context("reading turn")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<TurnRequest>() {
            Ok(turn) => match turn.action() {
                Some(action) => {
                    engine.execute(action);
                }
                None => log::debug!("turn {turn:?} is off any board, ignored"),
            },
            Err(err) => {
                log::warn!("skipping turn {line:?}: {err}");
                continue;
            }
        }

        write!(out, "{}", MaskedView::from_engine(engine))?;
        if let Some(report) = engine.report() {
            writeln!(out, "{report}")?;
            out.flush()?;
            return Ok(true);
        }
        out.flush()?;
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::parse_map;

    fn run_turns(turns: &str) -> (bool, String) {
        let mut engine = PlayEngine::new(parse_map("3 3\n.X.\n...\n..X\n").unwrap());
        let mut out = Vec::new();
        let lines = turns.lines().map(|line| Ok(line.to_string()));

        let finished = serve_turns(&mut engine, lines, &mut out).unwrap();
        (finished, String::from_utf8(out).unwrap())
    }

    #[test]
    fn winning_turns_end_with_report() {
        let (finished, out) = run_turns("0 0 0\n0 2 0\n2 0 0\n1 2 0\n0 0 0\n");

        assert!(finished);
        assert!(out.ends_with("1@1\n122\n01@\nYOU WIN!\n7 2\n"));
    }

    #[test]
    fn losing_turn_reports_game_over() {
        let (finished, out) = run_turns("0 0 0\n0 1 0\n");

        assert!(finished);
        assert_eq!(out, "1??\n???\n???\n1X?\n???\n???\nGAME OVER!\n1 0\n");
    }

    #[test]
    fn invalid_turns_still_print_the_view() {
        let (finished, out) = run_turns("-1 0 0\n7 7 1\nbogus\n");

        assert!(!finished);
        assert_eq!(out, "???\n???\n???\n???\n???\n???\n");
    }
}
