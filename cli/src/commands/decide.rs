use anyhow::bail;
use sapper_core::{MaskedView, SolverView};

#[derive(clap::Args, Debug)]
pub struct DecideArgs {
    /// Also print which rule produced the action
    #[arg(long)]
    explain: bool,
}

/// Reads `rows columns` and the masked grid from stdin and prints the solver's next turn.
pub fn run(args: DecideArgs) -> anyhow::Result<()> {
    let text = super::read_input(None)?;
    let view = MaskedView::parse_with_header(&text)?;

    let Some(decision) = SolverView::from_view(&view).decide() else {
        bail!("no unknown cells left to act on");
    };

    if args.explain {
        println!("{} # {:?}", decision.action, decision.rule);
    } else {
        println!("{}", decision.action);
    }
    Ok(())
}
