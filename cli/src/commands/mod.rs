use anyhow::{Context, bail};
use sapper_core::{Coord, Coord2, MineLayout, parse_map, split_header};
use std::io::BufRead;
use std::path::Path;

pub mod decide;
pub mod generate;
pub mod play;
pub mod serve;

/// Reads the whole of `path`, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("reading stdin"),
    }
}

/// Reads a map from the front of `lines`, leaving whatever follows it unread.
pub fn read_map_lines(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> anyhow::Result<MineLayout> {
    let mut text = String::new();
    let mut expected = None;
    let mut seen = 0;

    while expected.is_none_or(|expected| seen < expected) {
        let Some(line) = lines.next() else {
            bail!("map ended early");
        };
        let line = line.context("reading map")?;
        if line.trim().is_empty() {
            continue;
        }

        if expected.is_some() {
            seen += line.chars().filter(|c| !c.is_whitespace()).count();
        } else {
            let ((rows, columns), _) = split_header(&line)?;
            expected = Some(usize::from(rows) * usize::from(columns));
        }
        text.push_str(&line);
        text.push('\n');
    }

    Ok(parse_map(&text)?)
}

pub fn load_map(path: Option<&Path>, stdin: &mut impl BufRead) -> anyhow::Result<MineLayout> {
    let layout = match path {
        Some(path) => parse_map(&read_input(Some(path))?)
            .with_context(|| format!("parsing map {}", path.display()))?,
        None => read_map_lines(&mut stdin.lines())?,
    };
    log::info!(
        "loaded {}x{} map with {} mines",
        layout.size().0,
        layout.size().1,
        layout.mine_count()
    );
    Ok(layout)
}

/// Parses `ROW,COLUMN`.
pub fn parse_coords(text: &str) -> Result<Coord2, String> {
    let (row, column) = text
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN, got {text:?}"))?;
    let parse = |value: &str| {
        value
            .trim()
            .parse::<Coord>()
            .map_err(|err| format!("{value:?}: {err}"))
    };
    Ok((parse(row)?, parse(column)?))
}
