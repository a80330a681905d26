//! Interactive master/detail loop over an already-fetched list.
//!
//! Reads one command per line: a row number opens that breed, `l` reprints the
//! list, `q` (or EOF) quits. No network access happens here.

use std::io::{self, BufRead, Write};

use crate::display::ListPresenter;

const PROMPT: &str = "row number, l(ist), q(uit)> ";

pub fn browse(
    list: &ListPresenter<'_>,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    write!(out, "{list}")?;
    if list.is_empty() {
        return Ok(());
    }

    write!(out, "{PROMPT}")?;
    out.flush()?;
    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" => {}
            "q" | "quit" => break,
            "l" | "list" => write!(out, "{list}")?,
            cmd => match cmd.parse::<usize>().ok().and_then(|row| list.select(row)) {
                Some(detail) => writeln!(out, "{detail}")?,
                None => writeln!(out, "No row {cmd:?} (0-{})", list.len() - 1)?,
            },
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)
}
