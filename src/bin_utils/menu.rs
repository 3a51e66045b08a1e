use std::io::{self, BufRead, Write};

use crate::{command::MenuChoice, processor::Receipt};

pub fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "Choose an option:")?;
    for choice in MenuChoice::ALL {
        writeln!(output, "{}. {}", choice.number(), choice.label())?;
    }
    output.flush()
}

pub fn print_receipt<W: Write>(output: &mut W, receipt: &Receipt) -> io::Result<()> {
    writeln!(output, "{}", receipt.message)?;
    for record in receipt.records.iter().flatten() {
        writeln!(output, "{record}")?;
    }
    Ok(())
}

/// Shows `label` and reads one line. `None` means the input is exhausted.
pub fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> io::Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{label}")?;
    output.flush()?;
    read_line(input)
}

pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
