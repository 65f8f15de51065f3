use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Append quotes to a language file, one per line.
///
/// The file is created if missing and never truncated, so an interrupted run
/// leaves a valid prefix behind. A quote that already ends in a newline is
/// written as-is. Returns the number of quotes written.
pub fn append_quotes<'a, I>(path: &Path, quotes: I) -> io::Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    let mut written = 0;
    for quote in quotes {
        writer.write_all(quote.as_bytes())?;
        if !quote.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}
