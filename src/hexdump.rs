use std::io::{self, Write};

use owo_colors::OwoColorize;

/// Write a canonical hex+ASCII dump at `bytes_per_line` bytes per
/// row, row by row, truncating at `max_rows` and appending `...` if truncated. Writes
/// directly to `w` rather than building a `String` first, so dumping a large opaque blob
/// never doubles its memory footprint.
pub fn write_hexdump<W: Write>(w: &mut W, data: &[u8], base_offset: u64, bytes_per_line: usize, max_rows: Option<usize>, colorize: bool) -> io::Result<()>
{
    let bytes_per_line = bytes_per_line.max(1);
    let total_rows = data.len().div_ceil(bytes_per_line);
    let rows_to_print = max_rows.map_or(total_rows, |m| m.min(total_rows));

    for (row, chunk) in data.chunks(bytes_per_line).enumerate()
    {
        if row >= rows_to_print
        {
            break;
        }

        let offset = base_offset + (row * bytes_per_line) as u64;
        let addr = format!("{offset:08X}");
        if colorize
        {
            write!(w, "{}  ", addr.bright_black())?;
        }
        else
        {
            write!(w, "{addr}  ")?;
        }

        for (col, byte) in chunk.iter().enumerate()
        {
            if col > 0 && col % 8 == 0
            {
                write!(w, " ")?;
            }
            write!(w, "{byte:02X} ")?;
        }

        if chunk.len() < bytes_per_line
        {
            for col in chunk.len()..bytes_per_line
            {
                if col % 8 == 0 && col > 0
                {
                    write!(w, " ")?;
                }
                write!(w, "   ")?;
            }
        }

        write!(w, " |")?;
        for &byte in chunk
        {
            let ch = if (0x20..=0x7E).contains(&byte) { byte as char } else { '.' };
            write!(w, "{ch}")?;
        }
        writeln!(w, "|")?;
    }

    if rows_to_print < total_rows
    {
        writeln!(w, "...")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn truncates_to_max_rows_with_ellipsis()
    {
        let data = vec![0xABu8; 64];
        let mut out = Vec::new();
        write_hexdump(&mut out, &data, 0, 16, Some(2), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().last().unwrap(), "...");
    }

    #[test]
    fn renders_printable_ascii_column()
    {
        let data = b"Hello, world!!!!".to_vec();
        let mut out = Vec::new();
        write_hexdump(&mut out, &data, 0, 16, None, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("|Hello, world!!!!|"));
    }
}
