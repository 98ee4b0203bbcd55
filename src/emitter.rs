use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;

use crate::{
    cli::{ColorMode, Options},
    hexdump, lookup
};

/// Stateful rendering sink. Receives field/value pairs and
/// container-open/close events from the box and descriptor grammars and renders them with
/// indentation, optional coloring, offset/length annotation, table truncation and default
/// elision. All output goes straight to `out` line by line — nothing printed through the
/// emitter is ever buffered beyond the one line/row being written.
pub struct Emitter<'a>
{
    out:           &'a mut dyn Write,
    options:       Options,
    color_enabled: bool,
    indent_level:  usize
}

impl<'a> Emitter<'a>
{
    pub fn new(out: &'a mut dyn Write, options: Options) -> Self
    {
        let color_enabled = match options.color_mode
        {
            | ColorMode::On => true,
            | ColorMode::Off => false,
            | ColorMode::Auto => io::stdout().is_terminal()
        };

        Emitter { out, options, color_enabled, indent_level: 0 }
    }

    pub fn options(&self) -> &Options
    {
        &self.options
    }

    pub fn indent_level(&self) -> usize
    {
        self.indent_level
    }

    fn indent_str(&self) -> String
    {
        " ".repeat(self.indent_level * self.options.indent)
    }

    fn raw_line(&mut self, text: &str) -> io::Result<()>
    {
        let indent = self.indent_str();
        for line in text.lines()
        {
            writeln!(self.out, "{indent}{line}")?;
        }
        if text.is_empty()
        {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Open a container/leaf scope and print its canonical header line:
    /// `[type] HumanName @ 0xHHHH, 0xPPPP .. 0xEEEE (LEN)`.
    pub fn enter(&mut self, box_type: &str, header_offset: u64, payload_start: u64, payload_end: u64) -> io::Result<()>
    {
        let human = lookup::box_human_name(box_type);
        self.enter_labeled(&format!("[{box_type}] {human}"), header_offset, payload_start, payload_end)
    }

    /// Same as `enter`, but with a caller-supplied label instead of a box-registry
    /// lookup — used by the descriptor registry, whose tag space isn't a
    /// four-CC and has no `box_human_name` entry.
    pub fn enter_labeled(&mut self, label: &str, header_offset: u64, payload_start: u64, payload_end: u64) -> io::Result<()>
    {
        let mut line = label.to_string();

        if self.options.show_offsets
        {
            line.push_str(&format!(" @ 0x{header_offset:X}, 0x{payload_start:X} .. 0x{payload_end:X}"));
        }
        if self.options.show_lengths
        {
            line.push_str(&format!(" ({})", payload_end.saturating_sub(payload_start)));
        }

        let colored = if self.color_enabled { line.cyan().to_string() } else { line };
        self.raw_line(&colored)?;
        self.indent_level += 1;
        Ok(())
    }

    /// Close the most recently opened scope.
    pub fn leave(&mut self)
    {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Emit `name = value` on its own line, with an optional trailing description.
    pub fn field(&mut self, name: &str, value: &str, description: Option<&str>) -> io::Result<()>
    {
        let name_part = if self.color_enabled { name.green().to_string() } else { name.to_string() };
        let mut line = format!("{name_part} = {value}");

        if self.options.show_descriptions
        {
            if let Some(desc) = description
            {
                let desc_part = if self.color_enabled { format!("({desc})").dimmed().to_string() } else { format!("({desc})") };
                line.push_str(&format!(" {desc_part}"));
            }
        }

        self.raw_line(&line)
    }

    /// Same as `field`, but elided entirely when `value == default` unless
    /// `--defaults` is set.
    pub fn field_default(&mut self, name: &str, value: &str, default: &str, description: Option<&str>) -> io::Result<()>
    {
        if value == default && !self.options.show_defaults
        {
            return Ok(());
        }
        self.field(name, value, description)
    }

    /// A free-form annotation line nested under the current scope (e.g. a
    /// `- compatible: 'cmfc'` bullet under `ftyp`).
    pub fn note(&mut self, text: &str) -> io::Result<()>
    {
        self.raw_line(text)
    }

    /// One row of a homogeneous table, honoring `max_rows` elision: rows before the limit
    /// print normally, the row exactly at the limit is replaced by a literal `...`, and
    /// everything after is dropped silently. Call unconditionally for every row — the
    /// decision is made per call, so no whole table is ever buffered to decide this.
    pub fn table_row(&mut self, index: usize, text: &str) -> io::Result<()>
    {
        match self.options.max_rows
        {
            | None => self.raw_line(text),
            | Some(max) if index < max => self.raw_line(text),
            | Some(max) if index == max => self.raw_line("..."),
            | Some(_) => Ok(())
        }
    }

    /// The aggregate-summary row a table grammar defines (e.g.
    /// `[samples = N, time = T]`); always printed regardless of truncation.
    pub fn table_summary(&mut self, text: &str) -> io::Result<()>
    {
        self.raw_line(text)
    }

    /// Canonical hex+ASCII dump of `data`, truncated per `--rows`/`max_rows`.
    pub fn hexdump(&mut self, data: &[u8], base_offset: u64) -> io::Result<()>
    {
        let mut buf = Vec::new();
        hexdump::write_hexdump(&mut buf, data, base_offset, self.options.bytes_per_line, self.options.max_rows, self.color_enabled)?;
        let text = String::from_utf8_lossy(&buf);
        self.raw_line(text.trim_end_matches('\n'))
    }

    /// A per-box parse failure, reported without unwinding the tree.
    pub fn warn(&mut self, message: &str) -> io::Result<()>
    {
        let line = format!("WARNING: {message}");
        let colored = if self.color_enabled { line.yellow().to_string() } else { line };
        self.raw_line(&colored)
    }

    /// A per-box parse failure that also dumps the unconsumed payload.
    pub fn error_with_dump(&mut self, message: &str, offset: u64, remaining_data: &[u8]) -> io::Result<()>
    {
        let line = format!("ERROR: {message} (at offset 0x{offset:X})");
        let colored = if self.color_enabled { line.red().bold().to_string() } else { line };
        self.raw_line(&colored)?;
        if !remaining_data.is_empty()
        {
            self.hexdump(remaining_data, offset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn header_line_matches_canonical_form()
    {
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        e.enter("ftyp", 0, 8, 0x14).unwrap();
        drop(e);
        assert_eq!(String::from_utf8(buf).unwrap(), "[ftyp] FileType @ 0x0, 0x8 .. 0x14 (12)\n");
    }

    #[test]
    fn no_offsets_suppresses_at_clause()
    {
        let mut opts = Options { color_mode: ColorMode::Off, ..Options::default() };
        opts.show_offsets = false;
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, opts);
        e.enter("ftyp", 0, 8, 0x14).unwrap();
        drop(e);
        assert_eq!(String::from_utf8(buf).unwrap(), "[ftyp] FileType (12)\n");
    }

    #[test]
    fn default_elision_hides_matching_values()
    {
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, Options { color_mode: ColorMode::Off, ..Options::default() });
        e.field_default("version", "0", "0", None).unwrap();
        e.field_default("track_ID", "1", "0", None).unwrap();
        drop(e);
        assert_eq!(String::from_utf8(buf).unwrap(), "track_ID = 1\n");
    }

    #[test]
    fn indentation_scales_with_depth_and_indent_width()
    {
        let mut opts = Options { color_mode: ColorMode::Off, ..Options::default() };
        opts.indent = 2;
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, opts);
        e.enter("moov", 0, 8, 100).unwrap();
        e.field("track_ID", "1", None).unwrap();
        drop(e);
        let out = String::from_utf8(buf).unwrap();
        assert!(out.lines().nth(1).unwrap().starts_with("  track_ID"));
    }

    #[test]
    fn table_row_elides_middle_with_ellipsis()
    {
        let mut opts = Options { color_mode: ColorMode::Off, ..Options::default() };
        opts.max_rows = Some(2);
        let mut buf = Vec::new();
        let mut e = Emitter::new(&mut buf, opts);
        for i in 0..5
        {
            e.table_row(i, &format!("row {i}")).unwrap();
        }
        e.table_summary("[samples = 5]").unwrap();
        drop(e);
        assert_eq!(String::from_utf8(buf).unwrap(), "row 0\nrow 1\n...\n[samples = 5]\n");
    }
}
