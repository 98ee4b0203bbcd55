use std::path::PathBuf;

use clap::Parser;

/// Dissect an ISO Base Media File Format (MP4/QuickTime/CMAF/HEIF) box tree.
#[derive(Parser)]
#[command(name = "isobmff-dissect")]
#[command(about = "Streaming dissector for ISO Base Media File Format box trees")]
#[command(version)]
pub struct Cli
{
    /// Path to the file to dissect
    pub file: PathBuf,

    /// Force color on
    #[arg(short = 'C', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Force color off
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Truncate tables and hex dumps to N lines
    #[arg(short = 'r', long = "rows")]
    pub rows: Option<usize>,

    /// Hide byte offset annotation on box headers
    #[arg(long = "no-offsets")]
    pub no_offsets: bool,

    /// Hide payload length annotation on box headers
    #[arg(long = "no-lengths")]
    pub no_lengths: bool,

    /// Hide human-readable descriptions on enumerated fields
    #[arg(long = "no-descriptions")]
    pub no_descriptions: bool,

    /// Emit fields even when they equal their spec default
    #[arg(long = "defaults")]
    pub defaults: bool,

    /// Spaces per indentation level
    #[arg(long = "indent", default_value_t = 4)]
    pub indent: usize,

    /// Hex-dump line width in bytes
    #[arg(long = "bytes-per-line", default_value_t = 16)]
    pub bytes_per_line: usize,

    /// Per-sample IV size to assume for `senc` when no `tenc` is in scope
    #[arg(long = "senc-per-sample-iv")]
    pub senc_per_sample_iv: Option<u8>
}

/// Color forcing requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode
{
    Auto,
    On,
    Off
}

/// Fully-resolved rendering options, threaded by reference through the whole dissection
/// (the enumerated formatting options below).
#[derive(Debug, Clone)]
pub struct Options
{
    pub color_mode:         ColorMode,
    pub show_offsets:       bool,
    pub show_lengths:       bool,
    pub show_descriptions:  bool,
    pub show_defaults:      bool,
    pub indent:             usize,
    pub bytes_per_line:     usize,
    pub max_rows:           Option<usize>,
    pub senc_per_sample_iv: Option<u8>
}

impl From<&Cli> for Options
{
    fn from(cli: &Cli) -> Self
    {
        let color_mode = if cli.color
        {
            ColorMode::On
        }
        else if cli.no_color
        {
            ColorMode::Off
        }
        else
        {
            ColorMode::Auto
        };

        Options {
            color_mode,
            show_offsets: !cli.no_offsets,
            show_lengths: !cli.no_lengths,
            show_descriptions: !cli.no_descriptions,
            show_defaults: cli.defaults,
            indent: cli.indent,
            bytes_per_line: cli.bytes_per_line.max(1),
            max_rows: cli.rows,
            senc_per_sample_iv: cli.senc_per_sample_iv
        }
    }
}

impl Default for Options
{
    fn default() -> Self
    {
        Options {
            color_mode: ColorMode::Auto,
            show_offsets: true,
            show_lengths: true,
            show_descriptions: true,
            show_defaults: false,
            indent: 4,
            bytes_per_line: 16,
            max_rows: None,
            senc_per_sample_iv: None
        }
    }
}
