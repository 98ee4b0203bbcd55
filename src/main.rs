use std::{fs, io::Write, process::ExitCode};

use clap::Parser;

mod bitreader;
mod boxes;
mod cli;
mod context;
mod descriptors;
mod driver;
mod emitter;
mod error;
mod hexdump;
mod lookup;

use bitreader::BitReader;
use cli::{Cli, Options};
use context::ParseContext;
use emitter::Emitter;
use error::FatalError;

fn main() -> ExitCode
{
    let cli = Cli::parse();
    let options = Options::from(&cli);

    match run(&cli, options)
    {
        | Ok(()) => ExitCode::SUCCESS,
        | Err(e) =>
        {
            eprintln!("{}: {e}", env!("CARGO_PKG_NAME"));
            ExitCode::FAILURE
        }
    }
}

/// Top-level driver: open the file, dissect its top-level box sequence,
/// and report a fatal error only if the input can't be opened or no box header at all
/// could be read. Everything else is a per-box recoverable failure the driver has already
/// reported to standard output by the time this returns.
fn run(cli: &Cli, options: Options) -> Result<(), FatalError>
{
    let data = fs::read(&cli.file).map_err(|e| FatalError(format!("cannot read '{}': {e}", cli.file.display())))?;

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let mut emitter = Emitter::new(&mut lock, options.clone());
    let mut ctx = ParseContext::root(options.senc_per_sample_iv);

    let mut reader = BitReader::new(&data);
    let any_box = driver::dissect_box_sequence(&mut reader, 0, &mut emitter, &mut ctx, None).map_err(|e| FatalError(e.to_string()))?;

    lock.flush().map_err(FatalError::from)?;

    if !any_box
    {
        return Err(FatalError(format!("'{}' contains no readable box header", cli.file.display())));
    }

    Ok(())
}
