use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use huffcode::{decode_file, encode_file};

#[derive(Parser, Debug)]
#[command(version, about = "Huffman compression of whole files", long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// More output per occurrence (-v debug, -vv trace). Sizes are always
    /// reported.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Compresses INPUT into OUTPUT
    Encode { input: PathBuf, output: PathBuf },

    /// Restores the original file from a compressed INPUT
    Decode { input: PathBuf, output: PathBuf },
}

/// stderrlog level for `-v` repeated `verbose` times; 2 is info.
fn verbosity(verbose: u8) -> usize {
    2 + verbose as usize
}

fn main() -> Result<()> {
    let args = Args::parse();

    stderrlog::new()
        .quiet(args.quiet)
        .verbosity(verbosity(args.verbose))
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let stats = match &args.mode {
        Mode::Encode { input, output } => encode_file(input, output)
            .with_context(|| format!("failed to encode {}", input.display()))?,
        Mode::Decode { input, output } => decode_file(input, output)
            .with_context(|| format!("failed to decode {}", input.display()))?,
    };

    info!("Number of bytes in input : {}", stats.input_bytes);
    info!("Number of bytes in output: {}", stats.output_bytes);
    Ok(())
}
