use libqso::{hexdump, BatchContext, Overlay, OverlayColour, DIRECTORY_FILE};
use std::{fs, path::PathBuf};
use tracing::{info, Level};
use ysfpic::{copy_photos, fonts::font_chain};

use anyhow::{bail, Context, Result};
use clap::Parser;

#[cfg(not(debug_assertions))]
const DEFAULT_DEBUG_LEVEL: u8 = 1;
#[cfg(debug_assertions)]
const DEFAULT_DEBUG_LEVEL: u8 = 99;

const DUMP_WIDTH: usize = 16;

/// Copies photographs onto a Yaesu System Fusion memory card as received pictures
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Turn debugging information on
    #[arg(short, long, default_value_t = DEFAULT_DEBUG_LEVEL, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// The callsign written to every entry
    callsign: String,

    /// The radio id written to every entry
    radio_id: String,

    /// The output directory (the root of the memory card)
    outdir: PathBuf,

    /// Convert a single file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Convert every photo in a directory
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Add to the existing log in the output directory instead of starting from scratch
    #[arg(short, long)]
    update: bool,

    /// Text drawn onto every thumbnail
    #[arg(short, long)]
    text: Option<String>,

    /// Colour of the overlay text
    #[arg(short, long, default_value_t = OverlayColour::White)]
    colour: OverlayColour,

    /// Font used for the overlay text (falls back to common system fonts)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print a hex dump of the directory file when done
    #[arg(long)]
    dump: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbosity {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .init();

    if cli.file.is_none() && cli.dir.is_none() {
        bail!("Nothing to do, give a photo with --file and/or a directory with --dir");
    }

    let ctx = BatchContext::builder()
        .callsign(cli.callsign)
        .radio_id(cli.radio_id)
        .output_dir(cli.outdir)
        .maybe_overlay(
            cli.text
                .map(|text| Overlay::builder().text(text).colour(cli.colour).build()),
        )
        .update(cli.update)
        .build();

    let summary = copy_photos(
        &ctx,
        cli.file.as_deref(),
        cli.dir.as_deref(),
        &font_chain(cli.font),
    )?;
    info!(
        "{} photos written, {} skipped",
        summary.written,
        summary.skipped.len()
    );
    for skipped in &summary.skipped {
        eprintln!("Skipped {}", skipped.display());
    }

    if cli.dump {
        let path = ctx.log_file(DIRECTORY_FILE);
        let data = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        print!("{}", hexdump(&data, DUMP_WIDTH));
    }
    Ok(())
}
