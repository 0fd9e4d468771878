use anyhow::{Context, Result};
use clap::Parser;
use popuviz::config::{MAX_YEAR, MIN_YEAR};
use popuviz::core::timeline::sweep;
use popuviz::utils::logger;
use popuviz::CountryArchetype;
use std::fs::File;
use std::io::Write;

/// Sweeps the year slider and writes one summary row per year as CSV.
#[derive(Parser)]
#[command(name = "timeline")]
#[command(about = "Summarize population pyramids across a range of years")]
struct Args {
    #[arg(long, value_enum, default_value = "developed")]
    archetype: CountryArchetype,

    #[arg(long, default_value_t = MIN_YEAR)]
    start: i32,

    #[arg(long, default_value_t = MAX_YEAR)]
    end: i32,

    #[arg(long, default_value_t = 10)]
    step: usize,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let rows = sweep(args.archetype, args.start, args.end, args.step)?;

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} timeline rows for {}", rows.len(), args.archetype);
    Ok(())
}
