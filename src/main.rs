use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use sheet2json::cli::{self, Cli};
use sheet2json::{config, logging, report, ExcelConverter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::load_config()?;
    if cli.compact {
        config.pretty = false;
    }

    // Initialize logging
    logging::init_logging(&config.log_filter)?;

    cli::validate_input(&cli.input)?;
    cli::prepare_output(&cli.output)?;

    if !cli.quiet {
        println!("Input : {}", cli.input.display());
        println!("Output: {}", cli.output.display());
        println!();
    }

    let start = Instant::now();
    let result = ExcelConverter::new(config)
        .convert(&cli.input, &cli.output)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if !cli.quiet {
        print!("{}", report::render(&result, start.elapsed()));
    }

    Ok(())
}
