mod cli;
mod files;
mod render;
mod stat;

use std::{fs::File, io::Write};

use anyhow::Result;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

fn main() -> Result<()> {
    let cli = cli::Args::parse();

    let log_level: LevelFilter = if cli.verbose == 0 {
        LevelFilter::Info
    } else if cli.verbose == 1 {
        LevelFilter::Debug
    } else {
        LevelFilter::Trace
    };
    if !cli.quiet {
        Builder::new().filter_level(log_level).init();
    }

    let out_data: String = match cli.command.clone() {
        cli::Commands::Stat { sources, tuning } => {
            let forest = files::read_and_build(&sources, tuning.into())?;
            stat::gen_stats(&forest)
        }
        cli::Commands::Render {
            sources,
            tuning,
            command,
        } => {
            let forest = files::read_and_build(&sources, tuning.into())?;
            match command {
                cli::Format::Tree => render::tree_lines(&forest),
                cli::Format::Json => render::json_document(&forest)?,
            }
        }
    };

    if let Some(out_path) = cli.output {
        let mut out_file = File::create(out_path)?;
        write!(out_file, "{}", out_data)?;
    } else if !out_data.is_empty() {
        println!("{}", out_data);
    }

    Ok(())
}
