//! # Lunar Distance Application Entry Point
//!
//! This binary crate wires the library together: it loads configuration, runs the
//! perigee/apogee search for one or more years, and prints the results.
//! With `--year` it runs once; otherwise it starts an interactive session that keeps
//! asking for years until the user declines.


use anyhow::Context;
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use log::{debug, LevelFilter};
use std::path::PathBuf;

use lunar_distance_lib::{
    config::{Config, DEFAULT_CONFIG_PATH},
    extrema::{find_lunar_extremes, ExtremaError},
    lunar::EphemerisModel,
    renderer::{render_heading, render_json, render_table},
    YearResult,
};

#[derive(Parser, Debug)]
#[command(
    name = "lunar-distance",
    version,
    about = "Find the Moon's perigees and apogees for a calendar year"
)]
struct Cli {
    /// Year to compute; omit to start an interactive session
    #[arg(long, short, allow_hyphen_values = true)]
    year: Option<i32>,

    /// Configuration file; missing or malformed files fall back to defaults
    #[arg(long, short, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Distance model: meeus or schaefer (overrides the config file)
    #[arg(long, short)]
    model: Option<EphemerisModel>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Disable coloured table output
    #[arg(long)]
    no_color: bool,

    /// Log verbosity: off, error, warn, info, debug or trace (RUST_LOG overrides)
    #[arg(long, short, default_value = "warn")]
    log_level: LevelFilter,

    /// Write the effective configuration to --config and exit
    #[arg(long)]
    write_config: bool,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    let mut config = Config::load_from_path(&cli.config);
    if let Some(model) = cli.model {
        config.ephemeris.model = model;
    }
    if cli.no_color {
        config.display.color = false;
    }

    if cli.write_config {
        return config
            .save_to_path(&cli.config)
            .with_context(|| format!("writing {}", cli.config.display()));
    }

    match cli.year {
        Some(year) => {
            let result = find_lunar_extremes(year, &config)
                .with_context(|| format!("computing lunar extremes for {}", year))?;
            print_result(&result, &config, cli.json)
        }
        None => interactive(&config, cli.json),
    }
}

/// Prompt for years until the user declines to continue.
///
/// Bad year text and computation errors are reported and the prompt repeats; only
/// terminal I/O failures end the session early.
fn interactive(config: &Config, json: bool) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    loop {
        println!("\n🌠 Lunar Distance Calculator 🌠");
        let entry: String = Input::with_theme(&theme)
            .with_prompt("Enter Year")
            .interact_text()?;

        let year = match parse_year(&entry) {
            Some(year) => year,
            None => {
                println!("Oops! Please enter a valid year.");
                continue;
            }
        };

        match find_lunar_extremes(year, config) {
            Ok(result) => print_result(&result, config, json)?,
            Err(e) => {
                debug!("Search for {} failed: {:?}", year, e);
                println!("{}", failure_message(&e));
                continue;
            }
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Calculate for another year?")
            .default(false)
            .interact()?;
        if !again {
            println!("Thanks for exploring the moon's journey! 🚀");
            return Ok(());
        }
    }
}

fn parse_year(entry: &str) -> Option<i32> {
    entry.trim().parse().ok()
}

fn failure_message(e: &ExtremaError) -> String {
    if e.is_invalid_input() {
        format!("Oops! Please enter a valid year. ({})", e)
    } else {
        format!("Error: {}", e)
    }
}

fn print_result(result: &YearResult, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", render_json(result)?);
        return Ok(());
    }
    println!("\n{}", render_heading(result.year));
    println!("{}", render_table(result, &config.display));
    Ok(())
}
