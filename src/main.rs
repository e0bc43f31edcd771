//! # Cycle Ring Application Entry Point
//!
//! This binary loads a cycle description, composes the ring layout and hands it to
//! one of the renderers. It supports SVG output (default), JSON output for other
//! renderers, and an ASCII preview for development.
//!
//! ```text
//! cycle-ring [--config PATH] [--stdout | --json] [--save-config]
//! ```

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Local;
use cycle_ring_lib::config::{Config, DEFAULT_CONFIG_PATH};
use cycle_ring_lib::renderer::{draw_ascii, svg_document};
use cycle_ring_lib::ring::compose;
use std::env;

/// Output selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Svg,
    Json,
    Ascii,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config_path: String,
    mode: OutputMode,
    save_config: bool,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args {
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            mode: OutputMode::Svg,
            save_config: false,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                // Development mode: render to stdout for testing in a terminal
                "--stdout" => parsed.mode = OutputMode::Ascii,
                "--json" => parsed.mode = OutputMode::Json,
                "--svg" => parsed.mode = OutputMode::Svg,
                "--save-config" => parsed.save_config = true,
                "--config" => {
                    parsed.config_path = args.next().context("--config needs a path")?;
                }
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }
        Ok(parsed)
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse(env::args().skip(1))?;
    let config = Config::load_from_path(&args.config_path);

    if args.save_config {
        config.save_to_path(&args.config_path)?;
    }

    let today = Local::now().date_naive();
    let snapshot = config
        .cycle
        .snapshot(today)
        .context("cycle configuration is inconsistent")?;
    let layout = compose(&snapshot, &config.geometry()).context("cannot lay out ring")?;

    match args.mode {
        OutputMode::Svg => print!("{}", svg_document(&layout)),
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
        OutputMode::Ascii => draw_ascii(&layout),
    }

    Ok(())
}
