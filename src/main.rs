//! AprilTag Board Generator - Printable calibration board creator
//!
//! Reads a YAML configuration describing a tag grid layout and a set of
//! boards, then renders each board to PNG and print-ready PDF alongside a
//! plain-text specifications document.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tagboard::config::{CliOverrides, Config};
use tagboard::constants::{APP_BINARY_NAME, APP_NAME};
use tagboard::generator;

/// AprilTag Board Generator - Printable calibration board creator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Output directory for generated files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Print resolution in DPI
    #[arg(long, value_name = "DPI")]
    dpi: Option<u32>,

    /// Number of tags along the X axis
    #[arg(long, value_name = "N")]
    grid_x: Option<u32>,

    /// Number of tags along the Y axis
    #[arg(long, value_name = "N")]
    grid_y: Option<u32>,

    /// Tag side length in millimeters
    #[arg(long, value_name = "MM")]
    tag_size: Option<f64>,

    /// Edge-to-edge tag spacing in millimeters
    #[arg(long, value_name = "MM")]
    spacing: Option<f64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
    println!();

    if cli.config.exists() {
        println!("Loading configuration from {}", cli.config.display());
    } else {
        println!(
            "Configuration file {} not found, using built-in defaults",
            cli.config.display()
        );
        println!(
            "Run `{} --help` to see the available overrides.",
            APP_BINARY_NAME
        );
    }
    println!();

    let mut config = Config::load(&cli.config)?;
    config.apply_overrides(&CliOverrides {
        output: cli.output,
        dpi: cli.dpi,
        grid_x: cli.grid_x,
        grid_y: cli.grid_y,
        tag_size_mm: cli.tag_size,
        spacing_mm: cli.spacing,
    });
    config.validate()?;

    let boards = generator::generate_all(&config)?;

    println!();
    println!(
        "Generated {} board(s) in {}:",
        boards.len(),
        config.output.directory.display()
    );
    for board in &boards {
        println!(
            "  {} - {} tags (IDs {} to {})",
            board.name, board.tag_count, board.start_id, board.end_id
        );
    }
    println!();
    println!("See board_specifications.txt for printing and calibration details.");

    Ok(())
}
