//! End-to-end board generation.
//!
//! Renders every configured board in memory first, then writes all output
//! files. A validation or render failure on any board therefore aborts the
//! run before a single file touches disk.

use crate::board::{BoardGeometry, RenderedBoard};
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::export;
use std::fs;
use std::path::PathBuf;

/// Summary of one generated board, returned for console reporting.
#[derive(Debug)]
pub struct GeneratedBoard {
    /// Board name from the configuration.
    pub name: String,
    /// First tag id placed on the board.
    pub start_id: u32,
    /// Last tag id placed on the board.
    pub end_id: u32,
    /// Number of tags placed.
    pub tag_count: u32,
    /// Path of the written PNG file.
    pub png_path: PathBuf,
    /// Path of the written PDF file.
    pub pdf_path: PathBuf,
}

/// Generates all boards described by `config`.
///
/// Returns one summary per board in configuration order. The specifications
/// file is written alongside the board files in the output directory.
///
/// # Errors
///
/// Returns an error if the layout is invalid, any board fails validation or
/// rendering, or any output file cannot be written. No files are written
/// unless every board renders successfully.
pub fn generate_all(config: &Config) -> Result<Vec<GeneratedBoard>> {
    let geometry = BoardGeometry::new(&config.apriltag)?;

    println!(
        "Board layout: {}x{} tags, {:.1}mm x {:.1}mm ({} x {} px at {} DPI)",
        config.apriltag.grid_x,
        config.apriltag.grid_y,
        geometry.width_mm(),
        geometry.height_mm(),
        geometry.width_px(),
        geometry.height_px(),
        config.apriltag.dpi,
    );

    // Render everything before writing anything.
    let mut rendered: Vec<RenderedBoard> = Vec::with_capacity(config.boards.len());
    for spec in &config.boards {
        println!(
            "Rendering {} (IDs {} to {})...",
            spec.name, spec.start_id, spec.end_id
        );
        rendered.push(geometry.render(spec, &config.features)?);
    }

    let out_dir = &config.output.directory;
    fs::create_dir_all(out_dir).map_err(|e| {
        BoardError::io(format!(
            "failed to create output directory {}: {e}",
            out_dir.display()
        ))
    })?;

    let mut summaries = Vec::with_capacity(rendered.len());
    for (i, (spec, board)) in config.boards.iter().zip(&rendered).enumerate() {
        let number = i + 1;
        let stem = export::board_file_stem(number, spec);
        let png_path = out_dir.join(format!("{stem}.png"));
        let pdf_path = out_dir.join(format!("{stem}.pdf"));

        export::png::write_png(board, &png_path)?;
        println!("  Saved {}", png_path.display());
        export::pdf::write_pdf(board, &geometry, number, spec, &pdf_path)?;
        println!("  Saved {}", pdf_path.display());

        summaries.push(GeneratedBoard {
            name: spec.name.clone(),
            start_id: spec.start_id,
            end_id: spec.end_id,
            tag_count: spec.tag_count(),
            png_path,
            pdf_path,
        });
    }

    let specs_path = export::specs::write_specifications(out_dir, &geometry, &config.boards)?;
    println!("  Saved {}", specs_path.display());

    Ok(summaries)
}
