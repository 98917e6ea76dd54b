//! Board specifications text writer.
//!
//! One `board_specifications.txt` per run: the shared layout parameters,
//! a record per board in output order, printing instructions, and the
//! calibration-tool config snippet a user transcribes by hand (documented
//! here, never enforced programmatically).

use crate::board::BoardGeometry;
use crate::config::BoardSpec;
use crate::error::{BoardError, Result};
use crate::export::board_file_stem;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the shared specifications document.
pub const SPECS_FILE_NAME: &str = "board_specifications.txt";

/// Writes the specifications file into `output_dir` and returns its path.
pub fn write_specifications(
    output_dir: &Path,
    geometry: &BoardGeometry,
    boards: &[BoardSpec],
) -> Result<PathBuf> {
    let path = output_dir.join(SPECS_FILE_NAME);
    let contents = render_specifications(geometry, boards);
    fs::write(&path, contents)
        .map_err(|e| BoardError::io(format!("failed to write {}: {e}", path.display())))?;
    Ok(path)
}

/// Builds the full specifications document as a string.
pub fn render_specifications(geometry: &BoardGeometry, boards: &[BoardSpec]) -> String {
    let layout = geometry.layout();
    let family = geometry.family();
    let rule = "=".repeat(60);
    let divider = "-".repeat(30);
    let mut out = String::new();

    writeln!(out, "{rule}").unwrap();
    writeln!(out, "APRILTAG CALIBRATION BOARD SPECIFICATIONS").unwrap();
    writeln!(out, "{rule}\n").unwrap();

    writeln!(out, "GENERAL SPECIFICATIONS:").unwrap();
    writeln!(out, "{divider}").unwrap();
    writeln!(
        out,
        "AprilTag Family: {family} (dictionary id: {})",
        family.calibration_id()
    )
    .unwrap();
    writeln!(out, "Grid Layout: {} x {} tags", layout.grid_x, layout.grid_y).unwrap();
    writeln!(
        out,
        "Tag Size: {}mm x {}mm",
        layout.tag_size_mm, layout.tag_size_mm
    )
    .unwrap();
    writeln!(out, "Tag Spacing: {}mm (edge to edge)", layout.spacing_mm).unwrap();
    writeln!(out, "Board Border: {}mm", layout.border_mm).unwrap();
    writeln!(
        out,
        "Total Board Size: {:.1}mm x {:.1}mm",
        geometry.width_mm(),
        geometry.height_mm()
    )
    .unwrap();
    writeln!(out, "Image Resolution: {} DPI", layout.dpi).unwrap();
    writeln!(
        out,
        "Image Size: {} x {} pixels\n",
        geometry.width_px(),
        geometry.height_px()
    )
    .unwrap();

    writeln!(out, "BOARD CONFIGURATIONS:").unwrap();
    writeln!(out, "{divider}").unwrap();
    for (i, board) in boards.iter().enumerate() {
        let number = i + 1;
        let stem = board_file_stem(number, board);
        writeln!(out, "{}:", board.name).unwrap();
        writeln!(
            out,
            "  - AprilTag ID Range: {} to {}",
            board.start_id, board.end_id
        )
        .unwrap();
        writeln!(out, "  - Number of Tags: {}", board.tag_count()).unwrap();
        writeln!(out, "  - File Names:").unwrap();
        writeln!(out, "    * PNG: {stem}.png").unwrap();
        writeln!(out, "    * PDF: {stem}.pdf\n").unwrap();
    }

    writeln!(out, "PRINTING INSTRUCTIONS:").unwrap();
    writeln!(out, "{divider}").unwrap();
    writeln!(
        out,
        "1. Print the PDF files at 100% scale (no scaling/fit to page)"
    )
    .unwrap();
    writeln!(
        out,
        "2. Verify the printed tag size with calipers ({}mm expected)",
        layout.tag_size_mm
    )
    .unwrap();
    writeln!(out, "3. Mount the printed boards on rigid, flat surfaces").unwrap();
    writeln!(out, "4. Ensure boards are clean and free from reflections").unwrap();
    writeln!(
        out,
        "5. Use the corner and edge markers for print alignment checks\n"
    )
    .unwrap();

    writeln!(out, "CALIBRATION CONFIGURATION:").unwrap();
    writeln!(out, "{divider}").unwrap();
    writeln!(out, "Add the following to your calibration YAML file:\n").unwrap();
    writeln!(out, "board_type: 2  # AprilTag board").unwrap();
    writeln!(
        out,
        "apriltag_family: {}  # {family}",
        family.calibration_id()
    )
    .unwrap();
    writeln!(out, "apriltag_grid_x: {}", layout.grid_x).unwrap();
    writeln!(out, "apriltag_grid_y: {}", layout.grid_y).unwrap();
    writeln!(
        out,
        "apriltag_size: {:.3}  # in meters",
        layout.tag_size_mm / 1000.0
    )
    .unwrap();
    writeln!(
        out,
        "apriltag_spacing: {:.3}  # in meters",
        layout.spacing_mm / 1000.0
    )
    .unwrap();
    writeln!(out, "apriltag_board_id_ranges:").unwrap();
    for board in boards {
        writeln!(out, "  - [{}, {}]", board.start_id, board.end_id).unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "USAGE NOTES:").unwrap();
    writeln!(out, "{divider}").unwrap();
    writeln!(out, "- Each board can be used independently or together").unwrap();
    writeln!(out, "- Ensure adequate lighting for tag detection").unwrap();
    writeln!(out, "- Maintain a reasonable distance for camera resolution").unwrap();
    writeln!(out, "- Tags should occupy at least 5x5 pixels in the image\n").unwrap();

    writeln!(out, "{rule}").unwrap();
    writeln!(out, "Generated by {}", crate::constants::APP_BINARY_NAME).unwrap();
    writeln!(out, "{rule}").unwrap();

    out
}
