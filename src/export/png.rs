//! PNG exporter.

use crate::board::RenderedBoard;
use crate::error::{BoardError, Result};
use std::path::Path;

/// Writes the board canvas as a PNG file. An existing file is overwritten.
pub fn write_png(board: &RenderedBoard, path: &Path) -> Result<()> {
    board
        .image
        .save(path)
        .map_err(|e| BoardError::io(format!("failed to write {}: {e}", path.display())))
}
