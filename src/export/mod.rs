//! File exporters for rendered boards.
//!
//! Three sinks: a PNG writer for the raw canvas, a PDF writer that wraps the
//! canvas in a print-ready page of exactly the board's physical size, and a
//! plain-text specifications writer shared by all boards in a run.

pub mod pdf;
pub mod png;
pub mod specs;

use crate::config::BoardSpec;

/// Base file name (without extension) for a board's outputs.
///
/// Board numbers are 1-based: `board_1_ids_0-48`.
pub fn board_file_stem(number: usize, spec: &BoardSpec) -> String {
    format!("board_{number}_ids_{}-{}", spec.start_id, spec.end_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_file_stem() {
        let spec = BoardSpec {
            name: "Board 2".to_string(),
            start_id: 49,
            end_id: 97,
        };
        assert_eq!(board_file_stem(2, &spec), "board_2_ids_49-97");
    }
}
