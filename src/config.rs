//! Configuration management for board generation.
//!
//! Configuration is read from a YAML file and merged with command-line
//! overrides. Every key has a built-in default, so a missing file (or a file
//! with only some keys set) yields a complete, usable configuration.

use crate::error::{BoardError, Result};
use crate::family::TagFamily;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tag grid and print-resolution parameters shared by every board in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagLayoutConfig {
    /// Tag family used for all boards.
    #[serde(default = "default_family")]
    pub family: TagFamily,
    /// Number of tags along the X axis.
    #[serde(default = "default_grid")]
    pub grid_x: u32,
    /// Number of tags along the Y axis.
    #[serde(default = "default_grid")]
    pub grid_y: u32,
    /// Side length of each tag in millimeters.
    #[serde(default = "default_tag_size_mm")]
    pub tag_size_mm: f64,
    /// Edge-to-edge spacing between adjacent tags in millimeters.
    #[serde(default = "default_spacing_mm")]
    pub spacing_mm: f64,
    /// Border around the whole board in millimeters.
    #[serde(default = "default_border_mm")]
    pub border_mm: f64,
    /// Print resolution in dots per inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_family() -> TagFamily {
    TagFamily::Tag36h11
}

fn default_grid() -> u32 {
    7
}

fn default_tag_size_mm() -> f64 {
    40.0
}

fn default_spacing_mm() -> f64 {
    10.0
}

fn default_border_mm() -> f64 {
    10.0
}

fn default_dpi() -> u32 {
    300
}

impl Default for TagLayoutConfig {
    fn default() -> Self {
        Self {
            family: default_family(),
            grid_x: default_grid(),
            grid_y: default_grid(),
            tag_size_mm: default_tag_size_mm(),
            spacing_mm: default_spacing_mm(),
            border_mm: default_border_mm(),
            dpi: default_dpi(),
        }
    }
}

/// One board to generate: a named, contiguous, inclusive range of tag ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    /// Human-readable board name, used in console output and the
    /// specifications file.
    pub name: String,
    /// First tag id on the board (inclusive).
    pub start_id: u32,
    /// Last tag id on the board (inclusive).
    pub end_id: u32,
}

impl BoardSpec {
    /// Number of tags in the board's id range.
    pub fn tag_count(&self) -> u32 {
        self.end_id - self.start_id + 1
    }
}

/// Output location settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives all generated files. Created if missing;
    /// existing files are overwritten.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("apriltag_boards")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Print-verification marker toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Draw alignment squares at the canvas corners and edge midpoints.
    #[serde(default = "default_true")]
    pub corner_markers: bool,
    /// Side length of the alignment squares in millimeters.
    #[serde(default = "default_corner_marker_size_mm")]
    pub corner_marker_size_mm: f64,
    /// Draw black squares at the grid intersections between tags.
    #[serde(default = "default_true")]
    pub black_corner_squares: bool,
    /// Side length of the intersection squares in millimeters.
    #[serde(default = "default_corner_square_size_mm")]
    pub corner_square_size_mm: f64,
}

fn default_true() -> bool {
    true
}

fn default_corner_marker_size_mm() -> f64 {
    5.0
}

fn default_corner_square_size_mm() -> f64 {
    10.0
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            corner_markers: true,
            corner_marker_size_mm: default_corner_marker_size_mm(),
            black_corner_squares: true,
            corner_square_size_mm: default_corner_square_size_mm(),
        }
    }
}

/// Command-line values that replace their config-file counterparts.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Replacement output directory.
    pub output: Option<PathBuf>,
    /// Replacement print resolution.
    pub dpi: Option<u32>,
    /// Replacement X grid count.
    pub grid_x: Option<u32>,
    /// Replacement Y grid count.
    pub grid_y: Option<u32>,
    /// Replacement tag size in millimeters.
    pub tag_size_mm: Option<f64>,
    /// Replacement tag spacing in millimeters.
    pub spacing_mm: Option<f64>,
}

/// Complete run configuration.
///
/// # Validation
///
/// - grid counts, physical dimensions and DPI must be positive
/// - at least one board must be defined
/// - each board's `start_id` must not exceed its `end_id`
///
/// Range checks against the tag family and grid capacity happen at render
/// time, where the failing board can be named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Tag grid layout shared by all boards.
    #[serde(default)]
    pub apriltag: TagLayoutConfig,
    /// Boards to generate, in output order.
    #[serde(default = "default_boards")]
    pub boards: Vec<BoardSpec>,
    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,
    /// Print-verification markers.
    #[serde(default)]
    pub features: FeatureConfig,
}

fn default_boards() -> Vec<BoardSpec> {
    vec![
        BoardSpec {
            name: "Board 1".to_string(),
            start_id: 0,
            end_id: 48,
        },
        BoardSpec {
            name: "Board 2".to_string(),
            start_id: 49,
            end_id: 97,
        },
        BoardSpec {
            name: "Board 3".to_string(),
            start_id: 98,
            end_id: 146,
        },
    ]
}

impl Config {
    /// Loads configuration from a YAML file.
    ///
    /// A missing file yields the built-in defaults; a file that exists but
    /// fails to parse is a fatal configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::with_defaults());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| BoardError::io(format!("failed to read {}: {e}", path.display())))?;

        serde_yml::from_str(&contents)
            .map_err(|e| BoardError::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Returns the built-in default configuration (36h11, 7x7 grid, three
    /// boards covering ids 0-146).
    pub fn with_defaults() -> Self {
        Self {
            apriltag: TagLayoutConfig::default(),
            boards: default_boards(),
            output: OutputConfig::default(),
            features: FeatureConfig::default(),
        }
    }

    /// Replaces config values with any command-line overrides.
    pub fn apply_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(ref dir) = overrides.output {
            self.output.directory = dir.clone();
        }
        if let Some(dpi) = overrides.dpi {
            self.apriltag.dpi = dpi;
        }
        if let Some(grid_x) = overrides.grid_x {
            self.apriltag.grid_x = grid_x;
        }
        if let Some(grid_y) = overrides.grid_y {
            self.apriltag.grid_y = grid_y;
        }
        if let Some(tag_size) = overrides.tag_size_mm {
            self.apriltag.tag_size_mm = tag_size;
        }
        if let Some(spacing) = overrides.spacing_mm {
            self.apriltag.spacing_mm = spacing;
        }
    }

    /// Checks field-level invariants that do not depend on render state.
    pub fn validate(&self) -> Result<()> {
        let layout = &self.apriltag;
        if layout.grid_x == 0 || layout.grid_y == 0 {
            return Err(BoardError::config("grid_x and grid_y must be positive"));
        }
        if layout.tag_size_mm <= 0.0 || layout.spacing_mm <= 0.0 || layout.border_mm <= 0.0 {
            return Err(BoardError::config(
                "tag_size_mm, spacing_mm and border_mm must be positive",
            ));
        }
        if layout.dpi == 0 {
            return Err(BoardError::config("dpi must be positive"));
        }
        if self.boards.is_empty() {
            return Err(BoardError::config("no boards defined"));
        }
        for board in &self.boards {
            if board.start_id > board.end_id {
                return Err(BoardError::config(format!(
                    "board '{}': start_id {} exceeds end_id {}",
                    board.name, board.start_id, board.end_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let config = Config::with_defaults();
        assert_eq!(config.apriltag.family, TagFamily::Tag36h11);
        assert_eq!(config.apriltag.grid_x, 7);
        assert_eq!(config.apriltag.grid_y, 7);
        assert!((config.apriltag.tag_size_mm - 40.0).abs() < f64::EPSILON);
        assert_eq!(config.apriltag.dpi, 300);
        assert_eq!(config.boards.len(), 3);
        assert_eq!(config.boards[2].start_id, 98);
        assert_eq!(config.boards[2].end_id, 146);
        assert_eq!(config.output.directory, PathBuf::from("apriltag_boards"));
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r"
apriltag:
  family: 16h5
  grid_x: 3
  grid_y: 2
  tag_size_mm: 30.0
  spacing_mm: 5.0
  border_mm: 8.0
  dpi: 150
boards:
  - name: Small board
    start_id: 0
    end_id: 5
output:
  directory: out/boards
";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.apriltag.family, TagFamily::Tag16h5);
        assert_eq!(config.apriltag.grid_x, 3);
        assert_eq!(config.apriltag.dpi, 150);
        assert_eq!(config.boards.len(), 1);
        assert_eq!(config.boards[0].tag_count(), 6);
        assert_eq!(config.output.directory, PathBuf::from("out/boards"));
        // Features were omitted and fall back to defaults
        assert!(config.features.corner_markers);
    }

    #[test]
    fn test_partial_yaml_merges_defaults() {
        let yaml = "apriltag:\n  dpi: 600\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.apriltag.dpi, 600);
        assert_eq!(config.apriltag.grid_x, 7);
        assert_eq!(config.boards.len(), 3);
    }

    #[test]
    fn test_unknown_family_is_rejected() {
        let yaml = "apriltag:\n  family: 41h12\n";
        assert!(serde_yml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/config.yaml")).unwrap();
        assert_eq!(config, Config::with_defaults());
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "apriltag: [not, a, mapping]").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, BoardError::Configuration(_)));
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = Config::with_defaults();
        config.apply_overrides(&CliOverrides {
            output: Some(PathBuf::from("elsewhere")),
            dpi: Some(600),
            grid_x: Some(5),
            grid_y: None,
            tag_size_mm: Some(25.0),
            spacing_mm: None,
        });

        assert_eq!(config.output.directory, PathBuf::from("elsewhere"));
        assert_eq!(config.apriltag.dpi, 600);
        assert_eq!(config.apriltag.grid_x, 5);
        assert_eq!(config.apriltag.grid_y, 7);
        assert!((config.apriltag.tag_size_mm - 25.0).abs() < f64::EPSILON);
        assert!((config.apriltag.spacing_mm - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_zero_grid() {
        let mut config = Config::with_defaults();
        config.apriltag.grid_x = 0;
        assert!(matches!(
            config.validate(),
            Err(BoardError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_dimensions() {
        let mut config = Config::with_defaults();
        config.apriltag.tag_size_mm = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_id_range() {
        let mut config = Config::with_defaults();
        config.boards[0].start_id = 10;
        config.boards[0].end_id = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Board 1"));
    }

    #[test]
    fn test_validate_rejects_empty_board_list() {
        let mut config = Config::with_defaults();
        config.boards.clear();
        assert!(config.validate().is_err());
    }
}
