//! AprilTag family metadata and tag bitmap generation.
//!
//! A family is a named set of valid bit patterns with a fixed data grid size
//! and a fixed number of unique ids. [`TagFamily::bitmap`] resolves an id to
//! its binary module grid: the data cells from the family's code table,
//! wrapped in a one-module black border the way printed tags carry it.

mod codes;

use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported AprilTag families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagFamily {
    /// 6x6 data grid, hamming distance 11, 587 unique ids.
    #[serde(rename = "36h11")]
    Tag36h11,
    /// 5x5 data grid, hamming distance 9, 35 unique ids.
    #[serde(rename = "25h9")]
    Tag25h9,
    /// 4x4 data grid, hamming distance 5, 30 unique ids.
    #[serde(rename = "16h5")]
    Tag16h5,
}

impl TagFamily {
    /// Side length of the data grid in modules (e.g. 6 for 36h11).
    pub fn dimension(self) -> u32 {
        match self {
            Self::Tag36h11 => 6,
            Self::Tag25h9 => 5,
            Self::Tag16h5 => 4,
        }
    }

    /// Minimum hamming distance between any two codes in the family.
    pub fn hamming_distance(self) -> u32 {
        match self {
            Self::Tag36h11 => 11,
            Self::Tag25h9 => 9,
            Self::Tag16h5 => 5,
        }
    }

    /// Number of unique tag ids in the family. Valid ids are
    /// `0..tag_count()`.
    pub fn tag_count(self) -> u32 {
        self.codes().len() as u32
    }

    /// Dictionary id used by the downstream calibration tool's config schema.
    pub fn calibration_id(self) -> u32 {
        match self {
            Self::Tag36h11 => 20,
            Self::Tag25h9 => 18,
            Self::Tag16h5 => 17,
        }
    }

    /// Raw code table, indexed by tag id.
    pub fn codes(self) -> &'static [u64] {
        match self {
            Self::Tag36h11 => &codes::TAG36H11_CODES,
            Self::Tag25h9 => &codes::TAG25H9_CODES,
            Self::Tag16h5 => &codes::TAG16H5_CODES,
        }
    }

    /// Looks up the code for a tag id, or `None` if the id is out of range.
    pub fn code(self, id: u32) -> Option<u64> {
        self.codes().get(id as usize).copied()
    }

    /// Builds the module grid for a tag id: the family's data cells wrapped
    /// in a one-module black border.
    ///
    /// Fails with a configuration error when the id falls outside the
    /// family's id space.
    pub fn bitmap(self, id: u32) -> Result<TagBitmap> {
        let code = self.code(id).ok_or_else(|| {
            BoardError::config(format!(
                "tag id {id} is out of range for family {self} (valid ids: 0-{})",
                self.tag_count() - 1
            ))
        })?;

        let dim = self.dimension();
        let modules = dim + 2;
        let mut black = vec![true; (modules * modules) as usize];

        // Data cells sit inside the border; row-major bit ordering, set bit
        // means white.
        for y in 0..dim {
            for x in 0..dim {
                let bit = y * dim + x;
                if (code >> bit) & 1 == 1 {
                    black[((y + 1) * modules + x + 1) as usize] = false;
                }
            }
        }

        Ok(TagBitmap { modules, black })
    }
}

impl fmt::Display for TagFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag36h11 => write!(f, "36h11"),
            Self::Tag25h9 => write!(f, "25h9"),
            Self::Tag16h5 => write!(f, "16h5"),
        }
    }
}

/// A square binary module grid for one tag, black border included.
#[derive(Debug, Clone)]
pub struct TagBitmap {
    modules: u32,
    black: Vec<bool>,
}

impl TagBitmap {
    /// Side length in modules (data grid + 2 border modules).
    pub fn modules(&self) -> u32 {
        self.modules
    }

    /// Whether the module at `(x, y)` is black.
    pub fn is_black(&self, x: u32, y: u32) -> bool {
        self.black[(y * self.modules + x) as usize]
    }

    /// Renders the grid as a one-pixel-per-module grayscale image.
    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.modules, self.modules, |x, y| {
            if self.is_black(x, y) {
                image::Luma([0u8])
            } else {
                image::Luma([255u8])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_tag_counts() {
        assert_eq!(TagFamily::Tag36h11.tag_count(), 587);
        assert_eq!(TagFamily::Tag25h9.tag_count(), 35);
        assert_eq!(TagFamily::Tag16h5.tag_count(), 30);
    }

    #[test]
    fn test_family_dimensions() {
        assert_eq!(TagFamily::Tag36h11.dimension(), 6);
        assert_eq!(TagFamily::Tag25h9.dimension(), 5);
        assert_eq!(TagFamily::Tag16h5.dimension(), 4);
    }

    #[test]
    fn test_code_lookup_bounds() {
        assert!(TagFamily::Tag36h11.code(586).is_some());
        assert!(TagFamily::Tag36h11.code(587).is_none());
        assert!(TagFamily::Tag16h5.code(30).is_none());
    }

    #[test]
    fn test_bitmap_has_black_border() {
        let bitmap = TagFamily::Tag36h11.bitmap(0).unwrap();
        assert_eq!(bitmap.modules(), 8);

        let last = bitmap.modules() - 1;
        for i in 0..bitmap.modules() {
            assert!(bitmap.is_black(i, 0), "top border module {i} not black");
            assert!(bitmap.is_black(i, last), "bottom border module {i} not black");
            assert!(bitmap.is_black(0, i), "left border module {i} not black");
            assert!(bitmap.is_black(last, i), "right border module {i} not black");
        }
    }

    #[test]
    fn test_bitmap_data_cells_follow_code() {
        let family = TagFamily::Tag16h5;
        let bitmap = family.bitmap(3).unwrap();
        let code = family.code(3).unwrap();

        for y in 0..family.dimension() {
            for x in 0..family.dimension() {
                let white = (code >> (y * family.dimension() + x)) & 1 == 1;
                assert_eq!(bitmap.is_black(x + 1, y + 1), !white, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_bitmap_rejects_out_of_range_id() {
        let err = TagFamily::Tag25h9.bitmap(35).unwrap_err();
        assert!(matches!(err, BoardError::Configuration(_)));
        assert!(err.to_string().contains("25h9"));
    }

    #[test]
    fn test_bitmap_image_matches_modules() {
        let bitmap = TagFamily::Tag16h5.bitmap(0).unwrap();
        let img = bitmap.to_image();
        assert_eq!(img.width(), 6);
        assert_eq!(img.height(), 6);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_yaml_family_names() {
        let family: TagFamily = serde_yml::from_str("36h11").unwrap();
        assert_eq!(family, TagFamily::Tag36h11);
        assert!(serde_yml::from_str::<TagFamily>("36h10").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(TagFamily::Tag25h9.to_string(), "25h9");
        assert_eq!(TagFamily::Tag16h5.to_string(), "16h5");
    }
}
