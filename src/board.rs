//! Board layout and rasterization.
//!
//! [`BoardGeometry`] converts the millimeter layout into pixel quantities at
//! the configured DPI, and [`BoardGeometry::render`] places tag bitmaps onto
//! a white canvas row-major, adds the print-verification markers, and
//! returns the finished [`RenderedBoard`]. Rendering has no side effects;
//! writing files is the exporters' job.

use crate::config::{BoardSpec, FeatureConfig, TagLayoutConfig};
use crate::constants::MM_PER_INCH;
use crate::error::{BoardError, Result};
use crate::family::TagFamily;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Millimeter layout resolved into pixel quantities at a fixed DPI.
#[derive(Debug, Clone)]
pub struct BoardGeometry {
    layout: TagLayoutConfig,
    pixels_per_mm: f64,
    tag_size_px: u32,
    spacing_px: u32,
    border_px: u32,
    width_mm: f64,
    height_mm: f64,
    width_px: u32,
    height_px: u32,
}

impl BoardGeometry {
    /// Derives the pixel geometry for a layout.
    ///
    /// Every pixel quantity is `round(mm / 25.4 * dpi)`. Fails fast on
    /// non-positive grid counts, physical dimensions or DPI.
    pub fn new(layout: &TagLayoutConfig) -> Result<Self> {
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

        let pixels_per_mm = f64::from(layout.dpi) / MM_PER_INCH;
        let width_mm = Self::extent_mm(layout, layout.grid_x);
        let height_mm = Self::extent_mm(layout, layout.grid_y);

        let to_px = |mm: f64| (mm * pixels_per_mm).round() as u32;

        Ok(Self {
            layout: layout.clone(),
            pixels_per_mm,
            tag_size_px: to_px(layout.tag_size_mm),
            spacing_px: to_px(layout.spacing_mm),
            border_px: to_px(layout.border_mm),
            width_mm,
            height_mm,
            width_px: to_px(width_mm),
            height_px: to_px(height_mm),
        })
    }

    /// Physical extent along one axis: both borders plus the tag run.
    fn extent_mm(layout: &TagLayoutConfig, grid: u32) -> f64 {
        2.0 * layout.border_mm
            + f64::from(grid) * layout.tag_size_mm
            + f64::from(grid - 1) * layout.spacing_mm
    }

    /// The layout this geometry was derived from.
    pub fn layout(&self) -> &TagLayoutConfig {
        &self.layout
    }

    /// Tag family shared by all boards.
    pub fn family(&self) -> TagFamily {
        self.layout.family
    }

    /// Board width in millimeters.
    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    /// Board height in millimeters.
    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    /// Canvas width in pixels.
    pub fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Canvas height in pixels.
    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    /// Number of tags the grid can hold.
    pub fn capacity(&self) -> u32 {
        self.layout.grid_x * self.layout.grid_y
    }

    /// Rounds a millimeter length to pixels at the layout's DPI.
    fn to_px(&self, mm: f64) -> u32 {
        (mm * self.pixels_per_mm).round() as u32
    }

    /// Renders one board: validates the id range, places the tag bitmaps and
    /// draws the print-verification markers.
    pub fn render(&self, spec: &BoardSpec, features: &FeatureConfig) -> Result<RenderedBoard> {
        if spec.start_id > spec.end_id {
            return Err(BoardError::config(format!(
                "board '{}': start_id {} exceeds end_id {}",
                spec.name, spec.start_id, spec.end_id
            )));
        }

        let family = self.layout.family;
        if spec.end_id >= family.tag_count() {
            return Err(BoardError::config(format!(
                "board '{}': end_id {} is out of range for family {family} (valid ids: 0-{})",
                spec.name,
                spec.end_id,
                family.tag_count() - 1
            )));
        }

        let required = spec.tag_count();
        if required > self.capacity() {
            return Err(BoardError::Capacity {
                board: spec.name.clone(),
                required,
                capacity: self.capacity(),
            });
        }

        let mut canvas = GrayImage::from_pixel(self.width_px, self.height_px, Luma([255u8]));
        let mut placements = Vec::with_capacity(required as usize);

        let step_mm = self.layout.tag_size_mm + self.layout.spacing_mm;
        let step_px = self.tag_size_px + self.spacing_px;

        let mut id = spec.start_id;
        'rows: for row in 0..self.layout.grid_y {
            for col in 0..self.layout.grid_x {
                if id > spec.end_id {
                    break 'rows;
                }

                let bitmap = family.bitmap(id)?;
                let tag = imageops::resize(
                    &bitmap.to_image(),
                    self.tag_size_px,
                    self.tag_size_px,
                    FilterType::Nearest,
                );

                let x_px = self.border_px + col * step_px;
                let y_px = self.border_px + row * step_px;
                imageops::replace(&mut canvas, &tag, i64::from(x_px), i64::from(y_px));

                placements.push(TagPlacement {
                    id,
                    x_mm: self.layout.border_mm + f64::from(col) * step_mm,
                    y_mm: self.layout.border_mm + f64::from(row) * step_mm,
                });

                id += 1;
            }
        }

        if features.black_corner_squares {
            self.draw_intersection_squares(&mut canvas, features.corner_square_size_mm);
        }
        if features.corner_markers {
            self.draw_alignment_markers(&mut canvas, features.corner_marker_size_mm);
        }

        Ok(RenderedBoard {
            image: canvas,
            placements,
        })
    }

    /// Black squares in the gaps between tags, at every grid intersection.
    ///
    /// Edge intersections get a full-size square flushed to the canvas edge,
    /// so half of it would fall outside the board; drawing clips it.
    fn draw_intersection_squares(&self, canvas: &mut GrayImage, size_mm: f64) {
        let size = self.to_px(size_mm);
        if size == 0 {
            return;
        }

        for row in 0..=self.layout.grid_y {
            for col in 0..=self.layout.grid_x {
                let y = if row == 0 {
                    0
                } else if row == self.layout.grid_y {
                    self.height_px.saturating_sub(size)
                } else {
                    self.border_px + row * self.tag_size_px + (row - 1) * self.spacing_px
                };

                let x = if col == 0 {
                    0
                } else if col == self.layout.grid_x {
                    self.width_px.saturating_sub(size)
                } else {
                    self.border_px + col * self.tag_size_px + (col - 1) * self.spacing_px
                };

                draw_filled_rect_mut(
                    canvas,
                    Rect::at(x as i32, y as i32).of_size(size, size),
                    Luma([0u8]),
                );
            }
        }
    }

    /// Alignment squares at the four canvas corners and the midpoint of each
    /// edge. Print verification only; they carry no data.
    fn draw_alignment_markers(&self, canvas: &mut GrayImage, size_mm: f64) {
        let size = self.to_px(size_mm);
        if size == 0 {
            return;
        }

        let right = self.width_px.saturating_sub(size);
        let bottom = self.height_px.saturating_sub(size);
        let mid_x = right / 2;
        let mid_y = bottom / 2;

        let anchors = [
            (0, 0),
            (right, 0),
            (0, bottom),
            (right, bottom),
            (mid_x, 0),
            (mid_x, bottom),
            (0, mid_y),
            (right, mid_y),
        ];

        for (x, y) in anchors {
            draw_filled_rect_mut(
                canvas,
                Rect::at(x as i32, y as i32).of_size(size, size),
                Luma([0u8]),
            );
        }
    }
}

/// One placed tag: its id and the top-left corner of its bitmap on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagPlacement {
    /// Tag id.
    pub id: u32,
    /// Horizontal offset from the board's left edge in millimeters.
    pub x_mm: f64,
    /// Vertical offset from the board's top edge in millimeters.
    pub y_mm: f64,
}

/// A rendered board, ready for export and then discarded.
#[derive(Debug, Clone)]
pub struct RenderedBoard {
    /// Grayscale canvas at the configured DPI.
    pub image: GrayImage,
    /// Tag placements in row-major order.
    pub placements: Vec<TagPlacement>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn reference_layout() -> TagLayoutConfig {
        // 36h11, 7x7, 40mm tags, 10mm spacing, 15mm border, 300 DPI
        TagLayoutConfig {
            border_mm: 15.0,
            ..TagLayoutConfig::default()
        }
    }

    fn board(name: &str, start_id: u32, end_id: u32) -> BoardSpec {
        BoardSpec {
            name: name.to_string(),
            start_id,
            end_id,
        }
    }

    #[test]
    fn test_reference_board_pixel_dimensions() {
        let geometry = BoardGeometry::new(&reference_layout()).unwrap();

        // 2*15 + 7*40 + 6*10 = 370mm; round(370 / 25.4 * 300) = 4370px
        assert!((geometry.width_mm() - 370.0).abs() < 1e-9);
        assert!((geometry.height_mm() - 370.0).abs() < 1e-9);
        assert_eq!(geometry.width_px(), 4370);
        assert_eq!(geometry.height_px(), 4370);
    }

    #[test]
    fn test_pixel_dimensions_follow_rounding_formula() {
        let layout = TagLayoutConfig {
            grid_x: 3,
            grid_y: 2,
            tag_size_mm: 33.3,
            spacing_mm: 7.7,
            border_mm: 4.2,
            dpi: 144,
            ..TagLayoutConfig::default()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();

        let width_mm: f64 = 2.0 * 4.2 + 3.0 * 33.3 + 2.0 * 7.7;
        let height_mm: f64 = 2.0 * 4.2 + 2.0 * 33.3 + 7.7;
        assert_eq!(geometry.width_px(), (width_mm / 25.4 * 144.0).round() as u32);
        assert_eq!(
            geometry.height_px(),
            (height_mm / 25.4 * 144.0).round() as u32
        );
    }

    #[test]
    fn test_render_reference_board_placements() {
        let geometry = BoardGeometry::new(&reference_layout()).unwrap();
        let rendered = geometry
            .render(&board("Board 1", 0, 48), &FeatureConfig::default())
            .unwrap();

        assert_eq!(rendered.placements.len(), 49);
        assert_eq!(rendered.image.width(), 4370);
        assert_eq!(rendered.image.height(), 4370);

        // Row-major from (border, border), stepping tag + spacing
        let first = rendered.placements[0];
        assert_eq!(first.id, 0);
        assert!((first.x_mm - 15.0).abs() < 1e-9);
        assert!((first.y_mm - 15.0).abs() < 1e-9);

        let second = rendered.placements[1];
        assert!((second.x_mm - 65.0).abs() < 1e-9);
        assert!((second.y_mm - 15.0).abs() < 1e-9);

        // First tag of the second row
        let eighth = rendered.placements[7];
        assert_eq!(eighth.id, 7);
        assert!((eighth.x_mm - 15.0).abs() < 1e-9);
        assert!((eighth.y_mm - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_grid_stops_at_end_id() {
        let layout = TagLayoutConfig {
            family: TagFamily::Tag16h5,
            grid_x: 3,
            grid_y: 3,
            ..reference_layout()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let rendered = geometry
            .render(&board("Partial", 0, 4), &FeatureConfig::default())
            .unwrap();

        assert_eq!(rendered.placements.len(), 5);
        assert_eq!(rendered.placements.last().unwrap().id, 4);
    }

    #[test]
    fn test_capacity_error_names_the_shortfall() {
        // 6x4 grid holds 24 tags; a 25-id range must fail
        let layout = TagLayoutConfig {
            grid_x: 6,
            grid_y: 4,
            ..reference_layout()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let err = geometry
            .render(&board("Overfull", 0, 24), &FeatureConfig::default())
            .unwrap_err();

        match err {
            BoardError::Capacity {
                board,
                required,
                capacity,
            } => {
                assert_eq!(board, "Overfull");
                assert_eq!(required, 25);
                assert_eq!(capacity, 24);
            }
            other => panic!("expected capacity error, got: {other}"),
        }
    }

    #[test]
    fn test_end_id_beyond_family_range_fails() {
        let layout = TagLayoutConfig {
            family: TagFamily::Tag16h5,
            grid_x: 6,
            grid_y: 6,
            ..reference_layout()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let err = geometry
            .render(&board("Out of range", 0, 30), &FeatureConfig::default())
            .unwrap_err();

        assert!(matches!(err, BoardError::Configuration(_)));
        assert!(err.to_string().contains("16h5"));
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        let mut layout = reference_layout();
        layout.spacing_mm = 0.0;
        assert!(BoardGeometry::new(&layout).is_err());

        let mut layout = reference_layout();
        layout.dpi = 0;
        assert!(BoardGeometry::new(&layout).is_err());

        let mut layout = reference_layout();
        layout.grid_y = 0;
        assert!(BoardGeometry::new(&layout).is_err());
    }

    #[test]
    fn test_render_is_deterministic() {
        let layout = TagLayoutConfig {
            family: TagFamily::Tag25h9,
            grid_x: 3,
            grid_y: 3,
            dpi: 100,
            ..reference_layout()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let spec = board("Repeat", 4, 11);
        let features = FeatureConfig::default();

        let first = geometry.render(&spec, &features).unwrap();
        let second = geometry.render(&spec, &features).unwrap();

        assert_eq!(first.placements, second.placements);
        assert_eq!(first.image.as_raw(), second.image.as_raw());
    }

    #[test]
    fn test_corner_pixels_are_black_with_markers() {
        let layout = TagLayoutConfig {
            family: TagFamily::Tag16h5,
            grid_x: 2,
            grid_y: 2,
            dpi: 100,
            ..reference_layout()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let rendered = geometry
            .render(&board("Marked", 0, 3), &FeatureConfig::default())
            .unwrap();

        let w = rendered.image.width();
        let h = rendered.image.height();
        assert_eq!(rendered.image.get_pixel(0, 0).0, [0]);
        assert_eq!(rendered.image.get_pixel(w - 1, 0).0, [0]);
        assert_eq!(rendered.image.get_pixel(0, h - 1).0, [0]);
        assert_eq!(rendered.image.get_pixel(w - 1, h - 1).0, [0]);
        // Edge midpoint markers
        assert_eq!(rendered.image.get_pixel(w / 2, 0).0, [0]);
        assert_eq!(rendered.image.get_pixel(0, h / 2).0, [0]);
    }

    #[test]
    fn test_markers_can_be_disabled() {
        let layout = TagLayoutConfig {
            family: TagFamily::Tag16h5,
            grid_x: 2,
            grid_y: 2,
            dpi: 100,
            ..reference_layout()
        };
        let features = FeatureConfig {
            corner_markers: false,
            black_corner_squares: false,
            ..FeatureConfig::default()
        };
        let geometry = BoardGeometry::new(&layout).unwrap();
        let rendered = geometry.render(&board("Plain", 0, 3), &features).unwrap();

        // Nothing is drawn in the border, so the corner stays white
        assert_eq!(rendered.image.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_default_config_boards_all_fit() {
        let config = Config::with_defaults();
        let geometry = BoardGeometry::new(&config.apriltag).unwrap();
        for spec in &config.boards {
            geometry.render(spec, &config.features).unwrap();
        }
    }
}
