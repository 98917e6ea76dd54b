//! PDF exporter.
//!
//! Each board becomes a single-page document whose page size matches the
//! board's physical millimeters exactly, so printing at 100% scale yields
//! true-size tags. The canvas is embedded at a DPI chosen to span the page
//! with no autoscaling, plus a one-line metadata caption inside the bottom
//! border.

use crate::board::{BoardGeometry, RenderedBoard};
use crate::config::BoardSpec;
use crate::constants::MM_PER_INCH;
use crate::error::{BoardError, Result};
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Writes a board as a print-ready PDF. An existing file is overwritten.
pub fn write_pdf(
    board: &RenderedBoard,
    geometry: &BoardGeometry,
    number: usize,
    spec: &BoardSpec,
    path: &Path,
) -> Result<()> {
    let width_mm = geometry.width_mm() as f32;
    let height_mm = geometry.height_mm() as f32;

    let (doc, page, layer) = PdfDocument::new(
        format!("AprilTag Board {number}"),
        Mm(width_mm),
        Mm(height_mm),
        "Board",
    );
    let layer = doc.get_page(page).get_layer(layer);

    // printpdf embeds through its own image crate version, so the canvas is
    // rebuilt from raw bytes rather than converted in place.
    let raw = board.image.as_raw().clone();
    let embedded = printpdf::image_crate::GrayImage::from_raw(
        board.image.width(),
        board.image.height(),
        raw,
    )
    .ok_or_else(|| BoardError::io("failed to convert board canvas for PDF embedding"))?;
    let image = Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageLuma8(
        embedded,
    ));

    // DPI that makes the bitmap span the page exactly
    let embed_dpi = board.image.width() as f64 / (geometry.width_mm() / MM_PER_INCH);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(embed_dpi as f32),
            ..ImageTransform::default()
        },
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| BoardError::io(format!("failed to load PDF font: {e}")))?;
    let caption = format!(
        "{} | {} | {}x{} | IDs {}-{} | {:.1}x{:.1}mm | {} DPI",
        spec.name,
        geometry.family(),
        geometry.layout().grid_x,
        geometry.layout().grid_y,
        spec.start_id,
        spec.end_id,
        geometry.width_mm(),
        geometry.height_mm(),
        geometry.layout().dpi,
    );
    // Bottom border, clear of the corner markers
    let caption_x = geometry.layout().border_mm as f32;
    layer.use_text(caption, 6.0, Mm(caption_x), Mm(1.5), &font);

    let file = File::create(path)
        .map_err(|e| BoardError::io(format!("failed to create {}: {e}", path.display())))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| BoardError::io(format!("failed to write {}: {e}", path.display())))
}
