// src/pdf_writer.rs
//
// Multi-page PDF assembly: every rendered page buffer is embedded as one
// full-page image, sized by the --size inches at the requested --dpi.

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use std::error::Error;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::types::PageBuffer;

const MM_PER_INCH: f64 = 25.4;

/// Write all pages into a single PDF, creating parent directories as
/// needed.
pub fn write_pdf(
    output: &Path,
    pages: &[PageBuffer],
    width_px: u32,
    height_px: u32,
    size_inches: (f64, f64),
    dpi: u32,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Creating '{}': {}", parent.display(), e))?;
        }
    }

    let page_width = Mm((size_inches.0 * MM_PER_INCH) as f32);
    let page_height = Mm((size_inches.1 * MM_PER_INCH) as f32);
    let (doc, first_page, first_layer) =
        PdfDocument::new("csvplot", page_width, page_height, "plots");

    for (index, buffer) in pages.iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(page_width, page_height, "plots")
        };
        let layer = doc.get_page(page).get_layer(layer);

        let image_buffer = RgbImage::from_raw(width_px, height_px, buffer.clone())
            .ok_or("Rendered page buffer has an unexpected size")?;
        let image = Image::from_dynamic_image(&DynamicImage::ImageRgb8(image_buffer));
        // At `dpi` dots per inch the pixel buffer covers the page exactly.
        image.add_to_layer(
            layer,
            ImageTransform {
                dpi: Some(dpi as f32),
                ..Default::default()
            },
        );
    }

    let file = File::create(output)
        .map_err(|e| format!("Error writing '{}': {}", output.display(), e))?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| format!("Error writing '{}': {}", output.display(), e))?;
    Ok(())
}
