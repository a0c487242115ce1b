// The printable report of an axis.

use printpdf::image_crate::codecs::png::PngDecoder;
use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use std::fmt::Display;
use std::io::Cursor;
use std::path::Path;

use crate::dashboard::*;

// A4, in millimeters.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 10.0;
const FONT_SIZE: f32 = 12.0;
/// Width of the embedded charts.
pub const IMAGE_WIDTH: f32 = 150.0;

const LAYER: &str = "Layer 1";
const NO_IMAGES: &str = "Os gráficos interativos estão disponíveis na aplicação.";

fn pdf_error<E: Display>(e: E) -> DashError {
    DashError::Pdf {
        message: e.to_string(),
    }
}

// Helvetica averages about half an em per character.
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5 * 0.3528
}

/// Builds the PDF report of an axis: the title, the two percentages and the charts.
///
/// Without chart images, a line pointing to the application replaces them.
pub fn build_report(
    axis: &str,
    summary: &AdherenceSummary,
    images: &[PathBuf],
) -> DashResult<Vec<u8>> {
    let title = format!("Relatório do Eixo: {}", axis);
    let (doc, page, layer) =
        PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let mut current_layer = doc.get_page(page).get_layer(layer);

    let mut cursor = PAGE_HEIGHT - MARGIN;
    cursor -= LINE_HEIGHT;
    let title_x = ((PAGE_WIDTH - text_width(&title, FONT_SIZE)) / 2.0).max(MARGIN);
    current_layer.use_text(title.as_str(), FONT_SIZE, Mm(title_x), Mm(cursor), &font);
    cursor -= LINE_HEIGHT;

    for line in [
        format!("População: {:.1}%", summary.population_pct),
        format!("Diagnóstico: {:.1}%", summary.diagnosis_pct),
    ] {
        cursor -= LINE_HEIGHT;
        current_layer.use_text(line, FONT_SIZE, Mm(MARGIN), Mm(cursor), &font);
    }
    cursor -= LINE_HEIGHT;

    if images.is_empty() {
        cursor -= LINE_HEIGHT;
        current_layer.use_text(NO_IMAGES, FONT_SIZE, Mm(MARGIN), Mm(cursor), &font);
    }

    let mut loaded: Vec<(Image, (f32, f32))> = Vec::with_capacity(images.len());
    for image_p in images {
        let image = load_png(image_p)?;
        let size = (image.image.width.0 as f32, image.image.height.0 as f32);
        if size.0 <= 0.0 || size.1 <= 0.0 {
            whatever!("chart image {} is empty", image_p.display());
        }
        loaded.push((image, size));
    }
    let sizes: Vec<(f32, f32)> = loaded.iter().map(|(_, size)| *size).collect();
    let placements = place_images(cursor, &sizes);

    for ((image, (w_px, h_px)), placement) in loaded.into_iter().zip(placements) {
        if placement.new_page {
            let (p, l) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
            current_layer = doc.get_page(p).get_layer(l);
        }
        debug!("build_report: image at {} mm ({}x{} px)", placement.y, w_px, h_px);
        image.add_to_layer(
            current_layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(placement.y)),
                // The image spans IMAGE_WIDTH millimeters.
                dpi: Some(w_px * 25.4 / IMAGE_WIDTH),
                ..Default::default()
            },
        );
    }

    doc.save_to_bytes().map_err(pdf_error)
}

/// Where an image goes, in millimeters from the bottom of its page.
#[derive(PartialEq, Debug, Clone, Copy)]
struct Placement {
    new_page: bool,
    y: f32,
    height: f32,
}

/// Stacks images of the given pixel sizes below `top`, all IMAGE_WIDTH wide.
///
/// An image that would cross the bottom margin starts a new page.
fn place_images(top: f32, sizes: &[(f32, f32)]) -> Vec<Placement> {
    let mut cursor = top;
    let mut res: Vec<Placement> = Vec::with_capacity(sizes.len());
    for (w_px, h_px) in sizes {
        let height = IMAGE_WIDTH * h_px / w_px;
        let new_page = cursor - height < BOTTOM_MARGIN;
        if new_page {
            cursor = PAGE_HEIGHT - MARGIN;
        }
        cursor -= height;
        res.push(Placement {
            new_page,
            y: cursor,
            height,
        });
    }
    res
}

fn load_png(path: &Path) -> DashResult<Image> {
    let bytes = fs::read(path).context(ReadingImageSnafu {
        path: path.display().to_string(),
    })?;
    let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(pdf_error)?;
    Image::try_from(decoder).map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adherence::builder::TableBuilder;
    use printpdf::image_crate::codecs::png::PngEncoder;
    use printpdf::image_crate::{ColorType, ImageEncoder};
    use std::fs::File;

    fn summary() -> AdherenceSummary {
        let mut builder = TableBuilder::new(&["population", "diagnosis"]);
        builder.add_row(vec![Cell::from(0.5), Cell::from(0.8)]);
        builder.add_row(vec![Cell::from(0.3), Cell::from(0.6)]);
        summarize(&builder.build()).unwrap()
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let pixels = vec![200u8; (width * height * 3) as usize];
        let file = File::create(path).unwrap();
        PngEncoder::new(file)
            .write_image(&pixels, width, height, ColorType::Rgb8)
            .unwrap();
    }

    // Text of the builtin fonts is written as WinAnsi hex strings.
    fn shown_text(text: &str) -> String {
        let hex: String = text.chars().map(|c| format!("{:02X}", c as u32)).collect();
        format!("<{}>", hex)
    }

    fn page_contents(bytes: &[u8]) -> Vec<String> {
        let doc = lopdf::Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|id| String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).to_string())
            .collect()
    }

    #[test]
    fn report_without_images() {
        let bytes = build_report("Saúde", &summary(), &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let pages = page_contents(&bytes);
        assert_eq!(pages.len(), 1);
        for line in [
            "Relatório do Eixo: Saúde",
            "População: 40.0%",
            "Diagnóstico: 70.0%",
            NO_IMAGES,
        ] {
            assert!(pages[0].contains(&shown_text(line)), "missing {}", line);
        }
    }

    #[test]
    fn report_with_images() {
        let dir = tempfile::tempdir().unwrap();
        let radar = dir.path().join("radar_Saúde.png");
        let corr = dir.path().join("correspondencia_Saúde.png");
        write_png(&radar, 300, 200);
        write_png(&corr, 300, 400);
        let bytes = build_report("Saúde", &summary(), &[radar, corr]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        // The second chart does not fit under the first one.
        let pages = page_contents(&bytes);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains(&shown_text("População: 40.0%")));
        assert!(!pages[0].contains(&shown_text(NO_IMAGES)));
        assert!(pages[0].contains(" Do"));
        assert!(pages[1].contains(" Do"));
    }

    #[test]
    fn images_are_stacked_and_paged() {
        let placements = place_images(237.0, &[(300.0, 200.0), (300.0, 400.0), (600.0, 200.0)]);
        assert_eq!(
            placements,
            vec![
                Placement {
                    new_page: false,
                    y: 137.0,
                    height: 100.0
                },
                Placement {
                    new_page: true,
                    y: 87.0,
                    height: 200.0
                },
                Placement {
                    new_page: false,
                    y: 37.0,
                    height: 50.0
                },
            ]
        );
        // Every image is IMAGE_WIDTH wide, whatever its pixel width.
        for ((w, h), p) in [(300.0, 200.0), (300.0, 400.0), (600.0, 200.0)]
            .iter()
            .zip(placements.iter())
        {
            assert_eq!(p.height / IMAGE_WIDTH, h / w);
        }
    }

    #[test]
    fn image_touching_the_bottom_margin_stays() {
        // 237 - 222 == 15: exactly on the margin.
        let placements = place_images(237.0, &[(150.0, 222.0)]);
        assert!(!placements[0].new_page);
        assert_eq!(placements[0].y, BOTTOM_MARGIN);
    }

    #[test]
    fn missing_image() {
        let err = build_report("Saúde", &summary(), &[PathBuf::from("/nonexistent/radar.png")])
            .unwrap_err();
        assert!(matches!(err, DashError::ReadingImage { .. }));
    }

    #[test]
    fn title_is_centered() {
        let w = text_width("Relatório do Eixo: Saúde", FONT_SIZE);
        assert!(w > 0.0 && w < PAGE_WIDTH);
    }
}
