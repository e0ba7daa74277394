//! Raster page composer.
//!
//! Renders each layout page to an opaque RGBA pixmap at the configured pixel
//! density and encodes one PNG per page. Used for on-screen previews and for
//! exercising the paginator without a PDF reader in the loop.

use crate::compose::PageComposer;
use crate::error::FivefoldError;
use crate::layout::{PagePlacement, RegionImage, page_count};
use crate::raster::RasterImage;
use crate::types::PageConfig;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tiny_skia::{BlendMode, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

#[derive(Debug, Default)]
pub struct RasterComposer;

impl RasterComposer {
    pub fn new() -> Self {
        Self
    }
}

fn premultiplied_pixmap(image: &RasterImage) -> Result<Pixmap, FivefoldError> {
    let mut data = Vec::with_capacity(image.pixels.len());
    for px in image.pixels.chunks_exact(4) {
        let a = px[3] as u16;
        data.push((px[0] as u16 * a / 255) as u8);
        data.push((px[1] as u16 * a / 255) as u8);
        data.push((px[2] as u16 * a / 255) as u8);
        data.push(px[3]);
    }
    let size = IntSize::from_wh(image.width, image.height)
        .ok_or_else(|| FivefoldError::Compose("band has zero extent".into()))?;
    Pixmap::from_vec(data, size)
        .ok_or_else(|| FivefoldError::Compose("band buffer does not match its extent".into()))
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, FivefoldError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            pixmap.data(),
            pixmap.width(),
            pixmap.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| FivefoldError::Compose(format!("png encode failed: {}", e)))?;
    Ok(bytes)
}

impl PageComposer for RasterComposer {
    type Artifact = Vec<Vec<u8>>;

    fn compose(
        &self,
        placements: &[PagePlacement],
        regions: &[RegionImage],
        config: &PageConfig,
    ) -> Result<Vec<Vec<u8>>, FivefoldError> {
        if placements.is_empty() {
            return Err(FivefoldError::EmptyExport);
        }
        let scale = config.pixel_scale;
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(FivefoldError::InvalidConfiguration(
                "pixel_scale must be positive and finite".into(),
            ));
        }
        let page_w = (config.page_size.width.to_f32() * scale).round() as u32;
        let page_h = (config.page_size.height.to_f32() * scale).round() as u32;

        let total_pages = page_count(placements);
        let mut pages = Vec::with_capacity(total_pages);

        for page_index in 0..total_pages {
            let mut pixmap = Pixmap::new(page_w, page_h).ok_or_else(|| {
                FivefoldError::Compose(format!("cannot allocate {}x{} page", page_w, page_h))
            })?;
            // Paper tone, fully opaque.
            pixmap.fill(tiny_skia::Color::from_rgba(0.980, 0.980, 0.976, 1.0).ok_or_else(
                || FivefoldError::Compose("invalid background colour".into()),
            )?);

            for placement in placements.iter().filter(|p| p.page_index == page_index) {
                let region = regions.get(placement.region_index).ok_or_else(|| {
                    FivefoldError::Compose(format!(
                        "placement references missing region {}",
                        placement.region_index
                    ))
                })?;
                let band = region
                    .image
                    .band(placement.src_y_px, placement.src_height_px);
                if band.width == 0 || band.height == 0 {
                    return Err(FivefoldError::EmptyRegionImage(placement.region_id.clone()));
                }
                let band_pixmap = premultiplied_pixmap(&band)?;

                let sx = placement.width.to_f32() * scale / band.width as f32;
                let sy = placement.height.to_f32() * scale / band.height as f32;
                let tx = placement.x.to_f32() * scale;
                let ty = placement.y.to_f32() * scale;
                let paint = PixmapPaint {
                    opacity: 1.0,
                    blend_mode: BlendMode::SourceOver,
                    quality: FilterQuality::Bilinear,
                };
                pixmap.draw_pixmap(
                    0,
                    0,
                    band_pixmap.as_ref(),
                    &paint,
                    Transform::from_row(sx, 0.0, 0.0, sy, tx, ty),
                    None,
                );
            }

            pages.push(encode_png(&pixmap)?);
        }

        tracing::debug!(pages = pages.len(), "raster preview composed");
        Ok(pages)
    }
}
