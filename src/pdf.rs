//! PDF page composer.
//!
//! Builds one PDF page per layout page: an opaque background rectangle, then
//! each placed band as an image XObject positioned by its millimetre offsets
//! (converted to PDF points at this boundary only). Raster bands are embedded
//! as raw RGB streams; images with transparency get a DeviceGray SMask.
//! Streams are left plain while the document is assembled and compressed in
//! one pass before serialization.

use crate::compose::PageComposer;
use crate::error::FivefoldError;
use crate::layout::{PagePlacement, RegionImage, page_count};
use crate::raster::RasterImage;
use crate::types::PageConfig;
use lopdf::{Document as LoDocument, Object as LoObject, Stream as LoStream, dictionary};

/// Background fill, linear RGB in 0..=1. Defaults to the report's paper
/// tone, close to white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            r: 0.980,
            g: 0.980,
            b: 0.976,
        }
    }
}

#[derive(Debug, Default)]
pub struct PdfComposer {
    background: Background,
}

impl PdfComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }
}

fn split_channels(image: &RasterImage) -> (Vec<u8>, Option<Vec<u8>>) {
    let mut rgb = Vec::with_capacity(image.pixels.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(image.pixels.len() / 4);
    let mut has_alpha = false;
    for px in image.pixels.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
        if px[3] != 255 {
            has_alpha = true;
        }
    }
    (rgb, has_alpha.then_some(alpha))
}

fn fmt_pt(value: f32) -> String {
    format!("{:.2}", value)
}

impl PageComposer for PdfComposer {
    type Artifact = Vec<u8>;

    fn compose(
        &self,
        placements: &[PagePlacement],
        regions: &[RegionImage],
        config: &PageConfig,
    ) -> Result<Vec<u8>, FivefoldError> {
        if placements.is_empty() {
            return Err(FivefoldError::EmptyExport);
        }

        let mut doc = LoDocument::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_width_pt = config.page_size.width.to_pt_f32();
        let page_height_pt = config.page_size.height.to_pt_f32();

        let total_pages = page_count(placements);
        let mut kids = Vec::with_capacity(total_pages);

        for page_index in 0..total_pages {
            let mut content = format!(
                "q {} {} {} rg 0 0 {} {} re f Q\n",
                self.background.r,
                self.background.g,
                self.background.b,
                fmt_pt(page_width_pt),
                fmt_pt(page_height_pt),
            );
            let mut xobjects = lopdf::Dictionary::new();

            for (index, placement) in placements
                .iter()
                .enumerate()
                .filter(|(_, p)| p.page_index == page_index)
            {
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

                let (rgb, alpha) = split_channels(&band);
                let smask_id = alpha.map(|alpha| {
                    doc.add_object(LoStream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => band.width as i64,
                            "Height" => band.height as i64,
                            "ColorSpace" => "DeviceGray",
                            "BitsPerComponent" => 8,
                        },
                        alpha,
                    ))
                });
                let mut image_dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => band.width as i64,
                    "Height" => band.height as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                };
                if let Some(mask_id) = smask_id {
                    image_dict.set("SMask", LoObject::Reference(mask_id));
                }
                let image_id = doc.add_object(LoStream::new(image_dict, rgb));

                let name = format!("Im{}", index + 1);
                xobjects.set(name.clone(), LoObject::Reference(image_id));

                // PDF origin is bottom-left; placements measure from top-left.
                let w_pt = placement.width.to_pt_f32();
                let h_pt = placement.height.to_pt_f32();
                let x_pt = placement.x.to_pt_f32();
                let y_pt =
                    (config.page_size.height - placement.y - placement.height).to_pt_f32();
                content.push_str(&format!(
                    "q {} 0 0 {} {} {} cm /{} Do Q\n",
                    fmt_pt(w_pt),
                    fmt_pt(h_pt),
                    fmt_pt(x_pt),
                    fmt_pt(y_pt),
                    name,
                ));
            }

            let content_id =
                doc.add_object(LoStream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => xobjects,
                },
                "MediaBox" => LoObject::Array(vec![
                    0.into(),
                    0.into(),
                    page_width_pt.into(),
                    page_height_pt.into(),
                ]),
            });
            kids.push(LoObject::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            LoObject::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total_pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        tracing::debug!(pages = total_pages, bytes = bytes.len(), "pdf composed");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::raster::{RasterImage, Region};
    use crate::types::{Margins, PageConfig, Size};

    fn config() -> PageConfig {
        PageConfig::a4(12.0)
    }

    fn flow_region(width: u32, height: u32) -> RegionImage {
        RegionImage::new(
            Region::flow("narrative"),
            RasterImage::solid(width, height, [40, 80, 120, 255]),
        )
    }

    fn compose_bytes(regions: &[RegionImage]) -> Vec<u8> {
        let placements = layout(regions, &config()).unwrap();
        PdfComposer::new()
            .compose(&placements, regions, &config())
            .unwrap()
    }

    #[test]
    fn artifact_is_a_pdf_with_one_page_per_layout_page() {
        let regions = [flow_region(1488, 5000)];
        let bytes = compose_bytes(&regions);
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn media_box_matches_a4_in_points() {
        let regions = [flow_region(100, 50)];
        let bytes = compose_bytes(&regions);
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        let (_, page_id) = parsed.get_pages().into_iter().next().unwrap();
        let page = parsed
            .get_object(page_id)
            .and_then(LoObject::as_dict)
            .unwrap();
        let media_box = page.get(b"MediaBox").and_then(LoObject::as_array).unwrap();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 595.3).abs() < 0.5);
        assert!((height - 841.9).abs() < 0.5);
    }

    #[test]
    fn transparent_regions_get_an_smask() {
        let regions = [RegionImage::new(
            Region::fit_page("chart"),
            RasterImage::solid(100, 50, [10, 20, 30, 128]),
        )];
        let bytes = compose_bytes(&regions);
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        let has_smask = parsed.objects.values().any(|obj| {
            obj.as_stream()
                .map(|s| s.dict.has(b"SMask"))
                .unwrap_or(false)
        });
        assert!(has_smask);
    }

    #[test]
    fn opaque_regions_have_no_smask() {
        let regions = [flow_region(100, 50)];
        let bytes = compose_bytes(&regions);
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        let has_smask = parsed.objects.values().any(|obj| {
            obj.as_stream()
                .map(|s| s.dict.has(b"SMask"))
                .unwrap_or(false)
        });
        assert!(!has_smask);
    }

    #[test]
    fn empty_placements_are_rejected() {
        let err = PdfComposer::new()
            .compose(&[], &[], &config())
            .unwrap_err();
        assert!(matches!(err, FivefoldError::EmptyExport));
    }

    #[test]
    fn custom_page_size_is_honoured() {
        let config = PageConfig {
            page_size: Size::from_mm(100.0, 100.0),
            margins: Margins::all(5.0),
            pixel_scale: 1.0,
        };
        let regions = [flow_region(90, 90)];
        let placements = layout(&regions, &config).unwrap();
        let bytes = PdfComposer::new()
            .compose(&placements, &regions, &config)
            .unwrap();
        let parsed = LoDocument::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }
}
