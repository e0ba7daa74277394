//! The paginator core: convert rasterized regions into ordered page
//! placements.
//!
//! Every region is scaled uniformly to the usable page width. A
//! [`RegionKind::FitPage`] region that would overflow the usable height is
//! downscaled further (both axes by the same factor) so it stays on a single
//! page. A [`RegionKind::Flow`] region is sliced vertically into page-sized
//! bands; the final band may be shorter than the usable height. Regions never
//! share a page.

use crate::error::FivefoldError;
use crate::raster::{RasterImage, Region, RegionKind};
use crate::types::{Mm, PageConfig};

/// One rasterized region queued for layout.
#[derive(Debug, Clone)]
pub struct RegionImage {
    pub region: Region,
    pub image: RasterImage,
}

impl RegionImage {
    pub fn new(region: Region, image: RasterImage) -> Self {
        Self { region, image }
    }
}

/// Where one slice of one region lands on the document.
///
/// `src_y_px`/`src_height_px` select the band of the source image this
/// placement draws; for fit-page regions the band is always the full image.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlacement {
    pub region_index: usize,
    pub region_id: String,
    pub page_index: usize,
    pub x: Mm,
    pub y: Mm,
    pub width: Mm,
    pub height: Mm,
    pub src_y_px: u32,
    pub src_height_px: u32,
}

/// Lay regions out in reading order. Fails fast on a degenerate capture
/// (zero width or height) and on an empty region list; nothing is partially
/// produced.
pub fn layout(
    regions: &[RegionImage],
    config: &PageConfig,
) -> Result<Vec<PagePlacement>, FivefoldError> {
    if regions.is_empty() {
        return Err(FivefoldError::EmptyExport);
    }
    let usable_width = config.usable_width();
    let usable_height = config.usable_height();
    if usable_width <= Mm::ZERO || usable_height <= Mm::ZERO {
        return Err(FivefoldError::InvalidConfiguration(
            "margins leave no usable page area".into(),
        ));
    }

    let mut placements = Vec::new();
    let mut next_page = 0usize;

    for (region_index, entry) in regions.iter().enumerate() {
        let image = &entry.image;
        if image.width == 0 || image.height == 0 {
            return Err(FivefoldError::EmptyRegionImage(entry.region.id.clone()));
        }

        // Uniform scale-to-width: image.height px maps onto draw_height mm.
        let draw_height = usable_width.mul_ratio(image.height as i64, image.width as i64);

        match entry.region.kind {
            RegionKind::FitPage => {
                let (width, height) = if draw_height > usable_height {
                    // Downscale both axes by usable_height / draw_height.
                    let width = usable_width.mul_ratio(
                        usable_height.to_milli_i64(),
                        draw_height.to_milli_i64(),
                    );
                    (width, usable_height)
                } else {
                    (usable_width, draw_height)
                };
                placements.push(PagePlacement {
                    region_index,
                    region_id: entry.region.id.clone(),
                    page_index: next_page,
                    x: config.margins.left,
                    y: config.margins.top,
                    width,
                    height,
                    src_y_px: 0,
                    src_height_px: image.height,
                });
                next_page += 1;
            }
            RegionKind::Flow => {
                // Rows of source image that fit one usable page height at the
                // scale-to-width factor. px_per_mm = width_px / usable_width.
                let rows_per_page = ((usable_height.to_milli_i64() as i128
                    * image.width as i128)
                    / usable_width.to_milli_i64() as i128)
                    .max(1);
                let rows_per_page = u32::try_from(rows_per_page).unwrap_or(u32::MAX);

                let mut src_y = 0u32;
                while src_y < image.height {
                    let band_rows = rows_per_page.min(image.height - src_y);
                    let band_height =
                        usable_width.mul_ratio(band_rows as i64, image.width as i64);
                    placements.push(PagePlacement {
                        region_index,
                        region_id: entry.region.id.clone(),
                        page_index: next_page,
                        x: config.margins.left,
                        y: config.margins.top,
                        width: usable_width,
                        // A full band can round a hair past the usable height.
                        height: band_height.min(usable_height),
                        src_y_px: src_y,
                        src_height_px: band_rows,
                    });
                    next_page += 1;
                    src_y += band_rows;
                }
            }
        }
    }

    Ok(placements)
}

/// Total pages spanned by a placement sequence.
pub fn page_count(placements: &[PagePlacement]) -> usize {
    placements
        .iter()
        .map(|p| p.page_index + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterImage;
    use crate::types::{Margins, Size};

    // 100x100mm usable area so scale factors read directly.
    fn square_config() -> PageConfig {
        PageConfig {
            page_size: Size::from_mm(120.0, 120.0),
            margins: Margins::all(10.0),
            pixel_scale: 1.0,
        }
    }

    fn region_image(kind: RegionKind, width: u32, height: u32) -> RegionImage {
        let region = match kind {
            RegionKind::FitPage => Region::fit_page("summary"),
            RegionKind::Flow => Region::flow("narrative"),
        };
        RegionImage::new(region, RasterImage::solid(width, height, [0, 0, 0, 255]))
    }

    #[test]
    fn short_region_scales_to_usable_width() {
        let placements = layout(
            &[region_image(RegionKind::Flow, 200, 100)],
            &square_config(),
        )
        .unwrap();
        assert_eq!(placements.len(), 1);
        let p = &placements[0];
        assert_eq!(p.width.to_milli_i64(), 100_000);
        assert_eq!(p.height.to_milli_i64(), 50_000);
        assert_eq!((p.x.to_milli_i64(), p.y.to_milli_i64()), (10_000, 10_000));
    }

    #[test]
    fn fit_page_region_twice_the_usable_height_halves_both_axes() {
        // 100px wide, 200px tall -> draw height 200mm on a 100mm page.
        let placements = layout(
            &[region_image(RegionKind::FitPage, 100, 200)],
            &square_config(),
        )
        .unwrap();
        assert_eq!(page_count(&placements), 1);
        let p = &placements[0];
        assert_eq!(p.height.to_milli_i64(), 100_000);
        assert_eq!(p.width.to_milli_i64(), 50_000);
        // Aspect ratio preserved: width/height == 100/200.
        assert_eq!(p.width.to_milli_i64() * 2, p.height.to_milli_i64());
        assert_eq!((p.src_y_px, p.src_height_px), (0, 200));
    }

    #[test]
    fn fit_page_region_is_never_split() {
        let placements = layout(
            &[region_image(RegionKind::FitPage, 50, 1000)],
            &square_config(),
        )
        .unwrap();
        assert_eq!(placements.len(), 1);
        assert!(placements[0].height <= Mm::from_i32(100));
    }

    #[test]
    fn flow_region_at_two_and_a_half_pages_yields_three() {
        // 100px wide -> 1px per mm; 250px tall -> 2.5 usable heights.
        let placements = layout(
            &[region_image(RegionKind::Flow, 100, 250)],
            &square_config(),
        )
        .unwrap();
        assert_eq!(page_count(&placements), 3);
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].src_y_px, 0);
        assert_eq!(placements[0].src_height_px, 100);
        assert_eq!(placements[1].src_y_px, 100);
        assert_eq!(placements[2].src_y_px, 200);
        // Final band is the 50-row leftover, drawn at half the usable height.
        assert_eq!(placements[2].src_height_px, 50);
        assert_eq!(placements[2].height.to_milli_i64(), 50_000);
    }

    #[test]
    fn flow_bands_cover_the_source_exactly_once() {
        let placements = layout(
            &[region_image(RegionKind::Flow, 123, 1717)],
            &square_config(),
        )
        .unwrap();
        let mut expected_y = 0u32;
        for p in &placements {
            assert_eq!(p.src_y_px, expected_y);
            expected_y += p.src_height_px;
        }
        assert_eq!(expected_y, 1717);
    }

    #[test]
    fn extremely_wide_capture_stays_on_one_page() {
        // Wide enough that the rows-per-page quotient exceeds u32: the band
        // budget saturates instead of wrapping to a tiny value.
        let wide = RegionImage::new(
            Region::flow("banner"),
            RasterImage {
                width: u32::MAX,
                height: 10,
                pixels: Vec::new(),
            },
        );
        let config = PageConfig {
            page_size: Size::from_mm(10.0, 2100.0),
            margins: Margins::zero(),
            pixel_scale: 1.0,
        };
        let placements = layout(&[wide], &config).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].src_height_px, 10);
    }

    #[test]
    fn each_region_starts_a_fresh_page() {
        let placements = layout(
            &[
                region_image(RegionKind::FitPage, 100, 40),
                region_image(RegionKind::Flow, 100, 250),
                region_image(RegionKind::FitPage, 100, 40),
            ],
            &square_config(),
        )
        .unwrap();
        let pages: Vec<usize> = placements.iter().map(|p| p.page_index).collect();
        assert_eq!(pages, [0, 1, 2, 3, 4]);
        assert_eq!(page_count(&placements), 5);
        // Reading order follows region order.
        let region_order: Vec<usize> = placements.iter().map(|p| p.region_index).collect();
        assert_eq!(region_order, [0, 1, 1, 1, 2]);
    }

    #[test]
    fn zero_width_capture_fails_fast() {
        let bad = RegionImage::new(
            Region::flow("broken"),
            RasterImage {
                width: 0,
                height: 10,
                pixels: Vec::new(),
            },
        );
        let err = layout(&[bad], &square_config()).unwrap_err();
        assert!(matches!(err, FivefoldError::EmptyRegionImage(id) if id == "broken"));
    }

    #[test]
    fn empty_region_list_is_rejected() {
        assert!(matches!(
            layout(&[], &square_config()),
            Err(FivefoldError::EmptyExport)
        ));
    }

    #[test]
    fn degenerate_margins_are_rejected() {
        let config = PageConfig {
            page_size: Size::from_mm(100.0, 100.0),
            margins: Margins::all(60.0),
            pixel_scale: 1.0,
        };
        assert!(matches!(
            layout(&[region_image(RegionKind::Flow, 10, 10)], &config),
            Err(FivefoldError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn a4_default_page_count_matches_capture_height() {
        // A 2x-scale capture of a 186mm-wide report column: 1488px wide.
        // Usable height 273mm -> 2184px per page.
        let config = PageConfig::a4(12.0);
        let placements = layout(
            &[region_image(RegionKind::Flow, 1488, 5000)],
            &config,
        )
        .unwrap();
        assert_eq!(page_count(&placements), 3); // ceil(5000 / 2184)
    }
}
