use crate::compose::PageComposer;
use crate::error::FivefoldError;
use crate::layout::{RegionImage, layout};
use crate::raster::{Rasterizer, Region};
use crate::types::{Margins, Mm, PageConfig, Size};

/// Front door for document export. Validates page geometry once at build
/// time, then drives rasterize → layout → compose for each export call.
#[derive(Debug)]
pub struct ReportExporter {
    config: PageConfig,
}

#[derive(Debug, Clone)]
pub struct ReportExporterBuilder {
    page_size: Size,
    margins: Margins,
    pixel_scale: f32,
}

impl Default for ReportExporterBuilder {
    fn default() -> Self {
        Self {
            page_size: Size::a4(),
            margins: Margins::all(12.0),
            pixel_scale: 2.0,
        }
    }
}

impl ReportExporterBuilder {
    pub fn page_size(mut self, size: Size) -> Self {
        self.page_size = size;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn pixel_scale(mut self, pixel_scale: f32) -> Self {
        self.pixel_scale = pixel_scale;
        self
    }

    pub fn build(self) -> Result<ReportExporter, FivefoldError> {
        if self.page_size.width <= Mm::ZERO || self.page_size.height <= Mm::ZERO {
            return Err(FivefoldError::InvalidConfiguration(
                "page_size must be positive in both dimensions".into(),
            ));
        }
        let config = PageConfig {
            page_size: self.page_size,
            margins: self.margins,
            pixel_scale: self.pixel_scale,
        };
        if config.usable_width() <= Mm::ZERO || config.usable_height() <= Mm::ZERO {
            return Err(FivefoldError::InvalidConfiguration(
                "margins leave no usable page area".into(),
            ));
        }
        if !(config.pixel_scale > 0.0 && config.pixel_scale.is_finite()) {
            return Err(FivefoldError::InvalidConfiguration(
                "pixel_scale must be positive and finite".into(),
            ));
        }
        if config.pixel_scale > 8.0 {
            return Err(FivefoldError::InvalidConfiguration(
                "pixel_scale above 8 produces pages too large to compose".into(),
            ));
        }
        Ok(ReportExporter { config })
    }
}

impl ReportExporter {
    pub fn builder() -> ReportExporterBuilder {
        ReportExporterBuilder::default()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Export the regions as one document artifact.
    ///
    /// All regions are rasterized before any page is composed, so pages never
    /// mix captures from different moments. Any rasterization, layout, or
    /// composition failure aborts the whole export; nothing partial is
    /// produced.
    pub fn export<C: PageComposer>(
        &self,
        regions: &[Region],
        rasterizer: &dyn Rasterizer,
        composer: &C,
    ) -> Result<C::Artifact, FivefoldError> {
        if regions.is_empty() {
            return Err(FivefoldError::EmptyExport);
        }
        let mut captured = Vec::with_capacity(regions.len());
        for region in regions {
            let image = rasterizer.rasterize(region)?;
            if image.width == 0 || image.height == 0 {
                return Err(FivefoldError::EmptyRegionImage(region.id.clone()));
            }
            captured.push(RegionImage::new(region.clone(), image));
        }
        let placements = layout(&captured, &self.config)?;
        tracing::debug!(
            regions = regions.len(),
            placements = placements.len(),
            "report layout complete"
        );
        composer.compose(&placements, &captured, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::PageComposer;
    use crate::layout::{PagePlacement, page_count};
    use crate::pdf::PdfComposer;
    use crate::raster::RasterImage;
    use crate::raster::testing::FixedRasterizer;

    /// Composer double that records what it was asked to compose.
    struct CountingComposer;

    impl PageComposer for CountingComposer {
        type Artifact = usize;

        fn compose(
            &self,
            placements: &[PagePlacement],
            _regions: &[crate::layout::RegionImage],
            _config: &crate::types::PageConfig,
        ) -> Result<usize, FivefoldError> {
            Ok(page_count(placements))
        }
    }

    #[test]
    fn builder_rejects_margins_that_consume_the_page() {
        let err = ReportExporter::builder()
            .page_size(Size::from_mm(100.0, 100.0))
            .margins(Margins::all(50.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, FivefoldError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("usable"));
    }

    #[test]
    fn builder_rejects_bad_pixel_scale() {
        for scale in [0.0, -1.0, f32::NAN, 9.0] {
            let err = ReportExporter::builder()
                .pixel_scale(scale)
                .build()
                .unwrap_err();
            assert!(matches!(err, FivefoldError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn exporter_and_build_errors_are_debuggable() {
        // `unwrap`/`unwrap_err` on the build result need both sides printable.
        let exporter = ReportExporter::builder().build().unwrap();
        assert!(format!("{:?}", exporter).contains("ReportExporter"));
        let err = ReportExporter::builder().pixel_scale(0.0).build().unwrap_err();
        assert!(!format!("{:?}", err).is_empty());
    }

    #[test]
    fn default_builder_is_a4_with_uniform_margins() {
        let exporter = ReportExporter::builder().build().unwrap();
        let config = exporter.config();
        assert_eq!(config.page_size, Size::a4());
        assert_eq!(config.margins, Margins::all(12.0));
        assert_eq!(config.pixel_scale, 2.0);
    }

    #[test]
    fn export_drives_rasterize_layout_compose() {
        let exporter = ReportExporter::builder().build().unwrap();
        let rasterizer = FixedRasterizer::default()
            .with("chart", RasterImage::solid(744, 1000, [0, 0, 0, 255]))
            .with("text", RasterImage::solid(1488, 5000, [0, 0, 0, 255]));
        let regions = [Region::fit_page("chart"), Region::flow("text")];
        let pages = exporter
            .export(&regions, &rasterizer, &CountingComposer)
            .unwrap();
        // 1 fit page + ceil(5000 / 2184) flow pages.
        assert_eq!(pages, 4);
    }

    #[test]
    fn missing_capture_aborts_the_whole_export() {
        let exporter = ReportExporter::builder().build().unwrap();
        let rasterizer =
            FixedRasterizer::default().with("chart", RasterImage::solid(10, 10, [0, 0, 0, 255]));
        let regions = [Region::fit_page("chart"), Region::flow("text")];
        let err = exporter
            .export(&regions, &rasterizer, &CountingComposer)
            .unwrap_err();
        assert!(matches!(err, FivefoldError::Compose(_)));
    }

    #[test]
    fn zero_width_capture_aborts_before_composition() {
        let exporter = ReportExporter::builder().build().unwrap();
        let rasterizer = FixedRasterizer::default().with(
            "chart",
            RasterImage {
                width: 0,
                height: 10,
                pixels: Vec::new(),
            },
        );
        let err = exporter
            .export(&[Region::fit_page("chart")], &rasterizer, &CountingComposer)
            .unwrap_err();
        assert!(matches!(err, FivefoldError::EmptyRegionImage(id) if id == "chart"));
    }

    #[test]
    fn end_to_end_pdf_export() {
        let exporter = ReportExporter::builder().build().unwrap();
        let rasterizer = FixedRasterizer::default()
            .with("chart", RasterImage::solid(744, 800, [200, 220, 200, 255]))
            .with("text", RasterImage::solid(1488, 3000, [250, 250, 249, 255]));
        let regions = [Region::fit_page("chart"), Region::flow("text")];
        let bytes = exporter
            .export(&regions, &rasterizer, &PdfComposer::new())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 3); // 1 + ceil(3000 / 2184)
    }
}
