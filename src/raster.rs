use crate::error::FivefoldError;

/// A captured content region: straight-alpha RGBA8, row-major, top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, FivefoldError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(FivefoldError::Compose(format!(
                "pixel buffer is {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Uniform-colour image. Used by fakes and the raster compositor tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.row_bytes();
        &self.pixels[start..start + self.row_bytes()]
    }

    /// Horizontal band of rows `[y, y + h)`, clamped to real image content.
    /// The returned band never reads past `height`; a fully out-of-range
    /// request yields an empty band.
    pub fn band(&self, y: u32, h: u32) -> RasterImage {
        let y = y.min(self.height);
        let h = h.min(self.height - y);
        let start = y as usize * self.row_bytes();
        let end = start + h as usize * self.row_bytes();
        RasterImage {
            width: self.width,
            height: h,
            pixels: self.pixels[start..end].to_vec(),
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] != 255)
    }
}

/// Layout policy for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Scale down uniformly so the whole region fits one page; never split.
    FitPage,
    /// Slice vertically into page-sized bands across as many pages as needed.
    Flow,
}

/// A distinct rendered content block targeted for export, e.g. the score
/// summary chart or the long interpretation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub kind: RegionKind,
}

impl Region {
    pub fn fit_page(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RegionKind::FitPage,
        }
    }

    pub fn flow(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: RegionKind::Flow,
        }
    }
}

/// Capability that renders a region to a bitmap at the export's pixel
/// density. Implementations must wait for the region's asynchronous
/// rendering dependencies (fonts, chart layout) to settle before capturing;
/// a capture taken earlier is visually incomplete.
pub trait Rasterizer {
    fn rasterize(&self, region: &Region) -> Result<RasterImage, FivefoldError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::BTreeMap;

    /// Rasterizer double returning preconfigured images per region id.
    #[derive(Default)]
    pub struct FixedRasterizer {
        images: BTreeMap<String, RasterImage>,
    }

    impl FixedRasterizer {
        pub fn with(mut self, id: &str, image: RasterImage) -> Self {
            self.images.insert(id.to_string(), image);
            self
        }
    }

    impl Rasterizer for FixedRasterizer {
        fn rasterize(&self, region: &Region) -> Result<RasterImage, FivefoldError> {
            self.images
                .get(&region.id)
                .cloned()
                .ok_or_else(|| FivefoldError::Compose(format!("no capture for '{}'", region.id)))
        }
    }

    /// An image whose rows encode their original index in the red channel,
    /// so band tests can check slice alignment.
    pub fn row_indexed_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for _ in 0..width {
                pixels.extend_from_slice(&[(y % 256) as u8, 0, 0, 255]);
            }
        }
        RasterImage {
            width,
            height,
            pixels,
        }
    }
}
