use crate::error::FivefoldError;
use crate::layout::{PagePlacement, RegionImage};
use crate::types::PageConfig;

/// Capability that turns a placement sequence plus the rasterized regions
/// into a finished document artifact. Implementations must produce the whole
/// artifact or fail; a partial document is never returned.
pub trait PageComposer {
    type Artifact;

    fn compose(
        &self,
        placements: &[PagePlacement],
        regions: &[RegionImage],
        config: &PageConfig,
    ) -> Result<Self::Artifact, FivefoldError>;
}
