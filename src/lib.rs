mod app;
mod catalog;
mod compose;
mod error;
mod export;
mod gateway;
mod gemini;
mod layout;
mod pdf;
mod preview;
mod raster;
mod scoring;
mod session;
mod types;

pub use app::View;
pub use catalog::{Dimension, ITEMS_PER_DIMENSION, Statement, catalog, statement_by_id};
pub use compose::PageComposer;
pub use error::FivefoldError;
pub use export::{ReportExporter, ReportExporterBuilder};
pub use gateway::{
    DiagnosisPayload, DiagnosisResult, GatewayError, InterpretationGateway, Mission, WeeklyGoal,
};
pub use gemini::GeminiGateway;
pub use layout::{PagePlacement, RegionImage, layout, page_count};
pub use pdf::{Background, PdfComposer};
pub use preview::RasterComposer;
pub use raster::{RasterImage, Rasterizer, Region, RegionKind};
pub use scoring::{
    DimensionTotals, MIDPOINT, Responses, compute_totals, effective_score,
};
pub use session::{DiagnosisSession, SessionState};
pub use types::{Margins, Mm, PageConfig, Size};
