//! End-to-end pipelines: page rasterization, the autofill run, source
//! document ingestion, and run statistics.

pub mod autofill;
pub mod extract;
pub mod pages;
pub mod stats;

pub use autofill::{AutofillPipeline, FillReport};
pub use extract::BiodataExtractor;
pub use pages::{PageRasterizer, PdftoppmCli, save_filled_pages};
pub use stats::FillStats;
