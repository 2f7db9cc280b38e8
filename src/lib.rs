pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod logging;
pub mod pipeline;
pub mod rewrite;
pub mod store;
pub mod transform;

pub use pipeline::{Pipeline, PipelineOutcome, PipelineRequest};
pub use rewrite::{CellRewriter, RewriteReport};
pub use transform::{TransformReport, WorkbookTransformer};
