pub mod array_pipeline;
pub mod line_pipeline;

pub use array_pipeline::ArrayPipeline;
pub use line_pipeline::LinePipeline;
