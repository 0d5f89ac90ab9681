pub mod analyzer;
pub mod config;
pub mod fetcher;
pub mod integrator;
pub mod loader;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod storage;
pub mod utils;
pub mod visualizer;

pub use config::{load_config, AppConfig, MissingIndexPolicy};
pub use fetcher::{IndexSource, SidraFetcher};
pub use model::{PipelineError, Table, MISSING};
pub use pipeline::{run, PipelineOutput};
