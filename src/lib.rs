pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use app::course_import::{CourseImporter, ImportSummary};
pub use config::ClientConfig;
pub use core::{
    backend::BackendApi,
    client::{RequestOptions, ResilientClient},
    generation::CourseGenerationClient,
};
pub use utils::error::{ApiError, Result};
