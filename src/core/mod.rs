pub mod backend;
pub mod client;
pub mod generation;

pub use crate::domain::model::*;
pub use crate::domain::ports::{ConfigProvider, CourseStore};
pub use crate::utils::error::Result;
