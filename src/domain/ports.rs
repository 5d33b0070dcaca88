use crate::domain::model::{Content, Course, Module, NewContent, NewCourse, NewModule};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Settings a resilient client resolves once at construction.
pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout(&self) -> Duration;
    /// Total attempts per logical request, the first one included.
    fn max_attempts(&self) -> u32;
    fn retry_delay(&self) -> Duration;
}

/// Write side of the backend used when persisting a course tree.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create_course(&self, course: &NewCourse) -> Result<Course>;
    async fn create_module(&self, module: &NewModule) -> Result<Module>;
    async fn create_content(&self, content: &NewContent) -> Result<Content>;
}
