use crate::core::client::{RequestOptions, ResilientClient};
use crate::domain::model::{GenerateCourseRequest, GeneratedCourse};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Method;

/// Client for the AI course-generation service.
#[derive(Debug, Clone)]
pub struct CourseGenerationClient {
    client: ResilientClient,
}

impl CourseGenerationClient {
    pub fn new(client: ResilientClient) -> Self {
        Self { client }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(ResilientClient::new(config)?))
    }

    /// True when one GET `/health` answers with a 2xx. Never fails and
    /// never retries; the body is not inspected.
    pub async fn check_health(&self) -> bool {
        match self.client.status_of("/health").await {
            Ok(status) if status.is_success() => {
                tracing::debug!("Generation service healthy: {}", status);
                true
            }
            Ok(status) => {
                tracing::warn!("Generation service health check returned {}", status);
                false
            }
            Err(e) => {
                tracing::warn!("Generation service health check failed: {}", e);
                false
            }
        }
    }

    pub async fn generate_course(&self, request: &GenerateCourseRequest) -> Result<GeneratedCourse> {
        request.validate()?;
        let request = request.trimmed();

        tracing::info!("📤 Requesting generated course '{}'", request.course_title);
        // 每次呼叫都會在服務端啟動一次生成，不重試
        let options = RequestOptions::new(Method::POST).json(&request)?;
        let course: GeneratedCourse = self
            .client
            .request_once("/generate-course", options)
            .await?;
        tracing::info!(
            "📥 Received generated course with {} modules",
            course.modules.len()
        );

        Ok(course)
    }
}
