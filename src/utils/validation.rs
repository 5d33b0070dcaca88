use crate::domain::model::{
    ContentType, GenerateCourseRequest, NewContent, NewCourse, NewModule, UsernamesRequest,
};
use crate::utils::error::{ApiError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ApiError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ApiError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ApiError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ApiError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require_title(title: &str) -> Result<()> {
    if is_blank(title) {
        return Err(ApiError::validation("Title is required"));
    }
    Ok(())
}

impl Validate for NewCourse {
    fn validate(&self) -> Result<()> {
        require_title(&self.title)
    }
}

impl Validate for NewModule {
    fn validate(&self) -> Result<()> {
        require_title(&self.title)
    }
}

impl Validate for NewContent {
    fn validate(&self) -> Result<()> {
        require_title(&self.title)?;

        if self.content_type != ContentType::Question {
            return Ok(());
        }

        let options: Vec<&str> = self
            .options
            .iter()
            .flatten()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();
        if options.len() < 2 {
            return Err(ApiError::validation(
                "Questions must have at least 2 options",
            ));
        }

        let answer = self
            .correct_answer
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if answer.is_empty() {
            return Err(ApiError::validation(
                "Correct answer is required for questions",
            ));
        }
        if !options.contains(&answer) {
            return Err(ApiError::validation(
                "Correct answer must be one of the provided options",
            ));
        }

        Ok(())
    }
}

impl Validate for UsernamesRequest {
    fn validate(&self) -> Result<()> {
        if self.usernames.is_empty() {
            return Err(ApiError::validation("At least one username is required"));
        }
        if self.usernames.iter().any(|u| is_blank(u)) {
            return Err(ApiError::validation("Usernames cannot be blank"));
        }
        Ok(())
    }
}

impl Validate for GenerateCourseRequest {
    fn validate(&self) -> Result<()> {
        let fields = [
            &self.course_title,
            &self.course_topics,
            &self.course_description,
            &self.starting_point_description,
            &self.finish_line_description,
        ];
        if fields.iter().any(|f| is_blank(f)) {
            return Err(ApiError::validation(
                "Please fill in all fields for AI generation",
            ));
        }
        Ok(())
    }
}
