use serde::{Deserialize, Deserializer, Serialize};

// The backend's own DTOs say `name`/`description` where the rest of the API
// says `title`/`body`; responses accept both spellings.

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload of endpoints that answer without a JSON body (204s, bare DELETEs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    Text,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    LDUser,
    EmployeeUser,
}

/// Membership role. Older backend builds report the user type instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseRole {
    #[serde(rename = "teacher", alias = "LDUser")]
    Teacher,
    #[serde(rename = "student", alias = "EmployeeUser")]
    Student,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    #[serde(alias = "name", default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(alias = "description", default, deserialize_with = "nullable_string")]
    pub body: String,
    pub teacher_count: Option<u32>,
    pub student_count: Option<u32>,
    pub module_count: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: i64,
    #[serde(alias = "name", default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(alias = "description", default, deserialize_with = "nullable_string")]
    pub body: String,
    pub course_id: i64,
    pub progress: Option<f64>,
    pub content_count: Option<u32>,
    pub position: Option<u32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A content block. Question blocks additionally carry their options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    pub body: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub module_id: i64,
    pub position: Option<u32>,
    #[serde(alias = "complete")]
    pub is_complete: Option<bool>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub user_answer: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Content {
    pub fn is_question(&self) -> bool {
        self.content_type == ContentType::Question && self.options.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub user_type: UserType,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCourse {
    pub id: i64,
    #[serde(alias = "name", default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(alias = "description", default, deserialize_with = "nullable_string")]
    pub body: String,
    pub role: CourseRole,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUser {
    pub course_id: i64,
    pub user_id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub role: CourseRole,
    pub user_type: Option<UserType>,
    pub joined_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewModule {
    pub title: String,
    pub body: String,
    pub course_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub title: String,
    pub body: Option<String>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub module_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl NewContent {
    pub fn text(module_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Some(body.into()),
            content_type: ContentType::Text,
            module_id,
            options: None,
            correct_answer: None,
        }
    }

    pub fn question(
        module_id: i64,
        title: impl Into<String>,
        body: Option<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body,
            content_type: ContentType::Question,
            module_id,
            options: Some(options),
            correct_answer: Some(correct_answer.into()),
        }
    }

    /// Trims the text fields and drops blank options, the way the content
    /// form cleans its input before submitting.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.body = self
            .body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        self.options = self.options.map(|opts| {
            opts.into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        });
        self.correct_answer = self.correct_answer.map(|a| a.trim().to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsernamesRequest {
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitAnswer {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateCourseRequest {
    pub course_title: String,
    pub course_topics: String,
    pub course_description: String,
    pub starting_point_description: String,
    pub finish_line_description: String,
}

impl GenerateCourseRequest {
    pub fn trimmed(&self) -> Self {
        Self {
            course_title: self.course_title.trim().to_string(),
            course_topics: self.course_topics.trim().to_string(),
            course_description: self.course_description.trim().to_string(),
            starting_point_description: self.starting_point_description.trim().to_string(),
            finish_line_description: self.finish_line_description.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContentBlock {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub is_complete: bool,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub question_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedModule {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub content_blocks: Vec<GeneratedContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCourse {
    pub course_title: String,
    #[serde(default)]
    pub course_description: String,
    #[serde(default)]
    pub modules: Vec<GeneratedModule>,
}
