//! Typed access to every course-backend resource over one [`ResilientClient`].

use crate::core::client::ResilientClient;
use crate::domain::model::{
    Content, Course, CourseUser, Empty, Module, NewContent, NewCourse, NewModule, SubmitAnswer,
    UserCourse, UserProfile, UsernamesRequest,
};
use crate::domain::ports::{ConfigProvider, CourseStore};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct BackendApi {
    client: ResilientClient,
}

fn escape_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl BackendApi {
    pub fn new(client: ResilientClient) -> Self {
        Self { client }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(ResilientClient::new(config)?))
    }

    pub fn client(&self) -> &ResilientClient {
        &self.client
    }

    // ================ Courses ================

    pub async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        course.validate()?;
        self.client.post("/courses", course).await
    }

    pub async fn get_courses(&self) -> Result<Vec<Course>> {
        self.client.get("/courses").await
    }

    pub async fn get_course(&self, id: i64) -> Result<Course> {
        self.client.get(&format!("/courses/{}", id)).await
    }

    pub async fn update_course(&self, id: i64, course: &NewCourse) -> Result<Course> {
        course.validate()?;
        self.client.put(&format!("/courses/{}", id), course).await
    }

    pub async fn delete_course(&self, id: i64) -> Result<Empty> {
        self.client.delete(&format!("/courses/{}", id)).await
    }

    // ================ Modules ================

    pub async fn create_module(&self, module: &NewModule) -> Result<Module> {
        module.validate()?;
        self.client.post("/modules", module).await
    }

    pub async fn get_modules_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        self.client
            .get(&format!("/modules/course/{}", course_id))
            .await
    }

    pub async fn get_module(&self, id: i64) -> Result<Module> {
        self.client.get(&format!("/modules/{}", id)).await
    }

    pub async fn update_module(&self, id: i64, module: &NewModule) -> Result<Module> {
        module.validate()?;
        self.client.put(&format!("/modules/{}", id), module).await
    }

    pub async fn delete_module(&self, id: i64) -> Result<Empty> {
        self.client.delete(&format!("/modules/{}", id)).await
    }

    // ================ Content ================

    pub async fn create_content(&self, content: &NewContent) -> Result<Content> {
        let content = content.clone().normalized();
        content.validate()?;
        self.client.post("/content", &content).await
    }

    pub async fn get_content_by_module(&self, module_id: i64) -> Result<Vec<Content>> {
        self.client
            .get(&format!("/content/module/{}", module_id))
            .await
    }

    pub async fn get_content(&self, id: i64) -> Result<Content> {
        self.client.get(&format!("/content/{}", id)).await
    }

    pub async fn update_content(&self, id: i64, content: &NewContent) -> Result<Content> {
        let content = content.clone().normalized();
        content.validate()?;
        self.client.put(&format!("/content/{}", id), &content).await
    }

    pub async fn delete_content(&self, id: i64) -> Result<Empty> {
        self.client.delete(&format!("/content/{}", id)).await
    }

    pub async fn mark_content_complete(&self, id: i64) -> Result<Content> {
        self.client
            .post_empty(&format!("/content/{}/complete", id))
            .await
    }

    pub async fn submit_answer(&self, id: i64, answer: &str) -> Result<Content> {
        let body = SubmitAnswer {
            answer: answer.to_string(),
        };
        self.client
            .post(&format!("/content/{}/answer", id), &body)
            .await
    }

    // ================ Users ================

    /// Maps each username to whether the backend knows it.
    pub async fn validate_usernames(&self, usernames: &[String]) -> Result<HashMap<String, bool>> {
        let body = UsernamesRequest {
            usernames: usernames.to_vec(),
        };
        body.validate()?;
        self.client.post("/users/validate", &body).await
    }

    pub async fn search_users(&self, usernames: &[String]) -> Result<Vec<UserProfile>> {
        let body = UsernamesRequest {
            usernames: usernames.to_vec(),
        };
        body.validate()?;
        self.client.post("/users/search", &body).await
    }

    pub async fn get_user(&self, id: &str) -> Result<UserProfile> {
        self.client
            .get(&format!("/users/{}", escape_segment(id)))
            .await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<UserProfile> {
        self.client
            .get(&format!("/users/username/{}", escape_segment(username)))
            .await
    }

    // ================ Course memberships ================

    pub async fn add_teachers_to_course(
        &self,
        course_id: i64,
        usernames: &[String],
    ) -> Result<Empty> {
        self.add_members(course_id, "teachers", usernames).await
    }

    pub async fn add_students_to_course(
        &self,
        course_id: i64,
        usernames: &[String],
    ) -> Result<Empty> {
        self.add_members(course_id, "students", usernames).await
    }

    async fn add_members(&self, course_id: i64, role: &str, usernames: &[String]) -> Result<Empty> {
        let body = UsernamesRequest {
            usernames: usernames.to_vec(),
        };
        body.validate()?;
        self.client
            .post(
                &format!("/course-memberships/course/{}/{}", course_id, role),
                &body,
            )
            .await
    }

    pub async fn get_user_courses(&self, user_id: &str) -> Result<Vec<UserCourse>> {
        self.client
            .get(&format!(
                "/course-memberships/user/{}/courses",
                escape_segment(user_id)
            ))
            .await
    }

    pub async fn get_course_users(&self, course_id: i64) -> Result<Vec<CourseUser>> {
        self.client
            .get(&format!("/course-memberships/course/{}/users", course_id))
            .await
    }

    pub async fn remove_user_from_course(&self, course_id: i64, user_id: &str) -> Result<Empty> {
        self.client
            .delete(&format!(
                "/course-memberships/course/{}/users/{}",
                course_id,
                escape_segment(user_id)
            ))
            .await
    }
}

#[async_trait]
impl CourseStore for BackendApi {
    async fn create_course(&self, course: &NewCourse) -> Result<Course> {
        BackendApi::create_course(self, course).await
    }

    async fn create_module(&self, module: &NewModule) -> Result<Module> {
        BackendApi::create_module(self, module).await
    }

    async fn create_content(&self, content: &NewContent) -> Result<Content> {
        BackendApi::create_content(self, content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_segment() {
        assert_eq!(escape_segment("alice"), "alice");
        assert_eq!(escape_segment("jane doe"), "jane%20doe");
        assert_eq!(escape_segment("a/b?c"), "a%2Fb%3Fc");
    }
}
