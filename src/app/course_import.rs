use crate::domain::model::{
    ContentType, Course, GeneratedContentBlock, GeneratedCourse, NewContent, NewCourse, NewModule,
};
use crate::domain::ports::CourseStore;
use crate::utils::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub course: Course,
    pub modules_created: usize,
    pub content_created: usize,
}

/// Persists a generated course draft: course first, then its modules in
/// order, then each module's content blocks in order. Stops at the first
/// failure; whatever was created before it stays on the backend.
pub struct CourseImporter<S: CourseStore> {
    store: S,
}

impl<S: CourseStore> CourseImporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn import(&self, draft: &GeneratedCourse) -> Result<ImportSummary> {
        let course = self
            .store
            .create_course(&NewCourse {
                title: draft.course_title.trim().to_string(),
                body: draft.course_description.trim().to_string(),
            })
            .await?;
        tracing::info!("📚 Created course {} '{}'", course.id, course.title);

        let mut modules_created = 0;
        let mut content_created = 0;

        for generated in &draft.modules {
            let module = self
                .store
                .create_module(&NewModule {
                    title: generated.title.trim().to_string(),
                    body: generated.body.trim().to_string(),
                    course_id: course.id,
                })
                .await?;
            modules_created += 1;
            tracing::debug!("Created module {} '{}'", module.id, module.title);

            for block in &generated.content_blocks {
                self.store
                    .create_content(&content_from_block(module.id, block))
                    .await?;
                content_created += 1;
            }
        }

        tracing::info!(
            "✅ Imported course {}: {} modules, {} content blocks",
            course.id,
            modules_created,
            content_created
        );

        Ok(ImportSummary {
            course,
            modules_created,
            content_created,
        })
    }
}

fn content_from_block(module_id: i64, block: &GeneratedContentBlock) -> NewContent {
    // 題目區塊的題幹可能只放在 questionText
    let body = if block.body.trim().is_empty() {
        block.question_text.clone()
    } else {
        Some(block.body.clone())
    };

    match block.content_type {
        ContentType::Text => NewContent {
            title: block.title.clone(),
            body,
            content_type: ContentType::Text,
            module_id,
            options: None,
            correct_answer: None,
        },
        ContentType::Question => NewContent::question(
            module_id,
            block.title.clone(),
            body,
            block.options.clone().unwrap_or_default(),
            block.correct_answer.clone().unwrap_or_default(),
        ),
    }
    .normalized()
}
