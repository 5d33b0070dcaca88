use clap::Parser;
use course_portal_client::domain::model::{GenerateCourseRequest, NewContent, NewCourse, NewModule};
use course_portal_client::utils::error::ErrorSeverity;
use course_portal_client::utils::logger;
use course_portal_client::{
    ApiError, BackendApi, CliConfig, Command, CourseGenerationClient, CourseImporter,
};
use serde::Serialize;
use serde_json::{json, Value};

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}

fn new_content(
    module_id: i64,
    title: &str,
    body: &Option<String>,
    options: &[String],
    correct_answer: &Option<String>,
) -> NewContent {
    if options.is_empty() {
        NewContent::text(module_id, title, body.clone().unwrap_or_default())
    } else {
        NewContent::question(
            module_id,
            title,
            body.clone(),
            options.to_vec(),
            correct_answer.clone().unwrap_or_default(),
        )
    }
}

fn backend(config: &CliConfig) -> Result<BackendApi, ApiError> {
    BackendApi::from_config(&config.backend_config()?)
}

fn generation(config: &CliConfig) -> Result<CourseGenerationClient, ApiError> {
    CourseGenerationClient::from_config(&config.generation_config()?)
}

async fn run(config: &CliConfig) -> Result<Value, ApiError> {
    match &config.command {
        Command::Health => {
            let healthy = generation(config)?.check_health().await;
            Ok(json!({ "healthy": healthy }))
        }
        Command::Generate {
            title,
            topics,
            description,
            starting_point,
            finish_line,
            import,
        } => {
            let request = GenerateCourseRequest {
                course_title: title.clone(),
                course_topics: topics.clone(),
                course_description: description.clone(),
                starting_point_description: starting_point.clone(),
                finish_line_description: finish_line.clone(),
            };
            let draft = generation(config)?.generate_course(&request).await?;
            if !import {
                return to_value(draft);
            }

            let summary = CourseImporter::new(backend(config)?).import(&draft).await?;
            Ok(json!({
                "course": to_value(summary.course)?,
                "modulesCreated": summary.modules_created,
                "contentCreated": summary.content_created,
            }))
        }
        Command::Courses => to_value(backend(config)?.get_courses().await?),
        Command::Course { id } => to_value(backend(config)?.get_course(*id).await?),
        Command::CreateCourse { title, body } => {
            let course = NewCourse {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
            };
            to_value(backend(config)?.create_course(&course).await?)
        }
        Command::UpdateCourse { id, title, body } => {
            let course = NewCourse {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
            };
            to_value(backend(config)?.update_course(*id, &course).await?)
        }
        Command::DeleteCourse { id } => to_value(backend(config)?.delete_course(*id).await?),
        Command::Modules { course_id } => {
            to_value(backend(config)?.get_modules_by_course(*course_id).await?)
        }
        Command::CreateModule {
            course_id,
            title,
            body,
        } => {
            let module = NewModule {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
                course_id: *course_id,
            };
            to_value(backend(config)?.create_module(&module).await?)
        }
        Command::Module { id } => to_value(backend(config)?.get_module(*id).await?),
        Command::UpdateModule {
            id,
            course_id,
            title,
            body,
        } => {
            let module = NewModule {
                title: title.trim().to_string(),
                body: body.trim().to_string(),
                course_id: *course_id,
            };
            to_value(backend(config)?.update_module(*id, &module).await?)
        }
        Command::DeleteModule { id } => to_value(backend(config)?.delete_module(*id).await?),
        Command::Content { module_id } => {
            to_value(backend(config)?.get_content_by_module(*module_id).await?)
        }
        Command::CreateContent {
            module_id,
            title,
            body,
            options,
            correct_answer,
        } => {
            let content = new_content(*module_id, title, body, options, correct_answer);
            to_value(backend(config)?.create_content(&content).await?)
        }
        Command::ContentBlock { id } => to_value(backend(config)?.get_content(*id).await?),
        Command::UpdateContent {
            id,
            module_id,
            title,
            body,
            options,
            correct_answer,
        } => {
            let content = new_content(*module_id, title, body, options, correct_answer);
            to_value(backend(config)?.update_content(*id, &content).await?)
        }
        Command::Complete { id } => to_value(backend(config)?.mark_content_complete(*id).await?),
        Command::Answer { id, answer } => {
            to_value(backend(config)?.submit_answer(*id, answer).await?)
        }
        Command::UserCourses { user_id } => {
            to_value(backend(config)?.get_user_courses(user_id).await?)
        }
        Command::CourseUsers { course_id } => {
            to_value(backend(config)?.get_course_users(*course_id).await?)
        }
        Command::AddStudents {
            course_id,
            usernames,
        } => to_value(
            backend(config)?
                .add_students_to_course(*course_id, usernames)
                .await?,
        ),
        Command::AddTeachers {
            course_id,
            usernames,
        } => to_value(
            backend(config)?
                .add_teachers_to_course(*course_id, usernames)
                .await?,
        ),
        Command::RemoveUser { course_id, user_id } => to_value(
            backend(config)?
                .remove_user_from_course(*course_id, user_id)
                .await?,
        ),
        Command::ValidateUsers { usernames } => {
            to_value(backend(config)?.validate_usernames(usernames).await?)
        }
        Command::SearchUsers { usernames } => {
            to_value(backend(config)?.search_users(usernames).await?)
        }
        Command::User { id } => to_value(backend(config)?.get_user(id).await?),
        Command::UserByName { username } => {
            to_value(backend(config)?.get_user_by_username(username).await?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting course-portal CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
