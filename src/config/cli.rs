use crate::config::toml_config::FileConfig;
use crate::config::ClientConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings resolve as defaults, then environment variables, then the
/// config file, then these flags.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "course-portal")]
#[command(about = "Command-line client for the course-management backend")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file with [backend] and [generation] tables")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Backend base URL, e.g. http://localhost:8080/api")]
    pub backend_url: Option<String>,

    #[arg(long, help = "Generation service base URL")]
    pub generation_url: Option<String>,

    #[arg(long, help = "Per-attempt timeout in milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, help = "Attempts per request, the first one included")]
    pub retry_attempts: Option<u32>,

    #[arg(long, help = "Backoff base in milliseconds; attempt n waits n times this")]
    pub retry_delay_ms: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// List all courses
    Courses,
    /// Show one course
    Course { id: i64 },
    /// Create a course
    CreateCourse {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Replace a course's title and body
    UpdateCourse {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Delete a course
    DeleteCourse { id: i64 },
    /// List the modules of a course
    Modules { course_id: i64 },
    /// Add a module to a course
    CreateModule {
        course_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Show one module
    Module { id: i64 },
    /// Replace a module's title and body
    UpdateModule {
        id: i64,
        #[arg(long)]
        course_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Delete a module
    DeleteModule { id: i64 },
    /// List the content blocks of a module
    Content { module_id: i64 },
    /// Add a text block, or a question block when --options is given
    CreateContent {
        module_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, value_delimiter = ',')]
        options: Vec<String>,
        #[arg(long)]
        correct_answer: Option<String>,
    },
    /// Show one content block
    ContentBlock { id: i64 },
    /// Replace a content block; --options turns it into a question
    UpdateContent {
        id: i64,
        #[arg(long)]
        module_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, value_delimiter = ',')]
        options: Vec<String>,
        #[arg(long)]
        correct_answer: Option<String>,
    },
    /// Mark a content block complete
    Complete { id: i64 },
    /// Answer a question block
    Answer { id: i64, answer: String },
    /// Courses a user belongs to
    UserCourses { user_id: String },
    /// Members of a course
    CourseUsers { course_id: i64 },
    /// Enrol students by username
    AddStudents {
        course_id: i64,
        #[arg(value_delimiter = ',')]
        usernames: Vec<String>,
    },
    /// Add teachers by username
    AddTeachers {
        course_id: i64,
        #[arg(value_delimiter = ',')]
        usernames: Vec<String>,
    },
    /// Remove a member from a course
    RemoveUser { course_id: i64, user_id: String },
    /// Check which usernames exist
    ValidateUsers {
        #[arg(value_delimiter = ',')]
        usernames: Vec<String>,
    },
    /// Profiles for the given usernames
    SearchUsers {
        #[arg(value_delimiter = ',')]
        usernames: Vec<String>,
    },
    /// Show a user by id
    User { id: String },
    /// Show a user by username
    UserByName { username: String },
    /// Check that the generation service is up
    Health,
    /// Generate a course draft, optionally saving it to the backend
    Generate {
        #[arg(long)]
        title: String,
        #[arg(long)]
        topics: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        starting_point: String,
        #[arg(long)]
        finish_line: String,
        #[arg(long, help = "Create the generated course on the backend")]
        import: bool,
    },
}

impl CliConfig {
    fn file_config(&self) -> Result<FileConfig> {
        match &self.config {
            Some(path) => {
                let file = FileConfig::from_file(path)?;
                file.validate()?;
                Ok(file)
            }
            None => Ok(FileConfig::default()),
        }
    }

    fn apply_flags(&self, mut config: ClientConfig, base_url: &Option<String>) -> ClientConfig {
        if let Some(url) = base_url {
            config.base_url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(retry_attempts) = self.retry_attempts {
            config.retry_attempts = retry_attempts;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            config.retry_delay_ms = retry_delay_ms;
        }
        config
    }

    pub fn backend_config(&self) -> Result<ClientConfig> {
        let file = self.file_config()?;
        let config = self.apply_flags(
            file.backend(ClientConfig::backend_from_env()),
            &self.backend_url,
        );
        config.validate()?;
        Ok(config)
    }

    pub fn generation_config(&self) -> Result<ClientConfig> {
        let file = self.file_config()?;
        let config = self.apply_flags(
            file.generation(ClientConfig::generation_from_env()),
            &self.generation_url,
        );
        config.validate()?;
        Ok(config)
    }
}
