pub mod course_import;
