pub mod course_data;
pub mod toml_loader;

pub use course_data::{load_course_data, CourseData, CourseDataModule};
pub use toml_loader::{load_replacement_table, ReplacementTable};
