pub mod consistency_validator;
pub mod content_extractor;
pub mod course_scraper;
pub mod fallback;
pub mod html;
pub mod prompt_builder;
pub mod question_parser;

pub use consistency_validator::{ConceptRecord, ConsistencyValidator, Inconsistency};
pub use content_extractor::{ContentExtractor, TopicLocation};
pub use course_scraper::{CourseTreeScraper, SiteLayout};
pub use fallback::fallback_questions;
pub use question_parser::{QuestionParser, RegexQuestionParser};
