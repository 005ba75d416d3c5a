pub mod course;
pub mod loaders;
pub mod question;
pub mod topic;

pub use course::{CourseTree, ModuleNode, TopicNode, UnitNode};
pub use loaders::{load_course_data, load_replacement_table, CourseData, ReplacementTable};
pub use question::{
    ConsistencyProbe, GeneratedQuestion, OptionLetter, QuestionOptions, QuestionSource, QuizResult,
};
pub use topic::{ImageInfo, TopicContent, TopicKind, VideoInfo};
