pub mod quiz_flow;

pub use quiz_flow::QuizFlow;
