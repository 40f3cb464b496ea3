pub mod quiz;
pub mod quiz_attempt;

pub use quiz::{AnswerOption, Question, QuestionBody, Quiz};
pub use quiz_attempt::{QuizAttempt, UserAnswer};
