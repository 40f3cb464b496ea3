pub mod grading;
pub mod projection;
pub mod quiz_attempt_service;

pub use quiz_attempt_service::QuizAttemptService;
