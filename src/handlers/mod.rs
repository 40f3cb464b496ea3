pub mod quiz_attempt_handler;

pub use quiz_attempt_handler::{
    get_attempt_result, get_quiz_for_taking, health_check, list_attempts, start_attempt,
    submit_answers,
};
