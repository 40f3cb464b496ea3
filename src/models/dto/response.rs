use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Learner-facing view of a quiz for taking. Never carries correctness data.
#[derive(Debug, Clone, Serialize)]
pub struct QuizTakeDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub passing_score: i32,
    pub time_limit_minutes: Option<i32>,
    pub randomize_questions: bool,
    pub max_attempts: Option<i32>,
    pub attempt_count: i32,
    pub can_attempt: bool,
    pub questions: Vec<QuestionTakeDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionTakeDto {
    pub id: String,
    pub question_type: &'static str,
    pub question_text: String,
    pub points: i32,
    pub answer_options: Vec<AnswerOptionTakeDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOptionTakeDto {
    pub id: String,
    pub option_text: String,
    // correctness is deliberately absent from the take view
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptStartDto {
    pub attempt_id: String,
    pub started_at: DateTime<Utc>,
    pub time_limit_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptResultDto {
    pub attempt_id: String,
    pub score: Decimal,
    pub passed: bool,
    pub time_spent_seconds: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub question_results: Vec<QuestionResultDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResultDto {
    pub question_id: String,
    pub question_text: String,
    pub question_type: &'static str,
    pub is_correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_option_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_answer: Option<String>,
    /// Only present when the quiz discloses feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_texts: Option<Vec<String>>,
    /// Only present when the quiz discloses feedback, for FILL_BLANK.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptable_answers: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptHistoryDto {
    pub id: String,
    pub score: Decimal,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_seconds: Option<i64>,
}
