use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One learner's pass at a quiz. Created open at start; `completed_at` is the
/// terminal-state gate: once set, the attempt (score, answers) never changes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    /// 1-based slot, unique per (user, quiz). Reserving the slot at insert is
    /// what keeps concurrent starts from exceeding the attempt limit.
    pub attempt_number: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Percentage with two fractional digits.
    pub score: Decimal,
    pub passed: bool,
    pub time_spent_seconds: Option<i64>,
    pub answers: Vec<UserAnswer>,
}

impl QuizAttempt {
    pub fn start(user_id: &str, quiz_id: &str, attempt_number: i32) -> Self {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            attempt_number,
            started_at: Utc::now(),
            completed_at: None,
            score: Decimal::new(0, 2),
            passed: false,
            time_spent_seconds: None,
            answers: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&UserAnswer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

/// Graded record of one submitted answer. Written exactly once, at
/// submission.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserAnswer {
    pub question_id: String,
    /// Single selection (TRUE_FALSE).
    pub selected_option_id: Option<String>,
    /// Sorted, deduplicated selections (MULTIPLE_CHOICE).
    #[serde(default)]
    pub selected_option_ids: Vec<String>,
    /// Free text (FILL_BLANK, SHORT_ANSWER).
    pub text_answer: Option<String>,
    pub is_correct: bool,
    pub points_earned: i32,
}

impl UserAnswer {
    pub fn unanswered(question_id: &str) -> Self {
        UserAnswer {
            question_id: question_id.to_string(),
            selected_option_id: None,
            selected_option_ids: Vec::new(),
            text_answer: None,
            is_correct: false,
            points_earned: 0,
        }
    }
}
