use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authored quiz definition. Read-only from the attempt engine's
/// perspective: the authoring subsystem owns writes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minimum percentage (0-100) required to pass.
    #[serde(default = "default_passing_score")]
    pub passing_score: i32,
    /// Advisory only; the server does not cut attempts off at the limit.
    pub time_limit_minutes: Option<i32>,
    /// Presentation hint for clients. Questions are always served in
    /// authoring order; shuffling is a client responsibility.
    #[serde(default)]
    pub randomize_questions: bool,
    /// Gates disclosure of correct answers in the result view.
    #[serde(default = "default_show_feedback")]
    pub show_feedback_immediately: bool,
    /// None = unlimited.
    pub max_attempts: Option<i32>,
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_passing_score() -> i32 {
    70
}

fn default_show_feedback() -> bool {
    true
}

impl Quiz {
    /// Questions in authoring order.
    pub fn questions_in_order(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.order);
        questions
    }

    pub fn question_by_id(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Scoring denominator: the point total of every question in the quiz,
    /// answered or not.
    pub fn total_points(&self) -> i32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Shown to the learner after answering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: i32,
    /// Unique within the quiz.
    pub order: i32,
    #[serde(flatten)]
    pub body: QuestionBody,
}

fn default_points() -> i32 {
    1
}

/// Closed set of question semantics. Grading dispatches exhaustively on this,
/// so a new question type cannot be added without an evaluator branch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "question_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionBody {
    TrueFalse {
        options: Vec<AnswerOption>,
    },
    MultipleChoice {
        options: Vec<AnswerOption>,
    },
    /// The acceptable-answer list lives on the question itself rather than on
    /// a conventional first option.
    FillBlank {
        #[serde(default)]
        acceptable_answers: Vec<String>,
    },
    /// Declared but not auto-gradable; always scores zero.
    ShortAnswer,
}

impl Question {
    /// Stable wire label for the question type.
    pub fn type_label(&self) -> &'static str {
        match self.body {
            QuestionBody::TrueFalse { .. } => "TRUE_FALSE",
            QuestionBody::MultipleChoice { .. } => "MULTIPLE_CHOICE",
            QuestionBody::FillBlank { .. } => "FILL_BLANK",
            QuestionBody::ShortAnswer => "SHORT_ANSWER",
        }
    }

    /// Selectable options, in authoring order. Empty for question types
    /// without options.
    pub fn options_in_order(&self) -> Vec<&AnswerOption> {
        let mut options: Vec<&AnswerOption> = match &self.body {
            QuestionBody::TrueFalse { options } | QuestionBody::MultipleChoice { options } => {
                options.iter().collect()
            }
            QuestionBody::FillBlank { .. } | QuestionBody::ShortAnswer => Vec::new(),
        };
        options.sort_by_key(|o| o.order);
        options
    }

    pub fn option_by_id(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options_in_order()
            .into_iter()
            .find(|o| o.id == option_id)
    }

    /// Texts of every correct option, in authoring order.
    pub fn correct_option_texts(&self) -> Vec<String> {
        self.options_in_order()
            .into_iter()
            .filter(|o| o.correct)
            .map(|o| o.text.clone())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub correct: bool,
    /// Unique within the question.
    pub order: i32,
}

/// Parses the authoring store's comma-separated acceptable-answers format.
/// Entries are trimmed; original casing is preserved for display, matching is
/// case-insensitive at grading time.
pub fn parse_acceptable_answers(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
