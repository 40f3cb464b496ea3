use serde::Deserialize;
use validator::Validate;

/// One answer to one question. Which payload field applies depends on the
/// question type; grading validates the combination.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerInput {
    #[validate(length(min = 1))]
    pub question_id: String,

    /// Single selection, for TRUE_FALSE questions.
    pub selected_option_id: Option<String>,

    /// Multi selection, for MULTIPLE_CHOICE questions.
    #[serde(default)]
    pub selected_option_ids: Vec<String>,

    /// Free text, for FILL_BLANK and SHORT_ANSWER questions.
    pub text_answer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[validate(nested)]
    pub answers: Vec<AnswerInput>,
}
