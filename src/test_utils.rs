pub mod fixtures {
    use crate::models::domain::quiz::{AnswerOption, Question, QuestionBody, Quiz};

    fn option(id: &str, text: &str, correct: bool, order: i32) -> AnswerOption {
        AnswerOption {
            id: id.to_string(),
            text: text.to_string(),
            correct,
            order,
        }
    }

    /// TRUE_FALSE question with options `{id}-true` (correct) and
    /// `{id}-false`.
    pub fn true_false_question(id: &str, points: i32, order: i32) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Statement {} is true.", id),
            explanation: Some(format!("Explanation for {}", id)),
            points,
            order,
            body: QuestionBody::TrueFalse {
                options: vec![
                    option(&format!("{}-true", id), "True", true, 1),
                    option(&format!("{}-false", id), "False", false, 2),
                ],
            },
        }
    }

    /// MULTIPLE_CHOICE question with options `{id}-opt-1`..`{id}-opt-4`;
    /// opt-2 and opt-4 are the correct set.
    pub fn multiple_choice_question(id: &str, points: i32, order: i32) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Select all that apply for {}.", id),
            explanation: None,
            points,
            order,
            body: QuestionBody::MultipleChoice {
                options: vec![
                    option(&format!("{}-opt-1", id), "Alpha", false, 1),
                    option(&format!("{}-opt-2", id), "Beta", true, 2),
                    option(&format!("{}-opt-3", id), "Gamma", false, 3),
                    option(&format!("{}-opt-4", id), "Delta", true, 4),
                ],
            },
        }
    }

    pub fn fill_blank_question(id: &str, points: i32, order: i32, accepted: &[&str]) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Fill in the blank for {}.", id),
            explanation: None,
            points,
            order,
            body: QuestionBody::FillBlank {
                acceptable_answers: accepted.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn short_answer_question(id: &str, points: i32, order: i32) -> Question {
        Question {
            id: id.to_string(),
            text: format!("In your own words, {}.", id),
            explanation: None,
            points,
            order,
            body: QuestionBody::ShortAnswer,
        }
    }

    pub fn quiz_with_questions(id: &str, passing_score: i32, questions: Vec<Question>) -> Quiz {
        Quiz {
            id: id.to_string(),
            title: format!("Quiz {}", id),
            description: Some("A test quiz".to_string()),
            passing_score,
            time_limit_minutes: Some(30),
            randomize_questions: false,
            show_feedback_immediately: true,
            max_attempts: None,
            questions,
            created_at: None,
            updated_at: None,
        }
    }
}
