use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::{Question, QuestionBody};
use crate::models::domain::quiz_attempt::UserAnswer;
use crate::models::dto::request::AnswerInput;

/// Grade one submitted answer against its question. Pure: no repository
/// access, correctness is decided from the question definition alone.
///
/// Correctness is boolean for every type; there is no partial credit.
pub fn grade_answer(question: &Question, input: &AnswerInput) -> AppResult<UserAnswer> {
    let mut answer = UserAnswer::unanswered(&question.id);

    let is_correct = match &question.body {
        QuestionBody::TrueFalse { options } => match &input.selected_option_id {
            None => false,
            Some(selected_id) => {
                let selected = options
                    .iter()
                    .find(|o| &o.id == selected_id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "Answer option '{}' not found on question '{}'",
                            selected_id, question.id
                        ))
                    })?;
                answer.selected_option_id = Some(selected.id.clone());
                selected.correct
            }
        },

        QuestionBody::MultipleChoice { options } => {
            if input.selected_option_ids.is_empty() {
                false
            } else {
                let submitted: BTreeSet<&str> = input
                    .selected_option_ids
                    .iter()
                    .map(String::as_str)
                    .collect();
                let correct_ids: BTreeSet<&str> = options
                    .iter()
                    .filter(|o| o.correct)
                    .map(|o| o.id.as_str())
                    .collect();

                answer.selected_option_ids =
                    submitted.iter().map(|id| id.to_string()).collect();

                // Exact set equality: a superset, subset, or any wrong pick
                // fails the whole question. Ids the question does not own can
                // never be in the correct set, so they fail the same way.
                submitted == correct_ids
            }
        }

        QuestionBody::FillBlank { acceptable_answers } => {
            let submitted = input.text_answer.as_deref().unwrap_or("").trim();
            answer.text_answer = input.text_answer.clone();
            if submitted.is_empty() {
                false
            } else {
                let submitted_lower = submitted.to_lowercase();
                acceptable_answers
                    .iter()
                    .any(|accepted| accepted.trim().to_lowercase() == submitted_lower)
            }
        }

        // Short answers are not auto-graded; they score zero until a grading
        // workflow exists. The text is still recorded for the result view.
        QuestionBody::ShortAnswer => {
            answer.text_answer = input.text_answer.clone();
            false
        }
    };

    answer.is_correct = is_correct;
    answer.points_earned = if is_correct { question.points } else { 0 };
    Ok(answer)
}

/// Percentage score with two fractional digits, rounded half-up.
/// A zero denominator scores 0.00 by definition.
pub fn percentage_score(earned_points: i32, total_points: i32) -> Decimal {
    if total_points <= 0 {
        return Decimal::new(0, 2);
    }

    let mut score = (Decimal::from(earned_points) * Decimal::ONE_HUNDRED
        / Decimal::from(total_points))
    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // rounding does not pad: 50 must still read 50.00
    score.rescale(2);
    score
}

/// The integer passing threshold is compared against the 2-decimal score.
pub fn is_passing(score: Decimal, passing_score: i32) -> bool {
    score >= Decimal::from(passing_score)
}
