use crate::models::domain::quiz::{Question, QuestionBody, Quiz};
use crate::models::domain::quiz_attempt::QuizAttempt;
use crate::models::dto::response::{
    AnswerOptionTakeDto, AttemptHistoryDto, AttemptResultDto, QuestionResultDto, QuestionTakeDto,
    QuizTakeDto,
};

/// Pre-submission view: quiz metadata and questions with their options, but
/// no correctness flags and no acceptable answers, regardless of caller.
pub fn take_view(quiz: &Quiz, attempt_count: i32, can_attempt: bool) -> QuizTakeDto {
    let questions = quiz
        .questions_in_order()
        .into_iter()
        .map(question_take_view)
        .collect();

    QuizTakeDto {
        id: quiz.id.clone(),
        title: quiz.title.clone(),
        description: quiz.description.clone(),
        passing_score: quiz.passing_score,
        time_limit_minutes: quiz.time_limit_minutes,
        randomize_questions: quiz.randomize_questions,
        max_attempts: quiz.max_attempts,
        attempt_count,
        can_attempt,
        questions,
    }
}

fn question_take_view(question: &Question) -> QuestionTakeDto {
    let answer_options = question
        .options_in_order()
        .into_iter()
        .map(|option| AnswerOptionTakeDto {
            id: option.id.clone(),
            option_text: option.text.clone(),
        })
        .collect();

    QuestionTakeDto {
        id: question.id.clone(),
        question_type: question.type_label(),
        question_text: question.text.clone(),
        points: question.points,
        answer_options,
    }
}

/// Post-submission view. Every quiz question appears in authoring order;
/// questions the learner skipped show up incorrect with zero points. The
/// learner's own selections and correctness are always disclosed; the correct
/// answers only when the quiz allows immediate feedback.
pub fn result_view(quiz: &Quiz, attempt: &QuizAttempt) -> AttemptResultDto {
    let question_results = quiz
        .questions_in_order()
        .into_iter()
        .map(|question| question_result_view(quiz, attempt, question))
        .collect();

    AttemptResultDto {
        attempt_id: attempt.id.clone(),
        score: attempt.score,
        passed: attempt.passed,
        time_spent_seconds: attempt.time_spent_seconds,
        completed_at: attempt.completed_at,
        question_results,
    }
}

fn question_result_view(
    quiz: &Quiz,
    attempt: &QuizAttempt,
    question: &Question,
) -> QuestionResultDto {
    let mut result = QuestionResultDto {
        question_id: question.id.clone(),
        question_text: question.text.clone(),
        question_type: question.type_label(),
        is_correct: false,
        points_earned: 0,
        points_possible: question.points,
        explanation: question.explanation.clone(),
        selected_option_id: None,
        selected_option_text: None,
        selected_option_ids: Vec::new(),
        text_answer: None,
        correct_option_texts: None,
        acceptable_answers: None,
    };

    if let Some(answer) = attempt.answer_for(&question.id) {
        result.is_correct = answer.is_correct;
        result.points_earned = answer.points_earned;
        result.selected_option_ids = answer.selected_option_ids.clone();
        result.text_answer = answer.text_answer.clone();

        if let Some(selected_id) = &answer.selected_option_id {
            result.selected_option_id = Some(selected_id.clone());
            result.selected_option_text = question
                .option_by_id(selected_id)
                .map(|o| o.text.clone());
        }
    }

    if quiz.show_feedback_immediately {
        match &question.body {
            QuestionBody::FillBlank { acceptable_answers } => {
                result.acceptable_answers = Some(acceptable_answers.join(","));
            }
            _ => {
                result.correct_option_texts = Some(question.correct_option_texts());
            }
        }
    }

    result
}

pub fn history_view(attempt: &QuizAttempt) -> AttemptHistoryDto {
    AttemptHistoryDto {
        id: attempt.id.clone(),
        score: attempt.score,
        passed: attempt.passed,
        started_at: attempt.started_at,
        completed_at: attempt.completed_at,
        time_spent_seconds: attempt.time_spent_seconds,
    }
}
