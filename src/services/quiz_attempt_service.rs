use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::quiz_attempt::{QuizAttempt, UserAnswer},
    models::dto::request::SubmitAnswersRequest,
    models::dto::response::{AttemptHistoryDto, AttemptResultDto, AttemptStartDto, QuizTakeDto},
    repositories::{AttemptCompletion, QuizAttemptRepository, QuizRepository},
    services::{grading, projection},
};
use validator::Validate;

/// Drives the attempt lifecycle: take view, start (with attempt-limit
/// enforcement), one-shot submission and grading, result lookup and history.
pub struct QuizAttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    pub async fn get_quiz_for_taking(&self, quiz_id: &str, user_id: &str) -> AppResult<QuizTakeDto> {
        let quiz = self.load_quiz(quiz_id).await?;
        let attempt_count = self.attempts.count_for_user(user_id, quiz_id).await?;
        let can_attempt = can_attempt(quiz.max_attempts, attempt_count);

        Ok(projection::take_view(&quiz, attempt_count as i32, can_attempt))
    }

    pub async fn start_attempt(&self, quiz_id: &str, user_id: &str) -> AppResult<AttemptStartDto> {
        let quiz = self.load_quiz(quiz_id).await?;

        let attempt_count = self.attempts.count_for_user(user_id, quiz_id).await?;
        if !can_attempt(quiz.max_attempts, attempt_count) {
            return Err(AppError::Conflict("Maximum attempts reached".to_string()));
        }

        // The unique slot index is what makes this count-then-insert safe:
        // a racing start for the same slot fails the insert with Conflict.
        let attempt = QuizAttempt::start(user_id, quiz_id, attempt_count as i32 + 1);
        let attempt = self.attempts.insert(attempt).await?;

        log::info!(
            "User {} started attempt {} ({}/{:?}) for quiz {}",
            user_id,
            attempt.id,
            attempt.attempt_number,
            quiz.max_attempts,
            quiz_id
        );

        Ok(AttemptStartDto {
            attempt_id: attempt.id,
            started_at: attempt.started_at,
            time_limit_minutes: quiz.time_limit_minutes,
        })
    }

    pub async fn submit_answers(
        &self,
        attempt_id: &str,
        user_id: &str,
        request: SubmitAnswersRequest,
    ) -> AppResult<AttemptResultDto> {
        request.validate()?;

        let attempt = self.load_attempt(attempt_id).await?;
        require_owner(&attempt, user_id)?;

        // Fast path only; the conditional update below is the real guard.
        if attempt.is_completed() {
            return Err(AppError::Conflict("Quiz already submitted".to_string()));
        }

        let quiz = self.load_quiz(&attempt.quiz_id).await?;

        let mut answered: HashSet<&str> = HashSet::new();
        let mut graded: Vec<UserAnswer> = Vec::with_capacity(request.answers.len());
        let mut earned_points = 0;

        for input in &request.answers {
            let question = quiz.question_by_id(&input.question_id).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Question '{}' does not belong to quiz '{}'",
                    input.question_id, quiz.id
                ))
            })?;

            if !answered.insert(question.id.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate answer for question '{}'",
                    question.id
                )));
            }

            let answer = grading::grade_answer(question, input)?;
            earned_points += answer.points_earned;
            graded.push(answer);
        }

        // Denominator covers every question in the quiz; skipping a question
        // costs its full point value.
        let score = grading::percentage_score(earned_points, quiz.total_points());
        let passed = grading::is_passing(score, quiz.passing_score);

        let completed_at = Utc::now();
        let completion = AttemptCompletion {
            answers: graded,
            score,
            passed,
            completed_at,
            time_spent_seconds: (completed_at - attempt.started_at).num_seconds(),
        };

        let completed = self
            .attempts
            .complete_if_open(attempt_id, completion)
            .await?
            .ok_or_else(|| {
                // The attempt existed above, so losing the update means a
                // concurrent submission finalized it first.
                AppError::Conflict("Quiz already submitted".to_string())
            })?;

        log::info!(
            "Attempt {} completed: score {}, passed {}",
            completed.id,
            completed.score,
            completed.passed
        );

        Ok(projection::result_view(&quiz, &completed))
    }

    pub async fn get_result(&self, attempt_id: &str, user_id: &str) -> AppResult<AttemptResultDto> {
        let attempt = self.load_attempt(attempt_id).await?;
        require_owner(&attempt, user_id)?;

        if !attempt.is_completed() {
            return Err(AppError::Conflict(
                "Quiz attempt has not been submitted yet".to_string(),
            ));
        }

        let quiz = self.load_quiz(&attempt.quiz_id).await?;
        Ok(projection::result_view(&quiz, &attempt))
    }

    pub async fn list_attempts(
        &self,
        quiz_id: &str,
        user_id: &str,
    ) -> AppResult<Vec<AttemptHistoryDto>> {
        let attempts = self.attempts.list_for_user(user_id, quiz_id).await?;
        Ok(attempts.iter().map(projection::history_view).collect())
    }

    async fn load_quiz(&self, quiz_id: &str) -> AppResult<crate::models::domain::Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    async fn load_attempt(&self, attempt_id: &str) -> AppResult<QuizAttempt> {
        self.attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Attempt with id '{}' not found", attempt_id))
            })
    }
}

fn can_attempt(max_attempts: Option<i32>, attempt_count: u64) -> bool {
    match max_attempts {
        None => true,
        Some(max) => attempt_count < max.max(0) as u64,
    }
}

fn require_owner(attempt: &QuizAttempt, user_id: &str) -> AppResult<()> {
    if attempt.user_id != user_id {
        return Err(AppError::Unauthorized(
            "You can only access your own attempts".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dto::request::AnswerInput;
    use crate::repositories::quiz_attempt_repository::MockQuizAttemptRepository;
    use crate::repositories::quiz_repository::MockQuizRepository;
    use crate::test_utils::fixtures::{quiz_with_questions, true_false_question};

    fn service(
        quizzes: MockQuizRepository,
        attempts: MockQuizAttemptRepository,
    ) -> QuizAttemptService {
        QuizAttemptService::new(Arc::new(quizzes), Arc::new(attempts))
    }

    fn submit_request(question_id: &str, option_id: &str) -> SubmitAnswersRequest {
        SubmitAnswersRequest {
            answers: vec![AnswerInput {
                question_id: question_id.to_string(),
                selected_option_id: Some(option_id.to_string()),
                selected_option_ids: Vec::new(),
                text_answer: None,
            }],
        }
    }

    #[actix_web::test]
    async fn start_attempt_rejected_at_the_limit() {
        let mut quiz = quiz_with_questions("quiz-1", 70, vec![true_false_question("q-1", 1, 1)]);
        quiz.max_attempts = Some(1);

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));

        let mut attempts = MockQuizAttemptRepository::new();
        attempts.expect_count_for_user().returning(|_, _| Ok(1));
        attempts.expect_insert().never();

        let result = service(quizzes, attempts)
            .start_attempt("quiz-1", "user-1")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn start_attempt_unknown_quiz_is_not_found() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let attempts = MockQuizAttemptRepository::new();

        let result = service(quizzes, attempts)
            .start_attempt("missing", "user-1")
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn submit_rejects_foreign_attempt() {
        let quizzes = MockQuizRepository::new();

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(|_| Ok(Some(QuizAttempt::start("someone-else", "quiz-1", 1))));

        let result = service(quizzes, attempts)
            .submit_answers("attempt-1", "user-1", submit_request("q-1", "q-1-true"))
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn submit_rejects_completed_attempt_without_regrading() {
        let quizzes = MockQuizRepository::new();

        let mut attempts = MockQuizAttemptRepository::new();
        attempts.expect_find_by_id().returning(|_| {
            let mut attempt = QuizAttempt::start("user-1", "quiz-1", 1);
            attempt.completed_at = Some(Utc::now());
            Ok(Some(attempt))
        });
        attempts.expect_complete_if_open().never();

        let result = service(quizzes, attempts)
            .submit_answers("attempt-1", "user-1", submit_request("q-1", "q-1-true"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn submit_rejects_question_from_another_quiz() {
        let quiz = quiz_with_questions("quiz-1", 70, vec![true_false_question("q-1", 1, 1)]);

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(|_| Ok(Some(QuizAttempt::start("user-1", "quiz-1", 1))));
        attempts.expect_complete_if_open().never();

        let result = service(quizzes, attempts)
            .submit_answers("attempt-1", "user-1", submit_request("q-99", "whatever"))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn submit_lost_race_is_a_conflict() {
        let quiz = quiz_with_questions("quiz-1", 70, vec![true_false_question("q-1", 1, 1)]);

        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .returning(move |_| Ok(Some(quiz.clone())));

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(|_| Ok(Some(QuizAttempt::start("user-1", "quiz-1", 1))));
        // the open attempt vanished between the read and the update
        attempts
            .expect_complete_if_open()
            .returning(|_, _| Ok(None));

        let result = service(quizzes, attempts)
            .submit_answers("attempt-1", "user-1", submit_request("q-1", "q-1-true"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn get_result_of_open_attempt_is_a_conflict() {
        let quizzes = MockQuizRepository::new();

        let mut attempts = MockQuizAttemptRepository::new();
        attempts
            .expect_find_by_id()
            .returning(|_| Ok(Some(QuizAttempt::start("user-1", "quiz-1", 1))));

        let result = service(quizzes, attempts)
            .get_result("attempt-1", "user-1")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn can_attempt_handles_unlimited_and_limits() {
        assert!(can_attempt(None, 1000));
        assert!(can_attempt(Some(3), 2));
        assert!(!can_attempt(Some(3), 3));
        assert!(!can_attempt(Some(0), 0));
    }
}
