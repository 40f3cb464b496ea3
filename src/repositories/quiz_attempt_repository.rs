use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use rust_decimal::Decimal;

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::quiz_attempt::{QuizAttempt, UserAnswer},
};

/// Everything written when an open attempt transitions to completed. The
/// transition happens in one conditional update, so the fields travel
/// together.
#[derive(Clone, Debug)]
pub struct AttemptCompletion {
    pub answers: Vec<UserAnswer>,
    pub score: Decimal,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    pub time_spent_seconds: i64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    /// Insert a new attempt. The (user_id, quiz_id, attempt_number) slot is
    /// unique; a concurrent start that claimed the same slot surfaces as
    /// Conflict.
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;

    async fn count_for_user(&self, user_id: &str, quiz_id: &str) -> AppResult<u64>;

    /// All of a user's attempts for a quiz, most recently started first.
    async fn list_for_user(&self, user_id: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>>;

    /// Atomically finalize an attempt if, and only if, it is still open.
    /// Returns the completed attempt, or None when no open attempt matched
    /// (already submitted, or unknown id).
    async fn complete_if_open(
        &self,
        attempt_id: &str,
        completion: AttemptCompletion,
    ) -> AppResult<Option<QuizAttempt>>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // The attempt-slot reservation: two concurrent starts can both pass
        // the count check, but only one insert can claim a slot.
        let slot_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_quiz_slot_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(IndexOptions::builder().name("user_quiz".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(slot_index).await?;
        self.collection.create_index(user_quiz_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => write_err.code == 11000,
        _ => false,
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn insert(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(err) if is_duplicate_key_error(&err) => Err(AppError::Conflict(
                "Attempt slot already taken, please retry".to_string(),
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn count_for_user(&self, user_id: &str, quiz_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .await?;
        Ok(count)
    }

    async fn list_for_user(&self, user_id: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self
            .collection
            .find(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .sort(doc! { "started_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn complete_if_open(
        &self,
        attempt_id: &str,
        completion: AttemptCompletion,
    ) -> AppResult<Option<QuizAttempt>> {
        // Single conditional transition: the filter on the null completed_at
        // is the re-submission guard. A second submitter matches nothing and
        // cannot touch the stored score.
        let filter = doc! { "id": attempt_id, "completed_at": Bson::Null };
        let update = doc! {
            "$set": {
                "answers": to_bson(&completion.answers)?,
                "score": to_bson(&completion.score)?,
                "passed": completion.passed,
                "completed_at": to_bson(&completion.completed_at)?,
                "time_spent_seconds": completion.time_spent_seconds,
            }
        };

        let updated = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }
}
