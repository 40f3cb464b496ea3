use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoQuizAttemptRepository, MongoQuizRepository},
    services::QuizAttemptService,
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
        ));

        Ok(Self {
            quiz_attempt_service,
            db,
            config: Arc::new(config),
        })
    }
}
