use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitAnswersRequest,
};

#[get("/api/quizzes/{quiz_id}/take")]
async fn get_quiz_for_taking(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state
        .quiz_attempt_service
        .get_quiz_for_taking(&quiz_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/quizzes/{quiz_id}/start")]
async fn start_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let started = state
        .quiz_attempt_service
        .start_attempt(&quiz_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(started))
}

#[post("/api/quizzes/attempts/{attempt_id}/submit")]
async fn submit_answers(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_attempt_service
        .submit_answers(&attempt_id, &auth.0.sub, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/quizzes/attempts/{attempt_id}/result")]
async fn get_attempt_result(
    state: web::Data<AppState>,
    attempt_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_attempt_service
        .get_result(&attempt_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/quizzes/{quiz_id}/attempts")]
async fn list_attempts(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let history = state
        .quiz_attempt_service
        .list_attempts(&quiz_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(history))
}

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "kurso-server",
        })),
        Err(err) => {
            log::error!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "service": "kurso-server",
            }))
        }
    }
}
