use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use kurso_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").map(|v| v == "production").unwrap_or(false) {
        config.validate_for_production();
    }
    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    let host = state.config.web_server_host.clone();
    let port = state.config.web_server_port;
    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(handlers::get_quiz_for_taking)
                    .service(handlers::start_attempt)
                    .service(handlers::submit_answers)
                    .service(handlers::get_attempt_result)
                    .service(handlers::list_attempts),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
