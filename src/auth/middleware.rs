use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{auth::Claims, auth::JwtService, errors::AppError};

/// Validates the bearer token on every request in its scope and stashes the
/// decoded claims in the request extensions for `AuthenticatedUser`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

fn authenticate(req: &ServiceRequest) -> Result<Claims, Error> {
    let jwt_service = req
        .app_data::<actix_web::web::Data<JwtService>>()
        .ok_or_else(|| ErrorUnauthorized("JWT service not configured"))?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("Missing authorization header"))?;

    let token =
        bearer_token(header).ok_or_else(|| ErrorUnauthorized("Invalid authorization header format"))?;

    jwt_service
        .validate_token(token)
        .map_err(|_| ErrorUnauthorized("Invalid or expired token"))
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let claims = authenticate(&req)?;
            req.extensions_mut().insert(claims);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor handing handlers the verified caller identity.
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    #[::core::prelude::v1::test]
    fn bearer_token_strips_the_scheme() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[::core::prelude::v1::test]
    fn bearer_token_rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }

    async fn whoami(auth: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(auth.0.sub)
    }

    fn guarded_app_jwt() -> JwtService {
        let config = Config::test_config();
        JwtService::new(&config.jwt_secret, 1)
    }

    #[actix_web::test]
    async fn requests_without_a_token_are_rejected() {
        let jwt = guarded_app_jwt();
        let app = test::init_service(
            App::new().app_data(web::Data::new(jwt)).service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        match test::try_call_service(&app, req).await {
            Ok(resp) => assert_eq!(resp.status(), StatusCode::UNAUTHORIZED),
            Err(err) => assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::UNAUTHORIZED
            ),
        }
    }

    #[actix_web::test]
    async fn a_valid_token_reaches_the_handler_with_its_subject() {
        let jwt = guarded_app_jwt();
        let token = jwt.create_token("user-1", "user@example.com").unwrap();
        let app = test::init_service(
            App::new().app_data(web::Data::new(jwt)).service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .route("/whoami", web::get().to(whoami)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"user-1");
    }
}
