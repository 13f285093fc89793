use crate::application::auth_usecase::{AuthDependencies, AuthUseCase};
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::user::LoginRequest;
use crate::infrastructure::email_validator::ValidatorEmailValidator;
use crate::infrastructure::security::{Argon2Encrypter, JwtTokenGenerator};
use crate::presentation::http::HttpRequest;
use crate::presentation::login_router::LoginRouter;
use crate::presentation::middleware::RequestId;
use actix_web::HttpRequest as ActixRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct AppState {
    pub login_router: LoginRouter,
}

/// Wires the production adapters behind the login router.
pub fn make_login_router(
    users: Arc<InMemoryUserRepository>,
    token_generator: JwtTokenGenerator,
) -> LoginRouter {
    let auth_use_case = AuthUseCase::new(AuthDependencies {
        load_user_by_email_repository: Some(users.clone()),
        update_access_token_repository: Some(users),
        encrypter: Some(Arc::new(Argon2Encrypter)),
        token_generator: Some(Arc::new(token_generator)),
    });
    LoginRouter::new(
        Some(Arc::new(auth_use_case)),
        Some(Arc::new(ValidatorEmailValidator)),
    )
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}

/// A missing or unparseable JSON body reaches the router as an absent body.
#[instrument(skip_all)]
pub async fn login(
    req: ActixRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<LoginRequest>>,
) -> HttpResponse {
    let request_id = RequestId::of(&req).unwrap_or_else(|| "unknown".to_string());
    info!(
        request_id = %request_id,
        has_body = body.is_some(),
        "Login request received"
    );

    let request = HttpRequest {
        body: body.map(web::Json::into_inner),
    };
    let response = state.login_router.route(Some(request)).await;

    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => HttpResponse::build(status).json(body),
        None => HttpResponse::build(status).finish(),
    }
}
