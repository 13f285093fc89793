use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use chrono::Duration;
use login_api::data::user_repository::InMemoryUserRepository;
use login_api::domain::user::User;
use login_api::infrastructure::config::AppConfig;
use login_api::infrastructure::logging::init_logging;
use login_api::infrastructure::security::{JwtTokenGenerator, hash_password};
use login_api::presentation::auth::{AppState, configure, make_login_router};
use login_api::presentation::middleware::{RequestTracing, default_json_content_type};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let users = Arc::new(InMemoryUserRepository::new());
    if let Some(seed) = &config.seed_user {
        let password_hash = hash_password(&seed.password).map_err(|e| {
            error!(error = %e, "Failed to hash seed user password");
            std::io::Error::other(e.to_string())
        })?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: seed.email.clone(),
            password_hash,
            access_token: None,
        };
        users
            .save_user(user)
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        info!(email = %seed.email, "Seed user created");
    }

    let token_generator = JwtTokenGenerator::with_ttl(
        config.jwt_secret.clone(),
        Duration::seconds(config.token_ttl_secs),
    );
    let state = web::Data::new(AppState {
        login_router: make_login_router(users, token_generator),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(default_json_content_type())
            .wrap(RequestTracing)
            .service(web::scope("/api").configure(configure))
    });

    let bind_addr = format!("{}:{}", config.host, config.port);
    let server = server.bind((config.host.as_str(), config.port))?;
    info!(address = %bind_addr, routes = "POST /api/login", "Starting HTTP server");
    server.run().await
}
