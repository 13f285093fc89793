pub mod auth;
pub mod http;
pub mod login_router;
pub mod middleware;
