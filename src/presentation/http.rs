//! Transport-neutral request/response pair used by routers.

use crate::domain::error::DomainError;
use crate::domain::user::LoginRequest;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub body: Option<LoginRequest>,
}

impl HttpRequest {
    pub fn with_body(body: LoginRequest) -> Self {
        Self { body: Some(body) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

fn error_body(err: &DomainError) -> Option<Value> {
    Some(json!({ "error": err.to_string() }))
}

impl HttpResponse {
    pub fn ok(access_token: String) -> Self {
        Self {
            status_code: 200,
            body: serde_json::to_value(LoginResponse { access_token }).ok(),
        }
    }

    pub fn bad_request(err: DomainError) -> Self {
        Self {
            status_code: 400,
            body: error_body(&err),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status_code: 401,
            body: error_body(&DomainError::Unauthorized),
        }
    }

    pub fn server_error() -> Self {
        Self {
            status_code: 500,
            body: error_body(&DomainError::ServerError),
        }
    }

    /// The `error` field of the body, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }
}
