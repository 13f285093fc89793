use crate::domain::error::DomainError;
use crate::domain::ports::{Authenticator, EmailValidator};
use crate::presentation::http::{HttpRequest, HttpResponse};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Maps login requests onto the auth use case.
///
/// This is the only place where failures become HTTP statuses. Anything
/// unexpected is logged and answered with a bare 500 so internal detail
/// never reaches the client.
#[derive(Clone, Default)]
pub struct LoginRouter {
    auth_use_case: Option<Arc<dyn Authenticator>>,
    email_validator: Option<Arc<dyn EmailValidator>>,
}

impl LoginRouter {
    pub fn new(
        auth_use_case: Option<Arc<dyn Authenticator>>,
        email_validator: Option<Arc<dyn EmailValidator>>,
    ) -> Self {
        Self {
            auth_use_case,
            email_validator,
        }
    }

    #[instrument(skip_all)]
    pub async fn route(&self, request: Option<HttpRequest>) -> HttpResponse {
        match self.try_route(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Login failed with an internal error");
                HttpResponse::server_error()
            }
        }
    }

    async fn try_route(&self, request: Option<HttpRequest>) -> Result<HttpResponse> {
        let auth_use_case = self
            .auth_use_case
            .as_ref()
            .ok_or(DomainError::MissingDependency("auth_use_case"))?;
        let email_validator = self
            .email_validator
            .as_ref()
            .ok_or(DomainError::MissingDependency("email_validator"))?;

        let body = request
            .and_then(|r| r.body)
            .ok_or_else(|| anyhow::anyhow!("Request body is absent"))?;

        let Some(email) = body.email.filter(|e| !e.is_empty()) else {
            warn!("Login request without email");
            return Ok(HttpResponse::bad_request(DomainError::missing_param("email")));
        };
        let Some(password) = body.password.filter(|p| !p.is_empty()) else {
            warn!("Login request without password");
            return Ok(HttpResponse::bad_request(DomainError::missing_param(
                "password",
            )));
        };

        if !email_validator.is_valid(&email)? {
            warn!("Login request with malformed email");
            return Ok(HttpResponse::bad_request(DomainError::invalid_param("email")));
        }

        match auth_use_case.auth(&email, &password).await? {
            Some(access_token) => {
                info!("Login succeeded");
                Ok(HttpResponse::ok(access_token))
            }
            None => {
                warn!("Login rejected");
                Ok(HttpResponse::unauthorized())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::LoginRequest;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct AuthUseCaseSpy {
        access_token: Option<String>,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Authenticator for AuthUseCaseSpy {
        async fn auth(&self, email: &str, password: &str) -> Result<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .push((email.to_string(), password.to_string()));
            Ok(self.access_token.clone())
        }
    }

    struct EmailValidatorSpy {
        is_email_valid: bool,
        email: Mutex<Option<String>>,
    }

    impl EmailValidator for EmailValidatorSpy {
        fn is_valid(&self, email: &str) -> Result<bool> {
            *self.email.lock().unwrap() = Some(email.to_string());
            Ok(self.is_email_valid)
        }
    }

    struct Failing;

    #[async_trait]
    impl Authenticator for Failing {
        async fn auth(&self, _email: &str, _password: &str) -> Result<Option<String>> {
            Err(anyhow!("database connection dropped"))
        }
    }

    impl EmailValidator for Failing {
        fn is_valid(&self, _email: &str) -> Result<bool> {
            Err(anyhow!("validator exploded"))
        }
    }

    fn auth_spy(access_token: Option<&str>) -> Arc<AuthUseCaseSpy> {
        Arc::new(AuthUseCaseSpy {
            access_token: access_token.map(str::to_string),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn validator_spy(is_email_valid: bool) -> Arc<EmailValidatorSpy> {
        Arc::new(EmailValidatorSpy {
            is_email_valid,
            email: Mutex::new(None),
        })
    }

    fn make_sut() -> (LoginRouter, Arc<AuthUseCaseSpy>, Arc<EmailValidatorSpy>) {
        let auth = auth_spy(Some("valid_token"));
        let validator = validator_spy(true);
        let sut = LoginRouter::new(Some(auth.clone()), Some(validator.clone()));
        (sut, auth, validator)
    }

    fn request(email: Option<&str>, password: Option<&str>) -> Option<HttpRequest> {
        Some(HttpRequest::with_body(LoginRequest {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
        }))
    }

    fn assert_server_error(response: &HttpResponse) {
        assert_eq!(response.status_code, 500);
        assert_eq!(response.error_message(), Some("Internal error"));
    }

    #[tokio::test]
    async fn test_returns_400_when_email_missing() {
        let (sut, auth, _) = make_sut();
        let response = sut.route(request(None, Some("any_password"))).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(response.error_message(), Some("Missing param: email"));
        assert!(auth.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_returns_400_when_email_empty() {
        let (sut, _, _) = make_sut();
        let response = sut.route(request(Some(""), Some("any_password"))).await;
        assert_eq!(response.error_message(), Some("Missing param: email"));
    }

    #[tokio::test]
    async fn test_returns_400_when_password_missing() {
        let (sut, _, _) = make_sut();
        let response = sut.route(request(Some("any@email.com"), None)).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(response.error_message(), Some("Missing param: password"));
    }

    #[tokio::test]
    async fn test_returns_400_when_email_is_invalid() {
        let auth = auth_spy(Some("valid_token"));
        let validator = validator_spy(false);
        let sut = LoginRouter::new(Some(auth.clone()), Some(validator.clone()));

        let response = sut
            .route(request(Some("invalid_email@email.com"), Some("any_password")))
            .await;

        assert_eq!(response.status_code, 400);
        assert_eq!(response.error_message(), Some("Invalid param: email"));
        assert!(auth.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_calls_email_validator_with_given_email() {
        let (sut, _, validator) = make_sut();
        sut.route(request(Some("any@email.com"), Some("any_password")))
            .await;
        assert_eq!(
            validator.email.lock().unwrap().as_deref(),
            Some("any@email.com")
        );
    }

    #[tokio::test]
    async fn test_returns_500_when_request_absent() {
        let (sut, _, _) = make_sut();
        assert_server_error(&sut.route(None).await);
    }

    #[tokio::test]
    async fn test_returns_500_when_body_absent() {
        let (sut, _, _) = make_sut();
        assert_server_error(&sut.route(Some(HttpRequest::default())).await);
    }

    #[tokio::test]
    async fn test_calls_auth_use_case_with_credentials() {
        let (sut, auth, _) = make_sut();
        sut.route(request(Some("any@email.com"), Some("any_password")))
            .await;
        assert_eq!(
            *auth.calls.lock().unwrap(),
            vec![("any@email.com".to_string(), "any_password".to_string())]
        );
    }

    #[tokio::test]
    async fn test_returns_401_when_credentials_rejected() {
        let auth = auth_spy(None);
        let sut = LoginRouter::new(Some(auth), Some(validator_spy(true)));

        let response = sut
            .route(request(Some("invalid@email.com"), Some("invalid_password")))
            .await;

        assert_eq!(response.status_code, 401);
        assert_eq!(response.error_message(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn test_returns_200_with_token_for_valid_credentials() {
        let (sut, _, _) = make_sut();
        let response = sut
            .route(request(Some("valid@email.com"), Some("valid_password")))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.body,
            Some(serde_json::json!({ "accessToken": "valid_token" }))
        );
    }

    #[tokio::test]
    async fn test_returns_500_for_any_missing_collaborator() {
        let routers = [
            LoginRouter::default(),
            LoginRouter::new(None, Some(validator_spy(true))),
            LoginRouter::new(Some(auth_spy(Some("valid_token"))), None),
        ];
        let requests = [
            request(Some("valid@email.com"), Some("valid_password")),
            request(None, Some("valid_password")),
            request(Some("valid@email.com"), None),
            None,
        ];

        for sut in &routers {
            for req in requests.iter().cloned() {
                assert_server_error(&sut.route(req).await);
            }
        }
    }

    #[tokio::test]
    async fn test_returns_500_without_detail_when_collaborator_fails() {
        let failing = Arc::new(Failing);
        let suts = [
            LoginRouter::new(Some(failing.clone()), Some(validator_spy(true))),
            LoginRouter::new(Some(auth_spy(Some("valid_token"))), Some(failing.clone())),
        ];

        for sut in &suts {
            let response = sut
                .route(request(Some("valid@email.com"), Some("valid_password")))
                .await;
            assert_server_error(&response);
            let body = response.body.unwrap().to_string();
            assert!(!body.contains("database"));
            assert!(!body.contains("exploded"));
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_email_is_kept_out_of_info_and_warn_logs() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (accepting, _, _) = make_sut();
        let rejecting = LoginRouter::new(Some(auth_spy(None)), Some(validator_spy(true)));
        let strict = LoginRouter::new(Some(auth_spy(None)), Some(validator_spy(false)));

        for sut in [&accepting, &rejecting, &strict] {
            sut.route(request(Some("private@email.com"), Some("any_password")))
                .await;
        }

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Login succeeded"));
        assert!(output.contains("Login rejected"));
        assert!(!output.contains("private@email.com"));
    }
}
