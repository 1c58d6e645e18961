use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{AuthToken, LoginRequest};

use super::guard::SessionGuard;

/// Outcome of a login attempt, shown to the user as a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginStatus {
    Welcome { username: String },
    Failed(String),
}

impl LoginStatus {
    pub fn message(&self) -> String {
        match self {
            LoginStatus::Welcome { username } => format!("Welcome, {}!", username),
            LoginStatus::Failed(reason) => reason.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginStatus::Welcome { .. })
    }
}

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Network(e) => format!("Could not connect to the server: {}", e),
        ApiError::Status { .. } => format!("Login rejected: {}", err),
        _ => format!("Login failed: {}", err),
    }
}

impl SessionGuard {
    /// Exchange credentials for a session token.
    ///
    /// Failures end up in the returned status; nothing is retried.
    pub async fn login(&self, api: &ApiClient, credentials: &LoginRequest) -> LoginStatus {
        info!(username = %credentials.username, "Logging in");
        let result = api.authenticate(credentials).await;
        self.finish_sign_in(result, &credentials.username).await
    }

    /// Create an account and sign straight into it.
    pub async fn register(&self, api: &ApiClient, username: &str) -> LoginStatus {
        info!(username, "Registering");
        let result = api.register(username).await;
        self.finish_sign_in(result, username).await
    }

    async fn finish_sign_in(
        &self,
        result: Result<AuthToken, ApiError>,
        username: &str,
    ) -> LoginStatus {
        let token = match result {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                return LoginStatus::Failed(failure_message(&e));
            }
        };

        if let Err(e) = self.store.set_token(&token.access_token) {
            warn!(error = %e, "Could not persist session token");
            return LoginStatus::Failed(format!("Could not save session: {}", e));
        }
        if let Err(e) = self.store.set_username(username) {
            warn!(error = %e, "Could not persist username");
        }

        if !self.redirect_delay.is_zero() {
            tokio::time::sleep(self.redirect_delay).await;
        }
        self.navigator.navigate(self.manifest.landing_page());

        LoginStatus::Welcome {
            username: username.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::guard::tests::RecordingNavigator;
    use crate::auth::guard::{pages, PageManifest};
    use crate::auth::{MemorySessionStore, SessionStore};

    fn setup(base_url: &str) -> (SessionGuard, ApiClient, Arc<MemorySessionStore>, Arc<RecordingNavigator>) {
        let store = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = SessionGuard::new(store.clone(), PageManifest::default(), navigator.clone())
            .with_redirect_delay(Duration::ZERO);
        let api = ApiClient::new(base_url, store.clone()).unwrap();
        (guard, api, store, navigator)
    }

    #[tokio::test]
    async fn test_login_stores_token_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(json!({"username": "ann", "password": "secret"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "tok-1", "token_type": "bearer"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (guard, api, store, navigator) = setup(&server.uri());
        let status = guard.login(&api, &LoginRequest::new("ann", "secret")).await;

        assert!(status.is_success());
        assert_eq!(status.message(), "Welcome, ann!");
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(store.username().unwrap().as_deref(), Some("ann"));
        assert_eq!(navigator.visits(), vec![pages::CUSTOMERS.to_string()]);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token"})))
            .mount(&server)
            .await;

        let (guard, api, store, navigator) = setup(&server.uri());
        let status = guard.login(&api, &LoginRequest::new("ann", "wrong")).await;

        match status {
            LoginStatus::Failed(msg) => assert!(msg.contains("Invalid token"), "{}", msg),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(store.token().unwrap(), None);
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_login_unparsable_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let (guard, api, store, _) = setup(&server.uri());
        let status = guard.login(&api, &LoginRequest::new("ann", "secret")).await;

        assert!(!status.is_success());
        assert_eq!(store.token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_blank_token_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
            .mount(&server)
            .await;

        let (guard, api, store, navigator) = setup(&server.uri());
        let status = guard.login(&api, &LoginRequest::new("ann", "secret")).await;

        match status {
            LoginStatus::Failed(msg) => assert!(msg.contains("empty access_token"), "{}", msg),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(store.get(crate::auth::store::TOKEN_KEY).unwrap(), None);
        assert!(navigator.visits().is_empty());
        assert_eq!(
            guard.decide(pages::CUSTOMERS),
            Some(crate::auth::Redirect { to: pages::LOGIN.to_string() })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_waits_for_redirect_delay() {
        let store = Arc::new(MemorySessionStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let guard = SessionGuard::new(store.clone(), PageManifest::default(), navigator.clone())
            .with_redirect_delay(Duration::from_millis(1000));
        let token = AuthToken {
            access_token: "tok-1".to_string(),
            token_type: None,
        };

        let start = tokio::time::Instant::now();
        let sign_in = tokio::spawn(async move { guard.finish_sign_in(Ok(token), "ann").await });

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-1"));
        assert!(navigator.visits().is_empty());

        let status = sign_in.await.unwrap();
        assert!(status.is_success());
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(navigator.visits(), vec![pages::CUSTOMERS.to_string()]);
    }

    #[tokio::test]
    async fn test_login_unreachable_server() {
        // Port 9 (discard) on localhost is not expected to accept HTTP connections
        let (guard, api, _, navigator) = setup("http://127.0.0.1:9");
        let status = guard.login(&api, &LoginRequest::new("ann", "secret")).await;

        match status {
            LoginStatus::Failed(msg) => assert!(msg.starts_with("Could not connect"), "{}", msg),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/register"))
            .and(query_param("username", "bob"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-2"})))
            .mount(&server)
            .await;

        let (guard, api, store, navigator) = setup(&server.uri());
        let status = guard.register(&api, "bob").await;

        assert!(status.is_success());
        assert_eq!(store.token().unwrap().as_deref(), Some("tok-2"));
        assert_eq!(navigator.visits(), vec![pages::CUSTOMERS.to_string()]);
    }
}
