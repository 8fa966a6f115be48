use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Request, Response, header},
};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use crate::{
    auth::SESSION_COOKIE,
    config::{AppConfig, DatabaseConfig},
    db::{connection, entities::user},
    error::AppError,
    forms::SignupForm,
    mail::RecordingMailer,
    routes::router,
    services::ServiceContext,
    state::AppState,
};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Application wired to a fresh in-memory SQLite database.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub async fn spawn() -> anyhow::Result<Self> {
        let mut cfg = AppConfig::default();
        cfg.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        };
        cfg.auth.session_secret = "test-session-secret".to_string();
        cfg.general.public_url = Some("http://testserver".to_string());

        let db = connection::connect(&cfg.database).await?;
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(cfg, db, mailer.clone());
        Ok(Self { state, mailer })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub fn router(&self) -> Router {
        router(Arc::clone(&self.state))
    }

    pub fn services(&self) -> ServiceContext {
        ServiceContext::from_state(&self.state)
    }

    /// Registers an account with [`TEST_PASSWORD`].
    pub async fn create_user(&self, username: &str) -> Result<user::Model, AppError> {
        let form = SignupForm {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password1: TEST_PASSWORD.to_string(),
            password2: TEST_PASSWORD.to_string(),
        };
        self.services()
            .accounts(&self.state)
            .signup(&form)
            .await?
            .map_err(|errors| AppError::bad_request(format!("signup rejected: {errors:?}")))
    }

    /// `Cookie` header value that logs `account` in.
    pub fn session_cookie(&self, account: &user::Model) -> Result<String, AppError> {
        let token = self.state.session.issue(account)?;
        Ok(format!("{SESSION_COOKIE}={token}"))
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        match self.router().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap_or_default()).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> Response<Body> {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form)
            .finish();
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(encoded)).unwrap_or_default()).await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    match body::to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// The `name=value` pair of the session cookie a response sets, if any.
pub fn set_session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}
