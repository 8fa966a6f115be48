use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::AppError;

pub type PageResult = Result<Response, AppError>;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub current_user: Option<String>,
    pub status: u16,
    pub reason: String,
    pub message: String,
}

impl ErrorTemplate {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            current_user: None,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
        }
    }
}

/// Renders a page template with a 200 status.
pub fn render(template: &impl Template) -> PageResult {
    render_with_status(StatusCode::OK, template)
}

pub fn render_with_status(status: StatusCode, template: &impl Template) -> PageResult {
    let body = template.render()?;
    Ok((status, Html(body)).into_response())
}

/// Plain-text fallback if the error page itself cannot render.
pub fn error_page(status: StatusCode, message: impl Into<String>) -> Response {
    let page = ErrorTemplate::new(status, message);
    match page.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render error page");
            (status, page.message).into_response()
        }
    }
}

fn log_app_error(err: &AppError) {
    let status = err.status();
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %err, "request failed");
    } else {
        tracing::debug!(status = status.as_u16(), error = %err, "request rejected");
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log_app_error(&self);
        let status = self.status();
        let message = if status.is_server_error() && !cfg!(debug_assertions) {
            "Something went wrong on our side.".to_string()
        } else {
            self.message().to_string()
        };
        error_page(status, message)
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

    use crate::error::AppError;

    #[tokio::test]
    async fn app_errors_render_the_error_page_with_their_status() {
        let response = AppError::forbidden("Only the author may change this recipe").into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let html = String::from_utf8(body.to_vec()).expect("utf8 body");
        assert!(html.contains(r#"data-template="error.html""#));
        assert!(html.contains("403"));
        assert!(html.contains("Only the author may change this recipe"));
    }
}
