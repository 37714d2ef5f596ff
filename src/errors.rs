use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::backend::FetchError;
use crate::identity::IdentityError;
use crate::templates_structs::ErrorTemplate;

#[derive(Debug)]
pub enum AppError {
    /// Identity provider or profile resolution failed.
    Identity(String),
    PermissionDenied(String),
    Fetch(FetchError),
    NotFound,
    Session(String),
    Template(askama::Error),
    Csrf,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Identity(e) => write!(f, "Authentication error: {e}"),
            AppError::PermissionDenied(p) => write!(f, "Permission denied: {p}"),
            AppError::Fetch(e) => write!(f, "{e}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Csrf => write!(f, "CSRF token mismatch"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Identity(_) | AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::PermissionDenied(_) | AppError::Csrf => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Session(_) | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (title, message) = match self {
            AppError::Identity(e) => ("Sign-in problem", e.clone()),
            AppError::PermissionDenied(_) => (
                "Access Denied",
                "You do not have permission to view this page.".to_string(),
            ),
            AppError::Fetch(e) => ("Something went wrong", e.user_message()),
            AppError::NotFound => ("Not Found", "The page you asked for does not exist.".to_string()),
            AppError::Csrf => (
                "Form expired",
                "Your form session expired. Go back, reload the page and try again.".to_string(),
            ),
            AppError::Session(_) | AppError::Template(_) => {
                log::error!("{self}");
                ("Internal Server Error", "An unexpected error occurred.".to_string())
            }
        };
        error_page(self.status_code(), title, &message, None)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound => AppError::NotFound,
            other => AppError::Fetch(other),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        AppError::Identity(e.user_message())
    }
}

/// Render a template as a 200 HTML response.
pub fn render(tmpl: impl Template) -> Result<HttpResponse, AppError> {
    render_status(StatusCode::OK, tmpl)
}

pub fn render_status(status: StatusCode, tmpl: impl Template) -> Result<HttpResponse, AppError> {
    let body = tmpl.render()?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// Standalone error page, usable when no page shell can be built.
pub fn error_page(status: StatusCode, title: &str, message: &str, retry_href: Option<String>) -> HttpResponse {
    let tmpl = ErrorTemplate {
        title: title.to_string(),
        message: message.to_string(),
        retry_href,
    };
    match tmpl.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Error page failed to render: {e}");
            HttpResponse::build(status).body(message.to_string())
        }
    }
}
