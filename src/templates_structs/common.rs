use askama::Template;

use crate::auth::session::Notice;
use crate::models::user::UserDisplay;
use super::PageContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<Notice>,
    pub email: String,
    pub app_name: String,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "password_reset.html")]
pub struct PasswordResetTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub email: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub ctx: PageContext,
    pub profile: UserDisplay,
    pub privileges: Vec<String>,
}

/// Loading, access-denied and fetch-error states rendered inside the shell.
#[derive(Template)]
#[template(path = "status.html")]
pub struct StatusTemplate {
    pub ctx: PageContext,
    pub title: String,
    pub message: String,
    pub retry_href: Option<String>,
    /// Reload the page after this many seconds.
    pub refresh_secs: Option<u32>,
}

/// Bare error page, no navigation.
#[derive(Template)]
#[template(path = "errors/error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub retry_href: Option<String>,
}
