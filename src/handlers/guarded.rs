//! The guarded data view every page goes through: wait for auth, check the
//! privilege, fetch with the caller's bearer token, and only then render.
//! A view that is not admitted never calls its fetch closure.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_session::Session;
use actix_web::http::{Method, StatusCode};
use actix_web::{HttpRequest, HttpResponse};

use crate::auth::context::{AuthContext, AuthStatus};
use crate::auth::privilege::Privilege;
use crate::auth::session::{Notice, set_notice};
use crate::backend::FetchError;
use crate::errors::{AppError, render_status};
use crate::state::AppState;
use crate::templates_structs::{PageContext, StatusTemplate};

/// Cancellation token for one view. Results that arrive after `dispose` are
/// discarded.
#[derive(Clone, Debug, Default)]
pub struct ViewScope {
    disposed: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        !self.disposed.load(Ordering::SeqCst)
    }
}

/// Why a view did not reach `Loaded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocked {
    AuthLoading,
    Unauthenticated,
    AuthFailed(String),
    /// Carries the missing privilege, `resource:action`.
    Unauthorized(String),
    NotFound,
    FetchError(String),
    /// The scope was disposed before the result could be applied.
    Disposed,
}

impl From<FetchError> for Blocked {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound => Blocked::NotFound,
            other => Blocked::FetchError(other.user_message()),
        }
    }
}

/// What stops a view before its privilege is even considered.
fn auth_blocker(auth: &AuthContext) -> Option<Blocked> {
    match auth.status() {
        AuthStatus::Loading => Some(Blocked::AuthLoading),
        AuthStatus::Unauthenticated => Some(Blocked::Unauthenticated),
        AuthStatus::Failed(e) => Some(Blocked::AuthFailed(e)),
        AuthStatus::Ready => None,
    }
}

/// One privilege-gated fetch.
pub struct GuardedView<'a> {
    auth: &'a AuthContext,
    privilege: Privilege,
    scope: ViewScope,
}

impl<'a> GuardedView<'a> {
    pub fn new(auth: &'a AuthContext, resource: &str, action: &str, scope: ViewScope) -> Self {
        GuardedView {
            auth,
            privilege: Privilege::new(resource, action),
            scope,
        }
    }

    /// The bearer token, once auth is ready and the privilege is held.
    pub fn admit(&self) -> Result<String, Blocked> {
        if let Some(blocked) = auth_blocker(self.auth) {
            return Err(blocked);
        }
        if !self.auth.has_privilege(&self.privilege.resource, &self.privilege.action) {
            return Err(Blocked::Unauthorized(self.privilege.to_string()));
        }
        if !self.scope.is_live() {
            return Err(Blocked::Disposed);
        }
        self.auth.id_token().map(str::to_string).ok_or(Blocked::Unauthenticated)
    }

    /// Run `fetch` with the bearer token if admitted. The outcome is applied
    /// only while the scope is still live.
    pub async fn load<T, F, Fut>(self, fetch: F) -> Result<T, Blocked>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let token = self.admit()?;
        let result = fetch(token).await;
        if !self.scope.is_live() {
            log::debug!("Discarding result for disposed view ({})", self.privilege);
            return Err(Blocked::Disposed);
        }
        result.map_err(Blocked::from)
    }
}

/// Per-request page state: the resolved auth context plus what is needed to
/// render the shell or a blocked state. Disposes its scope when dropped.
pub struct Page<'a> {
    pub auth: AuthContext,
    pub state: &'a AppState,
    session: &'a Session,
    nav_path: String,
    uri: String,
    method: Method,
    scope: ViewScope,
}

impl<'a> Page<'a> {
    pub async fn resolve(req: &HttpRequest, state: &'a AppState, session: &'a Session) -> Page<'a> {
        let auth = AuthContext::resolve(session, state).await;
        Page {
            auth,
            state,
            session,
            nav_path: req.path().to_string(),
            uri: req.uri().to_string(),
            method: req.method().clone(),
            scope: ViewScope::new(),
        }
    }

    pub fn guard(&self, resource: &str, action: &str) -> GuardedView<'_> {
        GuardedView::new(&self.auth, resource, action, self.scope.clone())
    }

    /// For pages that only need a signed-in user.
    pub fn signed_in(&self) -> Result<(), Blocked> {
        match auth_blocker(&self.auth) {
            Some(blocked) => Err(blocked),
            None => Ok(()),
        }
    }

    pub fn can(&self, resource: &str, action: &str) -> bool {
        self.auth.has_privilege(resource, action)
    }

    pub fn context(&self) -> PageContext {
        PageContext::build(&self.auth, self.session, self.state, &self.nav_path)
    }

    pub fn notify(&self, notice: Notice) {
        set_notice(self.session, notice);
    }

    /// Response for a view that did not load.
    pub fn blocked(&self, blocked: Blocked) -> Result<HttpResponse, AppError> {
        let (status, title, message, retry_href, refresh_secs) = match blocked {
            Blocked::Unauthenticated => return Ok(redirect("/login")),
            Blocked::Disposed => return Ok(HttpResponse::NoContent().finish()),
            Blocked::AuthLoading => (
                StatusCode::OK,
                "Loading",
                "Loading your profile…".to_string(),
                None,
                Some(1),
            ),
            Blocked::AuthFailed(message) => (StatusCode::BAD_GATEWAY, "Sign-in problem", message, self.retry(), None),
            Blocked::Unauthorized(privilege) => {
                log::info!("Access denied to {} (missing {privilege})", self.nav_path);
                (
                    StatusCode::FORBIDDEN,
                    "Access Denied",
                    "You do not have permission to view this page.".to_string(),
                    None,
                    None,
                )
            }
            Blocked::NotFound => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested record was not found.".to_string(),
                None,
                None,
            ),
            Blocked::FetchError(message) => (StatusCode::BAD_GATEWAY, "Something went wrong", message, self.retry(), None),
        };
        let tmpl = StatusTemplate {
            ctx: self.context(),
            title: title.to_string(),
            message,
            retry_href,
            refresh_secs,
        };
        render_status(status, tmpl)
    }

    /// Re-issuing a GET is safe; anything else is not retried from a link.
    fn retry(&self) -> Option<String> {
        (self.method == Method::GET).then(|| self.uri.clone())
    }
}

impl Drop for Page<'_> {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}
