use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::{self, Notice, set_notice, take_notice};
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::handlers::forms::CsrfOnly;
use crate::handlers::guarded::redirect;
use crate::identity::IdentityError;
use crate::logging::quietly;
use crate::state::AppState;
use crate::templates_structs::{LoginTemplate, PasswordResetTemplate};

/// Provider codes that are expected when signing out a session whose refresh
/// token is already dead.
const BENIGN_SIGN_OUT_CODES: &[&str] = &["TOKEN_EXPIRED", "INVALID_REFRESH_TOKEN"];

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct PasswordResetForm {
    pub csrf_token: String,
    #[serde(default)]
    pub email: String,
}

fn login_template(state: &AppState, session: &Session, email: &str, error: Option<String>) -> LoginTemplate {
    LoginTemplate {
        error,
        notice: take_notice(session),
        email: email.to_string(),
        app_name: state.config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
    }
}

pub async fn login_page(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    // If already logged in, redirect to dashboard
    if session::get_identity(&session).is_some() {
        return Ok(redirect("/dashboard"));
    }
    render(login_template(&state, &session, "", None))
}

pub async fn login_submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE contacting the identity provider
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    if state.limiter.is_blocked(ip) {
        let msg = "Too many failed login attempts. Please try again later.".to_string();
        return render(login_template(&state, &session, &form.email, Some(msg)));
    }

    let email = form.email.trim();
    if let Some(msg) = validate::validate_email(email) {
        return render(login_template(&state, &session, email, Some(msg)));
    }

    match state.identity.sign_in(email, &form.password).await {
        Ok(identity) => {
            state.limiter.clear(ip);
            // Roles may have changed since the last visit
            state.profiles.invalidate(&identity.uid);
            session.renew();
            session::set_identity(&session, &identity)?;
            log::info!("User {} signed in", identity.uid);
            Ok(redirect("/dashboard"))
        }
        Err(e) => {
            if e == IdentityError::InvalidCredentials {
                state.limiter.record_failure(ip);
            } else {
                log::warn!("Sign-in failed: {e}");
            }
            render(login_template(&state, &session, email, Some(e.user_message())))
        }
    }
}

/// Always ends the local session. A provider failure becomes an error
/// notice on the login page, never an error page.
pub async fn logout(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let outcome = match session::get_identity(&session) {
        Some(identity) => {
            state.profiles.invalidate(&identity.uid);
            quietly(BENIGN_SIGN_OUT_CODES, state.identity.sign_out(&identity)).await
        }
        None => Ok(()),
    };

    session::end(&session);
    match outcome {
        // A dead refresh token means the provider already ended the session
        Ok(()) | Err(IdentityError::SessionExpired) => set_notice(&session, Notice::success("You have been signed out.")),
        Err(e) => {
            log::warn!("Sign-out at the identity provider failed: {e}");
            set_notice(
                &session,
                Notice::error(format!("Signed out locally, but logout failed: {}", e.user_message())),
            );
        }
    }
    Ok(redirect("/login"))
}

pub async fn password_reset_page(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let tmpl = PasswordResetTemplate {
        app_name: state.config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(&session),
        email: String::new(),
        error: None,
    };
    render(tmpl)
}

/// Send a reset email to the signed-in user, or to the address in the form
/// when nobody is signed in.
pub async fn password_reset_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<PasswordResetForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let signed_in = session::get_identity(&session);
    let email = match &signed_in {
        Some(identity) => identity.email.clone(),
        None => form.email.trim().to_string(),
    };
    let back = if signed_in.is_some() { "/dashboard" } else { "/login" };

    if let Some(msg) = validate::validate_email(&email) {
        let tmpl = PasswordResetTemplate {
            app_name: state.config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(&session),
            email,
            error: Some(msg),
        };
        return render(tmpl);
    }

    match state.identity.send_password_reset(&email).await {
        Ok(()) => set_notice(&session, Notice::success(format!("Password reset email sent to {email}"))),
        Err(e) => {
            log::warn!("Password reset for {email} failed: {e}");
            set_notice(&session, Notice::error(e.user_message()));
        }
    }
    Ok(redirect(back))
}
