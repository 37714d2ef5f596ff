use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::guarded::Page;
use crate::models::display::NOT_AVAILABLE;
use crate::models::user::{UserDisplay, UserProfile};
use crate::state::AppState;
use crate::templates_structs::AccountTemplate;

/// The signed-in user's own profile, as `/users/me` returned it.
pub async fn view(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.signed_in() {
        return page.blocked(blocked);
    }

    let fallback = UserProfile::default();
    let profile = page.auth.profile.as_ref().unwrap_or(&fallback);
    let mut display = UserDisplay::build(profile, &|_| None);
    if display.email == NOT_AVAILABLE {
        if let Some(user) = &page.auth.user {
            display.email = user.email.clone();
        }
    }
    let privileges = profile
        .privileges
        .iter()
        .flat_map(|(resource, actions)| actions.iter().map(move |a| format!("{resource}:{a}")))
        .collect();

    let tmpl = AccountTemplate {
        ctx: page.context(),
        profile: display,
        privileges,
    };
    render(tmpl)
}
