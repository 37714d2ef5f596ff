use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::{Local, Timelike};

use crate::errors::{AppError, render};
use crate::handlers::guarded::Page;
use crate::models::display::or_na;
use crate::state::AppState;
use crate::templates_structs::{DashboardTemplate, QuickLink};

fn time_greeting(name: &str, hour: u32) -> String {
    let period = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{period}, {name}")
}

pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.signed_in() {
        return page.blocked(blocked);
    }

    let ctx = page.context();
    let greeting = time_greeting(&ctx.username, Local::now().hour());
    let role_label = page
        .auth
        .profile
        .as_ref()
        .map(|p| p.roles.join(", "))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| or_na(None));
    let quick_links = ctx
        .nav
        .links()
        .filter(|l| l.url != "/dashboard")
        .map(|l| QuickLink {
            label: l.label.clone(),
            url: l.url.clone(),
        })
        .collect();

    let tmpl = DashboardTemplate {
        ctx,
        greeting,
        role_label,
        quick_links,
    };
    render(tmpl)
}
