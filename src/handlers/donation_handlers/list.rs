use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::forms::SearchQuery;
use crate::handlers::guarded::Page;
use crate::models::donation::{Donation, DonationDisplay};
use crate::models::listing::{drop_blank_ids, search};
use crate::state::AppState;
use crate::templates_structs::DonationListTemplate;

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;

    let donations = match page
        .guard("donations", "list")
        .load(|token| async move { backend.get::<Vec<Donation>>("/donations/", &token).await })
        .await
    {
        Ok(donations) => donations,
        Err(blocked) => return page.blocked(blocked),
    };
    let donations = search(drop_blank_ids(donations, "donation"), &query.q)
        .iter()
        .map(DonationDisplay::from)
        .collect();

    let tmpl = DonationListTemplate {
        ctx: page.context(),
        donations,
        search: query.q.clone(),
        can_view: page.can("donations", "view"),
        can_create: page.can("donations", "create"),
        can_edit: page.can("donations", "edit"),
        can_delete: page.can("donations", "delete"),
    };
    render(tmpl)
}
