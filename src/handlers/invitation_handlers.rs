use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::forms::SearchQuery;
use crate::handlers::guarded::Page;
use crate::handlers::helpers::{all_roles, role_names};
use crate::models::invitation::{Invitation, InvitationDisplay};
use crate::models::listing::{drop_blank_ids, search};
use crate::state::AppState;
use crate::templates_structs::InvitationListTemplate;

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;

    let (invitations, roles) = tokio::join!(
        page.guard("invitations", "list")
            .load(|token| async move { backend.get::<Vec<Invitation>>("/invitations/", &token).await }),
        all_roles(&page),
    );
    let invitations = match invitations {
        Ok(invitations) => invitations,
        Err(blocked) => return page.blocked(blocked),
    };

    let names = role_names(&roles);
    let lookup = |id: &str| names.get(id).cloned();
    let invitations = search(drop_blank_ids(invitations, "invitation"), &query.q)
        .iter()
        .map(|i| InvitationDisplay::build(i, &lookup))
        .collect();

    let tmpl = InvitationListTemplate {
        ctx: page.context(),
        invitations,
        search: query.q.clone(),
    };
    render(tmpl)
}
