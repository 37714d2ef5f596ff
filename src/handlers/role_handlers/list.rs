use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::forms::SearchQuery;
use crate::handlers::guarded::Page;
use crate::models::listing::{drop_blank_ids, search};
use crate::models::role::{Role, RoleListItem};
use crate::state::AppState;
use crate::templates_structs::RoleListTemplate;

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;

    let roles = match page
        .guard("roles", "list")
        .load(|token| async move { backend.get::<Vec<Role>>("/roles/", &token).await })
        .await
    {
        Ok(roles) => roles,
        Err(blocked) => return page.blocked(blocked),
    };
    let roles = search(drop_blank_ids(roles, "role"), &query.q)
        .iter()
        .map(RoleListItem::from)
        .collect();

    let tmpl = RoleListTemplate {
        ctx: page.context(),
        roles,
        search: query.q.clone(),
        can_view: page.can("roles", "view"),
        can_create: page.can("roles", "create"),
        can_edit: page.can("roles", "edit"),
        can_delete: page.can("roles", "delete"),
    };
    render(tmpl)
}
