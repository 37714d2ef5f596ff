use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::forms::SearchQuery;
use crate::handlers::guarded::Page;
use crate::models::listing::{drop_blank_ids, search};
use crate::models::working_group::{WorkingGroup, WorkingGroupDisplay};
use crate::state::AppState;
use crate::templates_structs::WorkingGroupListTemplate;

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;

    let groups = match page
        .guard("working_groups", "list")
        .load(|token| async move { backend.get::<Vec<WorkingGroup>>("/working-groups/", &token).await })
        .await
    {
        Ok(groups) => groups,
        Err(blocked) => return page.blocked(blocked),
    };
    let groups = search(drop_blank_ids(groups, "working group"), &query.q)
        .iter()
        .map(WorkingGroupDisplay::from)
        .collect();

    let tmpl = WorkingGroupListTemplate {
        ctx: page.context(),
        groups,
        search: query.q.clone(),
        can_view: page.can("working_groups", "view"),
        can_create: page.can("working_groups", "create"),
        can_edit: page.can("working_groups", "edit"),
        can_delete: page.can("working_groups", "delete"),
    };
    render(tmpl)
}
