use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{AppError, render};
use crate::handlers::forms::SearchQuery;
use crate::handlers::guarded::Page;
use crate::handlers::helpers::{all_roles, role_names};
use crate::models::listing::{drop_blank_ids, search};
use crate::models::user::{UserDisplay, UserProfile};
use crate::state::AppState;
use crate::templates_structs::UserListTemplate;

pub async fn list(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;

    let (users, roles) = tokio::join!(
        page.guard("users", "list")
            .load(|token| async move { backend.get::<Vec<UserProfile>>("/users/", &token).await }),
        all_roles(&page),
    );
    let users = match users {
        Ok(users) => users,
        Err(blocked) => return page.blocked(blocked),
    };

    let names = role_names(&roles);
    let lookup = |id: &str| names.get(id).cloned();
    let users = search(drop_blank_ids(users, "user"), &query.q)
        .iter()
        .map(|u| UserDisplay::build(u, &lookup))
        .collect();

    let tmpl = UserListTemplate {
        ctx: page.context(),
        users,
        search: query.q.clone(),
        can_view: page.can("users", "view"),
        can_edit: page.can("users", "edit"),
        can_delete: page.can("users", "delete"),
    };
    render(tmpl)
}
