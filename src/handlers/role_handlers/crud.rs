use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::Notice;
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::handlers::forms::{CsrfOnly, get_all, get_field, parse_form_body};
use crate::handlers::guarded::{Blocked, Page, redirect};
use crate::models::role::{
    PrivilegeMap, Role, RoleListItem, RoleRequest, privilege_grid, privileges_from_codes, uncatalogued_codes,
};
use crate::state::AppState;
use crate::templates_structs::{RoleDetailTemplate, RoleFormTemplate};

fn form_template(
    page: &Page<'_>,
    form_action: String,
    form_title: &str,
    name: String,
    description: String,
    privileges: &PrivilegeMap,
    errors: Vec<String>,
) -> RoleFormTemplate {
    RoleFormTemplate {
        ctx: page.context(),
        form_action,
        form_title: form_title.to_string(),
        name,
        description,
        privilege_groups: privilege_grid(privileges),
        kept_privileges: uncatalogued_codes(privileges),
        errors,
    }
}

/// Name, description and ticked privileges from a submitted role form.
fn read_form(params: &[(String, String)]) -> (RoleRequest, Vec<String>) {
    let request = RoleRequest {
        name: get_field(params, "name").trim().to_string(),
        description: get_field(params, "description").trim().to_string(),
        privileges: privileges_from_codes(get_all(params, "privileges")),
    };
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&request.name, "Name", 100));
    errors.extend(validate::validate_optional(&request.description, "Description", 500));
    (request, errors)
}

pub async fn detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let url = format!("/roles/{}", path.into_inner());

    let role = match page
        .guard("roles", "view")
        .load(|token| async move { backend.get::<Role>(&url, &token).await })
        .await
    {
        Ok(role) => role,
        Err(blocked) => return page.blocked(blocked),
    };

    let tmpl = RoleDetailTemplate {
        ctx: page.context(),
        privileges: role.privilege_codes(),
        role: RoleListItem::from(&role),
        can_edit: page.can("roles", "edit"),
        can_delete: page.can("roles", "delete"),
    };
    render(tmpl)
}

pub async fn new_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.guard("roles", "create").admit() {
        return page.blocked(blocked);
    }
    let tmpl = form_template(
        &page,
        "/roles".to_string(),
        "Create Role",
        String::new(),
        String::new(),
        &PrivilegeMap::new(),
        vec![],
    );
    render(tmpl)
}

pub async fn create(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    let params = parse_form_body(&body);
    csrf::validate_csrf(&session, get_field(&params, "csrf_token"))?;

    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let view = page.guard("roles", "create");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let (request, errors) = read_form(&params);
    if !errors.is_empty() {
        let tmpl = form_template(
            &page,
            "/roles".to_string(),
            "Create Role",
            request.name,
            request.description,
            &request.privileges,
            errors,
        );
        return render(tmpl);
    }

    let sent = request.clone();
    match view
        .load(|token| async move { backend.post::<_, serde_json::Value>("/roles/", &token, &sent).await })
        .await
    {
        Ok(_) => {
            log::info!("Role '{}' created", request.name);
            page.notify(Notice::success("Role created successfully"));
            Ok(redirect("/roles"))
        }
        Err(Blocked::FetchError(msg)) => {
            let tmpl = form_template(
                &page,
                "/roles".to_string(),
                "Create Role",
                request.name,
                request.description,
                &request.privileges,
                vec![msg],
            );
            render(tmpl)
        }
        Err(blocked) => page.blocked(blocked),
    }
}

pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let id = path.into_inner();
    let url = format!("/roles/{id}");

    let role = match page
        .guard("roles", "edit")
        .load(|token| async move { backend.get::<Role>(&url, &token).await })
        .await
    {
        Ok(role) => role,
        Err(blocked) => return page.blocked(blocked),
    };

    let tmpl = form_template(
        &page,
        format!("/roles/{id}/edit"),
        "Edit Role",
        role.name.clone().unwrap_or_default(),
        role.description.clone().unwrap_or_default(),
        &role.privileges,
        vec![],
    );
    render(tmpl)
}

pub async fn update(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, AppError> {
    let params = parse_form_body(&body);
    csrf::validate_csrf(&session, get_field(&params, "csrf_token"))?;

    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let id = path.into_inner();
    let form_action = format!("/roles/{id}/edit");
    let view = page.guard("roles", "edit");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let (request, errors) = read_form(&params);
    if !errors.is_empty() {
        let tmpl = form_template(
            &page,
            form_action,
            "Edit Role",
            request.name,
            request.description,
            &request.privileges,
            errors,
        );
        return render(tmpl);
    }

    let url = format!("/roles/{id}");
    let sent = request.clone();
    match view
        .load(|token| async move { backend.put::<_, serde_json::Value>(&url, &token, &sent).await })
        .await
    {
        Ok(_) => {
            // Every cached profile may carry privileges from this role
            state.profiles.clear();
            log::info!("Role {id} updated");
            page.notify(Notice::success("Role updated successfully"));
            Ok(redirect("/roles"))
        }
        Err(Blocked::FetchError(msg)) => {
            let tmpl = form_template(
                &page,
                form_action,
                "Edit Role",
                request.name,
                request.description,
                &request.privileges,
                vec![msg],
            );
            render(tmpl)
        }
        Err(blocked) => page.blocked(blocked),
    }
}

pub async fn delete(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let id = path.into_inner();
    let url = format!("/roles/{id}");

    match page
        .guard("roles", "delete")
        .load(|token| async move { backend.delete(&url, &token).await })
        .await
    {
        Ok(()) => {
            state.profiles.clear();
            log::info!("Role {id} deleted");
            page.notify(Notice::success("Role deleted"));
        }
        Err(Blocked::FetchError(msg)) => page.notify(Notice::error(format!("Cannot delete role: {msg}"))),
        Err(Blocked::NotFound) => page.notify(Notice::error("Role no longer exists")),
        Err(blocked) => return page.blocked(blocked),
    }
    Ok(redirect("/roles"))
}
