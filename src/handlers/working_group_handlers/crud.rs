use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::Notice;
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::handlers::forms::{CsrfOnly, get_field, parse_form_body};
use crate::handlers::guarded::{Blocked, Page, redirect};
use crate::models::working_group::{GROUP_STATUSES, WorkingGroup, WorkingGroupDisplay, WorkingGroupRequest};
use crate::state::AppState;
use crate::templates_structs::{WorkingGroupDetailTemplate, WorkingGroupFormTemplate, WorkingGroupFormValues};

fn form_template(
    page: &Page<'_>,
    form_action: String,
    form_title: &str,
    form: WorkingGroupFormValues,
    errors: Vec<String>,
) -> WorkingGroupFormTemplate {
    WorkingGroupFormTemplate {
        ctx: page.context(),
        form_action,
        form_title: form_title.to_string(),
        form,
        statuses: GROUP_STATUSES.iter().map(|s| s.to_string()).collect(),
        errors,
    }
}

fn read_form(params: &[(String, String)]) -> (WorkingGroupFormValues, Vec<String>) {
    let form = WorkingGroupFormValues {
        name: get_field(params, "name").trim().to_string(),
        description: get_field(params, "description").trim().to_string(),
        status: get_field(params, "status").trim().to_string(),
    };
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.name, "Name", 100));
    errors.extend(validate::validate_optional(&form.description, "Description", 1000));
    errors.extend(validate::validate_choice(&form.status, "Status", GROUP_STATUSES));
    (form, errors)
}

fn request_from(form: &WorkingGroupFormValues) -> WorkingGroupRequest {
    WorkingGroupRequest {
        name: form.name.clone(),
        description: form.description.clone(),
        status: form.status.clone(),
    }
}

pub async fn detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let url = format!("/working-groups/{}", path.into_inner());

    let group = match page
        .guard("working_groups", "view")
        .load(|token| async move { backend.get::<WorkingGroup>(&url, &token).await })
        .await
    {
        Ok(group) => group,
        Err(blocked) => return page.blocked(blocked),
    };

    let tmpl = WorkingGroupDetailTemplate {
        ctx: page.context(),
        group: WorkingGroupDisplay::from(&group),
        can_edit: page.can("working_groups", "edit"),
        can_delete: page.can("working_groups", "delete"),
    };
    render(tmpl)
}

pub async fn new_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.guard("working_groups", "create").admit() {
        return page.blocked(blocked);
    }
    let tmpl = form_template(
        &page,
        "/working-groups".to_string(),
        "New Working Group",
        WorkingGroupFormValues::default(),
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
    let view = page.guard("working_groups", "create");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let (form, errors) = read_form(&params);
    if !errors.is_empty() {
        return render(form_template(&page, "/working-groups".to_string(), "New Working Group", form, errors));
    }

    let request = request_from(&form);
    match view
        .load(|token| async move {
            backend
                .post::<_, serde_json::Value>("/working-groups/", &token, &request)
                .await
        })
        .await
    {
        Ok(_) => {
            log::info!("Working group '{}' created", form.name);
            page.notify(Notice::success("Working group created successfully"));
            Ok(redirect("/working-groups"))
        }
        Err(Blocked::FetchError(msg)) => render(form_template(
            &page,
            "/working-groups".to_string(),
            "New Working Group",
            form,
            vec![msg],
        )),
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
    let url = format!("/working-groups/{id}");

    let group = match page
        .guard("working_groups", "edit")
        .load(|token| async move { backend.get::<WorkingGroup>(&url, &token).await })
        .await
    {
        Ok(group) => group,
        Err(blocked) => return page.blocked(blocked),
    };

    let form = WorkingGroupFormValues {
        name: group.name.unwrap_or_default(),
        description: group.description.unwrap_or_default(),
        status: group.status.unwrap_or_else(|| "active".to_string()),
    };
    render(form_template(&page, format!("/working-groups/{id}/edit"), "Edit Working Group", form, vec![]))
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
    let form_action = format!("/working-groups/{id}/edit");
    let view = page.guard("working_groups", "edit");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let (form, errors) = read_form(&params);
    if !errors.is_empty() {
        return render(form_template(&page, form_action, "Edit Working Group", form, errors));
    }

    let url = format!("/working-groups/{id}");
    let request = request_from(&form);
    match view
        .load(|token| async move { backend.put::<_, serde_json::Value>(&url, &token, &request).await })
        .await
    {
        Ok(_) => {
            log::info!("Working group {id} updated");
            page.notify(Notice::success("Working group updated successfully"));
            Ok(redirect("/working-groups"))
        }
        Err(Blocked::FetchError(msg)) => render(form_template(&page, form_action, "Edit Working Group", form, vec![msg])),
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
    let url = format!("/working-groups/{id}");

    match page
        .guard("working_groups", "delete")
        .load(|token| async move { backend.delete(&url, &token).await })
        .await
    {
        Ok(()) => {
            log::info!("Working group {id} deleted");
            page.notify(Notice::success("Working group deleted"));
        }
        Err(Blocked::FetchError(msg)) => page.notify(Notice::error(format!("Could not delete working group: {msg}"))),
        Err(Blocked::NotFound) => page.notify(Notice::error("Working group no longer exists")),
        Err(blocked) => return page.blocked(blocked),
    }
    Ok(redirect("/working-groups"))
}
