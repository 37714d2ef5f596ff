use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::Notice;
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::handlers::forms::{CsrfOnly, get_all, get_field, parse_form_body};
use crate::handlers::guarded::{Blocked, Page, redirect};
use crate::handlers::helpers::{all_roles, role_names};
use crate::models::role::Role;
use crate::models::user::{USER_STATUSES, UserDisplay, UserProfile, UserUpdate};
use crate::state::AppState;
use crate::templates_structs::{RoleOption, UserDetailTemplate, UserFormTemplate, UserFormValues};

pub async fn detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let url = format!("/users/{}", path.into_inner());

    let (user, roles) = tokio::join!(
        page.guard("users", "view")
            .load(|token| async move { backend.get::<UserProfile>(&url, &token).await }),
        all_roles(&page),
    );
    let user = match user {
        Ok(user) => user,
        Err(blocked) => return page.blocked(blocked),
    };

    let names = role_names(&roles);
    let tmpl = UserDetailTemplate {
        ctx: page.context(),
        user: UserDisplay::build(&user, &|id| names.get(id).cloned()),
        can_edit: page.can("users", "edit"),
        can_delete: page.can("users", "delete"),
    };
    render(tmpl)
}

fn role_options(roles: &[Role], selected: &[String]) -> Vec<RoleOption> {
    roles
        .iter()
        .filter_map(|r| {
            let id = r.id.clone()?;
            Some(RoleOption {
                name: r.name.clone().unwrap_or_else(|| id.clone()),
                selected: selected.contains(&id),
                id,
            })
        })
        .collect()
}

fn form_template(
    page: &Page<'_>,
    user_id: String,
    email: String,
    form: UserFormValues,
    roles: Vec<RoleOption>,
    errors: Vec<String>,
) -> UserFormTemplate {
    UserFormTemplate {
        ctx: page.context(),
        user_id,
        email,
        form,
        roles,
        statuses: USER_STATUSES.iter().map(|s| s.to_string()).collect(),
        errors,
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
    let url = format!("/users/{id}");

    let (user, roles) = tokio::join!(
        page.guard("users", "edit")
            .load(|token| async move { backend.get::<UserProfile>(&url, &token).await }),
        all_roles(&page),
    );
    let user = match user {
        Ok(user) => user,
        Err(blocked) => return page.blocked(blocked),
    };

    let form = UserFormValues {
        first_name: user.first_name.clone().unwrap_or_default(),
        last_name: user.last_name.clone().unwrap_or_default(),
        phone: user.phone.clone().unwrap_or_default(),
        skills: user.skills.clone().unwrap_or_default(),
        qualifications: user.qualifications.clone().unwrap_or_default(),
        preferences: user.preferences.clone().unwrap_or_default(),
        status: user.status.clone().unwrap_or_else(|| "active".to_string()),
    };
    let options = role_options(&roles, &user.roles);
    let email = user.email.clone().unwrap_or_default();
    render(form_template(&page, id, email, form, options, vec![]))
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

    let form = UserFormValues {
        first_name: get_field(&params, "first_name").trim().to_string(),
        last_name: get_field(&params, "last_name").trim().to_string(),
        phone: get_field(&params, "phone").trim().to_string(),
        skills: get_field(&params, "skills").trim().to_string(),
        qualifications: get_field(&params, "qualifications").trim().to_string(),
        preferences: get_field(&params, "preferences").trim().to_string(),
        status: get_field(&params, "status").trim().to_string(),
    };
    let selected: Vec<String> = get_all(&params, "roles").into_iter().map(String::from).collect();
    // Without the marker the form had no role checkboxes to submit
    let roles_shown = get_field(&params, "roles_present") == "1";

    // Validate
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.first_name, "First name", 100));
    errors.extend(validate::validate_required(&form.last_name, "Last name", 100));
    errors.extend(validate::validate_optional(&form.phone, "Phone", 30));
    errors.extend(validate::validate_optional(&form.skills, "Skills", 1000));
    errors.extend(validate::validate_optional(&form.qualifications, "Qualifications", 1000));
    errors.extend(validate::validate_optional(&form.preferences, "Preferences", 1000));
    errors.extend(validate::validate_choice(&form.status, "Status", USER_STATUSES));

    let view = page.guard("users", "edit");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }
    if !errors.is_empty() {
        let roles = all_roles(&page).await;
        let email = get_field(&params, "email").to_string();
        let options = role_options(&roles, &selected);
        return render(form_template(&page, id, email, form, options, errors));
    }

    let body = UserUpdate {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        phone: validate::non_blank(&form.phone),
        skills: validate::non_blank(&form.skills),
        qualifications: validate::non_blank(&form.qualifications),
        preferences: validate::non_blank(&form.preferences),
        status: form.status.clone(),
        roles: roles_shown.then(|| selected.clone()),
    };
    let url = format!("/users/{id}");
    let result = view
        .load(|token| async move { backend.put::<_, serde_json::Value>(&url, &token, &body).await })
        .await;

    match result {
        Ok(_) => {
            state.profiles.forget_profile(&id);
            log::info!("User {id} updated");
            page.notify(Notice::success("User updated successfully"));
            Ok(redirect("/users"))
        }
        Err(Blocked::FetchError(msg)) => {
            let roles = all_roles(&page).await;
            let email = get_field(&params, "email").to_string();
            let options = role_options(&roles, &selected);
            render(form_template(&page, id, email, form, options, vec![msg]))
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

    let own_id = page.auth.profile.as_ref().and_then(|p| p.id.as_deref());
    if own_id == Some(id.as_str()) {
        page.notify(Notice::error("You cannot delete your own account"));
        return Ok(redirect("/users"));
    }

    let url = format!("/users/{id}");
    match page
        .guard("users", "delete")
        .load(|token| async move { backend.delete(&url, &token).await })
        .await
    {
        Ok(()) => {
            state.profiles.forget_profile(&id);
            log::info!("User {id} deleted");
            page.notify(Notice::success("User deleted"));
        }
        Err(Blocked::FetchError(msg)) | Err(Blocked::AuthFailed(msg)) => {
            page.notify(Notice::error(format!("Could not delete user: {msg}")));
        }
        Err(Blocked::NotFound) => page.notify(Notice::error("User no longer exists")),
        Err(blocked) => return page.blocked(blocked),
    }
    Ok(redirect("/users"))
}
