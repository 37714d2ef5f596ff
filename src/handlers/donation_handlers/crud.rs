use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::session::Notice;
use crate::auth::{csrf, validate};
use crate::errors::{AppError, render};
use crate::handlers::forms::{CsrfOnly, get_field, parse_form_body};
use crate::handlers::guarded::{Blocked, Page, redirect};
use crate::models::display::parse_date;
use crate::models::donation::{DONATION_KINDS, Donation, DonationDisplay, DonationRequest};
use crate::state::AppState;
use crate::templates_structs::{DonationDetailTemplate, DonationFormTemplate, DonationFormValues};

fn form_template(
    page: &Page<'_>,
    form_action: String,
    form_title: &str,
    form: DonationFormValues,
    errors: Vec<String>,
) -> DonationFormTemplate {
    DonationFormTemplate {
        ctx: page.context(),
        form_action,
        form_title: form_title.to_string(),
        form,
        kinds: DONATION_KINDS
            .iter()
            .map(|(code, label)| (code.to_string(), label.to_string()))
            .collect(),
        errors,
    }
}

fn read_form(params: &[(String, String)]) -> DonationFormValues {
    let field = |key: &str| get_field(params, key).trim().to_string();
    DonationFormValues {
        donor_name: field("donor_name"),
        donor_email: field("donor_email"),
        donor_phone: field("donor_phone"),
        donation_type: field("donation_type"),
        amount: field("amount"),
        currency: field("currency"),
        description: field("description"),
        donation_date: field("donation_date"),
    }
}

/// Validate a submitted donation. Monetary donations need a positive amount
/// and a currency; other kinds may carry an estimated value.
fn build_request(form: &DonationFormValues) -> Result<DonationRequest, Vec<String>> {
    let kinds: Vec<&str> = DONATION_KINDS.iter().map(|(code, _)| *code).collect();
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.donor_name, "Donor name", 200));
    errors.extend(validate::validate_optional_email(&form.donor_email));
    errors.extend(validate::validate_optional(&form.donor_phone, "Phone", 30));
    errors.extend(validate::validate_choice(&form.donation_type, "Donation type", &kinds));
    errors.extend(validate::validate_optional(&form.description, "Description", 1000));
    errors.extend(validate::validate_date(&form.donation_date, "Donation date"));

    let monetary = form.donation_type == "monetary";
    let mut amount = None;
    let mut currency = None;
    if monetary || !form.amount.is_empty() {
        match validate::parse_amount(&form.amount) {
            Ok(v) => amount = Some(v),
            Err(e) => errors.push(e),
        }
        match validate::parse_currency(&form.currency) {
            Ok(c) => currency = Some(c),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    let donation_date = parse_date(&form.donation_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| form.donation_date.clone());
    Ok(DonationRequest {
        donor_name: form.donor_name.clone(),
        donor_email: validate::non_blank(&form.donor_email),
        donor_phone: validate::non_blank(&form.donor_phone),
        donation_type: form.donation_type.clone(),
        amount,
        currency,
        description: validate::non_blank(&form.description),
        donation_date,
    })
}

pub async fn detail(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    let backend = &state.backend;
    let url = format!("/donations/{}", path.into_inner());

    let donation = match page
        .guard("donations", "view")
        .load(|token| async move { backend.get::<Donation>(&url, &token).await })
        .await
    {
        Ok(donation) => donation,
        Err(blocked) => return page.blocked(blocked),
    };

    let tmpl = DonationDetailTemplate {
        ctx: page.context(),
        donation: DonationDisplay::from(&donation),
        can_edit: page.can("donations", "edit"),
        can_delete: page.can("donations", "delete"),
    };
    render(tmpl)
}

pub async fn new_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.guard("donations", "create").admit() {
        return page.blocked(blocked);
    }
    let tmpl = form_template(
        &page,
        "/donations".to_string(),
        "Record Donation",
        DonationFormValues::default(),
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
    let view = page.guard("donations", "create");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let form = read_form(&params);
    let request = match build_request(&form) {
        Ok(request) => request,
        Err(errors) => return render(form_template(&page, "/donations".to_string(), "Record Donation", form, errors)),
    };

    match view
        .load(|token| async move { backend.post::<_, serde_json::Value>("/donations/", &token, &request).await })
        .await
    {
        Ok(_) => {
            log::info!("Donation from '{}' recorded", form.donor_name);
            page.notify(Notice::success("Donation recorded successfully"));
            Ok(redirect("/donations"))
        }
        Err(Blocked::FetchError(msg)) => {
            render(form_template(&page, "/donations".to_string(), "Record Donation", form, vec![msg]))
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
    let url = format!("/donations/{id}");

    let d = match page
        .guard("donations", "edit")
        .load(|token| async move { backend.get::<Donation>(&url, &token).await })
        .await
    {
        Ok(donation) => donation,
        Err(blocked) => return page.blocked(blocked),
    };

    let form = DonationFormValues {
        donor_name: d.donor_name.unwrap_or_default(),
        donor_email: d.donor_email.unwrap_or_default(),
        donor_phone: d.donor_phone.unwrap_or_default(),
        donation_type: d.donation_type.unwrap_or_else(|| "monetary".to_string()),
        amount: d.amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
        currency: d.currency.unwrap_or_default(),
        description: d.description.unwrap_or_default(),
        donation_date: d
            .donation_date
            .as_deref()
            .and_then(parse_date)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    };
    render(form_template(&page, format!("/donations/{id}/edit"), "Edit Donation", form, vec![]))
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
    let form_action = format!("/donations/{id}/edit");
    let view = page.guard("donations", "edit");
    if let Err(blocked) = view.admit() {
        return page.blocked(blocked);
    }

    let form = read_form(&params);
    let request = match build_request(&form) {
        Ok(request) => request,
        Err(errors) => return render(form_template(&page, form_action, "Edit Donation", form, errors)),
    };

    let url = format!("/donations/{id}");
    match view
        .load(|token| async move { backend.put::<_, serde_json::Value>(&url, &token, &request).await })
        .await
    {
        Ok(_) => {
            log::info!("Donation {id} updated");
            page.notify(Notice::success("Donation updated successfully"));
            Ok(redirect("/donations"))
        }
        Err(Blocked::FetchError(msg)) => render(form_template(&page, form_action, "Edit Donation", form, vec![msg])),
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
    let url = format!("/donations/{id}");

    match page
        .guard("donations", "delete")
        .load(|token| async move { backend.delete(&url, &token).await })
        .await
    {
        Ok(()) => {
            log::info!("Donation {id} deleted");
            page.notify(Notice::success("Donation deleted"));
        }
        Err(Blocked::FetchError(msg)) => page.notify(Notice::error(format!("Could not delete donation: {msg}"))),
        Err(Blocked::NotFound) => page.notify(Notice::error("Donation no longer exists")),
        Err(blocked) => return page.blocked(blocked),
    }
    Ok(redirect("/donations"))
}
