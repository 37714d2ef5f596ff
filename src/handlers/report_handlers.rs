use std::collections::HashMap;

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::privilege::PrivilegeChecker;
use crate::backend::GENERIC_FETCH_ERROR;
use crate::errors::{AppError, render};
use crate::handlers::guarded::{Blocked, Page};
use crate::models::report::{DonationReport, EventAttendanceReport, ReportPayload, UserReport, VolunteerHoursReport};
use crate::reports::{REPORT_ACTIONS, ReportSection, SectionView, export_csv};
use crate::state::AppState;
use crate::templates_structs::ReportsTemplate;

/// Fetch one section's payload through its own guard.
async fn fetch_section<P: ReportPayload>(page: &Page<'_>, section: ReportSection) -> Result<P, Blocked> {
    let backend = &page.state.backend;
    let endpoint = section.endpoint();
    page.guard("reports", section.action())
        .load(|token| async move { backend.get::<P>(&endpoint, &token).await })
        .await
}

async fn section_view<P: ReportPayload>(
    page: &Page<'_>,
    section: ReportSection,
    params: &HashMap<String, String>,
) -> SectionView {
    match fetch_section::<P>(page, section).await {
        Ok(payload) => SectionView::loaded(
            section,
            payload.summary(),
            payload.records(),
            params,
            page.state.config.report_chart_limit,
        ),
        Err(Blocked::AuthLoading) => SectionView::loading(section),
        Err(Blocked::Unauthorized(_)) => SectionView::denied(section),
        Err(Blocked::NotFound) => SectionView::failed(section, "No report data available.".to_string()),
        Err(Blocked::FetchError(msg)) | Err(Blocked::AuthFailed(msg)) => SectionView::failed(section, msg),
        Err(Blocked::Unauthenticated) | Err(Blocked::Disposed) => {
            SectionView::failed(section, GENERIC_FETCH_ERROR.to_string())
        }
    }
}

/// All four report sections, fetched concurrently. Each section settles on
/// its own; one failing or being denied leaves the others untouched.
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let page = Page::resolve(&req, &state, &session).await;
    if let Err(blocked) = page.signed_in() {
        return page.blocked(blocked);
    }
    if !page.auth.checker().has_any("reports", &REPORT_ACTIONS) {
        return page.blocked(Blocked::Unauthorized("reports:view_*".to_string()));
    }

    let params = query.into_inner();
    let (hours, attendance, donations, users) = tokio::join!(
        section_view::<VolunteerHoursReport>(&page, ReportSection::VolunteerHours, &params),
        section_view::<EventAttendanceReport>(&page, ReportSection::EventAttendance, &params),
        section_view::<DonationReport>(&page, ReportSection::Donations, &params),
        section_view::<UserReport>(&page, ReportSection::Users, &params),
    );
    let sections = vec![hours, attendance, donations, users];

    let tmpl = ReportsTemplate {
        ctx: page.context(),
        refresh: sections.iter().any(SectionView::is_loading),
        sections,
    };
    render(tmpl)
}

async fn section_csv<P: ReportPayload>(
    page: &Page<'_>,
    section: ReportSection,
    params: &HashMap<String, String>,
) -> Result<String, Blocked> {
    let payload = fetch_section::<P>(page, section).await?;
    Ok(export_csv(section, payload.records(), params))
}

/// The rows a section table currently shows, as CSV.
pub async fn export(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let section = ReportSection::from_slug(&path.into_inner()).ok_or(AppError::NotFound)?;
    let page = Page::resolve(&req, &state, &session).await;
    let params = query.into_inner();

    let csv = match section {
        ReportSection::VolunteerHours => section_csv::<VolunteerHoursReport>(&page, section, &params).await,
        ReportSection::EventAttendance => section_csv::<EventAttendanceReport>(&page, section, &params).await,
        ReportSection::Donations => section_csv::<DonationReport>(&page, section, &params).await,
        ReportSection::Users => section_csv::<UserReport>(&page, section, &params).await,
    };
    match csv {
        Ok(body) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}-report.csv\"", section.slug()),
            ))
            .body(body)),
        Err(blocked) => page.blocked(blocked),
    }
}
