//! Report dashboard tests: per-section privilege gating, concurrent section
//! fetches, table filtering, and CSV export.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::json;

use common::*;

fn donation_report() -> serde_json::Value {
    json!({
        "total_amount": 150.0,
        "currency": "USD",
        "total_count": 2,
        "by_type": [{ "donation_type": "monetary", "count": 2, "total_amount": 150.0 }],
        "records": [
            { "donor_name": "Maria Lopez", "donation_type": "monetary", "amount": 100.0, "currency": "USD", "donation_date": "2024-03-01" },
            { "donor_name": "Sam Ode", "donation_type": "monetary", "amount": 50.0, "currency": "USD", "donation_date": "2024-03-05" }
        ]
    })
}

async fn backend_for(codes: &[&str]) -> FakeBackend {
    FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(codes)),
        ("GET /reports/donations", 200, donation_report()),
        ("GET /reports/users", 500, json!({ "detail": "Report service offline" })),
    ])
    .await
}

#[actix_rt::test]
async fn test_only_permitted_sections_are_fetched() {
    let backend = backend_for(&["reports:view_donations"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/reports").cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(body.contains("Maria Lopez"));
    assert!(body.contains("Access Denied"));
    assert_eq!(backend.gets(), vec!["/users/me", "/reports/donations"]);
    assert!(backend.calls().iter().all(|c| c.bearer.as_deref() == Some(TEST_TOKEN)));

    backend.stop().await;
}

#[actix_rt::test]
async fn test_failing_section_does_not_block_the_others() {
    let backend = backend_for(&["reports:view_donations", "reports:view_users"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/reports").cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();

    assert!(body.contains("Report service offline"));
    assert!(body.contains("Sam Ode"));

    backend.stop().await;
}

#[actix_rt::test]
async fn test_reports_page_requires_some_report_privilege() {
    let backend = backend_for(&["users:list"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/reports").cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(backend.gets(), vec!["/users/me"]);

    backend.stop().await;
}

#[actix_rt::test]
async fn test_csv_export_matches_the_filtered_table() {
    let backend = backend_for(&["reports:view_donations"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let req = TestRequest::get()
        .uri("/reports/donations.csv?donations_q=maria")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("Content-Type").unwrap(), "text/csv; charset=utf-8");
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"donations-report.csv\""
    );

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "\"Date\",\"Donor\",\"Type\",\"Amount\",\"Currency\"");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains("\"Maria Lopez\""));

    backend.stop().await;
}

#[actix_rt::test]
async fn test_csv_export_of_a_denied_section_never_fetches() {
    let backend = backend_for(&["reports:view_donations"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/reports/users.csv").cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!backend.was_called("/reports/users"));

    backend.stop().await;
}

#[actix_rt::test]
async fn test_unknown_section_is_not_found() {
    let backend = backend_for(&["reports:view_donations"]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/reports/payroll.csv").cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    backend.stop().await;
}
