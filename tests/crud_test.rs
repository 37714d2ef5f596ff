//! Form submission tests: what reaches the backend, where a successful submit
//! lands, and when the profile cache is dropped.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::json;

use common::*;

async fn body_text<B: actix_web::body::MessageBody>(resp: actix_web::dev::ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

fn stored_user() -> serde_json::Value {
    json!({
        "id": "u2",
        "email": "joao@example.org",
        "first_name": "Joao",
        "last_name": "Costa",
        "status": "active",
        "roles": ["r1", "r2"],
    })
}

// ============================================================================
// USERS
// ============================================================================

#[actix_rt::test]
async fn test_user_edit_without_role_list_keeps_roles() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["users:edit"])),
        ("GET /users/u2", 200, stored_user()),
        ("PUT /users/u2", 200, json!({})),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/users/u2/edit").cookie(cookie.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!body_text(resp).await.contains("roles_present"));
    assert!(!backend.was_called("/roles/"));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/u2/edit")
            .cookie(cookie)
            .set_form([
                ("csrf_token", token.as_str()),
                ("email", "joao@example.org"),
                ("first_name", "Joao"),
                ("last_name", "Costa"),
                ("status", "inactive"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/users");

    let sent = backend.body_of("PUT", "/users/u2").expect("update should be sent");
    assert_eq!(sent["status"], "inactive");
    assert!(sent.get("roles").is_none(), "roles must not be overwritten: {sent}");

    backend.stop().await;
}

#[actix_rt::test]
async fn test_user_edit_with_role_list_sends_selection() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["users:edit", "roles:list"])),
        ("GET /users/u2", 200, stored_user()),
        ("GET /roles/", 200, json!([{ "id": "r1", "name": "Driver" }, { "id": "r2", "name": "Cook" }])),
        ("PUT /users/u2", 200, json!({})),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/users/u2/edit").cookie(cookie.clone()).to_request()).await;
    let body = body_text(resp).await;
    assert!(body.contains("roles_present"));
    assert!(body.contains("Driver"));

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/u2/edit")
            .cookie(cookie.clone())
            .set_form([
                ("csrf_token", token.as_str()),
                ("first_name", "Joao"),
                ("last_name", "Costa"),
                ("status", "active"),
                ("roles_present", "1"),
                ("roles", "r2"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(backend.body_of("PUT", "/users/u2").unwrap()["roles"], json!(["r2"]));

    // Every box unticked clears the assignments
    test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/u2/edit")
            .cookie(cookie)
            .set_form([
                ("csrf_token", token.as_str()),
                ("first_name", "Joao"),
                ("last_name", "Costa"),
                ("status", "active"),
                ("roles_present", "1"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(backend.body_of("PUT", "/users/u2").unwrap()["roles"], json!([]));

    backend.stop().await;
}

#[actix_rt::test]
async fn test_invalid_user_edit_rerenders_without_saving() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["users:edit"])),
        ("PUT /users/u2", 200, json!({})),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/u2/edit")
            .cookie(cookie)
            .set_form([
                ("csrf_token", token.as_str()),
                ("first_name", "Joao"),
                ("last_name", "  "),
                ("status", "retired"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Last name is required"));
    assert!(body.contains("value=\"Joao\""));
    assert_eq!(backend.count("PUT", "/users/u2"), 0);

    backend.stop().await;
}

#[actix_rt::test]
async fn test_editing_own_record_refetches_own_profile() {
    // Backend id and identity-provider uid differ
    let mut me = profile_with(&["users:edit"]);
    me["id"] = json!("42");
    let backend = FakeBackend::start(vec![("GET /users/me", 200, me), ("PUT /users/42", 200, json!({}))]).await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    test::call_service(&app, TestRequest::get().uri("/account").cookie(cookie.clone()).to_request()).await;
    assert_eq!(backend.count("GET", "/users/me"), 1);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/42/edit")
            .cookie(cookie.clone())
            .set_form([
                ("csrf_token", token.as_str()),
                ("first_name", "Ana"),
                ("last_name", "Silva"),
                ("status", "active"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    test::call_service(&app, TestRequest::get().uri("/account").cookie(cookie).to_request()).await;
    assert_eq!(backend.count("GET", "/users/me"), 2);

    backend.stop().await;
}

#[actix_rt::test]
async fn test_user_delete_redirects_to_list() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["users:delete"])),
        ("DELETE /users/u2", 200, json!({})),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/users/u2/delete")
            .cookie(cookie)
            .set_form([("csrf_token", token.as_str())])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/users");
    assert_eq!(backend.count("DELETE", "/users/u2"), 1);
    assert_eq!(backend.calls().iter().find(|c| c.method == "DELETE").unwrap().bearer.as_deref(), Some(TEST_TOKEN));

    backend.stop().await;
}

// ============================================================================
// ROLES
// ============================================================================

#[actix_rt::test]
async fn test_role_edit_keeps_uncatalogued_privileges_and_drops_cached_profiles() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["roles:edit"])),
        (
            "GET /roles/r1",
            200,
            json!({ "id": "r1", "name": "Coordinator", "privileges": { "users": ["list"], "events": ["create"] } }),
        ),
        ("PUT /roles/r1", 200, json!({})),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(&app, TestRequest::get().uri("/roles/r1/edit").cookie(cookie.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains(r#"<input type="hidden" name="privileges" value="events:create">"#));
    assert_eq!(backend.count("GET", "/users/me"), 1);

    // The hidden field comes back with the ticked boxes
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/roles/r1/edit")
            .cookie(cookie.clone())
            .set_form([
                ("csrf_token", token.as_str()),
                ("name", "Coordinator"),
                ("description", ""),
                ("privileges", "users:list"),
                ("privileges", "users:view"),
                ("privileges", "events:create"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/roles");
    assert_eq!(
        backend.body_of("PUT", "/roles/r1").unwrap()["privileges"],
        json!({ "events": ["create"], "users": ["list", "view"] })
    );

    test::call_service(&app, TestRequest::get().uri("/account").cookie(cookie).to_request()).await;
    assert_eq!(backend.count("GET", "/users/me"), 2);

    backend.stop().await;
}

// ============================================================================
// WORKING GROUPS
// ============================================================================

#[actix_rt::test]
async fn test_working_group_create_posts_and_redirects() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["working_groups:create"])),
        ("POST /working-groups/", 201, json!({ "id": "g9" })),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/working-groups")
            .cookie(cookie)
            .set_form([
                ("csrf_token", token.as_str()),
                ("name", " Kitchen Crew "),
                ("description", "Prepares meals"),
                ("status", "active"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/working-groups");
    assert_eq!(
        backend.body_of("POST", "/working-groups/").unwrap(),
        json!({ "name": "Kitchen Crew", "description": "Prepares meals", "status": "active" })
    );

    backend.stop().await;
}

#[actix_rt::test]
async fn test_invalid_working_group_is_not_posted() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["working_groups:create"])),
        ("POST /working-groups/", 201, json!({ "id": "g9" })),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, token) = sign_in!(app);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/working-groups")
            .cookie(cookie)
            .set_form([
                ("csrf_token", token.as_str()),
                ("name", ""),
                ("description", "Prepares meals"),
                ("status", "active"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Name is required"));
    assert!(body.contains("Prepares meals"));
    assert_eq!(backend.count("POST", "/working-groups/"), 0);

    backend.stop().await;
}

#[actix_rt::test]
async fn test_working_group_search_filters_the_list() {
    let backend = FakeBackend::start(vec![
        ("GET /users/me", 200, profile_with(&["working_groups:list"])),
        (
            "GET /working-groups/",
            200,
            json!([
                { "id": "g1", "name": "Kitchen Crew", "description": "Prepares meals" },
                { "id": "g2", "name": "Logistics", "description": "Moves the KITCHEN equipment" },
                { "id": "g3", "name": "Welcome Desk" },
            ]),
        ),
    ])
    .await;
    let app = test_app!(test_state(&backend, FakeIdentity::new()));
    let (cookie, _) = sign_in!(app);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/working-groups?q=kitchen").cookie(cookie.clone()).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Kitchen Crew"));
    assert!(body.contains("Logistics"));
    assert!(!body.contains("Welcome Desk"));

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/working-groups?q=garden").cookie(cookie).to_request(),
    )
    .await;
    assert!(body_text(resp).await.contains("No working groups match"));

    backend.stop().await;
}
