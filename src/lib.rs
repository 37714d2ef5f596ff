pub mod auth;
pub mod backend;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod logging;
pub mod models;
pub mod reports;
pub mod state;
pub mod templates_structs;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, middleware, web};

use crate::handlers::guarded::redirect;
use crate::handlers::{
    account_handlers, auth_handlers, dashboard, donation_handlers, invitation_handlers, report_handlers,
    role_handlers, user_handlers, working_group_handlers,
};

/// Every application route. Session and logging middleware are wrapped by
/// the caller so tests can mount the same table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/password-reset", web::get().to(auth_handlers::password_reset_page))
        .route("/password-reset", web::post().to(auth_handlers::password_reset_submit))
        .route("/logout", web::post().to(auth_handlers::logout))
        .route("/", web::get().to(|| async { redirect("/dashboard") }))
        // Protected routes
        .service(
            web::scope("")
                .wrap(middleware::from_fn(auth::middleware::require_auth))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/account", web::get().to(account_handlers::view))
                // Users are created through invitations, so there is no /users/new
                .route("/users", web::get().to(user_handlers::list))
                .route("/users/{id}", web::get().to(user_handlers::detail))
                .route("/users/{id}/edit", web::get().to(user_handlers::edit_form))
                .route("/users/{id}/edit", web::post().to(user_handlers::update))
                .route("/users/{id}/delete", web::post().to(user_handlers::delete))
                // /roles/new BEFORE /roles/{id}
                .route("/roles", web::get().to(role_handlers::list))
                .route("/roles/new", web::get().to(role_handlers::new_form))
                .route("/roles", web::post().to(role_handlers::create))
                .route("/roles/{id}", web::get().to(role_handlers::detail))
                .route("/roles/{id}/edit", web::get().to(role_handlers::edit_form))
                .route("/roles/{id}/edit", web::post().to(role_handlers::update))
                .route("/roles/{id}/delete", web::post().to(role_handlers::delete))
                .route("/working-groups", web::get().to(working_group_handlers::list))
                .route("/working-groups/new", web::get().to(working_group_handlers::new_form))
                .route("/working-groups", web::post().to(working_group_handlers::create))
                .route("/working-groups/{id}", web::get().to(working_group_handlers::detail))
                .route("/working-groups/{id}/edit", web::get().to(working_group_handlers::edit_form))
                .route("/working-groups/{id}/edit", web::post().to(working_group_handlers::update))
                .route("/working-groups/{id}/delete", web::post().to(working_group_handlers::delete))
                .route("/donations", web::get().to(donation_handlers::list))
                .route("/donations/new", web::get().to(donation_handlers::new_form))
                .route("/donations", web::post().to(donation_handlers::create))
                .route("/donations/{id}", web::get().to(donation_handlers::detail))
                .route("/donations/{id}/edit", web::get().to(donation_handlers::edit_form))
                .route("/donations/{id}/edit", web::post().to(donation_handlers::update))
                .route("/donations/{id}/delete", web::post().to(donation_handlers::delete))
                .route("/invitations", web::get().to(invitation_handlers::list))
                .route("/reports", web::get().to(report_handlers::index))
                .route("/reports/{section}.csv", web::get().to(report_handlers::export))
                .default_service(web::to(not_found)),
        );
}

async fn not_found() -> HttpResponse {
    errors::error_page(
        StatusCode::NOT_FOUND,
        "Page Not Found",
        "The page you are looking for does not exist.",
        None,
    )
}
