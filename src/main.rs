use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use volunteer_admin::config::AppConfig;
use volunteer_admin::state::AppState;
use volunteer_admin::{configure, logging};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init(config.suppressed_log_patterns.clone());

    // Session signing key: persistent sessions across restarts need SESSION_KEY
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    let cookie_secure = config.cookie_secure;
    let state = web::Data::new(AppState::from_config(config));

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
