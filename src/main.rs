use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::time::Duration;
use tracing::{info, warn};

use rust_schoolhub::config::AppConfig;
use rust_schoolhub::routes;
use rust_schoolhub::runtime::{lifetime, logging};
use rust_schoolhub::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();

    let started = chrono::Utc::now();

    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();
    let _log_guard = logging::init_tracing(config);

    warn!(
        "{} v{} ({}) starting, environment: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS"),
        config.app.environment
    );

    let context = lifetime::startup::prepare_server_startup().await.context;

    info!(
        "启动准备耗时 {} ms，工作线程 {}",
        chrono::Utc::now()
            .signed_duration_since(started)
            .num_milliseconds(),
        config.server.workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-store"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(context.clone()))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_user_routes)
            .configure(routes::configure_classes_routes)
            .configure(routes::configure_score_routes)
            .configure(routes::configure_domain_routes)
            .configure(routes::configure_result_routes)
            .configure(routes::configure_notification_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            warn!("Listening on unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
            warn!("Server stopped");
        }
    }

    Ok(())
}
