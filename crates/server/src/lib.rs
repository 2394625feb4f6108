//! actix-web HTTP/WebSocket frontend binding `pokerd_gameroom::Registry` to
//! the outside world.
//!
//! ## Submodules
//!
//! - [`rooms`] — `POST /api/rooms`, `GET /api/rooms/{id}`, stats, leaderboard, health
//! - [`ws`] — the `GET /ws/{room_id}` session multiplexer
mod rooms;
mod ws;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use pokerd_gameroom::Registry;
use std::sync::Arc;
use std::time::Duration;
use tokio_postgres::Client;

/// Everything `run()` needs that the CLI binary is responsible for parsing
/// (env vars, flags). Kept out of this crate so it carries no CLI
/// dependency of its own.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
    pub db_url: String,
    pub idle_window: Duration,
    pub persist_sweep_interval: Duration,
    pub cors_origins: Vec<String>,
}

pub struct AppState {
    pub registry: Arc<Registry>,
    pub db: Arc<Client>,
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let db = pokerd_database::db(&config.db_url).await;
    pokerd_database::bootstrap(&db).await?;

    let registry = Arc::new(Registry::new(db.clone()));
    let recovered = registry.recover(config.idle_window).await;
    log::info!("recovered {recovered} rooms from the last run");

    tokio::spawn(registry.clone().run_idle_sweeper(config.idle_window, config.persist_sweep_interval));

    let state = web::Data::new(AppState { registry, db });
    let cors_origins = config.cors_origins.clone();
    let bind = (config.bind_host.clone(), config.port);
    log::info!("pokerd-server listening on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let mut cors = Cors::default().allowed_methods(vec!["GET", "POST"]).allow_any_header().max_age(3600);
        cors = if cors_origins.is_empty() {
            cors.allow_any_origin()
        } else {
            cors_origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
        };

        App::new()
            .app_data(state.clone())
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors)
            .route("/health", web::get().to(rooms::health))
            .route("/api/rooms", web::post().to(rooms::create_room))
            .route("/api/rooms/{room_id}", web::get().to(rooms::get_room))
            .route("/api/stats/{name}", web::get().to(rooms::get_stats))
            .route("/api/leaderboard", web::get().to(rooms::get_leaderboard))
            .route("/ws/{room_id}", web::get().to(ws::enter))
    })
    .workers(6)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
