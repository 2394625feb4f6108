//! pokerd server binary.
//!
//! Parses the process's configuration surface, initializes logging, and
//! runs the actix-web server until interrupted.

use clap::Parser;
use pokerd_server::ServerConfig;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "pokerd", version, about = "Real-time No-Limit Hold'em room server")]
struct Args {
    /// Address to bind the HTTP/WebSocket listener to.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    bind_host: String,

    /// Port to bind the HTTP/WebSocket listener to.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Postgres connection string.
    #[arg(long, env = "DB_URL")]
    db_url: String,

    /// Seconds a room's persisted snapshot may go unrefreshed before it is
    /// purged and excluded from startup recovery.
    #[arg(long, env = "ROOM_IDLE_WINDOW", default_value_t = 86400)]
    idle_window_secs: u64,

    /// Seconds between idle-snapshot sweeps.
    #[arg(long, env = "PERSIST_INTERVAL", default_value_t = 30)]
    persist_interval_secs: u64,

    /// Comma-separated list of allowed CORS origins. Empty means allow any.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,
}

fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{time}.log")).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let config = ServerConfig {
        bind_host: args.bind_host,
        port: args.port,
        db_url: args.db_url,
        idle_window: Duration::from_secs(args.idle_window_secs),
        persist_sweep_interval: Duration::from_secs(args.persist_interval_secs),
        cors_origins: args.cors_origins,
    };

    pokerd_server::run(config).await
}
