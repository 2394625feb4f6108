//! Postgres persistence for room state, completed hands, and player stats.
//!
//! ## Connectivity
//!
//! - [`db()`] — establishes a connection from a Postgres DSN
//! - [`bootstrap()`] — creates tables and indices if they don't exist
//!
//! ## Modules
//!
//! - [`rooms`] — room snapshot save/load/list/purge
//! - [`hands`] — completed-hand records
//! - [`stats`] — per-player running totals
//! - [`actions`] — per-hand action log

mod actions;
mod hands;
mod rooms;
mod schema;
mod stats;

pub use actions::*;
pub use hands::*;
pub use rooms::*;
pub use schema::*;
pub use stats::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// Establishes a database connection.
///
/// # Panics
///
/// Panics if the connection fails; callers at startup should let this
/// propagate into a fatal exit rather than run against no store.
pub async fn db(url: &str) -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(connection);
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// Postgres error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for active room snapshots.
#[rustfmt::skip]
pub const ROOMS:          &str = "rooms";
/// Table for completed hands.
#[rustfmt::skip]
pub const HANDS:          &str = "hands";
/// Table for per-player running totals.
#[rustfmt::skip]
pub const PLAYER_STATS:   &str = "player_stats";
/// Table for the per-hand action log.
#[rustfmt::skip]
pub const ACTION_HISTORY: &str = "action_history";
