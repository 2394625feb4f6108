use crate::{PgErr, ROOMS};
use std::time::{Duration, SystemTime};
use tokio_postgres::Client;
use uuid::Uuid;

/// Upserts a room's snapshot. `state_json` is a versioned, self-describing
/// document of the table (see `Table`'s `schema_version` field) — the
/// column is read back verbatim by [`load_snapshot`], with no column-level
/// interpretation of its contents.
pub async fn save_snapshot(client: &Client, room_id: Uuid, state_json: &serde_json::Value) -> Result<(), PgErr> {
    client
        .execute(
            const_format::concatcp!(
                "INSERT INTO ",
                ROOMS,
                " (room_id, state_json, updated_at) VALUES ($1, $2, now())
                 ON CONFLICT (room_id) DO UPDATE SET state_json = EXCLUDED.state_json, updated_at = now();"
            ),
            &[&room_id, state_json],
        )
        .await?;
    Ok(())
}

/// Loads a room's last-persisted snapshot, if one exists.
pub async fn load_snapshot(client: &Client, room_id: Uuid) -> Result<Option<serde_json::Value>, PgErr> {
    let row = client
        .query_opt(
            const_format::concatcp!("SELECT state_json FROM ", ROOMS, " WHERE room_id = $1;"),
            &[&room_id],
        )
        .await?;
    Ok(row.map(|r| r.get("state_json")))
}

/// Lists every room id with a persisted snapshot, for recovery on startup.
pub async fn list_room_ids(client: &Client) -> Result<Vec<Uuid>, PgErr> {
    let rows = client
        .query(const_format::concatcp!("SELECT room_id FROM ", ROOMS, ";"), &[])
        .await?;
    Ok(rows.iter().map(|r| r.get("room_id")).collect())
}

pub async fn delete_room(client: &Client, room_id: Uuid) -> Result<(), PgErr> {
    client
        .execute(
            const_format::concatcp!("DELETE FROM ", ROOMS, " WHERE room_id = $1;"),
            &[&room_id],
        )
        .await?;
    Ok(())
}

/// Deletes rooms whose last update is older than `idle_window`. Returns the
/// number of rooms purged.
pub async fn purge_idle(client: &Client, idle_window: Duration) -> Result<u64, PgErr> {
    let cutoff = SystemTime::now() - idle_window;
    let count = client
        .execute(
            const_format::concatcp!("DELETE FROM ", ROOMS, " WHERE updated_at < $1;"),
            &[&cutoff],
        )
        .await?;
    Ok(count)
}
