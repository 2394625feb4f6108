//! Table metadata and DDL, plus `bootstrap()` to apply it at startup.
use crate::{ACTION_HISTORY, HANDS, PLAYER_STATS, ROOMS};
use tokio_postgres::Client;

/// Compile-time table metadata. Each implementor is a zero-sized marker for
/// one table; the DDL itself is built with `const_format::concatcp!` so it's
/// assembled at compile time rather than formatted on every call.
pub trait Schema {
    fn name() -> &'static str;
    fn creates() -> &'static str;
    fn indices() -> &'static str;
}

pub struct Rooms;
pub struct Hands;
pub struct PlayerStats;
pub struct ActionHistory;

impl Schema for Rooms {
    fn name() -> &'static str {
        ROOMS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ROOMS,
            " (
                room_id    UUID PRIMARY KEY,
                state_json JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_",
            ROOMS,
            "_updated_at ON ",
            ROOMS,
            " (updated_at);"
        )
    }
}

impl Schema for Hands {
    fn name() -> &'static str {
        HANDS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            HANDS,
            " (
                id           UUID PRIMARY KEY,
                room_id      UUID NOT NULL,
                hand_number  BIGINT NOT NULL,
                pot_size     BIGINT NOT NULL,
                winner_names TEXT[] NOT NULL,
                winning_hand TEXT,
                created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_",
            HANDS,
            "_room_id ON ",
            HANDS,
            " (room_id);"
        )
    }
}

impl Schema for PlayerStats {
    fn name() -> &'static str {
        PLAYER_STATS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            PLAYER_STATS,
            " (
                name         TEXT PRIMARY KEY,
                hands_played BIGINT NOT NULL DEFAULT 0,
                hands_won    BIGINT NOT NULL DEFAULT 0,
                total_profit BIGINT NOT NULL DEFAULT 0,
                biggest_pot  BIGINT NOT NULL DEFAULT 0,
                updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_",
            PLAYER_STATS,
            "_total_profit ON ",
            PLAYER_STATS,
            " (total_profit DESC);"
        )
    }
}

impl Schema for ActionHistory {
    fn name() -> &'static str {
        ACTION_HISTORY
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ACTION_HISTORY,
            " (
                id          BIGSERIAL PRIMARY KEY,
                hand_id     UUID NOT NULL,
                player_name TEXT NOT NULL,
                action      TEXT NOT NULL,
                amount      BIGINT,
                phase       TEXT NOT NULL,
                sequence    INTEGER NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_",
            ACTION_HISTORY,
            "_hand_id ON ",
            ACTION_HISTORY,
            " (hand_id);"
        )
    }
}

/// Creates every table and index if absent. Called once at startup;
/// `CREATE ... IF NOT EXISTS` makes this safe to run on every boot.
pub async fn bootstrap(client: &Client) -> Result<(), crate::PgErr> {
    for ddl in [
        Rooms::creates(),
        Rooms::indices(),
        Hands::creates(),
        Hands::indices(),
        PlayerStats::creates(),
        PlayerStats::indices(),
        ActionHistory::creates(),
        ActionHistory::indices(),
    ] {
        client.batch_execute(ddl).await?;
    }
    log::info!("schema bootstrap complete");
    Ok(())
}
