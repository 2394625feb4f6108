use crate::{PgErr, PLAYER_STATS};
use pokerd_core::Chips;
use tokio_postgres::Client;

/// A player's running totals across every hand they've played.
#[derive(Debug, Clone)]
pub struct PlayerStatsRow {
    pub name: String,
    pub hands_played: i64,
    pub hands_won: i64,
    pub total_profit: Chips,
    pub biggest_pot: Chips,
}

/// Folds one hand's outcome for `name` into their running totals, creating
/// the row if this is their first recorded hand.
pub async fn record_hand(client: &Client, name: &str, won: bool, profit: Chips, pot: Chips) -> Result<(), PgErr> {
    client
        .execute(
            const_format::concatcp!(
                "INSERT INTO ",
                PLAYER_STATS,
                " (name, hands_played, hands_won, total_profit, biggest_pot, updated_at)
                 VALUES ($1, 1, $2, $3, $4, now())
                 ON CONFLICT (name) DO UPDATE SET
                    hands_played = ",
                PLAYER_STATS,
                ".hands_played + 1,
                    hands_won    = ",
                PLAYER_STATS,
                ".hands_won + $2,
                    total_profit = ",
                PLAYER_STATS,
                ".total_profit + $3,
                    biggest_pot  = GREATEST(",
                PLAYER_STATS,
                ".biggest_pot, $4),
                    updated_at   = now();"
            ),
            &[&name, &(won as i64), &profit, &pot],
        )
        .await?;
    Ok(())
}

pub async fn get(client: &Client, name: &str) -> Result<Option<PlayerStatsRow>, PgErr> {
    let row = client
        .query_opt(
            const_format::concatcp!(
                "SELECT name, hands_played, hands_won, total_profit, biggest_pot FROM ",
                PLAYER_STATS,
                " WHERE name = $1;"
            ),
            &[&name],
        )
        .await?;
    Ok(row.map(|r| PlayerStatsRow {
        name: r.get("name"),
        hands_played: r.get("hands_played"),
        hands_won: r.get("hands_won"),
        total_profit: r.get("total_profit"),
        biggest_pot: r.get("biggest_pot"),
    }))
}

/// Top `limit` players by total profit, for the leaderboard endpoint.
pub async fn leaderboard(client: &Client, limit: i64) -> Result<Vec<PlayerStatsRow>, PgErr> {
    let rows = client
        .query(
            const_format::concatcp!(
                "SELECT name, hands_played, hands_won, total_profit, biggest_pot FROM ",
                PLAYER_STATS,
                " ORDER BY total_profit DESC LIMIT $1;"
            ),
            &[&limit],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|r| PlayerStatsRow {
            name: r.get("name"),
            hands_played: r.get("hands_played"),
            hands_won: r.get("hands_won"),
            total_profit: r.get("total_profit"),
            biggest_pot: r.get("biggest_pot"),
        })
        .collect())
}
