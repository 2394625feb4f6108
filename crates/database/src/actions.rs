use crate::{PgErr, ACTION_HISTORY};
use pokerd_core::Chips;
use tokio_postgres::Client;
use uuid::Uuid;

/// One row of a hand's action log, independent of any in-memory action
/// representation so this crate doesn't need to depend on `pokerd-gameplay`'s
/// or `pokerd-gameroom`'s action types.
#[derive(Debug, Clone)]
pub struct ActionRow {
    pub player_name: String,
    pub action: String,
    pub amount: Option<Chips>,
    pub phase: String,
    pub sequence: i32,
}

/// Inserts a hand's full action log, one statement per row. The room only
/// calls this once a hand has fully concluded, so a failure here means a
/// retry on the same already-built rows rather than a half-written hand
/// blocking live play.
pub async fn insert_actions(client: &Client, hand_id: Uuid, rows: &[ActionRow]) -> Result<(), PgErr> {
    for row in rows {
        client
            .execute(
                const_format::concatcp!(
                    "INSERT INTO ",
                    ACTION_HISTORY,
                    " (hand_id, player_name, action, amount, phase, sequence)
                     VALUES ($1, $2, $3, $4, $5, $6);"
                ),
                &[
                    &hand_id,
                    &row.player_name,
                    &row.action,
                    &row.amount,
                    &row.phase,
                    &row.sequence,
                ],
            )
            .await?;
    }
    Ok(())
}

pub async fn list_for_hand(client: &Client, hand_id: Uuid) -> Result<Vec<ActionRow>, PgErr> {
    let rows = client
        .query(
            const_format::concatcp!(
                "SELECT player_name, action, amount, phase, sequence FROM ",
                ACTION_HISTORY,
                " WHERE hand_id = $1 ORDER BY sequence ASC;"
            ),
            &[&hand_id],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|r| ActionRow {
            player_name: r.get("player_name"),
            action: r.get("action"),
            amount: r.get("amount"),
            phase: r.get("phase"),
            sequence: r.get("sequence"),
        })
        .collect())
}
