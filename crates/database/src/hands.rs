use crate::{PgErr, HANDS};
use pokerd_core::Chips;
use tokio_postgres::Client;
use uuid::Uuid;

/// A completed hand, as inserted after showdown or an uncontested award.
#[derive(Debug, Clone)]
pub struct HandRow {
    pub id: Uuid,
    pub room_id: Uuid,
    pub hand_number: i64,
    pub pot_size: Chips,
    pub winner_names: Vec<String>,
    pub winning_hand: Option<String>,
}

pub async fn insert_hand(client: &Client, row: &HandRow) -> Result<(), PgErr> {
    client
        .execute(
            const_format::concatcp!(
                "INSERT INTO ",
                HANDS,
                " (id, room_id, hand_number, pot_size, winner_names, winning_hand)
                 VALUES ($1, $2, $3, $4, $5, $6);"
            ),
            &[
                &row.id,
                &row.room_id,
                &row.hand_number,
                &row.pot_size,
                &row.winner_names,
                &row.winning_hand,
            ],
        )
        .await?;
    Ok(())
}

/// Lists a room's hand history, most recent first.
pub async fn list_for_room(client: &Client, room_id: Uuid, limit: i64) -> Result<Vec<HandRow>, PgErr> {
    let rows = client
        .query(
            const_format::concatcp!(
                "SELECT id, room_id, hand_number, pot_size, winner_names, winning_hand FROM ",
                HANDS,
                " WHERE room_id = $1 ORDER BY hand_number DESC LIMIT $2;"
            ),
            &[&room_id, &limit],
        )
        .await?;
    Ok(rows
        .iter()
        .map(|r| HandRow {
            id: r.get("id"),
            room_id: r.get("room_id"),
            hand_number: r.get("hand_number"),
            pot_size: r.get("pot_size"),
            winner_names: r.get("winner_names"),
            winning_hand: r.get("winning_hand"),
        })
        .collect())
}
