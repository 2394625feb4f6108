//! HTTP routes: room lifecycle and persisted statistics.

use crate::AppState;
use actix_web::{web, HttpResponse, Responder};
use pokerd_core::ID;
use pokerd_gameplay::Table;
use pokerd_gameroom::TableSettings;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest {
    pub settings: TableSettings,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: String,
    pub settings: TableSettings,
}

pub async fn create_room(state: web::Data<AppState>, body: web::Json<CreateRoomRequest>) -> impl Responder {
    let settings = body.into_inner().settings;
    let handle = state.registry.create(settings).await;
    HttpResponse::Ok().json(CreateRoomResponse {
        room_id: handle.id().to_string(),
        settings,
    })
}

#[derive(Debug, Serialize)]
struct SeatSummary {
    seat: usize,
    name: String,
    stack: i64,
    sitting_out: bool,
}

#[derive(Debug, Serialize)]
struct RoomSummary {
    room_id: String,
    settings: TableSettings,
    phase: String,
    hand_number: u64,
    seats: Vec<SeatSummary>,
}

/// Reads the room's settings and seat occupancy from its last persisted
/// snapshot rather than the live `Table`, which is owned exclusively by the
/// room's own task and not directly readable from an HTTP handler. Every
/// state-mutating command persists a fresh snapshot, so this lags live play
/// by at most one in-flight command.
pub async fn get_room(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let room_id = path.into_inner();
    match pokerd_database::load_snapshot(&state.db, room_id).await {
        Ok(Some(state_json)) => match serde_json::from_value::<Table>(state_json) {
            Ok(table) => HttpResponse::Ok().json(RoomSummary {
                room_id: room_id.to_string(),
                settings: TableSettings {
                    small_blind: table.small_blind(),
                    big_blind: table.big_blind(),
                    min_buy_in: table.min_buy_in(),
                    max_buy_in: table.max_buy_in(),
                },
                phase: table.phase().to_string(),
                hand_number: table.hand_number(),
                seats: table
                    .seats()
                    .map(|(seat, p)| SeatSummary {
                        seat,
                        name: p.name().to_string(),
                        stack: p.stack(),
                        sitting_out: p.is_sitting_out(),
                    })
                    .collect(),
            }),
            Err(e) => {
                log::error!("corrupt snapshot for room {room_id}: {e}");
                HttpResponse::InternalServerError().body("corrupt room snapshot")
            }
        },
        Ok(None) => HttpResponse::NotFound().body("room not found"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

pub async fn get_stats(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    match pokerd_database::get(&state.db, &path.into_inner()).await {
        Ok(Some(row)) => HttpResponse::Ok().json(row_to_json(&row)),
        Ok(None) => HttpResponse::NotFound().body("no stats for that player"),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;

pub async fn get_leaderboard(state: web::Data<AppState>, query: web::Query<LeaderboardQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    match pokerd_database::leaderboard(&state.db, limit).await {
        Ok(rows) => HttpResponse::Ok().json(rows.iter().map(row_to_json).collect::<Vec<_>>()),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

fn row_to_json(row: &pokerd_database::PlayerStatsRow) -> serde_json::Value {
    serde_json::json!({
        "name": row.name,
        "hands_played": row.hands_played,
        "hands_won": row.hands_won,
        "total_profit": row.total_profit,
        "biggest_pot": row.biggest_pot,
    })
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let ok = state.db.execute("SELECT 1", &[]).await.is_ok();
    let rooms = state.registry.len().await;
    let body = serde_json::json!({ "status": if ok { "ok" } else { "degraded" }, "rooms": rooms });
    if ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn parse_room_id(uuid: Uuid) -> ID<Table> {
    ID::from(uuid)
}
