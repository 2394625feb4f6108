//! The `/ws/{room_id}` session multiplexer: bridges one WebSocket connection
//! to commands and messages on a single room's queue.
//!
//! There is no auth token to decode here — a connection starts anonymous
//! and gains a seat only once `join` succeeds, tracked locally so later
//! messages (`action`, `leave`, ...) can be tagged with it before reaching
//! the room.

use actix_web::{web, HttpRequest, HttpResponse};
use futures::StreamExt;
use pokerd_gameroom::{ClientMessage, Command, Protocol, RoomHandle, ServerMessage, SignalKind};
use tokio::sync::mpsc::unbounded_channel;
use uuid::Uuid;

use crate::AppState;

pub async fn enter(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let room_id = crate::rooms::parse_room_id(path.into_inner());
    let Some(room) = state.registry.get(room_id).await else {
        return Ok(HttpResponse::NotFound().body("room not found"));
    };

    let (response, session, msg_stream) = actix_ws::handle(&req, body)?;
    actix_web::rt::spawn(bridge(room, session, msg_stream));
    Ok(response)
}

/// Runs for the lifetime of one connection: forwards `ServerMessage`s the
/// room addresses to this connection out over the socket, and translates
/// inbound text frames into `Command`s tagged with whatever seat this
/// connection has joined as, if any.
async fn bridge(room: RoomHandle, mut session: actix_ws::Session, mut msg_stream: actix_ws::MessageStream) {
    let (tx, mut rx) = unbounded_channel::<ServerMessage>();
    let mut seat: Option<usize> = None;
    let mut display_name: Option<String> = None;

    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                match outgoing {
                    Some(message) => {
                        if let ServerMessage::Joined { seat: joined_seat } = message {
                            seat = Some(joined_seat);
                        }
                        if session.text(message.to_json()).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = msg_stream.next() => {
                match incoming {
                    Some(Ok(actix_ws::Message::Text(text))) => {
                        handle_text(&room, &tx, &mut display_name, seat, &text).await;
                    }
                    Some(Ok(actix_ws::Message::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(actix_ws::Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break,
                }
            }
        }
    }

    if let Some(seat) = seat {
        let _ = room.send(Command::Disconnected { seat }).await;
    }
    let _ = session.close(None).await;
}

async fn handle_text(
    room: &RoomHandle,
    tx: &tokio::sync::mpsc::UnboundedSender<ServerMessage>,
    display_name: &mut Option<String>,
    seat: Option<usize>,
    text: &str,
) {
    let message = match Protocol::decode(text) {
        Ok(message) => message,
        Err(e) => {
            let _ = tx.send(ServerMessage::Error { message: e.to_string() });
            return;
        }
    };

    let command = match message {
        ClientMessage::Spectate { name } => {
            *display_name = Some(name);
            Command::Spectate { sender: tx.clone() }
        }
        ClientMessage::Join { name, seat, buy_in } => {
            *display_name = Some(name.clone());
            Command::Join { name, seat, buy_in, sender: tx.clone() }
        }
        ClientMessage::Leave => match seat {
            Some(seat) => Command::Leave { seat },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::StartGame => Command::StartGame { requested_by: seat },
        ClientMessage::Action(kind) => match seat {
            Some(seat) => Command::Action { seat, kind },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::SitOut { sitting_out } => match seat {
            Some(seat) => Command::SitOut { seat, sitting_out },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::Chat { text } => Command::Chat {
            name: display_name.clone().unwrap_or_else(|| "anonymous".to_string()),
            text,
        },
        ClientMessage::RunTwiceChoice { run_it_twice } => match seat {
            Some(seat) => Command::RunTwiceChoice { seat, run_it_twice },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::WebrtcOffer(signal) => match seat {
            Some(from) => Command::Signal { kind: SignalKind::Offer, from, to: signal.target, payload: signal.payload },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::WebrtcAnswer(signal) => match seat {
            Some(from) => Command::Signal { kind: SignalKind::Answer, from, to: signal.target, payload: signal.payload },
            None => return reject(tx, "not seated"),
        },
        ClientMessage::Ice(signal) => match seat {
            Some(from) => Command::Signal { kind: SignalKind::Ice, from, to: signal.target, payload: signal.payload },
            None => return reject(tx, "not seated"),
        },
    };

    let _ = room.send(command).await;
}

fn reject(tx: &tokio::sync::mpsc::UnboundedSender<ServerMessage>, message: &str) {
    let _ = tx.send(ServerMessage::Error { message: message.to_string() });
}
