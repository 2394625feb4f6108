use crate::event::Event;
use crate::message::{ClientMessage, GameState, HandResultLine, PlayerView, ServerMessage};
use pokerd_gameplay::{ActionKind, Phase, Table, ValidAction};

/// Errors in the Protocol error-kind taxonomy: the request is well-formed
/// JSON but carries a message the room doesn't understand (`InvalidMessage`)
/// or a well-formed action that isn't currently legal (`IllegalAction`, a
/// Policy error). Either way state is left unchanged and `error{message}`
/// goes back to the sender alone.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    InvalidMessage(String),
    IllegalAction(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMessage(s) => write!(f, "invalid message: {s}"),
            Self::IllegalAction(s) => write!(f, "illegal action: {s}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Who a `game_state` projection is being built for: a seated player (whose
/// own hole cards and, if acting, valid actions are included) or an
/// unseated spectator (neither).
#[derive(Debug, Clone, Copy)]
pub enum Viewer {
    Seat(usize),
    Spectator,
}

/// Translates between the room's internal `Event` vocabulary and the wire
/// `ServerMessage`/`ClientMessage` envelopes.
pub struct Protocol;

impl Protocol {
    /// Converts an event with no per-recipient variation into its wire
    /// message. `Event::StateChanged` has none here — it's projected fresh
    /// per recipient by [`Protocol::game_state`] instead.
    pub fn encode(event: &Event) -> Option<ServerMessage> {
        match event {
            Event::Spectating => Some(ServerMessage::Spectating),
            Event::Joined { seat } => Some(ServerMessage::Joined { seat: *seat }),
            Event::PlayerJoined { name, seat } => Some(ServerMessage::PlayerJoined {
                name: name.clone(),
                seat: *seat,
            }),
            Event::PlayerLeft { seat } => Some(ServerMessage::PlayerLeft { seat: *seat }),
            Event::PlayerDisconnected { seat } => Some(ServerMessage::PlayerDisconnected { seat: *seat }),
            Event::StateChanged => None,
            Event::HandStarted { hand_number } => Some(ServerMessage::HandStarted {
                hand_number: *hand_number,
            }),
            Event::PlayerActed { name, kind, .. } => {
                let amount = match kind {
                    ActionKind::Raise { to } => Some(*to),
                    _ => None,
                };
                Some(ServerMessage::PlayerAction {
                    name: name.clone(),
                    kind: kind.to_string(),
                    amount,
                })
            }
            Event::AwaitingRunItTwice { players } => Some(ServerMessage::RunTwicePrompt {
                players: players.clone(),
            }),
            Event::HandEnded(result) => Some(ServerMessage::HandEnded {
                winners: result.winners.clone(),
                pot: result.pot,
                hand_results: result
                    .hand_results
                    .iter()
                    .map(|(player_name, description)| HandResultLine {
                        player_name: player_name.clone(),
                        description: description.clone(),
                    })
                    .collect(),
                player_stacks: result.player_stacks.clone(),
            }),
            Event::Chat { from, text } => Some(ServerMessage::Chat {
                from: from.clone(),
                text: text.clone(),
            }),
            Event::Error { message } => Some(ServerMessage::Error {
                message: message.clone(),
            }),
        }
    }

    /// Builds a `game_state` view of `table` for one recipient. Hole cards
    /// and valid actions are the only fields that vary by recipient: a
    /// seat always sees its own cards, every non-folded seat is visible to
    /// everyone once the hand is at showdown, and valid actions are
    /// non-empty only for the seat currently acting.
    pub fn game_state(table: &Table, room_id: &str, viewer: Viewer) -> GameState {
        let viewer_seat = match viewer {
            Viewer::Seat(seat) => Some(seat),
            Viewer::Spectator => None,
        };
        let reveal_all = table.phase() == Phase::Showdown || table.phase() == Phase::HandOver;

        let players: Vec<PlayerView> = table
            .seats()
            .map(|(seat, p)| {
                let visible = Some(seat) == viewer_seat || (reveal_all && !p.is_folded());
                PlayerView {
                    seat,
                    name: p.name().to_string(),
                    stack: p.stack(),
                    current_bet: p.current_bet(),
                    folded: p.is_folded(),
                    all_in: p.is_all_in(),
                    sitting_out: p.is_sitting_out(),
                    position: table.position_of(seat),
                    has_cards: p.in_hand(),
                    cards: visible.then(|| p.hole()).flatten().map(|(a, b)| vec![a, b]),
                }
            })
            .collect();

        let your_cards = viewer_seat
            .and_then(|seat| table.seat(seat))
            .and_then(|p| p.hole())
            .map(|(a, b)| vec![a, b])
            .unwrap_or_default();

        let valid_actions = match viewer_seat {
            Some(seat) if table.acting() == Some(seat) => table.valid_actions(seat).unwrap_or_default(),
            _ => Vec::new(),
        };

        let call_amount = table
            .acting()
            .and_then(|seat| table.seat(seat))
            .map(|p| table.high_bet() - p.current_bet())
            .unwrap_or(0);

        let min_raise = valid_actions
            .iter()
            .find_map(|a| match a {
                ValidAction::Raise { min, .. } => Some(*min),
                _ => None,
            })
            .unwrap_or(table.high_bet() + table.last_raise());

        GameState {
            room_id: room_id.to_string(),
            small_blind: table.small_blind(),
            big_blind: table.big_blind(),
            phase: table.phase().to_string(),
            community_cards: table.community().to_vec(),
            pot: table.pot(),
            current_bet: table.high_bet(),
            current_player_seat: table.acting(),
            dealer_seat: table.dealer(),
            hand_number: table.hand_number(),
            players,
            your_cards,
            valid_actions,
            min_raise,
            call_amount,
        }
    }

    /// Parses one inbound WebSocket text frame into a `ClientMessage`.
    pub fn decode(text: &str) -> Result<ClientMessage, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::InvalidMessage(e.to_string()))
    }

    /// Confirms `kind` is one of the seat's currently `valid` actions,
    /// checking numeric bounds for `Raise`/`Call`/`AllIn`.
    pub fn validate(kind: ActionKind, valid: &[ValidAction]) -> Result<ActionKind, ProtocolError> {
        let ok = valid.iter().any(|v| match (v, &kind) {
            (ValidAction::Fold, ActionKind::Fold) => true,
            (ValidAction::Check, ActionKind::Check) => true,
            (ValidAction::Call { .. }, ActionKind::Call) => true,
            (ValidAction::AllIn { .. }, ActionKind::AllIn) => true,
            (ValidAction::Raise { min, max }, ActionKind::Raise { to }) => to >= min && to <= max,
            _ => false,
        });
        ok.then_some(kind)
            .ok_or_else(|| ProtocolError::IllegalAction(kind.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_valid_client_message() {
        let msg = Protocol::decode(r#"{"type":"start_game"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::StartGame));
    }

    #[test]
    fn decode_rejects_unknown_type() {
        assert!(Protocol::decode(r#"{"type":"nonsense"}"#).is_err());
    }

    #[test]
    fn validate_accepts_in_range_raise() {
        let valid = vec![ValidAction::Raise { min: 20, max: 100 }];
        assert!(Protocol::validate(ActionKind::Raise { to: 50 }, &valid).is_ok());
    }

    #[test]
    fn validate_rejects_raise_below_minimum() {
        let valid = vec![ValidAction::Raise { min: 20, max: 100 }];
        assert!(Protocol::validate(ActionKind::Raise { to: 10 }, &valid).is_err());
    }

    #[test]
    fn validate_rejects_action_not_offered() {
        let valid = vec![ValidAction::Fold, ValidAction::Check];
        assert!(Protocol::validate(ActionKind::Call, &valid).is_err());
    }

    #[test]
    fn game_state_hides_hole_cards_from_other_seats_before_showdown() {
        let mut t = Table::new(1, 2, 0, 1000);
        t.join(0, "alice", 200).unwrap();
        t.join(1, "bob", 200).unwrap();
        t.start_hand().unwrap();
        let view = Protocol::game_state(&t, "room-1", Viewer::Seat(0));
        let other = view.players.iter().find(|p| p.seat == 1).unwrap();
        assert!(other.cards.is_none());
        assert_eq!(view.your_cards.len(), 2);
    }

    #[test]
    fn game_state_reports_has_cards_even_when_cards_are_hidden() {
        let mut t = Table::new(1, 2, 0, 1000);
        t.join(0, "alice", 200).unwrap();
        t.join(1, "bob", 200).unwrap();
        t.start_hand().unwrap();
        t.join(2, "carol", 200).unwrap(); // seats mid-hand, dealt nothing this hand.
        let view = Protocol::game_state(&t, "room-1", Viewer::Seat(0));
        let other = view.players.iter().find(|p| p.seat == 1).unwrap();
        assert!(other.cards.is_none());
        assert!(other.has_cards);
        let not_dealt = view.players.iter().find(|p| p.seat == 2).unwrap();
        assert!(!not_dealt.has_cards);
    }
}
