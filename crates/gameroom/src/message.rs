//! The wire envelope: `{"type": "...", "data": {...}}` in both directions.
//! `ClientMessage`/`ServerMessage` are adjacently tagged so `type` and
//! `data` land as sibling fields rather than nesting `data` inside a
//! further-tagged inner value.

use pokerd_cards::Card;
use pokerd_core::Chips;
use pokerd_gameplay::{ActionKind, PositionName, ValidAction};
use std::collections::HashMap;

/// A signaling payload forwarded to another connection without the room
/// inspecting its contents beyond the seat it's addressed to.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Signal {
    pub target: usize,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Spectate { name: String },
    Join { name: String, seat: usize, buy_in: Chips },
    Leave,
    StartGame,
    Action(ActionKind),
    SitOut { sitting_out: bool },
    Chat { text: String },
    RunTwiceChoice { run_it_twice: bool },
    WebrtcOffer(Signal),
    WebrtcAnswer(Signal),
    Ice(Signal),
}

/// One seat in the public `players` projection of `game_state`. Never
/// carries hole cards — those are delivered separately as `your_cards`,
/// visible only to the owning connection (or any non-folded seat once the
/// hand reaches showdown, per the state-view projection rule).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlayerView {
    pub seat: usize,
    pub name: String,
    pub stack: Chips,
    pub current_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub position: Option<PositionName>,
    /// Whether this seat is dealt into the current hand, visible to every
    /// recipient regardless of `cards`' visibility gate, so a client can
    /// render a face-down back for an opponent whose hand it can't see.
    pub has_cards: bool,
    /// This seat's hole cards, populated only for the recipient's own seat
    /// or, once the hand has reached showdown, for any seat that didn't
    /// fold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct GameState {
    pub room_id: String,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub phase: String,
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub current_player_seat: Option<usize>,
    pub dealer_seat: usize,
    pub hand_number: u64,
    pub players: Vec<PlayerView>,
    pub your_cards: Vec<Card>,
    pub valid_actions: Vec<ValidAction>,
    pub min_raise: Chips,
    pub call_amount: Chips,
}

/// One seat's showdown outcome, as reported in `hand_ended.hand_results`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HandResultLine {
    pub player_name: String,
    pub description: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    Spectating,
    Joined { seat: usize },
    PlayerJoined { name: String, seat: usize },
    PlayerLeft { seat: usize },
    PlayerDisconnected { seat: usize },
    GameState(GameState),
    HandStarted { hand_number: u64 },
    PlayerAction { name: String, kind: String, amount: Option<Chips> },
    HandEnded {
        winners: Vec<String>,
        pot: Chips,
        hand_results: Vec<HandResultLine>,
        player_stacks: HashMap<String, Chips>,
    },
    RunTwicePrompt { players: Vec<String> },
    Chat { from: String, text: String },
    Error { message: String },
    WebrtcOffer(RelayedSignal),
    WebrtcAnswer(RelayedSignal),
    Ice(RelayedSignal),
}

/// A `Signal` re-addressed from the sender's seat, as relayed to the target.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RelayedSignal {
    pub from: usize,
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl ServerMessage {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ServerMessage always serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_action_round_trips_through_the_envelope() {
        let msg = ClientMessage::Action(ActionKind::Raise { to: 40 });
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ClientMessage = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            parsed,
            ClientMessage::Action(ActionKind::Raise { to: 40 })
        ));
    }

    #[test]
    fn server_message_envelope_has_type_and_data_fields() {
        let msg = ServerMessage::Joined { seat: 3 };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(value["type"], "joined");
        assert_eq!(value["data"]["seat"], 3);
    }

    #[test]
    fn leave_has_no_data_payload() {
        let msg = ClientMessage::Leave;
        let json = serde_json::to_string(&msg).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "leave");
    }
}
