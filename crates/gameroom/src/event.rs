use pokerd_gameplay::{ActionKind, HandResult};

/// The room's internal vocabulary: what happened, independent of how it's
/// encoded onto the wire. `Protocol::encode` turns one of these into a
/// `ServerMessage` (or, for `StateChanged`, a per-recipient `GameState`
/// projected fresh off the live `Table`) to broadcast or unicast.
#[derive(Debug, Clone)]
pub enum Event {
    Spectating,
    Joined { seat: usize },
    PlayerJoined { name: String, seat: usize },
    PlayerLeft { seat: usize },
    PlayerDisconnected { seat: usize },
    /// The table changed in some way that every connection's view should
    /// reflect (a join, an action, a street, a new hand). Carries no
    /// payload: `Protocol::encode` reads the live `Table` to build each
    /// recipient's projection, since hole-card and valid-action visibility
    /// differ per recipient.
    StateChanged,
    HandStarted { hand_number: u64 },
    PlayerActed { seat: usize, name: String, kind: ActionKind },
    AwaitingRunItTwice { players: Vec<String> },
    HandEnded(HandResult),
    Chat { from: String, text: String },
    Error { message: String },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::Spectating => write!(f, "spectating"),
            Event::Joined { seat } => write!(f, "joined seat {seat}"),
            Event::PlayerJoined { name, seat } => write!(f, "{name} joined seat {seat}"),
            Event::PlayerLeft { seat } => write!(f, "seat {seat} left"),
            Event::PlayerDisconnected { seat } => write!(f, "seat {seat} disconnected"),
            Event::StateChanged => write!(f, "state changed"),
            Event::HandStarted { hand_number } => write!(f, "hand #{hand_number} started"),
            Event::PlayerActed { name, kind, .. } => write!(f, "{name}: {kind}"),
            Event::AwaitingRunItTwice { players } => {
                write!(f, "awaiting run-it-twice decision from {}", players.join(", "))
            }
            Event::HandEnded(result) => write!(f, "hand ended, winners: {}", result.winners.join(", ")),
            Event::Chat { from, text } => write!(f, "{from}: {text}"),
            Event::Error { message } => write!(f, "error: {message}"),
        }
    }
}
