use pokerd_core::Chips;

/// A player decision, as submitted to the table. `Raise`/`AllIn` carry the
/// target total current-round bet the player is moving to (`X` in the
/// spec's "raise to X" language), not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise { to: Chips },
    AllIn,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ActionKind::Fold => write!(f, "fold"),
            ActionKind::Check => write!(f, "check"),
            ActionKind::Call => write!(f, "call"),
            ActionKind::Raise { to } => write!(f, "raise to {to}"),
            ActionKind::AllIn => write!(f, "all-in"),
        }
    }
}

/// One applicable action and its numeric bounds, as reported to the acting
/// seat in `game_state.valid_actions`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ValidAction {
    Fold,
    Check,
    Call { amount: Chips },
    Raise { min: Chips, max: Chips },
    AllIn { amount: Chips },
}
