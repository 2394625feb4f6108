/// Rejections produced by the table state machine. All of these are
/// "Policy" errors in the error-kind taxonomy: the request is well-formed
/// but not currently legal, and state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    NotActingSeat,
    WrongPhaseForAction,
    CheckNotAvailable,
    CallNotAvailable,
    RaiseBelowMinimum { min: pokerd_core::Chips },
    RaiseExceedsStack,
    InsufficientChips,
    HandAlreadyInProgress,
    NotEnoughPlayersToStart,
    SeatOccupied,
    NameAlreadySeated,
    BuyInOutOfRange { min: pokerd_core::Chips, max: pokerd_core::Chips },
    SeatNotFound,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ActionError::NotActingSeat => write!(f, "it is not your turn to act"),
            ActionError::WrongPhaseForAction => write!(f, "action not valid in the current phase"),
            ActionError::CheckNotAvailable => write!(f, "cannot check facing a bet"),
            ActionError::CallNotAvailable => write!(f, "there is nothing to call"),
            ActionError::RaiseBelowMinimum { min } => write!(f, "raise must be at least {min}"),
            ActionError::RaiseExceedsStack => write!(f, "raise exceeds available stack"),
            ActionError::InsufficientChips => write!(f, "insufficient chips for that action"),
            ActionError::HandAlreadyInProgress => write!(f, "a hand is already in progress"),
            ActionError::NotEnoughPlayersToStart => write!(f, "need at least two eligible players to start"),
            ActionError::SeatOccupied => write!(f, "seat is already occupied"),
            ActionError::NameAlreadySeated => write!(f, "that name is already seated in this room"),
            ActionError::BuyInOutOfRange { min, max } => {
                write!(f, "buy-in must be between {min} and {max}")
            }
            ActionError::SeatNotFound => write!(f, "no such seat"),
        }
    }
}

impl std::error::Error for ActionError {}
