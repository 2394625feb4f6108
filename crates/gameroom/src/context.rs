use pokerd_cards::Card;
use pokerd_core::Chips;
use pokerd_gameplay::{ActionKind, Phase};

/// One recorded action, in the shape `action_history` rows are built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub sequence: u32,
    pub seat: usize,
    pub player_name: String,
    pub action: ActionKind,
    pub phase: Phase,
}

/// Everything about a hand in progress needed to persist it once it ends:
/// starting stacks, hole cards dealt, and the full action log in order.
/// `Room` builds one of these at `hand_started` and hands it to
/// `pokerd_database` once the hand concludes.
#[derive(Debug, Clone)]
pub struct HandContext {
    hand_number: u64,
    dealer_seat: usize,
    starting_stacks: Vec<(usize, String, Chips)>,
    hole_cards: Vec<(usize, Card, Card)>,
    actions: Vec<ActionRecord>,
}

impl HandContext {
    /// Opens a new context at the start of a hand, snapshotting each
    /// seated player's name and stack before blinds are posted.
    pub fn new(hand_number: u64, dealer_seat: usize, starting_stacks: Vec<(usize, String, Chips)>) -> Self {
        Self {
            hand_number,
            dealer_seat,
            starting_stacks,
            hole_cards: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn dealer_seat(&self) -> usize {
        self.dealer_seat
    }

    pub fn starting_stacks(&self) -> &[(usize, String, Chips)] {
        &self.starting_stacks
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn record_hole(&mut self, seat: usize, a: Card, b: Card) {
        self.hole_cards.push((seat, a, b));
    }

    pub fn record_action(&mut self, seat: usize, player_name: &str, action: ActionKind, phase: Phase) {
        let sequence = self.actions.len() as u32;
        self.actions.push(ActionRecord {
            sequence,
            seat,
            player_name: player_name.to_string(),
            action,
            phase,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_starts_with_no_actions() {
        let ctx = HandContext::new(1, 0, vec![(0, "alice".into(), 200)]);
        assert_eq!(ctx.hand_number(), 1);
        assert!(ctx.actions().is_empty());
    }

    #[test]
    fn record_action_assigns_increasing_sequence_numbers() {
        let mut ctx = HandContext::new(1, 0, Vec::new());
        ctx.record_action(0, "alice", ActionKind::Check, Phase::PreFlop);
        ctx.record_action(1, "bob", ActionKind::Raise { to: 20 }, Phase::PreFlop);
        assert_eq!(ctx.actions()[0].sequence, 0);
        assert_eq!(ctx.actions()[1].sequence, 1);
        assert_eq!(ctx.actions()[1].player_name, "bob");
    }
}
