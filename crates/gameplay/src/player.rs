use pokerd_cards::Card;
use pokerd_core::Chips;

/// A player occupying a seat at a table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SeatedPlayer {
    name: String,
    stack: Chips,
    hole: Option<(Card, Card)>,
    current_bet: Chips,
    contributed: Chips,
    folded: bool,
    all_in: bool,
    sitting_out: bool,
    has_acted: bool,
}

impl SeatedPlayer {
    pub fn new(name: impl Into<String>, stack: Chips) -> Self {
        Self {
            name: name.into(),
            stack,
            hole: None,
            current_bet: 0,
            contributed: 0,
            folded: false,
            all_in: false,
            sitting_out: false,
            has_acted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn hole(&self) -> Option<(Card, Card)> {
        self.hole
    }
    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn contributed(&self) -> Chips {
        self.contributed
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_all_in(&self) -> bool {
        self.all_in
    }
    pub fn is_sitting_out(&self) -> bool {
        self.sitting_out
    }
    pub fn has_acted(&self) -> bool {
        self.has_acted
    }

    /// In the hand: dealt cards and has not folded.
    pub fn in_hand(&self) -> bool {
        self.hole.is_some() && !self.folded
    }

    /// To-act: in the hand, not all-in, and either hasn't acted this round
    /// or is still facing a bet above their own.
    pub fn to_act(&self, high_bet: Chips) -> bool {
        self.in_hand() && !self.all_in && (!self.has_acted || self.current_bet < high_bet)
    }

    pub fn deal(&mut self, cards: (Card, Card)) {
        self.hole = Some(cards);
        self.folded = false;
        self.all_in = false;
        self.current_bet = 0;
        self.contributed = 0;
        self.has_acted = false;
    }

    pub fn reset_for_next_hand(&mut self) {
        self.hole = None;
        self.current_bet = 0;
        self.contributed = 0;
        self.folded = false;
        self.all_in = false;
        self.has_acted = false;
    }

    pub fn fold(&mut self) {
        self.folded = true;
        self.has_acted = true;
    }

    pub fn set_has_acted(&mut self, acted: bool) {
        self.has_acted = acted;
    }

    pub fn set_sitting_out(&mut self, sitting_out: bool) {
        self.sitting_out = sitting_out;
    }

    /// Commits `amount` chips from the stack into the current-round bet,
    /// capping at the available stack and marking all-in if it's exhausted.
    /// Returns the amount actually committed.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let amount = amount.min(self.stack);
        self.stack -= amount;
        self.current_bet += amount;
        self.contributed += amount;
        self.has_acted = true;
        if self.stack == 0 {
            self.all_in = true;
        }
        amount
    }

    /// Folds at the start of a round end: moves the current-round bet into
    /// the running contribution ledger and clears the round-local bet.
    pub fn end_round(&mut self) {
        self.current_bet = 0;
        self.has_acted = false;
    }

    pub fn credit(&mut self, amount: Chips) {
        self.stack += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_caps_at_stack_and_marks_all_in() {
        let mut p = SeatedPlayer::new("a", 30);
        let committed = p.commit(50);
        assert_eq!(committed, 30);
        assert_eq!(p.stack(), 0);
        assert!(p.is_all_in());
    }

    #[test]
    fn to_act_requires_being_in_hand_and_not_all_in() {
        let mut p = SeatedPlayer::new("a", 100);
        p.deal((
            Card::from(0),
            Card::from(1),
        ));
        assert!(p.to_act(0));
        p.fold();
        assert!(!p.to_act(0));
    }
}
