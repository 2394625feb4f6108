use crate::action::{ActionKind, ValidAction};
use crate::error::ActionError;
use crate::player::SeatedPlayer;
use crate::pot::{pots_from_contributions, refund_uncalled, Pot, Settlement, Showdown, State};
use crate::position::PositionName;
use pokerd_cards::{Card, Deck};
use pokerd_core::{Chips, ID, SEATS};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    HandOver,
}

/// What happened as a consequence of applying one action.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Action applied; the same betting round continues with a new acting seat.
    Continues { acting: usize },
    /// The betting round ended and a new street was dealt; action continues.
    StreetAdvanced { acting: usize },
    /// The hand is over — by showdown (possibly after an all-in runout with
    /// no further betting) or because only one player remained uncontested.
    HandEnded(HandResult),
    /// Every remaining player is all-in with streets still left to deal;
    /// the room should poll `run_it_twice_eligible_seats()` for a
    /// run-it-twice decision and call `decide_run_it_twice`.
    AwaitingRunItTwice,
}

/// A completed hand's public result, used to build `hand_ended`.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub winners: Vec<String>,
    pub pot: Chips,
    pub hand_results: Vec<(String, String)>,
    pub player_stacks: HashMap<String, Chips>,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Phase::Waiting => "waiting",
            Phase::PreFlop => "pre_flop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
            Phase::HandOver => "hand_over",
        };
        write!(f, "{s}")
    }
}

/// The deterministic No-Limit Hold'em state machine for a single table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Table {
    id: ID<Table>,
    small_blind: Chips,
    big_blind: Chips,
    min_buy_in: Chips,
    max_buy_in: Chips,
    seats: Vec<Option<SeatedPlayer>>,
    deck: Deck,
    community: Vec<Card>,
    phase: Phase,
    dealer: usize,
    acting: Option<usize>,
    high_bet: Chips,
    last_raise: Chips,
    hand_number: u64,
    pending_leave: Vec<usize>,
    /// Whether the current high bet came from a full raise. A short all-in
    /// raise (less than the minimum increment) leaves this false: players
    /// who already acted this round may call it but not re-raise.
    reopens_raise: bool,
    /// Set when every remaining player is all-in with streets still to deal
    /// and the hand is paused awaiting a run-it-twice decision.
    awaiting_run_it_twice: bool,
    schema_version: u32,
}

const SCHEMA_VERSION: u32 = 1;

impl Table {
    pub fn new(small_blind: Chips, big_blind: Chips, min_buy_in: Chips, max_buy_in: Chips) -> Self {
        Self {
            id: ID::random(),
            small_blind,
            big_blind,
            min_buy_in,
            max_buy_in,
            seats: (0..SEATS).map(|_| None).collect(),
            deck: Deck::new(),
            community: Vec::new(),
            phase: Phase::Waiting,
            dealer: 0,
            acting: None,
            high_bet: 0,
            last_raise: big_blind,
            hand_number: 0,
            pending_leave: Vec::new(),
            reopens_raise: true,
            awaiting_run_it_twice: false,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn id(&self) -> ID<Table> {
        self.id
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn dealer(&self) -> usize {
        self.dealer
    }
    pub fn acting(&self) -> Option<usize> {
        self.acting
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn high_bet(&self) -> Chips {
        self.high_bet
    }
    pub fn last_raise(&self) -> Chips {
        self.last_raise
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }
    pub fn min_buy_in(&self) -> Chips {
        self.min_buy_in
    }
    pub fn max_buy_in(&self) -> Chips {
        self.max_buy_in
    }
    pub fn seat(&self, seat: usize) -> Option<&SeatedPlayer> {
        self.seats.get(seat).and_then(|s| s.as_ref())
    }
    pub fn seats(&self) -> impl Iterator<Item = (usize, &SeatedPlayer)> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
    }

    /// Current pot, summed across every side pot, at this moment. A seat's
    /// `contributed` already runs across the whole hand — `commit` updates
    /// it at the same time as `current_bet`, so this does not also add
    /// `current_bet` on top.
    pub fn pot(&self) -> Chips {
        self.seats().map(|(_, p)| p.contributed()).sum()
    }

    pub fn position_of(&self, seat: usize) -> Option<PositionName> {
        let active = self.active_seats_from_dealer();
        PositionName::label_all(&active)
            .into_iter()
            .find(|&(s, _)| s == seat)
            .map(|(_, name)| name)
    }

    fn active_seats_from_dealer(&self) -> Vec<usize> {
        (0..SEATS)
            .map(|offset| (self.dealer + offset) % SEATS)
            .filter(|&s| self.seats[s].as_ref().is_some_and(|p| !p.is_sitting_out()))
            .collect()
    }

    /// Occupied seats ordered starting at the first seat left of the
    /// dealer, wrapping around the table. Used to order showdown payouts
    /// so leftover chips from an uneven split go out one-by-one starting
    /// from that seat, per spec.md §4.2.
    fn seats_left_of_dealer(&self) -> Vec<usize> {
        (1..=SEATS)
            .map(|offset| (self.dealer + offset) % SEATS)
            .filter(|&s| self.seats[s].is_some())
            .collect()
    }

    pub fn join(&mut self, seat: usize, name: &str, buy_in: Chips) -> Result<(), ActionError> {
        if seat >= SEATS {
            return Err(ActionError::SeatNotFound);
        }
        if self.seats[seat].is_some() {
            return Err(ActionError::SeatOccupied);
        }
        if self.seats().any(|(_, p)| p.name() == name) {
            return Err(ActionError::NameAlreadySeated);
        }
        if buy_in < self.min_buy_in || buy_in > self.max_buy_in {
            return Err(ActionError::BuyInOutOfRange {
                min: self.min_buy_in,
                max: self.max_buy_in,
            });
        }
        self.seats[seat] = Some(SeatedPlayer::new(name, buy_in));
        Ok(())
    }

    /// Mid-hand: fold immediately, seat retained until hand award. Between
    /// hands: seat freed immediately.
    pub fn leave(&mut self, seat: usize) -> Result<(), ActionError> {
        let player = self.seats.get_mut(seat).and_then(|s| s.as_mut()).ok_or(ActionError::SeatNotFound)?;
        if matches!(self.phase, Phase::Waiting | Phase::HandOver) {
            self.seats[seat] = None;
        } else {
            if player.in_hand() && !player.is_folded() {
                player.fold();
                if Some(seat) == self.acting {
                    self.acting = self.next_to_act(seat);
                }
            }
            self.pending_leave.push(seat);
        }
        Ok(())
    }

    pub fn sit_out(&mut self, seat: usize, sitting_out: bool) -> Result<(), ActionError> {
        let player = self.seats.get_mut(seat).and_then(|s| s.as_mut()).ok_or(ActionError::SeatNotFound)?;
        player.set_sitting_out(sitting_out);
        Ok(())
    }

    fn eligible_for_hand(&self) -> Vec<usize> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
            .filter(|(_, p)| !p.is_sitting_out() && p.stack() > 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn start_hand(&mut self) -> Result<(), ActionError> {
        if self.phase != Phase::Waiting && self.phase != Phase::HandOver {
            return Err(ActionError::HandAlreadyInProgress);
        }
        let eligible = self.eligible_for_hand();
        if eligible.len() < 2 {
            return Err(ActionError::NotEnoughPlayersToStart);
        }
        for (_, p) in self.seats.iter_mut().enumerate().filter_map(|(i, s)| s.as_mut().map(|p| (i, p))) {
            p.reset_for_next_hand();
        }

        self.dealer = next_eligible_seat(&eligible, self.dealer);
        self.deck = Deck::new();
        self.community.clear();
        self.high_bet = 0;
        self.last_raise = self.big_blind;
        self.reopens_raise = true;
        self.hand_number += 1;

        let active = self.active_seats_from_dealer();
        let heads_up = active.len() == 2;

        let (sb_seat, bb_seat) = if heads_up {
            (active[0], active[1])
        } else {
            (active[1], active[2])
        };
        self.post_blind(sb_seat, self.small_blind);
        self.post_blind(bb_seat, self.big_blind);
        self.high_bet = self.big_blind;

        for &seat in &active {
            let a = self.deck.draw();
            let b = self.deck.draw();
            self.seats[seat].as_mut().unwrap().deal((a, b));
        }

        for &seat in &active {
            self.seats[seat].as_mut().unwrap().set_has_acted(false);
        }

        self.phase = Phase::PreFlop;
        self.acting = Some(if heads_up {
            active[0]
        } else {
            let bb_index = active.iter().position(|&s| s == bb_seat).unwrap();
            active[(bb_index + 1) % active.len()]
        });
        Ok(())
    }

    fn post_blind(&mut self, seat: usize, amount: Chips) {
        self.seats[seat].as_mut().unwrap().commit(amount);
    }

    pub fn valid_actions(&self, seat: usize) -> Result<Vec<ValidAction>, ActionError> {
        if self.acting != Some(seat) {
            return Err(ActionError::NotActingSeat);
        }
        let player = self.seat(seat).ok_or(ActionError::SeatNotFound)?;
        let to_call = self.high_bet - player.current_bet();
        let mut actions = vec![ValidAction::Fold];
        if to_call == 0 {
            actions.push(ValidAction::Check);
        } else if player.stack() > 0 {
            actions.push(ValidAction::Call {
                amount: to_call.min(player.stack()),
            });
        }
        let may_raise = !player.has_acted() || self.reopens_raise;
        if player.stack() > to_call && may_raise {
            let min_raise_to = self.high_bet + self.last_raise;
            let max_raise_to = player.current_bet() + player.stack();
            if max_raise_to > self.high_bet {
                actions.push(ValidAction::Raise {
                    min: min_raise_to.min(max_raise_to),
                    max: max_raise_to,
                });
            }
        }
        if player.stack() > 0 {
            actions.push(ValidAction::AllIn {
                amount: player.current_bet() + player.stack(),
            });
        }
        Ok(actions)
    }

    pub fn apply_action(&mut self, seat: usize, kind: ActionKind) -> Result<Outcome, ActionError> {
        if self.acting != Some(seat) {
            return Err(ActionError::NotActingSeat);
        }
        if !matches!(
            self.phase,
            Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River
        ) {
            return Err(ActionError::WrongPhaseForAction);
        }

        let to_call = self.high_bet - self.seat(seat).unwrap().current_bet();
        match kind {
            ActionKind::Fold => {
                self.seats[seat].as_mut().unwrap().fold();
            }
            ActionKind::Check => {
                if to_call != 0 {
                    return Err(ActionError::CheckNotAvailable);
                }
                self.seats[seat].as_mut().unwrap().set_has_acted(true);
            }
            ActionKind::Call => {
                let stack = self.seat(seat).unwrap().stack();
                if to_call <= 0 || stack == 0 {
                    return Err(ActionError::CallNotAvailable);
                }
                self.seats[seat].as_mut().unwrap().commit(to_call);
            }
            ActionKind::Raise { to } => self.apply_raise(seat, to)?,
            ActionKind::AllIn => {
                let player = self.seat(seat).unwrap();
                let to = player.current_bet() + player.stack();
                if to <= self.high_bet {
                    // all-in for less than or equal to the current bet: a
                    // call (possibly short) or an effective fold at 0 stack.
                    let stack = player.stack();
                    if stack == 0 {
                        return Err(ActionError::InsufficientChips);
                    }
                    self.seats[seat].as_mut().unwrap().commit(stack);
                } else {
                    self.apply_raise(seat, to)?;
                }
            }
        }

        self.after_action(seat)
    }

    fn apply_raise(&mut self, seat: usize, to: Chips) -> Result<(), ActionError> {
        let player = self.seat(seat).unwrap();
        if player.has_acted() && !self.reopens_raise {
            return Err(ActionError::RaiseBelowMinimum {
                min: self.high_bet + self.last_raise,
            });
        }
        let max_to = player.current_bet() + player.stack();
        if to > max_to {
            return Err(ActionError::RaiseExceedsStack);
        }
        let increment = to - self.high_bet;
        let is_full_raise = increment >= self.last_raise;
        let is_shove = to == max_to;
        if !is_full_raise && !is_shove {
            return Err(ActionError::RaiseBelowMinimum {
                min: self.high_bet + self.last_raise,
            });
        }
        let commit_amount = to - player.current_bet();
        self.seats[seat].as_mut().unwrap().commit(commit_amount);
        if is_full_raise {
            self.last_raise = to - self.high_bet;
            self.high_bet = to;
            self.reopens_raise = true;
            for (other, p) in self
                .seats
                .iter_mut()
                .enumerate()
                .filter_map(|(i, s)| s.as_mut().map(|p| (i, p)))
            {
                if other != seat && p.in_hand() && !p.is_all_in() {
                    p.set_has_acted(false);
                }
            }
        } else {
            // short all-in raise: high bet still moves to the new amount so
            // calls are measured correctly, but last_raise and has-acted are
            // untouched — it does not re-open action for anyone who already
            // had a turn this round.
            self.high_bet = self.high_bet.max(to);
            self.reopens_raise = false;
        }
        Ok(())
    }

    fn next_to_act(&self, from: usize) -> Option<usize> {
        let order = self.active_seats_from_dealer();
        let start = order.iter().position(|&s| s == from)?;
        for step in 1..=order.len() {
            let candidate = order[(start + step) % order.len()];
            if self.seats[candidate].as_ref().is_some_and(|p| p.to_act(self.high_bet)) {
                return Some(candidate);
            }
        }
        None
    }

    fn in_hand_seats(&self) -> Vec<usize> {
        self.seats()
            .filter(|(_, p)| p.in_hand())
            .map(|(i, _)| i)
            .collect()
    }

    fn after_action(&mut self, acted_seat: usize) -> Result<Outcome, ActionError> {
        let remaining = self.in_hand_seats();
        if remaining.len() == 1 {
            let winner = remaining[0];
            return Ok(self.award_uncontested(winner));
        }

        if let Some(next) = self.next_to_act(acted_seat) {
            self.acting = Some(next);
            return Ok(Outcome::Continues { acting: next });
        }

        // round over: everyone who's in the hand and not all-in has acted
        // and matched the high bet.
        self.end_betting_round();
        let can_act = self
            .in_hand_seats()
            .iter()
            .filter(|&&s| !self.seats[s].as_ref().unwrap().is_all_in())
            .count();
        if can_act < 2 && self.community.len() < 5 {
            self.acting = None;
            self.awaiting_run_it_twice = true;
            return Ok(Outcome::AwaitingRunItTwice);
        }
        if self.phase == Phase::River || can_act < 2 {
            return Ok(self.runout_and_showdown());
        }
        self.advance_street();
        let first = self.first_to_act_postflop();
        self.acting = first;
        match first {
            Some(seat) => Ok(Outcome::StreetAdvanced { acting: seat }),
            None => Ok(self.runout_and_showdown()),
        }
    }

    fn end_betting_round(&mut self) {
        for (_, p) in self.seats.iter_mut().enumerate().filter_map(|(i, s)| s.as_mut().map(|p| (i, p))) {
            p.end_round();
        }
        self.high_bet = 0;
        self.last_raise = self.big_blind;
        self.reopens_raise = true;
    }

    fn advance_street(&mut self) {
        self.phase = match self.phase {
            Phase::PreFlop => {
                self.deck.burn();
                for _ in 0..3 {
                    let c = self.deck.draw();
                    self.community.push(c);
                }
                Phase::Flop
            }
            Phase::Flop => {
                self.deck.burn();
                self.community.push(self.deck.draw());
                Phase::Turn
            }
            Phase::Turn => {
                self.deck.burn();
                self.community.push(self.deck.draw());
                Phase::River
            }
            other => other,
        };
    }

    fn first_to_act_postflop(&self) -> Option<usize> {
        let order = self.active_seats_from_dealer();
        order
            .into_iter()
            .find(|&s| self.seats[s].as_ref().is_some_and(|p| p.to_act(self.high_bet)))
    }

    /// Deals out any remaining streets with no further betting and runs the
    /// showdown — used both for the all-in runout path and for a natural
    /// river round-end.
    fn runout_and_showdown(&mut self) -> Outcome {
        while self.phase != Phase::River {
            self.advance_street();
        }
        self.phase = Phase::Showdown;
        self.acting = None;
        let result = self.run_showdown();
        Outcome::HandEnded(result)
    }

    fn award_uncontested(&mut self, winner: usize) -> Outcome {
        let mut contributions: Vec<(usize, Chips, bool)> = self
            .seats()
            .map(|(i, p)| (i, p.contributed(), p.is_folded()))
            .collect();
        let refund = refund_uncalled(&mut contributions);
        let total: Chips = contributions.iter().map(|&(_, c, _)| c).sum();
        if let Some((seat, amount)) = refund {
            self.seats[seat].as_mut().unwrap().credit(amount);
        }
        let pot_for_winner = total - refund.map(|(_, a)| a).unwrap_or(0);
        self.seats[winner].as_mut().unwrap().credit(pot_for_winner);
        self.phase = Phase::HandOver;
        self.acting = None;
        let name = self.seat(winner).unwrap().name().to_string();
        let stacks = self.seats().map(|(_, p)| (p.name().to_string(), p.stack())).collect();
        Outcome::HandEnded(HandResult {
            winners: vec![name],
            pot: pot_for_winner,
            hand_results: Vec::new(),
            player_stacks: stacks,
        })
    }

    /// Builds one seat's showdown `Settlement` and, if they're still in the
    /// hand, a hand-strength description, against a given board. Shared by
    /// a normal single-board showdown and each board of a run-it-twice.
    fn settlement_for(&self, seat: usize, risked: Chips, folded: bool, community: &[Card]) -> (Settlement, Option<(String, String)>) {
        let status = if folded {
            State::Folding
        } else if self.seat(seat).unwrap().is_all_in() {
            State::Shoving
        } else {
            State::Betting
        };
        let strength = if folded {
            pokerd_cards::Strength::default()
        } else {
            let (h1, h2) = self.seat(seat).unwrap().hole().expect("showdown seat must have cards");
            let mut seven: Vec<Card> = community.to_vec();
            seven.push(h1);
            seven.push(h2);
            pokerd_cards::evaluate(seven.into_iter().collect())
        };
        let description = (!folded).then(|| (self.seat(seat).unwrap().name().to_string(), strength.describe()));
        (Settlement::new(seat, risked, status, strength), description)
    }

    /// The refund-adjusted (seat, contributed, folded) triples every
    /// showdown path settles from. Crediting the lone uncalled excess back
    /// to its payer is board-independent, so it happens once regardless of
    /// whether the hand is later run once or twice.
    fn showdown_contributions(&mut self) -> Vec<(usize, Chips, bool)> {
        let mut contributions: Vec<(usize, Chips, bool)> = self
            .seats_left_of_dealer()
            .into_iter()
            .map(|i| {
                let p = self.seat(i).unwrap();
                (i, p.contributed(), p.is_folded())
            })
            .collect();
        if let Some((seat, amount)) = refund_uncalled(&mut contributions) {
            self.seats[seat].as_mut().unwrap().credit(amount);
        }
        let (_pots, extra_refunds): (Vec<Pot>, _) = pots_from_contributions(&contributions);
        for &(seat, amount) in &extra_refunds {
            self.seats[seat].as_mut().unwrap().credit(amount);
        }
        contributions
    }

    fn run_showdown(&mut self) -> HandResult {
        let contributions = self.showdown_contributions();
        let community = self.community.clone();
        let mut settlements = Vec::new();
        let mut descriptions = Vec::new();
        for &(seat, risked, folded) in &contributions {
            let (settlement, description) = self.settlement_for(seat, risked, folded, &community);
            descriptions.extend(description);
            settlements.push(settlement);
        }

        let settled = Showdown::new(settlements).settle();
        let mut winners = Vec::new();
        for s in &settled {
            if s.reward() > 0 {
                self.seats[s.seat()].as_mut().unwrap().credit(s.reward());
                winners.push(self.seat(s.seat()).unwrap().name().to_string());
            }
        }

        self.phase = Phase::HandOver;
        self.acting = None;
        let total_pot: Chips = contributions.iter().map(|&(_, c, _)| c).sum();
        let stacks = self.seats().map(|(_, p)| (p.name().to_string(), p.stack())).collect();
        HandResult {
            winners,
            pot: total_pot,
            hand_results: descriptions,
            player_stacks: stacks,
        }
    }

    /// Seats still contesting the pot, eligible to weigh in on a
    /// run-it-twice decision. Only meaningful right after `apply_action`
    /// returns `Outcome::AwaitingRunItTwice`.
    pub fn run_it_twice_eligible_seats(&self) -> Vec<usize> {
        self.in_hand_seats()
    }

    pub fn is_awaiting_run_it_twice(&self) -> bool {
        self.awaiting_run_it_twice
    }

    /// Resolves a paused all-in runout. Declining deals the single
    /// remaining board as usual. Accepting deals two independent boards
    /// from the same undealt cards (the pool is reshuffled between the
    /// two deals) and splits each seat's stake evenly across them, the
    /// extra chip from an odd split going to the first board.
    pub fn decide_run_it_twice(&mut self, run_it_twice: bool) -> HandResult {
        self.awaiting_run_it_twice = false;
        if !run_it_twice {
            match self.runout_and_showdown() {
                Outcome::HandEnded(result) => return result,
                _ => unreachable!("runout_and_showdown always ends the hand"),
            }
        }

        let contributions = self.showdown_contributions();

        let snapshot_deck = self.deck.clone();
        let snapshot_community = self.community.clone();
        let snapshot_phase = self.phase;

        while self.phase != Phase::River {
            self.advance_street();
        }
        let board_a = self.community.clone();

        self.phase = snapshot_phase;
        self.community = snapshot_community;
        self.deck = snapshot_deck;
        self.deck.shuffle_remaining();
        while self.phase != Phase::River {
            self.advance_street();
        }
        let board_b = self.community.clone();

        let mut rewards: HashMap<usize, Chips> = HashMap::new();
        let mut descriptions: HashMap<usize, (String, String)> = HashMap::new();
        for (board, give_remainder) in [(&board_a, true), (&board_b, false)] {
            let mut settlements = Vec::new();
            for &(seat, risked, folded) in &contributions {
                let half = risked / 2;
                let share = if give_remainder { risked - half } else { half };
                let (settlement, description) = self.settlement_for(seat, share, folded, board);
                if let Some(d) = description {
                    descriptions.entry(seat).or_insert(d);
                }
                settlements.push(settlement);
            }
            for s in Showdown::new(settlements).settle() {
                if s.reward() > 0 {
                    *rewards.entry(s.seat()).or_insert(0) += s.reward();
                }
            }
        }

        let mut winners = Vec::new();
        for (&seat, &reward) in &rewards {
            self.seats[seat].as_mut().unwrap().credit(reward);
            winners.push(self.seat(seat).unwrap().name().to_string());
        }

        self.phase = Phase::HandOver;
        self.acting = None;
        let total_pot: Chips = contributions.iter().map(|&(_, c, _)| c).sum();
        let stacks = self.seats().map(|(_, p)| (p.name().to_string(), p.stack())).collect();
        HandResult {
            winners,
            pot: total_pot,
            hand_results: contributions
                .iter()
                .filter_map(|&(seat, _, _)| descriptions.remove(&seat))
                .collect(),
            player_stacks: stacks,
        }
    }

    /// Removes busted players (stack = 0) and anyone who asked to leave
    /// mid-hand, and returns the table to `Waiting` if fewer than two
    /// eligible players remain, otherwise leaves it ready for `start_hand`.
    pub fn conclude_hand(&mut self) {
        for seat in std::mem::take(&mut self.pending_leave) {
            self.seats[seat] = None;
        }
        for i in 0..SEATS {
            if self.seats[i].as_ref().is_some_and(|p| p.stack() == 0) {
                self.seats[i] = None;
            }
        }
        self.phase = Phase::Waiting;
    }

    pub fn community_len(&self) -> usize {
        self.community.len()
    }

    /// Cheap sanity check run by the room after every mutation: no seat
    /// holds a negative stack, the pot isn't negative, and the acting seat
    /// (if any) is actually still in the hand. A failure here means a logic
    /// bug in `apply_action`'s bookkeeping, not a user error.
    pub fn check_invariants(&self) -> bool {
        if self.pot() < 0 {
            return false;
        }
        if let Some(acting) = self.acting {
            match self.seat(acting) {
                Some(p) if p.in_hand() => {}
                _ => return false,
            }
        }
        self.seats.iter().flatten().all(|p| p.stack() >= 0)
    }
}

/// Next seat after `current_dealer`, wrapping around the table. `eligible`
/// is ascending, so the first entry past the dealer is the next button;
/// falling off the end wraps back to the smallest.
fn next_eligible_seat(eligible: &[usize], current_dealer: usize) -> usize {
    eligible
        .iter()
        .copied()
        .find(|&s| s > current_dealer)
        .unwrap_or(eligible[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(stacks: &[Chips], sb: Chips, bb: Chips) -> Table {
        let mut t = Table::new(sb, bb, 0, 100_000);
        for (i, &s) in stacks.iter().enumerate() {
            t.join(i, &format!("p{i}"), s).unwrap();
        }
        t
    }

    #[test]
    fn heads_up_blinds_and_bb_option() {
        let mut t = table_with(&[100, 100], 1, 2);
        t.start_hand().unwrap();
        assert_eq!(t.phase(), Phase::PreFlop);
        // dealer (seat with lower index after rotation) acts first heads-up.
        let acting = t.acting().unwrap();
        assert_eq!(t.seat(acting).unwrap().current_bet(), t.small_blind());
        t.apply_action(acting, ActionKind::Call).unwrap();
        let bb_seat = t.acting().unwrap();
        let outcome = t.apply_action(bb_seat, ActionKind::Check).unwrap();
        match outcome {
            Outcome::StreetAdvanced { .. } => {}
            other => panic!("expected street to advance, got {other:?}"),
        }
        assert_eq!(t.phase(), Phase::Flop);
        assert_eq!(t.pot(), 4);
    }

    #[test]
    fn min_raise_tracking() {
        let mut t = table_with(&[1000, 1000, 1000], 5, 10);
        t.start_hand().unwrap();
        let p1 = t.acting().unwrap();
        t.apply_action(p1, ActionKind::Raise { to: 30 }).unwrap();
        assert_eq!(t.last_raise(), 20);
        let p2 = t.acting().unwrap();
        let err = t.apply_action(p2, ActionKind::Raise { to: 45 }).unwrap_err();
        assert_eq!(err, ActionError::RaiseBelowMinimum { min: 50 });
        t.apply_action(p2, ActionKind::Raise { to: 55 }).unwrap();
        assert_eq!(t.last_raise(), 25);
    }

    #[test]
    fn short_all_in_does_not_reopen_action() {
        let mut t = table_with(&[1000, 1000, 40], 5, 10);
        t.start_hand().unwrap();
        let p1 = t.acting().unwrap();
        t.apply_action(p1, ActionKind::Raise { to: 30 }).unwrap();
        let p2 = t.acting().unwrap();
        t.apply_action(p2, ActionKind::Call).unwrap();
        let p3 = t.acting().unwrap();
        t.apply_action(p3, ActionKind::AllIn).unwrap();
        assert_eq!(t.last_raise(), 20); // unchanged: short all-in didn't reopen.
        let back_to_p1 = t.acting().unwrap();
        assert_eq!(back_to_p1, p1);
        let actions = t.valid_actions(p1).unwrap();
        assert!(!actions.iter().any(|a| matches!(a, ValidAction::Raise { .. })));
    }

    #[test]
    fn check_invariants_holds_through_a_hand() {
        let mut t = table_with(&[1000, 1000, 1000], 5, 10);
        assert!(t.check_invariants());
        t.start_hand().unwrap();
        assert!(t.check_invariants());
        let p1 = t.acting().unwrap();
        t.apply_action(p1, ActionKind::Call).unwrap();
        assert!(t.check_invariants());
        let p2 = t.acting().unwrap();
        t.apply_action(p2, ActionKind::Raise { to: 30 }).unwrap();
        assert!(t.check_invariants());
    }

    #[test]
    fn check_invariants_rejects_an_acting_seat_that_already_folded() {
        let mut t = table_with(&[1000, 1000], 5, 10);
        t.start_hand().unwrap();
        let acting = t.acting().unwrap();
        t.seats[acting].as_mut().unwrap().fold();
        assert!(!t.check_invariants());
    }

    #[test]
    fn leftover_chip_goes_to_seat_left_of_dealer_on_a_tie() {
        use pokerd_cards::{Rank, Suit};
        let mut t = table_with(&[1000, 1000, 1000], 1, 2);
        t.start_hand().unwrap();
        assert_eq!(t.dealer(), 1);
        // Seats 0 and 2 tie with a pair of queens (ace/king/four kickers);
        // seat 1 is the dealer and folds, leaving its contribution in the
        // pot the tied pair splits. Seat 2 sits immediately left of the
        // dealer, seat 0 next, so seat 2 must take the odd chip.
        t.seats[2].as_mut().unwrap().deal((Card::new(Rank::Ace, Suit::C), Card::new(Rank::Two, Suit::D)));
        t.seats[0].as_mut().unwrap().deal((Card::new(Rank::Ace, Suit::H), Card::new(Rank::Two, Suit::S)));
        t.seats[1].as_mut().unwrap().deal((Card::new(Rank::King, Suit::D), Card::new(Rank::King, Suit::H)));
        t.community = vec![
            Card::new(Rank::King, Suit::S),
            Card::new(Rank::Queen, Suit::C),
            Card::new(Rank::Queen, Suit::H),
            Card::new(Rank::Four, Suit::C),
            Card::new(Rank::Three, Suit::D),
        ];
        t.seats[2].as_mut().unwrap().commit(34);
        t.seats[0].as_mut().unwrap().commit(34);
        t.seats[1].as_mut().unwrap().commit(33);
        t.seats[1].as_mut().unwrap().fold();

        let result = t.run_showdown();
        assert_eq!(result.pot, 101);
        assert_eq!(t.seat(2).unwrap().stack(), 1000 - 34 + 51);
        assert_eq!(t.seat(0).unwrap().stack(), 1000 - 34 + 50);
        assert_eq!(t.seat(1).unwrap().stack(), 1000 - 33);
    }

    #[test]
    fn all_in_preflop_pauses_for_run_it_twice_decision() {
        let mut t = table_with(&[100, 100], 1, 2);
        t.start_hand().unwrap();
        let a = t.acting().unwrap();
        t.apply_action(a, ActionKind::AllIn).unwrap();
        let b = t.acting().unwrap();
        let outcome = t.apply_action(b, ActionKind::AllIn).unwrap();
        assert!(matches!(outcome, Outcome::AwaitingRunItTwice));
        assert!(t.is_awaiting_run_it_twice());
        assert_eq!(t.run_it_twice_eligible_seats().len(), 2);

        let total_before: Chips = t.seats().map(|(_, p)| p.stack()).sum();
        let result = t.decide_run_it_twice(true);
        assert_eq!(t.phase(), Phase::HandOver);
        assert_eq!(t.community().len(), 5);
        let total_after: Chips = result.player_stacks.values().sum();
        assert_eq!(total_before + result.pot, total_after);
    }

    #[test]
    fn wheel_straight_beats_trips_at_showdown() {
        use pokerd_cards::{Rank, Suit};
        let mut t = table_with(&[100, 100], 1, 2);
        t.start_hand().unwrap();
        let a = t.acting().unwrap();
        let b = t.next_to_act(a).unwrap();
        t.seats[a].as_mut().unwrap().deal((Card::new(Rank::Ace, Suit::C), Card::new(Rank::Two, Suit::D)));
        t.seats[b].as_mut().unwrap().deal((Card::new(Rank::King, Suit::S), Card::new(Rank::King, Suit::H)));
        t.community = vec![
            Card::new(Rank::Three, Suit::S),
            Card::new(Rank::Four, Suit::H),
            Card::new(Rank::Five, Suit::C),
            Card::new(Rank::King, Suit::D),
            Card::new(Rank::Queen, Suit::H),
        ];
        let a_name = t.seat(a).unwrap().name().to_string();
        let result = t.run_showdown();
        assert_eq!(result.winners, vec![a_name]);
        assert_eq!(t.phase(), Phase::HandOver);
    }
}
