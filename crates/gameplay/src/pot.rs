use pokerd_cards::Strength;
use pokerd_core::Chips;

/// A player's standing at the moment a hand reaches its conclusion: whether
/// they're still contesting the pot with chips behind them, already
/// all-in, or out on a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum State {
    Betting,
    Shoving,
    Folding,
}

/// One seat's stake and, once settled, its award.
#[derive(Debug, Clone)]
pub struct Settlement {
    seat: usize,
    risked: Chips,
    reward: Chips,
    status: State,
    strength: Strength,
}

impl Settlement {
    pub fn new(seat: usize, risked: Chips, status: State, strength: Strength) -> Self {
        Self {
            seat,
            risked,
            reward: 0,
            status,
            strength,
        }
    }
    pub fn seat(&self) -> usize {
        self.seat
    }
    pub fn risked(&self) -> Chips {
        self.risked
    }
    pub fn reward(&self) -> Chips {
        self.reward
    }
    pub fn status(&self) -> State {
        self.status
    }
    pub fn strength(&self) -> &Strength {
        &self.strength
    }
    fn add(&mut self, chips: Chips) {
        self.reward += chips;
    }
}

/// Distributes chips among settlements by strength tier, strongest hand
/// first. Within a tier, the pot available is bounded by the smallest
/// `risked` amount among untouched payouts at that strength — exactly the
/// side-pot boundary a contribution-level sweep would compute, reached here
/// by walking strength instead of contribution amount.
pub struct Showdown {
    payouts: Vec<Settlement>,
    distributing: Chips,
    distributed: Chips,
    best: Strength,
}

impl Showdown {
    pub fn new(payouts: Vec<Settlement>) -> Self {
        Self {
            payouts,
            distributing: 0,
            distributed: 0,
            best: Strength::from((pokerd_cards::Ranking::Max, pokerd_cards::Kickers::default())),
        }
    }

    pub fn settle(mut self) -> Vec<Settlement> {
        'winners: while let Some(strength) = self.strongest() {
            self.best = strength;
            'pots: while let Some(amount) = self.remaining() {
                self.distributing = amount;
                self.distribute();
                if self.is_complete() {
                    break 'winners;
                }
                continue 'pots;
            }
        }
        self.payouts
    }

    fn strongest(&self) -> Option<Strength> {
        self.payouts
            .iter()
            .filter(|p| p.strength() < &self.best)
            .filter(|p| p.status() != State::Folding)
            .map(|p| p.strength())
            .max()
            .cloned()
    }

    fn remaining(&mut self) -> Option<Chips> {
        self.distributed = self.distributing;
        self.payouts
            .iter()
            .filter(|p| p.strength() == &self.best)
            .filter(|p| p.risked() > self.distributed)
            .filter(|p| p.status() != State::Folding)
            .map(|p| p.risked())
            .min()
    }

    fn winnings(&self) -> Chips {
        self.payouts
            .iter()
            .map(|p| p.risked())
            .map(|s| s.min(self.distributing))
            .map(|s| (s - self.distributed).max(0))
            .sum()
    }

    fn distribute(&mut self) {
        let chips = self.winnings();
        let mut winners: Vec<&mut Settlement> = self
            .payouts
            .iter_mut()
            .filter(|p| p.status() != State::Folding)
            .filter(|p| p.strength() == &self.best)
            .filter(|p| p.risked() > self.distributed)
            .collect();
        let n = winners.len() as Chips;
        let share = chips / n;
        let bonus = chips % n;
        for winner in winners.iter_mut() {
            winner.add(share);
        }
        for winner in winners.iter_mut().take(bonus as usize) {
            winner.add(1);
        }
    }

    fn is_complete(&self) -> bool {
        let staked: Chips = self.payouts.iter().map(|p| p.risked()).sum();
        let reward: Chips = self.payouts.iter().map(|p| p.reward()).sum();
        staked == reward
    }
}

/// An explicit pot tier: an amount and the seats still eligible to win it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<usize>,
}

/// Caps the largest contributor's stake down to the second-highest stake
/// among the rest, returning the refunded seat and amount if a refund
/// applies. Only fires when exactly one seat reached the maximum
/// contribution — a tie at the max means everyone there was fully called.
pub fn refund_uncalled(contributions: &mut [(usize, Chips, bool)]) -> Option<(usize, Chips)> {
    let max = contributions.iter().map(|&(_, c, _)| c).max()?;
    let at_max: Vec<usize> = contributions
        .iter()
        .filter(|&&(_, c, _)| c == max)
        .map(|&(seat, _, _)| seat)
        .collect();
    if at_max.len() != 1 {
        return None;
    }
    let second = contributions
        .iter()
        .filter(|&&(_, c, _)| c < max)
        .map(|&(_, c, _)| c)
        .max()
        .unwrap_or(0);
    if second >= max {
        return None;
    }
    let excess = max - second;
    let seat = at_max[0];
    for entry in contributions.iter_mut() {
        if entry.0 == seat {
            entry.1 -= excess;
        }
    }
    Some((seat, excess))
}

/// Builds the explicit pot-tier list from each seat's (already
/// refund-adjusted) total contribution and folded flag, per the
/// distinct-contribution-level sweep. Tiers with no eligible (non-folded)
/// payer are merged forward into the next tier that has one; a trailing
/// empty tier with no later tier to absorb it refunds its amount to its
/// sole payer.
pub fn pots_from_contributions(contributions: &[(usize, Chips, bool)]) -> (Vec<Pot>, Vec<(usize, Chips)>) {
    let mut levels: Vec<Chips> = contributions
        .iter()
        .map(|&(_, c, _)| c)
        .filter(|&c| c > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    struct Tier {
        amount: Chips,
        eligible: Vec<usize>,
        payers: Vec<usize>,
    }

    let mut tiers = Vec::new();
    let mut prev = 0;
    for level in levels {
        let payers: Vec<usize> = contributions
            .iter()
            .filter(|&&(_, c, _)| c >= level)
            .map(|&(seat, _, _)| seat)
            .collect();
        let eligible: Vec<usize> = contributions
            .iter()
            .filter(|&&(_, c, folded)| c >= level && !folded)
            .map(|&(seat, _, _)| seat)
            .collect();
        let amount = (level - prev) * payers.len() as Chips;
        tiers.push(Tier {
            amount,
            eligible,
            payers,
        });
        prev = level;
    }

    let mut extra_refunds = Vec::new();
    for i in 0..tiers.len() {
        if !tiers[i].eligible.is_empty() {
            continue;
        }
        let amount = tiers[i].amount;
        tiers[i].amount = 0;
        if let Some(j) = (i + 1..tiers.len()).find(|&j| !tiers[j].eligible.is_empty()) {
            tiers[j].amount += amount;
        } else if let [seat] = tiers[i].payers[..] {
            extra_refunds.push((seat, amount));
        } else {
            // No single identifiable recipient and no later pot to absorb it;
            // split evenly among the tier's payers as a last resort.
            let share = amount / tiers[i].payers.len().max(1) as Chips;
            for &seat in &tiers[i].payers {
                extra_refunds.push((seat, share));
            }
        }
    }

    let pots = tiers
        .into_iter()
        .filter(|t| t.amount > 0)
        .map(|t| Pot {
            amount: t.amount,
            eligible: t.eligible,
        })
        .collect();
    (pots, extra_refunds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokerd_cards::{Kickers, Rank, Ranking};

    fn ace_high() -> Strength {
        Strength::from((Ranking::HighCard(Rank::Ace), Kickers::default()))
    }
    fn one_pair() -> Strength {
        Strength::from((Ranking::OnePair(Rank::Ace), Kickers::default()))
    }
    fn two_pair() -> Strength {
        Strength::from((Ranking::TwoPair(Rank::Ace, Rank::King), Kickers::default()))
    }
    fn triplets() -> Strength {
        Strength::from((Ranking::ThreeOAK(Rank::Ace), Kickers::default()))
    }
    fn the_nuts() -> Strength {
        Strength::from((Ranking::Straight(Rank::Ace), Kickers::default()))
    }

    #[test]
    fn heads_up_showdown() {
        let settlement = Showdown::new(vec![
            Settlement::new(0, 100, State::Betting, ace_high()),
            Settlement::new(1, 100, State::Betting, one_pair()),
        ])
        .settle();
        assert_eq!(settlement[0].reward(), 0);
        assert_eq!(settlement[1].reward(), 200);
    }

    #[test]
    fn side_pot_scenario_matches_spec_example_four() {
        // Stacks 50/100/200, all in pre-flop; P3 has the worst hand.
        let mut contributions = vec![(0, 50, false), (1, 100, false), (2, 200, false)];
        let refund = refund_uncalled(&mut contributions);
        assert_eq!(refund, Some((2, 100)));
        let (pots, extra) = pots_from_contributions(&contributions);
        assert!(extra.is_empty());
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 150);
        assert_eq!(pots[0].eligible.len(), 3);
        assert_eq!(pots[1].amount, 100);
        assert_eq!(pots[1].eligible, vec![1, 2]);
    }

    #[test]
    fn multiway_all_in_with_side_pot() {
        let settlement = Showdown::new(vec![
            Settlement::new(0, 50, State::Shoving, the_nuts()),
            Settlement::new(1, 100, State::Shoving, triplets()),
            Settlement::new(2, 150, State::Betting, one_pair()),
            Settlement::new(3, 150, State::Betting, ace_high()),
        ])
        .settle();
        assert_eq!(settlement[0].reward(), 200);
        assert_eq!(settlement[1].reward(), 150);
        assert_eq!(settlement[2].reward(), 100);
        assert_eq!(settlement[3].reward(), 0);
    }

    #[test]
    fn winners_folded_still_pay_nothing() {
        let settlement = Showdown::new(vec![
            Settlement::new(0, 50, State::Folding, the_nuts()),
            Settlement::new(1, 100, State::Betting, two_pair()),
            Settlement::new(2, 75, State::Folding, the_nuts()),
            Settlement::new(3, 100, State::Betting, one_pair()),
        ])
        .settle();
        assert_eq!(settlement[0].reward(), 0);
        assert_eq!(settlement[1].reward(), 325);
        assert_eq!(settlement[2].reward(), 0);
        assert_eq!(settlement[3].reward(), 0);
    }

    #[test]
    fn tie_split_with_leftover_chip() {
        let settlement = Showdown::new(vec![
            Settlement::new(0, 50, State::Betting, two_pair()),
            Settlement::new(1, 51, State::Betting, two_pair()),
        ])
        .settle();
        let total: Chips = settlement.iter().map(|s| s.reward()).sum();
        assert_eq!(total, 101);
        assert!(settlement.iter().all(|s| s.reward() == 50 || s.reward() == 51));
    }

    #[test]
    fn uncalled_refund_only_fires_for_a_lone_top_contributor() {
        let mut tied = vec![(0, 100, false), (1, 100, false)];
        assert_eq!(refund_uncalled(&mut tied), None);
    }
}
