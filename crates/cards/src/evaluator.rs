use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::strength::Strength;
use super::suit::Suit;

/// Evaluates an arbitrary 5-to-7 card hand into its best 5-card
/// [`Strength`], using rank/suit bitmasks rather than literally enumerating
/// five-card subsets: each category is tested directly against the
/// popcounts and bit patterns of four 13-bit suit masks, from strongest
/// category to weakest, short-circuiting as soon as one matches. For any
/// input multiset this returns the same value that exhaustively scoring all
/// `C(n, 5)` subsets and taking the maximum would.
pub fn evaluate(hand: Hand) -> Strength {
    let cards = hand.cards();
    debug_assert!(cards.len() >= 5, "evaluator needs at least 5 cards");

    let mut suit_masks = [0u16; 4];
    let mut counts = [0u8; 13];
    for card in &cards {
        let suit = u8::from(card.suit()) as usize;
        let rank = u8::from(card.rank());
        suit_masks[suit] |= 1 << rank;
        counts[rank as usize] += 1;
    }
    let rank_mask: u16 = suit_masks.iter().fold(0, |acc, m| acc | m);

    if let Some(flush_suit) = suit_masks.iter().position(|m| m.count_ones() >= 5) {
        if let Some(top) = straight_top(suit_masks[flush_suit]) {
            return Strength::from((Ranking::StraightFlush(top), Kickers::default()));
        }
    }

    if let Some(quad) = rank_with_count(&counts, 4, None) {
        let kicker = ranks_excluding(&counts, &[quad]).into_iter().next();
        return Strength::from((
            Ranking::FourOAK(quad),
            Kickers::from(kicker.into_iter().collect()),
        ));
    }

    let trips = ranks_with_count_at_least(&counts, 3);
    if let Some(&best_trip) = trips.first() {
        let pair_candidates: Vec<Rank> = ranks_with_count_at_least(&counts, 2)
            .into_iter()
            .filter(|&r| r != best_trip)
            .collect();
        if let Some(&best_pair) = pair_candidates.first() {
            return Strength::from((Ranking::FullHouse(best_trip, best_pair), Kickers::default()));
        }
    }

    if let Some(flush_suit) = suit_masks.iter().position(|m| m.count_ones() >= 5) {
        let ranks = top_ranks_from_mask(suit_masks[flush_suit], 5);
        let top = ranks[0];
        return Strength::from((Ranking::Flush(top), Kickers::from(ranks[1..].to_vec())));
    }

    if let Some(top) = straight_top(rank_mask) {
        return Strength::from((Ranking::Straight(top), Kickers::default()));
    }

    if let Some(&trip) = trips.first() {
        let kickers = ranks_excluding(&counts, &[trip]).into_iter().take(2).collect();
        return Strength::from((Ranking::ThreeOAK(trip), Kickers::from(kickers)));
    }

    let pairs = ranks_with_count_at_least(&counts, 2);
    if pairs.len() >= 2 {
        let hi = pairs[0];
        let lo = pairs[1];
        let kicker = ranks_excluding(&counts, &[hi, lo]).into_iter().next();
        return Strength::from((
            Ranking::TwoPair(hi, lo),
            Kickers::from(kicker.into_iter().collect()),
        ));
    }
    if let Some(&pair) = pairs.first() {
        let kickers = ranks_excluding(&counts, &[pair]).into_iter().take(3).collect();
        return Strength::from((Ranking::OnePair(pair), Kickers::from(kickers)));
    }

    let top5 = top_ranks_from_mask(rank_mask, 5);
    Strength::from((Ranking::HighCard(top5[0]), Kickers::from(top5[1..].to_vec())))
}

/// Highest rank completing a 5-consecutive-rank run within `mask`, or the
/// wheel (A-2-3-4-5, which ranks below 6-high) if no higher straight exists.
fn straight_top(mask: u16) -> Option<Rank> {
    for top in (4..=12u8).rev() {
        let window: u16 = (0..5).map(|i| 1u16 << (top - i)) .fold(0, |acc, b| acc | b);
        if mask & window == window {
            return Some(Rank::from(top));
        }
    }
    const WHEEL: u16 = (1 << 0) | (1 << 1) | (1 << 2) | (1 << 3) | (1 << 12);
    if mask & WHEEL == WHEEL {
        return Some(Rank::Five);
    }
    None
}

fn rank_with_count(counts: &[u8; 13], exact: u8, exclude: Option<Rank>) -> Option<Rank> {
    (0..13u8)
        .rev()
        .map(Rank::from)
        .find(|&r| counts[u8::from(r) as usize] == exact && Some(r) != exclude)
}

fn ranks_with_count_at_least(counts: &[u8; 13], min: u8) -> Vec<Rank> {
    (0..13u8)
        .rev()
        .map(Rank::from)
        .filter(|&r| counts[u8::from(r) as usize] >= min)
        .collect()
}

fn ranks_excluding(counts: &[u8; 13], exclude: &[Rank]) -> Vec<Rank> {
    (0..13u8)
        .rev()
        .map(Rank::from)
        .filter(|r| counts[u8::from(*r) as usize] > 0 && !exclude.contains(r))
        .collect()
}

fn top_ranks_from_mask(mask: u16, n: usize) -> Vec<Rank> {
    (0..13u8)
        .rev()
        .map(Rank::from)
        .filter(|r| mask & (1 << u8::from(*r)) != 0)
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn hand(cards: &[(Rank, Suit)]) -> Hand {
        cards.iter().map(|&(r, s)| Card::new(r, s)).collect()
    }

    #[test]
    fn royal_flush_beats_everything() {
        let h = hand(&[
            (Rank::Ten, Suit::S),
            (Rank::Jack, Suit::S),
            (Rank::Queen, Suit::S),
            (Rank::King, Suit::S),
            (Rank::Ace, Suit::S),
            (Rank::Two, Suit::C),
            (Rank::Three, Suit::D),
        ]);
        let s = evaluate(h);
        assert_eq!(*s.ranking(), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn wheel_straight_loses_to_six_high() {
        let wheel = hand(&[
            (Rank::Ace, Suit::C),
            (Rank::Two, Suit::D),
            (Rank::Three, Suit::S),
            (Rank::Four, Suit::H),
            (Rank::Five, Suit::C),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::H),
        ]);
        let six_high = hand(&[
            (Rank::Two, Suit::C),
            (Rank::Three, Suit::D),
            (Rank::Four, Suit::S),
            (Rank::Five, Suit::H),
            (Rank::Six, Suit::C),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::H),
        ]);
        let wheel_strength = evaluate(wheel);
        let six_high_strength = evaluate(six_high);
        assert_eq!(*wheel_strength.ranking(), Ranking::Straight(Rank::Five));
        assert!(wheel_strength < six_high_strength);
    }

    #[test]
    fn four_of_a_kind_beats_full_house() {
        let quads = hand(&[
            (Rank::Nine, Suit::C),
            (Rank::Nine, Suit::D),
            (Rank::Nine, Suit::H),
            (Rank::Nine, Suit::S),
            (Rank::Two, Suit::C),
            (Rank::Three, Suit::D),
            (Rank::Four, Suit::S),
        ]);
        let full_house = hand(&[
            (Rank::King, Suit::C),
            (Rank::King, Suit::D),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::S),
            (Rank::Queen, Suit::C),
            (Rank::Two, Suit::D),
            (Rank::Three, Suit::S),
        ]);
        assert!(evaluate(quads) > evaluate(full_house));
    }

    #[test]
    fn full_house_picks_the_best_pair_among_two_trips() {
        // Three nines and three fours present: full house is nines full of fours.
        let h = hand(&[
            (Rank::Nine, Suit::C),
            (Rank::Nine, Suit::D),
            (Rank::Nine, Suit::H),
            (Rank::Four, Suit::C),
            (Rank::Four, Suit::D),
            (Rank::Four, Suit::H),
            (Rank::Two, Suit::S),
        ]);
        let s = evaluate(h);
        assert_eq!(*s.ranking(), Ranking::FullHouse(Rank::Nine, Rank::Four));
    }

    #[test]
    fn determinism_for_identical_multiset() {
        let h = hand(&[
            (Rank::Ace, Suit::C),
            (Rank::King, Suit::C),
            (Rank::Two, Suit::D),
            (Rank::Seven, Suit::H),
            (Rank::Nine, Suit::S),
        ]);
        assert_eq!(evaluate(h), evaluate(h));
    }

    #[test]
    fn category_ordering_is_total() {
        assert!(Ranking::HighCard(Rank::Ace) < Ranking::OnePair(Rank::Two));
        assert!(Ranking::OnePair(Rank::Ace) < Ranking::TwoPair(Rank::Two, Rank::Three));
        assert!(Ranking::ThreeOAK(Rank::Ace) < Ranking::Straight(Rank::Two));
        assert!(Ranking::FullHouse(Rank::Two, Rank::Three) < Ranking::FourOAK(Rank::Two));
    }
}
