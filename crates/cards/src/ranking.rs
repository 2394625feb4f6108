use super::rank::Rank;
use std::fmt;

/// A hand category together with the ranks that distinguish it from other
/// hands of the same category. Declaration order is comparison order: a
/// `Flush` always outranks a `Straight` regardless of the ranks inside them,
/// because the derived `Ord` compares the discriminant before the fields.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Ranking {
    HighCard(Rank),
    OnePair(Rank),
    TwoPair(Rank, Rank),
    ThreeOAK(Rank),
    Straight(Rank),
    Flush(Rank),
    FullHouse(Rank, Rank),
    FourOAK(Rank),
    StraightFlush(Rank),
    /// Sentinel strictly greater than any reachable hand. Used as the
    /// initial "nothing beaten yet" threshold when iterating settlements by
    /// strength tier.
    Max,
}

impl Ranking {
    /// How many additional kicker ranks this category carries, beyond the
    /// ranks embedded in the variant itself, for a full 5-card hand.
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::TwoPair(..) => 1,
            Ranking::ThreeOAK(_) => 2,
            Ranking::Straight(_) => 0,
            Ranking::Flush(_) => 4,
            Ranking::FullHouse(..) => 0,
            Ranking::FourOAK(_) => 1,
            Ranking::StraightFlush(_) => 0,
            Ranking::Max => 0,
        }
    }

    /// Human-readable description for the `hand_ended` envelope, e.g.
    /// "Full House, Kings full of Threes".
    pub fn describe(&self) -> String {
        match self {
            Ranking::HighCard(r) => format!("High Card, {r} high", r = rank_name(*r)),
            Ranking::OnePair(r) => format!("Pair of {}", plural(*r)),
            Ranking::TwoPair(hi, lo) => format!("Two Pair, {} and {}", plural(*hi), plural(*lo)),
            Ranking::ThreeOAK(r) => format!("Three of a Kind, {}", plural(*r)),
            Ranking::Straight(r) => format!("Straight, {} high", rank_name(*r)),
            Ranking::Flush(r) => format!("Flush, {} high", rank_name(*r)),
            Ranking::FullHouse(hi, lo) => format!("Full House, {} full of {}", plural(*hi), plural(*lo)),
            Ranking::FourOAK(r) => format!("Four of a Kind, {}", plural(*r)),
            Ranking::StraightFlush(r) if *r == Rank::Ace => "Royal Flush".to_string(),
            Ranking::StraightFlush(r) => format!("Straight Flush, {} high", rank_name(*r)),
            Ranking::Max => "unreachable".to_string(),
        }
    }
}

fn rank_name(r: Rank) -> &'static str {
    match r {
        Rank::Two => "Two",
        Rank::Three => "Three",
        Rank::Four => "Four",
        Rank::Five => "Five",
        Rank::Six => "Six",
        Rank::Seven => "Seven",
        Rank::Eight => "Eight",
        Rank::Nine => "Nine",
        Rank::Ten => "Ten",
        Rank::Jack => "Jack",
        Rank::Queen => "Queen",
        Rank::King => "King",
        Rank::Ace => "Ace",
    }
}

fn plural(r: Rank) -> String {
    format!("{}s", rank_name(r))
}

impl Default for Ranking {
    fn default() -> Self {
        Ranking::HighCard(Rank::Two)
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_order_correctly() {
        assert!(Ranking::Straight(Rank::Ace) < Ranking::Flush(Rank::Two));
        assert!(Ranking::Flush(Rank::Two) < Ranking::FullHouse(Rank::Two, Rank::Three));
        assert!(Ranking::FourOAK(Rank::Two) < Ranking::StraightFlush(Rank::Two));
        assert!(Ranking::StraightFlush(Rank::Ace) < Ranking::Max);
    }

    #[test]
    fn wheel_description_is_not_royal() {
        assert_eq!(Ranking::Straight(Rank::Five).describe(), "Straight, Five high");
    }
}
