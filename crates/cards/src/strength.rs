use super::kickers::Kickers;
use super::ranking::Ranking;

/// A fully comparable hand value: category first, kickers break ties within
/// a category. `Ord` on this type is the entire showdown comparison.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Strength {
    ranking: Ranking,
    kickers: Kickers,
}

impl From<(Ranking, Kickers)> for Strength {
    fn from((ranking, kickers): (Ranking, Kickers)) -> Self {
        Self { ranking, kickers }
    }
}

impl Strength {
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }
    pub fn describe(&self) -> String {
        self.ranking.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;

    #[test]
    fn category_dominates_kickers() {
        let pair_of_aces = Strength::from((Ranking::OnePair(Rank::Ace), Kickers::default()));
        let high_card_nothing = Strength::from((
            Ranking::HighCard(Rank::King),
            Kickers::from(vec![Rank::Queen, Rank::Jack, Rank::Ten, Rank::Nine]),
        ));
        assert!(pair_of_aces > high_card_nothing);
    }
}
