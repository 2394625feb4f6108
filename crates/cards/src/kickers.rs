use super::rank::Rank;

/// Tiebreaker ranks in decreasing significance, compared lexicographically.
/// Two hands of the same [`super::ranking::Ranking`] category are ordered by
/// their kickers left to right.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Kickers(Vec<Rank>);

impl From<Vec<Rank>> for Kickers {
    fn from(ranks: Vec<Rank>) -> Self {
        Self(ranks)
    }
}

impl Kickers {
    pub fn ranks(&self) -> &[Rank] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_first_kicker_wins() {
        let a = Kickers::from(vec![Rank::Ace]);
        let b = Kickers::from(vec![Rank::King]);
        assert!(a > b);
    }

    #[test]
    fn shorter_kicker_list_is_not_implicitly_smaller_when_equal() {
        let a = Kickers::from(vec![Rank::Ace, Rank::King]);
        let b = Kickers::from(vec![Rank::Ace, Rank::King]);
        assert_eq!(a, b);
    }
}
