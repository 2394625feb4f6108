/// Named position at a poker table, relative to the dealer button and
/// computed over the sequence of *active* seats (sitting-out and empty
/// seats are skipped when ordering, per table convention).
///
/// - 2 active players: dealer -> BTN/SB, other -> BB.
/// - >= 3: dealer -> BTN, +1 -> SB, +2 -> BB, +3 -> UTG, then UTG+1, MP,
///   MP+1, HJ, CO filled toward the dealer as seats allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PositionName {
    BTN,
    SB,
    BB,
    UTG(usize),
    MP(usize),
    HJ,
    CO,
}

impl PositionName {
    /// Assigns a label to each entry of `active_seats_from_dealer`, an
    /// ordered list of seat indices starting at the dealer and walking
    /// clockwise through only the seats currently in the hand.
    pub fn label_all(active_seats_from_dealer: &[usize]) -> Vec<(usize, PositionName)> {
        let n = active_seats_from_dealer.len();
        let labels = canonical_labels(n);
        active_seats_from_dealer
            .iter()
            .copied()
            .zip(labels)
            .collect()
    }
}

/// The full 9-slot sequence, trimmed down to `n` entries by dropping from
/// the middle of the UTG/MP run first: short tables keep UTG and the late
/// positions (HJ, CO) and lose the middle seats, matching how real tables
/// rename positions as they shrink from 9-max down to heads-up.
fn canonical_labels(n: usize) -> Vec<PositionName> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![PositionName::BTN];
    }
    if n == 2 {
        return vec![PositionName::BTN, PositionName::BB];
    }
    let middle = [
        PositionName::UTG(0),
        PositionName::UTG(1),
        PositionName::MP(0),
        PositionName::MP(1),
        PositionName::HJ,
        PositionName::CO,
    ];
    let k = (n - 3).min(middle.len());
    let kept: Vec<PositionName> = if k == 0 {
        Vec::new()
    } else if k >= middle.len() {
        middle.to_vec()
    } else {
        let tail_start = middle.len() - (k - 1);
        let mut v = vec![middle[0]];
        v.extend_from_slice(&middle[tail_start..]);
        v
    };
    let mut labels = vec![PositionName::BTN, PositionName::SB, PositionName::BB];
    labels.extend(kept);
    labels
}

impl std::fmt::Display for PositionName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BTN => write!(f, "BTN"),
            Self::SB => write!(f, "SB"),
            Self::BB => write!(f, "BB"),
            Self::UTG(0) => write!(f, "UTG"),
            Self::UTG(n) => write!(f, "UTG+{n}"),
            Self::MP(0) => write!(f, "MP"),
            Self::MP(n) => write!(f, "MP+{n}"),
            Self::HJ => write!(f, "HJ"),
            Self::CO => write!(f, "CO"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_up_dealer_is_small_blind() {
        let labels = PositionName::label_all(&[5, 2]);
        assert_eq!(labels[0].1, PositionName::BTN);
        assert_eq!(labels[1].1, PositionName::BB);
    }

    #[test]
    fn six_max_matches_conventional_labels() {
        let labels = canonical_labels(6);
        assert_eq!(
            labels,
            vec![
                PositionName::BTN,
                PositionName::SB,
                PositionName::BB,
                PositionName::UTG(0),
                PositionName::HJ,
                PositionName::CO,
            ]
        );
    }

    #[test]
    fn nine_max_uses_every_slot() {
        assert_eq!(canonical_labels(9).len(), 9);
        assert_eq!(*canonical_labels(9).last().unwrap(), PositionName::CO);
    }

    #[test]
    fn every_seat_gets_a_distinct_label() {
        for n in 2..=9 {
            let seats: Vec<usize> = (0..n).collect();
            let labels = PositionName::label_all(&seats);
            let unique: std::collections::HashSet<_> = labels.iter().map(|(_, l)| *l).collect();
            assert_eq!(unique.len(), n, "duplicate position label at table size {n}");
        }
    }
}
