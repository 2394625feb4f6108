use std::fmt;

/// One of the four suits. Discriminant doubles as the 2-bit suit index used
/// throughout the bitmask representation.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Suit {
    C = 0,
    D = 1,
    H = 2,
    S = 3,
}

impl Suit {
    pub const fn all() -> [Self; 4] {
        [Suit::C, Suit::D, Suit::H, Suit::S]
    }

    pub const fn ascii(&self) -> char {
        match self {
            Suit::C => '♣',
            Suit::D => '♦',
            Suit::H => '♥',
            Suit::S => '♠',
        }
    }
}

impl From<Suit> for u8 {
    fn from(s: Suit) -> u8 {
        s as u8
    }
}
impl From<u8> for Suit {
    fn from(n: u8) -> Self {
        match n {
            0 => Suit::C,
            1 => Suit::D,
            2 => Suit::H,
            3 => Suit::S,
            _ => panic!("invalid suit index {n}"),
        }
    }
}

impl TryFrom<&str> for Suit {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "c" | "C" | "♣" => Ok(Suit::C),
            "d" | "D" | "♦" => Ok(Suit::D),
            "h" | "H" | "♥" => Ok(Suit::H),
            "s" | "S" | "♠" => Ok(Suit::S),
            _ => Err(format!("invalid suit: {s}")),
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = match self {
            Suit::C => 'c',
            Suit::D => 'd',
            Suit::H => 'h',
            Suit::S => 's',
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        for s in Suit::all() {
            assert_eq!(s, Suit::from(u8::from(s)));
        }
    }

    #[test]
    fn parses_both_cases() {
        assert_eq!(Suit::try_from("h").unwrap(), Suit::H);
        assert_eq!(Suit::try_from("H").unwrap(), Suit::H);
    }
}
