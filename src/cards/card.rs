//! Card encoding: a single byte packs rank and suit.

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn ascii(&self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
    }
}

impl From<u8> for Suit {
    fn from(n: u8) -> Suit {
        match n % 4 {
            0 => Suit::Clubs,
            1 => Suit::Diamonds,
            2 => Suit::Hearts,
            _ => Suit::Spades,
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = ();
    fn try_from(c: char) -> Result<Suit, ()> {
        match c {
            'c' => Ok(Suit::Clubs),
            'd' => Ok(Suit::Diamonds),
            'h' => Ok(Suit::Hearts),
            's' => Ok(Suit::Spades),
            _ => Err(()),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ascii())
    }
}

/// Rank, stored 0-indexed internally (`2` = 0, ..., `Ace` = 12); `value()`
/// returns the conventional 2..14 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub const TWO: Rank = Rank(0);
    pub const ACE: Rank = Rank(12);

    pub fn from_index(i: u8) -> Rank {
        assert!(i < 13, "rank index out of range: {i}");
        Rank(i)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// Conventional 2..14 scale (deuce low, ace high).
    pub fn value(&self) -> u8 {
        self.0 + 2
    }

    pub fn from_value(v: u8) -> Rank {
        assert!((2..=14).contains(&v), "rank value out of range: {v}");
        Rank(v - 2)
    }

    pub fn ascii(&self) -> char {
        match self.0 {
            0 => '2',
            1 => '3',
            2 => '4',
            3 => '5',
            4 => '6',
            5 => '7',
            6 => '8',
            7 => '9',
            8 => 'T',
            9 => 'J',
            10 => 'Q',
            11 => 'K',
            12 => 'A',
            _ => unreachable!(),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = ();
    fn try_from(c: char) -> Result<Rank, ()> {
        let idx = match c.to_ascii_uppercase() {
            '2' => 0,
            '3' => 1,
            '4' => 2,
            '5' => 3,
            '6' => 4,
            '7' => 5,
            '8' => 6,
            '9' => 7,
            'T' => 8,
            'J' => 9,
            'Q' => 10,
            'K' => 11,
            'A' => 12,
            _ => return Err(()),
        };
        Ok(Rank(idx))
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ascii())
    }
}

/// `rank * 4 + suit`, matching the bit-packing idiom used throughout the
/// card-handling corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card(rank.index() * 4 + suit as u8)
    }

    pub fn rank(&self) -> Rank {
        Rank::from_index(self.0 / 4)
    }

    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }

    pub fn bit(&self) -> u64 {
        1u64 << self.0
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}

impl From<u8> for Card {
    fn from(n: u8) -> Card {
        assert!(n < 52, "card index out of range: {n}");
        Card(n)
    }
}

impl TryFrom<&str> for Card {
    type Error = ();
    fn try_from(s: &str) -> Result<Card, ()> {
        let mut chars = s.chars();
        let rank = Rank::try_from(chars.next().ok_or(())?)?;
        let suit = Suit::try_from(chars.next().ok_or(())?)?;
        if chars.next().is_some() {
            return Err(());
        }
        Ok(Card::new(rank, suit))
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

/// Parse a whitespace/comma separated string of two-character cards.
/// Total over exactly two-character tokens; anything else fails.
pub fn parse_cards(s: &str) -> Result<Vec<Card>, String> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| Card::try_from(tok).map_err(|_| format!("invalid card: {tok}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_rank_value() {
        for v in 2..=14u8 {
            assert_eq!(Rank::from_value(v).value(), v);
        }
    }

    #[test]
    fn parses_and_displays_round_trip() {
        for s in ["2c", "Th", "As", "Jd"] {
            let card = Card::try_from(s).unwrap();
            assert_eq!(card.to_string(), s);
        }
    }

    #[test]
    fn rejects_malformed_card_text() {
        assert!(Card::try_from("2").is_err());
        assert!(Card::try_from("2cc").is_err());
        assert!(Card::try_from("1c").is_err());
        assert!(Card::try_from("2x").is_err());
    }

    #[test]
    fn parse_cards_splits_on_whitespace_and_commas() {
        let cards = parse_cards("2c, Th As").unwrap();
        assert_eq!(cards.len(), 3);
    }
}
