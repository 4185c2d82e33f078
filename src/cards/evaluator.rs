//! Evaluates the best 5-card hand out of up to 7 cards using the classic
//! rank-bitmask / suit-bitmask technique.

use super::card::{Card, Rank};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    Trips = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    Quads = 7,
    StraightFlush = 8,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandCategory::HighCard => "high card",
            HandCategory::Pair => "pair",
            HandCategory::TwoPair => "two pair",
            HandCategory::Trips => "three of a kind",
            HandCategory::Straight => "straight",
            HandCategory::Flush => "flush",
            HandCategory::FullHouse => "full house",
            HandCategory::Quads => "four of a kind",
            HandCategory::StraightFlush => "straight flush",
        };
        write!(f, "{s}")
    }
}

/// A ranked 5-card hand. `Ord` compares category first, then kickers
/// high-to-low; a *greater* `Strength` is a *better* hand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Strength {
    pub category: HandCategory,
    /// Kicker ranks in descending significance, sized to the category.
    pub kickers: Vec<Rank>,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

/// Evaluate the best 5-card hand out of `cards` (2-7 cards: hole + board).
pub fn evaluate(cards: &[Card]) -> Strength {
    assert!(cards.len() >= 5, "need at least 5 cards to evaluate");
    let mut best: Option<Strength> = None;
    for combo in combinations(cards, 5) {
        let s = evaluate_five(&combo);
        if best.as_ref().is_none_or(|b| s > *b) {
            best = Some(s);
        }
    }
    best.expect("at least one 5-card combination exists")
}

fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    let n = cards.len();
    if k > n {
        return vec![];
    }
    let mut result = Vec::new();
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        result.push(idx.iter().map(|&i| cards[i]).collect());
        let mut i = k;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if idx[i] != i + n - k {
                break;
            }
            if i == 0 {
                return result;
            }
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

fn evaluate_five(cards: &[Card]) -> Strength {
    assert_eq!(cards.len(), 5);
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        rank_counts[c.rank().index() as usize] += 1;
        suit_counts[c.suit() as usize] += 1;
    }
    let is_flush = suit_counts.iter().any(|&n| n >= 5);

    let rank_bits: u16 = (0..13u8)
        .filter(|&i| rank_counts[i as usize] > 0)
        .fold(0u16, |acc, i| acc | (1 << i));
    let straight_high = straight_high_index(rank_bits);

    if is_flush {
        if let Some(high) = straight_high {
            return Strength {
                category: HandCategory::StraightFlush,
                kickers: vec![Rank::from_index(high)],
            };
        }
    }

    // Group ranks by multiplicity, each group sorted high-to-low.
    let mut by_count: [Vec<Rank>; 5] = Default::default();
    for i in (0..13u8).rev() {
        let n = rank_counts[i as usize] as usize;
        if n > 0 {
            by_count[n].push(Rank::from_index(i));
        }
    }

    if !by_count[4].is_empty() {
        let quad = by_count[4][0];
        let kicker = all_ranks_desc(&rank_counts)
            .into_iter()
            .find(|r| *r != quad)
            .unwrap();
        return Strength {
            category: HandCategory::Quads,
            kickers: vec![quad, kicker],
        };
    }

    if !by_count[3].is_empty() {
        let trips = by_count[3][0];
        // Full house: another trips-turned-pair, or a genuine pair.
        let pair = by_count[3].get(1).copied().or_else(|| by_count[2].first().copied());
        if let Some(pair) = pair {
            return Strength {
                category: HandCategory::FullHouse,
                kickers: vec![trips, pair],
            };
        }
    }

    if is_flush {
        let kickers = all_ranks_desc(&rank_counts);
        return Strength {
            category: HandCategory::Flush,
            kickers,
        };
    }

    if let Some(high) = straight_high {
        return Strength {
            category: HandCategory::Straight,
            kickers: vec![Rank::from_index(high)],
        };
    }

    if !by_count[3].is_empty() {
        let trips = by_count[3][0];
        let kickers = all_ranks_desc(&rank_counts)
            .into_iter()
            .filter(|r| *r != trips)
            .take(2)
            .collect::<Vec<_>>();
        return Strength {
            category: HandCategory::Trips,
            kickers: [vec![trips], kickers].concat(),
        };
    }

    if by_count[2].len() >= 2 {
        let hi_pair = by_count[2][0];
        let lo_pair = by_count[2][1];
        let kicker = all_ranks_desc(&rank_counts)
            .into_iter()
            .find(|r| *r != hi_pair && *r != lo_pair)
            .unwrap();
        return Strength {
            category: HandCategory::TwoPair,
            kickers: vec![hi_pair, lo_pair, kicker],
        };
    }

    if by_count[2].len() == 1 {
        let pair = by_count[2][0];
        let kickers = all_ranks_desc(&rank_counts)
            .into_iter()
            .filter(|r| *r != pair)
            .take(3)
            .collect::<Vec<_>>();
        return Strength {
            category: HandCategory::Pair,
            kickers: [vec![pair], kickers].concat(),
        };
    }

    Strength {
        category: HandCategory::HighCard,
        kickers: all_ranks_desc(&rank_counts),
    }
}

fn all_ranks_desc(rank_counts: &[u8; 13]) -> Vec<Rank> {
    (0..13u8)
        .rev()
        .filter(|&i| rank_counts[i as usize] > 0)
        .map(Rank::from_index)
        .collect()
}

/// Highest card of a straight represented in `rank_bits`, if any, including
/// the wheel (A-2-3-4-5). Returns the high card's rank index.
fn straight_high_index(rank_bits: u16) -> Option<u8> {
    // Shift every rank up one slot and splice the ace back in at bit 0, so
    // the wheel (A-2-3-4-5) reads as a contiguous run of bits 0-4 instead of
    // needing to wrap from the top of the range.
    let bits = (rank_bits << 1) | ((rank_bits >> 12) & 1);
    let mut best = None;
    for low in 0..=9u8 {
        let mask: u16 = 0b11111 << low;
        if bits & mask == mask {
            best = Some(low + 4);
        }
    }
    best.map(|high_bit| high_bit - 1)
}
