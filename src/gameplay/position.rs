//! Static betting-order tables keyed by player count and street. All
//! derived tables are rotations of the seat order read clockwise from the
//! dealer.

use crate::error::EngineError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Utg,
    Utg1,
    Utg2,
    Mp,
    Lj,
    Hj,
    Co,
    Button,
    Sb,
    Bb,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Position::Utg => "UTG",
            Position::Utg1 => "UTG+1",
            Position::Utg2 => "UTG+2",
            Position::Mp => "MP",
            Position::Lj => "LJ",
            Position::Hj => "HJ",
            Position::Co => "CO",
            Position::Button => "BTN",
            Position::Sb => "SB",
            Position::Bb => "BB",
        };
        write!(f, "{s}")
    }
}

use Position::*;

/// Seats listed clockwise starting at the dealer (BUTTON, or SB in
/// heads-up where the dealer posts the small blind). All other tables are
/// rotations of this one.
fn seat_order_from_dealer(n: usize) -> Result<&'static [Position], EngineError> {
    Ok(match n {
        2 => &[Sb, Bb],
        3 => &[Button, Sb, Bb],
        4 => &[Button, Sb, Bb, Utg],
        5 => &[Button, Sb, Bb, Utg, Co],
        6 => &[Button, Sb, Bb, Utg, Hj, Co],
        7 => &[Button, Sb, Bb, Utg, Mp, Hj, Co],
        8 => &[Button, Sb, Bb, Utg, Utg1, Mp, Hj, Co],
        9 => &[Button, Sb, Bb, Utg, Utg1, Utg2, Mp, Hj, Co],
        10 => &[Button, Sb, Bb, Utg, Utg1, Utg2, Mp, Lj, Hj, Co],
        _ => {
            return Err(EngineError::InputValidation(format!(
                "unsupported player count: {n}. must be 2-10"
            )))
        }
    })
}

fn rotate(order: &[Position], by: usize) -> Vec<Position> {
    let by = by % order.len();
    order[by..].iter().chain(order[..by].iter()).copied().collect()
}

/// Positions in first-to-act -> last-to-act order for the given phase.
pub fn betting_order(n: usize, is_preflop: bool) -> Result<Vec<Position>, EngineError> {
    let seats = seat_order_from_dealer(n)?;
    Ok(if is_preflop {
        // UTG sits at index 3 in seat_order_from_dealer for n>=4; for
        // n in {2,3} there is no separate UTG seat, so preflop begins at
        // the seat_order's own first entry (SB heads-up, BUTTON 3-handed).
        let start = if n >= 4 { 3 } else { 0 };
        rotate(seats, start)
    } else {
        // Postflop always begins immediately after the dealer.
        rotate(seats, 1)
    })
}

pub fn first_to_act(n: usize, is_preflop: bool) -> Result<Position, EngineError> {
    Ok(betting_order(n, is_preflop)?[0])
}

pub fn last_to_act(n: usize, is_preflop: bool) -> Result<Position, EngineError> {
    let order = betting_order(n, is_preflop)?;
    Ok(*order.last().unwrap())
}

/// Next position after `current`, wrapping by default.
pub fn next_position(
    n: usize,
    is_preflop: bool,
    current: Position,
    wrap: bool,
) -> Result<Option<Position>, EngineError> {
    let order = betting_order(n, is_preflop)?;
    let idx = match order.iter().position(|&p| p == current) {
        Some(i) => i,
        None => return Ok(None),
    };
    if idx == order.len() - 1 {
        return Ok(if wrap { Some(order[0]) } else { None });
    }
    Ok(Some(order[idx + 1]))
}

/// Assign a Position to every seat (indexed 0..n) given the dealer's seat
/// index, by rotating `seat_order_from_dealer`.
pub fn assign_positions(n: usize, dealer_seat: usize) -> Result<Vec<Position>, EngineError> {
    let seats = seat_order_from_dealer(n)?;
    let mut assigned = vec![Sb; n];
    for (offset, position) in seats.iter().enumerate() {
        assigned[(dealer_seat + offset) % n] = *position;
    }
    Ok(assigned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heads_up_preflop_is_sb_then_bb() {
        assert_eq!(betting_order(2, true).unwrap(), vec![Sb, Bb]);
    }

    #[test]
    fn heads_up_postflop_is_bb_then_sb() {
        assert_eq!(betting_order(2, false).unwrap(), vec![Bb, Sb]);
    }

    #[test]
    fn three_handed_preflop_has_no_utg() {
        assert_eq!(betting_order(3, true).unwrap(), vec![Button, Sb, Bb]);
    }

    #[test]
    fn six_handed_preflop_matches_table() {
        assert_eq!(
            betting_order(6, true).unwrap(),
            vec![Utg, Hj, Co, Button, Sb, Bb]
        );
    }

    #[test]
    fn six_handed_postflop_matches_table() {
        assert_eq!(
            betting_order(6, false).unwrap(),
            vec![Sb, Bb, Utg, Hj, Co, Button]
        );
    }

    #[test]
    fn ten_handed_tables_have_all_positions() {
        let pre = betting_order(10, true).unwrap();
        assert_eq!(pre.len(), 10);
        assert_eq!(pre.last().copied(), Some(Bb));
    }

    #[test]
    fn rejects_out_of_range_player_count() {
        assert!(betting_order(1, true).is_err());
        assert!(betting_order(11, true).is_err());
    }

    #[test]
    fn assign_positions_rotates_from_dealer() {
        let positions = assign_positions(3, 1).unwrap();
        // dealer seat 1 is BUTTON; seat 2 is SB; seat 0 is BB.
        assert_eq!(positions[1], Button);
        assert_eq!(positions[2], Sb);
        assert_eq!(positions[0], Bb);
    }

    #[test]
    fn next_position_wraps() {
        assert_eq!(
            next_position(6, false, Button, true).unwrap(),
            Some(Sb)
        );
        assert_eq!(next_position(6, false, Button, false).unwrap(), None);
    }
}
