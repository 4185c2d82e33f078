//! A seat at the table, and a seat's state within the hand in progress.

use crate::cards::Hole;
use crate::money::Cents;
use uuid::Uuid;

/// A persistent seat: survives across hands, accrues a running stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: Uuid,
    pub index: usize,
    pub stack: Cents,
}

impl Seat {
    pub fn new(index: usize, stack: Cents) -> Seat {
        Seat {
            id: Uuid::now_v7(),
            index,
            stack,
        }
    }
}

/// A seat's view into the hand currently in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub seat_id: Uuid,
    pub seat_index: usize,
    pub stack: Cents,
    pub hole: Option<Hole>,
    /// Amount wagered so far in the current betting round.
    pub round_contrib: Cents,
    /// Amount wagered so far across the whole hand (all rounds summed).
    pub hand_contrib: Cents,
    pub has_folded: bool,
    pub is_all_in: bool,
    /// Cleared at the start of every betting round; set once the seat has
    /// acted. Used to detect "action has gone all the way around".
    pub acted_this_round: bool,
}

impl Player {
    pub fn new(seat: &Seat) -> Player {
        Player {
            seat_id: seat.id,
            seat_index: seat.index,
            stack: seat.stack,
            hole: None,
            round_contrib: Cents::new(0),
            hand_contrib: Cents::new(0),
            has_folded: false,
            is_all_in: false,
            acted_this_round: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.has_folded && !self.is_all_in
    }

    /// Move `amount` from stack into the pot, tracking both round and hand
    /// contribution ledgers. Caller has already validated `amount <= stack`.
    pub fn contribute(&mut self, amount: Cents) {
        self.stack = Cents::new(self.stack.0 - amount.0);
        self.round_contrib = self.round_contrib + amount;
        self.hand_contrib = self.hand_contrib + amount;
        if self.stack.is_zero() {
            self.is_all_in = true;
        }
    }

    pub fn start_new_round(&mut self) {
        self.round_contrib = Cents::new(0);
        self.acted_this_round = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contributing_full_stack_marks_all_in() {
        let seat = Seat::new(0, Cents::new(1000));
        let mut p = Player::new(&seat);
        p.contribute(Cents::new(1000));
        assert!(p.is_all_in);
        assert!(p.stack.is_zero());
        assert_eq!(p.hand_contrib, Cents::new(1000));
    }

    #[test]
    fn new_round_clears_round_contrib_but_not_hand_contrib() {
        let seat = Seat::new(0, Cents::new(1000));
        let mut p = Player::new(&seat);
        p.contribute(Cents::new(200));
        p.start_new_round();
        assert_eq!(p.round_contrib, Cents::new(0));
        assert_eq!(p.hand_contrib, Cents::new(200));
    }
}
