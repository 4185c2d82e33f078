//! The immutable snapshot handed to agents, the observation builder, and
//! the logger. Treated as a value: nothing downstream mutates it.

use super::phase::Phase;
use super::pot::Pot;
use super::seat::Player;
use crate::cards::Card;
use crate::money::Cents;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub hand_id: Uuid,
    pub phase: Phase,
    pub players: Vec<Player>,
    pub board: Vec<Card>,
    pub pots: Vec<Pot>,
    pub dealer_seat: usize,
    pub highest_bet: Cents,
    /// Size of the last raise, for computing the next minimum raise.
    pub last_raise_increment: Cents,
    pub small_blind: Cents,
    pub big_blind: Cents,
    /// Seat index acting next, or `None` at showdown / hand end.
    pub to_act: Option<usize>,
    pub last_aggressor: Option<usize>,
    /// Count of BET/RAISE actions applied since the current street opened;
    /// feeds the Observation Builder's `raises_this_street` feature.
    pub raises_this_street: u32,
}

impl GameState {
    pub fn player_at(&self, seat_index: usize) -> Option<&Player> {
        self.players.iter().find(|p| p.seat_index == seat_index)
    }

    pub fn players_remaining(&self) -> usize {
        self.players.iter().filter(|p| !p.has_folded).count()
    }

    /// Chips already swept into built pots from prior streets.
    pub fn total_pot(&self) -> Cents {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// The full pot as a player would see it: built pots plus whatever
    /// every seat has wagered so far this street but not yet swept.
    pub fn current_pot(&self) -> Cents {
        self.total_pot() + self.players.iter().map(|p| p.round_contrib).sum::<Cents>()
    }
}
