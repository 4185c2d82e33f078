//! Player actions and the engine's decision about which ones are legal.

use crate::money::Cents;
use std::fmt;

/// An action a player may take. `Bet`/`Raise` are distinct: a `Bet` opens a
/// round where no one has yet wagered, a `Raise` increases an existing
/// wager. The engine rejects a `Bet` when `highest_bet > 0` and a `Raise`
/// when `highest_bet == 0`, mirroring the legality split in `valid_actions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Cents),
    Raise(Cents),
}

impl Action {
    pub fn amount(&self) -> Option<Cents> {
        match self {
            Action::Bet(c) | Action::Raise(c) => Some(*c),
            _ => None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check => ActionKind::Check,
            Action::Call => ActionKind::Call,
            Action::Bet(_) => ActionKind::Bet,
            Action::Raise(_) => ActionKind::Raise,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "fold"),
            Action::Check => write!(f, "check"),
            Action::Call => write!(f, "call"),
            Action::Bet(c) => write!(f, "bet {c}"),
            Action::Raise(c) => write!(f, "raise to {c}"),
        }
    }
}

/// Bare action type, independent of amount; the set of kinds a seat is
/// permitted to choose from, plus blind postings a dealer issues
/// unprompted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    DealHole,
    DealCommunity,
    WinPot,
    PostSmallBlind,
    PostBigBlind,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Bet => "bet",
            ActionKind::Raise => "raise",
            ActionKind::DealHole => "deal_hole",
            ActionKind::DealCommunity => "deal_community",
            ActionKind::WinPot => "win_pot",
            ActionKind::PostSmallBlind => "post_small_blind",
            ActionKind::PostBigBlind => "post_big_blind",
        };
        write!(f, "{s}")
    }
}

/// What a seat is legally permitted to do right now, and the raise amounts
/// on offer if raising is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidActions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub call_amount: Cents,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Discrete raise-to amounts on offer, ascending, deduplicated. Empty
    /// when neither betting nor raising is legal.
    pub raise_amounts: Vec<Cents>,
}

impl ValidActions {
    pub fn permits(&self, action: &Action) -> bool {
        match action {
            Action::Fold => self.can_fold,
            Action::Check => self.can_check,
            Action::Call => self.can_call,
            Action::Bet(amount) => self.can_bet && self.raise_amounts.contains(amount),
            Action::Raise(amount) => self.can_raise && self.raise_amounts.contains(amount),
        }
    }
}

/// A validated, applied action together with the bookkeeping the rules
/// engine derives from it (full raise vs. short all-in, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedAction {
    pub kind: ActionKind,
    /// Bet/Raise: the cumulative round-contribution target ("raise to"),
    /// for display and logging. Call: the call amount. Fold/Check: zero.
    pub amount: Cents,
    /// Chips that actually left the seat's stack this action — the ledger
    /// must be posted with this, not `amount`, since `amount` is cumulative
    /// for Bet/Raise while a seat's stack only moves by the increment.
    pub chips_moved: Cents,
    pub is_full_raise: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_actions_permits_checks_amount_membership() {
        let va = ValidActions {
            can_fold: true,
            can_check: false,
            can_call: true,
            call_amount: Cents::new(200),
            can_bet: false,
            can_raise: true,
            raise_amounts: vec![Cents::new(400), Cents::new(600)],
        };
        assert!(va.permits(&Action::Raise(Cents::new(400))));
        assert!(!va.permits(&Action::Raise(Cents::new(500))));
        assert!(!va.permits(&Action::Check));
    }
}
