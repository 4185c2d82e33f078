//! Pure rule functions: legality checks, state transitions, and raise-size
//! menus. Nothing here performs I/O or holds state across calls — every
//! function takes a `GameState` and returns a fresh value or an error.

use super::action::{Action, ActionKind, AppliedAction, ValidActions};
use super::phase::Phase;
use super::state::GameState;
use crate::error::EngineError;
use crate::money::Cents;

/// Governs how raise amounts are offered to a player: a short discrete menu
/// of common sizes, or a full ladder stepping by the small blind. Set once
/// per table and echoed into logs so replay tooling knows which menu a
/// recorded action was chosen from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseStyle {
    DiscreteButtons,
    SmallBlindIncrements,
}

pub fn amount_to_call(state: &GameState, seat_index: usize) -> Result<Cents, EngineError> {
    let player = state
        .player_at(seat_index)
        .ok_or_else(|| EngineError::InputValidation(format!("no such seat: {seat_index}")))?;
    Ok(Cents::new((state.highest_bet.0 - player.round_contrib.0).max(0)))
}

pub fn min_raise_to(state: &GameState) -> Cents {
    if state.highest_bet.is_zero() {
        state.big_blind
    } else {
        state.highest_bet + state.last_raise_increment
    }
}

fn pot_sized_raise_to(state: &GameState, seat_index: usize) -> Result<Cents, EngineError> {
    let player = state
        .player_at(seat_index)
        .ok_or_else(|| EngineError::InputValidation(format!("no such seat: {seat_index}")))?;
    let to_call = amount_to_call(state, seat_index)?.min(player.stack);
    let pot_after_call = state.current_pot() + to_call;
    Ok(state.highest_bet + to_call + pot_after_call)
}

fn all_in_raise_to(state: &GameState, seat_index: usize) -> Result<Cents, EngineError> {
    let player = state
        .player_at(seat_index)
        .ok_or_else(|| EngineError::InputValidation(format!("no such seat: {seat_index}")))?;
    Ok(player.round_contrib + player.stack)
}

/// Short menu: minimum raise, 2.5x and 3x the big blind, a pot-sized raise,
/// and shoving all in — deduplicated, sorted, clamped to what the seat can
/// legally offer.
fn discrete_raise_amounts(state: &GameState, seat_index: usize) -> Result<Vec<Cents>, EngineError> {
    let min_raise = min_raise_to(state);
    let all_in = all_in_raise_to(state, seat_index)?;
    if all_in <= min_raise {
        return Ok(vec![all_in]);
    }
    let candidates = [
        min_raise,
        Cents::new(state.big_blind.0 * 5 / 2),
        Cents::new(state.big_blind.0 * 3),
        pot_sized_raise_to(state, seat_index)?,
        all_in,
    ];
    let mut amounts: Vec<Cents> = candidates
        .into_iter()
        .filter(|&c| c >= min_raise && c <= all_in)
        .collect();
    amounts.sort();
    amounts.dedup();
    Ok(amounts)
}

/// Full ladder: every small-blind increment from the minimum raise up to
/// all in.
fn non_discrete_raise_amounts(state: &GameState, seat_index: usize) -> Result<Vec<Cents>, EngineError> {
    let min_raise = min_raise_to(state);
    let all_in = all_in_raise_to(state, seat_index)?;
    let mut amounts = Vec::new();
    let mut cur = min_raise;
    while cur < all_in {
        amounts.push(cur);
        cur = cur + state.small_blind;
    }
    amounts.push(all_in);
    Ok(amounts)
}

pub fn valid_actions(
    state: &GameState,
    seat_index: usize,
    style: RaiseStyle,
) -> Result<ValidActions, EngineError> {
    let player = state
        .player_at(seat_index)
        .ok_or_else(|| EngineError::InputValidation(format!("no such seat: {seat_index}")))?;
    if player.has_folded || player.is_all_in {
        return Ok(ValidActions {
            can_fold: false,
            can_check: false,
            can_call: false,
            call_amount: Cents::ZERO,
            can_bet: false,
            can_raise: false,
            raise_amounts: vec![],
        });
    }

    let to_call = amount_to_call(state, seat_index)?;
    let call_amount = to_call.min(player.stack);
    let can_bet = state.highest_bet.is_zero() && !player.stack.is_zero();
    let can_raise = !state.highest_bet.is_zero() && player.stack > to_call;

    let raise_amounts = if can_bet || can_raise {
        match style {
            RaiseStyle::DiscreteButtons => discrete_raise_amounts(state, seat_index)?,
            RaiseStyle::SmallBlindIncrements => non_discrete_raise_amounts(state, seat_index)?,
        }
    } else {
        vec![]
    };

    Ok(ValidActions {
        can_fold: true,
        can_check: to_call.is_zero(),
        can_call: !to_call.is_zero(),
        call_amount,
        can_bet,
        can_raise,
        raise_amounts,
    })
}

/// Apply a validated action to a cloned state, returning the successor and
/// the applied-action record the Hand orchestrator uses to decide whether
/// to rebuild its action queue (a full raise reopens action to seats that
/// already acted; a short all-in does not).
/// Does not advance the phase; call `should_advance_phase`/`next_phase`
/// separately once every seat has acted.
pub fn apply_action(
    state: &GameState,
    seat_index: usize,
    action: Action,
    style: RaiseStyle,
) -> Result<(GameState, AppliedAction), EngineError> {
    let valid = valid_actions(state, seat_index, style)?;
    if !valid.permits(&action) {
        return Err(EngineError::RuleViolation(format!(
            "seat {seat_index} may not {action} right now"
        )));
    }

    let mut next = state.clone();
    let idx = next
        .players
        .iter()
        .position(|p| p.seat_index == seat_index)
        .expect("validated above");

    let mut applied = AppliedAction {
        kind: action.kind(),
        amount: Cents::ZERO,
        chips_moved: Cents::ZERO,
        is_full_raise: false,
    };

    match action {
        Action::Fold => {
            next.players[idx].has_folded = true;
        }
        Action::Check => {}
        Action::Call => {
            let call_amount = valid.call_amount;
            next.players[idx].contribute(call_amount);
            applied.amount = call_amount;
            applied.chips_moved = call_amount;
        }
        Action::Bet(to) | Action::Raise(to) => {
            let increment = Cents::new(to.0 - next.highest_bet.0);
            let delta = Cents::new(to.0 - next.players[idx].round_contrib.0);
            let is_full_raise = increment >= next.last_raise_increment;
            next.players[idx].contribute(delta);
            next.highest_bet = to;
            next.raises_this_street += 1;
            applied.amount = to;
            applied.chips_moved = delta;
            applied.is_full_raise = is_full_raise;
            if is_full_raise {
                next.last_raise_increment = increment;
                next.last_aggressor = Some(seat_index);
                for p in next.players.iter_mut() {
                    if p.seat_index != seat_index && p.is_active() {
                        p.acted_this_round = false;
                    }
                }
            }
        }
    }
    next.players[idx].acted_this_round = true;
    Ok((next, applied))
}

/// A round closes once every seat still in the hand has acted since the
/// last raise and matched the current bet, or at most one seat remains
/// able to act (everyone else folded or shoved all in).
pub fn should_advance_phase(state: &GameState) -> bool {
    let contenders: Vec<_> = state.players.iter().filter(|p| !p.has_folded).collect();
    if contenders.len() <= 1 {
        return true;
    }
    let can_still_act = contenders.iter().filter(|p| !p.is_all_in).count();
    if can_still_act <= 1 {
        return true;
    }
    contenders
        .iter()
        .filter(|p| !p.is_all_in)
        .all(|p| p.acted_this_round && p.round_contrib == state.highest_bet)
}

pub fn next_phase(current: Phase) -> Phase {
    current.next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::pot::Pot;
    use crate::gameplay::seat::{Player, Seat};
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn sample_state(highest_bet: i64, stacks: &[i64], contribs: &[i64]) -> GameState {
        let players = stacks
            .iter()
            .zip(contribs)
            .enumerate()
            .map(|(i, (&stack, &contrib))| {
                let seat = Seat::new(i, Cents::new(stack + contrib));
                let mut p = Player::new(&seat);
                p.stack = Cents::new(stack);
                p.round_contrib = Cents::new(contrib);
                p.hand_contrib = Cents::new(contrib);
                p
            })
            .collect();
        GameState {
            hand_id: Uuid::now_v7(),
            phase: Phase::Preflop,
            players,
            board: vec![],
            pots: vec![Pot {
                amount: Cents::new(0),
                eligible: BTreeSet::new(),
            }],
            dealer_seat: 0,
            highest_bet: Cents::new(highest_bet),
            last_raise_increment: Cents::new(200),
            small_blind: Cents::new(100),
            big_blind: Cents::new(200),
            to_act: Some(0),
            last_aggressor: None,
            raises_this_street: 0,
        }
    }

    #[test]
    fn check_is_legal_when_nothing_to_call() {
        let state = sample_state(0, &[1000, 1000], &[0, 0]);
        let va = valid_actions(&state, 0, RaiseStyle::DiscreteButtons).unwrap();
        assert!(va.can_check);
        assert!(!va.can_call);
        assert!(va.can_bet);
        assert!(!va.can_raise);
    }

    #[test]
    fn call_is_legal_and_capped_at_stack() {
        let state = sample_state(500, &[300, 1000], &[0, 500]);
        let va = valid_actions(&state, 0, RaiseStyle::DiscreteButtons).unwrap();
        assert!(!va.can_check);
        assert!(va.can_call);
        assert_eq!(va.call_amount, Cents::new(300));
    }

    #[test]
    fn min_raise_doubles_highest_bet_plus_increment() {
        let state = sample_state(200, &[1000, 1000], &[0, 200]);
        assert_eq!(min_raise_to(&state), Cents::new(400));
    }

    #[test]
    fn short_all_in_raise_menu_has_only_all_in() {
        let state = sample_state(200, &[50, 1000], &[0, 200]);
        let amounts = discrete_raise_amounts(&state, 0).unwrap();
        assert_eq!(amounts, vec![Cents::new(50)]);
    }

    #[test]
    fn apply_raise_resets_others_acted_flag() {
        let mut state = sample_state(200, &[1000, 1000, 1000], &[0, 200, 200]);
        state.players[1].acted_this_round = true;
        state.players[2].acted_this_round = true;
        let (next, applied) =
            apply_action(&state, 0, Action::Raise(Cents::new(600)), RaiseStyle::DiscreteButtons).unwrap();
        assert!(!next.players[1].acted_this_round);
        assert!(!next.players[2].acted_this_round);
        assert_eq!(next.highest_bet, Cents::new(600));
        assert_eq!(next.last_aggressor, Some(0));
        assert!(applied.is_full_raise);
    }

    #[test]
    fn short_all_in_raise_does_not_reopen_action() {
        let mut state = sample_state(200, &[1000, 25, 1000], &[0, 200, 200]);
        state.players[1].acted_this_round = true;
        state.players[2].acted_this_round = true;
        // seat 1 has only 25 left; all-in raise to 225 is a 25-cent
        // increment, far short of the 200-cent last_raise_increment.
        let (next, applied) =
            apply_action(&state, 1, Action::Raise(Cents::new(225)), RaiseStyle::DiscreteButtons).unwrap();
        assert!(!applied.is_full_raise);
        assert!(next.players[2].acted_this_round, "short all-in must not reopen action");
        assert_eq!(next.last_raise_increment, Cents::new(200));
        assert_eq!(next.last_aggressor, None);
    }

    #[test]
    fn phase_does_not_advance_until_bets_match() {
        let mut state = sample_state(200, &[1000, 1000], &[0, 200]);
        state.players[0].acted_this_round = true;
        state.players[1].acted_this_round = true;
        assert!(!should_advance_phase(&state));
        state.players[0].round_contrib = Cents::new(200);
        assert!(should_advance_phase(&state));
    }

    #[test]
    fn single_contender_always_advances() {
        let mut state = sample_state(200, &[1000, 1000], &[0, 200]);
        state.players[1].has_folded = true;
        assert!(should_advance_phase(&state));
    }

    #[test]
    fn folded_seat_yields_empty_action_set() {
        let mut state = sample_state(200, &[1000, 1000], &[0, 200]);
        state.players[0].has_folded = true;
        let va = valid_actions(&state, 0, RaiseStyle::DiscreteButtons).unwrap();
        assert!(!va.can_fold && !va.can_check && !va.can_call && !va.can_bet && !va.can_raise);
        assert!(va.raise_amounts.is_empty());
    }

    #[test]
    fn all_in_seat_yields_empty_action_set() {
        let mut state = sample_state(200, &[1000, 1000], &[0, 200]);
        state.players[0].is_all_in = true;
        let va = valid_actions(&state, 0, RaiseStyle::DiscreteButtons).unwrap();
        assert!(!va.can_fold && !va.can_call && !va.can_raise);
    }
}
