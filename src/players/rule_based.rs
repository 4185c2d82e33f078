//! A Monte-Carlo equity baseline: no longer the always-folds stub it once
//! was, but an agent that estimates its win probability against a uniform
//! random range for every live opponent, then sizes its action off pot
//! odds and stack-to-pot ratio.

use crate::cards::{evaluate, Card, Rank, Suit};
use crate::error::EngineError;
use crate::gameplay::action::{Action, ValidActions};
use crate::gameplay::agent::{Agent, Decision};
use crate::gameplay::observation::Observation;
use crate::gameplay::state::GameState;
use crate::money::Cents;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const MONTE_CARLO_TRIALS: usize = 400;
/// Equity needed to bet or raise for value.
const VALUE_EQUITY_THRESHOLD: f32 = 0.65;
/// Equity must clear pot odds by at least this much to call profitably.
const CALL_EQUITY_MARGIN: f32 = 0.03;
/// Minimum equity considered live enough to semibluff rather than fold.
const SEMIBLUFF_EQUITY_MIN: f32 = 0.30;
/// Semibluffing only when shoving doesn't risk much relative to the pot.
const SEMIBLUFF_SPR_MAX: f32 = 3.0;

#[derive(Debug)]
pub struct RuleBasedAgent {
    seat_index: usize,
    rng: SmallRng,
}

impl RuleBasedAgent {
    pub fn new(seat_index: usize, seed: u64) -> RuleBasedAgent {
        RuleBasedAgent {
            seat_index,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs `MONTE_CARLO_TRIALS` random rollouts of the unseen cards
    /// (remaining board plus every live opponent's hole) and returns the
    /// fraction of rollouts hero wins or splits.
    fn estimate_equity(&mut self, hero: [Card; 2], board: &[Card], num_opponents: usize) -> f32 {
        let missing_board = 5 - board.len();
        let mut excluded = hero.to_vec();
        excluded.extend_from_slice(board);
        let deck = remaining_deck(&excluded);
        let draw_count = missing_board + num_opponents * 2;
        if draw_count > deck.len() {
            return 0.5;
        }

        let mut wins = 0.0f32;
        for _ in 0..MONTE_CARLO_TRIALS {
            let mut pool = deck.clone();
            let (drawn, _) = pool.partial_shuffle(&mut self.rng, draw_count);
            let completed_board: Vec<Card> = board
                .iter()
                .copied()
                .chain(drawn[..missing_board].iter().copied())
                .collect();

            let hero_hand: Vec<Card> = hero.iter().copied().chain(completed_board.iter().copied()).collect();
            let mut strengths = vec![evaluate(&hero_hand)];
            for opp in 0..num_opponents {
                let start = missing_board + opp * 2;
                let opp_hole = &drawn[start..start + 2];
                let opp_hand: Vec<Card> = opp_hole.iter().copied().chain(completed_board.iter().copied()).collect();
                strengths.push(evaluate(&opp_hand));
            }

            let best = strengths.iter().max().expect("hero's own strength is always present").clone();
            let winners = strengths.iter().filter(|s| **s == best).count();
            if strengths[0] == best {
                wins += 1.0 / winners as f32;
            }
        }
        wins / MONTE_CARLO_TRIALS as f32
    }
}

fn remaining_deck(excluded: &[Card]) -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| (2..=14u8).map(move |v| Card::new(Rank::from_value(v), suit)))
        .filter(|c| !excluded.contains(c))
        .collect()
}

/// Size a value bet/raise off how far equity clears the value threshold:
/// a bare-minimum value hand takes the smallest offered amount, a lock
/// takes the largest.
fn pick_raise_amount(valid: &ValidActions, equity: f32) -> Option<Cents> {
    if valid.raise_amounts.is_empty() {
        return None;
    }
    let span = (valid.raise_amounts.len() - 1) as f32;
    let t = ((equity - VALUE_EQUITY_THRESHOLD) / (1.0 - VALUE_EQUITY_THRESHOLD)).clamp(0.0, 1.0);
    let idx = (t * span).round() as usize;
    valid.raise_amounts.get(idx).copied()
}

fn raise_for_value(valid: &ValidActions, equity: f32, facing_bet: bool) -> Action {
    match pick_raise_amount(valid, equity) {
        Some(amount) if valid.can_bet => Action::Bet(amount),
        Some(amount) => Action::Raise(amount),
        None if facing_bet => Action::Call,
        None => Action::Check,
    }
}

fn choose_action(equity: f32, obs: &Observation, valid: &ValidActions) -> Action {
    let facing_bet = !valid.call_amount.is_zero();

    if !facing_bet {
        if valid.can_bet && equity >= VALUE_EQUITY_THRESHOLD {
            return raise_for_value(valid, equity, false);
        }
        return Action::Check;
    }

    if valid.can_raise && equity >= VALUE_EQUITY_THRESHOLD {
        return raise_for_value(valid, equity, true);
    }
    if equity >= obs.pot_odds + CALL_EQUITY_MARGIN {
        return Action::Call;
    }
    if valid.can_raise && equity >= SEMIBLUFF_EQUITY_MIN && obs.spr <= SEMIBLUFF_SPR_MAX {
        if let Some(&shove) = valid.raise_amounts.last() {
            return Action::Raise(shove);
        }
    }
    if valid.can_fold {
        Action::Fold
    } else {
        Action::Call
    }
}

impl Agent for RuleBasedAgent {
    fn decide(&mut self, obs: &Observation, valid: &ValidActions, context: &GameState) -> Result<Decision, EngineError> {
        let hero = context
            .player_at(self.seat_index)
            .ok_or_else(|| EngineError::InputValidation(format!("no such seat: {}", self.seat_index)))?;
        let hole = hero
            .hole
            .ok_or_else(|| EngineError::Invariant(format!("seat {} has no hole cards to evaluate", self.seat_index)))?;
        let num_opponents = context
            .players
            .iter()
            .filter(|p| p.seat_index != self.seat_index && !p.has_folded)
            .count()
            .max(1);

        let equity = self.estimate_equity(hole.cards(), &context.board, num_opponents);
        let action = choose_action(equity, obs, valid);
        let action = if valid.permits(&action) {
            action
        } else if valid.can_check {
            Action::Check
        } else if valid.can_call {
            Action::Call
        } else {
            Action::Fold
        };
        Ok(Decision::with_confidence(action, equity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_deck_excludes_dead_cards() {
        let hero = [Card::try_from("Ah").unwrap(), Card::try_from("Kh").unwrap()];
        let board = [Card::try_from("2c").unwrap(), Card::try_from("3c").unwrap()];
        let mut excluded = hero.to_vec();
        excluded.extend_from_slice(&board);
        let deck = remaining_deck(&excluded);
        assert_eq!(deck.len(), 48);
        assert!(!deck.contains(&hero[0]));
        assert!(!deck.contains(&board[0]));
    }

    #[test]
    fn pocket_aces_heads_up_has_strong_equity() {
        let mut agent = RuleBasedAgent::new(0, 7);
        let equity = agent.estimate_equity(
            [Card::try_from("Ah").unwrap(), Card::try_from("Ac").unwrap()],
            &[],
            1,
        );
        assert!(equity > 0.7, "pocket aces heads-up preflop equity was {equity}");
    }

    #[test]
    fn choose_action_checks_back_a_weak_hand_with_nothing_to_call() {
        let valid = ValidActions {
            can_fold: true,
            can_check: true,
            can_call: false,
            call_amount: Cents::ZERO,
            can_bet: true,
            can_raise: false,
            raise_amounts: vec![Cents::new(200)],
        };
        let obs = blank_observation();
        assert_eq!(choose_action(0.2, &obs, &valid), Action::Check);
    }

    #[test]
    fn choose_action_folds_a_weak_hand_facing_a_big_bet() {
        let valid = ValidActions {
            can_fold: true,
            can_check: false,
            can_call: true,
            call_amount: Cents::new(1000),
            can_bet: false,
            can_raise: true,
            raise_amounts: vec![Cents::new(2000)],
        };
        let mut obs = blank_observation();
        obs.pot_odds = 0.5;
        assert_eq!(choose_action(0.1, &obs, &valid), Action::Fold);
    }

    fn blank_observation() -> Observation {
        Observation {
            street_one_hot: [0.0; 5],
            players_remaining: 2.0,
            hero_position_one_hot: [0.0; 10],
            pot_in_bb: 1.0,
            amount_to_call_in_bb: 0.0,
            pot_odds: 0.0,
            bet_to_call_ratio: 0.0,
            hero_stack_in_bb: 50.0,
            effective_stack_in_bb: 50.0,
            spr: 10.0,
            is_pair: 0.0,
            is_suited: 0.0,
            gap: 0.0,
            high_rank: 14.0,
            low_rank: 2.0,
            chen_score: 5.0,
            hand_class_tag: 0.0,
            hand_strength_percentile: 0.3,
            raises_this_street: 0.0,
            last_raise_increment_in_bb: 1.0,
            is_aggressor: 0.0,
            has_position: 0.0,
            board_paired: 0.0,
            board_monotone: 0.0,
            board_two_tone: 0.0,
            straighty_index: 0.0,
            top_board_rank: 2.0,
            board_coordination: 0.0,
            players_acted_this_street: 0.0,
            street_number: 1.0,
            is_all_in: 0.0,
            stack_depth_category: 2.0,
        }
    }
}
