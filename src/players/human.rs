//! Interactive console agent: one blocking prompt per decision.

use crate::error::EngineError;
use crate::gameplay::action::{Action, ValidActions};
use crate::gameplay::agent::{Agent, Decision};
use crate::gameplay::observation::Observation;
use crate::gameplay::state::GameState;
use std::io::IsTerminal;

/// Prompts a human at the terminal for every decision. Auto-folds whenever
/// stdin is not a TTY, so a non-interactive harness never blocks on input
/// nobody can supply.
#[derive(Debug)]
pub struct HumanAgent {
    seat_index: usize,
}

impl HumanAgent {
    pub fn new(seat_index: usize) -> HumanAgent {
        HumanAgent { seat_index }
    }

    fn infoset(&self, obs: &Observation) -> String {
        format!(
            "\nSEAT       {}\nSTREET     {}\nPOT        {:.2} bb\nSTACK      {:.2} bb\nTO CALL    {:.2} bb\n\nAction",
            self.seat_index, obs.street_number, obs.pot_in_bb, obs.hero_stack_in_bb, obs.amount_to_call_in_bb,
        )
    }

    fn choice_labels(valid: &ValidActions) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if valid.can_fold {
            labels.push("fold");
        }
        if valid.can_check {
            labels.push("check");
        }
        if valid.can_call {
            labels.push("call");
        }
        if valid.can_bet {
            labels.push("bet");
        }
        if valid.can_raise {
            labels.push("raise");
        }
        labels
    }
}

impl Agent for HumanAgent {
    fn decide(&mut self, obs: &Observation, valid: &ValidActions, _context: &GameState) -> Result<Decision, EngineError> {
        if !std::io::stdin().is_terminal() {
            return Ok(Decision::with_confidence(Action::Fold, 1.0));
        }
        #[cfg(feature = "cli")]
        {
            Ok(Decision::with_confidence(interactive::prompt(self, obs, valid), 1.0))
        }
        #[cfg(not(feature = "cli"))]
        {
            Ok(Decision::with_confidence(Action::Fold, 1.0))
        }
    }
}

#[cfg(feature = "cli")]
mod interactive {
    use super::{Action, HumanAgent, ValidActions};
    use dialoguer::Select;

    pub fn prompt(agent: &HumanAgent, obs: &super::Observation, valid: &ValidActions) -> Action {
        let labels = HumanAgent::choice_labels(valid);
        if labels.is_empty() {
            return Action::Fold;
        }
        let selection = Select::new()
            .with_prompt(agent.infoset(obs))
            .items(&labels)
            .default(0)
            .report(false)
            .interact()
            .unwrap_or(0);
        match labels[selection] {
            "fold" => Action::Fold,
            "check" => Action::Check,
            "call" => Action::Call,
            "bet" => prompt_amount(valid, false),
            "raise" => prompt_amount(valid, true),
            _ => Action::Fold,
        }
    }

    fn prompt_amount(valid: &ValidActions, is_raise: bool) -> Action {
        if valid.raise_amounts.is_empty() {
            return Action::Fold;
        }
        let items: Vec<String> = valid.raise_amounts.iter().map(|c| c.to_string()).collect();
        let selection = Select::new()
            .with_prompt("raise to")
            .items(&items)
            .default(0)
            .report(false)
            .interact()
            .unwrap_or(0);
        let amount = valid.raise_amounts[selection];
        if is_raise {
            Action::Raise(amount)
        } else {
            Action::Bet(amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::phase::Phase;
    use crate::money::Cents;

    fn sample_state() -> GameState {
        use crate::gameplay::pot::Pot;
        use crate::gameplay::seat::{Player, Seat};
        use std::collections::BTreeSet;
        use uuid::Uuid;
        let seat = Seat::new(0, Cents::new(10000));
        GameState {
            hand_id: Uuid::now_v7(),
            phase: Phase::Preflop,
            players: vec![Player::new(&seat)],
            board: vec![],
            pots: vec![Pot {
                amount: Cents::new(0),
                eligible: BTreeSet::new(),
            }],
            dealer_seat: 0,
            highest_bet: Cents::new(0),
            last_raise_increment: Cents::new(200),
            small_blind: Cents::new(100),
            big_blind: Cents::new(200),
            to_act: None,
            last_aggressor: None,
            raises_this_street: 0,
        }
    }

    fn sample_observation() -> Observation {
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
            spr: 50.0,
            is_pair: 0.0,
            is_suited: 0.0,
            gap: 0.0,
            high_rank: 14.0,
            low_rank: 13.0,
            chen_score: 10.0,
            hand_class_tag: 0.0,
            hand_strength_percentile: 1.0,
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
            stack_depth_category: 3.0,
        }
    }

    #[test]
    fn non_tty_auto_folds() {
        let mut agent = HumanAgent::new(0);
        let valid = ValidActions {
            can_fold: true,
            can_check: true,
            can_call: false,
            call_amount: Cents::ZERO,
            can_bet: true,
            can_raise: false,
            raise_amounts: vec![Cents::new(200)],
        };
        let state = sample_state();
        let obs = sample_observation();
        let decision = agent.decide(&obs, &valid, &state).unwrap();
        assert_eq!(decision.action, Action::Fold);
    }
}
